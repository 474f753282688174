use tracing::{debug, warn};

use crate::protocol::ShellEvent;
use crate::widget::slot::{ProcessSlot, ProcessState};

/// Which user controls are currently enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordances {
    pub execute: bool,
    pub terminate: bool,
    pub kill: bool,
}

/// State machine governing one process slot.
///
/// The controller owns the slot. It is mutated from exactly two places: the
/// command channel performing the optimistic Running transition at execute
/// time, and the event dispatcher applying backend-confirmed events. Both run
/// on the single control thread, so no locking is needed.
#[derive(Debug, Default)]
pub struct LifecycleController {
    slot: ProcessSlot,
}

impl LifecycleController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self) -> &ProcessSlot {
        &self.slot
    }

    pub fn state(&self) -> ProcessState {
        self.slot.state()
    }

    /// Affordances derived from the current state.
    ///
    /// Both Running sub-phases disable Execute and enable Terminate/Kill, so
    /// the flip happens synchronously with the optimistic transition, before
    /// any backend response arrives.
    pub fn affordances(&self) -> Affordances {
        let running = self.slot.is_running();
        Affordances {
            execute: !running,
            terminate: running,
            kill: running,
        }
    }

    /// Optimistic transition into Running at execute time.
    ///
    /// Valid from Idle and from every terminal state (re-entrant restart).
    pub fn begin_execute(&mut self) {
        debug_assert!(!self.slot.is_running());
        self.slot.begin_request();
    }

    /// Apply one backend event and return the notice text to display, if any.
    ///
    /// `command` is the backend-owned command string from the shared model,
    /// used for the header line on `started`.
    pub fn apply(&mut self, event: &ShellEvent, command: &str) -> Option<String> {
        match event {
            ShellEvent::Started { pid, pgid } => {
                if !self.slot.is_running() {
                    // Backend-initiated run (auto-run): accept the start as
                    // if it had been requested locally.
                    self.slot.begin_request();
                }
                self.slot.confirm_started(*pid, *pgid);
                let mut header = format!("$ {command}\npid={pid}");
                if let Some(pgid) = pgid {
                    header.push_str(&format!(" pgid={pgid}"));
                }
                header.push_str("\n\n");
                Some(header)
            }
            ShellEvent::Output { .. } => {
                // Routed to the batcher by the dispatcher, not here.
                debug!("output event reached the controller; ignoring");
                None
            }
            ShellEvent::Completed { returncode } => {
                self.note_if_stale("completed");
                self.slot.complete(*returncode);
                Some(if *returncode == 0 {
                    "\n\u{2705} Done".to_string()
                } else {
                    format!("\n\u{274c} Exit code {returncode}")
                })
            }
            ShellEvent::Terminated => {
                self.note_if_stale("terminated");
                self.slot.mark_terminated();
                Some("\n\u{1f6d1} Terminated (SIGTERM)".to_string())
            }
            ShellEvent::Killed => {
                self.note_if_stale("killed");
                self.slot.mark_killed();
                Some("\n\u{274c} Killed (SIGKILL)".to_string())
            }
            ShellEvent::Error { error } => {
                self.slot.fail(error.clone());
                Some(format!("\n\u{1f4a5} Error: {error}"))
            }
            ShellEvent::NotRunning => {
                // Stale-state advisory: the process already ended from the
                // backend's point of view. Not a fault, no transition.
                warn!("terminate/kill requested with no active process");
                Some("\n\u{26a0}\u{fe0f} No running process".to_string())
            }
        }
    }

    fn note_if_stale(&self, event: &str) {
        // The backend reaps a signalled child after emitting terminated or
        // killed, so a trailing completed from a terminal state is expected;
        // the last event wins.
        if !self.slot.is_running() {
            debug!(event, state = ?self.slot.state(), "terminal event outside Running");
        }
    }
}
