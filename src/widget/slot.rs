/// Lifecycle state of the single process tracked by a widget instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// No process has been requested yet
    Idle,
    /// A start was requested locally or confirmed by the backend
    Running,
    /// Exited on its own with an exit code
    Completed,
    /// Stopped by a terminate request (SIGTERM)
    Terminated,
    /// Stopped by a kill request (SIGKILL)
    Killed,
    /// Backend or transport reported a failure
    Errored,
}

impl ProcessState {
    /// Check if the state is terminal (a new execute may be requested)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Terminated | Self::Killed | Self::Errored
        )
    }
}

/// The single logical process slot owned by one widget instance.
///
/// `Running` has two sub-phases distinguished by whether `pid` is populated:
/// locally requested (optimistic, pid absent) and backend-confirmed (pid
/// recorded). Both gate user affordances identically; collapsing them into
/// "Idle until confirmed" would reintroduce the double-submit race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSlot {
    state: ProcessState,
    pid: Option<i32>,
    pgid: Option<i32>,
    exit_code: Option<i32>,
    error_message: Option<String>,
}

impl Default for ProcessSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessSlot {
    /// Create an idle slot with no process observed
    pub fn new() -> Self {
        Self {
            state: ProcessState::Idle,
            pid: None,
            pgid: None,
            exit_code: None,
            error_message: None,
        }
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn pid(&self) -> Option<i32> {
        self.pid
    }

    pub fn pgid(&self) -> Option<i32> {
        self.pgid
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Check if the slot is in either Running sub-phase
    pub fn is_running(&self) -> bool {
        self.state == ProcessState::Running
    }

    /// Check if the backend has confirmed the start of the current run
    pub fn is_confirmed(&self) -> bool {
        self.is_running() && self.pid.is_some()
    }

    /// Enter the optimistic Running sub-phase at execute time.
    ///
    /// Clears every field left over from a previous run so that exactly one
    /// terminal field is ever populated at a time.
    pub fn begin_request(&mut self) {
        self.state = ProcessState::Running;
        self.pid = None;
        self.pgid = None;
        self.exit_code = None;
        self.error_message = None;
    }

    /// Record the backend-confirmed pid/pgid for the current run
    pub fn confirm_started(&mut self, pid: i32, pgid: Option<i32>) {
        self.state = ProcessState::Running;
        self.pid = Some(pid);
        self.pgid = pgid;
    }

    /// Transition to Completed with an exit code
    pub fn complete(&mut self, exit_code: i32) {
        self.state = ProcessState::Completed;
        self.exit_code = Some(exit_code);
        self.error_message = None;
    }

    /// Transition to Terminated
    pub fn mark_terminated(&mut self) {
        self.state = ProcessState::Terminated;
        self.exit_code = None;
        self.error_message = None;
    }

    /// Transition to Killed
    pub fn mark_killed(&mut self) {
        self.state = ProcessState::Killed;
        self.exit_code = None;
        self.error_message = None;
    }

    /// Transition to Errored with a human-readable message.
    ///
    /// A failed slot reports no process ids: the error may have struck
    /// before any process existed, and the ids of a half-started one are
    /// not safe to act on.
    pub fn fail(&mut self, message: String) {
        self.state = ProcessState::Errored;
        self.pid = None;
        self.pgid = None;
        self.exit_code = None;
        self.error_message = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_slot_new_starts_idle_with_no_fields() {
        let slot = ProcessSlot::new();
        assert_eq!(slot.state(), ProcessState::Idle);
        assert_eq!(slot.pid(), None);
        assert_eq!(slot.pgid(), None);
        assert_eq!(slot.exit_code(), None);
        assert_eq!(slot.error_message(), None);
        assert!(!slot.is_running());
    }

    #[test]
    fn process_slot_begin_request_enters_unconfirmed_running() {
        let mut slot = ProcessSlot::new();
        slot.begin_request();

        assert!(slot.is_running());
        assert!(!slot.is_confirmed());
        assert_eq!(slot.pid(), None);
    }

    #[test]
    fn process_slot_confirm_started_records_ids() {
        let mut slot = ProcessSlot::new();
        slot.begin_request();
        slot.confirm_started(42, Some(42));

        assert!(slot.is_confirmed());
        assert_eq!(slot.pid(), Some(42));
        assert_eq!(slot.pgid(), Some(42));
    }

    #[test]
    fn process_slot_complete_records_exit_code_only() {
        let mut slot = ProcessSlot::new();
        slot.begin_request();
        slot.confirm_started(42, None);
        slot.complete(3);

        assert_eq!(slot.state(), ProcessState::Completed);
        assert_eq!(slot.exit_code(), Some(3));
        assert_eq!(slot.error_message(), None);
        // pid survives into the terminal state; a start was observed
        assert_eq!(slot.pid(), Some(42));
    }

    #[test]
    fn process_slot_fail_records_message_only() {
        let mut slot = ProcessSlot::new();
        slot.begin_request();
        slot.fail("boom".into());

        assert_eq!(slot.state(), ProcessState::Errored);
        assert_eq!(slot.error_message(), Some("boom"));
        assert_eq!(slot.exit_code(), None);
    }

    #[test]
    fn process_slot_fail_clears_process_ids() {
        let mut slot = ProcessSlot::new();
        slot.begin_request();
        slot.confirm_started(42, Some(42));
        slot.fail("boom".into());

        assert_eq!(slot.state(), ProcessState::Errored);
        assert_eq!(slot.pid(), None);
        assert_eq!(slot.pgid(), None);
    }

    #[test]
    fn process_slot_begin_request_clears_previous_run() {
        let mut slot = ProcessSlot::new();
        slot.begin_request();
        slot.confirm_started(42, Some(42));
        slot.complete(1);

        slot.begin_request();
        assert!(slot.is_running());
        assert!(!slot.is_confirmed());
        assert_eq!(slot.pgid(), None);
        assert_eq!(slot.exit_code(), None);
        assert_eq!(slot.error_message(), None);
    }

    #[test]
    fn process_state_is_terminal_matches_terminal_states() {
        assert!(!ProcessState::Idle.is_terminal());
        assert!(!ProcessState::Running.is_terminal());
        assert!(ProcessState::Completed.is_terminal());
        assert!(ProcessState::Terminated.is_terminal());
        assert!(ProcessState::Killed.is_terminal());
        assert!(ProcessState::Errored.is_terminal());
    }
}
