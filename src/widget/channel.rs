use tokio::sync::mpsc;
use tracing::debug;

use crate::protocol::ShellCommand;
use crate::widget::controller::LifecycleController;

/// One user action, constructed and consumed within a single UI turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandIntent {
    Execute,
    SendInput(String),
    Terminate,
    Kill,
}

/// Outbound half of the protocol.
///
/// Translates user intents into protocol messages, subject to the
/// controller's admission rule: intents that are invalid in the current state
/// are rejected locally without contacting the backend. The channel reads the
/// slot state but never mutates it directly; the one exception is asking the
/// controller to perform the optimistic Running transition when an execute is
/// admitted.
pub struct CommandChannel {
    tx: mpsc::UnboundedSender<ShellCommand>,
}

impl CommandChannel {
    pub fn new(tx: mpsc::UnboundedSender<ShellCommand>) -> Self {
        Self { tx }
    }

    /// Dispatch one intent. Returns whether a message was sent.
    pub fn dispatch(&self, controller: &mut LifecycleController, intent: CommandIntent) -> bool {
        let running = controller.slot().is_running();
        match intent {
            CommandIntent::Execute => {
                if running {
                    debug!("execute rejected: a process is already running");
                    return false;
                }
                // Send before transitioning: if the backend is gone the slot
                // must not be left Running with nothing to ever resolve it.
                if !self.send(ShellCommand::Execute) {
                    return false;
                }
                controller.begin_execute();
                true
            }
            CommandIntent::SendInput(text) => {
                if !running {
                    debug!("input rejected: no process is running");
                    return false;
                }
                if text.trim().is_empty() {
                    return false;
                }
                // The untrimmed text is forwarded; user-intended whitespace
                // survives into the piped stdin.
                self.send(ShellCommand::Input { data: text })
            }
            CommandIntent::Terminate => {
                if !running {
                    debug!("terminate rejected: no process is running");
                    return false;
                }
                self.send(ShellCommand::Terminate)
            }
            CommandIntent::Kill => {
                if !running {
                    debug!("kill rejected: no process is running");
                    return false;
                }
                self.send(ShellCommand::Kill)
            }
        }
    }

    // Fire-and-forget: a closed channel means the backend side is gone and
    // there is nothing useful to do with the intent.
    fn send(&self, command: ShellCommand) -> bool {
        if self.tx.send(command).is_err() {
            debug!("outbound channel closed; intent dropped");
            return false;
        }
        true
    }
}
