mod batcher;
mod channel;
mod controller;
mod dispatcher;
mod slot;
mod surface;

pub use batcher::OutputBatcher;
pub use channel::{CommandChannel, CommandIntent};
pub use controller::{Affordances, LifecycleController};
pub use dispatcher::EventDispatcher;
pub use slot::{ProcessSlot, ProcessState};
pub use surface::{Surface, TextSurface};

use tokio::sync::mpsc;

use crate::error::ProtocolError;
use crate::model::SharedModel;
use crate::protocol::{ShellCommand, ShellEvent};

/// One shell widget instance.
///
/// Owns exactly one process slot (via the controller), one output buffer
/// (via the batcher), the outbound command channel and the display surface.
/// All methods run on the single control thread; the only asynchronous wait
/// in the design is between scheduling a flush and the next `on_frame` tick.
pub struct ShellWidget<S: Surface> {
    controller: LifecycleController,
    batcher: OutputBatcher,
    channel: CommandChannel,
    surface: S,
    model: SharedModel,
}

impl<S: Surface> ShellWidget<S> {
    /// Attach a widget to its host model, outbound channel and surface
    pub fn new(model: SharedModel, tx: mpsc::UnboundedSender<ShellCommand>, surface: S) -> Self {
        Self {
            controller: LifecycleController::new(),
            batcher: OutputBatcher::new(),
            channel: CommandChannel::new(tx),
            surface,
            model,
        }
    }

    /// Request execution of the model's command.
    ///
    /// Clears the previous run's display and buffered chunks, flips the
    /// affordances via the optimistic transition, and sends the execute
    /// intent. Rejected without contacting the backend while Running.
    pub fn execute(&mut self) -> bool {
        if self.controller.slot().is_running() {
            return false;
        }
        self.surface.clear();
        self.batcher.clear();
        self.channel.dispatch(&mut self.controller, CommandIntent::Execute)
    }

    /// Forward one line of stdin to the running process
    pub fn send_input(&mut self, text: &str) -> bool {
        self.channel
            .dispatch(&mut self.controller, CommandIntent::SendInput(text.into()))
    }

    /// Ask the backend to SIGTERM the process group
    pub fn terminate(&mut self) -> bool {
        self.channel.dispatch(&mut self.controller, CommandIntent::Terminate)
    }

    /// Ask the backend to SIGKILL the process group
    pub fn kill(&mut self) -> bool {
        self.channel.dispatch(&mut self.controller, CommandIntent::Kill)
    }

    /// Handle one decoded backend event
    pub fn handle_event(&mut self, event: ShellEvent) {
        let command = self.model.command();
        EventDispatcher::dispatch(&mut self.controller, &mut self.batcher, &command, event);
    }

    /// Handle one raw wire envelope; unknown event kinds are ignored
    pub fn handle_raw(&mut self, raw: &str) -> Result<(), ProtocolError> {
        let command = self.model.command();
        EventDispatcher::dispatch_raw(&mut self.controller, &mut self.batcher, &command, raw)
    }

    /// Display-refresh tick: flush batched output in one write
    pub fn on_frame(&mut self) {
        self.batcher.flush(&mut self.surface);
    }

    /// Apply a cosmetic theme change to the surface
    pub fn set_theme(&mut self, theme: &str) {
        self.surface.set_theme(theme);
    }

    pub fn affordances(&self) -> Affordances {
        self.controller.affordances()
    }

    pub fn slot(&self) -> &ProcessSlot {
        self.controller.slot()
    }

    pub fn state(&self) -> ProcessState {
        self.controller.state()
    }

    /// Check whether output is waiting for the next frame
    pub fn has_pending_output(&self) -> bool {
        self.batcher.pending() > 0
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
