use tracing::debug;

use crate::error::ProtocolError;
use crate::protocol::{self, ShellEvent};
use crate::widget::batcher::OutputBatcher;
use crate::widget::controller::LifecycleController;

/// Inbound half of the protocol.
///
/// Routes each backend event synchronously: output chunks go straight to the
/// batcher, lifecycle events go to the controller, and any notice the
/// controller produces is appended behind the output it follows. No
/// reordering or deduplication; the channel beneath delivers in emission
/// order.
pub struct EventDispatcher;

impl EventDispatcher {
    /// Dispatch one decoded event
    pub fn dispatch(
        controller: &mut LifecycleController,
        batcher: &mut OutputBatcher,
        command: &str,
        event: ShellEvent,
    ) {
        match event {
            ShellEvent::Output { data } => {
                batcher.append(data);
            }
            event => {
                if let Some(notice) = controller.apply(&event, command) {
                    batcher.append(notice);
                }
            }
        }
    }

    /// Dispatch one raw wire envelope.
    ///
    /// Unknown type tags are ignored so newer backend event kinds do not
    /// crash older frontends; malformed envelopes are an error.
    pub fn dispatch_raw(
        controller: &mut LifecycleController,
        batcher: &mut OutputBatcher,
        command: &str,
        raw: &str,
    ) -> Result<(), ProtocolError> {
        match protocol::decode_event(raw)? {
            Some(event) => Self::dispatch(controller, batcher, command, event),
            None => debug!(raw, "ignoring unknown backend event kind"),
        }
        Ok(())
    }
}
