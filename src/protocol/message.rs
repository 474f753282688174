use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;

/// Outbound intent envelope (frontend -> backend)
///
/// `execute`, `terminate` and `kill` carry no payload; the command string is
/// supplied out of band through the shared model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShellCommand {
    Execute,
    Input { data: String },
    Terminate,
    Kill,
}

impl ShellCommand {
    /// Known outbound type tags
    const TAGS: [&'static str; 4] = ["execute", "input", "terminate", "kill"];
}

/// Inbound event envelope (backend -> frontend)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShellEvent {
    Started {
        pid: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pgid: Option<i32>,
    },
    Output {
        data: String,
    },
    Completed {
        returncode: i32,
    },
    Terminated,
    Killed,
    Error {
        error: String,
    },
    NotRunning,
}

impl ShellEvent {
    /// Known inbound type tags
    const TAGS: [&'static str; 7] = [
        "started",
        "output",
        "completed",
        "terminated",
        "killed",
        "error",
        "not_running",
    ];
}

/// Encode an outbound intent as a JSON envelope.
pub fn encode_command(command: &ShellCommand) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(command)?)
}

/// Encode an inbound event as a JSON envelope.
pub fn encode_event(event: &ShellEvent) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(event)?)
}

/// Decode an outbound intent envelope.
///
/// Returns `Ok(None)` for a well-formed envelope whose type tag is not a
/// known intent; newer frontends must not crash older backends.
pub fn decode_command(raw: &str) -> Result<Option<ShellCommand>, ProtocolError> {
    decode_tagged(raw, &ShellCommand::TAGS)
}

/// Decode an inbound event envelope.
///
/// Returns `Ok(None)` for a well-formed envelope whose type tag is not a
/// known event; newer backend event kinds must not crash older frontends.
pub fn decode_event(raw: &str) -> Result<Option<ShellEvent>, ProtocolError> {
    decode_tagged(raw, &ShellEvent::TAGS)
}

fn decode_tagged<T: for<'de> Deserialize<'de>>(
    raw: &str,
    known_tags: &[&str],
) -> Result<Option<T>, ProtocolError> {
    let value: Value = serde_json::from_str(raw)?;
    let tag = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::MissingType)?;
    if !known_tags.contains(&tag) {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(value)?))
}
