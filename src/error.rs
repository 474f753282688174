use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while constructing or spawning the backend process owner.
///
/// These are fail-fast setup errors. Once a process is running, failures are
/// reported through the protocol as `error` events instead.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("command must not be empty")]
    EmptyCommand,
    #[error("working directory does not exist: {0}")]
    MissingWorkingDirectory(PathBuf),
    #[error("failed to spawn process: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("spawned process reported no pid")]
    MissingPid,
}

/// Errors raised while decoding or encoding protocol envelopes.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("message has no type tag")]
    MissingType,
}
