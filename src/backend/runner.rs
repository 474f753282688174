use std::os::unix::process::ExitStatusExt;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use nix::errno::Errno;
use nix::sys::signal::{Signal, killpg};
use nix::unistd::Pid;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{ChildStdin, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::ShellError;
use crate::protocol::{ShellCommand, ShellEvent};

/// Chunk size for pumping child output, one chunk per `output` event
const READ_CHUNK: usize = 1024;

/// Backend process owner for one widget's process slot.
///
/// Consumes intents from the widget and emits lifecycle events back, all
/// through one ordered channel per direction. The child runs in its own
/// process group so terminate/kill reach the whole tree.
pub struct ProcessOwner {
    command: String,
    working_dir: PathBuf,
}

struct Active {
    pgid: i32,
    stdin: Option<ChildStdin>,
    task: JoinHandle<()>,
    /// Set before the terminal event is emitted, so an execute intent sent
    /// after observing that event is never rejected as a double start.
    finished: Arc<AtomicBool>,
}

impl ProcessOwner {
    /// Validate and create an owner. Fails fast on an empty command or a
    /// missing working directory rather than failing at first execute.
    pub fn new(
        command: impl Into<String>,
        working_dir: impl Into<PathBuf>,
    ) -> Result<Self, ShellError> {
        let command = command.into();
        if command.trim().is_empty() {
            return Err(ShellError::EmptyCommand);
        }
        let working_dir = working_dir.into();
        if !working_dir.is_dir() {
            return Err(ShellError::MissingWorkingDirectory(working_dir));
        }
        Ok(Self {
            command,
            working_dir,
        })
    }

    /// Start the owner task and return the widget-facing channel pair
    pub fn spawn(
        self,
    ) -> (
        mpsc::UnboundedSender<ShellCommand>,
        mpsc::UnboundedReceiver<ShellEvent>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        tokio::spawn(self.run(cmd_rx, event_tx));
        (cmd_tx, event_rx)
    }

    async fn run(
        self,
        mut commands: mpsc::UnboundedReceiver<ShellCommand>,
        events: mpsc::UnboundedSender<ShellEvent>,
    ) {
        let mut active: Option<Active> = None;
        loop {
            tokio::select! {
                maybe_cmd = commands.recv() => {
                    let Some(cmd) = maybe_cmd else { break };
                    match cmd {
                        ShellCommand::Execute => {
                            if let Some(current) = &active
                                && current.finished.load(Ordering::SeqCst)
                            {
                                active = None;
                            }
                            if active.is_some() {
                                warn!("execute while a process is active; ignoring");
                                continue;
                            }
                            match self.launch(&events) {
                                Ok(launched) => active = Some(launched),
                                Err(e) => {
                                    let _ = events.send(ShellEvent::Error {
                                        error: e.to_string(),
                                    });
                                }
                            }
                        }
                        ShellCommand::Input { data } => {
                            Self::forward_input(active.as_mut(), &data).await;
                        }
                        ShellCommand::Terminate => {
                            let _ = events.send(signal_group(
                                active.as_ref(),
                                Signal::SIGTERM,
                            ));
                        }
                        ShellCommand::Kill => {
                            let _ = events.send(signal_group(
                                active.as_ref(),
                                Signal::SIGKILL,
                            ));
                        }
                    }
                }
                _ = async {
                    if let Some(active) = active.as_mut() {
                        let _ = (&mut active.task).await;
                    }
                }, if active.is_some() => {
                    active = None;
                }
            }
        }
        // Widget detached: do not leave the process group behind.
        if let Some(active) = active.take() {
            let _ = killpg(Pid::from_raw(active.pgid), Signal::SIGKILL);
            active.task.abort();
        }
    }

    fn launch(&self, events: &mpsc::UnboundedSender<ShellEvent>) -> Result<Active, ShellError> {
        let mut child = Command::new("/bin/bash")
            .arg("-c")
            .arg(&self.command)
            .current_dir(&self.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .process_group(0)
            .spawn()?;

        let pid = child.id().ok_or(ShellError::MissingPid)? as i32;
        // process_group(0) makes the child its own group leader.
        let pgid = pid;
        let _ = events.send(ShellEvent::Started {
            pid,
            pgid: Some(pgid),
        });

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let event_tx = events.clone();
        let finished = Arc::new(AtomicBool::new(false));
        let finished_flag = Arc::clone(&finished);
        let task = tokio::spawn(async move {
            // Drain both streams to EOF before reaping, so every output
            // chunk is emitted ahead of the completed event.
            tokio::join!(pump(stdout, &event_tx), pump(stderr, &event_tx));
            let terminal = match child.wait().await {
                Ok(status) => {
                    let returncode = status
                        .code()
                        .unwrap_or_else(|| status.signal().map(|s| -s).unwrap_or(-1));
                    ShellEvent::Completed { returncode }
                }
                Err(e) => ShellEvent::Error {
                    error: e.to_string(),
                },
            };
            finished_flag.store(true, Ordering::SeqCst);
            let _ = event_tx.send(terminal);
        });

        Ok(Active {
            pgid,
            stdin,
            task,
            finished,
        })
    }

    async fn forward_input(active: Option<&mut Active>, data: &str) {
        let Some(stdin) = active.and_then(|a| a.stdin.as_mut()) else {
            debug!("input with no active process; ignoring");
            return;
        };
        let mut line = data.as_bytes().to_vec();
        line.push(b'\n');
        if let Err(e) = stdin.write_all(&line).await {
            // The process may have exited between the check and the write.
            debug!("stdin write failed: {e}");
        } else {
            let _ = stdin.flush().await;
        }
    }
}

/// Signal the active process group, mapping the outcome to a protocol event
fn signal_group(active: Option<&Active>, signal: Signal) -> ShellEvent {
    let Some(active) = active else {
        return ShellEvent::NotRunning;
    };
    let verb = match signal {
        Signal::SIGKILL => "Kill",
        _ => "Terminate",
    };
    match killpg(Pid::from_raw(active.pgid), signal) {
        Ok(()) => match signal {
            Signal::SIGKILL => ShellEvent::Killed,
            _ => ShellEvent::Terminated,
        },
        // The group died between the last reap check and the signal.
        Err(Errno::ESRCH) => ShellEvent::NotRunning,
        Err(e) => ShellEvent::Error {
            error: format!("{verb} failed: {e}"),
        },
    }
}

async fn pump(
    reader: Option<impl AsyncRead + Unpin>,
    events: &mpsc::UnboundedSender<ShellEvent>,
) {
    let Some(mut reader) = reader else { return };
    let mut buf = [0u8; READ_CHUNK];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                let data = String::from_utf8_lossy(&buf[..n]).into_owned();
                if events.send(ShellEvent::Output { data }).is_err() {
                    break;
                }
            }
            // Read errors after process exit are treated as EOF.
            Err(_) => break,
        }
    }
}
