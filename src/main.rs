use std::io::Write;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use moshell::backend::ProcessOwner;
use moshell::error::ShellError;
use moshell::model::SharedModel;
use moshell::widget::{ShellWidget, Surface};

/// Display refresh cadence (milliseconds); output is flushed at most once per frame
const FRAME_INTERVAL_MS: u64 = 33;

#[derive(Parser, Debug)]
#[command(
    name = "moshell",
    version,
    about = "Run a shell command through the widget protocol with frame-batched output",
    long_about = None
)]
struct Args {
    /// Command to execute via /bin/bash -c
    command: String,

    /// Directory to run the command in
    #[arg(short = 'C', long, default_value = ".")]
    working_directory: String,

    /// Theme hint forwarded to the display surface
    #[arg(long, default_value = "dark")]
    theme: String,
}

/// Append-only surface over stdout; a terminal scrolls on its own
struct StdoutSurface;

impl Surface for StdoutSurface {
    fn write(&mut self, text: &str) {
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }

    fn clear(&mut self) {}

    fn scroll_to_end(&mut self) {}
}

#[tokio::main]
async fn main() -> Result<(), ShellError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let model = SharedModel::new(args.command.clone(), args.theme.clone());
    let owner = ProcessOwner::new(args.command, args.working_directory)?;
    let (commands, mut events) = owner.spawn();
    let mut widget = ShellWidget::new(model, commands, StdoutSurface);
    widget.set_theme(&args.theme);
    widget.execute();

    let mut frames = tokio::time::interval(Duration::from_millis(FRAME_INTERVAL_MS));
    let mut interrupts = 0u32;
    loop {
        tokio::select! {
            maybe_event = events.recv() => {
                match maybe_event {
                    Some(event) => widget.handle_event(event),
                    None => break,
                }
            }
            _ = frames.tick() => {
                widget.on_frame();
                if widget.state().is_terminal() && !widget.has_pending_output() {
                    break;
                }
            }
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    // First interrupt asks politely, the second does not.
                    interrupts += 1;
                    if interrupts == 1 {
                        widget.terminate();
                    } else {
                        widget.kill();
                    }
                }
            }
        }
    }

    widget.on_frame();
    println!();

    if let Some(code) = widget.slot().exit_code()
        && code != 0
    {
        // Shell convention: signal deaths exit as 128 + signal number.
        let code = if code < 0 { 128 - code } else { code };
        std::process::exit(code.clamp(1, 255));
    }
    if widget.slot().error_message().is_some() {
        std::process::exit(1);
    }
    Ok(())
}
