//! Viewing contexts a packet can be shown in.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::TRACING_TARGET;

/// Shows a PDF file to the operator.
pub trait Viewer: Send + Sync {
    /// Opens the file in a new viewing context.
    fn open(&self, path: &Path) -> io::Result<()>;

    /// Shows the file in the current viewing context.
    fn navigate(&self, path: &Path) -> io::Result<()>;
}

/// Viewer backed by the platform's default opener.
///
/// `navigate` hands the file to the program named by `BROWSER`, which is how
/// terminal sessions usually expose their current viewer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemViewer;

impl SystemViewer {
    fn opener(path: &Path) -> Command {
        #[cfg(target_os = "macos")]
        {
            let mut command = Command::new("open");
            command.arg(path);
            command
        }

        #[cfg(target_os = "windows")]
        {
            let mut command = Command::new("cmd");
            command.args(["/C", "start", ""]).arg(path);
            command
        }

        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            let mut command = Command::new("xdg-open");
            command.arg(path);
            command
        }
    }

    fn run(mut command: Command) -> io::Result<()> {
        let program = command.get_program().to_string_lossy().into_owned();
        tracing::debug!(target: TRACING_TARGET, program = %program, "Launching viewer");

        let status = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;

        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!("{program} exited with {status}")))
        }
    }
}

impl Viewer for SystemViewer {
    fn open(&self, path: &Path) -> io::Result<()> {
        Self::run(Self::opener(path))
    }

    fn navigate(&self, path: &Path) -> io::Result<()> {
        let browser = std::env::var_os("BROWSER")
            .filter(|value| !value.is_empty())
            .ok_or_else(|| io::Error::new(io::ErrorKind::Unsupported, "BROWSER is not set"))?;

        let mut command = Command::new(browser);
        command.arg(path);
        Self::run(command)
    }
}
