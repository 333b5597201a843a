// src/opener.rs
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::JoinHandle;

use crate::error::OpenError;

/// Hands a file to whatever application the desktop associates with it.
pub trait ExternalOpener: Send {
    fn open(&self, path: &Path, mime: &str) -> Result<(), OpenError>;
}

/// A program that opens a path given as its last argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launcher {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

#[cfg(target_os = "macos")]
const LAUNCHERS: &[Launcher] = &[Launcher { program: "open", args: &[] }];

#[cfg(windows)]
const LAUNCHERS: &[Launcher] = &[Launcher { program: "explorer", args: &[] }];

#[cfg(not(any(target_os = "macos", windows)))]
const LAUNCHERS: &[Launcher] = &[
    Launcher { program: "xdg-open", args: &[] },
    Launcher { program: "gio", args: &["open"] },
];

/// Uses the first launcher found on `PATH`.
#[derive(Debug, Clone)]
pub struct SystemOpener {
    launchers: Vec<Launcher>,
}

impl Default for SystemOpener {
    fn default() -> Self {
        SystemOpener { launchers: LAUNCHERS.to_vec() }
    }
}

impl SystemOpener {
    pub fn with_launchers(launchers: Vec<Launcher>) -> Self {
        SystemOpener { launchers }
    }

    fn resolve(&self) -> Option<(PathBuf, &Launcher)> {
        self.launchers
            .iter()
            .find_map(|l| which::which(l.program).ok().map(|bin| (bin, l)))
    }

    /// Starts the launcher and waits for it on a detached thread, so no
    /// zombie is left behind. The handle yields the launcher's exit status.
    fn launch(&self, path: &Path, mime: &str) -> Result<JoinHandle<io::Result<ExitStatus>>, OpenError> {
        let (bin, launcher) = self.resolve().ok_or_else(|| OpenError::NoHandler(path.to_path_buf()))?;
        log::debug!("opening {} ({}) with {}", path.display(), mime, bin.display());

        let mut child = Command::new(&bin)
            .args(launcher.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| OpenError::Launch { program: launcher.program.to_string(), source })?;

        let program = launcher.program;
        Ok(std::thread::spawn(move || {
            let status = child.wait();
            match &status {
                Ok(status) if !status.success() => log::warn!("{} exited with {}", program, status),
                Err(e) => log::warn!("waiting for {} failed: {}", program, e),
                _ => {}
            }
            status
        }))
    }
}

impl ExternalOpener for SystemOpener {
    fn open(&self, path: &Path, mime: &str) -> Result<(), OpenError> {
        self.launch(path, mime).map(|_| ())
    }
}

/// Opener for environments with no desktop integration.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpener;

impl ExternalOpener for NoOpener {
    fn open(&self, path: &Path, _mime: &str) -> Result<(), OpenError> {
        Err(OpenError::NoHandler(path.to_path_buf()))
    }
}
