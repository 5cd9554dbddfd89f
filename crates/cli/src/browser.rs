//! Opening URLs and files with the platform's default handler.

use std::io;
use std::process::Command;

/// Something that can show a URL or file to the user.
pub trait Launcher {
    fn open(&self, target: &str) -> io::Result<()>;
}

/// Hands targets to `open`, `xdg-open` or `start` depending on the platform.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl Launcher for SystemBrowser {
    fn open(&self, target: &str) -> io::Result<()> {
        let status = opener(target).status()?;
        if status.success() { Ok(()) } else { Err(io::Error::other(format!("opener exited with {status}"))) }
    }
}

/// Launcher that does nothing, for `--no-browser`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBrowser;

impl Launcher for NoBrowser {
    fn open(&self, _target: &str) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn opener(target: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(target);
    cmd
}

#[cfg(windows)]
fn opener(target: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", target]);
    cmd
}

#[cfg(not(any(target_os = "macos", windows)))]
fn opener(target: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(target);
    cmd
}
