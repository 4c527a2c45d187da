//! Reveal-in-file-manager capability.
//!
//! One implementation per target OS, selected once at startup. Revealing is
//! best-effort: the file-manager process is spawned detached and its outcome
//! is ignored.

use std::path::Path;
use std::process::Command;

use log::debug;

/// Platform capability for revealing a path in the native file manager.
pub trait Reveal {
    fn reveal(&self, path: &Path);
}

/// Returns the reveal implementation for the current platform.
pub fn default_reveal() -> Box<dyn Reveal> {
    #[cfg(target_os = "macos")]
    {
        Box::new(MacosReveal)
    }

    #[cfg(target_os = "windows")]
    {
        Box::new(WindowsReveal)
    }

    #[cfg(target_os = "linux")]
    {
        Box::new(LinuxReveal)
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        Box::new(NoopReveal)
    }
}

#[cfg(target_os = "macos")]
struct MacosReveal;

#[cfg(target_os = "macos")]
impl Reveal for MacosReveal {
    fn reveal(&self, path: &Path) {
        spawn_detached(Command::new("open").arg("-R").arg(path));
    }
}

#[cfg(target_os = "windows")]
struct WindowsReveal;

#[cfg(target_os = "windows")]
impl Reveal for WindowsReveal {
    fn reveal(&self, path: &Path) {
        spawn_detached(Command::new("explorer").arg("/select,").arg(path));
    }
}

#[cfg(target_os = "linux")]
struct LinuxReveal;

#[cfg(target_os = "linux")]
impl Reveal for LinuxReveal {
    fn reveal(&self, path: &Path) {
        if command_on_path("nautilus") {
            spawn_detached(Command::new("nautilus").arg("--select").arg(path));
        } else if command_on_path("dolphin") {
            spawn_detached(Command::new("dolphin").arg("--select").arg(path));
        } else {
            let parent = path.parent().unwrap_or(path);
            spawn_detached(Command::new("xdg-open").arg(parent));
        }
    }
}

#[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
struct NoopReveal;

#[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
impl Reveal for NoopReveal {
    fn reveal(&self, _path: &Path) {}
}

/// Spawns a command detached from our stdio and forgets about it.
#[cfg(any(target_os = "macos", target_os = "windows", target_os = "linux"))]
fn spawn_detached(command: &mut Command) {
    use std::process::Stdio;

    let spawned = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    if let Err(error) = spawned {
        debug!("reveal command failed to spawn: {error}");
    }
}

/// Returns true if `name` resolves to an executable file on `PATH`.
#[cfg(any(target_os = "linux", test))]
fn command_on_path(name: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(name).is_file()))
        .unwrap_or(false)
}
