//! Usage: Launch the system default browser for a URL.
//!
//! The browser process is spawned and never awaited, so a hung or missing
//! browser cannot block resolution of the auth session.

use std::io;
use std::process::Command;

pub(crate) fn open_browser(url: &str) -> io::Result<()> {
    #[cfg(target_os = "windows")]
    {
        build_windows_command(url).spawn()?;
        return Ok(());
    }

    #[cfg(target_os = "macos")]
    {
        Command::new("open").arg(url).spawn()?;
        return Ok(());
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        Command::new("xdg-open").arg(url).spawn()?;
        return Ok(());
    }

    #[allow(unreachable_code)]
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "browser open is unsupported on this platform",
    ))
}

#[cfg(target_os = "windows")]
fn build_windows_command(url: &str) -> Command {
    // The URL protocol handler forces the default browser; `explorer <url>`
    // may open File Explorer for some URL shapes.
    let mut cmd = Command::new("rundll32.exe");
    cmd.arg("url.dll,FileProtocolHandler").arg(url);
    cmd
}

#[cfg(all(test, target_os = "windows"))]
mod windows_tests {
    use super::build_windows_command;
    use std::ffi::OsStr;

    #[test]
    fn windows_command_uses_protocol_handler() {
        let cmd = build_windows_command("https://example.com/auth?x=1&y=2");
        let args: Vec<&OsStr> = cmd.get_args().collect();
        assert_eq!(args[0], "url.dll,FileProtocolHandler");
        assert_eq!(args[1], "https://example.com/auth?x=1&y=2");
    }
}
