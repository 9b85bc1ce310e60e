//! Opening rendered images in the platform image viewer.

use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::info;

/// Command that opens a file with its default application.
fn viewer_command(path: &Path) -> Command {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(path);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}

/// Launch the system viewer for `path` without waiting for it to close.
pub fn open_in_viewer(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("Nothing to display: {} does not exist", path.display());
    }
    let mut cmd = viewer_command(path);
    let child = cmd
        .spawn()
        .with_context(|| format!("Failed to launch {:?}", cmd.get_program()))?;
    info!(path = %path.display(), pid = child.id(), "Opened image viewer");
    Ok(())
}
