use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

fn opener_command(path: &Path) -> Command {
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

/// Open `path` in the desktop image viewer without waiting for it.
/// Returns whether a viewer was launched; a missing viewer is not an error.
pub fn show(path: &Path) -> bool {
    let spawned = opener_command(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    match spawned {
        Ok(child) => {
            debug!("Opened {:?} in viewer (pid {})", path, child.id());
            true
        }
        Err(e) => {
            warn!("Could not open {:?} in an image viewer: {}", path, e);
            false
        }
    }
}
