//! Out-of-process control: launching a background instance and signalling
//! a previously launched one to stop.

use std::process::Stdio;

use tokio::process::Command;

use crate::error::{Result, ServiceError};
use crate::pidfile::PidFile;
use crate::signal;

/// Spawns a detached background instance of `./<name>` running the `run`
/// command, forwarding `forward` after it, and records the child pid in
/// `<name>.pid`. Returns the child pid.
///
/// The child is not awaited. If the pid cannot be recorded the error is
/// returned while the child keeps running; callers should treat a failed
/// `start` as "state unknown".
pub async fn start(name: &str, forward: &[String]) -> Result<u32> {
    let child = Command::new(format!("./{name}"))
        .arg("run")
        .args(forward)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| ServiceError::spawn(format!("failed to launch ./{name}: {e}")))?;

    let pid = child
        .id()
        .ok_or_else(|| ServiceError::spawn("child exited before a pid could be read"))?;

    PidFile::for_name(name).write(pid)?;

    tracing::info!(service = %name, pid, "background instance started");
    Ok(pid)
}

/// Reads `<name>.pid` and delivers SIGINT to the recorded process.
///
/// Guarantees only that delivery was attempted; the pidfile is never
/// removed and its liveness is not verified first.
pub fn stop(name: &str) -> Result<()> {
    let pid = PidFile::for_name(name).read()?;
    signal::deliver_interrupt(pid)?;

    tracing::info!(service = %name, pid, "interrupt sent to background instance");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_nonexistent_binary_is_spawn_error() {
        let err = start("sereno-no-such-binary", &[]).await.unwrap_err();
        assert!(matches!(err, ServiceError::Spawn(_)));
    }

    #[test]
    fn test_stop_without_pidfile_is_io_error() {
        let err = stop("sereno-never-started").unwrap_err();
        assert!(matches!(err, ServiceError::Io(_)));
    }
}
