//! Termination signals: OS listener plumbing and delivery to a foreign pid.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::runner::LifecycleHandle;

/// Termination signals recognised by the lifecycle runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TermSignal {
    /// Interrupt (SIGINT).
    Int,
    /// Quit (SIGQUIT).
    Quit,
}

impl TermSignal {
    /// Returns the Unix signal number.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        match self {
            Self::Int => 2,
            Self::Quit => 3,
        }
    }

    /// Creates a signal from a Unix signal number.
    #[must_use]
    pub const fn from_i32(sig: i32) -> Option<Self> {
        match sig {
            2 => Some(Self::Int),
            3 => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Installs SIGINT/SIGQUIT listeners and relays each delivery into `handle`.
///
/// The relay task runs until the runner side of the handle is dropped.
/// Must be called from within a tokio runtime.
#[cfg(unix)]
pub fn spawn_os_listener(handle: LifecycleHandle) -> Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut int = signal(SignalKind::interrupt())?;
    let mut quit = signal(SignalKind::quit())?;

    tokio::spawn(async move {
        loop {
            let sig = tokio::select! {
                _ = int.recv() => TermSignal::Int,
                _ = quit.recv() => TermSignal::Quit,
            };
            tracing::debug!(signal = ?sig, "termination signal received");
            if handle.notify(sig).await.is_err() {
                // Runner is gone; stop relaying.
                break;
            }
        }
    });

    Ok(())
}

/// Non-Unix fallback: Ctrl-C only.
#[cfg(not(unix))]
pub fn spawn_os_listener(handle: LifecycleHandle) -> Result<()> {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if handle.notify(TermSignal::Int).await.is_err() {
                break;
            }
        }
    });

    Ok(())
}

/// Delivers SIGINT to a foreign process.
#[cfg(unix)]
pub fn deliver_interrupt(pid: u32) -> Result<()> {
    use nix::sys::signal::{Signal as NixSignal, kill};
    use nix::unistd::Pid;

    #[allow(clippy::cast_possible_wrap)] // pids fit in i32 on Unix
    kill(Pid::from_raw(pid as i32), NixSignal::SIGINT)
        .map_err(|e| crate::error::ServiceError::signal(format!("kill({pid}, SIGINT): {e}")))?;

    tracing::debug!(pid, "interrupt delivered");
    Ok(())
}

/// Non-Unix fallback: interrupt delivery is not supported.
#[cfg(not(unix))]
pub fn deliver_interrupt(pid: u32) -> Result<()> {
    let _ = pid;
    Err(crate::error::ServiceError::signal(
        "interrupt delivery not supported on this platform",
    ))
}

/// Blocks until SIGINT or SIGQUIT is delivered to this process.
///
/// Convenience for callers that only want to park the main task until an
/// operator asks the process to exit.
#[cfg(unix)]
pub async fn wait_for_termination() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut int = signal(SignalKind::interrupt())?;
    let mut quit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = int.recv() => (),
        _ = quit.recv() => (),
    }
    Ok(())
}

/// Non-Unix fallback: waits for Ctrl-C.
#[cfg(not(unix))]
pub async fn wait_for_termination() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_numbers_match_unix() {
        assert_eq!(TermSignal::Int.as_i32(), 2);
        assert_eq!(TermSignal::Quit.as_i32(), 3);
    }

    #[test]
    fn test_signal_from_i32() {
        assert_eq!(TermSignal::from_i32(2), Some(TermSignal::Int));
        assert_eq!(TermSignal::from_i32(3), Some(TermSignal::Quit));
        assert_eq!(TermSignal::from_i32(15), None);
        assert_eq!(TermSignal::from_i32(0), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_deliver_interrupt_to_dead_pid_fails() {
        // Far beyond any real pid_max; kill must fail with ESRCH, not crash.
        let result = deliver_interrupt(0x3FFF_FFF1);
        assert!(result.is_err());
    }
}
