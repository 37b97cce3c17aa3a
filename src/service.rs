//! Service harness: hook registration and command dispatch.

use std::any::Any;
use std::future::Future;
use std::path::Path;

use crate::args::ArgMap;
use crate::control;
use crate::error::Result;
use crate::runner::{Lifecycle, PanicHook, ShutdownHook};
use crate::signal;

/// A process-lifecycle harness for one foreground work function.
///
/// Holds the optional shutdown and panic hooks (explicit fields, so
/// independent instances never interfere) and routes the `start` / `stop` /
/// `run` commands. Not a supervisor: no restart policy, no resource limits,
/// exactly one work function per process.
///
/// # Example
///
/// ```rust,no_run
/// use sereno::Service;
///
/// #[tokio::main]
/// async fn main() -> sereno::Result<()> {
///     Service::from_env()
///         .on_shutdown(|| {
///             // flush, close connections...
///             Ok(())
///         })
///         .run(|flags| async move {
///             let port = flags.get_int("port");
///             // serve until the shutdown hook tells us to stop...
///             let _ = port;
///             Ok(())
///         })
///         .await
/// }
/// ```
pub struct Service {
    name: String,
    shutdown_hook: Option<ShutdownHook>,
    panic_hook: Option<PanicHook>,
}

impl Service {
    /// Creates a harness for the given executable base name.
    ///
    /// The name keys the pidfile and is the path (`./<name>`) used to spawn
    /// the background instance.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shutdown_hook: None,
            panic_hook: None,
        }
    }

    /// Creates a harness named after the current executable.
    #[must_use]
    pub fn from_env() -> Self {
        let argv0 = std::env::args().next().unwrap_or_default();
        let name = Path::new(&argv0)
            .file_name()
            .map_or_else(|| "service".to_string(), |f| f.to_string_lossy().into_owned());
        Self::new(name)
    }

    /// Returns the executable base name this harness is keyed by.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers the shutdown hook, replacing any previous registration.
    ///
    /// Invoked at most once per `run`, on the first termination signal; its
    /// result becomes the overall result unless a second signal forces stop.
    #[must_use]
    pub fn on_shutdown<F>(mut self, hook: F) -> Self
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        self.shutdown_hook = Some(Box::new(hook));
        self
    }

    /// Registers a fire-and-forget shutdown hook.
    #[must_use]
    pub fn on_shutdown_infallible<F>(self, hook: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_shutdown(move || {
            hook();
            Ok(())
        })
    }

    /// Registers the panic hook, replacing any previous registration.
    ///
    /// Receives the payload recovered when the work function panics.
    #[must_use]
    pub fn on_panic<F>(mut self, hook: F) -> Self
    where
        F: Fn(Box<dyn Any + Send>) + Send + Sync + 'static,
    {
        self.panic_hook = Some(Box::new(hook));
        self
    }

    /// Dispatches on the current process arguments. See [`Self::dispatch`].
    pub async fn run<W, Fut>(self, work: W) -> Result<()>
    where
        W: FnOnce(ArgMap) -> Fut,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let argv: Vec<String> = std::env::args().collect();
        self.dispatch(argv, work).await
    }

    /// Routes the first positional argument:
    ///
    /// - `start`: spawn a detached `./<name> run …` instance, forwarding the
    ///   remaining arguments, and record its pid.
    /// - `stop`: send SIGINT to the recorded background instance.
    /// - `run`: execute `work` in the foreground with signal handling; the
    ///   parsed [`ArgMap`] is passed to the work function.
    /// - anything else (or nothing): print a usage line and return `Ok(())`.
    ///   Showing usage is deliberately not an error for embedding callers.
    pub async fn dispatch<W, Fut>(self, argv: Vec<String>, work: W) -> Result<()>
    where
        W: FnOnce(ArgMap) -> Fut,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        match argv.get(1).map(String::as_str) {
            Some("start") => {
                control::start(&self.name, argv.get(2..).unwrap_or_default()).await?;
                Ok(())
            }
            Some("stop") => control::stop(&self.name),
            Some("run") => {
                let flags = ArgMap::parse(&argv);
                let (lifecycle, handle) = Lifecycle::new();
                signal::spawn_os_listener(handle)?;

                tracing::info!(service = %self.name, "running in foreground");
                lifecycle
                    .run(work(flags), self.shutdown_hook, self.panic_hook)
                    .await
            }
            _ => {
                println!("Usage: {} [start/stop/run]", self.name);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| (*s).to_string()).collect()
    }

    #[tokio::test]
    async fn test_missing_command_shows_usage_and_succeeds() {
        let result = Service::new("svc")
            .dispatch(argv(&["./svc"]), |_| async { Ok(()) })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_command_shows_usage_and_succeeds() {
        let result = Service::new("svc")
            .dispatch(argv(&["./svc", "restart"]), |_| async { Ok(()) })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_usage_path_never_calls_work() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, Ordering};

        let called = Arc::new(AtomicBool::new(false));
        let probe = Arc::clone(&called);

        Service::new("svc")
            .dispatch(argv(&["./svc", "status"]), move |_| async move {
                probe.store(true, Ordering::SeqCst);
                Ok(())
            })
            .await
            .unwrap();

        assert!(!called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_stop_without_pidfile_propagates_io_error() {
        let err = Service::new("sereno-dispatch-never-started")
            .dispatch(argv(&["./svc", "stop"]), |_| async { Ok(()) })
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::ServiceError::Io(_)));
    }

    #[tokio::test]
    async fn test_run_passes_flags_to_work() {
        let result = Service::new("svc")
            .dispatch(argv(&["./svc", "run", "--workers=3"]), |flags| async move {
                assert_eq!(flags.get_int("workers"), 3);
                Ok(())
            })
            .await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_builder_hooks_replace() {
        let svc = Service::new("svc")
            .on_shutdown(|| Ok(()))
            .on_shutdown_infallible(|| ());
        assert!(svc.shutdown_hook.is_some());
        assert_eq!(svc.name(), "svc");
    }
}
