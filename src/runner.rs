//! Foreground lifecycle runner.
//!
//! Drives the state machine
//! `Starting → Running → ShuttingDown → {Stopped, ForceStopped}`:
//! the work function runs as its own task while the runner waits on the
//! first of "work finished" or "termination signal". A first signal starts
//! the shutdown hook on its own blocking thread and races it against a
//! second signal; the second signal wins with [`ServiceError::ForceStop`],
//! abandoning the in-flight hook. This two-signal protocol lets an operator
//! request graceful shutdown once, then escalate if it hangs.

use std::any::Any;
use std::future::Future;

use tokio::sync::mpsc;
use tokio::task::JoinError;

use crate::error::{Result, ServiceError};
use crate::signal::TermSignal;

/// Shutdown hook: invoked at most once, on the first termination signal.
///
/// Runs on its own short-lived blocking thread; its result becomes the
/// overall result of `run` unless a second signal arrives first.
pub type ShutdownHook = Box<dyn FnOnce() -> Result<()> + Send + 'static>;

/// Panic hook: receives the payload recovered from a panicking work task.
pub type PanicHook = Box<dyn Fn(Box<dyn Any + Send>) + Send + Sync + 'static>;

/// Event driving the runner's state machine.
enum Event {
    /// The work task finished with its own result.
    WorkDone(Result<()>),
    /// The work task panicked; payload recovered at the task boundary.
    WorkPanicked(Box<dyn Any + Send>),
    /// A termination signal arrived.
    Signal(TermSignal),
}

/// Receiving half of the lifecycle signal channel; owns the `run` loop.
pub struct Lifecycle {
    signal_rx: mpsc::Receiver<TermSignal>,
}

/// Sending half: used by the OS relay (and tests) to inject termination
/// signals into a running lifecycle.
#[derive(Clone, Debug)]
pub struct LifecycleHandle {
    signal_tx: mpsc::Sender<TermSignal>,
}

impl LifecycleHandle {
    /// Delivers a termination signal to the runner.
    ///
    /// # Errors
    /// Fails if the runner has already returned.
    pub async fn notify(&self, sig: TermSignal) -> Result<()> {
        self.signal_tx
            .send(sig)
            .await
            .map_err(|_| ServiceError::signal("lifecycle runner is gone"))
    }
}

impl Lifecycle {
    /// Creates a runner and the handle used to signal it.
    #[must_use]
    pub fn new() -> (Self, LifecycleHandle) {
        let (signal_tx, signal_rx) = mpsc::channel(16);
        (Self { signal_rx }, LifecycleHandle { signal_tx })
    }

    /// Runs `work` to completion or through the shutdown sequence.
    ///
    /// - Work finishing first returns its result verbatim; the shutdown
    ///   hook is never invoked.
    /// - A first signal with no hook registered returns `Ok(())`.
    /// - A first signal with a hook races the hook against a second signal:
    ///   hook first → the hook's result; signal first →
    ///   [`ServiceError::ForceStop`].
    /// - A panic inside `work` is recovered at the task boundary and routed
    ///   to `panic_hook` (or logged); the runner then keeps waiting for a
    ///   signal. The runner's own task is not panic-protected.
    pub async fn run<Fut>(
        mut self,
        work: Fut,
        shutdown_hook: Option<ShutdownHook>,
        panic_hook: Option<PanicHook>,
    ) -> Result<()>
    where
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let mut work = tokio::spawn(work);

        let event = tokio::select! {
            res = &mut work => join_outcome(res),
            sig = self.recv() => Event::Signal(sig),
        };

        match event {
            Event::WorkDone(result) => result,
            Event::WorkPanicked(payload) => {
                report_panic(payload, panic_hook.as_ref());
                // The work task is gone for good; only a signal can end the
                // process now, after which shutdown proceeds as usual.
                let _ = self.recv().await;
                self.shutting_down(shutdown_hook).await
            }
            Event::Signal(sig) => {
                tracing::info!(signal = ?sig, "shutting down");
                self.shutting_down(shutdown_hook).await
            }
        }
    }

    /// ShuttingDown state: race the hook against a second signal.
    async fn shutting_down(&mut self, hook: Option<ShutdownHook>) -> Result<()> {
        let Some(hook) = hook else {
            return Ok(());
        };

        let mut hook_task = tokio::task::spawn_blocking(move || hook());

        tokio::select! {
            sig = self.recv() => {
                tracing::warn!(signal = ?sig, "second signal, abandoning shutdown hook");
                Err(ServiceError::ForceStop)
            }
            res = &mut hook_task => match res {
                Ok(outcome) => outcome,
                // Only the work task is panic-protected; a hook panic is
                // fatal to the runner, same as a panic on its own thread.
                Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
                Err(_) => Err(ServiceError::shutdown("shutdown hook cancelled")),
            },
        }
    }

    /// Waits for the next termination signal.
    ///
    /// A closed channel (every handle dropped) means no signal can ever
    /// arrive; the future stays pending so the other select arm decides.
    async fn recv(&mut self) -> TermSignal {
        match self.signal_rx.recv().await {
            Some(sig) => sig,
            None => std::future::pending().await,
        }
    }
}

fn join_outcome(res: std::result::Result<Result<()>, JoinError>) -> Event {
    match res {
        Ok(result) => Event::WorkDone(result),
        Err(err) if err.is_panic() => Event::WorkPanicked(err.into_panic()),
        Err(_) => Event::WorkDone(Err(ServiceError::runtime("work task cancelled"))),
    }
}

fn report_panic(payload: Box<dyn Any + Send>, hook: Option<&PanicHook>) {
    if let Some(hook) = hook {
        hook(payload);
        return;
    }
    let msg = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "opaque panic payload".to_string());
    tracing::error!(panic = %msg, "work function panicked");
}
