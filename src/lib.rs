// Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # sereno
//!
//! A minimal process-lifecycle harness for long-running command-line
//! programs. It turns an arbitrary work function into a background-capable
//! service with three commands:
//!
//! - `start`: fork a detached background instance and record its pid in
//!   `<name>.pid`
//! - `stop`: send SIGINT to the recorded background instance
//! - `run`: execute the work function in the foreground with graceful
//!   shutdown handling
//!
//! The core is the run/stop orchestration: on the first SIGINT/SIGQUIT the
//! registered shutdown hook runs on its own thread, racing a second signal;
//! if the second signal wins, `run` returns the distinguished
//! [`ServiceError::ForceStop`] and abandons the hook.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sereno::Service;
//!
//! #[tokio::main]
//! async fn main() -> sereno::Result<()> {
//!     Service::from_env()
//!         .on_shutdown(|| Ok(()))
//!         .run(|flags| async move {
//!             println!("interval = {}", flags.get_int("interval"));
//!             Ok(())
//!         })
//!         .await
//! }
//! ```
//!
//! This is not a supervisor or init system: one foreground work function
//! per process, no restart policy, no resource limits.

#![warn(missing_docs)]

pub mod args;
pub mod control;
pub mod error;
pub mod pidfile;
pub mod runner;
pub mod service;
pub mod signal;
#[cfg(test)]
mod tests;

pub use args::ArgMap;
pub use error::{Result, ServiceError};
pub use pidfile::PidFile;
pub use runner::{Lifecycle, LifecycleHandle, PanicHook, ShutdownHook};
pub use service::Service;
pub use signal::{TermSignal, wait_for_termination};
