// Examples are allowed to use expect/unwrap for simplicity
#![allow(clippy::expect_used, clippy::unwrap_used)]

//! Counter service example.
//!
//! ```bash
//! # Foreground, counting every 250ms; Ctrl+C once for graceful shutdown,
//! # twice to force stop.
//! cargo run --example counter -- run --interval=250
//!
//! # Background control (requires ./counter next to the cwd):
//! ./counter start --interval=250
//! ./counter stop
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use sereno::Service;

#[tokio::main]
async fn main() -> sereno::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let stopping = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stopping);

    Service::new("counter")
        .on_shutdown(move || {
            // Cancellation flag observed by the work loop below.
            stop_flag.store(true, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(300));
            Ok(())
        })
        .on_panic(|payload| {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown".to_string());
            eprintln!("counter panicked: {msg}");
        })
        .run(move |flags| async move {
            let interval = match flags.get_int("interval") {
                ms if ms > 0 => u64::try_from(ms).unwrap_or(1000),
                _ => 1000,
            };

            let mut count = 0u64;
            while !stopping.load(Ordering::SeqCst) {
                count += 1;
                println!("count: {count}");
                tokio::time::sleep(Duration::from_millis(interval)).await;
            }
            println!("final count: {count}");
            Ok(())
        })
        .await
}
