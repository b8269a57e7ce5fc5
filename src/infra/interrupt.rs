//! Ctrl-C handling
//!
//! The first Ctrl-C raises the interrupt flag shared with gix. The git and
//! compiler collaborators read it and fail with an interrupted error, so
//! nothing staged is moved into place. A second Ctrl-C exits at once.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::task::JoinHandle;

/// Exit status after a second Ctrl-C
const FORCED_EXIT_CODE: i32 = 130;

/// Process-wide interrupt flag
pub fn flag() -> &'static AtomicBool {
    &gix::interrupt::IS_INTERRUPTED
}

/// Watches for Ctrl-C until dropped
#[derive(Debug)]
pub struct InterruptGuard {
    task: JoinHandle<()>,
}

impl InterruptGuard {
    /// Start watching for Ctrl-C on the current runtime
    pub fn install() -> Self {
        let task = tokio::spawn(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::debug!("Cannot listen for Ctrl-C: {e}");
                return;
            }
            flag().store(true, Ordering::SeqCst);
            tracing::warn!("Interrupted, stopping after the current step (Ctrl-C again to exit now)");

            if tokio::signal::ctrl_c().await.is_ok() {
                std::process::exit(FORCED_EXIT_CODE);
            }
        });
        Self { task }
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        self.task.abort();
    }
}
