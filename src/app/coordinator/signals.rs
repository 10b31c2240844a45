//! Signal handling for cooperative cancellation
//!
//! A signal never interrupts the fetch or write in progress. It only sets a
//! flag that the observer reads at the next decision point.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Shared cancellation request
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Turns CTRL-C and SIGTERM into a cancellation request
pub struct SignalHandler {
    flag: CancelFlag,
}

impl SignalHandler {
    pub fn new(flag: CancelFlag) -> Self {
        Self { flag }
    }

    /// Spawn the background task that watches for signals
    pub fn setup(&self) -> JoinHandle<()> {
        let flag = self.flag.clone();

        tokio::spawn(async move {
            let ctrl_c = async {
                if let Err(e) = signal::ctrl_c().await {
                    warn!("Failed to install Ctrl+C handler: {}", e);
                    std::future::pending::<()>().await;
                }
            };

            #[cfg(unix)]
            let terminate = async {
                match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                    Ok(mut stream) => {
                        stream.recv().await;
                    }
                    Err(e) => {
                        warn!("Failed to install SIGTERM handler: {}", e);
                        std::future::pending::<()>().await;
                    }
                }
            };

            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                _ = ctrl_c => {
                    info!("Received Ctrl+C, finishing current item before stopping");
                },
                _ = terminate => {
                    info!("Received terminate signal, finishing current item before stopping");
                },
            }

            flag.cancel();
        })
    }
}
