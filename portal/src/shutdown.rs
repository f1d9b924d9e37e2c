//! Stop signal for `brgy watch` and other long-running hosts.
//!
//! The signal is latched: a watcher that subscribes after the trigger still
//! sees it, so a Ctrl-C that lands during start-up is not lost.

use tokio::signal;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Latched stop flag shared by the signal listener and the watch loop.
pub struct ShutdownController {
    tx: watch::Sender<bool>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Request a stop. Further calls are no-ops.
    pub fn trigger(&self) {
        self.tx.send_if_modified(|stopped| !std::mem::replace(stopped, true));
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Spawn a task that triggers on SIGINT or SIGTERM.
    ///
    /// A signal whose handler cannot be installed is logged and ignored.
    pub fn listen_for_signals(self: &std::sync::Arc<Self>) -> JoinHandle<()> {
        let controller = std::sync::Arc::clone(self);
        tokio::spawn(async move {
            let ctrl_c = async {
                if let Err(e) = signal::ctrl_c().await {
                    tracing::warn!(error = %e, "cannot listen for SIGINT");
                    std::future::pending::<()>().await;
                }
            };

            #[cfg(unix)]
            let terminate = async {
                match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                    Ok(mut sigterm) => {
                        sigterm.recv().await;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "cannot listen for SIGTERM");
                        std::future::pending::<()>().await;
                    }
                }
            };

            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                _ = ctrl_c => tracing::info!("received SIGINT, stopping watch"),
                _ = terminate => tracing::info!("received SIGTERM, stopping watch"),
            }
            controller.trigger();
        })
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of a [`ShutdownController`].
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Resolve once a stop was requested, including before this call.
    /// Also resolves if the controller is dropped.
    pub async fn stopped(&mut self) {
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}
