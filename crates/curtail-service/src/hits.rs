use curtail_core::{LinkStore, ShortCode};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Detached hit-count accounting.
///
/// Resolutions enqueue the code onto an unbounded channel and return
/// immediately; a background worker applies the increments through the
/// store's native increment. Failures are logged and dropped, and the
/// counter never delays a resolution response. Because the worker owns the
/// queued hits, a caller abandoning its request after the URL has been
/// determined cannot take a pending increment down with it.
///
/// Dropping every recorder handle closes the channel; the worker drains
/// what is queued and exits.
#[derive(Debug, Clone)]
pub struct HitRecorder {
    tx: mpsc::UnboundedSender<ShortCode>,
}

impl HitRecorder {
    /// Spawns the worker task and returns the sending handle.
    pub fn spawn<S: LinkStore>(store: Arc<S>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<ShortCode>();

        tokio::spawn(async move {
            while let Some(code) = rx.recv().await {
                match store.increment_hit(&code).await {
                    Ok(()) => debug!(code = %code, "hit count incremented"),
                    Err(e) => warn!(code = %code, error = %e, "hit count update failed"),
                }
            }
            debug!("hit recorder worker stopped");
        });

        Self { tx }
    }

    /// Queues one hit for `code`. Never blocks and never fails the caller.
    pub fn record(&self, code: &ShortCode) {
        if self.tx.send(code.clone()).is_err() {
            warn!(code = %code, "hit recorder worker is gone, dropping hit");
        }
    }
}
