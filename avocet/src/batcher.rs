//! Rate-limited batch execution with per-item failure isolation.

use std::time::Duration;

use avocet_core::{AvocetError, PacingConfig};
use tokio::sync::watch;
use tracing::{debug, warn};

/// One item's recorded enrichment failure.
#[derive(Debug)]
pub struct BatchFailure {
    /// Index of the failed item in the input sequence.
    pub index: usize,
    /// The error that call produced.
    pub error: AvocetError,
}

/// Final state of a batch run.
#[derive(Debug)]
pub struct BatchOutcome<P> {
    /// One slot per input item; `None` where the call failed or was never
    /// dispatched.
    pub patches: Vec<Option<P>>,
    /// Failures recorded for observability; they never abort the batch.
    pub failures: Vec<BatchFailure>,
    /// `true` when cancellation stopped dispatch before the last item.
    pub cancelled: bool,
}

impl<P> BatchOutcome<P> {
    /// Number of successfully patched items.
    #[must_use]
    pub fn patched(&self) -> usize {
        self.patches.iter().filter(|p| p.is_some()).count()
    }
}

/// Executes independent async enrichment calls under a pacing policy.
///
/// Items are dispatched in order with at least `min_call_interval`
/// between consecutive dispatches. A failed call leaves its slot
/// unpatched and the batch continues. After every `emit_every` completed
/// items, and once more when the run ends, `emit` is invoked with the
/// patches so far and the completed count; the completed count is
/// strictly increasing across invocations.
///
/// Cancellation: once the watch signal turns `true`, no further items
/// are dispatched. An in-flight call is allowed to finish and its patch
/// is kept; the partial outcome is returned, not discarded.
pub struct RateLimitedBatcher {
    pacing: PacingConfig,
}

impl RateLimitedBatcher {
    /// Build a batcher with the given pacing policy.
    #[must_use]
    pub const fn new(pacing: PacingConfig) -> Self {
        Self { pacing }
    }

    /// Run `enrich` over `items` under the pacing policy.
    pub async fn run<T, P, F, Fut, E>(
        &self,
        items: &[T],
        cancel: &watch::Receiver<bool>,
        enrich: F,
        mut emit: E,
    ) -> BatchOutcome<P>
    where
        F: Fn(usize, &T) -> Fut,
        Fut: Future<Output = Result<P, AvocetError>>,
        E: FnMut(&[Option<P>], usize, &[BatchFailure]),
    {
        let mut patches: Vec<Option<P>> = Vec::with_capacity(items.len());
        patches.resize_with(items.len(), || None);
        let mut failures = Vec::new();
        let mut cancelled = false;
        let mut completed = 0usize;
        let emit_every = self.pacing.emit_every.max(1);

        for (index, item) in items.iter().enumerate() {
            if *cancel.borrow() {
                cancelled = true;
                break;
            }
            if index > 0 {
                // Pacing sleep doubles as the cancellation checkpoint.
                if wait_or_cancel(self.pacing.min_call_interval, cancel).await {
                    cancelled = true;
                    break;
                }
            }

            match enrich(index, item).await {
                Ok(patch) => {
                    patches[index] = Some(patch);
                }
                Err(error) => {
                    warn!(index, error = %error, "enrichment call failed; item left unpatched");
                    failures.push(BatchFailure { index, error });
                }
            }
            completed += 1;

            if completed % emit_every == 0 && completed < items.len() {
                emit(&patches, completed, &failures);
            }
        }

        debug!(
            completed,
            failed = failures.len(),
            cancelled,
            "batch run finished"
        );
        emit(&patches, completed, &failures);

        BatchOutcome {
            patches,
            failures,
            cancelled,
        }
    }
}

// Sleep for `d`, returning early with `true` if the cancel signal fires.
// A dropped sender is not a cancellation; the full delay still elapses.
async fn wait_or_cancel(d: Duration, cancel: &watch::Receiver<bool>) -> bool {
    if *cancel.borrow() {
        return true;
    }
    let mut cancel = cancel.clone();
    let sleep = tokio::time::sleep(d);
    tokio::pin!(sleep);
    loop {
        tokio::select! {
            () = &mut sleep => return false,
            changed = cancel.changed() => match changed {
                Ok(()) if *cancel.borrow() => return true,
                Ok(()) => {}
                Err(_) => {
                    sleep.as_mut().await;
                    return false;
                }
            },
        }
    }
}
