//! The enrichment pipeline: one discovery call, then paced per-hotspot
//! observation lookups with progressive snapshot emission.

use std::collections::HashSet;
use std::sync::Arc;

use avocet_core::stream::drop_impl;
use avocet_core::{
    AvocetConnector, AvocetError, Hotspot, HotspotId, Observation, SearchParams, haversine_km,
};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::batcher::RateLimitedBatcher;
use crate::core::{Avocet, tag_err};

/// Pipeline phase carried on each snapshot.
///
/// A discovery failure never produces a snapshot: it is the `Err` return
/// of [`Avocet::search`], since no partial result exists yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The base list straight from discovery, before any enrichment.
    BaseFetch,
    /// Enrichment in progress; some items may already carry observations.
    Enriching,
    /// Final state; the snapshot channel closes after this.
    Done,
}

/// One progressive, complete-shaped result emission.
///
/// Every snapshot of an invocation has the same length and hotspot
/// order, fixed at base fetch; `enriched` is non-decreasing across
/// successive snapshots. An item whose enrichment failed stays present
/// with its enrichment fields unset and its id listed in `failed`.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Phase this snapshot was emitted from.
    pub phase: Phase,
    /// The full hotspot list, base fields always populated.
    pub hotspots: Vec<Hotspot>,
    /// Count of items whose enrichment patch has been applied.
    pub enriched: usize,
    /// Ids of items whose enrichment permanently failed, so far.
    pub failed: Vec<HotspotId>,
}

/// Handle over a running pipeline invocation.
///
/// [`PipelineHandle::stop`] requests cooperative cancellation: no further
/// enrichment calls are dispatched, already-applied patches are kept, and
/// a final partial snapshot is still emitted. Dropping the handle also
/// aborts the task outright.
pub struct PipelineHandle {
    inner: Option<JoinHandle<()>>,
    stop_tx: Option<watch::Sender<bool>>,
}

impl std::fmt::Debug for PipelineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineHandle").finish_non_exhaustive()
    }
}

impl PipelineHandle {
    /// Request cooperative cancellation.
    pub fn stop(&self) {
        if let Some(tx) = &self.stop_tx {
            let _ = tx.send(true);
        }
    }

    /// `true` once the enrichment task has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.inner.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for PipelineHandle {
    fn drop(&mut self) {
        drop_impl(&mut self.inner, &mut self.stop_tx);
    }
}

/// Patch produced by one observations lookup.
struct ObservationsPatch {
    observations: Vec<Observation>,
    recent_species_count: u32,
    has_notable_species: bool,
}

impl ObservationsPatch {
    fn from_observations(observations: Vec<Observation>) -> Self {
        let species: HashSet<&str> = observations
            .iter()
            .map(|o| o.species_code.as_str())
            .collect();
        let has_notable_species = observations.iter().any(|o| o.is_notable);
        Self {
            recent_species_count: u32::try_from(species.len()).unwrap_or(u32::MAX),
            has_notable_species,
            observations,
        }
    }

    fn apply(&self, hotspot: &mut Hotspot) {
        hotspot.observations = self.observations.clone();
        hotspot.recent_species_count = Some(self.recent_species_count);
        hotspot.has_notable_species = Some(self.has_notable_species);
    }
}

fn snapshot_from(
    phase: Phase,
    base: &[Hotspot],
    patches: &[Option<ObservationsPatch>],
    failed_indices: &[usize],
) -> Snapshot {
    let mut hotspots = base.to_vec();
    let mut enriched = 0;
    for (h, patch) in hotspots.iter_mut().zip(patches) {
        if let Some(p) = patch {
            p.apply(h);
            enriched += 1;
        }
    }
    let failed = failed_indices.iter().map(|&i| base[i].id.clone()).collect();
    Snapshot {
        phase,
        hotspots,
        enriched,
        failed,
    }
}

impl Avocet {
    /// Run a hotspot search: one discovery call, then paced observation
    /// enrichment with progressive snapshots.
    ///
    /// The returned receiver yields an immediate [`Phase::BaseFetch`]
    /// snapshot, intermediate [`Phase::Enriching`] snapshots per the
    /// pacing policy, and a final [`Phase::Done`] snapshot, after which
    /// the channel closes. Intermediate snapshots may be skipped when the
    /// consumer lags; the base and final snapshots are always delivered.
    /// Hotspot identity and order are fixed at base fetch; sorting is the
    /// caller's explicit step over a `Done` snapshot (see
    /// [`crate::sort::sorted`]).
    ///
    /// # Errors
    /// - `InvalidArg` for out-of-range search parameters.
    /// - `Unsupported` when no observations-capable connector is
    ///   registered.
    /// - `Discovery` when the base discovery call fails; nothing runs
    ///   after that.
    pub async fn search(
        &self,
        params: SearchParams,
    ) -> Result<(PipelineHandle, mpsc::Receiver<Snapshot>), AvocetError> {
        params.validate()?;
        let obs_conn: Arc<dyn AvocetConnector> = self
            .connectors
            .iter()
            .find(|c| c.as_observations_provider().is_some())
            .cloned()
            .ok_or_else(|| AvocetError::unsupported("observations"))?;

        let (disc_name, disc) = self.discovery()?;
        let mut base = Self::provider_call_with_timeout(
            disc_name,
            "discovery",
            self.cfg.call_timeout,
            disc.nearby_hotspots(params.origin, params.radius_km, params.back_days),
        )
        .await
        .map_err(|e| AvocetError::discovery(tag_err(disc_name, e)))?;

        for h in &mut base {
            h.origin_distance_km = haversine_km(params.origin, h.location);
        }
        base.truncate(params.max_results);
        debug!(count = base.len(), "discovery returned base hotspot list");

        let (stop_tx, stop_rx) = watch::channel(false);
        let (tx, rx) = mpsc::channel::<Snapshot>(32);

        // The base snapshot is the first thing the consumer sees; the
        // channel is empty here so this cannot fail on capacity.
        let _ = tx.try_send(snapshot_from(Phase::BaseFetch, &base, &[], &[]));

        let pacing = self.cfg.pacing;
        let call_timeout = self.cfg.call_timeout;
        let back_days = params.back_days;

        let join = tokio::spawn(async move {
            let batcher = RateLimitedBatcher::new(pacing);
            let conn_name = obs_conn.name();

            let enrich = |_index: usize, hotspot: &Hotspot| {
                let id = hotspot.id.clone();
                let conn = &obs_conn;
                async move {
                    let provider = conn
                        .as_observations_provider()
                        .ok_or_else(|| AvocetError::unsupported("observations"))?;
                    let observations = Self::provider_call_with_timeout(
                        conn_name,
                        "observations",
                        call_timeout,
                        provider.recent_observations(&id, back_days),
                    )
                    .await?;
                    Ok(ObservationsPatch::from_observations(observations))
                }
            };

            let emit = |patches: &[Option<ObservationsPatch>],
                        _completed: usize,
                        failures: &[crate::batcher::BatchFailure]| {
                let failed: Vec<usize> = failures.iter().map(|f| f.index).collect();
                // Skip rather than stall when the consumer lags; the
                // final snapshot below is sent with backpressure.
                let _ = tx.try_send(snapshot_from(Phase::Enriching, &base, patches, &failed));
            };

            let outcome = batcher.run(&base, &stop_rx, enrich, emit).await;

            let failed: Vec<usize> = outcome.failures.iter().map(|f| f.index).collect();
            let _ = tx
                .send(snapshot_from(
                    Phase::Done,
                    &base,
                    &outcome.patches,
                    &failed,
                ))
                .await;
        });

        Ok((
            PipelineHandle {
                inner: Some(join),
                stop_tx: Some(stop_tx),
            },
            rx,
        ))
    }
}
