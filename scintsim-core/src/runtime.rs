//! The multi-worker run loop: disjoint events are scored in parallel, each
//! worker owning its own scorer for the duration of one event, and the
//! finished rows are handed to the shared ntuple writer one at a time.

use crate::collection::HitError;
use crate::event::EventScorer;
use crate::geometry::Geometry;
use crate::ntuple::{merge_event, EventRecord, NtupleError, NtupleWriter};
use crate::transport::{generate_event, BeamConfig};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, info};

/// A full run description. Deserializable from the JSON config file; every
/// field has a default so partial configs work.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Events to simulate.
    pub events: u32,
    /// Run seed; event `i` derives its own stream from this.
    pub seed: u64,
    /// Worker threads; 0 lets rayon pick.
    pub threads: usize,
    pub geometry: Geometry,
    pub beam: BeamConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            events: 100,
            seed: 12345,
            threads: 0,
            geometry: Geometry::default(),
            beam: BeamConfig::default(),
        }
    }
}

/// Aggregate figures of one completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    pub events: u32,
    /// Qualifying steps scored across all events.
    pub steps: u64,
    /// Energy deposited across all events and both layers, MeV.
    pub total_edep: f64,
}

impl RunSummary {
    fn merge(self, other: RunSummary) -> RunSummary {
        RunSummary {
            events: self.events + other.events,
            steps: self.steps + other.steps,
            total_edep: self.total_edep + other.total_edep,
        }
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Scoring(#[from] HitError),
    #[error(transparent)]
    Export(#[from] NtupleError),
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Score one event start to finish on the calling worker: generate the
/// primary and its steps, accumulate, finalize, merge.
pub fn simulate_event(config: &RunConfig, event_id: u32) -> Result<EventRecord, HitError> {
    let generated = generate_event(&config.geometry, &config.beam, config.seed, event_id);

    let mut scorer = EventScorer::new(config.geometry);
    scorer.begin_event()?;
    for (layer, step) in &generated.steps {
        scorer.process_step(*layer, step)?;
    }
    let hits = scorer.finalize()?;

    debug!(
        event_id,
        steps = hits.step_count(),
        edep = hits.total_edep(),
        "event finalized"
    );
    merge_event(&config.geometry, event_id, &generated.primary, &hits)
}

/// Run the whole simulation. Event scoring runs on the worker pool with no
/// shared mutable state; only the per-event handoff to `writer` takes the
/// mutex. Any scoring error aborts the run — there is no partial-event
/// salvage.
pub fn run_simulation(
    config: &RunConfig,
    writer: &mut dyn NtupleWriter,
) -> Result<RunSummary, RunError> {
    info!(
        events = config.events,
        seed = config.seed,
        strips_per_plane = config.geometry.strips_per_plane,
        modules = config.geometry.modules,
        "starting run"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    let shared = Mutex::new(writer);
    let summary = pool.install(|| {
        (0..config.events)
            .into_par_iter()
            .map(|event_id| -> Result<RunSummary, RunError> {
                let record = simulate_event(config, event_id)?;
                let event_summary = RunSummary {
                    events: 1,
                    steps: record.s_edep.len() as u64,
                    total_edep: record.total_edep,
                };
                // The one-time handoff of a completed event; the only
                // cross-worker synchronization point.
                let mut sink = shared.lock().unwrap_or_else(|e| e.into_inner());
                sink.fill(&record)?;
                Ok(event_summary)
            })
            .try_reduce(RunSummary::default, |a, b| Ok(a.merge(b)))
    })?;

    let mut sink = shared.lock().unwrap_or_else(|e| e.into_inner());
    sink.flush()?;

    info!(
        events = summary.events,
        steps = summary.steps,
        total_edep = summary.total_edep,
        "run complete"
    );
    Ok(summary)
}
