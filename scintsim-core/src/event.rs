//! Per-event scoring: one [`EventScorer`] owns both layers' aggregated and
//! step collections for the duration of one event, receives the per-step
//! callbacks from the transport engine, and yields the collections once at
//! event end.
//!
//! One scorer belongs to exactly one worker; steps within an event arrive
//! strictly sequentially, so the accumulation path needs no synchronization.

use crate::collection::{HitError, ScintHitCollection, StepHitCollection};
use crate::geometry::{Geometry, Layer, StripCoordinate};
use crate::hit::StepHit;
use crate::transport::TransportStep;

/// Lifecycle of one event's collections. Strictly
/// NotStarted → Accumulating → Finalized; Finalized is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Accumulating,
    Finalized,
}

impl Phase {
    fn name(self) -> &'static str {
        match self {
            Phase::NotStarted => "not started",
            Phase::Accumulating => "accumulating",
            Phase::Finalized => "finalized",
        }
    }
}

/// Both collections of one layer.
#[derive(Debug)]
pub struct LayerHits {
    pub scint: ScintHitCollection,
    pub steps: StepHitCollection,
}

/// Everything an event accumulated, handed to the merge stage at event end.
#[derive(Debug)]
pub struct EventHits {
    layers: [LayerHits; 2],
}

impl EventHits {
    pub fn layer(&self, layer: Layer) -> &LayerHits {
        &self.layers[layer.index()]
    }

    /// Qualifying steps recorded across both layers.
    pub fn step_count(&self) -> usize {
        self.layers.iter().map(|l| l.steps.len()).sum()
    }

    /// Energy deposited across both layers.
    pub fn total_edep(&self) -> f64 {
        self.layers.iter().map(|l| l.scint.total()).sum()
    }
}

#[derive(Debug)]
enum State {
    NotStarted,
    Accumulating(Box<[LayerHits; 2]>),
    Finalized,
}

impl State {
    fn phase(&self) -> Phase {
        match self {
            State::NotStarted => Phase::NotStarted,
            State::Accumulating(_) => Phase::Accumulating,
            State::Finalized => Phase::Finalized,
        }
    }
}

/// Per-event hit aggregation driver. Resolves each reported step to its
/// strip, feeds the aggregated and step collections of the struck layer, and
/// enforces the event lifecycle.
#[derive(Debug)]
pub struct EventScorer {
    geometry: Geometry,
    state: State,
}

impl EventScorer {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            state: State::NotStarted,
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Allocate fresh collections and enter Accumulating. Fatal if the
    /// previous event was not finalized.
    pub fn begin_event(&mut self) -> Result<(), HitError> {
        if let State::Accumulating(_) = self.state {
            return Err(HitError::Phase {
                operation: "begin an event",
                phase: self.state.phase().name(),
            });
        }
        let geometry = self.geometry;
        self.state = State::Accumulating(Box::new(Layer::ALL.map(|layer| LayerHits {
            scint: ScintHitCollection::new(layer, geometry),
            steps: StepHitCollection::new(),
        })));
        Ok(())
    }

    /// The per-step callback. Zero-deposit steps are a benign no-op; a
    /// qualifying step performs exactly one accumulate on the layer's strip
    /// array and appends exactly one record to the layer's step trace.
    pub fn process_step(&mut self, layer: Layer, step: &TransportStep) -> Result<(), HitError> {
        let layers = match &mut self.state {
            State::Accumulating(layers) => layers,
            other => {
                return Err(HitError::Phase {
                    operation: "process a step",
                    phase: other.phase().name(),
                })
            }
        };
        if step.edep == 0.0 {
            return Ok(());
        }

        let coord = StripCoordinate::new(
            step.ancestry.rhombus,
            step.ancestry.plane,
            step.ancestry.module,
        );
        let hits = &mut layers[layer.index()];
        hits.scint.accumulate(step.track_id, coord, step.edep)?;
        hits.steps.push(StepHit {
            track_id: step.track_id,
            scint: step.ancestry.scint,
            coord,
            time: step.time,
            edep: step.edep,
            pos: step.pos,
            momentum_dir: step.momentum_dir(),
            momentum_mag: step.momentum_mag(),
            momentum: step.momentum,
        });
        Ok(())
    }

    /// Enter Finalized and yield the collections to the merge stage. Exactly
    /// once per event; repeat calls, like post-finalize steps, are fatal.
    pub fn finalize(&mut self) -> Result<EventHits, HitError> {
        match std::mem::replace(&mut self.state, State::Finalized) {
            State::Accumulating(layers) => Ok(EventHits { layers: *layers }),
            other => {
                let phase = other.phase().name();
                self.state = other;
                Err(HitError::Phase {
                    operation: "finalize",
                    phase,
                })
            }
        }
    }
}
