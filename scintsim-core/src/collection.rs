use crate::geometry::{Geometry, Layer, StripCoordinate};
use crate::hit::{ScintHit, StepHit};
use thiserror::Error;

/// Fatal conditions of the hit-scoring core. None of these are recoverable:
/// they indicate a geometry/indexing defect or a lifecycle misuse, and the
/// run terminates with the diagnostic.
#[derive(Debug, Error)]
pub enum HitError {
    /// An accumulate call resolved to a strip index with no accumulator.
    #[error("scint collection (layer {layer:?}): cannot access strip accumulator {index} (detector has {capacity} strips)")]
    StripIndexOutOfRange {
        layer: Layer,
        index: usize,
        capacity: usize,
    },

    /// A collection was used outside its Accumulating phase.
    #[error("event scorer: cannot {operation} while {phase}")]
    Phase {
        operation: &'static str,
        phase: &'static str,
    },

    /// Step-level ntuple columns came out with different lengths.
    #[error("ntuple merge: column {column} has {len} entries, expected {expected}")]
    ColumnMisalignment {
        column: &'static str,
        len: usize,
        expected: usize,
    },
}

/// Per-event, per-layer strip energy accumulators: one dense slot per flat
/// index plus one sentinel slot, one past the last strip, holding the layer
/// total. Direct indexing keeps the per-step path free of hashing and
/// allocation.
#[derive(Debug)]
pub struct ScintHitCollection {
    layer: Layer,
    geometry: Geometry,
    /// `strip_count() + 1` entries; the last is the total slot.
    hits: Vec<ScintHit>,
}

impl ScintHitCollection {
    /// Allocate all accumulators empty. Called once per event per layer.
    pub fn new(layer: Layer, geometry: Geometry) -> Self {
        Self {
            layer,
            geometry,
            hits: vec![ScintHit::default(); geometry.strip_count() + 1],
        }
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    /// Number of real strip slots (the sentinel slot not counted).
    pub fn strip_count(&self) -> usize {
        self.hits.len() - 1
    }

    /// Add a qualifying step's deposit to the addressed strip and to the
    /// total slot. Precondition: `edep > 0` (zero-deposit steps are filtered
    /// by the caller and never reach this).
    ///
    /// A flat index outside the allocated range means the geometry and the
    /// indexing disagree; that is corruption, not a recoverable condition.
    pub fn accumulate(
        &mut self,
        track_id: i32,
        coord: StripCoordinate,
        edep: f64,
    ) -> Result<(), HitError> {
        let index = self.geometry.flat_index(coord);
        let total_slot = self.strip_count();
        if index >= total_slot {
            return Err(HitError::StripIndexOutOfRange {
                layer: self.layer,
                index,
                capacity: total_slot,
            });
        }

        let hit = &mut self.hits[index];
        hit.track_id = track_id;
        hit.coord = coord;
        hit.add(edep);

        // The dual write that keeps the total slot equal to the sum of all
        // real slots at every point in the event.
        let total = &mut self.hits[total_slot];
        total.track_id = track_id;
        total.add(edep);

        Ok(())
    }

    /// Energy accumulated by the whole layer so far.
    pub fn total(&self) -> f64 {
        self.hits[self.strip_count()].edep
    }

    /// Read-only enumeration of the struck strips (non-zero accumulators),
    /// in flat-index order, sentinel excluded.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (usize, &ScintHit)> {
        let strips = self.strip_count();
        self.hits[..strips]
            .iter()
            .enumerate()
            .filter(|(_, hit)| hit.edep != 0.0)
    }
}

/// Per-event, per-layer trace of every depositing step, in encounter order.
/// No deduplication or merging: N qualifying steps produce exactly N
/// entries.
#[derive(Debug, Default)]
pub struct StepHitCollection {
    hits: Vec<StepHit>,
}

impl StepHitCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, hit: StepHit) {
        self.hits.push(hit);
    }

    pub fn hits(&self) -> &[StepHit] {
        &self.hits
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
