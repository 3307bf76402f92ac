pub mod collection;
pub mod event;
pub mod geometry;
pub mod hit;
pub mod ntuple;
pub mod runtime;
pub mod transport;

pub use collection::{HitError, ScintHitCollection, StepHitCollection};
pub use event::{EventHits, EventScorer, LayerHits, Phase};
pub use geometry::{Geometry, Layer, StripCoordinate, PLANES_PER_MODULE};
pub use hit::{ScintHit, StepHit};
pub use ntuple::{merge_event, EventRecord, JsonLinesWriter, NtupleError, NtupleWriter};
pub use runtime::{run_simulation, simulate_event, RunConfig, RunError, RunSummary};
pub use transport::{
    generate_event, BeamConfig, GeneratedEvent, PrimaryVertex, TransportStep, VolumeAncestry,
};

// Test helpers module (public for integration tests)
// Always compiled - integration tests are separate crates and need access
pub mod tests;
