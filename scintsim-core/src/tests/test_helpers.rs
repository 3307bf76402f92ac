//! Test helper utilities for scintsim tests

use crate::ntuple::{EventRecord, NtupleError, NtupleWriter};
use crate::transport::{TransportStep, VolumeAncestry};
use crate::Geometry;
use glam::DVec3;

/// Check if two floating point values are approximately equal within tolerance
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// A tiny detector: 4 strips per plane, 1 module (25 strips per layer
/// counting the total slot).
pub fn tiny_geometry() -> Geometry {
    Geometry {
        strips_per_plane: 4,
        modules: 1,
    }
}

/// Build a synthetic transport step landing on the given strip.
pub fn synthetic_step(rhombus: u32, plane: u32, module: u32, edep: f64) -> TransportStep {
    TransportStep {
        track_id: 1,
        edep,
        ancestry: VolumeAncestry {
            scint: 0,
            rhombus,
            plane,
            module,
        },
        time: 1.25,
        pos: DVec3::new(10.0, -5.0, 300.0),
        momentum: DVec3::new(0.0, 0.0, 2500.0),
    }
}

/// Export sink that keeps every filled row in memory, for assertions.
#[derive(Debug, Default)]
pub struct CollectingWriter {
    pub records: Vec<EventRecord>,
    pub flushed: bool,
}

impl NtupleWriter for CollectingWriter {
    fn fill(&mut self, record: &EventRecord) -> Result<(), NtupleError> {
        self.records.push(record.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), NtupleError> {
        self.flushed = true;
        Ok(())
    }
}
