//! Event merge and export: both layers' collections are folded into one
//! [`EventRecord`] row with a single cross-layer strip numbering, then
//! handed to the export sink.
//!
//! The unified numbering encodes the layer in the parity bit: layer A
//! contributes `2*rhombus`, layer B `2*rhombus + 1`. Plane and module
//! indices pass through unchanged; a detector-wide plane id
//! `6*module + plane` is derived alongside.

use crate::collection::HitError;
use crate::event::EventHits;
use crate::geometry::{Geometry, Layer};
use crate::transport::PrimaryVertex;
use serde::{Deserialize, Serialize};
use std::io::Write;
use thiserror::Error;

/// One exported event: scalar columns for the primary, parallel columns for
/// the struck strips, and parallel columns for the per-step trace
/// (`s_`-prefixed). All step-level columns always have equal length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_id: u32,
    pub primary_pdg: i32,
    /// Primary kinetic energy, MeV.
    pub primary_energy: f64,
    pub primary_mom_x: f64,
    pub primary_mom_y: f64,
    pub primary_mom_z: f64,
    pub primary_pos_x: f64,
    pub primary_pos_y: f64,
    pub primary_pos_z: f64,
    /// Energy deposited in both scintillator layers together, MeV.
    pub total_edep: f64,

    // Aggregated per-strip columns: one entry per struck strip, layer A's
    // strips first, then layer B's.
    pub strip_no: Vec<u32>,
    pub plane_no: Vec<u32>,
    pub plane_no_global: Vec<u32>,
    pub module_no: Vec<u32>,
    pub edep: Vec<f64>,

    // Step-level columns: one entry per qualifying step, layer A first.
    pub s_strip_no: Vec<u32>,
    pub s_plane_no: Vec<u32>,
    pub s_plane_no_global: Vec<u32>,
    pub s_module_no: Vec<u32>,
    pub s_edep: Vec<f64>,
    pub s_pos_x: Vec<f64>,
    pub s_pos_y: Vec<f64>,
    pub s_pos_z: Vec<f64>,
    pub s_mom_mag: Vec<f64>,
    pub s_mom_x: Vec<f64>,
    pub s_mom_y: Vec<f64>,
    pub s_mom_z: Vec<f64>,
    pub s_time: Vec<f64>,
}

impl EventRecord {
    /// Verify that every step-level column has exactly `expected` entries.
    /// A mismatch means the merge produced a corrupt row.
    fn check_step_columns(&self, expected: usize) -> Result<(), HitError> {
        let columns: [(&'static str, usize); 13] = [
            ("s_strip_no", self.s_strip_no.len()),
            ("s_plane_no", self.s_plane_no.len()),
            ("s_plane_no_global", self.s_plane_no_global.len()),
            ("s_module_no", self.s_module_no.len()),
            ("s_edep", self.s_edep.len()),
            ("s_pos_x", self.s_pos_x.len()),
            ("s_pos_y", self.s_pos_y.len()),
            ("s_pos_z", self.s_pos_z.len()),
            ("s_mom_mag", self.s_mom_mag.len()),
            ("s_mom_x", self.s_mom_x.len()),
            ("s_mom_y", self.s_mom_y.len()),
            ("s_mom_z", self.s_mom_z.len()),
            ("s_time", self.s_time.len()),
        ];
        for (column, len) in columns {
            if len != expected {
                return Err(HitError::ColumnMisalignment {
                    column,
                    len,
                    expected,
                });
            }
        }
        Ok(())
    }
}

/// Fold a finalized event into one export row.
///
/// Reads the collections once, applies the parity re-encoding, and sums the
/// two layers' total slots. Borrowed data is not retained past this call.
pub fn merge_event(
    geometry: &Geometry,
    event_id: u32,
    primary: &PrimaryVertex,
    hits: &EventHits,
) -> Result<EventRecord, HitError> {
    let mut record = EventRecord {
        event_id,
        primary_pdg: primary.pdg,
        primary_energy: primary.kinetic_energy,
        primary_mom_x: primary.momentum.x,
        primary_mom_y: primary.momentum.y,
        primary_mom_z: primary.momentum.z,
        primary_pos_x: primary.position.x,
        primary_pos_y: primary.position.y,
        primary_pos_z: primary.position.z,
        total_edep: hits.total_edep(),
        ..EventRecord::default()
    };

    for layer in Layer::ALL {
        let layer_hits = hits.layer(layer);

        for (flat_index, hit) in layer_hits.scint.iter_nonzero() {
            let coord = geometry.coordinate(flat_index);
            record.strip_no.push(coord.unified_strip(layer));
            record.plane_no.push(coord.plane);
            record.plane_no_global.push(coord.global_plane());
            record.module_no.push(coord.module);
            record.edep.push(hit.edep);
        }

        for step in layer_hits.steps.hits() {
            record.s_strip_no.push(step.coord.unified_strip(layer));
            record.s_plane_no.push(step.coord.plane);
            record.s_plane_no_global.push(step.coord.global_plane());
            record.s_module_no.push(step.coord.module);
            record.s_edep.push(step.edep);
            record.s_pos_x.push(step.pos.x);
            record.s_pos_y.push(step.pos.y);
            record.s_pos_z.push(step.pos.z);
            record.s_mom_mag.push(step.momentum_mag);
            record.s_mom_x.push(step.momentum.x);
            record.s_mom_y.push(step.momentum.y);
            record.s_mom_z.push(step.momentum.z);
            record.s_time.push(step.time);
        }
    }

    record.check_step_columns(hits.step_count())?;
    Ok(record)
}

/// Export-sink failures (I/O or encoding).
#[derive(Debug, Error)]
pub enum NtupleError {
    #[error("ntuple write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("ntuple encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The export collaborator seam. One `fill` per completed event; the writer
/// is the only resource shared across workers, so callers serialize access
/// around it.
pub trait NtupleWriter: Send {
    fn fill(&mut self, record: &EventRecord) -> Result<(), NtupleError>;

    fn flush(&mut self) -> Result<(), NtupleError> {
        Ok(())
    }
}

/// JSON-Lines sink: one row object per line.
#[derive(Debug)]
pub struct JsonLinesWriter<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> JsonLinesWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> NtupleWriter for JsonLinesWriter<W> {
    fn fill(&mut self, record: &EventRecord) -> Result<(), NtupleError> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), NtupleError> {
        self.out.flush()?;
        Ok(())
    }
}
