//! Interface to the transport engine, plus a toy deterministic beam that
//! stands in for it so the scoring pipeline can run end to end.
//!
//! Real transport (energy loss, scattering, decay, field propagation) is an
//! external collaborator; the scoring core only consumes the per-step
//! payload defined here.

use crate::geometry::{Geometry, Layer, PLANES_PER_MODULE};
use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Copy numbers of the four-level physical placement a step occurred in,
/// innermost first: scintillator sheet, rhombus, plane, module. The
/// transport engine guarantees the ranges by construction of the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeAncestry {
    pub scint: u32,
    pub rhombus: u32,
    pub plane: u32,
    pub module: u32,
}

/// Everything the transport engine reports for one step, read at the
/// pre-step point.
#[derive(Debug, Clone)]
pub struct TransportStep {
    pub track_id: i32,
    /// Energy deposited in this step, MeV. Zero-deposit steps are a benign
    /// no-op for the scorer.
    pub edep: f64,
    pub ancestry: VolumeAncestry,
    /// Time since the beginning of the event, ns.
    pub time: f64,
    /// Global position, mm.
    pub pos: DVec3,
    /// Momentum vector, MeV/c.
    pub momentum: DVec3,
}

impl TransportStep {
    pub fn momentum_mag(&self) -> f64 {
        self.momentum.length()
    }

    pub fn momentum_dir(&self) -> DVec3 {
        self.momentum.normalize_or_zero()
    }
}

/// The primary particle of an event, as handed to the export row.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryVertex {
    /// PDG particle code.
    pub pdg: i32,
    /// Kinetic energy, MeV.
    pub kinetic_energy: f64,
    /// Momentum, MeV/c.
    pub momentum: DVec3,
    /// Production position, mm.
    pub position: DVec3,
}

/// Knobs of the toy beam.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamConfig {
    /// PDG code of the primary (13 = mu-).
    pub pdg: i32,
    /// Mean primary kinetic energy, MeV.
    pub energy: f64,
    /// Flat half-spread around `energy`, MeV.
    pub energy_spread: f64,
    /// Modules the primary traverses before ranging out (clamped to the
    /// geometry).
    pub range_modules: u32,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            pdg: 13,
            energy: 3000.0,
            energy_spread: 300.0,
            range_modules: 4,
        }
    }
}

/// One generated event: the primary plus the steps the toy transport
/// reported, tagged with the layer whose sensitive volume they hit.
#[derive(Debug, Clone)]
pub struct GeneratedEvent {
    pub primary: PrimaryVertex,
    pub steps: Vec<(Layer, TransportStep)>,
}

// Thickness of one plane pair along the beam axis used by the toy stepper.
const PLANE_PITCH_MM: f64 = 55.0;

fn event_rng(run_seed: u64, event_id: u32) -> StdRng {
    // Distinct, reproducible stream per event regardless of which worker
    // picks the event up.
    let seed = run_seed.wrapping_add((event_id as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15));
    StdRng::seed_from_u64(seed)
}

/// Walk a single primary straight through consecutive planes, depositing a
/// sampled energy in both scintillator layers of one rhombus per plane.
/// Occasional zero-deposit steps are emitted to exercise the no-op path.
/// Bit-identical output for identical `(run_seed, event_id)`.
pub fn generate_event(
    geometry: &Geometry,
    beam: &BeamConfig,
    run_seed: u64,
    event_id: u32,
) -> GeneratedEvent {
    let mut rng = event_rng(run_seed, event_id);

    let kinetic_energy =
        beam.energy + rng.gen_range(-beam.energy_spread..=beam.energy_spread);
    let position = DVec3::new(
        rng.gen_range(-50.0..=50.0),
        rng.gen_range(-50.0..=50.0),
        0.0,
    );
    let momentum = DVec3::new(
        rng.gen_range(-20.0..=20.0),
        rng.gen_range(-20.0..=20.0),
        kinetic_energy,
    );
    let primary = PrimaryVertex {
        pdg: beam.pdg,
        kinetic_energy,
        momentum,
        position,
    };

    let modules = beam.range_modules.min(geometry.modules);
    let entry_rhombus = rng.gen_range(0..geometry.strips_per_plane);

    let mut steps = Vec::new();
    let mut time = 0.0;
    let mut mom = momentum;
    let mut z = position.z;
    for module in 0..modules {
        for plane in 0..PLANES_PER_MODULE {
            // Small lateral drift, one rhombus at most per plane.
            let drift = rng.gen_range(0..3) as i64 - 1;
            let rhombus = (entry_rhombus as i64 + drift)
                .clamp(0, geometry.strips_per_plane as i64 - 1)
                as u32;
            let ancestry = VolumeAncestry {
                scint: 0,
                rhombus,
                plane,
                module,
            };

            z += PLANE_PITCH_MM;
            time += 0.19;
            // Energy loss per crossing; momentum shrinks with it.
            let loss = rng.gen_range(1.5..4.0);
            mom *= (1.0 - loss / mom.length().max(loss)).max(0.0);
            let pos = DVec3::new(position.x, position.y, z);

            for layer in Layer::ALL {
                let edep = if rng.gen_ratio(1, 16) {
                    // A boundary-crossing step with no deposit.
                    0.0
                } else {
                    rng.gen_range(0.4..2.2)
                };
                steps.push((
                    layer,
                    TransportStep {
                        track_id: 1,
                        edep,
                        ancestry,
                        time,
                        pos,
                        momentum: mom,
                    },
                ));
            }
        }
    }

    GeneratedEvent { primary, steps }
}
