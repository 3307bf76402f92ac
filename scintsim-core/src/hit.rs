use crate::geometry::StripCoordinate;
use glam::DVec3;

/// Accumulated energy for one strip over one event. One of these exists per
/// flat index per layer, plus one sentinel slot holding the layer total.
#[derive(Debug, Clone, Default)]
pub struct ScintHit {
    /// Track id of the last step that deposited here. Informational only.
    pub track_id: i32,
    pub coord: StripCoordinate,
    /// Cumulative energy deposit, MeV. Non-negative and monotone within an
    /// event.
    pub edep: f64,
}

impl ScintHit {
    pub fn add(&mut self, de: f64) {
        self.edep += de;
    }
}

/// One energy-depositing transport step, recorded verbatim. Immutable once
/// inserted; the per-step trace keeps every step even when several strike
/// the same strip.
#[derive(Debug, Clone)]
pub struct StepHit {
    pub track_id: i32,
    /// Innermost scintillator copy number, carried through from the volume
    /// ancestry.
    pub scint: u32,
    pub coord: StripCoordinate,
    /// Time from the beginning of the event to the pre-step point, ns.
    pub time: f64,
    /// Energy deposited in this step, MeV.
    pub edep: f64,
    /// Global position of the pre-step point, mm.
    pub pos: DVec3,
    /// Momentum direction at the pre-step point (unit vector).
    pub momentum_dir: DVec3,
    /// Momentum magnitude at the pre-step point, MeV/c.
    pub momentum_mag: f64,
    /// Momentum vector at the pre-step point, MeV/c.
    pub momentum: DVec3,
}
