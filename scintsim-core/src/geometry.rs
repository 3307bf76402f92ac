use serde::{Deserialize, Serialize};

/// Scintillator planes stacked in one iron module. Fixed by the detector
/// design; the per-plane strip count and module count are run parameters.
pub const PLANES_PER_MODULE: u32 = 6;

/// One of the two co-located scintillator sheets of a rhombus. Every rhombus
/// carries a pair of strips; their hits are scored independently and only
/// merged (parity-encoded) at event end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    A,
    B,
}

impl Layer {
    pub const ALL: [Layer; 2] = [Layer::A, Layer::B];

    /// 0 for layer A, 1 for layer B. Also the parity bit of the unified
    /// strip numbering.
    pub fn parity(self) -> u32 {
        match self {
            Layer::A => 0,
            Layer::B => 1,
        }
    }

    pub fn index(self) -> usize {
        self.parity() as usize
    }
}

/// Placement of one strip within its layer: which rhombus on which plane of
/// which module. Layer identity is carried separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StripCoordinate {
    pub rhombus: u32,
    pub plane: u32,
    pub module: u32,
}

impl StripCoordinate {
    pub fn new(rhombus: u32, plane: u32, module: u32) -> Self {
        Self {
            rhombus,
            plane,
            module,
        }
    }

    /// Unified cross-layer strip number: even ids are layer A, odd ids are
    /// layer B.
    pub fn unified_strip(&self, layer: Layer) -> u32 {
        2 * self.rhombus + layer.parity()
    }

    /// Plane number counted through the whole detector rather than within
    /// one module.
    pub fn global_plane(&self) -> u32 {
        PLANES_PER_MODULE * self.module + self.plane
    }
}

/// Detector segmentation. The flat-index formulas below are the single
/// source of truth for strip addressing; the accumulator arrays are laid out
/// with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    /// Strips (rhombi) per scintillator plane, per layer.
    pub strips_per_plane: u32,
    /// Iron/scintillator modules along the beam axis.
    pub modules: u32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            strips_per_plane: 240,
            modules: 210,
        }
    }
}

impl Geometry {
    /// Total number of strips in one layer.
    pub fn strip_count(&self) -> usize {
        (self.modules * PLANES_PER_MODULE * self.strips_per_plane) as usize
    }

    /// Dense zero-based index of a strip within its layer:
    /// `module*6*R + plane*R + rhombus` for R strips per plane.
    ///
    /// Pure and total over coordinates produced by the volume hierarchy; the
    /// caller guarantees ranges by construction of the geometry, so no
    /// validation happens here. A bad coordinate surfaces as the fatal
    /// range check when the accumulator is addressed.
    pub fn flat_index(&self, coord: StripCoordinate) -> usize {
        let r = self.strips_per_plane;
        (coord.module * PLANES_PER_MODULE * r + coord.plane * r + coord.rhombus) as usize
    }

    /// Inverse of [`flat_index`](Self::flat_index), for diagnostics and for
    /// re-deriving coordinates from accumulator slots at export time.
    pub fn coordinate(&self, flat_index: usize) -> StripCoordinate {
        let r = self.strips_per_plane as usize;
        let per_module = PLANES_PER_MODULE as usize * r;
        let module = flat_index / per_module;
        let plane = (flat_index % per_module) / r;
        let rhombus = flat_index % r;
        StripCoordinate {
            rhombus: rhombus as u32,
            plane: plane as u32,
            module: module as u32,
        }
    }
}
