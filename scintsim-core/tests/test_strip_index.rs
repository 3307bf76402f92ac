//! Unit tests for the strip flat-index bijection and the unified numbering

use scintsim_core::tests::test_helpers::tiny_geometry;
use scintsim_core::{Geometry, Layer, StripCoordinate, PLANES_PER_MODULE};

#[test]
fn test_flat_index_formula() {
    // module*6*R + plane*R + rhombus with R = 4
    let geometry = tiny_geometry();
    assert_eq!(
        geometry.flat_index(StripCoordinate::new(2, 1, 0)),
        1 * 4 + 2
    );
    assert_eq!(
        geometry.flat_index(StripCoordinate::new(0, 3, 0)),
        3 * 4
    );
    assert_eq!(geometry.flat_index(StripCoordinate::new(0, 0, 0)), 0);
}

#[test]
fn test_flat_index_spans_full_range() {
    let geometry = Geometry {
        strips_per_plane: 3,
        modules: 2,
    };
    // Last strip of the last plane of the last module maps to count-1.
    let last = StripCoordinate::new(2, PLANES_PER_MODULE - 1, 1);
    assert_eq!(geometry.flat_index(last), geometry.strip_count() - 1);
}

#[test]
fn test_flat_index_is_a_bijection() {
    let geometry = Geometry {
        strips_per_plane: 5,
        modules: 3,
    };
    let mut seen = vec![false; geometry.strip_count()];
    for module in 0..geometry.modules {
        for plane in 0..PLANES_PER_MODULE {
            for rhombus in 0..geometry.strips_per_plane {
                let coord = StripCoordinate::new(rhombus, plane, module);
                let flat = geometry.flat_index(coord);
                assert!(!seen[flat], "index {} produced twice", flat);
                seen[flat] = true;
                // Round-trip through the inverse.
                assert_eq!(geometry.coordinate(flat), coord);
            }
        }
    }
    assert!(seen.iter().all(|&hit| hit));
}

#[test]
fn test_default_geometry_size() {
    // The production detector: 240 strips/plane, 6 planes, 210 modules.
    let geometry = Geometry::default();
    assert_eq!(geometry.strip_count(), 240 * 6 * 210);
}

#[test]
fn test_unified_strip_parity_encodes_layer() {
    for rhombus in 0..8 {
        let coord = StripCoordinate::new(rhombus, 2, 1);
        assert_eq!(coord.unified_strip(Layer::A) % 2, 0);
        assert_eq!(coord.unified_strip(Layer::B) % 2, 1);
        assert_eq!(coord.unified_strip(Layer::A), 2 * rhombus);
        assert_eq!(coord.unified_strip(Layer::B), 2 * rhombus + 1);
    }
}

#[test]
fn test_global_plane_numbering() {
    let coord = StripCoordinate::new(0, 4, 3);
    assert_eq!(coord.global_plane(), 6 * 3 + 4);
}
