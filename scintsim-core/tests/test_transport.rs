//! Unit tests for the toy beam driver

use scintsim_core::tests::test_helpers::tiny_geometry;
use scintsim_core::{generate_event, BeamConfig, Geometry, PLANES_PER_MODULE};

#[test]
fn test_generated_steps_stay_inside_the_geometry() {
    let geometry = Geometry {
        strips_per_plane: 8,
        modules: 3,
    };
    let beam = BeamConfig::default();
    for event_id in 0..20 {
        let event = generate_event(&geometry, &beam, 99, event_id);
        for (_, step) in &event.steps {
            assert!(step.ancestry.rhombus < geometry.strips_per_plane);
            assert!(step.ancestry.plane < PLANES_PER_MODULE);
            assert!(step.ancestry.module < geometry.modules);
            assert!(step.edep >= 0.0);
        }
    }
}

#[test]
fn test_range_is_clamped_to_the_detector() {
    // A beam configured to cross more modules than exist must not address
    // volumes past the last module.
    let geometry = tiny_geometry();
    let beam = BeamConfig {
        range_modules: 50,
        ..BeamConfig::default()
    };
    let event = generate_event(&geometry, &beam, 1, 0);
    assert!(event.steps.iter().all(|(_, s)| s.ancestry.module == 0));
}

#[test]
fn test_same_seed_same_event() {
    let geometry = tiny_geometry();
    let beam = BeamConfig::default();
    let first = generate_event(&geometry, &beam, 42, 5);
    let second = generate_event(&geometry, &beam, 42, 5);

    assert_eq!(first.primary, second.primary);
    assert_eq!(first.steps.len(), second.steps.len());
    for ((la, a), (lb, b)) in first.steps.iter().zip(second.steps.iter()) {
        assert_eq!(la, lb);
        assert_eq!(a.ancestry, b.ancestry);
        // Bit-identical, not approximately equal.
        assert_eq!(a.edep.to_bits(), b.edep.to_bits());
        assert_eq!(a.time.to_bits(), b.time.to_bits());
        assert_eq!(a.pos, b.pos);
        assert_eq!(a.momentum, b.momentum);
    }
}

#[test]
fn test_different_events_get_different_streams() {
    let geometry = tiny_geometry();
    let beam = BeamConfig::default();
    let a = generate_event(&geometry, &beam, 42, 0);
    let b = generate_event(&geometry, &beam, 42, 1);
    assert_ne!(a.primary, b.primary);
}

#[test]
fn test_time_is_monotone_along_the_track() {
    let event = generate_event(&tiny_geometry(), &BeamConfig::default(), 7, 0);
    let times: Vec<f64> = event.steps.iter().map(|(_, s)| s.time).collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
}
