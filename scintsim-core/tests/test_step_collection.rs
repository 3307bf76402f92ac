//! Unit tests for the append-only step trace

use glam::DVec3;
use scintsim_core::{StepHit, StepHitCollection, StripCoordinate};

fn step_hit(rhombus: u32, time: f64, edep: f64) -> StepHit {
    let momentum = DVec3::new(5.0, 0.0, 1200.0);
    StepHit {
        track_id: 2,
        scint: 0,
        coord: StripCoordinate::new(rhombus, 0, 0),
        time,
        edep,
        pos: DVec3::new(0.0, 0.0, time * 290.0),
        momentum_dir: momentum.normalize(),
        momentum_mag: momentum.length(),
        momentum,
    }
}

#[test]
fn test_starts_empty() {
    let coll = StepHitCollection::new();
    assert!(coll.is_empty());
    assert_eq!(coll.len(), 0);
}

#[test]
fn test_one_record_per_push_no_merging() {
    let mut coll = StepHitCollection::new();
    // Three hits on the same strip stay three separate records.
    coll.push(step_hit(2, 0.1, 0.5));
    coll.push(step_hit(2, 0.2, 0.4));
    coll.push(step_hit(2, 0.3, 0.1));
    assert_eq!(coll.len(), 3);
}

#[test]
fn test_insertion_order_is_preserved() {
    let mut coll = StepHitCollection::new();
    coll.push(step_hit(3, 0.1, 0.5));
    coll.push(step_hit(0, 0.2, 0.4));
    coll.push(step_hit(1, 0.3, 0.1));

    let rhombi: Vec<u32> = coll.hits().iter().map(|h| h.coord.rhombus).collect();
    assert_eq!(rhombi, vec![3, 0, 1]);
    let times: Vec<f64> = coll.hits().iter().map(|h| h.time).collect();
    assert_eq!(times, vec![0.1, 0.2, 0.3]);
}

#[test]
fn test_records_keep_their_observables() {
    let mut coll = StepHitCollection::new();
    coll.push(step_hit(1, 0.7, 0.25));
    let hit = &coll.hits()[0];
    assert_eq!(hit.edep, 0.25);
    assert_eq!(hit.momentum_mag, hit.momentum.length());
    assert!((hit.momentum_dir.length() - 1.0).abs() < 1e-12);
}
