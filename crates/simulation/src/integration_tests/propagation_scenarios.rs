use std::collections::HashSet;

use crate::config::MAX_SPEED;
use crate::hazards::DisasterKind;
use crate::test_harness::{line_graph, TestSession};

fn outbreak(seed: u64) -> TestSession {
    TestSession::new()
        .with_seed(seed)
        .with_speed(MAX_SPEED)
        .with_query("A2", "S3")
        .with_hazard("J1", DisasterKind::Fire)
        .with_hazard("S2", DisasterKind::Flood)
        .running()
}

#[test]
fn seeded_sessions_evolve_identically() {
    let mut a = outbreak(77);
    let mut b = outbreak(77);
    for _ in 0..10 {
        assert_eq!(a.tick(25), b.tick(25));
        assert_eq!(a.session().snapshot(), b.session().snapshot());
    }
}

#[test]
fn tick_report_lists_exactly_the_new_hazards() {
    let mut t = outbreak(5);
    for _ in 0..300 {
        let before: HashSet<_> = t
            .session()
            .current_hazards()
            .into_iter()
            .map(|h| h.node)
            .collect();
        let report = t.tick(1).pop().expect("running");
        let hazards = t.session().current_hazards();

        let added: HashSet<_> = hazards
            .iter()
            .filter(|h| !before.contains(&h.node))
            .map(|h| h.node.clone())
            .collect();
        let reported: HashSet<_> = report.spread.iter().cloned().collect();
        assert_eq!(added, reported, "tick {}", report.tick);
        assert_eq!(reported.len(), report.spread.len(), "no node spread twice");

        for h in hazards.iter().filter(|h| added.contains(&h.node)) {
            assert_eq!(h.created_at, report.tick);
        }
    }
}

#[test]
fn hazard_invariants_hold_over_long_run() {
    let mut t = outbreak(123);
    t.tick(1_000);
    let tick = t.tick_count();
    let hazards = t.session().current_hazards();

    let nodes: HashSet<_> = hazards.iter().map(|h| &h.node).collect();
    assert_eq!(nodes.len(), hazards.len(), "one hazard per node");
    for h in &hazards {
        assert!(h.intensity > 0.0 && h.intensity <= 1.0, "{h:?}");
        assert!(h.created_at <= tick);
        assert!(t.session().graph().contains(&h.node));
    }
    assert!(hazards.len() <= t.session().graph().node_count());
}

#[test]
fn spread_kind_is_inherited() {
    let mut t = TestSession::with_graph(line_graph(6))
        .with_seed(8)
        .with_speed(MAX_SPEED)
        .with_hazard("N0", DisasterKind::Earthquake)
        .running();
    t.tick(2_000);
    assert!(t
        .session()
        .current_hazards()
        .iter()
        .all(|h| h.kind == DisasterKind::Earthquake));
}

#[test]
fn invalidated_route_is_replaced_within_the_tick() {
    let mut t = outbreak(99);
    for _ in 0..500 {
        let report = t.tick(1).pop().expect("running");
        if report.path_invalidated {
            let session = t.session();
            let hazards = session.hazards();
            let route = session.current_route().expect("seed graph is connected");
            let fresh = crate::pathfinding_sys::plan_route(
                session.graph(),
                hazards,
                &"A2".into(),
                &"S3".into(),
            )
            .expect("seed graph is connected");
            assert_eq!(route, &fresh, "tick {}", report.tick);
        }
    }
}
