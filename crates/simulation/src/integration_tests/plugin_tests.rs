use bevy::prelude::*;

use crate::clock::{tick_interval, SimulationClock};
use crate::graph::{EvacuationGraph, NodeId};
use crate::hazards::{DisasterKind, HazardSet};
use crate::route::RouteState;
use crate::session::{
    CommandLog, CommandOutcome, CommandQueue, CurrentThreat, SessionCommand, ThreatLevel,
};
use crate::test_harness::triangle_graph;
use crate::EvacuationPlugin;

fn app_with(graph: Option<EvacuationGraph>) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    if let Some(graph) = graph {
        app.insert_resource(graph);
    }
    app.add_plugins(EvacuationPlugin);
    // Startup: seed graph unless one was provided.
    app.update();
    app
}

/// Run one fixed step directly, independent of wall-clock time.
fn fixed_step(app: &mut App) {
    app.world_mut().run_schedule(FixedUpdate);
}

fn queue(app: &mut App, command: SessionCommand) {
    app.world_mut().resource_mut::<CommandQueue>().push(command);
}

#[test]
fn plugin_loads_seed_graph() {
    let app = app_with(None);
    assert_eq!(app.world().resource::<EvacuationGraph>().node_count(), 14);
    assert_eq!(app.world().resource::<SimulationClock>().tick, 0);
}

#[test]
fn plugin_keeps_host_graph() {
    let app = app_with(Some(triangle_graph()));
    assert_eq!(app.world().resource::<EvacuationGraph>().node_count(), 3);
}

#[test]
fn queued_commands_run_before_the_tick() {
    let mut app = app_with(Some(triangle_graph()));
    queue(
        &mut app,
        SessionCommand::SetQuery {
            start: NodeId::from("A"),
            end: NodeId::from("C"),
        },
    );
    queue(
        &mut app,
        SessionCommand::AddHazard {
            node: NodeId::from("B"),
            kind: DisasterKind::Flood,
        },
    );
    queue(&mut app, SessionCommand::Start);
    fixed_step(&mut app);

    let world = app.world();
    assert_eq!(world.resource::<SimulationClock>().tick, 1);
    assert!(world.resource::<HazardSet>().contains(&NodeId::from("B")));
    assert_eq!(
        world.resource::<RouteState>().path(),
        &[NodeId::from("A"), NodeId::from("C")]
    );
    assert!(world.resource::<CommandQueue>().is_empty());

    let log = world.resource::<CommandLog>();
    assert_eq!(log.len(), 3);
    assert_eq!(log.rejected_count(), 0);
    assert!(matches!(
        log.last(),
        Some((SessionCommand::Start, Ok(CommandOutcome::Started)))
    ));
}

#[test]
fn rejected_commands_are_logged() {
    let mut app = app_with(Some(triangle_graph()));
    queue(&mut app, SessionCommand::SelectNode(NodeId::from("Z")));
    fixed_step(&mut app);
    let log = app.world().resource::<CommandLog>();
    assert_eq!(log.rejected_count(), 1);
}

#[test]
fn paused_plugin_does_not_tick() {
    let mut app = app_with(None);
    for _ in 0..5 {
        fixed_step(&mut app);
    }
    assert_eq!(app.world().resource::<SimulationClock>().tick, 0);

    queue(&mut app, SessionCommand::Start);
    fixed_step(&mut app);
    fixed_step(&mut app);
    queue(&mut app, SessionCommand::Pause);
    fixed_step(&mut app);
    fixed_step(&mut app);
    assert_eq!(app.world().resource::<SimulationClock>().tick, 2);
}

#[test]
fn fixed_timestep_follows_speed() {
    let mut app = app_with(None);
    assert_eq!(
        app.world().resource::<Time<Fixed>>().timestep(),
        tick_interval(5)
    );

    app.world_mut()
        .resource_mut::<SimulationClock>()
        .set_speed(10);
    app.update();
    assert_eq!(
        app.world().resource::<Time<Fixed>>().timestep(),
        tick_interval(10)
    );
}

#[test]
fn threat_level_tracked_after_each_step() {
    let mut app = app_with(Some(triangle_graph()));
    assert_eq!(app.world().resource::<CurrentThreat>().0, ThreatLevel::Normal);

    for node in ["A", "B", "C"] {
        queue(
            &mut app,
            SessionCommand::AddHazard {
                node: NodeId::from(node),
                kind: DisasterKind::Fire,
            },
        );
    }
    // Paused: the tick chain is skipped but the threat level still follows
    // the commands applied in the same step.
    fixed_step(&mut app);
    assert_eq!(app.world().resource::<SimulationClock>().tick, 0);
    assert_eq!(app.world().resource::<CurrentThreat>().0, ThreatLevel::Warning);

    queue(&mut app, SessionCommand::Reset);
    fixed_step(&mut app);
    assert_eq!(app.world().resource::<CurrentThreat>().0, ThreatLevel::Normal);
}
