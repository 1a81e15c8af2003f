use std::str::FromStr;
use std::time::Duration;

use bevy::app::{AppExit, ScheduleRunnerPlugin};
use bevy::log::LogPlugin;
use bevy::prelude::*;

use simulation::config::{DEFAULT_RNG_SEED, DEFAULT_SPEED};
use simulation::{
    CommandLog, CommandQueue, DisasterKind, EvacuationPlugin, HazardSet, NodeId, RouteState,
    SessionCommand, SessionSnapshot, SimRng, SimulationClock,
};

mod agent_mode;

/// Stop the demo run once the clock reaches this tick.
#[derive(Resource)]
struct TickLimit(u64);

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            eprintln!("{name}={raw:?} is not valid, using the default");
            default
        }),
        Err(_) => default,
    }
}

fn main() {
    let seed = env_or("EVAC_SEED", DEFAULT_RNG_SEED);

    // Headless `--agent` mode: JSON commands on stdin, snapshots on stdout.
    if std::env::args().any(|a| a == "--agent") {
        agent_mode::run_agent_mode(seed);
        return;
    }

    let speed = env_or("EVAC_SPEED", DEFAULT_SPEED);
    let max_ticks = env_or("EVAC_MAX_TICKS", 25u64);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_millis(
        10,
    ))))
    .add_plugins(LogPlugin::default())
    .insert_resource(SimRng::from_seed_u64(seed))
    .insert_resource(TickLimit(max_ticks))
    .add_plugins(EvacuationPlugin)
    .add_systems(Update, finish_demo);

    // Demo scenario: library to assembly point 4, with a
    // fire at the main crossroad and one random incident.
    {
        let mut queue = app.world_mut().resource_mut::<CommandQueue>();
        for command in [
            SessionCommand::SetSpeed(speed),
            SessionCommand::SetQuery {
                start: NodeId::from("A3"),
                end: NodeId::from("S4"),
            },
            SessionCommand::AddHazard {
                node: NodeId::from("J1"),
                kind: DisasterKind::Fire,
            },
            SessionCommand::AddRandomHazard { kind: None },
            SessionCommand::Start,
        ] {
            queue.push(command);
        }
    }

    info!(
        "Evacuation demo: seed {}, speed {}, {} ticks",
        seed, speed, max_ticks
    );
    app.run();
}

/// Print the final snapshot and exit once the tick limit is reached.
fn finish_demo(
    clock: Res<SimulationClock>,
    hazards: Res<HazardSet>,
    route: Res<RouteState>,
    log: Res<CommandLog>,
    limit: Res<TickLimit>,
    mut exit: EventWriter<AppExit>,
) {
    if clock.tick < limit.0 {
        return;
    }
    if log.rejected_count() > 0 {
        warn!("{} demo command(s) were rejected", log.rejected_count());
    }
    match SessionSnapshot::capture(&clock, &hazards, &route).to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => error!("Failed to serialize snapshot: {}", e),
    }
    exit.send(AppExit::Success);
}
