//! Headless `--agent` mode: a blocking synchronous loop that reads JSON
//! requests from stdin and writes one JSON response per line to stdout.
//!
//! ## Protocol
//!
//! Requests carry a `"cmd"` discriminator:
//!
//! ```text
//! {"cmd":"execute","command":{"AddHazard":{"node":"J1","kind":"Fire"}}}
//! {"cmd":"advance","ticks":5}
//! {"cmd":"snapshot"}
//! {"cmd":"nearest_safe_zone","from":"A3"}
//! {"cmd":"quit"}
//! ```
//!
//! Every response has `"ok"`; successful responses carry the session
//! `"snapshot"` after the request, failures an `"error"` string.

use std::io::{BufRead, Write};

use serde::Deserialize;
use serde_json::{json, Value};

use simulation::{NodeId, Session, SessionCommand};

#[derive(Debug, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
enum AgentRequest {
    Execute { command: SessionCommand },
    Advance { ticks: u32 },
    Snapshot,
    NearestSafeZone { from: NodeId },
    Quit,
}

fn handle(session: &mut Session, request: AgentRequest) -> Value {
    match request {
        AgentRequest::Execute { command } => match session.execute(&command) {
            Ok(_) => json!({ "ok": true, "snapshot": session.snapshot() }),
            Err(e) => json!({ "ok": false, "error": e.to_string() }),
        },
        AgentRequest::Advance { ticks } => {
            let reports = session.advance_by(ticks);
            json!({
                "ok": true,
                "ticks_run": reports.len(),
                "reports": reports,
                "snapshot": session.snapshot(),
            })
        }
        AgentRequest::Snapshot => json!({ "ok": true, "snapshot": session.snapshot() }),
        AgentRequest::NearestSafeZone { from } => match session.nearest_safe_zone(&from) {
            Some(plan) => json!({ "ok": true, "route": plan }),
            None => json!({ "ok": false, "error": format!("No safe zone reachable from {from}") }),
        },
        AgentRequest::Quit => json!({ "ok": true }),
    }
}

pub fn run_agent_mode(seed: u64) {
    let mut session = Session::new().with_seed(seed);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    let _ = writeln!(stdout, "{}", json!({ "ok": true, "ready": true }));
    let _ = stdout.flush();
    // Log to stderr so it does not interfere with the JSON protocol on stdout.
    eprintln!("evac_planner agent mode ready (seed {seed})");

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("stdin read error: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let (response, quit) = match serde_json::from_str::<AgentRequest>(&line) {
            Ok(request) => {
                let quit = matches!(request, AgentRequest::Quit);
                (handle(&mut session, request), quit)
            }
            Err(e) => (json!({ "ok": false, "error": format!("bad request: {e}") }), false),
        };
        let _ = writeln!(stdout, "{response}");
        let _ = stdout.flush();
        if quit {
            break;
        }
    }
}
