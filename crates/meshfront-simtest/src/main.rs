//! Meshfront Headless Simulation Harness
//!
//! Drives the simulation core through scripted skirmish scenarios with no
//! renderer attached. Runs entirely in-process.
//!
//! Usage:
//!   cargo run -p meshfront-simtest
//!   cargo run -p meshfront-simtest -- --verbose
//!   cargo run -p meshfront-simtest -- --json

use meshfront_core::{load_simulation, save_simulation, Simulation};
use meshfront_logic::constants::{
    IMPACT_DELAY, SIGNAL_DECAY_RATE, SIGNAL_MAX, TRANSIT_INTERVAL,
};
use meshfront_logic::grid::GridPos;
use meshfront_logic::kinds::{Faction, NodeKind};
use meshfront_logic::pathfinding::find_path;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;

const TICK: f32 = 0.05;

// ── Test harness ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: impl Into<String>) -> TestResult {
    TestResult {
        name: name.to_string(),
        passed,
        detail: detail.into(),
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    let json = std::env::args().any(|a| a == "--json");
    if !json {
        println!("=== Meshfront Simulation Harness ===\n");
    }

    let mut results = Vec::new();

    // 1. Node meshing and anchor reachability
    results.extend(validate_meshing());

    // 2. Spatial queries against a brute-force oracle
    results.extend(validate_spatial());

    // 3. Pathfinding sweep
    results.extend(validate_pathfinding());

    // 4. Territory integrity loop
    results.extend(validate_integrity());

    // 5. Deployment lifecycle timeline
    results.extend(validate_deployment());

    // 6. Snapshot round trip
    results.extend(validate_snapshot());

    // ── Summary ──
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&results).expect("results serialize")
        );
    } else {
        println!();
        for r in &results {
            let icon = if r.passed { "✓" } else { "✗" };
            if !r.passed || verbose {
                println!("  {} {}: {}", icon, r.name, r.detail);
            }
        }
        println!(
            "\n=== RESULT: {}/{} passed, {} failed ===",
            passed,
            results.len(),
            failed
        );
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

fn seeded_match() -> Simulation {
    let mut sim = Simulation::new(25, 16);
    sim.seed_faction(Faction::Cobalt, 0.0, 0.0, GridPos::new(0, 0))
        .expect("cobalt seed");
    sim.seed_faction(Faction::Ember, 1200.0, 760.0, GridPos::new(24, 15))
        .expect("ember seed");
    sim
}

fn run_seconds(sim: &mut Simulation, seconds: f64) {
    let steps = (seconds / TICK as f64).ceil() as usize;
    for _ in 0..steps {
        sim.update(TICK);
    }
}

// ── Scenarios ───────────────────────────────────────────────────────────

fn validate_meshing() -> Vec<TestResult> {
    let mut results = Vec::new();
    let mut sim = seeded_match();

    let mut chain = Vec::new();
    for i in 1..=6 {
        match sim.place_node(i as f32 * 100.0, 0.0, Faction::Cobalt, NodeKind::Relay) {
            Ok(e) => chain.push(e),
            Err(e) => {
                results.push(check("meshing/chain", false, format!("placement failed: {e}")));
                return results;
            }
        }
    }
    results.push(check(
        "meshing/chain",
        true,
        format!("placed {} nodes", chain.len()),
    ));

    let mut symmetric = true;
    for e in sim.graph.entities() {
        for other in sim.graph.connections(e).unwrap_or_default() {
            if !sim
                .graph
                .connections(other)
                .unwrap_or_default()
                .contains(&e)
            {
                symmetric = false;
            }
        }
    }
    results.push(check("meshing/symmetry", symmetric, "all links symmetric"));

    let tip = *chain.last().expect("chain non-empty");
    let reach = sim.graph.distance_from_anchor(tip);
    results.push(check(
        "meshing/anchor-distance",
        reach.map_or(false, |d| d.hops >= 1),
        format!("tip reachability: {reach:?}"),
    ));

    let far = sim.place_node(5000.0, 5000.0, Faction::Cobalt, NodeKind::Relay);
    results.push(check(
        "meshing/out-of-range",
        far.is_err(),
        "isolated placement rejected",
    ));
    results
}

fn validate_spatial() -> Vec<TestResult> {
    let mut rng = StdRng::seed_from_u64(7);
    let mut sim = seeded_match();

    // A random blob of connected nodes: each placed near an earlier one.
    let mut placed = vec![(0.0f32, 0.0f32)];
    for _ in 0..80 {
        let (bx, by) = placed[rng.gen_range(0..placed.len())];
        let x = bx + rng.gen_range(-100.0..100.0);
        let y = by + rng.gen_range(-100.0..100.0);
        if sim.place_node(x, y, Faction::Cobalt, NodeKind::Relay).is_ok() {
            placed.push((x, y));
        }
    }

    let mut mismatches = 0;
    for _ in 0..40 {
        let qx = rng.gen_range(-300.0..900.0);
        let qy = rng.gen_range(-300.0..900.0);
        let radius = rng.gen_range(10.0..150.0);
        let indexed = sim.graph.nodes_within(qx, qy, radius, None).len();
        let brute = sim
            .graph
            .entities()
            .iter()
            .filter(|&&e| {
                let p = sim.graph.position(e).expect("node position");
                let dx = p.x - qx;
                let dy = p.y - qy;
                dx * dx + dy * dy <= radius * radius
            })
            .count();
        if indexed != brute {
            mismatches += 1;
        }
    }
    vec![check(
        "spatial/oracle",
        mismatches == 0,
        format!("{} nodes indexed, {mismatches} query mismatches", placed.len()),
    )]
}

fn validate_pathfinding() -> Vec<TestResult> {
    let mut results = Vec::new();

    let mut optimal = true;
    for (c, r) in [(5, 3), (24, 15), (0, 7), (13, 0)] {
        let path = find_path(25, 16, GridPos::new(0, 0), GridPos::new(c, r));
        if path.map_or(true, |p| p.len() as i32 != c + r) {
            optimal = false;
        }
    }
    results.push(check(
        "pathfinding/manhattan-optimal",
        optimal,
        "open-grid paths are |c|+|r| steps",
    ));

    results.push(check(
        "pathfinding/degenerate",
        find_path(25, 16, GridPos::new(4, 4), GridPos::new(4, 4)) == Some(vec![])
            && find_path(25, 16, GridPos::new(0, 0), GridPos::new(40, 0)).is_none(),
        "same-cell empty, out-of-bounds none",
    ));
    results
}

fn validate_integrity() -> Vec<TestResult> {
    let mut results = Vec::new();
    let mut sim = seeded_match();

    // A corridor stays supplied; an island decays away.
    sim.territory.capture(GridPos::new(1, 0), Faction::Cobalt);
    sim.territory.capture(GridPos::new(2, 0), Faction::Cobalt);
    sim.territory.capture(GridPos::new(20, 8), Faction::Cobalt);

    run_seconds(&mut sim, (SIGNAL_MAX / SIGNAL_DECAY_RATE) as f64 + 1.0);

    let corridor = sim.territory.cell(GridPos::new(2, 0)).expect("cell");
    results.push(check(
        "integrity/corridor-survives",
        corridor.owner == Some(Faction::Cobalt) && corridor.signal == SIGNAL_MAX,
        format!("corridor signal {:.1}", corridor.signal),
    ));

    let island = sim.territory.cell(GridPos::new(20, 8)).expect("cell");
    results.push(check(
        "integrity/island-reverts",
        island.owner.is_none(),
        "isolated cell back to neutral",
    ));

    let anchors_held = sim.territory.cell(GridPos::new(0, 0)).expect("cell").anchor
        && sim.territory.cell(GridPos::new(24, 15)).expect("cell").anchor;
    results.push(check("integrity/anchors-held", anchors_held, "both anchors intact"));
    results
}

fn validate_deployment() -> Vec<TestResult> {
    let mut results = Vec::new();
    let mut sim = seeded_match();
    let target = GridPos::new(5, 3);

    let id = match sim.launch_deployment(target, Faction::Cobalt) {
        Ok(id) => id,
        Err(e) => {
            results.push(check("deployment/initiate", false, format!("{e}")));
            return results;
        }
    };
    let path_len = sim.deployments.get(id).expect("active").path.len();
    results.push(check(
        "deployment/initiate",
        path_len == 8,
        format!("path of {path_len} cells"),
    ));

    run_seconds(
        &mut sim,
        path_len as f64 * TRANSIT_INTERVAL + IMPACT_DELAY + 0.3,
    );
    let captured = sim.territory.cell(target).expect("cell").owner == Some(Faction::Cobalt)
        && target
            .cross_neighbors()
            .iter()
            .all(|&n| sim.territory.cell(n).expect("cell").owner == Some(Faction::Cobalt));
    results.push(check(
        "deployment/capture",
        captured && sim.deployments.active().is_empty(),
        "target and cross neighbors captured, active set drained",
    ));

    sim.cancel_deployment(id);
    results.push(check(
        "deployment/cancel-idempotent",
        sim.deployments.active().is_empty(),
        "cancel after completion is a no-op",
    ));
    results
}

fn validate_snapshot() -> Vec<TestResult> {
    let mut sim = seeded_match();
    sim.place_node(90.0, 20.0, Faction::Cobalt, NodeKind::Relay)
        .expect("placement");
    sim.launch_deployment(GridPos::new(5, 3), Faction::Cobalt)
        .expect("launch");
    run_seconds(&mut sim, 0.5);

    let mut buffer = Vec::new();
    if let Err(e) = save_simulation(&mut buffer, &sim) {
        return vec![check("snapshot/round-trip", false, format!("save: {e}"))];
    }
    match load_simulation(buffer.as_slice()) {
        Ok(loaded) => {
            let ok = loaded.graph.len() == sim.graph.len()
                && loaded.deployments.active().len() == sim.deployments.active().len()
                && loaded.sim_time() == sim.sim_time();
            vec![check(
                "snapshot/round-trip",
                ok,
                format!("{} bytes, {} nodes", buffer.len(), loaded.graph.len()),
            )]
        }
        Err(e) => vec![check("snapshot/round-trip", false, format!("load: {e}"))],
    }
}
