//! skirmish — guards holding a line against hostiles arriving in waves.
//!
//! Each guard runs one brain: a sensor spots hostiles, a gated fight activity
//! approaches and strikes, a daily timeline sends guards to rest at night,
//! and the fight activity overrides the timeline.  The host owns the world:
//! it spawns hostiles on schedule, resolves strikes, and moves guard entities
//! to where their bodies went.
//!
//! ```text
//! cargo run -p skirmish -- [config.json]
//! RUST_LOG=br_brain=debug cargo run -p skirmish
//! ```

mod guard;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use br_brain::{PopulationBuilder, PopulationObserver};
use br_core::{AgentId, AgentRng, Pos, RunConfig};
use br_output::{CsvTraceWriter, TraceObserver};
use br_schedule::DeferredQueue;
use br_world::{Body, PointHost, PointWorld};

use guard::{GUARD, HOSTILE, STRUCK, guard_brain};

// ── Constants ─────────────────────────────────────────────────────────────────

const GUARD_COUNT:   u32   = 6;
const GUARD_SPACING: f64   = 8.0;
const WAVES:         u64   = 5;
const WAVE_SIZE:     usize = 3;
const OUTPUT_DIR:    &str  = "output/skirmish";

const DEFAULT_CONFIG: &str = r#"{
    "seed": 42,
    "total_ticks": 4800,
    "ticks_per_day": 1200,
    "num_threads": null,
    "snapshot_interval_ticks": 100
}"#;

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 1. Config.
    let config: RunConfig = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?
        }
        None => serde_json::from_str(DEFAULT_CONFIG)?,
    };
    config.validate()?;
    println!("=== skirmish ===");
    println!(
        "Guards: {GUARD_COUNT}  |  Ticks: {}  |  Day: {} ticks  |  Seed: {}",
        config.total_ticks, config.ticks_per_day, config.seed
    );
    println!();

    // 2. World and guards, posted along the x axis.
    let mut world = PointWorld::new();
    let mut brains = Vec::new();
    let mut bodies = Vec::new();
    for i in 0..GUARD_COUNT {
        let id = AgentId(i);
        let post = Pos::new(f64::from(i) * GUARD_SPACING, 0.0, 0.0);
        let entity = world.spawn(post, GUARD);
        brains.push(guard_brain(AgentRng::new(config.seed, id), post, config.day_cycle())?);
        bodies.push(Body::new(id, post).with_entity(entity));
    }
    let mut population = PopulationBuilder::<PointHost>::new(config.clone())
        .agents(brains, bodies)
        .build()?;

    // 3. Hostile waves, evenly spread over the run, approaching from +y.
    let mut arrivals: DeferredQueue<Pos> = DeferredQueue::new();
    let mut rng = AgentRng::from_seed(config.seed);
    let line_end = f64::from(GUARD_COUNT - 1) * GUARD_SPACING;
    for wave in 0..WAVES {
        let at = (wave + 1) * config.total_ticks / (WAVES + 1);
        for _ in 0..WAVE_SIZE {
            let x = rng.gen_range(0.0..=line_end);
            arrivals.push(at, Pos::new(x, 6.0, 0.0));
        }
    }

    // 4. Trace output.
    let writer = CsvTraceWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = TraceObserver::new(writer);

    // 5. Run, letting the world change between ticks.
    let t0 = Instant::now();
    let mut defeated = 0usize;
    let mut spawned = 0usize;
    while population.now() < config.end_tick() {
        let now = population.now();
        for pos in arrivals.drain_through(now.0) {
            let id = world.spawn(pos, HOSTILE);
            info!(tick = %now, hostile = %id, "hostile arrived");
            spawned += 1;
        }

        population.step(&world, &mut obs);

        for index in 0..population.len() {
            let Some(brain) = population.brain_mut(index) else { continue };
            if let Some(target) = brain.memory_mut().take(STRUCK) {
                if world.despawn(target).is_ok() {
                    info!(tick = %now, guard = index, hostile = %target, "hostile defeated");
                    defeated += 1;
                }
            }
        }
        for body in population.agents() {
            if let Some(entity) = body.entity {
                world.move_to(entity, body.pos)?;
            }
        }
    }
    obs.on_run_end(population.now());
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        eprintln!("trace error: {e}");
    }

    // 6. Summary.
    println!("Run complete in {:.3} s", elapsed.as_secs_f64());
    println!("  hostiles: {spawned} arrived, {defeated} defeated, {} remaining", world.entities_of_kind(HOSTILE).count());
    println!("  trace written to {OUTPUT_DIR}/");
    println!();

    println!("{:<8} {:<20} {:<28}", "Guard", "Position", "Running");
    println!("{}", "-".repeat(56));
    for (brain, body) in population.brains().iter().zip(population.agents()) {
        println!(
            "{:<8} {:<20} {:<28}",
            body.id.0,
            format!("({:.1}, {:.1})", body.pos.x, body.pos.y),
            brain.running_behaviors().join(", "),
        );
    }

    Ok(())
}
