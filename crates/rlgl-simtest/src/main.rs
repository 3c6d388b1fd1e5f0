//! RLGL Headless Match Harness
//!
//! Drives the round controller and the arena simulation in-process and
//! checks the gameplay rules end to end. No renderer, no input devices.
//!
//! Usage:
//!   cargo run -p rlgl-simtest
//!   cargo run -p rlgl-simtest -- --verbose
//!   cargo run -p rlgl-simtest -- --seed 42 --level data/arena.json --config game.json

use std::cell::Cell;
use std::rc::Rc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rlgl_core::prelude::*;
use rlgl_logic::config::ConfigError;
use rlgl_logic::impact::{self, ImpactContext};
use rlgl_logic::spawn;
use rlgl_logic::stamina::{StaminaPhase, StaminaRegulator, StaminaTick};

// ── Default arena (same JSON the benches use) ───────────────────────────
const ARENA_JSON: &str = include_str!("../../../data/arena.json");

const FRAME: f32 = 1.0 / 60.0;
const DEFAULT_SEED: u64 = 0x5eed;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Options {
    verbose: bool,
    seed: u64,
    config: GameConfig,
    layout: LevelLayout,
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1).cloned())
}

fn parse_options() -> Result<Options, ConfigError> {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");

    let seed = match arg_value(&args, "--seed") {
        Some(s) => s
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("--seed expects an integer, got '{}'", s)))?,
        None => DEFAULT_SEED,
    };

    let mut config = match arg_value(&args, "--config") {
        Some(path) => {
            log::info!("Loading config from {}", path);
            GameConfig::load(path)?
        }
        None => GameConfig::default(),
    };
    config.seed = Some(seed);

    let layout = match arg_value(&args, "--level") {
        Some(path) => {
            log::info!("Loading level from {}", path);
            LevelLayout::load(path)?
        }
        None => LevelLayout::from_json(ARENA_JSON)?,
    };

    Ok(Options {
        verbose,
        seed,
        config,
        layout,
    })
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    let default = if verbose { "info" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .try_init();

    println!("=== RLGL Match Harness ===\n");

    let opts = match parse_options() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };

    let mut results = Vec::new();

    // 1. Config and level data
    results.extend(validate_data(&opts));

    // 2. Stamina regulator sweep
    results.extend(validate_stamina(&opts));

    // 3. Spawn assignment coverage
    results.extend(validate_spawn_assignment(&opts));

    // 4. Impact classification table
    results.extend(validate_impact_table(&opts));

    // 5. Round lifecycle on the arena
    results.extend(validate_round_lifecycle(&opts));

    // 6. Scripted match
    results.extend(validate_scripted_match(&opts));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || opts.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed (seed {}) ===",
        passed, total, failed, opts.seed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn new_engine(opts: &Options) -> MatchEngine {
    let mut engine = MatchEngine::new(opts.config.clone(), opts.layout.clone());
    engine.begin_round();
    engine
}

// ── 1. Config & Level ───────────────────────────────────────────────────

fn validate_data(opts: &Options) -> Vec<TestResult> {
    println!("--- Config & Level ---");
    let mut results = Vec::new();

    let valid = opts.config.validate();
    results.push(TestResult {
        name: "config_valid".into(),
        passed: valid.is_ok(),
        detail: match valid {
            Ok(()) => "all tunables in range".into(),
            Err(e) => e.to_string(),
        },
    });

    let points = opts.layout.spawn_points.len();
    results.push(TestResult {
        name: "level_has_spawn_points".into(),
        passed: points >= 2,
        detail: format!("{} spawn points in '{}'", points, opts.layout.name),
    });

    // No spawn point may sit inside scenery, or its participant never appears
    let arena = ArenaWorld::new(opts.layout.clone(), opts.config.clone());
    let radius = opts.config.human.radius.max(opts.config.computer.radius);
    let buried: Vec<_> = opts
        .layout
        .spawn_points
        .iter()
        .filter(|sp| arena.is_blocked(sp.position, radius))
        .map(|sp| sp.name.as_str())
        .collect();
    results.push(TestResult {
        name: "level_spawns_clear_of_scenery".into(),
        passed: buried.is_empty(),
        detail: if buried.is_empty() {
            "every spawn point is clear".into()
        } else {
            format!("blocked: {}", buried.join(", "))
        },
    });

    // Two participants on neighbouring points must not overlap
    let mut crowded = 0;
    for (i, a) in opts.layout.spawn_points.iter().enumerate() {
        for b in opts.layout.spawn_points.iter().skip(i + 1) {
            if a.position.distance(&b.position) < radius * 2.0 {
                crowded += 1;
            }
        }
    }
    results.push(TestResult {
        name: "level_spawns_spaced".into(),
        passed: crowded == 0,
        detail: format!("{} overlapping spawn pairs", crowded),
    });

    if opts.verbose {
        if let Ok(json) = serde_json::to_string_pretty(&opts.config) {
            println!("  Effective config:\n{}", json);
        }
    }

    results
}

// ── 2. Stamina Regulator ────────────────────────────────────────────────

fn validate_stamina(opts: &Options) -> Vec<TestResult> {
    println!("--- Stamina Regulator ---");
    let mut results = Vec::new();
    let cfg = opts.config.stamina;

    // Full sprint drains in max / depletion_rate seconds
    let mut s = StaminaRegulator::new(&cfg);
    s.start_depleting();
    let mut elapsed = 0.0;
    let mut first_exhausted = None;
    while elapsed < cfg.max / cfg.depletion_rate + 1.0 {
        elapsed += FRAME;
        if s.tick(FRAME, opts.config.movement.sprint_speed) == StaminaTick::Exhausted
            && first_exhausted.is_none()
        {
            first_exhausted = Some(elapsed);
        }
    }
    let expected = cfg.max / cfg.depletion_rate;
    results.push(TestResult {
        name: "stamina_drain_time".into(),
        passed: first_exhausted.is_some_and(|t| (t - expected).abs() < 2.0 * FRAME),
        detail: format!(
            "exhausted after {:.2}s (expected {:.2}s)",
            first_exhausted.unwrap_or(f32::NAN),
            expected
        ),
    });
    results.push(TestResult {
        name: "stamina_clamped_at_zero".into(),
        passed: s.current() == 0.0,
        detail: format!("current={}", s.current()),
    });

    // Standing still never drains, whatever the phase
    let mut still = StaminaRegulator::new(&cfg).with_current(cfg.max * 0.5);
    still.start_depleting();
    for _ in 0..600 {
        still.tick(FRAME, 0.0);
    }
    results.push(TestResult {
        name: "stamina_still_no_drain".into(),
        passed: (still.current() - cfg.max * 0.5).abs() < 1e-4,
        detail: format!("{:.3} after 10s motionless", still.current()),
    });

    // Release: cooldown for regen_delay, then regeneration
    s.stop_depleting();
    let mut cooldown_frames = 0;
    while s.phase() == StaminaPhase::Cooldown && cooldown_frames < 10_000 {
        s.tick(FRAME, 0.0);
        cooldown_frames += 1;
    }
    let cooldown = cooldown_frames as f32 * FRAME;
    results.push(TestResult {
        name: "stamina_regen_delay".into(),
        passed: (cooldown - cfg.regen_delay).abs() < 2.0 * FRAME,
        detail: format!(
            "regen resumed after {:.2}s (delay {:.2}s)",
            cooldown, cfg.regen_delay
        ),
    });

    let mut refill_frames = 0;
    while s.current() < s.max() && refill_frames < 100_000 {
        s.tick(FRAME, 0.0);
        refill_frames += 1;
    }
    let refill = refill_frames as f32 * FRAME;
    let expected_refill = cfg.max / cfg.regen_rate;
    results.push(TestResult {
        name: "stamina_refill_time".into(),
        passed: (refill - expected_refill).abs() < 2.0 * FRAME,
        detail: format!("full after {:.2}s (expected {:.2}s)", refill, expected_refill),
    });

    // Pressing again during cooldown cancels the pending regen
    let mut again = StaminaRegulator::new(&cfg).with_current(cfg.max * 0.5);
    again.start_depleting();
    again.stop_depleting();
    again.tick(cfg.regen_delay * 0.5, 0.0);
    again.start_depleting();
    again.tick(cfg.regen_delay, 0.0);
    results.push(TestResult {
        name: "stamina_restart_cancels_regen".into(),
        passed: again.phase() == StaminaPhase::Depleting,
        detail: format!("phase={:?}", again.phase()),
    });

    results
}

// ── 3. Spawn Assignment ─────────────────────────────────────────────────

fn validate_spawn_assignment(opts: &Options) -> Vec<TestResult> {
    println!("--- Spawn Assignment ---");
    let mut results = Vec::new();
    let mut rng = ChaCha8Rng::seed_from_u64(opts.seed);

    let count = opts.layout.spawn_points.len().max(2);
    let draws = 10_000;
    let mut histogram = vec![0u32; count];
    let mut malformed = 0;

    for _ in 0..draws {
        let Some(a) = spawn::assign(count, &mut rng) else {
            malformed += 1;
            continue;
        };
        histogram[a.human] += 1;
        let ascending = a.computers.windows(2).all(|w| w[0] < w[1]);
        if a.computers.len() != count - 1 || a.computers.contains(&a.human) || !ascending {
            malformed += 1;
        }
    }

    results.push(TestResult {
        name: "spawn_partition".into(),
        passed: malformed == 0,
        detail: format!("{} malformed assignments out of {}", malformed, draws),
    });

    let expected = draws as f32 / count as f32;
    let worst = histogram
        .iter()
        .map(|&n| (n as f32 - expected).abs() / expected)
        .fold(0.0f32, f32::max);
    results.push(TestResult {
        name: "spawn_uniform".into(),
        passed: histogram.iter().all(|&n| n > 0) && worst < 0.2,
        detail: format!("worst deviation {:.1}% over {} points", worst * 100.0, count),
    });

    results.push(TestResult {
        name: "spawn_empty_registry".into(),
        passed: spawn::assign(0, &mut rng).is_none() && spawn::pick(&[], &mut rng).is_none(),
        detail: "no assignment without points".into(),
    });

    let single = spawn::assign(1, &mut rng);
    results.push(TestResult {
        name: "spawn_single_point".into(),
        passed: single
            .as_ref()
            .is_some_and(|a| a.human == 0 && a.computers.is_empty()),
        detail: format!("{:?}", single),
    });

    if opts.verbose {
        println!("  Human spawn histogram: {:?}", histogram);
    }

    results
}

// ── 4. Impact Classification ────────────────────────────────────────────

fn validate_impact_table(_opts: &Options) -> Vec<TestResult> {
    println!("--- Impact Classification ---");
    let mut results = Vec::new();
    let point = Vec3::new(1.0, 2.0, 3.0);

    let mut mismatches = Vec::new();
    for bits in 0..16u8 {
        let ctx = ImpactContext {
            partner_valid: bits & 1 != 0,
            surface_simulating: bits & 2 != 0,
            partner_is_human: bits & 4 != 0,
            partner_root_static: bits & 8 != 0,
            impact_point: point,
        };
        let expected = if !ctx.partner_valid {
            ImpactOutcome::Ignore
        } else if ctx.surface_simulating && ctx.partner_is_human {
            ImpactOutcome::Reload
        } else if ctx.surface_simulating {
            ImpactOutcome::Cosmetic { point }
        } else if ctx.partner_root_static {
            ImpactOutcome::DestroyProjectile
        } else {
            ImpactOutcome::Ignore
        };
        let got = impact::classify(&ctx);
        if got != expected {
            mismatches.push(format!("{:04b}: {:?} != {:?}", bits, got, expected));
        }
    }

    results.push(TestResult {
        name: "impact_table".into(),
        passed: mismatches.is_empty(),
        detail: if mismatches.is_empty() {
            "16/16 contexts classified".into()
        } else {
            mismatches.join("; ")
        },
    });

    results
}

// ── 5. Round Lifecycle ──────────────────────────────────────────────────

fn validate_round_lifecycle(opts: &Options) -> Vec<TestResult> {
    println!("--- Round Lifecycle ---");
    let mut results = Vec::new();
    let points = opts.layout.spawn_points.len();

    let mut engine = new_engine(opts);
    results.push(TestResult {
        name: "round_begin_population".into(),
        passed: engine.is_round_active()
            && engine.human_count() == 1
            && engine.computer_count() == points.saturating_sub(1),
        detail: format!(
            "{} human, {} computers on {} points",
            engine.human_count(),
            engine.computer_count(),
            points
        ),
    });

    // Same seed, same start
    let twin = new_engine(opts);
    let same = engine.human().and_then(|h| engine.location(h))
        == twin.human().and_then(|h| twin.location(h));
    results.push(TestResult {
        name: "round_seed_deterministic".into(),
        passed: same,
        detail: format!("seed {} reproduces the human's spawn", opts.seed),
    });

    let notified = Rc::new(Cell::new(0u32));
    let n = notified.clone();
    let listener = engine.subscribe_reset(move || n.set(n.get() + 1));

    let human = engine.human();
    let mut counts = Vec::new();
    for _ in 0..2 {
        engine.reset();
        counts.push(engine.computer_count());
    }
    results.push(TestResult {
        name: "round_reset_keeps_human".into(),
        passed: human.is_some() && engine.human() == human && engine.human_count() == 1,
        detail: format!("human {:?} after two resets", engine.human()),
    });
    results.push(TestResult {
        name: "round_reset_stable".into(),
        passed: counts.iter().all(|&c| c == points.saturating_sub(1)),
        detail: format!("computers after each reset: {:?}", counts),
    });
    results.push(TestResult {
        name: "round_reset_notifies".into(),
        passed: notified.get() == 2 && engine.round().rounds_survived == 2,
        detail: format!(
            "{} notifications, {} rounds survived",
            notified.get(),
            engine.round().rounds_survived
        ),
    });

    engine.unsubscribe_reset(listener);
    engine.reset();
    results.push(TestResult {
        name: "round_unsubscribe".into(),
        passed: notified.get() == 2,
        detail: format!("{} notifications after unsubscribing", notified.get()),
    });

    engine.reload();
    results.push(TestResult {
        name: "round_reload_fresh".into(),
        passed: engine.is_round_active()
            && engine.round().rounds_survived == 0
            && engine.human_count() == 1
            && engine.stats().reloads == 1,
        detail: format!("stats after reload: {:?}", engine.stats()),
    });

    results
}

// ── 6. Scripted Match ───────────────────────────────────────────────────

fn run_frames(engine: &mut MatchEngine, seconds: f32) -> FrameReport {
    let mut total = FrameReport::default();
    let frames = (seconds / FRAME).ceil() as usize;
    for _ in 0..frames {
        let report = engine.update(FRAME);
        total.exhausted.extend(report.exhausted);
        total.impacts.extend(report.impacts);
        total.expired_projectiles += report.expired_projectiles;
        total.reloaded |= report.reloaded;
    }
    total
}

fn shoot_down_at(engine: &mut MatchEngine, target: Vec3) -> FrameReport {
    engine.spawn_projectile(target + Vec3::new(0.0, 400.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
    run_frames(engine, 0.25)
}

fn validate_scripted_match(opts: &Options) -> Vec<TestResult> {
    println!("--- Scripted Match ---");
    let mut results = Vec::new();
    let mut engine = new_engine(opts);

    // Sprint until the stamina runs out
    engine.start_exertion();
    let budget = opts.config.stamina.max / opts.config.stamina.depletion_rate + 1.0;
    let mut exhausted = false;
    let frames = (budget / FRAME).ceil() as usize;
    for _ in 0..frames {
        engine.move_forward(1.0);
        exhausted |= !engine.update(FRAME).exhausted.is_empty();
    }
    let sprinting = engine
        .human_locomotion()
        .map(|l| l.is_sprinting())
        .unwrap_or(true);
    results.push(TestResult {
        name: "match_sprint_exhaustion".into(),
        passed: exhausted && !sprinting,
        detail: format!(
            "exhausted={} sprinting={} stamina={:?}",
            exhausted,
            sprinting,
            engine.human_stamina().map(|s| s.current())
        ),
    });

    engine.stop_exertion();
    run_frames(&mut engine, opts.config.stamina.regen_delay + 1.0);
    let recovering = engine
        .human_stamina()
        .is_some_and(|s| s.is_regenerating() && s.current() > 0.0);
    results.push(TestResult {
        name: "match_stamina_recovers".into(),
        passed: recovering,
        detail: format!("stamina={:?}", engine.human_stamina().map(|s| s.current())),
    });

    // A computer takes the hit: effect only
    let computer_at = engine.computers().first().and_then(|&c| engine.location(c));
    match computer_at {
        Some(at) => {
            let report = shoot_down_at(&mut engine, at);
            let effects = engine.drain_effects();
            results.push(TestResult {
                name: "match_hit_computer".into(),
                passed: matches!(report.impacts.as_slice(), [ImpactOutcome::Cosmetic { .. }])
                    && effects.len() == 1
                    && !report.reloaded,
                detail: format!("{:?}, {} effects", report.impacts, effects.len()),
            });
        }
        None => results.push(TestResult {
            name: "match_hit_computer".into(),
            passed: false,
            detail: "no computer to shoot".into(),
        }),
    }

    // Scenery swallows the projectile
    let wall = opts
        .layout
        .obstacles
        .iter()
        .find(|o| o.tags.is_empty())
        .map(|o| o.center);
    if let Some(center) = wall {
        let origin = center - Vec3::new(0.0, 400.0, 0.0);
        let p = engine.spawn_projectile(origin, Vec3::new(0.0, 1.0, 0.0));
        let report = run_frames(&mut engine, 0.25);
        results.push(TestResult {
            name: "match_hit_scenery".into(),
            passed: report.impacts.contains(&ImpactOutcome::DestroyProjectile)
                && !engine.arena().contains(p),
            detail: format!(
                "{:?}, {} projectiles left",
                report.impacts,
                engine.projectile_count()
            ),
        });
    }

    // The human takes the hit: the world reloads
    let reloads = engine.stats().reloads;
    let human_at = engine.human().and_then(|h| engine.location(h));
    if let Some(at) = human_at {
        let report = shoot_down_at(&mut engine, at);
        results.push(TestResult {
            name: "match_hit_human".into(),
            passed: report.reloaded
                && engine.stats().reloads == reloads + 1
                && engine.is_round_active()
                && engine.projectile_count() == 0,
            detail: format!("{:?}, reloads={}", report.impacts, engine.stats().reloads),
        });
    }

    // Stray projectiles time out
    engine.spawn_projectile(Vec3::new(0.0, 0.0, 5000.0), Vec3::new(0.0, 0.0, 1.0));
    let report = run_frames(&mut engine, opts.config.projectile.lifespan + 0.5);
    results.push(TestResult {
        name: "match_projectile_lifespan".into(),
        passed: report.expired_projectiles == 1 && engine.projectile_count() == 0,
        detail: format!("{} expired", report.expired_projectiles),
    });

    if opts.verbose {
        println!(
            "  Simulated {:.1}s over {} frames, stats {:?}",
            engine.sim_time(),
            engine.frames(),
            engine.stats()
        );
    }

    results
}
