//! bulwark-run: headless scenario runner for the BULWARK coordinator.
//!
//! Usage:
//!   bulwark-run run --scenario saturation --seed 7 --config policy.json
//!   bulwark-run run --scenario skirmish --uncoordinated --ticks 1800

use std::process;

use bulwark_core::config::CoordinationConfig;
use bulwark_core::enums::ScenarioId;
use bulwark_sim::{SimConfig, SimulationEngine};
use tracing::{info, warn};

/// Ten simulated minutes at the default tick rate.
const DEFAULT_MAX_TICKS: u64 = 18_000;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

fn print_usage() {
    eprintln!(
        "bulwark-run: BULWARK engagement coordination runner\n\
         \n\
         Commands:\n\
         \n\
         run       Run a scenario headless and print the final stats as JSON\n\
         \n\
           --scenario <name>  skirmish | saturation | high-value-raid (default: skirmish)\n\
           --seed <N>         RNG seed (default: 42)\n\
           --config <path>    Coordination policy JSON (optional, partial allowed)\n\
           --ticks <N>        Tick limit (default: 18000)\n\
           --uncoordinated    Nearest-capable-unit allocation instead of scoring\n\
         \n\
         Logging: RUST_LOG sets the filter (default: info), LOG_FORMAT=json for JSON lines.\n"
    );
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(args[i + 1].as_str());
        }
    }
    None
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn parse_scenario(name: &str) -> Option<ScenarioId> {
    match name {
        "skirmish" => Some(ScenarioId::Skirmish),
        "saturation" => Some(ScenarioId::Saturation),
        "high-value-raid" | "hvr" => Some(ScenarioId::HighValueRaid),
        _ => None,
    }
}

fn parse_number<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    match flag_value(args, flag) {
        Some(raw) => match raw.parse::<T>() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("Error: {flag} expects a number, got {raw:?}");
                process::exit(1);
            }
        },
        None => default,
    }
}

fn load_policy(args: &[String]) -> CoordinationConfig {
    let Some(path) = flag_value(args, "--config") else {
        return CoordinationConfig::default();
    };
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: cannot read {path}: {e}");
            process::exit(1);
        }
    };
    match CoordinationConfig::from_json_str(&text) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {path}: {e}");
            process::exit(1);
        }
    }
}

// --- Run command ---

fn cmd_run(args: &[String]) {
    let scenario = match flag_value(args, "--scenario") {
        Some(name) => match parse_scenario(name) {
            Some(s) => s,
            None => {
                eprintln!("Error: unknown scenario {name:?}");
                process::exit(1);
            }
        },
        None => ScenarioId::default(),
    };
    let seed = parse_number(args, "--seed", SimConfig::default().seed);
    let max_ticks = parse_number(args, "--ticks", DEFAULT_MAX_TICKS);

    let mut coordination = load_policy(args);
    if has_flag(args, "--uncoordinated") {
        coordination.coordination_enabled = false;
    }

    let mut engine = match SimulationEngine::new(SimConfig {
        seed,
        coordination,
        scenario,
    }) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let mut last = None;
    for _ in 0..max_ticks {
        last = Some(engine.tick());
        if engine.is_finished() {
            break;
        }
    }
    if !engine.is_finished() {
        warn!(max_ticks, "tick limit reached before the scenario finished");
    }

    let time = engine.time();
    let score = engine.score();
    info!(
        ticks = time.tick,
        secs = time.elapsed_secs,
        killed = score.threats_killed,
        impacted = score.threats_impacted,
        fired = score.interceptors_fired,
        "scenario complete"
    );

    let summary = serde_json::json!({
        "scenario": scenario,
        "seed": seed,
        "time": time,
        "score": score,
        "stats": engine.coordination().stats(),
        "final_assignments": last.map(|s| s.assignments).unwrap_or_default(),
    });
    match serde_json::to_string_pretty(&summary) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Error: cannot serialise summary: {e}");
            process::exit(1);
        }
    }
}
