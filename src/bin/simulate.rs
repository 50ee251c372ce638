//! Autopilot simulator CLI.
//!
//! Run Monte Carlo simulations to see how the tuning plays out.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                    # Default: 1000 runs
//!   cargo run --bin simulate -- -n 100 -r 2    # 100 runs, two revives each
//!   cargo run --bin simulate -- --seed 42      # Reproducible run

use flappycow::core::geometry::Viewport;
use flappycow::logging;
use flappycow::simulator::{run_simulation, SimConfig};
use std::env;

fn main() {
    logging::init_stderr();

    let args: Vec<String> = env::args().collect();
    let (config, json) = parse_args(&args);

    let report = run_simulation(&config);

    // JSON goes to stdout on its own so it can be piped.
    if json {
        println!("{}", report.to_json());
        return;
    }

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║                 FLAPPY COW SIMULATOR                          ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.num_runs);
    println!("  Max Ticks:      {}", config.max_ticks_per_run);
    println!("  Revives:        {}", config.revives_per_run);
    println!(
        "  Viewport:       {}x{}",
        config.viewport.width, config.viewport.height
    );
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("{}", report.to_text());
}

fn parse_args(args: &[String]) -> (SimConfig, bool) {
    let mut config = SimConfig::default();
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if i + 1 < args.len() {
                    config.num_runs = args[i + 1].parse().unwrap_or(1000);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "-t" | "--ticks" => {
                if i + 1 < args.len() {
                    config.max_ticks_per_run = args[i + 1].parse().unwrap_or(100_000);
                    i += 1;
                }
            }
            "-r" | "--revives" => {
                if i + 1 < args.len() {
                    config.revives_per_run = args[i + 1].parse().unwrap_or(0);
                    i += 1;
                }
            }
            "--size" => {
                if i + 1 < args.len() {
                    if let Some(viewport) = parse_size(&args[i + 1]) {
                        config.viewport = viewport;
                    }
                    i += 1;
                }
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "--json" => {
                json = true;
            }
            "--quick" => {
                config = SimConfig::quick();
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    (config, json)
}

/// `WIDTHxHEIGHT`, e.g. `1080x1920`.
fn parse_size(raw: &str) -> Option<Viewport> {
    let (w, h) = raw.split_once('x')?;
    let viewport = Viewport::new(w.parse().ok()?, h.parse().ok()?);
    viewport.is_valid().then_some(viewport)
}

fn print_help() {
    println!("Flappy Cow Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>      Number of simulation runs (default: 1000)");
    println!("    -s, --seed <S>      Random seed for reproducibility");
    println!("    -t, --ticks <T>     Max ticks per run (default: 100,000)");
    println!("    -r, --revives <R>   Revives allowed per run (default: 0)");
    println!("    --size <WxH>        Viewport size (default: 720x1280)");
    println!("    -v, --verbose       One line per run");
    println!("    --json              Print the report as JSON");
    println!("    --quick             Quick test (50 runs)");
    println!("    -h, --help          Show this help");
    println!();
    println!("EXAMPLES:");
    println!("    cargo run --bin simulate                    # Default run");
    println!("    cargo run --bin simulate -- --seed 42      # Reproducible");
    println!("    cargo run --bin simulate -- --quick --json # Quick, machine readable");
}
