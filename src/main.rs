//! Command-line front end for the hub location solver.

use clap::Parser;
use hub_vns::config::Config;
use hub_vns::instance::Instance;
use hub_vns::report::{print_summary, save_json, save_solution};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Solve a hub location instance with GRASP + VNS.
#[derive(Debug, Parser)]
#[command(name = "hub-vns", version, about)]
struct Args {
    /// Instance file
    instance: PathBuf,

    /// Number of parallel workers
    #[arg(short, long, default_value_t = 1)]
    workers: usize,

    /// Time limit in seconds
    #[arg(short, long, default_value_t = 10.0)]
    time_limit: f64,

    /// VNS iterations per worker (runs without a time limit when set alone)
    #[arg(long)]
    max_iterations: Option<u64>,

    /// Random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Known best cost, enables gap reporting
    #[arg(long)]
    target: Option<f64>,

    /// GRASP greediness in [0, 1]
    #[arg(long, default_value_t = 0.3)]
    alpha: f64,

    /// Maximum improving moves per local search pass
    #[arg(long, default_value_t = 1000)]
    local_search_iterations: usize,

    /// Write the result to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the output file as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if !(args.time_limit.is_finite() && args.time_limit > 0.0) {
        return Err(format!(
            "time limit must be a positive number of seconds, got {}",
            args.time_limit
        )
        .into());
    }

    log::info!("loading instance from {}", args.instance.display());
    let instance = Arc::new(Instance::from_file(&args.instance)?);

    let mut config = Config::new()
        .with_workers(args.workers)
        .with_grasp_alpha(args.alpha)
        .with_max_local_search_iterations(args.local_search_iterations);

    config = match args.max_iterations {
        Some(iterations) => config.with_max_iterations(iterations).without_time_limit(),
        None => config.with_time_limit(Duration::from_secs_f64(args.time_limit)),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(target) = args.target {
        config = config.with_target_cost(target);
    }

    let result = hub_vns::solve(Arc::clone(&instance), &config)?;
    print_summary(&result);

    if let Some(path) = args.output {
        if args.json {
            save_json(&result, &path)?;
        } else {
            save_solution(&result, &instance, &path)?;
        }
        log::info!("result written to {}", path.display());
    }

    Ok(())
}
