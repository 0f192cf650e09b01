//! SwimSampler CLI — stratified sampling of collegiate swim times.
//!
//! Commands:
//! - `plan` — survey divisions and print the allocation (targets, selected
//!   teams, quotas) without fetching any swimmer data
//! - `collect` — run the full pipeline and save CSV + manifest artifacts

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use swimsampler_core::provider::{
    CircuitBreaker, NoThrottle, StdoutProgress, SwimCloudProvider, Throttle, UniformJitter,
};
use swimsampler_runner::{
    collect, plan, save_artifacts, CollectConfig, CollectionPlan, CollectionResult,
};

#[derive(Parser)]
#[command(
    name = "swimsampler",
    about = "Stratified, proportional sampling of collegiate swim times"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Survey divisions and print targets and team quotas. No swimmer data
    /// is fetched.
    Plan {
        /// Path to a TOML config file. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the configured total sample size.
        #[arg(long)]
        total: Option<usize>,

        /// Override the configured master seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Skip the politeness delay between requests.
        #[arg(long, default_value_t = false)]
        no_throttle: bool,
    },
    /// Run the full collection and save artifacts.
    Collect {
        /// Path to a TOML config file. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the configured total sample size.
        #[arg(long)]
        total: Option<usize>,

        /// Override the configured master seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Output directory for the artifact bundle.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Skip the politeness delay between requests.
        #[arg(long, default_value_t = false)]
        no_throttle: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            config,
            total,
            seed,
            no_throttle,
        } => run_plan(config, total, seed, no_throttle),
        Commands::Collect {
            config,
            total,
            seed,
            output_dir,
            no_throttle,
        } => run_collect(config, total, seed, output_dir, no_throttle),
    }
}

fn load_config(
    path: Option<PathBuf>,
    total: Option<usize>,
    seed: Option<u64>,
) -> Result<CollectConfig> {
    let mut config = match path {
        Some(path) => CollectConfig::from_file(&path)?,
        None => CollectConfig::default(),
    };
    if let Some(total) = total {
        config.total_sample_size = total;
    }
    if let Some(seed) = seed {
        config.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

fn build_provider(no_throttle: bool) -> SwimCloudProvider {
    let breaker = Arc::new(CircuitBreaker::default_provider());
    let throttle: Arc<dyn Throttle> = if no_throttle {
        Arc::new(NoThrottle)
    } else {
        Arc::new(UniformJitter::default_polite())
    };
    SwimCloudProvider::new(breaker, throttle)
}

fn run_plan(
    config_path: Option<PathBuf>,
    total: Option<usize>,
    seed: Option<u64>,
    no_throttle: bool,
) -> Result<()> {
    let config = load_config(config_path, total, seed)?;
    let provider = build_provider(no_throttle);

    let planned = plan(&config, &provider, &StdoutProgress);
    print_plan(&config, &planned);
    Ok(())
}

fn run_collect(
    config_path: Option<PathBuf>,
    total: Option<usize>,
    seed: Option<u64>,
    output_dir: PathBuf,
    no_throttle: bool,
) -> Result<()> {
    let config = load_config(config_path, total, seed)?;
    let provider = build_provider(no_throttle);

    let result = collect(&config, &provider, &StdoutProgress);
    print_summary(&result);

    let run_dir = save_artifacts(&result, &output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());
    Ok(())
}

fn print_plan(config: &CollectConfig, planned: &CollectionPlan) {
    println!();
    println!("=== Sampling Plan ===");
    println!("Total sample size: {}", config.total_sample_size);
    println!("Seed:              {}", config.seed);
    if !planned.targets_exact {
        println!("WARNING: targets are best-effort — the floor/total combination is infeasible");
    }
    println!();
    for division in &planned.divisions {
        println!(
            "{} — population {}, target {}",
            division.division, division.population, division.target
        );
        for team in &division.teams {
            println!(
                "  {} ({} on roster): {} swimmer(s)",
                team.team, team.roster_estimate, team.quota
            );
        }
    }
}

fn print_summary(result: &CollectionResult) {
    println!();
    println!("=== Collection Result ===");
    for division in &result.divisions {
        println!(
            "{}: {}/{} collected from {} team(s) (population {})",
            division.division,
            division.collected,
            division.target,
            division.teams_selected,
            division.population
        );
    }
    println!();
    println!("Swimmers:  {}", result.swimmers.len());
    println!("Records:   {}", result.records.len());
    println!(
        "Failures:  {} provider, {} empty rosters, {} swimmers without times",
        result.counters.provider_failures,
        result.counters.empty_rosters,
        result.counters.swimmers_without_times
    );
    if !result.targets_exact {
        println!("WARNING: division targets were best-effort (infeasible floor/total)");
    }
    if result.halted_early {
        println!("WARNING: run halted early — provider became unavailable");
    }
}
