use std::path::PathBuf;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use esg_carbon_engine::engine::{self, CalculationRequest};
use esg_carbon_engine::models::{EsgScores, Region};
use esg_carbon_engine::{
    benchmark, import, offsets, targets, EmissionFactorRegistry, EngineConfig, FlightMode,
    OffsetCatalog,
};

#[derive(Parser)]
#[command(name = "esg-carbon")]
#[command(about = "Greenhouse-gas accounting and ESG target tracking", long_about = None)]
struct Cli {
    /// Region used when a requested region has no factors [env: ESG_DEFAULT_REGION]
    #[arg(long, global = true)]
    default_region: Option<Region>,
    /// `legacy` or `split` flight accounting [env: ESG_FLIGHT_MODE]
    #[arg(long, global = true)]
    flight_mode: Option<FlightMode>,
    /// JSON emission factor table replacing the built-in one
    #[arg(long, global = true)]
    factors: Option<PathBuf>,
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate one company's emissions report from a JSON request
    Calculate {
        #[arg(long)]
        request: PathBuf,
    },
    /// Calculate reports for every company row in a CSV file
    CalculateBatch {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Track reduction targets from a CSV file
    Track {
        #[arg(long)]
        csv: PathBuf,
        /// Evaluation date, defaults to today
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Quote offset providers for a volume of emissions
    Offsets {
        #[arg(long)]
        tons: f64,
        #[arg(long)]
        budget: Option<f64>,
    },
    /// Compare assessed E/S/G scores with the industry benchmark
    Benchmark {
        #[arg(long)]
        industry: String,
        #[arg(long)]
        environmental: f64,
        #[arg(long)]
        social: f64,
        #[arg(long)]
        governance: f64,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = EngineConfig::from_env().context("failed to read engine configuration")?;
    if let Some(region) = cli.default_region {
        config.default_region = region;
    }
    if let Some(mode) = cli.flight_mode {
        config.flight_mode = mode;
    }

    let registry = match &cli.factors {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            EmissionFactorRegistry::from_json_reader(file, config.default_region)
                .with_context(|| format!("failed to load factors from {}", path.display()))?
        }
        None => EmissionFactorRegistry::builtin(config.default_region),
    };

    match cli.command {
        Commands::Calculate { request } => {
            let raw = std::fs::read_to_string(&request)
                .with_context(|| format!("failed to read {}", request.display()))?;
            let request: CalculationRequest =
                serde_json::from_str(&raw).context("request is not a valid calculation request")?;
            let report = engine::calculate_emissions(&registry, &config, &request, Utc::now())?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "{} ({}{}): {:.2} kgCO2e",
                    request.company.as_deref().unwrap_or("company"),
                    report.region,
                    if report.region_fallback { ", default factors" } else { "" },
                    report.total_emissions_kg
                );
                println!("- scope 1: {:.2} kg", report.scope1.total);
                println!("- scope 2: {:.2} kg", report.scope2.total);
                println!("- scope 3: {:.2} kg", report.scope3.total);
                println!(
                    "- {:.2} kg per employee, {:.2} kg per million revenue",
                    report.per_employee, report.per_million_revenue
                );
            }
        }
        Commands::CalculateBatch { csv } => {
            let requests = import::read_companies(&csv)?;
            let outcome = engine::calculate_batch(&registry, &config, &requests, Utc::now());

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("Calculated {} of {} companies.", outcome.succeeded.len(), requests.len());
                for item in outcome.succeeded.iter() {
                    println!(
                        "- {} ({}) {:.2} t CO2e",
                        item.company, item.report.region, item.report.total_emissions_tons
                    );
                }
                for failure in outcome.failed.iter() {
                    println!("- {} skipped: {}", failure.key, failure.error);
                }
            }
        }
        Commands::Track { csv, as_of } => {
            let definitions = import::read_targets(&csv)?;
            let now = as_of.unwrap_or_else(|| Utc::now().date_naive());
            let outcome = targets::track_all(&definitions, now);
            let summary = targets::summarize(&outcome.succeeded);

            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "outcome": outcome,
                        "summary": summary,
                    }))?
                );
                return Ok(());
            }

            if outcome.succeeded.is_empty() && outcome.failed.is_empty() {
                println!("No targets found in {}.", csv.display());
                return Ok(());
            }

            println!(
                "Targets as of {now}: {} on track, {} at risk, {} not started",
                summary.on_track, summary.at_risk, summary.not_started
            );
            for progress in outcome.succeeded.iter() {
                println!(
                    "- {}: {:.1}% done vs {:.1}% expected ({}), {:.2} to go per year",
                    progress.target.name,
                    progress.progress_percent,
                    progress.expected_progress_percent,
                    if progress.on_track { "on track" } else { "behind" },
                    progress.annual_reduction_needed
                );
            }
            for failure in outcome.failed.iter() {
                println!("- {} skipped: {}", failure.key, failure.error);
            }
        }
        Commands::Offsets { tons, budget } => {
            let selection = offsets::select_offsets(&OffsetCatalog::builtin(), tons, budget)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&selection)?);
                return Ok(());
            }

            if selection.budget_infeasible {
                println!("No provider fits the budget; showing all options.");
            }
            for quote in selection.options.iter() {
                println!(
                    "- {} ({}, rating {:.1}) {:.2} for {:.2} t",
                    quote.provider.name,
                    quote.provider.location,
                    quote.provider.rating,
                    quote.total_cost,
                    selection.emissions_tons
                );
            }
            if let Some(recommended) = &selection.recommended {
                println!("Recommended: {}", recommended.provider.name);
            }
        }
        Commands::Benchmark {
            industry,
            environmental,
            social,
            governance,
        } => {
            let assessed = EsgScores {
                environmental,
                social,
                governance,
            };
            let comparison = benchmark::compare(&assessed, &industry)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&comparison)?);
            } else {
                println!("Compared with {} averages:", comparison.industry);
                println!("- environmental {:+.1}", comparison.deltas.environmental);
                println!("- social {:+.1}", comparison.deltas.social);
                println!("- governance {:+.1}", comparison.deltas.governance);
            }
        }
    }

    Ok(())
}
