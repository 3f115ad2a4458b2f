//! loot-sim: run drop-rate and pity simulations and print a JSON report.
//!
//! Usage: loot-sim [CONFIG.ron|CONFIG.json] [--rolls N] [--luck X] [--runs N]
//!                 [--log-level LEVEL] [--verbose]

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use loot_core::balance::{
    simulate_pity, simulate_rarity_distribution, DropSimConfig, PityReport, PitySimConfig,
    RarityReport,
};
use loot_core::config::LootConfig;
use loot_core::logging::{init_tracing, LogLevel, TimingSpan, TracingConfig};
use loot_core::LootSession;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    rolls: Option<u64>,
    luck: Option<f32>,
    runs: Option<u64>,
    log_level: Option<LogLevel>,
    verbose: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--rolls" => args.rolls = Some(next_value(&mut iter, "--rolls")?.parse()?),
            "--luck" => args.luck = Some(next_value(&mut iter, "--luck")?.parse()?),
            "--runs" => args.runs = Some(next_value(&mut iter, "--runs")?.parse()?),
            "--log-level" => {
                let level = next_value(&mut iter, "--log-level")?;
                args.log_level = Some(level.parse().map_err(anyhow::Error::msg)?);
            }
            "--verbose" | "-v" => args.verbose = true,
            flag if flag.starts_with("--") => bail!("unknown flag {flag}"),
            path => args.config = Some(PathBuf::from(path)),
        }
    }
    Ok(args)
}

fn next_value(iter: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    iter.next().with_context(|| format!("{flag} needs a value"))
}

#[derive(Serialize)]
struct SimOutput {
    seed: u64,
    global_luck: f32,
    tables_loaded: usize,
    rarity: RarityReport,
    pity: PityReport,
}

fn main() -> Result<()> {
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => LootConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => LootConfig::default(),
    };

    let mut logging = if args.verbose {
        TracingConfig::verbose_drops()
    } else {
        config.logging.clone()
    };
    if let Some(level) = args.log_level {
        logging = logging.with_level(level);
    }
    init_tracing(&logging);
    let session = LootSession::from_config(&config).context("building loot session")?;
    let luck = session.effective_luck(args.luck.unwrap_or(1.0));

    let roll_count = args.rolls.unwrap_or(1_000_000);
    let rarity = {
        let _span = TimingSpan::counting("rarity_distribution", roll_count);
        simulate_rarity_distribution(&DropSimConfig {
            roll_count,
            luck_multiplier: luck,
            base_seed: config.seed,
            ..Default::default()
        })
    };

    let pity = {
        let _span = TimingSpan::new("pity");
        simulate_pity(&PitySimConfig {
            runs: args.runs.unwrap_or(64),
            luck_multiplier: luck,
            pity_threshold: config.pity_threshold,
            base_seed: config.seed,
            ..Default::default()
        })
    };

    let output = SimOutput {
        seed: config.seed,
        global_luck: luck,
        tables_loaded: session.tables.len(),
        rarity,
        pity,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
