use clap::Parser;
use encoding_rs::Encoding;
use brawl_engine::api::{simulate_duel_many, DuelConfig, DuelStats, ParticipantSpec};
use brawl_engine::{Catalog, HealCap};
use serde::Serialize;
use std::{fs, path::PathBuf};

#[derive(Parser)]
#[command(name = "simulate-many")]
#[command(about = "Monte Carlo sim: many seeded duels between the same pair")]
struct Args {
    /// Challenger id (acts first)
    #[arg(long, default_value = "challenger")]
    challenger: String,

    /// Opponent id
    #[arg(long, default_value = "opponent")]
    opponent: String,

    /// Number of trials
    #[arg(long, default_value_t = 1000)]
    trials: u32,

    /// Safety cap on rounds per trial
    #[arg(long, default_value_t = 10_000)]
    max_rounds: u32,

    /// Starting hit points
    #[arg(long)]
    hp: Option<i64>,

    /// Cap heals at the starting hit points
    #[arg(long, default_value_t = false)]
    heal_cap: bool,

    /// Built-in catalog id (default | gentle)
    #[arg(long)]
    catalog_id: Option<String>,

    /// Catalog file (.json, .yaml or .yml); wins over --catalog-id
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Full duel config as JSON; flags other than --trials and --json are ignored
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG base seed (trial i uses seed+i)
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Print the summary as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Serialize)]
struct Summary<'a> {
    challenger: &'a str,
    opponent: &'a str,
    seed: u64,
    stats: &'a DuelStats,
}

fn read_text_auto(path: &std::path::Path) -> anyhow::Result<String> {
    let bytes = fs::read(path)?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

fn spec_id(spec: &ParticipantSpec) -> &str {
    match spec {
        ParticipantSpec::Id(id) | ParticipantSpec::Labeled { id, .. } => id,
    }
}

fn config_from_args(args: &Args) -> anyhow::Result<DuelConfig> {
    if let Some(path) = &args.config {
        let text = read_text_auto(path)?;
        return Ok(serde_json::from_str(&text)?);
    }
    let catalog = match &args.catalog {
        Some(path) => Some(Catalog::from_text(&read_text_auto(path)?, path)?),
        None => None,
    };
    Ok(DuelConfig {
        challenger: ParticipantSpec::Id(args.challenger.clone()),
        opponent: ParticipantSpec::Id(args.opponent.clone()),
        catalog,
        catalog_id: args.catalog_id.clone(),
        catalog_path: None,
        seed: args.seed,
        starting_hp: args.hp,
        heal_cap: if args.heal_cap { HealCap::StartingHp } else { HealCap::Uncapped },
        house: None,
        max_rounds: Some(args.max_rounds),
    })
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.trials == 0 {
        anyhow::bail!("--trials must be at least 1");
    }

    let cfg = config_from_args(&args)?;
    let challenger = spec_id(&cfg.challenger).to_string();
    let opponent = spec_id(&cfg.opponent).to_string();
    let seed = cfg.seed;
    let stats = simulate_duel_many(cfg, args.trials)?;

    if args.json {
        let summary = Summary { challenger: &challenger, opponent: &opponent, seed, stats: &stats };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let trials_f = stats.samples as f64;
    println!("simulate-many results");
    println!("---------------------");
    println!("trials:             {}", stats.samples);
    println!("matchup:            {} vs {}", challenger, opponent);
    println!("base seed:          {}", seed);
    println!();
    println!(
        "{:<20}{:.1}%",
        format!("{} wins:", challenger),
        stats.challenger_wins as f64 / trials_f * 100.0
    );
    println!(
        "{:<20}{:.1}%",
        format!("{} wins:", opponent),
        stats.opponent_wins as f64 / trials_f * 100.0
    );
    println!("avg rounds:         {:.2}", stats.avg_rounds);
    println!("median rounds:      {}", stats.median_rounds);
    println!(
        "special events:     {} ({:.1}% of duels)",
        stats.special_events,
        stats.special_events as f64 / trials_f * 100.0
    );

    Ok(())
}
