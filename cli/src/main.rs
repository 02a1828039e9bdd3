use std::path::{Path, PathBuf};
use std::{fs, thread, time::Duration};

use anyhow::Context;
use brawl_engine::api::{
    load_catalog, simulate_duel, simulate_royale, BattleReport, DuelConfig, ParticipantSpec,
    RoyaleConfig,
};
use brawl_engine::{ActionResolver, Catalog, Dice, HealCap};
use clap::{Args, Parser, Subcommand, ValueEnum};
use encoding_rs::Encoding;
use tracing::Level;

#[derive(Copy, Clone, ValueEnum)]
enum Cap {
    /// Heals may push hit points past the starting value
    Uncapped,
    /// Heals stop at the starting value
    StartingHp,
}

impl From<Cap> for HealCap {
    fn from(c: Cap) -> Self {
        match c {
            Cap::Uncapped => HealCap::Uncapped,
            Cap::StartingHp => HealCap::StartingHp,
        }
    }
}

#[derive(Args)]
struct CatalogArgs {
    /// Built-in catalog id (default | gentle)
    #[arg(long)]
    catalog_id: Option<String>,
    /// Catalog file (.json, .yaml or .yml); wins over --catalog-id
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Args)]
struct BattleArgs {
    /// RNG seed for determinism
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Starting hit points for everyone
    #[arg(long)]
    hp: Option<i64>,
    /// Heal cap policy
    #[arg(long, value_enum, default_value_t = Cap::Uncapped)]
    heal_cap: Cap,
    /// Abort after this many rounds
    #[arg(long)]
    max_rounds: Option<u32>,
    /// Delay between narration lines, in milliseconds
    #[arg(long, default_value_t = 0)]
    pace_ms: u64,
    /// Print the full report as JSON instead of narration
    #[arg(long, default_value_t = false)]
    json: bool,
    #[command(flatten)]
    catalog: CatalogArgs,
}

#[derive(Subcommand)]
enum Cmd {
    /// Two-player duel; the challenger acts first
    Duel {
        /// Challenger id
        challenger: String,
        /// Opponent id
        opponent: String,
        /// Participant that fights with the catalog's house attack
        #[arg(long)]
        house: Option<String>,
        #[command(flatten)]
        battle: BattleArgs,
    },
    /// Free-for-all between two or more players
    Royale {
        /// Player ids, in roster order
        #[arg(required = true, num_args = 2..)]
        players: Vec<String>,
        #[command(flatten)]
        battle: BattleArgs,
    },
    /// Resolve a few turns in isolation and print the chosen actions
    Action {
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Number of turns to resolve
        #[arg(long, default_value_t = 5)]
        turns: u32,
        #[command(flatten)]
        catalog: CatalogArgs,
    },
    /// Print a catalog as JSON (stdout)
    Catalog {
        #[command(flatten)]
        catalog: CatalogArgs,
        /// Pretty-print JSON
        #[arg(long, default_value_t = true)]
        pretty: bool,
    },
}

#[derive(Parser)]
#[command(name = "brawl")]
#[command(about = "Chat-bot battle simulator: duels and battle royales")]
struct Cli {
    /// Log engine decisions to stderr
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Cmd::Duel { challenger, opponent, house, battle } => {
            let cfg = DuelConfig {
                challenger: ParticipantSpec::Id(challenger),
                opponent: ParticipantSpec::Id(opponent),
                catalog: load_catalog_args(&battle.catalog)?,
                catalog_id: battle.catalog.catalog_id.clone(),
                catalog_path: None,
                seed: battle.seed,
                starting_hp: battle.hp,
                heal_cap: battle.heal_cap.into(),
                house,
                max_rounds: battle.max_rounds,
            };
            let report = simulate_duel(cfg)?;
            print_report(&report, battle.json, battle.pace_ms)?;
        }
        Cmd::Royale { players, battle } => {
            let cfg = RoyaleConfig {
                players: players.into_iter().map(ParticipantSpec::Id).collect(),
                catalog: load_catalog_args(&battle.catalog)?,
                catalog_id: battle.catalog.catalog_id.clone(),
                catalog_path: None,
                seed: battle.seed,
                starting_hp: battle.hp,
                heal_cap: battle.heal_cap.into(),
                max_rounds: battle.max_rounds,
            };
            let report = simulate_royale(cfg)?;
            print_report(&report, battle.json, battle.pace_ms)?;
        }
        Cmd::Action { seed, turns, catalog } => {
            let resolver = ActionResolver::new(resolve_catalog(&catalog)?)?;
            let mut dice = Dice::from_seed(seed);
            for turn in 1..=turns {
                let action = resolver.resolve_turn(&mut dice)?;
                println!("{} {}", turn, serde_json::to_string(&action)?);
            }
        }
        Cmd::Catalog { catalog, pretty } => {
            let catalog = resolve_catalog(&catalog)?;
            if pretty {
                println!("{}", serde_json::to_string_pretty(&catalog)?);
            } else {
                println!("{}", serde_json::to_string(&catalog)?);
            }
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// A `--catalog` file is read here, BOM-aware, and handed to the engine inline.
fn load_catalog_args(args: &CatalogArgs) -> anyhow::Result<Option<Catalog>> {
    let Some(path) = &args.catalog else {
        return Ok(None);
    };
    let text = read_text_auto(path)
        .with_context(|| format!("failed to read catalog: {}", path.display()))?;
    let catalog = Catalog::from_text(&text, path)
        .with_context(|| format!("failed to parse catalog: {}", path.display()))?;
    Ok(Some(catalog))
}

fn resolve_catalog(args: &CatalogArgs) -> anyhow::Result<Catalog> {
    match load_catalog_args(args)? {
        Some(catalog) => Ok(catalog),
        None => load_catalog(args.catalog_id.as_deref(), None),
    }
}

fn read_text_auto(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path)?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

fn print_report(report: &BattleReport, json: bool, pace_ms: u64) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    let pace = Duration::from_millis(pace_ms);
    for (i, line) in report.log.iter().enumerate() {
        if i > 0 && !pace.is_zero() {
            thread::sleep(pace);
        }
        println!("{}", line);
    }
    Ok(())
}
