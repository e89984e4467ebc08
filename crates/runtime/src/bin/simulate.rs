//! Headless encounter simulator.
//!
//! Loads content, builds a party, rolls an encounter for a dungeon floor and
//! plays it out with instant animations, then prints the battle log.
//!
//! ```bash
//! RUST_LOG=debug cargo run -p runtime --bin simulate -- --floor 3 --party summoner,pixie \
//!     --equip straw_doll,none --leader 0
//! ```
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use game_core::{Actor, BattleManager, UidAllocator, roll_encounter};
use runtime::{EncounterRunner, InstantPlayer, RuntimeConfig};

#[derive(Parser, Debug)]
#[command(name = "simulate", about = "Play one encounter headlessly")]
struct Cli {
    /// Dungeon to roll the encounter from
    #[arg(long, default_value = "default")]
    dungeon: String,

    /// Dungeon floor (1-based)
    #[arg(long, default_value_t = 1)]
    floor: u32,

    /// Comma-separated species ids of the party, front row first
    #[arg(long, value_delimiter = ',', default_value = "summoner,pixie")]
    party: Vec<String>,

    /// Comma-separated equipment ids matching `--party` by position; `none`
    /// leaves a member bare
    #[arg(long, value_delimiter = ',')]
    equip: Vec<String>,

    /// Level of every party member
    #[arg(long, default_value_t = 3)]
    level: u32,

    /// Party slot whose member opens every round while standing
    #[arg(long)]
    leader: Option<usize>,

    /// Encounter seed (overrides DUNGEON_SEED)
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = RuntimeConfig::from_env();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let services = Arc::new(config.content_factory().build_services()?);
    let seed = cli.seed.or(config.seed).unwrap_or_else(clock_seed);
    tracing::info!(seed, dungeon = %cli.dungeon, floor = cli.floor, "simulating encounter");

    let creatures = services.creatures()?;
    let equipment = services.equipment()?;
    let table = services.exp_table()?;
    let mut uids = UidAllocator::new();
    let mut party = Vec::with_capacity(cli.party.len());
    for (slot, species) in cli.party.iter().enumerate() {
        let definition = creatures
            .get(species)
            .with_context(|| format!("unknown party species '{species}'"))?;
        let mut actor = Actor::with_table(uids.allocate(), definition, cli.level, table);
        actor.set_slot(slot);
        if let Some(gear) = cli.equip.get(slot).filter(|id| id.as_str() != "none") {
            let gear = equipment
                .get(gear)
                .with_context(|| format!("unknown equipment '{gear}'"))?;
            actor.equip(gear);
        }
        party.push(actor);
    }

    let leader = match cli.leader {
        Some(slot) => Some(
            party
                .get(slot)
                .map(Actor::uid)
                .with_context(|| format!("no party member in slot {slot}"))?,
        ),
        None => None,
    };

    let enemies = roll_encounter(&services, &cli.dungeon, cli.floor, seed, &mut uids)?;
    let manager =
        BattleManager::start_with_leader(Arc::clone(&services), party, enemies, seed, leader)?;
    let (runner, _handle) = EncounterRunner::new(manager, Arc::new(InstantPlayer), &config);
    let summary = runner.on_floor(cli.floor).run().await?;

    for line in &summary.log {
        println!("{line}");
    }
    println!();
    println!("Outcome: {} after {} round(s)", summary.outcome, summary.rounds);
    if let Some(victory) = &summary.victory {
        println!("Gold: {}", victory.gold);
    }
    for ally in &summary.allies {
        println!(
            "{} Lv{} HP {}/{} EXP {}",
            ally.name(),
            ally.level(),
            ally.hp(),
            ally.mhp(),
            ally.exp()
        );
    }
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
