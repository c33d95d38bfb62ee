use anyhow::{Context, Result};
use monster_economy::{AnchorSlot, GameRules, MonsterBlueprint, MonsterId, Weight, World};
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let rules = match env::args().nth(1) {
        Some(path) => GameRules::load(&path)
            .with_context(|| format!("Failed to load rules from {path}"))?,
        None => GameRules::default(),
    };
    let mut world = World::with_rules(rules).context("Invalid rules")?;

    let (first, second) = spawn_fighters(&mut world)?;
    pack_rucksack(&mut world, first)?;

    let (winner, loser) = fight(&mut world, first, second)?;
    loot(&mut world, winner, loser)?;

    if let Err(problem) = world.check_invariants() {
        warn!(%problem, "possession graph is inconsistent");
    }
    Ok(())
}

fn spawn_fighters(world: &mut World) -> Result<(MonsterId, MonsterId)> {
    let mut spawn = |name: &str, protection: u32| -> Result<MonsterId> {
        let weapon = world.spawn_weapon(Weight::from_kg(2), 15);
        let backpack = world.spawn_backpack(Weight::from_kg(1), 5, 10)?;
        let monster = world
            .spawn_monster(MonsterBlueprint::new(name, protection, 100, weapon, backpack).with_strength(20))
            .with_context(|| format!("Failed to spawn {name}"))?;
        // 把初始武器换到右手
        world.transfer_to_monster(weapon, monster, Some(AnchorSlot::RightHand.index()))?;
        Ok(monster)
    };
    let first = spawn("Al capo35", 13)?;
    let second = spawn("Destroyer o' Hope", 11)?;
    Ok((first, second))
}

fn pack_rucksack(world: &mut World, owner: MonsterId) -> Result<()> {
    let rucksack = world.spawn_backpack(Weight::from_f64(2.0)?, 20, 20)?;
    let dagger = world.spawn_weapon(Weight::from_f64(1.0)?, 30);
    let small = world.spawn_purse(Weight::from_f64(0.5)?, 10, 50, 12)?;
    let large = world.spawn_purse(Weight::from_f64(1.0)?, 30, 20, 18)?;
    world.add_items(rucksack, &[dagger, small, large])?;
    world.transfer_currency(small, large, 1)?;

    world.replace_at(owner, AnchorSlot::Back.index(), rucksack)?;
    info!(
        owner = %owner,
        rucksack = %rucksack,
        weight = %world.total_weight(rucksack)?,
        value = world.total_value(rucksack)?,
        "rucksack replaced backpack"
    );
    Ok(())
}

fn fight(world: &mut World, a: MonsterId, b: MonsterId) -> Result<(MonsterId, MonsterId)> {
    let alive = |world: &World, id: MonsterId| world.monster(id).is_some_and(|m| m.is_alive());
    let mut rounds = 0u32;
    while alive(world, a) && alive(world, b) {
        rounds += 1;
        world.hit(a, b)?;
        world.hit(b, a)?;
    }
    let (winner, loser) = if alive(world, a) { (a, b) } else { (b, a) };
    info!(%winner, %loser, rounds, "fight finished");
    Ok((winner, loser))
}

fn loot(world: &mut World, winner: MonsterId, loser: MonsterId) -> Result<()> {
    let Some(backpack) = world.anchors(winner)?[AnchorSlot::Back.index()] else {
        warn!(%winner, "winner has no backpack");
        return Ok(());
    };
    let spoils: Vec<_> = world.anchors(loser)?.iter().flatten().copied().collect();
    for item in spoils {
        match world.add_to_container(item, backpack) {
            Ok(()) => info!(%item, %backpack, "looted"),
            Err(e) => warn!(%item, error = %e, "left behind"),
        }
    }
    info!(
        %winner,
        weight = %world.monster_total_weight(winner)?,
        value = world.monster_total_value(winner)?,
        "winner inventory"
    );
    Ok(())
}
