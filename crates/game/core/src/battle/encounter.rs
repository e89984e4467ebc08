//! Random encounter generation.

use crate::env::{PcgRng, RollContext, RollStream, Services};
use crate::stats::{Actor, UidAllocator};

use super::BattleError;

/// Rolls the enemy group for `floor` of `dungeon_id`.
///
/// Uses the first pool covering the floor, a count in the table's inclusive
/// range, and the floor's enemy level. Enemies take consecutive slots.
///
/// # Errors
///
/// - [`BattleError::Registry`] if the dungeon or a pooled species is unknown
/// - [`BattleError::NoEncounterPool`] if no pool covers the floor, or the
///   covering pool is empty
pub fn roll_encounter(
    services: &Services,
    dungeon_id: &str,
    floor: u32,
    seed: u64,
    uids: &mut UidAllocator,
) -> Result<Vec<Actor>, BattleError> {
    let dungeon = services.dungeons()?.get(dungeon_id)?;
    let no_pool = || BattleError::NoEncounterPool {
        dungeon: dungeon_id.to_owned(),
        floor,
    };
    let table = dungeon.encounters().ok_or_else(no_pool)?;
    let pool = table
        .pool_for(floor)
        .filter(|pool| !pool.enemies.is_empty())
        .ok_or_else(no_pool)?;

    let rng = PcgRng;
    let mut rolls = RollStream::new(&rng, seed, u64::from(floor));
    let (min, max) = (table.count.min.max(1), table.count.max.max(table.count.min.max(1)));
    let count = rolls.range(0, RollContext::EncounterSize, min, max);
    let level = table.enemy_level(floor);

    let creatures = services.creatures()?;
    let mut enemies = Vec::with_capacity(count as usize);
    for slot in 0..count as usize {
        let pick = rolls.index(slot as u64, RollContext::EncounterPick, pool.enemies.len());
        let species = creatures.get(&pool.enemies[pick])?;
        let mut enemy = Actor::new(uids.allocate(), species, level);
        enemy.set_slot(slot);
        enemies.push(enemy);
    }

    tracing::debug!(
        dungeon = dungeon_id,
        floor,
        count,
        level,
        "rolled encounter"
    );
    Ok(enemies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Uid;
    use crate::test_support::services;

    #[test]
    fn floor_selects_pool_and_level() {
        let services = services();
        let mut uids = UidAllocator::starting_at(100);

        let shallow = roll_encounter(&services, "default", 1, 7, &mut uids).unwrap();
        assert!((1..=3).contains(&shallow.len()));
        assert!(
            shallow
                .iter()
                .all(|e| ["goblin", "pixie"].contains(&e.species().id.as_str()) && e.level() == 1)
        );
        assert_eq!(shallow[0].uid(), Uid(100));

        let deep = roll_encounter(&services, "default", 5, 7, &mut uids).unwrap();
        assert!(deep.iter().all(|e| e.species().id == "bomb" && e.level() == 3));
        assert!(
            deep.iter()
                .enumerate()
                .all(|(slot, enemy)| enemy.slot() == slot)
        );
    }

    #[test]
    fn same_seed_same_group() {
        let services = services();
        let names = |seed| {
            roll_encounter(&services, "default", 1, seed, &mut UidAllocator::new())
                .unwrap()
                .iter()
                .map(|e| e.species().id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(names(42), names(42));
    }

    #[test]
    fn unknown_dungeon_and_uncovered_floor_fail() {
        let services = services();
        let mut uids = UidAllocator::new();
        assert!(matches!(
            roll_encounter(&services, "abyss", 1, 0, &mut uids),
            Err(BattleError::Registry(_))
        ));
        assert_eq!(
            roll_encounter(&services, "default", 0, 0, &mut uids).unwrap_err(),
            BattleError::NoEncounterPool {
                dungeon: "default".into(),
                floor: 0,
            }
        );
    }
}
