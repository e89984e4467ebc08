//! Victory settlement.

use crate::config::RewardConfig;
use crate::stats::{ActorSnapshot, ExpTable, Uid};

use super::BattleState;

/// One ally's level change after a victory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelUpReport {
    pub uid: Uid,
    pub name: String,
    pub before: ActorSnapshot,
    pub after: ActorSnapshot,
}

/// What a won encounter paid out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VictoryReport {
    pub gold: u64,
    /// Experience granted to each ally, fallen ones included.
    pub exp: Vec<(Uid, u64)>,
    pub level_ups: Vec<LevelUpReport>,
    /// HP restored to each surviving ally by the post-battle rest.
    pub healed: Vec<(Uid, u32)>,
}

impl VictoryReport {
    pub fn exp_for(&self, uid: Uid) -> Option<u64> {
        self.exp.iter().find(|(id, _)| *id == uid).map(|(_, exp)| *exp)
    }
}

/// Grants gold and experience for a won encounter on `floor`, then rests the
/// survivors.
///
/// Gold is `enemies * base_gold_per_enemy * floor`. Every party member, fallen
/// or not, gains `round(enemies * base_xp_per_enemy * floor * (1 + rate))`
/// experience, where `rate` is the species rate plus any equipment bonus.
pub(crate) fn settle_victory(
    state: &mut BattleState,
    rewards: &RewardConfig,
    table: &ExpTable,
    floor: u32,
) -> VictoryReport {
    let enemies = state.enemies.len() as u64;
    let floor = u64::from(floor.max(1));
    let mut report = VictoryReport {
        gold: enemies * u64::from(rewards.base_gold_per_enemy) * floor,
        ..VictoryReport::default()
    };
    state.log.push(format!("Found {} gold", report.gold));

    let base_exp = (enemies * u64::from(rewards.base_xp_per_enemy) * floor) as f64;
    for ally in state.allies.iter_mut() {
        let rate = ally.species().xp_rate() + ally.xp_bonus();
        let exp = (base_exp * (1.0 + rate)).round().max(0.0) as u64;
        report.exp.push((ally.uid(), exp));
        if let Some(level_up) = ally.gain_exp(exp, table) {
            report.level_ups.push(LevelUpReport {
                uid: ally.uid(),
                name: ally.name().to_owned(),
                before: level_up.before,
                after: level_up.after,
            });
        }
    }

    let lines: Vec<String> = report
        .level_ups
        .iter()
        .map(|up| format!("{} reached level {}", up.name, up.after.level))
        .collect();
    for line in lines {
        state.log.push(line);
    }

    for ally in state.allies.iter_mut().filter(|ally| ally.is_alive()) {
        let amount = (f64::from(ally.mhp()) * rewards.post_battle_heal_ratio).floor() as u32;
        report.healed.push((ally.uid(), ally.heal(amount)));
    }

    tracing::info!(
        gold = report.gold,
        level_ups = report.level_ups.len(),
        "victory settled"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{actor, equipped, services};

    #[test]
    fn gold_and_exp_scale_with_floor_and_enemies() {
        let services = services();
        let mut hero = actor(&services, "hero", 1, 1);
        hero.take_damage(20);
        let mut fallen = actor(&services, "pixie", 2, 1);
        fallen.take_damage(100);
        let mut state = BattleState::new(
            vec![hero, fallen],
            vec![
                actor(&services, "goblin", 3, 1),
                actor(&services, "goblin", 4, 1),
            ],
        );

        let table = ExpTable::default();
        let report = settle_victory(
            &mut state,
            &services.config().unwrap().rewards,
            &table,
            3,
        );

        assert_eq!(report.gold, 2 * 20 * 3);
        assert_eq!(report.exp, vec![(Uid(1), 30), (Uid(2), 30)]);
        assert_eq!(state.actor(Uid(2)).unwrap().exp(), 30);
        assert!(!state.actor(Uid(2)).unwrap().is_alive());
        assert!(report.level_ups.is_empty());
        // 25% of 30 max HP, floored.
        assert_eq!(report.healed, vec![(Uid(1), 7)]);
        assert_eq!(state.actor(Uid(1)).unwrap().hp(), 17);
    }

    #[test]
    fn enough_exp_levels_up() {
        let services = services();
        let mut state = BattleState::new(
            vec![actor(&services, "hero", 1, 1)],
            vec![actor(&services, "goblin", 2, 1)],
        );

        let table = ExpTable::default();
        let report = settle_victory(
            &mut state,
            &services.config().unwrap().rewards,
            &table,
            20,
        );

        // 1 * 5 * 20 = 100 exp reaches level 2 exactly.
        assert_eq!(report.level_ups.len(), 1);
        let up = &report.level_ups[0];
        assert_eq!((up.before.level, up.after.level), (1, 2));
        assert!(state.log.contains("Hero reached level 2"));
    }

    #[test]
    fn equipment_raises_the_exp_rate() {
        let services = services();
        let mut state = BattleState::new(
            vec![equipped(&services, "hero", 1, "golden_egg")],
            vec![actor(&services, "goblin", 2, 1)],
        );

        let table = ExpTable::default();
        let report = settle_victory(
            &mut state,
            &services.config().unwrap().rewards,
            &table,
            4,
        );

        // 1 * 5 * 4 * 1.5
        assert_eq!(report.exp_for(Uid(1)), Some(30));
    }
}
