//! Applies a resolved [`EffectResult`] to the battle state.

use crate::action::{EffectOutcome, EffectResult};
use crate::env::Services;
use crate::stats::Uid;

use super::{BattleState, passives};

/// Mutates `state` according to `result` and logs each outcome.
///
/// Returns the creatures this result knocked out, in the order they fell.
pub(crate) fn apply_result(
    state: &mut BattleState,
    services: &Services,
    result: &EffectResult,
) -> Vec<Uid> {
    let subject_name = state.name_of(result.subject);
    if let Some(subject) = state.actor_mut(result.subject)
        && result.mp_cost > 0
        && !subject.spend_mp(result.mp_cost)
    {
        tracing::warn!(subject = %result.subject, cost = result.mp_cost, "subject could not pay MP");
    }
    state
        .log
        .push(format!("{subject_name} uses {}", result.action_name));

    let was_alive: Vec<(Uid, bool)> = result
        .targets
        .iter()
        .map(|uid| (*uid, state.actor(*uid).is_some_and(|a| a.is_alive())))
        .collect();

    for hit in &result.hits {
        let target_name = state.name_of(hit.target);
        let evade_bonus = match &hit.outcome {
            EffectOutcome::Miss => state
                .actor(hit.target)
                .is_some_and(|target| passives::has_evade_bonus(services, target)),
            _ => false,
        };
        let Some(target) = state.actor_mut(hit.target) else {
            tracing::warn!(target = %hit.target, "hit on unknown target");
            continue;
        };

        let line = match &hit.outcome {
            EffectOutcome::Miss => {
                if evade_bonus && target.stack_evade_bonus() {
                    format!("{subject_name} missed {target_name}. {target_name} is getting faster")
                } else {
                    format!("{subject_name} missed {target_name}")
                }
            }
            EffectOutcome::Damage {
                amount,
                critical,
                guarded,
            } => {
                let (dealt, endured) = target.take_hit(*amount);
                let mut line = format!("{subject_name} hits {target_name} for {dealt} damage");
                if *guarded {
                    line.push_str(" (guarded)");
                }
                if endured {
                    line.push_str(&format!(". {target_name} endures the blow"));
                }
                if *critical {
                    line = format!("Critical hit! {line}");
                }
                line
            }
            EffectOutcome::Heal { amount } => {
                let gained = target.heal(*amount);
                format!("{target_name} recovers {gained} HP")
            }
            EffectOutcome::Revive { hp } => {
                if target.revive(*hp) {
                    format!("{target_name} is revived with {} HP", target.hp())
                } else {
                    format!("{target_name} is already standing")
                }
            }
            EffectOutcome::MaxHpUp { amount } => {
                target.increase_max_hp(*amount);
                format!("{target_name}'s max HP rises by {amount}")
            }
            EffectOutcome::StatusAdded { status } => {
                if target.add_status(status) {
                    format!("{target_name} is {status}")
                } else {
                    format!("{target_name} is already {status}")
                }
            }
            EffectOutcome::StatusResisted { status } => {
                format!("{target_name} resists {status}")
            }
        };
        state.log.push(line);
    }

    let mut defeated = Vec::new();
    for (uid, alive_before) in was_alive {
        if alive_before && state.actor(uid).is_some_and(|a| !a.is_alive()) {
            let name = state.name_of(uid);
            state.log.push(format!("{name} is defeated"));
            match state.actor_mut(uid).and_then(|actor| {
                let broken = actor.break_revive_charm()?;
                Some((broken, actor.hp()))
            }) {
                Some((broken, hp)) => {
                    let line = format!("{name}'s {} breaks and {name} rises with {hp} HP", broken.name());
                    state.log.push(line);
                }
                None => defeated.push(uid),
            }
        }
    }
    defeated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::EffectHit;
    use crate::test_support::{actor, services};

    fn result(subject: u64, targets: &[u64], hits: Vec<EffectHit>) -> EffectResult {
        EffectResult {
            subject: Uid(subject),
            action_id: "attack".into(),
            action_name: "Attack".into(),
            script: "attack".into(),
            mp_cost: 0,
            targets: targets.iter().copied().map(Uid).collect(),
            hits,
        }
    }

    fn hit(target: u64, outcome: EffectOutcome) -> EffectHit {
        EffectHit {
            target: Uid(target),
            outcome,
        }
    }

    #[test]
    fn damage_knocks_out_and_logs() {
        let services = services();
        let mut state = BattleState::new(
            vec![actor(&services, "hero", 1, 1)],
            vec![actor(&services, "goblin", 2, 1)],
        );
        let result = result(
            1,
            &[2],
            vec![hit(
                2,
                EffectOutcome::Damage {
                    amount: 500,
                    critical: true,
                    guarded: false,
                },
            )],
        );

        let defeated = apply_result(&mut state, &services, &result);
        assert_eq!(defeated, vec![Uid(2)]);
        assert!(state.log.contains("Critical hit!"));
        assert!(state.log.contains("for 18 damage"));
        assert!(state.log.last().unwrap().ends_with("is defeated"));
    }

    #[test]
    fn revive_and_heal_apply_once() {
        let services = services();
        let mut fallen = actor(&services, "hero", 2, 1);
        fallen.take_damage(100);
        let mut state = BattleState::new(
            vec![actor(&services, "pixie", 1, 1), fallen],
            vec![actor(&services, "goblin", 3, 1)],
        );
        let result = result(
            1,
            &[2],
            vec![
                hit(2, EffectOutcome::Revive { hp: 15 }),
                hit(2, EffectOutcome::Heal { amount: 5 }),
            ],
        );

        let defeated = apply_result(&mut state, &services, &result);
        assert!(defeated.is_empty());
        assert_eq!(state.actor(Uid(2)).unwrap().hp(), 20);
    }

    #[test]
    fn mp_is_paid_and_status_sticks() {
        let services = services();
        let mut state = BattleState::new(
            vec![actor(&services, "hero", 1, 1)],
            vec![actor(&services, "goblin", 2, 1)],
        );
        let mut result = result(
            1,
            &[1],
            vec![hit(
                1,
                EffectOutcome::StatusAdded {
                    status: "guarding".into(),
                },
            )],
        );
        result.mp_cost = 3;

        apply_result(&mut state, &services, &result);
        let hero = state.actor(Uid(1)).unwrap();
        assert_eq!(hero.mp(), hero.mmp() - 3);
        assert!(hero.has_status("guarding"));
    }

    #[test]
    fn equipment_cheats_defeat() {
        let services = services();
        let equipment = services.equipment().unwrap();
        let mut doll = actor(&services, "hero", 2, 1);
        doll.equip(equipment.get("straw_doll").unwrap());
        let mut curio = actor(&services, "goblin", 3, 1);
        curio.equip(equipment.get("angel_curio").unwrap());
        let mut state = BattleState::new(vec![actor(&services, "pixie", 1, 1), doll], vec![curio]);

        let lethal = EffectOutcome::Damage {
            amount: 500,
            critical: false,
            guarded: false,
        };
        let result = result(1, &[2, 3], vec![hit(2, lethal.clone()), hit(3, lethal)]);

        let defeated = apply_result(&mut state, &services, &result);
        assert!(defeated.is_empty());
        assert_eq!(state.actor(Uid(2)).unwrap().hp(), 1);
        assert!(state.log.contains("Hero endures the blow"));

        let goblin = state.actor(Uid(3)).unwrap();
        assert_eq!(goblin.hp(), goblin.mhp());
        assert!(goblin.equipment().is_none());
        assert!(state.log.contains("Goblin's Angel Curio breaks"));
    }
}
