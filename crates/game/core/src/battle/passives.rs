//! Passive trait triggers.

use crate::env::{HealAmount, PassiveTrait, RollContext, RollStream, Services};
use crate::stats::{Actor, Uid};

use super::BattleState;

/// Resolved traits of every passive the actor's species carries.
///
/// Passives that fail to resolve are skipped; the load-time integrity pass
/// reports them.
pub fn traits_of(services: &Services, actor: &Actor) -> Vec<PassiveTrait> {
    let Ok(passives) = services.passives() else {
        return Vec::new();
    };
    actor
        .species()
        .passives()
        .iter()
        .filter_map(|id| match passives.get(id) {
            Ok(passive) => Some(passive.traits().to_vec()),
            Err(err) => {
                tracing::warn!(actor = %actor.uid(), passive = %id, %err, "skipping passive");
                None
            }
        })
        .flatten()
        .collect()
}

pub fn has_evade_bonus(services: &Services, actor: &Actor) -> bool {
    traits_of(services, actor)
        .iter()
        .any(|t| matches!(t, PassiveTrait::EvadeBonus))
}

/// Heals every living holder of `TurnHeal`, and every wearer of `HpRegen`
/// equipment, after any creature acts.
pub(crate) fn on_turn(state: &mut BattleState, services: &Services) {
    let holders: Vec<(Uid, u32)> = state
        .combatants()
        .filter(|actor| actor.is_alive())
        .flat_map(|actor| {
            traits_of(services, actor)
                .into_iter()
                .filter_map(move |t| match t {
                    PassiveTrait::TurnHeal(amount) => Some((actor.uid(), amount)),
                    _ => None,
                })
                .chain((actor.hp_regen() > 0).then(|| (actor.uid(), actor.hp_regen())))
        })
        .collect();

    for (uid, amount) in holders {
        let Some(actor) = state.actor_mut(uid) else {
            continue;
        };
        let gained = actor.heal(amount);
        if gained > 0 {
            let line = format!("{} recovers {gained} HP", actor.name());
            state.log.push(line);
        }
    }
}

/// Skills to cast for each newly defeated holder of `OnDeathCast`.
pub(crate) fn death_casts(
    state: &BattleState,
    services: &Services,
    defeated: &[Uid],
) -> Vec<(Uid, String)> {
    defeated
        .iter()
        .filter_map(|uid| state.actor(*uid))
        .flat_map(|actor| {
            traits_of(services, actor)
                .into_iter()
                .filter_map(move |t| match t {
                    PassiveTrait::OnDeathCast(skill) => Some((actor.uid(), skill)),
                    _ => None,
                })
        })
        .collect()
}

/// Post-battle heal and leech for surviving allies.
///
/// Leeching never knocks a neighbour out; it stops at 1 HP.
pub(crate) fn after_battle(state: &mut BattleState, services: &Services, rolls: &mut RollStream<'_>) {
    let survivors: Vec<(Uid, usize, u32, Vec<PassiveTrait>)> = state
        .allies
        .iter()
        .filter(|actor| actor.is_alive())
        .map(|actor| {
            (
                actor.uid(),
                actor.slot(),
                actor.level(),
                traits_of(services, actor),
            )
        })
        .collect();

    for (uid, slot, level, traits) in survivors {
        for t in traits {
            match t {
                PassiveTrait::PostBattleHeal(amount) => {
                    let amount = match amount {
                        HealAmount::Flat(amount) => amount,
                        HealAmount::Level => {
                            let roll = rolls.unit(uid.0, RollContext::PassiveHeal);
                            (roll * roll * f64::from(level)).floor() as u32 + 1
                        }
                    };
                    if let Some(actor) = state.actor_mut(uid) {
                        let gained = actor.heal(amount);
                        if gained > 0 {
                            let line = format!("{} recovers {gained} HP", actor.name());
                            state.log.push(line);
                        }
                    }
                }
                PassiveTrait::PostBattleLeech(amount) => {
                    let mut drained = 0;
                    for neighbour in state.allies.iter_mut().filter(|a| {
                        a.is_alive() && a.uid() != uid && a.slot().abs_diff(slot) == 1
                    }) {
                        let bite = amount.min(neighbour.hp().saturating_sub(1));
                        drained += neighbour.take_damage(bite);
                    }
                    if let Some(actor) = state.actor_mut(uid) {
                        let gained = actor.heal(drained / 2);
                        let line = format!(
                            "{} drains {drained} HP from its neighbours and recovers {gained} HP",
                            actor.name()
                        );
                        state.log.push(line);
                    }
                }
                PassiveTrait::TurnHeal(_) | PassiveTrait::EvadeBonus | PassiveTrait::OnDeathCast(_) => {}
            }
        }
    }
}
