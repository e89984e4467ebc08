//! Automatic action selection for enemies and auto-battling allies.

use crate::action::{ActionObject, lookup_action, select_targets};
use crate::env::{RollContext, RollStream, Services, SkillCategory, Temperament};
use crate::stats::{Actor, Uid};

use super::BattleState;

/// An action picked by the policy.
#[derive(Clone, Debug, PartialEq)]
pub struct PolicyChoice {
    pub object: ActionObject,
    pub targets: Vec<Uid>,
}

/// Picks an action for `subject`.
///
/// Kind creatures heal the most hurt friend below the configured threshold
/// when they know a heal; ruthless ones stick to damage; everyone else picks
/// at random among the usable acts. Acts that fail to resolve, cost more MP
/// than the subject has, or find no target are skipped. Returns `None` when
/// nothing is usable.
pub fn choose_action(
    services: &Services,
    state: &BattleState,
    subject: &Actor,
    rolls: &mut RollStream<'_>,
) -> Option<PolicyChoice> {
    let config = services.config().ok()?;
    let side = state.side_of(subject.uid())?;
    let (friends, foes) = state.sides_for(side);
    let row_size = config.battle.ally_first_row_size;

    let mut candidates: Vec<ActionObject> = subject
        .species()
        .usable_acts(subject.level(), config.battle.act_band_interval)
        .into_iter()
        .filter_map(|id| match lookup_action(services, id) {
            Ok(object) => Some(object),
            Err(err) => {
                tracing::warn!(actor = %subject.uid(), action = id, %err, "skipping unusable act");
                None
            }
        })
        .filter(|object| object.mp_cost() <= subject.mp())
        .collect();

    let someone_hurt = |threshold: f64| {
        friends
            .iter()
            .any(|friend| friend.is_alive() && friend.hp_ratio() < threshold)
    };

    match subject.species().temperament() {
        Temperament::Kind if someone_hurt(config.battle.kind_heal_threshold) => {
            let heals: Vec<ActionObject> = candidates
                .iter()
                .filter(|object| object.category() == SkillCategory::Heal)
                .cloned()
                .collect();
            if !heals.is_empty() {
                candidates = heals;
            }
        }
        Temperament::Ruthless => {
            let attacks: Vec<ActionObject> = candidates
                .iter()
                .filter(|object| object.category() == SkillCategory::Damage)
                .cloned()
                .collect();
            if !attacks.is_empty() {
                candidates = attacks;
            }
        }
        _ => {}
    }

    // Nobody needs healing: leave heals for later.
    if !someone_hurt(1.0) {
        let non_heals: Vec<ActionObject> = candidates
            .iter()
            .filter(|object| object.category() != SkillCategory::Heal)
            .cloned()
            .collect();
        if !non_heals.is_empty() {
            candidates = non_heals;
        }
    }

    while !candidates.is_empty() {
        let pick = rolls.index(subject.uid().0, RollContext::Policy, candidates.len());
        let object = candidates.swap_remove(pick);
        let targets = select_targets(object.target(), subject, friends, foes, row_size, rolls);
        if !targets.is_empty() {
            return Some(PolicyChoice { object, targets });
        }
    }
    None
}
