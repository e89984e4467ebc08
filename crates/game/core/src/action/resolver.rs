//! Pure action resolution.
//!
//! The resolver reads the subject, the targets, and the content registries,
//! rolls every random outcome from a seeded [`RollStream`], and returns an
//! [`EffectResult`]. It never mutates an actor; the battle manager applies the
//! result exactly once at the apply synchronization point.

use crate::config::BattleConfig;
use crate::env::{EffectSpec, RngSource, RollContext, RollStream, ScalingStat, Services};
use crate::registry::RegistryError;
use crate::stats::Actor;

use super::{ActionError, ActionObject, EffectHit, EffectOutcome, EffectResult};

fn floor_u32(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        value.floor() as u32
    }
}

/// Computes effects from definitions and actor stats.
pub struct ActionResolver<'a> {
    services: &'a Services,
    battle: &'a BattleConfig,
    rolls: RollStream<'a>,
}

impl<'a> ActionResolver<'a> {
    /// Creates a resolver whose rolls derive from `(seed, nonce)`.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::Service`] if configuration is not registered.
    pub fn new(
        services: &'a Services,
        rng: &'a dyn RngSource,
        seed: u64,
        nonce: u64,
    ) -> Result<Self, ActionError> {
        Ok(Self {
            services,
            battle: &services.config()?.battle,
            rolls: RollStream::new(rng, seed, nonce),
        })
    }

    /// Resolves `object` used by `subject` on `targets`.
    ///
    /// # Errors
    ///
    /// - [`ActionError::SubjectDown`] if the subject has no HP
    /// - [`ActionError::InsufficientMp`] if the subject cannot pay the MP cost
    /// - [`ActionError::NoTargets`] if `targets` is empty
    /// - [`ActionError::UnknownStatus`] if a status effect names an unknown status
    pub fn resolve(
        &mut self,
        subject: &Actor,
        object: &ActionObject,
        targets: &[&Actor],
    ) -> Result<EffectResult, ActionError> {
        if !subject.is_alive() {
            return Err(ActionError::SubjectDown(subject.uid()));
        }
        let mp_cost = object.mp_cost();
        if subject.mp() < mp_cost {
            return Err(ActionError::InsufficientMp {
                needed: mp_cost,
                available: subject.mp(),
            });
        }
        self.resolve_triggered(subject, object, targets)
    }

    /// Resolves an action fired by a passive trigger.
    ///
    /// Skips the subject's HP and MP checks, since a creature may cast as it
    /// falls. A fallen caster pays no MP.
    ///
    /// # Errors
    ///
    /// Same as [`ActionResolver::resolve`], minus the subject checks.
    pub fn resolve_triggered(
        &mut self,
        subject: &Actor,
        object: &ActionObject,
        targets: &[&Actor],
    ) -> Result<EffectResult, ActionError> {
        if targets.is_empty() {
            return Err(ActionError::NoTargets(object.id().to_owned()));
        }
        let mp_cost = if subject.is_alive() { object.mp_cost() } else { 0 };

        let mut hits = Vec::new();
        for target in targets {
            for _ in 0..object.repeat() {
                if object.is_damage() && target.is_alive() && self.evades(subject, target) {
                    hits.push(EffectHit {
                        target: target.uid(),
                        outcome: EffectOutcome::Miss,
                    });
                    continue;
                }
                for effect in object.effects() {
                    if let Some(outcome) = self.outcome(subject, target, object, effect)? {
                        hits.push(EffectHit {
                            target: target.uid(),
                            outcome,
                        });
                    }
                }
            }
        }

        tracing::debug!(
            subject = %subject.uid(),
            action = object.id(),
            hits = hits.len(),
            "resolved action"
        );

        Ok(EffectResult {
            subject: subject.uid(),
            action_id: object.id().to_owned(),
            action_name: object.name().to_owned(),
            script: object.script().to_owned(),
            mp_cost,
            targets: targets.iter().map(|target| target.uid()).collect(),
            hits,
        })
    }

    /// Evasion roll: the hit lands with probability `max(0, hit - eva)`.
    fn evades(&mut self, subject: &Actor, target: &Actor) -> bool {
        let chance = (subject.hit() - target.eva()).max(0.0);
        self.rolls.unit(target.uid().0, RollContext::Evade) >= chance
    }

    fn outcome(
        &mut self,
        subject: &Actor,
        target: &Actor,
        object: &ActionObject,
        effect: &EffectSpec,
    ) -> Result<Option<EffectOutcome>, ActionError> {
        if let EffectSpec::Revive(ratio) = effect {
            return Ok((!target.is_alive()).then(|| EffectOutcome::Revive {
                hp: floor_u32(f64::from(target.mhp()) * ratio).max(1),
            }));
        }
        if !target.is_alive() {
            return Ok(None);
        }

        let outcome = match effect {
            EffectSpec::HpDamage(formula) => self.damage(subject, target, object, formula)?,
            EffectSpec::HpHeal(formula) => {
                let stat = match object.stat() {
                    ScalingStat::Atk => subject.stats().atk,
                    ScalingStat::Mat => subject.stats().mat,
                };
                let base = formula.evaluate(subject, target).max(0.0);
                EffectOutcome::Heal {
                    amount: floor_u32(base * f64::from(stat) / 100.0),
                }
            }
            EffectSpec::HpHealRatio(ratio) => EffectOutcome::Heal {
                amount: floor_u32(f64::from(target.mhp()) * ratio),
            },
            EffectSpec::IncreaseMaxHp(amount) => EffectOutcome::MaxHpUp { amount: *amount },
            EffectSpec::AddStatus { status, chance } => {
                self.services
                    .statuses()?
                    .get(status)
                    .map_err(|err| match err {
                        RegistryError::NotFound { .. } => ActionError::UnknownStatus(status.clone()),
                        other => other.into(),
                    })?;
                if self.rolls.unit(target.uid().0, RollContext::Status) < *chance {
                    EffectOutcome::StatusAdded {
                        status: status.clone(),
                    }
                } else {
                    EffectOutcome::StatusResisted {
                        status: status.clone(),
                    }
                }
            }
            EffectSpec::Revive(_) => return Ok(None),
        };
        Ok(Some(outcome))
    }

    /// `(formula + power) * attack / defense`, element scaled, floored, then
    /// critical and damage-dividing statuses.
    fn damage(
        &mut self,
        subject: &Actor,
        target: &Actor,
        object: &ActionObject,
        formula: &crate::formula::Formula,
    ) -> Result<EffectOutcome, ActionError> {
        let (attack, defense) = match object.stat() {
            ScalingStat::Atk => (subject.stats().atk, target.stats().def),
            ScalingStat::Mat => (subject.stats().mat, target.stats().mdf),
        };

        let mut value = formula.evaluate(subject, target).max(0.0) + subject.power();
        value *= f64::from(attack) / f64::from(defense.max(1));

        if let Some(element) = object.element() {
            if subject.elements().contains(&element) {
                value *= self.battle.stab_multiplier;
            }
            value *= element.rate_against_all(
                target.elements(),
                self.battle.element_resist,
                self.battle.element_weak,
            );
        }

        let mut amount = floor_u32(value);
        let critical = self.rolls.unit(subject.uid().0, RollContext::Critical) < subject.cri();
        if critical {
            amount = floor_u32(f64::from(amount) * self.battle.crit_multiplier);
        }

        let divisor = self.damage_divisor(target)?;
        if divisor > 1 {
            amount /= divisor;
        }

        Ok(EffectOutcome::Damage {
            amount,
            critical,
            guarded: divisor > 1,
        })
    }

    /// Largest damage divisor among the target's active statuses.
    fn damage_divisor(&self, target: &Actor) -> Result<u32, ActionError> {
        let statuses = self.services.statuses()?;
        let mut divisor = 1;
        for id in target.statuses() {
            match statuses.get(id) {
                Ok(status) => divisor = divisor.max(status.damage_divisor()),
                Err(RegistryError::NotFound { .. }) => {
                    return Err(ActionError::UnknownStatus(id.clone()));
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(divisor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::lookup_action;
    use crate::env::PcgRng;
    use crate::stats::Uid;
    use crate::test_support::{actor, equipped, services};

    fn resolve(
        services: &Services,
        seed: u64,
        subject: &Actor,
        id: &str,
        targets: &[&Actor],
    ) -> Result<EffectResult, ActionError> {
        let object = lookup_action(services, id)?;
        let rng = PcgRng;
        ActionResolver::new(services, &rng, seed, 0)?.resolve(subject, &object, targets)
    }

    #[test]
    fn resolution_is_pure_and_deterministic() {
        let services = services();
        let hero = actor(&services, "hero", 1, 3);
        let goblin = actor(&services, "goblin", 2, 3);

        let first = resolve(&services, 9, &hero, "attack", &[&goblin]).unwrap();
        let second = resolve(&services, 9, &hero, "attack", &[&goblin]).unwrap();
        assert_eq!(first, second);
        assert_eq!(goblin.hp(), goblin.mhp(), "resolve never mutates");
    }

    #[test]
    fn damage_follows_formula_and_stat_ratio() {
        let services = services();
        let hero = actor(&services, "hero", 1, 3);
        let goblin = actor(&services, "goblin", 2, 1);

        // hero: hit 10.0 so it never misses, cri 0; atk 120 vs def 60.
        // (4 + 2 * 3) * 120 / 60 = 20
        let result = resolve(&services, 1, &hero, "attack", &[&goblin]).unwrap();
        assert_eq!(
            result.hits,
            vec![EffectHit {
                target: Uid(2),
                outcome: EffectOutcome::Damage {
                    amount: 20,
                    critical: false,
                    guarded: false
                }
            }]
        );
        assert_eq!(result.script, "attack");
    }

    #[test]
    fn guarding_halves_damage() {
        let services = services();
        let hero = actor(&services, "hero", 1, 3);
        let mut goblin = actor(&services, "goblin", 2, 1);
        goblin.add_status("guarding");

        let result = resolve(&services, 1, &hero, "attack", &[&goblin]).unwrap();
        assert_eq!(result.total_damage(), 10);
    }

    #[test]
    fn element_bonus_and_weakness() {
        let services = services();
        // hero carries element G; gust is a G skill; goblin is B.
        // 10 * 1 (mat 100 / mdf 100) * 1.25 stab * 1.25 weak = 15.625
        let hero = actor(&services, "hero", 1, 1);
        let goblin = actor(&services, "goblin", 2, 1);
        let result = resolve(&services, 1, &hero, "gust", &[&goblin]).unwrap();
        assert_eq!(result.total_damage(), 15);
    }

    #[test]
    fn certain_miss_short_circuits() {
        let services = services();
        let slime = actor(&services, "blind_slime", 1, 1);
        let goblin = actor(&services, "goblin", 2, 1);
        let result = resolve(&services, 3, &slime, "attack", &[&goblin]).unwrap();
        assert_eq!(result.hits.len(), 1);
        assert_eq!(result.hits[0].outcome, EffectOutcome::Miss);
    }

    #[test]
    fn heals_scale_with_stat() {
        let services = services();
        let pixie = actor(&services, "pixie", 1, 3);
        let mut hero = actor(&services, "hero", 2, 1);
        hero.take_damage(10);

        // (4 + 2 * 3) * mat 120 / 100 = 12
        let result = resolve(&services, 1, &pixie, "cure", &[&hero]).unwrap();
        assert_eq!(result.hits[0].outcome, EffectOutcome::Heal { amount: 12 });
    }

    #[test]
    fn revive_only_lands_on_the_fallen() {
        let services = services();
        let hero = actor(&services, "hero", 1, 1);
        let mut goblin = actor(&services, "goblin", 2, 1);

        let result = resolve(&services, 1, &hero, "revive_leaf", &[&goblin]).unwrap();
        assert!(result.hits.is_empty());

        goblin.take_damage(1000);
        let result = resolve(&services, 1, &hero, "revive_leaf", &[&goblin]).unwrap();
        assert_eq!(
            result.hits[0].outcome,
            EffectOutcome::Revive {
                hp: goblin.mhp() / 2
            }
        );
    }

    #[test]
    fn status_chance_of_one_always_lands() {
        let services = services();
        let hero = actor(&services, "hero", 1, 1);
        let result = resolve(&services, 1, &hero, "guard", &[&hero]).unwrap();
        assert_eq!(
            result.hits[0].outcome,
            EffectOutcome::StatusAdded {
                status: "guarding".into()
            }
        );
    }

    #[test]
    fn per_action_failures() {
        let services = services();
        let hero = actor(&services, "hero", 1, 1);
        let mut fallen = actor(&services, "goblin", 2, 1);

        assert_eq!(
            resolve(&services, 1, &hero, "warp", &[&fallen]).unwrap_err(),
            ActionError::UnknownAction("warp".into())
        );
        assert_eq!(
            resolve(&services, 1, &hero, "attack", &[]).unwrap_err(),
            ActionError::NoTargets("attack".into())
        );
        assert_eq!(
            resolve(&services, 1, &hero, "meteor", &[&fallen]).unwrap_err(),
            ActionError::InsufficientMp {
                needed: 99,
                available: hero.mp()
            }
        );
        assert_eq!(
            resolve(&services, 1, &hero, "hex", &[&fallen]).unwrap_err(),
            ActionError::UnknownStatus("doom".into())
        );

        fallen.take_damage(1000);
        assert_eq!(
            resolve(&services, 1, &fallen, "attack", &[&hero]).unwrap_err(),
            ActionError::SubjectDown(Uid(2))
        );
    }

    #[test]
    fn repeat_rolls_each_time() {
        let services = services();
        let hero = actor(&services, "hero", 1, 1);
        let goblin = actor(&services, "goblin", 2, 1);
        let result = resolve(&services, 1, &hero, "ray", &[&goblin]).unwrap();
        assert_eq!(result.hits.len(), 3);
        assert_eq!(result.total_damage(), 3 * 3);
    }

    #[test]
    fn equipment_feeds_power_element_and_crit() {
        let services = services();
        let goblin = actor(&services, "goblin", 2, 1);

        // The emblem turns the hero red: gust loses its same-element bonus
        // but gains 3 power. (10 + 3) * 1.25 weak = 16.25
        let hero = equipped(&services, "hero", 1, "mars_emblem");
        let result = resolve(&services, 1, &hero, "gust", &[&goblin]).unwrap();
        assert_eq!(result.total_damage(), 16);

        // (4 + 2) * 120 / 60 = 12, always critical with the foot: 18
        let lucky = equipped(&services, "hero", 1, "rabbits_foot");
        let result = resolve(&services, 1, &lucky, "attack", &[&goblin]).unwrap();
        assert_eq!(
            result.hits[0].outcome,
            EffectOutcome::Damage {
                amount: 18,
                critical: true,
                guarded: false
            }
        );
    }
}
