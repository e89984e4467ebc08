//! Load-time data integrity pass.
//!
//! Cross-references every content table and reports all dangling references
//! in one batch, so a broken data set is fixed in one go instead of one
//! startup failure at a time.

use std::fmt;

use game_core::env::PassiveTrait;
use game_core::{
    ActionError, DefinitionKind, ErrorSeverity, GameError, RegistryError,
    ServiceName, Services, lookup_action,
};

/// A single dangling reference or broken inheritance chain.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityViolation {
    #[error("species '{species}' lists unknown action '{action}'")]
    UnknownAction { species: String, action: String },

    /// The id names both a skill and an item, so the species' choice is
    /// unclear.
    #[error("species '{species}' lists action '{action}' found in both skills and items")]
    AmbiguousAction { species: String, action: String },

    #[error("species '{species}' lists unknown passive '{passive}'")]
    UnknownPassive { species: String, passive: String },

    #[error("{kind} '{owner}' adds unknown status '{status}'")]
    UnknownStatus {
        kind: DefinitionKind,
        owner: String,
        status: String,
    },

    #[error("passive '{passive}' casts unknown skill '{skill}' on death")]
    UnknownDeathCast { passive: String, skill: String },

    #[error("dungeon '{dungeon}' spawns unknown species '{species}'")]
    UnknownSpecies { dungeon: String, species: String },

    #[error("event '{event}' stocks unknown item '{item}'")]
    UnknownItem { event: String, item: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Every violation found by [`check`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub struct IntegrityReport {
    pub violations: Vec<IntegrityViolation>,
}

impl fmt::Display for IntegrityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} content integrity violation(s)", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "\n  - {violation}")?;
        }
        Ok(())
    }
}

impl GameError for IntegrityReport {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        "CONTENT_INTEGRITY"
    }
}

/// Checks every cross-reference between registered content tables.
///
/// Tables that are not registered are skipped. Resolution failures (cycles,
/// missing parents) are reported once per offending entry.
pub fn check(services: &Services) -> Result<(), IntegrityReport> {
    let mut violations = Vec::new();

    for name in [
        ServiceName::Statuses,
        ServiceName::Equipment,
        ServiceName::Passives,
        ServiceName::Skills,
        ServiceName::Items,
        ServiceName::Creatures,
        ServiceName::Dungeons,
        ServiceName::Events,
    ] {
        if let Ok(registry) = services.registry(name)
            && let Err(errors) = registry.resolve_all()
        {
            violations.extend(errors.into_iter().map(IntegrityViolation::Registry));
        }
    }

    check_species(services, &mut violations);
    check_statuses(services, &mut violations);
    check_passives(services, &mut violations);
    check_dungeons(services, &mut violations);
    check_events(services, &mut violations);

    if violations.is_empty() {
        tracing::debug!("content integrity check passed");
        Ok(())
    } else {
        Err(IntegrityReport { violations })
    }
}

fn check_species(services: &Services, violations: &mut Vec<IntegrityViolation>) {
    let Ok(creatures) = services.creatures() else {
        return;
    };
    let passives = services.passives().ok();
    let skills = services.skills().ok();
    let items = services.items().ok();

    for id in creatures.ids() {
        let Ok(species) = creatures.get(id) else {
            continue;
        };
        for action in species.all_acts() {
            if let Err(ActionError::UnknownAction(_)) = lookup_action(services, action) {
                violations.push(IntegrityViolation::UnknownAction {
                    species: id.to_owned(),
                    action: action.to_owned(),
                });
            }
            if let (Some(skills), Some(items)) = (skills, items)
                && skills.contains(action)
                && items.contains(action)
            {
                violations.push(IntegrityViolation::AmbiguousAction {
                    species: id.to_owned(),
                    action: action.to_owned(),
                });
            }
        }
        if let Some(passives) = passives {
            for passive in species.passives() {
                if !passives.contains(passive) {
                    violations.push(IntegrityViolation::UnknownPassive {
                        species: id.to_owned(),
                        passive: passive.clone(),
                    });
                }
            }
        }
    }
}

fn check_statuses(services: &Services, violations: &mut Vec<IntegrityViolation>) {
    let Ok(statuses) = services.statuses() else {
        return;
    };
    let mut report = |kind, owner: &str, status: &str| {
        if !statuses.contains(status) {
            violations.push(IntegrityViolation::UnknownStatus {
                kind,
                owner: owner.to_owned(),
                status: status.to_owned(),
            });
        }
    };

    if let Ok(skills) = services.skills() {
        for id in skills.ids() {
            if let Ok(skill) = skills.get(id) {
                for status in skill.effects().iter().filter_map(|effect| effect.status()) {
                    report(DefinitionKind::Skill, id, status);
                }
            }
        }
    }
    if let Ok(items) = services.items() {
        for id in items.ids() {
            if let Ok(item) = items.get(id) {
                for status in item.effects().iter().filter_map(|effect| effect.status()) {
                    report(DefinitionKind::Item, id, status);
                }
            }
        }
    }
}

fn check_passives(services: &Services, violations: &mut Vec<IntegrityViolation>) {
    let Ok(passives) = services.passives() else {
        return;
    };
    for id in passives.ids() {
        let Ok(passive) = passives.get(id) else {
            continue;
        };
        for t in passive.traits() {
            if let PassiveTrait::OnDeathCast(skill) = t
                && matches!(
                    lookup_action(services, skill),
                    Err(ActionError::UnknownAction(_))
                )
            {
                violations.push(IntegrityViolation::UnknownDeathCast {
                    passive: id.to_owned(),
                    skill: skill.clone(),
                });
            }
        }
    }
}

fn check_dungeons(services: &Services, violations: &mut Vec<IntegrityViolation>) {
    let (Ok(dungeons), Ok(creatures)) = (services.dungeons(), services.creatures()) else {
        return;
    };
    for id in dungeons.ids() {
        let Ok(dungeon) = dungeons.get(id) else {
            continue;
        };
        let mut seen = Vec::new();
        for species in dungeon.all_enemies() {
            if !creatures.contains(species) && !seen.contains(&species) {
                seen.push(species);
                violations.push(IntegrityViolation::UnknownSpecies {
                    dungeon: id.to_owned(),
                    species: species.to_owned(),
                });
            }
        }
    }
}

fn check_events(services: &Services, violations: &mut Vec<IntegrityViolation>) {
    let (Ok(events), Ok(items)) = (services.events(), services.items()) else {
        return;
    };
    for id in events.ids() {
        let Ok(event) = events.get(id) else {
            continue;
        };
        for item in event.stock_items() {
            if !items.contains(item) {
                violations.push(IntegrityViolation::UnknownItem {
                    event: id.to_owned(),
                    item: item.to_owned(),
                });
            }
        }
    }
}
