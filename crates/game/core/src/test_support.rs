//! In-code content shared by unit tests.

use std::sync::Arc;

use crate::config::GameConfig;
use crate::env::{
    CountRange, DungeonDefinition, DungeonRegistry, EffectSpec, Element, EncounterPool,
    EncounterTable, EquipmentDefinition, EquipmentRegistry, EquipmentTrait, EventRegistry,
    HealAmount, ItemDefinition, ItemRegistry, PassiveDefinition, PassiveRegistry, PassiveTrait,
    ScalingStat, Service, Services, SkillCategory, SkillDefinition, SkillRegistry,
    SpeciesDefinition, SpeciesRegistry, StatusDefinition, StatusExpiry, StatusRegistry,
    TargetPattern, Temperament,
};
use crate::formula::Formula;
use crate::stats::{Actor, Uid};

fn formula(source: &str) -> Formula {
    Formula::parse(source).unwrap()
}

fn skill(id: &str, effects: Vec<EffectSpec>) -> SkillDefinition {
    SkillDefinition {
        effects: Some(effects),
        script: Some(id.to_owned()),
        ..SkillDefinition::new(id)
    }
}

fn sure_hitter(id: &str) -> SpeciesDefinition {
    SpeciesDefinition {
        hit: Some(10.0),
        eva: Some(0.0),
        cri: Some(0.0),
        ..SpeciesDefinition::new(id)
    }
}

fn acts(rows: &[&[&str]]) -> Option<Vec<Vec<String>>> {
    Some(
        rows.iter()
            .map(|row| row.iter().map(|id| (*id).to_owned()).collect())
            .collect(),
    )
}

pub fn skills() -> SkillRegistry {
    [
        SkillDefinition {
            category: Some(SkillCategory::Damage),
            target: Some(TargetPattern::EnemySingle),
            ..SkillDefinition::new("default")
        },
        SkillDefinition {
            inherits: Some("default".into()),
            ..skill("attack", vec![EffectSpec::HpDamage(formula("4 + 2 * a.level"))])
        },
        SkillDefinition {
            category: Some(SkillCategory::Effect),
            target: Some(TargetPattern::User),
            ..skill(
                "guard",
                vec![EffectSpec::AddStatus {
                    status: "guarding".into(),
                    chance: 1.0,
                }],
            )
        },
        SkillDefinition {
            category: Some(SkillCategory::Heal),
            target: Some(TargetPattern::AllySingle),
            stat: Some(ScalingStat::Mat),
            element: Some(Element::W),
            ..skill("cure", vec![EffectSpec::HpHeal(formula("4 + 2 * a.level"))])
        },
        SkillDefinition {
            inherits: Some("default".into()),
            stat: Some(ScalingStat::Mat),
            element: Some(Element::G),
            ..skill("gust", vec![EffectSpec::HpDamage(formula("10"))])
        },
        SkillDefinition {
            inherits: Some("default".into()),
            repeat: Some(3),
            ..skill("ray", vec![EffectSpec::HpDamage(formula("2 + a.level"))])
        },
        SkillDefinition {
            inherits: Some("default".into()),
            mp_cost: Some(99),
            ..skill("meteor", vec![EffectSpec::HpDamage(formula("50"))])
        },
        SkillDefinition {
            inherits: Some("default".into()),
            ..skill(
                "hex",
                vec![EffectSpec::AddStatus {
                    status: "doom".into(),
                    chance: 1.0,
                }],
            )
        },
        SkillDefinition {
            target: Some(TargetPattern::EnemyAll),
            ..skill("blast", vec![EffectSpec::HpDamage(formula("5"))])
        },
    ]
    .into_iter()
    .collect()
}

pub fn items() -> ItemRegistry {
    [
        ItemDefinition {
            target: Some(TargetPattern::AllyFallen),
            effects: Some(vec![EffectSpec::Revive(0.5)]),
            ..ItemDefinition::new("revive_leaf")
        },
        ItemDefinition {
            effects: Some(vec![EffectSpec::HpHealRatio(0.3)]),
            ..ItemDefinition::new("potion")
        },
    ]
    .into_iter()
    .collect()
}

pub fn statuses() -> StatusRegistry {
    [StatusDefinition {
        name: Some("Guarding".into()),
        damage_divisor: Some(2),
        expires: Some(StatusExpiry::RoundStart),
        ..StatusDefinition::new("guarding")
    }]
    .into_iter()
    .collect()
}

pub fn equipment() -> EquipmentRegistry {
    let gear = |id: &str, name: &str, traits: Vec<EquipmentTrait>| EquipmentDefinition {
        name: Some(name.into()),
        traits: Some(traits),
        ..EquipmentDefinition::new(id)
    };
    [
        gear("straw_doll", "Straw Doll", vec![EquipmentTrait::SurviveKo]),
        gear(
            "angel_curio",
            "Angel Curio",
            vec![EquipmentTrait::ReviveOnKo(1.0)],
        ),
        gear(
            "mars_emblem",
            "Mars Emblem",
            vec![
                EquipmentTrait::PowerBonus(3.0),
                EquipmentTrait::ElementChange(Element::R),
            ],
        ),
        gear(
            "rabbits_foot",
            "Rabbit's Foot",
            vec![EquipmentTrait::CritBonus(1.0)],
        ),
        gear("golden_egg", "Golden Egg", vec![EquipmentTrait::XpBonus(0.5)]),
        gear("mercury_crest", "Mercury Crest", vec![EquipmentTrait::HpRegen(1)]),
        gear("hermes_boots", "Hermes' Boots", vec![EquipmentTrait::SpeedBonus(20)]),
    ]
    .into_iter()
    .collect()
}

pub fn passives() -> PassiveRegistry {
    let passive = |id: &str, traits: Vec<PassiveTrait>| PassiveDefinition {
        traits: Some(traits),
        ..PassiveDefinition::new(id)
    };
    [
        passive("regen", vec![PassiveTrait::TurnHeal(1)]),
        passive("exploder", vec![PassiveTrait::OnDeathCast("blast".into())]),
        passive("fly_high", vec![PassiveTrait::EvadeBonus]),
        passive(
            "soothing",
            vec![PassiveTrait::PostBattleHeal(HealAmount::Flat(2))],
        ),
        passive("leech", vec![PassiveTrait::PostBattleLeech(2)]),
    ]
    .into_iter()
    .collect()
}

pub fn creatures() -> SpeciesRegistry {
    [
        SpeciesDefinition {
            name: Some("Hero".into()),
            base_hp: Some(30),
            base_mp: Some(10),
            base_atk: Some(120),
            base_agi: Some(20),
            elements: Some(vec![Element::G]),
            temperament: Some(Temperament::Ruthless),
            acts: acts(&[&["attack"], &["guard"]]),
            ..sure_hitter("hero")
        },
        SpeciesDefinition {
            name: Some("Goblin".into()),
            base_hp: Some(18),
            hp_growth: Some(0.2),
            base_def: Some(60),
            base_agi: Some(5),
            elements: Some(vec![Element::B]),
            temperament: Some(Temperament::Selfish),
            acts: acts(&[&["attack"]]),
            ..sure_hitter("goblin")
        },
        SpeciesDefinition {
            name: Some("Pixie".into()),
            base_hp: Some(12),
            hp_growth: Some(0.15),
            base_mat: Some(120),
            base_agi: Some(15),
            elements: Some(vec![Element::G]),
            temperament: Some(Temperament::Kind),
            acts: acts(&[&["attack"], &["cure"]]),
            ..sure_hitter("pixie")
        },
        SpeciesDefinition {
            name: Some("Blind Slime".into()),
            hit: Some(0.0),
            acts: acts(&[&["attack"]]),
            ..SpeciesDefinition::new("blind_slime")
        },
        SpeciesDefinition {
            name: Some("Bomb".into()),
            base_hp: Some(1),
            base_agi: Some(1),
            passives: Some(vec!["exploder".into()]),
            acts: acts(&[&["attack"]]),
            ..sure_hitter("bomb")
        },
    ]
    .into_iter()
    .collect()
}

pub fn dungeons() -> DungeonRegistry {
    [DungeonDefinition {
        encounters: Some(EncounterTable {
            count: CountRange { min: 1, max: 3 },
            pools: vec![
                EncounterPool {
                    floors: (1, Some(2)),
                    enemies: vec!["goblin".into(), "pixie".into()],
                },
                EncounterPool {
                    floors: (3, None),
                    enemies: vec!["bomb".into()],
                },
            ],
            level_per_floor: 0.5,
        }),
        ..DungeonDefinition::new("default")
    }]
    .into_iter()
    .collect()
}

pub fn services_with(config: GameConfig) -> Services {
    Services::builder()
        .with(Service::Config(Arc::new(config)))
        .and_then(|b| b.with(Service::Statuses(Arc::new(statuses()))))
        .and_then(|b| b.with(Service::Equipment(Arc::new(equipment()))))
        .and_then(|b| b.with(Service::Passives(Arc::new(passives()))))
        .and_then(|b| b.with(Service::Skills(Arc::new(skills()))))
        .and_then(|b| b.with(Service::Items(Arc::new(items()))))
        .and_then(|b| b.with(Service::Creatures(Arc::new(creatures()))))
        .and_then(|b| b.with(Service::Dungeons(Arc::new(dungeons()))))
        .and_then(|b| b.with(Service::Events(Arc::new(EventRegistry::new()))))
        .unwrap()
        .build()
}

pub fn services() -> Services {
    services_with(GameConfig::default())
}

/// Like [`actor`], wearing the named equipment.
pub fn equipped(services: &Services, species: &str, uid: u64, gear: &str) -> Actor {
    let mut actor = actor(services, species, uid, 1);
    actor.equip(services.equipment().unwrap().get(gear).unwrap());
    actor
}

pub fn actor(services: &Services, species: &str, uid: u64, level: u32) -> Actor {
    let species = services.creatures().unwrap().get(species).unwrap();
    Actor::new(Uid(uid), species, level)
}
