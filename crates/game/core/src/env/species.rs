use crate::inherit_fields;
use crate::registry::{Definition, DefinitionKind};
use crate::stats::StatKind;

use super::Element;

/// Behavioral disposition that drives automatic action selection.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Temperament {
    /// Heals hurt friends before attacking.
    Kind,
    /// Always attacks.
    Ruthless,
    /// Picks freely among its acts.
    #[default]
    Free,
    Selfish,
}

/// Raw species record. Every field except `id` may be inherited.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SpeciesDefinition {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(alias = "parent"))]
    pub inherits: Option<String>,

    pub name: Option<String>,
    pub description: Option<String>,
    pub race: Option<String>,
    pub temperament: Option<Temperament>,
    pub elements: Option<Vec<Element>>,
    pub passives: Option<Vec<String>>,

    pub base_hp: Option<u32>,
    pub base_mp: Option<u32>,
    pub base_atk: Option<u32>,
    pub base_def: Option<u32>,
    pub base_mat: Option<u32>,
    pub base_mdf: Option<u32>,
    pub base_agi: Option<u32>,

    pub hp_growth: Option<f64>,
    pub mp_growth: Option<f64>,
    pub atk_growth: Option<f64>,
    pub def_growth: Option<f64>,
    pub mat_growth: Option<f64>,
    pub mdf_growth: Option<f64>,
    pub agi_growth: Option<f64>,

    pub hit: Option<f64>,
    pub eva: Option<f64>,
    pub cri: Option<f64>,
    /// Flat bonus added to damage formulas.
    pub power: Option<f64>,
    /// Extra experience multiplier on victory.
    pub xp_rate: Option<f64>,

    /// Rows of alternative action ids, ordered by level band.
    pub acts: Option<Vec<Vec<String>>>,
}

impl SpeciesDefinition {
    pub const DEFAULT_HIT: f64 = 0.95;
    pub const DEFAULT_EVA: f64 = 0.05;
    pub const DEFAULT_CRI: f64 = 0.05;
    pub const DEFAULT_BASE_HP: u32 = 10;
    pub const DEFAULT_BASE_STAT: u32 = 100;
    pub const DEFAULT_BASE_AGI: u32 = 10;

    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn temperament(&self) -> Temperament {
        self.temperament.unwrap_or_default()
    }

    pub fn elements(&self) -> &[Element] {
        self.elements.as_deref().unwrap_or_default()
    }

    pub fn passives(&self) -> &[String] {
        self.passives.as_deref().unwrap_or_default()
    }

    pub fn acts(&self) -> &[Vec<String>] {
        self.acts.as_deref().unwrap_or_default()
    }

    /// Base value of `stat` at level 1.
    pub fn base(&self, stat: StatKind) -> u32 {
        match stat {
            StatKind::Mhp => self.base_hp.unwrap_or(Self::DEFAULT_BASE_HP),
            StatKind::Mmp => self.base_mp.unwrap_or(0),
            StatKind::Atk => self.base_atk.unwrap_or(Self::DEFAULT_BASE_STAT),
            StatKind::Def => self.base_def.unwrap_or(Self::DEFAULT_BASE_STAT),
            StatKind::Mat => self.base_mat.unwrap_or(Self::DEFAULT_BASE_STAT),
            StatKind::Mdf => self.base_mdf.unwrap_or(Self::DEFAULT_BASE_STAT),
            StatKind::Agi => self.base_agi.unwrap_or(Self::DEFAULT_BASE_AGI),
        }
    }

    /// Fractional per-level growth of `stat`; unset growth keeps the stat flat.
    pub fn growth(&self, stat: StatKind) -> f64 {
        match stat {
            StatKind::Mhp => self.hp_growth,
            StatKind::Mmp => self.mp_growth,
            StatKind::Atk => self.atk_growth,
            StatKind::Def => self.def_growth,
            StatKind::Mat => self.mat_growth,
            StatKind::Mdf => self.mdf_growth,
            StatKind::Agi => self.agi_growth,
        }
        .unwrap_or(0.0)
    }

    pub fn hit(&self) -> f64 {
        self.hit.unwrap_or(Self::DEFAULT_HIT)
    }

    pub fn eva(&self) -> f64 {
        self.eva.unwrap_or(Self::DEFAULT_EVA)
    }

    pub fn cri(&self) -> f64 {
        self.cri.unwrap_or(Self::DEFAULT_CRI)
    }

    pub fn power(&self) -> f64 {
        self.power.unwrap_or(0.0)
    }

    pub fn xp_rate(&self) -> f64 {
        self.xp_rate.unwrap_or(0.0)
    }

    /// Number of act rows usable at `level`: two rows, plus one per `band` levels.
    pub fn usable_row_count(&self, level: u32, band: u32) -> usize {
        let extra = level.saturating_sub(1) / band.max(1);
        let rows = 2usize.saturating_add(extra as usize);
        rows.min(self.acts().len())
    }

    /// Action ids usable at `level`, in row order, deduplicated.
    pub fn usable_acts(&self, level: u32, band: u32) -> Vec<&str> {
        let mut acts: Vec<&str> = Vec::new();
        for row in &self.acts()[..self.usable_row_count(level, band)] {
            for id in row {
                if !acts.contains(&id.as_str()) {
                    acts.push(id);
                }
            }
        }
        acts
    }

    /// Every action id referenced by any row.
    pub fn all_acts(&self) -> impl Iterator<Item = &str> {
        self.acts().iter().flatten().map(String::as_str)
    }
}

impl Definition for SpeciesDefinition {
    const KIND: DefinitionKind = DefinitionKind::Species;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn inherits(&self) -> Option<&str> {
        self.inherits.as_deref()
    }

    fn inherit_from(&mut self, parent: &Self) {
        inherit_fields!(self, parent;
            name, description, race, temperament, elements, passives,
            base_hp, base_mp, base_atk, base_def, base_mat, base_mdf, base_agi,
            hp_growth, mp_growth, atk_growth, def_growth, mat_growth, mdf_growth, agi_growth,
            hit, eva, cri, power, xp_rate, acts,
        );
    }

    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
