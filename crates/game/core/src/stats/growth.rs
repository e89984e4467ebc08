//! Level-scaled stats derived from a resolved species.
//!
//! `stat(level) = floor(base * (1 + growth * (level - 1)))`, applied to each
//! stat independently. A growth of 0 keeps the stat flat.

use crate::env::SpeciesDefinition;

/// Level-scaled stat identifiers.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter, strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatKind {
    Mhp,
    Mmp,
    Atk,
    Def,
    Mat,
    Mdf,
    Agi,
}

/// Scales `base` to `level`. Levels below 1 are treated as 1.
pub fn scaled_stat(base: u32, growth: f64, level: u32) -> u32 {
    let steps = f64::from(level.max(1) - 1);
    let value = (f64::from(base) * (1.0 + growth * steps)).floor();
    if value <= 0.0 {
        0
    } else if value >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        value as u32
    }
}

/// Derived stats of a creature at one level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBlock {
    pub mhp: u32,
    pub mmp: u32,
    pub atk: u32,
    pub def: u32,
    pub mat: u32,
    pub mdf: u32,
    pub agi: u32,
}

impl StatBlock {
    /// Computes every stat of `species` at `level`.
    pub fn derive(species: &SpeciesDefinition, level: u32) -> Self {
        let stat = |kind| scaled_stat(species.base(kind), species.growth(kind), level);
        Self {
            mhp: stat(StatKind::Mhp),
            mmp: stat(StatKind::Mmp),
            atk: stat(StatKind::Atk),
            def: stat(StatKind::Def),
            mat: stat(StatKind::Mat),
            mdf: stat(StatKind::Mdf),
            agi: stat(StatKind::Agi),
        }
    }

    pub const fn get(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::Mhp => self.mhp,
            StatKind::Mmp => self.mmp,
            StatKind::Atk => self.atk,
            StatKind::Def => self.def,
            StatKind::Mat => self.mat,
            StatKind::Mdf => self.mdf,
            StatKind::Agi => self.agi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_growth_ignores_level() {
        let goblin = SpeciesDefinition {
            base_hp: Some(18),
            hp_growth: Some(0.0),
            ..SpeciesDefinition::new("goblin")
        };
        assert_eq!(StatBlock::derive(&goblin, 1).mhp, 18);
        assert_eq!(StatBlock::derive(&goblin, 40).mhp, 18);
    }

    #[test]
    fn growth_is_floored() {
        // 12 * (1 + 0.15 * 2) = 15.6
        assert_eq!(scaled_stat(12, 0.15, 3), 15);
        assert_eq!(scaled_stat(18, 0.2, 1), 18);
        assert_eq!(scaled_stat(18, 0.2, 2), 21);
        assert_eq!(scaled_stat(5, 0.0, 0), 5);
    }

    #[test]
    fn derivation_is_pure() {
        let pixie = SpeciesDefinition {
            base_hp: Some(12),
            hp_growth: Some(0.15),
            base_mat: Some(120),
            ..SpeciesDefinition::new("pixie")
        };
        assert_eq!(StatBlock::derive(&pixie, 7), StatBlock::derive(&pixie, 7));
        assert_eq!(StatBlock::derive(&pixie, 7).get(StatKind::Mat), 120);
    }
}
