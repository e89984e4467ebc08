//! Tunable rule constants.
//!
//! Every field has a default so a partial `config.toml` only needs to name the
//! values it changes.

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GameConfig {
    /// Experience curve used to build the level table.
    pub exp_curve: ExpCurveConfig,
    /// Highest reachable level.
    pub max_level: u32,
    pub battle: BattleConfig,
    pub rewards: RewardConfig,
}

impl GameConfig {
    pub const DEFAULT_MAX_LEVEL: u32 = 99;

    pub fn new() -> Self {
        Self {
            exp_curve: ExpCurveConfig::default(),
            max_level: Self::DEFAULT_MAX_LEVEL,
            battle: BattleConfig::default(),
            rewards: RewardConfig::default(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// `exp_for_level(l) = round(base * (l - 1) ^ exponent)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ExpCurveConfig {
    pub base: f64,
    pub exponent: f64,
}

impl Default for ExpCurveConfig {
    fn default() -> Self {
        Self {
            base: 100.0,
            exponent: 1.1,
        }
    }
}

/// Combat resolution constants.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct BattleConfig {
    /// Damage multiplier on a critical hit.
    pub crit_multiplier: f64,
    /// Bonus when the action element matches one of the subject's elements.
    pub stab_multiplier: f64,
    /// Rate against a target sharing the action element.
    pub element_resist: f64,
    /// Rate against a target the action element is strong against.
    pub element_weak: f64,
    /// Slots below this index form the front row.
    pub ally_first_row_size: usize,
    /// Kind creatures prefer healing a friend below this HP ratio.
    pub kind_heal_threshold: f64,
    /// Levels per additional usable act row.
    pub act_band_interval: u32,
    /// Rounds after which a stalled encounter is abandoned.
    pub max_rounds: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            crit_multiplier: 1.5,
            stab_multiplier: 1.25,
            element_resist: 0.75,
            element_weak: 1.25,
            ally_first_row_size: 3,
            kind_heal_threshold: 0.6,
            act_band_interval: 5,
            max_rounds: 200,
        }
    }
}

/// Victory settlement constants.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct RewardConfig {
    pub base_xp_per_enemy: u32,
    pub base_gold_per_enemy: u32,
    /// Fraction of max HP restored to surviving allies after a win.
    pub post_battle_heal_ratio: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            base_xp_per_enemy: 5,
            base_gold_per_enemy: 20,
            post_battle_heal_ratio: 0.25,
        }
    }
}
