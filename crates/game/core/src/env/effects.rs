use crate::formula::Formula;

/// One effect applied to each target of a skill or item.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectSpec {
    /// Damage scaled by the attack/defense ratio, elements, crits and guarding.
    HpDamage(Formula),
    /// Heal of `formula * stat / 100`.
    HpHeal(Formula),
    /// Heal a fraction of the target's max HP.
    HpHealRatio(f64),
    /// Revive a fallen target at a fraction of max HP.
    Revive(f64),
    /// Permanently raise the target's max HP.
    IncreaseMaxHp(u32),
    /// Apply a status with the given probability.
    AddStatus { status: String, chance: f64 },
}

impl EffectSpec {
    /// Damaging effects are subject to the evasion check.
    pub const fn is_damage(&self) -> bool {
        matches!(self, Self::HpDamage(_))
    }

    pub const fn is_heal(&self) -> bool {
        matches!(self, Self::HpHeal(_) | Self::HpHealRatio(_) | Self::Revive(_))
    }

    /// Status id referenced by this effect, if any.
    pub fn status(&self) -> Option<&str> {
        match self {
            Self::AddStatus { status, .. } => Some(status),
            _ => None,
        }
    }
}
