//! Pure description of a resolved action.
//!
//! An [`EffectResult`] is computed by the resolver and carried unchanged to
//! the apply step. Nothing in here touches an actor.

use crate::stats::Uid;

/// What one effect roll does to one target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectOutcome {
    /// The target evaded; the remaining effects of this repetition are skipped.
    Miss,
    Damage {
        amount: u32,
        critical: bool,
        /// A damage-dividing status reduced the hit.
        guarded: bool,
    },
    Heal { amount: u32 },
    Revive { hp: u32 },
    MaxHpUp { amount: u32 },
    StatusAdded { status: String },
    StatusResisted { status: String },
}

/// One outcome on one target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectHit {
    pub target: Uid,
    pub outcome: EffectOutcome,
}

/// Everything the apply step needs to mutate state exactly once.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectResult {
    pub subject: Uid,
    pub action_id: String,
    pub action_name: String,
    /// Animation script id, opaque to the rules.
    pub script: String,
    pub mp_cost: u32,
    /// Every target the action was aimed at, including ones that ended up unaffected.
    pub targets: Vec<Uid>,
    pub hits: Vec<EffectHit>,
}

impl EffectResult {
    /// Total damage dealt across every hit.
    pub fn total_damage(&self) -> u32 {
        self.hits
            .iter()
            .map(|hit| match hit.outcome {
                EffectOutcome::Damage { amount, .. } => amount,
                _ => 0,
            })
            .sum()
    }

    /// Hits that landed on `target`.
    pub fn hits_on(&self, target: Uid) -> impl Iterator<Item = &EffectOutcome> {
        self.hits
            .iter()
            .filter(move |hit| hit.target == target)
            .map(|hit| &hit.outcome)
    }
}
