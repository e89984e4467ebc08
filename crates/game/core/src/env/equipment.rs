use crate::inherit_fields;
use crate::registry::{Definition, DefinitionKind};

use super::Element;

/// Bonus granted to whoever wears a piece of equipment.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EquipmentTrait {
    /// Flat damage added to every damaging action.
    PowerBonus(f64),
    /// Added to `agi`, so the wearer acts earlier in the round.
    SpeedBonus(u32),
    /// Replaces the wearer's elements.
    ElementChange(Element),
    /// Added to the critical hit rate.
    CritBonus(f64),
    /// Max HP is multiplied by `1 + bonus`, rounded.
    HpBonus(f64),
    /// The first fatal blow of each battle leaves the wearer at 1 HP.
    SurviveKo,
    /// On defeat the wearer revives with this share of max HP and the
    /// equipment breaks.
    ReviveOnKo(f64),
    /// Added to the experience rate after a victory.
    XpBonus(f64),
    /// Heals the wearer whenever any creature acts.
    HpRegen(u32),
}

/// Raw equipment record.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EquipmentDefinition {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(alias = "parent"))]
    pub inherits: Option<String>,

    pub name: Option<String>,
    pub description: Option<String>,
    /// Shop price in gold.
    pub cost: Option<u32>,
    pub traits: Option<Vec<EquipmentTrait>>,
}

impl EquipmentDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn cost(&self) -> u32 {
        self.cost.unwrap_or(0)
    }

    pub fn traits(&self) -> &[EquipmentTrait] {
        self.traits.as_deref().unwrap_or_default()
    }

    /// Sum of every `PowerBonus`.
    pub fn power_bonus(&self) -> f64 {
        self.sum(|t| match t {
            EquipmentTrait::PowerBonus(bonus) => Some(*bonus),
            _ => None,
        })
    }

    pub fn speed_bonus(&self) -> u32 {
        self.traits()
            .iter()
            .filter_map(|t| match t {
                EquipmentTrait::SpeedBonus(bonus) => Some(*bonus),
                _ => None,
            })
            .fold(0, u32::saturating_add)
    }

    pub fn crit_bonus(&self) -> f64 {
        self.sum(|t| match t {
            EquipmentTrait::CritBonus(bonus) => Some(*bonus),
            _ => None,
        })
    }

    pub fn hp_bonus(&self) -> f64 {
        self.sum(|t| match t {
            EquipmentTrait::HpBonus(bonus) => Some(*bonus),
            _ => None,
        })
    }

    pub fn xp_bonus(&self) -> f64 {
        self.sum(|t| match t {
            EquipmentTrait::XpBonus(bonus) => Some(*bonus),
            _ => None,
        })
    }

    pub fn hp_regen(&self) -> u32 {
        self.traits()
            .iter()
            .filter_map(|t| match t {
                EquipmentTrait::HpRegen(amount) => Some(*amount),
                _ => None,
            })
            .fold(0, u32::saturating_add)
    }

    /// The last `ElementChange`, if any.
    pub fn element_change(&self) -> Option<&Element> {
        self.traits().iter().rev().find_map(|t| match t {
            EquipmentTrait::ElementChange(element) => Some(element),
            _ => None,
        })
    }

    pub fn survives_ko(&self) -> bool {
        self.traits()
            .iter()
            .any(|t| matches!(t, EquipmentTrait::SurviveKo))
    }

    /// Largest `ReviveOnKo` share, if any.
    pub fn revive_on_ko(&self) -> Option<f64> {
        self.traits()
            .iter()
            .filter_map(|t| match t {
                EquipmentTrait::ReviveOnKo(ratio) => Some(*ratio),
                _ => None,
            })
            .reduce(f64::max)
    }

    fn sum(&self, pick: impl Fn(&EquipmentTrait) -> Option<f64>) -> f64 {
        self.traits().iter().filter_map(pick).sum()
    }
}

impl Definition for EquipmentDefinition {
    const KIND: DefinitionKind = DefinitionKind::Equipment;

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
        inherit_fields!(self, parent; name, description, cost, traits);
    }

    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
