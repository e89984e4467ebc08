//! Runtime combatant instance.

use std::fmt;
use std::sync::Arc;

use crate::env::{Element, EquipmentDefinition, SpeciesDefinition};
use crate::formula::{FormulaScope, FormulaVar};

use super::{ExpTable, StatBlock};

/// Unique combatant id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Uid(pub u64);

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic [`Uid`] source.
#[derive(Clone, Debug, Default)]
pub struct UidAllocator {
    next: u64,
}

impl UidAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts allocation at `first`, e.g. to keep enemy uids apart from party uids.
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    pub fn allocate(&mut self) -> Uid {
        let uid = Uid(self.next);
        self.next += 1;
        uid
    }
}

/// Stats captured before and after a level change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorSnapshot {
    pub level: u32,
    pub hp: u32,
    pub mp: u32,
    pub stats: StatBlock,
}

/// Level change produced by [`Actor::gain_exp`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelUp {
    pub before: ActorSnapshot,
    pub after: ActorSnapshot,
}

/// Level-scaled stats adjusted for worn equipment.
fn derive_stats(
    species: &SpeciesDefinition,
    equipment: Option<&EquipmentDefinition>,
    level: u32,
) -> StatBlock {
    let mut stats = StatBlock::derive(species, level);
    if let Some(equipment) = equipment {
        let mhp = (f64::from(stats.mhp) * (1.0 + equipment.hp_bonus())).round();
        stats.mhp = mhp.clamp(0.0, f64::from(u32::MAX)) as u32;
        stats.agi = stats.agi.saturating_add(equipment.speed_bonus());
    }
    stats
}

/// A living instance of a resolved species.
///
/// `hp` and `mp` are kept inside `[0, max]` by every mutator; derived stats
/// are recomputed whenever the level or the equipment changes.
#[derive(Clone, Debug)]
pub struct Actor {
    uid: Uid,
    species: Arc<SpeciesDefinition>,
    equipment: Option<Arc<EquipmentDefinition>>,
    level: u32,
    exp: u64,
    stats: StatBlock,
    bonus_mhp: u32,
    hp: u32,
    mp: u32,
    statuses: Vec<String>,
    evade_bonus: u32,
    /// Set once a `SurviveKo` wearer has endured a fatal blow this battle.
    endured_ko: bool,
    slot: usize,
}

impl Actor {
    /// Creates an actor at full HP and MP. Levels below 1 are raised to 1.
    pub fn new(uid: Uid, species: Arc<SpeciesDefinition>, level: u32) -> Self {
        let level = level.max(1);
        let stats = derive_stats(&species, None, level);
        Self {
            uid,
            species,
            equipment: None,
            level,
            exp: 0,
            stats,
            bonus_mhp: 0,
            hp: stats.mhp,
            mp: stats.mmp,
            statuses: Vec::new(),
            evade_bonus: 0,
            endured_ko: false,
            slot: 0,
        }
    }

    /// Creates an actor whose experience matches the threshold of `level`.
    pub fn with_table(
        uid: Uid,
        species: Arc<SpeciesDefinition>,
        level: u32,
        table: &ExpTable,
    ) -> Self {
        let level = level.clamp(1, table.max_level());
        let mut actor = Self::new(uid, species, level);
        actor.exp = table.exp_for_level(level);
        actor
    }

    pub fn uid(&self) -> Uid {
        self.uid
    }

    pub fn species(&self) -> &SpeciesDefinition {
        &self.species
    }

    pub fn species_arc(&self) -> &Arc<SpeciesDefinition> {
        &self.species
    }

    pub fn name(&self) -> &str {
        self.species.name()
    }

    pub fn equipment(&self) -> Option<&EquipmentDefinition> {
        self.equipment.as_deref()
    }

    /// Wears `equipment`, handing back whatever was worn before.
    pub fn equip(
        &mut self,
        equipment: Arc<EquipmentDefinition>,
    ) -> Option<Arc<EquipmentDefinition>> {
        let previous = self.equipment.replace(equipment);
        self.refresh_stats();
        previous
    }

    pub fn unequip(&mut self) -> Option<Arc<EquipmentDefinition>> {
        let previous = self.equipment.take();
        self.refresh_stats();
        previous
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn exp(&self) -> u64 {
        self.exp
    }

    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn mp(&self) -> u32 {
        self.mp
    }

    pub fn mhp(&self) -> u32 {
        self.stats.mhp.saturating_add(self.bonus_mhp)
    }

    pub fn mmp(&self) -> u32 {
        self.stats.mmp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Current HP as a fraction of max HP.
    pub fn hp_ratio(&self) -> f64 {
        match self.mhp() {
            0 => 0.0,
            mhp => f64::from(self.hp) / f64::from(mhp),
        }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn set_slot(&mut self, slot: usize) {
        self.slot = slot;
    }

    /// Species elements, unless the equipment replaces them.
    pub fn elements(&self) -> &[Element] {
        match self.equipment().and_then(EquipmentDefinition::element_change) {
            Some(element) => std::slice::from_ref(element),
            None => self.species.elements(),
        }
    }

    pub fn hit(&self) -> f64 {
        self.species.hit()
    }

    /// Evasion including the stacking bonus earned this battle.
    pub fn eva(&self) -> f64 {
        self.species.eva() + f64::from(self.evade_bonus) * 0.01
    }

    pub fn cri(&self) -> f64 {
        self.species.cri() + self.equipment().map_or(0.0, EquipmentDefinition::crit_bonus)
    }

    pub fn power(&self) -> f64 {
        self.species.power() + self.equipment().map_or(0.0, EquipmentDefinition::power_bonus)
    }

    /// Experience rate bonus from equipment, added to the species rate.
    pub fn xp_bonus(&self) -> f64 {
        self.equipment().map_or(0.0, EquipmentDefinition::xp_bonus)
    }

    /// HP regained whenever any creature acts, from equipment.
    pub fn hp_regen(&self) -> u32 {
        self.equipment().map_or(0, EquipmentDefinition::hp_regen)
    }

    pub fn snapshot(&self) -> ActorSnapshot {
        ActorSnapshot {
            level: self.level,
            hp: self.hp,
            mp: self.mp,
            stats: StatBlock {
                mhp: self.mhp(),
                ..self.stats
            },
        }
    }

    /// Moves to `level`, recomputing derived stats.
    ///
    /// Current HP/MP shift by the change in their maxima, then are clamped.
    pub fn set_level(&mut self, level: u32) {
        self.level = level.max(1);
        self.refresh_stats();
    }

    /// Recomputes derived stats, shifting current HP/MP by the change in
    /// their maxima. A living actor keeps at least 1 HP.
    fn refresh_stats(&mut self) {
        let old_mhp = self.mhp();
        let old_mmp = self.mmp();
        self.stats = derive_stats(&self.species, self.equipment.as_deref(), self.level);

        if self.hp > 0 {
            let hp = i64::from(self.hp) + i64::from(self.mhp()) - i64::from(old_mhp);
            self.hp = hp.clamp(1, i64::from(self.mhp().max(1))) as u32;
        }
        let mp = i64::from(self.mp) + i64::from(self.mmp()) - i64::from(old_mmp);
        self.mp = mp.clamp(0, i64::from(self.mmp())) as u32;
    }

    /// Adds experience and levels up as far as `table` allows.
    pub fn gain_exp(&mut self, amount: u64, table: &ExpTable) -> Option<LevelUp> {
        self.exp = self.exp.saturating_add(amount);
        let target = table.level_for_exp(self.exp);
        if target <= self.level {
            return None;
        }
        let before = self.snapshot();
        self.set_level(target);
        Some(LevelUp {
            before,
            after: self.snapshot(),
        })
    }

    /// Removes up to `amount` HP. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }

    /// Damage from an attack. A `SurviveKo` wearer keeps 1 HP from the first
    /// fatal blow of each battle.
    ///
    /// Returns the HP lost and whether the blow was endured.
    pub fn take_hit(&mut self, amount: u32) -> (u32, bool) {
        let endures = self.is_alive()
            && amount >= self.hp
            && !self.endured_ko
            && self.equipment().is_some_and(EquipmentDefinition::survives_ko);
        if endures {
            self.endured_ko = true;
            let lost = self.hp - 1;
            self.hp = 1;
            return (lost, true);
        }
        (self.take_damage(amount), false)
    }

    /// Revives a fallen `ReviveOnKo` wearer. The equipment breaks and is
    /// returned.
    pub fn break_revive_charm(&mut self) -> Option<Arc<EquipmentDefinition>> {
        if self.is_alive() {
            return None;
        }
        let ratio = self.equipment()?.revive_on_ko()?;
        let broken = self.unequip()?;
        let hp = (f64::from(self.mhp()) * ratio).floor().max(0.0) as u32;
        self.revive(hp);
        Some(broken)
    }

    /// Restores up to `amount` HP to a living actor. Returns the HP actually gained.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if !self.is_alive() {
            return 0;
        }
        let gained = amount.min(self.mhp() - self.hp);
        self.hp += gained;
        gained
    }

    /// Brings a fallen actor back with `amount` HP (at least 1).
    /// Returns false if the actor was alive.
    pub fn revive(&mut self, amount: u32) -> bool {
        if self.is_alive() || self.mhp() == 0 {
            return false;
        }
        self.hp = amount.clamp(1, self.mhp());
        true
    }

    /// Raises max HP permanently, healing by the same amount.
    pub fn increase_max_hp(&mut self, amount: u32) {
        self.bonus_mhp = self.bonus_mhp.saturating_add(amount);
        if self.is_alive() {
            self.hp = self.hp.saturating_add(amount).min(self.mhp());
        }
    }

    /// Pays `cost` MP. Returns false (and pays nothing) if short.
    pub fn spend_mp(&mut self, cost: u32) -> bool {
        if self.mp < cost {
            return false;
        }
        self.mp -= cost;
        true
    }

    pub fn restore_mp(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.mmp() - self.mp);
        self.mp += gained;
        gained
    }

    pub fn statuses(&self) -> &[String] {
        &self.statuses
    }

    pub fn has_status(&self, id: &str) -> bool {
        self.statuses.iter().any(|s| s == id)
    }

    /// Returns false if the status was already present.
    pub fn add_status(&mut self, id: &str) -> bool {
        if self.has_status(id) {
            return false;
        }
        self.statuses.push(id.to_owned());
        true
    }

    pub fn remove_status(&mut self, id: &str) -> bool {
        let before = self.statuses.len();
        self.statuses.retain(|s| s != id);
        self.statuses.len() != before
    }

    pub fn retain_statuses(&mut self, keep: impl FnMut(&String) -> bool) {
        self.statuses.retain(keep);
    }

    pub fn evade_bonus(&self) -> u32 {
        self.evade_bonus
    }

    /// Adds one evade stack, capped at `level / 2`. Returns true if it grew.
    pub fn stack_evade_bonus(&mut self) -> bool {
        let cap = self.level / 2;
        if self.evade_bonus >= cap {
            return false;
        }
        self.evade_bonus += 1;
        true
    }

    /// Clears per-battle state.
    pub fn end_battle(&mut self) {
        self.statuses.clear();
        self.evade_bonus = 0;
        self.endured_ko = false;
    }
}

impl FormulaScope for Actor {
    fn formula_value(&self, var: FormulaVar) -> f64 {
        f64::from(match var {
            FormulaVar::Level => self.level,
            FormulaVar::Hp => self.hp,
            FormulaVar::Mp => self.mp,
            FormulaVar::Mhp => self.mhp(),
            FormulaVar::Mmp => self.mmp(),
            FormulaVar::Atk => self.stats.atk,
            FormulaVar::Def => self.stats.def,
            FormulaVar::Mat => self.stats.mat,
            FormulaVar::Mdf => self.stats.mdf,
            FormulaVar::Agi => self.stats.agi,
        })
    }
}
