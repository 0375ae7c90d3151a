//! The character aggregate and its synchronization engine.
//!
//! `Character` composes the ability, proficiency, class, combat, and
//! spellcasting state into one record and exposes every derived number
//! and mutation the rest of a character-management application needs.
//! The reconciliation operations (`sync_spell_slots`, `sync_hit_dice`,
//! `sync_with_ruleset`) are idempotent: they recompute derived resource
//! pools from the current class composition while preserving in-progress
//! consumption, so calling them after every mutation is a safe
//! discipline.
//!
//! All authoritative class data comes from a `RulesetProvider` passed
//! explicitly into each operation that needs it; the engine holds no
//! ambient ruleset state.

use crate::ability::{proficiency_bonus, Ability, AbilityScores};
use crate::class_levels::{ClassLevelEntry, ClassLevels};
use crate::combat::Combat;
use crate::error::SheetError;
use crate::feature::{CustomStat, Feature, Recharge, StatBonus};
use crate::hit_dice::{Die, HitDicePool};
use crate::ruleset::{CasterType, HpMethod, RulesetProvider};
use crate::skill::{skill_modifier, Proficiencies, Skill};
use crate::spellcasting::{SpellSlot, Spellcasting};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Outcome of a multiclass eligibility check.
///
/// A failed check is an expected, recoverable condition the caller
/// branches on, so it is a value rather than an error: `allowed` is
/// false and `reason` names the first unmet prerequisite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MulticlassCheck {
    pub allowed: bool,
    pub reason: String,
}

impl MulticlassCheck {
    fn allow(reason: impl Into<String>) -> Self {
        Self {
            allowed: true,
            reason: reason.into(),
        }
    }

    fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: reason.into(),
        }
    }
}

/// Summary of an applied level-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    /// The class that gained the level.
    pub class_name: String,
    /// That class's level after the increase.
    pub class_level: u32,
    pub total_level: u32,
    pub hp_gained: i32,
    pub new_max_hp: i32,
}

/// A complete character record.
///
/// Created once and mutated in place; reconciliation operations replace
/// internal pools, never the aggregate itself. The whole record derives
/// `Serialize`/`Deserialize`, so persistence layers can store it in any
/// format without the engine knowing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub classes: ClassLevels,
    pub abilities: AbilityScores,
    pub proficiencies: Proficiencies,
    pub combat: Combat,
    pub spellcasting: Spellcasting,
    pub features: Vec<Feature>,
    pub custom_stats: Vec<CustomStat>,
    pub stat_bonuses: Vec<StatBonus>,
}

impl Character {
    /// A new character with default state (Fighter 1, all scores 10).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A new level-1 character of the given class, seeded with the
    /// class's saves, proficiencies, and spellcasting ability, then
    /// fully synchronized. Unknown classes fall back to Fighter.
    pub fn with_class(
        name: impl Into<String>,
        class_name: &str,
        rules: &dyn RulesetProvider,
    ) -> Self {
        let class_name = if rules.class_definition(class_name).is_some() {
            class_name
        } else {
            "Fighter"
        };
        let mut character = Self::new(name);
        character.classes = ClassLevels::new(ClassLevelEntry {
            name: class_name.to_string(),
            subclass: None,
            level: 1,
        });

        if let Some(def) = rules.class_definition(class_name) {
            character.proficiencies.saving_throws = def.saving_throws.iter().copied().collect();
            character.proficiencies.weapons = def.weapon_proficiencies.clone();
            character.proficiencies.armor = def.armor_proficiencies.clone();
            character.proficiencies.tools = def.tool_proficiencies.clone();
            character.spellcasting.ability = def.spellcasting_ability;
            if let Ok(die) = Die::new(def.hit_die) {
                character.combat.hit_dice.die = die;
            }
        }

        character.sync_with_ruleset(rules, true);
        character
    }

    /// Total character level across all classes.
    pub fn total_level(&self) -> u32 {
        self.classes.total_level()
    }

    /// Proficiency bonus derived from the total level.
    pub fn proficiency_bonus(&self) -> i32 {
        proficiency_bonus(self.total_level())
    }

    /// Modifier for a skill check: governing ability modifier plus the
    /// proficiency bonus once or twice depending on training.
    pub fn skill_modifier(&self, skill: Skill) -> i32 {
        skill_modifier(
            self.abilities.modifier_of(skill.ability()),
            self.proficiency_bonus(),
            self.proficiencies.skill_proficiency(skill),
        )
    }

    /// Modifier for a saving throw.
    pub fn save_modifier(&self, ability: Ability) -> i32 {
        let base = self.abilities.modifier_of(ability);
        if self.proficiencies.is_proficient_save(ability) {
            base + self.proficiency_bonus()
        } else {
            base
        }
    }

    /// Initiative modifier: Dexterity modifier plus any flat bonus.
    pub fn initiative(&self) -> i32 {
        self.abilities.modifier_of(Ability::Dexterity) + self.combat.initiative_bonus
    }

    /// Passive Perception: 10 + Perception skill modifier.
    pub fn passive_perception(&self) -> i32 {
        10 + self.skill_modifier(Skill::Perception)
    }

    /// Spell save DC, defined only when a casting ability is set.
    pub fn spell_save_dc(&self) -> Option<i32> {
        let ability = self.spellcasting.ability?;
        Some(
            self.spellcasting
                .spell_save_dc(self.abilities.modifier_of(ability), self.proficiency_bonus()),
        )
    }

    /// Spell attack bonus, defined only when a casting ability is set.
    pub fn spell_attack_bonus(&self) -> Option<i32> {
        let ability = self.spellcasting.ability?;
        Some(
            self.spellcasting
                .spell_attack_bonus(self.abilities.modifier_of(ability), self.proficiency_bonus()),
        )
    }

    /// Apply damage: temporary HP absorbs first, the rest comes out of
    /// current HP, floored at 0.
    pub fn take_damage(&mut self, amount: i32) {
        let mut amount = amount.max(0);
        let hp = &mut self.combat.hit_points;
        if hp.temporary > 0 {
            let absorbed = hp.temporary.min(amount);
            hp.temporary -= absorbed;
            amount -= absorbed;
        }
        hp.current = (hp.current - amount).max(0);
    }

    /// Heal, capped at maximum. A character brought above 0 HP has
    /// their death save counters reset.
    pub fn heal(&mut self, amount: i32) {
        let hp = &mut self.combat.hit_points;
        hp.current = (hp.current + amount.max(0)).min(hp.maximum);
        if hp.current > 0 {
            self.combat.death_saves.reset();
        }
    }

    /// Short rest: restores uses of short-rest features.
    ///
    /// Hit dice are not recovered on a short rest; spending them to heal
    /// during one is a front-end concern, not an engine operation.
    pub fn short_rest(&mut self) {
        for feature in &mut self.features {
            if feature.uses.is_some() && feature.recharge == Some(Recharge::ShortRest) {
                feature.used = 0;
            }
        }
    }

    /// Long rest: full HP, temporary HP cleared, half the hit dice
    /// recovered (minimum one, larger dice first), every spell slot
    /// restored, death saves reset.
    pub fn long_rest(&mut self) {
        let hp = &mut self.combat.hit_points;
        hp.current = hp.maximum;
        hp.temporary = 0;

        match &mut self.combat.hit_dice_pool {
            Some(pool) if !pool.is_empty() => {
                let restore = (pool.total() / 2).max(1);
                pool.recover(restore);
                self.combat.hit_dice = pool.to_single();
            }
            _ => {
                let hd = &mut self.combat.hit_dice;
                let restore = (hd.total / 2).max(1);
                hd.remaining = (hd.remaining + restore).min(hd.total);
            }
        }

        for slot in self.spellcasting.slots.values_mut() {
            slot.restore_all();
        }

        self.combat.death_saves.reset();
    }

    /// Adjust a custom stat by name, respecting its bounds.
    ///
    /// Returns the new value, or `UnknownStat` if no stat has that name.
    pub fn adjust_custom_stat(&mut self, name: &str, amount: i32) -> Result<i32, SheetError> {
        let stat = self
            .custom_stats
            .iter_mut()
            .find(|stat| stat.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| SheetError::UnknownStat(name.to_string()))?;
        Ok(stat.adjust(amount))
    }

    /// Recompute each ability's accumulated `bonus` and `override_score`
    /// from the tracked `stat_bonuses` list.
    ///
    /// Additive bonuses sum per ability; when override bonuses exist the
    /// last one wins, when none exist any previous override is cleared.
    pub fn sync_stat_bonuses(&mut self) {
        for ability in Ability::ALL {
            let mut sum = 0;
            let mut override_value = None;
            for bonus in self.stat_bonuses.iter().filter(|b| b.ability == ability) {
                if bonus.is_override {
                    override_value = bonus.override_value.or(override_value);
                } else {
                    sum += bonus.bonus;
                }
            }
            let score = self.abilities.get_mut(ability);
            score.bonus = sum;
            score.override_score = override_value;
        }
    }

    /// Combined caster level for multiclass spell slot calculation.
    ///
    /// Full casters contribute their level, half casters half of it,
    /// third casters a third (as do third-caster subclasses of otherwise
    /// non-casting classes); pact magic and non-casters contribute
    /// nothing. All divisions round down.
    pub fn multiclass_caster_level(&self, rules: &dyn RulesetProvider) -> u32 {
        self.classes
            .entries()
            .map(|entry| caster_contribution(rules, entry))
            .sum()
    }

    /// The spell slot table this character should have.
    ///
    /// Single-class characters use their class's own table; multiclass
    /// characters use the standard multiclass table keyed by combined
    /// caster level, which is empty when that level is 0.
    pub fn expected_spell_slots(&self, rules: &dyn RulesetProvider) -> BTreeMap<u8, u8> {
        if !self.classes.is_multiclass() {
            let primary = &self.classes.primary;
            return rules.spell_slots(&primary.name, primary.level);
        }
        let caster_level = self.multiclass_caster_level(rules);
        if caster_level == 0 {
            return BTreeMap::new();
        }
        rules.multiclass_spell_slots(caster_level)
    }

    /// Reconcile stored spell slots with the expected table.
    ///
    /// Existing entries keep their `used` count and only have `total`
    /// updated; new levels appear unused; levels absent from the
    /// expected table are removed. Idempotent.
    pub fn sync_spell_slots(&mut self, rules: &dyn RulesetProvider) {
        let expected = self.expected_spell_slots(rules);
        for (&level, &total) in &expected {
            self.spellcasting
                .slots
                .entry(level)
                .and_modify(|slot| slot.total = total)
                .or_insert(SpellSlot { total, used: 0 });
        }
        self.spellcasting
            .slots
            .retain(|level, _| expected.contains_key(level));
        debug!(slots = expected.len(), "synchronized spell slots");
    }

    /// Rebuild the hit dice pool from the current class composition.
    ///
    /// Each class entry contributes `level` dice of its hit die size.
    /// Consumption is carried over: if the old remaining count covers
    /// the new pool everything is remaining, otherwise the preserved
    /// budget (old remaining, plus one fresh die per die gained by
    /// levelling) is distributed largest die first. Entries for unknown
    /// classes add no dice; if no class is known the pool is left
    /// untouched. The legacy single counter is re-derived from the pool.
    pub fn sync_hit_dice(&mut self, rules: &dyn RulesetProvider) {
        let (old_total, old_remaining) = match &self.combat.hit_dice_pool {
            Some(pool) if !pool.is_empty() => (pool.total(), pool.remaining()),
            _ => (self.combat.hit_dice.total, self.combat.hit_dice.remaining),
        };

        let mut pool = HitDicePool::default();
        for entry in self.classes.entries() {
            let Some(def) = rules.class_definition(&entry.name) else {
                continue;
            };
            let Ok(die) = Die::new(def.hit_die) else {
                continue;
            };
            pool.add_dice(die, entry.level);
        }

        let new_total = pool.total();
        if new_total == 0 {
            return;
        }

        if old_remaining >= new_total {
            pool.recover_all();
        } else {
            // Dice gained by levelling start remaining; beyond that the
            // old remaining count is preserved, biggest dice first.
            let growth = new_total.saturating_sub(old_total);
            let mut budget = (old_remaining + growth).min(new_total);
            for counter in pool.pools.values_mut().rev() {
                let keep = budget.min(counter.total);
                counter.remaining = keep;
                budget -= keep;
            }
        }

        debug!(
            old_remaining,
            new_total,
            remaining = pool.remaining(),
            "rebuilt hit dice pool"
        );
        self.combat.hit_dice = pool.to_single();
        self.combat.hit_dice_pool = Some(pool);
    }

    /// Maximum HP from the full class composition.
    ///
    /// The primary class is delegated to the provider (which owns the
    /// max-die-at-level-1 rule); every multiclass entry contributes its
    /// per-level die value plus the Constitution modifier uniformly,
    /// with no level-1 special case. Floored at 1.
    pub fn calculate_max_hp(&self, rules: &dyn RulesetProvider, method: HpMethod) -> i32 {
        let con_mod = self.abilities.modifier_of(Ability::Constitution);
        let primary = &self.classes.primary;
        let mut total =
            rules.calculate_hit_points(&primary.name, primary.level, con_mod, method);

        for entry in &self.classes.multiclass {
            let Some(def) = rules.class_definition(&entry.name) else {
                continue;
            };
            let hit_die = def.hit_die as i32;
            let per_level = match method {
                HpMethod::Average => hit_die / 2 + 1,
                HpMethod::Max => hit_die,
            };
            total += entry.level as i32 * (per_level + con_mod);
        }

        total.max(1)
    }

    /// Run every reconciliation after a class or score change.
    ///
    /// With `recalc_hp`, maximum HP is recomputed (average method) and
    /// current HP is rescaled by the old `current / maximum` ratio
    /// (floored, minimum 1) rather than reset, so partial damage
    /// survives retroactive HP changes such as a Constitution increase.
    pub fn sync_with_ruleset(&mut self, rules: &dyn RulesetProvider, recalc_hp: bool) {
        self.sync_spell_slots(rules);
        self.sync_hit_dice(rules);

        if recalc_hp {
            let new_max = self.calculate_max_hp(rules, HpMethod::Average);
            let hp = &mut self.combat.hit_points;
            if hp.maximum > 0 && new_max != hp.maximum {
                let rescaled = (new_max as i64 * hp.current as i64) / hp.maximum as i64;
                hp.current = (rescaled as i32).max(1);
                debug!(old_max = hp.maximum, new_max, current = hp.current, "rescaled hit points");
            }
            hp.maximum = new_max;
        }
    }

    /// Check ability score prerequisites for taking a level in a new
    /// class.
    ///
    /// Multiclassing requires meeting the prerequisites of every class
    /// the character already has levels in (to multiclass out) and of
    /// the target class (to multiclass in). Continuing an existing class
    /// is never blocked, and classes with no requirements on record are
    /// skipped. With `enforce` false the check always passes with an
    /// informational message.
    pub fn can_multiclass_into(
        &self,
        class_name: &str,
        enforce: bool,
        rules: &dyn RulesetProvider,
    ) -> MulticlassCheck {
        if !enforce {
            return MulticlassCheck::allow("Multiclass requirements not enforced");
        }

        if self.total_level() >= 20 {
            return MulticlassCheck::deny("Character is already at maximum level (20)");
        }

        let current_classes = self.classes.class_names();
        if current_classes.contains(&class_name) {
            return MulticlassCheck::allow(format!(
                "Already has levels in {class_name} (will continue leveling)"
            ));
        }

        for current_class in &current_classes {
            let Some(reqs) = rules.multiclass_requirements(current_class) else {
                continue;
            };
            let alt_reqs = rules.multiclass_alt_requirements(current_class);
            if let Err(reason) = self.check_requirements(&reqs, alt_reqs.as_ref()) {
                return MulticlassCheck::deny(format!(
                    "Cannot multiclass out of {current_class}: {reason}"
                ));
            }
        }

        let Some(target_reqs) = rules.multiclass_requirements(class_name) else {
            return MulticlassCheck::allow(format!("No requirements defined for {class_name}"));
        };
        let target_alt_reqs = rules.multiclass_alt_requirements(class_name);
        if let Err(reason) = self.check_requirements(&target_reqs, target_alt_reqs.as_ref()) {
            return MulticlassCheck::deny(format!(
                "Cannot multiclass into {class_name}: {reason}"
            ));
        }

        MulticlassCheck::allow("Meets all multiclass requirements")
    }

    /// Check one requirement set, falling back to the alternate set per
    /// unmet ability.
    fn check_requirements(
        &self,
        reqs: &BTreeMap<Ability, i32>,
        alt_reqs: Option<&BTreeMap<Ability, i32>>,
    ) -> Result<(), String> {
        for (&ability, &minimum) in reqs {
            let score = self.abilities.score(ability);
            if score < minimum {
                if let Some(alt) = alt_reqs {
                    let alt_met = alt
                        .iter()
                        .all(|(&alt_ability, &alt_min)| self.abilities.score(alt_ability) >= alt_min);
                    if alt_met {
                        continue;
                    }
                }
                return Err(format!("Requires {ability} {minimum} (have {score})"));
            }
        }
        Ok(())
    }

    /// Add one level, to the primary class by default or to the named
    /// class (creating a new multiclass entry if needed).
    ///
    /// Enforces the 20-level cap and multiclass prerequisites, applies
    /// the per-level HP gain directly to maximum and current HP, then
    /// re-synchronizes everything except maximum HP.
    pub fn level_up(
        &mut self,
        rules: &dyn RulesetProvider,
        class_name: Option<&str>,
        method: HpMethod,
    ) -> Result<LevelUp, SheetError> {
        let target = class_name.unwrap_or(&self.classes.primary.name).to_string();

        if self.total_level() >= 20 {
            return Err(SheetError::LevelCapReached);
        }
        if target != self.classes.primary.name {
            let check = self.can_multiclass_into(&target, true, rules);
            if !check.allowed {
                return Err(SheetError::MulticlassBlocked(check.reason));
            }
        }

        let hit_die = rules
            .class_definition(&target)
            .map(|def| def.hit_die as i32)
            .unwrap_or(8);
        let con_mod = self.abilities.modifier_of(Ability::Constitution);
        let hp_gained = match method {
            HpMethod::Max => hit_die + con_mod,
            HpMethod::Average => hit_die / 2 + 1 + con_mod,
        }
        .max(1);

        if target == self.classes.primary.name {
            self.classes.primary.level += 1;
        } else if let Some(entry) = self.classes.multiclass_entry_mut(&target) {
            entry.level += 1;
        } else {
            self.classes.multiclass.push(ClassLevelEntry::new(&target, 1)?);
        }

        self.combat.hit_points.maximum += hp_gained;
        self.combat.hit_points.current += hp_gained;
        self.sync_with_ruleset(rules, false);

        debug!(class = %target, total_level = self.total_level(), hp_gained, "applied level up");

        Ok(LevelUp {
            class_level: self.classes.level_in(&target),
            total_level: self.total_level(),
            hp_gained,
            new_max_hp: self.combat.hit_points.maximum,
            class_name: target,
        })
    }

    /// The level at which a class (the primary by default) selects its
    /// subclass.
    pub fn subclass_selection_level(
        &self,
        rules: &dyn RulesetProvider,
        class_name: Option<&str>,
    ) -> u32 {
        let target = class_name.unwrap_or(&self.classes.primary.name);
        rules.subclass_progression(target).selection_level
    }

    /// Whether subclass selection is available for a class at the
    /// character's current level in it.
    pub fn has_subclass_available(
        &self,
        rules: &dyn RulesetProvider,
        class_name: Option<&str>,
    ) -> bool {
        let target = class_name.unwrap_or(&self.classes.primary.name);
        let level = self.classes.level_in(target).max(1);
        level >= self.subclass_selection_level(rules, Some(target))
    }

    /// Fields a finished character record must have but this one lacks.
    ///
    /// An empty result means the record is complete; a non-empty one is
    /// a business outcome for the caller to surface, not an error.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.combat.hit_points.maximum < 1 {
            missing.push("hit points");
        }
        if !self.spellcasting.slots.is_empty() && self.spellcasting.ability.is_none() {
            missing.push("spellcasting ability");
        }
        missing
    }
}

/// Caster level contribution of one class entry.
fn caster_contribution(rules: &dyn RulesetProvider, entry: &ClassLevelEntry) -> u32 {
    let base_type = rules.caster_type(&entry.name);

    // A subclass can grant third-caster spellcasting to an otherwise
    // non-casting class.
    if base_type == CasterType::None {
        if let Some(subclass) = &entry.subclass {
            if rules
                .third_caster_subclasses(&entry.name)
                .iter()
                .any(|s| s == subclass)
            {
                return entry.level / 3;
            }
        }
    }

    match base_type {
        CasterType::Full => entry.level,
        CasterType::Half => entry.level / 2,
        CasterType::Third => entry.level / 3,
        CasterType::Pact | CasterType::None => 0,
    }
}
