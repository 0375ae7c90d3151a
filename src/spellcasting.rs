//! Spell slot tracking and the spellcasting profile.

use crate::ability::Ability;
use crate::error::SheetError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Spell slots of a single spell level.
///
/// # Examples
///
/// ```rust
/// use sheetstat::SpellSlot;
///
/// let mut slot = SpellSlot { total: 4, used: 2 };
/// assert_eq!(slot.remaining(), 2);
/// slot.restore_all();
/// assert_eq!(slot.used, 0);
/// assert_eq!(slot.remaining(), 4);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellSlot {
    pub total: u8,
    pub used: u8,
}

impl SpellSlot {
    /// Slots not yet expended.
    pub fn remaining(&self) -> u8 {
        self.total.saturating_sub(self.used)
    }

    /// Expend one slot. Returns false if none remain.
    pub fn use_slot(&mut self) -> bool {
        if self.remaining() > 0 {
            self.used += 1;
            true
        } else {
            false
        }
    }

    /// Restore up to `count` expended slots.
    pub fn restore(&mut self, count: u8) {
        self.used = self.used.saturating_sub(count);
    }

    /// Restore every expended slot.
    pub fn restore_all(&mut self) {
        self.used = 0;
    }
}

/// Spellcasting ability, slots, and spell lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spellcasting {
    /// The casting ability, unset for non-casters.
    pub ability: Option<Ability>,
    /// Slots by spell level (1-9).
    pub slots: BTreeMap<u8, SpellSlot>,
    pub cantrips: Vec<String>,
    pub known: Vec<String>,
    pub prepared: Vec<String>,
}

impl Spellcasting {
    /// Install a slot entry for a spell level, validated to 1-9.
    pub fn set_slot(&mut self, level: u8, slot: SpellSlot) -> Result<(), SheetError> {
        if !(1..=9).contains(&level) {
            return Err(SheetError::InvalidSpellLevel(level));
        }
        self.slots.insert(level, slot);
        Ok(())
    }

    /// Spell save DC: 8 + proficiency bonus + casting ability modifier.
    pub fn spell_save_dc(&self, ability_modifier: i32, proficiency_bonus: i32) -> i32 {
        8 + ability_modifier + proficiency_bonus
    }

    /// Spell attack bonus: casting ability modifier + proficiency bonus.
    pub fn spell_attack_bonus(&self, ability_modifier: i32, proficiency_bonus: i32) -> i32 {
        ability_modifier + proficiency_bonus
    }
}
