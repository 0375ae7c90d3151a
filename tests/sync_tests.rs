//! Integration tests for the reconciliation operations: spell slots,
//! hit dice pools, and full ruleset synchronization.

mod common;

use common::SrdRules;
use proptest::prelude::*;
use sheetstat::{
    Ability, Character, ClassLevelEntry, Die, HpMethod, SpellSlot,
};

#[test]
fn test_sync_spell_slots_preserves_used() {
    let mut character = Character::with_class("Ezren", "Wizard", &SrdRules);
    character.classes.primary.level = 5;
    character.sync_with_ruleset(&SrdRules, true);
    character.spellcasting.slots.get_mut(&1).unwrap().used = 3;

    character.classes.primary.level = 6;
    character.sync_spell_slots(&SrdRules);

    // Wizard 6: 4/3/3
    assert_eq!(character.spellcasting.slots[&1].total, 4);
    assert_eq!(character.spellcasting.slots[&1].used, 3);
    assert_eq!(character.spellcasting.slots[&3].total, 3);
    assert_eq!(character.spellcasting.slots[&3].used, 0);
}

#[test]
fn test_sync_spell_slots_removes_absent_levels() {
    let mut character = Character::with_class("Ezren", "Wizard", &SrdRules);
    character.classes.primary.level = 5;
    character.sync_with_ruleset(&SrdRules, true);
    assert!(character.spellcasting.slots.contains_key(&3));

    character.classes.primary.level = 3;
    character.sync_spell_slots(&SrdRules);
    assert!(!character.spellcasting.slots.contains_key(&3));
    assert_eq!(character.spellcasting.slots[&2].total, 2);
}

#[test]
fn test_sync_spell_slots_non_caster_clears() {
    let mut character = Character::with_class("Bruni", "Fighter", &SrdRules);
    character
        .spellcasting
        .set_slot(1, SpellSlot { total: 2, used: 0 })
        .unwrap();
    character.sync_spell_slots(&SrdRules);
    assert!(character.spellcasting.slots.is_empty());
}

#[test]
fn test_sync_spell_slots_pact_magic_single_class() {
    let mut character = Character::with_class("Hex", "Warlock", &SrdRules);
    character.classes.primary.level = 5;
    character.sync_spell_slots(&SrdRules);
    // Warlock 5: two 3rd-level slots, nothing else
    assert_eq!(character.spellcasting.slots.len(), 1);
    assert_eq!(character.spellcasting.slots[&3].total, 2);
}

#[test]
fn test_multiclass_pact_contributes_no_slots() {
    let mut character = Character::with_class("Hex", "Warlock", &SrdRules);
    character.classes.primary.level = 5;
    character
        .classes
        .multiclass
        .push(ClassLevelEntry::new("Fighter", 2).unwrap());
    character.sync_spell_slots(&SrdRules);
    // Combined caster level 0: the multiclass table yields nothing
    assert!(character.spellcasting.slots.is_empty());
}

#[test]
fn test_multiclass_slot_table_keyed_by_caster_level() {
    let mut character = Character::with_class("Gish", "Paladin", &SrdRules);
    character.classes.primary.level = 6;
    character
        .classes
        .multiclass
        .push(ClassLevelEntry::new("Sorcerer", 14).unwrap());
    character.sync_spell_slots(&SrdRules);

    // Caster level 17: the shared table grants a 9th-level slot
    assert_eq!(character.spellcasting.slots[&9].total, 1);
    assert_eq!(character.spellcasting.slots[&1].total, 4);
}

#[test]
fn test_sync_hit_dice_builds_pool_per_class() {
    let mut character = Character::with_class("Trix", "Fighter", &SrdRules);
    character.classes.primary.level = 5;
    character
        .classes
        .multiclass
        .push(ClassLevelEntry::new("Rogue", 3).unwrap());
    character.sync_hit_dice(&SrdRules);

    let pool = character.combat.hit_dice_pool.as_ref().unwrap();
    assert_eq!(pool.pools[&Die::D10].total, 5);
    assert_eq!(pool.pools[&Die::D8].total, 3);
    assert_eq!(pool.remaining(), 8);
    // Legacy counter mirrors the pool, labelled with the largest die
    assert_eq!(character.combat.hit_dice.total, 8);
    assert_eq!(character.combat.hit_dice.die, Die::D10);
}

#[test]
fn test_sync_hit_dice_level_gain_adds_fresh_die() {
    let mut character = Character::with_class("Bruni", "Fighter", &SrdRules);
    character.classes.primary.level = 5;
    character.sync_hit_dice(&SrdRules);

    let pool = character.combat.ensure_hit_dice_pool();
    pool.spend(Die::D10);
    pool.spend(Die::D10);
    assert_eq!(pool.remaining(), 3);

    character.classes.primary.level = 6;
    character.sync_hit_dice(&SrdRules);

    let pool = character.combat.hit_dice_pool.as_ref().unwrap();
    assert_eq!(pool.total(), 6);
    // The new die arrives unspent; the two spent dice stay spent
    assert_eq!(pool.remaining(), 4);
}

#[test]
fn test_sync_hit_dice_full_remaining_stays_full() {
    let mut character = Character::with_class("Bruni", "Fighter", &SrdRules);
    character.classes.primary.level = 8;
    character.sync_hit_dice(&SrdRules);
    character.sync_hit_dice(&SrdRules);
    let pool = character.combat.hit_dice_pool.as_ref().unwrap();
    assert_eq!(pool.remaining(), 8);
}

#[test]
fn test_sync_hit_dice_shrinking_composition_recovers() {
    let mut character = Character::with_class("Trix", "Fighter", &SrdRules);
    character.classes.primary.level = 8;
    character.sync_hit_dice(&SrdRules);
    let pool = character.combat.ensure_hit_dice_pool();
    pool.spend(Die::D10);

    character.classes.primary.level = 5;
    character.sync_hit_dice(&SrdRules);

    // 7 remaining covers the new total of 5: everything is available
    let pool = character.combat.hit_dice_pool.as_ref().unwrap();
    assert_eq!(pool.total(), 5);
    assert_eq!(pool.remaining(), 5);
}

#[test]
fn test_sync_hit_dice_distributes_largest_first() {
    let mut character = Character::with_class("Trix", "Fighter", &SrdRules);
    character.classes.primary.level = 4;
    character
        .classes
        .multiclass
        .push(ClassLevelEntry::new("Wizard", 4).unwrap());
    character.sync_hit_dice(&SrdRules);

    let pool = character.combat.ensure_hit_dice_pool();
    for _ in 0..5 {
        pool.spend_any();
    }
    assert_eq!(pool.remaining(), 3);

    character.sync_hit_dice(&SrdRules);
    let pool = character.combat.hit_dice_pool.as_ref().unwrap();
    assert_eq!(pool.remaining(), 3);
    // The preserved budget fills the d10 entry before the d6 entry
    assert_eq!(pool.pools[&Die::D10].remaining, 3);
    assert_eq!(pool.pools[&Die::D6].remaining, 0);
}

#[test]
fn test_sync_hit_dice_upgrades_legacy_counter() {
    let mut character = Character::with_class("Old", "Fighter", &SrdRules);
    character.classes.primary.level = 5;
    character.combat.hit_dice_pool = None;
    character.combat.hit_dice.total = 5;
    character.combat.hit_dice.remaining = 2;

    character.sync_hit_dice(&SrdRules);
    let pool = character.combat.hit_dice_pool.as_ref().unwrap();
    assert_eq!(pool.total(), 5);
    assert_eq!(pool.remaining(), 2);
}

#[test]
fn test_sync_hit_dice_unknown_classes_leave_state() {
    let mut character = Character::with_class("Old", "Fighter", &SrdRules);
    character.classes.primary.name = "Mystic".to_string();
    character.combat.hit_dice.total = 3;
    character.combat.hit_dice.remaining = 1;
    character.combat.hit_dice_pool = None;

    character.sync_hit_dice(&SrdRules);
    assert!(character.combat.hit_dice_pool.is_none());
    assert_eq!(character.combat.hit_dice.remaining, 1);
}

#[test]
fn test_sync_with_ruleset_rescales_current_hp() {
    let mut character = Character::with_class("Bruni", "Fighter", &SrdRules);
    character.classes.primary.level = 5;
    character.sync_with_ruleset(&SrdRules, true);
    // Fighter 5, CON 0: 10 + 4 * 6 = 34
    assert_eq!(character.combat.hit_points.maximum, 34);
    character.combat.hit_points.current = 17;

    character.abilities.set_base(Ability::Constitution, 14).unwrap();
    character.sync_with_ruleset(&SrdRules, true);
    // New max 44; current scales by the old half ratio: 44 * 17 / 34 = 22
    assert_eq!(character.combat.hit_points.maximum, 44);
    assert_eq!(character.combat.hit_points.current, 22);
}

#[test]
fn test_sync_with_ruleset_rescale_floors_at_one() {
    let mut character = Character::with_class("Downed", "Fighter", &SrdRules);
    character.classes.primary.level = 5;
    character.sync_with_ruleset(&SrdRules, true);
    character.combat.hit_points.current = 0;

    character.abilities.set_base(Ability::Constitution, 14).unwrap();
    character.sync_with_ruleset(&SrdRules, true);
    assert_eq!(character.combat.hit_points.current, 1);
}

#[test]
fn test_sync_with_ruleset_skips_hp_when_asked() {
    let mut character = Character::with_class("Bruni", "Fighter", &SrdRules);
    character.combat.hit_points.maximum = 99;
    character.combat.hit_points.current = 50;
    character.sync_with_ruleset(&SrdRules, false);
    assert_eq!(character.combat.hit_points.maximum, 99);
    assert_eq!(character.combat.hit_points.current, 50);
}

#[test]
fn test_level_then_long_rest_end_to_end() {
    let mut character = Character::with_class("Vet", "Fighter", &SrdRules);
    for _ in 0..5 {
        character.level_up(&SrdRules, None, HpMethod::Average).unwrap();
    }
    assert_eq!(character.total_level(), 6);

    let pool = character.combat.ensure_hit_dice_pool();
    while pool.spend_any().is_some() {}
    character.take_damage(20);

    character.long_rest();
    assert_eq!(character.combat.hit_points.current, character.combat.hit_points.maximum);
    // 6 dice: half recovered
    assert_eq!(character.combat.hit_dice_pool.as_ref().unwrap().remaining(), 3);
}

proptest! {
    #[test]
    fn prop_sync_hit_dice_invariants(level in 1u32..=20, spend in 0u32..=20) {
        let mut character = Character::with_class("Prop", "Fighter", &SrdRules);
        character.classes.primary.level = level;
        character.sync_hit_dice(&SrdRules);

        let pool = character.combat.ensure_hit_dice_pool();
        for _ in 0..spend {
            pool.spend_any();
        }
        let before_remaining = pool.remaining();

        character.sync_hit_dice(&SrdRules);
        let pool = character.combat.hit_dice_pool.as_ref().unwrap();
        prop_assert_eq!(pool.total(), level);
        prop_assert!(pool.remaining() <= pool.total());
        // Re-syncing an unchanged composition never changes consumption
        prop_assert_eq!(pool.remaining(), before_remaining);
    }

    #[test]
    fn prop_spell_slots_match_table(level in 1u32..=20) {
        let mut character = Character::with_class("Prop", "Wizard", &SrdRules);
        character.classes.primary.level = level;
        character.sync_spell_slots(&SrdRules);

        let expected = sheetstat::ruleset::full_caster_slots(level);
        prop_assert_eq!(character.spellcasting.slots.len(), expected.len());
        for (slot_level, count) in expected {
            prop_assert_eq!(character.spellcasting.slots[&slot_level].total, count);
        }
    }
}
