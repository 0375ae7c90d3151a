//! Walkthrough: create a character, level it up, multiclass, and rest
//!
//! This demonstrates:
//! - Building a ruleset provider
//! - Derived statistics (modifiers, proficiency, passive perception)
//! - Level-up with HP gain and pool synchronization
//! - Multiclass eligibility and combined caster level
//! - Damage, healing, and long rests

use sheetstat::ruleset::{CasterType, ClassDefinition, RulesetProvider, SubclassProgression};
use sheetstat::{Ability, Character, HpMethod, SheetError};
use std::collections::BTreeMap;

struct DemoRules;

impl RulesetProvider for DemoRules {
    fn id(&self) -> &str {
        "demo"
    }

    fn name(&self) -> &str {
        "Demo Rules"
    }

    fn class_definition(&self, class_name: &str) -> Option<ClassDefinition> {
        let (hit_die, primary, saves, caster_type, casting) = match class_name {
            "Fighter" => (
                10,
                Ability::Strength,
                vec![Ability::Strength, Ability::Constitution],
                CasterType::None,
                None,
            ),
            "Wizard" => (
                6,
                Ability::Intelligence,
                vec![Ability::Intelligence, Ability::Wisdom],
                CasterType::Full,
                Some(Ability::Intelligence),
            ),
            _ => return None,
        };
        Some(ClassDefinition {
            name: class_name.to_string(),
            hit_die,
            primary_ability: primary,
            saving_throws: saves,
            armor_proficiencies: Vec::new(),
            weapon_proficiencies: Vec::new(),
            tool_proficiencies: Vec::new(),
            caster_type,
            spellcasting_ability: casting,
            subclass_progression: SubclassProgression::default(),
        })
    }

    fn available_classes(&self) -> Vec<String> {
        vec!["Fighter".to_string(), "Wizard".to_string()]
    }

    fn multiclass_requirements(&self, class_name: &str) -> Option<BTreeMap<Ability, i32>> {
        match class_name {
            "Fighter" => Some(BTreeMap::from([(Ability::Strength, 13)])),
            "Wizard" => Some(BTreeMap::from([(Ability::Intelligence, 13)])),
            _ => None,
        }
    }
}

fn main() -> Result<(), SheetError> {
    let rules = DemoRules;

    println!("=== Character Sheet Demo ===\n");

    let mut valeria = Character::with_class("Valeria", "Fighter", &rules);
    valeria.abilities.set_base(Ability::Strength, 16)?;
    valeria.abilities.set_base(Ability::Constitution, 14)?;
    valeria.abilities.set_base(Ability::Intelligence, 13)?;
    valeria.sync_with_ruleset(&rules, true);

    println!("1. Fresh Fighter\n");
    println!("  Level: {}", valeria.total_level());
    println!("  Proficiency bonus: +{}", valeria.proficiency_bonus());
    println!("  Max HP: {}", valeria.combat.hit_points.maximum);
    println!("  STR save: {:+}", valeria.save_modifier(Ability::Strength));
    println!("  Passive Perception: {}", valeria.passive_perception());
    println!("  Hit dice: {}\n", valeria.combat.hit_dice_display());

    println!("2. Levelling to Fighter 4\n");
    for _ in 0..3 {
        let gained = valeria.level_up(&rules, None, HpMethod::Average)?;
        println!(
            "  {} {} (total {}): +{} HP -> {}",
            gained.class_name, gained.class_level, gained.total_level, gained.hp_gained,
            gained.new_max_hp
        );
    }

    println!("\n3. Multiclassing into Wizard\n");
    let check = valeria.can_multiclass_into("Wizard", true, &rules);
    println!("  Eligible: {} ({})", check.allowed, check.reason);
    valeria.level_up(&rules, Some("Wizard"), HpMethod::Average)?;
    valeria.level_up(&rules, Some("Wizard"), HpMethod::Average)?;
    println!("  Hit dice: {}", valeria.combat.hit_dice_display());
    println!("  Caster level: {}", valeria.multiclass_caster_level(&rules));
    for (level, slot) in &valeria.spellcasting.slots {
        println!("  Level {level} slots: {}/{}", slot.remaining(), slot.total);
    }

    println!("\n4. A rough day\n");
    valeria.take_damage(18);
    println!("  After 18 damage: {} HP", valeria.combat.hit_points.current);
    let pool = valeria.combat.ensure_hit_dice_pool();
    while pool.spend_any().is_some() {}
    println!("  All hit dice spent: {}", valeria.combat.hit_dice_display());

    valeria.long_rest();
    println!("  After a long rest: {} HP", valeria.combat.hit_points.current);
    println!("  Hit dice: {}", valeria.combat.hit_dice_display());

    Ok(())
}
