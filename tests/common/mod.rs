//! A small SRD-shaped ruleset used by the integration tests.

use sheetstat::ruleset::{CasterType, ClassDefinition, RulesetProvider, SubclassProgression};
use sheetstat::Ability;
use std::collections::BTreeMap;

pub struct SrdRules;

fn class(
    name: &str,
    hit_die: u32,
    primary: Ability,
    saves: [Ability; 2],
    caster_type: CasterType,
    spellcasting_ability: Option<Ability>,
) -> ClassDefinition {
    ClassDefinition {
        name: name.to_string(),
        hit_die,
        primary_ability: primary,
        saving_throws: saves.to_vec(),
        armor_proficiencies: vec!["Light armor".to_string()],
        weapon_proficiencies: vec!["Simple weapons".to_string()],
        tool_proficiencies: Vec::new(),
        caster_type,
        spellcasting_ability,
        subclass_progression: SubclassProgression::default(),
    }
}

impl RulesetProvider for SrdRules {
    fn id(&self) -> &str {
        "srd-test"
    }

    fn name(&self) -> &str {
        "SRD (test)"
    }

    fn class_definition(&self, class_name: &str) -> Option<ClassDefinition> {
        use Ability::*;
        use CasterType::*;
        Some(match class_name {
            "Barbarian" => class("Barbarian", 12, Strength, [Strength, Constitution], None, Option::None),
            "Fighter" => class("Fighter", 10, Strength, [Strength, Constitution], None, Option::None),
            "Rogue" => class("Rogue", 8, Dexterity, [Dexterity, Intelligence], None, Option::None),
            "Paladin" => class("Paladin", 10, Strength, [Wisdom, Charisma], Half, Some(Charisma)),
            "Ranger" => class("Ranger", 10, Dexterity, [Strength, Dexterity], Half, Some(Wisdom)),
            "Wizard" => class("Wizard", 6, Intelligence, [Intelligence, Wisdom], Full, Some(Intelligence)),
            "Sorcerer" => class("Sorcerer", 6, Charisma, [Constitution, Charisma], Full, Some(Charisma)),
            "Cleric" => class("Cleric", 8, Wisdom, [Wisdom, Charisma], Full, Some(Wisdom)),
            "Warlock" => class("Warlock", 8, Charisma, [Wisdom, Charisma], Pact, Some(Charisma)),
            _ => return Option::None,
        })
    }

    fn available_classes(&self) -> Vec<String> {
        [
            "Barbarian", "Fighter", "Rogue", "Paladin", "Ranger", "Wizard", "Sorcerer", "Cleric",
            "Warlock",
        ]
        .iter()
        .map(|name| name.to_string())
        .collect()
    }

    fn multiclass_requirements(&self, class_name: &str) -> Option<BTreeMap<Ability, i32>> {
        use Ability::*;
        let reqs = match class_name {
            "Barbarian" => vec![(Strength, 13)],
            "Fighter" => vec![(Strength, 13)],
            "Rogue" => vec![(Dexterity, 13)],
            "Paladin" => vec![(Strength, 13), (Charisma, 13)],
            "Ranger" => vec![(Dexterity, 13), (Wisdom, 13)],
            "Wizard" => vec![(Intelligence, 13)],
            "Sorcerer" | "Warlock" => vec![(Charisma, 13)],
            "Cleric" => vec![(Wisdom, 13)],
            _ => return None,
        };
        Some(reqs.into_iter().collect())
    }

    fn multiclass_alt_requirements(&self, class_name: &str) -> Option<BTreeMap<Ability, i32>> {
        match class_name {
            "Fighter" => Some(BTreeMap::from([(Ability::Dexterity, 13)])),
            _ => None,
        }
    }

    fn third_caster_subclasses(&self, class_name: &str) -> Vec<String> {
        match class_name {
            "Fighter" => vec!["Eldritch Knight".to_string()],
            "Rogue" => vec!["Arcane Trickster".to_string()],
            _ => Vec::new(),
        }
    }
}
