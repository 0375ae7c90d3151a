//! The ruleset capability consumed by the engine.
//!
//! The engine never consults ambient global state: every operation that
//! needs authoritative class data takes a `&dyn RulesetProvider`. A
//! provider supplies class definitions, multiclass prerequisites, and
//! spell-slot tables; the standard (SRD-shaped) slot progressions live
//! here as plain functions so providers only have to classify classes,
//! not retype the tables.

use crate::ability::Ability;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a class contributes to multiclass spell-slot calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CasterType {
    #[default]
    None,
    /// Bard, Cleric, Druid, Sorcerer, Wizard: full level.
    Full,
    /// Paladin, Ranger: level / 2, rounded down.
    Half,
    /// Eldritch Knight, Arcane Trickster: level / 3, rounded down.
    Third,
    /// Warlock: pact magic, tracked separately, contributes nothing.
    Pact,
}

/// Which per-level hit point value to use when computing maximum HP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HpMethod {
    /// Fixed average per level: (die / 2) + 1.
    #[default]
    Average,
    /// Maximum die value every level.
    Max,
}

/// When a class selects its subclass and gains subclass features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubclassProgression {
    pub selection_level: u32,
    pub feature_levels: Vec<u32>,
}

impl Default for SubclassProgression {
    fn default() -> Self {
        Self {
            selection_level: 3,
            feature_levels: vec![3, 6, 10, 14],
        }
    }
}

impl SubclassProgression {
    /// Whether a subclass has been selected by this level.
    pub fn has_subclass_at(&self, level: u32) -> bool {
        level >= self.selection_level
    }

    /// Whether a subclass feature is gained at exactly this level.
    pub fn gets_feature_at(&self, level: u32) -> bool {
        self.feature_levels.contains(&level)
    }
}

/// Core definition of a class, as supplied by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub name: String,
    /// Hit die side count (6, 8, 10, or 12).
    pub hit_die: u32,
    pub primary_ability: Ability,
    /// Saving throw proficiencies granted at level 1.
    pub saving_throws: Vec<Ability>,
    pub armor_proficiencies: Vec<String>,
    pub weapon_proficiencies: Vec<String>,
    pub tool_proficiencies: Vec<String>,
    pub caster_type: CasterType,
    pub spellcasting_ability: Option<Ability>,
    pub subclass_progression: SubclassProgression,
}

// Slots per spell level (columns 1-9) for character levels 1-20.
const FULL_CASTER_TABLE: [[u8; 9]; 20] = [
    [2, 0, 0, 0, 0, 0, 0, 0, 0],
    [3, 0, 0, 0, 0, 0, 0, 0, 0],
    [4, 2, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 2, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 1, 0, 0, 0, 0, 0],
    [4, 3, 3, 2, 0, 0, 0, 0, 0],
    [4, 3, 3, 3, 1, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 1],
    [4, 3, 3, 3, 3, 1, 1, 1, 1],
    [4, 3, 3, 3, 3, 2, 1, 1, 1],
    [4, 3, 3, 3, 3, 2, 2, 1, 1],
];

const HALF_CASTER_TABLE: [[u8; 9]; 20] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [2, 0, 0, 0, 0, 0, 0, 0, 0],
    [3, 0, 0, 0, 0, 0, 0, 0, 0],
    [3, 0, 0, 0, 0, 0, 0, 0, 0],
    [4, 2, 0, 0, 0, 0, 0, 0, 0],
    [4, 2, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 2, 0, 0, 0, 0, 0, 0],
    [4, 3, 2, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 1, 0, 0, 0, 0, 0],
    [4, 3, 3, 1, 0, 0, 0, 0, 0],
    [4, 3, 3, 2, 0, 0, 0, 0, 0],
    [4, 3, 3, 2, 0, 0, 0, 0, 0],
    [4, 3, 3, 3, 1, 0, 0, 0, 0],
    [4, 3, 3, 3, 1, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 0, 0, 0, 0],
];

const THIRD_CASTER_TABLE: [[u8; 9]; 20] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [2, 0, 0, 0, 0, 0, 0, 0, 0],
    [3, 0, 0, 0, 0, 0, 0, 0, 0],
    [3, 0, 0, 0, 0, 0, 0, 0, 0],
    [3, 0, 0, 0, 0, 0, 0, 0, 0],
    [4, 2, 0, 0, 0, 0, 0, 0, 0],
    [4, 2, 0, 0, 0, 0, 0, 0, 0],
    [4, 2, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 2, 0, 0, 0, 0, 0, 0],
    [4, 3, 2, 0, 0, 0, 0, 0, 0],
    [4, 3, 2, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 1, 0, 0, 0, 0, 0],
    [4, 3, 3, 1, 0, 0, 0, 0, 0],
];

// Pact magic: (slot level, slot count) per character level 1-20.
const PACT_MAGIC_TABLE: [(u8, u8); 20] = [
    (1, 1),
    (1, 2),
    (2, 2),
    (2, 2),
    (3, 2),
    (3, 2),
    (4, 2),
    (4, 2),
    (5, 2),
    (5, 2),
    (5, 3),
    (5, 3),
    (5, 3),
    (5, 3),
    (5, 3),
    (5, 3),
    (5, 4),
    (5, 4),
    (5, 4),
    (5, 4),
];

fn slots_from_row(row: &[u8; 9]) -> BTreeMap<u8, u8> {
    row.iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .map(|(idx, &count)| (idx as u8 + 1, count))
        .collect()
}

fn table_row(table: &[[u8; 9]; 20], level: u32) -> BTreeMap<u8, u8> {
    if level < 1 {
        return BTreeMap::new();
    }
    let index = (level.min(20) - 1) as usize;
    slots_from_row(&table[index])
}

/// Standard full-caster slots by class level.
///
/// # Examples
///
/// ```rust
/// use sheetstat::ruleset::full_caster_slots;
///
/// let slots = full_caster_slots(5);
/// assert_eq!(slots[&1], 4);
/// assert_eq!(slots[&3], 2);
/// ```
pub fn full_caster_slots(level: u32) -> BTreeMap<u8, u8> {
    table_row(&FULL_CASTER_TABLE, level)
}

/// Standard half-caster slots by class level (Paladin, Ranger).
pub fn half_caster_slots(level: u32) -> BTreeMap<u8, u8> {
    table_row(&HALF_CASTER_TABLE, level)
}

/// Standard third-caster slots by class level (Eldritch Knight, Arcane Trickster).
pub fn third_caster_slots(level: u32) -> BTreeMap<u8, u8> {
    table_row(&THIRD_CASTER_TABLE, level)
}

/// Pact magic slots by class level (Warlock).
pub fn pact_magic_slots(level: u32) -> BTreeMap<u8, u8> {
    if level < 1 {
        return BTreeMap::new();
    }
    let (slot_level, count) = PACT_MAGIC_TABLE[(level.min(20) - 1) as usize];
    BTreeMap::from([(slot_level, count)])
}

/// The multiclass spellcaster table, keyed by combined caster level.
///
/// Row for row this is the full-caster progression, which is what the
/// multiclass table prints.
pub fn multiclass_slots(caster_level: u32) -> BTreeMap<u8, u8> {
    table_row(&FULL_CASTER_TABLE, caster_level)
}

/// Capability the engine consumes for authoritative class data.
///
/// Implementations represent one ruleset variant (2014, 2024, ...),
/// selected once per character and passed explicitly into the engine's
/// reconciliation operations. Most methods have defaults built on
/// `class_definition` and the standard tables, so a minimal provider
/// only defines its classes and prerequisites.
pub trait RulesetProvider {
    /// Unique identifier for this ruleset ("dnd2014", "dnd2024", ...).
    fn id(&self) -> &str;

    /// Display name for this ruleset.
    fn name(&self) -> &str;

    /// Class definition by name; `None` for unknown classes.
    fn class_definition(&self, class_name: &str) -> Option<ClassDefinition>;

    /// Names of every class this ruleset defines.
    fn available_classes(&self) -> Vec<String>;

    /// Caster classification for a class; defaults to the definition's.
    fn caster_type(&self, class_name: &str) -> CasterType {
        self.class_definition(class_name)
            .map(|def| def.caster_type)
            .unwrap_or_default()
    }

    /// Subclass progression for a class; defaults to selection at 3.
    fn subclass_progression(&self, class_name: &str) -> SubclassProgression {
        self.class_definition(class_name)
            .map(|def| def.subclass_progression)
            .unwrap_or_default()
    }

    /// Levels where ability score improvements are offered.
    fn asi_levels(&self) -> Vec<u32> {
        vec![4, 8, 12, 16, 19]
    }

    /// Ability minimums to multiclass into or out of a class.
    ///
    /// `None` means the class has no prerequisites on record, which the
    /// eligibility check treats as automatically satisfied.
    fn multiclass_requirements(&self, class_name: &str) -> Option<BTreeMap<Ability, i32>>;

    /// Alternate requirement set that may satisfy the prerequisites
    /// instead (e.g. Fighter accepting Dexterity 13 in place of Strength).
    fn multiclass_alt_requirements(&self, class_name: &str) -> Option<BTreeMap<Ability, i32>> {
        let _ = class_name;
        None
    }

    /// Subclasses of a non-caster class that grant third-caster
    /// spellcasting ("Eldritch Knight", "Arcane Trickster").
    fn third_caster_subclasses(&self, class_name: &str) -> Vec<String> {
        let _ = class_name;
        Vec::new()
    }

    /// Single-class spell slot table for a class at a level.
    fn spell_slots(&self, class_name: &str, level: u32) -> BTreeMap<u8, u8> {
        match self.caster_type(class_name) {
            CasterType::Full => full_caster_slots(level),
            CasterType::Half => half_caster_slots(level),
            CasterType::Third => third_caster_slots(level),
            CasterType::Pact => pact_magic_slots(level),
            CasterType::None => BTreeMap::new(),
        }
    }

    /// Multiclass spell slot table for a combined caster level.
    fn multiclass_spell_slots(&self, caster_level: u32) -> BTreeMap<u8, u8> {
        multiclass_slots(caster_level)
    }

    /// Maximum HP contribution of a single class: maximum die value plus
    /// Constitution modifier at level 1, then the method's per-level
    /// value for each further level. Floored at 1. Unknown classes
    /// contribute 1.
    fn calculate_hit_points(
        &self,
        class_name: &str,
        level: u32,
        con_modifier: i32,
        method: HpMethod,
    ) -> i32 {
        let Some(def) = self.class_definition(class_name) else {
            return 1;
        };
        let hit_die = def.hit_die as i32;
        let mut hp = hit_die + con_modifier;
        if level > 1 {
            let per_level = match method {
                HpMethod::Average => hit_die / 2 + 1,
                HpMethod::Max => hit_die,
            };
            hp += (level as i32 - 1) * (per_level + con_modifier);
        }
        hp.max(1)
    }
}
