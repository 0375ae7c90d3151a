//! Skills, proficiency levels, and the proficiency table.

use crate::ability::Ability;
use crate::error::SheetError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// The eighteen skills, each governed by one ability.
///
/// # Examples
///
/// ```rust
/// use sheetstat::{Ability, Skill};
///
/// assert_eq!(Skill::Stealth.ability(), Ability::Dexterity);
/// assert_eq!(Skill::AnimalHandling.to_string(), "Animal Handling");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Athletics,
    Acrobatics,
    SleightOfHand,
    Stealth,
    Arcana,
    History,
    Investigation,
    Nature,
    Religion,
    AnimalHandling,
    Insight,
    Medicine,
    Perception,
    Survival,
    Deception,
    Intimidation,
    Performance,
    Persuasion,
}

impl Skill {
    /// All skills, grouped by governing ability.
    pub const ALL: [Skill; 18] = [
        Skill::Athletics,
        Skill::Acrobatics,
        Skill::SleightOfHand,
        Skill::Stealth,
        Skill::Arcana,
        Skill::History,
        Skill::Investigation,
        Skill::Nature,
        Skill::Religion,
        Skill::AnimalHandling,
        Skill::Insight,
        Skill::Medicine,
        Skill::Perception,
        Skill::Survival,
        Skill::Deception,
        Skill::Intimidation,
        Skill::Performance,
        Skill::Persuasion,
    ];

    /// The ability that governs checks with this skill.
    pub fn ability(self) -> Ability {
        match self {
            Skill::Athletics => Ability::Strength,
            Skill::Acrobatics | Skill::SleightOfHand | Skill::Stealth => Ability::Dexterity,
            Skill::Arcana
            | Skill::History
            | Skill::Investigation
            | Skill::Nature
            | Skill::Religion => Ability::Intelligence,
            Skill::AnimalHandling
            | Skill::Insight
            | Skill::Medicine
            | Skill::Perception
            | Skill::Survival => Ability::Wisdom,
            Skill::Deception | Skill::Intimidation | Skill::Performance | Skill::Persuasion => {
                Ability::Charisma
            }
        }
    }

    /// Lowercase snake_case identifier, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Skill::Athletics => "athletics",
            Skill::Acrobatics => "acrobatics",
            Skill::SleightOfHand => "sleight_of_hand",
            Skill::Stealth => "stealth",
            Skill::Arcana => "arcana",
            Skill::History => "history",
            Skill::Investigation => "investigation",
            Skill::Nature => "nature",
            Skill::Religion => "religion",
            Skill::AnimalHandling => "animal_handling",
            Skill::Insight => "insight",
            Skill::Medicine => "medicine",
            Skill::Perception => "perception",
            Skill::Survival => "survival",
            Skill::Deception => "deception",
            Skill::Intimidation => "intimidation",
            Skill::Performance => "performance",
            Skill::Persuasion => "persuasion",
        }
    }

    /// Title-case display name ("Sleight Of Hand").
    pub fn display_name(self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_name())
    }
}

impl FromStr for Skill {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Skill::ALL
            .into_iter()
            .find(|skill| skill.as_str() == lower)
            .ok_or_else(|| SheetError::UnknownSkill(s.to_string()))
    }
}

/// Degree of skill proficiency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProficiencyLevel {
    #[default]
    None,
    Proficient,
    /// Double proficiency bonus.
    Expertise,
}

impl ProficiencyLevel {
    /// How many times the proficiency bonus applies.
    pub fn multiplier(self) -> i32 {
        match self {
            ProficiencyLevel::None => 0,
            ProficiencyLevel::Proficient => 1,
            ProficiencyLevel::Expertise => 2,
        }
    }
}

/// Skill check modifier from the ability modifier and proficiency degree.
///
/// # Examples
///
/// ```rust
/// use sheetstat::skill::skill_modifier;
/// use sheetstat::ProficiencyLevel;
///
/// assert_eq!(skill_modifier(3, 2, ProficiencyLevel::None), 3);
/// assert_eq!(skill_modifier(3, 2, ProficiencyLevel::Proficient), 5);
/// assert_eq!(skill_modifier(3, 3, ProficiencyLevel::Expertise), 9);
/// ```
pub fn skill_modifier(
    ability_modifier: i32,
    proficiency_bonus: i32,
    proficiency: ProficiencyLevel,
) -> i32 {
    ability_modifier + proficiency_bonus * proficiency.multiplier()
}

/// A character's trained skills, saves, and trained categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proficiencies {
    /// Skill proficiency levels; absent skills are untrained.
    pub skills: BTreeMap<Skill, ProficiencyLevel>,
    /// Abilities with saving throw proficiency.
    pub saving_throws: BTreeSet<Ability>,
    pub weapons: Vec<String>,
    pub armor: Vec<String>,
    pub tools: Vec<String>,
    pub languages: Vec<String>,
}

impl Default for Proficiencies {
    fn default() -> Self {
        Self {
            skills: BTreeMap::new(),
            saving_throws: BTreeSet::new(),
            weapons: Vec::new(),
            armor: Vec::new(),
            tools: Vec::new(),
            languages: vec!["Common".to_string()],
        }
    }
}

impl Proficiencies {
    /// Proficiency level for a skill (`None` if untrained).
    pub fn skill_proficiency(&self, skill: Skill) -> ProficiencyLevel {
        self.skills.get(&skill).copied().unwrap_or_default()
    }

    /// Record a skill's proficiency level; `ProficiencyLevel::None`
    /// removes the entry.
    pub fn set_skill(&mut self, skill: Skill, level: ProficiencyLevel) {
        if level == ProficiencyLevel::None {
            self.skills.remove(&skill);
        } else {
            self.skills.insert(skill, level);
        }
    }

    /// Whether the character is proficient in a saving throw.
    pub fn is_proficient_save(&self, ability: Ability) -> bool {
        self.saving_throws.contains(&ability)
    }
}
