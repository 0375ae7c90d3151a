//! Ability scores and their derived modifiers.
//!
//! Provides the `Ability` enum, the per-ability `AbilityScore`
//! (base + bonus with an optional override), the fixed six-slot
//! `AbilityScores` collection, and the two level-independent calculators
//! used everywhere else: `modifier()` and `proficiency_bonus()`.

use crate::error::SheetError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The six core abilities.
///
/// # Examples
///
/// ```rust
/// use sheetstat::Ability;
///
/// assert_eq!(Ability::Strength.abbreviation(), "STR");
/// assert_eq!(Ability::from_abbr("wis").unwrap(), Ability::Wisdom);
/// assert_eq!(Ability::Charisma.to_string(), "Charisma");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    /// All six abilities in standard order.
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    /// Lowercase identifier, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Ability::Strength => "strength",
            Ability::Dexterity => "dexterity",
            Ability::Constitution => "constitution",
            Ability::Intelligence => "intelligence",
            Ability::Wisdom => "wisdom",
            Ability::Charisma => "charisma",
        }
    }

    /// Three-letter abbreviation (STR, DEX, ...).
    pub fn abbreviation(self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    /// Look up an ability by its three-letter abbreviation.
    pub fn from_abbr(abbr: &str) -> Result<Ability, SheetError> {
        let upper = abbr.to_ascii_uppercase();
        Ability::ALL
            .into_iter()
            .find(|a| a.abbreviation() == upper)
            .ok_or_else(|| SheetError::UnknownAbility(abbr.to_string()))
    }

    /// Title-case display name ("Strength").
    pub fn display_name(self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }
}

impl std::fmt::Display for Ability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Ability {
    type Err = SheetError;

    /// Accepts the full lowercase name or the three-letter abbreviation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Ability::ALL
            .into_iter()
            .find(|a| a.as_str() == lower)
            .map_or_else(|| Ability::from_abbr(s), Ok)
    }
}

/// Ability modifier: floor((total - 10) / 2).
///
/// Uses floor division, so totals below 10 round toward negative
/// infinity rather than toward zero.
///
/// # Examples
///
/// ```rust
/// use sheetstat::ability::modifier;
///
/// assert_eq!(modifier(10), 0);
/// assert_eq!(modifier(16), 3);
/// assert_eq!(modifier(7), -2);
/// assert_eq!(modifier(1), -5);
/// ```
pub fn modifier(total: i32) -> i32 {
    (total - 10).div_euclid(2)
}

/// Proficiency bonus for a total character level.
///
/// Step function: levels 1-4 give +2, 5-8 give +3, 9-12 give +4,
/// 13-16 give +5, 17-20 give +6. Levels outside 1-20 are clamped.
///
/// # Examples
///
/// ```rust
/// use sheetstat::ability::proficiency_bonus;
///
/// assert_eq!(proficiency_bonus(1), 2);
/// assert_eq!(proficiency_bonus(6), 3);
/// assert_eq!(proficiency_bonus(17), 6);
/// ```
pub fn proficiency_bonus(total_level: u32) -> i32 {
    let level = total_level.clamp(1, 20) as i32;
    2 + (level - 1) / 4
}

/// A single ability score.
///
/// The effective total is `override_score` when set, otherwise
/// `base + bonus`. `bonus` accumulates item and effect bonuses; see
/// `Character::sync_stat_bonuses` for the reconciliation that maintains it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScore {
    /// Base score, conventionally 1-30.
    pub base: i32,
    /// Accumulated bonus from items and effects.
    pub bonus: i32,
    /// Manual override; when set it replaces base + bonus entirely.
    #[serde(rename = "override")]
    pub override_score: Option<i32>,
}

impl Default for AbilityScore {
    fn default() -> Self {
        Self {
            base: 10,
            bonus: 0,
            override_score: None,
        }
    }
}

impl AbilityScore {
    /// Create a score with the given base and no bonus or override.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sheetstat::AbilityScore;
    ///
    /// let score = AbilityScore::new(16);
    /// assert_eq!(score.total(), 16);
    /// assert_eq!(score.modifier(), 3);
    /// ```
    pub fn new(base: i32) -> Self {
        Self {
            base,
            bonus: 0,
            override_score: None,
        }
    }

    /// Effective total: override if present, else base + bonus.
    pub fn total(&self) -> i32 {
        self.override_score.unwrap_or(self.base + self.bonus)
    }

    /// Modifier derived from the effective total.
    pub fn modifier(&self) -> i32 {
        modifier(self.total())
    }

    /// Modifier formatted with its sign ("+3", "-1").
    pub fn modifier_str(&self) -> String {
        format!("{:+}", self.modifier())
    }
}

/// All six ability scores.
///
/// # Examples
///
/// ```rust
/// use sheetstat::{Ability, AbilityScores};
///
/// let abilities = AbilityScores::from_array([15, 14, 13, 12, 10, 8]);
/// assert_eq!(abilities.score(Ability::Strength), 15);
/// assert_eq!(abilities.modifier_of(Ability::Charisma), -1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: AbilityScore,
    pub dexterity: AbilityScore,
    pub constitution: AbilityScore,
    pub intelligence: AbilityScore,
    pub wisdom: AbilityScore,
    pub charisma: AbilityScore,
}

impl AbilityScores {
    /// Create from six base scores in standard order (STR, DEX, CON, INT, WIS, CHA).
    pub fn from_array(scores: [i32; 6]) -> Self {
        Self {
            strength: AbilityScore::new(scores[0]),
            dexterity: AbilityScore::new(scores[1]),
            constitution: AbilityScore::new(scores[2]),
            intelligence: AbilityScore::new(scores[3]),
            wisdom: AbilityScore::new(scores[4]),
            charisma: AbilityScore::new(scores[5]),
        }
    }

    /// Borrow the score for an ability.
    pub fn get(&self, ability: Ability) -> &AbilityScore {
        match ability {
            Ability::Strength => &self.strength,
            Ability::Dexterity => &self.dexterity,
            Ability::Constitution => &self.constitution,
            Ability::Intelligence => &self.intelligence,
            Ability::Wisdom => &self.wisdom,
            Ability::Charisma => &self.charisma,
        }
    }

    /// Mutably borrow the score for an ability.
    pub fn get_mut(&mut self, ability: Ability) -> &mut AbilityScore {
        match ability {
            Ability::Strength => &mut self.strength,
            Ability::Dexterity => &mut self.dexterity,
            Ability::Constitution => &mut self.constitution,
            Ability::Intelligence => &mut self.intelligence,
            Ability::Wisdom => &mut self.wisdom,
            Ability::Charisma => &mut self.charisma,
        }
    }

    /// Effective total for an ability.
    pub fn score(&self, ability: Ability) -> i32 {
        self.get(ability).total()
    }

    /// Modifier for an ability.
    pub fn modifier_of(&self, ability: Ability) -> i32 {
        self.get(ability).modifier()
    }

    /// Set an ability's base score, validated to the 1-30 range.
    ///
    /// Rejected values leave the score untouched.
    pub fn set_base(&mut self, ability: Ability, value: i32) -> Result<(), SheetError> {
        if !(1..=30).contains(&value) {
            return Err(SheetError::ScoreOutOfRange(value));
        }
        self.get_mut(ability).base = value;
        Ok(())
    }
}
