//! Error types for the character engine.
//!
//! Validation problems (unknown identifiers, out-of-range input) are
//! represented by the `SheetError` enum. Business-rule outcomes such as a
//! failed multiclass eligibility check are ordinary return values, not
//! errors; see `MulticlassCheck` in the `character` module.

use thiserror::Error;

/// Errors produced by engine lookups and validated mutations.
///
/// # Examples
///
/// ```rust
/// use sheetstat::SheetError;
///
/// let err = SheetError::UnknownAbility("luck".into());
/// assert_eq!(err.to_string(), "Unknown ability: luck");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SheetError {
    /// An ability name or abbreviation did not match any of the six abilities.
    #[error("Unknown ability: {0}")]
    UnknownAbility(String),

    /// A skill name did not match any of the eighteen skills.
    #[error("Unknown skill: {0}")]
    UnknownSkill(String),

    /// A custom stat lookup by name found nothing.
    #[error("Unknown custom stat: {0}")]
    UnknownStat(String),

    /// A die token could not be parsed or had zero sides.
    #[error("Invalid die: {0}")]
    InvalidDie(String),

    /// Spell slot levels run from 1 to 9.
    #[error("Spell level must be between 1 and 9, got {0}")]
    InvalidSpellLevel(u8),

    /// An ability score was set outside the 1-30 range.
    #[error("Ability score must be between 1 and 30, got {0}")]
    ScoreOutOfRange(i32),

    /// A class level was set outside the 1-20 range.
    #[error("Class level must be between 1 and 20, got {0}")]
    LevelOutOfRange(u32),

    /// The character is already at total level 20.
    #[error("Character is already at maximum level (20)")]
    LevelCapReached,

    /// A level-up was blocked by multiclass prerequisites.
    ///
    /// Carries the reason produced by the eligibility check, e.g.
    /// `"Cannot multiclass into Wizard: Requires Intelligence 13 (have 8)"`.
    #[error("Cannot multiclass: {0}")]
    MulticlassBlocked(String),
}
