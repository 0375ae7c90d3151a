//! # sheetstat
//!
//! A deterministic derived-state synchronization engine for tabletop RPG
//! characters.
//!
//! A character record mixes durable facts (class levels, ability scores,
//! proficiencies) with derived state (spell slot tables, hit dice pools,
//! maximum HP) and consumable state (slots used, dice spent, current HP).
//! `sheetstat` keeps the three in agreement: after any change to the
//! durable facts, the reconciliation operations recompute the derived
//! state from an explicit [`RulesetProvider`] while preserving
//! in-progress consumption.
//!
//! Everything is synchronous and deterministic. Rule failures that a
//! caller branches on (multiclass prerequisites, incomplete records) are
//! ordinary values; [`SheetError`] is reserved for invalid inputs.
//!
//! ## Example
//!
//! ```rust
//! use sheetstat::{Ability, Character, Skill};
//!
//! let mut character = Character::new("Valeria");
//! character.abilities.set_base(Ability::Dexterity, 16).unwrap();
//!
//! assert_eq!(character.total_level(), 1);
//! assert_eq!(character.proficiency_bonus(), 2);
//! assert_eq!(character.skill_modifier(Skill::Acrobatics), 3);
//! assert_eq!(character.initiative(), 3);
//! ```

pub mod ability;
pub mod character;
pub mod class_levels;
pub mod combat;
pub mod error;
pub mod feature;
pub mod hit_dice;
pub mod hit_points;
pub mod ruleset;
pub mod skill;
pub mod spellcasting;

pub use ability::{Ability, AbilityScore, AbilityScores};
pub use character::{Character, LevelUp, MulticlassCheck};
pub use class_levels::{ClassLevelEntry, ClassLevels};
pub use combat::Combat;
pub use error::SheetError;
pub use feature::{CustomStat, Feature, Recharge, StatBonus};
pub use hit_dice::{DiceCounter, Die, HitDicePool};
pub use hit_points::{DeathSaves, HitPoints};
pub use ruleset::{
    CasterType, ClassDefinition, HpMethod, RulesetProvider, SubclassProgression,
};
pub use skill::{Proficiencies, ProficiencyLevel, Skill};
pub use spellcasting::{SpellSlot, Spellcasting};
