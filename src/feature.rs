//! Features with limited uses, custom stats, and tracked ability bonuses.

use crate::ability::Ability;
use serde::{Deserialize, Serialize};

/// When a limited-use feature recharges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recharge {
    ShortRest,
    LongRest,
}

/// A class, species, or feat feature, optionally with limited uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    /// Where the feature comes from (class, species, feat, ...).
    pub source: String,
    pub description: String,
    /// Number of uses if limited.
    pub uses: Option<u32>,
    pub used: u32,
    pub recharge: Option<Recharge>,
}

impl Feature {
    /// An always-on feature with no use tracking.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            description: String::new(),
            uses: None,
            used: 0,
            recharge: None,
        }
    }

    /// A limited-use feature with a recharge policy.
    pub fn with_uses(
        name: impl Into<String>,
        source: impl Into<String>,
        uses: u32,
        recharge: Recharge,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            description: String::new(),
            uses: Some(uses),
            used: 0,
            recharge: Some(recharge),
        }
    }

    /// Uses left, or `None` for unlimited features.
    pub fn uses_remaining(&self) -> Option<u32> {
        self.uses.map(|total| total.saturating_sub(self.used))
    }
}

/// A campaign-specific tracked number (Luck, Renown, Piety, ...).
///
/// # Examples
///
/// ```rust
/// use sheetstat::CustomStat;
///
/// let mut luck = CustomStat::bounded("Luck", 0, 0, 20);
/// assert_eq!(luck.adjust(25), 20);
/// assert_eq!(luck.adjust(-100), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomStat {
    pub name: String,
    pub value: i32,
    /// Minimum allowed value, unbounded when `None`.
    pub min_value: Option<i32>,
    /// Maximum allowed value, unbounded when `None`.
    pub max_value: Option<i32>,
    pub description: Option<String>,
}

impl CustomStat {
    /// An unbounded stat starting at `value`.
    pub fn new(name: impl Into<String>, value: i32) -> Self {
        Self {
            name: name.into(),
            value,
            min_value: None,
            max_value: None,
            description: None,
        }
    }

    /// A stat clamped to `min..=max`.
    pub fn bounded(name: impl Into<String>, value: i32, min: i32, max: i32) -> Self {
        Self {
            name: name.into(),
            value,
            min_value: Some(min),
            max_value: Some(max),
            description: None,
        }
    }

    /// Adjust the value, respecting the bounds. Returns the new value.
    pub fn adjust(&mut self, amount: i32) -> i32 {
        let mut new_value = self.value + amount;
        if let Some(min) = self.min_value {
            new_value = new_value.max(min);
        }
        if let Some(max) = self.max_value {
            new_value = new_value.min(max);
        }
        self.value = new_value;
        self.value
    }
}

/// A tracked bonus to an ability score from a named source.
///
/// The bonuses themselves are the record of truth; the ability's `bonus`
/// and `override_score` fields are recomputed from this list by
/// `Character::sync_stat_bonuses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBonus {
    /// Source of the bonus ("Gauntlets of Ogre Power", "Enhance Ability").
    pub source: String,
    pub ability: Ability,
    pub bonus: i32,
    /// When true, sets the score to `override_value` instead of adding.
    pub is_override: bool,
    pub override_value: Option<i32>,
    /// A temporary effect (spell, blessing) rather than a permanent one.
    pub temporary: bool,
    /// Duration description ("1 hour", "until long rest").
    pub duration: Option<String>,
    pub notes: Option<String>,
}

impl StatBonus {
    /// A flat additive bonus.
    pub fn additive(source: impl Into<String>, ability: Ability, bonus: i32) -> Self {
        Self {
            source: source.into(),
            ability,
            bonus,
            is_override: false,
            override_value: None,
            temporary: false,
            duration: None,
            notes: None,
        }
    }

    /// An override that pins the score to `value`.
    pub fn override_to(source: impl Into<String>, ability: Ability, value: i32) -> Self {
        Self {
            source: source.into(),
            ability,
            bonus: 0,
            is_override: true,
            override_value: Some(value),
            temporary: false,
            duration: None,
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uses_remaining() {
        let mut feature = Feature::with_uses("Second Wind", "Fighter", 1, Recharge::ShortRest);
        assert_eq!(feature.uses_remaining(), Some(1));
        feature.used = 1;
        assert_eq!(feature.uses_remaining(), Some(0));
        feature.used = 2;
        assert_eq!(feature.uses_remaining(), Some(0));

        let passive = Feature::new("Darkvision", "Species");
        assert_eq!(passive.uses_remaining(), None);
    }

    #[test]
    fn test_custom_stat_clamps_to_bounds() {
        let mut sanity = CustomStat::bounded("Sanity", 100, 0, 100);
        assert_eq!(sanity.adjust(-30), 70);
        assert_eq!(sanity.adjust(50), 100);

        let mut renown = CustomStat::new("Renown", 0);
        assert_eq!(renown.adjust(-5), -5);
    }

    #[test]
    fn test_stat_bonus_constructors() {
        let belt = StatBonus::override_to("Belt of Giant Strength", Ability::Strength, 21);
        assert!(belt.is_override);
        assert_eq!(belt.override_value, Some(21));

        let gauntlets = StatBonus::additive("Blessing", Ability::Charisma, 2);
        assert!(!gauntlets.is_override);
        assert_eq!(gauntlets.bonus, 2);
    }
}
