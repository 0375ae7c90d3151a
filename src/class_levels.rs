//! Class level entries and the primary/multiclass composition.

use crate::error::SheetError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One class the character has levels in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLevelEntry {
    /// Class name, e.g. "Wizard".
    pub name: String,
    /// Subclass once selected.
    pub subclass: Option<String>,
    pub level: u32,
}

impl ClassLevelEntry {
    /// Create an entry, validating the level to 1-20.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sheetstat::ClassLevelEntry;
    ///
    /// let entry = ClassLevelEntry::new("Wizard", 5).unwrap();
    /// assert_eq!(entry.level, 5);
    /// assert!(ClassLevelEntry::new("Wizard", 0).is_err());
    /// ```
    pub fn new(name: impl Into<String>, level: u32) -> Result<Self, SheetError> {
        if !(1..=20).contains(&level) {
            return Err(SheetError::LevelOutOfRange(level));
        }
        Ok(Self {
            name: name.into(),
            subclass: None,
            level,
        })
    }

    /// Attach a subclass.
    pub fn with_subclass(mut self, subclass: impl Into<String>) -> Self {
        self.subclass = Some(subclass.into());
        self
    }
}

/// The character's full class composition: one primary entry plus any
/// number of multiclass entries, in the order they were taken.
///
/// # Examples
///
/// ```rust
/// use sheetstat::{ClassLevelEntry, ClassLevels};
///
/// let mut classes = ClassLevels::new(ClassLevelEntry::new("Fighter", 5).unwrap());
/// classes.multiclass.push(ClassLevelEntry::new("Rogue", 3).unwrap());
/// assert_eq!(classes.total_level(), 8);
/// assert!(classes.is_multiclass());
/// assert_eq!(classes.level_in("Rogue"), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLevels {
    pub primary: ClassLevelEntry,
    pub multiclass: Vec<ClassLevelEntry>,
}

impl Default for ClassLevels {
    fn default() -> Self {
        Self {
            primary: ClassLevelEntry {
                name: "Fighter".to_string(),
                subclass: None,
                level: 1,
            },
            multiclass: Vec::new(),
        }
    }
}

impl ClassLevels {
    /// Single-class composition.
    pub fn new(primary: ClassLevelEntry) -> Self {
        Self {
            primary,
            multiclass: Vec::new(),
        }
    }

    /// Sum of all entries' levels.
    pub fn total_level(&self) -> u32 {
        self.primary.level + self.multiclass.iter().map(|entry| entry.level).sum::<u32>()
    }

    /// Whether any multiclass entry exists.
    pub fn is_multiclass(&self) -> bool {
        !self.multiclass.is_empty()
    }

    /// Every entry, primary first, then multiclass entries in order.
    pub fn entries(&self) -> impl Iterator<Item = &ClassLevelEntry> {
        std::iter::once(&self.primary).chain(self.multiclass.iter())
    }

    /// Names of every class with levels, primary first.
    pub fn class_names(&self) -> Vec<&str> {
        self.entries().map(|entry| entry.name.as_str()).collect()
    }

    /// Levels held in a class, summed across entries.
    pub fn level_in(&self, class_name: &str) -> u32 {
        self.entries()
            .filter(|entry| entry.name == class_name)
            .map(|entry| entry.level)
            .sum()
    }

    /// Class name to summed level.
    pub fn class_levels(&self) -> BTreeMap<String, u32> {
        let mut levels = BTreeMap::new();
        for entry in self.entries() {
            *levels.entry(entry.name.clone()).or_insert(0) += entry.level;
        }
        levels
    }

    /// The multiclass entry for a class, if one exists.
    pub fn multiclass_entry_mut(&mut self, class_name: &str) -> Option<&mut ClassLevelEntry> {
        self.multiclass
            .iter_mut()
            .find(|entry| entry.name == class_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_fighter_one() {
        let classes = ClassLevels::default();
        assert_eq!(classes.primary.name, "Fighter");
        assert_eq!(classes.total_level(), 1);
        assert!(!classes.is_multiclass());
    }

    #[test]
    fn test_entry_level_validation() {
        assert!(matches!(
            ClassLevelEntry::new("Bard", 0),
            Err(SheetError::LevelOutOfRange(0))
        ));
        assert!(matches!(
            ClassLevelEntry::new("Bard", 21),
            Err(SheetError::LevelOutOfRange(21))
        ));
    }

    #[test]
    fn test_total_level_multiclass() {
        let mut classes = ClassLevels::new(ClassLevelEntry::new("Fighter", 5).unwrap());
        classes.multiclass.push(ClassLevelEntry::new("Rogue", 3).unwrap());
        classes.multiclass.push(ClassLevelEntry::new("Wizard", 2).unwrap());
        assert_eq!(classes.total_level(), 10);
        assert_eq!(classes.class_names(), vec!["Fighter", "Rogue", "Wizard"]);
    }

    #[test]
    fn test_class_levels_sums_duplicates() {
        let mut classes = ClassLevels::new(ClassLevelEntry::new("Fighter", 2).unwrap());
        classes.multiclass.push(ClassLevelEntry::new("Fighter", 3).unwrap());
        assert_eq!(classes.class_levels()["Fighter"], 5);
        assert_eq!(classes.level_in("Fighter"), 5);
    }

    #[test]
    fn test_entries_order_primary_first() {
        let mut classes = ClassLevels::new(ClassLevelEntry::new("Paladin", 6).unwrap());
        classes.multiclass.push(ClassLevelEntry::new("Sorcerer", 14).unwrap());
        let names: Vec<_> = classes.entries().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Paladin", "Sorcerer"]);
    }
}
