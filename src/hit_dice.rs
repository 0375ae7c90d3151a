//! Hit dice pools.
//!
//! Hit dice are tracked per die size so multiclass characters keep
//! separate counters, e.g. a Fighter 5 / Wizard 3 holds `5d10` and `3d6`.
//! A legacy single-counter view (`DiceCounter`) is kept alongside the pool
//! for display and for records written before pools existed.

use crate::error::SheetError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::str::FromStr;

/// A die size, ordered by side count.
///
/// Serializes as the usual token (`"d10"`), so pool maps keyed by `Die`
/// stay readable in serialized records.
///
/// # Examples
///
/// ```rust
/// use sheetstat::Die;
///
/// let die: Die = "d10".parse().unwrap();
/// assert_eq!(die, Die::D10);
/// assert_eq!(die.sides(), 10);
/// assert_eq!(die.to_string(), "d10");
/// assert!(Die::D6 < Die::D12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Die(u32);

impl Die {
    pub const D6: Die = Die(6);
    pub const D8: Die = Die(8);
    pub const D10: Die = Die(10);
    pub const D12: Die = Die(12);

    /// Create a die with the given number of sides (must be positive).
    pub fn new(sides: u32) -> Result<Die, SheetError> {
        if sides == 0 {
            return Err(SheetError::InvalidDie("d0".to_string()));
        }
        Ok(Die(sides))
    }

    /// Number of sides.
    pub fn sides(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.0)
    }
}

impl FromStr for Die {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sides = s
            .strip_prefix('d')
            .and_then(|digits| digits.parse::<u32>().ok())
            .ok_or_else(|| SheetError::InvalidDie(s.to_string()))?;
        Die::new(sides).map_err(|_| SheetError::InvalidDie(s.to_string()))
    }
}

impl Serialize for Die {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Die {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Total and remaining dice of a single size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceCounter {
    pub total: u32,
    pub remaining: u32,
    pub die: Die,
}

impl Default for DiceCounter {
    fn default() -> Self {
        Self {
            total: 1,
            remaining: 1,
            die: Die::D8,
        }
    }
}

impl DiceCounter {
    /// A full counter: `count` dice, all remaining.
    pub fn full(die: Die, count: u32) -> Self {
        Self {
            total: count,
            remaining: count,
            die,
        }
    }
}

/// Hit dice grouped by die size.
///
/// # Examples
///
/// ```rust
/// use sheetstat::{Die, HitDicePool};
///
/// let mut pool = HitDicePool::default();
/// pool.add_dice(Die::D10, 5);
/// pool.add_dice(Die::D6, 3);
/// assert_eq!(pool.total(), 8);
/// assert_eq!(pool.spend_any(), Some(Die::D10)); // larger dice first
/// assert_eq!(pool.remaining(), 7);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitDicePool {
    /// Counters keyed by die size; keys are distinct positive sizes.
    pub pools: BTreeMap<Die, DiceCounter>,
}

impl HitDicePool {
    /// Total dice across all sizes.
    pub fn total(&self) -> u32 {
        self.pools.values().map(|counter| counter.total).sum()
    }

    /// Remaining dice across all sizes.
    pub fn remaining(&self) -> u32 {
        self.pools.values().map(|counter| counter.remaining).sum()
    }

    /// Whether no dice of any size are tracked.
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Add dice of one size; new dice start remaining.
    pub fn add_dice(&mut self, die: Die, count: u32) {
        let counter = self
            .pools
            .entry(die)
            .or_insert_with(|| DiceCounter::full(die, 0));
        counter.total += count;
        counter.remaining += count;
    }

    /// Remove dice of one size, dropping the entry once its total hits 0.
    ///
    /// Returns false if the size is not tracked.
    pub fn remove_dice(&mut self, die: Die, count: u32) -> bool {
        let Some(counter) = self.pools.get_mut(&die) else {
            return false;
        };
        counter.total = counter.total.saturating_sub(count);
        counter.remaining = counter.remaining.min(counter.total);
        if counter.total == 0 {
            self.pools.remove(&die);
        }
        true
    }

    /// Spend one die of the given size. Returns false if none remain.
    pub fn spend(&mut self, die: Die) -> bool {
        match self.pools.get_mut(&die) {
            Some(counter) if counter.remaining > 0 => {
                counter.remaining -= 1;
                true
            }
            _ => false,
        }
    }

    /// Spend one die, preferring larger sizes. Returns the size spent.
    pub fn spend_any(&mut self) -> Option<Die> {
        for (die, counter) in self.pools.iter_mut().rev() {
            if counter.remaining > 0 {
                counter.remaining -= 1;
                return Some(*die);
            }
        }
        None
    }

    /// Recover up to `count` spent dice, larger sizes first.
    ///
    /// Returns the number actually recovered.
    pub fn recover(&mut self, count: u32) -> u32 {
        let mut recovered = 0;
        for counter in self.pools.values_mut().rev() {
            let can_recover = (count - recovered).min(counter.total - counter.remaining);
            counter.remaining += can_recover;
            recovered += can_recover;
            if recovered >= count {
                break;
            }
        }
        recovered
    }

    /// Mark every die as remaining.
    pub fn recover_all(&mut self) {
        for counter in self.pools.values_mut() {
            counter.remaining = counter.total;
        }
    }

    /// Display string like `"5/5d10 + 2/3d6"`, larger sizes first.
    pub fn display_string(&self) -> String {
        if self.pools.is_empty() {
            return "None".to_string();
        }
        self.pools
            .iter()
            .rev()
            .map(|(die, counter)| format!("{}/{}{}", counter.remaining, counter.total, die))
            .collect::<Vec<_>>()
            .join(" + ")
    }

    /// Build a pool from a legacy single counter.
    pub fn from_single(counter: &DiceCounter) -> Self {
        let mut pool = HitDicePool::default();
        if counter.total > 0 {
            pool.pools.insert(counter.die, counter.clone());
        }
        pool
    }

    /// Collapse to a legacy single counter: summed counts, labelled with
    /// the largest die size present.
    pub fn to_single(&self) -> DiceCounter {
        let Some(largest) = self.pools.keys().next_back() else {
            return DiceCounter {
                total: 0,
                remaining: 0,
                die: Die::D8,
            };
        };
        DiceCounter {
            total: self.total(),
            remaining: self.remaining(),
            die: *largest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_die_parse_and_display() {
        assert_eq!("d12".parse::<Die>().unwrap(), Die::D12);
        assert_eq!(Die::D6.to_string(), "d6");
        assert!(matches!("12".parse::<Die>(), Err(SheetError::InvalidDie(_))));
        assert!(matches!("d0".parse::<Die>(), Err(SheetError::InvalidDie(_))));
    }

    #[test]
    fn test_die_serde_token() {
        let json = serde_json::to_string(&Die::D10).unwrap();
        assert_eq!(json, "\"d10\"");
        let back: Die = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Die::D10);
    }

    #[test]
    fn test_add_and_remove_dice() {
        let mut pool = HitDicePool::default();
        pool.add_dice(Die::D10, 5);
        pool.add_dice(Die::D10, 1);
        assert_eq!(pool.pools[&Die::D10].total, 6);

        assert!(pool.remove_dice(Die::D10, 6));
        assert!(pool.is_empty());
        assert!(!pool.remove_dice(Die::D6, 1));
    }

    #[test]
    fn test_remove_clamps_remaining() {
        let mut pool = HitDicePool::default();
        pool.add_dice(Die::D8, 4);
        pool.remove_dice(Die::D8, 2);
        assert_eq!(pool.pools[&Die::D8].remaining, 2);
    }

    #[test]
    fn test_spend_any_prefers_larger_dice() {
        let mut pool = HitDicePool::default();
        pool.add_dice(Die::D6, 2);
        pool.add_dice(Die::D12, 1);
        assert_eq!(pool.spend_any(), Some(Die::D12));
        assert_eq!(pool.spend_any(), Some(Die::D6));
        assert_eq!(pool.spend_any(), Some(Die::D6));
        assert_eq!(pool.spend_any(), None);
    }

    #[test]
    fn test_recover_larger_first() {
        let mut pool = HitDicePool::default();
        pool.add_dice(Die::D10, 4);
        pool.add_dice(Die::D6, 3);
        for _ in 0..5 {
            pool.spend_any();
        }
        // d10 drained (4 spent) plus one d6
        assert_eq!(pool.remaining(), 2);

        let recovered = pool.recover(3);
        assert_eq!(recovered, 3);
        assert_eq!(pool.pools[&Die::D10].remaining, 3);
        assert_eq!(pool.pools[&Die::D6].remaining, 2);
    }

    #[test]
    fn test_recover_caps_at_totals() {
        let mut pool = HitDicePool::default();
        pool.add_dice(Die::D8, 2);
        pool.spend(Die::D8);
        assert_eq!(pool.recover(10), 1);
        assert_eq!(pool.remaining(), 2);
    }

    #[test]
    fn test_display_string_format() {
        let mut pool = HitDicePool::default();
        pool.add_dice(Die::D10, 5);
        pool.add_dice(Die::D6, 3);
        pool.spend(Die::D6);
        assert_eq!(pool.display_string(), "5/5d10 + 2/3d6");
        assert_eq!(HitDicePool::default().display_string(), "None");
    }

    #[test]
    fn test_single_counter_round_trip() {
        let mut pool = HitDicePool::default();
        pool.add_dice(Die::D10, 5);
        pool.add_dice(Die::D6, 3);
        pool.spend(Die::D10);

        let single = pool.to_single();
        assert_eq!(single.total, 8);
        assert_eq!(single.remaining, 7);
        assert_eq!(single.die, Die::D10);

        let rebuilt = HitDicePool::from_single(&single);
        assert_eq!(rebuilt.pools[&Die::D10].total, 8);
    }

    #[test]
    fn test_to_single_of_empty_pool() {
        let single = HitDicePool::default().to_single();
        assert_eq!(single.total, 0);
        assert_eq!(single.remaining, 0);
    }
}
