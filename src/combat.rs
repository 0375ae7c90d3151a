//! The combat profile: armor class, speed, hit points, hit dice, death saves.

use crate::hit_dice::{DiceCounter, HitDicePool};
use crate::hit_points::{DeathSaves, HitPoints};
use serde::{Deserialize, Serialize};

/// Combat-facing state of a character.
///
/// Hit dice are held two ways: `hit_dice` is the legacy single-counter
/// view and `hit_dice_pool` the per-die-size pool. `sync_hit_dice`
/// rebuilds the pool from the class composition and re-derives the
/// single counter from it; a record without a pool (written before pools
/// existed) is upgraded on its first sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combat {
    pub armor_class: i32,
    pub armor_class_bonus: i32,
    pub initiative_bonus: i32,
    pub speed: i32,
    pub speed_bonus: i32,
    pub hit_points: HitPoints,
    pub hit_dice: DiceCounter,
    pub hit_dice_pool: Option<HitDicePool>,
    pub death_saves: DeathSaves,
}

impl Default for Combat {
    fn default() -> Self {
        Self {
            armor_class: 10,
            armor_class_bonus: 0,
            initiative_bonus: 0,
            speed: 30,
            speed_bonus: 0,
            hit_points: HitPoints::default(),
            hit_dice: DiceCounter::default(),
            hit_dice_pool: None,
            death_saves: DeathSaves::default(),
        }
    }
}

impl Combat {
    /// Armor class with bonuses.
    pub fn total_ac(&self) -> i32 {
        self.armor_class + self.armor_class_bonus
    }

    /// Speed with bonuses.
    pub fn total_speed(&self) -> i32 {
        self.speed + self.speed_bonus
    }

    /// Hit dice display string, preferring the pool when present.
    pub fn hit_dice_display(&self) -> String {
        match &self.hit_dice_pool {
            Some(pool) if !pool.is_empty() => pool.display_string(),
            _ => format!(
                "{}/{}{}",
                self.hit_dice.remaining, self.hit_dice.total, self.hit_dice.die
            ),
        }
    }

    /// Get the hit dice pool, upgrading from the single counter if needed.
    pub fn ensure_hit_dice_pool(&mut self) -> &mut HitDicePool {
        self.hit_dice_pool
            .get_or_insert_with(|| HitDicePool::from_single(&self.hit_dice))
    }
}
