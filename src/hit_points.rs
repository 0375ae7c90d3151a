//! Hit point and death save tracking.

use serde::{Deserialize, Serialize};

/// Current hit point status.
///
/// `current` is clamped to `0..=maximum` by the engine's damage and heal
/// operations, never by this type itself; legitimate sequences (a dropped
/// maximum, for instance) may leave `current > maximum` until the next
/// operation corrects it.
///
/// # Examples
///
/// ```rust
/// use sheetstat::HitPoints;
///
/// let hp = HitPoints { maximum: 20, current: 8, temporary: 5 };
/// assert_eq!(hp.effective(), 13);
/// assert!(hp.is_bloodied());
/// assert!(!hp.is_unconscious());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPoints {
    pub maximum: i32,
    pub current: i32,
    pub temporary: i32,
}

impl Default for HitPoints {
    fn default() -> Self {
        Self {
            maximum: 1,
            current: 1,
            temporary: 0,
        }
    }
}

impl HitPoints {
    /// Current plus temporary HP.
    pub fn effective(&self) -> i32 {
        self.current + self.temporary
    }

    /// At or below half maximum.
    pub fn is_bloodied(&self) -> bool {
        self.current <= self.maximum / 2
    }

    /// At 0 HP.
    pub fn is_unconscious(&self) -> bool {
        self.current <= 0
    }
}

/// Death saving throw counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathSaves {
    pub successes: u8,
    pub failures: u8,
}

impl DeathSaves {
    /// Record one success, capped at three.
    pub fn record_success(&mut self) {
        self.successes = (self.successes + 1).min(3);
    }

    /// Record one failure, capped at three.
    pub fn record_failure(&mut self) {
        self.failures = (self.failures + 1).min(3);
    }

    /// Three successes means stable.
    pub fn is_stable(&self) -> bool {
        self.successes >= 3
    }

    /// Three failures means dead.
    pub fn is_dead(&self) -> bool {
        self.failures >= 3
    }

    /// Clear both counters (on healing or stabilization).
    pub fn reset(&mut self) {
        self.successes = 0;
        self.failures = 0;
    }
}
