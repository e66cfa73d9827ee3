//! Player and Guardian stat blocks.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{AmiabilityThresholds, HealthThresholds};
use crate::constants::{AMIABILITY_MAX, AMIABILITY_MIN};
use crate::numbers::{ratio, u32_to_i32_saturating};

/// Player hit points and magic points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterStats {
    pub hp: i32,
    pub max_hp: i32,
    pub mp: i32,
    pub max_mp: i32,
}

impl Default for CharacterStats {
    fn default() -> Self {
        Self {
            hp: 100,
            max_hp: 100,
            mp: 50,
            max_mp: 50,
        }
    }
}

impl CharacterStats {
    pub fn clamp(&mut self) {
        self.max_hp = self.max_hp.max(0);
        self.max_mp = self.max_mp.max(0);
        self.hp = self.hp.clamp(0, self.max_hp);
        self.mp = self.mp.clamp(0, self.max_mp);
    }

    /// Subtract `amount` hp, returning the hp actually lost.
    pub fn take_damage(&mut self, amount: u32) -> i32 {
        let before = self.hp;
        self.hp = self.hp.saturating_sub(u32_to_i32_saturating(amount));
        self.clamp();
        before - self.hp
    }

    /// Restore hp and mp, returning the `(hp, mp)` actually gained.
    pub fn restore(&mut self, hp: i32, mp: i32) -> (i32, i32) {
        let (hp_before, mp_before) = (self.hp, self.mp);
        self.hp = self.hp.saturating_add(hp.max(0));
        self.mp = self.mp.saturating_add(mp.max(0));
        self.clamp();
        (self.hp - hp_before, self.mp - mp_before)
    }

    /// Spend `cost` mp when affordable; leaves the stats untouched otherwise.
    pub fn spend_mp(&mut self, cost: i32) -> bool {
        if self.mp < cost {
            return false;
        }
        self.mp -= cost.max(0);
        self.clamp();
        true
    }

    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    #[must_use]
    pub fn condition(&self, thresholds: &HealthThresholds) -> HealthCondition {
        let share = ratio(self.hp, self.max_hp);
        if share < thresholds.critical {
            HealthCondition::Critical
        } else if share < thresholds.weakened {
            HealthCondition::Weakened
        } else {
            HealthCondition::Healthy
        }
    }
}

/// Guardian hit points and disposition towards the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub hp: i32,
    pub max_hp: i32,
    pub amiability: i32,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self {
            hp: 100,
            max_hp: 100,
            amiability: 50,
        }
    }
}

impl EnemyStats {
    pub fn clamp(&mut self) {
        self.max_hp = self.max_hp.max(0);
        self.hp = self.hp.clamp(0, self.max_hp);
        self.amiability = self.amiability.clamp(AMIABILITY_MIN, AMIABILITY_MAX);
    }

    /// Shift amiability by `delta`, returning the change that survived clamping.
    pub fn adjust_amiability(&mut self, delta: i32) -> i32 {
        let before = self.amiability;
        self.amiability = self.amiability.saturating_add(delta);
        self.clamp();
        self.amiability - before
    }

    #[must_use]
    pub const fn disposition(&self, thresholds: &AmiabilityThresholds) -> Disposition {
        Disposition::from_amiability(self.amiability, thresholds)
    }
}

/// Visual state of the player derived from the hp share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthCondition {
    Healthy,
    Weakened,
    Critical,
}

/// Guardian mood bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    Hostile,
    Neutral,
    Friendly,
}

impl Disposition {
    #[must_use]
    pub const fn from_amiability(amiability: i32, thresholds: &AmiabilityThresholds) -> Self {
        if amiability < thresholds.hostile {
            Self::Hostile
        } else if amiability < thresholds.friendly {
            Self::Neutral
        } else {
            Self::Friendly
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hostile => "hostile",
            Self::Neutral => "neutral",
            Self::Friendly => "friendly",
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_and_restore_clamp_to_bounds() {
        let mut stats = CharacterStats::default();
        assert_eq!(stats.take_damage(30), 30);
        assert_eq!(stats.hp, 70);
        assert_eq!(stats.take_damage(500), 70);
        assert_eq!(stats.hp, 0);
        assert!(stats.is_defeated());

        let gained = stats.restore(250, 10);
        assert_eq!(gained, (100, 0));
        assert_eq!(stats.hp, stats.max_hp);
        assert_eq!(stats.mp, stats.max_mp);
    }

    #[test]
    fn spend_mp_refuses_when_short() {
        let mut stats = CharacterStats {
            mp: 15,
            ..CharacterStats::default()
        };
        assert!(!stats.spend_mp(20));
        assert_eq!(stats.mp, 15);
        assert!(stats.spend_mp(15));
        assert_eq!(stats.mp, 0);
    }

    #[test]
    fn condition_uses_health_thresholds() {
        let thresholds = HealthThresholds::default();
        let mut stats = CharacterStats::default();
        assert_eq!(stats.condition(&thresholds), HealthCondition::Healthy);
        stats.hp = 49;
        assert_eq!(stats.condition(&thresholds), HealthCondition::Weakened);
        stats.hp = 9;
        assert_eq!(stats.condition(&thresholds), HealthCondition::Critical);
        stats.hp = 10;
        assert_eq!(stats.condition(&thresholds), HealthCondition::Weakened);
    }

    #[test]
    fn amiability_clamps_for_any_delta() {
        for start in [0, 1, 50, 99, 100] {
            for delta in [i32::MIN, -250, -12, 0, 9, 250, i32::MAX] {
                let mut enemy = EnemyStats {
                    amiability: start,
                    ..EnemyStats::default()
                };
                enemy.adjust_amiability(delta);
                assert!((0..=100).contains(&enemy.amiability), "{start} {delta}");
            }
        }
    }

    #[test]
    fn disposition_buckets_on_thresholds() {
        let thresholds = AmiabilityThresholds::default();
        assert_eq!(Disposition::from_amiability(29, &thresholds), Disposition::Hostile);
        assert_eq!(Disposition::from_amiability(30, &thresholds), Disposition::Neutral);
        assert_eq!(Disposition::from_amiability(69, &thresholds), Disposition::Neutral);
        assert_eq!(Disposition::from_amiability(70, &thresholds), Disposition::Friendly);
    }
}
