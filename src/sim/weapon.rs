//! Area weapon
//!
//! The sword charges with elapsed time and, once ready, damages every
//! candidate whose centroid lies within range of the origin. A short
//! cosmetic window runs independently of the cooldown. Removing slain
//! entities is left to the caller.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId};
use crate::consts::*;

/// Cooldown state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponState {
    /// Still charging
    Idle,
    /// Cooldown elapsed, next fire is allowed
    Ready,
}

/// Circular area-of-effect weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sword {
    pub damage: u32,
    /// Seconds between swings
    pub cooldown: f32,
    /// Reach in grid units, inclusive
    pub range: f32,
    /// Seconds since the last swing
    elapsed: f32,
    effect_active: bool,
    effect_elapsed: f32,
    /// Seconds the swing effect stays visible
    pub effect_duration: f32,
}

impl Default for Sword {
    fn default() -> Self {
        Self::new(SWORD_DAMAGE, SWORD_COOLDOWN, SWORD_RANGE, SWORD_EFFECT_DURATION)
    }
}

impl Sword {
    pub fn new(damage: u32, cooldown: f32, range: f32, effect_duration: f32) -> Self {
        Self {
            damage,
            cooldown,
            range,
            elapsed: 0.0,
            effect_active: false,
            effect_elapsed: 0.0,
            effect_duration,
        }
    }

    /// Advance cooldown and effect timers
    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        if self.effect_active {
            self.effect_elapsed += dt;
            if self.effect_elapsed >= self.effect_duration {
                self.effect_active = false;
            }
        }
    }

    pub fn state(&self) -> WeaponState {
        if self.elapsed >= self.cooldown {
            WeaponState::Ready
        } else {
            WeaponState::Idle
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state() == WeaponState::Ready
    }

    /// Seconds since the last swing
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn effect_active(&self) -> bool {
        self.effect_active
    }

    /// Remaining effect strength, 1.0 right after a swing fading to 0.0
    pub fn effect_strength(&self) -> f32 {
        if !self.effect_active || self.effect_duration <= 0.0 {
            return 0.0;
        }
        (1.0 - self.effect_elapsed / self.effect_duration).clamp(0.0, 1.0)
    }

    /// Swing regardless of cooldown. Damages candidates within range of
    /// `origin` and returns their ids in candidate order.
    pub fn fire(&mut self, origin: Vec2, candidates: &mut [Entity]) -> Vec<EntityId> {
        let range_sq = self.range * self.range;
        let mut hits = Vec::new();
        for candidate in candidates.iter_mut() {
            if candidate.centroid().distance_squared(origin) <= range_sq {
                candidate.take_damage(self.damage);
                hits.push(candidate.id);
            }
        }

        self.elapsed = 0.0;
        self.effect_active = true;
        self.effect_elapsed = 0.0;
        hits
    }

    /// Swing only when ready
    pub fn try_fire(&mut self, origin: Vec2, candidates: &mut [Entity]) -> Option<Vec<EntityId>> {
        if self.is_ready() {
            Some(self.fire(origin, candidates))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shape::Shape;

    fn enemy_at(id: u32, x: f32, y: f32) -> Entity {
        Entity::enemy(EntityId(id), Vec2::new(x, y), Shape::single(), ENEMY_SPEED, ENEMY_MAX_HP)
    }

    #[test]
    fn test_cooldown_state_machine() {
        let mut sword = Sword::new(50, 1.0, 5.0, 0.2);
        assert_eq!(sword.state(), WeaponState::Idle);
        sword.update(0.5);
        assert!(sword.try_fire(Vec2::ZERO, &mut []).is_none());
        sword.update(0.5);
        assert_eq!(sword.state(), WeaponState::Ready);
        assert!(sword.try_fire(Vec2::ZERO, &mut []).is_some());
        assert_eq!(sword.state(), WeaponState::Idle);
        assert_eq!(sword.elapsed(), 0.0);

        sword.update(0.5);
        assert!(!sword.is_ready());
        sword.update(0.5);
        assert!(sword.is_ready());
    }

    #[test]
    fn test_hits_in_range_and_kills() {
        let mut sword = Sword::default();
        let mut enemies = vec![enemy_at(1, 10.0, 10.0), enemy_at(2, 50.0, 50.0)];
        let hits = sword.fire(Vec2::new(10.0, 10.0), &mut enemies);
        assert_eq!(hits, vec![EntityId(1)]);
        assert!(enemies[0].is_dead());
        assert!(!enemies[1].is_dead());
    }

    #[test]
    fn test_hits_multiple() {
        let mut sword = Sword::default();
        let mut enemies = vec![
            enemy_at(1, 10.0, 10.0),
            enemy_at(2, 11.0, 10.0),
            enemy_at(3, 10.0, 11.0),
        ];
        let hits = sword.fire(Vec2::new(10.0, 10.0), &mut enemies);
        assert_eq!(hits.len(), 3);
        assert!(enemies.iter().all(|e| e.is_dead()));
    }

    #[test]
    fn test_range_boundary_inclusive() {
        let mut sword = Sword::new(10, 1.0, 5.0, 0.2);
        let mut enemies = vec![enemy_at(1, 10.0, 15.0), enemy_at(2, 10.0, 15.001)];
        let hits = sword.fire(Vec2::new(10.0, 10.0), &mut enemies);
        assert_eq!(hits, vec![EntityId(1)]);
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut sword = Sword::new(500, 1.0, 5.0, 0.2);
        let mut enemies = vec![enemy_at(1, 10.0, 10.0)];
        let _ = sword.fire(Vec2::new(10.0, 10.0), &mut enemies);
        assert_eq!(enemies[0].health.map(|h| h.current()), Some(0));
    }

    #[test]
    fn test_effect_window() {
        let mut sword = Sword::default();
        assert!(!sword.effect_active());

        // Effect starts even when nothing is hit
        let hits = sword.fire(Vec2::new(10.0, 10.0), &mut []);
        assert!(hits.is_empty());
        assert!(sword.effect_active());
        assert_eq!(sword.effect_strength(), 1.0);

        sword.update(0.1);
        assert!(sword.effect_active());
        assert!(sword.effect_strength() < 1.0);

        sword.update(0.2);
        assert!(!sword.effect_active());
        assert_eq!(sword.effect_strength(), 0.0);
    }
}
