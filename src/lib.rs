//! Grid Chase - a grid-based 2D chase game engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (shapes, collision, movement, steering, weapon)
//! - `settings`: Data-driven game balance and map layout

pub mod settings;
pub mod sim;

pub use settings::{ObstacleRect, Settings, SettingsError};

use glam::{IVec2, Vec2};

/// Game configuration constants (defaults for [`Settings`])
pub mod consts {
    /// Grid dimensions in cells
    pub const GRID_COLS: i32 = 70;
    pub const GRID_ROWS: i32 = 70;

    /// Nominal frame rate the outer loop drives the sim at
    pub const FPS: u32 = 60;
    /// Elapsed time of one nominal frame (seconds)
    pub const FRAME_DT: f32 = 1.0 / FPS as f32;

    /// Player defaults
    pub const PLAYER_MAX_HP: u32 = 100;
    /// Cells moved per accepted step
    pub const PLAYER_STEP: f32 = 1.0;
    /// Ticks to wait after a step before the next one is accepted
    pub const PLAYER_MOVE_DELAY: u32 = 3;

    /// Enemy defaults
    pub const ENEMY_MAX_HP: u32 = 50;
    /// Cells per tick
    pub const ENEMY_SPEED: f32 = 0.15;
    pub const ENEMY_CONTACT_DAMAGE: u32 = 10;
    /// Seconds between contact damage applications
    pub const ENEMY_CONTACT_COOLDOWN: f32 = 1.0;
    pub const ENEMY_SPAWN_INTERVAL: f32 = 2.0;
    pub const MAX_ENEMIES: usize = 50;

    /// Health potion defaults
    pub const HEALTH_POTION_HEAL: u32 = 20;
    pub const POTION_SPAWN_INTERVAL: f32 = 10.0;
    pub const MAX_POTIONS: usize = 3;

    /// Sword defaults
    pub const SWORD_DAMAGE: u32 = 50;
    pub const SWORD_COOLDOWN: f32 = 1.0;
    pub const SWORD_RANGE: f32 = 5.0;
    pub const SWORD_EFFECT_DURATION: f32 = 0.2;

    /// Manhattan distance beyond which two movers can't collide this tick
    pub const COLLISION_CHECK_DISTANCE: f32 = 12.0;
}

/// Grid cell containing a point (floor on both axes, also for negatives)
#[inline]
pub fn cell_of(pos: Vec2) -> IVec2 {
    pos.floor().as_ivec2()
}

/// Manhattan distance between two points
#[inline]
pub fn manhattan(a: Vec2, b: Vec2) -> f32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_of_floors_negative_coordinates() {
        assert_eq!(cell_of(Vec2::new(1.7, 2.2)), IVec2::new(1, 2));
        assert_eq!(cell_of(Vec2::new(-0.5, -1.0)), IVec2::new(-1, -1));
        assert_eq!(cell_of(Vec2::new(-1.01, 0.0)), IVec2::new(-2, 0));
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(manhattan(Vec2::new(1.0, 1.0), Vec2::new(4.0, -3.0)), 7.0);
    }
}
