//! Game settings and balance
//!
//! Loaded from a JSON file; any field left out keeps its default.

use std::path::Path;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::collision::footprints_overlap;
use crate::sim::movement::Grid;
use crate::sim::shape::{Shape, ShapeError};
use crate::sim::weapon::Sword;

/// Why a settings file was rejected
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("enemy shape #{index} is invalid: {source}")]
    Shape {
        index: usize,
        #[source]
        source: ShapeError,
    },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Static obstacle, top-left cell plus size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl ObstacleRect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn origin(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }
}

/// Tunable game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Grid ===
    pub grid_cols: i32,
    pub grid_rows: i32,

    // === Player ===
    pub player_max_hp: u32,
    /// Cells per accepted step
    pub player_step: f32,
    /// Ticks between accepted steps
    pub player_move_delay: u32,

    // === Enemies ===
    pub enemy_max_hp: u32,
    /// Cells per tick
    pub enemy_speed: f32,
    pub enemy_contact_damage: u32,
    /// Seconds between contact damage applications
    pub enemy_contact_cooldown: f32,
    /// Seconds between spawns
    pub enemy_spawn_interval: f32,
    pub max_enemies: usize,
    /// Footprints spawned enemies are drawn from
    pub enemy_shapes: Vec<Shape>,

    // === Potions ===
    pub potion_heal: u32,
    pub potion_spawn_interval: f32,
    pub max_potions: usize,

    // === Sword ===
    pub sword_damage: u32,
    pub sword_cooldown: f32,
    pub sword_range: f32,
    pub sword_effect_duration: f32,

    // === Steering ===
    /// Manhattan prefilter for peer collision checks
    pub collision_check_distance: f32,

    // === Map ===
    pub obstacles: Vec<ObstacleRect>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_cols: GRID_COLS,
            grid_rows: GRID_ROWS,

            player_max_hp: PLAYER_MAX_HP,
            player_step: PLAYER_STEP,
            player_move_delay: PLAYER_MOVE_DELAY,

            enemy_max_hp: ENEMY_MAX_HP,
            enemy_speed: ENEMY_SPEED,
            enemy_contact_damage: ENEMY_CONTACT_DAMAGE,
            enemy_contact_cooldown: ENEMY_CONTACT_COOLDOWN,
            enemy_spawn_interval: ENEMY_SPAWN_INTERVAL,
            max_enemies: MAX_ENEMIES,
            enemy_shapes: Shape::enemy_catalogue(),

            potion_heal: HEALTH_POTION_HEAL,
            potion_spawn_interval: POTION_SPAWN_INTERVAL,
            max_potions: MAX_POTIONS,

            sword_damage: SWORD_DAMAGE,
            sword_cooldown: SWORD_COOLDOWN,
            sword_range: SWORD_RANGE,
            sword_effect_duration: SWORD_EFFECT_DURATION,

            collision_check_distance: COLLISION_CHECK_DISTANCE,

            obstacles: vec![
                ObstacleRect::new(15, 15, 4, 4),
                ObstacleRect::new(50, 14, 3, 6),
                ObstacleRect::new(14, 50, 6, 3),
                ObstacleRect::new(50, 50, 4, 4),
                ObstacleRect::new(33, 10, 4, 2),
                ObstacleRect::new(33, 58, 4, 2),
            ],
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate a settings file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings from `path` if given, falling back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Ignoring {}: {err}; using default settings", path.display());
                Self::default()
            }
        }
    }

    /// Check ranges and shapes
    pub fn validate(&self) -> Result<(), SettingsError> {
        // Room for the 3x3 player footprint
        if self.grid_cols < 3 || self.grid_rows < 3 {
            return Err(invalid("grid", "grid must be at least 3x3 cells"));
        }
        if self.player_max_hp == 0 {
            return Err(invalid("player_max_hp", "must be positive"));
        }
        if self.enemy_max_hp == 0 {
            return Err(invalid("enemy_max_hp", "must be positive"));
        }

        let positive = [
            ("player_step", self.player_step),
            ("enemy_speed", self.enemy_speed),
            ("enemy_spawn_interval", self.enemy_spawn_interval),
            ("potion_spawn_interval", self.potion_spawn_interval),
            ("sword_cooldown", self.sword_cooldown),
            ("sword_range", self.sword_range),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("must be a positive number, got {value}")));
            }
        }
        let non_negative = [
            ("enemy_contact_cooldown", self.enemy_contact_cooldown),
            ("sword_effect_duration", self.sword_effect_duration),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, format!("must not be negative, got {value}")));
            }
        }

        if self.enemy_shapes.is_empty() {
            return Err(invalid("enemy_shapes", "at least one shape is required"));
        }
        let mut max_reach = 0;
        let mut max_spread = 0.0f32;
        for (index, shape) in self.enemy_shapes.iter().enumerate() {
            if !shape.is_connected() {
                return Err(SettingsError::Shape {
                    index,
                    source: ShapeError::Disconnected,
                });
            }
            let extent = shape.extent();
            if extent.width() > self.grid_cols || extent.height() > self.grid_rows {
                return Err(invalid(
                    "enemy_shapes",
                    format!("shape #{index} does not fit the grid"),
                ));
            }
            max_reach = max_reach.max(shape.reach());
            max_spread = max_spread.max(shape.spread());
        }

        // The prefilter must never skip a pair that could share a cell
        let required = self.required_check_distance(max_reach, max_spread);
        if self.collision_check_distance < required {
            return Err(invalid(
                "collision_check_distance",
                format!("must be at least {required} for the configured shapes"),
            ));
        }

        let player = Shape::plus();
        let start = self.player_start();
        for rect in &self.obstacles {
            if rect.width == 0 || rect.height == 0 {
                return Err(invalid("obstacles", format!("{rect:?} has no area")));
            }
            let inside = rect.x >= 0
                && rect.y >= 0
                && i64::from(rect.x) + i64::from(rect.width) <= i64::from(self.grid_cols)
                && i64::from(rect.y) + i64::from(rect.height) <= i64::from(self.grid_rows);
            if !inside {
                return Err(invalid("obstacles", format!("{rect:?} lies outside the grid")));
            }
            let footprint = Shape::rect(rect.width, rect.height)
                .map_err(|err| invalid("obstacles", format!("{rect:?}: {err}")))?;
            if footprints_overlap(&footprint, rect.origin().as_vec2(), &player, start) {
                return Err(invalid("obstacles", format!("{rect:?} covers the player start")));
            }
        }

        Ok(())
    }

    /// Smallest prefilter distance that still sees every pair able to share a cell.
    ///
    /// A mover's cells lie within `reach + speed` of its anchor and a peer's
    /// within `spread` of its centroid; flooring adds under 2 on each side.
    fn required_check_distance(&self, max_reach: i32, max_spread: f32) -> f32 {
        max_reach as f32 + max_spread + 4.0 + self.enemy_speed
    }

    /// Player anchor at session start, centring the plus footprint
    pub fn player_start(&self) -> Vec2 {
        Vec2::new((self.grid_cols / 2 - 1) as f32, (self.grid_rows / 2 - 1) as f32)
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_cols, self.grid_rows)
    }

    /// A fresh sword built from the sword settings
    pub fn sword(&self) -> Sword {
        Sword::new(
            self.sword_damage,
            self.sword_cooldown,
            self.sword_range,
            self.sword_effect_duration,
        )
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::collides;
    use crate::sim::entity::{Entity, EntityId};
    use crate::sim::steering::steer_pack;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.grid(), Grid::new(70, 70));
        assert_eq!(settings.enemy_shapes.len(), 6);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "grid_cols": 40, "sword_range": 3.5 }"#).unwrap();
        assert_eq!(settings.grid_cols, 40);
        assert_eq!(settings.sword_range, 3.5);
        assert_eq!(settings.grid_rows, GRID_ROWS);
        assert_eq!(settings.player_max_hp, PLAYER_MAX_HP);
    }

    #[test]
    fn test_custom_shapes_parse() {
        let settings = Settings::from_json(r#"{ "enemy_shapes": [[[0,0],[1,0],[2,0]]] }"#).unwrap();
        assert_eq!(settings.enemy_shapes.len(), 1);
        assert_eq!(settings.enemy_shapes[0].len(), 3);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Settings::from_json(r#"{ "enemy_speed": 0.0 }"#),
            Err(SettingsError::Invalid { field: "enemy_speed", .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "enemy_shapes": [[[0,0],[2,0]]] }"#),
            Err(SettingsError::Shape { index: 0, .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "enemy_shapes": [[]] }"#),
            Err(SettingsError::Parse(_))
        ));
        assert!(matches!(
            Settings::from_json(
                r#"{ "obstacles": [{ "x": 68, "y": 0, "width": 4, "height": 1 }] }"#
            ),
            Err(SettingsError::Invalid { field: "obstacles", .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "collision_check_distance": 2.0 }"#),
            Err(SettingsError::Invalid { field: "collision_check_distance", .. })
        ));
    }

    #[test]
    fn test_obstacle_on_player_start_rejected() {
        let json = r#"{ "obstacles": [{ "x": 35, "y": 35, "width": 1, "height": 1 }] }"#;
        assert!(matches!(
            Settings::from_json(json),
            Err(SettingsError::Invalid { field: "obstacles", .. })
        ));
    }

    #[test]
    fn test_huge_obstacles_rejected_without_panic() {
        for json in [
            r#"{ "obstacles": [{ "x": 2147483647, "y": 0, "width": 10, "height": 1 }] }"#,
            r#"{ "obstacles": [{ "x": 0, "y": 2147483647, "width": 1, "height": 10 }] }"#,
            r#"{ "obstacles": [{ "x": 0, "y": 0, "width": 4294967295, "height": 4294967295 }] }"#,
        ] {
            assert!(matches!(
                Settings::from_json(json),
                Err(SettingsError::Invalid { field: "obstacles", .. })
            ));
        }
    }

    #[test]
    fn test_far_offset_shape_needs_wider_check_distance() {
        let json = r#"{ "enemy_shapes": [[[20,20],[21,20]]] }"#;
        assert!(matches!(
            Settings::from_json(json),
            Err(SettingsError::Invalid { field: "collision_check_distance", .. })
        ));

        let json = r#"{ "enemy_shapes": [[[20,20],[21,20]]], "collision_check_distance": 46.0 }"#;
        let settings = Settings::from_json(json).unwrap();
        let shape = settings.enemy_shapes[0].clone();
        let mut movers = vec![
            Entity::enemy(EntityId(1), Vec2::new(0.5, 0.0), shape.clone(), 1.0, 50),
            Entity::enemy(EntityId(2), Vec2::new(2.0, 0.0), shape, 0.0, 50),
        ];
        let _ = steer_pack(
            &mut movers,
            Vec2::new(60.0, 20.5),
            &settings.grid(),
            &[],
            settings.collision_check_distance,
        );
        assert_eq!(movers[0].anchor, Vec2::new(0.5, 0.0));
        assert!(!collides(&movers[0], &movers[1]));
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let path = Path::new("/definitely/not/here/settings.json");
        assert!(matches!(Settings::load(path), Err(SettingsError::Io(_))));
        assert_eq!(Settings::load_or_default(Some(path)), Settings::default());
    }

    #[test]
    fn test_sword_from_settings() {
        let settings = Settings::default();
        let sword = settings.sword();
        assert_eq!(sword.damage, SWORD_DAMAGE);
        assert_eq!(sword.range, SWORD_RANGE);
    }
}
