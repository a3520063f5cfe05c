//! Entities placed on the grid
//!
//! Every entity is the same concrete struct: an anchor, a shape and a kind
//! tag carrying kind-specific data. Geometry is shared through the shape.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::shape::{CellBounds, Shape, ShapeError};

/// Stable identity of a live entity within one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// What an entity is, with the data only that kind needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy {
        /// Cells per tick
        speed: f32,
    },
    Obstacle {
        width: u32,
        height: u32,
    },
    Pickup {
        heal_amount: u32,
    },
}

impl EntityKind {
    /// Short tag for presentation
    pub fn tag(&self) -> &'static str {
        match self {
            EntityKind::Player => "player",
            EntityKind::Enemy { .. } => "enemy",
            EntityKind::Obstacle { .. } => "obstacle",
            EntityKind::Pickup { .. } => "pickup",
        }
    }
}

/// Hit points, always within `[0, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    current: u32,
    max: u32,
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Subtract damage, stopping at zero
    pub fn damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    /// Add health, stopping at max
    pub fn heal(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.max);
    }

    pub fn is_dead(&self) -> bool {
        self.current == 0
    }
}

/// A positioned shape on the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Reference point in grid units
    pub anchor: Vec2,
    pub shape: Shape,
    pub health: Option<Health>,
}

impl Entity {
    pub fn player(id: EntityId, anchor: Vec2, max_hp: u32) -> Self {
        Self {
            id,
            kind: EntityKind::Player,
            anchor,
            shape: Shape::plus(),
            health: Some(Health::new(max_hp)),
        }
    }

    pub fn enemy(id: EntityId, anchor: Vec2, shape: Shape, speed: f32, max_hp: u32) -> Self {
        Self {
            id,
            kind: EntityKind::Enemy { speed },
            anchor,
            shape,
            health: Some(Health::new(max_hp)),
        }
    }

    /// Solid rectangle anchored at its top-left cell
    pub fn obstacle(
        id: EntityId,
        cell: IVec2,
        width: u32,
        height: u32,
    ) -> Result<Self, ShapeError> {
        Ok(Self {
            id,
            kind: EntityKind::Obstacle { width, height },
            anchor: cell.as_vec2(),
            shape: Shape::rect(width, height)?,
            health: None,
        })
    }

    pub fn health_potion(id: EntityId, anchor: Vec2, heal_amount: u32) -> Self {
        Self {
            id,
            kind: EntityKind::Pickup { heal_amount },
            anchor,
            shape: Shape::health_glyph(),
            health: None,
        }
    }

    /// Absolute cells this entity covers
    pub fn occupied_cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.shape.cells_at(self.anchor)
    }

    pub fn bounding_box(&self) -> CellBounds {
        self.shape.bounds_at(self.anchor)
    }

    pub fn centroid(&self) -> Vec2 {
        self.shape.centroid_at(self.anchor)
    }

    /// Entities without health never die
    pub fn is_dead(&self) -> bool {
        self.health.is_some_and(|h| h.is_dead())
    }

    /// Apply damage if this entity has health
    pub fn take_damage(&mut self, amount: u32) {
        if let Some(health) = self.health.as_mut() {
            health.damage(amount);
        }
    }

    pub fn heal(&mut self, amount: u32) {
        if let Some(health) = self.health.as_mut() {
            health.heal(amount);
        }
    }

    /// Movement speed for enemies, zero for everything else
    pub fn speed(&self) -> f32 {
        match self.kind {
            EntityKind::Enemy { speed } => speed,
            _ => 0.0,
        }
    }
}
