//! Movement validation
//!
//! The single gate for "is this displacement legal". A move is checked
//! against grid bounds (every occupied cell, not just the anchor), static
//! obstacles, then other movers. The anchor changes only when every check
//! passes; a rejected move leaves it exactly as it was.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::first_hit;
use super::entity::{Entity, EntityId};

/// Playfield dimensions in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub cols: i32,
    pub rows: i32,
}

impl Grid {
    pub fn new(cols: i32, rows: i32) -> Self {
        Self { cols, rows }
    }

    /// True when `entity` placed at `anchor` lies fully inside the grid
    pub fn contains(&self, entity: &Entity, anchor: Vec2) -> bool {
        entity.shape.bounds_at(anchor).inside(self.cols, self.rows)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(crate::consts::GRID_COLS, crate::consts::GRID_ROWS)
    }
}

/// Result of validating a proposed anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    OutOfBounds,
    BlockedByObstacle(EntityId),
    BlockedByEntity(EntityId),
}

impl MoveOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved)
    }
}

/// Bounds and obstacle checks only
pub fn check_terrain(
    mover: &Entity,
    proposed: Vec2,
    grid: &Grid,
    obstacles: &[Entity],
) -> MoveOutcome {
    if !grid.contains(mover, proposed) {
        return MoveOutcome::OutOfBounds;
    }
    if let Some(obstacle) = first_hit(mover, proposed, obstacles) {
        return MoveOutcome::BlockedByObstacle(obstacle.id);
    }
    MoveOutcome::Moved
}

/// Full validation: bounds, obstacles, then every blocker other than `mover`
pub fn check_move(
    mover: &Entity,
    proposed: Vec2,
    grid: &Grid,
    obstacles: &[Entity],
    blockers: &[Entity],
) -> MoveOutcome {
    match check_terrain(mover, proposed, grid, obstacles) {
        MoveOutcome::Moved => {}
        blocked => return blocked,
    }
    if let Some(blocker) = first_hit(mover, proposed, blockers) {
        return MoveOutcome::BlockedByEntity(blocker.id);
    }
    MoveOutcome::Moved
}

/// Validate and commit a move. Returns false and leaves the anchor untouched on rejection.
pub fn try_move(
    entity: &mut Entity,
    proposed: Vec2,
    grid: &Grid,
    obstacles: &[Entity],
    blockers: &[Entity],
) -> bool {
    let outcome = check_move(entity, proposed, grid, obstacles, blockers);
    if outcome.is_moved() {
        entity.anchor = proposed;
        true
    } else {
        false
    }
}
