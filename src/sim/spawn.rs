//! Spawn policy
//!
//! Enemies enter at a random map edge, potions appear anywhere free. Both
//! are driven by elapsed-time intervals and seeded RNG so runs replay
//! exactly. Caps are enforced by the session, not here.

use glam::{IVec2, Vec2};
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::footprints_overlap;
use super::entity::Entity;
use super::movement::Grid;
use super::shape::Shape;

/// Placement attempts before a spawn is skipped for this interval
pub const SPAWN_ATTEMPTS: u32 = 8;

/// Fires once every `interval` seconds of accumulated time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalTimer {
    pub interval: f32,
    elapsed: f32,
}

impl IntervalTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
        }
    }

    /// Advance by `dt`; true when the interval elapsed
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            true
        } else {
            false
        }
    }
}

/// Map edge an enemy enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    fn random(rng: &mut Pcg32) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Anchor range keeping every cell of `shape` inside the grid, per axis (inclusive)
fn anchor_range(shape: &Shape, grid: &Grid) -> (IVec2, IVec2) {
    let extent = shape.extent();
    let lo = -extent.min;
    let hi = IVec2::new(grid.cols - 1, grid.rows - 1) - extent.max;
    (lo, hi)
}

fn is_free(shape: &Shape, anchor: Vec2, blocked: &[&[Entity]]) -> bool {
    blocked
        .iter()
        .flat_map(|group| group.iter())
        .all(|e| !footprints_overlap(shape, anchor, &e.shape, e.anchor))
}

/// Anchor on `edge` with the shape touching that edge and fully inside the grid
pub fn edge_anchor(rng: &mut Pcg32, edge: Edge, shape: &Shape, grid: &Grid) -> Option<Vec2> {
    let (lo, hi) = anchor_range(shape, grid);
    if lo.x > hi.x || lo.y > hi.y {
        return None;
    }
    let cell = match edge {
        Edge::Left => IVec2::new(lo.x, rng.random_range(lo.y..=hi.y)),
        Edge::Right => IVec2::new(hi.x, rng.random_range(lo.y..=hi.y)),
        Edge::Top => IVec2::new(rng.random_range(lo.x..=hi.x), lo.y),
        Edge::Bottom => IVec2::new(rng.random_range(lo.x..=hi.x), hi.y),
    };
    Some(cell.as_vec2())
}

/// Free anchor for an enemy on a random edge
pub fn enemy_anchor(
    rng: &mut Pcg32,
    shape: &Shape,
    grid: &Grid,
    blocked: &[&[Entity]],
) -> Option<Vec2> {
    (0..SPAWN_ATTEMPTS).find_map(|_| {
        let edge = Edge::random(rng);
        edge_anchor(rng, edge, shape, grid).filter(|&anchor| is_free(shape, anchor, blocked))
    })
}

/// Free anchor anywhere on the grid
pub fn open_anchor(
    rng: &mut Pcg32,
    shape: &Shape,
    grid: &Grid,
    blocked: &[&[Entity]],
) -> Option<Vec2> {
    let (lo, hi) = anchor_range(shape, grid);
    if lo.x > hi.x || lo.y > hi.y {
        return None;
    }
    (0..SPAWN_ATTEMPTS).find_map(|_| {
        let cell = IVec2::new(rng.random_range(lo.x..=hi.x), rng.random_range(lo.y..=hi.y));
        let anchor = cell.as_vec2();
        is_free(shape, anchor, blocked).then_some(anchor)
    })
}

/// Pick a shape from the catalogue
pub fn pick_shape<'a>(rng: &mut Pcg32, shapes: &'a [Shape]) -> Option<&'a Shape> {
    if shapes.is_empty() {
        return None;
    }
    shapes.get(rng.random_range(0..shapes.len()))
}
