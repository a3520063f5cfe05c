//! Multi-cell entity footprints
//!
//! A shape is a fixed set of integer offsets measured from an entity's
//! floating-point anchor. Occupied cells are `floor(anchor) + offset`, so a
//! shape covers the same number of cells wherever it is placed.

use std::collections::{HashSet, VecDeque};

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cell_of;

/// Reasons a shape can't be built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("shape has no cells")]
    Empty,
    #[error("shape lists offset {0} more than once")]
    DuplicateOffset(IVec2),
    #[error("shape cells are not 4-connected")]
    Disconnected,
}

/// Axis-aligned bounds over occupied cells (inclusive on both ends)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellBounds {
    pub min: IVec2,
    pub max: IVec2,
}

impl CellBounds {
    /// Degenerate bounds covering a single cell
    pub fn point(cell: IVec2) -> Self {
        Self { min: cell, max: cell }
    }

    /// Width in cells
    pub fn width(&self) -> i32 {
        self.max.x - self.min.x + 1
    }

    /// Height in cells
    pub fn height(&self) -> i32 {
        self.max.y - self.min.y + 1
    }

    pub fn overlaps(&self, other: &CellBounds) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// True when every cell lies in `[0, cols) x [0, rows)`
    pub fn inside(&self, cols: i32, rows: i32) -> bool {
        self.min.x >= 0 && self.min.y >= 0 && self.max.x < cols && self.max.y < rows
    }
}

/// Fixed polyomino footprint relative to an anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<IVec2>", into = "Vec<IVec2>")]
pub struct Shape {
    offsets: Vec<IVec2>,
    /// Mean offset, cached for centroid math
    mean: Vec2,
}

// Presets, written as (dx, dy) rows top to bottom
const PLUS: [(i32, i32); 5] = [(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)];
const H: [(i32, i32); 7] = [(0, 0), (0, 1), (0, 2), (1, 1), (2, 0), (2, 1), (2, 2)];
const L: [(i32, i32); 4] = [(0, 0), (0, 1), (0, 2), (1, 2)];
const T: [(i32, i32); 5] = [(0, 0), (1, 0), (2, 0), (1, 1), (1, 2)];
const Z: [(i32, i32); 5] = [(0, 0), (1, 0), (1, 1), (1, 2), (2, 2)];
const U: [(i32, i32); 7] = [(0, 0), (0, 1), (0, 2), (1, 2), (2, 0), (2, 1), (2, 2)];

impl Shape {
    /// Build a shape from offsets. Rejects empty and duplicated offsets.
    pub fn new(offsets: Vec<IVec2>) -> Result<Self, ShapeError> {
        if offsets.is_empty() {
            return Err(ShapeError::Empty);
        }
        let mut seen = HashSet::with_capacity(offsets.len());
        for offset in &offsets {
            if !seen.insert(*offset) {
                return Err(ShapeError::DuplicateOffset(*offset));
            }
        }
        Ok(Self::from_checked(offsets))
    }

    fn from_checked(offsets: Vec<IVec2>) -> Self {
        let sum = offsets.iter().fold(Vec2::ZERO, |acc, o| acc + o.as_vec2());
        let mean = sum / offsets.len() as f32;
        Self { offsets, mean }
    }

    fn preset(cells: &[(i32, i32)]) -> Self {
        Self::from_checked(cells.iter().map(|&(x, y)| IVec2::new(x, y)).collect())
    }

    /// 1x1 cell
    pub fn single() -> Self {
        Self::preset(&[(0, 0)])
    }

    /// Full `width x height` rectangle, row by row
    pub fn rect(width: u32, height: u32) -> Result<Self, ShapeError> {
        let offsets = (0..height as i32)
            .flat_map(|dy| (0..width as i32).map(move |dx| IVec2::new(dx, dy)))
            .collect();
        Self::new(offsets)
    }

    /// Plus sign, the player's footprint
    pub fn plus() -> Self {
        Self::preset(&PLUS)
    }

    /// H glyph, used by health potions
    pub fn health_glyph() -> Self {
        Self::preset(&H)
    }

    pub fn l_shape() -> Self {
        Self::preset(&L)
    }

    pub fn t_shape() -> Self {
        Self::preset(&T)
    }

    pub fn z_shape() -> Self {
        Self::preset(&Z)
    }

    pub fn u_shape() -> Self {
        Self::preset(&U)
    }

    /// Default enemy catalogue
    pub fn enemy_catalogue() -> Vec<Shape> {
        vec![
            Self::single(),
            Self::preset(&[(0, 0), (1, 0), (0, 1), (1, 1)]),
            Self::l_shape(),
            Self::t_shape(),
            Self::z_shape(),
            Self::u_shape(),
        ]
    }

    pub fn offsets(&self) -> &[IVec2] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Always false for a constructed shape
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Mean of the offsets
    pub fn mean_offset(&self) -> Vec2 {
        self.mean
    }

    /// Absolute cells covered when anchored at `anchor`
    pub fn cells_at(&self, anchor: Vec2) -> impl Iterator<Item = IVec2> + '_ {
        let base = cell_of(anchor);
        self.offsets.iter().map(move |o| base + *o)
    }

    /// Bounding box of the cells covered at `anchor`
    pub fn bounds_at(&self, anchor: Vec2) -> CellBounds {
        let base = cell_of(anchor);
        let mut cells = self.offsets.iter().map(|o| base + *o);
        let Some(first) = cells.next() else {
            return CellBounds::point(base);
        };
        cells.fold(CellBounds::point(first), |b, c| CellBounds {
            min: b.min.min(c),
            max: b.max.max(c),
        })
    }

    /// Anchor plus mean offset
    pub fn centroid_at(&self, anchor: Vec2) -> Vec2 {
        anchor + self.mean
    }

    /// Largest Manhattan length of any offset
    pub fn reach(&self) -> i32 {
        self.offsets
            .iter()
            .map(|o| o.x.abs() + o.y.abs())
            .max()
            .unwrap_or(0)
    }

    /// Largest Manhattan distance from the mean offset to any offset
    pub fn spread(&self) -> f32 {
        self.offsets
            .iter()
            .map(|o| {
                let d = o.as_vec2() - self.mean;
                d.x.abs() + d.y.abs()
            })
            .fold(0.0, f32::max)
    }

    /// Offset extent along each axis, used to keep spawns inside the grid
    pub fn extent(&self) -> CellBounds {
        self.bounds_at(Vec2::ZERO)
    }

    /// True when every cell is reachable from the first through edge neighbours
    pub fn is_connected(&self) -> bool {
        let Some(&start) = self.offsets.first() else {
            return false;
        };
        let cells: HashSet<IVec2> = self.offsets.iter().copied().collect();
        let mut visited = HashSet::with_capacity(cells.len());
        let mut queue = VecDeque::from([start]);
        visited.insert(start);

        while let Some(cell) = queue.pop_front() {
            for step in [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y] {
                let next = cell + step;
                if cells.contains(&next) && visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        visited.len() == cells.len()
    }

    /// Reject shapes that are not 4-connected
    pub fn validate_connected(self) -> Result<Self, ShapeError> {
        if self.is_connected() {
            Ok(self)
        } else {
            Err(ShapeError::Disconnected)
        }
    }
}

impl TryFrom<Vec<IVec2>> for Shape {
    type Error = ShapeError;

    fn try_from(offsets: Vec<IVec2>) -> Result<Self, Self::Error> {
        Self::new(offsets)
    }
}

impl From<Shape> for Vec<IVec2> {
    fn from(shape: Shape) -> Self {
        shape.offsets
    }
}
