//! Cell-exact collision detection
//!
//! Two footprints collide only when at least one absolute cell coincides.
//! Bounding boxes are used as a cheap reject, never as the answer.

use std::collections::HashSet;

use glam::{IVec2, Vec2};

use super::entity::Entity;
use super::shape::Shape;

/// True when `a` at `anchor_a` shares a cell with `b` at `anchor_b`
pub fn footprints_overlap(a: &Shape, anchor_a: Vec2, b: &Shape, anchor_b: Vec2) -> bool {
    if !a.bounds_at(anchor_a).overlaps(&b.bounds_at(anchor_b)) {
        return false;
    }

    // Hash the smaller footprint, probe with the larger
    let (small, small_anchor, large, large_anchor) = if a.len() <= b.len() {
        (a, anchor_a, b, anchor_b)
    } else {
        (b, anchor_b, a, anchor_a)
    };
    let cells: HashSet<IVec2> = small.cells_at(small_anchor).collect();
    large.cells_at(large_anchor).any(|c| cells.contains(&c))
}

/// True when two entities share at least one occupied cell
pub fn collides(a: &Entity, b: &Entity) -> bool {
    footprints_overlap(&a.shape, a.anchor, &b.shape, b.anchor)
}

/// Same as [`collides`] with `mover` placed at `anchor` instead of its own anchor
pub fn collides_at(mover: &Entity, anchor: Vec2, other: &Entity) -> bool {
    footprints_overlap(&mover.shape, anchor, &other.shape, other.anchor)
}

/// First entity in `others` that overlaps `mover` placed at `anchor`, skipping `mover` itself
pub fn first_hit<'a>(mover: &Entity, anchor: Vec2, others: &'a [Entity]) -> Option<&'a Entity> {
    others
        .iter()
        .filter(|o| o.id != mover.id)
        .find(|o| collides_at(mover, anchor, o))
}
