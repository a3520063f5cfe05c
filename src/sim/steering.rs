//! Pursuit steering
//!
//! Enemies head straight for the target centroid at a fixed speed. Bounds
//! and obstacles are checked first, then peer movers. A peer that already
//! overlaps the mover does not block a step that increases centroid
//! separation, so entities pushed into each other can work their way out
//! instead of freezing (lock-in escape). Separation is measured between
//! the mover's centroid and the peer's centroid.
//!
//! Peer checks short-circuit on the first conflicting peer in slice order.

use glam::Vec2;

use super::collision::{collides, collides_at};
use super::entity::{Entity, EntityId};
use super::movement::{Grid, MoveOutcome, check_terrain};
use crate::manhattan;

/// What a single steering step decided
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SteerOutcome {
    /// Step accepted, new anchor
    Moved(Vec2),
    /// Centroids coincide; no direction to move in
    AtTarget,
    /// Step rejected, anchor unchanged
    Blocked(MoveOutcome),
}

impl SteerOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, SteerOutcome::Moved(_))
    }
}

/// First peer that forbids `mover` stepping to `proposed`
///
/// Peers further than `check_distance` (Manhattan, mover anchor to peer
/// centroid) are skipped without an exact test.
pub fn peer_conflict(
    mover: &Entity,
    proposed: Vec2,
    peers: &[Entity],
    check_distance: f32,
) -> Option<EntityId> {
    let old_centroid = mover.centroid();
    let new_centroid = mover.shape.centroid_at(proposed);

    for other in peers {
        if other.id == mover.id {
            continue;
        }
        let other_centroid = other.centroid();
        if manhattan(mover.anchor, other_centroid) > check_distance {
            continue;
        }
        if !collides_at(mover, proposed, other) {
            continue;
        }

        let was_colliding = collides(mover, other);
        if was_colliding
            && new_centroid.distance_squared(other_centroid)
                > old_centroid.distance_squared(other_centroid)
        {
            // Already stuck together and this step pulls apart
            continue;
        }
        return Some(other.id);
    }

    None
}

/// Decide one pursuit step for `mover` without touching it
pub fn plan_pursuit(
    mover: &Entity,
    target: Vec2,
    speed: f32,
    grid: &Grid,
    obstacles: &[Entity],
    peers: &[Entity],
    check_distance: f32,
) -> SteerOutcome {
    let delta = target - mover.centroid();
    let distance = delta.length();
    if distance == 0.0 {
        return SteerOutcome::AtTarget;
    }

    let proposed = mover.anchor + delta / distance * speed;
    match check_terrain(mover, proposed, grid, obstacles) {
        MoveOutcome::Moved => {}
        blocked => return SteerOutcome::Blocked(blocked),
    }
    if let Some(peer) = peer_conflict(mover, proposed, peers, check_distance) {
        return SteerOutcome::Blocked(MoveOutcome::BlockedByEntity(peer));
    }

    SteerOutcome::Moved(proposed)
}

/// Plan and commit one pursuit step using the entity's own speed
pub fn steer_toward(
    entity: &mut Entity,
    target: Vec2,
    grid: &Grid,
    obstacles: &[Entity],
    peers: &[Entity],
    check_distance: f32,
) -> SteerOutcome {
    let outcome = plan_pursuit(
        entity,
        target,
        entity.speed(),
        grid,
        obstacles,
        peers,
        check_distance,
    );
    if let SteerOutcome::Moved(anchor) = outcome {
        entity.anchor = anchor;
    }
    outcome
}

/// Steering order: farthest from `target` first, ties keep slice order
pub fn pursuit_order(movers: &[Entity], target: Vec2) -> Vec<usize> {
    let distances: Vec<f32> = movers
        .iter()
        .map(|m| m.centroid().distance_squared(target))
        .collect();
    let mut order: Vec<usize> = (0..movers.len()).collect();
    order.sort_by(|&a, &b| distances[b].total_cmp(&distances[a]));
    order
}

/// Steer every mover toward `target` in [`pursuit_order`], committing each
/// step before the next mover plans. Returns how many movers moved.
pub fn steer_pack(
    movers: &mut [Entity],
    target: Vec2,
    grid: &Grid,
    obstacles: &[Entity],
    check_distance: f32,
) -> usize {
    let mut moved = 0;
    for index in pursuit_order(movers, target) {
        let mover = &movers[index];
        let outcome = plan_pursuit(
            mover,
            target,
            mover.speed(),
            grid,
            obstacles,
            movers,
            check_distance,
        );
        if let SteerOutcome::Moved(anchor) = outcome {
            movers[index].anchor = anchor;
            moved += 1;
        }
    }
    moved
}
