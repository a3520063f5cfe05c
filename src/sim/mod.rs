//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order, stable sorts)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod movement;
pub mod shape;
pub mod spawn;
pub mod state;
pub mod steering;
pub mod tick;
pub mod weapon;

pub use collision::{collides, collides_at, first_hit, footprints_overlap};
pub use entity::{Entity, EntityId, EntityKind, Health};
pub use movement::{Grid, MoveOutcome, check_move, try_move};
pub use shape::{CellBounds, Shape, ShapeError};
pub use state::{EntityView, GameEvent, GamePhase, GameState, Snapshot};
pub use steering::{SteerOutcome, pursuit_order, steer_pack, steer_toward};
pub use tick::{Direction, TickInput, autopilot, tick};
pub use weapon::{Sword, WeaponState};
