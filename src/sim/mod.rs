//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (pool slot order)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod gameplay;
pub mod kinematics;
pub mod pool;
pub mod reaction;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;

pub use body::{Body, Group, Id, Movable, Projectile, StaticBody};
pub use collision::{resolve_movable_collisions, resolve_projectile_collisions, resolve_static_collisions};
pub use kinematics::advance_kinematics;
pub use pool::{Handle, Pool, insert_into_pool};
pub use reaction::{Reactions, Reactive, run_per_tick_callbacks};
pub use rect::{Rect, overlap};
pub use state::{GameEvent, GamePhase, GameState, WorldContext};
pub use tick::{TickInput, tick};
