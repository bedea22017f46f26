//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod entity;
pub mod state;
pub mod tick;

pub use entity::{Entity, SpriteId, Tag};
pub use state::{GamePhase, GameState, SpriteSizes};
pub use tick::{TickInput, tick};
