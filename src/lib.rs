//! Meteor Strike - a vertical meteor shooter
//!
//! Core modules:
//! - `sim`: deterministic simulation (movement, spawning, collision, cleanup)
//! - `renderer`: wgpu sprite rendering
//! - `assets`: texture catalog
//! - `app`: window, input sampling, and the fixed-step frame loop

pub mod app;
pub mod assets;
pub mod error;
pub mod renderer;
pub mod sim;

pub use error::InitError;
pub use sim::{GameState, TickInput};

/// Game configuration constants
pub mod consts {
    /// Window dimensions in logical pixels
    pub const WINDOW_WIDTH: u32 = 800;
    pub const WINDOW_HEIGHT: u32 = 1000;
    pub const WINDOW_TITLE: &str = "Meteor Strike";

    /// Fixed simulation timestep; the frame loop paces itself to this
    pub const FIXED_DT: f32 = 0.016;

    /// Ship thrust in pixels/s^2
    pub const SHIP_ACCEL: f32 = 3500.0;
    /// Fraction of ship velocity surviving one second of coasting
    /// (~0.9 per 16 ms tick)
    pub const SHIP_DAMPING_PER_SEC: f32 = 0.0014;
    /// Gap between the ship and the bottom edge at spawn, pixels
    pub const SHIP_BOTTOM_MARGIN: f32 = 50.0;

    /// Bullet launch speed in pixels/s
    pub const BULLET_SPEED: f32 = 500.0;
    /// Bullets per trigger pull (odd, so one flies straight up)
    pub const SHOTS_PER_TRIGGER: u32 = 3;
    /// Total angular spread of the bullet fan, radians
    pub const SHOT_SPREAD: f32 = 1.0;
    /// Minimum time between trigger pulls, seconds
    pub const FIRE_INTERVAL: f32 = 0.1;

    /// Seconds between meteor spawns at game start
    pub const SPAWN_INTERVAL_START: f32 = 5.0;
    /// The spawn interval never ramps below this
    pub const SPAWN_INTERVAL_FLOOR: f32 = 1.0;
    /// How much the interval shrinks after each spawn
    pub const SPAWN_INTERVAL_STEP: f32 = 0.1;

    /// Meteor horizontal drift is drawn from [-MAX, MAX)
    pub const METEOR_DRIFT_MAX: f32 = 100.0;
    /// Meteor fall speed is drawn from [MIN, MAX)
    pub const METEOR_FALL_MIN: f32 = 100.0;
    pub const METEOR_FALL_MAX: f32 = 200.0;
    /// Meteors materialize within this band above the top edge
    pub const SPAWN_BAND: f32 = 10.0;
}
