//! Game state and spawn operations.
//!
//! The player ship is a singleton held directly by the state; the entity
//! collection only ever contains meteors and bullets.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::{Entity, SpriteId, Tag};
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// The ship was hit; terminal, no respawn
    GameOver,
}

/// Native pixel dimensions of every collidable asset, injected at startup so
/// the simulation never touches the renderer.
#[derive(Debug, Clone, Copy)]
pub struct SpriteSizes {
    pub ship: Vec2,
    pub meteors: [Vec2; 3],
    pub laser: Vec2,
}

impl Default for SpriteSizes {
    /// Dimensions of the shipped assets; tests rely on these matching the
    /// files under `assets/`.
    fn default() -> Self {
        Self {
            ship: Vec2::new(99.0, 75.0),
            meteors: [
                Vec2::new(101.0, 84.0),
                Vec2::new(120.0, 98.0),
                Vec2::new(89.0, 82.0),
            ],
            laser: Vec2::new(13.0, 54.0),
        }
    }
}

const METEOR_SPRITES: [SpriteId; 3] = [
    SpriteId::MeteorBig1,
    SpriteId::MeteorBig2,
    SpriteId::MeteorBig3,
];

/// Complete game state, advanced only by [`super::tick::tick`].
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// The player ship; never a member of `entities`
    pub player: Entity,
    /// Live meteors and bullets, in insertion order
    pub entities: Vec<Entity>,
    pub phase: GamePhase,
    /// Seconds until the trigger may fire again; floored at zero
    pub shot_cooldown: f32,
    /// Seconds until the next meteor spawn
    pub spawn_timer: f32,
    /// Current gap between spawns; ramps down to the floor
    pub spawn_interval: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub sizes: SpriteSizes,
    rng: Pcg32,
}

impl GameState {
    /// Create a fresh state with the ship centered above the bottom edge.
    pub fn new(seed: u64, sizes: SpriteSizes) -> Self {
        let mut player = Entity::new(SpriteId::Ship, Tag::Player, sizes.ship);
        player.pos = Vec2::new(
            WINDOW_WIDTH as f32 * 0.5 - sizes.ship.x * 0.5,
            WINDOW_HEIGHT as f32 - sizes.ship.y - SHIP_BOTTOM_MARGIN,
        );

        Self {
            seed,
            player,
            entities: Vec::new(),
            phase: GamePhase::Running,
            shot_cooldown: 0.0,
            // Zero so the first meteor appears on the first tick
            spawn_timer: 0.0,
            spawn_interval: SPAWN_INTERVAL_START,
            time_ticks: 0,
            sizes,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Spawn one meteor just above the top edge with a downward-biased
    /// random velocity and a randomly chosen sprite.
    pub fn spawn_meteor(&mut self) {
        let which = self.rng.random_range(0..METEOR_SPRITES.len());
        let size = self.sizes.meteors[which];

        let mut meteor = Entity::new(METEOR_SPRITES[which], Tag::Asteroid, size);
        meteor.pos = Vec2::new(
            self.rng.random_range(0.0..WINDOW_WIDTH as f32) - size.x,
            self.rng.random_range(0.0..SPAWN_BAND) - size.y,
        );
        meteor.vel = Vec2::new(
            self.rng.random_range(-METEOR_DRIFT_MAX..METEOR_DRIFT_MAX),
            self.rng.random_range(METEOR_FALL_MIN..METEOR_FALL_MAX),
        );
        self.entities.push(meteor);
    }

    /// Spawn the full bullet fan from the ship's muzzle: horizontally
    /// centered on the ship, launching from its top edge.
    pub fn fire_fan(&mut self) {
        let laser = self.sizes.laser;
        let muzzle = Vec2::new(
            self.player.pos.x + self.player.size.x * 0.5 - laser.x * 0.5,
            self.player.pos.y,
        );

        for vel in fan_velocities(SHOTS_PER_TRIGGER, SHOT_SPREAD, BULLET_SPEED) {
            let mut bullet = Entity::new(SpriteId::Laser, Tag::Bullet, laser);
            bullet.pos = muzzle;
            bullet.vel = vel;
            self.entities.push(bullet);
        }
    }

    /// Remove every doomed entity. Runs once at the end of each tick, so an
    /// entity marked this frame is gone before the frame is drawn.
    pub fn reap(&mut self) {
        self.entities.retain(|e| !e.is_doomed());
    }
}

/// Launch velocities for a fan of `count` shots spread evenly over `spread`
/// radians around straight up. A single shot flies straight up.
pub fn fan_velocities(count: u32, spread: f32, speed: f32) -> Vec<Vec2> {
    (0..count)
        .map(|i| {
            let angle = if count > 1 {
                i as f32 * (spread / (count - 1) as f32) - spread * 0.5
            } else {
                0.0
            };
            Vec2::new(angle.sin() * -speed, angle.cos() * -speed)
        })
        .collect()
}
