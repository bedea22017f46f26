//! Simulation entities: anything positioned, moving, and collidable.

use glam::Vec2;

/// Gameplay role of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    None,
    Player,
    Asteroid,
    Bullet,
}

/// Which texture the renderer draws for an entity.
///
/// The sim only carries the discriminant; the asset catalog maps it to a
/// loaded texture and its native pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteId {
    Ship,
    MeteorBig1,
    MeteorBig2,
    MeteorBig3,
    Laser,
    Background,
}

/// A positioned, velocity-bearing, collidable object.
///
/// `pos` is the top-left corner in window pixels (y grows downward); `size`
/// is the native pixel size of the entity's texture.
#[derive(Debug, Clone)]
pub struct Entity {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Static display angle in radians; never driven by the simulation.
    pub rotation: f32,
    pub tag: Tag,
    pub sprite: SpriteId,
    doomed: bool,
}

impl Entity {
    pub fn new(sprite: SpriteId, tag: Tag, size: Vec2) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size,
            rotation: 0.0,
            tag,
            sprite,
            doomed: false,
        }
    }

    /// Explicit Euler step: displacement is velocity times elapsed time.
    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Collision radius: the larger of width and height, not halved.
    ///
    /// Deliberately coarse and over-approximating for non-square sprites;
    /// the gameplay is tuned around it, so do not tighten it.
    pub fn bounding_radius(&self) -> f32 {
        self.size.x.max(self.size.y)
    }

    /// Bounding-circle test between entity centers. Touching circles
    /// (distance exactly equal to the radius sum) do not collide.
    pub fn collides_with(&self, other: &Entity) -> bool {
        let distance = self.center().distance(other.center());
        distance < self.bounding_radius() + other.bounding_radius()
    }

    /// Mark for deletion. The flag is one-way; removal happens in the reap
    /// pass at the end of the tick, so the rest of the frame may still hold
    /// references to a logically dead entity.
    pub fn destroy(&mut self) {
        self.doomed = true;
    }

    pub fn is_doomed(&self) -> bool {
        self.doomed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entity_at(x: f32, y: f32, w: f32, h: f32) -> Entity {
        let mut e = Entity::new(SpriteId::MeteorBig1, Tag::Asteroid, Vec2::new(w, h));
        e.pos = Vec2::new(x, y);
        e
    }

    #[test]
    fn test_euler_integration_displacement() {
        let mut e = entity_at(10.0, 20.0, 8.0, 8.0);
        e.vel = Vec2::new(30.0, -45.0);

        // 125 steps of 16 ms = 2 seconds
        for _ in 0..125 {
            e.update(0.016);
        }

        let expected = Vec2::new(10.0, 20.0) + e.vel * 2.0;
        assert!((e.pos - expected).length() < 1e-2);
    }

    #[test]
    fn test_collision_boundary_is_exclusive() {
        // Radii are max(w, h): 10 and 6, so the threshold distance is 16.
        let a = entity_at(0.0, 0.0, 10.0, 4.0);
        let mut b = entity_at(0.0, 0.0, 6.0, 2.0);

        // Centers exactly 16 apart: touching, not colliding.
        b.pos.x = a.center().x + 16.0 - b.size.x * 0.5;
        b.pos.y = a.center().y - b.size.y * 0.5;
        assert!(!a.collides_with(&b));

        // A hair closer collides.
        b.pos.x -= 0.01;
        assert!(a.collides_with(&b));
    }

    #[test]
    fn test_destroy_is_one_way() {
        let mut e = entity_at(0.0, 0.0, 4.0, 4.0);
        assert!(!e.is_doomed());
        e.destroy();
        e.destroy();
        assert!(e.is_doomed());
    }

    proptest! {
        #[test]
        fn collision_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            aw in 1.0f32..120.0, ah in 1.0f32..120.0,
            bw in 1.0f32..120.0, bh in 1.0f32..120.0,
        ) {
            let a = entity_at(ax, ay, aw, ah);
            let b = entity_at(bx, by, bw, bh);
            prop_assert_eq!(a.collides_with(&b), b.collides_with(&a));
        }

        #[test]
        fn collision_matches_distance_rule(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            aw in 1.0f32..120.0, bw in 1.0f32..120.0,
        ) {
            let a = entity_at(ax, ay, aw, aw);
            let b = entity_at(bx, by, bw, bw);
            let d = a.center().distance(b.center());
            prop_assert_eq!(a.collides_with(&b), d < aw + bw);
        }
    }
}
