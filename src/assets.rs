//! Asset catalog: every texture the game draws, loaded once at startup.
//!
//! A missing or corrupt file is fatal; continuing with a null texture would
//! only defer the crash to draw time.

use glam::Vec2;

use crate::error::InitError;
use crate::renderer::{RenderState, TextureHandle};
use crate::sim::{SpriteId, SpriteSizes};

const MANIFEST: [(SpriteId, &str); 6] = [
    (SpriteId::Ship, "assets/player_ship.png"),
    (SpriteId::MeteorBig1, "assets/meteor_big1.png"),
    (SpriteId::MeteorBig2, "assets/meteor_big2.png"),
    (SpriteId::MeteorBig3, "assets/meteor_big3.png"),
    (SpriteId::Laser, "assets/laser.png"),
    (SpriteId::Background, "assets/background.png"),
];

fn slot(id: SpriteId) -> usize {
    match id {
        SpriteId::Ship => 0,
        SpriteId::MeteorBig1 => 1,
        SpriteId::MeteorBig2 => 2,
        SpriteId::MeteorBig3 => 3,
        SpriteId::Laser => 4,
        SpriteId::Background => 5,
    }
}

pub struct AssetCatalog {
    handles: Vec<TextureHandle>,
    sizes: Vec<Vec2>,
}

impl AssetCatalog {
    /// Load the full manifest; entity sizes come from the decoded pixel
    /// dimensions, never from constants.
    pub fn load(renderer: &mut RenderState) -> Result<Self, InitError> {
        let mut handles = Vec::with_capacity(MANIFEST.len());
        let mut sizes = Vec::with_capacity(MANIFEST.len());

        for (_, path) in MANIFEST {
            let handle = renderer.load_texture(path)?;
            let (w, h) = renderer.texture_size(handle);
            log::info!("loaded {path} ({w}x{h})");
            handles.push(handle);
            sizes.push(Vec2::new(w as f32, h as f32));
        }

        Ok(Self { handles, sizes })
    }

    pub fn handle(&self, id: SpriteId) -> TextureHandle {
        self.handles[slot(id)]
    }

    pub fn size(&self, id: SpriteId) -> Vec2 {
        self.sizes[slot(id)]
    }

    /// The collidable-asset dimensions the simulation is seeded with.
    pub fn sprite_sizes(&self) -> SpriteSizes {
        SpriteSizes {
            ship: self.size(SpriteId::Ship),
            meteors: [
                self.size(SpriteId::MeteorBig1),
                self.size(SpriteId::MeteorBig2),
                self.size(SpriteId::MeteorBig3),
            ],
            laser: self.size(SpriteId::Laser),
        }
    }
}
