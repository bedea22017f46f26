//! wgpu sprite renderer: surface setup, texture upload, quad batching.

pub mod pipeline;
pub mod texture;
pub mod vertex;

pub use pipeline::{RenderState, SpriteInstance, TextureHandle};
