//! Ember Particles - point-sprite particle system
//!
//! Provides a pooled single-emitter particle simulation with:
//! - Gravity (linear) and radial (orbital) motion modes
//! - Swap-remove particle pool for O(1) kill
//! - Point-sprite packing for a single draw call
//! - `.pex` and TOML descriptors with embedded or file textures

pub mod config;
pub mod descriptor;
pub mod emitter;
pub mod kinematics;
pub mod loader;
pub mod particle;
pub mod pex;
pub mod rand;
pub mod render;
pub mod system;
pub mod texture;

pub use config::{BlendFactor, EmitterType, ParticleConfig, TextureRef, MAX_PARTICLES};
pub use descriptor::{
    load_descriptor, load_descriptor_with_image, save_descriptor, DescriptorFormat,
};
pub use loader::{load_config, ConfigLoader, MarkupEvent};
pub use particle::{Particle, ParticlePool, PointSprite, PoolFull};
pub use pex::{parse_pex, write_pex};
pub use rand::{ParticleRng, VarianceSource};
pub use render::RenderBuffer;
pub use system::{ParticleDrawData, ParticleSystem, DEFAULT_SEED};
pub use texture::Texture;
