//! The particle system: one emitter, its pool and its sprite buffer

use crate::config::{BlendFactor, EmitterType, ParticleConfig, MAX_PARTICLES};
use crate::descriptor::{load_descriptor, load_descriptor_with_image};
use crate::emitter::Emitter;
use crate::kinematics::{self, Kinematics};
use crate::particle::{ParticlePool, PointSprite};
use crate::pex::parse_pex;
use crate::rand::{ParticleRng, VarianceSource};
use crate::render::RenderBuffer;
use crate::texture::Texture;
use ember_core::{EmberError, Result, Vec2};
use ember_runtime::Animatable;
use log::{debug, trace};
use std::path::Path;

/// Seed used when no generator is supplied
pub const DEFAULT_SEED: u32 = 0xDEAD_BEEF;

/// Everything the renderer needs for one draw call
pub struct ParticleDrawData<'a> {
    pub sprites: &'a [PointSprite],
    pub blend_source: BlendFactor,
    pub blend_destination: BlendFactor,
    pub texture: Option<&'a Texture>,
}

/// A configured emitter with its particle pool.
///
/// Each `advance` spawns, integrates and repacks sprites, in that order.
/// All mutation goes through `&mut self`, so reconfiguring in the middle of
/// a frame is impossible by construction.
pub struct ParticleSystem<R: VarianceSource = ParticleRng> {
    config: ParticleConfig,
    pool: ParticlePool,
    emitter: Emitter,
    render: RenderBuffer,
    rng: R,
    started: bool,
}

impl ParticleSystem<ParticleRng> {
    /// Build with the default seed. Fails if `config` does not validate.
    pub fn new(config: ParticleConfig) -> Result<Self> {
        Self::with_rng(config, ParticleRng::new(DEFAULT_SEED))
    }

    /// Build from `.pex` text
    pub fn from_pex_str(xml: &str) -> Result<Self> {
        Self::new(parse_pex(xml, None)?)
    }

    /// Build from a `.pex` or `.toml` descriptor file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(load_descriptor(path)?)
    }

    /// Build from a descriptor file, using `image_bytes` as the texture.
    pub fn from_file_with_texture(path: impl AsRef<Path>, image_bytes: &[u8]) -> Result<Self> {
        Self::new(load_descriptor_with_image(path, image_bytes)?)
    }
}

impl<R: VarianceSource> ParticleSystem<R> {
    /// Build with an explicit variance source, e.g. a seeded generator in tests.
    pub fn with_rng(config: ParticleConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let pool = ParticlePool::new(config.max_particles);
        let emitter = Emitter::new(&config);
        let render = RenderBuffer::with_capacity(config.max_particles);
        debug!(
            "particle system created: {} mode, capacity {}",
            config.emitter_type.name(),
            config.max_particles
        );
        Ok(Self {
            config,
            pool,
            emitter,
            render,
            rng,
            started: false,
        })
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    /// Read-only view of the pool; only the system itself spawns or kills.
    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn live_count(&self) -> usize {
        self.pool.live_count()
    }

    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Particles per second, `None` when the lifespan disables emission
    pub fn emission_rate(&self) -> Option<f32> {
        self.emitter.rate()
    }

    pub fn is_active(&self) -> bool {
        self.emitter.is_active()
    }

    pub fn is_emitting(&self) -> bool {
        self.emitter.is_emitting()
    }

    /// Start emitting; stops by itself if the config has a positive duration.
    pub fn start(&mut self) {
        self.emitter.start(self.config.duration);
        self.started = true;
    }

    /// Stop emitting; live particles play out their lifetime.
    pub fn stop(&mut self) {
        self.emitter.stop();
    }

    /// Emit for `duration` seconds even while stopped.
    pub fn burst(&mut self, duration: f32) {
        self.emitter.burst(duration);
        self.started = true;
    }

    pub fn emitter_position(&self) -> Vec2 {
        self.config.emitter_position
    }

    /// Move the emitter. Gravity particles keep their spawn origin; radial
    /// particles orbit the new position from the next frame on.
    pub fn set_emitter_position(&mut self, position: Vec2) {
        self.config.emitter_position = position;
    }

    /// Resize the pool. All live particles are discarded.
    ///
    /// Capacities above [`MAX_PARTICLES`] are rejected and leave the system untouched.
    pub fn set_max_particles(&mut self, max_particles: usize) -> Result<()> {
        if max_particles > MAX_PARTICLES {
            return Err(EmberError::MalformedConfig(format!(
                "max_particles {max_particles} exceeds the limit of {MAX_PARTICLES}"
            )));
        }
        self.config.max_particles = max_particles;
        if max_particles == self.pool.capacity() {
            self.pool.clear();
        } else {
            self.pool = ParticlePool::new(max_particles);
            debug!("particle pool reallocated with capacity {max_particles}");
        }
        self.render.clear();
        self.emitter.reconfigure(&self.config);
        Ok(())
    }

    /// Replace the configuration between frames.
    ///
    /// The emission rate is recomputed. A capacity change reallocates the pool
    /// and drops every live particle; otherwise live particles keep the
    /// attributes they were spawned with.
    pub fn reconfigure(&mut self, config: ParticleConfig) -> Result<()> {
        config.validate()?;
        let resize = config.max_particles != self.pool.capacity();
        self.config = config;
        if resize {
            self.set_max_particles(self.config.max_particles)?;
        } else {
            self.emitter.reconfigure(&self.config);
        }
        Ok(())
    }

    /// Run one frame: emit, integrate, repack. Non-positive or non-finite `dt` does nothing.
    pub fn advance(&mut self, dt: f32) {
        if !(dt > 0.0 && dt.is_finite()) {
            return;
        }
        let spawned = self
            .emitter
            .emit(&mut self.pool, &self.config, &mut self.rng, dt);
        let kinematics = Kinematics {
            emitter_type: self.config.emitter_type,
            origin: self.config.emitter_position,
            gravity: self.config.gravity,
        };
        let died = kinematics::advance(&mut self.pool, &kinematics, dt);
        self.render.rebuild(&self.pool);
        trace!(
            "advance {dt}: +{spawned} -{died} = {} live",
            self.pool.live_count()
        );
    }

    /// Sprites packed by the last `advance`
    pub fn sprites(&self) -> &[PointSprite] {
        self.render.sprites()
    }

    pub fn sprite_bytes(&self) -> &[u8] {
        self.render.as_bytes()
    }

    pub fn draw_data(&self) -> ParticleDrawData<'_> {
        ParticleDrawData {
            sprites: self.render.sprites(),
            blend_source: self.config.blend_source,
            blend_destination: self.config.blend_destination,
            texture: self.config.texture_image(),
        }
    }

    pub fn emitter_type(&self) -> EmitterType {
        self.config.emitter_type
    }
}

impl<R: VarianceSource> Animatable for ParticleSystem<R> {
    fn advance_time(&mut self, dt: f64) {
        self.advance(dt as f32);
    }

    /// A started system is complete once it stopped emitting and every particle died.
    fn is_complete(&self) -> bool {
        self.started && !self.emitter.is_emitting() && self.pool.live_count() == 0
    }
}
