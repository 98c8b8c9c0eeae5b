//! Particle system configuration model
//!
//! `ParticleConfig` is built once by a loader (`.pex` or TOML) and stays
//! immutable while the system runs; changing it goes through
//! `ParticleSystem::reconfigure`, which rebuilds everything derived from it.

use crate::texture::Texture;
use ember_core::{Color4, EmberError, Result, Vec2};
use serde::{Deserialize, Serialize};

/// Kinematic model applied to every particle of a system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmitterType {
    /// Velocity integration under gravity plus radial/tangential acceleration
    #[default]
    Gravity,
    /// Orbit around the emitter with a shrinking or growing radius
    Radial,
}

impl EmitterType {
    pub const TOKENS: [&'static str; 2] = ["gravity", "radial"];

    /// Parse a descriptor token: the `.pex` integer codes `0`/`1` or the names.
    pub fn from_token(token: &str) -> Result<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "0" | "gravity" => Ok(EmitterType::Gravity),
            "1" | "radial" => Ok(EmitterType::Radial),
            other => Err(EmberError::InvalidEnumValue {
                value: other.to_string(),
                allowed: Self::TOKENS.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }

    /// `.pex` integer code
    pub fn code(self) -> u32 {
        match self {
            EmitterType::Gravity => 0,
            EmitterType::Radial => 1,
        }
    }

    pub fn name(self) -> &'static str {
        Self::TOKENS[self.code() as usize]
    }
}

/// OpenGL blend factor, stored in descriptors as its GL enum value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    DstColor,
    OneMinusDstColor,
}

impl BlendFactor {
    const ALL: [BlendFactor; 10] = [
        BlendFactor::Zero,
        BlendFactor::One,
        BlendFactor::SrcColor,
        BlendFactor::OneMinusSrcColor,
        BlendFactor::SrcAlpha,
        BlendFactor::OneMinusSrcAlpha,
        BlendFactor::DstAlpha,
        BlendFactor::OneMinusDstAlpha,
        BlendFactor::DstColor,
        BlendFactor::OneMinusDstColor,
    ];

    pub fn gl_code(self) -> u32 {
        match self {
            BlendFactor::Zero => 0,
            BlendFactor::One => 1,
            BlendFactor::SrcColor => 0x0300,
            BlendFactor::OneMinusSrcColor => 0x0301,
            BlendFactor::SrcAlpha => 0x0302,
            BlendFactor::OneMinusSrcAlpha => 0x0303,
            BlendFactor::DstAlpha => 0x0304,
            BlendFactor::OneMinusDstAlpha => 0x0305,
            BlendFactor::DstColor => 0x0306,
            BlendFactor::OneMinusDstColor => 0x0307,
        }
    }

    pub fn from_gl_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.gl_code() == code)
    }
}

/// Texture named and/or embedded in a descriptor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextureRef {
    /// File name as written in the descriptor, relative to it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Decoded image, when one was embedded or loaded
    #[serde(skip)]
    pub image: Option<Texture>,
}

/// Complete emitter configuration.
///
/// Angles are radians and `rotate_per_second` is radians per second; the
/// `.pex` loader converts from the degrees Particle Designer writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub emitter_type: EmitterType,
    pub emitter_position: Vec2,
    pub emitter_position_variance: Vec2,

    /// Pool capacity
    pub max_particles: usize,
    pub lifespan: f32,
    pub lifespan_variance: f32,
    pub start_size: f32,
    pub start_size_variance: f32,
    pub end_size: f32,
    pub end_size_variance: f32,
    pub emit_angle: f32,
    pub emit_angle_variance: f32,

    // gravity mode
    pub speed: f32,
    pub speed_variance: f32,
    pub gravity: Vec2,
    pub radial_acceleration: f32,
    pub radial_acceleration_variance: f32,
    pub tangential_acceleration: f32,
    pub tangential_acceleration_variance: f32,

    // radial mode
    pub max_radius: f32,
    pub max_radius_variance: f32,
    pub min_radius: f32,
    pub min_radius_variance: f32,
    pub rotate_per_second: f32,
    pub rotate_per_second_variance: f32,

    pub start_color: Color4,
    pub start_color_variance: Color4,
    pub end_color: Color4,
    pub end_color_variance: Color4,

    pub blend_source: BlendFactor,
    pub blend_destination: BlendFactor,

    /// Seconds `start()` keeps emitting; zero or negative means until `stop()`
    pub duration: f32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture: Option<TextureRef>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            emitter_type: EmitterType::Gravity,
            emitter_position: Vec2::ZERO,
            emitter_position_variance: Vec2::ZERO,
            max_particles: 128,
            lifespan: 1.0,
            lifespan_variance: 0.0,
            start_size: 16.0,
            start_size_variance: 0.0,
            end_size: 16.0,
            end_size_variance: 0.0,
            emit_angle: 0.0,
            emit_angle_variance: 0.0,
            speed: 0.0,
            speed_variance: 0.0,
            gravity: Vec2::ZERO,
            radial_acceleration: 0.0,
            radial_acceleration_variance: 0.0,
            tangential_acceleration: 0.0,
            tangential_acceleration_variance: 0.0,
            max_radius: 0.0,
            max_radius_variance: 0.0,
            min_radius: 0.0,
            min_radius_variance: 0.0,
            rotate_per_second: 0.0,
            rotate_per_second_variance: 0.0,
            start_color: Color4::WHITE,
            start_color_variance: Color4::TRANSPARENT,
            end_color: Color4::WHITE,
            end_color_variance: Color4::TRANSPARENT,
            blend_source: BlendFactor::One,
            blend_destination: BlendFactor::OneMinusSrcAlpha,
            duration: 0.0,
            texture: None,
        }
    }
}

/// Largest pool a descriptor may ask for
pub const MAX_PARTICLES: usize = 1 << 20;

/// Keys a TOML descriptor must spell out
const REQUIRED_TOML_KEYS: [&str; 3] = ["emitter_type", "max_particles", "lifespan"];

impl ParticleConfig {
    /// Particles per second that keeps the pool saturated.
    ///
    /// Fails with `InvalidLifespan` when `lifespan <= 0`; such a config never emits.
    pub fn emission_rate(&self) -> Result<f32> {
        if self.lifespan > 0.0 && self.lifespan.is_finite() {
            Ok(self.max_particles as f32 / self.lifespan)
        } else {
            Err(EmberError::InvalidLifespan(self.lifespan))
        }
    }

    /// Reject non-finite numbers, which no descriptor can meaningfully contain,
    /// and capacities above [`MAX_PARTICLES`].
    pub fn validate(&self) -> Result<()> {
        if self.max_particles > MAX_PARTICLES {
            return Err(EmberError::MalformedConfig(format!(
                "max_particles {} exceeds the limit of {MAX_PARTICLES}",
                self.max_particles
            )));
        }

        let scalars = [
            ("lifespan", self.lifespan),
            ("lifespan_variance", self.lifespan_variance),
            ("start_size", self.start_size),
            ("start_size_variance", self.start_size_variance),
            ("end_size", self.end_size),
            ("end_size_variance", self.end_size_variance),
            ("emit_angle", self.emit_angle),
            ("emit_angle_variance", self.emit_angle_variance),
            ("speed", self.speed),
            ("speed_variance", self.speed_variance),
            ("radial_acceleration", self.radial_acceleration),
            ("radial_acceleration_variance", self.radial_acceleration_variance),
            ("tangential_acceleration", self.tangential_acceleration),
            (
                "tangential_acceleration_variance",
                self.tangential_acceleration_variance,
            ),
            ("max_radius", self.max_radius),
            ("max_radius_variance", self.max_radius_variance),
            ("min_radius", self.min_radius),
            ("min_radius_variance", self.min_radius_variance),
            ("rotate_per_second", self.rotate_per_second),
            ("rotate_per_second_variance", self.rotate_per_second_variance),
            ("duration", self.duration),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(EmberError::MalformedConfig(format!(
                    "{field} must be finite, got {value}"
                )));
            }
        }

        let vectors = [
            ("emitter_position", self.emitter_position),
            ("emitter_position_variance", self.emitter_position_variance),
            ("gravity", self.gravity),
        ];
        for (field, v) in vectors {
            if !(v.x.is_finite() && v.y.is_finite()) {
                return Err(EmberError::MalformedConfig(format!(
                    "{field} must be finite"
                )));
            }
        }

        let colors = [
            ("start_color", self.start_color),
            ("start_color_variance", self.start_color_variance),
            ("end_color", self.end_color),
            ("end_color_variance", self.end_color_variance),
        ];
        for (field, c) in colors {
            if c.to_array().iter().any(|v| !v.is_finite()) {
                return Err(EmberError::MalformedConfig(format!(
                    "{field} must be finite"
                )));
            }
        }
        Ok(())
    }

    /// Texture image if the descriptor carried or resolved one
    pub fn texture_image(&self) -> Option<&Texture> {
        self.texture.as_ref().and_then(|t| t.image.as_ref())
    }

    /// Parse a TOML descriptor
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(source)?;
        for key in REQUIRED_TOML_KEYS {
            if !table.contains_key(key) {
                return Err(EmberError::MissingRequiredField(key.to_string()));
            }
        }
        let config: ParticleConfig = toml::Value::Table(table).try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize as a TOML descriptor (the texture image itself is not written)
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}
