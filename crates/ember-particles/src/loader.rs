//! Descriptor event sink that builds a `ParticleConfig`
//!
//! The loader knows nothing about markup syntax: a parser (see `pex`) feeds
//! it element events, and it maps element names onto config fields through a
//! flat table. Element and attribute names match case-insensitively and
//! unknown ones are skipped so newer descriptor versions still load.

use crate::config::{BlendFactor, EmitterType, ParticleConfig, TextureRef, MAX_PARTICLES};
use crate::texture::{decode_embedded, Texture};
use ember_core::{Color4, EmberError, Result, Vec2};
use log::{debug, trace};

/// One event from a markup parser
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupEvent {
    Start {
        name: String,
        attributes: Vec<(String, String)>,
    },
    End {
        name: String,
    },
    Text(String),
}

impl MarkupEvent {
    pub fn start(name: &str, attributes: &[(&str, &str)]) -> Self {
        MarkupEvent::Start {
            name: name.to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn end(name: &str) -> Self {
        MarkupEvent::End {
            name: name.to_string(),
        }
    }
}

/// Required elements, lowercased
const REQUIRED: [&str; 3] = ["emittertype", "maxparticles", "particlelifespan"];

/// Accumulates descriptor events into a config
pub struct ConfigLoader {
    config: ParticleConfig,
    seen: [bool; REQUIRED.len()],
    texture_name: Option<String>,
    texture_data: Option<String>,
    image_bytes: Option<Vec<u8>>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config: ParticleConfig::default(),
            seen: [false; REQUIRED.len()],
            texture_name: None,
            texture_data: None,
            image_bytes: None,
        }
    }

    /// Use these raw image bytes as the texture instead of any embedded payload.
    pub fn with_image_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.image_bytes = Some(bytes);
        self
    }

    pub fn handle(&mut self, event: &MarkupEvent) -> Result<()> {
        match event {
            MarkupEvent::Start { name, attributes } => self.element(name, attributes),
            // Every field lives in attributes; closing tags and text carry nothing
            MarkupEvent::End { .. } | MarkupEvent::Text(_) => Ok(()),
        }
    }

    fn element(&mut self, name: &str, attrs: &[(String, String)]) -> Result<()> {
        let key = name.to_ascii_lowercase();
        let c = &mut self.config;
        match key.as_str() {
            "particleemitterconfig" => {}
            "emittertype" => {
                if let Some(token) = attr(attrs, "value") {
                    c.emitter_type = EmitterType::from_token(token)?;
                    self.mark_seen(&key);
                }
            }
            "sourceposition" => read_vec2(name, attrs, &mut c.emitter_position)?,
            "sourcepositionvariance" => read_vec2(name, attrs, &mut c.emitter_position_variance)?,
            "maxparticles" => {
                if let Some(raw) = attr(attrs, "value") {
                    c.max_particles = parse_count(name, raw)?;
                    self.mark_seen(&key);
                }
            }
            "particlelifespan" => {
                if read_value(name, attrs, &mut c.lifespan)? {
                    self.mark_seen(&key);
                }
            }
            "particlelifespanvariance" => {
                read_value(name, attrs, &mut c.lifespan_variance)?;
            }
            "startparticlesize" => {
                read_value(name, attrs, &mut c.start_size)?;
            }
            "startparticlesizevariance" => {
                read_value(name, attrs, &mut c.start_size_variance)?;
            }
            "finishparticlesize" => {
                read_value(name, attrs, &mut c.end_size)?;
            }
            "finishparticlesizevariance" => {
                read_value(name, attrs, &mut c.end_size_variance)?;
            }
            "angle" => read_degrees(name, attrs, &mut c.emit_angle)?,
            "anglevariance" => read_degrees(name, attrs, &mut c.emit_angle_variance)?,
            "speed" => {
                read_value(name, attrs, &mut c.speed)?;
            }
            "speedvariance" => {
                read_value(name, attrs, &mut c.speed_variance)?;
            }
            "gravity" => read_vec2(name, attrs, &mut c.gravity)?,
            "radialacceleration" => {
                read_value(name, attrs, &mut c.radial_acceleration)?;
            }
            "radialaccelvariance" => {
                read_value(name, attrs, &mut c.radial_acceleration_variance)?;
            }
            "tangentialacceleration" => {
                read_value(name, attrs, &mut c.tangential_acceleration)?;
            }
            "tangentialaccelvariance" => {
                read_value(name, attrs, &mut c.tangential_acceleration_variance)?;
            }
            "maxradius" => {
                read_value(name, attrs, &mut c.max_radius)?;
            }
            "maxradiusvariance" => {
                read_value(name, attrs, &mut c.max_radius_variance)?;
            }
            "minradius" => {
                read_value(name, attrs, &mut c.min_radius)?;
            }
            "minradiusvariance" => {
                read_value(name, attrs, &mut c.min_radius_variance)?;
            }
            "rotatepersecond" => read_degrees(name, attrs, &mut c.rotate_per_second)?,
            "rotatepersecondvariance" => {
                read_degrees(name, attrs, &mut c.rotate_per_second_variance)?
            }
            "startcolor" => read_color(name, attrs, &mut c.start_color)?,
            "startcolorvariance" => read_color(name, attrs, &mut c.start_color_variance)?,
            "finishcolor" => read_color(name, attrs, &mut c.end_color)?,
            "finishcolorvariance" => read_color(name, attrs, &mut c.end_color_variance)?,
            "blendfuncsource" => read_blend(name, attrs, &mut c.blend_source)?,
            "blendfuncdestination" => read_blend(name, attrs, &mut c.blend_destination)?,
            "duration" => {
                read_value(name, attrs, &mut c.duration)?;
            }
            "texture" => {
                self.texture_name = attr(attrs, "name")
                    .filter(|s| !s.is_empty())
                    .map(str::to_string);
                self.texture_data = attr(attrs, "data")
                    .filter(|s| !s.trim().is_empty())
                    .map(str::to_string);
            }
            _ => trace!("ignoring unknown descriptor element <{name}>"),
        }
        Ok(())
    }

    fn mark_seen(&mut self, key: &str) {
        if let Some(i) = REQUIRED.iter().position(|r| *r == key) {
            self.seen[i] = true;
        }
    }

    /// Check required fields, decode the texture and hand back the config.
    pub fn finish(self) -> Result<ParticleConfig> {
        if let Some(i) = self.seen.iter().position(|seen| !seen) {
            return Err(EmberError::MissingRequiredField(REQUIRED[i].to_string()));
        }

        let mut config = self.config;
        config.validate()?;

        let image = if let Some(bytes) = &self.image_bytes {
            Some(Texture::from_image_bytes(bytes)?)
        } else if let Some(data) = &self.texture_data {
            Some(decode_embedded(data)?)
        } else {
            None
        };
        if self.texture_name.is_some() || image.is_some() {
            config.texture = Some(TextureRef {
                name: self.texture_name,
                image,
            });
        }

        debug!(
            "loaded {} emitter config: {} particles, lifespan {}",
            config.emitter_type.name(),
            config.max_particles,
            config.lifespan
        );
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Run a complete event sequence through a fresh loader.
pub fn load_config<I>(events: I, image_bytes: Option<&[u8]>) -> Result<ParticleConfig>
where
    I: IntoIterator<Item = MarkupEvent>,
{
    let mut loader = ConfigLoader::new();
    if let Some(bytes) = image_bytes {
        loader = loader.with_image_bytes(bytes.to_vec());
    }
    for event in events {
        loader.handle(&event)?;
    }
    loader.finish()
}

// ── attribute helpers ──

fn attr<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.as_str())
}

fn parse_f32(field: &str, raw: &str) -> Result<f32> {
    raw.trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| EmberError::InvalidNumber {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

/// Particle counts are integers, though some exporters write "500.00".
/// Anything above [`MAX_PARTICLES`] is rejected before it can size a pool.
fn parse_count(field: &str, raw: &str) -> Result<usize> {
    let invalid = || EmberError::InvalidNumber {
        field: field.to_string(),
        value: raw.to_string(),
    };
    if let Ok(n) = raw.trim().parse::<u64>() {
        return usize::try_from(n)
            .ok()
            .filter(|&n| n <= MAX_PARTICLES)
            .ok_or_else(invalid);
    }
    let v = parse_f32(field, raw)?;
    if v >= 0.0 && v.fract() == 0.0 && v <= MAX_PARTICLES as f32 {
        Ok(v as usize)
    } else {
        Err(invalid())
    }
}

/// Returns whether the `value` attribute was present.
fn read_value(field: &str, attrs: &[(String, String)], out: &mut f32) -> Result<bool> {
    match attr(attrs, "value") {
        Some(raw) => {
            *out = parse_f32(field, raw)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

fn read_degrees(field: &str, attrs: &[(String, String)], out: &mut f32) -> Result<()> {
    let mut degrees = out.to_degrees();
    if read_value(field, attrs, &mut degrees)? {
        *out = degrees.to_radians();
    }
    Ok(())
}

fn read_vec2(field: &str, attrs: &[(String, String)], out: &mut Vec2) -> Result<()> {
    if let Some(raw) = attr(attrs, "x") {
        out.x = parse_f32(field, raw)?;
    }
    if let Some(raw) = attr(attrs, "y") {
        out.y = parse_f32(field, raw)?;
    }
    Ok(())
}

fn read_color(field: &str, attrs: &[(String, String)], out: &mut Color4) -> Result<()> {
    let channels: [(&str, &mut f32); 4] = [
        ("red", &mut out.red),
        ("green", &mut out.green),
        ("blue", &mut out.blue),
        ("alpha", &mut out.alpha),
    ];
    for (channel, slot) in channels {
        if let Some(raw) = attr(attrs, channel) {
            *slot = parse_f32(field, raw)?;
        }
    }
    Ok(())
}

fn read_blend(field: &str, attrs: &[(String, String)], out: &mut BlendFactor) -> Result<()> {
    let Some(raw) = attr(attrs, "value") else {
        return Ok(());
    };
    let code = parse_count(field, raw)?;
    *out = u32::try_from(code)
        .ok()
        .and_then(BlendFactor::from_gl_code)
        .ok_or_else(|| {
            EmberError::MalformedConfig(format!("{field}: unknown blend factor {raw}"))
        })?;
    Ok(())
}
