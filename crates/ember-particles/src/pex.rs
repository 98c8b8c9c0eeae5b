//! Particle Designer `.pex` descriptors
//!
//! Reading tokenizes the XML with `quick-xml` and forwards each element to a
//! [`ConfigLoader`]; writing emits the same vocabulary back out so a loaded
//! config survives a save/load cycle.

use crate::config::ParticleConfig;
use crate::loader::{ConfigLoader, MarkupEvent};
use crate::texture::encode_embedded;
use ember_core::{Color4, EmberError, Result, Vec2};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

const ROOT: &str = "particleEmitterConfig";

/// Tokenize `xml` and pass every event to `sink`. Self-closing elements
/// produce a start event followed by an end event.
pub fn for_each_event<F>(xml: &str, mut sink: F) -> Result<()>
where
    F: FnMut(MarkupEvent) -> Result<()>,
{
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        let event = reader.read_event().map_err(|e| {
            EmberError::MarkupError(format!("at byte {}: {e}", reader.buffer_position()))
        })?;
        match event {
            Event::Start(e) => sink(start_event(&e)?)?,
            Event::Empty(e) => {
                let start = start_event(&e)?;
                let name = element_name(&e);
                sink(start)?;
                sink(MarkupEvent::End { name })?;
            }
            Event::End(e) => sink(MarkupEvent::End {
                name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
            })?,
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| EmberError::MarkupError(e.to_string()))?;
                sink(MarkupEvent::Text(text.into_owned()))?;
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(())
}

/// Collect the whole event stream
pub fn read_events(xml: &str) -> Result<Vec<MarkupEvent>> {
    let mut events = Vec::new();
    for_each_event(xml, |e| {
        events.push(e);
        Ok(())
    })?;
    Ok(events)
}

/// Parse a `.pex` document, optionally overriding its texture with raw image bytes.
pub fn parse_pex(xml: &str, image_bytes: Option<&[u8]>) -> Result<ParticleConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(bytes) = image_bytes {
        loader = loader.with_image_bytes(bytes.to_vec());
    }
    for_each_event(xml, |event| loader.handle(&event))?;
    loader.finish()
}

fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn start_event(e: &BytesStart) -> Result<MarkupEvent> {
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| EmberError::MarkupError(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| EmberError::MarkupError(err.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(MarkupEvent::Start {
        name: element_name(e),
        attributes,
    })
}

/// Serialize `config` as a `.pex` document. An attached texture image is
/// embedded as gzip-compressed PNG.
pub fn write_pex(config: &ParticleConfig) -> Result<String> {
    let mut out = PexWriter {
        writer: Writer::new_with_indent(Vec::new(), b' ', 4),
    };
    out.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    out.event(Event::Start(BytesStart::new(ROOT)))?;

    if let Some(texture) = &config.texture {
        let mut attrs = Vec::new();
        if let Some(name) = &texture.name {
            attrs.push(("name", name.clone()));
        }
        if let Some(image) = &texture.image {
            attrs.push(("data", encode_embedded(image)?));
        }
        if !attrs.is_empty() {
            out.element("texture", &attrs)?;
        }
    }

    let c = config;
    out.vec2("sourcePosition", c.emitter_position)?;
    out.vec2("sourcePositionVariance", c.emitter_position_variance)?;
    out.value("speed", c.speed)?;
    out.value("speedVariance", c.speed_variance)?;
    out.value("particleLifeSpan", c.lifespan)?;
    out.value("particleLifespanVariance", c.lifespan_variance)?;
    out.value("angle", c.emit_angle.to_degrees())?;
    out.value("angleVariance", c.emit_angle_variance.to_degrees())?;
    out.vec2("gravity", c.gravity)?;
    out.value("radialAcceleration", c.radial_acceleration)?;
    out.value("tangentialAcceleration", c.tangential_acceleration)?;
    out.value("radialAccelVariance", c.radial_acceleration_variance)?;
    out.value("tangentialAccelVariance", c.tangential_acceleration_variance)?;
    out.color("startColor", c.start_color)?;
    out.color("startColorVariance", c.start_color_variance)?;
    out.color("finishColor", c.end_color)?;
    out.color("finishColorVariance", c.end_color_variance)?;
    out.element("maxParticles", &[("value", c.max_particles.to_string())])?;
    out.value("startParticleSize", c.start_size)?;
    out.value("startParticleSizeVariance", c.start_size_variance)?;
    out.value("finishParticleSize", c.end_size)?;
    out.value("finishParticleSizeVariance", c.end_size_variance)?;
    out.value("duration", c.duration)?;
    out.element("emitterType", &[("value", c.emitter_type.code().to_string())])?;
    out.value("maxRadius", c.max_radius)?;
    out.value("maxRadiusVariance", c.max_radius_variance)?;
    out.value("minRadius", c.min_radius)?;
    out.value("minRadiusVariance", c.min_radius_variance)?;
    out.value("rotatePerSecond", c.rotate_per_second.to_degrees())?;
    out.value(
        "rotatePerSecondVariance",
        c.rotate_per_second_variance.to_degrees(),
    )?;
    out.element(
        "blendFuncSource",
        &[("value", c.blend_source.gl_code().to_string())],
    )?;
    out.element(
        "blendFuncDestination",
        &[("value", c.blend_destination.gl_code().to_string())],
    )?;

    out.event(Event::End(BytesEnd::new(ROOT)))?;
    String::from_utf8(out.writer.into_inner())
        .map_err(|e| EmberError::MarkupError(e.to_string()))
}

struct PexWriter {
    writer: Writer<Vec<u8>>,
}

impl PexWriter {
    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| EmberError::MarkupError(e.to_string()))
    }

    fn element(&mut self, name: &str, attrs: &[(&str, String)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        for (key, value) in attrs {
            start.push_attribute((*key, value.as_str()));
        }
        self.event(Event::Empty(start))
    }

    fn value(&mut self, name: &str, value: f32) -> Result<()> {
        self.element(name, &[("value", value.to_string())])
    }

    fn vec2(&mut self, name: &str, v: Vec2) -> Result<()> {
        self.element(name, &[("x", v.x.to_string()), ("y", v.y.to_string())])
    }

    fn color(&mut self, name: &str, c: Color4) -> Result<()> {
        self.element(
            name,
            &[
                ("red", c.red.to_string()),
                ("green", c.green.to_string()),
                ("blue", c.blue.to_string()),
                ("alpha", c.alpha.to_string()),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BlendFactor, EmitterType, TextureRef};
    use crate::texture::tests::checker;

    const FIRE: &str = r#"<?xml version="1.0"?>
<particleEmitterConfig>
    <texture name="texture.png"/>
    <sourcePosition x="300.00" y="300.00"/>
    <sourcePositionVariance x="7.00" y="0.00"/>
    <speed value="100.00"/>
    <speedVariance value="30.00"/>
    <particleLifeSpan value="4.0000"/>
    <particleLifespanVariance value="1.9000"/>
    <angle value="270.00"/>
    <angleVariance value="0.00"/>
    <gravity x="0.00" y="0.00"/>
    <radialAcceleration value="0.00"/>
    <tangentialAcceleration value="0.00"/>
    <radialAccelVariance value="0.00"/>
    <tangentialAccelVariance value="0.00"/>
    <startColor red="1.00" green="0.31" blue="0.00" alpha="0.62"/>
    <startColorVariance red="0.00" green="0.00" blue="0.00" alpha="0.00"/>
    <finishColor red="1.00" green="0.31" blue="0.00" alpha="0.00"/>
    <finishColorVariance red="0.00" green="0.00" blue="0.00" alpha="0.00"/>
    <maxParticles value="500"/>
    <startParticleSize value="70.00"/>
    <startParticleSizeVariance value="49.53"/>
    <finishParticleSize value="10.00"/>
    <FinishParticleSizeVariance value="5.00"/>
    <duration value="-1.00"/>
    <emitterType value="0"/>
    <maxRadius value="100.00"/>
    <maxRadiusVariance value="0.00"/>
    <minRadius value="0.00"/>
    <rotatePerSecond value="0.00"/>
    <rotatePerSecondVariance value="0.00"/>
    <blendFuncSource value="770"/>
    <blendFuncDestination value="1"/>
    <rotationStart value="0.00"/>
    <rotationStartVariance value="0.00"/>
</particleEmitterConfig>
"#;

    #[test]
    fn parses_particle_designer_file() {
        let config = parse_pex(FIRE, None).unwrap();
        assert_eq!(config.emitter_type, EmitterType::Gravity);
        assert_eq!(config.max_particles, 500);
        assert_eq!(config.emitter_position, Vec2::new(300.0, 300.0));
        assert!((config.emitter_position_variance.x - 7.0).abs() < 1e-6);
        assert!((config.lifespan - 4.0).abs() < 1e-6);
        assert!((config.emit_angle - 270f32.to_radians()).abs() < 1e-5);
        assert!((config.start_color.alpha - 0.62).abs() < 1e-6);
        assert_eq!(config.blend_source, BlendFactor::SrcAlpha);
        assert_eq!(config.blend_destination, BlendFactor::One);
        assert!((config.duration + 1.0).abs() < 1e-6);
        let texture = config.texture.unwrap();
        assert_eq!(texture.name.as_deref(), Some("texture.png"));
        assert!(texture.image.is_none());
    }

    #[test]
    fn self_closing_elements_emit_start_and_end() {
        let events = read_events("<a><b value=\"1\"/></a>").unwrap();
        assert_eq!(
            events,
            vec![
                MarkupEvent::start("a", &[]),
                MarkupEvent::start("b", &[("value", "1")]),
                MarkupEvent::end("b"),
                MarkupEvent::end("a"),
            ]
        );
    }

    #[test]
    fn broken_markup_is_malformed() {
        let err = parse_pex("<particleEmitterConfig><speed value=\"1\"></oops>", None).unwrap_err();
        assert!(err.is_malformed_config());
    }

    #[test]
    fn write_then_parse_round_trip() {
        let loaded = parse_pex(FIRE, None).unwrap();
        let written = write_pex(&loaded).unwrap();
        let reparsed = parse_pex(&written, None).unwrap();

        assert_eq!(reparsed.emitter_type, loaded.emitter_type);
        assert_eq!(reparsed.max_particles, loaded.max_particles);
        assert_eq!(reparsed.start_color, loaded.start_color);
        assert_eq!(reparsed.blend_source, loaded.blend_source);
        assert_eq!(reparsed.texture, loaded.texture);
        assert!((reparsed.emit_angle - loaded.emit_angle).abs() < 1e-5);
        assert_eq!(reparsed.speed, loaded.speed);
    }

    #[test]
    fn embedded_texture_survives_write() {
        let config = ParticleConfig {
            texture: Some(TextureRef {
                name: Some("dot.png".into()),
                image: Some(checker(3)),
            }),
            ..Default::default()
        };
        let written = write_pex(&config).unwrap();
        assert!(written.contains("data=\""));
        let reparsed = parse_pex(&written, None).unwrap();
        assert_eq!(reparsed.texture, config.texture);
    }
}
