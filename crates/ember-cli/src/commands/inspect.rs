//! Descriptor summary command

use anyhow::{Context, Result};
use ember_particles::{load_descriptor, EmitterType, ParticleConfig};

pub fn run(descriptor: &str, format: &str) -> Result<()> {
    let config = load_descriptor(descriptor)
        .with_context(|| format!("Failed to load descriptor {}", descriptor))?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary_json(&config))?);
    } else {
        print_summary_text(descriptor, &config);
    }
    Ok(())
}

fn print_summary_text(descriptor: &str, config: &ParticleConfig) {
    println!("Descriptor: {}", descriptor);
    println!("  type:          {}", config.emitter_type.name());
    println!("  capacity:      {}", config.max_particles);
    println!(
        "  lifespan:      {} +/- {} s",
        config.lifespan, config.lifespan_variance
    );
    match config.emission_rate() {
        Ok(rate) => println!("  emission rate: {:.2}/s", rate),
        Err(e) => println!("  emission rate: none ({})", e),
    }
    println!(
        "  position:      ({}, {})",
        config.emitter_position.x, config.emitter_position.y
    );
    match config.emitter_type {
        EmitterType::Gravity => {
            println!(
                "  speed:         {} +/- {}",
                config.speed, config.speed_variance
            );
            println!(
                "  gravity:       ({}, {})",
                config.gravity.x, config.gravity.y
            );
        }
        EmitterType::Radial => {
            println!(
                "  radius:        {} -> {}",
                config.max_radius, config.min_radius
            );
            println!(
                "  rotation:      {:.1} deg/s",
                config.rotate_per_second.to_degrees()
            );
        }
    }
    println!(
        "  size:          {} -> {}",
        config.start_size, config.end_size
    );
    println!(
        "  blend:         {:?} / {:?}",
        config.blend_source, config.blend_destination
    );
    if config.duration > 0.0 {
        println!("  duration:      {} s", config.duration);
    }
    match &config.texture {
        Some(texture) => {
            let name = texture.name.as_deref().unwrap_or("<unnamed>");
            match &texture.image {
                Some(image) => {
                    println!("  texture:       {} ({}x{})", name, image.width(), image.height())
                }
                None => println!("  texture:       {} (not loaded)", name),
            }
        }
        None => println!("  texture:       none"),
    }
}

fn summary_json(config: &ParticleConfig) -> serde_json::Value {
    let texture = config.texture.as_ref().map(|t| {
        serde_json::json!({
            "name": t.name,
            "loaded": t.image.is_some(),
            "width": t.image.as_ref().map(|i| i.width()),
            "height": t.image.as_ref().map(|i| i.height()),
        })
    });

    serde_json::json!({
        "emitter_type": config.emitter_type.name(),
        "max_particles": config.max_particles,
        "emission_rate": config.emission_rate().ok(),
        "texture": texture,
        "config": serde_json::to_value(config).unwrap_or_default(),
    })
}
