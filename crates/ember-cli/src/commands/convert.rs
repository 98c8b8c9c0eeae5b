//! Descriptor conversion command

use anyhow::{Context, Result};
use ember_particles::{load_descriptor, save_descriptor, DescriptorFormat};
use std::path::Path;

pub fn run(input: &str, output: &str) -> Result<()> {
    let config =
        load_descriptor(input).with_context(|| format!("Failed to load descriptor {}", input))?;
    save_descriptor(&config, output).with_context(|| format!("Failed to write {}", output))?;

    println!(
        "Converted {} ({:?}) -> {} ({:?})",
        input,
        DescriptorFormat::from_path(Path::new(input)),
        output,
        DescriptorFormat::from_path(Path::new(output))
    );
    Ok(())
}
