//! Descriptor files on disk
//!
//! `.toml` files are read as TOML tables; anything else is treated as a
//! Particle Designer `.pex` document. A texture named but not embedded is
//! looked up next to the descriptor.

use crate::config::{ParticleConfig, TextureRef};
use crate::pex::{parse_pex, write_pex};
use crate::texture::Texture;
use ember_core::Result;
use log::{debug, warn};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorFormat {
    Pex,
    Toml,
}

impl DescriptorFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => DescriptorFormat::Toml,
            _ => DescriptorFormat::Pex,
        }
    }
}

/// Load a descriptor file and resolve its texture.
pub fn load_descriptor(path: impl AsRef<Path>) -> Result<ParticleConfig> {
    load(path.as_ref(), None)
}

/// Load a descriptor file but take the texture from `image_bytes`, ignoring
/// whatever the descriptor embeds or names.
pub fn load_descriptor_with_image(
    path: impl AsRef<Path>,
    image_bytes: &[u8],
) -> Result<ParticleConfig> {
    load(path.as_ref(), Some(image_bytes))
}

fn load(path: &Path, image_bytes: Option<&[u8]>) -> Result<ParticleConfig> {
    let source = std::fs::read_to_string(path)?;
    let mut config = match DescriptorFormat::from_path(path) {
        DescriptorFormat::Pex => parse_pex(&source, image_bytes)?,
        DescriptorFormat::Toml => {
            let mut config = ParticleConfig::from_toml_str(&source)?;
            if let Some(bytes) = image_bytes {
                let texture = config.texture.get_or_insert_with(TextureRef::default);
                texture.image = Some(Texture::from_image_bytes(bytes)?);
            }
            config
        }
    };
    resolve_texture_file(&mut config, path.parent().unwrap_or(Path::new("")))?;
    debug!("loaded descriptor {}", path.display());
    Ok(config)
}

/// Write `config` in the format implied by `path`'s extension.
pub fn save_descriptor(config: &ParticleConfig, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let text = match DescriptorFormat::from_path(path) {
        DescriptorFormat::Pex => write_pex(config)?,
        DescriptorFormat::Toml => config.to_toml_string()?,
    };
    std::fs::write(path, text)?;
    Ok(())
}

fn resolve_texture_file(config: &mut ParticleConfig, base_dir: &Path) -> Result<()> {
    let Some(texture) = config.texture.as_mut() else {
        return Ok(());
    };
    if texture.image.is_some() {
        return Ok(());
    }
    let Some(name) = texture.name.as_deref() else {
        return Ok(());
    };

    let file = base_dir.join(name);
    if !file.is_file() {
        warn!(
            "texture {} not found; particles will render untextured",
            file.display()
        );
        return Ok(());
    }
    let bytes = std::fs::read(&file)?;
    texture.image = Some(Texture::from_image_bytes(&bytes)?);
    debug!("loaded texture {}", file.display());
    Ok(())
}
