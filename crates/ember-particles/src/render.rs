//! Point-sprite packing for the renderer

use crate::particle::{ParticlePool, PointSprite};

/// Write one sprite per live particle into `out` without allocating.
/// Returns the number of sprites written, capped at `out.len()`.
pub fn fill(pool: &ParticlePool, out: &mut [PointSprite]) -> usize {
    let mut written = 0;
    for (dst, p) in out.iter_mut().zip(pool.live()) {
        *dst = PointSprite::from_particle(p);
        written += 1;
    }
    written
}

/// Reusable sprite array, rebuilt after every update
#[derive(Debug, Default)]
pub struct RenderBuffer {
    sprites: Vec<PointSprite>,
}

impl RenderBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sprites: Vec::with_capacity(capacity),
        }
    }

    /// Repack from the pool's live range. Allocates only if the pool outgrew the buffer.
    pub fn rebuild(&mut self, pool: &ParticlePool) -> &[PointSprite] {
        self.sprites.clear();
        self.sprites
            .extend(pool.live().iter().map(PointSprite::from_particle));
        &self.sprites
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
    }

    pub fn sprites(&self) -> &[PointSprite] {
        &self.sprites
    }

    /// Raw bytes for GPU upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.sprites)
    }
}
