//! Particle types: CPU simulation state and GPU point-sprite data

use bytemuck::{Pod, Zeroable};
use ember_core::{Color4, Vec2};
use thiserror::Error;

/// CPU-side particle state (not sent to GPU)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub color: Color4,
    /// Per-second change of `color`
    pub color_delta: Color4,
    pub position: Vec2,
    /// Where the emitter was when this particle spawned
    pub start_position: Vec2,
    /// Gravity mode only
    pub velocity: Vec2,
    /// Gravity mode only
    pub radial_acceleration: f32,
    /// Gravity mode only
    pub tangential_acceleration: f32,
    /// Radial mode only
    pub radius: f32,
    pub radius_delta: f32,
    /// Radians
    pub rotation: f32,
    /// Radians per second
    pub rotation_delta: f32,
    pub size: f32,
    pub size_delta: f32,
    /// Remaining lifetime in seconds; alive iff > 0
    pub time_to_live: f32,
}

impl Particle {
    pub fn dead() -> Self {
        Self {
            color: Color4::TRANSPARENT,
            color_delta: Color4::TRANSPARENT,
            position: Vec2::ZERO,
            start_position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            radial_acceleration: 0.0,
            tangential_acceleration: 0.0,
            radius: 0.0,
            radius_delta: 0.0,
            rotation: 0.0,
            rotation_delta: 0.0,
            size: 0.0,
            size_delta: 0.0,
            time_to_live: 0.0,
        }
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::dead()
    }
}

/// GPU point-sprite record.
/// 16 bytes: position, size, RGBA8 color (red in the lowest byte).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PointSprite {
    pub x: f32,
    pub y: f32,
    /// Never negative; 0 means invisible
    pub size: f32,
    pub color: u32,
}

impl PointSprite {
    pub fn from_particle(p: &Particle) -> Self {
        Self {
            x: p.position.x,
            y: p.position.y,
            size: if p.size > 0.0 { p.size } else { 0.0 },
            color: p.color.to_rgba8(),
        }
    }
}

/// Returned by [`ParticlePool::spawn`] when every slot is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("particle pool is full")]
pub struct PoolFull;

/// Fixed-capacity pool with swap-remove compaction.
///
/// Live particles always occupy `[0, live_count)`; the rest of the backing
/// storage is free and never handed out for reading.
pub struct ParticlePool {
    particles: Vec<Particle>,
    live_count: usize,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: vec![Particle::dead(); capacity],
            live_count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    pub fn live_count(&self) -> usize {
        self.live_count
    }

    pub fn is_full(&self) -> bool {
        self.live_count >= self.particles.len()
    }

    /// Copy `particle` into the first free slot and return its index.
    pub fn spawn(&mut self, particle: Particle) -> Result<usize, PoolFull> {
        if self.is_full() {
            return Err(PoolFull);
        }
        let idx = self.live_count;
        self.particles[idx] = particle;
        self.live_count += 1;
        Ok(idx)
    }

    /// Remove the particle at `index` by moving the last live particle into its slot.
    /// Out-of-range indices are ignored.
    pub fn kill_at(&mut self, index: usize) {
        if index >= self.live_count {
            return;
        }
        let last = self.live_count - 1;
        if index != last {
            self.particles[index] = self.particles[last];
        }
        self.particles[last] = Particle::dead();
        self.live_count = last;
    }

    /// Forget every live particle without touching capacity.
    pub fn clear(&mut self) {
        for p in &mut self.particles[..self.live_count] {
            *p = Particle::dead();
        }
        self.live_count = 0;
    }

    /// Live particles (first `live_count` elements)
    pub fn live(&self) -> &[Particle] {
        &self.particles[..self.live_count]
    }

    /// Live particles, mutably
    pub fn live_mut(&mut self) -> &mut [Particle] {
        &mut self.particles[..self.live_count]
    }
}
