//! Seedable randomness for spawn-time variance

/// Source of uniform random numbers used when sampling variances.
///
/// The emitter only ever asks for uniform floats, so any generator can be
/// plugged in; tests use a fixed seed for reproducible trajectories.
pub trait VarianceSource {
    /// Returns a float in [0, 1)
    fn next_f32(&mut self) -> f32;

    /// Uniform sample from `[base - variance, base + variance]`
    fn variance(&mut self, base: f32, variance: f32) -> f32 {
        if variance == 0.0 {
            return base;
        }
        base + variance * (self.next_f32() * 2.0 - 1.0)
    }
}

/// Lightweight xorshift32 PRNG
#[derive(Debug, Clone)]
pub struct ParticleRng {
    state: u32,
}

impl ParticleRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl VarianceSource for ParticleRng {
    fn next_f32(&mut self) -> f32 {
        // Top 24 bits fit the f32 mantissa exactly, so the result stays below 1.0
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }
}
