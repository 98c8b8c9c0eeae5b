//! Emission scheduling and spawn-time particle initialization

use crate::config::ParticleConfig;
use crate::particle::{Particle, ParticlePool};
use crate::rand::VarianceSource;
use ember_core::{Color4, Vec2};
use log::warn;

/// Decides how many particles to spawn each frame.
///
/// The rate is fixed when the emitter is (re)configured; fractional particles
/// carry over between frames in `emit_counter` so the long-run rate matches
/// regardless of frame-time jitter.
#[derive(Debug, Clone)]
pub struct Emitter {
    /// Particles per second; `None` when the lifespan disables emission
    rate: Option<f32>,
    emit_counter: f32,
    active: bool,
    /// Countdown for a `start()` bounded by the configured duration
    remaining: Option<f32>,
    /// Forced-emission countdown
    burst_remaining: f32,
}

impl Emitter {
    pub fn new(config: &ParticleConfig) -> Self {
        let mut emitter = Self {
            rate: None,
            emit_counter: 0.0,
            active: false,
            remaining: None,
            burst_remaining: 0.0,
        };
        emitter.reconfigure(config);
        emitter
    }

    /// Recompute the emission rate from `config`.
    pub fn reconfigure(&mut self, config: &ParticleConfig) {
        self.rate = match config.emission_rate() {
            Ok(rate) => Some(rate),
            Err(err) => {
                warn!("{err}");
                None
            }
        };
    }

    pub fn rate(&self) -> Option<f32> {
        self.rate
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the next frame would emit, burst included
    pub fn is_emitting(&self) -> bool {
        self.active || self.burst_remaining > 0.0
    }

    /// Begin emitting. A positive `duration` stops emission after that many
    /// seconds. The first particle is due on the next advance.
    ///
    /// Starting an emitter that is already active changes nothing.
    pub fn start(&mut self, duration: f32) {
        if self.active {
            return;
        }
        self.active = true;
        self.remaining = (duration > 0.0).then_some(duration);
        self.prime();
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.remaining = None;
    }

    /// Force emission for `duration` seconds whatever the active flag says.
    /// A burst already running is extended, not re-primed.
    pub fn burst(&mut self, duration: f32) {
        if duration > 0.0 {
            if !self.is_emitting() {
                self.prime();
            }
            self.burst_remaining = self.burst_remaining.max(duration);
        }
    }

    fn prime(&mut self) {
        self.emit_counter = self.emit_counter.max(1.0);
    }

    /// Advance timers by `dt` and spawn this frame's particles into `pool`.
    /// Returns how many were spawned.
    pub fn emit<R>(
        &mut self,
        pool: &mut ParticlePool,
        config: &ParticleConfig,
        rng: &mut R,
        dt: f32,
    ) -> usize
    where
        R: VarianceSource + ?Sized,
    {
        if !(dt > 0.0) {
            return 0;
        }
        let emitting = self.is_emitting();
        self.tick_timers(dt);

        let Some(rate) = self.rate else {
            return 0;
        };
        if !emitting {
            return 0;
        }

        self.emit_counter += rate * dt;
        let mut spawned = 0;
        while self.emit_counter >= 1.0 {
            self.emit_counter -= 1.0;
            let Some(particle) = init_particle(config, rng) else {
                continue;
            };
            if pool.spawn(particle).is_err() {
                // Full: this frame's remaining whole particles are dropped too
                self.emit_counter = self.emit_counter.fract();
                break;
            }
            spawned += 1;
        }
        spawned
    }

    fn tick_timers(&mut self, dt: f32) {
        if self.burst_remaining > 0.0 {
            self.burst_remaining = (self.burst_remaining - dt).max(0.0);
        }
        if self.active {
            if let Some(remaining) = self.remaining.as_mut() {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    self.stop();
                }
            }
        }
    }
}

/// Sample a new particle from `config`. Returns `None` when the sampled
/// lifespan is not positive; such a particle would never be visible.
pub fn init_particle<R>(config: &ParticleConfig, rng: &mut R) -> Option<Particle>
where
    R: VarianceSource + ?Sized,
{
    let lifespan = rng.variance(config.lifespan, config.lifespan_variance);
    if !(lifespan > 0.0) {
        return None;
    }

    let position = Vec2::new(
        rng.variance(config.emitter_position.x, config.emitter_position_variance.x),
        rng.variance(config.emitter_position.y, config.emitter_position_variance.y),
    );
    let angle = rng.variance(config.emit_angle, config.emit_angle_variance);
    let speed = rng.variance(config.speed, config.speed_variance);
    let radial_acceleration = rng.variance(
        config.radial_acceleration,
        config.radial_acceleration_variance,
    );
    let tangential_acceleration = rng.variance(
        config.tangential_acceleration,
        config.tangential_acceleration_variance,
    );
    let max_radius = rng.variance(config.max_radius, config.max_radius_variance);
    let min_radius = rng.variance(config.min_radius, config.min_radius_variance);
    let rotate_per_second =
        rng.variance(config.rotate_per_second, config.rotate_per_second_variance);
    let start_size = rng.variance(config.start_size, config.start_size_variance);
    let end_size = rng.variance(config.end_size, config.end_size_variance);
    let start_color = sample_color(rng, config.start_color, config.start_color_variance);
    let end_color = sample_color(rng, config.end_color, config.end_color_variance);

    Some(Particle {
        color: start_color,
        color_delta: (end_color - start_color) / lifespan,
        position,
        start_position: config.emitter_position,
        velocity: Vec2::from_angle(angle) * speed,
        radial_acceleration,
        tangential_acceleration,
        radius: max_radius,
        radius_delta: (min_radius - max_radius) / lifespan,
        rotation: angle,
        rotation_delta: rotate_per_second,
        size: start_size,
        size_delta: (end_size - start_size) / lifespan,
        time_to_live: lifespan,
    })
}

fn sample_color<R>(rng: &mut R, base: Color4, variance: Color4) -> Color4
where
    R: VarianceSource + ?Sized,
{
    Color4::new(
        rng.variance(base.red, variance.red),
        rng.variance(base.green, variance.green),
        rng.variance(base.blue, variance.blue),
        rng.variance(base.alpha, variance.alpha),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rand::ParticleRng;

    fn config(max: usize, lifespan: f32) -> ParticleConfig {
        ParticleConfig {
            max_particles: max,
            lifespan,
            ..Default::default()
        }
    }

    #[test]
    fn fractional_particles_accumulate() {
        let cfg = config(10, 1.0); // 10 per second
        let mut pool = ParticlePool::new(10);
        let mut emitter = Emitter::new(&cfg);
        let mut rng = ParticleRng::new(1);
        emitter.start(0.0);
        emitter.emit_counter = 0.0;

        // 0.25 particles per frame: one spawn every fourth frame
        let spawned: usize = (0..8)
            .map(|_| emitter.emit(&mut pool, &cfg, &mut rng, 0.025))
            .sum();
        assert_eq!(spawned, 2);
        assert_eq!(pool.live_count(), 2);
    }

    #[test]
    fn start_primes_first_particle() {
        let cfg = config(1, 1.0);
        let mut pool = ParticlePool::new(1);
        let mut emitter = Emitter::new(&cfg);
        let mut rng = ParticleRng::new(1);
        emitter.start(0.0);
        assert_eq!(emitter.emit(&mut pool, &cfg, &mut rng, 0.01), 1);
    }

    #[test]
    fn repeated_start_keeps_the_rate() {
        let cfg = config(10, 10.0); // 1 per second
        let mut pool = ParticlePool::new(10);
        let mut emitter = Emitter::new(&cfg);
        let mut rng = ParticleRng::new(1);
        let spawned: usize = (0..10)
            .map(|_| {
                emitter.start(0.0);
                emitter.emit(&mut pool, &cfg, &mut rng, 0.01)
            })
            .sum();
        assert_eq!(spawned, 1);
    }

    #[test]
    fn overlapping_burst_is_not_reprimed() {
        let cfg = config(10, 10.0);
        let mut pool = ParticlePool::new(10);
        let mut emitter = Emitter::new(&cfg);
        let mut rng = ParticleRng::new(1);
        let spawned: usize = (0..10)
            .map(|_| {
                emitter.burst(1.0);
                emitter.emit(&mut pool, &cfg, &mut rng, 0.01)
            })
            .sum();
        assert_eq!(spawned, 1);
    }

    #[test]
    fn inactive_emitter_spawns_nothing() {
        let cfg = config(10, 1.0);
        let mut pool = ParticlePool::new(10);
        let mut emitter = Emitter::new(&cfg);
        let mut rng = ParticleRng::new(1);
        assert_eq!(emitter.emit(&mut pool, &cfg, &mut rng, 1.0), 0);
    }

    #[test]
    fn full_pool_drops_silently() {
        let cfg = config(2, 0.1); // 20 per second
        let mut pool = ParticlePool::new(2);
        let mut emitter = Emitter::new(&cfg);
        let mut rng = ParticleRng::new(1);
        emitter.start(0.0);

        assert_eq!(emitter.emit(&mut pool, &cfg, &mut rng, 1.0), 2);
        assert_eq!(emitter.emit(&mut pool, &cfg, &mut rng, 1.0), 0);
        assert_eq!(pool.live_count(), 2);
        assert!(emitter.emit_counter < 1.0);
    }

    #[test]
    fn non_positive_lifespan_disables_emission() {
        let cfg = config(10, 0.0);
        let mut pool = ParticlePool::new(10);
        let mut emitter = Emitter::new(&cfg);
        let mut rng = ParticleRng::new(1);
        emitter.start(0.0);
        assert_eq!(emitter.rate(), None);
        assert_eq!(emitter.emit(&mut pool, &cfg, &mut rng, 10.0), 0);
    }

    #[test]
    fn non_positive_sampled_lifespan_is_discarded() {
        let cfg = ParticleConfig {
            lifespan: 0.5,
            lifespan_variance: 10.0,
            ..Default::default()
        };
        let mut rng = ParticleRng::new(3);
        let mut discarded = 0;
        for _ in 0..200 {
            match init_particle(&cfg, &mut rng) {
                Some(p) => assert!(p.time_to_live > 0.0),
                None => discarded += 1,
            }
        }
        assert!(discarded > 0);
    }

    #[test]
    fn burst_overrides_inactive_flag_for_its_duration() {
        let cfg = config(100, 1.0); // 100 per second
        let mut pool = ParticlePool::new(100);
        let mut emitter = Emitter::new(&cfg);
        let mut rng = ParticleRng::new(1);
        emitter.burst(0.08);
        assert!(!emitter.is_active());

        let first = emitter.emit(&mut pool, &cfg, &mut rng, 0.05);
        let second = emitter.emit(&mut pool, &cfg, &mut rng, 0.05);
        let after = emitter.emit(&mut pool, &cfg, &mut rng, 0.05);
        assert!(first >= 5);
        assert!(second >= 4);
        assert_eq!(after, 0);
        assert!(!emitter.is_emitting());
    }

    #[test]
    fn bounded_start_stops_itself() {
        let cfg = config(100, 1.0);
        let mut pool = ParticlePool::new(100);
        let mut emitter = Emitter::new(&cfg);
        let mut rng = ParticleRng::new(1);
        emitter.start(0.2);
        emitter.emit(&mut pool, &cfg, &mut rng, 0.1);
        assert!(emitter.is_active());
        emitter.emit(&mut pool, &cfg, &mut rng, 0.1);
        assert!(!emitter.is_active());
        assert_eq!(emitter.emit(&mut pool, &cfg, &mut rng, 0.1), 0);
    }

    #[test]
    fn spawn_derives_linear_deltas() {
        let cfg = ParticleConfig {
            lifespan: 2.0,
            start_size: 10.0,
            end_size: 4.0,
            start_color: Color4::new(1.0, 1.0, 1.0, 1.0),
            end_color: Color4::new(0.0, 0.5, 1.0, 0.0),
            max_radius: 50.0,
            min_radius: 10.0,
            rotate_per_second: 3.0,
            speed: 2.0,
            emit_angle: std::f32::consts::FRAC_PI_2,
            emitter_position: Vec2::new(5.0, 6.0),
            ..Default::default()
        };
        let p = init_particle(&cfg, &mut ParticleRng::new(9)).unwrap();
        assert_eq!(p.time_to_live, 2.0);
        assert_eq!(p.size_delta, -3.0);
        assert_eq!(p.color_delta, Color4::new(-0.5, -0.25, 0.0, -0.5));
        assert_eq!(p.radius, 50.0);
        assert_eq!(p.radius_delta, -20.0);
        assert_eq!(p.rotation_delta, 3.0);
        assert_eq!(p.position, Vec2::new(5.0, 6.0));
        assert_eq!(p.start_position, Vec2::new(5.0, 6.0));
        assert!(p.velocity.x.abs() < 1e-6);
        assert!((p.velocity.y - 2.0).abs() < 1e-6);
    }
}
