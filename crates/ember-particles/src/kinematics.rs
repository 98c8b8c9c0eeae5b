//! Per-frame particle integration

use crate::config::EmitterType;
use crate::particle::{Particle, ParticlePool};
use ember_core::Vec2;

/// Frame-invariant inputs to the updater
#[derive(Debug, Clone, Copy)]
pub struct Kinematics {
    pub emitter_type: EmitterType,
    /// Center of radial orbits: the emitter's current position
    pub origin: Vec2,
    pub gravity: Vec2,
}

/// Advance every live particle by `dt`, killing the expired ones.
/// Returns the number of particles that died. Non-positive `dt` is a no-op.
pub fn advance(pool: &mut ParticlePool, kinematics: &Kinematics, dt: f32) -> usize {
    if !(dt > 0.0) {
        return 0;
    }
    let mut killed = 0;
    let mut i = 0;
    while i < pool.live_count() {
        let expired = {
            let p = &mut pool.live_mut()[i];
            p.time_to_live -= dt;
            p.time_to_live <= 0.0
        };
        if expired {
            pool.kill_at(i);
            killed += 1;
            // Don't increment i — the swapped-in particle needs updating
            continue;
        }
        advance_particle(&mut pool.live_mut()[i], kinematics, dt);
        i += 1;
    }
    killed
}

fn advance_particle(p: &mut Particle, k: &Kinematics, dt: f32) {
    // Unclamped; packing clamps color and hides non-positive sizes
    p.color += p.color_delta * dt;
    p.size += p.size_delta * dt;

    match k.emitter_type {
        EmitterType::Gravity => {
            let radial = (p.position - p.start_position).normalized();
            let tangential = radial.perpendicular();
            let acceleration = k.gravity
                + radial * p.radial_acceleration
                + tangential * p.tangential_acceleration;
            p.velocity += acceleration * dt;
            p.position += p.velocity * dt;
        }
        EmitterType::Radial => {
            p.rotation += p.rotation_delta * dt;
            p.radius += p.radius_delta * dt;
            p.position = k.origin + Vec2::from_angle(p.rotation) * p.radius.max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::Color4;

    const GRAVITY: Kinematics = Kinematics {
        emitter_type: EmitterType::Gravity,
        origin: Vec2::ZERO,
        gravity: Vec2::new(0.0, -10.0),
    };

    fn live(ttl: f32) -> Particle {
        Particle {
            time_to_live: ttl,
            ..Particle::dead()
        }
    }

    #[test]
    fn expired_particles_are_compacted() {
        let mut pool = ParticlePool::new(4);
        pool.spawn(live(0.05)).unwrap();
        pool.spawn(live(1.0)).unwrap();
        pool.spawn(live(0.05)).unwrap();
        pool.spawn(live(2.0)).unwrap();

        let killed = advance(&mut pool, &GRAVITY, 0.1);
        assert_eq!(killed, 2);
        assert_eq!(pool.live_count(), 2);
        let mut ttls: Vec<f32> = pool.live().iter().map(|p| p.time_to_live).collect();
        ttls.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!((ttls[0] - 0.9).abs() < 1e-6);
        assert!((ttls[1] - 1.9).abs() < 1e-6);
    }

    #[test]
    fn negative_and_zero_dt_are_no_ops() {
        let mut pool = ParticlePool::new(1);
        pool.spawn(live(1.0)).unwrap();
        assert_eq!(advance(&mut pool, &GRAVITY, -1.0), 0);
        assert_eq!(advance(&mut pool, &GRAVITY, 0.0), 0);
        assert_eq!(advance(&mut pool, &GRAVITY, f32::NAN), 0);
        assert_eq!(pool.live()[0], live(1.0));
    }

    #[test]
    fn interpolation_is_linear_and_unclamped() {
        let mut pool = ParticlePool::new(1);
        pool.spawn(Particle {
            color: Color4::new(0.9, 0.1, 0.5, 1.0),
            color_delta: Color4::new(1.0, -1.0, 0.0, -2.0),
            size: 1.0,
            size_delta: -4.0,
            ..live(10.0)
        })
        .unwrap();
        advance(&mut pool, &GRAVITY, 0.5);
        let p = pool.live()[0];
        assert!((p.color.red - 1.4).abs() < 1e-6);
        assert!((p.color.green + 0.4).abs() < 1e-6);
        assert!(p.color.alpha.abs() < 1e-6);
        assert!((p.size + 1.0).abs() < 1e-6);
    }

    #[test]
    fn gravity_at_origin_uses_zero_direction() {
        let mut pool = ParticlePool::new(1);
        pool.spawn(Particle {
            radial_acceleration: 100.0,
            tangential_acceleration: 100.0,
            ..live(10.0)
        })
        .unwrap();
        advance(&mut pool, &GRAVITY, 0.5);
        let p = pool.live()[0];
        assert_eq!(p.velocity, Vec2::new(0.0, -5.0));
        assert_eq!(p.position, Vec2::new(0.0, -2.5));
    }

    #[test]
    fn radial_and_tangential_acceleration_directions() {
        let k = Kinematics {
            gravity: Vec2::ZERO,
            ..GRAVITY
        };
        let mut pool = ParticlePool::new(2);
        // Particle east of its origin: radial pushes +x, tangential pushes +y
        pool.spawn(Particle {
            position: Vec2::new(2.0, 0.0),
            radial_acceleration: 4.0,
            ..live(10.0)
        })
        .unwrap();
        pool.spawn(Particle {
            position: Vec2::new(2.0, 0.0),
            tangential_acceleration: 4.0,
            ..live(10.0)
        })
        .unwrap();
        advance(&mut pool, &k, 1.0);
        assert_eq!(pool.live()[0].velocity, Vec2::new(4.0, 0.0));
        assert_eq!(pool.live()[1].velocity, Vec2::new(0.0, 4.0));
    }

    #[test]
    fn radial_mode_clamps_negative_radius_for_position_only() {
        let k = Kinematics {
            emitter_type: EmitterType::Radial,
            origin: Vec2::new(10.0, 20.0),
            gravity: Vec2::ZERO,
        };
        let mut pool = ParticlePool::new(1);
        pool.spawn(Particle {
            radius: 1.0,
            radius_delta: -4.0,
            ..live(10.0)
        })
        .unwrap();
        advance(&mut pool, &k, 0.5);
        let p = pool.live()[0];
        assert!((p.radius + 1.0).abs() < 1e-6);
        assert_eq!(p.position, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn radial_mode_orbits_origin() {
        let k = Kinematics {
            emitter_type: EmitterType::Radial,
            origin: Vec2::new(1.0, 1.0),
            gravity: Vec2::ZERO,
        };
        let mut pool = ParticlePool::new(1);
        pool.spawn(Particle {
            radius: 2.0,
            rotation_delta: std::f32::consts::PI,
            ..live(10.0)
        })
        .unwrap();
        advance(&mut pool, &k, 0.5);
        let p = pool.live()[0];
        assert!((p.position.x - 1.0).abs() < 1e-5);
        assert!((p.position.y - 3.0).abs() < 1e-5);
    }
}
