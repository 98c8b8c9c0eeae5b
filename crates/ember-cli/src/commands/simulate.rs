//! Headless simulation command

use anyhow::{bail, Context, Result};
use ember_particles::{load_descriptor, ParticleConfig, ParticleRng, ParticleSystem};
use ember_runtime::{Animatable, FrameClock};

pub struct SimulateArgs {
    pub descriptor: String,
    pub seconds: f64,
    pub fps: u32,
    pub seed: u32,
    pub burst: Option<f32>,
}

/// Live counts sampled once per simulated second
#[derive(Debug, Default)]
pub struct SimulationReport {
    pub frames: u64,
    pub samples: Vec<(f64, usize)>,
    pub peak: usize,
    pub completed_at: Option<f64>,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let config = load_descriptor(&args.descriptor)
        .with_context(|| format!("Failed to load descriptor {}", args.descriptor))?;
    let capacity = config.max_particles;
    let report = simulate(config, &args)?;

    println!(
        "Simulated {} frame(s) of {} ({} fps, seed {:#x})",
        report.frames, args.descriptor, args.fps, args.seed
    );
    for (time, live) in &report.samples {
        println!("  t={:>7.2}s  live={}", time, live);
    }
    println!("Peak: {}/{}", report.peak, capacity);
    if let Some(time) = report.completed_at {
        println!("Effect completed at {:.2}s", time);
    }
    Ok(())
}

pub fn simulate(config: ParticleConfig, args: &SimulateArgs) -> Result<SimulationReport> {
    if args.fps == 0 {
        bail!("fps must be positive");
    }
    if !(args.seconds > 0.0 && args.seconds.is_finite()) {
        bail!("seconds must be a positive number, got {}", args.seconds);
    }

    let mut system = ParticleSystem::with_rng(config, ParticleRng::new(args.seed))?;
    match args.burst {
        Some(duration) => system.burst(duration),
        None => system.start(),
    }

    let frame_time = 1.0 / f64::from(args.fps);
    let total_frames = (args.seconds * f64::from(args.fps)).round() as u64;
    let mut clock = FrameClock::new();
    let mut report = SimulationReport::default();
    let mut next_sample = 1.0;

    for _ in 0..total_frames {
        let dt = clock.advance(frame_time);
        system.advance_time(dt);
        report.frames = clock.frame;
        report.peak = report.peak.max(system.live_count());

        // Small epsilon so accumulated frame times still land on whole seconds
        if clock.total_time + 1e-9 >= next_sample {
            report.samples.push((clock.total_time, system.live_count()));
            next_sample += 1.0;
        }
        if system.is_complete() {
            report.completed_at = Some(clock.total_time);
            log::info!("effect completed after {} frame(s)", clock.frame);
            break;
        }
    }
    Ok(report)
}
