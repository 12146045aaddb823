//! Simulate command handler
//!
//! Runs the background decoration without a display. The pointer sweeps a
//! slow circle around the canvas centre so attraction is exercised too.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use studyhub::config::Config;
use studyhub::core::physics::{PhysicsParams, Vec2, World};
use studyhub::{debug, error, verbose};

const POINTER_ORBIT_SPEED: f64 = 0.02;

/// Simulation run settings; unset fields come from `[simulation]` config
#[derive(Debug, Clone, Default)]
pub struct SimulateOptions {
    /// Frames to run
    pub frames: Option<usize>,
    /// RNG seed; entropy when unset
    pub seed: Option<u64>,
    /// Canvas width
    pub width: Option<f64>,
    /// Canvas height
    pub height: Option<f64>,
    /// Icon count
    pub icons: Option<usize>,
    /// Particle count
    pub particles: Option<usize>,
    /// JSON-lines trace output
    pub trace: Option<PathBuf>,
}

/// Statistics gathered over a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    /// Frames stepped
    pub frames: usize,
    /// Fastest body speed seen in any frame
    pub peak_speed: f64,
    /// Whether every icon stayed inside the canvas on every frame
    pub contained: bool,
    /// Kinetic energy after the last frame
    pub final_energy: f64,
}

/// Run the simulation and print a summary
///
/// # Errors
/// Returns an error for invalid settings, trace write failures, or a broken
/// containment or speed invariant
pub fn run(options: &SimulateOptions, config: &Config) -> Result<(), String> {
    let sim = &config.simulation;
    let frames = options.frames.unwrap_or(sim.frames);
    let width = options.width.unwrap_or(sim.width);
    let height = options.height.unwrap_or(sim.height);
    let icons = options.icons.unwrap_or(sim.icons);
    let particles = options.particles.unwrap_or(sim.particles);

    let mut world = World::new(width, height, PhysicsParams::default())?;
    let mut rng = options
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    world.populate(icons, particles, &mut rng);
    debug!(
        "Simulating {icons} icon(s) and {particles} particle(s) on {width}x{height} for {frames} frame(s)"
    );

    let mut trace = options.trace.as_deref().map(open_trace).transpose()?;
    let summary = drive(&mut world, frames, |world| {
        if let Some(out) = trace.as_mut() {
            let line = serde_json::to_string(&world.snapshot())
                .map_err(|e| format!("Failed to serialize frame: {e}"))?;
            writeln!(out, "{line}").map_err(|e| format!("Failed to write trace: {e}"))?;
        }
        Ok(())
    })?;
    if let Some(mut out) = trace {
        out.flush().map_err(|e| format!("Failed to write trace: {e}"))?;
    }

    let cap = world.params().max_speed;
    println!("Frames:        {}", summary.frames);
    println!("Bodies:        {icons} icon(s), {particles} particle(s)");
    println!("Peak speed:    {:.3} (cap {cap:.3})", summary.peak_speed);
    println!("Final energy:  {:.3}", summary.final_energy);
    if let Some(path) = &options.trace {
        println!("Trace:         {}", path.display());
    }

    if !summary.contained {
        error!("Icon left the canvas during simulation");
        return Err("Containment violated: an icon left the canvas".to_string());
    }
    if summary.peak_speed > cap + 1e-9 {
        error!("Speed cap exceeded: {} > {cap}", summary.peak_speed);
        return Err(format!("Speed cap exceeded: {:.3}", summary.peak_speed));
    }
    println!("✓ All icons stayed on the canvas and under the speed cap");
    Ok(())
}

fn open_trace(path: &Path) -> Result<BufWriter<File>, String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| format!("Failed to create trace {}: {e}", path.display()))
}

/// Pointer position for a frame: a circle around the canvas centre
fn pointer_at(world: &World, frame: usize) -> Vec2 {
    let (width, height) = world.size();
    let centre = Vec2::new(width / 2.0, height / 2.0);
    #[allow(clippy::cast_precision_loss)]
    let angle = frame as f64 * POINTER_ORBIT_SPEED;
    centre + Vec2::from_angle(angle) * (width.min(height) / 4.0)
}

/// Step `frames` times, checking invariants and handing each frame to `on_frame`
///
/// # Errors
/// Propagates the first error from `on_frame`
pub fn drive(
    world: &mut World,
    frames: usize,
    mut on_frame: impl FnMut(&World) -> Result<(), String>,
) -> Result<RunSummary, String> {
    let mut summary = RunSummary {
        frames,
        peak_speed: world.max_body_speed(),
        contained: world.icons_contained(),
        final_energy: 0.0,
    };

    for frame in 0..frames {
        let pointer = pointer_at(world, frame);
        world.step(Some(pointer));
        summary.peak_speed = summary.peak_speed.max(world.max_body_speed());
        summary.contained &= world.icons_contained();
        on_frame(world)?;
        if frame % 100 == 99 {
            verbose!("  frame {}: energy {:.2}", frame + 1, world.kinetic_energy());
        }
    }

    summary.final_energy = world.kinetic_energy();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drive_keeps_invariants() {
        let mut world = World::new(400.0, 300.0, PhysicsParams::default()).unwrap();
        world.populate(8, 40, &mut StdRng::seed_from_u64(7));
        let mut seen = 0;
        let summary = drive(&mut world, 300, |_| {
            seen += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, 300);
        assert!(summary.contained);
        assert!(summary.peak_speed <= world.params().max_speed + 1e-9);
        assert_eq!(world.frame(), 300);
    }

    #[test]
    fn test_drive_stops_on_callback_error() {
        let mut world = World::new(200.0, 200.0, PhysicsParams::default()).unwrap();
        let result = drive(&mut world, 10, |w| {
            if w.frame() == 3 {
                Err("stop".to_string())
            } else {
                Ok(())
            }
        });
        assert_eq!(result, Err("stop".to_string()));
        assert_eq!(world.frame(), 3);
    }

    #[test]
    fn test_pointer_orbits_centre() {
        let world = World::new(400.0, 200.0, PhysicsParams::default()).unwrap();
        let p = pointer_at(&world, 0);
        assert!((p.x - 250.0).abs() < 1e-9);
        assert!((p.y - 100.0).abs() < 1e-9);
    }
}
