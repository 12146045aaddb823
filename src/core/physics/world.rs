//! Fixed-timestep world step for icons and particles

use super::collision::{bounce_off_static, circle_contact, pair_mut, resolve_elastic};
use super::{Icon, Particle, Vec2};
use rand::Rng;
use serde::Serialize;
use std::f64::consts::TAU;

/// Tunables for the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsParams {
    /// Icon box edge in pixels
    pub icon_size: f64,
    /// Hard cap on any body's speed (pixels per frame)
    pub max_speed: f64,
    /// Multiplicative velocity decay per frame, in (0, 1]
    pub friction: f64,
    /// Friction never slows a moving icon below this speed
    pub min_speed: f64,
    /// Pointer attraction reach in pixels
    pub pointer_radius: f64,
    /// Attraction acceleration at zero distance (pixels per frame^2)
    pub pointer_strength: f64,
    /// Smallest particle radius
    pub particle_min_radius: f64,
    /// Largest particle radius
    pub particle_max_radius: f64,
    /// Initial particle speed cap
    pub particle_speed: f64,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            icon_size: 48.0,
            max_speed: 6.0,
            friction: 0.985,
            min_speed: 0.4,
            pointer_radius: 180.0,
            pointer_strength: 0.6,
            particle_min_radius: 1.0,
            particle_max_radius: 3.0,
            particle_speed: 1.2,
        }
    }
}

impl PhysicsParams {
    /// Check parameter ranges
    ///
    /// # Errors
    /// Returns a message naming the first out-of-range parameter
    pub fn validate(&self) -> Result<(), String> {
        let finite = [
            self.icon_size,
            self.max_speed,
            self.friction,
            self.min_speed,
            self.pointer_radius,
            self.pointer_strength,
            self.particle_min_radius,
            self.particle_max_radius,
            self.particle_speed,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err("Physics parameters must be finite".to_string());
        }
        if self.icon_size <= 0.0 {
            return Err(format!("icon_size must be positive, got {}", self.icon_size));
        }
        if self.max_speed <= 0.0 {
            return Err(format!("max_speed must be positive, got {}", self.max_speed));
        }
        if self.friction <= 0.0 || self.friction > 1.0 {
            return Err(format!("friction must be in (0, 1], got {}", self.friction));
        }
        if self.min_speed < 0.0 || self.min_speed > self.max_speed {
            return Err(format!(
                "min_speed must be in [0, max_speed], got {}",
                self.min_speed
            ));
        }
        if self.pointer_radius <= 0.0 {
            return Err(format!(
                "pointer_radius must be positive, got {}",
                self.pointer_radius
            ));
        }
        if self.particle_min_radius <= 0.0 || self.particle_max_radius < self.particle_min_radius {
            return Err("particle radii must satisfy 0 < min <= max".to_string());
        }
        if self.particle_speed < 0.0 {
            return Err("particle_speed cannot be negative".to_string());
        }
        Ok(())
    }
}

/// Serializable view of one frame
#[derive(Debug, Serialize)]
pub struct Frame<'a> {
    /// Frame counter
    pub frame: u64,
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
    /// Icon states
    pub icons: &'a [Icon],
    /// Particle states
    pub particles: &'a [Particle],
}

/// The simulated canvas
#[derive(Debug, Clone)]
pub struct World {
    width: f64,
    height: f64,
    params: PhysicsParams,
    icons: Vec<Icon>,
    particles: Vec<Particle>,
    frame: u64,
}

impl World {
    /// Create an empty world
    ///
    /// # Errors
    /// Returns an error if `params` fail validation
    pub fn new(width: f64, height: f64, params: PhysicsParams) -> Result<Self, String> {
        params.validate()?;
        Ok(Self {
            width: sanitize_extent(width),
            height: sanitize_extent(height),
            params,
            icons: Vec::new(),
            particles: Vec::new(),
            frame: 0,
        })
    }

    /// Scatter icons and particles at random positions and velocities
    pub fn populate<R: Rng + ?Sized>(&mut self, icons: usize, particles: usize, rng: &mut R) {
        let p = &self.params;
        let (max_x, max_y) = self.icon_bounds();
        let top_speed = (p.max_speed * 0.5).max(p.min_speed);
        for _ in 0..icons {
            let speed = rng.gen_range(p.min_speed..=top_speed);
            let mut icon = Icon::new(
                Vec2::new(rng.gen_range(0.0..=max_x), rng.gen_range(0.0..=max_y)),
                Vec2::from_angle(rng.gen_range(0.0..TAU)) * speed,
                p.icon_size,
            );
            icon.rotation = rng.gen_range(0.0..360.0);
            icon.spin = rng.gen_range(-1.5..=1.5);
            icon.scale = rng.gen_range(0.8..=1.2);
            self.icons.push(icon);
        }
        for _ in 0..particles {
            let radius = rng.gen_range(p.particle_min_radius..=p.particle_max_radius);
            let (lo_x, hi_x) = particle_range(self.width, radius);
            let (lo_y, hi_y) = particle_range(self.height, radius);
            let speed = rng.gen_range(0.0..=p.particle_speed.min(p.max_speed));
            self.particles.push(Particle::new(
                Vec2::new(rng.gen_range(lo_x..=hi_x), rng.gen_range(lo_y..=hi_y)),
                Vec2::from_angle(rng.gen_range(0.0..TAU)) * speed,
                radius,
            ));
        }
    }

    /// Add a single icon; it is clamped into the canvas
    ///
    /// Non-finite positions and velocities become zero, and non-finite
    /// rotation, spin, or scale fall back to the [`Icon::new`] values.
    pub fn add_icon(&mut self, mut icon: Icon) {
        icon.size = self.params.icon_size;
        let (max_x, max_y) = self.icon_bounds();
        let pos = icon.pos.finite_or_zero();
        icon.pos = Vec2::new(pos.x.clamp(0.0, max_x), pos.y.clamp(0.0, max_y));
        icon.vel = icon.vel.finite_or_zero().clamp_length(self.params.max_speed);
        icon.rotation = finite_or(icon.rotation, 0.0).rem_euclid(360.0);
        icon.spin = finite_or(icon.spin, 0.0);
        if !(icon.scale.is_finite() && icon.scale > 0.0) {
            icon.scale = 1.0;
        }
        self.icons.push(icon);
    }

    /// Add a single particle, clamped into the canvas like [`Self::add_icon`]
    pub fn add_particle(&mut self, mut particle: Particle) {
        if !(particle.radius.is_finite() && particle.radius > 0.0) {
            particle.radius = self.params.particle_min_radius;
        }
        let (lo_x, hi_x) = particle_range(self.width, particle.radius);
        let (lo_y, hi_y) = particle_range(self.height, particle.radius);
        let pos = particle.pos.finite_or_zero();
        particle.pos = Vec2::new(pos.x.clamp(lo_x, hi_x), pos.y.clamp(lo_y, hi_y));
        particle.vel = particle.vel.finite_or_zero().clamp_length(self.params.max_speed);
        self.particles.push(particle);
    }

    /// Advance one frame
    ///
    /// # Arguments
    /// * `pointer` - Pointer position in canvas coordinates, if over the canvas
    pub fn step(&mut self, pointer: Option<Vec2>) {
        self.collide_icons();

        let params = &self.params;
        let (max_x, max_y) = self.icon_bounds();
        let pointer = pointer.filter(|p| p.is_finite());
        for icon in &mut self.icons {
            if let Some(target) = pointer {
                attract(icon, target, params);
            }
            apply_friction(&mut icon.vel, params.friction, params.min_speed);
            icon.vel = icon.vel.clamp_length(params.max_speed);

            icon.pos += icon.vel;
            icon.rotation = (icon.rotation + icon.spin).rem_euclid(360.0);
            reflect(&mut icon.pos.x, &mut icon.vel.x, 0.0, max_x);
            reflect(&mut icon.pos.y, &mut icon.vel.y, 0.0, max_y);
        }

        self.collide_particles();

        let (width, height) = (self.width, self.height);
        for particle in &mut self.particles {
            particle.vel = particle.vel.clamp_length(self.params.max_speed);
            particle.pos += particle.vel;
            let (lo_x, hi_x) = particle_range(width, particle.radius);
            let (lo_y, hi_y) = particle_range(height, particle.radius);
            reflect(&mut particle.pos.x, &mut particle.vel.x, lo_x, hi_x);
            reflect(&mut particle.pos.y, &mut particle.vel.y, lo_y, hi_y);
        }

        self.frame += 1;
    }

    /// Advance several frames with a fixed pointer
    pub fn run(&mut self, frames: usize, pointer: Option<Vec2>) {
        for _ in 0..frames {
            self.step(pointer);
        }
    }

    /// Change the canvas size and pull every body back inside
    ///
    /// Non-finite or negative extents are treated as zero.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = sanitize_extent(width);
        self.height = sanitize_extent(height);
        let (max_x, max_y) = self.icon_bounds();
        for icon in &mut self.icons {
            icon.pos.x = icon.pos.x.clamp(0.0, max_x);
            icon.pos.y = icon.pos.y.clamp(0.0, max_y);
        }
        for particle in &mut self.particles {
            let (lo_x, hi_x) = particle_range(self.width, particle.radius);
            let (lo_y, hi_y) = particle_range(self.height, particle.radius);
            particle.pos.x = particle.pos.x.clamp(lo_x, hi_x);
            particle.pos.y = particle.pos.y.clamp(lo_y, hi_y);
        }
    }

    /// Largest allowed icon corner coordinates
    #[must_use]
    pub fn icon_bounds(&self) -> (f64, f64) {
        (
            (self.width - self.params.icon_size).max(0.0),
            (self.height - self.params.icon_size).max(0.0),
        )
    }

    /// Whether every icon lies within the canvas
    #[must_use]
    pub fn icons_contained(&self) -> bool {
        let (max_x, max_y) = self.icon_bounds();
        self.icons.iter().all(|icon| {
            (0.0..=max_x).contains(&icon.pos.x) && (0.0..=max_y).contains(&icon.pos.y)
        })
    }

    /// Fastest body speed this frame
    #[must_use]
    pub fn max_body_speed(&self) -> f64 {
        self.icons
            .iter()
            .map(|i| i.vel.length())
            .chain(self.particles.iter().map(|p| p.vel.length()))
            .fold(0.0, f64::max)
    }

    /// Sum of squared speeds over all bodies (unit masses, without the 1/2)
    #[must_use]
    pub fn kinetic_energy(&self) -> f64 {
        self.icons
            .iter()
            .map(|i| i.vel.length_squared())
            .chain(self.particles.iter().map(|p| p.vel.length_squared()))
            .sum()
    }

    /// Borrow the current state for serialization
    #[must_use]
    pub fn snapshot(&self) -> Frame<'_> {
        Frame {
            frame: self.frame,
            width: self.width,
            height: self.height,
            icons: &self.icons,
            particles: &self.particles,
        }
    }

    /// Icons in insertion order
    #[must_use]
    pub fn icons(&self) -> &[Icon] {
        &self.icons
    }

    /// Particles in insertion order
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Frames stepped so far
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Canvas size
    #[must_use]
    pub const fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Active parameters
    #[must_use]
    pub const fn params(&self) -> &PhysicsParams {
        &self.params
    }

    fn collide_icons(&mut self) {
        let n = self.icons.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = pair_mut(&mut self.icons, i, j);
                let Some(contact) = circle_contact(a.center(), a.radius(), b.center(), b.radius())
                else {
                    continue;
                };
                resolve_elastic(&mut a.vel, &mut b.vel, contact.normal);
                let push = contact.normal * (contact.overlap / 2.0);
                a.pos -= push;
                b.pos += push;
            }
        }
    }

    fn collide_particles(&mut self) {
        let n = self.particles.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = pair_mut(&mut self.particles, i, j);
                if let Some(contact) = circle_contact(a.pos, a.radius, b.pos, b.radius) {
                    resolve_elastic(&mut a.vel, &mut b.vel, contact.normal);
                    let push = contact.normal * (contact.overlap / 2.0);
                    a.pos -= push;
                    b.pos += push;
                }
            }
        }

        for particle in &mut self.particles {
            for icon in &self.icons {
                if let Some(contact) =
                    circle_contact(icon.center(), icon.radius(), particle.pos, particle.radius)
                {
                    bounce_off_static(&mut particle.vel, contact.normal);
                    particle.pos += contact.normal * contact.overlap;
                }
            }
        }
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

fn sanitize_extent(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Allowed centre range for a particle; collapses to the midpoint when the
/// canvas is narrower than the particle
fn particle_range(extent: f64, radius: f64) -> (f64, f64) {
    if extent >= 2.0 * radius {
        (radius, extent - radius)
    } else {
        let mid = extent / 2.0;
        (mid, mid)
    }
}

/// Linear fall-off pull toward the pointer
fn attract(icon: &mut Icon, target: Vec2, params: &PhysicsParams) {
    let to_target = target - icon.center();
    let dist = to_target.length();
    if dist <= f64::EPSILON || dist >= params.pointer_radius {
        return;
    }
    let falloff = 1.0 - dist / params.pointer_radius;
    icon.vel += (to_target / dist) * (params.pointer_strength * falloff);
}

/// Decay speed by `friction`, never below `floor`
fn apply_friction(vel: &mut Vec2, friction: f64, floor: f64) {
    let speed = vel.length();
    if speed <= floor || speed <= f64::EPSILON {
        return;
    }
    let target = (speed * friction).max(floor);
    *vel *= target / speed;
}

/// Clamp a coordinate into `[lo, hi]`, flipping velocity to point inward
fn reflect(pos: &mut f64, vel: &mut f64, lo: f64, hi: f64) {
    if *pos < lo {
        *pos = lo;
        *vel = vel.abs();
    } else if *pos > hi {
        *pos = hi;
        *vel = -vel.abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world(width: f64, height: f64) -> World {
        World::new(width, height, PhysicsParams::default()).unwrap()
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = PhysicsParams {
            friction: 1.5,
            ..PhysicsParams::default()
        };
        assert!(World::new(100.0, 100.0, params).is_err());

        let params = PhysicsParams {
            min_speed: 10.0,
            ..PhysicsParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_icon_reflects_off_right_wall() {
        let mut w = world(200.0, 200.0);
        w.add_icon(Icon::new(Vec2::new(150.0, 50.0), Vec2::new(5.0, 0.0), 48.0));
        w.step(None);
        let icon = &w.icons()[0];
        assert!((icon.pos.x - 152.0).abs() < 1e-9);
        assert!(icon.vel.x < 0.0);
    }

    #[test]
    fn test_head_on_icons_exchange_velocity() {
        let mut w = world(400.0, 200.0);
        w.add_icon(Icon::new(Vec2::new(100.0, 50.0), Vec2::new(2.0, 0.0), 48.0));
        w.add_icon(Icon::new(Vec2::new(140.0, 50.0), Vec2::new(-2.0, 0.0), 48.0));
        w.step(None);
        assert!(w.icons()[0].vel.x < 0.0);
        assert!(w.icons()[1].vel.x > 0.0);
    }

    #[test]
    fn test_pointer_pulls_icon_closer() {
        let params = PhysicsParams {
            friction: 1.0,
            min_speed: 0.0,
            ..PhysicsParams::default()
        };
        let mut w = World::new(600.0, 600.0, params).unwrap();
        w.add_icon(Icon::new(Vec2::new(100.0, 100.0), Vec2::ZERO, 48.0));
        let pointer = Vec2::new(224.0, 124.0);
        let before = (w.icons()[0].center() - pointer).length();
        w.run(5, Some(pointer));
        let after = (w.icons()[0].center() - pointer).length();
        assert!(after < before);
    }

    #[test]
    fn test_pointer_outside_radius_has_no_effect() {
        let mut w = world(2000.0, 2000.0);
        w.add_icon(Icon::new(Vec2::new(0.0, 0.0), Vec2::ZERO, 48.0));
        w.step(Some(Vec2::new(1500.0, 1500.0)));
        assert_eq!(w.icons()[0].vel, Vec2::ZERO);
    }

    #[test]
    fn test_non_finite_bodies_are_sanitized() {
        let mut w = world(400.0, 400.0);
        let mut bad = Icon::new(Vec2::new(f64::NAN, 50.0), Vec2::new(f64::INFINITY, 1.0), 48.0);
        bad.rotation = f64::NAN;
        bad.scale = f64::NAN;
        w.add_icon(bad);
        w.add_icon(Icon::new(Vec2::new(30.0, 50.0), Vec2::new(-2.0, 0.0), 48.0));
        w.add_particle(Particle::new(Vec2::new(f64::NAN, f64::NAN), Vec2::new(f64::NAN, 0.0), f64::NAN));

        w.run(50, Some(Vec2::new(f64::NAN, 10.0)));
        for icon in w.icons() {
            assert!(icon.pos.is_finite() && icon.vel.is_finite());
            assert!(icon.rotation.is_finite() && icon.scale.is_finite());
        }
        let particle = &w.particles()[0];
        assert!(particle.pos.is_finite() && particle.vel.is_finite());
        assert!((particle.radius - w.params().particle_min_radius).abs() < 1e-12);
        assert!(w.icons_contained());
    }

    #[test]
    fn test_friction_stops_at_floor() {
        let mut w = world(10_000.0, 10_000.0);
        w.add_icon(Icon::new(Vec2::new(5000.0, 5000.0), Vec2::new(5.0, 0.0), 48.0));
        w.run(2000, None);
        let speed = w.icons()[0].vel.length();
        assert!((speed - w.params().min_speed).abs() < 1e-9);
    }

    #[test]
    fn test_resize_smaller_than_icon_does_not_panic() {
        let mut w = world(800.0, 600.0);
        w.populate(10, 50, &mut StdRng::seed_from_u64(7));
        w.resize(20.0, 10.0);
        assert!(w.icons_contained());
        w.run(10, Some(Vec2::new(5.0, 5.0)));
        assert!(w.icons_contained());
        w.resize(f64::NAN, -5.0);
        w.step(None);
        assert!(w.icons_contained());
        assert_eq!(w.size(), (0.0, 0.0));
    }

    #[test]
    fn test_populated_world_stays_bounded() {
        let mut w = world(640.0, 480.0);
        w.populate(12, 150, &mut StdRng::seed_from_u64(42));
        assert_eq!(w.icons().len(), 12);
        assert_eq!(w.particles().len(), 150);
        for frame in 0..300 {
            let pointer = (frame % 3 == 0).then(|| Vec2::new(320.0, 240.0));
            w.step(pointer);
            assert!(w.icons_contained());
            assert!(w.max_body_speed() <= w.params().max_speed + 1e-9);
        }
        assert_eq!(w.frame(), 300);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut w = world(100.0, 100.0);
        w.populate(1, 2, &mut StdRng::seed_from_u64(1));
        let json = serde_json::to_string(&w.snapshot()).unwrap();
        assert!(json.contains("\"icons\""));
        assert!(json.contains("\"particles\""));
    }
}
