//! Simulated bodies

use super::Vec2;
use serde::{Deserialize, Serialize};

/// A floating icon
///
/// `pos` is the top-left corner of the icon's `size` x `size` box. Collisions
/// use the inscribed circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Icon {
    /// Top-left corner
    pub pos: Vec2,
    /// Velocity in pixels per frame
    pub vel: Vec2,
    /// Current rotation in degrees
    pub rotation: f64,
    /// Rotation per frame in degrees
    pub spin: f64,
    /// Draw scale; cosmetic only
    pub scale: f64,
    /// Box edge length in pixels
    pub size: f64,
}

impl Icon {
    /// Create an icon with no spin and unit scale
    #[must_use]
    pub const fn new(pos: Vec2, vel: Vec2, size: f64) -> Self {
        Self {
            pos,
            vel,
            rotation: 0.0,
            spin: 0.0,
            scale: 1.0,
            size,
        }
    }

    /// Centre of the collision circle
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.size / 2.0, self.size / 2.0)
    }

    /// Collision radius
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.size / 2.0
    }
}

/// A small background dot; `pos` is its centre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Centre
    pub pos: Vec2,
    /// Velocity in pixels per frame
    pub vel: Vec2,
    /// Radius in pixels
    pub radius: f64,
}

impl Particle {
    /// Create a particle
    #[must_use]
    pub const fn new(pos: Vec2, vel: Vec2, radius: f64) -> Self {
        Self { pos, vel, radius }
    }
}
