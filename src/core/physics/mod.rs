//! Headless model of the animated background
//!
//! A handful of icons and ~150 particles bounce around a canvas. Each frame
//! resolves pairwise elastic collisions, pulls icons toward the pointer,
//! applies friction, and reflects bodies off the canvas edges. Positions are
//! plain data so the step can be driven and checked without a renderer.

pub mod body;
pub mod collision;
pub mod vector;
pub mod world;

pub use body::{Icon, Particle};
pub use vector::Vec2;
pub use world::{Frame, PhysicsParams, World};
