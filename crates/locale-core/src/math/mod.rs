//! Vector and ray primitives.

pub mod ray;
pub mod vector;

pub use ray::Ray;
pub use vector::{Vector2, Vector3, LENGTH_EPSILON};
