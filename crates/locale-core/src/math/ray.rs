//! Rays
//!
//! Line-of-sight primitive used by the visibility query.

use serde::{Deserialize, Serialize};

use super::vector::Vector3;

/// A ray with an origin and a direction.
///
/// The direction is stored as given. Sphere tests are expressed in the
/// sphere's own frame: translate the origin by the sphere centre first
/// (see [`Ray::relative_to`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vector3,
    pub direction: Vector3,
}

impl Ray {
    pub fn new(origin: Vector3, direction: Vector3) -> Self {
        Self { origin, direction }
    }

    /// Point along the ray at parameter `t`.
    pub fn point_at(&self, t: f64) -> Vector3 {
        self.origin + self.direction * t
    }

    /// The same ray with its origin expressed relative to `center`.
    pub fn relative_to(&self, center: Vector3) -> Ray {
        Ray::new(self.origin - center, self.direction)
    }

    fn quadratic(&self, radius: f64) -> (f64, f64, f64) {
        let a = self.direction.dot(self.direction);
        let b = 2.0 * self.direction.dot(self.origin);
        let c = self.origin.dot(self.origin) - radius * radius;
        (a, b, c)
    }

    /// True if the line through this ray meets a sphere of `radius` centred
    /// at the frame origin (`b^2 - 4ac >= 0`).
    ///
    /// A zero-length direction gives a discriminant of 0 and so reports a hit;
    /// callers guard against it.
    pub fn intersects_sphere(&self, radius: f64) -> bool {
        let (a, b, c) = self.quadratic(radius);
        b * b - 4.0 * a * c >= 0.0
    }

    /// Both ray parameters where the line crosses the sphere, ordered.
    ///
    /// `None` when the line misses or the direction has zero length. NaN
    /// inputs also produce `None`.
    pub fn sphere_hits(&self, radius: f64) -> Option<(f64, f64)> {
        let (a, b, c) = self.quadratic(radius);
        let discriminant = b * b - 4.0 * a * c;
        if !(discriminant >= 0.0) || !(a > 0.0) {
            return None;
        }
        let root = discriminant.sqrt();
        let t0 = (-b - root) / (2.0 * a);
        let t1 = (-b + root) / (2.0 * a);
        Some((t0, t1))
    }

    /// True if the sphere overlaps the open segment `(0, max_t)` of the ray.
    pub fn sphere_blocks_segment(&self, radius: f64, max_t: f64) -> bool {
        match self.sphere_hits(radius) {
            Some((t0, t1)) => t1 > 0.0 && t0 < max_t,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects_sphere() {
        let ray = Ray::new(Vector3::new(-5.0, 0.5, 0.0), Vector3::X);
        assert!(ray.intersects_sphere(1.0));
        assert!(!ray.intersects_sphere(0.4));

        // tangent counts
        let tangent = Ray::new(Vector3::new(-5.0, 1.0, 0.0), Vector3::X);
        assert!(tangent.intersects_sphere(1.0));
    }

    #[test]
    fn test_line_test_ignores_direction_sign() {
        // sphere is behind the origin; the discriminant test still reports it
        let ray = Ray::new(Vector3::new(5.0, 0.0, 0.0), Vector3::X);
        assert!(ray.intersects_sphere(1.0));
        assert!(!ray.sphere_blocks_segment(1.0, 10.0));
    }

    #[test]
    fn test_zero_direction() {
        let ray = Ray::new(Vector3::new(3.0, 0.0, 0.0), Vector3::ZERO);
        assert!(ray.intersects_sphere(1.0));
        assert_eq!(ray.sphere_hits(1.0), None);
    }

    #[test]
    fn test_sphere_hits_and_segment() {
        let ray = Ray::new(Vector3::new(-5.0, 0.0, 0.0), Vector3::X);
        let (t0, t1) = ray.sphere_hits(1.0).unwrap();
        assert!((t0 - 4.0).abs() < 1e-9);
        assert!((t1 - 6.0).abs() < 1e-9);
        assert!(ray.sphere_blocks_segment(1.0, 10.0));
        assert!(!ray.sphere_blocks_segment(1.0, 3.5));
        assert_eq!(ray.point_at(2.0), Vector3::new(-3.0, 0.0, 0.0));
    }

    #[test]
    fn test_relative_frame() {
        let world = Ray::new(Vector3::ZERO, Vector3::X);
        let local = world.relative_to(Vector3::new(5.0, 0.2, 0.0));
        assert!(local.intersects_sphere(0.5));
        assert!(!local.intersects_sphere(0.1));
    }
}
