//! 2D rotation matrix

use serde::{Deserialize, Serialize};

use crate::{Orientation, Vec2};

/// A 2x2 rotation matrix, stored row-major
///
/// A single angle never drifts off the rotation manifold far enough to need
/// renormalization, so [`Orientation::integrate`] just composes deltas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rot2 {
    pub m: [[f32; 2]; 2],
}

impl Default for Rot2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Rot2 {
    /// Identity rotation
    pub const IDENTITY: Self = Self {
        m: [[1.0, 0.0], [0.0, 1.0]],
    };

    /// Counter-clockwise rotation by `angle` radians
    pub fn from_angle(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            m: [[cos, -sin], [sin, cos]],
        }
    }

    /// The rotation angle in radians, in `(-PI, PI]`
    pub fn angle(&self) -> f32 {
        self.m[1][0].atan2(self.m[0][0])
    }

    /// Matrix product `self * other`
    pub fn mul(&self, other: &Self) -> Self {
        let a = &self.m;
        let b = &other.m;
        Self {
            m: [
                [
                    a[0][0] * b[0][0] + a[0][1] * b[1][0],
                    a[0][0] * b[0][1] + a[0][1] * b[1][1],
                ],
                [
                    a[1][0] * b[0][0] + a[1][1] * b[1][0],
                    a[1][0] * b[0][1] + a[1][1] * b[1][1],
                ],
            ],
        }
    }
}

impl Orientation for Rot2 {
    type Vector = Vec2;
    type Angular = f32;

    const IDENTITY: Self = Rot2::IDENTITY;

    fn compose(&self, other: &Self) -> Self {
        self.mul(other)
    }

    fn normalize(&self) -> Self {
        Self::from_angle(self.angle())
    }

    fn rotate(&self, v: Vec2) -> Vec2 {
        Vec2::new(
            self.m[0][0] * v.x + self.m[0][1] * v.y,
            self.m[1][0] * v.x + self.m[1][1] * v.y,
        )
    }

    fn integrate(&self, angular: f32, dt: f32) -> Self {
        Self::from_angle(angular * dt).compose(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPSILON: f32 = 0.0001;

    fn vec_approx_eq(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
    }

    #[test]
    fn test_quarter_turn() {
        let r = Rot2::from_angle(PI / 2.0);
        assert!(vec_approx_eq(r.rotate(Vec2::X), Vec2::Y));
        assert!(vec_approx_eq(r.rotate(Vec2::Y), -Vec2::X));
    }

    #[test]
    fn test_integrate_accumulates_angle() {
        let mut r = Rot2::IDENTITY;
        for _ in 0..10 {
            r = r.integrate(1.0, 0.1);
        }
        assert!((r.angle() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_integrate_zero_rate_is_identity() {
        let r = Rot2::from_angle(0.3).integrate(0.0, 1.0);
        assert!((r.angle() - 0.3).abs() < EPSILON);
    }

    #[test]
    fn test_normalize_restores_unit_determinant() {
        let mut r = Rot2::from_angle(0.7);
        r.m[0][0] *= 1.01;
        let n = r.normalize();
        let det = n.m[0][0] * n.m[1][1] - n.m[0][1] * n.m[1][0];
        assert!((det - 1.0).abs() < EPSILON);
    }
}
