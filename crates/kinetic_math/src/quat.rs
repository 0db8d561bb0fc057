//! Unit quaternion for 3D orientation

use serde::{Deserialize, Serialize};

use crate::{Orientation, Vec3, ROTATION_TOLERANCE};

/// Quaternion `w + xi + yj + zk`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    /// Identity rotation
    pub const IDENTITY: Self = Self {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a quaternion from raw components
    #[inline]
    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Rotation of `angle` radians around a unit `axis`
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let (sin_h, cos_h) = (angle * 0.5).sin_cos();
        Self::new(cos_h, axis.x * sin_h, axis.y * sin_h, axis.z * sin_h)
    }

    /// Squared magnitude
    #[inline]
    pub fn magnitude_squared(&self) -> f32 {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Magnitude
    #[inline]
    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    /// Conjugate; the inverse rotation for unit quaternions
    pub fn conjugate(&self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Hamilton product `self * other`
    pub fn mul(&self, o: &Self) -> Self {
        Self::new(
            self.w * o.w - self.x * o.x - self.y * o.y - self.z * o.z,
            self.w * o.x + self.x * o.w + self.y * o.z - self.z * o.y,
            self.w * o.y - self.x * o.z + self.y * o.w + self.z * o.x,
            self.w * o.z + self.x * o.y - self.y * o.x + self.z * o.w,
        )
    }
}

impl Orientation for Quat {
    type Vector = Vec3;
    type Angular = Vec3;

    const IDENTITY: Self = Quat::IDENTITY;

    fn compose(&self, other: &Self) -> Self {
        self.mul(other)
    }

    fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            let inv = 1.0 / mag;
            Self::new(self.w * inv, self.x * inv, self.y * inv, self.z * inv)
        } else {
            Self::IDENTITY
        }
    }

    fn rotate(&self, v: Vec3) -> Vec3 {
        // v' = v + 2w(u x v) + 2u x (u x v)
        let u = Vec3::new(self.x, self.y, self.z);
        let t = u.cross(v) * 2.0;
        v + t * self.w + u.cross(t)
    }

    fn integrate(&self, angular: Vec3, dt: f32) -> Self {
        let rotation = angular * dt;
        let angle = rotation.length();
        if angle <= ROTATION_TOLERANCE {
            return *self;
        }
        let delta = Self::from_axis_angle(rotation * (1.0 / angle), angle);
        delta.compose(self).normalize()
    }
}
