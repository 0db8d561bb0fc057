//! Rotations in 4D
//!
//! 4D rotations act in planes, not about axes, and there are six coordinate
//! planes (XY, XZ, XW, YZ, YW, ZW). A [`Bivec4`] holds one value per plane
//! and serves as the angular velocity of a 4D body; a [`Rotor4`] is the
//! absolute orientation it integrates into.

use serde::{Deserialize, Serialize};

use crate::vector::impl_vector;
use crate::{Orientation, Vec4, ROTATION_TOLERANCE};

/// The 6 rotation planes in 4D space
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotationPlane {
    XY,
    XZ,
    XW,
    YZ,
    YW,
    ZW,
}

/// A 4D bivector: one rate (or angle) per rotation plane
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bivec4 {
    pub xy: f32,
    pub xz: f32,
    pub xw: f32,
    pub yz: f32,
    pub yw: f32,
    pub zw: f32,
}

impl Bivec4 {
    pub const ZERO: Self = Self {
        xy: 0.0,
        xz: 0.0,
        xw: 0.0,
        yz: 0.0,
        yw: 0.0,
        zw: 0.0,
    };

    /// Create a bivector from its six plane components
    #[inline]
    pub const fn new(xy: f32, xz: f32, xw: f32, yz: f32, yw: f32, zw: f32) -> Self {
        Self { xy, xz, xw, yz, yw, zw }
    }

    /// A bivector with `value` in a single plane
    pub fn from_plane(plane: RotationPlane, value: f32) -> Self {
        let mut b = Self::ZERO;
        match plane {
            RotationPlane::XY => b.xy = value,
            RotationPlane::XZ => b.xz = value,
            RotationPlane::XW => b.xw = value,
            RotationPlane::YZ => b.yz = value,
            RotationPlane::YW => b.yw = value,
            RotationPlane::ZW => b.zw = value,
        }
        b
    }
}

impl_vector!(Bivec4, 6, { xy => 0, xz => 1, xw => 2, yz => 3, yw => 4, zw => 5 });

/// Commutator part of the product of two bivectors
fn commutator(a: Bivec4, b: Bivec4) -> Bivec4 {
    Bivec4 {
        xy: a.yz * b.xz - a.xz * b.yz + a.yw * b.xw - a.xw * b.yw,
        xz: a.xy * b.yz - a.yz * b.xy + a.zw * b.xw - a.xw * b.zw,
        xw: a.xy * b.yw - a.yw * b.xy + a.xz * b.zw - a.zw * b.xz,
        yz: a.xz * b.xy - a.xy * b.xz + a.zw * b.yw - a.yw * b.zw,
        yw: a.xw * b.xy - a.xy * b.xw + a.yz * b.zw - a.zw * b.yz,
        zw: a.xw * b.xz - a.xz * b.xw + a.yw * b.yz - a.yz * b.yw,
    }
}

/// Pseudoscalar part of the product of two bivectors
fn wedge(a: Bivec4, b: Bivec4) -> f32 {
    a.xy * b.zw + a.zw * b.xy - a.xz * b.yw - a.yw * b.xz + a.xw * b.yz + a.yz * b.xw
}

/// Bivector times the unit pseudoscalar: each plane maps to its orthogonal plane
fn dual(b: Bivec4) -> Bivec4 {
    Bivec4 {
        xy: -b.zw,
        xz: b.yw,
        xw: -b.yz,
        yz: -b.xw,
        yw: b.xz,
        zw: -b.xy,
    }
}

/// 4D rotor: the even subalgebra `s + B + p*e1234`
///
/// A single-plane rotation by θ is `cos(θ/2) - sin(θ/2) * B̂`. Composing
/// rotations in two orthogonal planes produces the pseudoscalar term.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rotor4 {
    /// Scalar part
    pub s: f32,
    /// Bivector part, one component per plane
    pub b: Bivec4,
    /// Pseudoscalar part (e1234)
    pub p: f32,
}

impl Default for Rotor4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Rotor4 {
    /// Identity rotor (no rotation)
    pub const IDENTITY: Self = Self {
        s: 1.0,
        b: Bivec4::ZERO,
        p: 0.0,
    };

    /// Rotor for `angle` radians in one of the six coordinate planes
    pub fn from_plane_angle(plane: RotationPlane, angle: f32) -> Self {
        Self::from_bivector_angle(Bivec4::from_plane(plane, 1.0), angle)
    }

    /// Rotor for an `angle` in the plane of the unit bivector `plane`
    ///
    /// Exact for simple bivectors (a single plane or any rotation of one).
    /// For a non-simple bivector this is the first-order rotor, which the
    /// integrator renormalizes after composing.
    pub fn from_bivector_angle(plane: Bivec4, angle: f32) -> Self {
        let (sin_h, cos_h) = (angle * 0.5).sin_cos();
        Self {
            s: cos_h,
            b: plane * -sin_h,
            p: 0.0,
        }
    }

    #[inline]
    pub fn magnitude_squared(&self) -> f32 {
        self.s * self.s + self.b.length_squared() + self.p * self.p
    }

    #[inline]
    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    /// Reverse (conjugate); the inverse rotation for unit rotors
    pub fn reverse(&self) -> Self {
        Self {
            s: self.s,
            b: -self.b,
            p: self.p,
        }
    }

    /// The equivalent 4x4 matrix; row `i` yields component `i` of a rotated vector
    pub fn matrix(&self) -> [Vec4; 4] {
        let Self { s, b, p } = *self;
        let (s2, p2) = (s * s, p * p);
        let (xy2, xz2, xw2) = (b.xy * b.xy, b.xz * b.xz, b.xw * b.xw);
        let (yz2, yw2, zw2) = (b.yz * b.yz, b.yw * b.yw, b.zw * b.zw);

        [
            Vec4::new(
                s2 - xy2 - xz2 - xw2 + yz2 + yw2 + zw2 - p2,
                2.0 * (s * b.xy + b.xz * b.yz + b.xw * b.yw + b.zw * p),
                2.0 * (s * b.xz - b.xy * b.yz + b.xw * b.zw - b.yw * p),
                2.0 * (s * b.xw - b.xy * b.yw - b.xz * b.zw + b.yz * p),
            ),
            Vec4::new(
                2.0 * (-s * b.xy + b.xz * b.yz + b.xw * b.yw - b.zw * p),
                s2 - xy2 + xz2 + xw2 - yz2 - yw2 + zw2 - p2,
                2.0 * (s * b.yz + b.xy * b.xz - b.yw * b.zw + b.xw * p),
                2.0 * (s * b.yw + b.xy * b.xw + b.yz * b.zw - b.xz * p),
            ),
            Vec4::new(
                2.0 * (-s * b.xz - b.xy * b.yz + b.xw * b.zw + b.yw * p),
                2.0 * (-s * b.yz + b.xy * b.xz - b.yw * b.zw - b.xw * p),
                s2 + xy2 - xz2 + xw2 - yz2 + yw2 - zw2 - p2,
                2.0 * (s * b.zw + b.xz * b.xw + b.yz * b.yw + b.xy * p),
            ),
            Vec4::new(
                2.0 * (-s * b.xw - b.xy * b.yw - b.xz * b.zw - b.yz * p),
                2.0 * (-s * b.yw + b.xy * b.xw + b.yz * b.zw + b.xz * p),
                2.0 * (-s * b.zw + b.xz * b.xw + b.yz * b.yw - b.xy * p),
                s2 + xy2 + xz2 - xw2 + yz2 - yw2 - zw2 - p2,
            ),
        ]
    }
}

impl Orientation for Rotor4 {
    type Vector = Vec4;
    type Angular = Bivec4;

    const IDENTITY: Self = Rotor4::IDENTITY;

    /// Geometric product `self * other`
    fn compose(&self, other: &Self) -> Self {
        let (a, b) = (self, other);
        Self {
            s: a.s * b.s - a.b.dot(b.b) + a.p * b.p,
            b: b.b * a.s + a.b * b.s + commutator(a.b, b.b) + dual(b.b) * a.p + dual(a.b) * b.p,
            p: a.s * b.p + a.p * b.s + wedge(a.b, b.b),
        }
    }

    fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            let inv = 1.0 / mag;
            Self {
                s: self.s * inv,
                b: self.b * inv,
                p: self.p * inv,
            }
        } else {
            Self::IDENTITY
        }
    }

    /// Sandwich product `R v R†`
    fn rotate(&self, v: Vec4) -> Vec4 {
        let [x, y, z, w] = self.matrix();
        Vec4::new(x.dot(v), y.dot(v), z.dot(v), w.dot(v))
    }

    fn integrate(&self, angular: Bivec4, dt: f32) -> Self {
        let rotation = angular * dt;
        let angle = rotation.length();
        if angle <= ROTATION_TOLERANCE {
            return *self;
        }
        let delta = Self::from_bivector_angle(rotation * (1.0 / angle), angle);
        delta.compose(self).normalize()
    }
}
