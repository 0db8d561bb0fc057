//! Dimensionality capability sets
//!
//! A [`Dimension`] names the vector and rotation types a simulation runs
//! with. The engine, bodies and collaborators are all generic over it, and
//! [`D2`], [`D3`] and [`D4`] are the concrete instantiations.

use kinetic_math::{Orientation, Quat, Rot2, Rotor4, Vec2, Vec3, Vec4, Vector};

/// The `{Vector, Rotation}` pair a simulation is parameterized over
pub trait Dimension: 'static {
    /// Position, velocity and force type
    type Vector: Vector;
    /// Absolute orientation type
    type Rotation: Orientation<Vector = Self::Vector>;
}

/// Angular velocity type of a dimension
pub type Angular<D> = <<D as Dimension>::Rotation as Orientation>::Angular;

/// Planar simulation: `Vec2` positions, `Rot2` matrices, scalar spin
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct D2;

/// Spatial simulation: `Vec3` positions, `Quat` orientations
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct D3;

/// 4D simulation: `Vec4` positions, `Rotor4` orientations
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct D4;

impl Dimension for D2 {
    type Vector = Vec2;
    type Rotation = Rot2;
}

impl Dimension for D3 {
    type Vector = Vec3;
    type Rotation = Quat;
}

impl Dimension for D4 {
    type Vector = Vec4;
    type Rotation = Rotor4;
}
