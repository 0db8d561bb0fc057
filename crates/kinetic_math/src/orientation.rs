//! The `Orientation` capability trait shared by every rotation type

use std::fmt::Debug;

use crate::Vector;

/// Rotation vectors shorter than this leave an orientation unchanged
/// instead of being normalized into an axis or plane.
pub const ROTATION_TOLERANCE: f32 = 1e-6;

/// An absolute orientation that can be advanced by an angular velocity
pub trait Orientation: Copy + Debug + PartialEq {
    /// The vector type this orientation rotates
    type Vector: Vector;
    /// Angular velocity representation (scalar, axis vector or bivector)
    type Angular: Vector;

    /// No rotation
    const IDENTITY: Self;

    /// Compose two rotations: the result applies `other` first, then `self`
    fn compose(&self, other: &Self) -> Self;

    /// Renormalize to a unit rotation
    fn normalize(&self) -> Self;

    /// Rotate a vector by this orientation
    fn rotate(&self, v: Self::Vector) -> Self::Vector;

    /// Advance this orientation by `angular * dt`
    fn integrate(&self, angular: Self::Angular, dt: f32) -> Self;
}
