//! Vector and rotation types for the kinetic physics engine
//!
//! The physics core is generic over dimensionality; this crate supplies the
//! capability traits it is written against and one concrete family of types
//! per dimension.
//!
//! ## Capability traits
//!
//! - [`Vector`] - fixed-size vector arithmetic, clamping and reflection
//! - [`Orientation`] - absolute rotation advanced by an angular velocity
//!
//! ## Concrete types
//!
//! | Dimension | Vector   | Orientation | Angular velocity |
//! |-----------|----------|-------------|------------------|
//! | 2D        | [`Vec2`] | [`Rot2`]    | `f32`            |
//! | 3D        | [`Vec3`] | [`Quat`]    | [`Vec3`]         |
//! | 4D        | [`Vec4`] | [`Rotor4`]  | [`Bivec4`]       |

mod vector;
mod orientation;
mod vec2;
mod vec3;
mod vec4;
mod rot2;
mod quat;
mod rotor4;

pub use vector::Vector;
pub use orientation::{Orientation, ROTATION_TOLERANCE};
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;
pub use rot2::Rot2;
pub use quat::Quat;
pub use rotor4::{Bivec4, RotationPlane, Rotor4};
