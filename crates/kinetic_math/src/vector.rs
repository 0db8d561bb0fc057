//! The `Vector` capability trait shared by every vector type
//!
//! The physics core never names a concrete vector; it is written against
//! this trait so the same integrator runs in 2D, 3D and 4D. Angular
//! velocities are vectors too (a scalar in 2D, a `Vec3` in 3D, a `Bivec4`
//! in 4D), which is why `f32` implements the trait as a 1-component vector.

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// Fixed-size vector of `f32` components
pub trait Vector:
    Copy
    + Debug
    + Default
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Mul<f32, Output = Self>
    + Div<f32, Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign<f32>
{
    /// The zero vector
    const ZERO: Self;
    /// Number of components
    const DIM: usize;

    /// Build a vector by evaluating `f` for every axis in order
    fn from_fn<F: FnMut(usize) -> f32>(f: F) -> Self;

    /// Read one component. Panics if `axis >= DIM`.
    fn get(&self, axis: usize) -> f32;

    /// Write one component. Panics if `axis >= DIM`.
    fn set(&mut self, axis: usize, value: f32);

    /// Dot product
    fn dot(self, other: Self) -> f32;

    /// Vector with every component set to `value`
    #[inline]
    fn splat(value: f32) -> Self {
        Self::from_fn(|_| value)
    }

    /// Unit vector along `axis`
    #[inline]
    fn unit(axis: usize) -> Self {
        Self::from_fn(|i| if i == axis { 1.0 } else { 0.0 })
    }

    /// Length squared (faster than length)
    #[inline]
    fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length (magnitude)
    #[inline]
    fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Normalize to unit length; the zero vector stays zero
    #[inline]
    fn normalized(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            self * (1.0 / len)
        } else {
            Self::ZERO
        }
    }

    /// Component-wise multiplication (Hadamard product)
    #[inline]
    fn component_mul(self, other: Self) -> Self {
        Self::from_fn(|i| self.get(i) * other.get(i))
    }

    /// Clamp each component between corresponding min and max values
    #[inline]
    fn clamp_components(self, min: Self, max: Self) -> Self {
        Self::from_fn(|i| self.get(i).max(min.get(i)).min(max.get(i)))
    }

    /// Component-wise minimum
    #[inline]
    fn min_components(self, other: Self) -> Self {
        Self::from_fn(|i| self.get(i).min(other.get(i)))
    }

    /// Component-wise maximum
    #[inline]
    fn max_components(self, other: Self) -> Self {
        Self::from_fn(|i| self.get(i).max(other.get(i)))
    }

    /// Component-wise absolute value
    #[inline]
    fn abs(self) -> Self {
        Self::from_fn(|i| self.get(i).abs())
    }

    /// Clamp `self` into `[min, max]` and report which axes were clamped
    ///
    /// The returned multiplier is `-1.0` on every clamped axis and `1.0`
    /// elsewhere, so multiplying a velocity by it reflects the components
    /// that ran into a bound.
    fn clamp_direction(&mut self, min: Self, max: Self) -> Self {
        let mut direction = Self::splat(1.0);
        for axis in 0..Self::DIM {
            let value = self.get(axis);
            if value < min.get(axis) {
                self.set(axis, min.get(axis));
                direction.set(axis, -1.0);
            } else if value > max.get(axis) {
                self.set(axis, max.get(axis));
                direction.set(axis, -1.0);
            }
        }
        direction
    }
}

impl Vector for f32 {
    const ZERO: Self = 0.0;
    const DIM: usize = 1;

    #[inline]
    fn from_fn<F: FnMut(usize) -> f32>(mut f: F) -> Self {
        f(0)
    }

    #[inline]
    fn get(&self, axis: usize) -> f32 {
        assert!(axis == 0, "axis {axis} out of range for a scalar");
        *self
    }

    #[inline]
    fn set(&mut self, axis: usize, value: f32) {
        assert!(axis == 0, "axis {axis} out of range for a scalar");
        *self = value;
    }

    #[inline]
    fn dot(self, other: Self) -> f32 {
        self * other
    }
}

/// Implements `Vector`, the arithmetic operators and the inherent helpers
/// for a plain struct of named `f32` fields.
macro_rules! impl_vector {
    ($name:ident, $dim:literal, { $($field:ident => $axis:literal),+ $(,)? }) => {
        impl $name {
            /// Dot product
            #[inline]
            pub fn dot(self, other: Self) -> f32 {
                0.0 $(+ self.$field * other.$field)+
            }

            /// Length squared (faster than length)
            #[inline]
            pub fn length_squared(self) -> f32 {
                self.dot(self)
            }

            /// Length (magnitude)
            #[inline]
            pub fn length(self) -> f32 {
                self.length_squared().sqrt()
            }

            /// Normalize to unit length; the zero vector stays zero
            #[inline]
            pub fn normalized(self) -> Self {
                let len = self.length();
                if len > 0.0 {
                    self * (1.0 / len)
                } else {
                    Self { $($field: 0.0),+ }
                }
            }
        }

        impl $crate::Vector for $name {
            const ZERO: Self = Self { $($field: 0.0),+ };
            const DIM: usize = $dim;

            #[inline]
            fn from_fn<F: FnMut(usize) -> f32>(mut f: F) -> Self {
                Self { $($field: f($axis)),+ }
            }

            #[inline]
            fn get(&self, axis: usize) -> f32 {
                match axis {
                    $($axis => self.$field,)+
                    _ => panic!("axis {} out of range for {}", axis, stringify!($name)),
                }
            }

            #[inline]
            fn set(&mut self, axis: usize, value: f32) {
                match axis {
                    $($axis => self.$field = value,)+
                    _ => panic!("axis {} out of range for {}", axis, stringify!($name)),
                }
            }

            #[inline]
            fn dot(self, other: Self) -> f32 {
                0.0 $(+ self.$field * other.$field)+
            }
        }

        impl std::ops::Add for $name {
            type Output = Self;
            #[inline]
            fn add(self, other: Self) -> Self {
                Self { $($field: self.$field + other.$field),+ }
            }
        }

        impl std::ops::AddAssign for $name {
            #[inline]
            fn add_assign(&mut self, other: Self) {
                $(self.$field += other.$field;)+
            }
        }

        impl std::ops::Sub for $name {
            type Output = Self;
            #[inline]
            fn sub(self, other: Self) -> Self {
                Self { $($field: self.$field - other.$field),+ }
            }
        }

        impl std::ops::SubAssign for $name {
            #[inline]
            fn sub_assign(&mut self, other: Self) {
                $(self.$field -= other.$field;)+
            }
        }

        impl std::ops::Mul<f32> for $name {
            type Output = Self;
            #[inline]
            fn mul(self, scalar: f32) -> Self {
                Self { $($field: self.$field * scalar),+ }
            }
        }

        impl std::ops::MulAssign<f32> for $name {
            #[inline]
            fn mul_assign(&mut self, scalar: f32) {
                $(self.$field *= scalar;)+
            }
        }

        impl std::ops::Div<f32> for $name {
            type Output = Self;
            #[inline]
            fn div(self, scalar: f32) -> Self {
                Self { $($field: self.$field / scalar),+ }
            }
        }

        impl std::ops::Neg for $name {
            type Output = Self;
            #[inline]
            fn neg(self) -> Self {
                Self { $($field: -self.$field),+ }
            }
        }
    };
}

pub(crate) use impl_vector;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Vec2, Vec3, Vec4};

    #[test]
    fn test_scalar_is_a_vector() {
        let a: f32 = 3.0;
        assert_eq!(<f32 as Vector>::DIM, 1);
        assert_eq!(Vector::dot(a, 2.0), 6.0);
        assert_eq!(Vector::length(-4.0_f32), 4.0);
        assert_eq!(<f32 as Vector>::from_fn(|_| 7.0), 7.0);
    }

    #[test]
    fn test_from_fn_visits_axes_in_order() {
        let v = Vec4::from_fn(|i| i as f32);
        assert_eq!(v, Vec4::new(0.0, 1.0, 2.0, 3.0));
    }

    #[test]
    fn test_get_set() {
        let mut v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.get(2), 3.0);
        v.set(0, -1.0);
        assert_eq!(v, Vec3::new(-1.0, 2.0, 3.0));
    }

    #[test]
    #[should_panic]
    fn test_get_out_of_range_panics() {
        let v = Vec2::new(1.0, 2.0);
        let _ = v.get(2);
    }

    #[test]
    fn test_unit() {
        assert_eq!(Vec3::unit(1), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_clamp_direction_inside_bounds() {
        let mut p = Vec2::new(0.5, 0.5);
        let dir = p.clamp_direction(Vec2::ZERO, Vec2::new(1.0, 1.0));
        assert_eq!(p, Vec2::new(0.5, 0.5));
        assert_eq!(dir, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_clamp_direction_reflects_clamped_axes() {
        let mut p = Vec3::new(-2.0, 0.5, 7.0);
        let dir = p.clamp_direction(Vec3::splat(-1.0), Vec3::splat(5.0));
        assert_eq!(p, Vec3::new(-1.0, 0.5, 5.0));
        assert_eq!(dir, Vec3::new(-1.0, 1.0, -1.0));
    }

    #[test]
    fn test_generic_helpers() {
        fn sum_abs<V: Vector>(v: V) -> f32 {
            let a = v.abs();
            (0..V::DIM).map(|i| a.get(i)).sum()
        }
        assert_eq!(sum_abs(Vec4::new(-1.0, 2.0, -3.0, 4.0)), 10.0);
        assert_eq!(sum_abs(-2.5_f32), 2.5);
    }

    #[test]
    fn test_normalized_zero_stays_zero() {
        assert_eq!(Vector::normalized(Vec2::ZERO), Vec2::ZERO);
        assert_eq!(Vector::normalized(0.0_f32), 0.0);
    }
}
