//! Collision shapes
//!
//! [`Shape`] is the contract the engine needs from a bounding volume. The
//! reference [`Sphere`], [`Aabb`] and [`Collider`] primitives implement it
//! for every [`Dimension`].

use kinetic_math::{Orientation, Vector};

use crate::collision::{aabb_vs_aabb, sphere_vs_aabb, sphere_vs_sphere, Contact};
use crate::dimension::Dimension;

/// A bounding volume the engine keeps in step with its body
pub trait Shape<D: Dimension>: Clone {
    /// Centre of the shape
    fn position(&self) -> D::Vector;

    /// Move the shape so its centre is at `position`
    fn set_position(&mut self, position: D::Vector);

    /// Orient the shape; `rotation` is absolute, not a delta
    fn rotate(&mut self, rotation: &D::Rotation);

    /// Axis-aligned `(min, max)` box around the shape in its current pose
    fn bounds(&self) -> (D::Vector, D::Vector);

    /// Narrow-phase overlap test
    fn intersects(&self, other: &Self) -> bool;

    /// Contact geometry with `other`
    ///
    /// The normal points toward `self` and the offset separates `self`
    /// from `other`. Callers only ask for shapes that intersect.
    fn resolve(&self, other: &Self, tolerance: f32) -> Contact<D::Vector>;
}

/// A sphere (disc in 2D, glome in 4D) defined by center and radius
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere<V> {
    pub center: V,
    pub radius: f32,
}

impl<V: Vector> Sphere<V> {
    /// Create a new sphere at the given center with the given radius
    pub fn new(center: V, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if a point is inside or on the sphere
    pub fn contains(&self, point: V) -> bool {
        (point - self.center).length_squared() <= self.radius * self.radius
    }
}

/// An axis-aligned box that stays axis-aligned when its body rotates
///
/// `local_half_extents` describes the box in body space. Rotating it grows
/// `half_extents` to the tightest axis-aligned box around the rotated one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb<V> {
    pub center: V,
    pub local_half_extents: V,
    pub half_extents: V,
}

impl<V: Vector> Aabb<V> {
    /// Create an AABB centered at a position with given half-extents
    pub fn new(center: V, half_extents: V) -> Self {
        Self {
            center,
            local_half_extents: half_extents,
            half_extents,
        }
    }

    /// Create an AABB from min and max corners
    pub fn from_corners(min: V, max: V) -> Self {
        Self::new((min + max) * 0.5, (max - min) * 0.5)
    }

    /// Minimum corner
    pub fn min(&self) -> V {
        self.center - self.half_extents
    }

    /// Maximum corner
    pub fn max(&self) -> V {
        self.center + self.half_extents
    }

    /// Check if a point is inside or on the AABB
    pub fn contains(&self, point: V) -> bool {
        let (min, max) = (self.min(), self.max());
        (0..V::DIM).all(|axis| {
            let p = point.get(axis);
            p >= min.get(axis) && p <= max.get(axis)
        })
    }

    /// Refit `half_extents` around the body-space box rotated by `rotation`
    pub fn refit<R: Orientation<Vector = V>>(&mut self, rotation: &R) {
        let columns: Vec<V> = (0..V::DIM).map(|axis| rotation.rotate(V::unit(axis))).collect();
        let local = self.local_half_extents;
        self.half_extents = V::from_fn(|row| {
            columns
                .iter()
                .enumerate()
                .map(|(axis, column)| column.get(row).abs() * local.get(axis))
                .sum()
        });
    }
}

/// The reference collision shape: a sphere or an axis-aligned box
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Collider<V> {
    Sphere(Sphere<V>),
    Aabb(Aabb<V>),
}

impl<V: Vector> Collider<V> {
    /// Sphere collider
    pub fn sphere(center: V, radius: f32) -> Self {
        Collider::Sphere(Sphere::new(center, radius))
    }

    /// Box collider from center and half extents
    pub fn aabb(center: V, half_extents: V) -> Self {
        Collider::Aabb(Aabb::new(center, half_extents))
    }

    /// Get the center of the collider
    pub fn center(&self) -> V {
        match self {
            Collider::Sphere(s) => s.center,
            Collider::Aabb(a) => a.center,
        }
    }

    fn contact(&self, other: &Self, tolerance: f32) -> Option<Contact<V>> {
        match (self, other) {
            (Collider::Sphere(a), Collider::Sphere(b)) => sphere_vs_sphere(a, b, tolerance),
            (Collider::Sphere(s), Collider::Aabb(b)) => sphere_vs_aabb(s, b, tolerance),
            // sphere_vs_aabb points toward the sphere; we want toward the box
            (Collider::Aabb(b), Collider::Sphere(s)) => {
                sphere_vs_aabb(s, b, tolerance).map(Contact::flipped)
            }
            (Collider::Aabb(a), Collider::Aabb(b)) => aabb_vs_aabb(a, b, tolerance),
        }
    }
}

impl<D: Dimension> Shape<D> for Collider<D::Vector> {
    fn position(&self) -> D::Vector {
        self.center()
    }

    fn set_position(&mut self, position: D::Vector) {
        match self {
            Collider::Sphere(s) => s.center = position,
            Collider::Aabb(a) => a.center = position,
        }
    }

    fn rotate(&mut self, rotation: &D::Rotation) {
        // Spheres look the same from every orientation
        if let Collider::Aabb(a) = self {
            a.refit(rotation);
        }
    }

    fn bounds(&self) -> (D::Vector, D::Vector) {
        match self {
            Collider::Sphere(s) => {
                let r = D::Vector::splat(s.radius);
                (s.center - r, s.center + r)
            }
            Collider::Aabb(a) => (a.min(), a.max()),
        }
    }

    fn intersects(&self, other: &Self) -> bool {
        self.contact(other, 0.0).is_some()
    }

    fn resolve(&self, other: &Self, tolerance: f32) -> Contact<D::Vector> {
        self.contact(other, tolerance).unwrap_or_else(|| {
            // Touching or apart: report the centre line with no push
            let normal = (self.center() - other.center()).normalized();
            Contact {
                normal,
                point: other.center(),
                offset: D::Vector::ZERO,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::{D2, D3};
    use kinetic_math::{Quat, Rot2, Vec2, Vec3};

    const EPSILON: f32 = 0.0001;

    #[test]
    fn test_sphere_contains() {
        let s = Sphere::new(Vec3::ZERO, 1.0);
        assert!(s.contains(Vec3::new(0.5, 0.5, 0.5)));
        assert!(!s.contains(Vec3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn test_aabb_corners() {
        let a = Aabb::from_corners(Vec2::new(-1.0, 0.0), Vec2::new(3.0, 2.0));
        assert_eq!(a.center, Vec2::new(1.0, 1.0));
        assert_eq!(a.half_extents, Vec2::new(2.0, 1.0));
        assert!(a.contains(Vec2::new(2.9, 0.1)));
        assert!(!a.contains(Vec2::new(3.1, 1.0)));
    }

    #[test]
    fn test_aabb_refit_quarter_turn_swaps_extents() {
        let mut a = Aabb::new(Vec2::ZERO, Vec2::new(2.0, 1.0));
        a.refit(&Rot2::from_angle(std::f32::consts::FRAC_PI_2));
        assert!((a.half_extents.x - 1.0).abs() < EPSILON);
        assert!((a.half_extents.y - 2.0).abs() < EPSILON);
        // Body-space size is kept for the next refit
        assert_eq!(a.local_half_extents, Vec2::new(2.0, 1.0));
    }

    #[test]
    fn test_aabb_refit_eighth_turn_grows() {
        let mut a = Aabb::new(Vec3::ZERO, Vec3::splat(1.0));
        a.refit(&Quat::from_axis_angle(Vec3::Z, std::f32::consts::FRAC_PI_4));
        let expected = std::f32::consts::SQRT_2;
        assert!((a.half_extents.x - expected).abs() < EPSILON);
        assert!((a.half_extents.y - expected).abs() < EPSILON);
        assert!((a.half_extents.z - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_collider_set_position() {
        let mut c = Collider::sphere(Vec3::ZERO, 0.5);
        Shape::<D3>::set_position(&mut c, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(c.center(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_collider_bounds() {
        let s = Collider::sphere(Vec2::new(1.0, 1.0), 0.5);
        let (min, max) = Shape::<D2>::bounds(&s);
        assert_eq!(min, Vec2::new(0.5, 0.5));
        assert_eq!(max, Vec2::new(1.5, 1.5));
    }

    #[test]
    fn test_resolve_box_vs_sphere_points_toward_box() {
        let floor = Collider::aabb(Vec2::ZERO, Vec2::new(5.0, 1.0));
        let ball = Collider::sphere(Vec2::new(0.0, 1.3), 0.5);

        assert!(Shape::<D2>::intersects(&floor, &ball));
        let contact = Shape::<D2>::resolve(&floor, &ball, 0.0);
        assert_eq!(contact.normal, -Vec2::Y);
    }

    #[test]
    fn test_resolve_apart_has_no_offset() {
        let a = Collider::sphere(Vec2::ZERO, 0.5);
        let b = Collider::sphere(Vec2::new(4.0, 0.0), 0.5);

        assert!(!Shape::<D2>::intersects(&a, &b));
        let contact = Shape::<D2>::resolve(&a, &b, 0.01);
        assert_eq!(contact.offset, Vec2::ZERO);
        assert_eq!(contact.normal, -Vec2::X);
    }

    #[test]
    fn test_rotate_sphere_is_noop() {
        let mut s = Collider::sphere(Vec3::ZERO, 1.0);
        let before = s;
        Shape::<D3>::rotate(&mut s, &Quat::from_axis_angle(Vec3::Y, 1.0));
        assert_eq!(s, before);
    }
}
