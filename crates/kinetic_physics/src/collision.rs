//! Narrow-phase collision detection for the reference shapes
//!
//! Every test returns a [`Contact`] whose normal points toward the FIRST
//! shape and whose offset is the translation that separates the first shape
//! from the second. Works in any dimension.

use kinetic_math::Vector;

use crate::shapes::{Aabb, Sphere};

/// Contact geometry between two intersecting shapes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact<V> {
    /// Unit normal pointing from the second shape toward the first
    pub normal: V,
    /// Point of contact (on the surface of the second shape)
    pub point: V,
    /// Translation to apply to the first shape to separate it
    pub offset: V,
}

impl<V: Vector> Contact<V> {
    /// Build a contact from a normal, a contact point and a penetration depth
    ///
    /// The offset pushes along the normal by the depth plus `tolerance`, so
    /// separated shapes do not register as touching on the next frame.
    pub fn new(normal: V, point: V, penetration: f32, tolerance: f32) -> Self {
        Self {
            normal,
            point,
            offset: normal * (penetration + tolerance),
        }
    }

    /// Penetration depth implied by the offset (tolerance included)
    pub fn depth(&self) -> f32 {
        self.offset.dot(self.normal)
    }

    /// The same contact seen from the second shape
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            point: self.point,
            offset: -self.offset,
        }
    }
}

/// Sphere vs sphere
///
/// Coincident centres separate along the first axis.
pub fn sphere_vs_sphere<V: Vector>(a: &Sphere<V>, b: &Sphere<V>, tolerance: f32) -> Option<Contact<V>> {
    let delta = a.center - b.center;
    let dist_sq = delta.length_squared();
    let min_dist = a.radius + b.radius;

    if dist_sq >= min_dist * min_dist {
        return None;
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > tolerance {
        delta * (1.0 / dist)
    } else {
        V::unit(0)
    };
    let point = b.center + normal * b.radius;

    Some(Contact::new(normal, point, min_dist - dist, tolerance))
}

/// Sphere vs AABB; the normal points from the box toward the sphere
pub fn sphere_vs_aabb<V: Vector>(sphere: &Sphere<V>, aabb: &Aabb<V>, tolerance: f32) -> Option<Contact<V>> {
    let (min, max) = (aabb.min(), aabb.max());
    let closest = sphere.center.clamp_components(min, max);

    let delta = sphere.center - closest;
    let dist_squared = delta.length_squared();

    if dist_squared >= sphere.radius * sphere.radius {
        return None;
    }

    let dist = dist_squared.sqrt();
    if dist > tolerance {
        return Some(Contact::new(delta * (1.0 / dist), closest, sphere.radius - dist, tolerance));
    }

    // Centre inside the box: leave through the nearest face
    let mut escape = f32::MAX;
    let mut normal = V::unit(0);
    for axis in 0..V::DIM {
        let to_min = sphere.center.get(axis) - min.get(axis);
        let to_max = max.get(axis) - sphere.center.get(axis);
        if to_min < escape {
            escape = to_min;
            normal = -V::unit(axis);
        }
        if to_max < escape {
            escape = to_max;
            normal = V::unit(axis);
        }
    }

    Some(Contact::new(normal, closest, sphere.radius + escape, tolerance))
}

/// AABB vs AABB; separates along the axis of least overlap
pub fn aabb_vs_aabb<V: Vector>(a: &Aabb<V>, b: &Aabb<V>, tolerance: f32) -> Option<Contact<V>> {
    let (a_min, a_max) = (a.min(), a.max());
    let (b_min, b_max) = (b.min(), b.max());

    let mut min_overlap = f32::MAX;
    let mut normal = V::unit(0);
    for axis in 0..V::DIM {
        let overlap = a_max.get(axis).min(b_max.get(axis)) - a_min.get(axis).max(b_min.get(axis));
        if overlap <= 0.0 {
            return None;
        }
        if overlap < min_overlap {
            min_overlap = overlap;
            normal = if a.center.get(axis) < b.center.get(axis) {
                -V::unit(axis)
            } else {
                V::unit(axis)
            };
        }
    }

    let point = a.center.clamp_components(b_min, b_max);
    Some(Contact::new(normal, point, min_overlap, tolerance))
}
