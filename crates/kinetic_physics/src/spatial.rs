//! The broad-phase collaborator contract
//!
//! The engine hands its shapes to a [`SpatialIndex`] once per frame and
//! gets back the pairs that intersect. A sorted rebuild may visit shapes in
//! its own storage order; pairs are then reported in that order and
//! [`SpatialIndex::index_map`] translates them back to engine slots. The
//! engine's own shape array is never reordered.

use kinetic_math::Vector;

use crate::dimension::Dimension;
use crate::shapes::Shape;

/// Broad-phase structure over a slice of shapes
pub trait SpatialIndex<D: Dimension, S: Shape<D>> {
    /// Lower corner of the world
    fn lower(&self) -> D::Vector;

    /// Upper corner of the world
    fn upper(&self) -> D::Vector;

    /// Clamp an arbitrary point into the world box
    fn clamp_bounds(&self, point: D::Vector) -> D::Vector {
        point.clamp_components(self.lower(), self.upper())
    }

    /// Rebuild from `shapes`, free to choose its own storage order
    fn insert(&mut self, shapes: &[S]);

    /// Rebuild from `shapes`, keeping slot order as storage order
    fn insert_no_sort(&mut self, shapes: &[S]);

    /// Intersecting pairs from the last rebuild, as storage indices
    fn collisions(&self) -> &[(usize, usize)];

    /// Storage index to slot index; only meaningful after [`SpatialIndex::insert`]
    fn index_map(&self) -> &[usize];

    /// Slots whose shapes the ray `origin + t * direction` (t >= 0) hits,
    /// nearest first, with the entry distance `t`
    fn collisions_along_ray(&self, shapes: &[S], origin: D::Vector, direction: D::Vector) -> Vec<(usize, f32)>;
}
