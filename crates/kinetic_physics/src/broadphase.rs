//! Sweep-and-prune broad phase
//!
//! The reference [`SpatialIndex`]. A sorted rebuild orders shapes by the
//! lower bound of their box on the first axis and sweeps, stopping each
//! scan as soon as a box starts past the current one's end. An unsorted
//! rebuild keeps slot order and tests every pair.

use kinetic_math::Vector;

use crate::dimension::Dimension;
use crate::shapes::Shape;
use crate::spatial::SpatialIndex;

/// Sweep-and-prune over a fixed world box
#[derive(Clone, Debug)]
pub struct SweepAndPrune<D: Dimension> {
    lower: D::Vector,
    upper: D::Vector,
    /// Storage index -> slot index
    order: Vec<usize>,
    /// Bounding boxes in storage order
    boxes: Vec<(D::Vector, D::Vector)>,
    collisions: Vec<(usize, usize)>,
}

impl<D: Dimension> SweepAndPrune<D> {
    /// Create an empty index for the world box `[lower, upper]`
    pub fn new(lower: D::Vector, upper: D::Vector) -> Self {
        Self {
            lower,
            upper,
            order: Vec::new(),
            boxes: Vec::new(),
            collisions: Vec::new(),
        }
    }

    fn rebuild<S: Shape<D>>(&mut self, shapes: &[S], sorted: bool) {
        self.order.clear();
        self.order.extend(0..shapes.len());
        if sorted {
            self.order.sort_by(|&a, &b| {
                let a_min = shapes[a].bounds().0.get(0);
                let b_min = shapes[b].bounds().0.get(0);
                a_min.total_cmp(&b_min)
            });
        }

        self.boxes.clear();
        self.boxes.extend(self.order.iter().map(|&slot| shapes[slot].bounds()));

        self.collisions.clear();
        let count = self.boxes.len();
        for a in 0..count {
            let (a_min, a_max) = self.boxes[a];
            for b in (a + 1)..count {
                let (b_min, b_max) = self.boxes[b];
                if sorted && b_min.get(0) > a_max.get(0) {
                    break;
                }
                if boxes_overlap(a_min, a_max, b_min, b_max)
                    && shapes[self.order[a]].intersects(&shapes[self.order[b]])
                {
                    self.collisions.push((a, b));
                }
            }
        }

        log::trace!(
            "broad phase rebuilt over {} shapes ({}): {} intersecting pairs",
            count,
            if sorted { "sorted" } else { "unsorted" },
            self.collisions.len()
        );
    }
}

impl<D: Dimension, S: Shape<D>> SpatialIndex<D, S> for SweepAndPrune<D> {
    fn lower(&self) -> D::Vector {
        self.lower
    }

    fn upper(&self) -> D::Vector {
        self.upper
    }

    fn insert(&mut self, shapes: &[S]) {
        self.rebuild(shapes, true);
    }

    fn insert_no_sort(&mut self, shapes: &[S]) {
        self.rebuild(shapes, false);
    }

    fn collisions(&self) -> &[(usize, usize)] {
        &self.collisions
    }

    fn index_map(&self) -> &[usize] {
        &self.order
    }

    fn collisions_along_ray(&self, shapes: &[S], origin: D::Vector, direction: D::Vector) -> Vec<(usize, f32)> {
        let mut hits: Vec<(usize, f32)> = shapes
            .iter()
            .enumerate()
            .filter_map(|(slot, shape)| {
                let (min, max) = shape.bounds();
                ray_vs_box(origin, direction, min, max).map(|t| (slot, t))
            })
            .collect();
        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        hits
    }
}

fn boxes_overlap<V: Vector>(a_min: V, a_max: V, b_min: V, b_max: V) -> bool {
    (0..V::DIM).all(|axis| a_min.get(axis) <= b_max.get(axis) && a_max.get(axis) >= b_min.get(axis))
}

/// Slab test; returns the entry distance, or 0 when the origin is inside
fn ray_vs_box<V: Vector>(origin: V, direction: V, min: V, max: V) -> Option<f32> {
    let mut t_min = 0.0_f32;
    let mut t_max = f32::INFINITY;

    for axis in 0..V::DIM {
        let o = origin.get(axis);
        let d = direction.get(axis);
        if d.abs() < f32::EPSILON {
            if o < min.get(axis) || o > max.get(axis) {
                return None;
            }
            continue;
        }

        let inv_d = 1.0 / d;
        let mut t0 = (min.get(axis) - o) * inv_d;
        let mut t1 = (max.get(axis) - o) * inv_d;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }

    Some(t_min)
}
