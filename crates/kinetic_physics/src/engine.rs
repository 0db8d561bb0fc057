//! The physics engine: body storage, lifecycle and the per-frame pipeline
//!
//! Bodies and shapes live in two dense arrays indexed by the same slot.
//! Killing a body only marks it dead and queues its slot for reuse, so
//! indices held by callers stay valid until an explicit prune. Each frame
//! runs broad phase, pairwise collision response and then RK4 integration.

use kinetic_math::Vector;
use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::broadphase::SweepAndPrune;
use crate::dimension::Dimension;
use crate::error::PhysicsError;
use crate::shapes::{Collider, Shape};
use crate::spatial::SpatialIndex;

/// Engine with the reference collaborators
pub type World<D> = PhysicsEngine<D, Collider<<D as Dimension>::Vector>, SweepAndPrune<D>>;

/// Configuration for collision response
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Restitution in `[0, 1]`; 1 is perfectly elastic
    pub elasticity: f32,
    /// Contact slop and the threshold for the numeric skips
    pub tolerance: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            elasticity: 1.0,
            tolerance: 1e-4,
        }
    }
}

impl PhysicsConfig {
    /// Create a config, clamping elasticity into `[0, 1]`
    pub fn new(elasticity: f32, tolerance: f32) -> Self {
        Self {
            elasticity: elasticity.clamp(0.0, 1.0),
            tolerance,
        }
    }
}

/// A slot index paired with the generation it was issued for
///
/// Every kill, prune or clear bumps the generation of the affected slots,
/// so a handle taken before the slot was recycled no longer resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyHandle {
    pub index: usize,
    pub generation: u32,
}

/// Rigid body simulation over a dimension `D`, shape type `S` and broad
/// phase `P`
pub struct PhysicsEngine<D: Dimension, S, P> {
    bodies: Vec<Body<D>>,
    shapes: Vec<S>,
    /// Dead slots awaiting reuse
    free: Vec<usize>,
    /// Per-slot generation; never shrinks, so truncated slots stay bumped
    generations: Vec<u32>,
    /// True iff `free` is empty
    clean: bool,
    gravity: D::Vector,
    config: PhysicsConfig,
    spatial: P,
    /// Scratch buffer for the pairs of one solve
    pairs: Vec<(usize, usize)>,
}

impl<D: Dimension, S: Shape<D>, P: SpatialIndex<D, S>> PhysicsEngine<D, S, P> {
    /// Create an empty engine with default collision response
    pub fn new(spatial: P, gravity: D::Vector) -> Self {
        Self::with_config(spatial, gravity, PhysicsConfig::default())
    }

    /// Create an empty engine with a custom configuration
    pub fn with_config(spatial: P, gravity: D::Vector, config: PhysicsConfig) -> Self {
        Self {
            bodies: Vec::new(),
            shapes: Vec::new(),
            free: Vec::new(),
            generations: Vec::new(),
            clean: true,
            gravity,
            config: PhysicsConfig::new(config.elasticity, config.tolerance),
            spatial,
            pairs: Vec::new(),
        }
    }

    // ----- lifecycle -----

    /// Add a body with `shape` and return its slot
    ///
    /// The shape's centre is clamped into the world box and becomes the
    /// body's position. A dead slot is reused when one is pending.
    pub fn add_body(&mut self, mut shape: S, mass: f32, tag: u64) -> usize {
        let center = self.spatial.clamp_bounds(shape.position());
        shape.set_position(center);

        let mut body = Body::new(center, mass, tag);
        body.clear_force(self.gravity);

        let index = match self.free.pop() {
            Some(index) => {
                self.bodies[index] = body;
                self.shapes[index] = shape;
                if self.free.is_empty() {
                    self.clean = true;
                }
                index
            }
            None => {
                self.bodies.push(body);
                self.shapes.push(shape);
                let index = self.bodies.len() - 1;
                if self.generations.len() <= index {
                    self.generations.push(0);
                }
                index
            }
        };

        log::debug!("Added body {} (mass {}, tag {})", index, mass, tag);
        index
    }

    /// Kill the body in slot `index` and queue the slot for reuse
    ///
    /// Killing an already dead body does nothing.
    pub fn clear_body(&mut self, index: usize) {
        let len = self.bodies.len();
        let Some(body) = self.bodies.get_mut(index) else {
            log::warn!("clear_body: slot {} out of range (len {})", index, len);
            return;
        };
        if body.is_dead() {
            return;
        }

        body.kill();
        self.free.push(index);
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.clean = false;
        log::debug!("Killed body {}", index);
    }

    /// Remove every body and return to an empty, clean state
    pub fn clear(&mut self) {
        for generation in self.generations.iter_mut().take(self.bodies.len()) {
            *generation = generation.wrapping_add(1);
        }
        self.bodies.clear();
        self.shapes.clear();
        self.free.clear();
        self.clean = true;
        log::debug!("Cleared all bodies");
    }

    /// Reserve capacity for `additional` more bodies
    pub fn reserve(&mut self, additional: usize) {
        self.bodies.reserve(additional);
        self.shapes.reserve(additional);
        self.generations.reserve(additional);
    }

    /// [`Self::force_prune_after`], but only when dead slots are pending
    pub fn prune_after(&mut self, index: usize) {
        if self.clean {
            return;
        }
        self.force_prune_after(index);
    }

    /// Truncate storage to `index` slots and rebuild the free list
    ///
    /// Dead bodies below `index` stay in place and are queued for reuse
    /// again. Indices at or past `index` are invalidated.
    pub fn force_prune_after(&mut self, index: usize) {
        self.free.clear();

        if index < self.bodies.len() {
            for generation in &mut self.generations[index..self.bodies.len()] {
                *generation = generation.wrapping_add(1);
            }
            self.bodies.truncate(index);
            self.shapes.truncate(index);
        }

        self.free.extend(
            self.bodies
                .iter()
                .enumerate()
                .filter(|(_, body)| body.is_dead())
                .map(|(slot, _)| slot),
        );
        self.clean = self.free.is_empty();

        log::debug!(
            "Pruned storage to {} slots ({} dead slots still pending)",
            self.bodies.len(),
            self.free.len()
        );
    }

    // ----- handles -----

    /// Generation-checked handle to a live body
    pub fn handle(&self, index: usize) -> Option<BodyHandle> {
        let body = self.bodies.get(index)?;
        if body.is_dead() {
            return None;
        }
        Some(BodyHandle {
            index,
            generation: self.generations[index],
        })
    }

    /// Slot of `handle`, or `None` once its body has been killed or pruned
    pub fn resolve(&self, handle: BodyHandle) -> Option<usize> {
        let body = self.bodies.get(handle.index)?;
        if body.is_dead() || self.generations[handle.index] != handle.generation {
            return None;
        }
        Some(handle.index)
    }

    // ----- per-frame pipeline -----

    /// Full step with the sorted broad phase
    pub fn solve(&mut self, dt: f32, damping: f32) {
        if self.bodies.is_empty() {
            return;
        }

        self.spatial.insert(&self.shapes);
        let mut pairs = std::mem::take(&mut self.pairs);
        pairs.clear();
        let map = self.spatial.index_map();
        pairs.extend(self.spatial.collisions().iter().map(|&(a, b)| (map[a], map[b])));

        self.collide_pairs(&pairs);
        self.pairs = pairs;
        self.solve_integrals(dt, damping);
    }

    /// Full step with the broad phase kept in slot order
    pub fn solve_no_sort(&mut self, dt: f32, damping: f32) {
        if self.bodies.is_empty() {
            return;
        }

        self.spatial.insert_no_sort(&self.shapes);
        let mut pairs = std::mem::take(&mut self.pairs);
        pairs.clear();
        pairs.extend_from_slice(self.spatial.collisions());

        self.collide_pairs(&pairs);
        self.pairs = pairs;
        self.solve_integrals(dt, damping);
    }

    /// Integrate without any collision handling
    pub fn solve_no_collide(&mut self, dt: f32, damping: f32) {
        if self.bodies.is_empty() {
            return;
        }
        self.solve_integrals(dt, damping);
    }

    fn collide_pairs(&mut self, pairs: &[(usize, usize)]) {
        log::trace!("Resolving {} candidate pairs", pairs.len());
        for &(i, j) in pairs {
            self.collide(i, j);
        }
    }

    /// Integrate every live body by `dt` and sync its shape
    pub fn solve_integrals(&mut self, dt: f32, damping: f32) {
        let (lower, upper) = (self.spatial.lower(), self.spatial.upper());
        let half_dt = dt * 0.5;

        for (body, shape) in self.bodies.iter_mut().zip(self.shapes.iter_mut()) {
            if body.is_dead() {
                continue;
            }

            let v = body.linear_velocity();
            let k1 = body.linear_acceleration(v, damping);
            let k2 = body.linear_acceleration(v + k1 * half_dt, damping);
            let k3 = body.linear_acceleration(v + k2 * half_dt, damping);
            let k4 = body.linear_acceleration(v + k3 * dt, damping);
            let v_next = v + (k1 + (k2 + k3) * 2.0 + k4) * (dt / 6.0);

            body.update_position(v_next, dt, lower, upper);
            body.update_rotation(dt);
            body.clear_force(self.gravity);

            shape.set_position(body.position());
            shape.rotate(body.rotation());
        }
    }

    // ----- collision response -----

    /// Resolve a contact between two bodies
    ///
    /// Both callbacks run first, each seeing the other as its peer. The
    /// impulse follows, then the separating offset is split by inverse mass.
    /// Dead bodies, out-of-range slots and `i == j` are ignored, as is a pair
    /// where a callback killed either side.
    pub fn collide(&mut self, i: usize, j: usize) {
        if i == j || i >= self.bodies.len() || j >= self.bodies.len() {
            return;
        }
        if self.bodies[i].is_dead() || self.bodies[j].is_dead() {
            return;
        }

        let tolerance = self.config.tolerance;
        let contact = self.shapes[i].resolve(&self.shapes[j], tolerance);
        let (b1, b2) = pair_mut(&mut self.bodies, i, j);

        b1.callback(b2);
        b2.callback(b1);
        if b1.is_dead() || b2.is_dead() {
            return;
        }

        resolve_impulse(b1, b2, contact.normal, self.config.elasticity, tolerance);

        let inv1 = b1.inv_mass();
        let inv2 = b2.inv_mass();
        let inv_total = inv1 + inv2;
        if inv_total <= tolerance {
            return;
        }

        let ratio1 = (inv_total - inv2) / inv_total;
        let ratio2 = (inv_total - inv1) / inv_total;
        b1.move_offset(contact.offset * ratio1);
        b2.move_offset(contact.offset * -ratio2);

        let (p1, p2) = (b1.position(), b2.position());
        self.shapes[i].set_position(p1);
        self.shapes[j].set_position(p2);

        log::trace!("Collided bodies {} and {} (depth {})", i, j, contact.depth());
    }

    /// Collide one body against a shape that has no body of its own
    ///
    /// Returns whether the shapes intersected. The body takes the whole
    /// separating offset.
    pub fn collide_static(&mut self, index: usize, other: &S) -> bool {
        let Some(body) = self.bodies.get_mut(index) else {
            log::warn!("collide_static: slot {} out of range", index);
            return false;
        };
        if body.is_dead() {
            return false;
        }

        let shape = &mut self.shapes[index];
        if !shape.intersects(other) {
            return false;
        }

        let contact = shape.resolve(other, self.config.tolerance);
        resolve_static_impulse(body, contact.normal, self.config.elasticity, self.config.tolerance);
        body.move_offset(contact.offset);
        shape.set_position(body.position());
        true
    }

    /// Live bodies whose shapes the ray hits, nearest first
    pub fn collisions_along_ray(&self, origin: D::Vector, direction: D::Vector) -> Vec<(usize, f32)> {
        let mut hits = self.spatial.collisions_along_ray(&self.shapes, origin, direction);
        hits.retain(|&(slot, _)| self.bodies.get(slot).is_some_and(|body| !body.is_dead()));
        hits
    }

    // ----- diagnostics -----

    /// Kinetic plus potential energy of every body, dead ones included
    ///
    /// Potential energy is measured from the lower corner of the world.
    pub fn get_total_energy(&self) -> f32 {
        let lower = self.spatial.lower();
        self.bodies
            .iter()
            .map(|body| {
                let potential = body.mass() * self.gravity.dot(lower - body.position());
                body.kinetic_energy() + potential
            })
            .sum()
    }

    // ----- callbacks -----

    /// Install a collision handler on a live body
    pub fn register_callback<F>(&mut self, index: usize, handler: F) -> Result<(), PhysicsError>
    where
        F: FnMut(&mut Body<D>, &mut Body<D>) + 'static,
    {
        let len = self.bodies.len();
        let body = self.bodies.get_mut(index).ok_or_else(|| {
            log::warn!("register_callback: slot {} out of range (len {})", index, len);
            PhysicsError::SlotOutOfRange { index, len }
        })?;
        if body.is_dead() {
            log::warn!("register_callback: slot {} is dead", index);
            return Err(PhysicsError::DeadBody(index));
        }
        body.register_callback(handler);
        Ok(())
    }

    // ----- accessors -----

    pub fn get_body(&self, index: usize) -> Option<&Body<D>> {
        self.bodies.get(index)
    }

    pub fn get_body_mut(&mut self, index: usize) -> Option<&mut Body<D>> {
        self.bodies.get_mut(index)
    }

    /// Like [`Self::get_body`] but rejects dead slots too
    pub fn try_get_body(&self, index: usize) -> Result<&Body<D>, PhysicsError> {
        let body = self.bodies.get(index).ok_or(PhysicsError::SlotOutOfRange {
            index,
            len: self.bodies.len(),
        })?;
        if body.is_dead() {
            return Err(PhysicsError::DeadBody(index));
        }
        Ok(body)
    }

    pub fn get_bodies(&self) -> &[Body<D>] {
        &self.bodies
    }

    pub fn get_shape(&self, index: usize) -> Option<&S> {
        self.shapes.get(index)
    }

    pub fn get_shapes(&self) -> &[S] {
        &self.shapes
    }

    /// Number of slots, dead ones included
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// True when no dead slots are pending reuse
    pub fn is_clean(&self) -> bool {
        self.clean
    }

    pub fn free_slots(&self) -> &[usize] {
        &self.free
    }

    pub fn gravity(&self) -> D::Vector {
        self.gravity
    }

    /// Change gravity; each body's force picks it up after its next step
    pub fn set_gravity(&mut self, gravity: D::Vector) {
        self.gravity = gravity;
    }

    pub fn elasticity(&self) -> f32 {
        self.config.elasticity
    }

    /// Set restitution, clamped into `[0, 1]`
    pub fn set_elasticity(&mut self, elasticity: f32) {
        self.config.elasticity = elasticity.clamp(0.0, 1.0);
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn spatial(&self) -> &P {
        &self.spatial
    }
}

/// Normal impulse between two bodies; `normal` points toward `b1`
fn resolve_impulse<D: Dimension>(
    b1: &mut Body<D>,
    b2: &mut Body<D>,
    normal: D::Vector,
    elasticity: f32,
    tolerance: f32,
) {
    let v1 = b1.linear_velocity();
    let v2 = b2.linear_velocity();
    let v1n = v1.dot(normal);
    let v2n = v2.dot(normal);
    let relative = v1 - v2;
    let approach = relative.dot(normal);

    if (v1n >= -tolerance && v2n <= tolerance) || approach > -tolerance {
        return;
    }

    let inv1 = b1.inv_mass();
    let inv2 = b2.inv_mass();
    let resistance = inv1 + inv2;
    if resistance <= 0.0 {
        return;
    }

    let j = -(1.0 + elasticity) * approach / resistance;
    let impulse = normal * j;
    b1.set_linear_velocity(v1 + impulse * inv1);
    b2.set_linear_velocity(v2 - impulse * inv2);
}

/// Normal impulse against a peer with no velocity and no inverse mass
fn resolve_static_impulse<D: Dimension>(body: &mut Body<D>, normal: D::Vector, elasticity: f32, tolerance: f32) {
    let v = body.linear_velocity();
    let vn = v.dot(normal);
    if vn > -tolerance {
        return;
    }

    let inv = body.inv_mass();
    if inv <= 0.0 {
        return;
    }

    let j = -(1.0 + elasticity) * vn / inv;
    body.set_linear_velocity(v + normal * (j * inv));
}

/// Two distinct mutable elements of one slice
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(i, j);
    if i < j {
        let (head, tail) = items.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}
