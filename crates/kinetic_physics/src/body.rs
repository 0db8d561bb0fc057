//! Rigid body state for the physics engine

use std::fmt;

use kinetic_math::{Orientation, Vector};

use crate::dimension::{Angular, Dimension};

/// Handler invoked when a body collides, as `(self, peer)`
///
/// The handler may mutate either body; it runs before the impulse for the
/// same contact is computed.
pub type CollisionCallback<D> = Box<dyn FnMut(&mut Body<D>, &mut Body<D>)>;

/// A rigid body: position, orientation, velocities, accumulated force and mass
///
/// Mass is stored alongside its inverse. An inverse mass of exactly zero
/// encodes an immovable body (see [`Body::set_no_move`]).
pub struct Body<D: Dimension> {
    force: D::Vector,
    position: D::Vector,
    linear_velocity: D::Vector,
    angular_velocity: Angular<D>,
    rotation: D::Rotation,
    mass: f32,
    inv_mass: f32,
    tag: u64,
    dead: bool,
    callback: Option<CollisionCallback<D>>,
}

impl<D: Dimension> Body<D> {
    /// Create a body at rest
    ///
    /// A mass of zero or less produces an immovable body.
    pub fn new(position: D::Vector, mass: f32, tag: u64) -> Self {
        let mut body = Self {
            force: D::Vector::ZERO,
            position,
            linear_velocity: D::Vector::ZERO,
            angular_velocity: <Angular<D> as Vector>::ZERO,
            rotation: D::Rotation::IDENTITY,
            mass: 0.0,
            inv_mass: 0.0,
            tag,
            dead: false,
            callback: None,
        };
        body.set_mass(mass);
        body
    }

    /// Set the velocity of this body
    pub fn with_velocity(mut self, velocity: D::Vector) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Set the angular velocity of this body
    pub fn with_angular_velocity(mut self, angular: Angular<D>) -> Self {
        self.angular_velocity = angular;
        self
    }

    /// Accumulate a force; velocity only changes on the next integration
    pub fn add_force(&mut self, force: D::Vector) {
        self.force += force;
    }

    /// Reset the accumulated force to the weight of this body
    pub fn clear_force(&mut self, gravity: D::Vector) {
        self.force = gravity * self.mass;
    }

    /// Hard stop: zero the force and both velocities
    pub fn clear_no_force(&mut self) {
        self.force = D::Vector::ZERO;
        self.linear_velocity = D::Vector::ZERO;
        self.angular_velocity = <Angular<D> as Vector>::ZERO;
    }

    /// `dv/dt` for a velocity sample `v` under linear damping
    ///
    /// Computed through the inverse mass, so immovable bodies get zero.
    #[inline]
    pub fn linear_acceleration(&self, v: D::Vector, damping: f32) -> D::Vector {
        (self.force - v * damping) * self.inv_mass
    }

    /// Make this body immovable (infinite mass)
    pub fn set_no_move(&mut self) {
        self.mass = 0.0;
        self.inv_mass = 0.0;
    }

    /// Set the mass, keeping the inverse in step; `mass <= 0` is immovable
    pub fn set_mass(&mut self, mass: f32) {
        if mass > 0.0 {
            self.mass = mass;
            self.inv_mass = 1.0 / mass;
        } else {
            self.set_no_move();
        }
    }

    /// Advance position by `v * dt`, clamped to the world box
    ///
    /// The stored velocity becomes `v` with every component that hit a
    /// bound reversed, so the body heads back into the world next frame.
    pub fn update_position(&mut self, v: D::Vector, dt: f32, min: D::Vector, max: D::Vector) {
        self.position += v * dt;
        let direction = self.position.clamp_direction(min, max);
        self.linear_velocity = v.component_mul(direction);
    }

    /// Advance orientation by the current angular velocity
    pub fn update_rotation(&mut self, dt: f32) {
        self.rotation = self.rotation.integrate(self.angular_velocity, dt);
    }

    /// Translate directly, bypassing velocity (penetration correction)
    pub fn move_offset(&mut self, offset: D::Vector) {
        self.position += offset;
    }

    /// Mark this body dead. There is no way back.
    pub fn kill(&mut self) {
        self.dead = true;
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Install the collision handler, replacing any previous one
    pub fn register_callback<F>(&mut self, handler: F)
    where
        F: FnMut(&mut Body<D>, &mut Body<D>) + 'static,
    {
        self.callback = Some(Box::new(handler));
    }

    pub fn clear_callback(&mut self) {
        self.callback = None;
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Invoke the collision handler as `(self, other)`; no-op without one
    pub fn callback(&mut self, other: &mut Body<D>) {
        // Taken out for the call so the handler can borrow `self` mutably.
        if let Some(mut handler) = self.callback.take() {
            handler(self, other);
            if self.callback.is_none() {
                self.callback = Some(handler);
            }
        }
    }

    /// Linear kinetic energy `0.5 * m * |v|^2`
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.linear_velocity.length_squared()
    }

    pub fn is_movable(&self) -> bool {
        self.inv_mass > 0.0
    }

    pub fn force(&self) -> D::Vector {
        self.force
    }

    pub fn position(&self) -> D::Vector {
        self.position
    }

    /// Teleport the body; its shape follows on the next integration step
    pub fn set_position(&mut self, position: D::Vector) {
        self.position = position;
    }

    pub fn linear_velocity(&self) -> D::Vector {
        self.linear_velocity
    }

    pub fn set_linear_velocity(&mut self, velocity: D::Vector) {
        self.linear_velocity = velocity;
    }

    pub fn angular_velocity(&self) -> Angular<D> {
        self.angular_velocity
    }

    pub fn set_angular_velocity(&mut self, angular: Angular<D>) {
        self.angular_velocity = angular;
    }

    pub fn rotation(&self) -> &D::Rotation {
        &self.rotation
    }

    pub fn set_rotation(&mut self, rotation: D::Rotation) {
        self.rotation = rotation;
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Opaque user tag supplied at creation
    pub fn tag(&self) -> u64 {
        self.tag
    }

    pub fn set_tag(&mut self, tag: u64) {
        self.tag = tag;
    }
}

impl<D: Dimension> fmt::Debug for Body<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("position", &self.position)
            .field("linear_velocity", &self.linear_velocity)
            .field("angular_velocity", &self.angular_velocity)
            .field("rotation", &self.rotation)
            .field("force", &self.force)
            .field("mass", &self.mass)
            .field("tag", &self.tag)
            .field("dead", &self.dead)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}
