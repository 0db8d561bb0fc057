//! Rigid body physics for the kinetic engine
//!
//! This crate provides an impulse-based simulation that runs unchanged in
//! 2D, 3D and 4D, including:
//! - Rigid bodies with RK4 velocity integration and world-box reflection
//! - Body lifecycle with slot recycling, generation handles and pruning
//! - Restitution-based collision response with peer-aware callbacks
//! - The `Shape` and `SpatialIndex` collaborator traits, with reference
//!   sphere/box colliders and a sweep-and-prune broad phase

pub mod body;
pub mod broadphase;
pub mod collision;
pub mod dimension;
pub mod engine;
pub mod error;
pub mod shapes;
pub mod spatial;

// Re-export commonly used types
pub use body::{Body, CollisionCallback};
pub use broadphase::SweepAndPrune;
pub use collision::{aabb_vs_aabb, sphere_vs_aabb, sphere_vs_sphere, Contact};
pub use dimension::{Angular, Dimension, D2, D3, D4};
pub use engine::{BodyHandle, PhysicsConfig, PhysicsEngine, World};
pub use error::PhysicsError;
pub use shapes::{Aabb, Collider, Shape, Sphere};
pub use spatial::SpatialIndex;
