//! Kinetic - rigid body physics in 2D, 3D and 4D
//!
//! The root package wires configuration to the physics crates and hosts
//! the headless scenario runner used by the `kinetic` binary.

pub mod config;
pub mod scenario;
