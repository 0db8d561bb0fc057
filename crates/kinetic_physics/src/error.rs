//! Physics error types
//!
//! Returned by the checked engine API. The unchecked accessors return
//! `Option` instead, and the step functions never fail.

use std::fmt;

/// Error type for rejected engine calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsError {
    /// Slot index past the end of body storage
    SlotOutOfRange { index: usize, len: usize },
    /// Slot holds a killed body awaiting reuse
    DeadBody(usize),
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::SlotOutOfRange { index, len } => {
                write!(f, "Body slot {} out of range (len {})", index, len)
            }
            PhysicsError::DeadBody(index) => write!(f, "Body slot {} is dead", index),
        }
    }
}

impl std::error::Error for PhysicsError {}
