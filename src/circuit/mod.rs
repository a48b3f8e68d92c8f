//! Circuit graph representation and validation.
//!
//! This module provides the internal representation of a circuit after parsing.
//! The [`Circuit`] struct holds all components and nodes together with the
//! MNA variable index of every unknown.

mod alloc;
mod graph;
mod types;
mod validate;

pub use alloc::VariableAllocator;
pub use graph::Circuit;
pub use types::*;
pub use validate::validate_circuit;
