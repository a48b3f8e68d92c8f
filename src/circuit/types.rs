//! Core types for circuit representation.

use std::fmt;

/// Index of an unknown in the MNA system.
///
/// Index 0 is the ground reference. Node voltages follow, then the extra
/// (branch current) variables introduced by voltage sources and inductors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarIndex(pub usize);

impl VarIndex {
    /// The ground reference (always index 0).
    pub const GROUND: VarIndex = VarIndex(0);

    /// Check if this is the ground reference.
    pub fn is_ground(&self) -> bool {
        self.0 == 0
    }

    /// The raw index into the solution vector.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for VarIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ground() {
            write!(f, "GND")
        } else {
            write!(f, "x{}", self.0)
        }
    }
}

/// A named, non-ground circuit node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Node name as written in the netlist
    pub name: String,
    /// Voltage variable of this node
    pub index: VarIndex,
}
