//! Variable index allocation.

use super::types::VarIndex;

/// Hands out MNA variable indices.
///
/// Indices are allocated once, in increasing order, and never reused. Index 0
/// is reserved for ground, so the first allocated index is 1.
#[derive(Debug, Clone)]
pub struct VariableAllocator {
    next: usize,
}

impl VariableAllocator {
    /// Create an allocator with only the ground slot taken.
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocate a fresh variable index.
    pub fn next_index(&mut self) -> VarIndex {
        let index = VarIndex(self.next);
        self.next += 1;
        index
    }

    /// Length of a solution vector holding every allocated variable plus
    /// the ground slot.
    pub fn len(&self) -> usize {
        self.next
    }

    /// Whether nothing besides ground has been allocated.
    pub fn is_empty(&self) -> bool {
        self.next == 1
    }
}

impl Default for VariableAllocator {
    fn default() -> Self {
        Self::new()
    }
}
