//! Matrix and vector stamps emitted by components.

use crate::circuit::VarIndex;

/// A single `A[row][col] += value` contribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixStamp {
    pub row: VarIndex,
    pub col: VarIndex,
    pub value: f64,
}

/// A single `b[row] += value` contribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorStamp {
    pub row: VarIndex,
    pub value: f64,
}

/// Everything one component adds to the MNA system.
///
/// Stamps never reference the ground variable: the helpers below drop any
/// term that touches ground.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contribution {
    pub matrix: Vec<MatrixStamp>,
    pub vector: Vec<VectorStamp>,
}

impl Contribution {
    /// Create an empty contribution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this contribution adds nothing.
    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty() && self.vector.is_empty()
    }

    /// Add a raw matrix stamp. Both indices must be non-ground.
    pub fn stamp_matrix(&mut self, row: VarIndex, col: VarIndex, value: f64) {
        debug_assert!(!row.is_ground() && !col.is_ground(), "ground in matrix stamp");
        self.matrix.push(MatrixStamp { row, col, value });
    }

    /// Add a raw vector stamp. The index must be non-ground.
    pub fn stamp_vector(&mut self, row: VarIndex, value: f64) {
        debug_assert!(!row.is_ground(), "ground in vector stamp");
        self.vector.push(VectorStamp { row, value });
    }

    /// Stamp a conductance between two nodes.
    /// For a conductance G between nodes i and j:
    ///   A[i,i] += G
    ///   A[j,j] += G
    ///   A[i,j] -= G
    ///   A[j,i] -= G
    pub fn stamp_conductance(&mut self, i: VarIndex, j: VarIndex, g: f64) {
        if !i.is_ground() {
            self.stamp_matrix(i, i, g);
        }
        if !j.is_ground() {
            self.stamp_matrix(j, j, g);
        }
        if !i.is_ground() && !j.is_ground() {
            self.stamp_matrix(i, j, -g);
            self.stamp_matrix(j, i, -g);
        }
    }

    /// Stamp the incidence pattern of a branch current variable `k` flowing
    /// from `pos` to `neg`, enforcing V[pos] - V[neg] = b[k].
    pub fn stamp_branch(&mut self, pos: VarIndex, neg: VarIndex, k: VarIndex) {
        if !pos.is_ground() {
            self.stamp_matrix(pos, k, 1.0);
            self.stamp_matrix(k, pos, 1.0);
        }
        if !neg.is_ground() {
            self.stamp_matrix(neg, k, -1.0);
            self.stamp_matrix(k, neg, -1.0);
        }
    }

    /// Stamp a current source. Current leaves `pos` and enters `neg`.
    pub fn stamp_current(&mut self, pos: VarIndex, neg: VarIndex, current: f64) {
        if !pos.is_ground() {
            self.stamp_vector(pos, -current);
        }
        if !neg.is_ground() {
            self.stamp_vector(neg, current);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(row: usize, col: usize, value: f64) -> MatrixStamp {
        MatrixStamp {
            row: VarIndex(row),
            col: VarIndex(col),
            value,
        }
    }

    #[test]
    fn test_conductance_between_nodes() {
        let mut c = Contribution::new();
        c.stamp_conductance(VarIndex(1), VarIndex(2), 0.5);
        assert_eq!(c.matrix, vec![m(1, 1, 0.5), m(2, 2, 0.5), m(1, 2, -0.5), m(2, 1, -0.5)]);
        assert!(c.vector.is_empty());
    }

    #[test]
    fn test_conductance_to_ground() {
        let mut c = Contribution::new();
        c.stamp_conductance(VarIndex::GROUND, VarIndex(3), 2.0);
        assert_eq!(c.matrix, vec![m(3, 3, 2.0)]);
    }

    #[test]
    fn test_branch_to_ground() {
        let mut c = Contribution::new();
        c.stamp_branch(VarIndex(1), VarIndex::GROUND, VarIndex(4));
        assert_eq!(c.matrix, vec![m(1, 4, 1.0), m(4, 1, 1.0)]);
    }

    #[test]
    fn test_current_direction() {
        let mut c = Contribution::new();
        c.stamp_current(VarIndex(2), VarIndex(1), 1e-3);
        assert_eq!(
            c.vector,
            vec![
                VectorStamp { row: VarIndex(2), value: -1e-3 },
                VectorStamp { row: VarIndex(1), value: 1e-3 },
            ]
        );
    }
}
