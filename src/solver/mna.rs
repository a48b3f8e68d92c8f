//! MNA system assembly.
//!
//! Stamps are accumulated into an ordered `(row, col)` map and then frozen
//! into compressed-row storage, so every row is visited in ascending column
//! order.

use std::collections::BTreeMap;

use crate::circuit::{Circuit, VarIndex};
use crate::components::Contribution;

/// Accumulates component stamps into a sparse system.
#[derive(Debug, Default)]
pub struct SystemAssembler {
    entries: BTreeMap<(usize, usize), f64>,
    rhs: BTreeMap<usize, f64>,
    size: usize,
}

impl SystemAssembler {
    /// Create an assembler for a solution vector of at least `size` slots.
    pub fn new(size: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            rhs: BTreeMap::new(),
            size,
        }
    }

    /// `A[row][col] += value`.
    pub fn add_matrix(&mut self, row: VarIndex, col: VarIndex, value: f64) {
        debug_assert!(!row.is_ground() && !col.is_ground());
        *self.entries.entry((row.index(), col.index())).or_insert(0.0) += value;
        self.size = self.size.max(row.index() + 1).max(col.index() + 1);
    }

    /// `b[row] += value`.
    pub fn add_rhs(&mut self, row: VarIndex, value: f64) {
        debug_assert!(!row.is_ground());
        *self.rhs.entry(row.index()).or_insert(0.0) += value;
        self.size = self.size.max(row.index() + 1);
    }

    /// Fold every stamp of one component into the system.
    pub fn add_contribution(&mut self, contribution: &Contribution) {
        for s in &contribution.matrix {
            self.add_matrix(s.row, s.col, s.value);
        }
        for s in &contribution.vector {
            self.add_rhs(s.row, s.value);
        }
    }

    /// Freeze the accumulated stamps into compressed-row storage.
    pub fn finish(self) -> MnaSystem {
        let size = self.size;
        let mut row_ptr = vec![0usize; size + 1];
        let mut cols = Vec::with_capacity(self.entries.len());
        let mut values = Vec::with_capacity(self.entries.len());

        // BTreeMap order is row-major with ascending columns
        for (&(row, col), &value) in &self.entries {
            row_ptr[row + 1] += 1;
            cols.push(col);
            values.push(value);
        }
        for i in 0..size {
            row_ptr[i + 1] += row_ptr[i];
        }

        let mut rhs = vec![0.0; size];
        for (&row, &value) in &self.rhs {
            rhs[row] = value;
        }

        MnaSystem {
            size,
            row_ptr,
            cols,
            values,
            rhs,
        }
    }
}

/// A sparse MNA system `A x = b` in compressed-row form.
///
/// Row and column 0 (ground) are always empty. Entries absent from a row are
/// zero.
#[derive(Debug, Clone, PartialEq)]
pub struct MnaSystem {
    size: usize,
    row_ptr: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<f64>,
    rhs: Vec<f64>,
}

impl MnaSystem {
    /// An empty system with `size` slots.
    pub fn empty(size: usize) -> Self {
        SystemAssembler::new(size).finish()
    }

    /// Solution vector length (ground slot included).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of stored matrix entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Stored `(col, value)` pairs of a row, by ascending column.
    pub fn row(&self, row: usize) -> Row<'_> {
        if row >= self.size {
            return Row { cols: &[], values: &[] };
        }
        let range = self.row_ptr[row]..self.row_ptr[row + 1];
        Row {
            cols: &self.cols[range.clone()],
            values: &self.values[range],
        }
    }

    /// Stored coefficient at `(row, col)`, if any.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.row(row).get(col)
    }

    /// Right-hand side of a row (0.0 if absent).
    pub fn rhs(&self, row: usize) -> f64 {
        self.rhs.get(row).copied().unwrap_or(0.0)
    }

    /// All stored entries as `(row, col, value)`, row-major.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.size).flat_map(move |r| self.row(r).iter().map(move |(c, v)| (r, c, v)))
    }
}

/// A borrowed row of an [`MnaSystem`].
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    cols: &'a [usize],
    values: &'a [f64],
}

impl<'a> Row<'a> {
    /// Iterate `(col, value)` by ascending column.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + 'a {
        let (cols, values) = (self.cols, self.values);
        cols.iter().copied().zip(values.iter().copied())
    }

    /// Stored coefficient in column `col`, if any.
    pub fn get(&self, col: usize) -> Option<f64> {
        self.cols.binary_search(&col).ok().map(|i| self.values[i])
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }
}

/// Assemble the MNA system of a circuit.
pub fn assemble(circuit: &Circuit) -> MnaSystem {
    let mut assembler = SystemAssembler::new(circuit.solution_len());
    for component in &circuit.components {
        assembler.add_contribution(&component.contribution());
    }
    let system = assembler.finish();
    log::debug!(
        "assembled MNA system: size {}, {} stored entries",
        system.size(),
        system.nnz()
    );
    system
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist;

    fn system(src: &str) -> MnaSystem {
        let circuit = Circuit::from_ast(netlist::parse(src).unwrap()).unwrap();
        assemble(&circuit)
    }

    #[test]
    fn test_accumulates_additively() {
        let mut asm = SystemAssembler::new(0);
        asm.add_matrix(VarIndex(1), VarIndex(1), 0.5);
        asm.add_matrix(VarIndex(1), VarIndex(1), 0.25);
        asm.add_rhs(VarIndex(2), 1.0);
        asm.add_rhs(VarIndex(2), 2.0);
        let sys = asm.finish();
        assert_eq!(sys.size(), 3);
        assert_eq!(sys.get(1, 1), Some(0.75));
        assert_eq!(sys.rhs(2), 3.0);
        assert_eq!(sys.rhs(1), 0.0);
        assert_eq!(sys.get(2, 2), None);
    }

    #[test]
    fn test_rows_sorted_by_column() {
        let mut asm = SystemAssembler::new(4);
        asm.add_matrix(VarIndex(2), VarIndex(3), 1.0);
        asm.add_matrix(VarIndex(2), VarIndex(1), 2.0);
        asm.add_matrix(VarIndex(1), VarIndex(2), 3.0);
        let sys = asm.finish();
        let row: Vec<_> = sys.row(2).iter().collect();
        assert_eq!(row, vec![(1, 2.0), (3, 1.0)]);
        assert!(sys.row(3).is_empty());
        assert!(sys.row(99).is_empty());
        assert_eq!(sys.entries().count(), 3);
    }

    #[test]
    fn test_resistor_network_is_symmetric() {
        let sys = system("R1 1 2 1k\nR2 2 3 2k\nR3 3 1 500\nR4 1 0 1k\nR5 3 0 3k\nI1 0 1 1m");
        for (r, c, v) in sys.entries() {
            assert_eq!(sys.get(c, r), Some(v), "A[{}][{}] != A[{}][{}]", r, c, c, r);
        }
    }

    #[test]
    fn test_diagonal_is_conductance_sum() {
        let sys = system("R1 1 2 1k\nR2 1 3 2k\nR3 1 0 4k\nR4 2 3 1k\nR5 3 0 1k");
        let expected = 1.0 / 1000.0 + 1.0 / 2000.0 + 1.0 / 4000.0;
        let diag = sys.get(1, 1).unwrap();
        assert!((diag - expected).abs() < 1e-15);
        assert_eq!(sys.get(1, 2), Some(-1.0 / 1000.0));
        assert_eq!(sys.get(1, 3), Some(-1.0 / 2000.0));
    }

    #[test]
    fn test_ground_never_stored() {
        let sys = system("V1 1 0 10\nL1 1 2 1m\nR1 2 0 1k\nI1 0 2 1m\nC1 2 0 1u");
        assert!(sys.row(0).is_empty());
        assert!(sys.entries().all(|(r, c, _)| r != 0 && c != 0));
        assert_eq!(sys.rhs(0), 0.0);
    }

    #[test]
    fn test_voltage_divider_layout() {
        // x1 = node 1, x2 = node 2, x3 = I(V1)
        let sys = system("V1 1 0 10\nR1 1 2 1000\nR2 2 0 1000");
        assert_eq!(sys.size(), 4);
        assert_eq!(sys.get(1, 1), Some(0.001));
        assert_eq!(sys.get(1, 3), Some(1.0));
        assert_eq!(sys.get(3, 1), Some(1.0));
        assert_eq!(sys.get(3, 3), None);
        assert_eq!(sys.get(2, 2), Some(0.002));
        assert_eq!(sys.rhs(3), 10.0);
    }

    #[test]
    fn test_capacitor_adds_nothing() {
        let with_cap = system("V1 1 0 10\nC1 1 2 1e-4\nR1 2 0 1k");
        assert_eq!(with_cap.get(1, 2), None);
        assert_eq!(with_cap.get(2, 2), Some(0.001));
        assert_eq!(with_cap.nnz(), 3);
    }
}
