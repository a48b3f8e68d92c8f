//! MNA (Modified Nodal Analysis) assembly and the DC solver.
//!
//! This module provides the numerical engine for DC analysis.
//!
//! ## Modified Nodal Analysis
//!
//! MNA assembles a system of equations Ax = b where:
//! - x contains node voltages and branch currents
//! - A is the conductance/coefficient matrix
//! - b is the source vector
//!
//! The matrix structure is:
//! ```text
//! [ G   B ] [ v ]   [ i ]
//! [ C   D ] [ j ] = [ e ]
//! ```
//!
//! where:
//! - G is the conductance matrix (node equations)
//! - B, C connect voltage sources and inductors to nodes
//! - D is 0 at DC, so every branch row has a zero diagonal
//! - v is the vector of node voltages
//! - j is the vector of voltage source / inductor currents
//! - i is the sum of current sources into each node
//! - e is the vector of voltage source values
//!
//! Variable 0 is ground and never appears in A or b; the solution vector
//! still keeps a slot for it so indices line up with [`VarIndex`].
//!
//! The zero diagonals rule out plain Gauss-Seidel. [`GaussSeidel`] re-pivots
//! such rows onto another variable; see [`gauss_seidel`] for the details.
//!
//! [`VarIndex`]: crate::circuit::VarIndex

pub mod gauss_seidel;
mod mna;
mod simulator;

pub use gauss_seidel::{resolve_pivot, GaussSeidel, PivotDecision, PivotState, SolveReport};
pub use mna::{assemble, MnaSystem, Row, SystemAssembler};
pub use simulator::{AnalysisState, BranchCurrent, ComponentResult, DcSolution, NodeVoltage, Simulator};

use crate::error::{MnaSimError, Result};

/// Default iteration budget.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Default absolute residual tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Default damping (under-relaxation) factor.
pub const DEFAULT_DAMPING: f64 = 0.1;

/// Sweeps between convergence checks. Changing it changes reported
/// iteration counts.
pub const CONVERGENCE_CHECK_INTERVAL: usize = 5;

/// Configuration for the Gauss-Seidel solver.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Maximum number of sweeps. All of them run, so a check that first
    /// passes on the last sweep still counts as converged.
    pub max_iterations: usize,
    /// Absolute residual tolerance, per row.
    pub tolerance: f64,
    /// Damping factor in (0, 1].
    pub damping: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            damping: DEFAULT_DAMPING,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of sweeps.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the absolute residual tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the damping factor.
    ///
    /// Smaller values converge more slowly but tolerate the re-pivoted,
    /// non-diagonally-dominant systems MNA produces.
    /// - 0.1 (default): robust for source-heavy circuits
    /// - 0.5: faster on resistor networks
    /// - 1.0: undamped; the residual check can pass early on some circuits
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Check that every parameter is in range.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(MnaSimError::solver_param("max_iterations must be at least 1"));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(MnaSimError::solver_param(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(MnaSimError::solver_param(format!(
                "damping must be in (0, 1], got {}",
                self.damping
            )));
        }
        Ok(())
    }
}
