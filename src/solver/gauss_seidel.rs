//! Modified Gauss-Seidel iteration with dynamic re-pivoting.
//!
//! MNA systems always have structurally zero diagonals: the row of a voltage
//! source or inductor current has no self-term. Instead of solving row `i` for
//! `x[i]`, every row solves for a *target* variable. When the coefficient at a
//! row's target is zero or absent, [`resolve_pivot`] picks a replacement among
//! the row's nonzero entries and the two rows involved swap targets. A column
//! that was the only usable choice of some row is *claimed* and is never
//! handed to another row again.
//!
//! Rows whose target still has no usable coefficient are skipped for the
//! sweep, so the update never divides by zero.
//!
//! Updates are damped: `x = w * x_new + (1 - w) * x_old`. Convergence is the
//! absolute residual of every row, checked every
//! [`CONVERGENCE_CHECK_INTERVAL`] sweeps.

use std::collections::BTreeSet;

use super::mna::{MnaSystem, Row};
use super::{SolverConfig, CONVERGENCE_CHECK_INTERVAL};

/// Outcome of [`resolve_pivot`] for one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotDecision {
    /// The current target has a usable nonzero coefficient.
    Keep,
    /// No unclaimed nonzero entry exists; the row must be skipped.
    Unresolved,
    /// Switch this row to `target`. `claim` is set when `target` was the
    /// only candidate.
    Reassign { target: usize, claim: bool },
}

/// Decide which variable a row should solve for.
///
/// Among the row's nonzero, unclaimed columns the one with the largest
/// magnitude wins; on a tie the lowest column is kept.
pub fn resolve_pivot(row: Row<'_>, current: usize, claimed: &BTreeSet<usize>) -> PivotDecision {
    if matches!(row.get(current), Some(v) if v != 0.0) {
        return PivotDecision::Keep;
    }

    let mut best: Option<(usize, f64)> = None;
    let mut candidates = 0usize;
    for (col, value) in row.iter() {
        if value == 0.0 || claimed.contains(&col) {
            continue;
        }
        candidates += 1;
        match best {
            Some((_, max)) if value.abs() <= max => {}
            _ => best = Some((col, value.abs())),
        }
    }

    match best {
        Some((target, _)) => PivotDecision::Reassign {
            target,
            claim: candidates == 1,
        },
        None => PivotDecision::Unresolved,
    }
}

/// Row-to-variable assignment for one solve.
#[derive(Debug, Clone, Default)]
pub struct PivotState {
    targets: Vec<usize>,
    claimed: BTreeSet<usize>,
}

impl PivotState {
    /// Identity assignment: row `i` solves for `x[i]`.
    pub fn new(size: usize) -> Self {
        Self {
            targets: (0..size).collect(),
            claimed: BTreeSet::new(),
        }
    }

    /// The variable row `row` currently solves for.
    pub fn target(&self, row: usize) -> usize {
        self.targets[row]
    }

    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    /// Columns that can no longer be reassigned.
    pub fn claimed(&self) -> &BTreeSet<usize> {
        &self.claimed
    }

    /// Apply a decision to `row`. Returns `true` if its target changed.
    ///
    /// On reassignment the first row currently targeting the new column
    /// takes over this row's old target.
    pub fn apply(&mut self, row: usize, decision: PivotDecision) -> bool {
        let PivotDecision::Reassign { target, claim } = decision else {
            return false;
        };
        if claim {
            self.claimed.insert(target);
        }
        let old = self.targets[row];
        if let Some(other) = self.targets.iter().position(|&t| t == target) {
            self.targets[other] = old;
        }
        self.targets[row] = target;
        true
    }
}

/// Result of a Gauss-Seidel solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveReport {
    /// Dense solution, `solution[0]` is ground and always 0.0
    pub solution: Vec<f64>,
    /// Whether the residual check passed before the iteration budget ran out
    pub converged: bool,
    /// Sweeps performed
    pub iterations: usize,
    /// Largest absolute row residual `|lhs - b|` at exit
    pub residual: f64,
}

/// Modified Gauss-Seidel solver.
///
/// The working state (targets, claimed columns, row left-hand sides and the
/// solution) is reset at the start of every [`solve`](Self::solve).
#[derive(Debug, Clone)]
pub struct GaussSeidel {
    config: SolverConfig,
    pivots: PivotState,
    lhs_values: Vec<f64>,
    solution: Vec<f64>,
}

impl GaussSeidel {
    /// Create a solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            pivots: PivotState::default(),
            lhs_values: Vec::new(),
            solution: Vec::new(),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Row targets left by the last solve.
    pub fn targets(&self) -> &[usize] {
        self.pivots.targets()
    }

    fn initialize(&mut self, size: usize) {
        self.pivots = PivotState::new(size);
        self.lhs_values = vec![0.0; size];
        self.solution = vec![0.0; size];
    }

    /// Iterate on `system` until the residual check passes or the iteration
    /// budget is spent. Non-convergence is reported, not an error.
    pub fn solve(&mut self, system: &MnaSystem) -> SolveReport {
        let size = system.size();
        self.initialize(size);

        let mut converged = false;
        let mut iterations = 0;
        for iteration in 1..=self.config.max_iterations {
            iterations = iteration;
            self.sweep(system);

            if iteration % CONVERGENCE_CHECK_INTERVAL != 0 {
                continue;
            }
            converged = self.is_converged(system);
            log::debug!(
                "iteration {}: residual {:e}{}",
                iteration,
                self.residual(system),
                if converged { " (converged)" } else { "" }
            );
            if converged {
                break;
            }
        }

        let residual = self.residual(system);
        if !converged {
            log::warn!(
                "Gauss-Seidel did not converge after {} iterations (residual {:e})",
                iterations,
                residual
            );
        }

        SolveReport {
            solution: self.solution.clone(),
            converged,
            iterations,
            residual,
        }
    }

    /// One pass over all rows in ascending order.
    fn sweep(&mut self, system: &MnaSystem) {
        for row in 0..system.size() {
            let coeffs = system.row(row);
            if coeffs.is_empty() {
                continue;
            }

            let old = self.pivots.target(row);
            let decision = resolve_pivot(coeffs, old, self.pivots.claimed());
            if self.pivots.apply(row, decision) {
                log::debug!("row {}: target {} -> {}", row, old, self.pivots.target(row));
            }

            let target = self.pivots.target(row);
            match coeffs.get(target) {
                Some(diag) if diag != 0.0 => self.update_row(row, coeffs, target, diag, system.rhs(row)),
                _ => log::trace!("row {}: skipped, no usable pivot", row),
            }
        }
    }

    fn update_row(&mut self, row: usize, coeffs: Row<'_>, target: usize, diag: f64, rhs: f64) {
        let sum: f64 = coeffs
            .iter()
            .filter(|&(col, _)| col != target)
            .map(|(col, value)| value * self.solution[col])
            .sum();

        let x_new = (rhs - sum) / diag;
        let w = self.config.damping;
        self.solution[target] = w * x_new + (1.0 - w) * self.solution[target];
        self.lhs_values[row] = sum + diag * self.solution[target];

        log::trace!("row {}: x[{}] = {}", row, target, self.solution[target]);
    }

    fn is_converged(&self, system: &MnaSystem) -> bool {
        let tol = self.config.tolerance;
        (0..system.size()).all(|i| (self.lhs_values[i] - system.rhs(i)).abs() <= tol)
    }

    fn residual(&self, system: &MnaSystem) -> f64 {
        (0..system.size())
            .map(|i| (self.lhs_values[i] - system.rhs(i)).abs())
            .fold(0.0, f64::max)
    }
}

impl Default for GaussSeidel {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Circuit, VarIndex};
    use crate::netlist;
    use crate::solver::mna::{assemble, SystemAssembler};

    fn system_from(entries: &[(usize, usize, f64)], rhs: &[(usize, f64)]) -> MnaSystem {
        let mut asm = SystemAssembler::new(0);
        for &(r, c, v) in entries {
            asm.add_matrix(VarIndex(r), VarIndex(c), v);
        }
        for &(r, v) in rhs {
            asm.add_rhs(VarIndex(r), v);
        }
        asm.finish()
    }

    fn netlist_system(src: &str) -> MnaSystem {
        assemble(&Circuit::from_ast(netlist::parse(src).unwrap()).unwrap())
    }

    #[test]
    fn test_keep_nonzero_diagonal() {
        let sys = system_from(&[(1, 1, 2.0), (1, 2, 5.0)], &[]);
        assert_eq!(resolve_pivot(sys.row(1), 1, &BTreeSet::new()), PivotDecision::Keep);
    }

    #[test]
    fn test_pick_largest_magnitude() {
        let sys = system_from(&[(3, 1, 1.0), (3, 2, -4.0), (3, 4, 2.0)], &[]);
        assert_eq!(
            resolve_pivot(sys.row(3), 3, &BTreeSet::new()),
            PivotDecision::Reassign { target: 2, claim: false }
        );
    }

    #[test]
    fn test_tie_keeps_first_column() {
        let sys = system_from(&[(3, 1, 1.0), (3, 2, -1.0)], &[]);
        assert_eq!(
            resolve_pivot(sys.row(3), 3, &BTreeSet::new()),
            PivotDecision::Reassign { target: 1, claim: false }
        );
    }

    #[test]
    fn test_single_candidate_is_claimed() {
        let sys = system_from(&[(3, 1, 1.0), (3, 2, -1.0)], &[]);
        let claimed = BTreeSet::from([1]);
        assert_eq!(
            resolve_pivot(sys.row(3), 3, &claimed),
            PivotDecision::Reassign { target: 2, claim: true }
        );
    }

    #[test]
    fn test_unresolved_rows() {
        let sys = system_from(&[(1, 1, 0.0), (2, 1, 1.0)], &[]);
        // Stored zero counts as absent
        assert_eq!(resolve_pivot(sys.row(1), 1, &BTreeSet::new()), PivotDecision::Unresolved);
        // Every candidate already claimed
        assert_eq!(resolve_pivot(sys.row(2), 2, &BTreeSet::from([1])), PivotDecision::Unresolved);
        // Empty row
        assert_eq!(resolve_pivot(sys.row(3), 3, &BTreeSet::new()), PivotDecision::Unresolved);
    }

    #[test]
    fn test_apply_swaps_targets() {
        let mut state = PivotState::new(4);
        assert!(state.apply(3, PivotDecision::Reassign { target: 1, claim: true }));
        assert_eq!(state.targets(), &[0, 3, 2, 1]);
        assert!(state.claimed().contains(&1));
        assert!(!state.apply(2, PivotDecision::Keep));
        assert!(!state.apply(2, PivotDecision::Unresolved));
        assert_eq!(state.targets(), &[0, 3, 2, 1]);
    }

    #[test]
    fn test_lone_voltage_source_is_repivoted() {
        // x1 = node, x2 = source current; row 1 has no self-term
        let sys = system_from(&[(1, 2, 1.0), (2, 1, 1.0)], &[(2, 10.0)]);
        let mut solver = GaussSeidel::default();
        let report = solver.solve(&sys);

        assert!(report.converged);
        assert_eq!(report.iterations % CONVERGENCE_CHECK_INTERVAL, 0);
        assert!((report.solution[1] - 10.0).abs() < 1e-6);
        assert_eq!(report.solution[2], 0.0);
        assert_eq!(report.solution[0], 0.0);
        assert_eq!(solver.targets(), &[0, 2, 1]);
    }

    #[test]
    fn test_voltage_divider() {
        let sys = netlist_system("V1 1 0 10\nR1 1 2 1000\nR2 2 0 1000");
        let report = GaussSeidel::default().solve(&sys);
        assert!(report.converged);
        assert!(report.residual <= 1e-9);
        assert!((report.solution[1] - 10.0).abs() < 1e-5);
        assert!((report.solution[2] - 5.0).abs() < 1e-5);
        assert!((report.solution[3] + 0.005).abs() < 1e-6);
    }

    #[test]
    fn test_all_zero_row_is_skipped() {
        let sys = system_from(&[(1, 1, 1.0), (2, 2, 0.0)], &[(1, 2.0)]);
        let report = GaussSeidel::default().solve(&sys);
        assert!(report.converged);
        assert!(report.solution.iter().all(|v| v.is_finite()));
        assert!((report.solution[1] - 2.0).abs() < 1e-6);
        assert_eq!(report.solution[2], 0.0);
    }

    #[test]
    fn test_claimed_column_not_stolen() {
        let sys = system_from(&[(1, 3, 1.0), (2, 3, 1.0), (3, 1, 1.0), (3, 2, -1.0)], &[(1, 1.0)]);
        let mut solver = GaussSeidel::default();
        let report = solver.solve(&sys);
        assert!(report.solution.iter().all(|v| v.is_finite()));
        // Row 2 never gets column 3, so it is skipped every sweep
        assert_eq!(solver.targets(), &[0, 3, 2, 1]);
        assert_eq!(report.solution[2], 0.0);
    }

    #[test]
    fn test_empty_system_converges_at_first_check() {
        let report = GaussSeidel::default().solve(&MnaSystem::empty(3));
        assert!(report.converged);
        assert_eq!(report.iterations, CONVERGENCE_CHECK_INTERVAL);
        assert_eq!(report.solution, vec![0.0; 3]);
    }

    #[test]
    fn test_budget_exhausted_returns_best_effort() {
        let sys = netlist_system("V1 1 0 10\nR1 1 2 1000\nR2 2 0 1000");
        let config = SolverConfig::default().with_max_iterations(5);
        let report = GaussSeidel::new(config).solve(&sys);
        assert!(!report.converged);
        assert_eq!(report.iterations, 5);
        assert!(report.solution[1] > 0.0 && report.solution[1] < 10.0);
        assert!(report.residual > 1e-9);
    }

    #[test]
    fn test_last_sweep_counts_toward_convergence() {
        // The divider first passes its check at sweep 220
        let sys = netlist_system("V1 1 0 10\nR1 1 2 1000\nR2 2 0 1000");

        let exact = GaussSeidel::new(SolverConfig::default().with_max_iterations(220)).solve(&sys);
        assert!(exact.converged);
        assert_eq!(exact.iterations, 220);

        let short = GaussSeidel::new(SolverConfig::default().with_max_iterations(219)).solve(&sys);
        assert!(!short.converged);
        assert_eq!(short.iterations, 219);
    }

    #[test]
    fn test_repeated_solves_are_identical() {
        let sys = netlist_system("V1 1 0 5\nR1 1 2 2k\nR2 2 0 1k\nL1 2 3 1m\nR3 3 0 3k");
        let mut solver = GaussSeidel::default();
        let first = solver.solve(&sys);
        let second = solver.solve(&sys);
        assert_eq!(first, second);
    }

    #[test]
    fn test_smaller_damping_only_slows_convergence() {
        let sys = netlist_system("I1 0 1 1m\nR1 1 0 1k\nR2 1 2 1k\nR3 2 0 1k");
        let mut last_iterations = 0;
        for damping in [0.5, 0.25, 0.1, 0.05] {
            let config = SolverConfig::default()
                .with_damping(damping)
                .with_max_iterations(5000);
            let report = GaussSeidel::new(config).solve(&sys);
            assert!(report.converged, "damping {} did not converge", damping);
            assert!((report.solution[1] - 2.0 / 3.0).abs() < 1e-5);
            assert!((report.solution[2] - 1.0 / 3.0).abs() < 1e-5);
            assert!(report.iterations >= last_iterations);
            last_iterations = report.iterations;
        }
    }
}
