//! DC analysis driver.

use std::time::{Duration, Instant};

use crate::circuit::{validate_circuit, Circuit, VarIndex};
use crate::components::OperatingPoint;
use crate::error::Result;
use crate::netlist::ComponentType;

use super::gauss_seidel::{GaussSeidel, SolveReport};
use super::mna::assemble;
use super::SolverConfig;

/// Solved voltage of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeVoltage {
    pub name: String,
    pub index: VarIndex,
    pub voltage: f64,
}

/// Solved value of one extra (branch current) variable.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchCurrent {
    /// Voltage source or inductor owning the variable
    pub component: String,
    pub index: VarIndex,
    pub current: f64,
}

/// Operating point of one component.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentResult {
    pub name: String,
    pub component_type: ComponentType,
    pub operating_point: OperatingPoint,
}

/// Results of a DC analysis, self-contained so they outlive the circuit.
#[derive(Debug, Clone)]
pub struct DcSolution {
    /// Node voltages in variable index order
    pub node_voltages: Vec<NodeVoltage>,
    /// Branch currents in variable index order
    pub branch_currents: Vec<BranchCurrent>,
    /// Per-component operating points, in netlist order
    pub components: Vec<ComponentResult>,
    /// Raw solver output
    pub report: SolveReport,
    /// Configuration the solver ran with
    pub config: SolverConfig,
    /// Wall-clock time of the solve
    pub elapsed: Duration,
}

impl DcSolution {
    /// Map a solution vector back onto the circuit's nodes and components.
    pub fn deploy(circuit: &Circuit, report: SolveReport, config: SolverConfig, elapsed: Duration) -> Self {
        let value_at = |idx: VarIndex| report.solution.get(idx.index()).copied().unwrap_or(0.0);

        let node_voltages = circuit
            .nodes
            .iter()
            .map(|n| NodeVoltage {
                name: n.name.clone(),
                index: n.index,
                voltage: value_at(n.index),
            })
            .collect();

        let mut branch_currents: Vec<BranchCurrent> = circuit
            .components
            .iter()
            .filter_map(|c| {
                c.branch().map(|index| BranchCurrent {
                    component: c.name().to_string(),
                    index,
                    current: value_at(index),
                })
            })
            .collect();
        branch_currents.sort_by_key(|b| b.index);

        let components = circuit
            .components
            .iter()
            .map(|c| ComponentResult {
                name: c.name().to_string(),
                component_type: c.component_type(),
                operating_point: c.operating_point(&report.solution),
            })
            .collect();

        Self {
            node_voltages,
            branch_currents,
            components,
            report,
            config,
            elapsed,
        }
    }

    /// Voltage of a node by name. Ground reads 0.0.
    pub fn voltage(&self, node: &str) -> Option<f64> {
        if node == crate::netlist::GROUND_NAME {
            return Some(0.0);
        }
        self.node_voltages.iter().find(|n| n.name == node).map(|n| n.voltage)
    }

    /// Current through a component by name.
    pub fn current(&self, component: &str) -> Option<f64> {
        self.operating_point(component).map(|op| op.current)
    }

    /// Operating point of a component by name.
    pub fn operating_point(&self, component: &str) -> Option<OperatingPoint> {
        self.components
            .iter()
            .find(|c| c.name == component)
            .map(|c| c.operating_point)
    }

    pub fn converged(&self) -> bool {
        self.report.converged
    }

    pub fn iterations(&self) -> usize {
        self.report.iterations
    }

    /// The raw solution vector, slot 0 is ground.
    pub fn solution(&self) -> &[f64] {
        &self.report.solution
    }
}

/// Whether a solution is available, borrowed from a [`Simulator`].
#[derive(Debug, Clone, Copy, Default)]
pub enum AnalysisState<'a> {
    /// No analysis has run yet.
    #[default]
    Unsolved,
    /// Results of the last analysis.
    Solved(&'a DcSolution),
}

impl<'a> AnalysisState<'a> {
    pub fn solution(&self) -> Option<&'a DcSolution> {
        match *self {
            AnalysisState::Solved(s) => Some(s),
            AnalysisState::Unsolved => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, AnalysisState::Solved(_))
    }
}

/// The DC circuit analyzer.
#[derive(Debug, Clone)]
pub struct Simulator {
    solver: GaussSeidel,
    solution: Option<DcSolution>,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulator {
    /// Create a simulator with the default solver configuration.
    pub fn new() -> Self {
        Self {
            solver: GaussSeidel::default(),
            solution: None,
        }
    }

    /// Create a simulator with a custom solver configuration.
    pub fn with_config(config: SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            solver: GaussSeidel::new(config),
            solution: None,
        })
    }

    pub fn config(&self) -> &SolverConfig {
        self.solver.config()
    }

    /// Validate, assemble and solve `circuit`.
    ///
    /// A solve that runs out of iterations still yields a solution; check
    /// [`DcSolution::converged`].
    pub fn run_dc_analysis(&mut self, circuit: &Circuit) -> Result<&DcSolution> {
        validate_circuit(circuit)?;

        let system = assemble(circuit);
        let start = Instant::now();
        let report = self.solver.solve(&system);
        let elapsed = start.elapsed();

        log::debug!(
            "DC analysis of '{}': {} iterations, converged: {}, {} us",
            circuit.title,
            report.iterations,
            report.converged,
            elapsed.as_micros()
        );

        let solution = DcSolution::deploy(circuit, report, self.solver.config().clone(), elapsed);
        let solution: &DcSolution = self.solution.insert(solution);
        Ok(solution)
    }

    /// Current analysis state.
    pub fn state(&self) -> AnalysisState<'_> {
        match &self.solution {
            Some(solution) => AnalysisState::Solved(solution),
            None => AnalysisState::Unsolved,
        }
    }

    /// Results of the last analysis, if any.
    pub fn solution(&self) -> Option<&DcSolution> {
        self.solution.as_ref()
    }

    /// Get the solved voltage at a named node.
    pub fn node_voltage(&self, name: &str) -> Option<f64> {
        self.solution()?.voltage(name)
    }

    /// Discard the last results.
    pub fn reset(&mut self) {
        self.solution = None;
    }
}
