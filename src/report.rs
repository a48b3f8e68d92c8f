//! Plain-text reports for circuits, MNA systems and DC solutions.
//!
//! Each report is a [`fmt::Display`] wrapper, so it can be written to a file
//! or turned into a `String` with `to_string()`.

use std::fmt;

use crate::circuit::{Circuit, VarIndex};
use crate::components::Component;
use crate::netlist::ComponentType;
use crate::solver::{assemble, AnalysisState, DcSolution, MnaSystem};

const RULE_WIDTH: usize = 40;

fn heavy_rule(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}", "=".repeat(RULE_WIDTH))
}

fn rule(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}", "-".repeat(RULE_WIDTH))
}

/// Banner at the top of the results file.
pub struct Banner;

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = format!("MnaSim DC Analyzer v{}", env!("CARGO_PKG_VERSION"));
        writeln!(f, "╔{}╗", "═".repeat(36))?;
        writeln!(f, "║   {:<33}║", title)?;
        writeln!(f, "║   {:<33}║", "MNA + Modified Gauss-Seidel")?;
        writeln!(f, "╚{}╝", "═".repeat(36))?;
        writeln!(f)
    }
}

/// Title, node table and component table of a circuit.
///
/// Node voltages are filled in when a solution is supplied.
pub struct CircuitReport<'a> {
    pub circuit: &'a Circuit,
    pub solution: Option<&'a DcSolution>,
}

impl<'a> CircuitReport<'a> {
    pub fn new(circuit: &'a Circuit, solution: Option<&'a DcSolution>) -> Self {
        Self { circuit, solution }
    }
}

/// Display value and unit of a component, as listed in the circuit report.
fn display_value(component: &Component) -> (f64, &'static str) {
    let value = component.value();
    match component.component_type() {
        ComponentType::Resistor => (value / 1e3, "kΩ"),
        ComponentType::Capacitor => (value * 1e9, "nF"),
        ComponentType::Inductor => (value * 1e6, "uH"),
        ComponentType::VoltageSource => (value, "V"),
        ComponentType::CurrentSource => (value, "A"),
    }
}

impl fmt::Display for CircuitReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heavy_rule(f)?;
        writeln!(f, "Circuit Name: {}", self.circuit.title)?;
        heavy_rule(f)?;

        writeln!(f, "\nCircuit Nodes:")?;
        rule(f)?;
        writeln!(f, "{:<10}{:>14}", "Node(ID)", "Voltage")?;
        rule(f)?;
        for node in &self.circuit.nodes {
            let label = format!("Node({})", node.name);
            match self.solution.and_then(|s| s.voltage(&node.name)) {
                Some(v) => writeln!(f, "{:<10}{:>14.6} V", label, v)?,
                None => writeln!(f, "{:<10}{:>14}", label, "--")?,
            }
        }

        writeln!(f, "\nCircuit Components:")?;
        rule(f)?;
        writeln!(f, "{:<10}{:<6}{:<6}{:>12} Unit", "T(ID)", "(+)", "(-)", "Value")?;
        rule(f)?;
        for component in &self.circuit.components {
            let [pos, neg] = component.nodes();
            let (value, unit) = display_value(component);
            writeln!(
                f,
                "{:<10}{:<6}{:<6}{:>12.4} {}",
                format!("{}({})", component.component_type().letter(), component.name()),
                self.circuit.variable_label(pos),
                self.circuit.variable_label(neg),
                value,
                unit
            )?;
        }
        Ok(())
    }
}

/// The assembled system as a dense table: one row per variable, then `| RHS`.
pub struct MnaDisplay<'a> {
    pub circuit: &'a Circuit,
    pub system: &'a MnaSystem,
}

impl<'a> MnaDisplay<'a> {
    pub fn new(circuit: &'a Circuit, system: &'a MnaSystem) -> Self {
        Self { circuit, system }
    }
}

impl fmt::Display for MnaDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.system.size();
        let labels: Vec<String> = (1..size)
            .map(|i| self.circuit.variable_label(VarIndex(i)))
            .collect();

        writeln!(f, "MNA System:")?;
        rule(f)?;
        write!(f, "{:<8}  ", "")?;
        for label in &labels {
            write!(f, "{:>12}", label)?;
        }
        writeln!(f, "   | {:>10}", "RHS")?;

        for (row, label) in (1..size).zip(&labels) {
            write!(f, "{:<8}[ ", label)?;
            for col in 1..size {
                write!(f, "{:>12.6}", self.system.get(row, col).unwrap_or(0.0))?;
            }
            writeln!(f, " ] [ {:>10.6} ]", self.system.rhs(row))?;
        }
        writeln!(f)
    }
}

/// Results of a DC analysis, or a notice that none is available.
pub struct SolutionReport<'a>(pub AnalysisState<'a>);

impl fmt::Display for SolutionReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(solution) = self.0.solution() else {
            return writeln!(f, "No solution available. Please run DC analysis first.");
        };

        writeln!(f, "DC Operating Point:")?;
        rule(f)?;
        for node in &solution.node_voltages {
            writeln!(f, "  {:<14}{:>16.6} V", format!("V({})", node.name), node.voltage)?;
        }
        for branch in &solution.branch_currents {
            writeln!(f, "  {:<14}{:>16.6} A", format!("I({})", branch.component), branch.current)?;
        }

        writeln!(f, "\nComponent Operating Points:")?;
        rule(f)?;
        writeln!(f, "  {:<12}{:>14}{:>14}", "Component", "Drop (V)", "Current (A)")?;
        for c in &solution.components {
            writeln!(
                f,
                "  {:<12}{:>14.6}{:>14.6e}",
                c.name, c.operating_point.voltage_drop, c.operating_point.current
            )?;
        }

        writeln!(f, "\nModified Gauss-Seidel Configuration:")?;
        rule(f)?;
        writeln!(f, "  Max Iterations: {}", solution.config.max_iterations)?;
        writeln!(f, "  Tolerance: {:e}", solution.config.tolerance)?;
        writeln!(f, "  Damping Factor: {:.6}", solution.config.damping)?;

        writeln!(f, "\nGauss-Seidel Status:")?;
        rule(f)?;
        writeln!(f, "  Converged: {}", if solution.converged() { "Yes" } else { "No" })?;
        writeln!(f, "  Iterations Taken: {}", solution.iterations())?;
        writeln!(f, "  Final Residual: {:e}", solution.report.residual)?;
        writeln!(f, "  Time Taken: {} microseconds", solution.elapsed.as_micros())
    }
}

/// Everything after the banner in a results file: the circuit report, the
/// MNA system when requested, then the solution report.
pub struct ResultsReport<'a> {
    pub circuit: &'a Circuit,
    pub state: AnalysisState<'a>,
    pub include_mna: bool,
}

impl<'a> ResultsReport<'a> {
    pub fn new(circuit: &'a Circuit, state: AnalysisState<'a>, include_mna: bool) -> Self {
        Self {
            circuit,
            state,
            include_mna,
        }
    }
}

impl fmt::Display for ResultsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", CircuitReport::new(self.circuit, self.state.solution()))?;
        if self.include_mna {
            let system = assemble(self.circuit);
            write!(f, "{}", MnaDisplay::new(self.circuit, &system))?;
        }
        write!(f, "{}", SolutionReport(self.state))
    }
}
