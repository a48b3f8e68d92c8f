//! Linear passive components: Resistor, Capacitor, Inductor.
//!
//! At DC a capacitor is an open circuit and an inductor is a short circuit.
//! The inductor still carries a branch current variable so its current can be
//! reported.

use super::stamp::Contribution;
use super::OperatingPoint;
use crate::circuit::VarIndex;

/// A resistor component.
#[derive(Debug, Clone)]
pub struct Resistor {
    pub name: String,
    pub nodes: [VarIndex; 2], // [positive, negative]
    pub resistance: f64,
}

impl Resistor {
    /// Create a new resistor.
    pub fn new(name: String, nodes: [VarIndex; 2], resistance: f64) -> Self {
        Self {
            name,
            nodes,
            resistance,
        }
    }

    /// Get the conductance (1/R).
    pub fn conductance(&self) -> f64 {
        1.0 / self.resistance
    }

    /// Conductance stamp between the two terminals.
    pub fn contribution(&self) -> Contribution {
        let mut c = Contribution::new();
        c.stamp_conductance(self.nodes[0], self.nodes[1], self.conductance());
        c
    }

    /// Ohm's law across the terminals.
    pub fn operating_point(&self, drop: f64) -> OperatingPoint {
        OperatingPoint {
            voltage_drop: drop,
            current: drop / self.resistance,
        }
    }
}

/// A capacitor component (open circuit at DC).
#[derive(Debug, Clone)]
pub struct Capacitor {
    pub name: String,
    pub nodes: [VarIndex; 2],
    pub capacitance: f64,
}

impl Capacitor {
    /// Create a new capacitor.
    pub fn new(name: String, nodes: [VarIndex; 2], capacitance: f64) -> Self {
        Self {
            name,
            nodes,
            capacitance,
        }
    }

    /// A capacitor adds no stamps at DC.
    pub fn contribution(&self) -> Contribution {
        Contribution::new()
    }

    pub fn operating_point(&self, drop: f64) -> OperatingPoint {
        OperatingPoint {
            voltage_drop: drop,
            current: 0.0,
        }
    }
}

/// An inductor component (short circuit at DC).
///
/// Stamped like a 0 V voltage source so its branch current is an unknown of
/// the system.
#[derive(Debug, Clone)]
pub struct Inductor {
    pub name: String,
    pub nodes: [VarIndex; 2],
    pub inductance: f64,
    pub branch: VarIndex,
}

impl Inductor {
    /// Create a new inductor.
    pub fn new(
        name: String,
        nodes: [VarIndex; 2],
        inductance: f64,
        branch: VarIndex,
    ) -> Self {
        Self {
            name,
            nodes,
            inductance,
            branch,
        }
    }

    /// Branch incidence stamp, no source term.
    pub fn contribution(&self) -> Contribution {
        let mut c = Contribution::new();
        c.stamp_branch(self.nodes[0], self.nodes[1], self.branch);
        c
    }

    pub fn operating_point(&self, branch_current: f64) -> OperatingPoint {
        OperatingPoint {
            voltage_drop: 0.0,
            current: branch_current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::stamp::MatrixStamp;

    #[test]
    fn test_resistor_conductance() {
        let r = Resistor::new(
            "R1".to_string(),
            [VarIndex(1), VarIndex::GROUND],
            1000.0,
        );
        assert!((r.conductance() - 0.001).abs() < 1e-10);
    }

    #[test]
    fn test_resistor_stamp_skips_ground() {
        let r = Resistor::new(
            "R1".to_string(),
            [VarIndex::GROUND, VarIndex(2)],
            500.0,
        );
        let c = r.contribution();
        assert_eq!(
            c.matrix,
            vec![MatrixStamp {
                row: VarIndex(2),
                col: VarIndex(2),
                value: 0.002
            }]
        );
        assert!(c.vector.is_empty());
    }

    #[test]
    fn test_resistor_operating_point() {
        let r = Resistor::new("R1".to_string(), [VarIndex(1), VarIndex(2)], 1000.0);
        let op = r.operating_point(5.0);
        assert_eq!(op.voltage_drop, 5.0);
        assert!((op.current - 0.005).abs() < 1e-15);
    }

    #[test]
    fn test_capacitor_is_open_at_dc() {
        let c = Capacitor::new("C1".to_string(), [VarIndex(1), VarIndex(2)], 1e-4);
        assert!(c.contribution().is_empty());
        assert_eq!(c.operating_point(3.0).current, 0.0);
    }

    #[test]
    fn test_inductor_stamp() {
        let l = Inductor::new(
            "L1".to_string(),
            [VarIndex(1), VarIndex(2)],
            0.01,
            VarIndex(3),
        );
        let c = l.contribution();
        assert_eq!(c.matrix.len(), 4);
        assert!(c.vector.is_empty());
        let at = |row: usize, col: usize| {
            c.matrix
                .iter()
                .find(|s| s.row == VarIndex(row) && s.col == VarIndex(col))
                .map(|s| s.value)
        };
        assert_eq!(at(1, 3), Some(1.0));
        assert_eq!(at(3, 1), Some(1.0));
        assert_eq!(at(2, 3), Some(-1.0));
        assert_eq!(at(3, 2), Some(-1.0));
        assert_eq!(at(3, 3), None);
    }
}
