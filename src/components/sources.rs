//! Voltage and current sources.

use super::stamp::Contribution;
use super::OperatingPoint;
use crate::circuit::VarIndex;

/// An independent voltage source.
///
/// Voltage sources require an extra row/column in the MNA matrix for the
/// branch current. The source enforces: V+ - V- = V_source
#[derive(Debug, Clone)]
pub struct VoltageSource {
    pub name: String,
    pub nodes: [VarIndex; 2], // [positive, negative]
    pub voltage: f64,
    pub branch: VarIndex,
}

impl VoltageSource {
    /// Create a new voltage source.
    pub fn new(name: String, nodes: [VarIndex; 2], voltage: f64, branch: VarIndex) -> Self {
        Self {
            name,
            nodes,
            voltage,
            branch,
        }
    }

    /// Branch incidence stamp plus `b[k] += V`.
    pub fn contribution(&self) -> Contribution {
        let mut c = Contribution::new();
        c.stamp_branch(self.nodes[0], self.nodes[1], self.branch);
        c.stamp_vector(self.branch, self.voltage);
        c
    }

    pub fn operating_point(&self, branch_current: f64) -> OperatingPoint {
        OperatingPoint {
            voltage_drop: self.voltage,
            current: branch_current,
        }
    }
}

/// An independent current source.
///
/// Current sources add directly to the RHS vector of the MNA equations.
#[derive(Debug, Clone)]
pub struct CurrentSource {
    pub name: String,
    pub nodes: [VarIndex; 2], // current leaves the first node and enters the second
    pub current: f64,
}

impl CurrentSource {
    /// Create a new current source.
    pub fn new(name: String, nodes: [VarIndex; 2], current: f64) -> Self {
        Self {
            name,
            nodes,
            current,
        }
    }

    pub fn contribution(&self) -> Contribution {
        let mut c = Contribution::new();
        c.stamp_current(self.nodes[0], self.nodes[1], self.current);
        c
    }

    pub fn operating_point(&self, drop: f64) -> OperatingPoint {
        OperatingPoint {
            voltage_drop: drop,
            current: self.current,
        }
    }
}
