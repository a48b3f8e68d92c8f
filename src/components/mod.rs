//! Component models for DC analysis.
//!
//! This module provides models for all supported circuit components:
//! - Linear: Resistor, Capacitor, Inductor
//! - Sources: Voltage Source, Current Source
//!
//! Each component yields a [`Contribution`]: the matrix and vector stamps it
//! adds to the MNA system.

mod linear;
mod sources;
mod stamp;

pub use linear::{Capacitor, Inductor, Resistor};
pub use sources::{CurrentSource, VoltageSource};
pub use stamp::{Contribution, MatrixStamp, VectorStamp};

use crate::circuit::{VarIndex, VariableAllocator};
use crate::error::{MnaSimError, Result};
use crate::netlist::{ComponentDef, ComponentType};

/// Voltage across and current through a component after analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingPoint {
    /// Voltage drop from the positive to the negative terminal (V)
    pub voltage_drop: f64,
    /// Current through the component (A)
    pub current: f64,
}

/// A circuit component.
#[derive(Debug, Clone)]
pub enum Component {
    Resistor(Resistor),
    Capacitor(Capacitor),
    Inductor(Inductor),
    VoltageSource(VoltageSource),
    CurrentSource(CurrentSource),
}

impl Component {
    /// Create a component from a netlist definition.
    ///
    /// Components with a branch current draw their extra variable from
    /// `allocator`, so all node variables must be allocated first.
    pub fn from_def(
        def: &ComponentDef,
        nodes: [VarIndex; 2],
        allocator: &mut VariableAllocator,
    ) -> Result<Self> {
        if !def.value.is_finite() {
            return Err(MnaSimError::invalid_param(
                &def.name,
                "value",
                format!("must be finite, got {}", def.value),
            ));
        }

        let name = def.name.clone();
        let component = match def.component_type {
            ComponentType::Resistor => {
                if def.value == 0.0 {
                    return Err(MnaSimError::invalid_param(
                        &def.name,
                        "resistance",
                        "must be non-zero",
                    ));
                }
                Component::Resistor(Resistor::new(name, nodes, def.value))
            }
            ComponentType::Capacitor => Component::Capacitor(Capacitor::new(name, nodes, def.value)),
            ComponentType::Inductor => {
                let branch = allocator.next_index();
                Component::Inductor(Inductor::new(name, nodes, def.value, branch))
            }
            ComponentType::VoltageSource => {
                let branch = allocator.next_index();
                Component::VoltageSource(VoltageSource::new(name, nodes, def.value, branch))
            }
            ComponentType::CurrentSource => {
                Component::CurrentSource(CurrentSource::new(name, nodes, def.value))
            }
        };
        Ok(component)
    }

    /// Get the component name.
    pub fn name(&self) -> &str {
        match self {
            Component::Resistor(r) => &r.name,
            Component::Capacitor(c) => &c.name,
            Component::Inductor(l) => &l.name,
            Component::VoltageSource(v) => &v.name,
            Component::CurrentSource(i) => &i.name,
        }
    }

    /// Terminal variables: [positive, negative].
    pub fn nodes(&self) -> [VarIndex; 2] {
        match self {
            Component::Resistor(r) => r.nodes,
            Component::Capacitor(c) => c.nodes,
            Component::Inductor(l) => l.nodes,
            Component::VoltageSource(v) => v.nodes,
            Component::CurrentSource(i) => i.nodes,
        }
    }

    pub fn component_type(&self) -> ComponentType {
        match self {
            Component::Resistor(_) => ComponentType::Resistor,
            Component::Capacitor(_) => ComponentType::Capacitor,
            Component::Inductor(_) => ComponentType::Inductor,
            Component::VoltageSource(_) => ComponentType::VoltageSource,
            Component::CurrentSource(_) => ComponentType::CurrentSource,
        }
    }

    /// The netlist value in base SI units.
    pub fn value(&self) -> f64 {
        match self {
            Component::Resistor(r) => r.resistance,
            Component::Capacitor(c) => c.capacitance,
            Component::Inductor(l) => l.inductance,
            Component::VoltageSource(v) => v.voltage,
            Component::CurrentSource(i) => i.current,
        }
    }

    /// The extra variable holding this component's branch current, if any.
    pub fn branch(&self) -> Option<VarIndex> {
        match self {
            Component::Inductor(l) => Some(l.branch),
            Component::VoltageSource(v) => Some(v.branch),
            _ => None,
        }
    }

    /// The stamps this component adds to the MNA system.
    pub fn contribution(&self) -> Contribution {
        match self {
            Component::Resistor(r) => r.contribution(),
            Component::Capacitor(c) => c.contribution(),
            Component::Inductor(l) => l.contribution(),
            Component::VoltageSource(v) => v.contribution(),
            Component::CurrentSource(i) => i.contribution(),
        }
    }

    /// Derive the operating point from a solution vector.
    ///
    /// `solution[0]` is ground; indices beyond the vector read as 0.0.
    pub fn operating_point(&self, solution: &[f64]) -> OperatingPoint {
        let value_at = |idx: VarIndex| solution.get(idx.index()).copied().unwrap_or(0.0);
        let [pos, neg] = self.nodes();
        let drop = value_at(pos) - value_at(neg);
        match self {
            Component::Resistor(r) => r.operating_point(drop),
            Component::Capacitor(c) => c.operating_point(drop),
            Component::Inductor(l) => l.operating_point(value_at(l.branch)),
            Component::VoltageSource(v) => v.operating_point(value_at(v.branch)),
            Component::CurrentSource(i) => i.operating_point(drop),
        }
    }
}
