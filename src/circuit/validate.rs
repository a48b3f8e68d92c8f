//! Circuit validation.

use std::collections::HashMap;

use crate::components::Component;
use crate::error::{MnaSimError, Result};

use super::{Circuit, VarIndex};

/// Validate a circuit for DC analysis.
///
/// Checks:
/// - The circuit has at least one component
/// - Some component touches ground
/// - No voltage source or inductor has both terminals on one node
///
/// Suspicious but solvable topology (a shorted resistor or capacitor, a node
/// with a single connection) is only logged.
pub fn validate_circuit(circuit: &Circuit) -> Result<()> {
    if circuit.components.is_empty() {
        return Err(MnaSimError::topology("Circuit has no components"));
    }

    if !circuit
        .components
        .iter()
        .any(|c| c.nodes().iter().any(VarIndex::is_ground))
    {
        return Err(MnaSimError::MissingGround);
    }

    let mut connections: HashMap<VarIndex, usize> = HashMap::new();
    for component in &circuit.components {
        let [pos, neg] = component.nodes();
        if pos == neg {
            match component {
                Component::VoltageSource(_) | Component::Inductor(_) => {
                    return Err(MnaSimError::topology(format!(
                        "'{}' has both terminals on node '{}'",
                        component.name(),
                        circuit.variable_label(pos)
                    )));
                }
                _ => log::warn!(
                    "'{}' has both terminals on node '{}' and carries no current",
                    component.name(),
                    circuit.variable_label(pos)
                ),
            }
        }
        for node in [pos, neg] {
            *connections.entry(node).or_insert(0) += 1;
        }
    }

    for node in &circuit.nodes {
        if connections.get(&node.index).copied().unwrap_or(0) < 2 {
            log::warn!("node '{}' has only one connection", node.name);
        }
    }

    Ok(())
}
