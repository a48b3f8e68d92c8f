//! Circuit graph structure.

use std::collections::HashMap;

use super::alloc::VariableAllocator;
use super::types::{Node, VarIndex};
use crate::components::Component;
use crate::netlist::{CircuitAst, GROUND_NAME};
use crate::error::{MnaSimError, Result};

/// A complete circuit ready for analysis.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// Circuit title
    pub title: String,

    /// All non-ground nodes, in variable index order
    pub nodes: Vec<Node>,

    /// All components, in netlist order
    pub components: Vec<Component>,

    /// Mapping from node names to variable indices (includes ground)
    node_map: HashMap<String, VarIndex>,

    /// Length of the solution vector (ground slot included)
    solution_len: usize,
}

impl Circuit {
    /// Build a circuit from a parsed AST.
    ///
    /// Node variables are allocated first, in order of first appearance, then
    /// one extra variable per voltage source and inductor in netlist order.
    pub fn from_ast(ast: CircuitAst) -> Result<Self> {
        let mut allocator = VariableAllocator::new();
        let mut node_map = HashMap::new();
        let mut nodes = Vec::new();

        // Ground is always variable 0
        node_map.insert(GROUND_NAME.to_string(), VarIndex::GROUND);

        // The parser lists every non-ground terminal once, in order of appearance
        for node_name in &ast.nodes {
            if !node_map.contains_key(node_name) {
                let index = allocator.next_index();
                node_map.insert(node_name.clone(), index);
                nodes.push(Node {
                    name: node_name.clone(),
                    index,
                });
            }
        }

        let mut components = Vec::with_capacity(ast.components.len());
        for comp_def in &ast.components {
            let [pos, neg] = &comp_def.nodes;
            let resolve = |name: &String| {
                node_map.get(name).copied().ok_or_else(|| {
                    MnaSimError::invalid_component(&comp_def.name, comp_def.line, format!("unknown node '{}'", name))
                })
            };
            let terminals = [resolve(pos)?, resolve(neg)?];

            let component = Component::from_def(comp_def, terminals, &mut allocator)?;
            components.push(component);
        }

        log::debug!(
            "built circuit '{}': {} nodes, {} components, {} variables",
            ast.title,
            nodes.len(),
            components.len(),
            allocator.len()
        );

        Ok(Circuit {
            title: ast.title,
            nodes,
            components,
            node_map,
            solution_len: allocator.len(),
        })
    }

    /// Length of the solution vector: every variable plus the ground slot.
    pub fn solution_len(&self) -> usize {
        self.solution_len
    }

    /// Number of non-ground nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of extra (branch current) variables.
    pub fn num_extra(&self) -> usize {
        self.solution_len - 1 - self.nodes.len()
    }

    /// Find a node's variable index by name.
    pub fn find_node(&self, name: &str) -> Option<VarIndex> {
        self.node_map.get(name).copied()
    }

    /// Get the name of a node variable, or `None` for extras.
    pub fn node_name(&self, index: VarIndex) -> Option<&str> {
        if index.is_ground() {
            return Some(GROUND_NAME);
        }
        self.nodes
            .get(index.index() - 1)
            .filter(|n| n.index == index)
            .map(|n| n.name.as_str())
    }

    /// The component owning an extra variable.
    pub fn branch_owner(&self, index: VarIndex) -> Option<&Component> {
        self.components.iter().find(|c| c.branch() == Some(index))
    }

    /// Human-readable label of a variable: the node name, or `I<name>` for a
    /// branch current.
    pub fn variable_label(&self, index: VarIndex) -> String {
        if let Some(name) = self.node_name(index) {
            return name.to_string();
        }
        match self.branch_owner(index) {
            Some(c) => format!("I{}", c.name()),
            None => index.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist;

    fn build(src: &str) -> Circuit {
        Circuit::from_ast(netlist::parse(src).unwrap()).unwrap()
    }

    #[test]
    fn test_nodes_before_extras() {
        let circuit = build("V1 1 0 10\nL1 1 2 1m\nR1 2 3 1k\nR2 3 0 1k");
        assert_eq!(circuit.num_nodes(), 3);
        assert_eq!(circuit.num_extra(), 2);
        assert_eq!(circuit.solution_len(), 6);
        assert_eq!(circuit.find_node("1"), Some(VarIndex(1)));
        assert_eq!(circuit.find_node("3"), Some(VarIndex(3)));
        assert_eq!(circuit.components[0].branch(), Some(VarIndex(4)));
        assert_eq!(circuit.components[1].branch(), Some(VarIndex(5)));
    }

    #[test]
    fn test_named_nodes_in_order_of_appearance() {
        let circuit = build("R1 out in 1k\nV1 in 0 5\nR2 out 0 1k");
        assert_eq!(circuit.find_node("out"), Some(VarIndex(1)));
        assert_eq!(circuit.find_node("in"), Some(VarIndex(2)));
        assert_eq!(circuit.find_node("0"), Some(VarIndex::GROUND));
        assert_eq!(circuit.find_node("missing"), None);
    }

    #[test]
    fn test_variable_labels() {
        let circuit = build("V1 a 0 10\nR1 a b 1k\nR2 b 0 1k");
        assert_eq!(circuit.variable_label(VarIndex(1)), "a");
        assert_eq!(circuit.variable_label(VarIndex(2)), "b");
        assert_eq!(circuit.variable_label(VarIndex(3)), "IV1");
        assert_eq!(circuit.variable_label(VarIndex::GROUND), "0");
        assert_eq!(circuit.node_name(VarIndex(3)), None);
    }

    #[test]
    fn test_components_in_netlist_order() {
        let circuit = build("R2 1 0 1k\nV1 1 0 5\nC9 1 0 1n\nL1 1 0 1m");
        let names: Vec<&str> = circuit.components.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["R2", "V1", "C9", "L1"]);
        assert_eq!(circuit.branch_owner(VarIndex(2)).map(|c| c.name()), Some("V1"));
        assert_eq!(circuit.branch_owner(VarIndex(3)).map(|c| c.name()), Some("L1"));
    }

    #[test]
    fn test_unlisted_terminal_rejected() {
        let mut ast = netlist::parse("V1 1 0 10\nR1 1 2 1k\nR2 2 0 1k").unwrap();
        ast.nodes.retain(|n| n != "2");
        let err = Circuit::from_ast(ast).unwrap_err();
        assert!(matches!(err, MnaSimError::InvalidComponent { line: 2, .. }));
    }

    #[test]
    fn test_title_carried_over() {
        let circuit = build("* Divider\nV1 1 0 10\nR1 1 0 1k");
        assert_eq!(circuit.title, "Divider");
    }
}
