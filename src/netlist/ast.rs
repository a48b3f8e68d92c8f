//! Abstract Syntax Tree types for the netlist format.

/// Title used when the netlist does not start with a `*` title line.
pub const DEFAULT_TITLE: &str = "Circuit";

/// Complete AST representation of a parsed netlist.
#[derive(Debug, Clone)]
pub struct CircuitAst {
    /// Circuit title (from a leading `*` line)
    pub title: String,
    /// All component instances, in netlist order
    pub components: Vec<ComponentDef>,
    /// Non-ground node names in order of first appearance
    pub nodes: Vec<String>,
}

impl CircuitAst {
    /// Create a new empty circuit AST.
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            components: Vec::new(),
            nodes: Vec::new(),
        }
    }
}

impl Default for CircuitAst {
    fn default() -> Self {
        Self::new()
    }
}

/// A component definition from the netlist.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDef {
    /// Component type, from the first letter of the name
    pub component_type: ComponentType,
    /// Unique component name, kept verbatim (e.g. `R1`, `v_in`)
    pub name: String,
    /// Connected node names: [positive, negative]
    pub nodes: [String; 2],
    /// Component value (ohms, farads, henries, volts, amperes)
    pub value: f64,
    /// Source line number for error reporting
    pub line: usize,
}

/// Component types supported by the netlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// Resistor
    Resistor,
    /// Capacitor
    Capacitor,
    /// Inductor
    Inductor,
    /// Independent voltage source
    VoltageSource,
    /// Independent current source
    CurrentSource,
}

impl ComponentType {
    /// Parse a component type from its netlist prefix letter.
    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix.to_ascii_uppercase() {
            'R' => Some(Self::Resistor),
            'C' => Some(Self::Capacitor),
            'L' => Some(Self::Inductor),
            'V' => Some(Self::VoltageSource),
            'I' => Some(Self::CurrentSource),
            _ => None,
        }
    }

    /// The canonical (upper-case) prefix letter.
    pub fn letter(&self) -> char {
        match self {
            Self::Resistor => 'R',
            Self::Capacitor => 'C',
            Self::Inductor => 'L',
            Self::VoltageSource => 'V',
            Self::CurrentSource => 'I',
        }
    }

    /// Whether a `DC` keyword may precede the value.
    pub fn is_source(&self) -> bool {
        matches!(self, Self::VoltageSource | Self::CurrentSource)
    }
}
