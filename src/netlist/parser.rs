//! Parser for the netlist format.

use std::collections::HashSet;

use super::ast::*;
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::error::{MnaSimError, Result};

/// Name of the ground node.
pub const GROUND_NAME: &str = "0";

/// Parser for netlists.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(lexer: Lexer<'a>) -> Result<Self> {
        let mut lexer = lexer;
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse the entire netlist.
    pub fn parse(&mut self) -> Result<CircuitAst> {
        let mut ast = CircuitAst::new();
        let mut seen_nodes = HashSet::new();
        let mut seen_names = HashSet::new();

        while self.current.kind != TokenKind::Eof {
            match self.current.kind {
                TokenKind::Newline => {
                    self.advance()?;
                    continue;
                }
                TokenKind::Directive => {
                    if self.current.text.eq_ignore_ascii_case(".end") {
                        break;
                    }
                    return Err(MnaSimError::parse(
                        self.current.line,
                        format!("unknown directive: {}", self.current.text),
                    ));
                }
                TokenKind::Identifier => {
                    let component = self.parse_component()?;
                    if !seen_names.insert(component.name.clone()) {
                        return Err(MnaSimError::DuplicateComponent {
                            name: component.name,
                            line: component.line,
                        });
                    }
                    for node in &component.nodes {
                        if node != GROUND_NAME && seen_nodes.insert(node.clone()) {
                            ast.nodes.push(node.clone());
                        }
                    }
                    ast.components.push(component);
                }
                TokenKind::Number => {
                    return Err(MnaSimError::parse(
                        self.current.line,
                        format!("expected component name, got {:?}", self.current.text),
                    ));
                }
                TokenKind::Eof => break,
            }
        }

        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn at_line_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Newline | TokenKind::Eof)
    }

    fn expect_node(&mut self, name: &str, line: usize, found: usize) -> Result<String> {
        match self.current.kind {
            TokenKind::Identifier | TokenKind::Number => {
                let node = self.current.text.clone();
                self.advance()?;
                Ok(node)
            }
            _ => Err(MnaSimError::invalid_component(
                name,
                line,
                format!("expected 2 nodes, got {}", found),
            )),
        }
    }

    fn parse_component(&mut self) -> Result<ComponentDef> {
        let name = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        let first_char = name.chars().next().unwrap_or('?');
        let component_type = ComponentType::from_prefix(first_char).ok_or_else(|| {
            MnaSimError::UnknownComponentType {
                component_type: name.clone(),
                line,
            }
        })?;

        // Numeric node names such as "1" lex as numbers
        let pos = self.expect_node(&name, line, 0)?;
        let neg = self.expect_node(&name, line, 1)?;

        // Optional DC keyword for sources
        if component_type.is_source()
            && self.current.kind == TokenKind::Identifier
            && self.current.text.eq_ignore_ascii_case("DC")
        {
            self.advance()?;
        }

        if self.at_line_end() {
            return Err(MnaSimError::invalid_component(&name, line, "missing value"));
        }
        let value_text = self.current.text.clone();
        let value = match self.current.kind {
            TokenKind::Number => parse_value(&value_text),
            _ => None,
        }
        .ok_or_else(|| {
            MnaSimError::invalid_component(&name, line, format!("invalid value '{}'", value_text))
        })?;
        self.advance()?;

        if !self.at_line_end() {
            return Err(MnaSimError::invalid_component(
                &name,
                line,
                format!("unexpected token '{}'", self.current.text),
            ));
        }

        Ok(ComponentDef {
            component_type,
            name,
            nodes: [pos, neg],
            value,
            line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<CircuitAst> {
        super::super::parse(input)
    }

    #[test]
    fn test_parse_resistor() {
        let ast = parse("R1 in out 10k").unwrap();
        assert_eq!(ast.components.len(), 1);
        assert_eq!(ast.components[0].component_type, ComponentType::Resistor);
        assert_eq!(ast.components[0].name, "R1");
        assert_eq!(ast.components[0].nodes, ["in".to_string(), "out".to_string()]);
        assert_eq!(ast.components[0].value, 10_000.0);
    }

    #[test]
    fn test_parse_mixed_case_types() {
        let ast = parse("v1 1 0 5\nr1 1 2 1k\ni1 0 2 1m\nl1 2 3 1u\nc1 3 0 1n").unwrap();
        let types: Vec<_> = ast.components.iter().map(|c| c.component_type).collect();
        assert_eq!(
            types,
            vec![
                ComponentType::VoltageSource,
                ComponentType::Resistor,
                ComponentType::CurrentSource,
                ComponentType::Inductor,
                ComponentType::Capacitor,
            ]
        );
        assert_eq!(ast.components[0].name, "v1");
    }

    #[test]
    fn test_nodes_in_order_of_appearance() {
        let ast = parse("V1 b 0 1\nR1 b a 1\nR2 a 0 1\nR3 c b 1").unwrap();
        assert_eq!(ast.nodes, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_parse_with_comments() {
        let input = "* Simple Circuit\n* another comment line\n\nV1 1 0 10 ; the source\nR1 1 0 1k\n";
        let ast = parse(input).unwrap();
        assert_eq!(ast.title, "Simple Circuit");
        assert_eq!(ast.components.len(), 2);
    }

    #[test]
    fn test_default_title() {
        let ast = parse("R1 1 0 1k").unwrap();
        assert_eq!(ast.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_dc_keyword() {
        let ast = parse("V1 1 0 DC 3.3\nI1 0 1 dc 2m").unwrap();
        assert_eq!(ast.components[0].value, 3.3);
        assert!((ast.components[1].value - 2e-3).abs() < 1e-15);
    }

    #[test]
    fn test_end_directive_stops_parsing() {
        let ast = parse("R1 1 0 1k\n.END\nR2 1 0 1k").unwrap();
        assert_eq!(ast.components.len(), 1);
    }

    #[test]
    fn test_unknown_directive() {
        let err = parse(".tran 1n 1u").unwrap_err();
        assert!(matches!(err, MnaSimError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_unknown_component_type() {
        let err = parse("R1 1 0 1k\nQ1 1 2 3").unwrap_err();
        assert!(matches!(err, MnaSimError::UnknownComponentType { line: 2, .. }));
    }

    #[test]
    fn test_missing_value() {
        let err = parse("R1 1 0").unwrap_err();
        assert!(matches!(err, MnaSimError::InvalidComponent { line: 1, .. }));
    }

    #[test]
    fn test_missing_node() {
        let err = parse("R1 1\n").unwrap_err();
        assert!(matches!(err, MnaSimError::InvalidComponent { .. }));
    }

    #[test]
    fn test_non_numeric_value() {
        let err = parse("R1 1 0 big").unwrap_err();
        assert!(matches!(err, MnaSimError::InvalidComponent { .. }));
    }

    #[test]
    fn test_trailing_tokens() {
        let err = parse("R1 1 0 1k 2k").unwrap_err();
        assert!(matches!(err, MnaSimError::InvalidComponent { .. }));
    }

    #[test]
    fn test_duplicate_component() {
        let err = parse("R1 1 0 1k\nR1 1 0 2k").unwrap_err();
        assert!(matches!(err, MnaSimError::DuplicateComponent { line: 2, .. }));
    }
}
