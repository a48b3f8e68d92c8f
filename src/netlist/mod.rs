//! Parser for SPICE-like netlists.
//!
//! The format is line-oriented: one component per line.
//!
//! # Grammar Overview
//!
//! ```text
//! netlist     = [ title ] { line }
//! title       = '*' { any_char }            (first line only)
//! line        = comment | directive | component | empty
//! comment     = '*' { any_char }            (start of line)
//!             | ';' { any_char }            (anywhere)
//! directive   = ".end"
//! component   = name node node [ "DC" ] value
//!
//! name        = type_letter { word_char }
//! type_letter = 'R' | 'C' | 'L' | 'V' | 'I'  (case-insensitive)
//! node        = word                        ("0" is ground)
//! value       = number [unit_suffix]
//!
//! number      = ['-'|'+'] digit* ['.' digit*] [('e'|'E') ['-'|'+'] digit+]
//! unit_suffix = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! ```
//!
//! # Component Types
//!
//! | Type | Description | Syntax |
//! |------|-------------|--------|
//! | R | Resistor | `R<name> <n+> <n-> <ohms>` |
//! | C | Capacitor | `C<name> <n+> <n-> <farads>` |
//! | L | Inductor | `L<name> <n+> <n-> <henries>` |
//! | V | Voltage Source | `V<name> <n+> <n-> [DC] <volts>` |
//! | I | Current Source | `I<name> <n+> <n-> [DC] <amperes>` |
//!
//! A current source `I1 a b 1m` drives 1 mA from `a` through the source
//! into `b`.
//!
//! # Example
//!
//! ```text
//! * Voltage Divider
//! V1 1 0 10
//! R1 1 2 1k
//! R2 2 0 1k   ; load
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::{Parser, GROUND_NAME};

use crate::error::Result;

/// Parse a netlist string into an AST.
pub fn parse(input: &str) -> Result<CircuitAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer)?;
    let mut ast = parser.parse()?;
    if let Some(title) = parse_title(input) {
        ast.title = title;
    }
    Ok(ast)
}

/// Parse a netlist file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<CircuitAst> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::MnaSimError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}

/// Title from a leading `*` line, if any.
fn parse_title(input: &str) -> Option<String> {
    let first = input.lines().map(str::trim).find(|l| !l.is_empty())?;
    let title = first.strip_prefix('*')?.trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}
