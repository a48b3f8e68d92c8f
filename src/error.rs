//! Error types for the MnaSim DC analyzer.
//!
//! This module provides a unified error type [`MnaSimError`] that covers
//! netlist parsing, circuit construction and validation, solver
//! configuration, and file I/O.
//!
//! The assembler and the Gauss-Seidel solver have no error paths of their
//! own: a system that fails to converge is reported through
//! [`SolveReport::converged`](crate::solver::SolveReport), not through this
//! type.

use thiserror::Error;

/// Result type alias using [`MnaSimError`].
pub type Result<T> = std::result::Result<T, MnaSimError>;

/// Unified error type for all MnaSim operations.
#[derive(Error, Debug)]
pub enum MnaSimError {
    // ============ Netlist Parsing Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Invalid component definition
    #[error("Invalid component '{name}' at line {line}: {message}")]
    InvalidComponent {
        name: String,
        line: usize,
        message: String,
    },

    /// Unknown component type letter
    #[error("Unknown component type '{component_type}' at line {line}")]
    UnknownComponentType { component_type: String, line: usize },

    /// Invalid parameter value
    #[error("Invalid parameter '{param}' for component '{component}': {message}")]
    InvalidParameter {
        component: String,
        param: String,
        message: String,
    },

    /// Duplicate component name
    #[error("Duplicate component name '{name}' at line {line}")]
    DuplicateComponent { name: String, line: usize },

    // ============ Circuit Validation Errors ============
    /// Missing ground node
    #[error("Circuit has no ground reference (no component touches node '0')")]
    MissingGround,

    /// Invalid circuit topology
    #[error("Invalid circuit topology: {message}")]
    InvalidTopology { message: String },

    // ============ Solver Configuration Errors ============
    /// Invalid solver parameter
    #[error("Invalid solver parameter: {message}")]
    InvalidSolverParam { message: String },

    // ============ I/O Errors ============
    /// Error reading netlist file
    #[error("Failed to read netlist file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing the results file
    #[error("Failed to write results to '{path}': {source}")]
    OutputWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl MnaSimError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid component error
    pub fn invalid_component(name: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::InvalidComponent {
            name: name.into(),
            line,
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_param(
        component: impl Into<String>,
        param: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            component: component.into(),
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create an invalid topology error
    pub fn topology(message: impl Into<String>) -> Self {
        Self::InvalidTopology {
            message: message.into(),
        }
    }

    /// Create an invalid solver parameter error
    pub fn solver_param(message: impl Into<String>) -> Self {
        Self::InvalidSolverParam {
            message: message.into(),
        }
    }
}
