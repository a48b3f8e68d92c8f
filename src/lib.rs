//! # MnaSim Core
//!
//! A DC circuit analyzer for SPICE-like netlists.
//!
//! This library provides:
//! - A parser for a small SPICE-like netlist format (R, C, L, V, I)
//! - Modified Nodal Analysis (MNA) assembly into a sparse system
//! - A modified Gauss-Seidel solver that re-pivots the zero-diagonal rows
//!   voltage sources and inductors introduce
//! - Plain-text reports of the circuit, the MNA system and the solution
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`netlist`] - Lexer and parser for the netlist format
//! - [`circuit`] - Circuit representation, variable allocation and validation
//! - [`components`] - Component models and the stamps they emit
//! - [`solver`] - MNA assembly, the Gauss-Seidel solver and the DC driver
//! - [`report`] - Text rendering of circuits and results
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! mnasim divider.cir -o results.log -v
//! ```
//!
//! ### Library
//!
//! ```
//! use mnasim_core::{netlist, Circuit, Simulator};
//!
//! let ast = netlist::parse("V1 1 0 10\nR1 1 2 1k\nR2 2 0 1k").unwrap();
//! let circuit = Circuit::from_ast(ast).unwrap();
//!
//! let mut sim = Simulator::new();
//! let solution = sim.run_dc_analysis(&circuit).unwrap();
//! assert!(solution.converged());
//! assert!((solution.voltage("2").unwrap() - 5.0).abs() < 1e-5);
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmDcAnalyzer } from 'mnasim_core';
//!
//! const analyzer = new WasmDcAnalyzer(netlist);
//! analyzer.solve();
//! ```
//!
//! ## Analysis Method
//!
//! At DC capacitors are open circuits and inductors are short circuits.
//!
//! 1. Every node and every voltage source / inductor current gets a variable
//!    index (ground is 0)
//! 2. Component stamps are accumulated into a sparse system `A x = b`
//! 3. `A x = b` is solved iteratively; rows with a zero diagonal solve for
//!    another variable instead
//! 4. The solution vector is mapped back onto nodes and components

pub mod circuit;
pub mod components;
pub mod error;
pub mod netlist;
pub mod report;
pub mod solver;

// Re-export main types for convenience
pub use circuit::Circuit;
pub use error::{MnaSimError, Result};
pub use solver::{DcSolution, Simulator, SolverConfig};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmDcAnalyzer;
