//! WASM bindings for MnaSim.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmDcAnalyzer } from 'mnasim_core';
//!
//! await init();
//!
//! const netlist = `
//! * Voltage Divider
//! V1 1 0 10
//! R1 1 2 1k
//! R2 2 0 1k
//! `;
//!
//! const analyzer = new WasmDcAnalyzer(netlist);
//! analyzer.solve();
//! console.log(analyzer.node_voltage("2"), analyzer.converged);
//! ```

use wasm_bindgen::prelude::*;

use crate::circuit::Circuit;
use crate::error::MnaSimError;
use crate::netlist;
use crate::report::ResultsReport;
use crate::solver::{Simulator, SolverConfig};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(e: MnaSimError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-compatible DC circuit analyzer.
///
/// Wraps a parsed [`Circuit`] and a [`Simulator`].
#[wasm_bindgen]
pub struct WasmDcAnalyzer {
    circuit: Circuit,
    simulator: Simulator,
}

#[wasm_bindgen]
impl WasmDcAnalyzer {
    /// Parse, build and validate a netlist with the default solver settings.
    #[wasm_bindgen(constructor)]
    pub fn new(netlist: &str) -> Result<WasmDcAnalyzer, JsValue> {
        let defaults = SolverConfig::default();
        Self::with_config(netlist, defaults.max_iterations, defaults.tolerance, defaults.damping)
    }

    /// Create an analyzer with custom Gauss-Seidel settings.
    ///
    /// # Arguments
    /// * `netlist` - The circuit in SPICE-like netlist format
    /// * `max_iterations` - Iteration budget (default: 1000)
    /// * `tolerance` - Absolute residual tolerance (default: 1e-9)
    /// * `damping` - Damping factor in (0, 1] (default: 0.1)
    #[wasm_bindgen]
    pub fn with_config(
        netlist: &str,
        max_iterations: usize,
        tolerance: f64,
        damping: f64,
    ) -> Result<WasmDcAnalyzer, JsValue> {
        let ast = netlist::parse(netlist).map_err(to_js)?;
        let circuit = Circuit::from_ast(ast).map_err(to_js)?;
        crate::circuit::validate_circuit(&circuit).map_err(to_js)?;

        let config = SolverConfig::new()
            .with_max_iterations(max_iterations)
            .with_tolerance(tolerance)
            .with_damping(damping);
        let simulator = Simulator::with_config(config).map_err(to_js)?;

        Ok(WasmDcAnalyzer { circuit, simulator })
    }

    /// Run the DC analysis. Returns whether it converged.
    #[wasm_bindgen]
    pub fn solve(&mut self) -> Result<bool, JsValue> {
        let solution = self.simulator.run_dc_analysis(&self.circuit).map_err(to_js)?;
        Ok(solution.converged())
    }

    /// The solved voltage at a named node, or `undefined` if the node
    /// doesn't exist or no analysis has run.
    #[wasm_bindgen]
    pub fn node_voltage(&self, node_name: &str) -> Option<f64> {
        self.simulator.node_voltage(node_name)
    }

    /// The current through a named component, if solved.
    #[wasm_bindgen]
    pub fn component_current(&self, name: &str) -> Option<f64> {
        self.simulator.solution()?.current(name)
    }

    #[wasm_bindgen(getter)]
    pub fn converged(&self) -> bool {
        self.simulator.solution().is_some_and(|s| s.converged())
    }

    #[wasm_bindgen(getter)]
    pub fn iterations(&self) -> usize {
        self.simulator.solution().map_or(0, |s| s.iterations())
    }

    /// The raw solution vector (slot 0 is ground), empty before solving.
    #[wasm_bindgen]
    pub fn solution(&self) -> Vec<f64> {
        self.simulator
            .solution()
            .map(|s| s.solution().to_vec())
            .unwrap_or_default()
    }

    /// Circuit and solution reports as text.
    #[wasm_bindgen]
    pub fn report(&self) -> String {
        ResultsReport::new(&self.circuit, self.simulator.state(), false).to_string()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
