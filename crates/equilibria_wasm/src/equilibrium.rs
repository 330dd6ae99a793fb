//! Equilibrium solver runner and config-driven entry point.

use crate::system::state_from_slice;
use crate::{to_js_error, to_js_value};
use anyhow::Context;
use equilibria_core::config::SolverConfig;
use equilibria_core::equilibrium::{
    solve_lotka_volterra as core_solve, EquilibriumSolver, NewtonSettings,
};
use equilibria_core::lotka_volterra::{LotkaVolterra, LotkaVolterraParams};
use js_sys::Float64Array;
use serde_wasm_bindgen::from_value;
use wasm_bindgen::prelude::*;

/// Solves from a config object; absent fields take the classic defaults.
#[wasm_bindgen]
pub fn solve_lotka_volterra(config: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let config: SolverConfig = if config.is_undefined() || config.is_null() {
        SolverConfig::default()
    } else {
        from_value(config).map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
    };

    let report = config
        .validate()
        .and_then(|_| core_solve(config.params, config.initial_guess(), config.settings()))
        .context("Equilibrium solve failed")
        .map_err(to_js_error)?;
    to_js_value(&report)
}

#[wasm_bindgen]
pub struct WasmEquilibriumSolverRunner {
    solver: EquilibriumSolver<LotkaVolterra>,
}

#[wasm_bindgen]
impl WasmEquilibriumSolverRunner {
    #[wasm_bindgen(constructor)]
    pub fn new(
        alpha: f64,
        beta: f64,
        gamma: f64,
        delta: f64,
        initial_guess: Vec<f64>,
        tolerance: Vec<f64>,
        max_steps: u32,
    ) -> Result<WasmEquilibriumSolverRunner, JsValue> {
        console_error_panic_hook::set_once();

        let params = LotkaVolterraParams::new(alpha, beta, gamma, delta);
        let guess = state_from_slice(&initial_guess, "Initial guess").map_err(to_js_error)?;
        let tolerance = state_from_slice(&tolerance, "Tolerance").map_err(to_js_error)?;
        let settings = NewtonSettings {
            max_steps: max_steps as usize,
            tolerance: [tolerance[0], tolerance[1]],
        };

        let system = LotkaVolterra::new(params)
            .context("Invalid model parameters")
            .map_err(to_js_error)?;
        let solver =
            EquilibriumSolver::new(system, params.coexistence_equilibrium(), guess, settings)
                .context("Invalid solver settings")
                .map_err(to_js_error)?;

        Ok(WasmEquilibriumSolverRunner { solver })
    }

    pub fn is_done(&self) -> bool {
        self.solver.is_done()
    }

    pub fn run_steps(&mut self, batch_size: u32) -> Result<JsValue, JsValue> {
        self.solver
            .run_steps(batch_size as usize)
            .context("Newton iteration failed")
            .map_err(to_js_error)?;
        to_js_value(&self.solver.progress())
    }

    pub fn get_progress(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.solver.progress())
    }

    /// Iterates produced so far, flattened as `[x1, y1, x2, y2, ...]`.
    pub fn trace(&self) -> Float64Array {
        let flat: Vec<f64> = self.solver.trace().iter().flatten().copied().collect();
        Float64Array::from(&flat[..])
    }

    pub fn get_result(&self) -> Result<JsValue, JsValue> {
        let report = self
            .solver
            .report()
            .ok_or_else(|| JsValue::from_str("Equilibrium solver has not terminated yet."))?;
        to_js_value(&report)
    }
}
