//! Lotka–Volterra model wrapper and low-level evaluation helpers.

use crate::{to_js_error, to_js_value};
use anyhow::{bail, Context};
use equilibria_core::equilibrium::{solve_equilibrium, NewtonSettings};
use equilibria_core::lotka_volterra::{LotkaVolterra, LotkaVolterraParams};
use equilibria_core::stability::classify_equilibrium;
use equilibria_core::traits::PlanarSystem;
use nalgebra::Vector2;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmLotkaVolterra {
    pub(crate) system: LotkaVolterra,
}

pub(crate) fn state_from_slice(values: &[f64], what: &str) -> anyhow::Result<Vector2<f64>> {
    if values.len() != 2 {
        bail!("{} dimension mismatch. Expected 2, got {}.", what, values.len());
    }
    Ok(Vector2::new(values[0], values[1]))
}

#[wasm_bindgen]
impl WasmLotkaVolterra {
    #[wasm_bindgen(constructor)]
    pub fn new(
        alpha: f64,
        beta: f64,
        gamma: f64,
        delta: f64,
    ) -> Result<WasmLotkaVolterra, JsValue> {
        console_error_panic_hook::set_once();

        let params = LotkaVolterraParams::new(alpha, beta, gamma, delta);
        let system = LotkaVolterra::new(params)
            .context("Invalid model parameters")
            .map_err(to_js_error)?;
        Ok(WasmLotkaVolterra { system })
    }

    /// Analytic coexistence point `[gamma/delta, alpha/beta]`.
    pub fn equilibrium(&self) -> Vec<f64> {
        let eq = self.system.params().coexistence_equilibrium();
        vec![eq[0], eq[1]]
    }

    pub fn residual(&self, state: &[f64]) -> Result<Vec<f64>, JsValue> {
        let state = state_from_slice(state, "State").map_err(to_js_error)?;
        let f = self.system.residual(&state);
        Ok(vec![f[0], f[1]])
    }

    /// Row-major Jacobian at `state`.
    pub fn jacobian(&self, state: &[f64]) -> Result<Vec<f64>, JsValue> {
        let state = state_from_slice(state, "State").map_err(to_js_error)?;
        let j = self.system.jacobian(&state);
        Ok(vec![j[(0, 0)], j[(0, 1)], j[(1, 0)], j[(1, 1)]])
    }

    pub fn stability(&self, state: &[f64]) -> Result<JsValue, JsValue> {
        let state = state_from_slice(state, "State").map_err(to_js_error)?;
        to_js_value(&classify_equilibrium(&self.system, &state))
    }

    pub fn solve(
        &self,
        initial_guess: Vec<f64>,
        tolerance: Vec<f64>,
        max_steps: u32,
    ) -> Result<JsValue, JsValue> {
        let guess = state_from_slice(&initial_guess, "Initial guess").map_err(to_js_error)?;
        let tolerance = state_from_slice(&tolerance, "Tolerance").map_err(to_js_error)?;
        let settings = NewtonSettings {
            max_steps: max_steps as usize,
            tolerance: [tolerance[0], tolerance[1]],
        };

        let target = self.system.params().coexistence_equilibrium();
        let report = solve_equilibrium(self.system, target, guess, settings)
            .context("Equilibrium solve failed")
            .map_err(to_js_error)?;
        to_js_value(&report)
    }
}
