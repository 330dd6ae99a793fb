//! WASM bridge for `equilibria_core`.

mod equilibrium;
mod system;

pub use equilibrium::{solve_lotka_volterra, WasmEquilibriumSolverRunner};
pub use system::WasmLotkaVolterra;

use wasm_bindgen::JsValue;

/// Flattens an `anyhow` chain into a JS string (`outer: inner: ...`).
pub(crate) fn to_js_error(err: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{:#}", err))
}

pub(crate) fn to_js_value<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
