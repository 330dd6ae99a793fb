//! Run configuration shared by the CLI and WASM front ends.

use crate::equilibrium::NewtonSettings;
use crate::error::SolverResult;
use crate::lotka_volterra::LotkaVolterraParams;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Everything needed for one Lotka–Volterra equilibrium solve.
///
/// Missing fields fall back to the classic classroom setup: alpha=100,
/// beta=4, gamma=20, delta=0.01, guess (1000, 1000), tolerance 0.01 per
/// component, at most 100 iterations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub params: LotkaVolterraParams,
    pub initial_guess: [f64; 2],
    pub tolerance: [f64; 2],
    pub max_steps: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let settings = NewtonSettings::default();
        Self {
            params: LotkaVolterraParams::default(),
            initial_guess: [1000.0, 1000.0],
            tolerance: settings.tolerance,
            max_steps: settings.max_steps,
        }
    }
}

impl SolverConfig {
    pub fn settings(&self) -> NewtonSettings {
        NewtonSettings {
            max_steps: self.max_steps,
            tolerance: self.tolerance,
        }
    }

    pub fn initial_guess(&self) -> Vector2<f64> {
        Vector2::from(self.initial_guess)
    }

    pub fn validate(&self) -> SolverResult<()> {
        self.params.validate()?;
        self.settings().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config: SolverConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(config, SolverConfig::default());
        config.validate().expect("defaults are valid");
    }

    #[test]
    fn partial_json_overrides_only_given_fields() {
        let config: SolverConfig = serde_json::from_str(
            r#"{ "params": { "alpha": 2.0, "beta": 1.0, "gamma": 1.0, "delta": 0.5 },
                 "max_steps": 7 }"#,
        )
        .expect("parse");

        assert_eq!(config.params.coexistence_equilibrium(), Vector2::new(2.0, 2.0));
        assert_eq!(config.max_steps, 7);
        assert_eq!(config.initial_guess, [1000.0, 1000.0]);
        assert_eq!(config.settings().tolerance, [0.01, 0.01]);
    }

    #[test]
    fn partial_params_fill_remaining_rates_with_defaults() {
        let config: SolverConfig =
            serde_json::from_str(r#"{"params":{"alpha":2.0}}"#).expect("parse");

        assert_eq!(config.params.alpha, 2.0);
        assert_eq!(config.params.beta, 4.0);
        assert_eq!(config.params.gamma, 20.0);
        assert_eq!(config.params.delta, 0.01);
        config.validate().expect("merged params are valid");
    }

    #[test]
    fn validate_reports_bad_parameters_and_settings() {
        let mut config = SolverConfig::default();
        config.params.gamma = 0.0;
        assert!(format!("{}", config.validate().expect_err("gamma")).contains("gamma"));

        let mut config = SolverConfig::default();
        config.max_steps = 0;
        assert!(config.validate().is_err());
    }
}
