//! Electrical analysis: the power-flow pass and the value sanitizer that
//! guards everything downstream of it.

pub mod power_flow;
pub mod validator;

pub use power_flow::compute as compute_power_flow;
pub use validator::{sanitize, MAX_CURRENT_A, MAX_POWER_W, MAX_VOLTAGE_V};
