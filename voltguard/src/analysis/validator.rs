//! Value validator/clamper.
//!
//! Defends the hazard and compliance stages against non-physical results
//! from malformed circuits (AI-generated or hand-edited). Runs after the
//! power-flow pass and before any safety logic: downstream stages assume
//! sanitized inputs and never re-guard against NaN or infinity.

use tracing::debug;

use crate::model::{CircuitAnalysis, CircuitIssue};

/// Physical ceiling for a component operating voltage, in volts.
pub const MAX_VOLTAGE_V: f64 = 1000.0;
/// Physical ceiling for a component current, in amperes.
pub const MAX_CURRENT_A: f64 = 10_000.0;
/// Physical ceiling for a component power, in watts.
pub const MAX_POWER_W: f64 = 1.0e7;

/// Clamp every per-component value into physical range, reporting each
/// violation as a critical issue. Values are reported, then clamped, never
/// silently dropped.
pub fn sanitize(analysis: &mut CircuitAnalysis) {
    let mut issues = Vec::new();

    clamp_map(&mut analysis.voltages, MAX_VOLTAGE_V, "voltage", "V", &mut issues);
    clamp_map(&mut analysis.currents, MAX_CURRENT_A, "current", "A", &mut issues);
    clamp_map(&mut analysis.power, MAX_POWER_W, "power", "W", &mut issues);

    if !issues.is_empty() {
        debug!(count = issues.len(), "clamped out-of-range analysis values");
    }
    analysis.issues.extend(issues);
}

fn clamp_map(
    map: &mut std::collections::HashMap<String, f64>,
    max: f64,
    quantity: &str,
    unit: &str,
    issues: &mut Vec<CircuitIssue>,
) {
    for (id, value) in map.iter_mut() {
        let original = *value;
        let clamped = if original.is_nan() {
            0.0
        } else {
            original.clamp(0.0, max)
        };
        if clamped != original || original.is_nan() {
            issues.push(
                CircuitIssue::critical(
                    format!("out-of-range-{quantity}"),
                    format!(
                        "Component '{}' has a non-physical {} of {} {} (allowed 0 to {} {}); \
                         value clamped",
                        id, quantity, original, unit, max, unit
                    ),
                )
                .for_component(id.as_str()),
            );
            *value = clamped;
        }
    }
}
