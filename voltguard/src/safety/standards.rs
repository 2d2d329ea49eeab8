//! Fixed regulatory thresholds.
//!
//! Modeled as an immutable configuration value passed into the hazard and
//! compliance stages rather than as process-wide globals, so tests can
//! substitute alternate threshold sets.

use serde::{Deserialize, Serialize};

/// Threshold set used by the hazard analyzer and compliance checkers.
///
/// Defaults mirror NEC, OSHA, and NFPA 70E figures plus the engine's own
/// empirical constants. The short-circuit floor/ratio pair and the 10×
/// arc-fault multiplier are heuristics carried over for behavioral
/// compatibility; they are not physically rigorous fault analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyStandards {
    /// NEC system voltage ceiling, in volts.
    pub nec_max_voltage: f64,
    /// NEC feeder/branch current ceiling, in amperes.
    pub nec_max_current: f64,
    /// OSHA touch-voltage ceiling for accessible parts, in volts.
    pub osha_touch_voltage: f64,
    /// Ground-fault trip threshold, in amperes (30 mA).
    pub ground_fault_trip_a: f64,
    /// Assumed resistance of a body/fault path to ground, in ohms.
    pub ground_fault_path_ohms: f64,
    /// NFPA 70E incident-energy ceiling, in cal/cm².
    pub nfpa_incident_energy: f64,
    /// Absolute short-circuit current floor, in amperes.
    pub short_circuit_floor_a: f64,
    /// Short-circuit floor for low-voltage (≤ 50 V) supplies, in amperes.
    pub short_circuit_lv_floor_a: f64,
    /// A source current above this multiple of its voltage is treated as a
    /// bolted fault.
    pub short_circuit_voltage_ratio: f64,
    /// Crude stand-in for fault-current analysis: operating current × this.
    pub arc_fault_multiplier: f64,
    /// Fault-current cap, in amperes (10 kA).
    pub arc_fault_cap_a: f64,
    /// Arc-flash working distance, in centimeters (18 in).
    pub working_distance_cm: f64,
    /// Thermal power-density ceiling for unrated protection devices, in watts.
    pub protection_power_density_w: f64,
    /// Thermal power-density ceiling for other unrated components, in watts.
    pub general_power_density_w: f64,
}

impl Default for SafetyStandards {
    fn default() -> Self {
        Self {
            nec_max_voltage: 600.0,
            nec_max_current: 100.0,
            osha_touch_voltage: 50.0,
            ground_fault_trip_a: 0.030,
            ground_fault_path_ohms: 1000.0,
            nfpa_incident_energy: 1.2,
            short_circuit_floor_a: 150.0,
            short_circuit_lv_floor_a: 50.0,
            short_circuit_voltage_ratio: 3.0,
            arc_fault_multiplier: 10.0,
            arc_fault_cap_a: 10_000.0,
            working_distance_cm: 45.72,
            protection_power_density_w: 100.0,
            general_power_density_w: 500.0,
        }
    }
}
