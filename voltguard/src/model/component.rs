//! Component model: the closed set of component types, the sparse property
//! bag authored by the editor, and the resolved-properties step that merges
//! declared values over per-type engineering defaults.

use serde::{Deserialize, Serialize};

/// All component types the engine understands.
///
/// The set is closed on purpose: every calculation and hazard check
/// dispatches on this tag, and an exhaustive `match` keeps new variants
/// from silently falling through to the wrong formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentType {
    // Power sources
    Battery,
    Socket,

    // Passive elements
    Resistor,
    Capacitor,
    Inductor,
    Transformer,
    Diode,
    Led,

    // Protection devices
    Mcb,
    Rccb,
    Fuse,
    Gfci,
    Afci,
    Spd,
    SurgeProtector,
    OvervoltageProtector,
    UndervoltageProtector,
    EmergencyStop,

    // Control devices
    Switch,
    TwoWaySwitch,
    Contactor,
    Relay,
    Timer,

    // Loads / appliances
    Fan,
    Light,
    Tv,
    Ac,
    Motor,
    Heater,
    Refrigerator,
    WashingMachine,
    Microwave,
    Dishwasher,
    WaterHeater,
    ElectricStove,
    ElectricOven,
    HeatPump,
    ElectricBoiler,
    Ups,
    Inverter,

    // Measurement
    Voltmeter,
    Ammeter,
    Wattmeter,

    // Topology and other
    Ground,
    Junction,
    LightningRod,
    Sensor,
    IsolationTransformer,
}

impl ComponentType {
    /// `battery` and `socket` are the only components that inject power.
    pub fn is_source(&self) -> bool {
        matches!(self, ComponentType::Battery | ComponentType::Socket)
    }

    /// End-use loads with a declared wattage.
    pub fn is_appliance(&self) -> bool {
        matches!(
            self,
            ComponentType::Fan
                | ComponentType::Light
                | ComponentType::Tv
                | ComponentType::Ac
                | ComponentType::Motor
                | ComponentType::Heater
                | ComponentType::Refrigerator
                | ComponentType::WashingMachine
                | ComponentType::Microwave
                | ComponentType::Dishwasher
                | ComponentType::WaterHeater
                | ComponentType::ElectricStove
                | ComponentType::ElectricOven
                | ComponentType::HeatPump
                | ComponentType::ElectricBoiler
                | ComponentType::Ups
                | ComponentType::Inverter
        )
    }

    /// Devices whose role is interrupting or limiting current/voltage
    /// under fault conditions.
    pub fn is_protection(&self) -> bool {
        matches!(
            self,
            ComponentType::Mcb
                | ComponentType::Rccb
                | ComponentType::Fuse
                | ComponentType::Gfci
                | ComponentType::Afci
                | ComponentType::Spd
                | ComponentType::SurgeProtector
                | ComponentType::OvervoltageProtector
                | ComponentType::UndervoltageProtector
                | ComponentType::EmergencyStop
        )
    }

    /// Devices that sit in line with the full load and pass it through:
    /// the protection chain plus manual switches.
    pub fn is_pass_through(&self) -> bool {
        matches!(
            self,
            ComponentType::Mcb
                | ComponentType::Rccb
                | ComponentType::Fuse
                | ComponentType::Gfci
                | ComponentType::Afci
                | ComponentType::Spd
                | ComponentType::SurgeProtector
                | ComponentType::Switch
                | ComponentType::TwoWaySwitch
        )
    }

    /// Control devices that draw a small coil/electronics current rather
    /// than carrying the aggregate load in this model.
    pub fn is_control_coil(&self) -> bool {
        matches!(
            self,
            ComponentType::Contactor | ComponentType::Relay | ComponentType::Timer
        )
    }

    /// Residual-current style devices that clear ground faults.
    pub fn is_ground_fault_device(&self) -> bool {
        matches!(
            self,
            ComponentType::Gfci | ComponentType::Rccb | ComponentType::Afci
        )
    }

    /// Component types a person can plausibly touch in service: switches,
    /// outlets, and every appliance. Used by the touch-voltage check.
    pub fn is_accessible(&self) -> bool {
        self.is_appliance()
            || matches!(
                self,
                ComponentType::Switch | ComponentType::TwoWaySwitch | ComponentType::Socket
            )
    }

    /// Two-terminal passives eligible for series-group reporting.
    pub fn is_chainable_passive(&self) -> bool {
        matches!(
            self,
            ComponentType::Resistor | ComponentType::Capacitor | ComponentType::Inductor
        )
    }

    pub fn is_meter(&self) -> bool {
        matches!(
            self,
            ComponentType::Voltmeter | ComponentType::Ammeter | ComponentType::Wattmeter
        )
    }

    /// Appliances expected to dissipate kilowatts by design. These are
    /// exempt from the power-density thermal check.
    pub fn is_high_power_appliance(&self) -> bool {
        matches!(
            self,
            ComponentType::Ac
                | ComponentType::Motor
                | ComponentType::Heater
                | ComponentType::Microwave
                | ComponentType::Dishwasher
                | ComponentType::WashingMachine
                | ComponentType::WaterHeater
                | ComponentType::ElectricStove
                | ComponentType::ElectricOven
                | ComponentType::HeatPump
                | ComponentType::ElectricBoiler
        )
    }

    /// Human-readable label for messages and reports.
    pub fn label(&self) -> &'static str {
        match self {
            ComponentType::Battery => "battery",
            ComponentType::Socket => "socket",
            ComponentType::Resistor => "resistor",
            ComponentType::Capacitor => "capacitor",
            ComponentType::Inductor => "inductor",
            ComponentType::Transformer => "transformer",
            ComponentType::Diode => "diode",
            ComponentType::Led => "LED",
            ComponentType::Mcb => "MCB",
            ComponentType::Rccb => "RCCB",
            ComponentType::Fuse => "fuse",
            ComponentType::Gfci => "GFCI",
            ComponentType::Afci => "AFCI",
            ComponentType::Spd => "SPD",
            ComponentType::SurgeProtector => "surge protector",
            ComponentType::OvervoltageProtector => "overvoltage protector",
            ComponentType::UndervoltageProtector => "undervoltage protector",
            ComponentType::EmergencyStop => "emergency stop",
            ComponentType::Switch => "switch",
            ComponentType::TwoWaySwitch => "two-way switch",
            ComponentType::Contactor => "contactor",
            ComponentType::Relay => "relay",
            ComponentType::Timer => "timer",
            ComponentType::Fan => "fan",
            ComponentType::Light => "light",
            ComponentType::Tv => "TV",
            ComponentType::Ac => "air conditioner",
            ComponentType::Motor => "motor",
            ComponentType::Heater => "heater",
            ComponentType::Refrigerator => "refrigerator",
            ComponentType::WashingMachine => "washing machine",
            ComponentType::Microwave => "microwave",
            ComponentType::Dishwasher => "dishwasher",
            ComponentType::WaterHeater => "water heater",
            ComponentType::ElectricStove => "electric stove",
            ComponentType::ElectricOven => "electric oven",
            ComponentType::HeatPump => "heat pump",
            ComponentType::ElectricBoiler => "electric boiler",
            ComponentType::Ups => "UPS",
            ComponentType::Inverter => "inverter",
            ComponentType::Voltmeter => "voltmeter",
            ComponentType::Ammeter => "ammeter",
            ComponentType::Wattmeter => "wattmeter",
            ComponentType::Ground => "ground",
            ComponentType::Junction => "junction",
            ComponentType::LightningRod => "lightning rod",
            ComponentType::Sensor => "sensor",
            ComponentType::IsolationTransformer => "isolation transformer",
        }
    }
}

/// Sparse, type-specific attributes attached to a component by the editor
/// or generator. Every field is optional; absent fields fall back to the
/// engineering defaults applied by [`ResolvedProperties::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentProperties {
    /// Declared wattage of an appliance. Authoritative: never recomputed
    /// from V·I.
    pub power_consumption: Option<f64>,
    pub operating_voltage: Option<f64>,
    pub power_factor: Option<f64>,
    /// Trip rating of an MCB, in amperes.
    pub trip_current: Option<f64>,
    /// Rating of a fuse, in amperes.
    pub fuse_rating: Option<f64>,
    pub voltage_rating: Option<f64>,
    pub current_rating: Option<f64>,
    pub power_rating: Option<f64>,
    /// Secondary/primary voltage ratio of a transformer.
    pub turns_ratio: Option<f64>,
    /// Protective-device clearing time in seconds, used by arc-flash math.
    pub clearing_time: Option<f64>,
}

/// One circuit element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// Unique within the circuit, stable for the circuit's lifetime.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ComponentType,
    /// Nominal rating: resistance for a resistor, voltage for a source, etc.
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub unit: String,
    /// Number of terminals. Connections must reference a port index below
    /// this count.
    #[serde(default = "default_ports")]
    pub ports: u32,
    #[serde(default)]
    pub properties: ComponentProperties,
}

fn default_ports() -> u32 {
    2
}

impl Component {
    pub fn new(id: impl Into<String>, kind: ComponentType) -> Self {
        Self {
            id: id.into(),
            kind,
            value: 0.0,
            unit: String::new(),
            ports: 2,
            properties: ComponentProperties::default(),
        }
    }

    pub fn with_value(mut self, value: f64, unit: impl Into<String>) -> Self {
        self.value = value;
        self.unit = unit.into();
        self
    }

    pub fn with_ports(mut self, ports: u32) -> Self {
        self.ports = ports;
        self
    }

    pub fn with_properties(mut self, properties: ComponentProperties) -> Self {
        self.properties = properties;
        self
    }

    /// Merge declared properties over this component's type defaults.
    pub fn resolved(&self) -> ResolvedProperties {
        ResolvedProperties::resolve(self)
    }
}

/// Default power factor applied when an appliance does not declare one.
pub const DEFAULT_POWER_FACTOR: f64 = 0.8;
/// Default breaker/fuse rating in amperes.
pub const DEFAULT_TRIP_CURRENT_A: f64 = 16.0;
/// Default protective-device clearing time in seconds.
pub const DEFAULT_CLEARING_TIME_S: f64 = 0.1;

/// Declared wattage fallback per appliance type, in watts. Values are
/// typical residential nameplate ratings.
fn default_power_consumption(kind: ComponentType) -> f64 {
    match kind {
        ComponentType::Fan => 75.0,
        ComponentType::Light => 60.0,
        ComponentType::Tv => 120.0,
        ComponentType::Ac => 1500.0,
        ComponentType::Motor => 750.0,
        ComponentType::Heater => 1500.0,
        ComponentType::Refrigerator => 150.0,
        ComponentType::WashingMachine => 500.0,
        ComponentType::Microwave => 1000.0,
        ComponentType::Dishwasher => 1200.0,
        ComponentType::WaterHeater => 3000.0,
        ComponentType::ElectricStove => 2000.0,
        ComponentType::ElectricOven => 2400.0,
        ComponentType::HeatPump => 1800.0,
        ComponentType::ElectricBoiler => 3000.0,
        ComponentType::Ups => 300.0,
        ComponentType::Inverter => 500.0,
        _ => 0.0,
    }
}

/// A component's properties after default-filling. Fields with engineering
/// defaults are concrete; rating fields stay optional because hazard checks
/// only apply them when the author declared one.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProperties {
    pub power_consumption: f64,
    pub power_factor: f64,
    pub trip_current: f64,
    pub fuse_rating: f64,
    pub turns_ratio: f64,
    pub clearing_time: f64,
    pub voltage_rating: Option<f64>,
    pub current_rating: Option<f64>,
    pub power_rating: Option<f64>,
}

impl ResolvedProperties {
    pub fn resolve(component: &Component) -> Self {
        let p = &component.properties;
        // A transformer's `value` doubles as its ratio when no explicit
        // turnsRatio was declared.
        let fallback_ratio = if component.value > 0.0 {
            component.value
        } else {
            1.0
        };
        Self {
            power_consumption: p
                .power_consumption
                .filter(|w| w.is_finite() && *w >= 0.0)
                .unwrap_or_else(|| default_power_consumption(component.kind)),
            power_factor: p
                .power_factor
                .filter(|pf| pf.is_finite() && *pf > 0.0 && *pf <= 1.0)
                .unwrap_or(DEFAULT_POWER_FACTOR),
            trip_current: p
                .trip_current
                .filter(|a| a.is_finite() && *a > 0.0)
                .unwrap_or(DEFAULT_TRIP_CURRENT_A),
            fuse_rating: p
                .fuse_rating
                .filter(|a| a.is_finite() && *a > 0.0)
                .unwrap_or(DEFAULT_TRIP_CURRENT_A),
            turns_ratio: p
                .turns_ratio
                .filter(|r| r.is_finite() && *r > 0.0)
                .unwrap_or(fallback_ratio),
            clearing_time: p
                .clearing_time
                .filter(|t| t.is_finite() && *t > 0.0)
                .unwrap_or(DEFAULT_CLEARING_TIME_S),
            voltage_rating: p.voltage_rating.filter(|v| v.is_finite() && *v > 0.0),
            current_rating: p.current_rating.filter(|a| a.is_finite() && *a > 0.0),
            power_rating: p.power_rating.filter(|w| w.is_finite() && *w > 0.0),
        }
    }
}
