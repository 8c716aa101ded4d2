//! Closed-form circuit calculators.
//!
//! Every calculator is a pure function of its scalar inputs. Inputs that the
//! calculator can solve for are passed as `Option<f64>`, with `None` marking
//! the unknown. Results carry the full-precision value alongside a display
//! string; the resonant frequency, divider output and capacitor voltage are
//! rounded to two decimals in the display string only.

pub mod input;

use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolverError {
    /// Ohm's law and power need exactly one slot left unknown.
    #[error("Please leave exactly one value unknown (found {found} unknown).")]
    UnknownCount { found: usize },
    #[error("Please provide a value for {0}.")]
    Missing(Parameter),
    #[error("{0} must be a finite number.")]
    NotFinite(Parameter),
    #[error("Division by zero: {0} must not be zero.")]
    DivisionByZero(&'static str),
    #[error("Math domain error: {0}.")]
    Domain(&'static str),
}

pub type Result<T> = std::result::Result<T, SolverError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Parameter {
    Voltage,
    Current,
    Resistance,
    Capacitance,
    Inductance,
    R1,
    R2,
    InputVoltage,
    SupplyVoltage,
    Time,
}

impl Parameter {
    /// Symbol the user types in front of `=`.
    pub fn symbol(&self) -> &'static str {
        match self {
            Parameter::Voltage => "V",
            Parameter::Current => "I",
            Parameter::Resistance => "R",
            Parameter::Capacitance => "C",
            Parameter::Inductance => "L",
            Parameter::R1 => "R1",
            Parameter::R2 => "R2",
            Parameter::InputVoltage => "Vin",
            Parameter::SupplyVoltage => "Vmax",
            Parameter::Time => "t",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Parameter::Voltage => "voltage",
            Parameter::Current => "current",
            Parameter::Resistance => "resistance",
            Parameter::Capacitance => "capacitance",
            Parameter::Inductance => "inductance",
            Parameter::R1 => "R1",
            Parameter::R2 => "R2",
            Parameter::InputVoltage => "input voltage",
            Parameter::SupplyVoltage => "supply voltage",
            Parameter::Time => "time",
        }
    }

    pub fn unit(&self) -> Unit {
        match self {
            Parameter::Voltage | Parameter::InputVoltage | Parameter::SupplyVoltage => Unit::Volt,
            Parameter::Current => Unit::Ampere,
            Parameter::Resistance | Parameter::R1 | Parameter::R2 => Unit::Ohm,
            Parameter::Capacitance => Unit::Farad,
            Parameter::Inductance => Unit::Henry,
            Parameter::Time => Unit::Second,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Volt,
    Ampere,
    Ohm,
    Watt,
    Second,
    Farad,
    Henry,
    Hertz,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Volt => "V",
            Unit::Ampere => "A",
            Unit::Ohm => "Ω",
            Unit::Watt => "W",
            Unit::Second => "s",
            Unit::Farad => "F",
            Unit::Henry => "H",
            Unit::Hertz => "Hz",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The derived quantity a calculation produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Voltage,
    Current,
    Resistance,
    Power,
    TimeConstant,
    ResonantFrequency,
    OutputVoltage,
    CapacitorVoltage,
}

impl Quantity {
    pub fn label(&self) -> &'static str {
        match self {
            Quantity::Voltage => "Calculated Voltage",
            Quantity::Current => "Calculated Current",
            Quantity::Resistance => "Calculated Resistance",
            Quantity::Power => "Power Dissipation",
            Quantity::TimeConstant => "Time Constant",
            Quantity::ResonantFrequency => "Resonant Frequency",
            Quantity::OutputVoltage => "Output Voltage",
            Quantity::CapacitorVoltage => "Capacitor Voltage",
        }
    }

    pub fn unit(&self) -> Unit {
        match self {
            Quantity::Voltage | Quantity::OutputVoltage | Quantity::CapacitorVoltage => Unit::Volt,
            Quantity::Current => Unit::Ampere,
            Quantity::Resistance => Unit::Ohm,
            Quantity::Power => Unit::Watt,
            Quantity::TimeConstant => Unit::Second,
            Quantity::ResonantFrequency => Unit::Hertz,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculationResult {
    pub quantity: Quantity,
    pub value: f64,
    pub unit: Unit,
    /// Inputs, operator and result, ready to show to the user.
    pub display: String,
}

impl CalculationResult {
    fn new(quantity: Quantity, value: f64, expression: String, shown: String) -> Result<Self> {
        if !value.is_finite() {
            return Err(SolverError::Domain("the result is not a finite number"));
        }
        let unit = quantity.unit();
        Ok(Self {
            quantity,
            value,
            unit,
            display: format!("{}: {} = {} {}", quantity.label(), expression, shown, unit),
        })
    }
}

impl fmt::Display for CalculationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

fn known(parameter: Parameter, value: Option<f64>) -> Result<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() => Err(SolverError::NotFinite(parameter)),
        other => Ok(other),
    }
}

fn required(parameter: Parameter, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SolverError::NotFinite(parameter))
    }
}

/// Solves V = I·R for whichever of the three is `None`.
pub fn ohms_law(
    voltage: Option<f64>,
    current: Option<f64>,
    resistance: Option<f64>,
) -> Result<CalculationResult> {
    let voltage = known(Parameter::Voltage, voltage)?;
    let current = known(Parameter::Current, current)?;
    let resistance = known(Parameter::Resistance, resistance)?;

    match (voltage, current, resistance) {
        (None, Some(i), Some(r)) => {
            let v = i * r;
            CalculationResult::new(Quantity::Voltage, v, format!("{} A × {} Ω", i, r), v.to_string())
        }
        (Some(v), None, Some(r)) => {
            if r == 0.0 {
                return Err(SolverError::DivisionByZero("resistance"));
            }
            let i = v / r;
            CalculationResult::new(Quantity::Current, i, format!("{} V ÷ {} Ω", v, r), i.to_string())
        }
        (Some(v), Some(i), None) => {
            if i == 0.0 {
                return Err(SolverError::DivisionByZero("current"));
            }
            let r = v / i;
            CalculationResult::new(Quantity::Resistance, r, format!("{} V ÷ {} A", v, i), r.to_string())
        }
        (v, i, r) => Err(SolverError::UnknownCount {
            found: [v, i, r].iter().filter(|x| x.is_none()).count(),
        }),
    }
}

/// τ = R·C. A zero product is reported rather than returned as 0 s.
pub fn rc_time_constant(resistance: f64, capacitance: f64) -> Result<CalculationResult> {
    let r = required(Parameter::Resistance, resistance)?;
    let c = required(Parameter::Capacitance, capacitance)?;
    let tau = r * c;
    if tau == 0.0 {
        return Err(SolverError::DivisionByZero("R·C"));
    }
    CalculationResult::new(Quantity::TimeConstant, tau, format!("{} Ω × {} F", r, c), tau.to_string())
}

/// f₀ = 1 / (2π√(L·C)).
pub fn resonant_frequency(inductance: f64, capacitance: f64) -> Result<CalculationResult> {
    let l = required(Parameter::Inductance, inductance)?;
    let c = required(Parameter::Capacitance, capacitance)?;
    let lc = l * c;
    if lc == 0.0 {
        return Err(SolverError::DivisionByZero("L·C"));
    }
    if lc < 0.0 {
        return Err(SolverError::Domain("L·C must be positive to take its square root"));
    }
    let f0 = 1.0 / (2.0 * PI * lc.sqrt());
    CalculationResult::new(
        Quantity::ResonantFrequency,
        f0,
        format!("1 ÷ (2π√({} H × {} F))", l, c),
        format!("{:.2}", f0),
    )
}

/// P = I²R when the voltage is unknown, P = V²/R when the current is.
pub fn power_dissipation(
    current: Option<f64>,
    voltage: Option<f64>,
    resistance: Option<f64>,
) -> Result<CalculationResult> {
    let current = known(Parameter::Current, current)?;
    let voltage = known(Parameter::Voltage, voltage)?;
    let r = match known(Parameter::Resistance, resistance)? {
        Some(r) => r,
        None if current.is_none() && voltage.is_none() => {
            return Err(SolverError::UnknownCount { found: 3 })
        }
        None => return Err(SolverError::Missing(Parameter::Resistance)),
    };

    match (current, voltage) {
        (Some(i), None) => {
            let p = i * i * r;
            CalculationResult::new(Quantity::Power, p, format!("({} A)² × {} Ω", i, r), p.to_string())
        }
        (None, Some(v)) => {
            if r == 0.0 {
                return Err(SolverError::DivisionByZero("resistance"));
            }
            let p = v * v / r;
            CalculationResult::new(Quantity::Power, p, format!("({} V)² ÷ {} Ω", v, r), p.to_string())
        }
        (i, v) => Err(SolverError::UnknownCount {
            found: usize::from(i.is_none()) + usize::from(v.is_none()),
        }),
    }
}

/// Vout = Vin·R2 / (R1 + R2).
pub fn voltage_divider(input_voltage: f64, r1: f64, r2: f64) -> Result<CalculationResult> {
    let vin = required(Parameter::InputVoltage, input_voltage)?;
    let r1 = required(Parameter::R1, r1)?;
    let r2 = required(Parameter::R2, r2)?;
    let total = r1 + r2;
    if total == 0.0 {
        return Err(SolverError::DivisionByZero("R1 + R2"));
    }
    let vout = vin * r2 / total;
    CalculationResult::new(
        Quantity::OutputVoltage,
        vout,
        format!("{} V × {} Ω ÷ ({} Ω + {} Ω)", vin, r2, r1, r2),
        format!("{:.2}", vout),
    )
}

/// V(t) = Vmax·(1 − e^(−t/RC)).
pub fn capacitor_charging(
    supply_voltage: f64,
    resistance: f64,
    capacitance: f64,
    time: f64,
) -> Result<CalculationResult> {
    let vmax = required(Parameter::SupplyVoltage, supply_voltage)?;
    let r = required(Parameter::Resistance, resistance)?;
    let c = required(Parameter::Capacitance, capacitance)?;
    let t = required(Parameter::Time, time)?;
    let tau = r * c;
    if tau == 0.0 {
        return Err(SolverError::DivisionByZero("R·C"));
    }
    let v = vmax * (1.0 - (-t / tau).exp());
    CalculationResult::new(
        Quantity::CapacitorVoltage,
        v,
        format!("{} V × (1 − e^(−{} s ÷ ({} Ω × {} F)))", vmax, t, r, c),
        format!("{:.2}", v),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalculationKind {
    OhmsLaw,
    RcTimeConstant,
    ResonantFrequency,
    PowerDissipation,
    VoltageDivider,
    CapacitorCharging,
}

impl CalculationKind {
    pub const ALL: [CalculationKind; 6] = [
        CalculationKind::OhmsLaw,
        CalculationKind::RcTimeConstant,
        CalculationKind::ResonantFrequency,
        CalculationKind::PowerDissipation,
        CalculationKind::VoltageDivider,
        CalculationKind::CapacitorCharging,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CalculationKind::OhmsLaw => "Ohm's Law",
            CalculationKind::RcTimeConstant => "RC Time Constant",
            CalculationKind::ResonantFrequency => "LC Resonant Frequency",
            CalculationKind::PowerDissipation => "Power Dissipation",
            CalculationKind::VoltageDivider => "Voltage Divider",
            CalculationKind::CapacitorCharging => "Capacitor Charging",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(label))
    }

    pub fn parameters(&self) -> &'static [Parameter] {
        match self {
            CalculationKind::OhmsLaw => &[Parameter::Voltage, Parameter::Current, Parameter::Resistance],
            CalculationKind::RcTimeConstant => &[Parameter::Resistance, Parameter::Capacitance],
            CalculationKind::ResonantFrequency => &[Parameter::Inductance, Parameter::Capacitance],
            CalculationKind::PowerDissipation => &[Parameter::Current, Parameter::Voltage, Parameter::Resistance],
            CalculationKind::VoltageDivider => &[Parameter::InputVoltage, Parameter::R1, Parameter::R2],
            CalculationKind::CapacitorCharging => &[
                Parameter::SupplyVoltage,
                Parameter::Resistance,
                Parameter::Capacitance,
                Parameter::Time,
            ],
        }
    }

    /// Whether one input is left out and solved for.
    pub fn solves_for_unknown(&self) -> bool {
        matches!(self, CalculationKind::OhmsLaw | CalculationKind::PowerDissipation)
    }

    pub fn formula(&self) -> &'static str {
        match self {
            CalculationKind::OhmsLaw => "V = I·R",
            CalculationKind::RcTimeConstant => "τ = R·C",
            CalculationKind::ResonantFrequency => "f₀ = 1 / (2π√(L·C))",
            CalculationKind::PowerDissipation => "P = I²R or P = V²/R",
            CalculationKind::VoltageDivider => "Vout = Vin·R2 / (R1 + R2)",
            CalculationKind::CapacitorCharging => "V(t) = Vmax·(1 − e^(−t/RC))",
        }
    }

    pub fn example(&self) -> &'static str {
        match self {
            CalculationKind::OhmsLaw => "V=? I=2 R=10",
            CalculationKind::RcTimeConstant => "R=1k C=1u",
            CalculationKind::ResonantFrequency => "L=1m C=1u",
            CalculationKind::PowerDissipation => "I=2 R=10",
            CalculationKind::VoltageDivider => "Vin=10 R1=100 R2=100",
            CalculationKind::CapacitorCharging => "Vmax=5 R=1k C=1u t=1m",
        }
    }
}

impl fmt::Display for CalculationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A calculator selection plus its inputs. A parameter that is absent or
/// mapped to `None` is unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationRequest {
    pub kind: CalculationKind,
    pub values: BTreeMap<Parameter, Option<f64>>,
}

impl CalculationRequest {
    pub fn new(kind: CalculationKind) -> Self {
        Self {
            kind,
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, parameter: Parameter, value: f64) -> Self {
        self.values.insert(parameter, Some(value));
        self
    }

    pub fn with_unknown(mut self, parameter: Parameter) -> Self {
        self.values.insert(parameter, None);
        self
    }

    pub fn get(&self, parameter: Parameter) -> Option<f64> {
        self.values.get(&parameter).copied().flatten()
    }

    fn require(&self, parameter: Parameter) -> Result<f64> {
        self.get(parameter).ok_or(SolverError::Missing(parameter))
    }

    pub fn evaluate(&self) -> Result<CalculationResult> {
        use Parameter::*;

        match self.kind {
            CalculationKind::OhmsLaw => ohms_law(self.get(Voltage), self.get(Current), self.get(Resistance)),
            CalculationKind::PowerDissipation => {
                power_dissipation(self.get(Current), self.get(Voltage), self.get(Resistance))
            }
            CalculationKind::RcTimeConstant => {
                rc_time_constant(self.require(Resistance)?, self.require(Capacitance)?)
            }
            CalculationKind::ResonantFrequency => {
                resonant_frequency(self.require(Inductance)?, self.require(Capacitance)?)
            }
            CalculationKind::VoltageDivider => {
                voltage_divider(self.require(InputVoltage)?, self.require(R1)?, self.require(R2)?)
            }
            CalculationKind::CapacitorCharging => capacitor_charging(
                self.require(SupplyVoltage)?,
                self.require(Resistance)?,
                self.require(Capacitance)?,
                self.require(Time)?,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const SAMPLES: [(f64, f64); 6] = [
        (2.0, 10.0),
        (0.5, 4700.0),
        (-1.5, 33.0),
        (1e-3, 1e6),
        (12.0, 0.25),
        (3.0, -220.0),
    ];

    #[test]
    fn ohms_law_solves_each_unknown() {
        for (i, r) in SAMPLES {
            let v = ohms_law(None, Some(i), Some(r)).unwrap();
            assert_eq!(v.quantity, Quantity::Voltage);
            assert_relative_eq!(v.value, i * r, max_relative = 1e-9);

            let current = ohms_law(Some(i * r), None, Some(r)).unwrap();
            assert_relative_eq!(current.value, i, max_relative = 1e-9);

            let back = ohms_law(Some(v.value), Some(i), None).unwrap();
            assert_eq!(back.unit, Unit::Ohm);
            assert_relative_eq!(back.value, r, max_relative = 1e-9);
        }
    }

    #[test]
    fn ohms_law_display_names_the_unknown() {
        let result = ohms_law(None, Some(2.0), Some(10.0)).unwrap();
        assert_eq!(result.display, "Calculated Voltage: 2 A × 10 Ω = 20 V");
    }

    #[test]
    fn ohms_law_rejects_wrong_unknown_count() {
        assert_eq!(
            ohms_law(Some(1.0), Some(2.0), Some(3.0)),
            Err(SolverError::UnknownCount { found: 0 })
        );
        assert_eq!(
            ohms_law(None, None, Some(3.0)),
            Err(SolverError::UnknownCount { found: 2 })
        );
        assert_eq!(ohms_law(None, None, None), Err(SolverError::UnknownCount { found: 3 }));
    }

    #[test]
    fn zero_current_gives_zero_voltage_but_no_resistance() {
        let v = ohms_law(None, Some(0.0), Some(47.0)).unwrap();
        assert_eq!(v.value, 0.0);
        let i = ohms_law(Some(0.0), None, Some(47.0)).unwrap();
        assert_eq!(i.value, 0.0);
        assert_eq!(
            ohms_law(Some(v.value), Some(0.0), None),
            Err(SolverError::DivisionByZero("current"))
        );
    }

    #[test]
    fn ohms_law_reports_zero_denominators() {
        assert_eq!(
            ohms_law(Some(5.0), None, Some(0.0)),
            Err(SolverError::DivisionByZero("resistance"))
        );
        assert_eq!(
            ohms_law(Some(5.0), Some(0.0), None),
            Err(SolverError::DivisionByZero("current"))
        );
    }

    #[test]
    fn non_finite_inputs_are_rejected() {
        assert_eq!(
            ohms_law(None, Some(f64::NAN), Some(1.0)),
            Err(SolverError::NotFinite(Parameter::Current))
        );
        assert_eq!(
            rc_time_constant(f64::INFINITY, 1.0),
            Err(SolverError::NotFinite(Parameter::Resistance))
        );
    }

    #[test]
    fn power_formulas_agree_when_ohms_law_holds() {
        let by_current = power_dissipation(Some(2.0), None, Some(10.0)).unwrap();
        let by_voltage = power_dissipation(None, Some(20.0), Some(10.0)).unwrap();
        assert_relative_eq!(by_current.value, 40.0, max_relative = 1e-12);
        assert_relative_eq!(by_voltage.value, 40.0, max_relative = 1e-12);
        assert_eq!(by_current.unit, Unit::Watt);
    }

    #[test]
    fn power_needs_exactly_one_of_current_and_voltage() {
        assert_eq!(
            power_dissipation(Some(2.0), Some(20.0), Some(10.0)),
            Err(SolverError::UnknownCount { found: 0 })
        );
        assert_eq!(
            power_dissipation(None, None, Some(10.0)),
            Err(SolverError::UnknownCount { found: 2 })
        );
        assert_eq!(
            power_dissipation(Some(2.0), None, None),
            Err(SolverError::Missing(Parameter::Resistance))
        );
        assert_eq!(
            power_dissipation(None, Some(20.0), Some(0.0)),
            Err(SolverError::DivisionByZero("resistance"))
        );
    }

    #[test]
    fn rc_time_constant_is_product() {
        let tau = rc_time_constant(1000.0, 1e-6).unwrap();
        assert_relative_eq!(tau.value, 0.001, max_relative = 1e-9);
        assert_eq!(tau.unit, Unit::Second);
    }

    #[test]
    fn rc_time_constant_flags_zero_capacitance() {
        assert_eq!(rc_time_constant(1000.0, 0.0), Err(SolverError::DivisionByZero("R·C")));
    }

    #[test]
    fn resonant_frequency_rounds_display_only() {
        let f0 = resonant_frequency(1e-3, 1e-6).unwrap();
        assert_relative_eq!(f0.value, 5032.921210448704, max_relative = 1e-9);
        assert!(f0.display.ends_with("= 5032.92 Hz"), "{}", f0.display);
    }

    #[test]
    fn resonant_frequency_rejects_zero_and_negative_products() {
        assert_eq!(resonant_frequency(0.0, 1e-6), Err(SolverError::DivisionByZero("L·C")));
        assert!(matches!(resonant_frequency(-1e-3, 1e-6), Err(SolverError::Domain(_))));
    }

    #[test]
    fn voltage_divider_halves_equal_resistors() {
        let out = voltage_divider(10.0, 100.0, 100.0).unwrap();
        assert_relative_eq!(out.value, 5.0);
        assert!(out.display.ends_with("= 5.00 V"), "{}", out.display);
        assert_eq!(
            voltage_divider(10.0, 100.0, -100.0),
            Err(SolverError::DivisionByZero("R1 + R2"))
        );
    }

    #[test]
    fn capacitor_charges_to_63_percent_after_one_tau() {
        let v = capacitor_charging(5.0, 1000.0, 1e-6, 0.001).unwrap();
        assert_relative_eq!(v.value, 5.0 * (1.0 - (-1.0f64).exp()), max_relative = 1e-9);
        assert!(v.display.ends_with("= 3.16 V"), "{}", v.display);
        assert_eq!(
            capacitor_charging(5.0, 0.0, 1e-6, 0.001),
            Err(SolverError::DivisionByZero("R·C"))
        );
    }

    #[test]
    fn request_dispatches_by_kind() {
        let request = CalculationRequest::new(CalculationKind::OhmsLaw)
            .with_unknown(Parameter::Voltage)
            .with(Parameter::Current, 2.0)
            .with(Parameter::Resistance, 10.0);
        assert_relative_eq!(request.evaluate().unwrap().value, 20.0);

        let request = CalculationRequest::new(CalculationKind::VoltageDivider)
            .with(Parameter::InputVoltage, 10.0)
            .with(Parameter::R1, 100.0);
        assert_eq!(request.evaluate(), Err(SolverError::Missing(Parameter::R2)));
    }

    #[test]
    fn kinds_round_trip_through_labels() {
        for kind in CalculationKind::ALL {
            assert_eq!(CalculationKind::from_label(kind.label()), Some(kind));
        }
        assert_eq!(CalculationKind::from_label(" ohm's law "), Some(CalculationKind::OhmsLaw));
        assert_eq!(CalculationKind::from_label("Thevenin"), None);
    }
}
