use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 100.0..=200.0;
pub const PRESSURE_RANGE: RangeInclusive<f64> = 10.0..=50.0;
pub const DEFAULT_TEMPERATURE: f64 = 150.0;
pub const DEFAULT_PRESSURE: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessParameter {
    Temperature,
    Pressure,
}

impl ProcessParameter {
    pub const ALL: [ProcessParameter; 2] = [ProcessParameter::Temperature, ProcessParameter::Pressure];

    pub fn range(self) -> RangeInclusive<f64> {
        match self {
            Self::Temperature => TEMPERATURE_RANGE,
            Self::Pressure => PRESSURE_RANGE,
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::Pressure => "PSI",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Pressure => "Pressure",
        }
    }

    pub fn default_value(self) -> f64 {
        match self {
            Self::Temperature => DEFAULT_TEMPERATURE,
            Self::Pressure => DEFAULT_PRESSURE,
        }
    }

    /// Operator guidance shown next to the input; not used for classification.
    pub fn optimal_hint(self) -> &'static str {
        match self {
            Self::Temperature => "Optimal Range: > 180°C",
            Self::Pressure => "Optimal Range: < 30 PSI",
        }
    }

    /// Pins `value` into the closed domain. NaN falls back to the default.
    pub fn clamp(self, value: f64) -> f64 {
        if value.is_nan() {
            return self.default_value();
        }
        let range = self.range();
        value.clamp(*range.start(), *range.end())
    }
}

/// Current value of both process inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterState {
    pub temperature: f64,
    pub pressure: f64,
}

impl ParameterState {
    pub fn new(temperature: f64, pressure: f64) -> Self {
        Self {
            temperature: ProcessParameter::Temperature.clamp(temperature),
            pressure: ProcessParameter::Pressure.clamp(pressure),
        }
    }

    pub fn get(&self, parameter: ProcessParameter) -> f64 {
        match parameter {
            ProcessParameter::Temperature => self.temperature,
            ProcessParameter::Pressure => self.pressure,
        }
    }
}

impl Default for ParameterState {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            pressure: DEFAULT_PRESSURE,
        }
    }
}
