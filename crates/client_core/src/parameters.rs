//! Operator-owned input values.

use shared::domain::{ParameterState, ProcessParameter};

/// Holds the live value of each process input.
///
/// Setters only update the stored value. Nothing is sent to the prediction
/// service until [`ParameterStore::commit`] hands out a snapshot.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    current: ParameterState,
    last_committed: Option<ParameterState>,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_temperature(&mut self, value: f64) {
        self.set(ProcessParameter::Temperature, value);
    }

    pub fn set_pressure(&mut self, value: f64) {
        self.set(ProcessParameter::Pressure, value);
    }

    pub fn set(&mut self, parameter: ProcessParameter, value: f64) {
        let value = parameter.clamp(value);
        match parameter {
            ProcessParameter::Temperature => self.current.temperature = value,
            ProcessParameter::Pressure => self.current.pressure = value,
        }
    }

    pub fn temperature(&self) -> f64 {
        self.current.temperature
    }

    pub fn pressure(&self) -> f64 {
        self.current.pressure
    }

    pub fn snapshot(&self) -> ParameterState {
        self.current
    }

    /// Marks the current values as final and returns the snapshot to evaluate.
    pub fn commit(&mut self) -> ParameterState {
        self.last_committed = Some(self.current);
        self.current
    }

    pub fn last_committed(&self) -> Option<ParameterState> {
        self.last_committed
    }

    pub fn has_uncommitted_changes(&self) -> bool {
        self.last_committed != Some(self.current)
    }
}
