//! Prediction request lifecycle and the derived result state.

use shared::{domain::ParameterState, protocol::PredictRequest};
use tracing::{debug, warn};

use crate::error::PredictionError;

/// Monotonic token attached to every issued request.
pub type Generation = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionResult {
    pub label: String,
    pub is_golden: bool,
}

impl PredictionResult {
    pub fn classification(&self) -> Classification {
        if self.is_golden {
            Classification::GoldenBatch
        } else {
            Classification::DefectRisk
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    GoldenBatch,
    DefectRisk,
}

impl Classification {
    pub fn label(self) -> &'static str {
        match self {
            Self::GoldenBatch => "GOLDEN BATCH",
            Self::DefectRisk => "DEFECT RISK",
        }
    }
}

/// What the presentation layer should show for the latest prediction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultState {
    #[default]
    Idle,
    Loading,
    Success(PredictionResult),
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingPrediction {
    pub generation: Generation,
    pub request: PredictRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Superseded { latest: Generation },
}

/// Single owner of [`ResultState`].
///
/// Only the response for the most recently issued generation may change the
/// state; anything older, or a repeat delivery, is dropped on arrival.
#[derive(Debug, Default)]
pub struct PredictionController {
    state: ResultState,
    issued: Generation,
    awaiting: Option<Generation>,
    last_result: Option<PredictionResult>,
}

impl PredictionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ResultState {
        &self.state
    }

    /// Last successful payload. Kept through `Error` but never displayed as
    /// a success while the state says otherwise.
    pub fn last_result(&self) -> Option<&PredictionResult> {
        self.last_result.as_ref()
    }

    pub fn latest_generation(&self) -> Generation {
        self.issued
    }

    pub fn is_loading(&self) -> bool {
        self.state == ResultState::Loading
    }

    pub fn begin(&mut self, snapshot: ParameterState) -> PendingPrediction {
        self.issued += 1;
        self.awaiting = Some(self.issued);
        self.state = ResultState::Loading;
        debug!(
            generation = self.issued,
            temperature = snapshot.temperature,
            pressure = snapshot.pressure,
            "prediction requested"
        );
        PendingPrediction {
            generation: self.issued,
            request: snapshot.into(),
        }
    }

    pub fn complete(
        &mut self,
        generation: Generation,
        outcome: Result<PredictionResult, PredictionError>,
    ) -> Completion {
        if self.awaiting != Some(generation) {
            debug!(
                generation,
                latest = self.issued,
                "discarding superseded prediction response"
            );
            return Completion::Superseded {
                latest: self.issued,
            };
        }
        self.awaiting = None;

        match outcome {
            Ok(result) => {
                debug!(
                    generation,
                    label = %result.label,
                    is_golden = result.is_golden,
                    "prediction applied"
                );
                self.last_result = Some(result.clone());
                self.state = ResultState::Success(result);
            }
            Err(err) => {
                warn!(generation, "prediction failed: {err}");
                self.state = ResultState::Error;
            }
        }
        Completion::Applied
    }
}
