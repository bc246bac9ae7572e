pub mod config;
pub mod controller;
pub mod error;
pub mod parameters;
pub mod service;
pub mod session;

pub use config::{load_settings, normalize_service_url, ClientSettings};
pub use controller::{
    Classification, Completion, Generation, PendingPrediction, PredictionController,
    PredictionResult, ResultState,
};
pub use error::PredictionError;
pub use parameters::ParameterStore;
pub use service::{HttpPredictionService, PredictionService};
pub use session::{CompletionReport, PredictionSession};

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod controller_tests;

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod service_tests;

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod session_tests;
