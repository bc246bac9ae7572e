//! Backend commands queued from UI to backend worker.

use client_core::Generation;
use shared::protocol::PredictRequest;

pub enum BackendCommand {
    Predict {
        generation: Generation,
        request: PredictRequest,
    },
    ProbeHealth,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Predict { .. } => "predict",
            BackendCommand::ProbeHealth => "probe_health",
        }
    }
}
