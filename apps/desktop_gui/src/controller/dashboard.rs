//! Operator dashboard state: owns the parameter store and the prediction controller.

use chrono::{DateTime, Local};
use client_core::{
    Classification, Completion, Generation, ParameterStore, PredictionController,
    PredictionError, ResultState,
};
use crossbeam_channel::{Receiver, Sender};
use shared::domain::{ParameterState, ProcessParameter};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, ServiceHealth, UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

/// What the result card renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView<'a> {
    Placeholder,
    Loading,
    Offline,
    Outcome {
        label: &'a str,
        classification: Classification,
    },
}

pub struct DashboardState {
    parameters: ParameterStore,
    predictions: PredictionController,
    startup_issued: bool,
    status: String,
    service_health: ServiceHealth,
    last_updated: Option<DateTime<Local>>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            parameters: ParameterStore::new(),
            predictions: PredictionController::new(),
            startup_issued: false,
            status: "Waiting for backend".to_string(),
            service_health: ServiceHealth::Unknown,
            last_updated: None,
        }
    }

    /// Issues the startup prediction with default inputs and a health probe.
    /// Subsequent calls do nothing.
    pub fn start(&mut self, cmd_tx: &Sender<BackendCommand>) {
        if self.startup_issued {
            return;
        }
        self.startup_issued = true;
        self.issue(ParameterState::default(), cmd_tx);
        if let Err(err) = dispatch_backend_command(cmd_tx, BackendCommand::ProbeHealth) {
            self.report_error(&err);
        }
    }

    pub fn set_parameter(&mut self, parameter: ProcessParameter, value: f64) {
        self.parameters.set(parameter, value);
    }

    pub fn commit(&mut self, cmd_tx: &Sender<BackendCommand>) -> Generation {
        let snapshot = self.parameters.commit();
        self.issue(snapshot, cmd_tx)
    }

    fn issue(&mut self, snapshot: ParameterState, cmd_tx: &Sender<BackendCommand>) -> Generation {
        let pending = self.predictions.begin(snapshot);
        let queued = dispatch_backend_command(
            cmd_tx,
            BackendCommand::Predict {
                generation: pending.generation,
                request: pending.request,
            },
        );
        if let Err(err) = queued {
            self.report_error(&err);
            self.predictions.complete(
                pending.generation,
                Err(PredictionError::unavailable(err.message())),
            );
        }
        pending.generation
    }

    pub fn drain_events(&mut self, ui_rx: &Receiver<UiEvent>) {
        while let Ok(event) = ui_rx.try_recv() {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
            }
            UiEvent::Error(err) => {
                self.report_error(&err);
                // a worker that never started will not answer queued predictions
                if err.context() == UiErrorContext::BackendStartup {
                    self.predictions.complete(
                        self.predictions.latest_generation(),
                        Err(PredictionError::unavailable(err.message())),
                    );
                }
            }
            UiEvent::PredictionFinished {
                generation,
                outcome,
            } => {
                if self.predictions.complete(generation, outcome) == Completion::Applied {
                    self.last_updated = Some(Local::now());
                    if *self.predictions.state() == ResultState::Error {
                        self.status = "Prediction failed; adjust a parameter to retry".to_string();
                    }
                }
            }
            UiEvent::ServiceHealth(health) => {
                self.service_health = health;
            }
        }
    }

    fn report_error(&mut self, err: &UiError) {
        self.status = match err.context() {
            UiErrorContext::BackendStartup => format!("Backend offline: {}", err.message()),
            UiErrorContext::General => format!("{}: {}", err_label(err.category()), err.message()),
        };
    }

    pub fn result_view(&self) -> ResultView<'_> {
        match self.predictions.state() {
            ResultState::Idle => ResultView::Placeholder,
            ResultState::Loading => ResultView::Loading,
            ResultState::Error => ResultView::Offline,
            ResultState::Success(result) => ResultView::Outcome {
                label: &result.label,
                classification: result.classification(),
            },
        }
    }

    pub fn parameters(&self) -> &ParameterStore {
        &self.parameters
    }

    pub fn is_loading(&self) -> bool {
        self.predictions.is_loading()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn service_health(&self) -> &ServiceHealth {
        &self.service_health
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}
