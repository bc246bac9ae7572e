//! Cooperative driver tying the parameter store, the controller and a service.

use std::sync::Arc;

use futures::{future::BoxFuture, stream::FuturesUnordered, FutureExt, StreamExt};
use shared::domain::ParameterState;

use crate::{
    controller::{Completion, Generation, PredictionController, PredictionResult, ResultState},
    error::PredictionError,
    parameters::ParameterStore,
    service::PredictionService,
};

type InFlight = BoxFuture<'static, (Generation, Result<PredictionResult, PredictionError>)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionReport {
    pub generation: Generation,
    pub completion: Completion,
}

/// Runs every in-flight request on the caller's task.
///
/// Requests are polled only from [`PredictionSession::next_completion`] and
/// [`PredictionSession::settle`], so parameter updates are never blocked by a
/// pending call.
pub struct PredictionSession {
    parameters: ParameterStore,
    controller: PredictionController,
    service: Arc<dyn PredictionService>,
    in_flight: FuturesUnordered<InFlight>,
    started: bool,
}

impl PredictionSession {
    pub fn new(service: Arc<dyn PredictionService>) -> Self {
        Self {
            parameters: ParameterStore::new(),
            controller: PredictionController::new(),
            service,
            in_flight: FuturesUnordered::new(),
            started: false,
        }
    }

    /// Issues the one automatic request with the default inputs.
    pub fn start(&mut self) -> Option<Generation> {
        if self.started {
            return None;
        }
        self.started = true;
        Some(self.issue(ParameterState::default()))
    }

    pub fn set_temperature(&mut self, value: f64) {
        self.parameters.set_temperature(value);
    }

    pub fn set_pressure(&mut self, value: f64) {
        self.parameters.set_pressure(value);
    }

    pub fn commit(&mut self) -> Generation {
        let snapshot = self.parameters.commit();
        self.issue(snapshot)
    }

    pub fn parameters(&self) -> &ParameterStore {
        &self.parameters
    }

    pub fn controller(&self) -> &PredictionController {
        &self.controller
    }

    pub fn state(&self) -> &ResultState {
        self.controller.state()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Waits for the next request to resolve. `None` once nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<CompletionReport> {
        let (generation, outcome) = self.in_flight.next().await?;
        let completion = self.controller.complete(generation, outcome);
        Some(CompletionReport {
            generation,
            completion,
        })
    }

    pub async fn settle(&mut self) -> &ResultState {
        while self.next_completion().await.is_some() {}
        self.controller.state()
    }

    fn issue(&mut self, snapshot: ParameterState) -> Generation {
        let pending = self.controller.begin(snapshot);
        let service = Arc::clone(&self.service);
        self.in_flight.push(
            async move {
                let outcome = service.predict(&pending.request).await;
                (pending.generation, outcome)
            }
            .boxed(),
        );
        pending.generation
    }
}
