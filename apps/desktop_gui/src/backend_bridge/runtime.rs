//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{ClientSettings, HttpPredictionService, PredictionService};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{ServiceHealth, UiError, UiErrorContext, UiEvent};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: ClientSettings) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let service = match HttpPredictionService::from_settings(&settings) {
                Ok(service) => Arc::new(service),
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: {err:#}"),
                    )));
                    tracing::error!("failed to build prediction client: {err:#}");
                    return;
                }
            };
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Backend worker ready ({})",
                service.base_url()
            )));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Predict {
                        generation,
                        request,
                    } => {
                        tracing::info!(
                            generation,
                            temperature = request.temperature,
                            pressure = request.pressure,
                            "backend: predict"
                        );
                        let service = Arc::clone(&service);
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let outcome = service.predict(&request).await;
                            if let Err(err) = &outcome {
                                tracing::error!(generation, "backend: predict failed: {err}");
                            }
                            // completions are never dropped, unlike status events; a full
                            // ui queue parks a blocking-pool thread instead of a runtime worker
                            let delivered = tokio::task::spawn_blocking(move || {
                                ui_tx
                                    .send(UiEvent::PredictionFinished {
                                        generation,
                                        outcome,
                                    })
                                    .is_ok()
                            })
                            .await;
                            if !matches!(delivered, Ok(true)) {
                                tracing::debug!(generation, "ui closed before prediction finished");
                            }
                        });
                    }
                    BackendCommand::ProbeHealth => {
                        tracing::info!("backend: probe_health");
                        let service = Arc::clone(&service);
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let health = match service.check_health().await {
                                Ok(health) if health.is_online() => {
                                    ServiceHealth::Online(health.message)
                                }
                                Ok(health) => ServiceHealth::Offline(format!(
                                    "service reports status '{}'",
                                    health.status
                                )),
                                Err(err) => {
                                    tracing::warn!("backend: probe_health failed: {err}");
                                    ServiceHealth::Offline(err.to_string())
                                }
                            };
                            let _ = ui_tx.try_send(UiEvent::ServiceHealth(health));
                        });
                    }
                }
            }
            tracing::info!("backend command queue closed; worker exiting");
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::{routing::post, Json, Router};
    use client_core::PredictionError;
    use crossbeam_channel::bounded;
    use serde_json::{json, Value};
    use shared::protocol::PredictRequest;
    use tokio::net::TcpListener;

    const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

    async fn spawn_service(app: Router) -> String {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}")
    }

    async fn classify(Json(body): Json<Value>) -> Json<Value> {
        let golden = body["temperature"].as_f64().unwrap_or_default() > 180.0;
        Json(json!({
            "prediction": if golden { "High Quality" } else { "Defective" },
            "is_golden_batch": golden,
        }))
    }

    fn settings_for(service_url: &str) -> ClientSettings {
        ClientSettings::default()
            .with_overrides(Some(service_url), Some(2_000))
            .expect("settings")
    }

    /// Blocks on the ui queue off the test runtime until a prediction completes.
    async fn next_prediction(
        ui_rx: Receiver<UiEvent>,
    ) -> (u64, Result<client_core::PredictionResult, PredictionError>) {
        tokio::task::spawn_blocking(move || loop {
            match ui_rx.recv_timeout(EVENT_TIMEOUT).expect("ui event") {
                UiEvent::PredictionFinished {
                    generation,
                    outcome,
                } => return (generation, outcome),
                _ => continue,
            }
        })
        .await
        .expect("join")
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn predict_command_finishes_with_its_generation() {
        let url = spawn_service(Router::new().route("/predict", post(classify))).await;
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(64);
        launch(cmd_rx, ui_tx, settings_for(&url));

        cmd_tx
            .send(BackendCommand::Predict {
                generation: 7,
                request: PredictRequest {
                    temperature: 190.0,
                    pressure: 25.0,
                },
            })
            .expect("queue predict");

        let (generation, outcome) = next_prediction(ui_rx).await;
        assert_eq!(generation, 7);
        let result = outcome.expect("prediction");
        assert_eq!(result.label, "High Quality");
        assert!(result.is_golden);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn failed_predict_still_reports_its_generation() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let url = format!("http://{}", listener.local_addr().expect("addr"));
        drop(listener);
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(64);
        launch(cmd_rx, ui_tx, settings_for(&url));

        cmd_tx
            .send(BackendCommand::Predict {
                generation: 3,
                request: PredictRequest {
                    temperature: 150.0,
                    pressure: 30.0,
                },
            })
            .expect("queue predict");

        let (generation, outcome) = next_prediction(ui_rx).await;
        assert_eq!(generation, 3);
        assert!(matches!(
            outcome,
            Err(PredictionError::ServiceUnavailable { .. })
        ));
    }
}
