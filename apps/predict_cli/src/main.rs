use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{load_settings, HttpPredictionService, PredictionSession, ResultState};
use serde::Serialize;
use shared::domain::{ParameterState, ProcessParameter};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Headless golden batch prediction client")]
struct Args {
    #[arg(long)]
    service_url: Option<String>,
    #[arg(long)]
    request_timeout_ms: Option<u64>,
    /// Commit TEMP:PRESS after the startup prediction. Repeatable; the last one wins.
    #[arg(long = "commit", value_name = "TEMP:PRESS", value_parser = parse_commit)]
    commits: Vec<ParameterState>,
    /// Probe the service health route and exit.
    #[arg(long)]
    health: bool,
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    temperature: f64,
    pressure: f64,
    state: &'static str,
    prediction: Option<&'a str>,
    is_golden_batch: Option<bool>,
    classification: Option<&'static str>,
}

impl<'a> Report<'a> {
    fn new(parameters: ParameterState, state: &'a ResultState) -> Self {
        let (name, result) = match state {
            ResultState::Idle => ("idle", None),
            ResultState::Loading => ("loading", None),
            ResultState::Success(result) => ("success", Some(result)),
            ResultState::Error => ("error", None),
        };
        Self {
            temperature: parameters.temperature,
            pressure: parameters.pressure,
            state: name,
            prediction: result.map(|r| r.label.as_str()),
            is_golden_batch: result.map(|r| r.is_golden),
            classification: result.map(|r| r.classification().label()),
        }
    }

    fn render_text(&self) -> String {
        let inputs = format!(
            "temperature={}{} pressure={} {}",
            self.temperature,
            ProcessParameter::Temperature.unit(),
            self.pressure,
            ProcessParameter::Pressure.unit()
        );
        match (self.prediction, self.classification) {
            (Some(label), Some(classification)) => format!("{inputs} -> {label} ({classification})"),
            _ if self.state == "error" => format!("{inputs} -> Error: backend offline"),
            _ => format!("{inputs} -> {}", self.state),
        }
    }
}

fn parse_commit(raw: &str) -> Result<ParameterState, String> {
    let (temperature, pressure) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected TEMP:PRESS, got '{raw}'"))?;
    let temperature = parse_in_domain(ProcessParameter::Temperature, temperature)?;
    let pressure = parse_in_domain(ProcessParameter::Pressure, pressure)?;
    Ok(ParameterState::new(temperature, pressure))
}

fn parse_in_domain(parameter: ProcessParameter, raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{} '{raw}' is not a number", parameter.label()))?;
    let range = parameter.range();
    if !range.contains(&value) {
        return Err(format!(
            "{} must be within {}..={} {}",
            parameter.label(),
            range.start(),
            range.end(),
            parameter.unit()
        ));
    }
    Ok(value)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    let settings =
        load_settings().with_overrides(args.service_url.as_deref(), args.request_timeout_ms)?;
    let service = Arc::new(HttpPredictionService::from_settings(&settings)?);

    if args.health {
        let health = service
            .check_health()
            .await
            .with_context(|| format!("health check against {} failed", service.base_url()))?;
        if args.json {
            println!("{}", serde_json::to_string(&health)?);
        } else {
            println!(
                "{}: {}",
                health.status,
                health.message.as_deref().unwrap_or("no message")
            );
        }
        if !health.is_online() {
            bail!("prediction service reports status '{}'", health.status);
        }
        return Ok(());
    }

    let mut session = PredictionSession::new(service);
    session.start();
    for snapshot in &args.commits {
        session.set_temperature(snapshot.temperature);
        session.set_pressure(snapshot.pressure);
        session.commit();
    }
    let parameters = session.parameters().last_committed().unwrap_or_default();
    let state = session.settle().await.clone();

    let report = Report::new(parameters, &state);
    if args.json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!("{}", report.render_text());
    }

    if state == ResultState::Error {
        bail!("prediction failed: service unavailable or returned an invalid response");
    }
    Ok(())
}
