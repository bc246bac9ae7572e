//! UI/backend events and error modeling for desktop GUI controller.

use client_core::{Generation, PredictionError, PredictionResult};

pub enum UiEvent {
    Info(String),
    Error(UiError),
    PredictionFinished {
        generation: Generation,
        outcome: Result<PredictionResult, PredictionError>,
    },
    ServiceHealth(ServiceHealth),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ServiceHealth {
    #[default]
    Unknown,
    Online(Option<String>),
    Offline(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connect")
            || message_lower.contains("network")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Connection error",
        UiErrorCategory::Validation => "Invalid data",
        UiErrorCategory::Unknown => "Error",
    }
}
