use thiserror::Error;

/// Why a prediction request did not produce a result.
///
/// The operator sees both variants the same way; the split only feeds logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictionError {
    #[error("prediction service unavailable: {reason}")]
    ServiceUnavailable { reason: String },
    #[error("invalid prediction response: {reason}")]
    InvalidResponse { reason: String },
}

impl PredictionError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            reason: reason.into(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            reason: reason.into(),
        }
    }

    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::invalid(err.to_string())
        } else if err.is_timeout() {
            Self::unavailable(format!("request timed out: {err}"))
        } else if err.is_connect() {
            Self::unavailable(format!("failed to connect: {err}"))
        } else {
            Self::unavailable(err.to_string())
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Self::ServiceUnavailable { reason } | Self::InvalidResponse { reason } => reason,
        }
    }
}
