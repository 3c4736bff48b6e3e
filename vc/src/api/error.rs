//! Plan service error types

use thiserror::Error;

/// Remote operation, used to pick the user-facing fallback message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GeneratePlan,
    AnalyzeGaps,
    Health,
}

impl Operation {
    /// Message shown when the service gives no usable detail
    pub fn fallback(self) -> &'static str {
        match self {
            Self::GeneratePlan => "Failed to generate plan. Please try again.",
            Self::AnalyzeGaps => "Failed to analyze plan. Please try again.",
            Self::Health => "Plan service is unreachable",
        }
    }
}

/// Errors that can occur talking to the plan service
///
/// `Display` is the message shown to the user: the server's detail when it
/// sent one, the operation's fallback otherwise.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx status, message is the server detail or the fallback
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("{}", .operation.fallback())]
    Network {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },

    /// 2xx response that reported `success: false`
    #[error("{}", .operation.fallback())]
    Unsuccessful { operation: Operation },

    /// 2xx response whose body could not be decoded
    #[error("{}", .operation.fallback())]
    InvalidResponse { operation: Operation, detail: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ApiError {
    /// HTTP status when the server answered with an error
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the request never got a response
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network { .. })
    }
}
