use std::fmt;

use crate::extraction::ResultRecord;
use crate::session::transport::TransportError;

/// Observable lifecycle of one analysis session. Each transition replaces the
/// whole value; nothing carries over from the previous request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnalysisState {
    #[default]
    Idle,
    Submitting,
    Success(ResultRecord),
    Failed(FailureReason),
}

impl AnalysisState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, AnalysisState::Submitting)
    }

    pub fn record(&self) -> Option<&ResultRecord> {
        match self {
            AnalysisState::Success(record) => Some(record),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            AnalysisState::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// User-facing cause of a failed analysis. The session accepts a new submit
/// after any of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The document could not be packaged into a request; nothing was sent.
    InvalidDocument(String),
    Network(String),
    Server { status: u16, message: String },
    MalformedResponse(String),
    /// The submission was dropped before its reply arrived.
    Abandoned,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::InvalidDocument(detail) => {
                write!(f, "The selected file could not be sent: {detail}")
            }
            FailureReason::Network(_) => {
                write!(f, "Could not reach the analysis service. Check your connection and try again.")
            }
            FailureReason::Server { status, message } if message.is_empty() => {
                write!(f, "The analysis service failed (status {status}). Please try again.")
            }
            FailureReason::Server { status, message } => {
                write!(f, "The analysis service failed (status {status}): {message}")
            }
            FailureReason::MalformedResponse(_) => {
                write!(f, "The analysis service sent an unreadable reply. Please try again.")
            }
            FailureReason::Abandoned => write!(f, "The analysis was cancelled before it finished."),
        }
    }
}

impl From<TransportError> for FailureReason {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::InvalidDocument(detail) => FailureReason::InvalidDocument(detail),
            TransportError::Network(detail) => FailureReason::Network(detail),
            TransportError::Server { status, message } => FailureReason::Server { status, message },
            TransportError::Malformed(detail) => FailureReason::MalformedResponse(detail),
        }
    }
}
