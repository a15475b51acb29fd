use std::fmt;

use kidsafe_core::{
    AnalyzeOutcome, BackendStatus, CatalogEntry, ChatOutcome, NotificationId,
    PrecomputedAnalyses, RequestId, SearchOutcome, SessionId,
};
use thiserror::Error;

use crate::PrecomputedError;

#[derive(Debug)]
pub enum EngineEvent {
    CatalogLoaded(Result<Vec<CatalogEntry>, ServiceError>),
    PrecomputedLoaded(Result<PrecomputedAnalyses, PrecomputedError>),
    SearchCompleted {
        request: RequestId,
        result: Result<SearchOutcome, ServiceError>,
    },
    AnalyzeCompleted {
        request: RequestId,
        result: Result<AnalyzeOutcome, ServiceError>,
    },
    ChatCompleted {
        session: SessionId,
        result: Result<ChatOutcome, ServiceError>,
    },
    BackendStatus(BackendStatus),
    TimerElapsed(Timer),
}

/// Delayed wake-ups the engine can deliver back to the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    ExpireNotification(NotificationId),
    RevealResults,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: FailureKind,
    pub message: String,
}

impl ServiceError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "unexpected response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
