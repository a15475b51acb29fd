use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub type RequestId = u64;
pub type SessionId = u64;
pub type NotificationId = u64;

/// Precomputed analyses keyed by catalog brand.
pub type PrecomputedAnalyses = BTreeMap<String, AnalysisResult>;

/// One row of the product catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub brand: String,
    #[serde(default)]
    pub ingredients: String,
}

/// The product currently under analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRef {
    pub brand: String,
    pub ingredients: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub success: bool,
    #[serde(default)]
    pub cereal_name: String,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub analysis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Everything the stateless chat endpoint needs for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub cereal_name: String,
    pub ingredients: String,
    pub previous_analysis: String,
    pub question: String,
    pub chat_history: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found { ingredients: String },
    NotFound { message: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeOutcome {
    Analyzed(AnalysisResult),
    Rejected { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    Answered(String),
    Rejected { error: String },
}

/// A call that never produced a usable service reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub message: String,
}

impl TransportFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Final verdict of the startup status poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStatus {
    Ready,
    Unavailable { attempts: u32 },
}
