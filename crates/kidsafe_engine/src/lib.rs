//! KidSafe engine: analysis service client and effect execution.
mod decode;
mod engine;
mod precomputed;
mod service;
mod status;
mod types;

pub use engine::{EngineConfig, EngineError, EngineEvents, EngineHandle};
pub use precomputed::{load_precomputed, PrecomputedError};
pub use service::{AnalysisService, HttpAnalysisService, ServiceSettings};
pub use status::{poll_until_ready, PollSettings};
pub use types::{EngineEvent, FailureKind, ServiceError, Timer};
