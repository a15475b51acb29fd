//! KidSafe core: pure resolution and conversation state machine.
mod catalog;
mod conversation;
mod effect;
mod msg;
mod notification;
mod resolution;
mod state;
mod types;
mod update;
mod view_model;

pub use catalog::{Catalog, PrecomputedStatus};
pub use conversation::{greeting, ConversationSession};
pub use effect::{Effect, NOTIFICATION_TTL, REVEAL_DELAY};
pub use msg::Msg;
pub use notification::{Notification, NotificationKind};
pub use resolution::{
    MSG_ANALYSIS_COMPLETE, MSG_AUTO_ANALYZE_FAILED, MSG_BACKEND_NOT_READY, MSG_FOUND_LOCALLY,
    MSG_FOUND_ONLINE, MSG_MANUAL_REQUIRED, MSG_NAME_REQUIRED, MSG_NOT_FOUND_DEFAULT,
    MSG_NOT_IN_CACHE, MSG_SEARCHING, MSG_SEARCH_FAILED,
};
pub use state::{AppState, BackendState, Resolution};
pub use types::{
    AnalysisResult, AnalyzeOutcome, BackendStatus, CatalogEntry, ChatMessage, ChatOutcome,
    ChatRequest, NotificationId, PrecomputedAnalyses, ProductRef, RequestId, Role,
    SearchOutcome, SessionId, TransportFailure,
};
pub use update::{update, MSG_CATALOG_FAILED, MSG_PRECOMPUTED_MISSING, MSG_PRECOMPUTED_READY};
pub use view_model::{AppViewModel, ChatView};
