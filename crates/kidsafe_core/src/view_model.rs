use crate::notification::Notification;
use crate::{AnalysisResult, BackendState, ChatMessage, ProductRef, Resolution, SessionId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub backend: BackendState,
    pub catalog_loading: bool,
    pub catalog: Vec<String>,
    pub precomputed_count: usize,
    pub resolution: Resolution,
    pub selected: Option<ProductRef>,
    pub analysis: Option<AnalysisResult>,
    pub search_input: String,
    pub manual_ingredients: String,
    pub manual_mode: bool,
    pub search_enabled: bool,
    pub analyze_enabled: bool,
    pub notification: Option<Notification>,
    pub chat: Option<ChatView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatView {
    pub session: SessionId,
    pub product_name: String,
    pub messages: Vec<ChatMessage>,
    pub pending: bool,
    pub input: String,
    pub send_enabled: bool,
}
