use crate::notification::{NotificationKind, Notifier};
use crate::view_model::{AppViewModel, ChatView};
use crate::{
    AnalysisResult, Catalog, ConversationSession, Effect, ProductRef, RequestId, SessionId,
    REVEAL_DELAY,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resolution {
    #[default]
    Idle,
    Searching,
    AutoAnalyzing,
    ManualEntry,
    Analyzing,
    Resolved,
}

impl Resolution {
    /// A resolution call is in flight.
    pub fn is_pending(self) -> bool {
        matches!(
            self,
            Resolution::Searching | Resolution::AutoAnalyzing | Resolution::Analyzing
        )
    }

    pub fn is_manual(self) -> bool {
        matches!(self, Resolution::ManualEntry | Resolution::Analyzing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendState {
    #[default]
    Checking,
    Ready,
    Unavailable {
        attempts: u32,
    },
}

/// The resolution request currently awaiting a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InFlight {
    pub(crate) request: RequestId,
    pub(crate) product_name: String,
    pub(crate) ingredients: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    started: bool,
    backend: BackendState,
    catalog: Catalog,
    resolution: Resolution,
    selected: Option<ProductRef>,
    analysis: Option<AnalysisResult>,
    search_input: String,
    manual_ingredients: String,
    in_flight: Option<InFlight>,
    last_request: RequestId,
    session: Option<ConversationSession>,
    last_session: SessionId,
    chat_input: String,
    notifier: Notifier,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let pending = self.resolution.is_pending();
        let ready = self.backend == BackendState::Ready;
        AppViewModel {
            backend: self.backend,
            catalog_loading: self.catalog.is_loading(),
            catalog: self
                .catalog
                .entries()
                .iter()
                .map(|entry| entry.brand.clone())
                .collect(),
            precomputed_count: self.catalog.precomputed_len(),
            resolution: self.resolution,
            selected: self.selected.clone(),
            analysis: self.analysis.clone(),
            search_input: self.search_input.clone(),
            manual_ingredients: self.manual_ingredients.clone(),
            manual_mode: self.resolution.is_manual(),
            search_enabled: !pending && !self.search_input.trim().is_empty(),
            analyze_enabled: self.resolution == Resolution::ManualEntry
                && ready
                && !self.manual_ingredients.trim().is_empty(),
            notification: self.notifier.current().cloned(),
            chat: self.session.as_ref().map(|session| ChatView {
                session: session.id(),
                product_name: session.product_name().to_string(),
                messages: session.messages().to_vec(),
                pending: session.is_pending(),
                input: self.chat_input.clone(),
                send_enabled: !session.is_pending() && !self.chat_input.trim().is_empty(),
            }),
        }
    }

    /// Returns whether state changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn selected(&self) -> Option<&ProductRef> {
        self.selected.as_ref()
    }

    pub fn session(&self) -> Option<&ConversationSession> {
        self.session.as_ref()
    }

    pub fn backend_ready(&self) -> bool {
        self.backend == BackendState::Ready
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn mark_started(&mut self) -> bool {
        !std::mem::replace(&mut self.started, true)
    }

    pub(crate) fn catalog_mut(&mut self) -> &mut Catalog {
        self.dirty = true;
        &mut self.catalog
    }

    pub(crate) fn set_backend(&mut self, backend: BackendState) -> bool {
        if self.backend == backend {
            return false;
        }
        self.backend = backend;
        self.dirty = true;
        true
    }

    pub(crate) fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) -> Effect {
        self.dirty = true;
        self.notifier.show(kind, message)
    }

    pub(crate) fn expire_notification(&mut self, id: crate::NotificationId) {
        if self.notifier.expire(id) {
            self.dirty = true;
        }
    }

    pub(crate) fn search_input(&self) -> &str {
        &self.search_input
    }

    pub(crate) fn set_search_input(&mut self, text: String) {
        self.search_input = text;
        self.dirty = true;
    }

    pub(crate) fn manual_ingredients(&self) -> &str {
        &self.manual_ingredients
    }

    pub(crate) fn set_manual_ingredients(&mut self, text: String) {
        self.manual_ingredients = text;
        self.dirty = true;
    }

    pub(crate) fn set_resolution(&mut self, resolution: Resolution) {
        self.resolution = resolution;
        self.dirty = true;
    }

    /// Drops everything tied to the previous selection and returns to `Idle`.
    pub(crate) fn reset_selection(&mut self) {
        self.clear_result();
        self.selected = None;
        self.search_input.clear();
        self.manual_ingredients.clear();
        self.in_flight = None;
        self.resolution = Resolution::Idle;
        self.dirty = true;
    }

    pub(crate) fn set_selected(&mut self, product: ProductRef) {
        self.selected = Some(product);
        self.dirty = true;
    }

    /// Starts a resolution call, clearing any analysis still on display.
    pub(crate) fn begin_request(
        &mut self,
        resolution: Resolution,
        product_name: String,
        ingredients: Option<String>,
    ) -> RequestId {
        self.clear_result();
        self.selected = None;
        self.last_request += 1;
        let request = self.last_request;
        self.in_flight = Some(InFlight {
            request,
            product_name,
            ingredients,
        });
        self.resolution = resolution;
        self.dirty = true;
        request
    }

    /// Takes the in-flight request if `request` is it and `expected` is the current state.
    pub(crate) fn take_in_flight(
        &mut self,
        request: RequestId,
        expected: &[Resolution],
    ) -> Option<InFlight> {
        let matches = self
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.request == request)
            && expected.contains(&self.resolution);
        if matches {
            self.in_flight.take()
        } else {
            None
        }
    }

    pub(crate) fn enter_manual_entry(&mut self, clear_ingredients: bool) {
        self.in_flight = None;
        if clear_ingredients {
            self.manual_ingredients.clear();
        }
        self.resolution = Resolution::ManualEntry;
        self.dirty = true;
    }

    /// Installs a finished analysis, opens its chat session and returns the reveal effect.
    pub(crate) fn resolve(&mut self, product: ProductRef, result: AnalysisResult) -> Effect {
        let product_name = if result.cereal_name.trim().is_empty() {
            product.brand.clone()
        } else {
            result.cereal_name.clone()
        };
        let ingredients = if result.ingredients.trim().is_empty() {
            product.ingredients.clone().unwrap_or_default()
        } else {
            result.ingredients.clone()
        };

        self.last_session += 1;
        self.session = Some(ConversationSession::new(
            self.last_session,
            product_name,
            ingredients,
            result.analysis.clone(),
        ));
        self.chat_input.clear();
        self.analysis = Some(result);
        self.selected = Some(product);
        self.in_flight = None;
        self.resolution = Resolution::Resolved;
        self.dirty = true;
        Effect::RevealResults {
            delay: REVEAL_DELAY,
        }
    }

    pub(crate) fn session_mut(&mut self) -> Option<&mut ConversationSession> {
        self.session.as_mut()
    }

    pub(crate) fn chat_input(&self) -> &str {
        &self.chat_input
    }

    pub(crate) fn set_chat_input(&mut self, text: String) {
        self.chat_input = text;
        self.dirty = true;
    }

    fn clear_result(&mut self) {
        self.analysis = None;
        self.session = None;
        self.chat_input.clear();
    }
}
