use crate::{
    AnalyzeOutcome, BackendStatus, CatalogEntry, ChatOutcome, NotificationId,
    PrecomputedAnalyses, RequestId, SearchOutcome, SessionId, TransportFailure,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The app finished wiring and wants its startup loads.
    Started,
    /// Catalog list arrived (or failed).
    CatalogLoaded(Result<Vec<CatalogEntry>, TransportFailure>),
    /// Precomputed analyses were read; the error carries a human-readable reason.
    PrecomputedLoaded(Result<PrecomputedAnalyses, String>),
    /// The status poller reached a verdict.
    BackendStatusChanged(BackendStatus),
    /// User picked a catalog brand, or cleared the pick with `None`.
    CatalogSelected(Option<String>),
    /// User edited the free-text product name.
    SearchInputChanged(String),
    /// User asked to search for the typed product name.
    SearchSubmitted,
    /// Reply to an online ingredient search.
    SearchCompleted {
        request: RequestId,
        result: Result<SearchOutcome, TransportFailure>,
    },
    /// User edited the manual ingredients text.
    ManualIngredientsChanged(String),
    /// User asked to analyze the manually entered ingredients.
    ManualAnalyzeSubmitted,
    /// Reply to an analysis call, automatic or manual.
    AnalyzeCompleted {
        request: RequestId,
        result: Result<AnalyzeOutcome, TransportFailure>,
    },
    /// User edited the chat input.
    ChatInputChanged(String),
    /// User sent the chat input.
    ChatSubmitted,
    /// Reply to a chat turn.
    ChatCompleted {
        session: SessionId,
        result: Result<ChatOutcome, TransportFailure>,
    },
    /// A notification's display time ran out.
    NotificationExpired(NotificationId),
}
