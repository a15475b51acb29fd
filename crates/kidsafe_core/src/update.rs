use kidsafe_logging::{kidsafe_debug, kidsafe_info, kidsafe_warn};

use crate::notification::NotificationKind;
use crate::resolution;
use crate::{AppState, BackendState, BackendStatus, ChatOutcome, Effect, Msg, SessionId, TransportFailure};

pub const MSG_CATALOG_FAILED: &str = "Failed to load catalog";
pub const MSG_PRECOMPUTED_READY: &str = "Ready! Select a product for instant analysis";
pub const MSG_PRECOMPUTED_MISSING: &str = "Pre-computed data missing. Please regenerate.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => {
            if state.mark_started() {
                vec![
                    Effect::LoadCatalog,
                    Effect::LoadPrecomputedAnalyses,
                    Effect::StartStatusPolling,
                ]
            } else {
                Vec::new()
            }
        }
        Msg::CatalogLoaded(Ok(entries)) => {
            kidsafe_info!("Catalog loaded with {} products", entries.len());
            state.catalog_mut().set_entries(entries);
            Vec::new()
        }
        Msg::CatalogLoaded(Err(failure)) => {
            kidsafe_warn!("Catalog load failed: {}", failure);
            vec![state.notify(NotificationKind::Error, MSG_CATALOG_FAILED)]
        }
        Msg::PrecomputedLoaded(Ok(analyses)) => {
            kidsafe_info!("Loaded {} precomputed analyses", analyses.len());
            state.catalog_mut().set_precomputed(analyses);
            vec![state.notify(NotificationKind::Info, MSG_PRECOMPUTED_READY)]
        }
        Msg::PrecomputedLoaded(Err(reason)) => {
            kidsafe_warn!("Precomputed analyses unavailable: {}", reason);
            state.catalog_mut().mark_precomputed_missing();
            vec![state.notify(NotificationKind::Error, MSG_PRECOMPUTED_MISSING)]
        }
        Msg::BackendStatusChanged(status) => backend_status_changed(&mut state, status),
        Msg::CatalogSelected(brand) => resolution::select_catalog_entry(&mut state, brand),
        Msg::SearchInputChanged(text) => {
            state.set_search_input(text);
            Vec::new()
        }
        Msg::SearchSubmitted => resolution::submit_search(&mut state),
        Msg::SearchCompleted { request, result } => {
            resolution::search_completed(&mut state, request, result)
        }
        Msg::ManualIngredientsChanged(text) => {
            state.set_manual_ingredients(text);
            Vec::new()
        }
        Msg::ManualAnalyzeSubmitted => resolution::submit_manual_analysis(&mut state),
        Msg::AnalyzeCompleted { request, result } => {
            resolution::analyze_completed(&mut state, request, result)
        }
        Msg::ChatInputChanged(text) => {
            if state.session().is_some() {
                state.set_chat_input(text);
            }
            Vec::new()
        }
        Msg::ChatSubmitted => submit_chat(&mut state),
        Msg::ChatCompleted { session, result } => {
            chat_completed(&mut state, session, result);
            Vec::new()
        }
        Msg::NotificationExpired(id) => {
            state.expire_notification(id);
            Vec::new()
        }
    };

    (state, effects)
}

fn backend_status_changed(state: &mut AppState, status: BackendStatus) -> Vec<Effect> {
    match status {
        BackendStatus::Ready => {
            if state.set_backend(BackendState::Ready) {
                kidsafe_info!("Analysis service is ready");
            }
            Vec::new()
        }
        BackendStatus::Unavailable { attempts } => {
            if !state.set_backend(BackendState::Unavailable { attempts }) {
                return Vec::new();
            }
            kidsafe_warn!("Analysis service not ready after {} checks", attempts);
            vec![state.notify(
                NotificationKind::Error,
                format!("Backend did not become ready after {attempts} status checks"),
            )]
        }
    }
}

fn submit_chat(state: &mut AppState) -> Vec<Effect> {
    let text = state.chat_input().to_string();
    let Some(session) = state.session_mut() else {
        return Vec::new();
    };
    let session_id = session.id();
    let Some(request) = session.submit(&text) else {
        kidsafe_debug!("Chat submit ignored (blank or turn in flight)");
        return Vec::new();
    };

    state.set_chat_input(String::new());
    kidsafe_info!("Chat turn sent for session {}", session_id);
    vec![Effect::SendChat {
        session: session_id,
        request,
    }]
}

fn chat_completed(
    state: &mut AppState,
    session: SessionId,
    result: Result<ChatOutcome, TransportFailure>,
) {
    if let Err(failure) = &result {
        kidsafe_warn!("Chat transport failure: {}", failure);
    }
    let applied = match state.session_mut() {
        Some(current) if current.id() == session => current.apply_reply(result),
        _ => false,
    };
    if applied {
        state.mark_dirty();
    } else {
        kidsafe_debug!("Dropping chat reply for inactive session {}", session);
    }
}
