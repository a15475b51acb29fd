use std::sync::Once;

use kidsafe_core::{
    update, AnalysisResult, AppState, BackendStatus, CatalogEntry, Effect, Msg,
    PrecomputedAnalyses, RequestId, Resolution, SearchOutcome,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(kidsafe_logging::initialize_for_tests);
}

fn ready_state() -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::CatalogLoaded(Ok(vec![CatalogEntry {
            brand: "OatCo".to_string(),
            ingredients: "oats".to_string(),
        }])),
    );
    let (state, _) = update(
        state,
        Msg::PrecomputedLoaded(Ok(PrecomputedAnalyses::from([(
            "OatCo".to_string(),
            AnalysisResult {
                success: true,
                analysis: "fine".to_string(),
                ..AnalysisResult::default()
            },
        )]))),
    );
    update(state, Msg::BackendStatusChanged(BackendStatus::Ready)).0
}

fn request_of(effects: &[Effect]) -> RequestId {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::SearchProduct { request, .. }
            | Effect::AnalyzeIngredients { request, .. } => Some(*request),
            _ => None,
        })
        .expect("network effect")
}

fn searching_state() -> (AppState, RequestId) {
    let (state, _) = update(ready_state(), Msg::SearchInputChanged("Mystery Bar".to_string()));
    let (state, effects) = update(state, Msg::SearchSubmitted);
    let request = request_of(&effects);
    (state, request)
}

fn manual_state() -> AppState {
    let (state, request) = searching_state();
    update(
        state,
        Msg::SearchCompleted {
            request,
            result: Ok(SearchOutcome::NotFound { message: None }),
        },
    )
    .0
}

#[test]
fn searching_disables_search_and_analyze() {
    init_logging();
    let (state, _) = searching_state();
    let view = state.view();
    assert_eq!(view.resolution, Resolution::Searching);
    assert!(!view.search_enabled);
    assert!(!view.analyze_enabled);
    assert!(!view.manual_mode);
}

#[test]
fn idle_search_needs_a_name() {
    init_logging();
    let state = ready_state();
    assert!(!state.view().search_enabled);
    let (state, _) = update(state, Msg::SearchInputChanged("  ".to_string()));
    assert!(!state.view().search_enabled);
    let (state, _) = update(state, Msg::SearchInputChanged("Bar".to_string()));
    assert!(state.view().search_enabled);
}

#[test]
fn manual_entry_enables_analyze_once_ingredients_are_typed() {
    init_logging();
    let state = manual_state();
    let view = state.view();
    assert!(view.manual_mode);
    assert!(!view.analyze_enabled);

    let (state, _) = update(state, Msg::ManualIngredientsChanged("corn".to_string()));
    assert!(state.view().analyze_enabled);

    let (state, effects) = update(state, Msg::ManualAnalyzeSubmitted);
    assert!(!effects.is_empty());
    let view = state.view();
    assert_eq!(view.resolution, Resolution::Analyzing);
    assert!(view.manual_mode);
    assert!(!view.analyze_enabled);
    assert!(!view.search_enabled);
}

#[test]
fn backend_not_ready_disables_manual_analyze() {
    init_logging();
    let (state, _) = update(manual_state(), Msg::ManualIngredientsChanged("corn".to_string()));
    let (state, _) = update(
        state,
        Msg::BackendStatusChanged(BackendStatus::Unavailable { attempts: 40 }),
    );
    let view = state.view();
    assert_eq!(view.resolution, Resolution::ManualEntry);
    assert!(!view.analyze_enabled);
}

#[test]
fn chat_send_follows_input_and_pending_turn() {
    init_logging();
    let (state, _) = update(ready_state(), Msg::CatalogSelected(Some("OatCo".to_string())));
    let chat = state.view().chat.expect("session after cache hit");
    assert!(!chat.send_enabled);

    let (state, _) = update(state, Msg::ChatInputChanged("any dyes?".to_string()));
    assert!(state.view().chat.expect("chat").send_enabled);

    let (state, _) = update(state, Msg::ChatSubmitted);
    let chat = state.view().chat.expect("chat");
    assert!(chat.pending);
    assert!(!chat.send_enabled);
}
