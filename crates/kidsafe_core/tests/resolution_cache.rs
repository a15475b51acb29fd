use std::sync::Once;

use kidsafe_core::{
    update, AnalysisResult, AppState, BackendStatus, CatalogEntry, Effect, Msg, NotificationKind,
    PrecomputedAnalyses, ProductRef, Resolution, MSG_FOUND_LOCALLY, MSG_NOT_IN_CACHE,
    REVEAL_DELAY,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(kidsafe_logging::initialize_for_tests);
}

fn entry(brand: &str, ingredients: &str) -> CatalogEntry {
    CatalogEntry {
        brand: brand.to_string(),
        ingredients: ingredients.to_string(),
    }
}

fn safe(analysis: &str) -> AnalysisResult {
    AnalysisResult {
        success: true,
        analysis: analysis.to_string(),
        ..AnalysisResult::default()
    }
}

/// Catalog with OatCo and Choco Bombs (cached) and Plain Flakes (not cached).
fn loaded_state(ready: bool) -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::CatalogLoaded(Ok(vec![
            entry("OatCo", "oats, sugar"),
            entry("Choco Bombs", "sugar, cocoa"),
            entry("Plain Flakes", "corn"),
        ])),
    );
    let precomputed = PrecomputedAnalyses::from([
        ("OatCo".to_string(), safe("**Safe**")),
        (
            "Choco Bombs".to_string(),
            AnalysisResult {
                success: true,
                cereal_name: "Choco Bombs".to_string(),
                ingredients: "sugar, cocoa".to_string(),
                analysis: "**High sugar**".to_string(),
                error: None,
            },
        ),
    ]);
    let (state, _) = update(state, Msg::PrecomputedLoaded(Ok(precomputed)));
    if ready {
        update(state, Msg::BackendStatusChanged(BackendStatus::Ready)).0
    } else {
        state
    }
}

fn select(state: AppState, brand: &str) -> (AppState, Vec<Effect>) {
    update(state, Msg::CatalogSelected(Some(brand.to_string())))
}

#[test]
fn cache_hit_shows_precomputed_entry_without_network() {
    init_logging();
    let (state, effects) = select(loaded_state(true), "OatCo");

    assert_eq!(state.resolution(), Resolution::Resolved);
    assert_eq!(state.analysis(), Some(&safe("**Safe**")));
    assert_eq!(
        state.selected(),
        Some(&ProductRef {
            brand: "OatCo".to_string(),
            ingredients: Some("oats, sugar".to_string()),
        })
    );
    assert!(effects.iter().all(|effect| !effect.is_network_call()));
    assert_eq!(effects, vec![Effect::RevealResults { delay: REVEAL_DELAY }]);
}

#[test]
fn cache_hit_works_before_backend_is_ready() {
    init_logging();
    let (state, _effects) = select(loaded_state(false), "Choco Bombs");
    assert_eq!(state.resolution(), Resolution::Resolved);
    assert_eq!(state.analysis().unwrap().analysis, "**High sugar**");
}

#[test]
fn cache_hit_opens_session_named_after_product() {
    init_logging();
    let (state, _effects) = select(loaded_state(true), "OatCo");
    let session = state.session().expect("session");
    // The precomputed entry has no cereal_name, so the brand is used.
    assert_eq!(session.product_name(), "OatCo");
    assert_eq!(session.messages().len(), 1);
}

#[test]
fn cache_miss_notifies_and_stays_idle() {
    init_logging();
    let (state, effects) = select(loaded_state(true), "Plain Flakes");

    assert_eq!(state.resolution(), Resolution::Idle);
    assert!(state.analysis().is_none());
    assert!(state.session().is_none());
    assert_eq!(state.selected().unwrap().brand, "Plain Flakes");
    let notification = state.view().notification.unwrap();
    assert_eq!(notification.kind, NotificationKind::Error);
    assert_eq!(notification.message, MSG_NOT_IN_CACHE);
    assert_eq!(effects.len(), 1);
    assert!(matches!(effects[0], Effect::ExpireNotification { .. }));
}

#[test]
fn second_selection_never_shows_first_analysis() {
    init_logging();
    let (state, _) = select(loaded_state(true), "OatCo");
    let first_session = state.session().unwrap().id();

    let (state, _) = select(state, "Plain Flakes");
    assert!(state.analysis().is_none());
    assert!(state.session().is_none());

    let (state, _) = select(state, "Choco Bombs");
    assert_eq!(state.analysis().unwrap().cereal_name, "Choco Bombs");
    assert_ne!(state.session().unwrap().id(), first_session);
}

#[test]
fn clearing_selection_resets_everything() {
    init_logging();
    let (state, _) = update(
        loaded_state(true),
        Msg::SearchInputChanged("something".to_string()),
    );
    let (state, _) = select(state, "OatCo");
    let (state, effects) = update(state, Msg::CatalogSelected(None));

    assert!(effects.is_empty());
    assert_eq!(state.resolution(), Resolution::Idle);
    assert!(state.analysis().is_none());
    assert!(state.selected().is_none());
    let view = state.view();
    assert!(view.search_input.is_empty());
    assert!(view.manual_ingredients.is_empty());
    assert!(!view.manual_mode);
    assert!(view.chat.is_none());
}

#[test]
fn search_matching_cached_brand_short_circuits() {
    init_logging();
    let (state, _) = update(loaded_state(true), Msg::SearchInputChanged("oatco".to_string()));
    let (state, effects) = update(state, Msg::SearchSubmitted);

    assert_eq!(state.resolution(), Resolution::Resolved);
    assert_eq!(state.analysis(), Some(&safe("**Safe**")));
    assert!(effects.iter().all(|effect| !effect.is_network_call()));
    assert!(effects.contains(&Effect::RevealResults { delay: REVEAL_DELAY }));
    let notification = state.view().notification.unwrap();
    assert_eq!(notification.kind, NotificationKind::Success);
    assert_eq!(notification.message, MSG_FOUND_LOCALLY);
}
