//! Product resolution: catalog cache first, then online search with
//! automatic analysis, then manual entry.

use kidsafe_logging::{kidsafe_debug, kidsafe_info, kidsafe_warn};

use crate::notification::NotificationKind;
use crate::{
    AnalyzeOutcome, AppState, Effect, ProductRef, RequestId, Resolution, SearchOutcome,
    TransportFailure,
};

pub const MSG_NOT_IN_CACHE: &str = "Analysis not found for this product";
pub const MSG_NAME_REQUIRED: &str = "Please enter a product name";
pub const MSG_FOUND_LOCALLY: &str = "Found in database!";
pub const MSG_SEARCHING: &str = "Searching online for product information...";
pub const MSG_FOUND_ONLINE: &str = "Found ingredients! Analyzing...";
pub const MSG_NOT_FOUND_DEFAULT: &str = "Product not found. Please enter ingredients manually.";
pub const MSG_SEARCH_FAILED: &str = "Could not search online. Please enter ingredients manually.";
pub const MSG_ANALYSIS_COMPLETE: &str = "Analysis complete!";
pub const MSG_AUTO_ANALYZE_FAILED: &str = "Analysis failed";
pub const MSG_MANUAL_REQUIRED: &str = "Please enter both product name and ingredients";
pub const MSG_BACKEND_NOT_READY: &str = "The analysis service is still starting. Please wait.";

pub(crate) fn select_catalog_entry(state: &mut AppState, brand: Option<String>) -> Vec<Effect> {
    state.reset_selection();
    let Some(brand) = brand.filter(|brand| !brand.trim().is_empty()) else {
        return Vec::new();
    };

    let ingredients = state
        .catalog()
        .entry(&brand)
        .map(|entry| entry.ingredients.clone());
    let product = ProductRef {
        brand: brand.clone(),
        ingredients,
    };

    match state.catalog().lookup(&brand).cloned() {
        Some(result) => {
            kidsafe_info!("Cache hit for {:?}", brand);
            vec![state.resolve(product, result)]
        }
        None => {
            kidsafe_info!("No precomputed analysis for {:?}", brand);
            state.set_selected(product);
            vec![state.notify(NotificationKind::Error, MSG_NOT_IN_CACHE)]
        }
    }
}

pub(crate) fn submit_search(state: &mut AppState) -> Vec<Effect> {
    if state.resolution().is_pending() {
        kidsafe_debug!("Search rejected: resolution already in flight");
        return Vec::new();
    }

    let name = state.search_input().trim().to_string();
    if name.is_empty() {
        return vec![state.notify(NotificationKind::Error, MSG_NAME_REQUIRED)];
    }

    if let Some(entry) = state.catalog().find_local_match(&name).cloned() {
        if let Some(result) = state.catalog().lookup(&entry.brand).cloned() {
            kidsafe_info!("Search {:?} matched cached brand {:?}", name, entry.brand);
            let product = ProductRef {
                brand: entry.brand,
                ingredients: Some(entry.ingredients),
            };
            let reveal = state.resolve(product, result);
            let notice = state.notify(NotificationKind::Success, MSG_FOUND_LOCALLY);
            return vec![reveal, notice];
        }
    }

    if !state.backend_ready() {
        kidsafe_debug!("Search rejected: backend not ready");
        return vec![state.notify(NotificationKind::Error, MSG_BACKEND_NOT_READY)];
    }

    let request = state.begin_request(Resolution::Searching, name.clone(), None);
    kidsafe_info!("Searching online for {:?} (request {})", name, request);
    vec![
        state.notify(NotificationKind::Info, MSG_SEARCHING),
        Effect::SearchProduct {
            request,
            product_name: name,
        },
    ]
}

pub(crate) fn search_completed(
    state: &mut AppState,
    request: RequestId,
    result: Result<SearchOutcome, TransportFailure>,
) -> Vec<Effect> {
    let Some(in_flight) = state.take_in_flight(request, &[Resolution::Searching]) else {
        kidsafe_debug!("Dropping stale search reply for request {}", request);
        return Vec::new();
    };

    match result {
        Ok(SearchOutcome::Found { ingredients }) => {
            let notice = state.notify(NotificationKind::Success, MSG_FOUND_ONLINE);
            let request = state.begin_request(
                Resolution::AutoAnalyzing,
                in_flight.product_name.clone(),
                Some(ingredients.clone()),
            );
            kidsafe_info!(
                "Ingredients found for {:?}; auto-analyzing (request {})",
                in_flight.product_name,
                request
            );
            vec![
                notice,
                Effect::AnalyzeIngredients {
                    request,
                    product_name: in_flight.product_name,
                    ingredients,
                },
            ]
        }
        Ok(SearchOutcome::NotFound { message }) => {
            kidsafe_info!("{:?} not found online", in_flight.product_name);
            state.enter_manual_entry(true);
            let message = message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| MSG_NOT_FOUND_DEFAULT.to_string());
            vec![state.notify(NotificationKind::Info, message)]
        }
        Err(failure) => {
            kidsafe_warn!("Search for {:?} failed: {}", in_flight.product_name, failure);
            state.enter_manual_entry(false);
            vec![state.notify(NotificationKind::Error, MSG_SEARCH_FAILED)]
        }
    }
}

pub(crate) fn submit_manual_analysis(state: &mut AppState) -> Vec<Effect> {
    if state.resolution() != Resolution::ManualEntry {
        kidsafe_debug!(
            "Manual analysis rejected in state {:?}",
            state.resolution()
        );
        return Vec::new();
    }

    let name = state.search_input().trim().to_string();
    let ingredients = state.manual_ingredients().trim().to_string();
    if name.is_empty() || ingredients.is_empty() {
        return vec![state.notify(NotificationKind::Error, MSG_MANUAL_REQUIRED)];
    }

    if !state.backend_ready() {
        kidsafe_debug!("Manual analysis rejected: backend not ready");
        return vec![state.notify(NotificationKind::Error, MSG_BACKEND_NOT_READY)];
    }

    let request = state.begin_request(
        Resolution::Analyzing,
        name.clone(),
        Some(ingredients.clone()),
    );
    kidsafe_info!("Analyzing manual entry {:?} (request {})", name, request);
    vec![Effect::AnalyzeIngredients {
        request,
        product_name: name,
        ingredients,
    }]
}

pub(crate) fn analyze_completed(
    state: &mut AppState,
    request: RequestId,
    result: Result<AnalyzeOutcome, TransportFailure>,
) -> Vec<Effect> {
    let automatic = state.resolution() == Resolution::AutoAnalyzing;
    let Some(in_flight) = state.take_in_flight(
        request,
        &[Resolution::AutoAnalyzing, Resolution::Analyzing],
    ) else {
        kidsafe_debug!("Dropping stale analysis reply for request {}", request);
        return Vec::new();
    };

    match result {
        Ok(AnalyzeOutcome::Analyzed(analysis)) => {
            kidsafe_info!("Analysis complete for {:?}", in_flight.product_name);
            let product = ProductRef {
                brand: in_flight.product_name,
                ingredients: in_flight.ingredients,
            };
            let reveal = state.resolve(product, analysis);
            let notice = state.notify(NotificationKind::Success, MSG_ANALYSIS_COMPLETE);
            vec![reveal, notice]
        }
        Ok(AnalyzeOutcome::Rejected { error }) if automatic => {
            kidsafe_warn!("Auto-analysis rejected: {}", error);
            state.set_resolution(Resolution::Idle);
            vec![state.notify(NotificationKind::Error, MSG_AUTO_ANALYZE_FAILED)]
        }
        Err(failure) if automatic => {
            kidsafe_warn!("Auto-analysis failed: {}", failure);
            state.set_resolution(Resolution::Idle);
            vec![state.notify(NotificationKind::Error, MSG_AUTO_ANALYZE_FAILED)]
        }
        Ok(AnalyzeOutcome::Rejected { error }) => {
            kidsafe_warn!("Manual analysis rejected: {}", error);
            state.enter_manual_entry(false);
            vec![state.notify(NotificationKind::Error, format!("Error: {error}"))]
        }
        Err(failure) => {
            kidsafe_warn!("Manual analysis failed: {}", failure);
            state.enter_manual_entry(false);
            vec![state.notify(
                NotificationKind::Error,
                format!("Failed to analyze: {failure}"),
            )]
        }
    }
}
