use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use kidsafe_core::{
    AnalysisResult, AnalyzeOutcome, BackendStatus, CatalogEntry, ChatOutcome, ChatRequest,
    SearchOutcome,
};
use kidsafe_engine::{
    AnalysisService, EngineConfig, EngineEvent, EngineEvents, EngineHandle, FailureKind,
    PollSettings, PrecomputedError, ServiceError, Timer,
};

const WAIT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct FakeService {
    status_checks: AtomicUsize,
}

#[async_trait::async_trait]
impl AnalysisService for FakeService {
    async fn catalog(&self) -> Result<Vec<CatalogEntry>, ServiceError> {
        Ok(vec![CatalogEntry {
            brand: "OatCo".to_string(),
            ingredients: "oats".to_string(),
        }])
    }

    async fn search_product(&self, product_name: &str) -> Result<SearchOutcome, ServiceError> {
        Ok(SearchOutcome::NotFound {
            message: Some(format!("no match for {product_name}")),
        })
    }

    async fn analyze(
        &self,
        product_name: &str,
        ingredients: &str,
    ) -> Result<AnalyzeOutcome, ServiceError> {
        Ok(AnalyzeOutcome::Analyzed(AnalysisResult {
            success: true,
            cereal_name: product_name.to_string(),
            ingredients: ingredients.to_string(),
            analysis: "fine".to_string(),
            error: None,
        }))
    }

    async fn chat(&self, _request: &ChatRequest) -> Result<ChatOutcome, ServiceError> {
        Err(ServiceError {
            kind: FailureKind::Network,
            message: "offline".to_string(),
        })
    }

    async fn status(&self) -> Result<bool, ServiceError> {
        let checks = self.status_checks.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(checks >= 2)
    }
}

fn spawn(config: EngineConfig) -> (EngineHandle, EngineEvents) {
    EngineHandle::spawn_with_service(Arc::new(FakeService::default()), config).expect("engine")
}

#[test]
fn search_reply_carries_request_id() {
    let (engine, events) = spawn(EngineConfig::default());
    engine.search(42, "Mystery Puffs");

    match events.recv_timeout(WAIT) {
        Some(EngineEvent::SearchCompleted { request, result }) => {
            assert_eq!(request, 42);
            assert_eq!(
                result,
                Ok(SearchOutcome::NotFound {
                    message: Some("no match for Mystery Puffs".to_string())
                })
            );
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn analyze_and_chat_replies_are_delivered() {
    let (engine, events) = spawn(EngineConfig::default());
    engine.analyze(7, "OatCo", "oats");
    match events.recv_timeout(WAIT) {
        Some(EngineEvent::AnalyzeCompleted { request, result }) => {
            assert_eq!(request, 7);
            assert!(matches!(result, Ok(AnalyzeOutcome::Analyzed(_))));
        }
        other => panic!("unexpected event {other:?}"),
    }

    engine.chat(
        3,
        ChatRequest {
            cereal_name: "OatCo".to_string(),
            ingredients: "oats".to_string(),
            previous_analysis: "fine".to_string(),
            question: "?".to_string(),
            chat_history: Vec::new(),
        },
    );
    match events.recv_timeout(WAIT) {
        Some(EngineEvent::ChatCompleted { session, result }) => {
            assert_eq!(session, 3);
            assert_eq!(result.unwrap_err().kind, FailureKind::Network);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn status_polling_reports_ready() {
    let (engine, events) = spawn(EngineConfig {
        poll: PollSettings {
            interval: Duration::from_millis(10),
            max_attempts: 5,
        },
        ..EngineConfig::default()
    });
    engine.poll_status();
    match events.recv_timeout(WAIT) {
        Some(EngineEvent::BackendStatus(status)) => assert_eq!(status, BackendStatus::Ready),
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn missing_precomputed_file_is_reported() {
    let (engine, events) = spawn(EngineConfig {
        precomputed_path: "definitely/not/here.json".into(),
        ..EngineConfig::default()
    });
    engine.load_precomputed();
    match events.recv_timeout(WAIT) {
        Some(EngineEvent::PrecomputedLoaded(Err(PrecomputedError::NotFound(_)))) => {}
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn precomputed_file_loads_off_the_runtime() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("precomputed-analyses.json");
    std::fs::write(
        &path,
        r#"{"OatCo": {"success": true, "cereal_name": "OatCo", "analysis": "Fine."}}"#,
    )
    .unwrap();

    let (engine, events) = spawn(EngineConfig {
        precomputed_path: path,
        ..EngineConfig::default()
    });
    engine.load_precomputed();
    engine.load_catalog();

    let mut saw_catalog = false;
    loop {
        match events.recv_timeout(WAIT) {
            Some(EngineEvent::CatalogLoaded(_)) => saw_catalog = true,
            Some(EngineEvent::PrecomputedLoaded(Ok(analyses))) => {
                assert_eq!(analyses.len(), 1);
                assert_eq!(analyses["OatCo"].analysis, "Fine.");
                break;
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
    if !saw_catalog {
        match events.recv_timeout(WAIT) {
            Some(EngineEvent::CatalogLoaded(Ok(entries))) => assert_eq!(entries.len(), 1),
            other => panic!("unexpected event {other:?}"),
        }
    }
}

#[test]
fn timers_fire_in_delay_order() {
    let (engine, events) = spawn(EngineConfig::default());
    engine.schedule(Duration::from_millis(200), Timer::ExpireNotification(1));
    engine.schedule(Duration::from_millis(10), Timer::RevealResults);

    let first = events.recv_timeout(WAIT);
    let second = events.recv_timeout(WAIT);
    assert!(matches!(first, Some(EngineEvent::TimerElapsed(Timer::RevealResults))));
    assert!(matches!(
        second,
        Some(EngineEvent::TimerElapsed(Timer::ExpireNotification(1)))
    ));
}

#[test]
fn catalog_is_loaded_through_service() {
    let (engine, events) = spawn(EngineConfig::default());
    engine.load_catalog();
    match events.recv() {
        Some(EngineEvent::CatalogLoaded(Ok(entries))) => assert_eq!(entries.len(), 1),
        other => panic!("unexpected event {other:?}"),
    }
}
