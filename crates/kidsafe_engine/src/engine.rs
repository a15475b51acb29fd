use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use kidsafe_core::{ChatRequest, PrecomputedAnalyses, RequestId, SessionId};
use kidsafe_logging::{kidsafe_debug, kidsafe_warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::precomputed::{load_precomputed, PrecomputedError};
use crate::service::{AnalysisService, HttpAnalysisService, ServiceSettings};
use crate::status::{poll_until_ready, PollSettings};
use crate::{EngineEvent, ServiceError, Timer};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub service: ServiceSettings,
    pub poll: PollSettings,
    pub precomputed_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            service: ServiceSettings::default(),
            poll: PollSettings::default(),
            precomputed_path: PathBuf::from("precomputed-analyses.json"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("analysis service client: {0}")]
    Service(#[from] ServiceError),
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

enum EngineCommand {
    LoadCatalog,
    LoadPrecomputed,
    PollStatus,
    Search {
        request: RequestId,
        product_name: String,
    },
    Analyze {
        request: RequestId,
        product_name: String,
        ingredients: String,
    },
    Chat {
        session: SessionId,
        request: ChatRequest,
    },
    Schedule {
        after: Duration,
        timer: Timer,
    },
}

/// Sends work to the engine runtime. Dropping it stops the status poller.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    cancel: CancellationToken,
}

/// Receiving side of engine results.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

#[derive(Clone)]
struct Worker {
    service: Arc<dyn AnalysisService>,
    config: Arc<EngineConfig>,
    event_tx: mpsc::Sender<EngineEvent>,
    cancel: CancellationToken,
}

impl EngineHandle {
    /// Starts an engine talking HTTP to the configured service.
    pub fn spawn(config: EngineConfig) -> Result<(Self, EngineEvents), EngineError> {
        let service = HttpAnalysisService::new(config.service.clone())?;
        Self::spawn_with_service(Arc::new(service), config)
    }

    pub fn spawn_with_service(
        service: Arc<dyn AnalysisService>,
        config: EngineConfig,
    ) -> Result<(Self, EngineEvents), EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("kidsafe-engine")
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let worker = Worker {
            service,
            config: Arc::new(config),
            event_tx,
            cancel: cancel.clone(),
        };

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let worker = worker.clone();
                runtime.spawn(async move {
                    worker.handle(command).await;
                });
            }
            kidsafe_debug!("Engine command channel closed; shutting down runtime");
        });

        Ok((Self { cmd_tx, cancel }, EngineEvents { event_rx }))
    }

    pub fn load_catalog(&self) {
        self.send(EngineCommand::LoadCatalog);
    }

    pub fn load_precomputed(&self) {
        self.send(EngineCommand::LoadPrecomputed);
    }

    pub fn poll_status(&self) {
        self.send(EngineCommand::PollStatus);
    }

    pub fn search(&self, request: RequestId, product_name: impl Into<String>) {
        self.send(EngineCommand::Search {
            request,
            product_name: product_name.into(),
        });
    }

    pub fn analyze(
        &self,
        request: RequestId,
        product_name: impl Into<String>,
        ingredients: impl Into<String>,
    ) {
        self.send(EngineCommand::Analyze {
            request,
            product_name: product_name.into(),
            ingredients: ingredients.into(),
        });
    }

    pub fn chat(&self, session: SessionId, request: ChatRequest) {
        self.send(EngineCommand::Chat { session, request });
    }

    pub fn schedule(&self, after: Duration, timer: Timer) {
        self.send(EngineCommand::Schedule { after, timer });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            kidsafe_warn!("Engine runtime is gone; command dropped");
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl EngineEvents {
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

impl Worker {
    /// File IO runs on the blocking pool so it never stalls HTTP tasks.
    async fn load_precomputed(&self) -> Result<PrecomputedAnalyses, PrecomputedError> {
        let path = self.config.precomputed_path.clone();
        tokio::task::spawn_blocking(move || load_precomputed(&path))
            .await
            .unwrap_or_else(|err| {
                kidsafe_warn!("Precomputed load task failed: {}", err);
                Err(PrecomputedError::Interrupted(err.to_string()))
            })
    }

    async fn handle(&self, command: EngineCommand) {
        let event = match command {
            EngineCommand::LoadCatalog => EngineEvent::CatalogLoaded(self.service.catalog().await),
            EngineCommand::LoadPrecomputed => {
                EngineEvent::PrecomputedLoaded(self.load_precomputed().await)
            }
            EngineCommand::PollStatus => {
                match poll_until_ready(self.service.as_ref(), &self.config.poll, &self.cancel)
                    .await
                {
                    Some(status) => EngineEvent::BackendStatus(status),
                    None => {
                        kidsafe_debug!("Status polling cancelled");
                        return;
                    }
                }
            }
            EngineCommand::Search {
                request,
                product_name,
            } => EngineEvent::SearchCompleted {
                request,
                result: self.service.search_product(&product_name).await,
            },
            EngineCommand::Analyze {
                request,
                product_name,
                ingredients,
            } => EngineEvent::AnalyzeCompleted {
                request,
                result: self.service.analyze(&product_name, &ingredients).await,
            },
            EngineCommand::Chat { session, request } => EngineEvent::ChatCompleted {
                session,
                result: self.service.chat(&request).await,
            },
            EngineCommand::Schedule { after, timer } => {
                tokio::time::sleep(after).await;
                EngineEvent::TimerElapsed(timer)
            }
        };
        let _ = self.event_tx.send(event);
    }
}
