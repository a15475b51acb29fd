use std::io;
use std::sync::mpsc;
use std::thread;

use kidsafe_core::{AppViewModel, Effect, Msg, TransportFailure};
use kidsafe_engine::{EngineConfig, EngineError, EngineEvent, EngineEvents, EngineHandle, Timer};
use kidsafe_logging::{kidsafe_debug, kidsafe_info, kidsafe_warn};

use super::app::LoopEvent;

/// Receives the delayed reveal of a freshly resolved analysis.
pub trait ResultsViewport {
    /// Returns whether the results were shown.
    fn reveal_results(&mut self, view: &AppViewModel) -> io::Result<bool>;
}

/// Executes effects from `update` against the engine and feeds engine
/// results back into the app loop.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: EngineConfig, loop_tx: mpsc::Sender<LoopEvent>) -> Result<Self, EngineError> {
        kidsafe_info!(
            "Starting engine; service={} precomputed={}",
            config.service.base_url,
            config.precomputed_path.display()
        );
        let (engine, events) = EngineHandle::spawn(config)?;
        spawn_event_forwarder(events, loop_tx);
        Ok(Self { engine })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            if effect.is_network_call() {
                kidsafe_debug!("Network effect {:?}", effect);
            }
            match effect {
                Effect::LoadCatalog => self.engine.load_catalog(),
                Effect::LoadPrecomputedAnalyses => self.engine.load_precomputed(),
                Effect::StartStatusPolling => self.engine.poll_status(),
                Effect::SearchProduct {
                    request,
                    product_name,
                } => {
                    kidsafe_info!("Search request={} name_len={}", request, product_name.len());
                    self.engine.search(request, product_name);
                }
                Effect::AnalyzeIngredients {
                    request,
                    product_name,
                    ingredients,
                } => {
                    kidsafe_info!(
                        "Analyze request={} product={} ingredients_len={}",
                        request,
                        product_name,
                        ingredients.len()
                    );
                    self.engine.analyze(request, product_name, ingredients);
                }
                Effect::SendChat { session, request } => {
                    kidsafe_info!(
                        "Chat session={} history_len={}",
                        session,
                        request.chat_history.len()
                    );
                    self.engine.chat(session, request);
                }
                Effect::RevealResults { delay } => {
                    self.engine.schedule(delay, Timer::RevealResults);
                }
                Effect::ExpireNotification { id, after } => {
                    self.engine.schedule(after, Timer::ExpireNotification(id));
                }
            }
        }
    }

    /// Hands the current view to the viewport once the reveal delay elapsed.
    pub fn reveal(
        &self,
        viewport: &mut dyn ResultsViewport,
        view: &AppViewModel,
    ) -> io::Result<bool> {
        match &view.analysis {
            Some(analysis) => {
                kidsafe_debug!("Revealing results for {}", analysis.cereal_name);
                viewport.reveal_results(view)
            }
            None => {
                kidsafe_debug!("Reveal skipped; no analysis in view");
                Ok(false)
            }
        }
    }
}

fn spawn_event_forwarder(events: EngineEvents, loop_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            if loop_tx.send(to_loop_event(event)).is_err() {
                break;
            }
        }
        kidsafe_debug!("Engine event stream ended");
    });
}

fn to_loop_event(event: EngineEvent) -> LoopEvent {
    let msg = match event {
        EngineEvent::CatalogLoaded(result) => Msg::CatalogLoaded(result.map_err(transport)),
        EngineEvent::PrecomputedLoaded(result) => {
            Msg::PrecomputedLoaded(result.map_err(|err| err.to_string()))
        }
        EngineEvent::SearchCompleted { request, result } => Msg::SearchCompleted {
            request,
            result: result.map_err(transport),
        },
        EngineEvent::AnalyzeCompleted { request, result } => Msg::AnalyzeCompleted {
            request,
            result: result.map_err(transport),
        },
        EngineEvent::ChatCompleted { session, result } => Msg::ChatCompleted {
            session,
            result: result.map_err(transport),
        },
        EngineEvent::BackendStatus(status) => Msg::BackendStatusChanged(status),
        EngineEvent::TimerElapsed(Timer::ExpireNotification(id)) => Msg::NotificationExpired(id),
        EngineEvent::TimerElapsed(Timer::RevealResults) => return LoopEvent::Reveal,
    };
    LoopEvent::Msg(msg)
}

fn transport(err: kidsafe_engine::ServiceError) -> TransportFailure {
    kidsafe_warn!("Service call failed: {}", err);
    TransportFailure::new(err.to_string())
}
