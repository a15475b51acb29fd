use std::time::Duration;

use crate::{ChatRequest, NotificationId, RequestId, SessionId};

/// How long a notification stays visible.
pub const NOTIFICATION_TTL: Duration = Duration::from_millis(3000);
/// Delay before revealing results, so the result view exists when revealed.
pub const REVEAL_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadCatalog,
    LoadPrecomputedAnalyses,
    StartStatusPolling,
    SearchProduct {
        request: RequestId,
        product_name: String,
    },
    AnalyzeIngredients {
        request: RequestId,
        product_name: String,
        ingredients: String,
    },
    SendChat {
        session: SessionId,
        request: ChatRequest,
    },
    RevealResults {
        delay: Duration,
    },
    ExpireNotification {
        id: NotificationId,
        after: Duration,
    },
}

impl Effect {
    /// True for effects that reach the analysis service.
    pub fn is_network_call(&self) -> bool {
        matches!(
            self,
            Effect::SearchProduct { .. } | Effect::AnalyzeIngredients { .. } | Effect::SendChat { .. }
        )
    }
}
