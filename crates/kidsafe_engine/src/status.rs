use std::time::Duration;

use kidsafe_core::BackendStatus;
use kidsafe_logging::{kidsafe_debug, kidsafe_info, kidsafe_warn};
use tokio_util::sync::CancellationToken;

use crate::AnalysisService;

#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_attempts: 40,
        }
    }
}

/// Checks service status until it reports ready or the attempt budget runs out.
///
/// The first check runs immediately. Failed checks count as attempts.
/// Returns `None` when cancelled.
pub async fn poll_until_ready(
    service: &dyn AnalysisService,
    settings: &PollSettings,
    cancel: &CancellationToken,
) -> Option<BackendStatus> {
    let max_attempts = settings.max_attempts.max(1);
    let mut attempts = 0;
    loop {
        attempts += 1;
        let checked = tokio::select! {
            _ = cancel.cancelled() => return None,
            checked = service.status() => checked,
        };
        match checked {
            Ok(true) => {
                kidsafe_info!("Service ready after {} status checks", attempts);
                return Some(BackendStatus::Ready);
            }
            Ok(false) => kidsafe_debug!("Service not ready yet (check {})", attempts),
            Err(err) => kidsafe_warn!("Status check {} failed: {}", attempts, err),
        }

        if attempts >= max_attempts {
            return Some(BackendStatus::Unavailable { attempts });
        }

        tokio::select! {
            _ = cancel.cancelled() => return None,
            _ = tokio::time::sleep(settings.interval) => {}
        }
    }
}
