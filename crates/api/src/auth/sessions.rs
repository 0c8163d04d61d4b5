//! Background cleanup of expired sessions

use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;

use super::service::AuthService;

/// Periodically delete expired sessions.
///
/// The first sweep runs one full `period` after start. Failures are logged
/// and the loop keeps going; resolution never depends on this task.
pub fn spawn_session_reaper(auth: Arc<AuthService>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            if let Err(e) = auth.reap_expired_sessions().await {
                tracing::error!(error = %e, "Session reaper failed");
            }
        }
    })
}
