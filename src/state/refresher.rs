use crate::state::messages::NetworkRequest;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Extra wait past the cache lifetime, so a tick never lands on the entry
/// written by the previous load before it expires.
const EXPIRY_SLACK: Duration = Duration::from_secs(2);

/// Re-requests the league list after each cache lifetime so new leagues show
/// up without a restart.
pub struct PeriodicRefresher {
    network_requests: mpsc::Sender<NetworkRequest>,
    period: Duration,
}

impl PeriodicRefresher {
    pub fn new(network_requests: mpsc::Sender<NetworkRequest>, cache_ttl: Duration) -> Self {
        Self {
            network_requests,
            period: cache_ttl + EXPIRY_SLACK,
        }
    }

    pub async fn run(self) {
        let mut leagues_interval = interval(self.period);
        // Skip the immediate first tick so startup loading isn't double-triggered.
        leagues_interval.tick().await;

        loop {
            leagues_interval.tick().await;
            if self
                .network_requests
                .send(NetworkRequest::LoadLeagues)
                .await
                .is_err()
            {
                break;
            }
        }
    }
}
