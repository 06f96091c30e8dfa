//! top.gg listing service reporter.

use std::time::Duration;

use reqwest::{Client, header};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::domain::entities::UserId;
use crate::domain::errors::WebError;

const TOPGG_API_BASE: &str = "https://top.gg/api";
/// How often the guild count is posted.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Serialize)]
struct StatsBody {
    server_count: usize,
}

/// Posts the bot's guild count to top.gg.
pub struct TopGgReporter {
    client: Client,
    base_url: String,
    token: Zeroizing<String>,
}

impl TopGgReporter {
    /// Creates new reporter with default base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(token: impl Into<String>, timeout: Duration) -> Result<Self, WebError> {
        Self::with_base_url(token, timeout, TOPGG_API_BASE)
    }

    /// Creates reporter with custom base URL.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_base_url(
        token: impl Into<String>,
        timeout: Duration,
        base_url: impl Into<String>,
    ) -> Result<Self, WebError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WebError::network("", format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            token: Zeroizing::new(token.into()),
        })
    }

    fn stats_url(&self, bot_id: UserId) -> String {
        format!("{}/bots/{bot_id}/stats", self.base_url)
    }

    /// Posts one stats update.
    ///
    /// # Errors
    /// Returns error if the request fails or top.gg rejects it.
    pub async fn post_stats(&self, bot_id: UserId, server_count: usize) -> Result<(), WebError> {
        let url = self.stats_url(bot_id);
        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, self.token.as_str())
            .json(&StatsBody { server_count })
            .send()
            .await
            .map_err(|e| WebError::network(&url, e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(WebError::status(url, status.as_u16()))
        }
    }

    /// Posts the current guild count now and then every [`REPORT_INTERVAL`]
    /// until the count sender is dropped. Failures are logged and retried on
    /// the next tick.
    pub fn spawn(self, bot_id: UserId, mut guild_count: watch::Receiver<usize>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(REPORT_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    changed = guild_count.changed() => {
                        if changed.is_err() {
                            debug!("Guild count source closed, stopping top.gg reporter");
                            return;
                        }
                        continue;
                    }
                }

                let count = *guild_count.borrow();
                match self.post_stats(bot_id, count).await {
                    Ok(()) => info!(server_count = count, "Posted server count to top.gg"),
                    Err(e) => warn!(error = %e, "Failed to post server count to top.gg"),
                }
            }
        })
    }
}
