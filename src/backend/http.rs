//! reqwest implementation of [`ChatBackend`] against the Mercodex HTTP API.
//!
//! Endpoints:
//! - `POST {base}/api/chatBot`
//! - `GET  {base}/api/chatBot/myHistory/{user_id}`
//! - `GET  {base}/api/chatBot/history/{session_id}`
//! - `GET  {base}/api/reports/download/...` (absolute URL from the reply)

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use serde_json::Value;

use super::client::{BackendError, ChatBackend};
use super::types::{BotReply, ChatRequest, HistoryEntry, SessionSummary, history_items};

pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout ({}), using defaults", e);
                reqwest::Client::new()
            });
        Self { base_url, client }
    }

    fn sessions_url(base: &str, user_id: &str) -> String {
        format!("{}/api/chatBot/myHistory/{}", base, user_id)
    }

    /// Send a prepared request, turning transport failures and non-2xx
    /// statuses into `BackendError`.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        debug!("Backend response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Backend error: {} - {}", status, message);
            return Err(BackendError::Status { status, message });
        }

        Ok(response)
    }

    async fn get_json(&self, url: &str) -> Result<Value, BackendError> {
        let response = self.execute(self.client.get(url)).await?;
        response
            .json::<Value>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn answers(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Probe of {} failed: {}", url, e);
                false
            }
        }
    }
}

/// `http://localhost:PORT` → `http://127.0.0.1:PORT`; `None` for other hosts.
fn loopback_alternative(base_url: &str) -> Option<String> {
    let mut url = reqwest::Url::parse(base_url).ok()?;
    if url.host_str()? != "localhost" {
        return None;
    }
    url.set_host(Some("127.0.0.1")).ok()?;
    Some(url.as_str().trim_end_matches('/').to_string())
}

#[async_trait]
impl ChatBackend for HttpBackend {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send_message(
        &self,
        session_id: &str,
        user_id: &str,
        text: &str,
    ) -> Result<BotReply, BackendError> {
        let body = ChatRequest::user_message(session_id, user_id, text);
        info!(
            "Sending message: session={}, user={}, len={}",
            session_id,
            user_id,
            text.len()
        );

        let response = self
            .execute(
                self.client
                    .post(format!("{}/api/chatBot", self.base_url))
                    .json(&body),
            )
            .await?;

        let value: Value = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        let reply = BotReply::from_value(&value);
        debug!("Reply classified as {:?}", reply);
        Ok(reply)
    }

    async fn list_sessions(&self, user_id: &str) -> Result<Vec<SessionSummary>, BackendError> {
        let body = self.get_json(&Self::sessions_url(&self.base_url, user_id)).await?;
        let items = body
            .as_array()
            .ok_or_else(|| BackendError::Decode("session list is not an array".to_string()))?;

        let now = Utc::now();
        let sessions: Vec<SessionSummary> = items
            .iter()
            .map(|item| SessionSummary::from_value(item, now))
            .collect();
        info!("Loaded {} sessions for {}", sessions.len(), user_id);
        Ok(sessions)
    }

    async fn session_history(&self, session_id: &str) -> Result<Vec<HistoryEntry>, BackendError> {
        let body = self
            .get_json(&format!("{}/api/chatBot/history/{}", self.base_url, session_id))
            .await?;
        let items = history_items(&body).ok_or_else(|| {
            BackendError::Decode("history is neither an array nor has a messages array".to_string())
        })?;

        let entries: Vec<HistoryEntry> = items.iter().map(HistoryEntry::from_value).collect();
        info!("Loaded {} history entries for {}", entries.len(), session_id);
        Ok(entries)
    }

    async fn download_report(&self, url: &str) -> Result<Vec<u8>, BackendError> {
        info!("Downloading report from {}", url);
        let response = self.execute(self.client.get(url)).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn probe(&self, user_id: &str) -> bool {
        if self.answers(&Self::sessions_url(&self.base_url, user_id)).await {
            info!("Probe: {} reachable", self.base_url);
            return true;
        }
        if let Some(alt) = loopback_alternative(&self.base_url) {
            warn!("Probe: {} unreachable, trying {}", self.base_url, alt);
            if self.answers(&Self::sessions_url(&alt, user_id)).await {
                info!("Probe: {} reachable", alt);
                return true;
            }
        }
        warn!("Probe: backend unreachable");
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loopback_alternative_for_localhost() {
        assert_eq!(
            loopback_alternative("http://localhost:5001").as_deref(),
            Some("http://127.0.0.1:5001")
        );
    }

    #[test]
    fn test_loopback_alternative_ignores_other_hosts() {
        assert!(loopback_alternative("http://10.0.0.2:5001").is_none());
        assert!(loopback_alternative("not a url").is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let backend = HttpBackend::new("http://localhost:5001/", Duration::from_secs(5));
        assert_eq!(backend.base_url(), "http://localhost:5001");
    }
}
