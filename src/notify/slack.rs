//! Slack `chat.postMessage` notifier.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::config::SlackConfig;
use crate::error::{Error, Result};
use crate::notify::{ChatNotifier, Notification};

/// Slack Web API root
pub const SLACK_API_URL: &str = "https://slack.com/api/";

/// Posts notifications through the Slack Web API.
pub struct SlackNotifier {
    config: SlackConfig,
    endpoint: Url,
    client: reqwest::Client,
}

impl SlackNotifier {
    /// Create a notifier against `api_url` (the Web API root).
    pub fn new(config: SlackConfig, api_url: &str) -> Result<Self> {
        let base = Url::parse(api_url)
            .map_err(|e| Error::Config(format!("invalid Slack API URL '{api_url}': {e}")))?;
        let endpoint = base
            .join("chat.postMessage")
            .map_err(|e| Error::Config(format!("invalid Slack API URL '{api_url}': {e}")))?;

        Ok(Self {
            config,
            endpoint,
            client: reqwest::Client::new(),
        })
    }

    fn format_payload(&self, notification: &Notification) -> SlackMessage {
        let color = if notification.is_failure() {
            "#e74c3c"
        } else {
            "#2ecc71"
        };

        SlackMessage {
            channel: self.config.channel.clone(),
            username: self.config.username.clone(),
            text: notification.title(),
            attachments: vec![SlackAttachment {
                color: color.to_string(),
                text: notification.body(),
                mrkdwn_in: vec!["text".to_string()],
                ts: Utc::now().timestamp(),
            }],
        }
    }
}

#[async_trait]
impl ChatNotifier for SlackNotifier {
    fn name(&self) -> &'static str {
        "slack"
    }

    async fn send(&self, notification: &Notification) -> Result<()> {
        let payload = self.format_payload(notification);

        debug!(channel = %self.config.channel, title = %payload.text, "posting to Slack");

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.config.token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Slack request failed");
            return Err(Error::Notify(format!("Slack returned {status}: {body}")));
        }

        let reply: SlackReply = response.json().await?;
        if !reply.ok {
            let reason = reply.error.unwrap_or_else(|| "unknown error".to_string());
            return Err(Error::Notify(format!("Slack rejected message: {reason}")));
        }

        debug!(ts = ?reply.ts, "posted to Slack");
        Ok(())
    }
}

// =============================================================================
// Slack API types
// =============================================================================

#[derive(Debug, Serialize)]
struct SlackMessage {
    channel: String,
    username: String,
    text: String,
    attachments: Vec<SlackAttachment>,
}

#[derive(Debug, Serialize)]
struct SlackAttachment {
    color: String,
    text: String,
    mrkdwn_in: Vec<String>,
    ts: i64,
}

#[derive(Debug, Deserialize)]
struct SlackReply {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    ts: Option<String>,
}
