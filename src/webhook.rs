use anyhow::{anyhow, Context, Result};
use tracing::{error, info};

use crate::types::{WebhookPayload, WebhookText};

/// Wraps rendered text as a chat `text` message.
pub fn build_webhook_payload(content: &str) -> WebhookPayload {
    WebhookPayload {
        msgtype: "text".to_string(),
        text: WebhookText {
            content: content.to_string(),
        },
    }
}

pub async fn send_to_webhook(webhook_url: &str, payload: &WebhookPayload) -> Result<()> {
    let client = reqwest::Client::new();
    let res = client
        .post(webhook_url)
        .json(payload)
        .send()
        .await
        .context("Failed to send webhook request")?;
    if !res.status().is_success() {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        error!("Webhook failed: {} - {}", status, body);
        return Err(anyhow!("Webhook returned non-success status {}", status));
    }
    Ok(())
}

/// Posts `content` to the webhook, logging the outcome. Delivery failures never abort the run.
pub async fn deliver(webhook_url: &str, content: &str) -> bool {
    match send_to_webhook(webhook_url, &build_webhook_payload(content)).await {
        Ok(()) => {
            info!("report delivered to webhook");
            true
        }
        Err(err) => {
            error!("failed to deliver report to webhook: {:#}", err);
            false
        }
    }
}
