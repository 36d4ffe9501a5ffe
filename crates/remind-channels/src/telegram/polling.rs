//! Long-polling update loop and Channel trait implementation.

use super::types::{TgMessage, TgResponse, TgUpdate};
use super::TelegramChannel;
use async_trait::async_trait;
use remind_core::{
    error::RemindError,
    message::{IncomingMessage, OutgoingMessage},
    traits::Channel,
};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use uuid::Uuid;

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingMessage>, RemindError> {
        self.register_commands().await;

        let (tx, rx) = mpsc::channel(64);
        let client = self.client.clone();
        let base_url = self.base_url.clone();
        let last_update_id = self.last_update_id.clone();

        info!("Telegram channel starting long polling...");

        tokio::spawn(async move {
            let mut backoff_secs: u64 = 1;

            loop {
                let last = last_update_id.lock().await;
                let offset = last.map(|id| id + 1);
                drop(last);

                let mut url = format!("{base_url}/getUpdates?timeout=30");
                if let Some(off) = offset {
                    url.push_str(&format!("&offset={off}"));
                }

                let resp = match client.get(&url).timeout(Duration::from_secs(35)).send().await {
                    Ok(r) => r,
                    Err(e) => {
                        error!("telegram poll error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                        backoff_secs = next_backoff(backoff_secs);
                        continue;
                    }
                };

                let body: TgResponse<Vec<TgUpdate>> = match resp.json().await {
                    Ok(b) => b,
                    Err(e) => {
                        error!("telegram parse error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                        backoff_secs = next_backoff(backoff_secs);
                        continue;
                    }
                };

                if !body.ok {
                    error!(
                        "telegram API error (retry in {backoff_secs}s): {}",
                        body.description.unwrap_or_default()
                    );
                    tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                    backoff_secs = next_backoff(backoff_secs);
                    continue;
                }

                // Successful poll -- reset backoff.
                backoff_secs = 1;

                let updates = body.result.unwrap_or_default();

                if let Some(last_update) = updates.last() {
                    *last_update_id.lock().await = Some(last_update.update_id);
                }

                for update in updates {
                    debug!("processing telegram update {}", update.update_id);
                    let msg = match update.message {
                        Some(m) => m,
                        None => continue,
                    };

                    if tx.send(to_incoming(msg)).await.is_err() {
                        info!("telegram channel receiver dropped, stopping poll");
                        return;
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), RemindError> {
        self.send_text(message.chat_id, &message.text).await
    }

    async fn stop(&self) -> Result<(), RemindError> {
        info!("Telegram channel stopped");
        Ok(())
    }
}

/// Double the poll backoff, capped at one minute.
pub(crate) fn next_backoff(secs: u64) -> u64 {
    (secs * 2).min(60)
}

/// Convert a Telegram message into a channel-neutral incoming message.
///
/// Messages without text (stickers, photos, ...) are forwarded with an empty
/// body so the sender still gets a reply.
pub(crate) fn to_incoming(msg: TgMessage) -> IncomingMessage {
    let sender_name = msg.from.as_ref().map(|user| {
        if let Some(ref un) = user.username {
            format!("@{un}")
        } else if let Some(ref ln) = user.last_name {
            format!("{} {ln}", user.first_name)
        } else {
            user.first_name.clone()
        }
    });

    IncomingMessage {
        id: Uuid::new_v4(),
        channel: "telegram".to_string(),
        chat_id: msg.chat.id,
        sender_name,
        text: msg.text.unwrap_or_default(),
        timestamp: chrono::Utc::now(),
    }
}
