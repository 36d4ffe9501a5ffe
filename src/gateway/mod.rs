//! Gateway — the main event loop connecting the channel, the task store,
//! and the reminder scheduler.

mod scheduler;


pub use scheduler::ReminderScheduler;

use crate::commands::{self, Command};
use remind_core::{
    config::SchedulerConfig,
    message::{IncomingMessage, OutgoingMessage},
    traits::{Channel, TaskStore},
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Routes inbound messages to replies or task creation, and owns the
/// scheduler's lifetime.
pub struct Gateway {
    pub(super) channel: Arc<dyn Channel>,
    pub(super) store: Arc<dyn TaskStore>,
    pub(super) scheduler_config: SchedulerConfig,
}

impl Gateway {
    /// Create a new gateway.
    pub fn new(
        channel: Arc<dyn Channel>,
        store: Arc<dyn TaskStore>,
        scheduler_config: SchedulerConfig,
    ) -> Self {
        Self {
            channel,
            store,
            scheduler_config,
        }
    }

    /// Run the main event loop until Ctrl-C or the channel closes.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        info!(
            "remindbot gateway running | channel: {} | scheduler: {}",
            self.channel.name(),
            if self.scheduler_config.enabled {
                format!("every {}s", self.scheduler_config.poll_interval_secs)
            } else {
                "disabled".to_string()
            },
        );

        let name = self.channel.name().to_string();
        let mut rx = self
            .channel
            .start()
            .await
            .map_err(|e| anyhow::anyhow!("failed to start channel {name}: {e}"))?;
        info!("Channel started: {name}");

        let sched_handle = if self.scheduler_config.enabled {
            let scheduler = ReminderScheduler::new(self.store.clone(), self.channel.clone());
            let poll_secs = self.scheduler_config.poll_interval_secs;
            Some(tokio::spawn(async move {
                scheduler.run(poll_secs).await;
            }))
        } else {
            None
        };

        loop {
            tokio::select! {
                incoming = rx.recv() => match incoming {
                    Some(incoming) => {
                        let gw = self.clone();
                        tokio::spawn(async move {
                            gw.handle_message(incoming).await;
                        });
                    }
                    None => {
                        warn!("channel {name} closed its message stream");
                        break;
                    }
                },
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        self.shutdown(&sched_handle).await;
        Ok(())
    }

    /// Stop the scheduler and the channel.
    async fn shutdown(&self, sched_handle: &Option<JoinHandle<()>>) {
        if let Some(h) = sched_handle {
            h.abort();
        }
        if let Err(e) = self.channel.stop().await {
            warn!("failed to stop channel {}: {e}", self.channel.name());
        }
        info!("remindbot gateway stopped");
    }

    /// Handle one inbound message: exactly one reply, at most one store write.
    pub(super) async fn handle_message(&self, incoming: IncomingMessage) {
        info!(
            "processing message {} from chat {} ({})",
            incoming.id,
            incoming.chat_id,
            incoming.sender_name.as_deref().unwrap_or("unknown")
        );

        let reply = self.respond(&incoming).await;
        let msg = OutgoingMessage::new(incoming.chat_id, reply);
        if let Err(e) = self.channel.send(msg).await {
            error!("failed to reply to chat {}: {e}", incoming.chat_id);
        }
    }

    /// Compute the reply text, creating a task when the message asks for one.
    pub(super) async fn respond(&self, incoming: &IncomingMessage) -> String {
        match Command::parse(incoming.chat_id, &incoming.text) {
            Command::Start => commands::WELCOME.to_string(),
            Command::AddHelp => commands::FORMAT_HELP.to_string(),
            Command::Schedule(request) => match self.store.insert(request.into_task()).await {
                Ok(task) => {
                    info!("task {} stored for chat {}: {task}", task.id, task.chat_id);
                    commands::confirmation(&task)
                }
                Err(e) => {
                    error!("failed to store task for chat {}: {e}", incoming.chat_id);
                    commands::SAVE_FAILED.to_string()
                }
            },
            Command::Unsupported => {
                error!(
                    "unsupported message format from chat {}: {:?}",
                    incoming.chat_id, incoming.text
                );
                commands::UNSUPPORTED.to_string()
            }
        }
    }
}
