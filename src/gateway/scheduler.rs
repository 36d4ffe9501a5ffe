//! Scheduled reminder delivery.
//!
//! One timer task drives the scheduler. Each tick runs on its own spawned
//! task behind a non-blocking guard: a tick that fires while another is
//! still dispatching is dropped, never queued.

use chrono::{Local, NaiveDateTime};
use remind_core::{
    message::OutgoingMessage,
    task::truncate_to_minute,
    traits::{Channel, TaskStore},
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Another tick was still dispatching; nothing was touched.
    Skipped,
    /// No task was due this minute.
    Idle,
    /// The task with this id was delivered. Its record is gone, whether this
    /// tick deleted it or something else already had.
    Delivered(i64),
    /// Lookup, delivery, or delete failed. Nothing was deleted without a
    /// successful delivery first.
    Failed,
}

/// Polls the store for tasks due this minute and delivers them.
#[derive(Clone)]
pub struct ReminderScheduler {
    store: Arc<dyn TaskStore>,
    channel: Arc<dyn Channel>,
    dispatching: Arc<AtomicBool>,
}

/// Held while a tick dispatches; releases the flag on drop, whatever the outcome.
struct DispatchGuard<'a>(&'a AtomicBool);

impl<'a> DispatchGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ReminderScheduler {
    pub fn new(store: Arc<dyn TaskStore>, channel: Arc<dyn Channel>) -> Self {
        Self {
            store,
            channel,
            dispatching: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Fire a tick every `poll_secs` seconds, forever.
    pub async fn run(self, poll_secs: u64) {
        let mut interval = tokio::time::interval(Duration::from_secs(poll_secs.max(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!("reminder scheduler started (every {}s)", poll_secs.max(1));

        loop {
            interval.tick().await;
            let scheduler = self.clone();
            tokio::spawn(async move {
                scheduler.tick().await;
            });
        }
    }

    /// Run one tick against the local wall clock.
    pub async fn tick(&self) -> TickOutcome {
        self.tick_at(Local::now().naive_local()).await
    }

    /// Run one tick as if the local time were `now`.
    ///
    /// Looks up a single task due at `now`'s minute; a delivered task is
    /// deleted, an undelivered one stays in the store.
    pub async fn tick_at(&self, now: NaiveDateTime) -> TickOutcome {
        let Some(_guard) = DispatchGuard::acquire(&self.dispatching) else {
            debug!("scheduler: previous tick still dispatching, skipping");
            return TickOutcome::Skipped;
        };

        let minute = truncate_to_minute(now);
        let task = match self.store.get_by_due_at(minute).await {
            Ok(Some(task)) => task,
            Ok(None) => return TickOutcome::Idle,
            Err(e) => {
                error!("scheduler: failed to get due task: {e}");
                return TickOutcome::Failed;
            }
        };

        let msg = OutgoingMessage::new(task.chat_id, task.text.clone());
        if let Err(e) = self.channel.send(msg).await {
            error!("failed to deliver task {} to chat {}: {e}", task.id, task.chat_id);
            return TickOutcome::Failed;
        }

        match self.store.delete(task.id).await {
            Ok(true) => {
                info!("Task '{task}' is pushed to chat {} and deleted", task.chat_id);
                TickOutcome::Delivered(task.id)
            }
            Ok(false) => {
                warn!(
                    "Task '{task}' is pushed to chat {} but was already gone from the store",
                    task.chat_id
                );
                TickOutcome::Delivered(task.id)
            }
            Err(e) => {
                error!("delivered task {} but failed to delete it: {e}", task.id);
                TickOutcome::Failed
            }
        }
    }
}
