use crate::{
    error::RemindError,
    message::{IncomingMessage, OutgoingMessage},
    task::{NewTask, Task},
};
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Messaging Channel trait — the transport.
///
/// A messaging platform (Telegram, ...) implements this trait to receive
/// and send messages.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming messages.
    /// Returns a receiver that yields incoming messages.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, RemindError>;

    /// Send a message to the chat named in `message.chat_id`.
    async fn send(&self, message: OutgoingMessage) -> Result<(), RemindError>;

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), RemindError>;
}

/// Durable task storage.
///
/// The dispatcher only inserts; the scheduler only looks up and deletes.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Persist a new task and return it with its assigned id.
    async fn insert(&self, task: NewTask) -> Result<Task, RemindError>;

    /// Find one task due at exactly `due_at` (minute resolution), if any.
    async fn get_by_due_at(&self, due_at: NaiveDateTime) -> Result<Option<Task>, RemindError>;

    /// Delete a task. Returns `false` if no record had that id.
    async fn delete(&self, id: i64) -> Result<bool, RemindError>;

    /// Number of tasks still waiting for delivery.
    async fn pending_count(&self) -> Result<i64, RemindError>;
}
