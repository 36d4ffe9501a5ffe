//! Message classification — bot commands and reminder requests.

mod schedule;


pub use schedule::split_schedule;

use chrono::NaiveDateTime;
use remind_core::task::{truncate_to_minute, NewTask, Task};

/// Literal start command.
pub const START: &str = "/start";

/// Literal "show me the format" command.
pub const ADD: &str = "/add";

/// Reply to `/start`.
pub const WELCOME: &str = "Hi there! I send reminders back to this chat at the minute you ask for. \
     To see how to write a task, send /add.";

/// Reply to `/add`.
pub const FORMAT_HELP: &str =
    "Write your task following this example: 01.01.2022 20:00 Wash dishes";

/// Reply to anything that is not a command or a valid reminder.
pub const UNSUPPORTED: &str = "Unsupported command";

/// Reply when a valid reminder could not be saved.
pub const SAVE_FAILED: &str = "Could not save your task, please try again later.";

/// A validated request to schedule a reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub chat_id: i64,
    /// The full original message, datetime prefix included.
    pub text: String,
    /// Minute-truncated local due time.
    pub due_at: NaiveDateTime,
}

impl ScheduleRequest {
    /// The task this request asks the store to create.
    pub fn into_task(self) -> NewTask {
        NewTask::new(self.chat_id, self.text, self.due_at)
    }
}

/// Classification of one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    AddHelp,
    Schedule(ScheduleRequest),
    Unsupported,
}

impl Command {
    /// Classify message text. Total: every input yields exactly one variant.
    pub fn parse(chat_id: i64, text: &str) -> Self {
        match text {
            START => Self::Start,
            ADD => Self::AddHelp,
            _ => match split_schedule(text) {
                Some((due_at, _payload)) => Self::Schedule(ScheduleRequest {
                    chat_id,
                    text: text.to_string(),
                    due_at: truncate_to_minute(due_at),
                }),
                None => Self::Unsupported,
            },
        }
    }
}

/// Confirmation sent after a task is stored.
pub fn confirmation(task: &Task) -> String {
    format!("Task '{task}' is successfully added")
}
