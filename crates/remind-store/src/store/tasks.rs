//! Scheduled task CRUD.

use super::Store;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use remind_core::{
    error::RemindError,
    task::{from_storage, to_storage, truncate_to_minute, NewTask, Task},
    traits::TaskStore,
};

type TaskRow = (i64, i64, String, String);

fn row_to_task((id, chat_id, text, due_at): TaskRow) -> Result<Task, RemindError> {
    let due_at = from_storage(&due_at).ok_or_else(|| {
        RemindError::Store(format!("task {id} has malformed due_at '{due_at}'"))
    })?;
    Ok(Task {
        id,
        chat_id,
        text,
        due_at,
    })
}

#[async_trait]
impl TaskStore for Store {
    async fn insert(&self, task: NewTask) -> Result<Task, RemindError> {
        let due_at = truncate_to_minute(task.due_at);
        let result = sqlx::query("INSERT INTO tasks (chat_id, text, due_at) VALUES (?, ?, ?)")
            .bind(task.chat_id)
            .bind(&task.text)
            .bind(to_storage(due_at))
            .execute(&self.pool)
            .await
            .map_err(|e| RemindError::Store(format!("create task failed: {e}")))?;

        Ok(Task::from_new(result.last_insert_rowid(), task))
    }

    async fn get_by_due_at(&self, due_at: NaiveDateTime) -> Result<Option<Task>, RemindError> {
        // One row per lookup; ties on due_at resolve to the oldest record.
        let row: Option<TaskRow> = sqlx::query_as(
            "SELECT id, chat_id, text, due_at FROM tasks \
             WHERE due_at = ? ORDER BY id LIMIT 1",
        )
        .bind(to_storage(truncate_to_minute(due_at)))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RemindError::Store(format!("get task by due time failed: {e}")))?;

        row.map(row_to_task).transpose()
    }

    async fn delete(&self, id: i64) -> Result<bool, RemindError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RemindError::Store(format!("delete task failed: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn pending_count(&self) -> Result<i64, RemindError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RemindError::Store(format!("count tasks failed: {e}")))?;

        Ok(count)
    }
}
