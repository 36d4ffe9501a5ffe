//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "remindbot".to_string()
}

pub fn default_data_dir() -> String {
    "~/.remindbot".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_db_path() -> String {
    "~/.remindbot/data/tasks.db".to_string()
}

pub fn default_poll_interval() -> u64 {
    10
}
