//! # remind-channels
//!
//! Messaging platform integrations for remindbot.

pub mod telegram;
pub mod utils;
