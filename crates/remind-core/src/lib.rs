//! # remind-core
//!
//! Core types, traits, configuration, and error handling for remindbot.

pub mod config;
pub mod error;
pub mod message;
pub mod task;
pub mod traits;
