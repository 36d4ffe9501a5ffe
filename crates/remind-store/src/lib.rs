//! # remind-store
//!
//! Persistent task storage for remindbot (SQLite-backed).

pub mod store;

pub use store::Store;
