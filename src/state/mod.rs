/// State management module
///
/// This module handles all application state, including:
/// - Generation options and their defaults (options.rs)
/// - Shared data structures (data.rs)
/// - The bounded, persisted history list (history.rs)
/// - The SQLite-backed key/value store behind it (storage.rs)
pub mod data;
pub mod history;
pub mod options;
pub mod storage;
