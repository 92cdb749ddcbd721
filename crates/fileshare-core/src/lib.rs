//! fileshare-core - Core library for FileShare Hub
//!
//! This crate holds the session state machine, the file listing reconciler,
//! and the storage actions used by the FileShare Hub front ends, together
//! with the Supabase auth and storage clients they talk to.

pub mod auth;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod format;
pub mod listing;
pub mod models;
pub mod preview;
pub mod session;
pub mod storage;
pub mod util;

pub use dispatcher::ActionDispatcher;
pub use error::{Error, Result};
pub use models::{FileRecord, Identity, StatsSnapshot};
pub use session::{SessionState, SessionStore};
