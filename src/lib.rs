//! hnscope: tag-based Hacker News search with cached link thumbnails.
//!
//! The user keeps a list of search tags. Every change to the list re-runs
//! one query against the HN search API, and every new result set triggers a
//! thumbnail batch for the linked pages:
//! tags → search → thumbnails
//!
//! # Architecture
//!
//! - **Search, thumbnails, storage**: the `hnscope-search` crate
//! - **Session**: [`Session`] owns the tags, the latest hits and the
//!   thumbnail map, and drives each step explicitly
//! - **Config**: [`AppConfig`] loaded from TOML, see [`hnscope_dirs`]

pub mod config;
pub mod error;
pub mod hnscope_dirs;
pub mod session;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use session::Session;
