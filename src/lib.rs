//! Home-directory file locator.
//!
//! This crate provides the pieces behind the `filescout` binary:
//! - Filesystem walk that builds a flat list of file paths
//! - Persistent index cache with compression
//! - Multi-term substring matching over the cached list
//! - Interactive session state machine and its terminal front-end

pub mod error;
pub mod indexer;
pub mod persistence;
pub mod platform;
pub mod query;
pub mod session;
pub mod tui;

// Re-export main types
pub use error::{Result, ScoutError};
pub use indexer::{build_file_index, WalkStats};
pub use persistence::{load_index, save_index, INDEX_FILE_NAME};
pub use query::{match_paths, MATCH_CAP};
pub use session::{Outcome, Session, SessionEvent};
