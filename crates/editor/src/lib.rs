#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Multi-page XML form editor core.
//!
//! Form pages and a raw text page edit one shared structured document model.
//! This crate keeps them consistent:
//!
//! - [`EditCoordinator`] - Nested edit sessions that bracket the model exactly
//!   once, and undoable edits recorded as one undo entry
//! - [`ModelChangeFanout`] - Turns model events into one `document_changed`
//!   call per change
//! - [`FormEditor`] - Page host: creation, default page selection, remembered
//!   page, commit and reveal
//! - [`EditorConfig`] - TOML configuration
//!
//! All types are confined to the thread that created them.

pub mod config;
pub mod editor;
pub mod error;
pub mod fanout;
pub mod pages;
pub mod session;
#[cfg(test)]
mod testing;

pub use config::EditorConfig;
pub use editor::{EditorInput, FormEditor};
pub use error::{ConfigError, PageError, SessionError};
pub use fanout::{DocumentObserver, ModelChangeFanout};
pub use pages::{
	EditorPage, InMemoryPageMemory, PageKind, PageMemory, PageSet, TEXT_PAGE_ID,
};
pub use session::{DEFAULT_PROJECT_TAG, EditCoordinator, EditOutcome, EditScope};
