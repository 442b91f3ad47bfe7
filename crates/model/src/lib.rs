#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Structured document model seam.
//!
//! The editor never owns the parsed document. It borrows it from an external
//! structured-document engine through the [`StructuredModel`] trait, which
//! hands out reference-counted [`ModelHandle`]s for reading or editing,
//! brackets changes with `about_to_change`/`changed`, records undo segments and
//! publishes [`ModelEvent`]s to registered listeners.
//!
//! # Main Types
//!
//! - [`StructuredModel`] - The engine interface consumed by the editor
//! - [`ScopedHandle`] - Acquire/always-release guard used for every bracket
//! - [`MemoryModel`] - In-memory engine used by tests and the CLI
//!
//! # Handle discipline
//!
//! ```text
//! acquire(Edit) ──► about_to_change ──► mutate… ──► changed ──► release
//!      │                                                          ▲
//!      └────────────────── ScopedHandle (Drop) ───────────────────┘
//! ```

/// Access modes, handles and identity tokens.
pub mod access;
/// Model error type.
pub mod error;
/// Lifecycle events and listener trait.
pub mod event;
/// In-memory reference engine.
pub mod memory;
/// The engine trait.
pub mod model;
/// Scoped acquisition helper.
pub mod scoped;
/// Offset helpers over raw document text.
pub mod text;

pub use access::{Access, ModelHandle, OwnerId, SubscriptionToken};
pub use error::ModelError;
pub use event::{ModelEvent, ModelStateListener};
pub use memory::{MemoryModel, ModelCall, ModelStats, UndoEntry};
pub use model::StructuredModel;
pub use scoped::{ScopedHandle, with_handle};
