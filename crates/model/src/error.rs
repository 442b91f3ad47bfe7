//! Error types for model access.

use thiserror::Error;

use crate::access::Access;

/// Errors reported by a [`StructuredModel`](crate::StructuredModel).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
	/// No document model could be obtained.
	#[error("no document model is available")]
	Unavailable,

	/// The model cannot record undo segments.
	#[error("document is not recordable: {0}")]
	NotRecordable(String),

	/// An operation was attempted with the wrong kind of share.
	#[error("{expected} handle required, got {got} handle")]
	WrongAccess {
		/// Access the operation needs.
		expected: Access,
		/// Access of the handle that was passed.
		got: Access,
	},

	/// The handle was already released or belongs to another model.
	#[error("stale model handle #{0}")]
	StaleHandle(u64),

	/// A mutation was attempted outside an `about_to_change`/`changed` bracket.
	#[error("model is not inside a change bracket")]
	NotChanging,
}
