use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for generating unique owner IDs.
static NEXT_OWNER_ID: AtomicU64 = AtomicU64::new(1);

/// How a model share was acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
	/// Shared for reading; must not be used to change the model.
	Read,
	/// Shared for editing; required for change brackets and undo recording.
	Edit,
}

impl fmt::Display for Access {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Read => f.write_str("read"),
			Self::Edit => f.write_str("edit"),
		}
	}
}

/// One reference-counted share of a model.
///
/// Minted by [`StructuredModel::acquire`] and handed back exactly once through
/// [`StructuredModel::release`]. Neither `Clone` nor `Copy`: a share is
/// released at most once.
///
/// [`StructuredModel::acquire`]: crate::StructuredModel::acquire
/// [`StructuredModel::release`]: crate::StructuredModel::release
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a model handle must be released"]
pub struct ModelHandle {
	id: u64,
	access: Access,
}

impl ModelHandle {
	/// Creates a handle. Only engines should call this.
	pub fn new(id: u64, access: Access) -> Self {
		Self { id, access }
	}

	/// Engine-local identifier of this share.
	pub fn id(&self) -> u64 {
		self.id
	}

	pub fn access(&self) -> Access {
		self.access
	}

	pub fn is_edit(&self) -> bool {
		self.access == Access::Edit
	}
}

/// Identity of the client that owns an undo recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(pub u64);

impl OwnerId {
	/// Generates a new unique owner ID.
	pub fn next() -> Self {
		Self(NEXT_OWNER_ID.fetch_add(1, Ordering::Relaxed))
	}
}

/// Registration returned by [`StructuredModel::subscribe`].
///
/// [`StructuredModel::subscribe`]: crate::StructuredModel::subscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(pub u64);
