//! Edit session state machine.

use std::num::NonZeroUsize;
use std::rc::Rc;

use xmlform_model::ModelHandle;

/// Whether an edit bracket is open, and how deeply it is nested.
///
/// The edit share exists exactly while the state is `Active`.
#[derive(Debug, Default)]
pub(crate) enum SessionState {
	#[default]
	Idle,
	Active {
		depth: NonZeroUsize,
		/// Edit share taken by the outermost session. Lent out to mutations
		/// by cloning, so no borrow of the state outlives a lookup.
		handle: Rc<ModelHandle>,
	},
}

/// Result of leaving one session level.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Exit {
	/// An enclosing session is still open.
	Nested { depth: usize },
	/// The outermost session closed; its share must be signaled and released.
	Outermost(Rc<ModelHandle>),
	/// Left more times than entered.
	Underflow,
}

impl SessionState {
	pub(crate) fn depth(&self) -> usize {
		match self {
			Self::Idle => 0,
			Self::Active { depth, .. } => depth.get(),
		}
	}

	pub(crate) fn is_active(&self) -> bool {
		matches!(self, Self::Active { .. })
	}

	/// Edit share of the open session.
	pub(crate) fn handle(&self) -> Option<Rc<ModelHandle>> {
		match self {
			Self::Idle => None,
			Self::Active { handle, .. } => Some(Rc::clone(handle)),
		}
	}

	/// Opens the outermost session around an already prepared share.
	pub(crate) fn open(&mut self, handle: ModelHandle) {
		debug_assert!(!self.is_active(), "outermost session opened twice");
		*self = Self::Active {
			depth: NonZeroUsize::MIN,
			handle: Rc::new(handle),
		};
	}

	/// Enters a nested session. Returns `false` when idle.
	pub(crate) fn nest(&mut self) -> bool {
		match self {
			Self::Idle => false,
			Self::Active { depth, .. } => {
				*depth = depth.saturating_add(1);
				true
			}
		}
	}

	/// Leaves one level, returning to `Idle` when the outermost level closes.
	pub(crate) fn leave(&mut self) -> Exit {
		match std::mem::take(self) {
			Self::Idle => Exit::Underflow,
			Self::Active { depth, handle } => match NonZeroUsize::new(depth.get() - 1) {
				Some(depth) => {
					*self = Self::Active { depth, handle };
					Exit::Nested { depth: depth.get() }
				}
				None => Exit::Outermost(handle),
			},
		}
	}
}
