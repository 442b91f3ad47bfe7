//! Edit session coordination.
//!
//! The [`EditCoordinator`] makes every change to the shared document model go
//! through exactly one `about_to_change`/`changed` bracket, however deeply
//! sessions nest, and wraps undoable edits in a single recording segment.
//!
//! # Lifecycle
//!
//! ```text
//! run_edit_session ─► Idle? ─yes─► acquire(Edit) + about_to_change ─► Active{1}
//!                       └─no──────────────────────────────────────► depth + 1
//!                 ─► mutation(scope)
//!                 ─► (drop guard) depth - 1 ─► 0? ─► Idle, changed, release
//! ```
//!
//! # Threading
//!
//! Sessions are confined to the thread that owns the editor. The coordinator
//! holds an `Rc` and `RefCell` state, so it is neither `Send` nor `Sync`, and no
//! locking is performed.

mod state;
mod undo;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{error, trace, warn};
use xmlform_model::{Access, ModelHandle, OwnerId, ScopedHandle, StructuredModel};

use self::state::{Exit, SessionState};
use crate::error::SessionError;

/// Tag used in diagnostics when the edited resource has no project.
pub const DEFAULT_PROJECT_TAG: &str = "XML Editor";

/// What happened to a requested edit.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a skipped edit should be checked or explicitly ignored"]
pub enum EditOutcome<T> {
	/// The mutation ran and returned this value.
	Applied(T),
	/// The mutation never ran. The reason has already been logged.
	Skipped(SessionError),
}

impl<T> EditOutcome<T> {
	pub fn is_applied(&self) -> bool {
		matches!(self, Self::Applied(_))
	}

	/// Value returned by the mutation, if it ran.
	pub fn applied(self) -> Option<T> {
		match self {
			Self::Applied(value) => Some(value),
			Self::Skipped(_) => None,
		}
	}

	pub fn skipped_reason(&self) -> Option<&SessionError> {
		match self {
			Self::Applied(_) => None,
			Self::Skipped(reason) => Some(reason),
		}
	}
}

/// Coordinates edit and undo sessions against one shared model.
pub struct EditCoordinator<M: StructuredModel> {
	model: Rc<M>,
	/// Identity passed to the model for undo recording.
	owner: OwnerId,
	/// Project name used to tag diagnostics.
	project: Option<String>,
	fallback_tag: String,
	state: RefCell<SessionState>,
	/// Nesting of undoable edits; only the outermost one records.
	undo_depth: Cell<usize>,
}

impl<M: StructuredModel> EditCoordinator<M> {
	pub fn new(model: Rc<M>) -> Self {
		Self {
			model,
			owner: OwnerId::next(),
			project: None,
			fallback_tag: DEFAULT_PROJECT_TAG.to_owned(),
			state: RefCell::new(SessionState::Idle),
			undo_depth: Cell::new(0),
		}
	}

	/// Names the project the edited resource belongs to.
	pub fn with_project(mut self, project: Option<String>) -> Self {
		self.project = project;
		self
	}

	/// Sets the tag used when there is no project.
	pub fn with_fallback_tag(mut self, tag: impl Into<String>) -> Self {
		self.fallback_tag = tag.into();
		self
	}

	pub fn model(&self) -> &Rc<M> {
		&self.model
	}

	pub fn owner(&self) -> OwnerId {
		self.owner
	}

	/// Project name, or the fallback tag.
	pub fn project_tag(&self) -> &str {
		self.project.as_deref().unwrap_or(&self.fallback_tag)
	}

	/// Returns `true` while a mutation passed to
	/// [`run_edit_session`](Self::run_edit_session) is executing, i.e. while it
	/// is safe to change the model.
	pub fn is_edit_session_active(&self) -> bool {
		self.state.borrow().is_active()
	}

	/// Current nesting depth; `0` when idle.
	pub fn session_depth(&self) -> usize {
		self.state.borrow().depth()
	}

	/// Runs `mutation` inside an edit bracket.
	///
	/// Only the outermost call acquires an edit share and brackets the model;
	/// nested calls run inside the enclosing bracket. The bracket is closed and
	/// the share released however `mutation` ends, including by panic, and
	/// model listeners are notified from that close.
	///
	/// If the model cannot be acquired or prepared, the failure is logged and
	/// `Ok(EditOutcome::Skipped(_))` is returned without running `mutation`.
	/// Errors returned by `mutation` are passed through unchanged.
	///
	/// # Panics
	///
	/// If `mutation` panics, the bracket is closed while unwinding and
	/// `changed` notifies model listeners from there. A listener that panics
	/// during that notification aborts the process.
	pub fn run_edit_session<T, E>(
		&self,
		mutation: impl FnOnce(&EditScope<'_, M>) -> Result<T, E>,
	) -> Result<EditOutcome<T>, E> {
		if let Err(err) = self.enter_session() {
			warn!(error = %err, "edit aborted before mutation");
			return Ok(EditOutcome::Skipped(err));
		}
		let _exit = SessionExit { coordinator: self };
		mutation(&EditScope { coordinator: self }).map(EditOutcome::Applied)
	}

	fn enter_session(&self) -> Result<(), SessionError> {
		if self.state.borrow_mut().nest() {
			trace!(depth = self.session_depth(), "nested edit session");
			return Ok(());
		}

		// No borrow is held while the model runs; its listeners may call back.
		let scoped = ScopedHandle::acquire(&*self.model, Access::Edit)
			.map_err(SessionError::ModelUnavailable)?;
		self.model
			.about_to_change(scoped.handle())
			.map_err(SessionError::ModelUnavailable)?;
		self.state.borrow_mut().open(scoped.into_inner());
		trace!("edit session opened");
		Ok(())
	}

	/// Leaves one session level. Closing the outermost level signals `changed`
	/// and releases the edit share.
	pub(crate) fn exit_session(&self) {
		let exit = self.state.borrow_mut().leave();
		match exit {
			Exit::Nested { depth } => trace!(depth, "nested edit session closed"),
			Exit::Outermost(shared) => match Rc::try_unwrap(shared) {
				Ok(handle) => {
					let scoped = ScopedHandle::adopt(&*self.model, handle);
					self.model.changed(scoped.handle());
					trace!("edit session closed");
				}
				Err(shared) => {
					self.model.changed(&shared);
					error!("edit share still lent out when the session closed; not released");
				}
			},
			Exit::Underflow => {
				error!("edit session finished with invalid nesting counter; reset to idle");
			}
		}
	}
}

/// Access to the model from inside a running edit session.
pub struct EditScope<'c, M: StructuredModel> {
	coordinator: &'c EditCoordinator<M>,
}

impl<'c, M: StructuredModel> EditScope<'c, M> {
	pub fn model(&self) -> &'c M {
		&self.coordinator.model
	}

	/// Coordinator running this session, for opening nested sessions.
	pub fn coordinator(&self) -> &'c EditCoordinator<M> {
		self.coordinator
	}

	pub fn depth(&self) -> usize {
		self.coordinator.session_depth()
	}

	/// Calls `f` with the session's edit share.
	///
	/// No coordinator state is borrowed while `f` runs, so model listeners
	/// notified from inside `f` may open nested sessions.
	pub fn with_handle<R>(&self, f: impl FnOnce(&'c M, &ModelHandle) -> R) -> R {
		let handle = self.coordinator.state.borrow().handle();
		match handle {
			Some(handle) => f(&self.coordinator.model, &handle),
			None => unreachable!("edit scope outlived its session"),
		}
	}
}

/// Leaves the session level on drop.
struct SessionExit<'c, M: StructuredModel> {
	coordinator: &'c EditCoordinator<M>,
}

impl<M: StructuredModel> Drop for SessionExit<'_, M> {
	fn drop(&mut self) {
		self.coordinator.exit_session();
	}
}
