//! Undoable edits: an edit session inside one undo recording segment.

use tracing::{debug, error, trace, warn};
use xmlform_model::{Access, ModelError, StructuredModel, with_handle};

use super::{EditCoordinator, EditOutcome, EditScope};
use crate::error::SessionError;

impl<M: StructuredModel> EditCoordinator<M> {
	/// Runs `mutation` as one labeled entry on the model's undo stack.
	///
	/// Recording starts before the edit session opens and ends after it
	/// closes, exactly once, however `mutation` ends. If recording cannot
	/// start, the failure is logged with the project and label, and
	/// `mutation` is skipped so no change happens without an undo entry.
	///
	/// A call made while another undoable edit is running joins that edit's
	/// recording segment instead of starting its own, so the outermost call
	/// produces the only undo entry.
	pub fn run_undoable_edit<T, E>(
		&self,
		label: Option<&str>,
		mutation: impl FnOnce(&EditScope<'_, M>) -> Result<T, E>,
	) -> Result<EditOutcome<T>, E> {
		if self.undo_depth.get() > 0 {
			trace!(label, depth = self.undo_depth.get(), "joining enclosing undo segment");
			let _joined = UndoGuard::enter(self, false);
			return self.run_edit_session(mutation);
		}

		if let Err(source) = self.begin_undo_recording(label) {
			let err = SessionError::RecordingStart {
				project: self.project_tag().to_owned(),
				label: label.unwrap_or_default().to_owned(),
				source,
			};
			error!(project = self.project_tag(), label, "{err}");
			return Ok(EditOutcome::Skipped(err));
		}

		let _recording = UndoGuard::enter(self, true);
		self.run_edit_session(mutation)
	}

	/// Returns `true` while an undoable edit is running.
	pub fn is_undo_recording(&self) -> bool {
		self.undo_depth.get() > 0
	}

	fn begin_undo_recording(&self, label: Option<&str>) -> Result<(), ModelError> {
		let owner = self.owner;
		with_handle(&*self.model, Access::Edit, |handle| {
			self.model.begin_recording(handle, owner, label)
		})??;
		debug!(label, owner = owner.0, "undo recording started");
		Ok(())
	}

	fn end_undo_recording(&self) {
		let owner = self.owner;
		match with_handle(&*self.model, Access::Edit, |handle| {
			self.model.end_recording(handle, owner)
		}) {
			Ok(()) => debug!(owner = owner.0, "undo recording ended"),
			Err(error) => warn!(%error, "could not reacquire model to end undo recording"),
		}
	}
}

/// Tracks undo nesting and ends the recording it started on drop.
struct UndoGuard<'c, M: StructuredModel> {
	coordinator: &'c EditCoordinator<M>,
	recording: bool,
}

impl<'c, M: StructuredModel> UndoGuard<'c, M> {
	fn enter(coordinator: &'c EditCoordinator<M>, recording: bool) -> Self {
		coordinator.undo_depth.set(coordinator.undo_depth.get() + 1);
		Self {
			coordinator,
			recording,
		}
	}
}

impl<M: StructuredModel> Drop for UndoGuard<'_, M> {
	fn drop(&mut self) {
		let depth = &self.coordinator.undo_depth;
		depth.set(depth.get().saturating_sub(1));
		if self.recording {
			self.coordinator.end_undo_recording();
		}
	}
}
