//! In-memory structured-document engine.
//!
//! [`MemoryModel`] implements [`StructuredModel`] over a single document value
//! kept in memory. It follows the same rules a real engine does: shares are
//! reference-counted, change brackets and recording brackets nest and only the
//! outermost level is observable, and listeners are called synchronously.
//!
//! Besides driving the CLI, it doubles as the test double for the editor: every
//! call is journaled ([`ModelCall`]), counted ([`ModelStats`]) and faults can be
//! injected with [`set_available`](MemoryModel::set_available) and
//! [`set_recordable`](MemoryModel::set_recordable).


use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::access::{Access, ModelHandle, OwnerId, SubscriptionToken};
use crate::error::ModelError;
use crate::event::{ModelEvent, ModelStateListener};
use crate::model::StructuredModel;

/// One entry in the call journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelCall {
	Acquire(Access),
	Release(Access),
	AboutToChange,
	Changed,
	BeginRecording(Option<String>),
	EndRecording,
	Subscribe,
	Unsubscribe,
	Mutate,
}

/// Counters over every call the model accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelStats {
	pub acquired_read: usize,
	pub acquired_edit: usize,
	pub released: usize,
	/// `about_to_change` calls, nested ones included.
	pub about_to_change: usize,
	/// `changed` calls, nested ones included.
	pub changed: usize,
	pub begin_recording: usize,
	pub end_recording: usize,
	pub subscribed: usize,
	pub unsubscribed: usize,
	pub mutations: usize,
}

/// A completed undo segment.
#[derive(Debug, Clone)]
pub struct UndoEntry<D> {
	/// Label given to the outermost `begin_recording`.
	pub label: Option<String>,
	/// Owner that started the segment.
	pub owner: OwnerId,
	/// Document before the segment (or, once undone, before the undo).
	pub before: Option<D>,
}

/// Recording segment in progress.
struct Recording<D> {
	owner: OwnerId,
	label: Option<String>,
	depth: usize,
	before: Option<D>,
}

struct State<D> {
	document: Option<D>,
	location: PathBuf,
	available: bool,
	recordable: bool,
	dirty: bool,
	next_handle: u64,
	live: HashMap<u64, Access>,
	next_token: u64,
	/// Nesting of `about_to_change`/`changed`.
	changing: usize,
	recording: Option<Recording<D>>,
	undo_stack: Vec<UndoEntry<D>>,
	stats: ModelStats,
	calls: Vec<ModelCall>,
}

type Listeners<D> = Vec<(SubscriptionToken, Rc<dyn ModelStateListener<D>>)>;

/// Structured model backed by a single in-memory document.
///
/// Not thread-safe; drive it from one thread like any other model.
pub struct MemoryModel<D> {
	state: RefCell<State<D>>,
	listeners: RefCell<Listeners<D>>,
}

impl<D: Clone + 'static> MemoryModel<D> {
	/// Creates a model holding `document`.
	pub fn new(document: D) -> Self {
		Self::from_document(Some(document))
	}

	/// Creates a model that can be shared but exposes no structured document.
	///
	/// Change brackets and undo recording fail on such a model.
	pub fn without_document() -> Self {
		Self::from_document(None)
	}

	fn from_document(document: Option<D>) -> Self {
		Self {
			state: RefCell::new(State {
				document,
				location: PathBuf::new(),
				available: true,
				recordable: true,
				dirty: false,
				next_handle: 1,
				live: HashMap::new(),
				next_token: 1,
				changing: 0,
				recording: None,
				undo_stack: Vec::new(),
				stats: ModelStats::default(),
				calls: Vec::new(),
			}),
			listeners: RefCell::new(Vec::new()),
		}
	}

	/// Sets the base location of the backing resource.
	pub fn with_location(self, location: impl Into<PathBuf>) -> Self {
		self.state.borrow_mut().location = location.into();
		self
	}

	/// When `false`, every [`acquire`](StructuredModel::acquire) fails.
	pub fn set_available(&self, available: bool) {
		self.state.borrow_mut().available = available;
	}

	/// When `false`, [`begin_recording`](StructuredModel::begin_recording) fails.
	pub fn set_recordable(&self, recordable: bool) {
		self.state.borrow_mut().recordable = recordable;
	}

	/// Changes the document. Requires an edit handle inside a change bracket.
	///
	/// `f` runs without any internal borrow held.
	pub fn mutate<R>(
		&self,
		handle: &ModelHandle,
		f: impl FnOnce(&mut D) -> R,
	) -> Result<R, ModelError> {
		let mut document = {
			let mut state = self.state.borrow_mut();
			state.check(handle, Access::Edit)?;
			if state.changing == 0 {
				return Err(ModelError::NotChanging);
			}
			let document = state.document.take().ok_or(ModelError::Unavailable)?;
			state.stats.mutations += 1;
			state.calls.push(ModelCall::Mutate);
			document
		};

		let result = f(&mut document);

		let became_dirty = {
			let mut state = self.state.borrow_mut();
			state.document = Some(document);
			!std::mem::replace(&mut state.dirty, true)
		};
		if became_dirty {
			self.emit(ModelEvent::DirtyStateChanged(true));
		}
		Ok(result)
	}

	/// Reverts the most recent undo segment.
	///
	/// Returns the entry that was undone, with `before` now holding the
	/// document as it was prior to the undo. Refuses while a change bracket or
	/// recording is open.
	pub fn undo(&self) -> Option<UndoEntry<D>> {
		let mut entry = {
			let mut state = self.state.borrow_mut();
			if state.changing > 0 || state.recording.is_some() {
				warn!(changing = state.changing, "undo refused while the model is being edited");
				return None;
			}
			state.undo_stack.pop()?
		};

		self.emit(ModelEvent::AboutToChange);
		let restored = {
			let mut state = self.state.borrow_mut();
			entry.before = std::mem::replace(&mut state.document, entry.before.take());
			state.dirty = true;
			state.document.clone()
		};
		debug!(label = ?entry.label, "undo segment reverted");
		self.emit(ModelEvent::Changed(restored));
		Some(entry)
	}

	/// Clears the dirty flag, as a save would.
	pub fn mark_saved(&self) {
		let was_dirty = std::mem::replace(&mut self.state.borrow_mut().dirty, false);
		if was_dirty {
			self.emit(ModelEvent::DirtyStateChanged(false));
		}
	}

	/// Reports that the backing resource was deleted.
	pub fn delete_resource(&self) {
		self.emit(ModelEvent::ResourceDeleted);
	}

	/// Moves the backing resource to `to`.
	pub fn move_resource(&self, to: impl Into<PathBuf>) {
		let to = to.into();
		let from = std::mem::replace(&mut self.state.borrow_mut().location, to.clone());
		self.emit(ModelEvent::ResourceMoved { from, to });
	}

	/// Rebuilds the model around `document`, dropping undo history.
	pub fn reinitialize(&self, document: D) {
		self.emit(ModelEvent::AboutToReinitialize);
		{
			let mut state = self.state.borrow_mut();
			state.document = Some(document);
			state.dirty = false;
			state.undo_stack.clear();
		}
		self.emit(ModelEvent::Reinitialized);
	}

	/// Current document without going through a handle.
	pub fn snapshot(&self) -> Option<D> {
		self.state.borrow().document.clone()
	}

	pub fn location(&self) -> PathBuf {
		self.state.borrow().location.clone()
	}

	pub fn is_dirty(&self) -> bool {
		self.state.borrow().dirty
	}

	/// Returns `true` while a change bracket is open.
	pub fn is_changing(&self) -> bool {
		self.state.borrow().changing > 0
	}

	/// Returns `true` while a recording segment is open.
	pub fn is_recording(&self) -> bool {
		self.state.borrow().recording.is_some()
	}

	/// Number of shares acquired and not yet released.
	pub fn open_handles(&self) -> usize {
		self.state.borrow().live.len()
	}

	pub fn listener_count(&self) -> usize {
		self.listeners.borrow().len()
	}

	pub fn stats(&self) -> ModelStats {
		self.state.borrow().stats
	}

	/// Labels of the undo stack, oldest first.
	pub fn undo_labels(&self) -> Vec<Option<String>> {
		self.state
			.borrow()
			.undo_stack
			.iter()
			.map(|entry| entry.label.clone())
			.collect()
	}

	/// Snapshot of the call journal.
	pub fn calls(&self) -> Vec<ModelCall> {
		self.state.borrow().calls.clone()
	}

	pub fn clear_calls(&self) {
		self.state.borrow_mut().calls.clear();
	}

	fn emit(&self, event: ModelEvent<D>) {
		let listeners: Vec<_> = self
			.listeners
			.borrow()
			.iter()
			.map(|(_, listener)| Rc::clone(listener))
			.collect();
		trace!(event = event.kind(), listeners = listeners.len(), "model event");
		for listener in listeners {
			listener.model_state(&event);
		}
	}
}

impl<D> State<D> {
	fn check(&self, handle: &ModelHandle, needs: Access) -> Result<(), ModelError> {
		match self.live.get(&handle.id()) {
			None => Err(ModelError::StaleHandle(handle.id())),
			Some(&got) if needs == Access::Edit && got != Access::Edit => {
				Err(ModelError::WrongAccess { expected: needs, got })
			}
			Some(_) => Ok(()),
		}
	}
}

impl<D: Clone + 'static> StructuredModel for MemoryModel<D> {
	type Document = D;

	fn acquire(&self, access: Access) -> Result<ModelHandle, ModelError> {
		let mut state = self.state.borrow_mut();
		if !state.available {
			return Err(ModelError::Unavailable);
		}
		let id = state.next_handle;
		state.next_handle += 1;
		state.live.insert(id, access);
		match access {
			Access::Read => state.stats.acquired_read += 1,
			Access::Edit => state.stats.acquired_edit += 1,
		}
		state.calls.push(ModelCall::Acquire(access));
		Ok(ModelHandle::new(id, access))
	}

	fn release(&self, handle: ModelHandle) {
		let mut state = self.state.borrow_mut();
		match state.live.remove(&handle.id()) {
			Some(access) => {
				state.stats.released += 1;
				state.calls.push(ModelCall::Release(access));
			}
			None => warn!(handle = handle.id(), "release of unknown model handle ignored"),
		}
	}

	fn about_to_change(&self, handle: &ModelHandle) -> Result<(), ModelError> {
		let outermost = {
			let mut state = self.state.borrow_mut();
			state.check(handle, Access::Edit)?;
			if state.document.is_none() {
				return Err(ModelError::Unavailable);
			}
			state.changing += 1;
			state.stats.about_to_change += 1;
			state.calls.push(ModelCall::AboutToChange);
			state.changing == 1
		};
		if outermost {
			self.emit(ModelEvent::AboutToChange);
		}
		Ok(())
	}

	fn changed(&self, handle: &ModelHandle) {
		let document = {
			let mut state = self.state.borrow_mut();
			if let Err(error) = state.check(handle, Access::Edit) {
				warn!(%error, "changed() ignored");
				return;
			}
			if state.changing == 0 {
				warn!("changed() without matching about_to_change() ignored");
				return;
			}
			state.changing -= 1;
			state.stats.changed += 1;
			state.calls.push(ModelCall::Changed);
			if state.changing > 0 {
				return;
			}
			state.document.clone()
		};
		self.emit(ModelEvent::Changed(document));
	}

	fn begin_recording(
		&self,
		handle: &ModelHandle,
		owner: OwnerId,
		label: Option<&str>,
	) -> Result<(), ModelError> {
		let mut state = self.state.borrow_mut();
		let state = &mut *state;
		state.check(handle, Access::Edit)?;
		if !state.recordable {
			return Err(ModelError::NotRecordable("undo recording disabled".into()));
		}
		if state.document.is_none() {
			return Err(ModelError::NotRecordable("no structured document".into()));
		}
		state.stats.begin_recording += 1;
		state.calls.push(ModelCall::BeginRecording(label.map(str::to_owned)));
		let before = state.document.clone();
		match &mut state.recording {
			Some(recording) => {
				recording.depth += 1;
				trace!(depth = recording.depth, "nested recording segment");
			}
			slot @ None => {
				*slot = Some(Recording {
					owner,
					label: label.map(str::to_owned),
					depth: 1,
					before,
				});
			}
		}
		Ok(())
	}

	fn end_recording(&self, handle: &ModelHandle, owner: OwnerId) {
		let mut state = self.state.borrow_mut();
		if let Err(error) = state.check(handle, Access::Edit) {
			warn!(%error, "end_recording() ignored");
			return;
		}
		let Some(mut recording) = state.recording.take() else {
			warn!(owner = owner.0, "end_recording() without an open segment ignored");
			return;
		};
		if recording.owner != owner {
			debug!(
				started_by = recording.owner.0,
				ended_by = owner.0,
				"recording segment closed by a different owner"
			);
		}
		state.stats.end_recording += 1;
		state.calls.push(ModelCall::EndRecording);
		recording.depth -= 1;
		if recording.depth > 0 {
			state.recording = Some(recording);
			return;
		}
		debug!(label = ?recording.label, undo_stack = state.undo_stack.len() + 1, "undo segment recorded");
		state.undo_stack.push(UndoEntry {
			label: recording.label,
			owner: recording.owner,
			before: recording.before,
		});
	}

	fn subscribe(
		&self,
		handle: &ModelHandle,
		listener: Rc<dyn ModelStateListener<D>>,
	) -> Result<SubscriptionToken, ModelError> {
		let token = {
			let mut state = self.state.borrow_mut();
			state.check(handle, Access::Read)?;
			let token = SubscriptionToken(state.next_token);
			state.next_token += 1;
			state.stats.subscribed += 1;
			state.calls.push(ModelCall::Subscribe);
			token
		};
		self.listeners.borrow_mut().push((token, listener));
		Ok(token)
	}

	fn unsubscribe(&self, handle: &ModelHandle, token: SubscriptionToken) -> bool {
		if let Err(error) = self.state.borrow().check(handle, Access::Read) {
			warn!(%error, "unsubscribe() ignored");
			return false;
		}
		let removed = {
			let mut listeners = self.listeners.borrow_mut();
			let before = listeners.len();
			listeners.retain(|(registered, _)| *registered != token);
			listeners.len() != before
		};
		if removed {
			let mut state = self.state.borrow_mut();
			state.stats.unsubscribed += 1;
			state.calls.push(ModelCall::Unsubscribe);
		}
		removed
	}

	fn document(&self, handle: &ModelHandle) -> Option<D> {
		let state = self.state.borrow();
		state.check(handle, Access::Read).ok()?;
		state.document.clone()
	}
}
