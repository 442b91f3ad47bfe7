//! Common utilities for editor integration tests.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use xmlform_editor::{EditCoordinator, EditScope, EditorPage};
use xmlform_model::{MemoryModel, ModelError};

pub type Model = MemoryModel<String>;

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn model(text: &str) -> Rc<Model> {
	init_tracing();
	Rc::new(MemoryModel::new(text.to_owned()))
}

/// Appends `text` to the document through the session's edit share.
pub fn append(scope: &EditScope<'_, Model>, text: &str) -> Result<(), ModelError> {
	scope.with_handle(|model, handle| model.mutate(handle, |doc| doc.push_str(text)))
}

/// Text view that keeps the last document it was shown.
#[derive(Default)]
pub struct TextView {
	pub shown: RefCell<Vec<String>>,
	pub revealed: RefCell<Vec<std::ops::Range<usize>>>,
}

impl EditorPage<String> for TextView {
	fn id(&self) -> &str {
		"source"
	}

	fn document_changed(&self, document: Option<&String>) {
		self.shown
			.borrow_mut()
			.push(document.cloned().unwrap_or_default());
	}

	fn select_and_reveal(&self, range: std::ops::Range<usize>) {
		self.revealed.borrow_mut().push(range);
	}
}

/// Form page holding one pending attribute edit until committed.
pub struct AttributeForm {
	id: String,
	coordinator: RefCell<Weak<EditCoordinator<Model>>>,
	pending: RefCell<Option<String>>,
	pub refreshes: Cell<usize>,
}

impl AttributeForm {
	pub fn new(id: &str) -> Rc<Self> {
		Rc::new(Self {
			id: id.to_owned(),
			coordinator: RefCell::new(Weak::new()),
			pending: RefCell::new(None),
			refreshes: Cell::new(0),
		})
	}

	pub fn bind(&self, coordinator: &Rc<EditCoordinator<Model>>) {
		*self.coordinator.borrow_mut() = Rc::downgrade(coordinator);
	}

	pub fn type_text(&self, text: &str) {
		*self.pending.borrow_mut() = Some(text.to_owned());
	}
}

impl EditorPage<String> for AttributeForm {
	fn id(&self) -> &str {
		&self.id
	}

	fn document_changed(&self, _document: Option<&String>) {
		self.refreshes.set(self.refreshes.get() + 1);
	}

	fn is_dirty(&self) -> bool {
		self.pending.borrow().is_some()
	}

	fn commit(&self, _on_save: bool) {
		let Some(text) = self.pending.borrow_mut().take() else {
			return;
		};
		let Some(coordinator) = self.coordinator.borrow().upgrade() else {
			return;
		};
		let label = format!("Edit {}", self.id);
		let outcome = coordinator
			.run_undoable_edit(Some(&label), |scope| append(scope, &text))
			.unwrap();
		assert!(outcome.is_applied());
	}
}
