//! Shared fixtures for unit tests.

use std::cell::{Cell, RefCell};
use std::ops::Range;
use std::rc::Rc;

use crate::pages::EditorPage;

pub(crate) fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Page that journals every call it receives.
pub(crate) struct RecordingPage {
	id: String,
	dirty: Cell<bool>,
	log: RefCell<Vec<String>>,
}

impl RecordingPage {
	pub(crate) fn new(id: &str) -> Rc<Self> {
		Rc::new(Self {
			id: id.to_owned(),
			dirty: Cell::new(false),
			log: RefCell::new(Vec::new()),
		})
	}

	pub(crate) fn set_dirty(&self, dirty: bool) {
		self.dirty.set(dirty);
	}

	pub(crate) fn take(&self) -> Vec<String> {
		std::mem::take(&mut *self.log.borrow_mut())
	}
}

impl EditorPage<String> for RecordingPage {
	fn id(&self) -> &str {
		&self.id
	}

	fn document_changed(&self, document: Option<&String>) {
		self.log
			.borrow_mut()
			.push(format!("changed:{}", document.map_or("<none>", String::as_str)));
	}

	fn is_dirty(&self) -> bool {
		self.dirty.get()
	}

	fn commit(&self, on_save: bool) {
		self.dirty.set(false);
		self.log.borrow_mut().push(format!("commit:{on_save}"));
	}

	fn select_and_reveal(&self, range: Range<usize>) {
		self.log
			.borrow_mut()
			.push(format!("reveal:{}..{}", range.start, range.end));
	}
}
