//! Editor pages: the form views plus the single raw text view.

mod memory;

use std::cell::{Cell, RefCell};
use std::ops::Range;
use std::rc::Rc;

pub use memory::{InMemoryPageMemory, PageMemory};
use tracing::trace;

use crate::error::PageError;
use crate::fanout::DocumentObserver;

/// Page id that always designates the text page.
pub const TEXT_PAGE_ID: &str = "editor_part";

/// One view hosted by the editor.
pub trait EditorPage<D> {
	/// Stable identifier of the page. Ignored for the text page, which is
	/// always registered as [`TEXT_PAGE_ID`].
	fn id(&self) -> &str;

	/// Tab title. Defaults to the id.
	fn title(&self) -> &str {
		self.id()
	}

	/// Refreshes the view from the current document.
	fn document_changed(&self, document: Option<&D>);

	/// Whether the view holds form state not yet written to the model.
	fn is_dirty(&self) -> bool {
		false
	}

	/// Writes pending form state to the model.
	fn commit(&self, _on_save: bool) {}

	/// Selects and scrolls to a byte range of the document text.
	fn select_and_reveal(&self, _range: Range<usize>) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
	Form,
	Text,
}

struct PageEntry<D> {
	id: String,
	title: String,
	kind: PageKind,
	page: Rc<dyn EditorPage<D>>,
}

/// Ordered page list with an active page.
///
/// Also the editor's [`DocumentObserver`]: every document change is forwarded
/// to each page in order.
pub struct PageSet<D> {
	entries: RefCell<Vec<PageEntry<D>>>,
	active: Cell<Option<usize>>,
}

impl<D> Default for PageSet<D> {
	fn default() -> Self {
		Self {
			entries: RefCell::new(Vec::new()),
			active: Cell::new(None),
		}
	}
}

impl<D> PageSet<D> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a form page and returns its index.
	pub fn add_form(&self, page: Rc<dyn EditorPage<D>>) -> Result<usize, PageError> {
		let id = page.id().to_owned();
		let title = page.title().to_owned();
		self.push(id, title, PageKind::Form, page)
	}

	/// Appends the text page under [`TEXT_PAGE_ID`] and returns its index.
	pub fn add_text(
		&self,
		page: Rc<dyn EditorPage<D>>,
		title: impl Into<String>,
	) -> Result<usize, PageError> {
		self.push(TEXT_PAGE_ID.to_owned(), title.into(), PageKind::Text, page)
	}

	fn push(
		&self,
		id: String,
		title: String,
		kind: PageKind,
		page: Rc<dyn EditorPage<D>>,
	) -> Result<usize, PageError> {
		let mut entries = self.entries.borrow_mut();
		if entries.iter().any(|entry| entry.id == id) {
			return Err(PageError::DuplicatePage(id));
		}
		trace!(page = %id, ?kind, index = entries.len(), "page added");
		entries.push(PageEntry {
			id,
			title,
			kind,
			page,
		});
		Ok(entries.len() - 1)
	}

	/// Removes every page, last first.
	pub fn clear(&self) {
		let mut entries = self.entries.borrow_mut();
		while let Some(entry) = entries.pop() {
			trace!(page = %entry.id, "page removed");
		}
		self.active.set(None);
	}

	pub fn len(&self) -> usize {
		self.entries.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.borrow().is_empty()
	}

	pub fn active(&self) -> Option<usize> {
		self.active.get()
	}

	pub fn text_index(&self) -> Option<usize> {
		self.entries
			.borrow()
			.iter()
			.position(|entry| entry.kind == PageKind::Text)
	}

	/// Index of the page with `id`.
	pub fn index_of(&self, id: &str) -> Result<usize, PageError> {
		self.entries
			.borrow()
			.iter()
			.position(|entry| entry.id == id)
			.ok_or_else(|| PageError::UnknownPage(id.to_owned()))
	}

	pub fn id_at(&self, index: usize) -> Option<String> {
		self.entries.borrow().get(index).map(|entry| entry.id.clone())
	}

	pub fn title_at(&self, index: usize) -> Option<String> {
		self.entries
			.borrow()
			.get(index)
			.map(|entry| entry.title.clone())
	}

	pub fn kind_at(&self, index: usize) -> Option<PageKind> {
		self.entries.borrow().get(index).map(|entry| entry.kind)
	}

	pub fn page_at(&self, index: usize) -> Option<Rc<dyn EditorPage<D>>> {
		self.entries
			.borrow()
			.get(index)
			.map(|entry| Rc::clone(&entry.page))
	}

	/// Makes the page at `index` active.
	pub fn activate(&self, index: usize) -> Result<(), PageError> {
		let count = self.len();
		if index >= count {
			return Err(PageError::OutOfRange { index, count });
		}
		self.active.set(Some(index));
		Ok(())
	}

	/// Pages of the given kind, in order. No borrow is held once this returns.
	pub fn pages(&self, kind: PageKind) -> Vec<Rc<dyn EditorPage<D>>> {
		self.entries
			.borrow()
			.iter()
			.filter(|entry| entry.kind == kind)
			.map(|entry| Rc::clone(&entry.page))
			.collect()
	}

	fn all_pages(&self) -> Vec<Rc<dyn EditorPage<D>>> {
		self.entries
			.borrow()
			.iter()
			.map(|entry| Rc::clone(&entry.page))
			.collect()
	}
}

impl<D> DocumentObserver<D> for PageSet<D> {
	fn document_changed(&self, document: Option<&D>) {
		for page in self.all_pages() {
			page.document_changed(document);
		}
	}
}
