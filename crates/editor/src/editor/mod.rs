//! Multi-page form editor.
//!
//! [`FormEditor`] binds a set of form pages and one text page to a shared
//! structured model. Pages edit the model through the editor's
//! [`EditCoordinator`] and are refreshed through a [`ModelChangeFanout`]
//! attached when the pages are created.


use std::cell::{Cell, RefCell};
use std::ops::Range;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};
use xmlform_model::StructuredModel;

use crate::config::EditorConfig;
use crate::error::PageError;
use crate::fanout::{DocumentObserver, ModelChangeFanout};
use crate::pages::{EditorPage, PageKind, PageMemory, PageSet, TEXT_PAGE_ID};
use crate::session::{EditCoordinator, EditOutcome, EditScope};

/// The resource being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorInput {
	/// Resource name, used to key the remembered page.
	pub name: String,
	/// Owning project, if any.
	pub project: Option<String>,
}

impl EditorInput {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			project: None,
		}
	}

	pub fn with_project(mut self, project: impl Into<String>) -> Self {
		self.project = Some(project.into());
		self
	}
}

pub struct FormEditor<M: StructuredModel> {
	input: EditorInput,
	config: EditorConfig,
	coordinator: Rc<EditCoordinator<M>>,
	pages: Rc<PageSet<M::Document>>,
	fanout: RefCell<Option<ModelChangeFanout<M>>>,
	memory: Rc<dyn PageMemory>,
	creating_pages: Cell<bool>,
}

impl<M: StructuredModel> FormEditor<M> {
	pub fn new(
		model: Rc<M>,
		input: EditorInput,
		config: EditorConfig,
		memory: Rc<dyn PageMemory>,
	) -> Self {
		let coordinator = EditCoordinator::new(model)
			.with_project(input.project.clone())
			.with_fallback_tag(config.fallback_project_tag.clone());
		Self {
			input,
			config,
			coordinator: Rc::new(coordinator),
			pages: Rc::new(PageSet::new()),
			fanout: RefCell::new(None),
			memory,
			creating_pages: Cell::new(false),
		}
	}

	/// Creates the pages, starts following the model and shows the default
	/// page.
	///
	/// If the model cannot be read, the pages are still created but are not
	/// refreshed by model changes.
	pub fn open(
		&self,
		form_pages: Vec<Rc<dyn EditorPage<M::Document>>>,
		text_view: Rc<dyn EditorPage<M::Document>>,
	) -> Result<(), PageError> {
		if !self.pages.is_empty() || self.fanout.borrow().is_some() {
			return Err(PageError::AlreadyOpen);
		}

		{
			let _creating = CreatingPages::enter(&self.creating_pages);
			if let Err(error) = self.create_pages(form_pages, text_view) {
				self.pages.clear();
				return Err(error);
			}

			let observer: Weak<dyn DocumentObserver<M::Document>> =
				Rc::<PageSet<M::Document>>::downgrade(&self.pages);
			match ModelChangeFanout::attach(Rc::clone(self.coordinator.model()), observer) {
				Ok(fanout) => *self.fanout.borrow_mut() = Some(fanout),
				Err(error) => {
					warn!(%error, resource = %self.input.name, "pages will not follow model changes");
				}
			}
		}

		debug!(resource = %self.input.name, pages = self.pages.len(), "editor pages created");
		self.select_default_page(None);
		Ok(())
	}

	fn create_pages(
		&self,
		form_pages: Vec<Rc<dyn EditorPage<M::Document>>>,
		text_view: Rc<dyn EditorPage<M::Document>>,
	) -> Result<(), PageError> {
		for page in form_pages {
			self.pages.add_form(page)?;
		}
		self.pages
			.add_text(text_view, self.config.text_page_title.clone())?;
		self.pages.activate(0)
	}

	/// Shows the initial page.
	///
	/// Uses `page`, else the page remembered for this resource, else the
	/// configured default. The value is a page index, a page id, or
	/// [`TEXT_PAGE_ID`]. An unusable value is logged and the first page stays
	/// active.
	pub fn select_default_page(&self, page: Option<&str>) {
		let choice = page
			.map(str::to_owned)
			.or_else(|| {
				self.config
					.remember_active_page
					.then(|| self.memory.load(&self.memory_key()))
					.flatten()
			})
			.or_else(|| self.config.default_page.clone());
		let Some(choice) = choice else {
			return;
		};

		let selected = match choice.trim().parse::<usize>() {
			Ok(index) => self.set_active_page_index(index),
			Err(_) => self.set_active_page(&choice).map(|_| ()),
		};
		if let Err(error) = selected {
			warn!(%error, page = %choice, "selecting default page failed; showing first page");
			if let Err(error) = self.pages.activate(0) {
				debug!(%error, "no page to fall back to");
			}
		}
	}

	/// Activates the page with `id`; [`TEXT_PAGE_ID`] designates the text
	/// page. Returns its index.
	pub fn set_active_page(&self, id: &str) -> Result<usize, PageError> {
		let index = self.pages.index_of(id)?;
		self.set_active_page_index(index)?;
		Ok(index)
	}

	pub fn set_active_page_index(&self, index: usize) -> Result<(), PageError> {
		self.pages.activate(index)?;
		self.page_changed(index);
		Ok(())
	}

	fn page_changed(&self, index: usize) {
		if self.creating_pages.get() || !self.config.remember_active_page {
			return;
		}
		if let Err(error) = self.memory.store(&self.memory_key(), &index.to_string()) {
			warn!(%error, index, "could not remember active page");
		}
	}

	/// Removes every page. The model subscription is kept.
	pub fn remove_pages(&self) {
		self.pages.clear();
	}

	/// Asks every form page with pending changes to write them to the model.
	/// Returns how many pages committed.
	pub fn commit_pages(&self, on_save: bool) -> usize {
		let mut committed = 0;
		for page in self.pages.pages(PageKind::Form) {
			if page.is_dirty() {
				page.commit(on_save);
				committed += 1;
			}
		}
		debug!(committed, on_save, "form pages committed");
		committed
	}

	/// Switches to the text page and selects `range` there.
	///
	/// Returns `false` if there is no text page.
	pub fn reveal(&self, range: Range<usize>) -> bool {
		let Ok(index) = self.set_active_page(TEXT_PAGE_ID) else {
			return false;
		};
		match self.pages.page_at(index) {
			Some(page) => {
				page.select_and_reveal(range);
				true
			}
			None => false,
		}
	}

	/// Stops following the model. Later calls do nothing.
	pub fn dispose(&self) {
		let fanout = self.fanout.borrow_mut().take();
		if let Some(fanout) = fanout {
			fanout.detach();
			debug!(resource = %self.input.name, "editor disposed");
		}
	}

	pub fn run_edit_session<T, E>(
		&self,
		mutation: impl FnOnce(&EditScope<'_, M>) -> Result<T, E>,
	) -> Result<EditOutcome<T>, E> {
		self.coordinator.run_edit_session(mutation)
	}

	pub fn run_undoable_edit<T, E>(
		&self,
		label: Option<&str>,
		mutation: impl FnOnce(&EditScope<'_, M>) -> Result<T, E>,
	) -> Result<EditOutcome<T>, E> {
		self.coordinator.run_undoable_edit(label, mutation)
	}

	pub fn is_edit_session_active(&self) -> bool {
		self.coordinator.is_edit_session_active()
	}

	pub fn coordinator(&self) -> &Rc<EditCoordinator<M>> {
		&self.coordinator
	}

	pub fn model(&self) -> &Rc<M> {
		self.coordinator.model()
	}

	pub fn input(&self) -> &EditorInput {
		&self.input
	}

	pub fn config(&self) -> &EditorConfig {
		&self.config
	}

	pub fn is_creating_pages(&self) -> bool {
		self.creating_pages.get()
	}

	pub fn is_following_model(&self) -> bool {
		self.fanout
			.borrow()
			.as_ref()
			.is_some_and(ModelChangeFanout::is_attached)
	}

	pub fn page_count(&self) -> usize {
		self.pages.len()
	}

	pub fn active_page(&self) -> Option<usize> {
		self.pages.active()
	}

	pub fn page_id(&self, index: usize) -> Option<String> {
		self.pages.id_at(index)
	}

	pub fn text_page_index(&self) -> Option<usize> {
		self.pages.text_index()
	}

	fn memory_key(&self) -> String {
		self.config.page_memory_key(&self.input.name)
	}
}

/// Holds the "creating pages" flag for its lifetime.
struct CreatingPages<'a> {
	flag: &'a Cell<bool>,
}

impl<'a> CreatingPages<'a> {
	fn enter(flag: &'a Cell<bool>) -> Self {
		flag.set(true);
		Self { flag }
	}
}

impl Drop for CreatingPages<'_> {
	fn drop(&mut self) {
		self.flag.set(false);
	}
}
