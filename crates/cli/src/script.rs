//! Scripted editing sessions.
//!
//! A script is a TOML file holding the initial document and a list of steps:
//!
//! ```toml
//! document = "<resources>"
//! resource = "res/values/strings.xml"
//! project = "HelloAndroid"
//!
//! [[steps]]
//! append = "<string/>"
//! label = "Add string"   # record as one undoable action
//! nested = 2             # run inside two extra nested sessions
//!
//! [[steps]]
//! undo = true
//! ```

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};
use xmlform_editor::{
	EditOutcome, EditScope, EditorConfig, EditorInput, EditorPage, FormEditor, InMemoryPageMemory,
};
use xmlform_model::{MemoryModel, ModelError, ModelStats};

type Model = MemoryModel<String>;

#[derive(Debug, Error)]
pub enum ScriptError {
	#[error("I/O error reading {path}: {error}")]
	Io {
		path: PathBuf,
		error: std::io::Error,
	},

	#[error("invalid script: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("editor pages could not be created: {0}")]
	Pages(#[from] xmlform_editor::PageError),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Script {
	pub document: String,
	pub resource: Option<String>,
	pub project: Option<String>,
	pub steps: Vec<Step>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Step {
	/// Text appended to the document.
	pub append: Option<String>,
	/// Undo label; the step is recorded as one undoable action when set.
	pub label: Option<String>,
	/// Extra nested sessions around the append.
	pub nested: usize,
	/// Fail after appending.
	pub fail: bool,
	/// Undo the last recorded action instead of editing.
	pub undo: bool,
}

impl Script {
	pub fn load(path: &Path) -> Result<Self, ScriptError> {
		let input = std::fs::read_to_string(path).map_err(|error| ScriptError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Ok(toml::from_str(&input)?)
	}
}

/// What happened to one step.
#[derive(Debug, PartialEq, Eq)]
pub enum StepResult {
	Applied,
	Skipped(String),
	Failed(String),
	Undone(Option<String>),
	NothingToUndo,
}

impl fmt::Display for StepResult {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Applied => f.write_str("applied"),
			Self::Skipped(reason) => write!(f, "skipped: {reason}"),
			Self::Failed(error) => write!(f, "failed: {error}"),
			Self::Undone(label) => write!(f, "undone '{}'", label.as_deref().unwrap_or("")),
			Self::NothingToUndo => f.write_str("nothing to undo"),
		}
	}
}

#[derive(Debug)]
pub struct Report {
	pub refreshes: Vec<String>,
	pub steps: Vec<StepResult>,
	pub stats: ModelStats,
	pub undo_labels: Vec<Option<String>>,
	pub document: String,
}

impl fmt::Display for Report {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (index, refresh) in self.refreshes.iter().enumerate() {
			writeln!(f, "refresh #{index}: {refresh}")?;
		}
		for (index, step) in self.steps.iter().enumerate() {
			writeln!(f, "step {}: {step}", index + 1)?;
		}
		let stats = &self.stats;
		writeln!(
			f,
			"model: {} about_to_change, {} changed, {} edit / {} read acquired, {} released",
			stats.about_to_change,
			stats.changed,
			stats.acquired_edit,
			stats.acquired_read,
			stats.released
		)?;
		writeln!(
			f,
			"undo: {} recorded, stack [{}]",
			stats.end_recording,
			self.undo_labels
				.iter()
				.map(|label| label.as_deref().unwrap_or("<unlabeled>"))
				.collect::<Vec<_>>()
				.join(", ")
		)?;
		write!(f, "document: {}", self.document)
	}
}

/// Text page that records every document it is shown.
#[derive(Default)]
struct ConsolePage {
	shown: RefCell<Vec<String>>,
}

impl EditorPage<String> for ConsolePage {
	fn id(&self) -> &str {
		"console"
	}

	fn document_changed(&self, document: Option<&String>) {
		self.shown
			.borrow_mut()
			.push(document.cloned().unwrap_or_else(|| "<no document>".to_owned()));
	}
}

#[derive(Debug, Error)]
enum StepError {
	#[error("step failed on request")]
	Requested,
	#[error(transparent)]
	Model(#[from] ModelError),
}

/// Runs `script` through a form editor over an in-memory model.
pub fn run(script: &Script, config: EditorConfig) -> Result<Report, ScriptError> {
	let model = Rc::new(MemoryModel::new(script.document.clone()));
	let mut input = EditorInput::new(script.resource.as_deref().unwrap_or("untitled.xml"));
	input.project = script.project.clone();
	let editor = FormEditor::new(
		model.clone(),
		input,
		config,
		Rc::new(InMemoryPageMemory::new()),
	);
	let console = Rc::new(ConsolePage::default());
	editor.open(Vec::new(), console.clone())?;

	let mut steps = Vec::with_capacity(script.steps.len());
	for (index, step) in script.steps.iter().enumerate() {
		let result = run_step(&editor, step);
		debug!(step = index + 1, %result, "step finished");
		steps.push(result);
	}
	editor.dispose();

	let report = Report {
		refreshes: console.shown.take(),
		steps,
		stats: model.stats(),
		undo_labels: model.undo_labels(),
		document: model.snapshot().unwrap_or_default(),
	};
	info!(steps = report.steps.len(), "script finished");
	Ok(report)
}

fn run_step(editor: &FormEditor<Model>, step: &Step) -> StepResult {
	if step.undo {
		return match editor.model().undo() {
			Some(entry) => StepResult::Undone(entry.label),
			None => StepResult::NothingToUndo,
		};
	}

	let mutation = |scope: &EditScope<'_, Model>| nest(scope, step, step.nested);
	let result = match step.label.as_deref() {
		Some(label) => editor.run_undoable_edit(Some(label), mutation),
		None => editor.run_edit_session(mutation),
	};
	match result {
		Ok(EditOutcome::Applied(())) => StepResult::Applied,
		Ok(EditOutcome::Skipped(reason)) => StepResult::Skipped(reason.to_string()),
		Err(error) => StepResult::Failed(error.to_string()),
	}
}

fn nest(scope: &EditScope<'_, Model>, step: &Step, remaining: usize) -> Result<(), StepError> {
	if remaining > 0 {
		let outcome = scope
			.coordinator()
			.run_edit_session(|inner| nest(inner, step, remaining - 1))?;
		if let EditOutcome::Skipped(reason) = outcome {
			debug!(%reason, "nested session skipped");
		}
		return Ok(());
	}
	if let Some(text) = &step.append {
		scope.with_handle(|model, handle| model.mutate(handle, |doc| doc.push_str(text)))?;
	}
	if step.fail {
		return Err(StepError::Requested);
	}
	Ok(())
}
