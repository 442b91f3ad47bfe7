//! Error types for the editor core.

use std::path::PathBuf;

use thiserror::Error;
use xmlform_model::ModelError;

/// Reasons an edit was skipped before its mutation ran.
///
/// These are recovered locally: the coordinator logs them and reports them in
/// [`EditOutcome::Skipped`](crate::EditOutcome::Skipped), never as the
/// mutation's error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
	/// No document model could be acquired or prepared for change.
	#[error("XML editor failed to get model to edit: {0}")]
	ModelUnavailable(#[source] ModelError),

	/// Undo recording could not start, so the edit was not attempted.
	#[error("[{project}] action '{label}' failed: could not start an undo session, document might be corrupt")]
	RecordingStart {
		/// Project name, or the configured fallback tag.
		project: String,
		/// Undo label of the skipped action (empty when unlabeled).
		label: String,
		/// Why the model refused to record.
		#[source]
		source: ModelError,
	},
}

/// Errors from the page host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
	/// No page has the given id.
	#[error("unknown page id: {0}")]
	UnknownPage(String),

	/// A page index is past the end of the page list.
	#[error("page index {index} out of range ({count} pages)")]
	OutOfRange {
		/// Requested index.
		index: usize,
		/// Number of pages.
		count: usize,
	},

	/// Two pages were registered under the same id.
	#[error("duplicate page id: {0}")]
	DuplicatePage(String),

	/// The editor pages were already created.
	#[error("editor pages already created")]
	AlreadyOpen,

	/// The page-selection store rejected a write.
	#[error("page memory unavailable: {0}")]
	Memory(String),
}

/// Errors that can occur when loading editor configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or an unknown key.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},
}
