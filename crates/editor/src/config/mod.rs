//! Editor configuration.
//!
//! Loaded from TOML. Every key is optional; unknown keys are rejected so typos
//! do not silently fall back to defaults.
//!
//! ```toml
//! editor_kind = "ManifestEditor"
//! text_page_title = "AndroidManifest.xml"
//! remember_active_page = true
//! default_page = "editor_part"
//! fallback_project_tag = "XML Editor"
//! ```

#[cfg(test)]
mod tests;

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::session::DEFAULT_PROJECT_TAG;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
	/// Editor type name; scopes the remembered page.
	pub editor_kind: String,
	/// Tab title of the text page.
	pub text_page_title: String,
	/// Remember the active page per resource.
	pub remember_active_page: bool,
	/// Page shown when nothing is remembered: an index, a page id, or
	/// `editor_part` for the text page.
	pub default_page: Option<String>,
	/// Tag used in diagnostics for resources outside a project.
	pub fallback_project_tag: String,
}

impl Default for EditorConfig {
	fn default() -> Self {
		Self {
			editor_kind: "FormEditor".to_owned(),
			text_page_title: "Source".to_owned(),
			remember_active_page: true,
			default_page: None,
			fallback_project_tag: DEFAULT_PROJECT_TAG.to_owned(),
		}
	}
}

impl EditorConfig {
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	/// Reads and parses a configuration file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&input)
	}

	/// Key under which the active page of `resource` is remembered.
	pub fn page_memory_key(&self, resource: &str) -> String {
		format!("{}_current_page@{resource}", self.editor_kind)
	}
}
