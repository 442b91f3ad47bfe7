use std::io::Write;

use super::EditorConfig;
use crate::error::ConfigError;
use crate::session::DEFAULT_PROJECT_TAG;

#[test]
fn empty_input_gives_defaults() {
	let config = EditorConfig::from_toml_str("").unwrap();
	assert_eq!(config, EditorConfig::default());
	assert_eq!(config.fallback_project_tag, DEFAULT_PROJECT_TAG);
	assert!(config.remember_active_page);
	assert_eq!(config.default_page, None);
}

#[test]
fn partial_input_keeps_other_defaults() {
	let config = EditorConfig::from_toml_str(
		r#"
		editor_kind = "ManifestEditor"
		default_page = "editor_part"
		"#,
	)
	.unwrap();

	assert_eq!(config.editor_kind, "ManifestEditor");
	assert_eq!(config.default_page.as_deref(), Some("editor_part"));
	assert_eq!(config.text_page_title, "Source");
}

#[test]
fn unknown_keys_are_rejected() {
	let err = EditorConfig::from_toml_str("remember_page = false").unwrap_err();
	assert!(matches!(err, ConfigError::Toml(_)));
	assert!(err.to_string().contains("remember_page"));
}

#[test]
fn wrong_types_are_rejected() {
	let err = EditorConfig::from_toml_str("remember_active_page = \"yes\"").unwrap_err();
	assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn load_reads_file() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	writeln!(file, "text_page_title = \"strings.xml\"").unwrap();
	writeln!(file, "remember_active_page = false").unwrap();

	let config = EditorConfig::load(file.path()).unwrap();
	assert_eq!(config.text_page_title, "strings.xml");
	assert!(!config.remember_active_page);
}

#[test]
fn load_reports_missing_file_with_path() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("missing.toml");

	let err = EditorConfig::load(&path).unwrap_err();
	match err {
		ConfigError::Io { path: reported, .. } => assert_eq!(reported, path),
		other => panic!("expected I/O error, got {other:?}"),
	}
}

#[test]
fn page_memory_key_is_scoped_by_editor_kind() {
	let config = EditorConfig {
		editor_kind: "ManifestEditor".into(),
		..EditorConfig::default()
	};
	assert_eq!(
		config.page_memory_key("app/AndroidManifest.xml"),
		"ManifestEditor_current_page@app/AndroidManifest.xml"
	);
}
