//! End-to-end editor flows: pages, commits, undo and page memory.

use std::rc::Rc;

use xmlform_editor::{
	EditorConfig, EditorInput, EditorPage, FormEditor, InMemoryPageMemory, PageMemory,
	TEXT_PAGE_ID,
};

use crate::common::{AttributeForm, Model, TextView, append, model};

fn open_editor(
	model: &Rc<Model>,
	memory: Rc<dyn PageMemory>,
) -> (FormEditor<Model>, Rc<AttributeForm>, Rc<TextView>) {
	let editor = FormEditor::new(
		model.clone(),
		EditorInput::new("res/values/strings.xml"),
		EditorConfig::default(),
		memory,
	);
	let form = AttributeForm::new("resources");
	form.bind(editor.coordinator());
	let text = Rc::new(TextView::default());
	let forms: Vec<Rc<dyn EditorPage<String>>> = vec![form.clone()];
	editor.open(forms, text.clone()).unwrap();
	(editor, form, text)
}

#[test]
fn committing_form_edits_refreshes_text_view() {
	let model = model("<resources>");
	let (editor, form, text) = open_editor(&model, Rc::new(InMemoryPageMemory::new()));

	form.type_text("<string/>");
	assert_eq!(editor.commit_pages(true), 1);

	assert_eq!(
		*text.shown.borrow(),
		["<resources>", "<resources><string/>"]
	);
	assert_eq!(form.refreshes.get(), 2);
	assert_eq!(model.undo_labels(), [Some("Edit resources".to_string())]);
	assert!(model.is_dirty());
}

#[test]
fn undo_refreshes_views_with_restored_document() {
	let model = model("a");
	let (editor, _form, text) = open_editor(&model, Rc::new(InMemoryPageMemory::new()));

	editor
		.run_undoable_edit(Some("append"), |scope| append(scope, "b"))
		.unwrap()
		.applied()
		.unwrap();
	model.undo().unwrap();

	assert_eq!(*text.shown.borrow(), ["a", "ab", "a"]);
}

#[test]
fn pending_form_edit_commits_after_session_closes() {
	let model = model("");
	let (editor, form, _text) = open_editor(&model, Rc::new(InMemoryPageMemory::new()));

	editor
		.run_edit_session(|scope| {
			form.type_text("-");
			append(scope, "x")
		})
		.unwrap()
		.applied()
		.unwrap();
	assert!(!editor.is_edit_session_active());

	editor.commit_pages(false);
	assert_eq!(model.snapshot().as_deref(), Some("x-"));
	assert_eq!(model.open_handles(), 0);
}

#[test]
fn reopening_restores_last_page() {
	let model = model("<resources/>");
	let memory: Rc<dyn PageMemory> = Rc::new(InMemoryPageMemory::new());

	let (editor, _, _) = open_editor(&model, memory.clone());
	editor.set_active_page(TEXT_PAGE_ID).unwrap();
	editor.dispose();
	drop(editor);
	assert_eq!(model.listener_count(), 0);

	let (editor, _, text) = open_editor(&model, memory);
	assert_eq!(editor.active_page(), Some(1));
	assert!(editor.reveal(0..5));
	assert_eq!(*text.revealed.borrow(), [0..5]);
}
