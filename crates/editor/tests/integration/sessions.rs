//! Bracketing properties of nested edit and undo sessions.

use proptest::prelude::*;
use xmlform_editor::{EditCoordinator, EditOutcome, EditScope};
use xmlform_model::{ModelCall, ModelError};

use crate::common::{Model, append, model};

#[derive(Debug, PartialEq)]
struct Failed(usize);

/// Runs `levels` nested sessions; level `fail_at` returns an error after
/// mutating. Undoable sessions are used on levels listed in `undoable`.
fn run_nested(
	coordinator: &EditCoordinator<Model>,
	levels: usize,
	fail_at: Option<usize>,
	undoable: &[bool],
) -> Result<EditOutcome<()>, Failed> {
	fn level(
		scope: &EditScope<'_, Model>,
		current: usize,
		levels: usize,
		fail_at: Option<usize>,
		undoable: &[bool],
	) -> Result<(), Failed> {
		append(scope, &current.to_string()).map_err(|_| Failed(0))?;
		if fail_at == Some(current) {
			return Err(Failed(current));
		}
		if current < levels {
			let next = |inner: &EditScope<'_, Model>| {
				level(inner, current + 1, levels, fail_at, undoable)
			};
			let coordinator = scope.coordinator();
			let outcome = if undoable[current] {
				coordinator.run_undoable_edit(Some("inner"), next)?
			} else {
				coordinator.run_edit_session(next)?
			};
			assert!(outcome.is_applied());
		}
		Ok(())
	}

	let outer = |scope: &EditScope<'_, Model>| level(scope, 1, levels, fail_at, undoable);
	if undoable[0] {
		coordinator.run_undoable_edit(Some("outer"), outer)
	} else {
		coordinator.run_edit_session(outer)
	}
}

proptest! {
	#[test]
	fn any_nesting_brackets_model_exactly_once(
		levels in 1usize..8,
		fail in proptest::option::of(1usize..8),
		undoable in proptest::collection::vec(any::<bool>(), 8),
	) {
		let fail_at = fail.filter(|&at| at <= levels);
		let model = model("");
		let coordinator = EditCoordinator::new(model.clone());

		let result = run_nested(&coordinator, levels, fail_at, &undoable);

		match fail_at {
			Some(at) => prop_assert_eq!(result, Err(Failed(at))),
			None => prop_assert_eq!(result, Ok(EditOutcome::Applied(()))),
		}
		let stats = model.stats();
		prop_assert_eq!(stats.about_to_change, 1);
		prop_assert_eq!(stats.changed, 1);
		prop_assert_eq!(stats.acquired_edit, stats.released);
		prop_assert_eq!(model.open_handles(), 0);
		prop_assert!(!coordinator.is_edit_session_active());
		prop_assert!(!coordinator.is_undo_recording());
		prop_assert!(!model.is_changing());
		prop_assert!(!model.is_recording());
		prop_assert_eq!(stats.mutations, fail_at.unwrap_or(levels));

		// The first undoable level reached records; deeper ones join it.
		let reached = fail_at.unwrap_or(levels);
		let records = usize::from(undoable[..reached].iter().any(|&u| u));
		prop_assert_eq!(stats.begin_recording, records);
		prop_assert_eq!(stats.end_recording, records);
		prop_assert_eq!(model.undo_labels().len(), records);
	}

	#[test]
	fn changed_follows_every_mutation(levels in 1usize..6) {
		let model = model("");
		let coordinator = EditCoordinator::new(model.clone());
		run_nested(&coordinator, levels, None, &[false; 8]).unwrap().applied().unwrap();

		let calls = model.calls();
		let about = calls.iter().position(|c| *c == ModelCall::AboutToChange).unwrap();
		let changed = calls.iter().position(|c| *c == ModelCall::Changed).unwrap();
		let mutations: Vec<_> = calls
			.iter()
			.enumerate()
			.filter(|(_, c)| **c == ModelCall::Mutate)
			.map(|(i, _)| i)
			.collect();
		prop_assert_eq!(mutations.len(), levels);
		prop_assert!(mutations.iter().all(|&i| about < i && i < changed));
		let expected: String = (1..=levels).map(|l| l.to_string()).collect();
		prop_assert_eq!(model.snapshot().unwrap(), expected);
	}
}

#[test]
fn nested_undoable_edits_leave_one_undo_entry() {
	let model = model("");
	let coordinator = EditCoordinator::new(model.clone());

	run_nested(&coordinator, 4, None, &[true; 8])
		.unwrap()
		.applied()
		.unwrap();

	assert_eq!(model.undo_labels(), [Some("outer".to_string())]);
	assert_eq!(model.stats().begin_recording, 1);
	assert_eq!(model.stats().end_recording, 1);

	model.undo().unwrap();
	assert_eq!(model.snapshot().as_deref(), Some(""));
}

#[test]
fn unavailable_model_skips_every_level() {
	let model = model("");
	model.set_available(false);
	let coordinator = EditCoordinator::new(model.clone());

	let outcome = run_nested(&coordinator, 3, None, &[false; 8]).unwrap();
	assert_eq!(
		outcome.skipped_reason().cloned(),
		Some(xmlform_editor::SessionError::ModelUnavailable(ModelError::Unavailable))
	);
	assert_eq!(model.stats().mutations, 0);
	assert!(model.calls().is_empty());
}
