use std::path::PathBuf;

/// Lifecycle notification delivered to [`ModelStateListener`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent<D> {
	/// An outermost change bracket opened.
	AboutToChange,
	/// The outermost change bracket closed. Carries the current document, if
	/// the model exposes one.
	Changed(Option<D>),
	/// The model became dirty (`true`) or was saved (`false`).
	DirtyStateChanged(bool),
	/// The backing resource was deleted.
	ResourceDeleted,
	/// The backing resource was renamed or copied.
	ResourceMoved {
		/// Previous base location.
		from: PathBuf,
		/// New base location.
		to: PathBuf,
	},
	/// The model is about to be rebuilt from its resource.
	AboutToReinitialize,
	/// The model was rebuilt from its resource.
	Reinitialized,
}

impl<D> ModelEvent<D> {
	/// Short name for logging.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::AboutToChange => "about_to_change",
			Self::Changed(_) => "changed",
			Self::DirtyStateChanged(_) => "dirty_state_changed",
			Self::ResourceDeleted => "resource_deleted",
			Self::ResourceMoved { .. } => "resource_moved",
			Self::AboutToReinitialize => "about_to_reinitialize",
			Self::Reinitialized => "reinitialized",
		}
	}
}

/// Receiver of model lifecycle events.
///
/// Called synchronously on the thread that drives the model. Implementations
/// may call back into the model.
pub trait ModelStateListener<D> {
	fn model_state(&self, event: &ModelEvent<D>);
}
