use std::rc::Rc;

use crate::access::{Access, ModelHandle, OwnerId, SubscriptionToken};
use crate::error::ModelError;
use crate::event::ModelStateListener;

/// Interface of the structured-document engine.
///
/// Every successful [`acquire`](Self::acquire) must be paired with exactly one
/// [`release`](Self::release); use [`ScopedHandle`](crate::ScopedHandle) rather
/// than pairing the calls by hand.
///
/// Change brackets and recording brackets may nest. Engines only publish
/// [`ModelEvent::AboutToChange`](crate::ModelEvent::AboutToChange) and
/// [`ModelEvent::Changed`](crate::ModelEvent::Changed) for the outermost bracket.
pub trait StructuredModel {
	/// Snapshot of the parsed document handed to views.
	type Document: Clone + 'static;

	/// Shares the model for reading or editing.
	fn acquire(&self, access: Access) -> Result<ModelHandle, ModelError>;

	/// Returns a share obtained from [`acquire`](Self::acquire).
	fn release(&self, handle: ModelHandle);

	/// Opens a change bracket. Requires an edit handle.
	fn about_to_change(&self, handle: &ModelHandle) -> Result<(), ModelError>;

	/// Closes a change bracket. Listeners are notified from inside this call.
	fn changed(&self, handle: &ModelHandle);

	/// Starts an undo recording segment on behalf of `owner`.
	fn begin_recording(
		&self,
		handle: &ModelHandle,
		owner: OwnerId,
		label: Option<&str>,
	) -> Result<(), ModelError>;

	/// Ends the recording segment started by `owner`.
	fn end_recording(&self, handle: &ModelHandle, owner: OwnerId);

	/// Registers a lifecycle listener.
	fn subscribe(
		&self,
		handle: &ModelHandle,
		listener: Rc<dyn ModelStateListener<Self::Document>>,
	) -> Result<SubscriptionToken, ModelError>;

	/// Removes a listener. Returns `false` if the token was not registered.
	fn unsubscribe(&self, handle: &ModelHandle, token: SubscriptionToken) -> bool;

	/// Current document snapshot, if the model exposes one.
	fn document(&self, handle: &ModelHandle) -> Option<Self::Document>;
}
