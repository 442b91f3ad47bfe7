//! Model change fan-out.
//!
//! The model publishes a rich set of lifecycle events. Views only need to know
//! that the document changed, so [`ModelChangeFanout`] subscribes once per
//! editor and turns each [`ModelEvent::Changed`] into exactly one
//! [`DocumentObserver::document_changed`] call.
//!
//! The remaining events are routed to observer hooks that do nothing by
//! default; observers that need finer-grained reactions override them.


use std::cell::Cell;
use std::path::Path;
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};
use xmlform_model::{
	Access, ModelError, ModelEvent, ModelStateListener, StructuredModel, SubscriptionToken, with_handle,
};

use crate::error::SessionError;

/// Receiver of the simplified document-changed signal.
pub trait DocumentObserver<D> {
	/// The document changed, or `None` if the model exposes no document.
	fn document_changed(&self, document: Option<&D>);

	fn about_to_change(&self) {}

	fn dirty_state_changed(&self, _dirty: bool) {}

	fn resource_deleted(&self) {}

	fn resource_moved(&self, _from: &Path, _to: &Path) {}

	fn about_to_reinitialize(&self) {}

	fn reinitialized(&self) {}
}

/// Listener registered with the model. Holds its observer weakly so the model
/// does not keep the editor alive.
struct FanoutListener<D> {
	observer: Weak<dyn DocumentObserver<D>>,
}

impl<D> ModelStateListener<D> for FanoutListener<D> {
	fn model_state(&self, event: &ModelEvent<D>) {
		let Some(observer) = self.observer.upgrade() else {
			trace!(event = event.kind(), "observer gone; model event dropped");
			return;
		};
		match event {
			ModelEvent::Changed(document) => observer.document_changed(document.as_ref()),
			ModelEvent::AboutToChange => observer.about_to_change(),
			ModelEvent::DirtyStateChanged(dirty) => observer.dirty_state_changed(*dirty),
			ModelEvent::ResourceDeleted => observer.resource_deleted(),
			ModelEvent::ResourceMoved { from, to } => observer.resource_moved(from, to),
			ModelEvent::AboutToReinitialize => observer.about_to_reinitialize(),
			ModelEvent::Reinitialized => observer.reinitialized(),
		}
	}
}

/// The editor's single subscription to its model.
///
/// Detaches on drop.
pub struct ModelChangeFanout<M: StructuredModel> {
	model: Rc<M>,
	subscription: Cell<Option<SubscriptionToken>>,
}

impl<M: StructuredModel> ModelChangeFanout<M> {
	/// Subscribes to `model` and immediately reports the current document to
	/// `observer`, so it starts out consistent with the model.
	pub fn attach(
		model: Rc<M>,
		observer: Weak<dyn DocumentObserver<M::Document>>,
	) -> Result<Self, SessionError> {
		let listener = Rc::new(FanoutListener {
			observer: observer.clone(),
		});
		let token = with_handle(&*model, Access::Read, |handle| {
			let token = model.subscribe(handle, listener)?;
			if let Some(observer) = observer.upgrade() {
				observer.document_changed(model.document(handle).as_ref());
			}
			Ok::<_, ModelError>(token)
		})
		.and_then(|subscribed| subscribed)
		.map_err(SessionError::ModelUnavailable)?;

		debug!(token = token.0, "model change fan-out attached");
		Ok(Self {
			model,
			subscription: Cell::new(Some(token)),
		})
	}

	pub fn is_attached(&self) -> bool {
		self.subscription.get().is_some()
	}

	/// Removes the subscription. Later calls do nothing.
	pub fn detach(&self) {
		let Some(token) = self.subscription.take() else {
			trace!("model change fan-out already detached");
			return;
		};
		match with_handle(&*self.model, Access::Read, |handle| {
			self.model.unsubscribe(handle, token)
		}) {
			Ok(true) => debug!(token = token.0, "model change fan-out detached"),
			Ok(false) => warn!(token = token.0, "model had no subscription to remove"),
			Err(error) => warn!(%error, token = token.0, "could not acquire model to unsubscribe"),
		}
	}
}

impl<M: StructuredModel> Drop for ModelChangeFanout<M> {
	fn drop(&mut self) {
		self.detach();
	}
}
