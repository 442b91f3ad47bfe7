//! Acquire-then-always-release guard.
//!
//! Read brackets, edit brackets and undo-recording brackets all share the same
//! shape: acquire a share, do something with it, release it no matter how the
//! work ends. [`ScopedHandle`] owns that release; [`with_handle`] wraps the
//! common "acquire, call, release" case.

use tracing::trace;

use crate::access::{Access, ModelHandle};
use crate::error::ModelError;
use crate::model::StructuredModel;

/// A model share that is released when dropped, including during unwinding.
pub struct ScopedHandle<'m, M: StructuredModel + ?Sized> {
	model: &'m M,
	/// Always `Some` until [`into_inner`](Self::into_inner) or drop.
	handle: Option<ModelHandle>,
}

impl<'m, M: StructuredModel + ?Sized> ScopedHandle<'m, M> {
	/// Acquires a share of `model`.
	pub fn acquire(model: &'m M, access: Access) -> Result<Self, ModelError> {
		let handle = model.acquire(access)?;
		trace!(handle = handle.id(), %access, "model share acquired");
		Ok(Self {
			model,
			handle: Some(handle),
		})
	}

	/// Takes ownership of a share acquired earlier so it is released on drop.
	pub fn adopt(model: &'m M, handle: ModelHandle) -> Self {
		Self {
			model,
			handle: Some(handle),
		}
	}

	pub fn handle(&self) -> &ModelHandle {
		match &self.handle {
			Some(handle) => handle,
			None => unreachable!("scoped handle used after release"),
		}
	}

	pub fn model(&self) -> &'m M {
		self.model
	}

	/// Detaches the share from the guard. The caller becomes responsible for
	/// releasing it, usually by [`adopt`](Self::adopt)ing it again later.
	pub fn into_inner(mut self) -> ModelHandle {
		match self.handle.take() {
			Some(handle) => handle,
			None => unreachable!("scoped handle used after release"),
		}
	}
}

impl<M: StructuredModel + ?Sized> Drop for ScopedHandle<'_, M> {
	fn drop(&mut self) {
		if let Some(handle) = self.handle.take() {
			trace!(handle = handle.id(), access = %handle.access(), "model share released");
			self.model.release(handle);
		}
	}
}

/// Acquires a share, runs `f` with it and releases it.
pub fn with_handle<M, R>(
	model: &M,
	access: Access,
	f: impl FnOnce(&ModelHandle) -> R,
) -> Result<R, ModelError>
where
	M: StructuredModel + ?Sized,
{
	let scoped = ScopedHandle::acquire(model, access)?;
	Ok(f(scoped.handle()))
}
