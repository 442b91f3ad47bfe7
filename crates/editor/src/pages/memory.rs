//! Remembered page selection per edited resource.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::error::PageError;

/// Key/value store for the last active page of each resource.
pub trait PageMemory {
	fn load(&self, key: &str) -> Option<String>;

	fn store(&self, key: &str, value: &str) -> Result<(), PageError>;
}

/// Process-local [`PageMemory`].
#[derive(Debug, Default)]
pub struct InMemoryPageMemory {
	values: RefCell<HashMap<String, String>>,
	read_only: Cell<bool>,
}

impl InMemoryPageMemory {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a store pre-filled with `key = value`.
	pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
		let memory = Self::default();
		memory.values.borrow_mut().insert(key.into(), value.into());
		memory
	}

	/// When `true`, every [`store`](PageMemory::store) fails.
	pub fn set_read_only(&self, read_only: bool) {
		self.read_only.set(read_only);
	}

	pub fn get(&self, key: &str) -> Option<String> {
		self.values.borrow().get(key).cloned()
	}
}

impl PageMemory for InMemoryPageMemory {
	fn load(&self, key: &str) -> Option<String> {
		self.get(key)
	}

	fn store(&self, key: &str, value: &str) -> Result<(), PageError> {
		if self.read_only.get() {
			return Err(PageError::Memory(format!("cannot store {key}: read-only")));
		}
		self.values
			.borrow_mut()
			.insert(key.to_owned(), value.to_owned());
		Ok(())
	}
}
