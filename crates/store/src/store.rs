use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::Identity;
use crate::strategy::{self, IdentityStorage, StorageKind, StoreMode};


/// Identity-keyed side store.
///
/// The storage strategy is chosen once by [`IdentityStore::with_mode`] and
/// kept for the store's lifetime. All methods take `&self`; values displaced
/// by a write are dropped after the store's borrow is released, so a stored
/// value may own identities of its own.
pub struct IdentityStore {
	kind: StorageKind,
	storage: RefCell<Box<dyn IdentityStorage>>,
}

impl Default for IdentityStore {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for IdentityStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("IdentityStore")
			.field("kind", &self.kind)
			.field("len", &self.len())
			.finish()
	}
}

impl IdentityStore {
	/// Creates a store in [`StoreMode::Auto`].
	pub fn new() -> Self {
		Self::with_mode(StoreMode::Auto)
	}

	/// Creates a store, resolving `mode` to a [`StorageKind`] once.
	pub fn with_mode(mode: StoreMode) -> Self {
		Self::with_storage(strategy::select(mode))
	}

	/// Creates a store over a caller-supplied strategy.
	pub fn with_storage(storage: Box<dyn IdentityStorage>) -> Self {
		let kind = storage.kind();
		tracing::debug!(domain = "atoms", kind = kind.as_str(), "identity store created");
		Self {
			kind,
			storage: RefCell::new(storage),
		}
	}

	/// Returns the strategy this store committed to.
	pub fn kind(&self) -> StorageKind {
		self.kind
	}

	/// Inserts or replaces the entry for `identity`.
	pub fn set(&self, identity: &Identity, value: Rc<dyn Any>) {
		let displaced = self.storage.borrow_mut().set(identity, value);
		drop(displaced);
	}

	/// Returns the value stored for `identity`, if any.
	pub fn get(&self, identity: &Identity) -> Option<Rc<dyn Any>> {
		self.storage.borrow().get(identity)
	}

	/// Returns true if a value is stored for `identity`.
	pub fn has(&self, identity: &Identity) -> bool {
		self.storage.borrow().has(identity)
	}

	/// Removes the entry for `identity`. Returns true if one existed.
	pub fn delete(&self, identity: &Identity) -> bool {
		let removed = self.storage.borrow_mut().delete(identity);
		removed.is_some()
	}

	/// Stored entries, counting unreachable ones that have not been swept.
	pub fn len(&self) -> usize {
		self.storage.borrow().len()
	}

	/// Returns true if nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Drops entries whose identity is unreachable. Returns how many.
	///
	/// A no-op for [`StorageKind::Retaining`].
	pub fn sweep(&self) -> usize {
		let reclaimed = self.storage.borrow_mut().sweep();
		reclaimed.len()
	}
}
