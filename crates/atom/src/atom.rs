use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use ambit_host::{HostKey, SymbolId};
use ambit_reactive::Ref;
use ambit_store::Identity;

/// Typed handle to an atom identity.
///
/// The value type is compile-time only. Clones are the same atom; two atoms
/// minted from equal values are still distinct.
pub struct Atom<T> {
	identity: Identity,
	_marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Atom<T> {
	fn clone(&self) -> Self {
		Self {
			identity: self.identity.clone(),
			_marker: PhantomData,
		}
	}
}

impl<T> PartialEq for Atom<T> {
	fn eq(&self, other: &Self) -> bool {
		self.identity == other.identity
	}
}

impl<T> Eq for Atom<T> {}

impl<T> Hash for Atom<T> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.identity.hash(state);
	}
}

impl<T> fmt::Debug for Atom<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Atom").field(&self.symbol().get()).finish()
	}
}

impl<T> Atom<T> {
	pub(crate) fn from_identity(identity: Identity) -> Self {
		Self {
			identity,
			_marker: PhantomData,
		}
	}

	/// Returns the identity the atom's default is stored under.
	pub fn identity(&self) -> &Identity {
		&self.identity
	}

	/// Returns the atom's symbol.
	pub fn symbol(&self) -> SymbolId {
		self.identity.symbol()
	}

	/// Key the atom's overrides are bound under in a host.
	pub fn host_key(&self) -> HostKey {
		HostKey::Symbol(self.symbol())
	}
}

/// Host binding written by an atom provide.
///
/// Owns the derived atom so its store entry lives as long as the binding.
pub(crate) struct AtomBinding<T> {
	pub(crate) derived: Atom<T>,
	pub(crate) cell: Ref<T>,
}
