use ambit_host::{HostKey, InjectionKey};
use ambit_reactive::Ref;

use crate::Atom;

/// Injection key, tagged by shape at the call site.
pub enum Key<'a, T> {
	Str(&'a str),
	External(InjectionKey<T>),
	Atom(Atom<T>),
}

impl<T> Clone for Key<'_, T> {
	fn clone(&self) -> Self {
		match self {
			Self::Str(s) => Self::Str(*s),
			Self::External(k) => Self::External(*k),
			Self::Atom(a) => Self::Atom(a.clone()),
		}
	}
}

impl<T> std::fmt::Debug for Key<'_, T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
			Self::External(k) => f.debug_tuple("External").field(k).finish(),
			Self::Atom(a) => f.debug_tuple("Atom").field(a).finish(),
		}
	}
}

impl<T> Key<'_, T> {
	pub fn host_key(&self) -> HostKey {
		match self {
			Self::Str(s) => HostKey::from(*s),
			Self::External(k) => k.host_key(),
			Self::Atom(a) => a.host_key(),
		}
	}

	pub fn as_atom(&self) -> Option<&Atom<T>> {
		match self {
			Self::Atom(a) => Some(a),
			_ => None,
		}
	}
}

impl<'a, T> From<&'a str> for Key<'a, T> {
	fn from(s: &'a str) -> Self {
		Self::Str(s)
	}
}

impl<T> From<InjectionKey<T>> for Key<'_, T> {
	fn from(k: InjectionKey<T>) -> Self {
		Self::External(k)
	}
}

impl<T> From<&InjectionKey<T>> for Key<'_, T> {
	fn from(k: &InjectionKey<T>) -> Self {
		Self::External(*k)
	}
}

impl<T> From<Atom<T>> for Key<'_, T> {
	fn from(a: Atom<T>) -> Self {
		Self::Atom(a)
	}
}

impl<T> From<&Atom<T>> for Key<'_, T> {
	fn from(a: &Atom<T>) -> Self {
		Self::Atom(a.clone())
	}
}

/// Outcome of [`crate::Atoms::inject`].
pub enum Injected<T> {
	/// Atom key: the nearest override's cell, or the atom's default.
	Atom(Ref<T>),
	/// Non-atom key with a binding (or a default) in scope.
	Bound(T),
	NotFound,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Injected<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Atom(cell) => f.debug_tuple("Atom").field(cell).finish(),
			Self::Bound(v) => f.debug_tuple("Bound").field(v).finish(),
			Self::NotFound => f.write_str("NotFound"),
		}
	}
}

impl<T> Injected<T> {
	pub fn is_found(&self) -> bool {
		!matches!(self, Self::NotFound)
	}

	pub fn into_cell(self) -> Option<Ref<T>> {
		match self {
			Self::Atom(cell) => Some(cell),
			_ => None,
		}
	}

	pub fn into_bound(self) -> Option<T> {
		match self {
			Self::Bound(v) => Some(v),
			_ => None,
		}
	}

	/// The current value, read out of the cell for atom keys.
	pub fn value(self) -> Option<T>
	where
		T: Clone,
	{
		match self {
			Self::Atom(cell) => Some(cell.get()),
			Self::Bound(v) => Some(v),
			Self::NotFound => None,
		}
	}
}
