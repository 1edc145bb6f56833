use std::fmt;
use std::marker::PhantomData;

use crate::SymbolId;

/// Key shapes a host can bind values under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostKey {
	Str(Box<str>),
	Symbol(SymbolId),
}

impl HostKey {
	/// Returns the symbol for symbol keys.
	pub fn as_symbol(&self) -> Option<SymbolId> {
		match self {
			Self::Symbol(sym) => Some(*sym),
			Self::Str(_) => None,
		}
	}
}

impl fmt::Display for HostKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Str(s) => f.write_str(s),
			Self::Symbol(sym) => sym.fmt(f),
		}
	}
}

impl From<&str> for HostKey {
	fn from(s: &str) -> Self {
		Self::Str(s.into())
	}
}

impl From<String> for HostKey {
	fn from(s: String) -> Self {
		Self::Str(s.into_boxed_str())
	}
}

impl From<SymbolId> for HostKey {
	fn from(sym: SymbolId) -> Self {
		Self::Symbol(sym)
	}
}

impl<T> From<InjectionKey<T>> for HostKey {
	fn from(key: InjectionKey<T>) -> Self {
		Self::Symbol(key.symbol)
	}
}

impl<T> From<&InjectionKey<T>> for HostKey {
	fn from(key: &InjectionKey<T>) -> Self {
		Self::Symbol(key.symbol)
	}
}

/// Typed symbol key defined outside the atom engine.
///
/// Two keys are equal only if one was copied from the other.
pub struct InjectionKey<T> {
	symbol: SymbolId,
	description: Option<&'static str>,
	_marker: PhantomData<fn() -> T>,
}

impl<T> Clone for InjectionKey<T> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<T> Copy for InjectionKey<T> {}

impl<T> PartialEq for InjectionKey<T> {
	fn eq(&self, other: &Self) -> bool {
		self.symbol == other.symbol
	}
}

impl<T> Eq for InjectionKey<T> {}

impl<T> std::hash::Hash for InjectionKey<T> {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.symbol.hash(state);
	}
}

impl<T> fmt::Debug for InjectionKey<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("InjectionKey")
			.field("symbol", &self.symbol)
			.field("description", &self.description)
			.finish()
	}
}

impl<T> Default for InjectionKey<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> InjectionKey<T> {
	/// Mints a new key.
	pub fn new() -> Self {
		Self {
			symbol: SymbolId::fresh(),
			description: None,
			_marker: PhantomData,
		}
	}

	/// Mints a new key with a description used in diagnostics.
	pub fn described(description: &'static str) -> Self {
		Self {
			description: Some(description),
			..Self::new()
		}
	}

	/// Returns the symbol backing this key.
	pub fn symbol(&self) -> SymbolId {
		self.symbol
	}

	/// Returns the description given to [`InjectionKey::described`].
	pub fn description(&self) -> Option<&'static str> {
		self.description
	}

	pub fn host_key(&self) -> HostKey {
		HostKey::Symbol(self.symbol)
	}
}
