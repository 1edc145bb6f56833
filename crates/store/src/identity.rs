use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use ambit_host::SymbolId;

struct Token {
	symbol: SymbolId,
}

/// Opaque, globally unique identity. Clones are the same identity.
#[derive(Clone)]
pub struct Identity(Rc<Token>);

impl Identity {
	/// Mints a new identity, unequal to every other.
	pub fn new() -> Self {
		Self(Rc::new(Token {
			symbol: SymbolId::fresh(),
		}))
	}

	/// The symbol this identity is bound under in a host.
	pub fn symbol(&self) -> SymbolId {
		self.0.symbol
	}

	/// Returns a handle that does not keep the identity alive.
	pub fn downgrade(&self) -> WeakIdentity {
		WeakIdentity {
			symbol: self.0.symbol,
			token: Rc::downgrade(&self.0),
		}
	}
}

impl Default for Identity {
	fn default() -> Self {
		Self::new()
	}
}

impl PartialEq for Identity {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl Eq for Identity {}

impl Hash for Identity {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.0.symbol.hash(state);
	}
}

impl fmt::Debug for Identity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Identity").field(&self.0.symbol.get()).finish()
	}
}

/// Non-owning handle to an [`Identity`].
#[derive(Clone)]
pub struct WeakIdentity {
	symbol: SymbolId,
	token: Weak<Token>,
}

impl WeakIdentity {
	/// Returns the symbol of the identity this handle points at.
	pub fn symbol(&self) -> SymbolId {
		self.symbol
	}

	/// True while some [`Identity`] clone is still alive.
	pub fn is_live(&self) -> bool {
		self.token.strong_count() > 0
	}

	/// Returns the identity if it is still live.
	pub fn upgrade(&self) -> Option<Identity> {
		self.token.upgrade().map(Identity)
	}
}

impl fmt::Debug for WeakIdentity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WeakIdentity")
			.field("symbol", &self.symbol.get())
			.field("live", &self.is_live())
			.finish()
	}
}
