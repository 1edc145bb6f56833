use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static SYMBOL_CLOCK: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity token, never reused.
///
/// Atoms and injection keys both draw from the same clock, so a symbol
/// identifies exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(u64);

impl SymbolId {
	/// Mints the next symbol. The first symbol is 1.
	pub fn fresh() -> Self {
		Self(SYMBOL_CLOCK.fetch_add(1, Ordering::Relaxed).wrapping_add(1))
	}

	/// Returns the raw clock value.
	pub const fn get(self) -> u64 {
		self.0
	}
}

impl fmt::Display for SymbolId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Symbol(#{})", self.0)
	}
}
