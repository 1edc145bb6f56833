//! Error types for atom resolution and configuration.

use ambit_host::{HostKey, SymbolId};

/// Usage errors raised synchronously by inject calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InjectError {
	/// A default was supplied for an atom key.
	#[error("atoms already carry a default; {symbol} was injected with one")]
	AtomDefault { symbol: SymbolId },

	/// Nothing in scope is bound under the key.
	#[error("injection \"{key}\" not found")]
	NotFound { key: HostKey },
}

/// Errors that can occur when loading engine configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),
}
