use ambit_store::StoreMode;
use serde::Deserialize;

use crate::ConfigError;

/// Engine settings.
///
/// ```toml
/// store-mode = "reclaiming"
/// trace-resolution = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct AtomsConfig {
	/// Strategy for the identity store.
	pub store_mode: StoreMode,
	/// Emit a `trace` event for every atom resolution.
	pub trace_resolution: bool,
}

impl AtomsConfig {
	pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(s)?)
	}
}
