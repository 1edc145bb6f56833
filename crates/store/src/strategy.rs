use std::any::Any;
use std::fmt;
use std::rc::Rc;

use ambit_host::SymbolId;
use rustc_hash::FxHashMap as HashMap;
use serde::Deserialize;

use crate::{Identity, WeakIdentity};


/// Entry count below which the reclaiming container never sweeps.
const MIN_SWEEP_THRESHOLD: usize = 32;

/// Requested storage strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreMode {
	/// Probe the reclaiming container once; fall back to retaining.
	#[default]
	Auto,
	Reclaiming,
	Retaining,
}

/// Strategy a store committed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
	Reclaiming,
	Retaining,
}

impl StorageKind {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Reclaiming => "reclaiming",
			Self::Retaining => "retaining",
		}
	}
}

impl fmt::Display for StorageKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Why the reclaiming container was rejected. Only used for mode selection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
	#[error("trial entry was not retrievable while its identity was live")]
	Unreadable,
	#[error("trial entry outlived its identity")]
	Retained,
}

/// Associative container from identity to type-erased value.
///
/// Mutating methods hand back displaced values instead of dropping them,
/// so the caller can release any borrow on the container first.
pub trait IdentityStorage {
	fn kind(&self) -> StorageKind;

	/// Inserts or replaces; returns the previous value and anything swept.
	fn set(&mut self, identity: &Identity, value: Rc<dyn Any>) -> Vec<Rc<dyn Any>>;

	fn get(&self, identity: &Identity) -> Option<Rc<dyn Any>>;

	fn has(&self, identity: &Identity) -> bool;

	fn delete(&mut self, identity: &Identity) -> Option<Rc<dyn Any>>;

	/// Physically stored entries, including unreachable ones not yet swept.
	fn len(&self) -> usize;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Drops entries whose identity is unreachable; returns their values.
	fn sweep(&mut self) -> Vec<Rc<dyn Any>>;
}

struct WeakEntry {
	identity: WeakIdentity,
	value: Rc<dyn Any>,
}

/// Weakly keyed container: an entry lives as long as its identity.
///
/// Unreachable entries are removed by a sweep that runs when the entry
/// count reaches a threshold which doubles with the live population.
///
/// Only the key is weak. Values are held strongly, so a value that owns its
/// own identity (a cell holding its atom, or a subscriber capturing it)
/// keeps that identity live and its entry is never reclaimed. Break such
/// cycles with [`IdentityStorage::delete`].
pub struct ReclaimingStorage {
	entries: HashMap<SymbolId, WeakEntry>,
	sweep_at: usize,
}

impl Default for ReclaimingStorage {
	fn default() -> Self {
		Self {
			entries: HashMap::default(),
			sweep_at: MIN_SWEEP_THRESHOLD,
		}
	}
}

impl ReclaimingStorage {
	pub fn new() -> Self {
		Self::default()
	}

	/// Trial insert checking entries are readable while live and dropped
	/// once their identity is gone.
	pub fn probe() -> Result<Self, ProbeError> {
		let mut storage = Self::new();
		let trial = Identity::new();
		drop(storage.set(&trial, Rc::new(())));
		if !storage.has(&trial) || storage.get(&trial).is_none() {
			return Err(ProbeError::Unreadable);
		}
		drop(trial);
		drop(storage.sweep());
		if !storage.is_empty() {
			return Err(ProbeError::Retained);
		}
		Ok(storage)
	}
}

impl IdentityStorage for ReclaimingStorage {
	fn kind(&self) -> StorageKind {
		StorageKind::Reclaiming
	}

	fn set(&mut self, identity: &Identity, value: Rc<dyn Any>) -> Vec<Rc<dyn Any>> {
		let mut displaced = if self.entries.len() >= self.sweep_at {
			self.sweep()
		} else {
			Vec::new()
		};
		let entry = WeakEntry {
			identity: identity.downgrade(),
			value,
		};
		if let Some(prev) = self.entries.insert(identity.symbol(), entry) {
			displaced.push(prev.value);
		}
		displaced
	}

	fn get(&self, identity: &Identity) -> Option<Rc<dyn Any>> {
		self.entries
			.get(&identity.symbol())
			.filter(|e| e.identity.is_live())
			.map(|e| Rc::clone(&e.value))
	}

	fn has(&self, identity: &Identity) -> bool {
		self.entries
			.get(&identity.symbol())
			.is_some_and(|e| e.identity.is_live())
	}

	fn delete(&mut self, identity: &Identity) -> Option<Rc<dyn Any>> {
		self.entries.remove(&identity.symbol()).map(|e| e.value)
	}

	fn len(&self) -> usize {
		self.entries.len()
	}

	fn sweep(&mut self) -> Vec<Rc<dyn Any>> {
		let dead: Vec<SymbolId> = self
			.entries
			.iter()
			.filter(|(_, e)| !e.identity.is_live())
			.map(|(sym, _)| *sym)
			.collect();
		let reclaimed: Vec<Rc<dyn Any>> = dead
			.iter()
			.filter_map(|sym| self.entries.remove(sym))
			.map(|e| e.value)
			.collect();
		self.sweep_at = (self.entries.len() * 2).max(MIN_SWEEP_THRESHOLD);
		if !reclaimed.is_empty() {
			tracing::debug!(
				domain = "atoms",
				reclaimed = reclaimed.len(),
				live = self.entries.len(),
				next_sweep_at = self.sweep_at,
				"swept unreachable identities",
			);
		}
		reclaimed
	}
}

/// Strongly keyed container: entries stay until deleted.
#[derive(Default)]
pub struct RetainingStorage {
	entries: HashMap<SymbolId, Rc<dyn Any>>,
}

impl RetainingStorage {
	pub fn new() -> Self {
		Self::default()
	}
}

impl IdentityStorage for RetainingStorage {
	fn kind(&self) -> StorageKind {
		StorageKind::Retaining
	}

	fn set(&mut self, identity: &Identity, value: Rc<dyn Any>) -> Vec<Rc<dyn Any>> {
		self.entries
			.insert(identity.symbol(), value)
			.into_iter()
			.collect()
	}

	fn get(&self, identity: &Identity) -> Option<Rc<dyn Any>> {
		self.entries.get(&identity.symbol()).cloned()
	}

	fn has(&self, identity: &Identity) -> bool {
		self.entries.contains_key(&identity.symbol())
	}

	fn delete(&mut self, identity: &Identity) -> Option<Rc<dyn Any>> {
		self.entries.remove(&identity.symbol())
	}

	fn len(&self) -> usize {
		self.entries.len()
	}

	fn sweep(&mut self) -> Vec<Rc<dyn Any>> {
		Vec::new()
	}
}

/// Builds the storage for `mode`, probing once for [`StoreMode::Auto`].
pub(crate) fn select(mode: StoreMode) -> Box<dyn IdentityStorage> {
	match mode {
		StoreMode::Reclaiming => Box::new(ReclaimingStorage::new()),
		StoreMode::Retaining => Box::new(RetainingStorage::new()),
		StoreMode::Auto => match ReclaimingStorage::probe() {
			Ok(storage) => Box::new(storage),
			Err(err) => {
				tracing::debug!(
					domain = "atoms",
					error = %err,
					"reclaiming storage unavailable; retaining entries",
				);
				Box::new(RetainingStorage::new())
			}
		},
	}
}
