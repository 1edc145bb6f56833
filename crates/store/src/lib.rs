//! Identity store: per-identity default values for atoms.
//!
//! Entries are keyed by [`Identity`], an opaque token compared by instance.
//! The store commits to one [`StorageKind`] at construction:
//!
//! * [`StorageKind::Reclaiming`] holds identities weakly, so an entry is
//!   dropped once nothing else keeps its identity alive.
//! * [`StorageKind::Retaining`] holds entries until they are deleted.
//!
//! [`StoreMode::Auto`] probes the reclaiming container once and falls back
//! to retaining if the probe fails.

/// Opaque identity tokens.
pub mod identity;
/// The store service.
pub mod store;
/// Storage strategies and mode selection.
pub mod strategy;

pub use identity::{Identity, WeakIdentity};
pub use store::IdentityStore;
pub use strategy::{
	IdentityStorage, ProbeError, ReclaimingStorage, RetainingStorage, StorageKind, StoreMode,
};
