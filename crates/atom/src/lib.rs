//! Atoms: typed, globally unique injection keys that carry their own default.
//!
//! An [`Atom`] is minted by [`Atoms::atom`] and behaves like any other
//! provide/inject key, except that injecting it always yields a cell: the
//! nearest ancestor's provided value if there is one, otherwise the atom's
//! registered default.
//!
//! ```ignore
//! let atoms = Atoms::new();
//! let count = atoms.atom(0);
//!
//! // In a provider's setup:
//! atoms.provide_atom(cx, &count, 1);
//!
//! // In a descendant's setup:
//! let cell = atoms.inject_atom(cx, &count)?;
//! assert_eq!(cell.get(), 1);
//! ```
//!
//! String keys and [`InjectionKey`]s pass straight through to the host.

/// Typed atom handles.
pub mod atom;
/// Engine configuration.
pub mod config;
/// The resolution engine.
pub mod engine;
/// Error types.
pub mod error;
/// Tagged keys and resolution results.
pub mod key;

pub use ambit_host::{HostKey, InjectionHost, InjectionKey};
pub use ambit_reactive::{ReadonlyRef, Ref};
pub use ambit_store::{IdentityStore, StorageKind, StoreMode};
pub use atom::Atom;
pub use config::AtomsConfig;
pub use engine::Atoms;
pub use error::{ConfigError, InjectError};
pub use key::{Injected, Key};
