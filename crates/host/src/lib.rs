//! Keys and capabilities shared by injection hosts and the atom engine.
//!
//! A host (a component tree, an app context, a test double) binds values
//! under [`HostKey`]s for a subtree and answers lookups nearest-first. The
//! atom engine only ever talks to a host through [`InjectionHost`].

/// Host capability trait and typed native helpers.
pub mod host;
/// String and symbol key shapes.
pub mod key;
/// Process-unique symbol identities.
pub mod symbol;

pub use host::{InjectDefault, InjectionHost, InjectionHostExt, downcast_cloned};
pub use key::{HostKey, InjectionKey};
pub use symbol::SymbolId;
