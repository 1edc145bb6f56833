//! Observable cells shared between providers and consumers.

/// Shared cell with write notification.
pub mod cell;

pub use cell::{ReadonlyRef, Ref, SubscriptionId};
