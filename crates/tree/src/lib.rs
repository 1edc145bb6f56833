//! Component tree host implementing [`ambit_host::InjectionHost`].
//!
//! Each component runs its setup once, parent before children. Setup may
//! provide values for its descendants and inject values from its
//! ancestors; the app itself is the outermost provider.

/// App root, app-level provides and injection contexts.
pub mod app;
/// Component definitions and their views.
pub mod component;
/// Per-instance setup handles.
pub mod instance;
/// Mounted trees and rendering.
pub mod mounted;
mod provides;

pub use app::{App, AppContext};
pub use component::{Component, View};
pub use instance::{InstanceId, Setup};
pub use mounted::Mounted;
