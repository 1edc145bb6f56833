use std::any::{Any, type_name};
use std::rc::Rc;

use crate::HostKey;

#[cfg(test)]
mod tests;

/// Fallback used by native inject when no binding exists.
pub enum InjectDefault<'a> {
	/// Returned as-is.
	Value(Rc<dyn Any>),
	/// Called once, only when no binding exists.
	Factory(Box<dyn FnOnce() -> Rc<dyn Any> + 'a>),
}

impl<'a> InjectDefault<'a> {
	pub fn value<T: 'static>(value: T) -> Self {
		Self::Value(Rc::new(value))
	}

	pub fn factory<T: 'static>(factory: impl FnOnce() -> T + 'a) -> Self {
		Self::Factory(Box::new(move || Rc::new(factory()) as Rc<dyn Any>))
	}

	/// Produces the fallback value, running the factory if there is one.
	pub fn resolve(self) -> Rc<dyn Any> {
		match self {
			Self::Value(v) => v,
			Self::Factory(f) => f(),
		}
	}
}

impl std::fmt::Debug for InjectDefault<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Value(_) => f.write_str("InjectDefault::Value(..)"),
			Self::Factory(_) => f.write_str("InjectDefault::Factory(..)"),
		}
	}
}

/// Tree-scoped provide/inject capabilities of a host.
pub trait InjectionHost {
	/// True while a component's setup phase (or an app context) is running
	/// for this host.
	fn has_injection_context(&self) -> bool;

	/// Binds `value` under `key` for the current subtree.
	fn provide_value(&self, key: HostKey, value: Rc<dyn Any>);

	/// Native inject: the nearest ancestor binding, else the resolved
	/// `default`, else `None`.
	fn inject_value(
		&self,
		key: &HostKey,
		default: Option<InjectDefault<'_>>,
	) -> Option<Rc<dyn Any>>;

	/// Silent probe for the nearest ancestor binding of `key`.
	///
	/// `None` means nothing in scope is bound under `key`; it never stands
	/// for a provided value.
	fn lookup(&self, key: &HostKey) -> Option<Rc<dyn Any>>;
}

impl<H: InjectionHost + ?Sized> InjectionHost for &H {
	fn has_injection_context(&self) -> bool {
		(**self).has_injection_context()
	}

	fn provide_value(&self, key: HostKey, value: Rc<dyn Any>) {
		(**self).provide_value(key, value);
	}

	fn inject_value(
		&self,
		key: &HostKey,
		default: Option<InjectDefault<'_>>,
	) -> Option<Rc<dyn Any>> {
		(**self).inject_value(key, default)
	}

	fn lookup(&self, key: &HostKey) -> Option<Rc<dyn Any>> {
		(**self).lookup(key)
	}
}

/// Clones a bound value out as `T`.
///
/// A binding of another type is logged and treated as absent.
pub fn downcast_cloned<T: Clone + 'static>(key: &HostKey, value: Rc<dyn Any>) -> Option<T> {
	match value.downcast_ref::<T>() {
		Some(v) => Some(v.clone()),
		None => {
			tracing::warn!(
				domain = "inject",
				key = %key,
				expected = type_name::<T>(),
				"injected value has a different type; treating as not found",
			);
			None
		}
	}
}

/// Typed wrappers over [`InjectionHost`], the host's native surface.
pub trait InjectionHostExt: InjectionHost {
	fn provide<T: 'static>(&self, key: impl Into<HostKey>, value: T) {
		self.provide_value(key.into(), Rc::new(value));
	}

	fn inject<T: Clone + 'static>(&self, key: impl Into<HostKey>) -> Option<T> {
		let key = key.into();
		let value = self.inject_value(&key, None)?;
		downcast_cloned(&key, value)
	}

	/// Inject with a default value, used when nothing is bound.
	fn inject_or<T: Clone + 'static>(&self, key: impl Into<HostKey>, default: T) -> Option<T> {
		let key = key.into();
		let value = self.inject_value(&key, Some(InjectDefault::value(default)))?;
		downcast_cloned(&key, value)
	}

	/// Inject with a default factory, called only when nothing is bound.
	fn inject_with<T: Clone + 'static>(
		&self,
		key: impl Into<HostKey>,
		factory: impl FnOnce() -> T,
	) -> Option<T> {
		let key = key.into();
		let value = self.inject_value(&key, Some(InjectDefault::factory(factory)))?;
		downcast_cloned(&key, value)
	}
}

impl<H: InjectionHost + ?Sized> InjectionHostExt for H {}
