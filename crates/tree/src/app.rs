use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ambit_host::{HostKey, InjectDefault, InjectionHost};

use crate::Component;
use crate::instance::InstanceId;
use crate::mounted::{self, Mounted};
use crate::provides::Provides;

/// What is currently running with an injection context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Active {
	Setup(InstanceId),
	App,
}

pub(crate) struct AppInner {
	pub(crate) provides: Rc<Provides>,
	active: RefCell<Vec<Active>>,
	next_instance: Cell<u64>,
}

impl AppInner {
	pub(crate) fn next_instance_id(&self) -> InstanceId {
		let id = self.next_instance.get().wrapping_add(1);
		self.next_instance.set(id);
		InstanceId(id)
	}

	pub(crate) fn current(&self) -> Option<Active> {
		self.active.borrow().last().copied()
	}

	/// True while `frame` is anywhere on the active stack, so a setup keeps
	/// its context inside a nested [`App::run_with_context`] and vice versa.
	pub(crate) fn is_active(&self, frame: Active) -> bool {
		self.active.borrow().contains(&frame)
	}

	/// Marks `active` as running until the guard drops.
	pub(crate) fn enter(self: &Rc<Self>, active: Active) -> ActiveGuard {
		self.active.borrow_mut().push(active);
		ActiveGuard {
			app: Rc::clone(self),
		}
	}
}

pub(crate) struct ActiveGuard {
	app: Rc<AppInner>,
}

impl Drop for ActiveGuard {
	fn drop(&mut self) {
		self.app.active.borrow_mut().pop();
	}
}

/// Root of a component tree and its outermost provider.
#[derive(Clone)]
pub struct App {
	pub(crate) inner: Rc<AppInner>,
}

impl Default for App {
	fn default() -> Self {
		Self::new()
	}
}

impl App {
	pub fn new() -> Self {
		Self {
			inner: Rc::new(AppInner {
				provides: Provides::root(),
				active: RefCell::new(Vec::new()),
				next_instance: Cell::new(0),
			}),
		}
	}

	/// Provides `value` to every component mounted in this app.
	pub fn provide<T: 'static>(&self, key: impl Into<HostKey>, value: T) -> &Self {
		self.inner.provides.insert(key.into(), Rc::new(value));
		self
	}

	/// True while any setup or [`App::run_with_context`] call is running.
	pub fn has_injection_context(&self) -> bool {
		self.inner.current().is_some()
	}

	/// Runs `f` with an injection context that sees app-level provides.
	pub fn run_with_context<R>(&self, f: impl FnOnce(&AppContext) -> R) -> R {
		let _guard = self.inner.enter(Active::App);
		f(&AppContext {
			app: Rc::clone(&self.inner),
		})
	}

	/// Runs setup for `root` and its descendants.
	pub fn mount(&self, root: Component) -> Mounted {
		mounted::mount(&self.inner, root)
	}
}

/// Injection host for code running inside [`App::run_with_context`].
#[derive(Clone)]
pub struct AppContext {
	app: Rc<AppInner>,
}

impl InjectionHost for AppContext {
	fn has_injection_context(&self) -> bool {
		self.app.is_active(Active::App)
	}

	fn provide_value(&self, key: HostKey, value: Rc<dyn Any>) {
		self.app.provides.insert(key, value);
	}

	fn inject_value(
		&self,
		key: &HostKey,
		default: Option<InjectDefault<'_>>,
	) -> Option<Rc<dyn Any>> {
		if !self.has_injection_context() {
			tracing::warn!(
				domain = "inject",
				key = %key,
				"inject() can only be used inside setup() or run_with_context()",
			);
			return None;
		}
		crate::instance::resolve(&self.app.provides, key, default)
	}

	fn lookup(&self, key: &HostKey) -> Option<Rc<dyn Any>> {
		self.app.provides.get(key)
	}
}
