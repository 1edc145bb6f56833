use std::any::Any;
use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ambit_host::{HostKey, InjectDefault, InjectionHost};

use crate::app::{Active, AppInner};
use crate::provides::Provides;

/// Identifies one mounted component instance within its app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(pub(crate) u64);

pub(crate) struct Instance {
	pub(crate) id: InstanceId,
	pub(crate) name: Cow<'static, str>,
	/// Layer injects resolve against: the parent's (or the app's).
	inherited: Rc<Provides>,
	/// Layer children inherit. Shares `inherited` until the first provide.
	own: RefCell<Rc<Provides>>,
}

impl Instance {
	pub(crate) fn new(id: InstanceId, name: Cow<'static, str>, inherited: Rc<Provides>) -> Self {
		Self {
			id,
			name,
			own: RefCell::new(Rc::clone(&inherited)),
			inherited,
		}
	}

	pub(crate) fn provides(&self) -> Rc<Provides> {
		Rc::clone(&self.own.borrow())
	}

	fn provide(&self, key: HostKey, value: Rc<dyn Any>) {
		let layer = {
			let mut own = self.own.borrow_mut();
			if Rc::ptr_eq(&own, &self.inherited) {
				*own = Provides::child_of(Rc::clone(&self.inherited));
			}
			Rc::clone(&own)
		};
		layer.insert(key, value);
	}
}

/// Native inject against `layer`: binding, else default, else not found.
pub(crate) fn resolve(
	layer: &Provides,
	key: &HostKey,
	default: Option<InjectDefault<'_>>,
) -> Option<Rc<dyn Any>> {
	if let Some(v) = layer.get(key) {
		return Some(v);
	}
	match default {
		Some(default) => Some(default.resolve()),
		None => {
			tracing::warn!(domain = "inject", key = %key, "injection \"{key}\" not found");
			None
		}
	}
}

/// Injection host handed to a component's setup.
///
/// The handle may be kept past setup (for example in a callback), but it
/// only has an injection context while its own setup is running.
#[derive(Clone)]
pub struct Setup {
	app: Rc<AppInner>,
	instance: Rc<Instance>,
}

impl fmt::Debug for Setup {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Setup")
			.field("instance", &self.instance.id)
			.field("name", &self.instance.name)
			.finish()
	}
}

impl Setup {
	pub(crate) fn new(app: Rc<AppInner>, instance: Rc<Instance>) -> Self {
		Self { app, instance }
	}

	pub fn id(&self) -> InstanceId {
		self.instance.id
	}

	/// The component's name.
	pub fn name(&self) -> &str {
		&self.instance.name
	}
}

impl InjectionHost for Setup {
	fn has_injection_context(&self) -> bool {
		self.app.is_active(Active::Setup(self.instance.id))
	}

	fn provide_value(&self, key: HostKey, value: Rc<dyn Any>) {
		if !self.has_injection_context() {
			tracing::warn!(
				domain = "inject",
				key = %key,
				component = self.name(),
				"provide() can only be used inside setup()",
			);
			return;
		}
		self.instance.provide(key, value);
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
				component = self.name(),
				"inject() can only be used inside setup()",
			);
			return None;
		}
		resolve(&self.instance.inherited, key, default)
	}

	fn lookup(&self, key: &HostKey) -> Option<Rc<dyn Any>> {
		self.instance.inherited.get(key)
	}
}
