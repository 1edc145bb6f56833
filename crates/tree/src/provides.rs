use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use ambit_host::HostKey;
use rustc_hash::FxHashMap as HashMap;

/// One layer of provided values, shadowing its parent layer.
#[derive(Default)]
pub(crate) struct Provides {
	parent: Option<Rc<Provides>>,
	entries: RefCell<HashMap<HostKey, Rc<dyn Any>>>,
}

impl Provides {
	pub(crate) fn root() -> Rc<Self> {
		Rc::new(Self::default())
	}

	pub(crate) fn child_of(parent: Rc<Provides>) -> Rc<Self> {
		Rc::new(Self {
			parent: Some(parent),
			entries: RefCell::default(),
		})
	}

	/// Nearest binding for `key`, walking towards the root.
	pub(crate) fn get(&self, key: &HostKey) -> Option<Rc<dyn Any>> {
		let mut layer = self;
		loop {
			if let Some(v) = layer.entries.borrow().get(key) {
				return Some(Rc::clone(v));
			}
			layer = layer.parent.as_deref()?;
		}
	}

	pub(crate) fn insert(&self, key: HostKey, value: Rc<dyn Any>) {
		let replaced = self.entries.borrow_mut().insert(key, value);
		drop(replaced);
	}
}
