use std::cell::{Cell, RefCell};

use rustc_hash::FxHashMap as HashMap;

use super::*;
use crate::InjectionKey;

/// Single-scope host: every binding is visible to every lookup.
#[derive(Default)]
struct FlatHost {
	bindings: RefCell<HashMap<HostKey, Rc<dyn Any>>>,
}

impl InjectionHost for FlatHost {
	fn has_injection_context(&self) -> bool {
		true
	}

	fn provide_value(&self, key: HostKey, value: Rc<dyn Any>) {
		self.bindings.borrow_mut().insert(key, value);
	}

	fn inject_value(
		&self,
		key: &HostKey,
		default: Option<InjectDefault<'_>>,
	) -> Option<Rc<dyn Any>> {
		self.lookup(key).or_else(|| default.map(InjectDefault::resolve))
	}

	fn lookup(&self, key: &HostKey) -> Option<Rc<dyn Any>> {
		self.bindings.borrow().get(key).cloned()
	}
}

#[test]
fn typed_roundtrip_through_string_key() {
	let host = FlatHost::default();
	host.provide("foo", 1_i32);
	assert_eq!(host.inject::<i32>("foo"), Some(1));
	assert_eq!(host.inject::<i32>("bar"), None);
}

#[test]
fn injection_keys_do_not_collide_with_each_other() {
	let host = FlatHost::default();
	let a = InjectionKey::<&str>::described("a");
	let b = InjectionKey::<&str>::described("a");
	host.provide(a, "first");
	assert_eq!(host.inject::<&str>(a), Some("first"));
	assert_eq!(host.inject::<&str>(b), None);
}

#[test]
fn default_is_ignored_when_bound() {
	let host = FlatHost::default();
	host.provide("foo", "foo");
	assert_eq!(host.inject_or("foo", "fooDefault"), Some("foo"));
	assert_eq!(host.inject_or("bar", "bar"), Some("bar"));
}

#[test]
fn factory_runs_only_when_unbound() {
	let host = FlatHost::default();
	host.provide("foo", 1_u8);
	let calls = Cell::new(0);
	let bound = host.inject_with("foo", || {
		calls.set(calls.get() + 1);
		9_u8
	});
	let unbound = host.inject_with("bar", || {
		calls.set(calls.get() + 1);
		9_u8
	});
	assert_eq!(bound, Some(1));
	assert_eq!(unbound, Some(9));
	assert_eq!(calls.get(), 1);
}

#[test]
fn type_mismatch_reads_as_absent() {
	let host = FlatHost::default();
	host.provide("foo", 1_i32);
	assert_eq!(host.inject::<String>("foo"), None);
}

#[test]
fn host_key_display() {
	assert_eq!(HostKey::from("foo").to_string(), "foo");
	let sym = crate::SymbolId::fresh();
	assert_eq!(HostKey::from(sym).to_string(), format!("Symbol(#{})", sym.get()));
}
