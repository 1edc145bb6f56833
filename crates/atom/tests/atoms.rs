//! Atom provide/inject through a mounted component tree.

use std::cell::RefCell;
use std::rc::Rc;

use ambit_atom::{Atom, Atoms, InjectError, InjectionKey, Injected, Key, Ref};
use ambit_host::InjectionHostExt;
use ambit_tree::{App, Component, Setup, View};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

mod common;

/// Renders the injected atom's current value on every render.
fn reader(atoms: &Atoms, atom: &Atom<i32>, name: &'static str) -> Component {
	let (atoms, atom) = (atoms.clone(), atom.clone());
	Component::new(name, move |cx| {
		let cell = atoms.inject_atom(cx, &atom).expect("atom of this engine");
		View::text(move || cell.get().to_string())
	})
}

/// Provides `value` for `atom`, then renders `children`.
fn provider(atoms: &Atoms, atom: &Atom<i32>, value: i32, children: Vec<Component>) -> Component {
	let (atoms, atom) = (atoms.clone(), atom.clone());
	Component::new(format!("Provide{value}"), move |cx| {
		atoms.provide_atom(cx, &atom, value);
		View::fragment(children.iter().cloned().map(View::from).collect())
	})
}

fn passthrough(name: &'static str, child: Component) -> Component {
	Component::render(name, move || child.clone().into())
}

#[test]
fn injects_the_default_value() {
	common::init_tracing();
	let atoms = Atoms::new();
	let my_atom = atoms.atom(0);
	let comp = reader(&atoms, &my_atom, "Reader");

	assert_eq!(App::new().mount(comp).html(), "0");
}

#[test]
fn provides_a_parent_value() {
	let atoms = Atoms::new();
	let my_atom = atoms.atom(0);
	let parent = provider(&atoms, &my_atom, 1, vec![reader(&atoms, &my_atom, "Child")]);

	assert_eq!(App::new().mount(parent).html(), "1");
}

#[test]
fn grandparent_without_provide_sees_the_default() {
	let atoms = Atoms::new();
	let count = atoms.atom(0);
	let grandparent_atoms = atoms.clone();
	let grandparent_atom = count.clone();
	let parent = provider(&atoms, &count, 1, vec![reader(&atoms, &count, "Child")]);
	let grandparent = Component::new("Grandparent", move |cx| {
		let own = grandparent_atoms.inject_atom(cx, &grandparent_atom).unwrap();
		View::fragment(vec![
			View::text(move || own.get().to_string()),
			View::static_text("|"),
			parent.clone().into(),
		])
	});

	assert_eq!(App::new().mount(grandparent).html(), "0|1");
}

#[test]
fn nearest_ancestor_wins() {
	let atoms = Atoms::new();
	let a = atoms.atom(0);
	let grandchild = reader(&atoms, &a, "Grandchild");
	let d = provider(&atoms, &a, 2, vec![grandchild]);
	let sibling = reader(&atoms, &a, "Sibling");
	let p = provider(&atoms, &a, 1, vec![d, sibling]);

	assert_eq!(App::new().mount(p).html(), "21");
}

#[test]
fn override_survives_intermediate_components() {
	let atoms = Atoms::new();
	let a = atoms.atom(0);
	let mut consumer = reader(&atoms, &a, "Consumer");
	for depth in ["M1", "M2", "M3", "M4"] {
		consumer = passthrough(depth, consumer);
	}
	let root = provider(&atoms, &a, 7, vec![consumer]);

	assert_eq!(App::new().mount(root).html(), "7");
}

#[test]
fn nested_provide_does_not_touch_the_ancestor_value() {
	let atoms = Atoms::new();
	let a = atoms.atom(0);
	let seen_by_p: Rc<RefCell<Option<Ref<i32>>>> = Rc::default();

	let d = provider(&atoms, &a, 2, vec![reader(&atoms, &a, "Grandchild")]);
	let (p_atoms, p_atom, sink) = (atoms.clone(), a.clone(), Rc::clone(&seen_by_p));
	let p = Component::new("P", move |cx| {
		*sink.borrow_mut() = Some(p_atoms.inject_atom(cx, &p_atom).unwrap());
		p_atoms.provide_atom(cx, &p_atom, 1);
		d.clone().into()
	});
	let mounted = App::new().mount(p);

	assert_eq!(mounted.html(), "2");
	let p_cell = seen_by_p.borrow().clone().unwrap();
	assert_eq!(p_cell.get(), 0);
	assert_eq!(atoms.default_cell(&a).unwrap().get(), 0);
}

#[test]
fn equal_initial_values_are_independent_atoms() {
	let atoms = Atoms::new();
	let first = atoms.atom(0);
	let second = atoms.atom(0);
	let root = provider(
		&atoms,
		&first,
		9,
		vec![reader(&atoms, &first, "First"), reader(&atoms, &second, "Second")],
	);

	assert_eq!(App::new().mount(root).html(), "90");
}

#[test]
fn provided_cell_writes_reach_consumers() {
	let atoms = Atoms::new();
	let count = atoms.atom(0);
	let source = Ref::new(1);
	let (provide_atoms, provide_atom, provided) = (atoms.clone(), count.clone(), source.clone());
	let child = reader(&atoms, &count, "Child");
	let parent = Component::new("Parent", move |cx| {
		provide_atoms.provide_cell(cx, &provide_atom, provided.clone());
		child.clone().into()
	});

	let mounted = App::new().mount(parent);
	assert_eq!(mounted.html(), "1");

	source.set(5);
	assert_eq!(mounted.html(), "5");
}

#[test]
fn default_cell_writes_reach_unprovided_consumers() {
	let atoms = Atoms::new();
	let count = atoms.atom(0);
	let mounted = App::new().mount(reader(&atoms, &count, "Reader"));

	atoms.default_cell(&count).unwrap().set(3);
	assert_eq!(mounted.html(), "3");
}

#[test]
fn atom_default_argument_is_a_usage_error() {
	let atoms = Atoms::new();
	let count = atoms.atom(0);
	let result: Rc<RefCell<Option<Result<Injected<i32>, InjectError>>>> = Rc::default();
	let (a, c, sink) = (atoms.clone(), count.clone(), Rc::clone(&result));
	let comp = Component::new("Comp", move |cx| {
		*sink.borrow_mut() = Some(a.inject_default(cx, &c, 1));
		View::Empty
	});
	App::new().mount(comp);

	let outcome = result.borrow_mut().take().unwrap();
	assert!(matches!(outcome, Err(InjectError::AtomDefault { symbol }) if symbol == count.symbol()));
}

#[test]
fn retained_setup_handle_reads_the_default() {
	let atoms = Atoms::new();
	let count = atoms.atom(0);
	let kept: Rc<RefCell<Option<Setup>>> = Rc::default();
	let sink = Rc::clone(&kept);
	let child = Component::new("Child", move |cx| {
		*sink.borrow_mut() = Some(cx.clone());
		View::Empty
	});
	App::new().mount(provider(&atoms, &count, 1, vec![child]));

	let cx = kept.borrow().clone().unwrap();
	assert_eq!(atoms.inject_atom(&cx, &count).unwrap().get(), 0);
}

#[test]
fn run_with_context_sees_the_default() {
	let atoms = Atoms::new();
	let count = atoms.atom(4);
	let value = App::new().run_with_context(|cx| atoms.inject_atom(cx, &count).unwrap().get());
	assert_eq!(value, 4);
}

#[test]
fn override_is_visible_inside_nested_run_with_context() {
	let atoms = Atoms::new();
	let count = atoms.atom(0);
	let app = App::new();
	let seen = Rc::new(RefCell::new(None));
	let (child_atoms, child_atom, inner_app, sink) =
		(atoms.clone(), count.clone(), app.clone(), Rc::clone(&seen));
	let child = Component::new("Child", move |cx| {
		let value = inner_app.run_with_context(|_| child_atoms.inject_atom(cx, &child_atom));
		*sink.borrow_mut() = Some(value.unwrap().get());
		View::Empty
	});
	app.mount(provider(&atoms, &count, 1, vec![child]));

	assert_eq!(*seen.borrow(), Some(1));
}

#[test]
fn foreign_atom_default_yields_the_bound_value() {
	let ours = Atoms::new();
	let theirs = Atoms::new();
	let foreign = theirs.atom(1);
	let seen = Rc::new(RefCell::new(None));
	let (child_atom, sink) = (foreign.clone(), Rc::clone(&seen));
	let child = Component::new("Child", move |cx| {
		let plain = ours.inject(cx, &child_atom).value();
		let defaulted = ours.inject_default(cx, &child_atom, 9).unwrap().value();
		*sink.borrow_mut() = Some((plain, defaulted));
		View::Empty
	});
	App::new().mount(provider(&theirs, &foreign, 2, vec![child]));

	assert_eq!(*seen.borrow(), Some((Some(2), Some(2))));
}

#[test]
fn foreign_atom_default_applies_without_a_provider() {
	let ours = Atoms::new();
	let foreign = Atoms::new().atom(1);
	let value = App::new().run_with_context(|cx| {
		ours.inject_factory(cx, &foreign, || 8).unwrap().value()
	});
	assert_eq!(value, Some(8));
}

#[derive(Clone, Copy)]
enum KeyShape {
	Str,
	External,
}

#[derive(Clone, Copy)]
enum Call {
	Plain,
	WithDefault,
	WithFactory,
}

fn via_atoms(atoms: &Atoms, cx: &Setup, key: Key<'_, i32>, call: Call) -> Option<i32> {
	match call {
		Call::Plain => atoms.inject(cx, key).into_bound(),
		Call::WithDefault => atoms.inject_default(cx, key, 9).unwrap().into_bound(),
		Call::WithFactory => atoms.inject_factory(cx, key, || 8).unwrap().into_bound(),
	}
}

fn via_host(cx: &Setup, key: Key<'_, i32>, call: Call) -> Option<i32> {
	let key = key.host_key();
	match call {
		Call::Plain => cx.inject::<i32>(key),
		Call::WithDefault => cx.inject_or(key, 9),
		Call::WithFactory => cx.inject_with(key, || 8),
	}
}

/// Mounts a parent that optionally provides 5 under the key and records what
/// its child injects.
fn inject_in_child(shape: KeyShape, provided: bool, call: Call, through_atoms: bool) -> Option<i32> {
	let atoms = Atoms::new();
	let external = InjectionKey::<i32>::described("x");
	let key = move || match shape {
		KeyShape::Str => Key::Str("x"),
		KeyShape::External => Key::External(external),
	};
	let seen = Rc::new(RefCell::new(None));

	let (child_atoms, sink) = (atoms.clone(), Rc::clone(&seen));
	let child = Component::new("Child", move |cx| {
		*sink.borrow_mut() = Some(if through_atoms {
			via_atoms(&child_atoms, cx, key(), call)
		} else {
			via_host(cx, key(), call)
		});
		View::Empty
	});
	let parent = Component::new("Parent", move |cx| {
		if provided {
			atoms.provide(cx, key(), 5);
		}
		child.clone().into()
	});
	App::new().mount(parent);

	seen.borrow_mut().take().expect("child setup ran")
}

#[rstest]
#[case::string_plain(KeyShape::Str, true, Call::Plain)]
#[case::string_plain_missing(KeyShape::Str, false, Call::Plain)]
#[case::string_default(KeyShape::Str, true, Call::WithDefault)]
#[case::string_default_missing(KeyShape::Str, false, Call::WithDefault)]
#[case::string_factory_missing(KeyShape::Str, false, Call::WithFactory)]
#[case::external_plain(KeyShape::External, true, Call::Plain)]
#[case::external_default_missing(KeyShape::External, false, Call::WithDefault)]
#[case::external_factory(KeyShape::External, true, Call::WithFactory)]
fn non_atom_keys_match_native_inject(
	#[case] shape: KeyShape,
	#[case] provided: bool,
	#[case] call: Call,
) {
	assert_eq!(
		inject_in_child(shape, provided, call, true),
		inject_in_child(shape, provided, call, false),
	);
}

proptest! {
	#[test]
	fn overrides_never_leak_between_atoms(values in proptest::collection::vec(any::<i32>(), 2..8)) {
		let atoms = Atoms::new();
		let keys: Vec<Atom<i32>> = values.iter().map(|_| atoms.atom(0)).collect();
		let readers: Vec<Component> = keys.iter().map(|k| reader(&atoms, k, "Reader")).collect();
		let with_sep: Vec<Component> = readers
			.into_iter()
			.flat_map(|r| [r, Component::render("Sep", || View::static_text(","))])
			.collect();

		// Only the first atom is overridden.
		let root = provider(&atoms, &keys[0], values[0], with_sep);
		let html = App::new().mount(root).html();

		let mut expected = vec![values[0].to_string()];
		expected.extend(std::iter::repeat_n("0".to_string(), values.len() - 1));
		prop_assert_eq!(html, format!("{},", expected.join(",")));
	}
}

#[test]
fn engines_share_a_store_through_clones() {
	let atoms = Atoms::new();
	let clone = atoms.clone();
	let count = clone.atom(1);
	assert!(atoms.is_atom(&Key::Atom(count.clone())));
	assert!(matches!(
		App::new().run_with_context(|cx| atoms.inject(cx, &count)),
		Injected::Atom(cell) if cell.get() == 1
	));
}
