use std::any::{Any, type_name};
use std::fmt;
use std::rc::Rc;

use ambit_host::{InjectDefault, InjectionHost, InjectionHostExt, SymbolId};
use ambit_reactive::Ref;
use ambit_store::{Identity, IdentityStore};

use crate::atom::AtomBinding;
use crate::{Atom, AtomsConfig, InjectError, Injected, Key};


/// Atom registry and provide/inject resolution.
///
/// An `Atoms` owns the identity store holding every atom's default. Clones
/// share the store, so one engine can be handed to every component that
/// works with the same atoms.
///
/// # Resolution order for an atom key
///
/// 1. The nearest ancestor's provide for that atom (only probed while the
///    host has an injection context)
/// 2. The atom's registered default
///
/// Keys that are not atoms of this engine, including atoms minted by a
/// different engine, are handed to the host unchanged.
#[derive(Clone)]
pub struct Atoms {
	store: Rc<IdentityStore>,
	trace_resolution: bool,
}

impl Default for Atoms {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Atoms {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Atoms")
			.field("store", &self.store)
			.field("trace_resolution", &self.trace_resolution)
			.finish()
	}
}

impl Atoms {
	pub fn new() -> Self {
		Self::with_config(AtomsConfig::default())
	}

	pub fn with_config(config: AtomsConfig) -> Self {
		let store = Rc::new(IdentityStore::with_mode(config.store_mode));
		Self::with_store_and_config(store, &config)
	}

	/// Creates an engine over an existing store with default settings.
	pub fn with_store(store: Rc<IdentityStore>) -> Self {
		Self::with_store_and_config(store, &AtomsConfig::default())
	}

	/// Creates an engine over an existing store.
	///
	/// `config.store_mode` is not consulted: the store already committed to
	/// its [`ambit_store::StorageKind`].
	pub fn with_store_and_config(store: Rc<IdentityStore>, config: &AtomsConfig) -> Self {
		Self {
			store,
			trace_resolution: config.trace_resolution,
		}
	}

	/// Returns true if per-resolution `trace` events are emitted.
	pub fn traces_resolution(&self) -> bool {
		self.trace_resolution
	}

	pub fn store(&self) -> &IdentityStore {
		&self.store
	}

	/// Mints a new atom whose default is `initial`.
	pub fn atom<T: 'static>(&self, initial: T) -> Atom<T> {
		self.atom_from_cell(Ref::new(initial))
	}

	/// Mints a new atom whose default is the existing `cell`.
	pub fn atom_from_cell<T: 'static>(&self, cell: Ref<T>) -> Atom<T> {
		let atom = Atom::from_identity(Identity::new());
		self.store.set(atom.identity(), Rc::new(cell));
		atom
	}

	/// True only for atom keys registered in this engine's store.
	pub fn is_atom<T>(&self, key: &Key<'_, T>) -> bool {
		key.as_atom().is_some_and(|atom| self.store.has(atom.identity()))
	}

	/// The atom's registered default cell, if the atom belongs to this engine.
	pub fn default_cell<T: 'static>(&self, atom: &Atom<T>) -> Option<Ref<T>> {
		self.store
			.get(atom.identity())
			.and_then(|v| v.downcast_ref::<Ref<T>>().cloned())
	}

	/// Resolves `key`.
	///
	/// Atom keys always resolve to a cell. Other keys resolve through the
	/// host's native inject.
	pub fn inject<'k, H, T>(&self, host: &H, key: impl Into<Key<'k, T>>) -> Injected<T>
	where
		H: InjectionHost + ?Sized,
		T: Clone + 'static,
	{
		match key.into() {
			Key::Atom(atom) => match self.default_cell(&atom) {
				Some(default) => Injected::Atom(self.resolve_registered(host, &atom, default)),
				None => self.resolve_foreign(host, &atom, None),
			},
			key => match host.inject::<T>(key.host_key()) {
				Some(v) => Injected::Bound(v),
				None => Injected::NotFound,
			},
		}
	}

	/// Resolves `key` with a default value for when nothing is bound.
	///
	/// An atom of another engine resolves like [`Atoms::inject`] does, to a
	/// cell, with the default wrapped in a fresh cell when nothing is bound.
	///
	/// # Errors
	///
	/// [`InjectError::AtomDefault`] for atoms of this engine, which carry
	/// their own.
	pub fn inject_default<'k, H, T>(
		&self,
		host: &H,
		key: impl Into<Key<'k, T>>,
		default: T,
	) -> Result<Injected<T>, InjectError>
	where
		H: InjectionHost + ?Sized,
		T: Clone + 'static,
	{
		let key = self.reject_atom(key.into())?;
		if let Key::Atom(foreign) = &key {
			return Ok(self.resolve_foreign(host, foreign, Some(InjectDefault::value(default))));
		}
		Ok(host
			.inject_or(key.host_key(), default)
			.map_or(Injected::NotFound, Injected::Bound))
	}

	/// Resolves `key` with a default factory, called only when nothing is bound.
	///
	/// # Errors
	///
	/// [`InjectError::AtomDefault`] for atoms of this engine, which carry
	/// their own.
	pub fn inject_factory<'k, H, T>(
		&self,
		host: &H,
		key: impl Into<Key<'k, T>>,
		factory: impl FnOnce() -> T,
	) -> Result<Injected<T>, InjectError>
	where
		H: InjectionHost + ?Sized,
		T: Clone + 'static,
	{
		let key = self.reject_atom(key.into())?;
		if let Key::Atom(foreign) = &key {
			return Ok(self.resolve_foreign(host, foreign, Some(InjectDefault::factory(factory))));
		}
		Ok(host
			.inject_with(key.host_key(), factory)
			.map_or(Injected::NotFound, Injected::Bound))
	}

	/// Resolves `key`, failing if nothing is in scope.
	///
	/// # Errors
	///
	/// [`InjectError::NotFound`] when a non-atom key (or an atom of another
	/// engine) has no binding.
	pub fn inject_required<'k, H, T>(
		&self,
		host: &H,
		key: impl Into<Key<'k, T>>,
	) -> Result<Injected<T>, InjectError>
	where
		H: InjectionHost + ?Sized,
		T: Clone + 'static,
	{
		let key = key.into();
		let host_key = key.host_key();
		match self.inject(host, key) {
			Injected::NotFound => Err(InjectError::NotFound { key: host_key }),
			found => Ok(found),
		}
	}

	/// Binds `value` under `key` for the host's subtree.
	///
	/// For an atom key a derived atom is minted to hold `value`, and its cell
	/// is bound under the original atom. The original atom's default is never
	/// touched.
	pub fn provide<'k, H, T>(&self, host: &H, key: impl Into<Key<'k, T>>, value: T)
	where
		H: InjectionHost + ?Sized,
		T: 'static,
	{
		match key.into() {
			Key::Atom(atom) if self.store.has(atom.identity()) => {
				self.provide_cell(host, &atom, Ref::new(value));
			}
			key => host.provide(key.host_key(), value),
		}
	}

	/// Binds an existing cell as the override for `atom`.
	///
	/// Writes to `cell` are seen by every consumer holding the injected cell.
	pub fn provide_cell<H, T>(&self, host: &H, atom: &Atom<T>, cell: Ref<T>)
	where
		H: InjectionHost + ?Sized,
		T: 'static,
	{
		if !self.store.has(atom.identity()) {
			host.provide(atom.host_key(), cell);
			return;
		}
		let derived = self.atom_from_cell(cell.clone());
		if self.trace_resolution {
			tracing::trace!(
				domain = "atoms",
				symbol = atom.symbol().get(),
				derived = derived.symbol().get(),
				"atom provided",
			);
		}
		host.provide_value(atom.host_key(), Rc::new(AtomBinding { derived, cell }));
	}

	/// Typed inject for atom keys.
	///
	/// # Errors
	///
	/// [`InjectError::NotFound`] only for an atom of another engine that has
	/// no binding in scope. Atoms of this engine always resolve.
	pub fn inject_atom<H, T>(&self, host: &H, atom: &Atom<T>) -> Result<Ref<T>, InjectError>
	where
		H: InjectionHost + ?Sized,
		T: Clone + 'static,
	{
		self.inject(host, atom)
			.into_cell()
			.ok_or_else(|| InjectError::NotFound {
				key: atom.host_key(),
			})
	}

	/// Typed provide for atom keys.
	pub fn provide_atom<H, T>(&self, host: &H, atom: &Atom<T>, value: T)
	where
		H: InjectionHost + ?Sized,
		T: 'static,
	{
		self.provide(host, atom, value);
	}

	/// Hook-style alias of [`Atoms::provide_atom`].
	pub fn use_atom<H, T>(&self, host: &H, atom: &Atom<T>, value: T)
	where
		H: InjectionHost + ?Sized,
		T: 'static,
	{
		self.provide_atom(host, atom, value);
	}

	fn reject_atom<'k, T>(&self, key: Key<'k, T>) -> Result<Key<'k, T>, InjectError> {
		match key.as_atom() {
			Some(atom) if self.store.has(atom.identity()) => Err(InjectError::AtomDefault {
				symbol: atom.symbol(),
			}),
			_ => Ok(key),
		}
	}

	fn resolve_registered<H, T>(&self, host: &H, atom: &Atom<T>, default: Ref<T>) -> Ref<T>
	where
		H: InjectionHost + ?Sized,
		T: Clone + 'static,
	{
		if !host.has_injection_context() {
			self.trace_resolved(atom.symbol(), "default", "no injection context");
			return default;
		}
		let Some(bound) = host.lookup(&atom.host_key()) else {
			self.trace_resolved(atom.symbol(), "default", "no provider in scope");
			return default;
		};
		match self.decode_binding(atom, &bound) {
			Some(cell) => cell,
			None => {
				tracing::warn!(
					domain = "atoms",
					symbol = atom.symbol().get(),
					expected = type_name::<T>(),
					"atom override has a different type; falling back to default",
				);
				default
			}
		}
	}

	/// Native inject for an atom of another engine. A raw default comes back
	/// wrapped in a fresh cell, like a raw binding.
	fn resolve_foreign<H, T>(
		&self,
		host: &H,
		atom: &Atom<T>,
		default: Option<InjectDefault<'_>>,
	) -> Injected<T>
	where
		H: InjectionHost + ?Sized,
		T: Clone + 'static,
	{
		host.inject_value(&atom.host_key(), default)
			.and_then(|bound| self.decode_binding(atom, &bound))
			.map_or(Injected::NotFound, Injected::Atom)
	}

	/// Reads an override cell out of a host binding.
	///
	/// Accepts a binding written by [`Atoms::provide_cell`], a bare cell, or a
	/// raw value (wrapped in a fresh cell).
	fn decode_binding<T>(&self, atom: &Atom<T>, bound: &Rc<dyn Any>) -> Option<Ref<T>>
	where
		T: Clone + 'static,
	{
		if let Some(binding) = bound.downcast_ref::<AtomBinding<T>>() {
			if self.trace_resolution {
				tracing::trace!(
					domain = "atoms",
					symbol = atom.symbol().get(),
					derived = binding.derived.symbol().get(),
					source = "provider",
					"atom resolved",
				);
			}
			return Some(binding.cell.clone());
		}
		if let Some(cell) = bound.downcast_ref::<Ref<T>>() {
			self.trace_resolved(atom.symbol(), "provider", "bare cell");
			return Some(cell.clone());
		}
		let raw = bound.downcast_ref::<T>()?;
		self.trace_resolved(atom.symbol(), "provider", "raw value");
		Some(Ref::new(raw.clone()))
	}

	fn trace_resolved(&self, symbol: SymbolId, source: &'static str, reason: &'static str) {
		if self.trace_resolution {
			tracing::trace!(
				domain = "atoms",
				symbol = symbol.get(),
				source,
				reason,
				"atom resolved",
			);
		}
	}
}
