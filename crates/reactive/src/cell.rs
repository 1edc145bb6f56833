use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;


/// Handle returned by [`Ref::subscribe`], used to detach the callback again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Rc<dyn Fn()>;

struct Inner<T> {
	value: RefCell<T>,
	version: Cell<u64>,
	next_subscriber: Cell<u64>,
	subscribers: RefCell<Vec<(SubscriptionId, Subscriber)>>,
}

/// Mutable shared cell whose writes are observable by every holder.
///
/// Cloning a `Ref` clones the handle, not the value: all clones read and
/// write the same slot.
pub struct Ref<T> {
	inner: Rc<Inner<T>>,
}

impl<T> Clone for Ref<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T: fmt::Debug> fmt::Debug for Ref<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Ref")
			.field("value", &*self.inner.value.borrow())
			.field("version", &self.inner.version.get())
			.finish()
	}
}

impl<T: Default> Default for Ref<T> {
	fn default() -> Self {
		Self::new(T::default())
	}
}

impl<T> From<T> for Ref<T> {
	fn from(value: T) -> Self {
		Self::new(value)
	}
}

impl<T> Ref<T> {
	/// Creates a cell holding `value` at version 0.
	pub fn new(value: T) -> Self {
		Self {
			inner: Rc::new(Inner {
				value: RefCell::new(value),
				version: Cell::new(0),
				next_subscriber: Cell::new(0),
				subscribers: RefCell::new(Vec::new()),
			}),
		}
	}

	/// Returns a clone of the current value.
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.inner.value.borrow().clone()
	}

	/// Runs `f` against the current value without cloning it.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.inner.value.borrow())
	}

	/// Replaces the value and notifies subscribers.
	pub fn set(&self, value: T) {
		drop(self.replace(value));
	}

	/// Replaces the value, notifies subscribers, and returns the previous value.
	pub fn replace(&self, value: T) -> T {
		let old = self.inner.value.replace(value);
		self.notify();
		old
	}

	/// Mutates the value in place and notifies subscribers.
	pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
		let out = f(&mut self.inner.value.borrow_mut());
		self.notify();
		out
	}

	/// Number of writes observed by this cell.
	pub fn version(&self) -> u64 {
		self.inner.version.get()
	}

	/// Registers `f` to run after every write.
	///
	/// Callbacks run once the value borrow has been released, so they may
	/// read the cell (and even write it) freely.
	pub fn subscribe(&self, f: impl Fn() + 'static) -> SubscriptionId {
		let id = SubscriptionId(self.inner.next_subscriber.get());
		self.inner.next_subscriber.set(id.0 + 1);
		self.inner.subscribers.borrow_mut().push((id, Rc::new(f)));
		id
	}

	/// Detaches a subscriber. Returns false if `id` was not attached.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		let mut subscribers = self.inner.subscribers.borrow_mut();
		let before = subscribers.len();
		subscribers.retain(|(sid, _)| *sid != id);
		subscribers.len() != before
	}

	/// True when both handles point at the same cell.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}

	/// Returns a view of this cell that cannot write it.
	pub fn readonly(&self) -> ReadonlyRef<T> {
		ReadonlyRef { cell: self.clone() }
	}

	fn notify(&self) {
		let version = self.inner.version.get().wrapping_add(1);
		self.inner.version.set(version);

		// Snapshot so callbacks can (un)subscribe without aliasing the list.
		let subscribers: Vec<Subscriber> = self
			.inner
			.subscribers
			.borrow()
			.iter()
			.map(|(_, f)| Rc::clone(f))
			.collect();
		tracing::trace!(
			domain = "reactive",
			version,
			subscribers = subscribers.len(),
			"ref written"
		);
		for f in subscribers {
			f();
		}
	}
}

/// Read-only view over a [`Ref`]. Writes to the source stay visible here.
pub struct ReadonlyRef<T> {
	cell: Ref<T>,
}

impl<T> Clone for ReadonlyRef<T> {
	fn clone(&self) -> Self {
		Self {
			cell: self.cell.clone(),
		}
	}
}

impl<T: fmt::Debug> fmt::Debug for ReadonlyRef<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ReadonlyRef").field(&self.cell).finish()
	}
}

impl<T> ReadonlyRef<T> {
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.cell.get()
	}

	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		self.cell.with(f)
	}

	pub fn version(&self) -> u64 {
		self.cell.version()
	}

	pub fn subscribe(&self, f: impl Fn() + 'static) -> SubscriptionId {
		self.cell.subscribe(f)
	}

	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		self.cell.unsubscribe(id)
	}

	/// True when this view observes `cell`.
	pub fn views(&self, cell: &Ref<T>) -> bool {
		self.cell.ptr_eq(cell)
	}
}
