use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use crate::Setup;

type SetupFn = dyn Fn(&Setup) -> View;

/// A named setup function. Setup runs once per mounted instance.
#[derive(Clone)]
pub struct Component {
	pub(crate) name: Cow<'static, str>,
	pub(crate) setup: Rc<SetupFn>,
}

impl fmt::Debug for Component {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Component").field("name", &self.name).finish()
	}
}

impl Component {
	pub fn new(
		name: impl Into<Cow<'static, str>>,
		setup: impl Fn(&Setup) -> View + 'static,
	) -> Self {
		Self {
			name: name.into(),
			setup: Rc::new(setup),
		}
	}

	/// A component with no setup logic that renders `view` for each instance.
	pub fn render(name: impl Into<Cow<'static, str>>, view: impl Fn() -> View + 'static) -> Self {
		Self::new(name, move |_| view())
	}

	pub fn name(&self) -> &str {
		&self.name
	}
}

/// Output of a setup function.
pub enum View {
	/// Renders as a comment placeholder.
	Empty,
	/// Text recomputed on every render.
	Text(Rc<dyn Fn() -> String>),
	Element {
		tag: Cow<'static, str>,
		children: Vec<View>,
	},
	Fragment(Vec<View>),
	Component(Component),
}

impl View {
	pub fn text(f: impl Fn() -> String + 'static) -> Self {
		Self::Text(Rc::new(f))
	}

	pub fn static_text(s: impl Into<String>) -> Self {
		let s = s.into();
		Self::text(move || s.clone())
	}

	pub fn element(tag: impl Into<Cow<'static, str>>, children: Vec<View>) -> Self {
		Self::Element {
			tag: tag.into(),
			children,
		}
	}

	pub fn fragment(children: Vec<View>) -> Self {
		Self::Fragment(children)
	}
}

impl From<Component> for View {
	fn from(c: Component) -> Self {
		Self::Component(c)
	}
}

impl fmt::Debug for View {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Empty => f.write_str("Empty"),
			Self::Text(_) => f.write_str("Text(..)"),
			Self::Element { tag, children } => f
				.debug_struct("Element")
				.field("tag", tag)
				.field("children", children)
				.finish(),
			Self::Fragment(children) => f.debug_tuple("Fragment").field(children).finish(),
			Self::Component(c) => f.debug_tuple("Component").field(&c.name).finish(),
		}
	}
}
