use std::borrow::Cow;
use std::rc::Rc;

use crate::app::{Active, AppInner};
use crate::instance::{Instance, Setup};
use crate::provides::Provides;
use crate::{Component, View};

enum Node {
	Empty,
	Text(Rc<dyn Fn() -> String>),
	Element {
		tag: Cow<'static, str>,
		children: Vec<Node>,
	},
	Fragment(Vec<Node>),
	Instance {
		instance: Rc<Instance>,
		root: Box<Node>,
	},
}

/// A tree whose setups have all run. Rendering re-reads every text node.
pub struct Mounted {
	root: Node,
}

impl Mounted {
	pub fn html(&self) -> String {
		let mut out = String::new();
		render(&self.root, &mut out);
		out
	}

	/// Names of mounted components in setup order.
	pub fn components(&self) -> Vec<String> {
		let mut names = Vec::new();
		collect_names(&self.root, &mut names);
		names
	}
}

pub(crate) fn mount(app: &Rc<AppInner>, root: Component) -> Mounted {
	let provides = Rc::clone(&app.provides);
	Mounted {
		root: mount_component(app, provides, &root),
	}
}

fn mount_component(app: &Rc<AppInner>, inherited: Rc<Provides>, component: &Component) -> Node {
	let instance = Rc::new(Instance::new(
		app.next_instance_id(),
		component.name.clone(),
		inherited,
	));
	tracing::debug!(
		domain = "tree",
		component = %instance.name,
		instance = instance.id.0,
		"running setup",
	);
	let view = {
		let _guard = app.enter(Active::Setup(instance.id));
		let cx = Setup::new(Rc::clone(app), Rc::clone(&instance));
		(component.setup)(&cx)
	};
	let root = mount_view(app, &instance, view);
	Node::Instance {
		instance,
		root: Box::new(root),
	}
}

fn mount_view(app: &Rc<AppInner>, owner: &Instance, view: View) -> Node {
	match view {
		View::Empty => Node::Empty,
		View::Text(f) => Node::Text(f),
		View::Element { tag, children } => Node::Element {
			tag,
			children: children
				.into_iter()
				.map(|child| mount_view(app, owner, child))
				.collect(),
		},
		View::Fragment(children) => Node::Fragment(
			children
				.into_iter()
				.map(|child| mount_view(app, owner, child))
				.collect(),
		),
		View::Component(component) => mount_component(app, owner.provides(), &component),
	}
}

fn render(node: &Node, out: &mut String) {
	match node {
		Node::Empty => out.push_str("<!---->"),
		Node::Text(f) => out.push_str(&f()),
		Node::Element { tag, children } => {
			out.push('<');
			out.push_str(tag);
			out.push('>');
			for child in children {
				render(child, out);
			}
			out.push_str("</");
			out.push_str(tag);
			out.push('>');
		}
		Node::Fragment(children) => children.iter().for_each(|child| render(child, out)),
		Node::Instance { root, .. } => render(root, out),
	}
}

fn collect_names(node: &Node, names: &mut Vec<String>) {
	match node {
		Node::Empty | Node::Text(_) => {}
		Node::Element { children, .. } | Node::Fragment(children) => {
			children.iter().for_each(|child| collect_names(child, names));
		}
		Node::Instance { instance, root } => {
			names.push(instance.name.to_string());
			collect_names(root, names);
		}
	}
}
