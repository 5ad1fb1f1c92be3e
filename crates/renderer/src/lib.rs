//! Recursive renderer: walks the document tree from a root key and
//! materializes drawable output.
//!
//! The renderer resolves each element's type through an external
//! [`Resolve`] implementation (the catalog boundary) and never fails on
//! tree damage: missing elements draw a caller-supplied fallback,
//! unresolved types draw a visible placeholder carrying the type name.
//! Correctness is preferred over fine-grained re-render minimization:
//! every materialized node carries a `(key, render version)` identity so
//! memoizing consumers refresh whenever any patch has been applied.

#![warn(missing_docs)]

use serde_json::{Map, Value};
use tracing::warn;
use vstore_proto::{Element, RenderVersion, Tree};

/// Prop keys that carry children-like values and are stripped from the
/// prop set handed to implementations.
const CHILDREN_PROP_KEYS: [&str; 2] = ["children", "v:children"];

/// Handle naming the concrete implementation a resolved type draws with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentRef(pub String);

/// Catalog boundary: maps a type tag to its implementation handle.
pub trait Resolve {
	/// Resolved implementation for `type_name`, or `None` when the type
	/// is not in the catalog.
	fn resolve(&self, type_name: &str) -> Option<ComponentRef>;
}

/// Memoization identity of one render invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderIdentity {
	/// The rendered element's key.
	pub key: String,
	/// The tree generation this node was materialized at.
	pub version: RenderVersion,
}

/// Drawable output handed to the (external) component implementations.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderNode {
	/// A resolved component invocation.
	Component {
		/// Memoization identity for this invocation.
		identity: RenderIdentity,
		/// The implementation to draw with.
		component: ComponentRef,
		/// Cleaned prop set (visibility and children-carrying keys
		/// stripped, placeholder strings dropped).
		props: Map<String, Value>,
		/// Child output, in tree order.
		children: Vec<RenderNode>,
	},
	/// A plain text leaf.
	Text(String),
	/// A non-string child value forwarded untouched to the implementation.
	Opaque(Value),
	/// Placeholder for a type the catalog does not know; kept visible so
	/// failures surface to the operator instead of disappearing.
	Unknown {
		/// Memoization identity for this invocation.
		identity: RenderIdentity,
		/// The unresolved type tag.
		type_name: String,
	},
	/// Nothing is drawn.
	Nothing,
}

/// One render pass over a tree snapshot.
pub struct Renderer<'a, R: Resolve + ?Sized> {
	tree: &'a Tree,
	version: RenderVersion,
	resolver: &'a R,
}

impl<'a, R: Resolve + ?Sized> Renderer<'a, R> {
	/// Creates a renderer over a coherent `(tree, version)` snapshot.
	pub fn new(tree: &'a Tree, version: RenderVersion, resolver: &'a R) -> Self {
		Self {
			tree,
			version,
			resolver,
		}
	}

	/// Renders the tree's root element.
	#[must_use]
	pub fn render_root(&self) -> RenderNode {
		self.render(self.tree.root.as_str())
	}

	/// Renders one element, drawing nothing when the key is missing.
	#[must_use]
	pub fn render(&self, key: &str) -> RenderNode {
		self.render_or(key, RenderNode::Nothing)
	}

	/// Renders one element, drawing `fallback` when the key is missing.
	///
	/// Missing keys are a normal, non-fatal condition: `remove` patches
	/// never cascade, so dangling child references are expected.
	#[must_use]
	pub fn render_or(&self, key: &str, fallback: RenderNode) -> RenderNode {
		let Some(element) = self.tree.element(key) else {
			warn!(key, "element not found during render");
			return fallback;
		};

		if element.visible.is_hidden() || element.props.get("visible") == Some(&Value::Bool(false)) {
			return RenderNode::Nothing;
		}

		let identity = RenderIdentity {
			key: key.to_owned(),
			version: self.version,
		};

		let Some(component) = self.resolver.resolve(&element.kind) else {
			warn!(key, type_name = %element.kind, "component type not in catalog");
			return RenderNode::Unknown {
				identity,
				type_name: element.kind.clone(),
			};
		};

		RenderNode::Component {
			identity,
			component,
			props: cleaned_props(element),
			children: self.children_of(element),
		}
	}

	/// Child output for an element: the ordered `children` key list always
	/// wins; only when it is empty does a children-like prop value apply.
	fn children_of(&self, element: &Element) -> Vec<RenderNode> {
		if !element.children.is_empty() {
			return element.children.iter().map(|key| self.render(key)).collect();
		}
		let prop_children = CHILDREN_PROP_KEYS
			.iter()
			.find_map(|key| element.props.get(*key));
		match prop_children {
			None | Some(Value::Null) => Vec::new(),
			Some(Value::String(s)) => text_leaf(s).into_iter().collect(),
			Some(Value::Array(items)) => items
				.iter()
				.filter_map(|item| match item {
					Value::Null => None,
					Value::String(s) => text_leaf(s),
					other => Some(RenderNode::Opaque(other.clone())),
				})
				.collect(),
			Some(other) => vec![RenderNode::Opaque(other.clone())],
		}
	}
}

/// Wraps a string as a text leaf, dropping generation artifacts
/// (blank strings and lone-period placeholders).
fn text_leaf(s: &str) -> Option<RenderNode> {
	let trimmed = s.trim();
	if is_placeholder(trimmed) {
		None
	} else {
		Some(RenderNode::Text(trimmed.to_owned()))
	}
}

fn is_placeholder(s: &str) -> bool {
	s.trim().is_empty() || s.trim() == "."
}

/// The prop set handed to the implementation: `visible` and
/// children-carrying keys stripped, residual placeholder strings dropped.
fn cleaned_props(element: &Element) -> Map<String, Value> {
	let mut props = element.props.clone();
	props.remove("visible");
	for key in CHILDREN_PROP_KEYS {
		props.remove(key);
	}
	props.retain(|_, value| match value {
		Value::String(s) => !is_placeholder(s),
		_ => true,
	});
	props
}
