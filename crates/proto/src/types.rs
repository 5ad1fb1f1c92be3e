//! The UI document tree: keyed elements with open-world prop bags.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Monotonic counter bumped once per accepted tree mutation.
///
/// Carries no information about *which* node changed; consumers that
/// memoize by element key use it as a cache-busting generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RenderVersion(pub u64);

impl RenderVersion {
	/// Returns the next generation.
	#[must_use]
	pub const fn next(self) -> Self {
		Self(self.0 + 1)
	}
}

/// Visibility switch for an element.
///
/// Only a literal `false` suppresses rendering; complex conditions are
/// carried opaquely and evaluated outside the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Visibility {
	/// Literal visibility flag.
	Shown(bool),
	/// Complex condition, passed through untouched.
	Condition(Value),
}

impl Visibility {
	/// Returns true when the element is explicitly hidden.
	#[must_use]
	pub fn is_hidden(&self) -> bool {
		matches!(self, Self::Shown(false))
	}

	pub(crate) fn is_default(&self) -> bool {
		matches!(self, Self::Shown(true))
	}
}

impl Default for Visibility {
	fn default() -> Self {
		Self::Shown(true)
	}
}

/// A single node of the UI document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
	/// Unique identity within a tree, stable across patches.
	pub key: String,
	/// Component type tag, resolved to an implementation by the catalog.
	#[serde(rename = "type")]
	pub kind: String,
	/// Open-world prop bag. The `style` and `textStyle` sub-maps receive
	/// key-by-key merge treatment when patched.
	#[serde(default, skip_serializing_if = "Map::is_empty")]
	pub props: Map<String, Value>,
	/// Ordered child keys; authoritative over any children-like value
	/// embedded in `props`.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<String>,
	/// Informational back-reference to the parent. Never derived from
	/// `children`, so the two can drift.
	#[serde(rename = "parentKey", default, skip_serializing_if = "Option::is_none")]
	pub parent_key: Option<String>,
	/// Action trigger attached to interactive elements; opaque to the core.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub action: Option<Value>,
	/// Analytics tracking configuration; opaque to the core.
	#[serde(rename = "trackEvent", default, skip_serializing_if = "Option::is_none")]
	pub track_event: Option<Value>,
	/// Visibility switch; `false` suppresses the subtree rooted here.
	#[serde(default, skip_serializing_if = "Visibility::is_default")]
	pub visible: Visibility,
}

impl Element {
	/// Creates an element with empty props and no children.
	pub fn new(key: impl Into<String>, kind: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			kind: kind.into(),
			props: Map::new(),
			children: Vec::new(),
			parent_key: None,
			action: None,
			track_event: None,
			visible: Visibility::default(),
		}
	}

	/// Replaces the prop bag.
	#[must_use]
	pub fn with_props(mut self, props: Map<String, Value>) -> Self {
		self.props = props;
		self
	}

	/// Replaces the ordered child key list.
	#[must_use]
	pub fn with_children<I, S>(mut self, children: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.children = children.into_iter().map(Into::into).collect();
		self
	}

	/// Sets the parent back-reference.
	#[must_use]
	pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
		self.parent_key = Some(parent.into());
		self
	}
}

/// The complete UI document: a root key and a flat element map.
///
/// Reachability from `root` is not enforced here; patches can leave
/// elements unreachable or children arrays dangling, and readers must
/// tolerate both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
	/// Key of the root element.
	pub root: String,
	/// Flat map of all elements by key.
	pub elements: FxHashMap<String, Element>,
}

impl Tree {
	/// Creates a tree from a root key and its elements.
	pub fn new(root: impl Into<String>, elements: impl IntoIterator<Item = Element>) -> Self {
		Self {
			root: root.into(),
			elements: elements.into_iter().map(|e| (e.key.clone(), e)).collect(),
		}
	}

	/// Looks up an element by key.
	#[must_use]
	pub fn element(&self, key: &str) -> Option<&Element> {
		self.elements.get(key)
	}

	/// Returns true when the key is present.
	#[must_use]
	pub fn contains(&self, key: &str) -> bool {
		self.elements.contains_key(key)
	}

	/// Resolved children of an element, in order, skipping dangling keys.
	#[must_use]
	pub fn children_of(&self, key: &str) -> Vec<&Element> {
		let Some(element) = self.elements.get(key) else {
			return Vec::new();
		};
		element
			.children
			.iter()
			.filter_map(|k| self.elements.get(k))
			.collect()
	}

	/// Parent of an element via its recorded back-reference.
	#[must_use]
	pub fn parent_of(&self, key: &str) -> Option<&Element> {
		let parent_key = self.elements.get(key)?.parent_key.as_deref()?;
		self.elements.get(parent_key)
	}

	/// All elements of a given component type.
	#[must_use]
	pub fn find_by_kind(&self, kind: &str) -> Vec<&Element> {
		self.elements.values().filter(|e| e.kind == kind).collect()
	}

	/// All elements carrying a prop with the given value.
	#[must_use]
	pub fn find_by_prop(&self, name: &str, value: &Value) -> Vec<&Element> {
		self.elements
			.values()
			.filter(|e| e.props.get(name) == Some(value))
			.collect()
	}
}
