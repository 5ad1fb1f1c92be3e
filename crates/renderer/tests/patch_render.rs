//! End-to-end: patches applied through the store are observably rendered.

use serde_json::{Map, Value, json};
use vstore_proto::{Element, PatchOp, RenderVersion, Tree};
use vstore_renderer::{ComponentRef, RenderNode, Renderer, Resolve};
use vstore_tree::{TreeStore, seed};

/// Resolver that accepts every type; implementation lookup is not under
/// test here.
struct AllPrimitives;

impl Resolve for AllPrimitives {
	fn resolve(&self, type_name: &str) -> Option<ComponentRef> {
		Some(ComponentRef(type_name.to_owned()))
	}
}

fn obj(value: Value) -> Map<String, Value> {
	match value {
		Value::Object(map) => map,
		_ => Map::new(),
	}
}

fn render_now(store: &TreeStore) -> RenderNode {
	let (tree, version) = store.snapshot();
	Renderer::new(&tree, version, &AllPrimitives).render_root()
}

fn children(node: &RenderNode) -> &[RenderNode] {
	match node {
		RenderNode::Component { children, .. } => children,
		other => panic!("expected component, got {other:?}"),
	}
}

#[test]
fn patched_props_are_observably_rendered() {
	let store = TreeStore::new(Tree::new(
		"page",
		[
			Element::new("page", "View").with_children(["title"]),
			Element::new("title", "Text").with_props(obj(json!({"content": "Hi"}))),
		],
	));

	store
		.apply_patch(&PatchOp::replace("/elements/title/props", json!({"content": "Bye"})))
		.unwrap();

	let root = render_now(&store);
	let RenderNode::Component { identity, props, .. } = &children(&root)[0] else {
		panic!("expected title component");
	};
	assert_eq!(props.get("content"), Some(&json!("Bye")));
	// Memoized consumers key on (element, generation): the accepted patch
	// moved the generation, forcing a refresh.
	assert_eq!(identity.version, RenderVersion(1));
}

#[test]
fn render_survives_a_removed_but_still_referenced_element() {
	let store = TreeStore::new(Tree::new(
		"page",
		[
			Element::new("page", "View").with_children(["gone", "kept"]),
			Element::new("gone", "Text").with_props(obj(json!({"content": "bye"}))),
			Element::new("kept", "Text").with_props(obj(json!({"content": "still here"}))),
		],
	));

	store.apply_patch(&PatchOp::remove("/elements/gone")).unwrap();

	let root = render_now(&store);
	let kids = children(&root);
	assert_eq!(kids[0], RenderNode::Nothing);
	assert!(matches!(&kids[1], RenderNode::Component { .. }));
}

#[test]
fn seed_home_tree_renders_from_the_root() {
	let store = TreeStore::new(seed::home_tree());
	let root = render_now(&store);
	// header / content / bottom-nav
	assert_eq!(children(&root).len(), 3);
	for child in children(&root) {
		assert!(matches!(child, RenderNode::Component { .. }));
	}
}
