//! Seed document for the storefront home page.
//!
//! A compact, fully atomic tree (every node is a primitive type with
//! inline styles) that composition roots load at startup and the
//! customization agent edits from there.

use serde_json::{Map, Value, json};
use vstore_proto::{Element, Tree};

fn obj(value: Value) -> Map<String, Value> {
	match value {
		Value::Object(map) => map,
		_ => Map::new(),
	}
}

/// The initial home page: header, hero banner, arrival grid, bottom nav.
#[must_use]
pub fn home_tree() -> Tree {
	Tree::new(
		"page",
		[
			Element::new("page", "View")
				.with_props(obj(json!({"style": {"flex": 1, "backgroundColor": "#ffffff"}})))
				.with_children(["header", "content", "bottom-nav"]),
			// Header
			Element::new("header", "View")
				.with_props(obj(json!({
					"style": {
						"flexDirection": "row",
						"alignItems": "center",
						"justifyContent": "space-between",
						"paddingHorizontal": 16,
						"paddingVertical": 8,
						"borderBottomWidth": 1,
						"borderBottomColor": "#e5e5e5",
					}
				})))
				.with_children(["header-logo", "header-cart"]),
			Element::new("header-logo", "Text")
				.with_props(obj(json!({
					"content": "off.vstore",
					"style": {"fontSize": 18, "fontWeight": "600", "color": "#1a1a1a"},
				})))
				.with_parent("header"),
			Element::new("header-cart", "Icon")
				.with_props(obj(json!({"name": "shoppingcart", "size": 22, "color": "#1a1a1a"})))
				.with_parent("header"),
			// Scrollable content
			Element::new("content", "ScrollView")
				.with_props(obj(json!({"style": {"flex": 1}})))
				.with_children(["main-banner", "arrivals-section"]),
			// Hero banner; also the anchor element for orphaned title adds.
			Element::new("main-banner", "ImageBackground")
				.with_props(obj(json!({
					"source": "https://images.example.com/hero.jpg",
					"style": {"height": 400, "justifyContent": "flex-end", "padding": 32},
				})))
				.with_children(["hero-title", "hero-subtitle", "hero-cta"]),
			Element::new("hero-title", "Text")
				.with_props(obj(json!({
					"content": "We are digital meets fashions",
					"style": {"fontSize": 36, "fontWeight": "300", "color": "#ffffff"},
				})))
				.with_parent("main-banner"),
			Element::new("hero-subtitle", "Text")
				.with_props(obj(json!({
					"content": "High-quality swag, directly from the vstore foundation.",
					"style": {"fontSize": 14, "color": "#ffffff", "opacity": 0.9},
				})))
				.with_parent("main-banner"),
			Element::new("hero-cta", "Button")
				.with_props(obj(json!({
					"title": "Start shopping",
					"iconName": "arrowright",
					"style": {"backgroundColor": "#ffffff", "borderRadius": 30},
					"textStyle": {"fontSize": 14, "fontWeight": "500", "color": "#1a1a1a"},
				})))
				.with_parent("main-banner"),
			// New arrivals
			Element::new("arrivals-section", "View")
				.with_props(obj(json!({"style": {"paddingHorizontal": 16, "paddingVertical": 32}})))
				.with_children(["arrivals-title", "arrivals-grid"]),
			Element::new("arrivals-title", "Text")
				.with_props(obj(json!({
					"content": "New arrival",
					"style": {"fontSize": 14, "fontWeight": "500", "color": "#1a1a1a"},
				})))
				.with_parent("arrivals-section"),
			Element::new("arrivals-grid", "View")
				.with_props(obj(json!({"style": {"flexDirection": "row", "flexWrap": "wrap", "gap": 16}})))
				.with_children(["product-1", "product-2"]),
			Element::new("product-1", "ProductCard")
				.with_props(obj(json!({
					"title": "Suede-effect jacket",
					"price": "$119.99",
					"image": "https://images.example.com/p1.jpg",
					"style": {"width": "48%"},
				})))
				.with_parent("arrivals-grid"),
			Element::new("product-2", "ProductCard")
				.with_props(obj(json!({
					"title": "100% linen jacket",
					"price": "$129.99",
					"image": "https://images.example.com/p2.jpg",
					"style": {"width": "48%"},
				})))
				.with_parent("arrivals-grid"),
			// Bottom navigation with data-bound badge counts
			Element::new("bottom-nav", "View")
				.with_props(obj(json!({
					"style": {
						"flexDirection": "row",
						"justifyContent": "space-around",
						"paddingVertical": 16,
						"borderTopWidth": 1,
						"borderTopColor": "#e5e5e5",
					}
				})))
				.with_children(["nav-home", "nav-cart", "nav-wishlist"]),
			Element::new("nav-home", "Icon")
				.with_props(obj(json!({"name": "home", "size": 24, "color": "#1a1a1a"})))
				.with_parent("bottom-nav"),
			Element::new("nav-cart", "Badge")
				.with_props(obj(json!({
					"icon": "shoppingcart",
					"count": 0,
					"textStyle": {"fontSize": 10, "color": "#ffffff"},
				})))
				.with_parent("bottom-nav"),
			Element::new("nav-wishlist", "Badge")
				.with_props(obj(json!({
					"icon": "hearto",
					"count": 0,
					"textStyle": {"fontSize": 10, "color": "#ffffff"},
				})))
				.with_parent("bottom-nav"),
		],
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_child_reference_resolves() {
		let tree = home_tree();
		for element in tree.elements.values() {
			for child in &element.children {
				assert!(tree.contains(child), "{} lists missing child {child}", element.key);
			}
		}
	}

	#[test]
	fn recorded_parents_list_their_children() {
		let tree = home_tree();
		for element in tree.elements.values() {
			if let Some(parent_key) = &element.parent_key {
				let parent = tree.element(parent_key).expect("parent exists");
				assert!(parent.children.contains(&element.key));
			}
		}
	}
}
