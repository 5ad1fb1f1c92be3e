//! Patch path parsing and the prop/structure edit helpers.

use serde_json::{Map, Value};
use tracing::{debug, warn};
use vstore_proto::{Element, Tree};

use crate::store::PatchError;

/// Element an orphaned "title"-role add attaches to when present.
const INFERENCE_ANCHOR: &str = "main-banner";

/// Prop keys whose object values merge key-by-key instead of being
/// replaced wholesale.
const NESTED_MERGE_KEYS: [&str; 2] = ["style", "textStyle"];

/// Element property addressed by a three-segment patch path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PatchField {
	Props,
	Children,
	ParentKey,
}

/// Parsed form of a `/elements/<key>[/<property>]` pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PatchTarget {
	pub key: String,
	pub field: Option<PatchField>,
}

pub(crate) fn parse_path(path: &str) -> Result<PatchTarget, PatchError> {
	let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
	let bad = || PatchError::BadPath(path.to_owned());
	match parts.as_slice() {
		["elements", key] => Ok(PatchTarget {
			key: (*key).to_owned(),
			field: None,
		}),
		["elements", key, field] => {
			let field = match *field {
				"props" => PatchField::Props,
				"children" => PatchField::Children,
				"parentKey" => PatchField::ParentKey,
				_ => return Err(bad()),
			};
			Ok(PatchTarget {
				key: (*key).to_owned(),
				field: Some(field),
			})
		}
		_ => Err(bad()),
	}
}

/// Shallow-merges `incoming` onto `current`.
///
/// `style` / `textStyle` sub-maps are merged entry-by-entry so one patch
/// can adjust a single style attribute without destroying siblings set by
/// earlier patches; every other key replaces wholesale.
pub(crate) fn merge_props(current: &mut Map<String, Value>, incoming: Map<String, Value>) {
	for (key, value) in incoming {
		if NESTED_MERGE_KEYS.contains(&key.as_str())
			&& let Some(Value::Object(existing)) = current.get_mut(&key)
			&& let Value::Object(entries) = value
		{
			existing.extend(entries);
		} else {
			current.insert(key, value);
		}
	}
}

/// Appends `child` to `parent.children` unless already listed.
fn attach_child(parent: &mut Element, child: &str) {
	if !parent.children.iter().any(|k| k == child) {
		parent.children.push(child.to_owned());
	}
}

/// Inserts a full element and wires it to a parent when possible.
///
/// With a recorded `parentKey` the element is appended to that parent's
/// children, idempotently. Without one, a best-effort structural
/// inference attaches "title"-role keys to the designated anchor; when
/// inference fails the element stays in the map, unreachable from the
/// root until a later patch attaches it.
pub(crate) fn insert_element(tree: &mut Tree, key: &str, value: Value) -> Result<(), PatchError> {
	let Value::Object(mut fields) = value else {
		return Err(PatchError::InvalidElement("element payload is not an object".into()));
	};
	fields
		.entry("key".to_owned())
		.or_insert_with(|| Value::String(key.to_owned()));
	let mut element: Element = serde_json::from_value(Value::Object(fields))
		.map_err(|e| PatchError::InvalidElement(e.to_string()))?;
	// The path segment is the authoritative identity.
	if element.key != key {
		warn!(path_key = key, value_key = %element.key, "add payload key differs from path; using path key");
		element.key = key.to_owned();
	}

	let parent_key = element.parent_key.clone();
	tree.elements.insert(key.to_owned(), element);

	if let Some(parent_key) = parent_key {
		if let Some(parent) = tree.elements.get_mut(&parent_key) {
			attach_child(parent, key);
		} else {
			warn!(key, parent = %parent_key, "parent not found for added element");
		}
	} else if key.contains("title") {
		// Covers "subtitle" keys as well.
		if let Some(anchor) = tree.elements.get_mut(INFERENCE_ANCHOR) {
			debug!(key, anchor = INFERENCE_ANCHOR, "attaching added element to inferred parent");
			attach_child(anchor, key);
		} else {
			debug!(key, "no parent recorded and no anchor present; element left unattached");
		}
	} else {
		debug!(key, "no parent recorded; element left unattached");
	}
	Ok(())
}
