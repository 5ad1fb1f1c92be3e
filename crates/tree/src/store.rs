//! The tree store: apply patches, bump the render version, read elements.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};
use vstore_proto::{Element, PatchKind, PatchOp, RenderVersion, Tree};

use crate::patch::{PatchField, PatchTarget, insert_element, merge_props, parse_path};

/// Reasons a patch is dropped without mutating the tree.
///
/// Every variant is recoverable: the patch is logged and discarded, the
/// tree and render version stay as they were.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
	/// The op string names no supported operation.
	#[error("unknown patch op: {0}")]
	UnknownOp(String),
	/// The path does not point at an element or a patchable property.
	#[error("unsupported patch path: {0}")]
	BadPath(String),
	/// A props replace targeted a key that is not in the tree.
	#[error("element not found: {0}")]
	ElementNotFound(String),
	/// The op requires a value operand and none was supplied.
	#[error("patch value is missing")]
	MissingValue,
	/// The value operand does not fit the targeted property.
	#[error("invalid patch value: {0}")]
	InvalidValue(String),
	/// An `add` payload could not be decoded as an element.
	#[error("invalid element payload: {0}")]
	InvalidElement(String),
}

struct TreeState {
	tree: Tree,
	version: RenderVersion,
}

/// Owner of the canonical document tree.
///
/// Cloning shares the underlying state; the version and tree always move
/// together under one lock, so [`TreeStore::snapshot`] never observes a
/// torn (tree, version) pair.
#[derive(Clone)]
pub struct TreeStore {
	inner: Arc<Mutex<TreeState>>,
}

impl TreeStore {
	/// Creates a store owning `seed` at version zero.
	#[must_use]
	pub fn new(seed: Tree) -> Self {
		Self {
			inner: Arc::new(Mutex::new(TreeState {
				tree: seed,
				version: RenderVersion::default(),
			})),
		}
	}

	/// Current render version.
	#[must_use]
	pub fn version(&self) -> RenderVersion {
		self.inner.lock().version
	}

	/// Coherent copy of the tree and the version it was read at.
	#[must_use]
	pub fn snapshot(&self) -> (Tree, RenderVersion) {
		let state = self.inner.lock();
		(state.tree.clone(), state.version)
	}

	/// Pure read of one element; never bumps the version.
	#[must_use]
	pub fn element(&self, key: &str) -> Option<Element> {
		self.inner.lock().tree.element(key).cloned()
	}

	/// Replaces the whole tree (used when a session seeds a new page).
	pub fn replace_tree(&self, tree: Tree) -> RenderVersion {
		let mut state = self.inner.lock();
		debug!(elements = tree.elements.len(), "tree replaced");
		state.tree = tree;
		state.version = state.version.next();
		state.version
	}

	/// Shallow-merges `props` into an existing element's prop bag.
	///
	/// This is the component-local write path; it bypasses patch parsing
	/// and the style merge rules. Returns the bumped version, or `None`
	/// (without a bump) when the element does not exist.
	pub fn update_element(&self, key: &str, props: Map<String, Value>) -> Option<RenderVersion> {
		let mut state = self.inner.lock();
		let Some(element) = state.tree.elements.get_mut(key) else {
			debug!(key, "update_element on missing element ignored");
			return None;
		};
		element.props.extend(props);
		state.version = state.version.next();
		Some(state.version)
	}

	/// Applies one externally-issued edit.
	///
	/// Accepted patches bump the render version exactly once, after the
	/// mutation, even when the mutation was effectively a no-op (e.g. a
	/// children replace on a missing key). Rejected patches are logged,
	/// leave the tree untouched, and do not bump.
	pub fn apply_patch(&self, patch: &PatchOp) -> Result<RenderVersion, PatchError> {
		let mut state = self.inner.lock();
		let result = parse_path(&patch.path)
			.and_then(|target| Self::apply(&mut state.tree, patch, &target));
		match result {
			Ok(()) => {
				state.version = state.version.next();
				Ok(state.version)
			}
			Err(error) => {
				warn!(op = %patch.op, path = %patch.path, %error, "patch dropped");
				Err(error)
			}
		}
	}

	fn apply(tree: &mut Tree, patch: &PatchOp, target: &PatchTarget) -> Result<(), PatchError> {
		match &patch.op {
			PatchKind::Replace => Self::apply_replace(tree, patch, target),
			PatchKind::Add => {
				if target.field.is_some() {
					return Err(PatchError::BadPath(patch.path.clone()));
				}
				let value = patch.value.clone().ok_or(PatchError::MissingValue)?;
				insert_element(tree, &target.key, value)
			}
			PatchKind::Remove => {
				if target.field.is_some() {
					return Err(PatchError::BadPath(patch.path.clone()));
				}
				// Never cascades: children arrays elsewhere may keep the
				// dangling key, and the recorded parent keeps its entry.
				// Readers tolerate both.
				if tree.elements.remove(&target.key).is_none() {
					debug!(key = %target.key, "remove of missing element");
				}
				Ok(())
			}
			PatchKind::Other(op) => Err(PatchError::UnknownOp(op.clone())),
		}
	}

	fn apply_replace(tree: &mut Tree, patch: &PatchOp, target: &PatchTarget) -> Result<(), PatchError> {
		let field = target.field.ok_or_else(|| PatchError::BadPath(patch.path.clone()))?;
		match field {
			PatchField::Props => {
				let Some(element) = tree.elements.get_mut(&target.key) else {
					// The one rejected-without-bump replace: nothing to
					// merge into, so the whole patch is refused.
					return Err(PatchError::ElementNotFound(target.key.clone()));
				};
				let incoming = match patch.value.clone() {
					None => Map::new(),
					Some(Value::Object(map)) => map,
					Some(other) => {
						return Err(PatchError::InvalidValue(format!(
							"props replace expects an object, got {other}"
						)));
					}
				};
				merge_props(&mut element.props, incoming);
				Ok(())
			}
			PatchField::Children => {
				let value = patch.value.clone().ok_or(PatchError::MissingValue)?;
				let children: Vec<String> = serde_json::from_value(value)
					.map_err(|e| PatchError::InvalidValue(e.to_string()))?;
				if let Some(element) = tree.elements.get_mut(&target.key) {
					element.children = children;
				} else {
					debug!(key = %target.key, "children replace on missing element");
				}
				Ok(())
			}
			PatchField::ParentKey => {
				let parent_key = match patch.value.clone() {
					None | Some(Value::Null) => None,
					Some(Value::String(s)) => Some(s),
					Some(other) => {
						return Err(PatchError::InvalidValue(format!(
							"parentKey replace expects a string or null, got {other}"
						)));
					}
				};
				if let Some(element) = tree.elements.get_mut(&target.key) {
					// Back-reference only; no children array is touched.
					element.parent_key = parent_key;
				} else {
					debug!(key = %target.key, "parentKey replace on missing element");
				}
				Ok(())
			}
		}
	}
}
