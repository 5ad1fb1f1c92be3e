//! Patch operations: discrete structural or prop-level tree edits.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The operation discriminator of a patch.
///
/// Unrecognized op strings decode into [`PatchKind::Other`] so the engine
/// can reject them with a log instead of failing the whole stream frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PatchKind {
	/// Insert a full element.
	Add,
	/// Merge props, or replace children / parentKey.
	Replace,
	/// Delete an element entry.
	Remove,
	/// Anything else the agent emitted; never mutates the tree.
	Other(String),
}

impl PatchKind {
	/// Wire spelling of the op.
	#[must_use]
	pub fn as_str(&self) -> &str {
		match self {
			Self::Add => "add",
			Self::Replace => "replace",
			Self::Remove => "remove",
			Self::Other(s) => s,
		}
	}
}

impl fmt::Display for PatchKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl From<String> for PatchKind {
	fn from(s: String) -> Self {
		match s.as_str() {
			"add" => Self::Add,
			"replace" => Self::Replace,
			"remove" => Self::Remove,
			_ => Self::Other(s),
		}
	}
}

impl From<PatchKind> for String {
	fn from(kind: PatchKind) -> Self {
		kind.as_str().to_owned()
	}
}

/// A single edit instruction applied to the document tree.
///
/// `path` is a slash-delimited pointer of the shape `/elements/<key>` for
/// whole-element operations or `/elements/<key>/<property>` for
/// `props` / `children` / `parentKey` edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOp {
	/// The operation to perform.
	pub op: PatchKind,
	/// Pointer to the target element or element property.
	pub path: String,
	/// Operand: a full element for `add`, the merged or replacing value
	/// for `replace`; absent for `remove`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<Value>,
}

impl PatchOp {
	/// An `add` of a full element value.
	pub fn add(path: impl Into<String>, value: Value) -> Self {
		Self {
			op: PatchKind::Add,
			path: path.into(),
			value: Some(value),
		}
	}

	/// A `replace` of props, children, or parentKey.
	pub fn replace(path: impl Into<String>, value: Value) -> Self {
		Self {
			op: PatchKind::Replace,
			path: path.into(),
			value: Some(value),
		}
	}

	/// A whole-element `remove`.
	pub fn remove(path: impl Into<String>) -> Self {
		Self {
			op: PatchKind::Remove,
			path: path.into(),
			value: None,
		}
	}
}
