//! Customization session wire types: the outbound request and the streamed
//! events the agent backend emits while it edits the tree.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::patch::PatchOp;
use crate::types::Tree;

/// Progress state of one agent work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
	/// Queued, not started.
	Pending,
	/// Currently being worked on.
	InProgress,
	/// Finished successfully.
	Completed,
	/// Finished with an error.
	Failed,
}

/// One work item from the agent's plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoItem {
	/// Stable item identifier.
	pub id: String,
	/// Human-readable task description.
	pub task: String,
	/// Current progress state.
	pub status: TodoStatus,
	/// Result payload for completed items, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub result: Option<Value>,
	/// Error message for failed items.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

/// The outbound customization call: a natural-language prompt plus the
/// tree the agent should edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomizeRequest {
	/// Natural-language customization request.
	pub prompt: String,
	/// Current UI tree state.
	pub current_tree: Tree,
	/// Current theme, carried opaquely.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub theme: Option<Value>,
	/// Session identifier for conversation persistence.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_id: Option<String>,
}

/// One event decoded from the customization stream.
///
/// The stream is a sequence of `data: <json>` frames; each frame carries a
/// `type` discriminator. Types this client does not know decode as
/// [`CustomizeEvent::Unknown`] and are skipped, so backend additions never
/// break the stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CustomizeEvent {
	/// Progress message.
	Status {
		/// Status text to surface to the operator.
		#[serde(default)]
		message: Option<String>,
	},
	/// Initial plan with work items.
	Plan {
		/// The planned work items.
		#[serde(default)]
		todos: Vec<TodoItem>,
	},
	/// Work item status change.
	TodoUpdate {
		/// The full, updated item list.
		#[serde(default)]
		todos: Vec<TodoItem>,
	},
	/// A tree edit to forward to the document store.
	Patch {
		/// The edit instruction.
		patch: PatchOp,
	},
	/// Theme change, carried opaquely.
	ThemeUpdate {
		/// The new theme value.
		theme: Value,
	},
	/// The agent wants a capture of the current screen.
	ScreenshotRequest {
		/// Correlation id for the capture.
		#[serde(default)]
		request_id: Option<String>,
		/// Session to post the capture back to.
		#[serde(default)]
		session_id: Option<String>,
	},
	/// Non-fatal validation issues the agent noticed.
	ValidationWarning {
		/// The reported issues.
		#[serde(default)]
		issues: Vec<String>,
	},
	/// Terminal failure; the stream ends after this.
	Error {
		/// Failure description.
		#[serde(default)]
		message: Option<String>,
	},
	/// Customization finished; the stream ends after this.
	Complete {
		/// Final status text.
		#[serde(default)]
		message: Option<String>,
		/// Final state of the work items.
		#[serde(default)]
		todos: Option<Vec<TodoItem>>,
	},
	/// An event type this client does not understand.
	#[serde(other)]
	Unknown,
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;

	#[test]
	fn patch_event_decodes() {
		let ev: CustomizeEvent = serde_json::from_value(json!({
			"type": "patch",
			"patch": {"op": "replace", "path": "/elements/hero-title/props", "value": {"content": "Sale"}},
		}))
		.unwrap();
		let CustomizeEvent::Patch { patch } = ev else {
			panic!("expected patch event");
		};
		assert_eq!(patch.path, "/elements/hero-title/props");
	}

	#[test]
	fn unknown_event_type_is_tolerated() {
		let ev: CustomizeEvent =
			serde_json::from_value(json!({"type": "telemetry_flush", "spans": 12})).unwrap();
		assert_eq!(ev, CustomizeEvent::Unknown);
	}

	#[test]
	fn todo_status_uses_snake_case() {
		let item: TodoItem = serde_json::from_value(json!({
			"id": "1",
			"task": "recolor hero",
			"status": "in_progress",
		}))
		.unwrap();
		assert_eq!(item.status, TodoStatus::InProgress);
	}
}
