//! Wire types for the vstore UI document protocol.
//!
//! This crate defines the data structures shared by every layer of the
//! storefront core: the keyed element tree, the patch operations that edit
//! it, and the streamed events produced by the remote customization agent.
//! All types serialize with serde to the JSON shapes the agent backend
//! emits and consumes.

#![warn(missing_docs)]

pub mod events;
pub mod patch;
pub mod types;

pub use events::{CustomizeEvent, CustomizeRequest, TodoItem, TodoStatus};
pub use patch::{PatchKind, PatchOp};
pub use types::{Element, RenderVersion, Tree, Visibility};
