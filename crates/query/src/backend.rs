use async_trait::async_trait;
use serde_json::Value;

use crate::error::FetchError;

/// Transport boundary for one remote resource.
///
/// The bindings only need read and write verbs against resource paths;
/// the concrete transport (HTTP client, local fixture, test double) is
/// supplied by the composition root.
#[async_trait]
pub trait Backend: Send + Sync {
	/// Reads a resource.
	async fn get(&self, path: &str) -> Result<Value, FetchError>;

	/// Creates or updates a resource.
	async fn post(&self, path: &str, body: Value) -> Result<Value, FetchError>;

	/// Deletes a resource.
	async fn delete(&self, path: &str) -> Result<Value, FetchError>;
}
