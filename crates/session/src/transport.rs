//! Transport boundary for customization sessions.

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncBufRead;
use vstore_proto::CustomizeRequest;

/// A server-sent event stream, read line by line.
pub type EventStream = Box<dyn AsyncBufRead + Send + Unpin>;

/// Session-level failures.
///
/// Only transport and stream I/O problems surface here; everything the
/// agent reports in-band (malformed frames, rejected patches, `error`
/// events) is handled without failing the call.
#[derive(Debug, Error)]
pub enum SessionError {
	/// The customization request could not be opened.
	#[error("transport failure: {0}")]
	Transport(String),
	/// The event stream broke mid-session.
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

/// Outbound channel to the customization backend.
///
/// The concrete transport (HTTP client, local fixture, test double) is
/// supplied by the composition root; the client only needs to open a
/// request as an event stream and post screenshot captures back.
#[async_trait]
pub trait SessionTransport: Send + Sync {
	/// Issues a customization request and returns its event stream.
	async fn open(&self, request: CustomizeRequest) -> Result<EventStream, SessionError>;

	/// Posts a captured screenshot back to an agent session.
	async fn send_screenshot(&self, session_id: &str, image_base64: &str)
	-> Result<(), SessionError>;
}
