//! Incremental decode of the server-sent event stream.
//!
//! Frames are `data: <json>` lines separated by blank lines. A frame
//! that fails to decode is logged and skipped; the stream continues.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};
use vstore_proto::CustomizeEvent;

/// Reads the next decodable event, or `None` at end of stream.
///
/// Blank separator lines, non-`data:` lines, and malformed payloads are
/// all skipped; only stream I/O failures surface as errors.
pub async fn next_event<R>(reader: &mut R) -> std::io::Result<Option<CustomizeEvent>>
where
	R: AsyncBufRead + Unpin + ?Sized,
{
	let mut line = String::new();
	loop {
		line.clear();
		if reader.read_line(&mut line).await? == 0 {
			return Ok(None);
		}
		let frame = line.trim();
		if frame.is_empty() {
			continue;
		}
		let Some(payload) = frame.strip_prefix("data:") else {
			debug!(frame, "ignoring non-data stream line");
			continue;
		};
		match serde_json::from_str::<CustomizeEvent>(payload.trim()) {
			Ok(event) => return Ok(Some(event)),
			Err(error) => {
				warn!(%error, "skipping malformed stream event");
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::io::Cursor;

	use pretty_assertions::assert_eq;
	use tokio::io::BufReader;

	use super::*;

	async fn drain(input: &str) -> Vec<CustomizeEvent> {
		let mut reader = BufReader::new(Cursor::new(input.as_bytes().to_vec()));
		let mut events = Vec::new();
		while let Some(event) = next_event(&mut reader).await.unwrap() {
			events.push(event);
		}
		events
	}

	#[tokio::test]
	async fn decodes_data_frames_and_skips_noise() {
		let input = concat!(
			"data: {\"type\": \"status\", \"message\": \"working\"}\n",
			"\n",
			": keep-alive comment\n",
			"data: {malformed json}\n",
			"\n",
			"data: {\"type\": \"complete\"}\n",
			"\n",
		);
		let events = drain(input).await;
		assert_eq!(
			events,
			vec![
				CustomizeEvent::Status {
					message: Some("working".into())
				},
				CustomizeEvent::Complete {
					message: None,
					todos: None
				},
			]
		);
	}

	#[tokio::test]
	async fn empty_stream_yields_none() {
		assert_eq!(drain("").await, Vec::new());
	}
}
