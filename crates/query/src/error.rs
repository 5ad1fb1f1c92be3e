use thiserror::Error;

/// A failed remote read or write.
///
/// These surface only in the local state of the binding that issued the
/// call; they are never written into the shared cache, so one caller's
/// transient failure cannot disturb other subscribers of the same tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
	/// The backend call itself failed.
	#[error("backend request failed: {0}")]
	Backend(String),
	/// The response payload did not fit the expected shape.
	#[error("payload decode failed: {0}")]
	Decode(String),
}
