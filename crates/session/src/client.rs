//! The session client: drives one customization stream against the tree.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use vstore_proto::{CustomizeEvent, CustomizeRequest, TodoItem};
use vstore_tree::TreeStore;

use crate::decode;
use crate::transport::{SessionError, SessionTransport};

type ScreenshotFn = Arc<dyn Fn() -> Pin<Box<dyn Future<Output = Option<String>> + Send>> + Send + Sync>;
type ThemeFn = Arc<dyn Fn(&Value) + Send + Sync>;

/// How a customization session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
	/// The agent finished (or the stream ended cleanly).
	Complete {
		/// Final status text, if the agent sent one.
		message: Option<String>,
		/// Final state of the agent's work items.
		todos: Vec<TodoItem>,
	},
	/// The agent reported a terminal error.
	Failed {
		/// Failure description.
		message: String,
	},
	/// The session was cancelled before the stream finished.
	Cancelled,
}

#[derive(Default)]
struct Progress {
	customizing: AtomicBool,
	status: Mutex<Option<String>>,
	todos: Mutex<Vec<TodoItem>>,
}

/// Client for the remote customization agent.
///
/// One client drives at most one session at a time: issuing a new
/// request cancels any in-flight session via its cancellation token, and
/// a cancelled session applies no further edits to the tree store.
pub struct SessionClient {
	tree: TreeStore,
	transport: Arc<dyn SessionTransport>,
	progress: Arc<Progress>,
	cancel: Mutex<Option<CancellationToken>>,
	screenshot: Option<ScreenshotFn>,
	on_theme: Option<ThemeFn>,
}

impl SessionClient {
	/// Creates a client forwarding patches into `tree`.
	pub fn new(tree: TreeStore, transport: Arc<dyn SessionTransport>) -> Self {
		Self {
			tree,
			transport,
			progress: Arc::new(Progress::default()),
			cancel: Mutex::new(None),
			screenshot: None,
			on_theme: None,
		}
	}

	/// Installs an async capture callback answering screenshot requests.
	#[must_use]
	pub fn with_screenshot_capture<F>(mut self, capture: F) -> Self
	where
		F: Fn() -> Pin<Box<dyn Future<Output = Option<String>> + Send>> + Send + Sync + 'static,
	{
		self.screenshot = Some(Arc::new(capture));
		self
	}

	/// Installs a handler for opaque theme updates.
	#[must_use]
	pub fn with_theme_handler(mut self, handler: impl Fn(&Value) + Send + Sync + 'static) -> Self {
		self.on_theme = Some(Arc::new(handler));
		self
	}

	/// True while a session stream is being consumed.
	#[must_use]
	pub fn is_customizing(&self) -> bool {
		self.progress.customizing.load(Ordering::Acquire)
	}

	/// Latest status message from the agent.
	#[must_use]
	pub fn status_message(&self) -> Option<String> {
		self.progress.status.lock().clone()
	}

	/// Latest work item list from the agent.
	#[must_use]
	pub fn todos(&self) -> Vec<TodoItem> {
		self.progress.todos.lock().clone()
	}

	/// Aborts the in-flight session, if any.
	pub fn cancel(&self) {
		if let Some(token) = self.cancel.lock().take() {
			token.cancel();
		}
		self.progress.customizing.store(false, Ordering::Release);
		*self.progress.status.lock() = Some("Cancelled".to_owned());
	}

	/// Runs one customization session to completion.
	///
	/// The request carries the store's current tree. Patch events are
	/// applied as they arrive (rejected patches are logged by the store
	/// and do not end the session); progress events update the
	/// observable status and todo state.
	pub async fn customize(
		&self,
		prompt: impl Into<String>,
		session_id: Option<String>,
	) -> Result<SessionOutcome, SessionError> {
		// Single-flight: abort whatever is still running first.
		let token = CancellationToken::new();
		if let Some(previous) = self.cancel.lock().replace(token.clone()) {
			previous.cancel();
		}

		self.progress.customizing.store(true, Ordering::Release);
		*self.progress.status.lock() = Some("Starting customization...".to_owned());
		self.progress.todos.lock().clear();

		let (current_tree, _) = self.tree.snapshot();
		let request = CustomizeRequest {
			prompt: prompt.into(),
			current_tree,
			theme: None,
			session_id,
		};

		let mut stream = match self.transport.open(request).await {
			Ok(stream) => stream,
			Err(error) => {
				self.progress.customizing.store(false, Ordering::Release);
				return Err(error);
			}
		};

		let outcome = loop {
			let read = tokio::select! {
				() = token.cancelled() => break SessionOutcome::Cancelled,
				read = decode::next_event(stream.as_mut()) => read,
			};
			let event = match read {
				Ok(Some(event)) => event,
				Ok(None) => {
					// Stream ended without a terminal event.
					break SessionOutcome::Complete {
						message: None,
						todos: self.progress.todos.lock().clone(),
					};
				}
				Err(error) => {
					self.progress.customizing.store(false, Ordering::Release);
					return Err(SessionError::Io(error));
				}
			};
			// A cancelled session must not apply anything further.
			if token.is_cancelled() {
				break SessionOutcome::Cancelled;
			}
			match event {
				CustomizeEvent::Status { message } => {
					*self.progress.status.lock() = message;
				}
				CustomizeEvent::Plan { todos } | CustomizeEvent::TodoUpdate { todos } => {
					*self.progress.todos.lock() = todos;
				}
				CustomizeEvent::Patch { patch } => {
					// Rejection is logged by the store; the stream goes on.
					let _ = self.tree.apply_patch(&patch);
				}
				CustomizeEvent::ThemeUpdate { theme } => {
					if let Some(handler) = &self.on_theme {
						handler(&theme);
					}
				}
				CustomizeEvent::ScreenshotRequest { session_id, .. } => {
					match session_id {
						Some(sid) => self.spawn_screenshot(sid),
						None => debug!("screenshot request without session id skipped"),
					}
				}
				CustomizeEvent::ValidationWarning { issues } => {
					warn!(?issues, "agent validation warning");
				}
				CustomizeEvent::Error { message } => {
					break SessionOutcome::Failed {
						message: message.unwrap_or_else(|| "unknown error".to_owned()),
					};
				}
				CustomizeEvent::Complete { message, todos } => {
					if let Some(todos) = todos {
						*self.progress.todos.lock() = todos;
					}
					if message.is_some() {
						*self.progress.status.lock() = message.clone();
					}
					break SessionOutcome::Complete {
						message,
						todos: self.progress.todos.lock().clone(),
					};
				}
				CustomizeEvent::Unknown => {
					debug!("skipping unknown event type");
				}
			}
		};

		self.progress.customizing.store(false, Ordering::Release);
		if outcome == SessionOutcome::Cancelled {
			*self.progress.status.lock() = Some("Cancelled".to_owned());
		}
		Ok(outcome)
	}

	/// Captures and posts a screenshot without blocking event handling.
	fn spawn_screenshot(&self, session_id: String) {
		let Some(capture) = self.screenshot.clone() else {
			debug!("no screenshot handler installed; letting the backend time out");
			return;
		};
		let transport = Arc::clone(&self.transport);
		tokio::spawn(async move {
			let Some(image) = capture().await else {
				debug!("screenshot capture unavailable");
				return;
			};
			// Tiny captures are placeholder output; the backend handles
			// the missing reply by timing out gracefully.
			if image.len() < 100 {
				debug!(len = image.len(), "screenshot too small; not sending");
				return;
			}
			if let Err(error) = transport.send_screenshot(&session_id, &image).await {
				warn!(%error, "failed to post screenshot");
			}
		});
	}
}
