//! Session client behavior against scripted and live event streams.

use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::io::{AsyncWriteExt, BufReader};
use vstore_proto::{CustomizeRequest, Element, RenderVersion, TodoStatus, Tree};
use vstore_session::{EventStream, SessionClient, SessionError, SessionOutcome, SessionTransport};
use vstore_tree::TreeStore;

#[derive(Default)]
struct ScriptedTransport {
	streams: Mutex<VecDeque<EventStream>>,
	requests: Mutex<Vec<CustomizeRequest>>,
	screenshots: Mutex<Vec<(String, String)>>,
}

impl ScriptedTransport {
	fn with_streams(streams: impl IntoIterator<Item = EventStream>) -> Arc<Self> {
		Arc::new(Self {
			streams: Mutex::new(streams.into_iter().collect()),
			..Self::default()
		})
	}
}

#[async_trait]
impl SessionTransport for ScriptedTransport {
	async fn open(&self, request: CustomizeRequest) -> Result<EventStream, SessionError> {
		self.requests.lock().unwrap().push(request);
		self.streams
			.lock()
			.unwrap()
			.pop_front()
			.ok_or_else(|| SessionError::Transport("no scripted stream".into()))
	}

	async fn send_screenshot(
		&self,
		session_id: &str,
		image_base64: &str,
	) -> Result<(), SessionError> {
		self.screenshots
			.lock()
			.unwrap()
			.push((session_id.to_owned(), image_base64.to_owned()));
		Ok(())
	}
}

fn scripted(frames: &str) -> EventStream {
	Box::new(BufReader::new(Cursor::new(frames.as_bytes().to_vec())))
}

fn title_tree() -> TreeStore {
	TreeStore::new(Tree::new(
		"page",
		[
			Element::new("page", "View").with_children(["title"]),
			{
				let mut title = Element::new("title", "Text");
				title.props.insert("content".into(), json!("Hi"));
				title
			},
		],
	))
}

async fn settle<F: Fn() -> bool>(done: F) {
	for _ in 0..500 {
		if done() {
			return;
		}
		tokio::task::yield_now().await;
	}
	panic!("condition did not settle");
}

#[tokio::test]
async fn streamed_patches_are_applied_and_the_session_completes() {
	let store = title_tree();
	let frames = concat!(
		"data: {\"type\": \"status\", \"message\": \"Planning\"}\n\n",
		"data: {\"type\": \"patch\", \"patch\": {\"op\": \"replace\", \"path\": \"/elements/title/props\", \"value\": {\"content\": \"Bye\"}}}\n\n",
		"data: {broken frame}\n\n",
		"data: {\"type\": \"metrics_snapshot\", \"spans\": 2}\n\n",
		"data: {\"type\": \"todo_update\", \"todos\": [{\"id\": \"1\", \"task\": \"recolor\", \"status\": \"completed\"}]}\n\n",
		"data: {\"type\": \"complete\", \"message\": \"All done\"}\n\n",
	);
	let transport = ScriptedTransport::with_streams([scripted(frames)]);
	let client = SessionClient::new(store.clone(), transport.clone() as Arc<dyn SessionTransport>);

	let outcome = client.customize("make the hero say goodbye", None).await.unwrap();

	let SessionOutcome::Complete { message, todos } = outcome else {
		panic!("expected completion");
	};
	assert_eq!(message.as_deref(), Some("All done"));
	assert_eq!(todos.len(), 1);
	assert_eq!(todos[0].status, TodoStatus::Completed);

	// The malformed and unknown frames were skipped; the patch landed.
	assert_eq!(store.element("title").unwrap().props["content"], json!("Bye"));
	assert_eq!(store.version(), RenderVersion(1));
	assert_eq!(client.status_message().as_deref(), Some("All done"));
	assert!(!client.is_customizing());

	let requests = transport.requests.lock().unwrap();
	assert_eq!(requests[0].prompt, "make the hero say goodbye");
	assert_eq!(requests[0].current_tree.root, "page");
}

#[tokio::test]
async fn agent_error_ends_the_session_as_failed() {
	let store = title_tree();
	let frames = concat!(
		"data: {\"type\": \"patch\", \"patch\": {\"op\": \"remove\", \"path\": \"/elements/title\"}}\n\n",
		"data: {\"type\": \"error\", \"message\": \"model overloaded\"}\n\n",
	);
	let transport = ScriptedTransport::with_streams([scripted(frames)]);
	let client = SessionClient::new(store.clone(), transport);

	let outcome = client.customize("remove the title", None).await.unwrap();

	assert_eq!(
		outcome,
		SessionOutcome::Failed {
			message: "model overloaded".into()
		}
	);
	// Edits before the failure stay applied.
	assert!(store.element("title").is_none());
}

#[tokio::test]
async fn rejected_patches_do_not_end_the_stream() {
	let store = title_tree();
	let frames = concat!(
		"data: {\"type\": \"patch\", \"patch\": {\"op\": \"replace\", \"path\": \"/elements/ghost/props\", \"value\": {\"content\": \"x\"}}}\n\n",
		"data: {\"type\": \"patch\", \"patch\": {\"op\": \"replace\", \"path\": \"/elements/title/props\", \"value\": {\"content\": \"Kept\"}}}\n\n",
		"data: {\"type\": \"complete\"}\n\n",
	);
	let transport = ScriptedTransport::with_streams([scripted(frames)]);
	let client = SessionClient::new(store.clone(), transport);

	let outcome = client.customize("edit things", None).await.unwrap();
	assert!(matches!(outcome, SessionOutcome::Complete { .. }));
	assert_eq!(store.element("title").unwrap().props["content"], json!("Kept"));
	// Only the accepted patch moved the version.
	assert_eq!(store.version(), RenderVersion(1));
}

#[tokio::test]
async fn cancelled_session_applies_no_further_edits() {
	let store = title_tree();
	let (mut server, client_end) = tokio::io::duplex(1024);
	let transport =
		ScriptedTransport::with_streams([Box::new(BufReader::new(client_end)) as EventStream]);
	let client = Arc::new(SessionClient::new(store.clone(), transport));

	let task = tokio::spawn({
		let client = Arc::clone(&client);
		async move { client.customize("live edit", None).await }
	});

	server
		.write_all(b"data: {\"type\": \"patch\", \"patch\": {\"op\": \"replace\", \"path\": \"/elements/title/props\", \"value\": {\"content\": \"First\"}}}\n\n")
		.await
		.unwrap();
	settle(|| store.version() == RenderVersion(1)).await;

	client.cancel();
	server
		.write_all(b"data: {\"type\": \"patch\", \"patch\": {\"op\": \"replace\", \"path\": \"/elements/title/props\", \"value\": {\"content\": \"Second\"}}}\n\n")
		.await
		.unwrap();
	drop(server);

	let outcome = task.await.unwrap().unwrap();
	assert_eq!(outcome, SessionOutcome::Cancelled);
	assert_eq!(store.element("title").unwrap().props["content"], json!("First"));
	assert_eq!(store.version(), RenderVersion(1));
	assert_eq!(client.status_message().as_deref(), Some("Cancelled"));
}

#[tokio::test]
async fn starting_a_new_session_aborts_the_inflight_one() {
	let store = title_tree();
	let (_server_kept_open, idle_end) = tokio::io::duplex(64);
	let transport = ScriptedTransport::with_streams([
		Box::new(BufReader::new(idle_end)) as EventStream,
		scripted("data: {\"type\": \"complete\", \"message\": \"done\"}\n\n"),
	]);
	let client = Arc::new(SessionClient::new(store, transport.clone() as Arc<dyn SessionTransport>));

	let first = tokio::spawn({
		let client = Arc::clone(&client);
		async move { client.customize("first", None).await }
	});
	settle(|| transport.requests.lock().unwrap().len() == 1).await;

	let outcome = client.customize("second", None).await.unwrap();
	assert!(matches!(outcome, SessionOutcome::Complete { .. }));

	let first_outcome = first.await.unwrap().unwrap();
	assert_eq!(first_outcome, SessionOutcome::Cancelled);
}

#[tokio::test]
async fn screenshot_requests_post_real_captures_only() {
	let store = title_tree();
	let frames = concat!(
		"data: {\"type\": \"screenshot_request\", \"session_id\": \"sess-9\"}\n\n",
		"data: {\"type\": \"complete\"}\n\n",
	);
	let transport = ScriptedTransport::with_streams([scripted(frames), scripted(frames)]);
	let transport_dyn = transport.clone() as Arc<dyn SessionTransport>;

	// A real capture (comfortably over the placeholder threshold) is sent.
	let client = SessionClient::new(store.clone(), Arc::clone(&transport_dyn))
		.with_screenshot_capture(|| Box::pin(async { Some("P".repeat(400)) }));
	client.customize("restyle", None).await.unwrap();
	settle(|| transport.screenshots.lock().unwrap().len() == 1).await;
	assert_eq!(transport.screenshots.lock().unwrap()[0].0, "sess-9");

	// A placeholder-sized capture is dropped; the backend times out.
	let client = SessionClient::new(store, transport_dyn)
		.with_screenshot_capture(|| Box::pin(async { Some("tiny".to_owned()) }));
	client.customize("restyle again", None).await.unwrap();
	for _ in 0..50 {
		tokio::task::yield_now().await;
	}
	assert_eq!(transport.screenshots.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn transport_failure_surfaces_as_an_error() {
	let store = title_tree();
	let transport = ScriptedTransport::with_streams([]);
	let client = SessionClient::new(store, transport);

	let error = client.customize("anything", None).await.unwrap_err();
	assert!(matches!(error, SessionError::Transport(_)));
	assert!(!client.is_customizing());
}
