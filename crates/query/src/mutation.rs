use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;
use vstore_cache::{CacheAction, CacheStore};

use crate::error::FetchError;
use crate::query::FetchFuture;

type Writer<I> = Arc<dyn Fn(I) -> FetchFuture + Send + Sync>;
type FailHandler = Arc<dyn Fn(FetchError) + Send + Sync>;

/// Local, transient state of one mutation binding.
#[derive(Debug, Clone, Default)]
pub struct MutationState {
	/// A write is in flight.
	pub updating: bool,
	/// The last write failed; cleared on the next attempt.
	pub error: Option<FetchError>,
}

/// Invalidate-then-pull write binding.
///
/// On success every affected tag is marked stale; the response value is
/// deliberately *not* written into the cache, because a write endpoint's
/// response shape is not assumed to match the cached resource's shape.
/// Subscribers that receive the stale marker re-derive fresh state
/// themselves.
pub struct Mutation<I> {
	cache: CacheStore,
	affected: Vec<String>,
	writer: Writer<I>,
	state: Mutex<MutationState>,
}

impl<I> Mutation<I> {
	/// Creates a binding that invalidates `affected` tags on success.
	pub fn new<S: Into<String>>(
		cache: &CacheStore,
		affected: impl IntoIterator<Item = S>,
		writer: impl Fn(I) -> FetchFuture + Send + Sync + 'static,
	) -> Self {
		Self {
			cache: cache.clone(),
			affected: affected.into_iter().map(Into::into).collect(),
			writer: Arc::new(writer),
			state: Mutex::new(MutationState::default()),
		}
	}

	/// Runs the write; outcome lands in [`Mutation::state`].
	pub async fn run(&self, input: I) {
		{
			let mut state = self.state.lock();
			state.updating = true;
			state.error = None;
		}
		match (self.writer)(input).await {
			Ok(_response) => {
				{
					let mut state = self.state.lock();
					state.updating = false;
					state.error = None;
				}
				stale_all(&self.cache, &self.affected);
			}
			Err(error) => {
				let mut state = self.state.lock();
				state.updating = false;
				state.error = Some(error);
			}
		}
	}

	/// Snapshot of the binding's local state.
	#[must_use]
	pub fn state(&self) -> MutationState {
		self.state.lock().clone()
	}
}

/// Fire-and-forget variant of [`Mutation`].
///
/// Exposes no pending or error state to its caller; a failed write is
/// routed to the supplied failure handler instead, and the caller's view
/// stays optimistic until the invalidation-driven refetch lands.
pub struct OptimisticMutation<I> {
	cache: CacheStore,
	affected: Vec<String>,
	writer: Writer<I>,
	on_fail: FailHandler,
}

impl<I> OptimisticMutation<I> {
	/// Creates a binding that routes failures to `on_fail`.
	pub fn new<S: Into<String>>(
		cache: &CacheStore,
		affected: impl IntoIterator<Item = S>,
		writer: impl Fn(I) -> FetchFuture + Send + Sync + 'static,
		on_fail: impl Fn(FetchError) + Send + Sync + 'static,
	) -> Self {
		Self {
			cache: cache.clone(),
			affected: affected.into_iter().map(Into::into).collect(),
			writer: Arc::new(writer),
			on_fail: Arc::new(on_fail),
		}
	}

	/// Runs the write; failures go to the failure handler.
	pub async fn run(&self, input: I) {
		match (self.writer)(input).await {
			Ok(_response) => stale_all(&self.cache, &self.affected),
			Err(error) => (self.on_fail)(error),
		}
	}
}

fn stale_all(cache: &CacheStore, tags: &[String]) {
	for tag in tags {
		debug!(tag, "invalidating after successful write");
		cache.dispatch(CacheAction::Stale { tag: tag.clone() });
	}
}
