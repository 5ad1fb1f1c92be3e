use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::runtime::Handle;
use tracing::debug;
use vstore_cache::{CacheAction, CacheStore, Entry, Subscription};

use crate::error::FetchError;

/// Boxed future produced by a fetcher invocation.
pub type FetchFuture = Pin<Box<dyn Future<Output = Result<Value, FetchError>> + Send>>;

type Fetcher = Arc<dyn Fn() -> FetchFuture + Send + Sync>;

/// Local, transient state of one read-through binding.
#[derive(Debug, Clone)]
pub struct QueryState<T> {
	/// A fetch is in flight.
	pub loading: bool,
	/// The last fetch failed; cleared on the next attempt.
	pub error: Option<FetchError>,
	/// The last adopted value.
	pub data: Option<T>,
}

impl<T> Default for QueryState<T> {
	fn default() -> Self {
		Self {
			loading: false,
			error: None,
			data: None,
		}
	}
}

/// Read-through fetch binding for one tag.
///
/// [`Query::fetch`] adopts a present cache value synchronously without a
/// network call; otherwise it runs the fetcher and, on success, fans the
/// value out through the cache to every subscriber of the tag. A stale
/// notification triggers an automatic re-fetch on the runtime the query
/// was created on.
///
/// There is no built-in fetch cancellation: dropping the query sets a
/// liveness flag that is checked before any asynchronous result is
/// applied, so late completions of an abandoned binding are discarded.
pub struct Query<T> {
	inner: Arc<QueryInner<T>>,
	_subscription: Subscription,
}

struct QueryInner<T> {
	tag: String,
	cache: CacheStore,
	fetcher: Fetcher,
	runtime: Handle,
	state: Mutex<QueryState<T>>,
	alive: AtomicBool,
}

impl<T> Query<T>
where
	T: DeserializeOwned + Clone + Send + 'static,
{
	/// Creates a binding and subscribes it to `tag`.
	///
	/// Must be called within a Tokio runtime; stale-triggered re-fetches
	/// are spawned onto it.
	pub fn new(
		cache: &CacheStore,
		tag: impl Into<String>,
		fetcher: impl Fn() -> FetchFuture + Send + Sync + 'static,
	) -> Self {
		let tag = tag.into();
		let inner = Arc::new(QueryInner {
			tag: tag.clone(),
			cache: cache.clone(),
			fetcher: Arc::new(fetcher),
			runtime: Handle::current(),
			state: Mutex::new(QueryState::default()),
			alive: AtomicBool::new(true),
		});

		let weak = Arc::downgrade(&inner);
		let subscription = cache.subscribe(&tag, move |payload| {
			let Some(inner) = weak.upgrade() else {
				return;
			};
			if !inner.alive.load(Ordering::Acquire) {
				return;
			}
			match payload {
				// Another binding fetched this tag; adopt its value.
				Some(value) => inner.adopt(value),
				// Invalidated: re-derive fresh state ourselves.
				None => {
					debug!(tag = %inner.tag, "stale notification; re-fetching");
					let inner = Arc::clone(&inner);
					inner.runtime.clone().spawn(async move {
						QueryInner::run_fetch(inner).await;
					});
				}
			}
		});

		Self {
			inner,
			_subscription: subscription,
		}
	}

	/// Read-through fetch: adopt a present cache value, or retrieve and
	/// publish a fresh one.
	pub async fn fetch(&self) {
		QueryInner::run_fetch(Arc::clone(&self.inner)).await;
	}

	/// Snapshot of the binding's local state.
	#[must_use]
	pub fn state(&self) -> QueryState<T> {
		self.inner.state.lock().clone()
	}
}

impl<T> Drop for Query<T> {
	fn drop(&mut self) {
		self.inner.alive.store(false, Ordering::Release);
	}
}

impl<T> QueryInner<T>
where
	T: DeserializeOwned + Clone + Send + 'static,
{
	/// Applies a fanned-out cache value to local state.
	fn adopt(&self, value: &Value) {
		let mut state = self.state.lock();
		match serde_json::from_value::<T>(value.clone()) {
			Ok(data) => {
				state.loading = false;
				state.error = None;
				state.data = Some(data);
			}
			Err(e) => {
				state.loading = false;
				state.error = Some(FetchError::Decode(e.to_string()));
				state.data = None;
			}
		}
	}

	async fn run_fetch(inner: Arc<Self>) {
		if let Entry::Present(value) = inner.cache.get(&inner.tag) {
			// Cache hit: no network call.
			inner.adopt(&value);
			return;
		}

		{
			let mut state = inner.state.lock();
			state.loading = true;
			state.error = None;
			state.data = None;
		}

		let result = (inner.fetcher)().await;
		// Unmount guard: the binding may have been dropped mid-flight.
		if !inner.alive.load(Ordering::Acquire) {
			return;
		}
		match result {
			Ok(value) => {
				inner.adopt(&value);
				// Publishing also notifies our own subscriber; adopt is
				// idempotent for the same value.
				inner.cache.dispatch(CacheAction::Update {
					tag: inner.tag.clone(),
					value,
				});
			}
			Err(error) => {
				// Local only; the shared cache never holds errors.
				let mut state = inner.state.lock();
				state.loading = false;
				state.error = Some(error);
				state.data = None;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::AtomicUsize;

	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;

	fn counted_fetcher(
		value: Value,
	) -> (impl Fn() -> FetchFuture + Send + Sync + 'static, Arc<AtomicUsize>) {
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&calls);
		let fetcher = move || {
			counter.fetch_add(1, Ordering::SeqCst);
			let value = value.clone();
			Box::pin(async move { Ok(value) }) as FetchFuture
		};
		(fetcher, calls)
	}

	async fn settle<F: Fn() -> bool>(done: F) {
		for _ in 0..100 {
			if done() {
				return;
			}
			tokio::task::yield_now().await;
		}
		panic!("condition did not settle");
	}

	#[tokio::test]
	async fn present_cache_value_short_circuits_the_fetch() {
		let cache = CacheStore::new();
		cache.dispatch(CacheAction::Update {
			tag: "cart".into(),
			value: json!(["cached"]),
		});

		let (fetcher, calls) = counted_fetcher(json!(["fresh"]));
		let query: Query<Vec<String>> = Query::new(&cache, "cart", fetcher);
		query.fetch().await;

		assert_eq!(calls.load(Ordering::SeqCst), 0);
		assert_eq!(query.state().data, Some(vec!["cached".to_owned()]));
	}

	#[tokio::test]
	async fn successful_fetch_fans_out_to_peer_bindings() {
		let cache = CacheStore::new();
		let (fetcher_a, _) = counted_fetcher(json!(["fresh"]));
		let (fetcher_b, calls_b) = counted_fetcher(json!(["never"]));

		let first: Query<Vec<String>> = Query::new(&cache, "cart", fetcher_a);
		let second: Query<Vec<String>> = Query::new(&cache, "cart", fetcher_b);

		first.fetch().await;

		assert_eq!(second.state().data, Some(vec!["fresh".to_owned()]));
		assert_eq!(calls_b.load(Ordering::SeqCst), 0);
		assert!(matches!(cache.get("cart"), Entry::Present(_)));
	}

	#[tokio::test]
	async fn fetch_failure_stays_local() {
		let cache = CacheStore::new();
		let failing = || Box::pin(async { Err(FetchError::Backend("503".into())) }) as FetchFuture;
		let query: Query<Vec<String>> = Query::new(&cache, "cart", failing);

		query.fetch().await;

		let state = query.state();
		assert_eq!(state.error, Some(FetchError::Backend("503".into())));
		assert!(!state.loading);
		assert_eq!(cache.get("cart"), Entry::Absent);
	}

	#[tokio::test]
	async fn stale_notification_triggers_an_automatic_refetch() {
		let cache = CacheStore::new();
		let (fetcher, calls) = counted_fetcher(json!([1, 2]));
		let query: Query<Vec<u32>> = Query::new(&cache, "cart", fetcher);

		query.fetch().await;
		assert_eq!(calls.load(Ordering::SeqCst), 1);

		cache.dispatch(CacheAction::Stale { tag: "cart".into() });
		settle(|| calls.load(Ordering::SeqCst) == 2).await;
		settle(|| matches!(cache.get("cart"), Entry::Present(_))).await;
		assert_eq!(query.state().data, Some(vec![1, 2]));
	}

	#[tokio::test]
	async fn dropped_binding_neither_refetches_nor_applies_results() {
		let cache = CacheStore::new();
		cache.dispatch(CacheAction::Update {
			tag: "cart".into(),
			value: json!(1),
		});
		let (fetcher, calls) = counted_fetcher(json!(2));
		let query: Query<u32> = Query::new(&cache, "cart", fetcher);
		drop(query);

		cache.dispatch(CacheAction::Stale { tag: "cart".into() });
		for _ in 0..20 {
			tokio::task::yield_now().await;
		}
		assert_eq!(calls.load(Ordering::SeqCst), 0);
	}
}
