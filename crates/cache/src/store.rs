//! The cache store: entry map, pure reducer, subscriber registry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::debug;

/// Observable state of one cached tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
	/// Never fetched.
	Absent,
	/// Invalidated by a mutation; must be re-derived.
	Stale,
	/// Present value from the last successful fetch.
	Present(Arc<Value>),
}

impl Entry {
	/// The value, when present.
	#[must_use]
	pub fn value(&self) -> Option<&Arc<Value>> {
		match self {
			Self::Present(v) => Some(v),
			Self::Absent | Self::Stale => None,
		}
	}
}

/// A state transition request for one tag.
#[derive(Debug, Clone)]
pub enum CacheAction {
	/// Store a freshly fetched value and fan it out to subscribers.
	Update {
		/// The resource tag.
		tag: String,
		/// The new value.
		value: Value,
	},
	/// Mark the tag stale. A no-op on a never-fetched tag.
	Stale {
		/// The resource tag.
		tag: String,
	},
}

impl CacheAction {
	fn tag(&self) -> &str {
		match self {
			Self::Update { tag, .. } | Self::Stale { tag } => tag,
		}
	}
}

type Entries = FxHashMap<String, Option<Arc<Value>>>;

/// What a reduction did to the entry map, and what subscribers should hear.
enum Reduction {
	/// Entry now holds a fresh value; notify with it.
	Updated(Arc<Value>),
	/// Entry was invalidated; notify with the stale marker.
	Staled,
	/// Nothing changed; nobody is notified.
	Untouched,
}

/// Pure state transition over the entry map.
///
/// Present entries hold `Some(value)`, stale entries hold `None`; a tag
/// with no map entry has never been fetched.
fn reduce(entries: &mut Entries, action: CacheAction) -> Reduction {
	match action {
		CacheAction::Update { tag, value } => {
			let value = Arc::new(value);
			entries.insert(tag, Some(Arc::clone(&value)));
			Reduction::Updated(value)
		}
		CacheAction::Stale { tag } => {
			if let Some(entry) = entries.get_mut(&tag) {
				*entry = None;
				Reduction::Staled
			} else {
				Reduction::Untouched
			}
		}
	}
}

type Subscriber = Arc<dyn Fn(Option<&Value>) + Send + Sync>;

struct CacheInner {
	entries: Mutex<Entries>,
	/// Per-tag subscriber lists; insertion order is notification order.
	subscribers: Mutex<FxHashMap<String, IndexMap<u64, Subscriber>>>,
	next_id: AtomicU64,
}

/// Shared, tag-indexed cache store.
///
/// Explicitly constructed at the composition root and passed by handle;
/// cloning is cheap and all clones observe the same state.
#[derive(Clone)]
pub struct CacheStore {
	inner: Arc<CacheInner>,
}

impl Default for CacheStore {
	fn default() -> Self {
		Self::new()
	}
}

impl CacheStore {
	/// Creates an empty store.
	#[must_use]
	pub fn new() -> Self {
		Self {
			inner: Arc::new(CacheInner {
				entries: Mutex::new(Entries::default()),
				subscribers: Mutex::new(FxHashMap::default()),
				next_id: AtomicU64::new(0),
			}),
		}
	}

	/// Applies an action through the reducer, then synchronously notifies
	/// every subscriber of the action's tag with the resulting value
	/// (`Some` for an update, `None` for a stale marker).
	///
	/// Callbacks run outside the entry lock, so a subscriber may dispatch
	/// again from within its notification.
	pub fn dispatch(&self, action: CacheAction) {
		let tag = action.tag().to_owned();
		let reduction = {
			let mut entries = self.inner.entries.lock();
			reduce(&mut entries, action)
		};
		match reduction {
			Reduction::Updated(value) => self.notify(&tag, Some(&value)),
			Reduction::Staled => self.notify(&tag, None),
			Reduction::Untouched => debug!(tag, "stale on never-fetched tag ignored"),
		}
	}

	fn notify(&self, tag: &str, payload: Option<&Value>) {
		let subscribers: Vec<Subscriber> = {
			let registry = self.inner.subscribers.lock();
			match registry.get(tag) {
				Some(list) => list.values().cloned().collect(),
				None => return,
			}
		};
		debug!(tag, count = subscribers.len(), stale = payload.is_none(), "notifying subscribers");
		for subscriber in subscribers {
			subscriber(payload);
		}
	}

	/// Registers a callback for a tag.
	///
	/// The returned guard deregisters on drop and garbage-collects the
	/// tag's subscriber set once it is empty.
	pub fn subscribe(
		&self,
		tag: &str,
		callback: impl Fn(Option<&Value>) + Send + Sync + 'static,
	) -> Subscription {
		let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
		let mut registry = self.inner.subscribers.lock();
		registry
			.entry(tag.to_owned())
			.or_default()
			.insert(id, Arc::new(callback));
		Subscription {
			inner: Arc::downgrade(&self.inner),
			tag: tag.to_owned(),
			id,
		}
	}

	/// Synchronous read of a tag's state; no side effects.
	#[must_use]
	pub fn get(&self, tag: &str) -> Entry {
		match self.inner.entries.lock().get(tag) {
			Some(Some(value)) => Entry::Present(Arc::clone(value)),
			Some(None) => Entry::Stale,
			None => Entry::Absent,
		}
	}
}

/// RAII registration of one cache subscriber.
pub struct Subscription {
	inner: Weak<CacheInner>,
	tag: String,
	id: u64,
}

impl Drop for Subscription {
	fn drop(&mut self) {
		let Some(inner) = self.inner.upgrade() else {
			return;
		};
		let mut registry = inner.subscribers.lock();
		if let Some(list) = registry.get_mut(&self.tag) {
			list.shift_remove(&self.id);
			if list.is_empty() {
				registry.remove(&self.tag);
			}
		}
	}
}
