use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use vstore_cache::{CacheStore, Subscription};

/// Selector-only read binding.
///
/// Passive readers (a badge count, a summary line) subscribe like normal
/// readers but *ignore* stale notifications, retaining the last known
/// value until the next present value arrives. That keeps them from
/// flickering to empty while a primary reader is mid-refetch.
pub struct Select<T> {
	inner: Arc<SelectInner<T>>,
	_subscription: Subscription,
}

struct SelectInner<T> {
	selector: Box<dyn Fn(&Value) -> T + Send + Sync>,
	retained: Mutex<Option<Arc<Value>>>,
}

impl<T: 'static> Select<T> {
	/// Subscribes to `tag`, seeding from the cache when a value is
	/// already present.
	pub fn new(
		cache: &CacheStore,
		tag: &str,
		selector: impl Fn(&Value) -> T + Send + Sync + 'static,
	) -> Self {
		let inner = Arc::new(SelectInner {
			selector: Box::new(selector),
			retained: Mutex::new(None),
		});

		let weak = Arc::downgrade(&inner);
		let subscription = cache.subscribe(tag, move |payload| {
			let Some(inner) = weak.upgrade() else {
				return;
			};
			// A stale marker is ignored on purpose: keep showing the last
			// value until fresh data fans out.
			if let Some(value) = payload {
				*inner.retained.lock() = Some(Arc::new(value.clone()));
			}
		});

		if let Some(value) = cache.get(tag).value() {
			*inner.retained.lock() = Some(Arc::clone(value));
		}

		Self {
			inner,
			_subscription: subscription,
		}
	}

	/// Applies the selector to the retained value.
	#[must_use]
	pub fn get(&self) -> Option<T> {
		let retained = self.inner.retained.lock();
		retained.as_ref().map(|value| (self.inner.selector)(value))
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;
	use vstore_cache::CacheAction;

	use super::*;

	fn count(value: &Value) -> usize {
		value.as_array().map_or(0, Vec::len)
	}

	#[test]
	fn retains_its_value_through_stale_notifications() {
		let cache = CacheStore::new();
		let badge = Select::new(&cache, "cart", count);

		cache.dispatch(CacheAction::Update {
			tag: "cart".into(),
			value: json!(["a", "b"]),
		});
		assert_eq!(badge.get(), Some(2));

		cache.dispatch(CacheAction::Stale { tag: "cart".into() });
		// Still the last known count, not None and not zero.
		assert_eq!(badge.get(), Some(2));

		cache.dispatch(CacheAction::Update {
			tag: "cart".into(),
			value: json!(["a", "b", "c"]),
		});
		assert_eq!(badge.get(), Some(3));
	}

	#[test]
	fn seeds_from_an_already_present_value() {
		let cache = CacheStore::new();
		cache.dispatch(CacheAction::Update {
			tag: "cart".into(),
			value: json!(["a"]),
		});
		let badge = Select::new(&cache, "cart", count);
		assert_eq!(badge.get(), Some(1));
	}

	#[test]
	fn empty_until_a_value_exists() {
		let cache = CacheStore::new();
		let badge = Select::new(&cache, "cart", count);
		assert_eq!(badge.get(), None);
	}
}
