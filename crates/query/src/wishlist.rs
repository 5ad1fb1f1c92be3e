//! Wishlist resource binding.
//!
//! Same shape as the cart, but writes are optimistic: toggling a heart
//! icon should never block on a spinner, so failures are routed to a
//! caller-supplied handler while the cache invalidation brings every
//! reader back in sync.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::backend::Backend;
use crate::error::FetchError;
use crate::mutation::OptimisticMutation;
use crate::query::{FetchFuture, Query};
use crate::select::Select;

/// Cache tag naming the wishlist resource.
pub const WISHLIST_TAG: &str = "wishlist";

const WISHLIST_PATH: &str = "/wishlist";

/// One saved product as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishItem {
	/// Product identifier.
	pub id: String,
	/// Display name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
}

/// Bindings for reading and mutating the wishlist.
pub struct WishList {
	cache: vstore_cache::CacheStore,
	backend: Arc<dyn Backend>,
}

impl WishList {
	/// Creates wishlist bindings over a shared cache and transport.
	pub fn new(cache: &vstore_cache::CacheStore, backend: Arc<dyn Backend>) -> Self {
		Self {
			cache: cache.clone(),
			backend,
		}
	}

	/// Read-through reader for the saved products.
	#[must_use]
	pub fn items(&self) -> Query<Vec<WishItem>> {
		let backend = Arc::clone(&self.backend);
		Query::new(&self.cache, WISHLIST_TAG, move || {
			let backend = Arc::clone(&backend);
			Box::pin(async move { backend.get(WISHLIST_PATH).await }) as FetchFuture
		})
	}

	/// Optimistic write that saves a product by id.
	#[must_use]
	pub fn add(
		&self,
		on_fail: impl Fn(FetchError) + Send + Sync + 'static,
	) -> OptimisticMutation<String> {
		let backend = Arc::clone(&self.backend);
		OptimisticMutation::new(
			&self.cache,
			[WISHLIST_TAG],
			move |product_id: String| {
				let backend = Arc::clone(&backend);
				Box::pin(async move { backend.post(WISHLIST_PATH, json!({"id": product_id})).await })
					as FetchFuture
			},
			on_fail,
		)
	}

	/// Optimistic write that removes a product by id.
	#[must_use]
	pub fn remove(
		&self,
		on_fail: impl Fn(FetchError) + Send + Sync + 'static,
	) -> OptimisticMutation<String> {
		let backend = Arc::clone(&self.backend);
		OptimisticMutation::new(
			&self.cache,
			[WISHLIST_TAG],
			move |product_id: String| {
				let backend = Arc::clone(&backend);
				Box::pin(async move {
					backend.delete(&format!("{WISHLIST_PATH}/{product_id}")).await
				}) as FetchFuture
			},
			on_fail,
		)
	}

	/// Passive item-count reader for the navigation badge.
	#[must_use]
	pub fn badge(&self) -> Select<usize> {
		Select::new(&self.cache, WISHLIST_TAG, |value: &Value| {
			value.as_array().map_or(0, Vec::len)
		})
	}
}
