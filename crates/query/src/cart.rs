//! Cart resource binding.
//!
//! One tag, one read endpoint, two write endpoints. Writers invalidate
//! the tag; every mounted reader re-derives its state, so a quantity
//! badge anywhere in the page reflects an add-to-cart from anywhere else.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::Backend;
use crate::error::FetchError;
use crate::mutation::Mutation;
use crate::query::{FetchFuture, Query};
use crate::select::Select;

/// Cache tag naming the cart resource.
pub const CART_TAG: &str = "cart";

const CART_PATH: &str = "/cart";

/// One cart line as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
	/// Product identifier.
	pub id: String,
	/// Display name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	/// Unit price.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub price: Option<f64>,
	/// Units of this product in the cart.
	#[serde(default = "default_quantity")]
	pub quantity: u32,
}

fn default_quantity() -> u32 {
	1
}

/// Bindings for reading and mutating the cart.
pub struct Cart {
	cache: vstore_cache::CacheStore,
	backend: Arc<dyn Backend>,
}

impl Cart {
	/// Creates cart bindings over a shared cache and transport.
	pub fn new(cache: &vstore_cache::CacheStore, backend: Arc<dyn Backend>) -> Self {
		Self {
			cache: cache.clone(),
			backend,
		}
	}

	/// Read-through reader for the full cart contents.
	#[must_use]
	pub fn items(&self) -> Query<Vec<CartLine>> {
		let backend = Arc::clone(&self.backend);
		Query::new(&self.cache, CART_TAG, move || {
			let backend = Arc::clone(&backend);
			Box::pin(async move { backend.get(CART_PATH).await }) as FetchFuture
		})
	}

	/// Write binding that adds a product to the cart.
	#[must_use]
	pub fn add(&self) -> Mutation<CartLine> {
		let backend = Arc::clone(&self.backend);
		Mutation::new(&self.cache, [CART_TAG], move |line: CartLine| {
			let backend = Arc::clone(&backend);
			Box::pin(async move {
				let body = serde_json::to_value(&line)
					.map_err(|e| FetchError::Decode(e.to_string()))?;
				backend.post(CART_PATH, body).await
			}) as FetchFuture
		})
	}

	/// Write binding that removes a product by id.
	#[must_use]
	pub fn remove(&self) -> Mutation<String> {
		let backend = Arc::clone(&self.backend);
		Mutation::new(&self.cache, [CART_TAG], move |product_id: String| {
			let backend = Arc::clone(&backend);
			Box::pin(async move { backend.delete(&format!("{CART_PATH}/{product_id}")).await })
				as FetchFuture
		})
	}

	/// Passive item-count reader for the navigation badge.
	#[must_use]
	pub fn badge(&self) -> Select<usize> {
		Select::new(&self.cache, CART_TAG, |value: &Value| {
			value.as_array().map_or(0, Vec::len)
		})
	}
}
