//! End-to-end resource flows over an in-memory backend: writes invalidate,
//! readers re-derive, passive badges never flicker to empty.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};
use vstore_cache::{CacheStore, Entry};
use vstore_query::cart::{Cart, CartLine};
use vstore_query::wishlist::WishList;
use vstore_query::{Backend, FetchError};

#[derive(Default)]
struct MemoryBackend {
	cart: Mutex<Vec<CartLine>>,
	wishlist_down: AtomicBool,
}

#[async_trait]
impl Backend for MemoryBackend {
	async fn get(&self, path: &str) -> Result<Value, FetchError> {
		match path {
			"/cart" => Ok(serde_json::to_value(&*self.cart.lock().unwrap()).unwrap()),
			"/wishlist" => Ok(json!([{"id": "p7"}])),
			_ => Err(FetchError::Backend(format!("404 {path}"))),
		}
	}

	async fn post(&self, path: &str, body: Value) -> Result<Value, FetchError> {
		match path {
			"/cart" => {
				let line: CartLine = serde_json::from_value(body).unwrap();
				self.cart.lock().unwrap().push(line);
				Ok(json!({"ok": true}))
			}
			"/wishlist" if self.wishlist_down.load(Ordering::SeqCst) => {
				Err(FetchError::Backend("503".into()))
			}
			"/wishlist" => Ok(json!({"ok": true})),
			_ => Err(FetchError::Backend(format!("404 {path}"))),
		}
	}

	async fn delete(&self, path: &str) -> Result<Value, FetchError> {
		if let Some(id) = path.strip_prefix("/cart/") {
			self.cart.lock().unwrap().retain(|line| line.id != id);
			return Ok(json!({"ok": true}));
		}
		Err(FetchError::Backend(format!("404 {path}")))
	}
}

async fn settle<F: Fn() -> bool>(done: F) {
	for _ in 0..200 {
		if done() {
			return;
		}
		tokio::task::yield_now().await;
	}
	panic!("condition did not settle");
}

#[tokio::test]
async fn add_to_cart_refreshes_every_reader() {
	let cache = CacheStore::new();
	let backend = Arc::new(MemoryBackend::default());
	let cart = Cart::new(&cache, backend);

	let items = cart.items();
	let badge = cart.badge();

	items.fetch().await;
	assert_eq!(badge.get(), Some(0));

	let add = cart.add();
	add.run(CartLine {
		id: "p1".into(),
		title: Some("Linen shirt".into()),
		price: Some(69.99),
		quantity: 1,
	})
	.await;

	// The write marked the tag stale; the reader re-fetches on its own
	// and the fresh value fans out to the badge.
	settle(|| badge.get() == Some(1)).await;
	settle(|| items.state().data.as_ref().is_some_and(|d| d.len() == 1)).await;
	assert!(!add.state().updating);
}

#[tokio::test]
async fn remove_from_cart_converges_the_same_way() {
	let cache = CacheStore::new();
	let backend = Arc::new(MemoryBackend::default());
	backend.cart.lock().unwrap().push(CartLine {
		id: "p1".into(),
		title: None,
		price: None,
		quantity: 1,
	});
	let cart = Cart::new(&cache, backend);

	let items = cart.items();
	items.fetch().await;
	assert_eq!(items.state().data.as_ref().map(Vec::len), Some(1));

	cart.remove().run("p1".into()).await;
	settle(|| items.state().data.as_ref().is_some_and(Vec::is_empty)).await;
}

#[tokio::test]
async fn optimistic_wishlist_failure_leaves_readers_untouched() {
	let cache = CacheStore::new();
	let backend = Arc::new(MemoryBackend::default());
	let wishlist = WishList::new(&cache, Arc::clone(&backend) as Arc<dyn Backend>);

	let items = wishlist.items();
	items.fetch().await;
	assert_eq!(items.state().data.as_ref().map(Vec::len), Some(1));

	backend.wishlist_down.store(true, Ordering::SeqCst);
	let failures = Arc::new(AtomicUsize::new(0));
	let seen = Arc::clone(&failures);
	let add = wishlist.add(move |_| {
		seen.fetch_add(1, Ordering::SeqCst);
	});
	add.run("p9".into()).await;

	assert_eq!(failures.load(Ordering::SeqCst), 1);
	// No invalidation happened, so the cached value is still present.
	assert!(matches!(cache.get("wishlist"), Entry::Present(_)));
	assert_eq!(items.state().data.as_ref().map(Vec::len), Some(1));
}
