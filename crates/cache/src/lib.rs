//! Tag-indexed reactive cache kernel.
//!
//! A small store shared by every data-bound reader and writer. Each tag
//! names one logical resource; writers invalidate by dispatching a stale
//! marker rather than pushing new values, and readers re-derive fresh
//! state on their own. Subscribers of a tag are notified synchronously,
//! in registration order, within the dispatching call.

#![warn(missing_docs)]

mod store;

pub use store::{CacheAction, CacheStore, Entry, Subscription};
