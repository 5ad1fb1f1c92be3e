//! Data-bound read/write bindings for named remote resources.
//!
//! Everything here is built only on the [`vstore_cache`] kernel and an
//! async transport boundary: read-through fetches adopt cached values
//! before touching the network, writers invalidate affected tags instead
//! of pushing response values, and passive readers retain their last
//! value through invalidations to avoid flicker. Fetch and mutation
//! failures stay local to the calling binding; the shared cache never
//! stores an error state.

mod backend;
mod error;
mod mutation;
mod query;
mod select;

pub mod cart;
pub mod wishlist;

pub use backend::Backend;
pub use error::FetchError;
pub use mutation::{Mutation, MutationState, OptimisticMutation};
pub use query::{FetchFuture, Query, QueryState};
pub use select::Select;
