//! Canonical UI document tree store and patch engine.
//!
//! The tree is owned by a single in-process [`TreeStore`]; every mutation
//! is funneled through [`TreeStore::apply_patch`] or
//! [`TreeStore::update_element`], and each accepted mutation bumps a
//! monotonic render version that downstream consumers use to invalidate
//! memoized output. The store is explicitly constructed at the
//! composition root and passed around by cheap-clone handle; tests build
//! and drop their own instances.

#![warn(missing_docs)]

mod patch;
mod store;

pub mod seed;

pub use store::{PatchError, TreeStore};
