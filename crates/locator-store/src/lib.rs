//! Persisted mapping from logical element names to their last-known-good
//! locator strategy.
//!
//! The store is loaded once per session and flushed synchronously on every
//! update. Writes go through a temp file and an atomic rename so readers in
//! other processes never see a torn document.

pub mod api;
pub mod errors;
pub mod fs;
pub mod model;

pub use api::LocatorStore;
pub use errors::StoreError;
pub use model::StoredLocator;
