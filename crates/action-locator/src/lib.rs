//! Self-healing element locator
//!
//! This crate implements multi-strategy element resolution with:
//! - Cache-first lookup of the last strategy that worked for an element name
//! - Ordered fallback through caller-supplied candidates
//! - Heuristic alternative locators generated from each candidate
//! - Store healing when a different strategy succeeds
//! - Per-attempt timeouts and an aggregate deadline per resolution

pub mod alternatives;
pub mod config;
pub mod errors;
pub mod healer;
pub mod policy;
pub mod ports;
pub mod precheck;
pub mod resolver;
pub mod types;

// lets `test_support` name this crate the same way integration tests do
#[cfg(test)]
extern crate self as action_locator;

#[cfg(test)]
mod test_support;

pub use alternatives::*;
pub use config::*;
pub use errors::*;
pub use healer::*;
pub use policy::*;
pub use ports::*;
pub use resolver::*;
pub use types::*;

pub use locator_core_types::{ElementName, LocatorKind, LocatorStrategy, LocatorTypeError};
pub use locator_store::LocatorStore;
