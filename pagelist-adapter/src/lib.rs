//! Adapter utilities for the `pagelist` crate.
//!
//! The `pagelist` crate is I/O-free and focuses on the core state: the pagination store and the
//! windowing math. This crate provides the glue a UI adapter usually needs on top:
//!
//! - A [`Controller`] that owns a store and a view, turns scroll/resize/visibility events into
//!   at most one follow-up fetch, and debounces filter changes
//! - An async bridge ([`PageSource`], [`fetch`]) for hosts whose page source returns futures
//!
//! This crate is intentionally framework-agnostic and runtime-agnostic (no DOM or executor
//! bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod options;
mod source;

#[cfg(test)]
mod tests;

pub use controller::{Controller, PrefetchTrigger};
pub use options::{ControllerOptions, DEFAULT_REFRESH_DEBOUNCE_MS};
pub use source::{Fetched, PageSource, fetch};
