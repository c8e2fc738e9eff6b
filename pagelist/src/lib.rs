//! A headless cursor-pagination store and windowed list engine.
//!
//! For adapter-level utilities (controller, debounced refresh, async fetch bridge), see the
//! `pagelist-adapter` crate.
//!
//! This crate focuses on the two pieces of state an infinite-scroll list needs:
//! - [`PagerStore`]: a deduplicated, page-by-page growing collection fed from an opaque
//!   cursor-paginated source, with generation-tagged fetches so superseded responses are dropped.
//! - [`ListView`] and the [`window`] functions: the fixed-row-height visible window, overscan,
//!   and the prefetch signals (scroll threshold and end-of-content sentinel).
//!
//! It performs no I/O and holds no UI objects. A host adapter is expected to provide:
//! - scroll offset and container height
//! - a way to run a [`PageRequest`] and hand the result back via [`PagerStore::complete`]
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
mod key;
mod options;
mod state;
mod store;
mod types;
mod view;
pub mod window;


pub use error::{FetchError, ListError};
pub use key::ItemId;
pub use options::{DEFAULT_PAGE_SIZE, ListViewOptions, MAX_PAGE_SIZE, PagerOptions};
pub use state::{ListStatus, ScrollMetrics, ViewState};
pub use store::PagerStore;
pub use types::{
    Applied, Cursor, Direction, FetchKind, FetchState, FetchTicket, Filters, Item, Page,
    PageRequest, VirtualRow, VisibleWindow,
};
pub use view::{Indicator, ListView, RenderPlan};
