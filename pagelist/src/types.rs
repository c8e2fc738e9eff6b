use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::ItemId;

/// A record with a stable identity.
///
/// The store never looks at anything but [`Item::id`]; ordering is whatever the server returns.
pub trait Item {
    type Id: ItemId;

    fn id(&self) -> &Self::Id;
}

/// An opaque continuation token returned by the server alongside a page.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&str> for Cursor {
    fn from(token: &str) -> Self {
        Self(token.into())
    }
}

impl From<String> for Cursor {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Direction {
    /// Items after the cursor (the store only ever pages forward).
    #[default]
    Next,
    /// Items before the cursor.
    Prev,
}

/// Filter parameters forwarded verbatim to the page source.
///
/// Keys are kept sorted so two filter sets compare equal regardless of insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Filters(BTreeMap<String, String>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Parameters of a single page fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRequest {
    pub limit: u32,
    pub cursor: Option<Cursor>,
    pub direction: Direction,
    pub filters: Filters,
}

/// One page of results.
///
/// With `feature = "serde"`, this deserializes from the cursor-list response shape
/// `{ "data": [...], "has_more": bool, "next_cursor": .., "prev_cursor": .., "total": .. }`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Page<T> {
    #[cfg_attr(feature = "serde", serde(rename = "data", default = "Vec::new"))]
    pub items: Vec<T>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub has_more: bool,
    pub next_cursor: Option<Cursor>,
    pub prev_cursor: Option<Cursor>,
    pub total: Option<u64>,
}

impl<T> Page<T> {
    /// A page with more data behind `next_cursor`.
    pub fn more(items: Vec<T>, next_cursor: impl Into<Cursor>) -> Self {
        Self {
            items,
            has_more: true,
            next_cursor: Some(next_cursor.into()),
            prev_cursor: None,
            total: None,
        }
    }

    /// The final page.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            has_more: false,
            next_cursor: None,
            prev_cursor: None,
            total: None,
        }
    }

    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    pub fn with_prev_cursor(mut self, prev_cursor: impl Into<Cursor>) -> Self {
        self.prev_cursor = Some(prev_cursor.into());
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    LoadingMore,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FetchKind {
    /// First page after a (re)load.
    Initial,
    /// A follow-up page fetched with the held cursor.
    More,
}

/// A handle for one issued fetch.
///
/// The host runs [`FetchTicket::request`] against its source and hands the ticket back with the
/// result. Only the ticket whose generation is still live gets applied.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FetchTicket {
    pub(crate) generation: u64,
    pub(crate) kind: FetchKind,
    pub(crate) request: PageRequest,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn kind(&self) -> FetchKind {
        self.kind
    }

    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    pub fn into_request(self) -> PageRequest {
        self.request
    }
}

/// Outcome of a successfully applied page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Applied {
    /// Items added to the collection.
    pub appended: usize,
    /// Items dropped because their id was already present.
    pub duplicates: usize,
}

/// The index range of rows to mount, plus its geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleWindow {
    pub start_index: usize,
    pub end_index: usize, // exclusive
    /// Distance from the top of the content to the first mounted row.
    pub offset: u64,
    /// Height of the full-content spacer (`item_count * row_height`).
    pub total_height: u64,
}

impl VisibleWindow {
    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn range(&self) -> core::ops::Range<usize> {
        self.start_index..self.end_index
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualRow {
    pub index: usize,
    /// Offset from the top of the content.
    pub top: u64,
    pub height: u32,
}

impl VirtualRow {
    pub fn bottom(&self) -> u64 {
        self.top.saturating_add(self.height as u64)
    }
}
