use alloc::vec::Vec;
use core::fmt;

use crate::key::IdSet;
use crate::{
    Applied, Cursor, Direction, FetchError, FetchKind, FetchState, FetchTicket, Filters, Item,
    ListError, ListStatus, Page, PageRequest, PagerOptions,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct InFlight {
    generation: u64,
    kind: FetchKind,
}

/// A deduplicated collection that grows page by page from a cursor-paginated source.
///
/// The store is sans-IO: operations that need the network return a [`FetchTicket`], the host
/// runs `ticket.request()` against its source, then hands the result back through
/// [`PagerStore::complete`]. Every ticket carries a generation; only the live one is applied,
/// so a response that arrives after a newer [`PagerStore::load_initial`] is dropped no matter
/// when the network delivers it.
///
/// Invariants:
/// - no two items share an id
/// - at most one fetch is live at a time
/// - a failed fetch never leaves a partially merged page behind
#[derive(Clone)]
pub struct PagerStore<T: Item> {
    options: PagerOptions,
    items: Vec<T>,
    ids: IdSet<T::Id>,
    cursor: Option<Cursor>,
    has_more: bool,
    total: u64,
    state: FetchState,
    error: Option<FetchError>,
    failed: Option<FetchKind>,
    filters: Filters,
    generation: u64,
    in_flight: Option<InFlight>,
}

impl<T: Item> PagerStore<T> {
    pub fn new(options: PagerOptions) -> Self {
        Self {
            options,
            items: Vec::new(),
            ids: IdSet::new(),
            cursor: None,
            has_more: true,
            total: 0,
            state: FetchState::Idle,
            error: None,
            failed: None,
            filters: Filters::default(),
            generation: 0,
            in_flight: None,
        }
    }

    pub fn options(&self) -> &PagerOptions {
        &self.options
    }

    /// Replaces the options. Takes effect on the next issued request.
    pub fn set_options(&mut self, options: PagerOptions) {
        self.options = options;
    }

    /// Starts over with `filters`: cancels any in-flight fetch, clears the collection and cursor,
    /// and issues a request for the first page.
    pub fn load_initial(&mut self, filters: Filters) -> FetchTicket {
        if self.in_flight.is_some() {
            pdebug!(
                generation = self.generation,
                "load_initial: superseding in-flight fetch"
            );
        }
        self.in_flight = None;
        self.clear_items();
        self.cursor = None;
        self.has_more = true;
        self.total = 0;
        self.error = None;
        self.failed = None;
        self.filters = filters;
        self.state = FetchState::Loading;

        let request = PageRequest {
            limit: self.options.limit(),
            cursor: None,
            direction: Direction::Next,
            filters: self.filters.clone(),
        };
        self.issue(FetchKind::Initial, request)
    }

    /// [`PagerStore::load_initial`] with the filters currently held.
    pub fn reload(&mut self) -> FetchTicket {
        let filters = self.filters.clone();
        self.load_initial(filters)
    }

    /// Requests the page after the held cursor.
    ///
    /// Returns `None` (and changes nothing) while a fetch is in flight, once the server reported
    /// `has_more = false`, or when no cursor is held. Calling this after a failed `load_more`
    /// clears the error and retries with the same cursor.
    pub fn load_more(&mut self) -> Option<FetchTicket> {
        if self.in_flight.is_some() {
            ptrace!(
                generation = self.generation,
                "load_more: fetch already in flight"
            );
            return None;
        }
        if !self.has_more {
            return None;
        }
        let cursor = self.cursor.clone()?;

        self.error = None;
        self.failed = None;
        self.state = FetchState::LoadingMore;
        let request = PageRequest {
            limit: self.options.limit(),
            cursor: Some(cursor),
            direction: Direction::Next,
            filters: self.filters.clone(),
        };
        Some(self.issue(FetchKind::More, request))
    }

    /// Applies the result of a fetch previously issued by this store.
    ///
    /// - A ticket that is no longer live yields [`ListError::StaleResponse`]; nothing changes.
    /// - A failure is stored (see [`PagerStore::error`]) and returned as [`ListError::Fetch`].
    ///   A failed first page leaves the collection empty; a failed follow-up page leaves the
    ///   loaded items untouched.
    /// - A first page replaces the collection; a follow-up page is appended, skipping ids that
    ///   are already present.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Page<T>, FetchError>,
    ) -> Result<Applied, ListError> {
        let live = self.in_flight.map(|f| f.generation);
        let in_flight = match self.in_flight {
            Some(in_flight) if in_flight.generation == ticket.generation => in_flight,
            _ => {
                pdebug!(
                    generation = ticket.generation,
                    live = ?live,
                    "dropping stale response"
                );
                return Err(ListError::StaleResponse {
                    generation: ticket.generation,
                    live,
                });
            }
        };
        self.in_flight = None;

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                pwarn!(
                    generation = in_flight.generation,
                    kind = ?in_flight.kind,
                    error = %err,
                    "fetch failed"
                );
                if in_flight.kind == FetchKind::Initial {
                    self.clear_items();
                }
                self.state = FetchState::Error;
                self.error = Some(err.clone());
                self.failed = Some(in_flight.kind);
                return Err(ListError::Fetch(err));
            }
        };

        let Page {
            items,
            has_more,
            next_cursor,
            total,
            ..
        } = page;

        if in_flight.kind == FetchKind::Initial {
            self.clear_items();
        }
        let applied = self.append_unique(items);
        self.has_more = has_more;
        self.cursor = next_cursor;
        match (in_flight.kind, total) {
            (_, Some(total)) => self.total = total,
            (FetchKind::Initial, None) => self.total = self.items.len() as u64,
            (FetchKind::More, None) => {}
        }
        self.state = FetchState::Idle;

        pdebug!(
            generation = in_flight.generation,
            kind = ?in_flight.kind,
            appended = applied.appended,
            duplicates = applied.duplicates,
            has_more = self.has_more,
            "page applied"
        );
        Ok(applied)
    }

    /// Invalidates the in-flight fetch without issuing a new one.
    ///
    /// Returns `true` if there was one. Its response will be reported as stale.
    pub fn cancel(&mut self) -> bool {
        if self.in_flight.take().is_none() {
            return false;
        }
        pdebug!(generation = self.generation, "fetch cancelled");
        self.state = FetchState::Idle;
        true
    }

    /// Prepends `item` (e.g. right after it was created elsewhere in the UI).
    ///
    /// An item whose id is already present is moved to the front and replaced; the total only
    /// grows for new ids. Cursor and `has_more` are untouched.
    pub fn add(&mut self, item: T) {
        let id = item.id().clone();
        if self.ids.contains(&id) {
            if let Some(pos) = self.position(&id) {
                self.items.remove(pos);
            }
        } else {
            self.ids.insert(id);
            self.total = self.total.saturating_add(1);
        }
        self.items.insert(0, item);
    }

    /// Replaces the item with the same id, keeping its position. Returns `false` if absent.
    pub fn update(&mut self, item: T) -> bool {
        let Some(pos) = self.position(item.id()) else {
            return false;
        };
        self.items[pos] = item;
        true
    }

    /// Edits the item with `id` in place. Returns `false` if absent.
    ///
    /// If `f` changes the item's id to one held by another item, the edited entry is dropped so
    /// ids stay unique.
    pub fn update_with(&mut self, id: &T::Id, f: impl FnOnce(&mut T)) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        f(&mut self.items[pos]);

        let new_id = self.items[pos].id();
        if new_id == id {
            return true;
        }
        pwarn!("update_with changed an item id");
        let new_id = new_id.clone();
        self.ids.remove(id);
        if !self.ids.insert(new_id) {
            self.items.remove(pos);
            self.total = self.total.saturating_sub(1);
        }
        true
    }

    /// Removes the item with `id`, decrementing the total (floored at zero).
    pub fn remove(&mut self, id: &T::Id) -> Option<T> {
        let pos = self.position(id)?;
        self.ids.remove(id);
        self.total = self.total.saturating_sub(1);
        Some(self.items.remove(pos))
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.ids.contains(id)
    }

    pub fn position(&self, id: &T::Id) -> Option<usize> {
        if !self.ids.contains(id) {
            return None;
        }
        self.items.iter().position(|it| it.id() == id)
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == FetchState::Loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.state == FetchState::LoadingMore
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The generation and kind of the live fetch, if any.
    pub fn in_flight(&self) -> Option<(u64, FetchKind)> {
        self.in_flight.map(|f| (f.generation, f.kind))
    }

    /// The generation of the most recently issued fetch (`0` before the first one).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn status(&self) -> ListStatus {
        ListStatus {
            state: self.state,
            len: self.items.len(),
            total: self.total,
            has_more: self.has_more,
            has_error: self.error.is_some(),
            failed: self.failed,
        }
    }

    fn issue(&mut self, kind: FetchKind, request: PageRequest) -> FetchTicket {
        self.generation = self.generation.wrapping_add(1);
        self.in_flight = Some(InFlight {
            generation: self.generation,
            kind,
        });
        pdebug!(
            generation = self.generation,
            kind = ?kind,
            limit = request.limit,
            "fetch issued"
        );
        FetchTicket {
            generation: self.generation,
            kind,
            request,
        }
    }

    fn clear_items(&mut self) {
        self.items.clear();
        self.ids.clear();
    }

    fn append_unique(&mut self, incoming: Vec<T>) -> Applied {
        let mut applied = Applied::default();
        self.items.reserve(incoming.len());
        for item in incoming {
            if self.ids.insert(item.id().clone()) {
                self.items.push(item);
                applied.appended += 1;
            } else {
                applied.duplicates += 1;
            }
        }
        applied
    }
}

impl<T: Item> Default for PagerStore<T> {
    fn default() -> Self {
        Self::new(PagerOptions::default())
    }
}

impl<T: Item> fmt::Debug for PagerStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagerStore")
            .field("options", &self.options)
            .field("len", &self.items.len())
            .field("cursor", &self.cursor)
            .field("has_more", &self.has_more)
            .field("total", &self.total)
            .field("state", &self.state)
            .field("error", &self.error)
            .field("failed", &self.failed)
            .field("filters", &self.filters)
            .field("generation", &self.generation)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}
