use pagelist::{
    Applied, FetchError, FetchTicket, Filters, Indicator, Item, ListError, ListStatus, ListView,
    Page, PagerStore, RenderPlan, VirtualRow,
};

use crate::{ControllerOptions, Fetched};

/// Which signal asked for the next page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrefetchTrigger {
    /// The scroll position came within the prefetch threshold of the end.
    Scroll,
    /// The end-of-content sentinel became visible.
    Sentinel,
}

#[derive(Clone, Debug)]
struct PendingRefresh {
    filters: Filters,
    due_ms: u64,
}

/// A framework-neutral controller that owns a [`PagerStore`] and a [`ListView`] and provides the
/// usual infinite-list workflow.
///
/// This type does not hold any UI objects and performs no I/O. Adapters drive it by calling:
/// - `on_scroll` / `on_resize` / `on_layout` / `on_sentinel` when UI events occur
/// - `tick(now_ms)` each frame/timer tick (for debounced filter refreshes)
/// - `on_fetched` (or `complete`) when a fetch it handed out finishes
///
/// Every method that may start a fetch returns `Option<FetchTicket>`; the adapter runs the
/// ticket's request (see [`crate::fetch`]) and feeds the result back. Both prefetch signals go
/// through [`Controller::maybe_fetch`], so duplicate triggers collapse into at most one request.
#[derive(Clone, Debug)]
pub struct Controller<T: Item> {
    store: PagerStore<T>,
    view: ListView,
    refresh_debounce_ms: u64,
    pending_refresh: Option<PendingRefresh>,
    last_trigger: Option<PrefetchTrigger>,
}

impl<T: Item> Controller<T> {
    pub fn new(options: ControllerOptions) -> Self {
        Self {
            store: PagerStore::new(options.pager),
            view: ListView::new(options.view),
            refresh_debounce_ms: options.refresh_debounce_ms,
            pending_refresh: None,
            last_trigger: None,
        }
    }

    pub fn from_parts(store: PagerStore<T>, view: ListView) -> Self {
        Self {
            store,
            view,
            refresh_debounce_ms: crate::DEFAULT_REFRESH_DEBOUNCE_MS,
            pending_refresh: None,
            last_trigger: None,
        }
    }

    pub fn into_parts(self) -> (PagerStore<T>, ListView) {
        (self.store, self.view)
    }

    /// Read access to the store. Mutations go through the controller.
    pub fn store(&self) -> &PagerStore<T> {
        &self.store
    }

    pub fn view(&self) -> &ListView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ListView {
        &mut self.view
    }

    pub fn items(&self) -> &[T] {
        self.store.items()
    }

    pub fn status(&self) -> ListStatus {
        self.store.status()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.store.error()
    }

    pub fn footer(&self) -> Indicator {
        Indicator::for_status(&self.status())
    }

    pub fn render_plan(&self) -> RenderPlan {
        self.view.render_plan(&self.status())
    }

    /// Calls `f` for each mounted row and its item.
    pub fn for_each_visible(&self, f: impl FnMut(VirtualRow, &T)) {
        self.view.for_each_visible(self.store.items(), f);
    }

    /// Reloads from the first page with `filters`, right away.
    ///
    /// Cancels any in-flight fetch and any pending debounced refresh, and scrolls back to the top.
    pub fn refresh(&mut self, filters: Filters) -> FetchTicket {
        self.pending_refresh = None;
        self.view.reset_scroll();
        self.store.load_initial(filters)
    }

    /// [`Controller::refresh`] with the current filters.
    pub fn reload(&mut self) -> FetchTicket {
        let filters = self.store.filters().clone();
        self.refresh(filters)
    }

    /// Schedules a refresh with `filters` once no further change arrives for
    /// `refresh_debounce_ms`. Each call restarts the timer.
    ///
    /// Returns `false` when nothing was scheduled because the filters are already the ones
    /// loaded (or about to be).
    pub fn set_filters(&mut self, filters: Filters, now_ms: u64) -> bool {
        match &self.pending_refresh {
            Some(pending) if pending.filters == filters => return false,
            None if self.store.generation() > 0 && *self.store.filters() == filters => {
                return false;
            }
            _ => {}
        }
        let due_ms = now_ms.saturating_add(self.refresh_debounce_ms);
        atrace!(due_ms, "refresh scheduled");
        self.pending_refresh = Some(PendingRefresh { filters, due_ms });
        true
    }

    pub fn has_pending_refresh(&self) -> bool {
        self.pending_refresh.is_some()
    }

    /// Advances timers. Returns the ticket of a debounced refresh that just became due.
    pub fn tick(&mut self, now_ms: u64) -> Option<FetchTicket> {
        let due_ms = self.pending_refresh.as_ref()?.due_ms;
        if now_ms < due_ms {
            return None;
        }
        let pending = self.pending_refresh.take()?;
        adebug!(now_ms, due_ms, "debounced refresh fired");
        Some(self.refresh(pending.filters))
    }

    /// Explicitly requests the next page. Unlike the automatic triggers this also retries after a
    /// failed page.
    pub fn load_more(&mut self) -> Option<FetchTicket> {
        self.store.load_more()
    }

    /// The single entry point for automatic prefetching.
    ///
    /// Does nothing while the list is empty or shows an error (a failed page needs an explicit
    /// [`Controller::load_more`]); otherwise defers to the store's in-flight guard.
    pub fn maybe_fetch(&mut self, trigger: PrefetchTrigger) -> Option<FetchTicket> {
        if self.store.error().is_some() {
            atrace!(?trigger, "prefetch suppressed: last fetch failed");
            return None;
        }
        if self.store.is_empty() {
            return None;
        }
        let ticket = self.store.load_more()?;
        adebug!(?trigger, generation = ticket.generation(), "prefetch issued");
        self.last_trigger = Some(trigger);
        Some(ticket)
    }

    /// The signal behind the most recent automatic prefetch.
    pub fn last_trigger(&self) -> Option<PrefetchTrigger> {
        self.last_trigger
    }

    /// Records a scroll position and prefetches if the end is near.
    pub fn on_scroll(&mut self, scroll_offset: u64) -> Option<FetchTicket> {
        self.view.on_scroll(scroll_offset);
        if !self.view.should_prefetch(self.store.len()) {
            return None;
        }
        self.maybe_fetch(PrefetchTrigger::Scroll)
    }

    /// Records a container resize; it applies on the next `on_layout`/`on_scroll`.
    pub fn on_resize(&mut self, container_height: u32) {
        self.view.on_resize(container_height);
    }

    /// Layout pass: applies a pending resize, then checks whether the sentinel is in view.
    ///
    /// Call this after rendering a newly applied page: a short page can leave the sentinel
    /// visible without any scroll event.
    pub fn on_layout(&mut self) -> Option<FetchTicket> {
        self.view.on_layout();
        if !self.store.has_more() || !self.view.sentinel_visible(self.store.len()) {
            return None;
        }
        self.maybe_fetch(PrefetchTrigger::Sentinel)
    }

    /// Host-reported sentinel visibility (e.g. from an intersection observer).
    pub fn on_sentinel(&mut self, intersecting: bool) -> Option<FetchTicket> {
        if !intersecting {
            return None;
        }
        self.maybe_fetch(PrefetchTrigger::Sentinel)
    }

    /// Applies a finished fetch. See [`PagerStore::complete`].
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Page<T>, FetchError>,
    ) -> Result<Applied, ListError> {
        self.store.complete(ticket, result)
    }

    pub fn on_fetched(&mut self, fetched: Fetched<T>) -> Result<Applied, ListError> {
        let Fetched { ticket, result } = fetched;
        self.complete(ticket, result)
    }

    pub fn add_item(&mut self, item: T) {
        self.store.add(item);
    }

    pub fn update_item(&mut self, item: T) -> bool {
        self.store.update(item)
    }

    pub fn update_item_with(&mut self, id: &T::Id, f: impl FnOnce(&mut T)) -> bool {
        self.store.update_with(id, f)
    }

    pub fn remove_item(&mut self, id: &T::Id) -> Option<T> {
        self.store.remove(id)
    }

    /// Stops all pending work (e.g. when the list is unmounted): drops a scheduled refresh and
    /// invalidates the in-flight fetch. Returns `true` if anything was cancelled.
    pub fn detach(&mut self) -> bool {
        let had_refresh = self.pending_refresh.take().is_some();
        let had_fetch = self.store.cancel();
        had_refresh || had_fetch
    }
}

impl<T: Item> Default for Controller<T> {
    fn default() -> Self {
        Self::new(ControllerOptions::default())
    }
}
