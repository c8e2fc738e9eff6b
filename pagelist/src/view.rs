use crate::window;
use crate::{
    FetchKind, FetchState, ListStatus, ListViewOptions, ScrollMetrics, ViewState, VirtualRow,
    VisibleWindow,
};

/// What to show below the last rendered row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Indicator {
    #[default]
    None,
    /// A follow-up page is being fetched.
    Loading,
    /// The last follow-up fetch failed; show a retry affordance.
    Error,
}

impl Indicator {
    /// The footer for a list in `status`.
    ///
    /// Only follow-up loads get a footer. The first page's loading/error state replaces the list
    /// body instead, which is left to the host. This holds even when items were added locally
    /// after the first page failed: there is no cursor to retry from.
    pub fn for_status(status: &ListStatus) -> Self {
        match (status.state, status.failed) {
            (FetchState::LoadingMore, _) => Self::Loading,
            (FetchState::Error, Some(FetchKind::More)) => Self::Error,
            _ => Self::None,
        }
    }
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderPlan {
    pub window: VisibleWindow,
    pub footer: Indicator,
    /// Whether to place the end-of-content sentinel (only while more pages exist).
    pub sentinel: bool,
}

/// A headless windowed list view with a fixed row height.
///
/// This type holds only view state (scroll offset, container height); the collection is owned
/// elsewhere and passed in as `item_count`. Adapters drive it with:
/// - `on_scroll` when the scroll container reports a new offset
/// - `on_resize` when the container changes size, followed by `on_layout` on the next layout pass
#[derive(Clone, Debug)]
pub struct ListView {
    options: ListViewOptions,
    view: ViewState,
    pending_height: Option<u32>,
}

impl ListView {
    pub fn new(options: ListViewOptions) -> Self {
        Self {
            view: ViewState {
                scroll_offset: 0,
                container_height: options.container_height,
            },
            options,
            pending_height: None,
        }
    }

    pub fn options(&self) -> &ListViewOptions {
        &self.options
    }

    /// Replaces the options. A changed `container_height` is applied on the next layout pass.
    pub fn set_options(&mut self, options: ListViewOptions) {
        if options.container_height != self.options.container_height {
            self.pending_height = Some(options.container_height);
        }
        self.options = options;
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.options.overscan = overscan;
    }

    pub fn view_state(&self) -> ViewState {
        self.view
    }

    /// Restores a previously captured view state, discarding any pending resize.
    pub fn restore_view_state(&mut self, view: ViewState) {
        self.view = view;
        self.pending_height = None;
    }

    pub fn scroll_offset(&self) -> u64 {
        self.view.scroll_offset
    }

    pub fn container_height(&self) -> u32 {
        self.view.container_height
    }

    /// Records a new scroll offset. Also applies a pending resize.
    pub fn on_scroll(&mut self, scroll_offset: u64) {
        self.on_layout();
        self.view.scroll_offset = scroll_offset;
    }

    /// Jumps back to the top, e.g. when the collection was replaced by a new filter set.
    pub fn reset_scroll(&mut self) {
        self.view.scroll_offset = 0;
    }

    /// Records a container resize. It takes effect on the next `on_layout`/`on_scroll`, so a burst
    /// of resize events costs nothing until the window is actually needed.
    pub fn on_resize(&mut self, container_height: u32) {
        self.pending_height = Some(container_height);
    }

    /// Applies a pending resize. Returns `true` if the container height changed.
    pub fn on_layout(&mut self) -> bool {
        let Some(height) = self.pending_height.take() else {
            return false;
        };
        if height == self.view.container_height {
            return false;
        }
        ptrace!(
            from = self.view.container_height,
            to = height,
            "container resized"
        );
        self.view.container_height = height;
        true
    }

    pub fn has_pending_resize(&self) -> bool {
        self.pending_height.is_some()
    }

    pub fn total_height(&self, item_count: usize) -> u64 {
        window::total_height(item_count, self.options.row_height)
    }

    pub fn window(&self, item_count: usize) -> VisibleWindow {
        window::visible_window(
            item_count,
            self.view,
            self.options.row_height,
            self.options.overscan,
        )
    }

    pub fn scroll_metrics(&self, item_count: usize) -> ScrollMetrics {
        window::scroll_metrics(item_count, self.view, self.options.row_height)
    }

    /// Whether the current scroll position is close enough to the end to fetch more.
    pub fn should_prefetch(&self, item_count: usize) -> bool {
        if self.options.row_height == 0 {
            return false;
        }
        window::should_prefetch(
            self.scroll_metrics(item_count),
            self.options.prefetch_viewports,
        )
    }

    /// Whether the end-of-content sentinel intersects the (margin-extended) viewport.
    pub fn sentinel_visible(&self, item_count: usize) -> bool {
        window::sentinel_visible(
            item_count,
            self.view,
            self.options.row_height,
            self.options.sentinel_margin,
        )
    }

    pub fn max_scroll_offset(&self, item_count: usize) -> u64 {
        window::max_scroll_offset(
            item_count,
            self.options.row_height,
            self.view.container_height,
        )
    }

    pub fn clamp_scroll_offset(&self, item_count: usize, offset: u64) -> u64 {
        offset.min(self.max_scroll_offset(item_count))
    }

    /// Offset that brings `index` to the top of the viewport (clamped).
    pub fn scroll_to_index_offset(&self, item_count: usize, index: usize) -> u64 {
        let index = index.min(item_count.saturating_sub(1));
        let top = (index as u64).saturating_mul(self.options.row_height as u64);
        self.clamp_scroll_offset(item_count, top)
    }

    pub fn render_plan(&self, status: &ListStatus) -> RenderPlan {
        RenderPlan {
            window: self.window(status.len),
            footer: Indicator::for_status(status),
            sentinel: status.has_more && !status.is_empty(),
        }
    }

    /// Calls `f` for each row of the current window without allocating.
    pub fn for_each_row(&self, item_count: usize, f: impl FnMut(VirtualRow)) {
        window::for_each_row(self.window(item_count), self.options.row_height, f);
    }

    /// Pairs each row of the current window with its item.
    pub fn for_each_visible<'a, T>(&self, items: &'a [T], mut f: impl FnMut(VirtualRow, &'a T)) {
        self.for_each_row(items.len(), |row| {
            if let Some(item) = items.get(row.index) {
                f(row, item);
            }
        });
    }
}

impl Default for ListView {
    fn default() -> Self {
        Self::new(ListViewOptions::default())
    }
}
