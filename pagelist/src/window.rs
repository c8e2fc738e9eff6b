//! Pure fixed-row-height windowing math.
//!
//! Nothing here holds state: every function takes the item count and an explicit
//! [`ViewState`], so the results can be checked without any rendering framework.

use crate::{ScrollMetrics, ViewState, VirtualRow, VisibleWindow};

/// Height of the full-content spacer.
pub fn total_height(item_count: usize, row_height: u32) -> u64 {
    (item_count as u64).saturating_mul(row_height as u64)
}

/// Computes the rows to mount for `view`.
///
/// - `start = max(0, floor(scroll_offset / row_height) - overscan)`
/// - `end = min(item_count, ceil((scroll_offset + container_height) / row_height) + overscan)`
///
/// `start` is clamped to `end`, so a scroll offset past the end of the content (e.g. right
/// after the collection shrank) yields an empty window rather than an inverted one.
/// A zero `row_height` yields an empty window.
pub fn visible_window(
    item_count: usize,
    view: ViewState,
    row_height: u32,
    overscan: usize,
) -> VisibleWindow {
    let total_height = total_height(item_count, row_height);
    if item_count == 0 || row_height == 0 {
        return VisibleWindow {
            total_height,
            ..VisibleWindow::default()
        };
    }

    let rh = row_height as u64;
    let first_visible = usize::try_from(view.scroll_offset / rh).unwrap_or(usize::MAX);
    let viewport_end = view
        .scroll_offset
        .saturating_add(view.container_height as u64);
    let last_visible_exclusive = usize::try_from(viewport_end.div_ceil(rh)).unwrap_or(usize::MAX);

    let end_index = last_visible_exclusive
        .saturating_add(overscan)
        .min(item_count);
    let start_index = first_visible.saturating_sub(overscan).min(end_index);

    VisibleWindow {
        start_index,
        end_index,
        offset: (start_index as u64).saturating_mul(rh),
        total_height,
    }
}

/// The geometry a scroll container would report for `view` over `item_count` rows.
pub fn scroll_metrics(item_count: usize, view: ViewState, row_height: u32) -> ScrollMetrics {
    ScrollMetrics {
        scroll_top: view.scroll_offset,
        scroll_height: total_height(item_count, row_height),
        client_height: view.container_height,
    }
}

/// Scroll-path prefetch check: less than `prefetch_viewports` viewports of content remain below
/// the viewport.
///
/// Empty content never triggers, so an empty list cannot spin in a fetch loop.
pub fn should_prefetch(metrics: ScrollMetrics, prefetch_viewports: u32) -> bool {
    if metrics.scroll_height == 0 {
        return false;
    }
    let threshold = (metrics.client_height as u64).saturating_mul(prefetch_viewports as u64);
    metrics.remaining() < threshold
}

/// Sentinel-path prefetch check.
///
/// The sentinel is a 1-unit-tall marker at the very bottom of the loaded content. It counts as
/// visible when it intersects the viewport grown by `margin` on both ends.
pub fn sentinel_visible(item_count: usize, view: ViewState, row_height: u32, margin: u32) -> bool {
    let total = total_height(item_count, row_height);
    if total == 0 {
        return false;
    }
    let sentinel_top = total - 1;
    let margin = margin as u64;
    let viewport_top = view.scroll_offset.saturating_sub(margin);
    let viewport_bottom = view
        .scroll_offset
        .saturating_add(view.container_height as u64)
        .saturating_add(margin);
    sentinel_top < viewport_bottom && total > viewport_top
}

/// Calls `f` for every row in `window`, in ascending index order.
pub fn for_each_row(window: VisibleWindow, row_height: u32, mut f: impl FnMut(VirtualRow)) {
    let rh = row_height as u64;
    for index in window.range() {
        f(VirtualRow {
            index,
            top: (index as u64).saturating_mul(rh),
            height: row_height,
        });
    }
}

/// Largest meaningful scroll offset (`total_height - container_height`, floored at zero).
pub fn max_scroll_offset(item_count: usize, row_height: u32, container_height: u32) -> u64 {
    total_height(item_count, row_height).saturating_sub(container_height as u64)
}
