/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page the cursor endpoint accepts; larger requests are clamped.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Configuration for [`crate::PagerStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PagerOptions {
    /// Items requested per page, clamped to `1..=MAX_PAGE_SIZE`.
    pub page_size: u32,
}

impl PagerOptions {
    pub fn new() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub(crate) fn limit(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

impl Default for PagerOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for [`crate::ListView`].
///
/// All lengths are in the same unit as the scroll offset reported by the host (pixels for a
/// DOM adapter, cells for a TUI).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListViewOptions {
    /// Fixed height of every row.
    pub row_height: u32,
    /// Initial height of the scroll container.
    pub container_height: u32,
    /// Rows mounted above and below the viewport.
    ///
    /// `0` is valid but may show blank rows during fast scrolls.
    pub overscan: usize,
    /// Prefetch once less than `prefetch_viewports * container_height` of content remains
    /// below the viewport.
    pub prefetch_viewports: u32,
    /// How far outside the viewport the end-of-content sentinel already counts as visible.
    pub sentinel_margin: u32,
}

impl ListViewOptions {
    pub fn new(row_height: u32) -> Self {
        Self {
            row_height,
            container_height: 600,
            overscan: 5,
            prefetch_viewports: 3,
            sentinel_margin: 200,
        }
    }

    pub fn with_container_height(mut self, container_height: u32) -> Self {
        self.container_height = container_height;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_prefetch_viewports(mut self, prefetch_viewports: u32) -> Self {
        self.prefetch_viewports = prefetch_viewports;
        self
    }

    pub fn with_sentinel_margin(mut self, sentinel_margin: u32) -> Self {
        self.sentinel_margin = sentinel_margin;
        self
    }
}

impl Default for ListViewOptions {
    fn default() -> Self {
        Self::new(70)
    }
}
