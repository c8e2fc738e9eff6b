use pagelist::{ListViewOptions, PagerOptions};

/// Quiet period after the last filter change before a refresh is issued.
pub const DEFAULT_REFRESH_DEBOUNCE_MS: u64 = 300;

/// Configuration for [`crate::Controller`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerOptions {
    pub pager: PagerOptions,
    pub view: ListViewOptions,
    pub refresh_debounce_ms: u64,
}

impl ControllerOptions {
    pub fn new(pager: PagerOptions, view: ListViewOptions) -> Self {
        Self {
            pager,
            view,
            refresh_debounce_ms: DEFAULT_REFRESH_DEBOUNCE_MS,
        }
    }

    pub fn with_pager(mut self, pager: PagerOptions) -> Self {
        self.pager = pager;
        self
    }

    pub fn with_view(mut self, view: ListViewOptions) -> Self {
        self.view = view;
        self
    }

    pub fn with_refresh_debounce_ms(mut self, delay_ms: u64) -> Self {
        self.refresh_debounce_ms = delay_ms;
        self
    }
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self::new(PagerOptions::default(), ListViewOptions::default())
    }
}
