use crate::{FetchKind, FetchState};

/// The scroll-related UI state a [`crate::ListView`] computes from.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`, which makes it easy
/// to restore a list's position across sessions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewState {
    pub scroll_offset: u64,
    pub container_height: u32,
}

/// Scroll geometry in the shape a DOM scroll event reports it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollMetrics {
    pub scroll_top: u64,
    pub scroll_height: u64,
    pub client_height: u32,
}

impl ScrollMetrics {
    /// Content left below the viewport (`scroll_height - scroll_top - client_height`, floored
    /// at zero).
    pub fn remaining(&self) -> u64 {
        self.scroll_height
            .saturating_sub(self.scroll_top)
            .saturating_sub(self.client_height as u64)
    }
}

/// A copyable snapshot of a [`crate::PagerStore`]'s loading state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListStatus {
    pub state: FetchState,
    /// Number of items currently held.
    pub len: usize,
    /// Server-reported total (adjusted by local adds/removes).
    pub total: u64,
    pub has_more: bool,
    pub has_error: bool,
    /// Which fetch produced the current error, if any.
    pub failed: Option<FetchKind>,
}

impl ListStatus {
    pub fn is_loading(&self) -> bool {
        self.state == FetchState::Loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.state == FetchState::LoadingMore
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
