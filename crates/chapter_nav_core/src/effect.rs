use std::time::Duration;

use crate::state::{HighlightId, TimerToken};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Create the sidebar container unless it already exists.
    EnsureContainer,
    AttachObserver,
    DetachObserver,
    ScheduleSync { token: TimerToken, delay: Duration },
    CancelSync { token: TimerToken },
    /// Query the page and report back with `Msg::PageObserved`.
    ObservePage { query: String },
    /// Hide the container and drop every row along with its element link.
    HideSidebar,
    /// Show the container and regenerate every row from the current matches.
    RebuildList { query: String, scroll_offset: i32 },
    RestoreListScroll { offset: i32 },
    SetCollapsed(bool),
    FocusEntry {
        row: usize,
        highlight: HighlightId,
        color: String,
        revert_after: Duration,
    },
    RevertHighlight(HighlightId),
    JumpToLatest { query: String, max_depth: usize },
}
