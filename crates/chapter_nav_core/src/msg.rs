use crate::state::{HighlightId, TimerToken};

/// Descriptor for one batch of child-list changes under the document body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MutationBatch {
    pub added: usize,
    pub removed: usize,
}

/// What a synchronization pass saw when it queried the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageObservation {
    /// Elements currently matching the active rule, in document order.
    pub matches: usize,
    /// Rows in the list region, or `None` when the list region is gone.
    pub rendered_rows: Option<usize>,
    pub list_scroll: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The host page finished loading.
    PageLoaded { host: String },
    /// The mutation feed delivered a batch.
    MutationsObserved(MutationBatch),
    /// A debounce timer elapsed.
    SyncTimerFired(TimerToken),
    /// The page was queried at the start of a pass.
    PageObserved(PageObservation),
    /// First paint opportunity after a rebuild.
    FrameReady { scroll_offset: i32 },
    /// User clicked the sidebar header.
    HeaderClicked,
    /// User clicked a navigation row (zero-based).
    EntryClicked { row: usize },
    /// A highlight's display time ran out.
    HighlightExpired(HighlightId),
    /// User clicked the jump-to-latest control.
    JumpToLatestClicked,
    /// The synchronizer is being shut down.
    Teardown,
    /// The page is being hidden; `persisted` when it goes into the back/forward cache.
    PageHidden { persisted: bool },
}
