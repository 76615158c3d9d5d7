use crate::config::SyncConfig;
use crate::view_model::SidebarViewModel;

/// Identifies one scheduled debounce timer; only the newest token is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(pub u64);

/// Identifies one in-flight row highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HighlightId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleMode {
    #[default]
    Expanded,
    Collapsed,
}

impl ToggleMode {
    pub fn flipped(self) -> Self {
        match self {
            ToggleMode::Expanded => ToggleMode::Collapsed,
            ToggleMode::Collapsed => ToggleMode::Expanded,
        }
    }

    pub fn is_collapsed(self) -> bool {
        self == ToggleMode::Collapsed
    }
}

/// Page-lifetime sidebar state, owned by exactly one synchronizer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SidebarState {
    config: SyncConfig,
    query: Option<String>,
    container_present: bool,
    observing: bool,
    torn_down: bool,
    mode: ToggleMode,
    visible: bool,
    rendered_rows: usize,
    scroll_offset: i32,
    pending_sync: Option<TimerToken>,
    next_timer: u64,
    next_highlight: u64,
    passes: u64,
    rebuilds: u64,
}

impl SidebarState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SyncConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn view(&self) -> SidebarViewModel {
        SidebarViewModel {
            enabled: self.query.is_some(),
            container_present: self.container_present,
            visible: self.visible,
            collapsed: self.mode.is_collapsed(),
            rendered_rows: self.rendered_rows,
            scroll_offset: self.scroll_offset,
            sync_pending: self.pending_sync.is_some(),
            passes: self.passes,
            rebuilds: self.rebuilds,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn mode(&self) -> ToggleMode {
        self.mode
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub(crate) fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub(crate) fn set_query(&mut self, query: Option<String>) {
        self.query = query;
    }

    pub(crate) fn start_observing(&mut self) -> bool {
        !std::mem::replace(&mut self.observing, true)
    }

    pub(crate) fn tear_down(&mut self) -> (Option<TimerToken>, bool) {
        self.torn_down = true;
        let was_observing = std::mem::replace(&mut self.observing, false);
        (self.pending_sync.take(), was_observing)
    }

    /// Supersedes any pending timer, returning `(cancelled, fresh)`.
    pub(crate) fn reschedule_sync(&mut self) -> (Option<TimerToken>, TimerToken) {
        self.next_timer += 1;
        let fresh = TimerToken(self.next_timer);
        (self.pending_sync.replace(fresh), fresh)
    }

    /// Consumes the pending timer if `token` is the live one.
    pub(crate) fn take_pending_sync(&mut self, token: TimerToken) -> bool {
        if self.pending_sync == Some(token) {
            self.pending_sync = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn begin_pass(&mut self) {
        self.passes += 1;
        nav_logging::set_sync_pass(self.passes);
    }

    pub(crate) fn record_observation(&mut self, rendered_rows: Option<usize>, list_scroll: i32) {
        self.container_present = rendered_rows.is_some();
        if let Some(rows) = rendered_rows {
            self.rendered_rows = rows;
            self.scroll_offset = list_scroll;
        }
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
        self.rendered_rows = 0;
    }

    pub(crate) fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn record_rebuild(&mut self, rows: usize) {
        self.visible = true;
        self.rendered_rows = rows;
        self.rebuilds += 1;
    }

    pub(crate) fn set_scroll_offset(&mut self, offset: i32) {
        self.scroll_offset = offset;
    }

    pub(crate) fn rendered_rows(&self) -> usize {
        self.rendered_rows
    }

    pub(crate) fn toggle_mode(&mut self) -> ToggleMode {
        self.mode = self.mode.flipped();
        self.mode
    }

    pub(crate) fn next_highlight(&mut self) -> HighlightId {
        self.next_highlight += 1;
        HighlightId(self.next_highlight)
    }
}
