/// Read-only snapshot of the sidebar for inspection and rendering decisions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SidebarViewModel {
    /// A match rule exists for this host.
    pub enabled: bool,
    pub container_present: bool,
    pub visible: bool,
    pub collapsed: bool,
    pub rendered_rows: usize,
    pub scroll_offset: i32,
    pub sync_pending: bool,
    pub passes: u64,
    pub rebuilds: u64,
}
