//! Chapter navigator core: pure sidebar state machine, selector resolution
//! and label synthesis.
//!
//! Matched messages are identified by position only (the Nth match in
//! document order). If the host page reorders earlier messages, rows from a
//! stale render point at the wrong message until the next rebuild.
mod config;
mod effect;
mod label;
mod msg;
mod selector;
mod state;
mod update;
mod view_model;

pub use config::{
    ConfigError, SyncConfig, DEFAULT_HIGHLIGHT_COLOR, DEFAULT_HIGHLIGHT_MS,
    DEFAULT_MAX_ANCESTOR_DEPTH, DEFAULT_QUIESCENCE_MS,
};
pub use effect::Effect;
pub use label::{
    collapse_whitespace, entry_label, label_body, strip_speaker_prefix, truncate_chars,
    LabelOptions, DEFAULT_ELLIPSIS, DEFAULT_LABEL_MAX_CHARS,
};
pub use msg::{MutationBatch, Msg, PageObservation};
pub use selector::{host_from_url, resolve_selector, MatchRule, RuleTable};
pub use state::{HighlightId, SidebarState, TimerToken, ToggleMode};
pub use update::update;
pub use view_model::SidebarViewModel;
