use nav_logging::{nav_debug, nav_info, nav_trace, nav_warn};

use crate::{Effect, Msg, PageObservation, SidebarState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: SidebarState, msg: Msg) -> (SidebarState, Vec<Effect>) {
    // Highlight reverts still run after teardown.
    if state.is_torn_down() && !matches!(msg, Msg::HighlightExpired(_)) {
        nav_trace!("ignoring {:?} after teardown", msg);
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::PageLoaded { host } => {
            let query = state.config().rules.resolve(&host).map(ToOwned::to_owned);
            let Some(query) = query else {
                nav_debug!("no match rule for host {:?}; sidebar disabled", host);
                return (state, Vec::new());
            };
            nav_info!("host {:?} uses selector {:?}", host, query);
            state.set_query(Some(query.clone()));

            let mut effects = vec![Effect::EnsureContainer];
            if state.start_observing() {
                effects.push(Effect::AttachObserver);
            }
            state.begin_pass();
            effects.push(Effect::ObservePage { query });
            effects
        }
        Msg::MutationsObserved(batch) => {
            if state.query().is_none() {
                return (state, Vec::new());
            }
            let (cancelled, token) = state.reschedule_sync();
            nav_trace!(
                "mutation batch +{} -{}; sync rescheduled as {:?}",
                batch.added,
                batch.removed,
                token
            );
            let mut effects = Vec::with_capacity(2);
            if let Some(old) = cancelled {
                effects.push(Effect::CancelSync { token: old });
            }
            effects.push(Effect::ScheduleSync {
                token,
                delay: state.config().quiescence(),
            });
            effects
        }
        Msg::SyncTimerFired(token) => {
            if !state.take_pending_sync(token) {
                nav_trace!("stale sync timer {:?} ignored", token);
                return (state, Vec::new());
            }
            match state.query().map(ToOwned::to_owned) {
                Some(query) => {
                    state.begin_pass();
                    vec![Effect::ObservePage { query }]
                }
                None => Vec::new(),
            }
        }
        Msg::PageObserved(observation) => decide(&mut state, observation),
        Msg::FrameReady { scroll_offset } => {
            state.set_scroll_offset(scroll_offset);
            vec![Effect::RestoreListScroll {
                offset: scroll_offset,
            }]
        }
        Msg::HeaderClicked => {
            let mode = state.toggle_mode();
            nav_debug!("sidebar toggled to {:?}", mode);
            vec![Effect::SetCollapsed(mode.is_collapsed())]
        }
        Msg::EntryClicked { row } => {
            if row >= state.rendered_rows() {
                nav_warn!(
                    "click on row {} but only {} rows are rendered",
                    row,
                    state.rendered_rows()
                );
                return (state, Vec::new());
            }
            let highlight = state.next_highlight();
            vec![Effect::FocusEntry {
                row,
                highlight,
                color: state.config().highlight_color.clone(),
                revert_after: state.config().highlight_duration(),
            }]
        }
        Msg::HighlightExpired(highlight) => vec![Effect::RevertHighlight(highlight)],
        Msg::JumpToLatestClicked => match state.query().map(ToOwned::to_owned) {
            Some(query) => vec![Effect::JumpToLatest {
                query,
                max_depth: state.config().max_ancestor_depth,
            }],
            None => Vec::new(),
        },
        Msg::Teardown => tear_down(&mut state),
        Msg::PageHidden { persisted: true } => {
            nav_debug!("page cached for back/forward navigation; staying attached");
            Vec::new()
        }
        Msg::PageHidden { persisted: false } => tear_down(&mut state),
    };

    (state, effects)
}

fn tear_down(state: &mut SidebarState) -> Vec<Effect> {
    let (pending, was_observing) = state.tear_down();
    nav_info!("synchronizer torn down");
    let mut effects = Vec::with_capacity(2);
    if let Some(token) = pending {
        effects.push(Effect::CancelSync { token });
    }
    if was_observing {
        effects.push(Effect::DetachObserver);
    }
    effects
}

/// Rebuild decision for one pass.
fn decide(state: &mut SidebarState, observation: PageObservation) -> Vec<Effect> {
    let Some(query) = state.query().map(ToOwned::to_owned) else {
        return Vec::new();
    };
    state.record_observation(observation.rendered_rows, observation.list_scroll);
    let Some(rendered) = observation.rendered_rows else {
        nav_warn!("sidebar list region missing; pass aborted");
        return Vec::new();
    };

    let matches = observation.matches;
    if matches == 0 {
        nav_debug!("no matching messages; hiding sidebar");
        state.hide();
        return vec![Effect::HideSidebar];
    }
    // A hidden sidebar is never current, whatever its row count says.
    if matches == rendered && state.is_visible() {
        nav_debug!("{} messages already rendered; nothing to do", matches);
        return Vec::new();
    }

    nav_info!("rebuilding sidebar: {} -> {} rows", rendered, matches);
    state.record_rebuild(matches);
    vec![Effect::RebuildList {
        query,
        scroll_offset: observation.list_scroll,
    }]
}
