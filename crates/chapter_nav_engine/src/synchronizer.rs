use std::collections::HashMap;
use std::sync::mpsc;
use std::time::Duration;

use chapter_nav_core::{
    entry_label, update, Effect, HighlightId, Msg, PageObservation, SidebarState,
    SidebarViewModel, SyncConfig, TimerToken,
};
use nav_logging::{nav_debug, nav_info, nav_trace, nav_warn};

use crate::mutation::{MutationFeed, MutationSink, Subscription};
use crate::schedule::{ManualScheduler, Scheduler, TimerId};
use crate::scroll::{jump_to_latest, ScrollTarget};
use crate::HostPage;

/// Message queue feeding a synchronizer; timers and feeds hold clones of the sender.
pub struct Mailbox {
    msg_tx: mpsc::Sender<Msg>,
    msg_rx: mpsc::Receiver<Msg>,
}

impl Mailbox {
    pub fn new() -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        Self { msg_tx, msg_rx }
    }

    pub fn sender(&self) -> mpsc::Sender<Msg> {
        self.msg_tx.clone()
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new()
    }
}

/// One rendered row and the message element it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEntry<E> {
    pub label: String,
    pub element: E,
}

struct PendingHighlight<E> {
    element: E,
    prior_background: String,
}

/// Owns the sidebar state for one page and applies its effects to the page.
pub struct Synchronizer<P: HostPage, S: Scheduler> {
    state: SidebarState,
    page: P,
    scheduler: S,
    feed: Box<dyn MutationFeed>,
    subscription: Option<Subscription>,
    mailbox: Mailbox,
    sync_timer: Option<(TimerToken, TimerId)>,
    entries: Vec<NavigationEntry<P::Element>>,
    highlights: HashMap<HighlightId, PendingHighlight<P::Element>>,
    pass_matches: Option<Vec<P::Element>>,
}

impl<P: HostPage, S: Scheduler> Synchronizer<P, S> {
    pub fn new(
        config: SyncConfig,
        page: P,
        scheduler: S,
        feed: Box<dyn MutationFeed>,
        mailbox: Mailbox,
    ) -> Self {
        Self {
            state: SidebarState::with_config(config),
            page,
            scheduler,
            feed,
            subscription: None,
            mailbox,
            sync_timer: None,
            entries: Vec::new(),
            highlights: HashMap::new(),
            pass_matches: None,
        }
    }

    /// Page-load entry point: creates the sidebar, subscribes and renders once.
    pub fn start(&mut self, host: &str) {
        self.dispatch(Msg::PageLoaded {
            host: host.to_string(),
        });
    }

    /// Cancels the pending pass and disconnects from the mutation feed.
    pub fn teardown(&mut self) {
        self.dispatch(Msg::Teardown);
    }

    pub fn sender(&self) -> mpsc::Sender<Msg> {
        self.mailbox.sender()
    }

    pub fn view(&self) -> SidebarViewModel {
        self.state.view()
    }

    pub fn state(&self) -> &SidebarState {
        &self.state
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn entries(&self) -> &[NavigationEntry<P::Element>] {
        &self.entries
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Drains the mailbox, including messages queued while draining.
    pub fn process_pending_messages(&mut self) {
        while let Ok(msg) = self.mailbox.msg_rx.try_recv() {
            self.dispatch(msg);
        }
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::EnsureContainer => match self.page.ensure_container() {
                Ok(true) => nav_info!("sidebar container created"),
                Ok(false) => nav_debug!("sidebar container already present"),
                Err(err) => nav_warn!("could not create sidebar container: {}", err),
            },
            Effect::AttachObserver => {
                let msg_tx = self.mailbox.sender();
                let sink: MutationSink = Box::new(move |batch| {
                    let _ = msg_tx.send(Msg::MutationsObserved(batch));
                });
                match self.feed.subscribe(sink) {
                    Ok(subscription) => self.subscription = Some(subscription),
                    Err(err) => nav_warn!("could not observe document mutations: {}", err),
                }
            }
            Effect::DetachObserver => {
                if let Some(subscription) = self.subscription.take() {
                    subscription.disconnect();
                }
            }
            Effect::ScheduleSync { token, delay } => {
                let id = self.scheduler.schedule(delay, Msg::SyncTimerFired(token));
                self.sync_timer = Some((token, id));
            }
            Effect::CancelSync { token } => match self.sync_timer.take() {
                Some((live, id)) if live == token => self.scheduler.cancel(id),
                other => self.sync_timer = other,
            },
            Effect::ObservePage { query } => self.observe(&query),
            Effect::HideSidebar => self.hide(),
            Effect::RebuildList {
                query,
                scroll_offset,
            } => self.rebuild(&query, scroll_offset),
            Effect::RestoreListScroll { offset } => {
                if let Err(err) = self.page.set_list_scroll(offset) {
                    nav_debug!("scroll restore skipped: {}", err);
                }
            }
            Effect::SetCollapsed(collapsed) => {
                if let Err(err) = self.page.set_collapsed(collapsed) {
                    nav_warn!("toggle failed: {}", err);
                }
            }
            Effect::FocusEntry {
                row,
                highlight,
                color,
                revert_after,
            } => self.focus(row, highlight, &color, revert_after),
            Effect::RevertHighlight(highlight) => {
                if let Some(pending) = self.highlights.remove(&highlight) {
                    self.page
                        .set_inline_background(&pending.element, &pending.prior_background);
                }
            }
            Effect::JumpToLatest { query, max_depth } => {
                match jump_to_latest(&mut self.page, &query, max_depth) {
                    Ok(target) => nav_debug!("jumped to latest via {}", target_kind(&target)),
                    Err(err) => nav_warn!("jump to latest failed: {}", err),
                }
            }
        }
    }

    fn observe(&mut self, query: &str) {
        let matches = match self.page.query_all(query) {
            Ok(matches) => matches,
            Err(err) => {
                nav_warn!("pass skipped: {}", err);
                return;
            }
        };
        let observation = PageObservation {
            matches: matches.len(),
            rendered_rows: self.page.rendered_rows(),
            list_scroll: self.page.list_scroll().unwrap_or(0),
        };
        nav_trace!("observed {:?}", observation);
        self.pass_matches = Some(matches);
        self.dispatch(Msg::PageObserved(observation));
        self.pass_matches = None;
    }

    fn hide(&mut self) {
        self.entries.clear();
        if let Err(err) = self.page.set_sidebar_visible(false) {
            nav_debug!("hide skipped: {}", err);
        }
        if let Err(err) = self.page.replace_rows(&[]) {
            nav_debug!("row clear skipped: {}", err);
        }
    }

    fn rebuild(&mut self, query: &str, scroll_offset: i32) {
        let matches = match self.pass_matches.take() {
            Some(matches) => matches,
            None => match self.page.query_all(query) {
                Ok(matches) => matches,
                Err(err) => {
                    nav_warn!("rebuild skipped: {}", err);
                    return;
                }
            },
        };
        let options = &self.state.config().label;
        let labels: Vec<String> = matches
            .iter()
            .enumerate()
            .map(|(index, element)| entry_label(index, &self.page.text_of(element), options))
            .collect();

        if let Err(err) = self.page.set_sidebar_visible(true) {
            nav_warn!("rebuild aborted: {}", err);
            return;
        }
        if let Err(err) = self.page.replace_rows(&labels) {
            nav_warn!("rebuild aborted: {}", err);
            return;
        }
        self.entries = labels
            .into_iter()
            .zip(matches)
            .map(|(label, element)| NavigationEntry { label, element })
            .collect();
        self.scheduler
            .request_frame(Msg::FrameReady { scroll_offset });
    }

    fn focus(&mut self, row: usize, highlight: HighlightId, color: &str, revert_after: Duration) {
        let Some(entry) = self.entries.get(row) else {
            nav_warn!("no entry for row {}", row);
            return;
        };
        let element = entry.element.clone();
        self.page.scroll_into_center(&element);

        // A second click during a highlight keeps the background from before the first.
        let earlier = self
            .highlights
            .iter()
            .find(|(_, pending)| pending.element == element)
            .map(|(id, _)| *id);
        let prior_background = match earlier.and_then(|id| self.highlights.remove(&id)) {
            Some(pending) => pending.prior_background,
            None => self.page.inline_background(&element),
        };
        self.page.set_inline_background(&element, color);
        self.highlights.insert(
            highlight,
            PendingHighlight {
                element,
                prior_background,
            },
        );
        self.scheduler
            .schedule(revert_after, Msg::HighlightExpired(highlight));
    }
}

fn target_kind<E>(target: &ScrollTarget<E>) -> &'static str {
    match target {
        ScrollTarget::Container(_) => "scroll container",
        ScrollTarget::Page => "page",
    }
}

impl<P: HostPage> Synchronizer<P, ManualScheduler> {
    /// Synchronizer on a virtual clock, for tests and offline snapshots.
    pub fn with_manual_clock(
        config: SyncConfig,
        page: P,
        feed: impl MutationFeed + 'static,
    ) -> Self {
        let mailbox = Mailbox::new();
        let scheduler = ManualScheduler::new(mailbox.sender());
        Self::new(config, page, scheduler, Box::new(feed), mailbox)
    }

    /// Moves the virtual clock forward by `by`, delivering queued messages,
    /// frames and due timers in order.
    pub fn advance(&mut self, by: Duration) {
        let deadline = self.scheduler.now() + by;
        loop {
            self.process_pending_messages();
            if self.scheduler.fire_frames() > 0 {
                continue;
            }
            if !self.scheduler.fire_next_due(deadline) {
                break;
            }
        }
        self.scheduler.settle_at(deadline);
    }

    /// Delivers everything that is ready without moving the clock.
    pub fn settle(&mut self) {
        self.advance(Duration::ZERO);
    }
}
