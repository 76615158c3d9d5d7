use std::collections::{BTreeMap, VecDeque};
use std::sync::mpsc;
use std::time::Duration;

use chapter_nav_core::Msg;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Timer and frame facility. Due messages are delivered to the synchronizer's mailbox.
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration, msg: Msg) -> TimerId;
    fn cancel(&mut self, id: TimerId);
    /// Delivers `msg` at the next paint opportunity.
    fn request_frame(&mut self, msg: Msg);
}

/// Virtual clock for tests and offline runs; nothing fires until asked to.
pub struct ManualScheduler {
    msg_tx: mpsc::Sender<Msg>,
    now: Duration,
    next_id: u64,
    timers: BTreeMap<(Duration, TimerId), Msg>,
    frames: VecDeque<Msg>,
}

impl ManualScheduler {
    pub fn new(msg_tx: mpsc::Sender<Msg>) -> Self {
        Self {
            msg_tx,
            now: Duration::ZERO,
            next_id: 0,
            timers: BTreeMap::new(),
            frames: VecDeque::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// Delivers every frame callback queued so far; returns how many fired.
    pub fn fire_frames(&mut self) -> usize {
        let frames: Vec<Msg> = self.frames.drain(..).collect();
        let fired = frames.len();
        for msg in frames {
            let _ = self.msg_tx.send(msg);
        }
        fired
    }

    /// Delivers the earliest timer due no later than `deadline`, moving the clock to it.
    pub fn fire_next_due(&mut self, deadline: Duration) -> bool {
        let Some((&(due, id), _)) = self.timers.iter().next() else {
            return false;
        };
        if due > deadline {
            return false;
        }
        if let Some(msg) = self.timers.remove(&(due, id)) {
            self.now = self.now.max(due);
            let _ = self.msg_tx.send(msg);
        }
        true
    }

    pub(crate) fn settle_at(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration, msg: Msg) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.timers.insert((self.now + delay, id), msg);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.retain(|(_, timer), _| *timer != id);
    }

    fn request_frame(&mut self, msg: Msg) {
        self.frames.push_back(msg);
    }
}
