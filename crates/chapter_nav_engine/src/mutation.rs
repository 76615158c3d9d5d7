use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chapter_nav_core::MutationBatch;

use crate::PageError;

/// Handler invoked with each batch of child-list changes.
pub type MutationSink = Box<dyn Fn(MutationBatch)>;

/// Source of document mutation notifications.
pub trait MutationFeed {
    /// Registers `sink` for the document body and all descendants.
    fn subscribe(&mut self, sink: MutationSink) -> Result<Subscription, PageError>;
}

/// Live registration with a feed; disconnects when dropped.
pub struct Subscription {
    disconnect: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(disconnect: impl FnOnce() + 'static) -> Self {
        Self {
            disconnect: Some(Box::new(disconnect)),
        }
    }

    pub fn disconnect(mut self) {
        if let Some(disconnect) = self.disconnect.take() {
            disconnect();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(disconnect) = self.disconnect.take() {
            disconnect();
        }
    }
}

type SinkList = Rc<RefCell<Vec<(u64, Rc<MutationSink>)>>>;

/// In-process feed driven by hand; clones share the same subscribers.
#[derive(Clone, Default)]
pub struct SyntheticMutationFeed {
    sinks: SinkList,
    next_id: Rc<Cell<u64>>,
}

impl SyntheticMutationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `batch` to every current subscriber.
    pub fn emit(&self, batch: MutationBatch) {
        let sinks: Vec<Rc<MutationSink>> =
            self.sinks.borrow().iter().map(|(_, sink)| sink.clone()).collect();
        for sink in sinks {
            sink(batch);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sinks.borrow().len()
    }
}

impl MutationFeed for SyntheticMutationFeed {
    fn subscribe(&mut self, sink: MutationSink) -> Result<Subscription, PageError> {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.sinks.borrow_mut().push((id, Rc::new(sink)));

        let sinks = self.sinks.clone();
        Ok(Subscription::new(move || {
            sinks.borrow_mut().retain(|(sink_id, _)| *sink_id != id);
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chapter_nav_core::MutationBatch;

    use super::{MutationFeed, SyntheticMutationFeed};

    #[test]
    fn emitted_batches_reach_subscribers_until_dropped() {
        let mut feed = SyntheticMutationFeed::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink_seen = seen.clone();
        let subscription = feed
            .subscribe(Box::new(move |batch| sink_seen.borrow_mut().push(batch)))
            .unwrap();

        let batch = MutationBatch {
            added: 2,
            removed: 1,
        };
        feed.emit(batch);
        assert_eq!(*seen.borrow(), vec![batch]);
        assert_eq!(feed.subscriber_count(), 1);

        drop(subscription);
        feed.emit(batch);
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(feed.subscriber_count(), 0);
    }
}
