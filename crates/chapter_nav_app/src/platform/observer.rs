use chapter_nav_core::MutationBatch;
use chapter_nav_engine::{MutationFeed, MutationSink, PageError, Subscription};
use js_sys::Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, MutationObserver, MutationObserverInit, MutationRecord};

use super::port::Pump;

/// `MutationObserver` over the document body and its whole subtree.
pub struct DomMutationFeed {
    document: Document,
    pump: Pump,
}

impl DomMutationFeed {
    pub fn new(document: Document, pump: Pump) -> Self {
        Self { document, pump }
    }
}

impl MutationFeed for DomMutationFeed {
    fn subscribe(&mut self, sink: MutationSink) -> Result<Subscription, PageError> {
        let body = self
            .document
            .body()
            .ok_or_else(|| PageError::Unavailable("document has no body".to_string()))?;

        let pump = self.pump.clone();
        let callback = Closure::<dyn FnMut(Array, MutationObserver)>::new(
            move |records: Array, _observer: MutationObserver| {
                sink(summarize(&records));
                pump.wake();
            },
        );
        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|err| PageError::Unavailable(format!("{err:?}")))?;

        let options = MutationObserverInit::new();
        options.set_child_list(true);
        options.set_subtree(true);
        observer
            .observe_with_options(&body, &options)
            .map_err(|err| PageError::Unavailable(format!("{err:?}")))?;

        Ok(Subscription::new(move || {
            observer.disconnect();
            drop(callback);
        }))
    }
}

fn summarize(records: &Array) -> MutationBatch {
    let mut batch = MutationBatch::default();
    for record in records.iter() {
        let Ok(record) = record.dyn_into::<MutationRecord>() else {
            continue;
        };
        batch.added += record.added_nodes().length() as usize;
        batch.removed += record.removed_nodes().length() as usize;
    }
    batch
}
