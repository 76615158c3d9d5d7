use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc;

use chapter_nav_core::Msg;

/// Runs the installed drain after a browser callback queued work.
///
/// Wakes that arrive while the drain is already running are dropped; the
/// running drain keeps going until the mailbox is empty.
#[derive(Clone, Default)]
pub struct Pump {
    drain: Rc<RefCell<Option<Box<dyn Fn()>>>>,
}

impl Pump {
    pub fn install(&self, drain: impl Fn() + 'static) {
        *self.drain.borrow_mut() = Some(Box::new(drain));
    }

    pub fn wake(&self) {
        if let Ok(drain) = self.drain.try_borrow() {
            if let Some(drain) = drain.as_ref() {
                drain();
            }
        }
    }
}

/// Sender half handed to browser callbacks.
#[derive(Clone)]
pub struct Port {
    msg_tx: mpsc::Sender<Msg>,
    pump: Pump,
}

impl Port {
    pub fn new(msg_tx: mpsc::Sender<Msg>, pump: Pump) -> Self {
        Self { msg_tx, pump }
    }

    pub fn post(&self, msg: Msg) {
        if self.msg_tx.send(msg).is_ok() {
            self.pump.wake();
        }
    }
}
