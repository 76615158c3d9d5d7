use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use chapter_nav_core::Msg;
use chapter_nav_engine::{Scheduler, TimerId};
use nav_logging::nav_warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

use super::port::Port;

/// `setTimeout` / `requestAnimationFrame` scheduler.
///
/// One long-lived callback serves every timer; it receives the timer id as
/// its argument and looks the message up, so cancelled timers fire into nothing.
pub struct WebScheduler {
    window: Window,
    next_id: u64,
    handles: HashMap<TimerId, i32>,
    pending: Rc<RefCell<HashMap<TimerId, Msg>>>,
    frames: Rc<RefCell<VecDeque<Msg>>>,
    frame_requested: Rc<Cell<bool>>,
    on_timeout: Closure<dyn FnMut(JsValue)>,
    on_frame: Closure<dyn FnMut(f64)>,
}

impl WebScheduler {
    pub fn new(window: Window, port: Port) -> Self {
        let pending: Rc<RefCell<HashMap<TimerId, Msg>>> = Rc::default();
        let frames: Rc<RefCell<VecDeque<Msg>>> = Rc::default();
        let frame_requested = Rc::new(Cell::new(false));

        let on_timeout = {
            let pending = pending.clone();
            let port = port.clone();
            Closure::<dyn FnMut(JsValue)>::new(move |arg: JsValue| {
                let Some(raw) = arg.as_f64() else {
                    return;
                };
                let msg = pending.borrow_mut().remove(&TimerId(raw as u64));
                if let Some(msg) = msg {
                    port.post(msg);
                }
            })
        };

        let on_frame = {
            let frames = frames.clone();
            let frame_requested = frame_requested.clone();
            Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
                frame_requested.set(false);
                let due: Vec<Msg> = frames.borrow_mut().drain(..).collect();
                for msg in due {
                    port.post(msg);
                }
            })
        };

        Self {
            window,
            next_id: 0,
            handles: HashMap::new(),
            pending,
            frames,
            frame_requested,
            on_timeout,
            on_frame,
        }
    }
}

impl Scheduler for WebScheduler {
    fn schedule(&mut self, delay: Duration, msg: Msg) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        // Handles of timers that already fired are dead weight.
        let pending = self.pending.borrow();
        self.handles.retain(|live, _| pending.contains_key(live));
        drop(pending);

        self.pending.borrow_mut().insert(id, msg);
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_1(
                self.on_timeout.as_ref().unchecked_ref(),
                millis,
                &JsValue::from_f64(id.0 as f64),
            ) {
            Ok(handle) => {
                self.handles.insert(id, handle);
            }
            Err(err) => {
                nav_warn!("setTimeout failed: {:?}", err);
                self.pending.borrow_mut().remove(&id);
            }
        }
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.borrow_mut().remove(&id);
        if let Some(handle) = self.handles.remove(&id) {
            self.window.clear_timeout_with_handle(handle);
        }
    }

    fn request_frame(&mut self, msg: Msg) {
        self.frames.borrow_mut().push_back(msg);
        if self.frame_requested.get() {
            return;
        }
        match self
            .window
            .request_animation_frame(self.on_frame.as_ref().unchecked_ref())
        {
            Ok(_) => self.frame_requested.set(true),
            Err(err) => nav_warn!("requestAnimationFrame failed: {:?}", err),
        }
    }
}
