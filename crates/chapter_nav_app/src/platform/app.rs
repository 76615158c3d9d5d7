use std::cell::RefCell;
use std::rc::Rc;

use chapter_nav_core::{host_from_url, Msg, SyncConfig};
use chapter_nav_engine::{Mailbox, Synchronizer};
use nav_logging::{nav_info, nav_warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{DocumentReadyState, PageTransitionEvent, Window};

use super::dom::WebPage;
use super::logging;
use super::observer::DomMutationFeed;
use super::port::{Port, Pump};
use super::timers::WebScheduler;

type Sidebar = Synchronizer<WebPage, WebScheduler>;

thread_local! {
    static SIDEBAR: RefCell<Option<Rc<RefCell<Sidebar>>>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn run_app() -> Result<(), JsValue> {
    logging::initialize(log::Level::Info);

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let mailbox = Mailbox::new();
    let pump = Pump::default();
    let port = Port::new(mailbox.sender(), pump.clone());
    let sidebar = Rc::new(RefCell::new(Synchronizer::new(
        SyncConfig::default(),
        WebPage::new(window.clone(), document.clone(), port.clone()),
        WebScheduler::new(window.clone(), port.clone()),
        Box::new(DomMutationFeed::new(document.clone(), pump.clone())),
        mailbox,
    )));

    let weak = Rc::downgrade(&sidebar);
    pump.install(move || {
        let Some(sidebar) = weak.upgrade() else {
            return;
        };
        // Already borrowed means an outer drain is running and will see the message.
        if let Ok(mut sidebar) = sidebar.try_borrow_mut() {
            sidebar.process_pending_messages();
        }
    });
    SIDEBAR.with(|slot| *slot.borrow_mut() = Some(sidebar));

    if document.ready_state() == DocumentReadyState::Complete {
        start(&window, &pump);
    } else {
        let loaded = window.clone();
        let on_load = Closure::once_into_js(move || start(&loaded, &pump));
        window.add_event_listener_with_callback("load", on_load.unchecked_ref())?;
    }

    // `pagehide` fires again each time a cached page is left, so the listener lives on.
    let on_hide = Closure::<dyn FnMut(PageTransitionEvent)>::new(
        move |event: PageTransitionEvent| {
            port.post(Msg::PageHidden {
                persisted: event.persisted(),
            });
        },
    );
    window.add_event_listener_with_callback("pagehide", on_hide.as_ref().unchecked_ref())?;
    on_hide.forget();
    Ok(())
}

fn start(window: &Window, pump: &Pump) {
    let location = window.location();
    let host = location
        .href()
        .ok()
        .and_then(|href| host_from_url(&href))
        .or_else(|| location.hostname().ok())
        .unwrap_or_default();
    nav_info!("starting on {}", host);

    with_sidebar(|sidebar| sidebar.start(&host));
    pump.wake();
}

fn with_sidebar(f: impl FnOnce(&mut Sidebar)) {
    let sidebar = SIDEBAR.with(|slot| slot.borrow().clone());
    match sidebar {
        Some(sidebar) => match sidebar.try_borrow_mut() {
            Ok(mut sidebar) => f(&mut sidebar),
            Err(_) => nav_warn!("sidebar busy; call dropped"),
        },
        None => nav_warn!("sidebar not initialized"),
    }
}
