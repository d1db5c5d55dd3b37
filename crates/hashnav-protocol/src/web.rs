//! Browser window backed by `web_sys`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::traits::{HandlerId, HashChangeHandler, HashWindow};

/// The current browser window.
pub struct WebWindow {
    window: web_sys::Window,
    closures: RefCell<HashMap<HandlerId, Closure<dyn FnMut()>>>,
    next_id: Cell<u64>,
}

impl WebWindow {
    /// The global `window`, if there is one.
    pub fn current() -> Option<Self> {
        web_sys::window().map(Self::new)
    }

    pub fn new(window: web_sys::Window) -> Self {
        Self {
            window,
            closures: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
        }
    }
}

impl HashWindow for WebWindow {
    fn href(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn set_hash(&self, hash: &str) {
        if let Err(err) = self.window.location().set_hash(hash) {
            warn!(?err, "unable to set location hash");
        }
    }

    fn replace_url(&self, url: &str) {
        if let Err(err) = self.window.location().replace(url) {
            warn!(?err, "unable to replace location");
        }
    }

    fn go(&self, delta: i32) {
        let result = self
            .window
            .history()
            .and_then(|history| history.go_with_delta(delta));
        if let Err(err) = result {
            warn!(?err, delta, "unable to traverse session history");
        }
    }

    fn add_listener(&self, event: &str, handler: HashChangeHandler) -> HandlerId {
        let id = HandlerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let closure = Closure::<dyn FnMut()>::new(move || handler());
        if let Err(err) = self
            .window
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            warn!(?err, event, "unable to attach event listener");
        }
        self.closures.borrow_mut().insert(id, closure);
        id
    }

    fn remove_listener(&self, event: &str, id: HandlerId) -> bool {
        let Some(closure) = self.closures.borrow_mut().remove(&id) else {
            return false;
        };
        if let Err(err) = self
            .window
            .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            warn!(?err, event, "unable to detach event listener");
        }
        true
    }
}
