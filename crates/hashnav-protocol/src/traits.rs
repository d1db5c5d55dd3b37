//! The [`HashWindow`] trait: the environment the protocol runs in.
//!
//! A window exposes exactly what a browser tab offers for hash navigation:
//! the full URL, two ways of writing it, session history traversal, and
//! registration of `hashchange` handlers. Notifications are delivered from
//! the environment's own event queue, never from inside a write.

use std::rc::Rc;

/// Name of the event fired when the URL fragment changes.
pub const HASH_CHANGE_EVENT: &str = "hashchange";

/// A registered event handler.
pub type HashChangeHandler = Rc<dyn Fn()>;

/// Identifies a handler registration for later removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(pub u64);

/// A browsing context whose URL hash can be read, written and observed.
pub trait HashWindow {
    /// The full current URL, undecoded.
    fn href(&self) -> String;

    /// Set the fragment, appending a session history entry if it changes.
    fn set_hash(&self, hash: &str);

    /// Replace the current session history entry's URL in place.
    fn replace_url(&self, url: &str);

    /// Move `delta` entries through session history.
    fn go(&self, delta: i32);

    /// Attach `handler` to `event`.
    fn add_listener(&self, event: &str, handler: HashChangeHandler) -> HandlerId;

    /// Detach a handler. Returns `false` if it was not attached.
    fn remove_listener(&self, event: &str, id: HandlerId) -> bool;
}

impl<T: HashWindow + ?Sized> HashWindow for Rc<T> {
    fn href(&self) -> String {
        (**self).href()
    }

    fn set_hash(&self, hash: &str) {
        (**self).set_hash(hash)
    }

    fn replace_url(&self, url: &str) {
        (**self).replace_url(url)
    }

    fn go(&self, delta: i32) {
        (**self).go(delta)
    }

    fn add_listener(&self, event: &str, handler: HashChangeHandler) -> HandlerId {
        (**self).add_listener(event, handler)
    }

    fn remove_listener(&self, event: &str, id: HandlerId) -> bool {
        (**self).remove_listener(event, id)
    }
}
