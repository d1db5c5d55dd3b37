//! [`HashProtocol`]: keeps a [`Location`] model in sync with the URL hash.
//!
//! The hash is one mutable string that three parties write: the user (links,
//! address bar, back/forward), this protocol's own push/replace, and this
//! protocol's encoding normalization. Only the first should reach a listener.
//!
//! The protocol tells them apart with a "previous location" cell:
//!
//! - push/replace record the location they are about to write *before*
//!   writing it, so the notification their write causes later finds an
//!   equivalent previous location and is dropped;
//! - a notification whose raw hash is not in encoded form is answered with
//!   an in-place rewrite and otherwise ignored; the rewrite's own
//!   notification then goes through the normal path;
//! - everything else is compared against the previous location and, if it
//!   is new, recorded and delivered.
//!
//! A protocol registers at most one window handler no matter how many
//! listeners it has. Each notification is filtered once and then delivered
//! to every attached listener.
//!
//! The cell belongs to one protocol instance, so independent protocols over
//! independent windows never see each other's history.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, error, warn};

use hashnav_path::{add_query_value, PathCoder};
use hashnav_store::StateStore;
use hashnav_types::{create_key, is_valid_key, Action, Location};

use crate::config::{validate_query_key, HashHistoryConfig};
use crate::error::ProtocolResult;
use crate::hash::{get_hash_path, push_hash_path, replace_hash_path};
use crate::location::read_location;
use crate::traits::{HandlerId, HashChangeHandler, HashWindow, HASH_CHANGE_EVENT};

/// What a push or replace did to the hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The hash was written.
    Written,
    /// The hash already held the target path; nothing was written.
    Unchanged,
}

/// Returns `true` if `current` is the entry `prev` already describes.
///
/// Only the previous location gets its basename re-applied: locations read
/// back from the hash carry the full path in `pathname`, while locations
/// handed to push/replace carry the basename separately.
fn is_redundant(prev: &Location, current: &Location) -> bool {
    if let (Some(current_key), Some(prev_key)) = (&current.key, &prev.key) {
        if current_key == prev_key {
            return true;
        }
    }
    let current_route = format!("{}{}", current.pathname, current.search);
    current_route == prev.route()
}

type Listener = Rc<dyn Fn(&Location)>;

struct Shared<W, S> {
    window: W,
    store: S,
    coder: Box<dyn PathCoder>,
    query_key: String,
    prev: RefCell<Option<Location>>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_listener: Cell<u64>,
    handler: Cell<Option<HandlerId>>,
}

impl<W: HashWindow, S: StateStore> Shared<W, S> {
    fn read_current(&self) -> ProtocolResult<Location> {
        read_location(&self.window, &self.store, self.coder.as_ref(), &self.query_key)
    }

    /// Rewrite the hash in place if it is not in encoded form.
    /// Returns `true` if a rewrite happened.
    fn normalize_hash(&self) -> bool {
        let path = get_hash_path(&self.window);
        let encoded = self.coder.encode_path(&path);
        if path == encoded {
            return false;
        }
        debug!(%path, %encoded, "normalizing hash encoding");
        replace_hash_path(&self.window, &encoded);
        true
    }

    fn seed_previous(&self, location: &Location) {
        let mut prev = self.prev.borrow_mut();
        if prev.is_none() {
            *prev = Some(location.clone());
        }
    }

    fn is_listening(&self, id: u64) -> bool {
        self.listeners.borrow().iter().any(|(l, _)| *l == id)
    }

    fn detach_listener(&self, id: u64) {
        let remaining = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.retain(|(l, _)| *l != id);
            listeners.len()
        };
        if remaining == 0 {
            if let Some(handler) = self.handler.take() {
                self.window.remove_listener(HASH_CHANGE_EVENT, handler);
            }
        }
    }

    fn handle_hash_change(&self) {
        if self.normalize_hash() {
            return;
        }

        let current = match self.read_current() {
            Ok(location) => location,
            Err(e) => {
                error!(error = %e, "dropping hash change; unable to read location");
                return;
            }
        };

        let redundant = self
            .prev
            .borrow()
            .as_ref()
            .is_some_and(|prev| is_redundant(prev, &current));
        if redundant {
            debug!(pathname = %current.pathname, "ignoring extraneous hash change");
            return;
        }

        *self.prev.borrow_mut() = Some(current.clone());

        let listeners: Vec<(u64, Listener)> = self.listeners.borrow().clone();
        for (id, listener) in listeners {
            // A listener detached by an earlier one in this round is skipped.
            if self.is_listening(id) {
                listener(&current);
            }
        }
    }

    fn update_location(
        &self,
        location: &Location,
        action: Action,
        apply: impl FnOnce(&W, &str) -> UpdateOutcome,
    ) -> ProtocolResult<UpdateOutcome> {
        let mut path = self.coder.encode_path(&location.path());
        let mut recorded = location.clone().with_action(action);

        if let Some(state) = location.state.as_ref() {
            let key = match location.key.as_deref() {
                Some(key) if is_valid_key(key) => key.to_string(),
                Some(key) => {
                    let generated = create_key();
                    debug!(%key, %generated, "replacing key that cannot travel in the hash");
                    generated
                }
                None => create_key(),
            };
            path = add_query_value(&path, &self.query_key, &key);
            self.store.save_state(&key, Some(state))?;
            recorded.key = Some(key);
        }

        *self.prev.borrow_mut() = Some(recorded);

        Ok(apply(&self.window, &path))
    }
}

/// Hash navigation over a window and a state store.
///
/// Cloning is cheap and yields a handle to the same protocol instance.
pub struct HashProtocol<W, S> {
    shared: Rc<Shared<W, S>>,
}

impl<W, S> Clone for HashProtocol<W, S> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<W, S> HashProtocol<W, S>
where
    W: HashWindow + 'static,
    S: StateStore + 'static,
{
    /// Create a protocol from configuration.
    pub fn new(window: W, store: S, config: &HashHistoryConfig) -> ProtocolResult<Self> {
        Self::with_coder(
            window,
            store,
            config.hash_type.coder(),
            config.query_key.clone(),
        )
    }

    /// Create a protocol with an explicit codec.
    ///
    /// The query key is checked the same way as in [`HashHistoryConfig::validate`].
    pub fn with_coder(
        window: W,
        store: S,
        coder: Box<dyn PathCoder>,
        query_key: impl Into<String>,
    ) -> ProtocolResult<Self> {
        let query_key = query_key.into();
        validate_query_key(&query_key)?;
        Ok(Self {
            shared: Rc::new(Shared {
                window,
                store,
                coder,
                query_key,
                prev: RefCell::new(None),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
                handler: Cell::new(None),
            }),
        })
    }

    pub fn window(&self) -> &W {
        &self.shared.window
    }

    pub fn store(&self) -> &S {
        &self.shared.store
    }

    pub fn query_key(&self) -> &str {
        &self.shared.query_key
    }

    /// The location most recently recorded for deduplication.
    pub fn previous_location(&self) -> Option<Location> {
        self.shared.prev.borrow().clone()
    }

    /// The location the hash currently points at.
    ///
    /// The first read also seeds the previous location, so a notification
    /// for the entry the application started on is not reported again.
    pub fn current_location(&self) -> ProtocolResult<Location> {
        let location = self.shared.read_current()?;
        self.shared.seed_previous(&location);
        Ok(location)
    }

    /// Start delivering navigation events to `listener`.
    ///
    /// The hash is normalized to its encoded form first, silently. The
    /// returned [`Subscription`] detaches the listener when unsubscribed or
    /// dropped.
    pub fn start_listener<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Location) + 'static,
    {
        self.shared.normalize_hash();
        match self.shared.read_current() {
            Ok(location) => self.shared.seed_previous(&location),
            Err(e) => warn!(error = %e, "unable to read initial location"),
        }

        let id = self.shared.next_listener.get();
        self.shared.next_listener.set(id + 1);
        self.shared
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));

        if self.shared.handler.get().is_none() {
            let weak = Rc::downgrade(&self.shared);
            let handler: HashChangeHandler = Rc::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.handle_hash_change();
                }
            });
            let handler_id = self.shared.window.add_listener(HASH_CHANGE_EVENT, handler);
            self.shared.handler.set(Some(handler_id));
        }

        let shared = Rc::clone(&self.shared);
        Subscription {
            detach: Some(Box::new(move || shared.detach_listener(id))),
        }
    }

    /// Navigate to `location` with a new history entry.
    ///
    /// Pushing the path the hash already holds is a caller error: it is
    /// logged and nothing is written. A caller-supplied key that could not
    /// be read back from the hash is replaced with a generated one.
    pub fn push_location(&self, location: &Location) -> ProtocolResult<UpdateOutcome> {
        self.shared
            .update_location(location, Action::Push, |window, path| {
                if get_hash_path(window) != path {
                    push_hash_path(window, path);
                    UpdateOutcome::Written
                } else {
                    warn!(%path, "cannot push the same path using hash history");
                    UpdateOutcome::Unchanged
                }
            })
    }

    /// Navigate to `location` by rewriting the current history entry.
    pub fn replace_location(&self, location: &Location) -> ProtocolResult<UpdateOutcome> {
        self.shared
            .update_location(location, Action::Replace, |window, path| {
                if get_hash_path(window) != path {
                    replace_hash_path(window, path);
                    UpdateOutcome::Written
                } else {
                    UpdateOutcome::Unchanged
                }
            })
    }

    /// Move `delta` entries through session history.
    pub fn go(&self, delta: i32) {
        self.shared.window.go(delta);
    }

    pub fn go_back(&self) {
        self.go(-1);
    }

    pub fn go_forward(&self) {
        self.go(1);
    }
}

/// An active change listener.
#[must_use = "dropping a Subscription detaches its listener"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Detach the listener. Further calls do nothing.
    pub fn unsubscribe(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }

    pub fn is_active(&self) -> bool {
        self.detach.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use hashnav_path::HashType;
    use hashnav_store::{
        FaultKind, MemoryStorage, SessionStateStore, StoreError, StoreResult,
    };
    use serde_json::{json, Value};

    use super::*;
    use crate::error::ProtocolError;
    use crate::memory::MemoryWindow;

    type Store = SessionStateStore<Rc<MemoryStorage>>;
    type Protocol = HashProtocol<Rc<MemoryWindow>, Store>;

    struct Harness {
        window: Rc<MemoryWindow>,
        storage: Rc<MemoryStorage>,
        protocol: Protocol,
        seen: Rc<RefCell<Vec<Location>>>,
    }

    impl Harness {
        fn new(url: &str) -> Self {
            Self::with_config(url, HashHistoryConfig::default())
        }

        fn with_config(url: &str, config: HashHistoryConfig) -> Self {
            let _ = tracing_subscriber::fmt().with_test_writer().try_init();
            let window = Rc::new(MemoryWindow::new(url));
            let storage = Rc::new(MemoryStorage::new());
            let store = SessionStateStore::new(storage.clone());
            let protocol = HashProtocol::new(window.clone(), store, &config).unwrap();
            Self {
                window,
                storage,
                protocol,
                seen: Rc::new(RefCell::new(Vec::new())),
            }
        }

        fn listen(&self) -> Subscription {
            let seen = self.seen.clone();
            self.protocol
                .start_listener(move |loc| seen.borrow_mut().push(loc.clone()))
        }

        fn seen_paths(&self) -> Vec<String> {
            self.seen.borrow().iter().map(Location::path).collect()
        }

        fn hash(&self) -> String {
            get_hash_path(self.window.as_ref())
        }
    }

    // ---- Listener activation ----

    #[test]
    fn activation_normalizes_hash_silently() {
        let h = Harness::new("http://app.test/#inbox");
        let _sub = h.listen();

        assert_eq!(h.hash(), "/inbox");
        assert_eq!(h.window.history_len(), 1);

        h.window.dispatch_pending();
        assert!(h.seen.borrow().is_empty());
    }

    #[test]
    fn activation_on_encoded_hash_writes_nothing() {
        let h = Harness::new("http://app.test/#/inbox");
        let _sub = h.listen();
        assert!(h.window.pending().is_empty());
    }

    #[test]
    fn activation_on_empty_hash_writes_root() {
        let h = Harness::new("http://app.test/");
        let _sub = h.listen();
        assert_eq!(h.window.href(), "http://app.test/#/");

        h.window.dispatch_pending();
        assert!(h.seen.borrow().is_empty());
    }

    // ---- Change handling ----

    #[test]
    fn user_navigation_reaches_listener() {
        let h = Harness::new("http://app.test/#/a");
        let _sub = h.listen();

        h.window.navigate("http://app.test/#/b?x=1");
        h.window.dispatch_pending();

        assert_eq!(h.seen_paths(), vec!["/b?x=1"]);
        assert_eq!(h.protocol.previous_location().unwrap().pathname, "/b");
    }

    #[test]
    fn unencoded_change_is_normalized_then_delivered_once() {
        let h = Harness::new("http://app.test/#/a");
        let _sub = h.listen();

        h.window.navigate("http://app.test/#b");
        h.window.dispatch_pending();

        assert_eq!(h.hash(), "/b");
        assert_eq!(h.seen_paths(), vec!["/b"]);
    }

    #[test]
    fn same_key_twice_is_delivered_once() {
        let h = Harness::new("http://app.test/#/a");
        let _sub = h.listen();

        h.window.navigate("http://app.test/#/x?_k=abc");
        assert_eq!(h.window.dispatch_pending(), 1);
        h.window.navigate("http://app.test/#/y?_k=abc");
        assert_eq!(h.window.dispatch_pending(), 1);

        assert_eq!(h.seen_paths(), vec!["/x"]);
    }

    #[test]
    fn same_route_twice_is_delivered_once() {
        let h = Harness::new("http://app.test/#/a");
        let _sub = h.listen();

        h.window.navigate("http://app.test/#/b");
        h.window.dispatch_pending();
        h.window.navigate("http://app.test/#/b#frag");
        h.window.dispatch_pending();

        assert_eq!(h.seen_paths(), vec!["/b"]);
    }

    #[test]
    fn back_and_forward_are_delivered_with_state() {
        let h = Harness::new("http://app.test/#/a");
        let _sub = h.listen();

        let target = Location::parse("/b").with_state(json!({"scroll": 120}));
        h.protocol.push_location(&target).unwrap();
        h.window.dispatch_pending();
        assert!(h.seen.borrow().is_empty());

        h.protocol.go_back();
        h.window.dispatch_pending();
        h.protocol.go_forward();
        h.window.dispatch_pending();

        let seen = h.seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].pathname, "/a");
        assert!(seen[0].state.is_none());
        assert_eq!(seen[1].pathname, "/b");
        assert_eq!(seen[1].state, Some(json!({"scroll": 120})));
        assert_eq!(seen[1].key, target.key);
    }

    #[test]
    fn listener_may_navigate_reentrantly() {
        let h = Harness::new("http://app.test/#/a");
        let protocol = h.protocol.clone();
        let seen = h.seen.clone();
        let _sub = h.protocol.start_listener(move |loc| {
            seen.borrow_mut().push(loc.clone());
            if loc.pathname == "/old" {
                protocol.replace_location(&Location::parse("/new")).unwrap();
            }
        });

        h.window.navigate("http://app.test/#/old");
        h.window.dispatch_pending();

        assert_eq!(h.hash(), "/new");
        assert_eq!(h.seen_paths(), vec!["/old"]);
    }

    #[test]
    fn store_failure_in_handler_drops_notification() {
        let h = Harness::new("http://app.test/#/a");
        let _sub = h.listen();

        h.storage.inject_fault(Some(FaultKind::Other));
        h.window.navigate("http://app.test/#/b?_k=abc");
        h.window.dispatch_pending();

        assert!(h.seen.borrow().is_empty());
    }

    // ---- Unsubscribe ----

    #[test]
    fn unsubscribe_stops_delivery_and_is_idempotent() {
        let h = Harness::new("http://app.test/#/a");
        let mut sub = h.listen();
        assert_eq!(h.window.listener_count(HASH_CHANGE_EVENT), 1);

        sub.unsubscribe();
        sub.unsubscribe();
        assert!(!sub.is_active());
        assert_eq!(h.window.listener_count(HASH_CHANGE_EVENT), 0);

        h.window.navigate("http://app.test/#/b");
        h.window.dispatch_pending();
        assert!(h.seen.borrow().is_empty());
    }

    #[test]
    fn unsubscribe_before_dispatch_drops_queued_change() {
        let h = Harness::new("http://app.test/#/a");
        let mut sub = h.listen();

        h.window.navigate("http://app.test/#/b");
        sub.unsubscribe();
        h.window.dispatch_pending();
        assert!(h.seen.borrow().is_empty());
    }

    #[test]
    fn dropping_subscription_detaches() {
        let h = Harness::new("http://app.test/#/a");
        {
            let _sub = h.listen();
            assert_eq!(h.window.listener_count(HASH_CHANGE_EVENT), 1);
        }
        assert_eq!(h.window.listener_count(HASH_CHANGE_EVENT), 0);
    }

    #[test]
    fn resubscribing_creates_independent_listener() {
        let h = Harness::new("http://app.test/#/a");
        let mut first = h.listen();
        first.unsubscribe();
        let _second = h.listen();

        h.window.navigate("http://app.test/#/b");
        h.window.dispatch_pending();
        assert_eq!(h.seen_paths(), vec!["/b"]);
    }

    #[test]
    fn every_listener_receives_each_change() {
        let h = Harness::new("http://app.test/#/a");
        let _first = h.listen();
        let second_seen = Rc::new(RefCell::new(Vec::new()));
        let s = second_seen.clone();
        let _second = h
            .protocol
            .start_listener(move |loc: &Location| s.borrow_mut().push(loc.path()));
        assert_eq!(h.window.listener_count(HASH_CHANGE_EVENT), 1);

        h.window.navigate("http://app.test/#/b");
        h.window.dispatch_pending();

        assert_eq!(h.seen_paths(), vec!["/b"]);
        assert_eq!(*second_seen.borrow(), vec!["/b"]);
    }

    #[test]
    fn detaching_one_listener_keeps_the_others() {
        let h = Harness::new("http://app.test/#/a");
        let mut first = h.listen();
        let second = h.listen();

        first.unsubscribe();
        assert_eq!(h.window.listener_count(HASH_CHANGE_EVENT), 1);

        h.window.navigate("http://app.test/#/b");
        h.window.dispatch_pending();
        assert_eq!(h.seen_paths(), vec!["/b"]);

        drop(second);
        assert_eq!(h.window.listener_count(HASH_CHANGE_EVENT), 0);
    }

    #[test]
    fn listener_detached_mid_delivery_is_skipped() {
        let h = Harness::new("http://app.test/#/a");
        let later: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let l = later.clone();
        let _first = h.protocol.start_listener(move |_: &Location| {
            if let Some(mut sub) = l.borrow_mut().take() {
                sub.unsubscribe();
            }
        });
        *later.borrow_mut() = Some(h.listen());

        h.window.navigate("http://app.test/#/b");
        h.window.dispatch_pending();
        assert!(h.seen.borrow().is_empty());
    }

    #[test]
    fn independent_protocols_do_not_share_previous_location() {
        let one = Harness::new("http://one.test/#/a");
        let two = Harness::new("http://two.test/#/a");
        let _s1 = one.listen();
        let _s2 = two.listen();

        one.protocol.push_location(&Location::parse("/b")).unwrap();
        two.window.navigate("http://two.test/#/b");
        two.window.dispatch_pending();

        assert_eq!(two.seen_paths(), vec!["/b"]);
    }

    // ---- Push / replace ----

    #[test]
    fn push_writes_new_entry_and_suppresses_own_notification() {
        let h = Harness::new("http://app.test/#/a");
        let _sub = h.listen();

        let outcome = h.protocol.push_location(&Location::parse("/b?q=1")).unwrap();
        assert_eq!(outcome, UpdateOutcome::Written);
        assert_eq!(h.hash(), "/b?q=1");
        assert_eq!(h.window.history_len(), 2);

        h.window.dispatch_pending();
        assert!(h.seen.borrow().is_empty());
    }

    #[test]
    fn push_same_path_is_a_no_op() {
        let h = Harness::new("http://app.test/#/a");
        let outcome = h.protocol.push_location(&Location::parse("/a")).unwrap();

        assert_eq!(outcome, UpdateOutcome::Unchanged);
        assert_eq!(h.window.history_len(), 1);
        assert!(h.window.pending().is_empty());
    }

    #[test]
    fn push_with_state_embeds_key_and_persists() {
        let h = Harness::new("http://app.test/#/a");
        let loc = Location::parse("/b").with_key("k1").with_state(json!([1, 2]));

        h.protocol.push_location(&loc).unwrap();

        assert_eq!(h.hash(), "/b?_k=k1");
        assert_eq!(h.protocol.store().read_state("k1").unwrap(), Some(json!([1, 2])));
        let current = h.protocol.current_location().unwrap();
        assert_eq!(current.pathname, "/b");
        assert_eq!(current.state, Some(json!([1, 2])));
    }

    #[test]
    fn state_without_key_gets_generated_key() {
        let h = Harness::new("http://app.test/#/a");
        let loc = Location {
            state: Some(json!("s")),
            ..Location::parse("/b")
        };

        h.protocol.push_location(&loc).unwrap();

        let recorded = h.protocol.previous_location().unwrap();
        let key = recorded.key.expect("generated key");
        assert_eq!(h.hash(), format!("/b?_k={key}"));
    }

    #[test]
    fn unreadable_key_is_replaced_with_generated_key() {
        let h = Harness::new("http://app.test/#/a");
        let _sub = h.listen();

        let loc = Location::parse("/b")
            .with_key("my-key")
            .with_state(json!({"x": 1}));
        h.protocol.push_location(&loc).unwrap();

        let key = h.protocol.previous_location().unwrap().key.expect("key");
        assert_ne!(key, "my-key");
        assert!(hashnav_types::is_valid_key(&key));
        assert_eq!(h.hash(), format!("/b?_k={key}"));

        h.window.dispatch_pending();
        assert!(h.seen.borrow().is_empty());

        let current = h.protocol.current_location().unwrap();
        assert_eq!(current.search, "");
        assert_eq!(current.state, Some(json!({"x": 1})));
    }

    #[test]
    fn push_and_replace_record_their_action() {
        let h = Harness::new("http://app.test/#/a");

        h.protocol.push_location(&Location::parse("/b")).unwrap();
        assert_eq!(h.protocol.previous_location().unwrap().action, Action::Push);

        h.protocol.replace_location(&Location::parse("/c")).unwrap();
        assert_eq!(
            h.protocol.previous_location().unwrap().action,
            Action::Replace
        );
    }

    #[test]
    fn replace_rewrites_in_place() {
        let h = Harness::new("http://app.test/#/a");
        let _sub = h.listen();

        let outcome = h.protocol.replace_location(&Location::parse("/b")).unwrap();
        assert_eq!(outcome, UpdateOutcome::Written);
        assert_eq!(h.window.history_len(), 1);
        assert_eq!(h.hash(), "/b");

        h.window.dispatch_pending();
        assert!(h.seen.borrow().is_empty());
    }

    #[test]
    fn replace_same_path_is_silent_no_op() {
        let h = Harness::new("http://app.test/#/a");
        let outcome = h.protocol.replace_location(&Location::parse("/a")).unwrap();
        assert_eq!(outcome, UpdateOutcome::Unchanged);
        assert!(h.window.pending().is_empty());
    }

    #[test]
    fn push_with_basename_suppresses_own_notification() {
        let h = Harness::new("http://app.test/#/app/a");
        let _sub = h.listen();

        let loc = Location::parse("/b").with_basename("/app");
        h.protocol.push_location(&loc).unwrap();
        assert_eq!(h.hash(), "/app/b");

        h.window.dispatch_pending();
        assert!(h.seen.borrow().is_empty());
    }

    #[test]
    fn push_uses_configured_codec_and_query_key() {
        let config = HashHistoryConfig::default()
            .with_hash_type(HashType::HashBang)
            .with_query_key("sk");
        let h = Harness::with_config("http://app.test/#!/a", config);
        let _sub = h.listen();

        let loc = Location::parse("/b").with_key("k9").with_state(json!(1));
        h.protocol.push_location(&loc).unwrap();
        assert_eq!(h.hash(), "!/b?sk=k9");

        h.window.dispatch_pending();
        assert!(h.seen.borrow().is_empty());
        assert_eq!(h.protocol.current_location().unwrap().state, Some(json!(1)));
    }

    #[test]
    fn unrecognized_store_failure_aborts_push() {
        let h = Harness::new("http://app.test/#/a");
        h.storage.inject_fault(Some(FaultKind::Other));

        let loc = Location::parse("/b").with_state(json!(1));
        let err = h.protocol.push_location(&loc).unwrap_err();

        assert!(matches!(err, ProtocolError::Store(StoreError::Storage(_))));
        assert_eq!(h.hash(), "/a");
        assert!(h.protocol.previous_location().is_none());
    }

    #[test]
    fn blocked_store_still_navigates() {
        let h = Harness::new("http://app.test/#/a");
        h.storage.inject_fault(Some(FaultKind::Security));

        let loc = Location::parse("/b").with_key("k1").with_state(json!(1));
        h.protocol.push_location(&loc).unwrap();

        assert_eq!(h.hash(), "/b?_k=k1");
        assert!(h.protocol.current_location().unwrap().state.is_none());
    }

    #[test]
    fn invalid_query_key_is_rejected() {
        let window = Rc::new(MemoryWindow::new("http://app.test/"));
        let store = SessionStateStore::new(Rc::new(MemoryStorage::new()));
        let config = HashHistoryConfig::default().with_query_key("a=b");
        assert!(HashProtocol::new(window, store, &config).is_err());
    }

    #[test]
    fn explicit_coder_validates_query_key() {
        for bad in ["", "a&b"] {
            let window = Rc::new(MemoryWindow::new("http://app.test/"));
            let store = SessionStateStore::new(Rc::new(MemoryStorage::new()));
            let result = HashProtocol::with_coder(window, store, HashType::Slash.coder(), bad);
            assert!(matches!(result, Err(ProtocolError::InvalidQueryKey { .. })));
        }
    }

    // ---- Store interaction ordering ----

    /// Records every save together with the hash at the time of the call.
    struct RecordingStore {
        window: Rc<MemoryWindow>,
        inner: SessionStateStore<MemoryStorage>,
        saves: RefCell<Vec<(String, String)>>,
    }

    impl StateStore for RecordingStore {
        fn save_state(&self, key: &str, state: Option<&Value>) -> StoreResult<()> {
            self.saves
                .borrow_mut()
                .push((key.to_string(), get_hash_path(self.window.as_ref())));
            self.inner.save_state(key, state)
        }

        fn read_state(&self, key: &str) -> StoreResult<Option<Value>> {
            self.inner.read_state(key)
        }
    }

    #[test]
    fn replace_with_state_saves_once_before_writing_hash() {
        let window = Rc::new(MemoryWindow::new("http://app.test/#/a"));
        let store = Rc::new(RecordingStore {
            window: window.clone(),
            inner: SessionStateStore::new(MemoryStorage::new()),
            saves: RefCell::new(Vec::new()),
        });
        let protocol =
            HashProtocol::new(window.clone(), store.clone(), &HashHistoryConfig::default())
                .unwrap();

        let loc = Location::parse("/b").with_state(json!({"y": 2}));
        protocol.replace_location(&loc).unwrap();

        let saves = store.saves.borrow();
        assert_eq!(saves.len(), 1);
        assert_eq!(Some(&saves[0].0), loc.key.as_ref());
        assert_eq!(saves[0].1, "/a");
        assert_eq!(store.read_state(&saves[0].0).unwrap(), Some(json!({"y": 2})));
    }

    // ---- Deduplication rule ----

    #[test]
    fn redundant_by_key() {
        let prev = Location::parse("/a").with_key("k");
        let current = Location::parse("/b").with_key("k");
        assert!(is_redundant(&prev, &current));
    }

    #[test]
    fn not_redundant_when_only_prev_has_key() {
        let prev = Location::parse("/a").with_key("k");
        let current = Location::parse("/b");
        assert!(!is_redundant(&prev, &current));
    }

    #[test]
    fn basename_applies_to_previous_only() {
        let prev = Location::parse("/a").with_basename("/app");
        assert!(is_redundant(&prev, &Location::parse("/app/a")));

        let current = Location::parse("/a").with_basename("/app");
        assert!(!is_redundant(&Location::parse("/app/a"), &current));
    }
}
