//! In-memory browsing context for tests and non-browser hosts.
//!
//! [`MemoryWindow`] models one tab: a list of session history entries, a
//! current index, and a FIFO queue of pending `hashchange` notifications.
//! Writes never run handlers directly; they only enqueue. Handlers run when
//! the host drains the queue with [`MemoryWindow::dispatch_pending`], which
//! stands in for the browser's event loop.
//!
//! The browser rules that matter for hash navigation are kept:
//!
//! - Setting the hash to its current value creates no entry and fires nothing.
//! - Any change of fragment queues exactly one notification.
//! - Traversal past either end of the history is ignored.

use std::cell::RefCell;
use std::collections::VecDeque;

use tracing::debug;

use crate::traits::{HandlerId, HashChangeHandler, HashWindow, HASH_CHANGE_EVENT};

/// A fragment change waiting to be delivered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashChange {
    pub old_url: String,
    pub new_url: String,
}

struct Registration {
    id: HandlerId,
    event: String,
    handler: HashChangeHandler,
}

struct WindowState {
    entries: Vec<String>,
    index: usize,
    pending: VecDeque<HashChange>,
    handlers: Vec<Registration>,
    next_id: u64,
}

/// Everything after the first `#`, or `None` if there is no `#`.
fn fragment(url: &str) -> Option<&str> {
    url.find('#').map(|idx| &url[idx + 1..])
}

/// The URL with any fragment removed.
fn without_fragment(url: &str) -> &str {
    url.find('#').map_or(url, |idx| &url[..idx])
}

impl WindowState {
    fn current(&self) -> &str {
        &self.entries[self.index]
    }

    fn queue_if_fragment_changed(&mut self, old_url: String) {
        let new_url = self.current().to_string();
        if fragment(&old_url) != fragment(&new_url) {
            self.pending.push_back(HashChange { old_url, new_url });
        }
    }

    fn push_entry(&mut self, url: String) {
        if url == self.current() {
            return;
        }
        let old_url = self.current().to_string();
        self.entries.truncate(self.index + 1);
        self.entries.push(url);
        self.index += 1;
        self.queue_if_fragment_changed(old_url);
    }
}

/// A simulated browser tab.
pub struct MemoryWindow {
    state: RefCell<WindowState>,
}

impl MemoryWindow {
    /// Open a tab at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            state: RefCell::new(WindowState {
                entries: vec![url.into()],
                index: 0,
                pending: VecDeque::new(),
                handlers: Vec::new(),
                next_id: 0,
            }),
        }
    }

    /// All session history entries, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.state.borrow().entries.clone()
    }

    /// Index of the current entry.
    pub fn index(&self) -> usize {
        self.state.borrow().index
    }

    pub fn history_len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    /// Notifications queued but not yet delivered.
    pub fn pending(&self) -> Vec<HashChange> {
        self.state.borrow().pending.iter().cloned().collect()
    }

    /// Number of attached handlers for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.state
            .borrow()
            .handlers
            .iter()
            .filter(|r| r.event == event)
            .count()
    }

    /// Navigate as the user would by following a link or editing the
    /// address bar.
    pub fn navigate(&self, url: impl Into<String>) {
        self.state.borrow_mut().push_entry(url.into());
    }

    pub fn back(&self) {
        self.go(-1);
    }

    pub fn forward(&self) {
        self.go(1);
    }

    /// Deliver queued notifications in order, including any queued by the
    /// handlers themselves. Returns how many notifications were delivered.
    pub fn dispatch_pending(&self) -> usize {
        let mut delivered = 0;
        loop {
            let Some(change) = self.state.borrow_mut().pending.pop_front() else {
                break;
            };
            debug!(old = %change.old_url, new = %change.new_url, "dispatching hashchange");

            let handlers: Vec<(HandlerId, HashChangeHandler)> = self
                .state
                .borrow()
                .handlers
                .iter()
                .filter(|r| r.event == HASH_CHANGE_EVENT)
                .map(|r| (r.id, r.handler.clone()))
                .collect();

            for (id, handler) in handlers {
                // A handler removed by an earlier handler in this round is skipped.
                if self.is_attached(id) {
                    handler();
                }
            }
            delivered += 1;
        }
        delivered
    }

    fn is_attached(&self, id: HandlerId) -> bool {
        self.state.borrow().handlers.iter().any(|r| r.id == id)
    }
}

impl HashWindow for MemoryWindow {
    fn href(&self) -> String {
        self.state.borrow().current().to_string()
    }

    fn set_hash(&self, hash: &str) {
        let mut state = self.state.borrow_mut();
        let url = format!("{}#{hash}", without_fragment(state.current()));
        state.push_entry(url);
    }

    fn replace_url(&self, url: &str) {
        let mut state = self.state.borrow_mut();
        let index = state.index;
        let old_url = std::mem::replace(&mut state.entries[index], url.to_string());
        state.queue_if_fragment_changed(old_url);
    }

    fn go(&self, delta: i32) {
        let mut state = self.state.borrow_mut();
        let Some(target) = state.index.checked_add_signed(delta as isize) else {
            return;
        };
        if target >= state.entries.len() || target == state.index {
            return;
        }
        let old_url = state.current().to_string();
        state.index = target;
        state.queue_if_fragment_changed(old_url);
    }

    fn add_listener(&self, event: &str, handler: HashChangeHandler) -> HandlerId {
        let mut state = self.state.borrow_mut();
        let id = HandlerId(state.next_id);
        state.next_id += 1;
        state.handlers.push(Registration {
            id,
            event: event.to_string(),
            handler,
        });
        id
    }

    fn remove_listener(&self, event: &str, id: HandlerId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.handlers.len();
        state.handlers.retain(|r| !(r.id == id && r.event == event));
        state.handlers.len() != before
    }
}

impl std::fmt::Debug for MemoryWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MemoryWindow")
            .field("href", &state.current())
            .field("index", &state.index)
            .field("entries", &state.entries.len())
            .field("pending", &state.pending.len())
            .finish()
    }
}
