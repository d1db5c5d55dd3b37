//! Session-scoped persistence for navigation state.
//!
//! Location state cannot ride along in the URL, so each stateful history
//! entry stores its state under a key in a storage medium that lives as long
//! as the browsing session. This crate provides that store and the seam to
//! the medium itself.
//!
//! # Degraded storage
//!
//! Session storage may be missing, blocked by privacy settings, or report a
//! zero quota in private browsing modes. None of these may break
//! navigation: the store logs a warning and behaves as if nothing was
//! persisted. Only failures it cannot classify reach the caller.
//!
//! # Backends
//!
//! All backends implement [`StorageBackend`]:
//!
//! - [`MemoryStorage`] — `BTreeMap`-backed, with fault injection for tests
//! - `WebSessionStorage` — `window.sessionStorage` (feature `web`)

pub mod error;
pub mod memory;
pub mod session;
pub mod traits;
#[cfg(feature = "web")]
pub mod web;

pub use error::{FaultKind, StorageFault, StoreError, StoreResult};
pub use memory::MemoryStorage;
pub use session::{storage_key, SessionStateStore, KEY_PREFIX};
pub use traits::{StateStore, StorageBackend};
#[cfg(feature = "web")]
pub use web::WebSessionStorage;
