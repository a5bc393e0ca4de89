//! Session state ownership
//!
//! [`SessionStore`] is the single writer of [`maayegue_domain::SessionState`];
//! everything else reads snapshots or subscribes to changes.
//! [`SessionListener`] feeds auth-provider state changes into the store.

mod listener;
mod store;

pub use listener::SessionListener;
pub use store::SessionStore;
