//! Process-wide store slot.
//!
//! The binary installs its store once at startup and uninstalls it after
//! [`Store::shutdown`]. Library code takes `Arc<Store>` explicitly and never
//! reaches for this slot itself.

use std::sync::{Arc, RwLock};

use crate::error::{StoreError, StoreResult};
use crate::store::Store;

static STORE: RwLock<Option<Arc<Store>>> = RwLock::new(None);

/// Publishes `store`. Fails if another store is installed.
pub fn install(store: Arc<Store>) -> StoreResult<()> {
    let mut slot = STORE.write().unwrap_or_else(|p| p.into_inner());
    if slot.is_some() {
        return Err(StoreError::AlreadyInstalled);
    }
    *slot = Some(store);
    Ok(())
}

pub fn current() -> Option<Arc<Store>> {
    STORE.read().unwrap_or_else(|p| p.into_inner()).clone()
}

/// Removes and returns the installed store, if any.
pub fn uninstall() -> Option<Arc<Store>> {
    STORE.write().unwrap_or_else(|p| p.into_inner()).take()
}
