//! Resource Registry - Native handle ownership and release.
//!
//! Every engine resource the binding layer creates is wrapped in an
//! [`OwnedHandle`] the moment it is acquired. The handle is not `Clone`, so
//! exactly one managed object owns each resource, and the destructor runs
//! from `Drop`: forgetting to release is impossible and releasing twice is
//! unrepresentable.
//!
//! A release requested while the engine is mid-layout (a node dropped from
//! inside a measure callback) cannot reach the engine. Those are parked in a
//! pending queue and drained once the layout pass returns.

use std::cell::RefCell;

use log::{debug, error};

use crate::error::{Error, Result};

use super::handle::{HandleKind, NativeHandle, NativeRef};
use super::native;

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// Releases deferred because the engine was busy.
    static PENDING_RELEASES: RefCell<Vec<NativeRef>> = const { RefCell::new(Vec::new()) };
}

// =============================================================================
// Owned Handles
// =============================================================================

/// Sole owner of one engine resource.
#[derive(Debug)]
pub struct OwnedHandle {
    handle: NativeHandle,
}

impl OwnedHandle {
    /// Acquire a new node created against `config`.
    ///
    /// # Errors
    /// Allocation failures and busy-engine errors propagate; nothing is
    /// acquired in that case.
    pub fn acquire_node(config: NativeRef) -> Result<Self> {
        drain_pending();
        let raw = native::node_new_with_config(config)?;
        debug!("acquired native node {:#x}", raw.address());
        Ok(Self::adopt(raw))
    }

    /// Acquire a new config.
    pub fn acquire_config() -> Result<Self> {
        drain_pending();
        let raw = native::config_new()?;
        debug!("acquired native config {:#x}", raw.address());
        Ok(Self::adopt(raw))
    }

    fn adopt(raw: NativeRef) -> Self {
        Self {
            handle: NativeHandle::new(raw),
        }
    }

    pub fn handle(&self) -> &NativeHandle {
        &self.handle
    }

    /// The engine reference. Fails only after release, which `Drop` makes
    /// unobservable to safe callers.
    pub fn get(&self) -> Result<NativeRef> {
        self.handle.get()
    }

    /// Release now instead of at end of scope.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for OwnedHandle {
    fn drop(&mut self) {
        if let Some(raw) = self.handle.take_for_release() {
            release(raw);
        }
    }
}

// =============================================================================
// Release
// =============================================================================

fn destroy(raw: NativeRef) -> Result<()> {
    match raw.kind() {
        HandleKind::Node => native::node_free(raw),
        HandleKind::Config => native::config_free(raw),
    }
}

/// Run the matching destructor, deferring it if the engine is busy.
fn release(raw: NativeRef) {
    match destroy(raw) {
        Ok(()) => debug!("released native {} {:#x}", raw.kind().name(), raw.address()),
        Err(Error::EngineBusy) => {
            debug!(
                "engine busy, deferring release of native {} {:#x}",
                raw.kind().name(),
                raw.address()
            );
            // The queue is gone only during thread teardown, when the engine is too.
            let _ = PENDING_RELEASES.try_with(|pending| pending.borrow_mut().push(raw));
        }
        Err(err) => error!(
            "failed to release native {} {:#x}: {err}",
            raw.kind().name(),
            raw.address()
        ),
    }
}

/// Release everything parked while the engine was busy.
///
/// Called after each layout pass and before each acquisition. Returns the
/// number of handles released.
pub fn drain_pending() -> usize {
    let parked = PENDING_RELEASES
        .try_with(|pending| std::mem::take(&mut *pending.borrow_mut()))
        .unwrap_or_default();
    let count = parked.len();
    // Nodes before configs so no node outlives the config it was built with.
    let (nodes, configs): (Vec<_>, Vec<_>) = parked
        .into_iter()
        .partition(|raw| raw.kind() == HandleKind::Node);
    for raw in nodes.into_iter().chain(configs) {
        release(raw);
    }
    count
}

/// Number of releases waiting for the engine.
pub fn pending_count() -> usize {
    PENDING_RELEASES
        .try_with(|pending| pending.borrow().len())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_and_drop_releases() {
        let before = native::node_instance_count();
        let owned = OwnedHandle::acquire_node(native::config_get_default()).unwrap();
        assert_eq!(native::node_instance_count(), before + 1);
        assert!(owned.handle().is_live());

        drop(owned);
        assert_eq!(native::node_instance_count(), before);
    }

    #[test]
    fn test_explicit_release() {
        let before = native::config_instance_count();
        let owned = OwnedHandle::acquire_config().unwrap();
        assert_eq!(native::config_instance_count(), before + 1);

        owned.release();
        assert_eq!(native::config_instance_count(), before);
    }

    #[test]
    fn test_busy_release_is_deferred() {
        let before = native::node_instance_count();
        let owned = OwnedHandle::acquire_node(native::config_get_default()).unwrap();

        // Hold the engine the way a layout pass does.
        native::with_engine(|_engine| {
            drop(owned);
            Ok(())
        })
        .unwrap();

        assert_eq!(pending_count(), 1);
        assert_eq!(native::node_instance_count(), before + 1);

        assert_eq!(drain_pending(), 1);
        assert_eq!(pending_count(), 0);
        assert_eq!(native::node_instance_count(), before);
    }
}
