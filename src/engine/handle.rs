//! Native handles - opaque addresses of engine resources.

use std::cell::Cell;

use crate::error::{Error, Result};

/// Which engine destructor a handle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Node,
    Config,
}

impl HandleKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Config => "config",
        }
    }
}

/// Raw engine reference (`YGNodeRef` / `YGConfigRef`).
///
/// Plain data: copying it does not copy ownership. Only the engine interprets
/// the address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeRef {
    address: u64,
    kind: HandleKind,
}

impl NativeRef {
    pub(crate) const fn new(address: u64, kind: HandleKind) -> Self {
        Self { address, kind }
    }

    pub const fn address(&self) -> u64 {
        self.address
    }

    pub const fn kind(&self) -> HandleKind {
        self.kind
    }
}

/// A native reference plus the liveness flag guarding it.
///
/// `live` goes true → false exactly once, and every use after that fails
/// with [`Error::Released`] instead of reaching the engine.
#[derive(Debug)]
pub struct NativeHandle {
    raw: NativeRef,
    live: Cell<bool>,
}

impl NativeHandle {
    pub(crate) fn new(raw: NativeRef) -> Self {
        Self {
            raw,
            live: Cell::new(true),
        }
    }

    /// The engine reference, as long as the handle has not been released.
    pub fn get(&self) -> Result<NativeRef> {
        if self.live.get() {
            Ok(self.raw)
        } else {
            Err(Error::Released(self.raw.kind.name()))
        }
    }

    pub fn address(&self) -> u64 {
        self.raw.address
    }

    pub fn kind(&self) -> HandleKind {
        self.raw.kind
    }

    pub fn is_live(&self) -> bool {
        self.live.get()
    }

    /// Flip the liveness flag. Returns the reference only on the first call.
    pub(crate) fn take_for_release(&self) -> Option<NativeRef> {
        self.live.replace(false).then_some(self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_releases_once() {
        let handle = NativeHandle::new(NativeRef::new(7, HandleKind::Node));
        assert!(handle.is_live());
        assert_eq!(handle.get().ok().map(|r| r.address()), Some(7));

        assert!(handle.take_for_release().is_some());
        assert!(handle.take_for_release().is_none());
        assert!(!handle.is_live());
        assert!(matches!(handle.get(), Err(Error::Released("node"))));
    }
}
