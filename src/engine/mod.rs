//! Layout engine - the native side of the binding.
//!
//! The engine manages the resources the managed objects wrap:
//! - Handle: opaque address + liveness flag
//! - Native: handle-addressed node/config operations over Taffy
//! - Style: Yoga-shaped style record lowered to Taffy styles
//! - Registry: single-owner handles, exactly-once release
//! - Print: debug dump of a native subtree
//!
//! # Architecture
//!
//! Managed objects never hold Taffy ids directly. They hold handles, and
//! every engine operation goes through the `native` surface:
//!
//! ```text
//! Node ──owns──▶ OwnedHandle ──NativeRef──▶ native::node_* ──▶ TaffyTree
//!   ▲                                            │
//!   └──── bridge ◀── MeasureTrampoline ◀─────────┘ (during layout)
//! ```

mod handle;
pub mod native;
mod print;
mod registry;
mod style;

pub use handle::{HandleKind, NativeHandle, NativeRef};
pub use native::NativeLayout;
pub use registry::{drain_pending, pending_count, OwnedHandle};
pub use style::{physical_edge, Edges, NativeStyle};

use crate::types::{MeasureMode, Size};

// =============================================================================
// Trampolines
// =============================================================================

/// Fixed-signature entry point the engine calls to measure a leaf.
///
/// The engine already knows which node it is measuring, so the node is not
/// part of the signature; implementors resolve it themselves.
pub trait MeasureTrampoline {
    fn measure(
        &self,
        width: f32,
        width_mode: MeasureMode,
        height: f32,
        height_mode: MeasureMode,
    ) -> Size;
}

/// Fixed-signature entry point the engine calls for a node's baseline.
pub trait BaselineTrampoline {
    fn baseline(&self, width: f32, height: f32) -> f32;
}
