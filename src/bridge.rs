//! Callback Bridge - managed closures behind fixed-signature trampolines.
//!
//! A [`CallbackRecord`] pairs a user closure with a weak reference to the
//! node that owns it. The engine holds the record through the
//! [`MeasureTrampoline`] / [`BaselineTrampoline`] traits and calls it
//! synchronously mid-layout; the record resolves its own node and hands it
//! to the closure.
//!
//! Lifetime rules:
//! - The owning node holds the record strongly; the engine holds a second
//!   strong reference only while the trampoline is installed.
//! - Installing or clearing always updates the engine first, then
//!   invalidates the managed record. An invalidated record never runs the
//!   closure again, even if the engine still holds it.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{trace, warn};

use crate::engine::{BaselineTrampoline, MeasureTrampoline};
use crate::node::{Node, NodeInner};
use crate::types::{MeasureMode, Size};

/// Measure function: `(node, width, width_mode, height, height_mode) -> size`.
pub type MeasureFn = dyn FnMut(&Node, f32, MeasureMode, f32, MeasureMode) -> Size;

/// Baseline function: `(node, width, height) -> offset from the top edge`.
pub type BaselineFn = dyn FnMut(&Node, f32, f32) -> f32;

// =============================================================================
// Callback Record
// =============================================================================

/// One installed callback and the node it belongs to.
pub(crate) struct CallbackRecord<F: ?Sized> {
    owner: Weak<NodeInner>,
    alive: Cell<bool>,
    closure: RefCell<Box<F>>,
}

impl<F: ?Sized> CallbackRecord<F> {
    pub fn new(owner: Weak<NodeInner>, closure: Box<F>) -> Rc<Self> {
        Rc::new(Self {
            owner,
            alive: Cell::new(true),
            closure: RefCell::new(closure),
        })
    }

    /// Stop the closure from ever running again.
    pub fn invalidate(&self) {
        self.alive.set(false);
    }

    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    /// Run the closure against the owning node, or return `fallback` when
    /// the record is dead, the node is gone, or the closure is already
    /// running further up the stack.
    fn invoke<R>(&self, kind: &str, fallback: R, call: impl FnOnce(&mut F, &Node) -> R) -> R {
        if !self.is_alive() {
            warn!("{kind} trampoline invoked after its callback was cleared");
            return fallback;
        }
        let Some(inner) = self.owner.upgrade() else {
            warn!("{kind} trampoline invoked after its node was dropped");
            return fallback;
        };
        let Ok(mut closure) = self.closure.try_borrow_mut() else {
            warn!("{kind} callback re-entered itself");
            return fallback;
        };
        let node = Node::from_inner(inner);
        trace!("invoking {kind} callback on node {:#x}", node.address());
        call(&mut closure, &node)
    }
}

impl MeasureTrampoline for CallbackRecord<MeasureFn> {
    fn measure(
        &self,
        width: f32,
        width_mode: MeasureMode,
        height: f32,
        height_mode: MeasureMode,
    ) -> Size {
        self.invoke("measure", Size::ZERO, |closure, node| {
            closure(node, width, width_mode, height, height_mode)
        })
    }
}

impl BaselineTrampoline for CallbackRecord<BaselineFn> {
    fn baseline(&self, width: f32, height: f32) -> f32 {
        self.invoke("baseline", height, |closure, node| {
            closure(node, width, height)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_for(node: &Node) -> Rc<CallbackRecord<MeasureFn>> {
        let closure: Box<MeasureFn> =
            Box::new(|_: &Node, _: f32, _: MeasureMode, _: f32, _: MeasureMode| Size::new(4.0, 2.0));
        CallbackRecord::new(node.downgrade(), closure)
    }

    #[test]
    fn test_live_record_runs_closure() {
        let node = Node::new().unwrap();
        let record = record_for(&node);
        let size = record.measure(10.0, MeasureMode::AtMost, 10.0, MeasureMode::AtMost);
        assert_eq!(size, Size::new(4.0, 2.0));
    }

    #[test]
    fn test_invalidated_record_returns_fallback() {
        let node = Node::new().unwrap();
        let record = record_for(&node);
        record.invalidate();
        assert!(!record.is_alive());
        let size = record.measure(10.0, MeasureMode::AtMost, 10.0, MeasureMode::AtMost);
        assert_eq!(size, Size::ZERO);
    }

    #[test]
    fn test_record_outliving_node_returns_fallback() {
        let node = Node::new().unwrap();
        let record = record_for(&node);
        drop(node);
        let size = record.measure(1.0, MeasureMode::Exactly, 1.0, MeasureMode::Exactly);
        assert_eq!(size, Size::ZERO);
    }

    #[test]
    fn test_closure_receives_owning_node() {
        let node = Node::new().unwrap();
        let expected = node.clone();
        let closure: Box<BaselineFn> = Box::new(move |owner: &Node, _: f32, height: f32| {
            assert_eq!(*owner, expected);
            height / 2.0
        });
        let record = CallbackRecord::new(node.downgrade(), closure);
        assert_eq!(record.baseline(10.0, 30.0), 15.0);
    }
}
