//! Node - the managed shadow of one engine layout node.
//!
//! A [`Node`] owns its engine node through an [`OwnedHandle`], owns its
//! children strongly, and points at its parent weakly. Every structural
//! mutation checks the invariants the engine assumes but never verifies,
//! then updates the engine, then the managed tree:
//!
//! - a node has at most one parent
//! - a node with a measure function has no children, and vice versa
//! - a node is never its own ancestor
//! - a node is reset only while detached and childless
//!
//! A failed check leaves both trees untouched. A failed engine call happens
//! before any managed state changes, so it does too.
//!
//! # Example
//!
//! ```ignore
//! use spark_yoga::{Direction, Edge, FlexDirection, Node};
//!
//! let root = Node::new()?;
//! root.set_flex_direction(FlexDirection::Row)?;
//! root.set_width(500.0)?;
//! root.set_padding(Edge::All, 20.0)?;
//!
//! let child = Node::new()?;
//! child.set_width(80.0)?;
//! root.insert_child(&child, 0)?;
//!
//! root.calculate_layout(None, None, Direction::Inherit)?;
//! assert_eq!(child.layout_left()?, 20.0);
//! ```

mod layout;
mod style;

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use log::{debug, error};

use crate::bridge::{BaselineFn, CallbackRecord, MeasureFn};
use crate::config::Config;
use crate::engine::{
    self, native, BaselineTrampoline, MeasureTrampoline, NativeRef, OwnedHandle,
};
use crate::error::{Error, Result};
use crate::types::{Direction, LogLevel, MeasureMode, PrintOptions, Size};

// =============================================================================
// Node State
// =============================================================================

pub(crate) struct NodeInner {
    // Declared before `config` so the node is released before its config.
    handle: OwnedHandle,
    config: Config,
    parent: RefCell<Weak<NodeInner>>,
    children: RefCell<Vec<Node>>,
    measure: RefCell<Option<Rc<CallbackRecord<MeasureFn>>>>,
    baseline: RefCell<Option<Rc<CallbackRecord<BaselineFn>>>>,
    data: RefCell<Option<Rc<dyn Any>>>,
}

impl Drop for NodeInner {
    fn drop(&mut self) {
        if let Some(record) = self.measure.get_mut().take() {
            record.invalidate();
        }
        if let Some(record) = self.baseline.get_mut().take() {
            record.invalidate();
        }
        for child in self.children.get_mut().iter() {
            *child.0.parent.borrow_mut() = Weak::new();
        }
    }
}

/// A layout node.
///
/// Cloning a `Node` clones the reference, not the node: both values name the
/// same engine node, and equality is identity. The engine node is released
/// when the last reference (including a parent's) is dropped.
#[derive(Clone)]
pub struct Node(Rc<NodeInner>);

impl Node {
    /// Create a node against the shared default config.
    pub fn new() -> Result<Self> {
        Self::new_with_config(&Config::default())
    }

    /// Create a node against `config`.
    ///
    /// # Errors
    /// Fails if the engine cannot allocate the node.
    pub fn new_with_config(config: &Config) -> Result<Self> {
        let handle = OwnedHandle::acquire_node(config.raw()?)?;
        Ok(Self(Rc::new(NodeInner {
            handle,
            config: config.clone(),
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
            measure: RefCell::new(None),
            baseline: RefCell::new(None),
            data: RefCell::new(None),
        })))
    }

    pub(crate) fn from_inner(inner: Rc<NodeInner>) -> Self {
        Self(inner)
    }

    pub(crate) fn downgrade(&self) -> Weak<NodeInner> {
        Rc::downgrade(&self.0)
    }

    pub(crate) fn raw(&self) -> Result<NativeRef> {
        self.0.handle.get()
    }

    /// The engine reference, for the read-only queries in `engine::native`.
    pub fn native_ref(&self) -> Result<NativeRef> {
        self.raw()
    }

    /// Engine address of this node, for diagnostics.
    pub fn address(&self) -> u64 {
        self.0.handle.handle().address()
    }

    /// The config this node was created against.
    pub fn config(&self) -> &Config {
        &self.0.config
    }

    fn managed_parent(&self) -> Option<Node> {
        self.0.parent.borrow().upgrade().map(Node)
    }

    // =========================================================================
    // Tree Mutation
    // =========================================================================

    /// Insert `child` at `index` in this node's children.
    ///
    /// # Errors
    /// - [`Error::ChildAlreadyParented`] if `child` has a parent
    /// - [`Error::HasMeasureFunction`] if this node has a measure function
    /// - [`Error::WouldCycle`] if `child` is this node or one of its ancestors
    /// - [`Error::IndexOutOfBounds`] if `index` is past the child count
    pub fn insert_child(&self, child: &Node, index: usize) -> Result<()> {
        if child.managed_parent().is_some() {
            return Err(Error::ChildAlreadyParented);
        }
        if self.has_measure_function() {
            return Err(Error::HasMeasureFunction);
        }
        if self.is_or_descends_from(child) {
            return Err(Error::WouldCycle);
        }
        let count = self.child_count();
        if index > count {
            return Err(Error::IndexOutOfBounds { index, count });
        }

        native::node_insert_child(self.raw()?, child.raw()?, index)?;
        self.0.children.borrow_mut().insert(index, child.clone());
        *child.0.parent.borrow_mut() = self.downgrade();
        Ok(())
    }

    /// Remove `child` from this node. Removing a node that is not a child is
    /// a no-op.
    pub fn remove_child(&self, child: &Node) -> Result<()> {
        native::node_remove_child(self.raw()?, child.raw()?)?;
        let removed = {
            let mut children = self.0.children.borrow_mut();
            let index = children.iter().position(|existing| existing == child);
            index.map(|index| children.remove(index))
        };
        if let Some(removed) = removed {
            *removed.0.parent.borrow_mut() = Weak::new();
        }
        Ok(())
    }

    /// Whether `candidate` is this node or one of its ancestors.
    fn is_or_descends_from(&self, candidate: &Node) -> bool {
        let mut current = Some(self.clone());
        while let Some(node) = current {
            if node == *candidate {
                return true;
            }
            current = node.managed_parent();
        }
        false
    }

    // =========================================================================
    // Tree Queries
    // =========================================================================

    /// The child at `index`, checked against the engine's child list.
    ///
    /// # Errors
    /// [`Error::Desync`] if the managed and engine trees disagree, which is
    /// a bug in this crate rather than a usage error.
    pub fn get_child(&self, index: usize) -> Result<Option<Node>> {
        let native_child = native::node_get_child(self.raw()?, index)?;
        let managed_child = self.0.children.borrow().get(index).cloned();
        match (managed_child, native_child) {
            (None, None) => Ok(None),
            (Some(managed), Some(raw)) if managed.raw()? == raw => Ok(Some(managed)),
            (managed, raw) => Err(desync(format!(
                "child {index} of node {:#x}: managed {:?} vs engine {:?}",
                self.address(),
                managed.map(|node| node.address()),
                raw.map(|raw| raw.address()),
            ))),
        }
    }

    /// This node's parent, checked against the engine.
    pub fn get_parent(&self) -> Result<Option<Node>> {
        let native_parent = native::node_get_parent(self.raw()?)?;
        match (self.managed_parent(), native_parent) {
            (None, None) => Ok(None),
            (Some(managed), Some(raw)) if managed.raw()? == raw => Ok(Some(managed)),
            (managed, raw) => Err(desync(format!(
                "parent of node {:#x}: managed {:?} vs engine {:?}",
                self.address(),
                managed.map(|node| node.address()),
                raw.map(|raw| raw.address()),
            ))),
        }
    }

    pub fn child_count(&self) -> usize {
        self.0.children.borrow().len()
    }

    pub fn has_children(&self) -> bool {
        self.child_count() != 0
    }

    /// Snapshot of the children in order.
    pub fn children(&self) -> Vec<Node> {
        self.0.children.borrow().clone()
    }

    // =========================================================================
    // Reset
    // =========================================================================

    /// Restore default style and drop callbacks and user data.
    ///
    /// # Errors
    /// [`Error::ResetWithChildren`] or [`Error::ResetAttached`] if the node
    /// is still part of a tree.
    pub fn reset(&self) -> Result<()> {
        if self.has_children() {
            return Err(Error::ResetWithChildren);
        }
        if self.managed_parent().is_some() {
            return Err(Error::ResetAttached);
        }

        native::node_reset(self.raw()?)?;
        if let Some(record) = self.0.measure.take() {
            record.invalidate();
        }
        if let Some(record) = self.0.baseline.take() {
            record.invalidate();
        }
        self.0.data.take();
        Ok(())
    }

    // =========================================================================
    // Callbacks
    // =========================================================================

    /// Install a measure function, replacing any existing one.
    ///
    /// The function runs during [`calculate_layout`](Self::calculate_layout)
    /// with the constraints for each axis. It receives this node, but the
    /// engine is busy while it runs: property reads and tree mutations from
    /// inside it fail with [`Error::EngineBusy`].
    ///
    /// # Errors
    /// [`Error::HasChildren`] if the node has children.
    pub fn set_measure_function<F>(&self, measure: F) -> Result<()>
    where
        F: FnMut(&Node, f32, MeasureMode, f32, MeasureMode) -> Size + 'static,
    {
        let count = self.child_count();
        if count != 0 {
            return Err(Error::HasChildren(count));
        }
        let closure: Box<MeasureFn> = Box::new(measure);
        let record = CallbackRecord::new(self.downgrade(), closure);
        let trampoline: Rc<dyn MeasureTrampoline> = record.clone();
        native::node_set_measure_func(self.raw()?, Some(trampoline))?;

        if let Some(previous) = self.0.measure.replace(Some(record)) {
            previous.invalidate();
        }
        debug!("installed measure function on node {:#x}", self.address());
        Ok(())
    }

    /// Remove the measure function, if any.
    pub fn clear_measure_function(&self) -> Result<()> {
        native::node_set_measure_func(self.raw()?, None)?;
        if let Some(previous) = self.0.measure.take() {
            previous.invalidate();
            debug!("cleared measure function on node {:#x}", self.address());
        }
        Ok(())
    }

    pub fn has_measure_function(&self) -> bool {
        self.0.measure.borrow().is_some()
    }

    /// Install a baseline function, replacing any existing one.
    ///
    /// The function receives the node's computed width and height and
    /// returns the baseline offset from the top edge.
    pub fn set_baseline_function<F>(&self, baseline: F) -> Result<()>
    where
        F: FnMut(&Node, f32, f32) -> f32 + 'static,
    {
        let closure: Box<BaselineFn> = Box::new(baseline);
        let record = CallbackRecord::new(self.downgrade(), closure);
        let trampoline: Rc<dyn BaselineTrampoline> = record.clone();
        native::node_set_baseline_func(self.raw()?, Some(trampoline))?;

        if let Some(previous) = self.0.baseline.replace(Some(record)) {
            previous.invalidate();
        }
        debug!("installed baseline function on node {:#x}", self.address());
        Ok(())
    }

    /// Remove the baseline function, if any.
    pub fn clear_baseline_function(&self) -> Result<()> {
        native::node_set_baseline_func(self.raw()?, None)?;
        if let Some(previous) = self.0.baseline.take() {
            previous.invalidate();
            debug!("cleared baseline function on node {:#x}", self.address());
        }
        Ok(())
    }

    pub fn has_baseline_function(&self) -> bool {
        self.0.baseline.borrow().is_some()
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Flag a measured leaf for re-measurement on the next layout pass.
    ///
    /// # Errors
    /// [`Error::MarkDirtyWithoutMeasure`] if no measure function is set; the
    /// engine tracks dirtiness of every other node itself.
    pub fn mark_dirty(&self) -> Result<()> {
        if !self.has_measure_function() {
            return Err(Error::MarkDirtyWithoutMeasure);
        }
        native::node_mark_dirty(self.raw()?)
    }

    pub fn is_dirty(&self) -> Result<bool> {
        native::node_is_dirty(self.raw()?)
    }

    /// Lay out the subtree rooted at this node.
    ///
    /// `None` (or NaN) for a dimension leaves it unconstrained. Measure
    /// functions in the subtree may run any number of times, in any order.
    pub fn calculate_layout(
        &self,
        width: Option<f32>,
        height: Option<f32>,
        direction: Direction,
    ) -> Result<()> {
        let result = native::node_calculate_layout(self.raw()?, width, height, direction);
        let released = engine::drain_pending();
        if released > 0 {
            debug!("released {released} native handles deferred during layout");
        }
        result
    }

    /// Baseline of the laid-out node: the baseline function's answer for
    /// the computed size, or the computed height when none is set.
    pub fn computed_baseline(&self) -> Result<f32> {
        native::node_baseline(self.raw()?)
    }

    /// Copy every style property from `source`.
    pub fn copy_style_from(&self, source: &Node) -> Result<()> {
        native::node_copy_style(self.raw()?, source.raw()?)
    }

    // =========================================================================
    // Debug Output
    // =========================================================================

    /// Render the node as indented pseudo-HTML.
    pub fn to_debug_string(&self, options: PrintOptions) -> Result<String> {
        native::node_print(self.raw()?, options)
    }

    /// Log [`to_debug_string`](Self::to_debug_string) at debug level.
    pub fn print(&self, options: PrintOptions) -> Result<()> {
        self.log_tree(LogLevel::Debug, options)
    }

    /// Log [`to_debug_string`](Self::to_debug_string) at `level`.
    pub fn log_tree(&self, level: LogLevel, options: PrintOptions) -> Result<()> {
        let level = log::Level::from(level);
        if log::log_enabled!(level) {
            let text = self.to_debug_string(options)?;
            log::log!(level, "{text}");
        }
        Ok(())
    }

    // =========================================================================
    // User Data
    // =========================================================================

    /// Attach an arbitrary value to this node, replacing any previous one.
    pub fn set_user_data(&self, data: impl Any) {
        let data: Rc<dyn Any> = Rc::new(data);
        self.0.data.replace(Some(data));
    }

    pub fn user_data(&self) -> Option<Rc<dyn Any>> {
        self.0.data.borrow().clone()
    }

    /// The attached value, if there is one of type `T`.
    pub fn user_data_as<T: Any>(&self) -> Option<Rc<T>> {
        self.user_data().and_then(|data| data.downcast::<T>().ok())
    }

    pub fn clear_user_data(&self) {
        self.0.data.take();
    }
}

fn desync(message: String) -> Error {
    error!("shadow tree desync: {message}");
    Error::Desync(message)
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("address", &format_args!("{:#x}", self.address()))
            .field("children", &self.child_count())
            .field("has_measure_function", &self.has_measure_function())
            .finish()
    }
}
