//! The native layout engine.
//!
//! A handle-addressed surface over one Taffy tree per thread, shaped like
//! the Yoga C API: every operation takes raw [`NativeRef`]s, nothing here
//! knows about the managed shadow tree, and nothing here validates
//! structural invariants (single parent, measure-function leaves, no
//! cycles). The binding layer checks those before calling in.
//!
//! What the engine does guarantee is that it never panics on a bad handle:
//! unknown or freed references come back as [`Error::InvalidHandle`].
//!
//! Only the read-only queries are public. Everything that creates, frees or
//! mutates a node is crate-private, so the managed tree is the sole writer:
//!
//! ```compile_fail
//! let node = spark_yoga::Node::new().unwrap();
//! spark_yoga::engine::native::node_free(node.native_ref().unwrap()).unwrap();
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use taffy::{AvailableSpace, NodeId, TaffyTree};

use crate::error::{Error, Result};
use crate::types::{Direction, ExperimentalFeature, MeasureMode, PrintOptions, UNDEFINED};

use super::handle::{HandleKind, NativeRef};
use super::print;
use super::style::NativeStyle;
use super::{BaselineTrampoline, MeasureTrampoline};

/// Address of the per-thread default config. Never handed out by `config_new`.
const DEFAULT_CONFIG_ADDRESS: u64 = 0;

// =============================================================================
// Engine State
// =============================================================================

/// Per-node data the engine keeps next to Taffy's own node storage.
pub(crate) struct NativeNode {
    pub config: u64,
    pub style: NativeStyle,
    pub resolved_direction: Direction,
    /// False until a layout pass reaches the node, and again after a reset.
    pub laid_out: bool,
    pub measure: Option<Rc<dyn MeasureTrampoline>>,
    pub baseline: Option<Rc<dyn BaselineTrampoline>>,
}

#[derive(Debug, Clone, PartialEq)]
struct NativeConfig {
    point_scale_factor: f32,
    use_legacy_stretch_behaviour: bool,
    use_web_defaults: bool,
    experimental_features: Vec<ExperimentalFeature>,
}

impl Default for NativeConfig {
    fn default() -> Self {
        Self {
            point_scale_factor: 1.0,
            use_legacy_stretch_behaviour: false,
            use_web_defaults: false,
            experimental_features: Vec::new(),
        }
    }
}

pub(crate) struct NativeEngine {
    pub tree: TaffyTree<NativeNode>,
    configs: HashMap<u64, NativeConfig>,
    next_config: u64,
}

impl NativeEngine {
    fn new() -> Self {
        let mut configs = HashMap::new();
        configs.insert(DEFAULT_CONFIG_ADDRESS, NativeConfig::default());
        Self {
            tree: TaffyTree::new(),
            configs,
            next_config: DEFAULT_CONFIG_ADDRESS + 1,
        }
    }

    /// Every live node carries a context and `node_free` takes it away, so
    /// context presence is the liveness test. Taffy's context map checks slot
    /// versions, so a freed id stays dead after its slot is reused.
    pub fn node_id(&self, node: NativeRef) -> Result<NodeId> {
        let id = NodeId::from(node.address());
        if node.kind() == HandleKind::Node && self.tree.get_node_context(id).is_some() {
            Ok(id)
        } else {
            Err(invalid(node))
        }
    }

    pub fn node_data(&self, node: NativeRef) -> Result<&NativeNode> {
        let id = self.node_id(node)?;
        self.tree.get_node_context(id).ok_or_else(|| invalid(node))
    }

    fn node_data_mut(&mut self, node: NativeRef) -> Result<&mut NativeNode> {
        let id = self.node_id(node)?;
        self.tree.get_node_context_mut(id).ok_or_else(|| invalid(node))
    }

    /// Computed layout, or the empty layout for a node not laid out since
    /// it was created or reset.
    pub fn computed_layout(&self, id: NodeId) -> Result<taffy::Layout> {
        let data = self
            .tree
            .get_node_context(id)
            .ok_or_else(|| invalid(node_ref(id)))?;
        if data.laid_out {
            Ok(*self.tree.layout(id)?)
        } else {
            Ok(taffy::Layout::new())
        }
    }

    fn config(&self, config: NativeRef) -> Result<&NativeConfig> {
        if config.kind() != HandleKind::Config {
            return Err(invalid(config));
        }
        self.configs.get(&config.address()).ok_or_else(|| invalid(config))
    }

    fn config_mut(&mut self, config: NativeRef) -> Result<&mut NativeConfig> {
        if config.kind() != HandleKind::Config {
            return Err(invalid(config));
        }
        self.configs
            .get_mut(&config.address())
            .ok_or_else(|| invalid(config))
    }

    /// Push a node's native style into Taffy, which also marks it dirty.
    fn sync_style(&mut self, id: NodeId) -> Result<()> {
        let style = self
            .tree
            .get_node_context(id)
            .map(|data| data.style.to_taffy(data.resolved_direction))
            .ok_or_else(|| invalid(node_ref(id)))?;
        self.tree.set_style(id, style)?;
        Ok(())
    }

    /// Resolve `inherit` directions top-down, re-lowering styles that change.
    fn resolve_directions(&mut self, id: NodeId, inherited: Direction) -> Result<()> {
        let data = self
            .tree
            .get_node_context_mut(id)
            .ok_or_else(|| invalid(node_ref(id)))?;
        let resolved = match data.style.direction {
            Direction::Inherit => inherited,
            explicit => explicit,
        };
        let changed = data.resolved_direction != resolved;
        data.resolved_direction = resolved;
        data.laid_out = true;
        if changed {
            self.sync_style(id)?;
        }
        for child in self.tree.children(id)? {
            self.resolve_directions(child, resolved)?;
        }
        Ok(())
    }
}

thread_local! {
    /// The engine for this thread. Nodes from different threads never meet.
    static ENGINE: RefCell<NativeEngine> = RefCell::new(NativeEngine::new());

    /// Live node count. Kept outside the engine so it reads during layout.
    static NODE_COUNT: Cell<usize> = const { Cell::new(0) };

    /// Live config count, excluding the default config.
    static CONFIG_COUNT: Cell<usize> = const { Cell::new(0) };
}

/// Run `f` against the engine.
///
/// Fails with [`Error::EngineBusy`] when called while a layout pass holds the
/// engine, i.e. from inside a measure or baseline callback.
pub(crate) fn with_engine<T>(f: impl FnOnce(&mut NativeEngine) -> Result<T>) -> Result<T> {
    ENGINE
        .try_with(|engine| {
            let mut engine = engine.try_borrow_mut().map_err(|_| Error::EngineBusy)?;
            f(&mut engine)
        })
        // Thread teardown: the engine, and every node in it, is already gone.
        .unwrap_or(Err(Error::EngineBusy))
}

fn invalid(handle: NativeRef) -> Error {
    Error::InvalidHandle {
        kind: handle.kind().name(),
        address: handle.address(),
    }
}

fn node_ref(id: NodeId) -> NativeRef {
    NativeRef::new(u64::from(id), HandleKind::Node)
}

// =============================================================================
// Node Lifecycle
// =============================================================================

/// Create a node against a specific config (`YGNodeNewWithConfig`).
pub(crate) fn node_new_with_config(config: NativeRef) -> Result<NativeRef> {
    with_engine(|engine| {
        let web_defaults = engine.config(config)?.use_web_defaults;
        let style = NativeStyle::new(web_defaults);
        let data = NativeNode {
            config: config.address(),
            resolved_direction: Direction::Ltr,
            laid_out: false,
            style: style.clone(),
            measure: None,
            baseline: None,
        };
        let id = engine
            .tree
            .new_leaf_with_context(style.to_taffy(Direction::Ltr), data)
            .map_err(|err| Error::Allocation(err.to_string()))?;
        NODE_COUNT.with(|count| count.set(count.get() + 1));
        Ok(node_ref(id))
    })
}

/// Trampolines taken off a node. Dropped only once the engine is released,
/// since dropping a closure may drop nodes it captured.
type Callbacks = (Option<Rc<dyn MeasureTrampoline>>, Option<Rc<dyn BaselineTrampoline>>);

fn take_callbacks(data: &mut NativeNode) -> Callbacks {
    (data.measure.take(), data.baseline.take())
}

/// Free a node (`YGNodeFree`).
///
/// Detaches it from its parent and orphans its children; it does not free
/// the children. The node's context, and with it any installed callbacks,
/// goes with it.
pub(crate) fn node_free(node: NativeRef) -> Result<()> {
    let callbacks = with_engine(|engine| {
        let id = engine.node_id(node)?;
        let callbacks = take_callbacks(engine.node_data_mut(node)?);
        // Taffy's `remove` leaves the context behind.
        engine.tree.set_node_context(id, None)?;
        engine.tree.remove(id)?;
        NODE_COUNT.with(|count| count.set(count.get().saturating_sub(1)));
        Ok(callbacks)
    })?;
    drop(callbacks);
    Ok(())
}

/// Restore default style, drop callbacks and forget the computed layout
/// (`YGNodeReset`).
pub(crate) fn node_reset(node: NativeRef) -> Result<()> {
    let callbacks = with_engine(|engine| {
        let id = engine.node_id(node)?;
        let web_defaults = {
            let config = engine.node_data(node)?.config;
            engine
                .configs
                .get(&config)
                .is_some_and(|config| config.use_web_defaults)
        };
        let data = engine.node_data_mut(node)?;
        data.style = NativeStyle::new(web_defaults);
        data.resolved_direction = Direction::Ltr;
        data.laid_out = false;
        let callbacks = take_callbacks(data);
        engine.sync_style(id)?;
        Ok(callbacks)
    })?;
    drop(callbacks);
    Ok(())
}

/// Live node count on this thread (`YGNodeGetInstanceCount`).
pub fn node_instance_count() -> usize {
    NODE_COUNT.with(Cell::get)
}

// =============================================================================
// Tree Mutation
// =============================================================================

/// Insert `child` under `parent` at `index` (`YGNodeInsertChild`).
pub(crate) fn node_insert_child(parent: NativeRef, child: NativeRef, index: usize) -> Result<()> {
    with_engine(|engine| {
        let parent_id = engine.node_id(parent)?;
        let child_id = engine.node_id(child)?;
        engine.tree.insert_child_at_index(parent_id, index, child_id)?;
        Ok(())
    })
}

/// Remove `child` from `parent` (`YGNodeRemoveChild`). A no-op if it is not
/// a child of `parent`.
pub(crate) fn node_remove_child(parent: NativeRef, child: NativeRef) -> Result<()> {
    with_engine(|engine| {
        let parent_id = engine.node_id(parent)?;
        let child_id = engine.node_id(child)?;
        if engine.tree.parent(child_id) == Some(parent_id)
            && engine.tree.children(parent_id)?.contains(&child_id)
        {
            engine.tree.remove_child(parent_id, child_id)?;
        }
        Ok(())
    })
}

/// Child at `index`, if any (`YGNodeGetChild`).
pub fn node_get_child(parent: NativeRef, index: usize) -> Result<Option<NativeRef>> {
    with_engine(|engine| {
        let parent_id = engine.node_id(parent)?;
        Ok(engine.tree.children(parent_id)?.get(index).copied().map(node_ref))
    })
}

/// Parent of `node`, if any (`YGNodeGetParent`).
pub fn node_get_parent(node: NativeRef) -> Result<Option<NativeRef>> {
    with_engine(|engine| {
        let id = engine.node_id(node)?;
        Ok(engine.tree.parent(id).map(node_ref))
    })
}

/// Number of children (`YGNodeGetChildCount`).
pub fn node_get_child_count(node: NativeRef) -> Result<usize> {
    with_engine(|engine| {
        let id = engine.node_id(node)?;
        Ok(engine.tree.children(id)?.len())
    })
}

/// All children in order.
pub fn node_get_children(node: NativeRef) -> Result<Vec<NativeRef>> {
    with_engine(|engine| {
        let id = engine.node_id(node)?;
        Ok(engine.tree.children(id)?.into_iter().map(node_ref).collect())
    })
}

// =============================================================================
// Layout
// =============================================================================

/// Translate one axis of Taffy's constraints into Yoga's (size, mode) pair.
fn measure_constraint(known: Option<f32>, available: AvailableSpace) -> (f32, MeasureMode) {
    match (known, available) {
        (Some(size), _) => (size, MeasureMode::Exactly),
        (None, AvailableSpace::Definite(size)) => (size, MeasureMode::AtMost),
        (None, AvailableSpace::MinContent) => (0.0, MeasureMode::AtMost),
        (None, AvailableSpace::MaxContent) => (UNDEFINED, MeasureMode::Undefined),
    }
}

fn sanitize(measured: f32, known: Option<f32>) -> f32 {
    known.unwrap_or(if measured.is_finite() {
        measured.max(0.0)
    } else {
        0.0
    })
}

fn to_available(size: Option<f32>) -> AvailableSpace {
    match size {
        Some(size) if size.is_finite() => AvailableSpace::Definite(size),
        _ => AvailableSpace::MaxContent,
    }
}

/// Lay out the subtree rooted at `node` (`YGNodeCalculateLayout`).
///
/// Measure trampolines are invoked synchronously, zero or more times, in an
/// order chosen by the solver. The engine stays borrowed for the whole pass.
pub(crate) fn node_calculate_layout(
    node: NativeRef,
    width: Option<f32>,
    height: Option<f32>,
    direction: Direction,
) -> Result<()> {
    with_engine(|engine| {
        let id = engine.node_id(node)?;
        let scale = engine
            .configs
            .get(&engine.node_data(node)?.config)
            .map_or(1.0, |config| config.point_scale_factor);
        if scale == 0.0 {
            engine.tree.disable_rounding();
        } else {
            engine.tree.enable_rounding();
        }

        let root_direction = match direction {
            Direction::Inherit => Direction::Ltr,
            explicit => explicit,
        };
        engine.resolve_directions(id, root_direction)?;

        let available = taffy::Size {
            width: to_available(width),
            height: to_available(height),
        };
        engine.tree.compute_layout_with_measure(
            id,
            available,
            |known, available, _id, context: Option<&mut NativeNode>, _style| {
                let Some(trampoline) = context.and_then(|data| data.measure.clone()) else {
                    return taffy::Size::ZERO;
                };
                let (width, width_mode) = measure_constraint(known.width, available.width);
                let (height, height_mode) = measure_constraint(known.height, available.height);
                let measured = trampoline.measure(width, width_mode, height, height_mode);
                taffy::Size {
                    width: sanitize(measured.width, known.width),
                    height: sanitize(measured.height, known.height),
                }
            },
        )?;
        Ok(())
    })
}

/// Computed layout of one node, in physical edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeLayout {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
    pub direction: Direction,
    pub had_overflow: bool,
    /// Left, top, right, bottom.
    pub margin: [f32; 4],
    pub border: [f32; 4],
    pub padding: [f32; 4],
}

/// Read back the computed layout (`YGNodeLayoutGet*`).
///
/// `right`/`bottom` are offsets from the parent's right and bottom edges.
pub fn node_layout(node: NativeRef) -> Result<NativeLayout> {
    with_engine(|engine| {
        let id = engine.node_id(node)?;
        let layout = engine.computed_layout(id)?;
        let data = engine.node_data(node)?;
        let direction = if data.laid_out {
            data.resolved_direction
        } else {
            Direction::Inherit
        };
        let parent_size = match engine.tree.parent(id) {
            Some(parent) => engine.computed_layout(parent)?.size,
            None => layout.size,
        };
        let rect = |rect: taffy::Rect<f32>| [rect.left, rect.top, rect.right, rect.bottom];
        Ok(NativeLayout {
            left: layout.location.x,
            top: layout.location.y,
            right: parent_size.width - layout.location.x - layout.size.width,
            bottom: parent_size.height - layout.location.y - layout.size.height,
            width: layout.size.width,
            height: layout.size.height,
            direction,
            had_overflow: layout.content_size.width > layout.size.width
                || layout.content_size.height > layout.size.height,
            margin: rect(layout.margin),
            border: rect(layout.border),
            padding: rect(layout.padding),
        })
    })
}

/// Flag a measured leaf for re-measurement (`YGNodeMarkDirty`).
pub(crate) fn node_mark_dirty(node: NativeRef) -> Result<()> {
    with_engine(|engine| {
        let id = engine.node_id(node)?;
        engine.tree.mark_dirty(id)?;
        Ok(())
    })
}

/// Whether the node needs layout (`YGNodeIsDirty`).
pub fn node_is_dirty(node: NativeRef) -> Result<bool> {
    with_engine(|engine| {
        let id = engine.node_id(node)?;
        Ok(engine.tree.dirty(id)?)
    })
}

// =============================================================================
// Callbacks
// =============================================================================

/// Install or clear the measure trampoline (`YGNodeSetMeasureFunc`).
pub(crate) fn node_set_measure_func(
    node: NativeRef,
    trampoline: Option<Rc<dyn MeasureTrampoline>>,
) -> Result<()> {
    with_engine(|engine| {
        let id = engine.node_id(node)?;
        engine.node_data_mut(node)?.measure = trampoline;
        engine.tree.mark_dirty(id)?;
        Ok(())
    })
}

pub fn node_has_measure_func(node: NativeRef) -> Result<bool> {
    with_engine(|engine| Ok(engine.node_data(node)?.measure.is_some()))
}

/// Install or clear the baseline trampoline (`YGNodeSetBaselineFunc`).
pub(crate) fn node_set_baseline_func(
    node: NativeRef,
    trampoline: Option<Rc<dyn BaselineTrampoline>>,
) -> Result<()> {
    with_engine(|engine| {
        let id = engine.node_id(node)?;
        engine.node_data_mut(node)?.baseline = trampoline;
        engine.tree.mark_dirty(id)?;
        Ok(())
    })
}

pub fn node_has_baseline_func(node: NativeRef) -> Result<bool> {
    with_engine(|engine| Ok(engine.node_data(node)?.baseline.is_some()))
}

/// Baseline of a laid-out node: the trampoline's answer given the computed
/// size, or the computed height when none is installed.
///
/// The trampoline runs after the engine borrow is released, so the callback
/// may read properties of its node.
pub(crate) fn node_baseline(node: NativeRef) -> Result<f32> {
    let (trampoline, width, height) = with_engine(|engine| {
        let id = engine.node_id(node)?;
        let size = engine.computed_layout(id)?.size;
        let trampoline = engine.node_data(node)?.baseline.clone();
        Ok((trampoline, size.width, size.height))
    })?;
    Ok(trampoline.map_or(height, |trampoline| trampoline.baseline(width, height)))
}

// =============================================================================
// Style
// =============================================================================

/// Snapshot of a node's style (`YGNodeStyleGet*`).
pub fn node_style(node: NativeRef) -> Result<NativeStyle> {
    with_engine(|engine| Ok(engine.node_data(node)?.style.clone()))
}

/// Read one field of a node's style without cloning the record.
pub fn node_read_style<T>(node: NativeRef, read: impl FnOnce(&NativeStyle) -> T) -> Result<T> {
    with_engine(|engine| Ok(read(&engine.node_data(node)?.style)))
}

/// Mutate a node's style and mark it dirty (`YGNodeStyleSet*`).
pub(crate) fn node_update_style(node: NativeRef, update: impl FnOnce(&mut NativeStyle)) -> Result<()> {
    with_engine(|engine| {
        let id = engine.node_id(node)?;
        update(&mut engine.node_data_mut(node)?.style);
        engine.sync_style(id)
    })
}

/// Copy `source`'s style onto `dest` (`YGNodeCopyStyle`).
///
/// `dest` keeps its own config's defaults: unset flex factors still follow
/// the config `dest` was created with.
pub(crate) fn node_copy_style(dest: NativeRef, source: NativeRef) -> Result<()> {
    with_engine(|engine| {
        let id = engine.node_id(dest)?;
        let mut style = engine.node_data(source)?.style.clone();
        let data = engine.node_data_mut(dest)?;
        style.web_defaults = data.style.web_defaults;
        data.style = style;
        engine.sync_style(id)
    })
}

/// Render the subtree as indented pseudo-HTML (`YGNodePrint`).
pub fn node_print(node: NativeRef, options: PrintOptions) -> Result<String> {
    with_engine(|engine| {
        let id = engine.node_id(node)?;
        let mut out = String::new();
        print::print_node(engine, id, options, 0, &mut out)?;
        Ok(out)
    })
}

// =============================================================================
// Config
// =============================================================================

/// The per-thread default config (`YGConfigGetDefault`). Never freed.
pub const fn config_get_default() -> NativeRef {
    NativeRef::new(DEFAULT_CONFIG_ADDRESS, HandleKind::Config)
}

/// Create a config with default settings (`YGConfigNew`).
pub(crate) fn config_new() -> Result<NativeRef> {
    with_engine(|engine| {
        let address = engine.next_config;
        engine.next_config = address
            .checked_add(1)
            .ok_or_else(|| Error::Allocation("config address space exhausted".into()))?;
        engine.configs.insert(address, NativeConfig::default());
        CONFIG_COUNT.with(|count| count.set(count.get() + 1));
        Ok(NativeRef::new(address, HandleKind::Config))
    })
}

/// Free a config (`YGConfigFree`). The default config cannot be freed.
pub(crate) fn config_free(config: NativeRef) -> Result<()> {
    if config == config_get_default() {
        return Err(invalid(config));
    }
    with_engine(|engine| {
        engine.config(config)?;
        engine.configs.remove(&config.address());
        CONFIG_COUNT.with(|count| count.set(count.get().saturating_sub(1)));
        Ok(())
    })
}

/// Live config count on this thread, excluding the default (`YGConfigGetInstanceCount`).
pub fn config_instance_count() -> usize {
    CONFIG_COUNT.with(Cell::get)
}

/// Copy every setting from `source` into `dest` (`YGConfigCopy`).
pub(crate) fn config_copy(dest: NativeRef, source: NativeRef) -> Result<()> {
    with_engine(|engine| {
        let settings = engine.config(source)?.clone();
        *engine.config_mut(dest)? = settings;
        Ok(())
    })
}

pub(crate) fn config_set_point_scale_factor(config: NativeRef, factor: f32) -> Result<()> {
    with_engine(|engine| {
        // Negative or NaN factors mean "no rounding", like zero.
        engine.config_mut(config)?.point_scale_factor = if factor.is_finite() && factor > 0.0 {
            factor
        } else {
            0.0
        };
        Ok(())
    })
}

pub fn config_get_point_scale_factor(config: NativeRef) -> Result<f32> {
    with_engine(|engine| Ok(engine.config(config)?.point_scale_factor))
}

pub(crate) fn config_set_use_legacy_stretch_behaviour(config: NativeRef, enabled: bool) -> Result<()> {
    with_engine(|engine| {
        engine.config_mut(config)?.use_legacy_stretch_behaviour = enabled;
        Ok(())
    })
}

pub fn config_get_use_legacy_stretch_behaviour(config: NativeRef) -> Result<bool> {
    with_engine(|engine| Ok(engine.config(config)?.use_legacy_stretch_behaviour))
}

pub(crate) fn config_set_use_web_defaults(config: NativeRef, enabled: bool) -> Result<()> {
    with_engine(|engine| {
        engine.config_mut(config)?.use_web_defaults = enabled;
        Ok(())
    })
}

pub fn config_get_use_web_defaults(config: NativeRef) -> Result<bool> {
    with_engine(|engine| Ok(engine.config(config)?.use_web_defaults))
}

pub(crate) fn config_set_experimental_feature_enabled(
    config: NativeRef,
    feature: ExperimentalFeature,
    enabled: bool,
) -> Result<()> {
    with_engine(|engine| {
        let features = &mut engine.config_mut(config)?.experimental_features;
        features.retain(|existing| *existing != feature);
        if enabled {
            features.push(feature);
        }
        Ok(())
    })
}

pub fn config_is_experimental_feature_enabled(
    config: NativeRef,
    feature: ExperimentalFeature,
) -> Result<bool> {
    with_engine(|engine| Ok(engine.config(config)?.experimental_features.contains(&feature)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_new() -> Result<NativeRef> {
        node_new_with_config(config_get_default())
    }

    #[test]
    fn test_node_lifecycle_counts() {
        let before = node_instance_count();
        let node = node_new().unwrap();
        assert_eq!(node_instance_count(), before + 1);
        node_free(node).unwrap();
        assert_eq!(node_instance_count(), before);
    }

    #[test]
    fn test_freed_handle_is_rejected() {
        let node = node_new().unwrap();
        node_free(node).unwrap();
        assert!(matches!(
            node_get_child_count(node),
            Err(Error::InvalidHandle { kind: "node", .. })
        ));
        assert!(node_free(node).is_err());
    }

    #[test]
    fn test_insert_and_remove_child() {
        let parent = node_new().unwrap();
        let child = node_new().unwrap();

        node_insert_child(parent, child, 0).unwrap();
        assert_eq!(node_get_child_count(parent).unwrap(), 1);
        assert_eq!(node_get_child(parent, 0).unwrap(), Some(child));
        assert_eq!(node_get_parent(child).unwrap(), Some(parent));

        node_remove_child(parent, child).unwrap();
        assert_eq!(node_get_child_count(parent).unwrap(), 0);
        assert_eq!(node_get_parent(child).unwrap(), None);

        // removing a non-child is a no-op
        node_remove_child(parent, child).unwrap();

        node_free(child).unwrap();
        node_free(parent).unwrap();
    }

    #[test]
    fn test_free_orphans_children() {
        let parent = node_new().unwrap();
        let child = node_new().unwrap();
        node_insert_child(parent, child, 0).unwrap();

        node_free(parent).unwrap();
        assert_eq!(node_get_parent(child).unwrap(), None);
        node_free(child).unwrap();
    }

    #[test]
    fn test_style_round_trip_and_layout() {
        let node = node_new().unwrap();
        node_update_style(node, |style| {
            style.width = crate::types::Value::Point(120.0);
            style.height = crate::types::Value::Point(40.0);
        })
        .unwrap();
        assert!(node_is_dirty(node).unwrap());

        node_calculate_layout(node, None, None, Direction::Inherit).unwrap();
        let layout = node_layout(node).unwrap();
        assert_eq!(layout.width, 120.0);
        assert_eq!(layout.height, 40.0);
        assert_eq!(layout.direction, Direction::Ltr);
        assert!(!node_is_dirty(node).unwrap());

        node_free(node).unwrap();
    }

    struct FixedMeasure(Rc<()>);

    impl MeasureTrampoline for FixedMeasure {
        fn measure(&self, _: f32, _: MeasureMode, _: f32, _: MeasureMode) -> crate::types::Size {
            crate::types::Size::new(3.0, 3.0)
        }
    }

    #[test]
    fn test_free_drops_installed_callbacks() {
        let token = Rc::new(());
        let node = node_new().unwrap();
        node_set_measure_func(node, Some(Rc::new(FixedMeasure(Rc::clone(&token))))).unwrap();
        assert_eq!(Rc::strong_count(&token), 2);

        node_free(node).unwrap();
        assert_eq!(Rc::strong_count(&token), 1);
        assert!(node_layout(node).is_err());
    }

    #[test]
    fn test_freed_handle_stays_dead_after_slot_reuse() {
        let node = node_new().unwrap();
        node_free(node).unwrap();
        let reused = node_new().unwrap();
        assert_ne!(reused, node);
        assert!(node_free(node).is_err());
        assert_eq!(node_get_child_count(reused).unwrap(), 0);
        node_free(reused).unwrap();
    }

    #[test]
    fn test_reset_forgets_computed_layout() {
        let node = node_new().unwrap();
        node_update_style(node, |style| {
            style.width = crate::types::Value::Point(50.0);
            style.height = crate::types::Value::Point(20.0);
        })
        .unwrap();
        assert_eq!(node_layout(node).unwrap().direction, Direction::Inherit);

        node_calculate_layout(node, None, None, Direction::Rtl).unwrap();
        assert_eq!(node_layout(node).unwrap().width, 50.0);
        assert_eq!(node_layout(node).unwrap().direction, Direction::Rtl);

        node_reset(node).unwrap();
        let layout = node_layout(node).unwrap();
        assert_eq!(layout.width, 0.0);
        assert_eq!(layout.height, 0.0);
        assert_eq!(layout.direction, Direction::Inherit);
        assert_eq!(node_baseline(node).unwrap(), 0.0);

        node_calculate_layout(node, None, None, Direction::Inherit).unwrap();
        assert_eq!(node_layout(node).unwrap().direction, Direction::Ltr);
        node_free(node).unwrap();
    }

    #[test]
    fn test_copy_style_keeps_destination_defaults() {
        let web = config_new().unwrap();
        config_set_use_web_defaults(web, true).unwrap();
        let source = node_new_with_config(web).unwrap();
        let dest = node_new().unwrap();
        node_update_style(source, |style| style.width = crate::types::Value::Point(10.0)).unwrap();

        node_copy_style(dest, source).unwrap();
        let style = node_style(dest).unwrap();
        assert_eq!(style.width, crate::types::Value::Point(10.0));
        assert!(!style.web_defaults);

        node_free(source).unwrap();
        node_free(dest).unwrap();
        config_free(web).unwrap();
    }

    #[test]
    fn test_default_config_cannot_be_freed() {
        assert!(config_free(config_get_default()).is_err());
        assert!(config_get_point_scale_factor(config_get_default()).is_ok());
    }

    #[test]
    fn test_config_copy() {
        let before = config_instance_count();
        let source = config_new().unwrap();
        let dest = config_new().unwrap();
        assert_eq!(config_instance_count(), before + 2);

        config_set_use_web_defaults(source, true).unwrap();
        config_set_experimental_feature_enabled(source, ExperimentalFeature::WebFlexBasis, true)
            .unwrap();
        config_copy(dest, source).unwrap();
        assert!(config_get_use_web_defaults(dest).unwrap());
        assert!(
            config_is_experimental_feature_enabled(dest, ExperimentalFeature::WebFlexBasis)
                .unwrap()
        );

        config_free(source).unwrap();
        config_free(dest).unwrap();
        assert_eq!(config_instance_count(), before);
    }

    #[test]
    fn test_measure_constraint_modes() {
        assert_eq!(
            measure_constraint(Some(10.0), AvailableSpace::MaxContent),
            (10.0, MeasureMode::Exactly)
        );
        assert_eq!(
            measure_constraint(None, AvailableSpace::Definite(50.0)),
            (50.0, MeasureMode::AtMost)
        );
        let (size, mode) = measure_constraint(None, AvailableSpace::MaxContent);
        assert!(size.is_nan());
        assert_eq!(mode, MeasureMode::Undefined);
    }
}
