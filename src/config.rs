//! Config - shared layout settings for a family of nodes.
//!
//! Every node is created against a config. [`Config::default`] returns the
//! per-thread shared instance wrapping the engine's built-in default config,
//! which the binding layer never frees; [`Config::new`] acquires an ordinary
//! config that is released when its last clone (and last node) is gone.
//!
//! Of the settings, only web defaults and "point scale factor is zero" change
//! layout. Taffy rounds to whole pixels or not at all, so any nonzero factor
//! rounds to whole pixels. Legacy stretch and experimental features are
//! stored and copied but not consulted by the solver.

use std::fmt;
use std::rc::Rc;

use crate::engine::{native, NativeRef, OwnedHandle};
use crate::error::Result;
use crate::node::Node;
use crate::types::ExperimentalFeature;

enum ConfigHandle {
    /// Acquired by this layer, released on drop.
    Owned(OwnedHandle),
    /// The engine's default config. Exempt from release.
    Shared(NativeRef),
}

struct ConfigInner {
    handle: ConfigHandle,
}

thread_local! {
    static DEFAULT_CONFIG: Config = Config(Rc::new(ConfigInner {
        handle: ConfigHandle::Shared(native::config_get_default()),
    }));
}

/// A reference-counted layout config.
///
/// Clones share the same engine config. Nodes keep a clone, so a config
/// outlives every node created against it.
#[derive(Clone)]
pub struct Config(Rc<ConfigInner>);

impl Config {
    /// Acquire a fresh config with engine defaults.
    pub fn new() -> Result<Self> {
        let handle = OwnedHandle::acquire_config()?;
        Ok(Self(Rc::new(ConfigInner {
            handle: ConfigHandle::Owned(handle),
        })))
    }

    pub(crate) fn raw(&self) -> Result<NativeRef> {
        match &self.0.handle {
            ConfigHandle::Owned(handle) => handle.get(),
            ConfigHandle::Shared(raw) => Ok(*raw),
        }
    }

    /// Whether this is the shared default config.
    pub fn is_default(&self) -> bool {
        matches!(self.0.handle, ConfigHandle::Shared(_))
    }

    /// Copy every setting from `source` into this config.
    pub fn copy_from(&self, source: &Config) -> Result<()> {
        native::config_copy(self.raw()?, source.raw()?)
    }

    /// Create a node against this config.
    pub fn new_node(&self) -> Result<Node> {
        Node::new_with_config(self)
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Pixel grid to round layout results to. `0` disables rounding; any
    /// other value rounds to whole pixels.
    pub fn set_point_scale_factor(&self, factor: f32) -> Result<()> {
        native::config_set_point_scale_factor(self.raw()?, factor)
    }

    pub fn point_scale_factor(&self) -> Result<f32> {
        native::config_get_point_scale_factor(self.raw()?)
    }

    /// Stored for round-tripping; layout does not consult it.
    pub fn set_use_legacy_stretch_behaviour(&self, enabled: bool) -> Result<()> {
        native::config_set_use_legacy_stretch_behaviour(self.raw()?, enabled)
    }

    pub fn use_legacy_stretch_behaviour(&self) -> Result<bool> {
        native::config_get_use_legacy_stretch_behaviour(self.raw()?)
    }

    /// Create nodes with CSS defaults (`row`, shrink 1) instead of Yoga's.
    ///
    /// Affects nodes created after the call.
    pub fn set_use_web_defaults(&self, enabled: bool) -> Result<()> {
        native::config_set_use_web_defaults(self.raw()?, enabled)
    }

    pub fn use_web_defaults(&self) -> Result<bool> {
        native::config_get_use_web_defaults(self.raw()?)
    }

    /// Stored for round-tripping; layout does not consult it.
    pub fn set_experimental_feature_enabled(
        &self,
        feature: ExperimentalFeature,
        enabled: bool,
    ) -> Result<()> {
        native::config_set_experimental_feature_enabled(self.raw()?, feature, enabled)
    }

    pub fn is_experimental_feature_enabled(&self, feature: ExperimentalFeature) -> Result<bool> {
        native::config_is_experimental_feature_enabled(self.raw()?, feature)
    }
}

impl Default for Config {
    /// The shared default config for this thread. Every call returns the
    /// same instance.
    fn default() -> Self {
        DEFAULT_CONFIG.with(Clone::clone)
    }
}

impl PartialEq for Config {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Config {}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let address = match &self.0.handle {
            ConfigHandle::Owned(handle) => handle.handle().address(),
            ConfigHandle::Shared(raw) => raw.address(),
        };
        f.debug_struct("Config")
            .field("address", &format_args!("{address:#x}"))
            .field("default", &self.is_default())
            .finish()
    }
}
