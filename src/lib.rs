//! # spark-yoga
//!
//! Yoga-style layout nodes for Rust.
//!
//! Built on [taffy](https://github.com/DioxusLabs/taffy) for flexbox resolution.
//!
//! ## Architecture
//!
//! spark-yoga is a binding layer: the solver lives behind a handle-addressed
//! engine surface, and the public [`Node`] is a managed shadow of one engine
//! node. The shadow tree owns every engine resource, mirrors every structural
//! change, and checks the invariants the engine assumes but never verifies:
//! ```text
//! Node / Config → OwnedHandle → engine::native → TaffyTree
//!       ▲                                  │
//!       └──── bridge (measure/baseline) ◀──┘
//! ```
//!
//! Engine state is per thread, and `Node`/`Config` are `!Send`, so a tree and
//! its layout pass never cross threads.
//!
//! ## Modules
//!
//! - [`types`] - Enumerations with engine ordinals, `Value`, `Size`, `PrintOptions`
//! - [`engine`] - Native handles, lifetime registry, the Taffy-backed engine
//! - [`node`] - Shadow tree and its typed style/layout accessors
//! - [`config`] - Shared layout settings and the default config
//! - [`props`] - Name-addressed property tables, `set_many`, snapshots
//! - [`bridge`] - Measure and baseline callback trampolines

pub mod bridge;
pub mod config;
pub mod engine;
pub mod error;
pub mod node;
pub mod props;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use bridge::{BaselineFn, MeasureFn};
pub use config::Config;
pub use error::{Error, Result};
pub use node::Node;
pub use props::{PropValue, Property, Shape, LAYOUT_PROPERTIES, STYLE_PROPERTIES};

pub use engine::native::{config_instance_count, node_instance_count};
