//! Error taxonomy for the binding layer.
//!
//! Structural errors are the binding layer refusing a mutation the engine
//! would silently accept. None of them leave either tree partially mutated.

use thiserror::Error;

use crate::types::Edge;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Structural invariants
    // -------------------------------------------------------------------------
    #[error("child node already has a parent, it must be removed first")]
    ChildAlreadyParented,

    #[error("cannot add child: nodes with measure functions cannot have children")]
    HasMeasureFunction,

    #[error("cannot set measure function: node has {0} children")]
    HasChildren(usize),

    #[error("cannot reset a node which still has children attached")]
    ResetWithChildren,

    #[error("cannot reset a node still attached to a parent")]
    ResetAttached,

    #[error("only leaf nodes with custom measure functions can be marked dirty")]
    MarkDirtyWithoutMeasure,

    #[error("inserting this child would make a node its own ancestor")]
    WouldCycle,

    #[error("child index {index} out of bounds for a node with {count} children")]
    IndexOutOfBounds { index: usize, count: usize },

    // -------------------------------------------------------------------------
    // Consistency
    // -------------------------------------------------------------------------
    #[error("shadow tree out of sync with engine: {0}")]
    Desync(String),

    // -------------------------------------------------------------------------
    // Engine
    // -------------------------------------------------------------------------
    #[error("layout engine is busy computing layout; callbacks cannot touch the engine")]
    EngineBusy,

    #[error("native {0} handle was already released")]
    Released(&'static str),

    #[error("unknown native {kind} handle {address:#x}")]
    InvalidHandle { kind: &'static str, address: u64 },

    #[error("native allocation failed: {0}")]
    Allocation(String),

    #[error("native engine error: {0}")]
    Native(#[from] taffy::TaffyError),

    // -------------------------------------------------------------------------
    // Contract misuse
    // -------------------------------------------------------------------------
    #[error("invalid {enumeration} ordinal {value}")]
    InvalidOrdinal {
        enumeration: &'static str,
        value: u8,
    },

    #[error("unknown property `{0}`")]
    UnknownProperty(String),

    #[error("property `{name}` expects a {expected} value")]
    PropertyType {
        name: &'static str,
        expected: &'static str,
    },

    #[error("edge `{0}` has no single computed layout value")]
    UnsupportedEdge(Edge),
}
