//! Typed style accessors.
//!
//! Every getter and setter is a direct pass-through to the engine's style
//! record. Setters mark the node dirty; none of them validate ranges.
//!
//! # Property Categories
//!
//! - **Container**: direction, flex_direction, justify_content, align_items,
//!   align_content, flex_wrap, overflow
//! - **Item**: align_self, flex, flex_grow, flex_shrink, flex_basis,
//!   position_type, display, node_type
//! - **Dimensions**: width, height, min/max width/height, aspect_ratio
//! - **Edged**: margin, padding, border, position (per edge keyword)

use crate::engine::native;
use crate::error::Result;
use crate::types::{
    Align, Direction, Display, Edge, FlexDirection, Justify, NodeType, Overflow, PositionType,
    Value, Wrap, UNDEFINED,
};

use super::Node;

/// Keyword properties: plain copy in, copy out.
macro_rules! keyword_properties {
    ($( $(#[$meta:meta])* $get:ident, $set:ident: $ty:ty; )+) => {
        impl Node {
            $(
                $(#[$meta])*
                pub fn $get(&self) -> Result<$ty> {
                    native::node_read_style(self.raw()?, |style| style.$get)
                }

                pub fn $set(&self, value: $ty) -> Result<()> {
                    native::node_update_style(self.raw()?, |style| style.$get = value)
                }
            )+
        }
    };
}

/// Length properties: setters take anything that converts into a [`Value`],
/// so `set_width(80.0)` means points.
macro_rules! length_properties {
    ($( $(#[$meta:meta])* $get:ident, $set:ident; )+) => {
        impl Node {
            $(
                $(#[$meta])*
                pub fn $get(&self) -> Result<Value> {
                    native::node_read_style(self.raw()?, |style| style.$get)
                }

                pub fn $set(&self, value: impl Into<Value>) -> Result<()> {
                    let value = value.into();
                    native::node_update_style(self.raw()?, |style| style.$get = value)
                }
            )+
        }
    };
}

/// Edged properties plus one convenience pair per edge keyword.
macro_rules! edge_properties {
    ($(
        $(#[$meta:meta])*
        $get:ident, $set:ident {
            $( $edge:ident => $edge_get:ident, $edge_set:ident; )+
        }
    )+) => {
        impl Node {
            $(
                $(#[$meta])*
                pub fn $get(&self, edge: Edge) -> Result<Value> {
                    native::node_read_style(self.raw()?, |style| style.$get.get(edge))
                }

                pub fn $set(&self, edge: Edge, value: impl Into<Value>) -> Result<()> {
                    let value = value.into();
                    native::node_update_style(self.raw()?, |style| style.$get.set(edge, value))
                }

                $(
                    pub fn $edge_get(&self) -> Result<Value> {
                        self.$get(Edge::$edge)
                    }

                    pub fn $edge_set(&self, value: impl Into<Value>) -> Result<()> {
                        self.$set(Edge::$edge, value)
                    }
                )+
            )+
        }
    };
}

// =============================================================================
// KEYWORDS
// =============================================================================

keyword_properties! {
    /// Layout direction; `Inherit` takes the parent's at layout time.
    direction, set_direction: Direction;
    flex_direction, set_flex_direction: FlexDirection;
    justify_content, set_justify_content: Justify;
    align_content, set_align_content: Align;
    align_items, set_align_items: Align;
    /// `Auto` defers to the parent's `align_items`.
    align_self, set_align_self: Align;
    position_type, set_position_type: PositionType;
    flex_wrap, set_flex_wrap: Wrap;
    overflow, set_overflow: Overflow;
    display, set_display: Display;
    node_type, set_node_type: NodeType;
}

// =============================================================================
// LENGTHS
// =============================================================================

length_properties! {
    width, set_width;
    height, set_height;
    min_width, set_min_width;
    min_height, set_min_height;
    max_width, set_max_width;
    max_height, set_max_height;
    /// Initial main-axis size before grow/shrink.
    flex_basis, set_flex_basis;
}

// =============================================================================
// EDGES
// =============================================================================

edge_properties! {
    margin, set_margin {
        Left => margin_left, set_margin_left;
        Top => margin_top, set_margin_top;
        Right => margin_right, set_margin_right;
        Bottom => margin_bottom, set_margin_bottom;
        Start => margin_start, set_margin_start;
        End => margin_end, set_margin_end;
        Horizontal => margin_horizontal, set_margin_horizontal;
        Vertical => margin_vertical, set_margin_vertical;
        All => margin_all, set_margin_all;
    }
    padding, set_padding {
        Left => padding_left, set_padding_left;
        Top => padding_top, set_padding_top;
        Right => padding_right, set_padding_right;
        Bottom => padding_bottom, set_padding_bottom;
        Start => padding_start, set_padding_start;
        End => padding_end, set_padding_end;
        Horizontal => padding_horizontal, set_padding_horizontal;
        Vertical => padding_vertical, set_padding_vertical;
        All => padding_all, set_padding_all;
    }
    border, set_border {
        Left => border_left, set_border_left;
        Top => border_top, set_border_top;
        Right => border_right, set_border_right;
        Bottom => border_bottom, set_border_bottom;
        Start => border_start, set_border_start;
        End => border_end, set_border_end;
        Horizontal => border_horizontal, set_border_horizontal;
        Vertical => border_vertical, set_border_vertical;
        All => border_all, set_border_all;
    }
    /// Offsets from the containing block, used with `PositionType`.
    position, set_position {
        Left => position_left, set_position_left;
        Top => position_top, set_position_top;
        Right => position_right, set_position_right;
        Bottom => position_bottom, set_position_bottom;
        Start => position_start, set_position_start;
        End => position_end, set_position_end;
        Horizontal => position_horizontal, set_position_horizontal;
        Vertical => position_vertical, set_position_vertical;
        All => position_all, set_position_all;
    }
}

// =============================================================================
// FLEX FACTORS
// =============================================================================

/// NaN clears an optional factor back to its default.
fn factor(value: f32) -> Option<f32> {
    (!value.is_nan()).then_some(value)
}

impl Node {
    /// The `flex` shorthand, `UNDEFINED` when unset.
    pub fn flex(&self) -> Result<f32> {
        native::node_read_style(self.raw()?, |style| style.flex.unwrap_or(UNDEFINED))
    }

    pub fn set_flex(&self, flex: f32) -> Result<()> {
        native::node_update_style(self.raw()?, |style| style.flex = factor(flex))
    }

    /// Explicit flex-grow, or the default of 0.
    pub fn flex_grow(&self) -> Result<f32> {
        native::node_read_style(self.raw()?, |style| style.flex_grow.unwrap_or(0.0))
    }

    pub fn set_flex_grow(&self, grow: f32) -> Result<()> {
        native::node_update_style(self.raw()?, |style| style.flex_grow = factor(grow))
    }

    /// Explicit flex-shrink, or the config's default (0, or 1 with web
    /// defaults).
    pub fn flex_shrink(&self) -> Result<f32> {
        native::node_read_style(self.raw()?, |style| {
            style
                .flex_shrink
                .unwrap_or(if style.web_defaults { 1.0 } else { 0.0 })
        })
    }

    pub fn set_flex_shrink(&self, shrink: f32) -> Result<()> {
        native::node_update_style(self.raw()?, |style| style.flex_shrink = factor(shrink))
    }

    /// Width / height ratio, `UNDEFINED` when unset.
    pub fn aspect_ratio(&self) -> Result<f32> {
        native::node_read_style(self.raw()?, |style| style.aspect_ratio.unwrap_or(UNDEFINED))
    }

    pub fn set_aspect_ratio(&self, ratio: f32) -> Result<()> {
        native::node_update_style(self.raw()?, |style| style.aspect_ratio = factor(ratio))
    }
}
