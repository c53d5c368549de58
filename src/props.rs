//! Property tables - name-addressed access to the typed accessors.
//!
//! [`STYLE_PROPERTIES`] and [`LAYOUT_PROPERTIES`] map each property name to
//! the [`Node`] accessor that serves it, the shape of value it takes, and
//! whether it is qualified by an edge. The bulk helpers are built on them:
//!
//! - [`Node::set_many`] resolves every name and coerces every value before
//!   applying any of them
//! - [`Node::read_styles`] / [`Node::read_layout`] snapshot every property
//!
//! # Name resolution
//!
//! 1. An exact table match wins. An edged property named without an edge
//!    (`"margin"`) addresses [`Edge::All`].
//! 2. Otherwise a trailing `_<edge>` is stripped (`"margin_start"`) and the
//!    rest must name an edged property.
//!
//! Exact matches are tried first, so a property whose own name ends in an
//! edge keyword is never split.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::node::Node;
use crate::types::{
    Align, Direction, Display, Edge, FlexDirection, Justify, NodeType, Overflow, PositionType,
    Value, Wrap,
};

// =============================================================================
// Values
// =============================================================================

/// A property value of any shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropValue {
    Number(f32),
    Length(Value),
    Align(Align),
    Direction(Direction),
    Display(Display),
    FlexDirection(FlexDirection),
    Justify(Justify),
    NodeType(NodeType),
    Overflow(Overflow),
    PositionType(PositionType),
    Wrap(Wrap),
    Bool(bool),
}

macro_rules! prop_value_from {
    ($( $variant:ident($ty:ty) ),+ $(,)?) => {
        $(
            impl From<$ty> for PropValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

prop_value_from! {
    Number(f32),
    Length(Value),
    Align(Align),
    Direction(Direction),
    Display(Display),
    FlexDirection(FlexDirection),
    Justify(Justify),
    NodeType(NodeType),
    Overflow(Overflow),
    PositionType(PositionType),
    Wrap(Wrap),
    Bool(bool),
}

/// The value shape a property accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Number,
    Length,
    Align,
    Direction,
    Display,
    FlexDirection,
    Justify,
    NodeType,
    Overflow,
    PositionType,
    Wrap,
    Bool,
}

impl Shape {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Length => "length",
            Self::Align => "align",
            Self::Direction => "direction",
            Self::Display => "display",
            Self::FlexDirection => "flex direction",
            Self::Justify => "justify",
            Self::NodeType => "node type",
            Self::Overflow => "overflow",
            Self::PositionType => "position type",
            Self::Wrap => "wrap",
            Self::Bool => "boolean",
        }
    }

    /// Convert `value` into this shape. Numbers and lengths convert into
    /// each other; a number is a point length.
    fn coerce(self, value: PropValue) -> Option<PropValue> {
        match (self, value) {
            (Self::Length, PropValue::Number(number)) => Some(PropValue::Length(number.into())),
            (Self::Number, PropValue::Length(length)) => Some(PropValue::Number(length.value())),
            _ if self == value.shape() => Some(value),
            _ => None,
        }
    }
}

impl PropValue {
    pub const fn shape(&self) -> Shape {
        match self {
            Self::Number(_) => Shape::Number,
            Self::Length(_) => Shape::Length,
            Self::Align(_) => Shape::Align,
            Self::Direction(_) => Shape::Direction,
            Self::Display(_) => Shape::Display,
            Self::FlexDirection(_) => Shape::FlexDirection,
            Self::Justify(_) => Shape::Justify,
            Self::NodeType(_) => Shape::NodeType,
            Self::Overflow(_) => Shape::Overflow,
            Self::PositionType(_) => Shape::PositionType,
            Self::Wrap(_) => Shape::Wrap,
            Self::Bool(_) => Shape::Bool,
        }
    }
}

// =============================================================================
// Property Tables
// =============================================================================

type PlainGet = fn(&Node) -> Result<PropValue>;
type PlainSet = fn(&Node, PropValue) -> Result<()>;
type EdgedGet = fn(&Node, Edge) -> Result<PropValue>;
type EdgedSet = fn(&Node, Edge, PropValue) -> Result<()>;

/// How a property reaches its accessor. Layout properties have no setter.
#[derive(Clone, Copy)]
enum Access {
    Plain {
        get: PlainGet,
        set: Option<PlainSet>,
    },
    Edged {
        get: EdgedGet,
        set: Option<EdgedSet>,
    },
}

/// One named property.
#[derive(Clone, Copy)]
pub struct Property {
    pub name: &'static str,
    pub shape: Shape,
    access: Access,
}

impl Property {
    pub fn is_edged(&self) -> bool {
        matches!(self.access, Access::Edged { .. })
    }

    pub fn is_writable(&self) -> bool {
        match self.access {
            Access::Plain { set, .. } => set.is_some(),
            Access::Edged { set, .. } => set.is_some(),
        }
    }
}

impl std::fmt::Debug for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .field("edged", &self.is_edged())
            .finish()
    }
}

fn mismatch(name: &'static str, shape: Shape) -> Error {
    Error::PropertyType {
        name,
        expected: shape.name(),
    }
}

/// A read/write style property.
macro_rules! style {
    ($name:literal, $shape:ident, $get:ident, $set:ident) => {
        Property {
            name: $name,
            shape: Shape::$shape,
            access: Access::Plain {
                get: |node| node.$get().map(PropValue::$shape),
                set: Some(|node, value| match value {
                    PropValue::$shape(value) => node.$set(value),
                    _ => Err(mismatch($name, Shape::$shape)),
                }),
            },
        }
    };
}

/// A read/write style property qualified by an edge.
macro_rules! style_edged {
    ($name:literal, $get:ident, $set:ident) => {
        Property {
            name: $name,
            shape: Shape::Length,
            access: Access::Edged {
                get: |node, edge| node.$get(edge).map(PropValue::Length),
                set: Some(|node, edge, value| match value {
                    PropValue::Length(value) => node.$set(edge, value),
                    _ => Err(mismatch($name, Shape::Length)),
                }),
            },
        }
    };
}

/// A read-only layout result.
macro_rules! layout {
    ($name:literal, $shape:ident, $get:ident) => {
        Property {
            name: $name,
            shape: Shape::$shape,
            access: Access::Plain {
                get: |node| node.$get().map(PropValue::$shape),
                set: None,
            },
        }
    };
}

/// A read-only layout result qualified by an edge.
macro_rules! layout_edged {
    ($name:literal, $get:ident) => {
        Property {
            name: $name,
            shape: Shape::Number,
            access: Access::Edged {
                get: |node, edge| node.$get(edge).map(PropValue::Number),
                set: None,
            },
        }
    };
}

/// Every style property, in declaration order.
pub static STYLE_PROPERTIES: &[Property] = &[
    style!("direction", Direction, direction, set_direction),
    style!("flex_direction", FlexDirection, flex_direction, set_flex_direction),
    style!("justify_content", Justify, justify_content, set_justify_content),
    style!("align_content", Align, align_content, set_align_content),
    style!("align_items", Align, align_items, set_align_items),
    style!("align_self", Align, align_self, set_align_self),
    style!("position_type", PositionType, position_type, set_position_type),
    style!("flex_wrap", Wrap, flex_wrap, set_flex_wrap),
    style!("overflow", Overflow, overflow, set_overflow),
    style!("display", Display, display, set_display),
    style!("node_type", NodeType, node_type, set_node_type),
    style!("flex", Number, flex, set_flex),
    style!("flex_grow", Number, flex_grow, set_flex_grow),
    style!("flex_shrink", Number, flex_shrink, set_flex_shrink),
    style!("flex_basis", Length, flex_basis, set_flex_basis),
    style!("width", Length, width, set_width),
    style!("height", Length, height, set_height),
    style!("min_width", Length, min_width, set_min_width),
    style!("min_height", Length, min_height, set_min_height),
    style!("max_width", Length, max_width, set_max_width),
    style!("max_height", Length, max_height, set_max_height),
    style!("aspect_ratio", Number, aspect_ratio, set_aspect_ratio),
    style_edged!("margin", margin, set_margin),
    style_edged!("padding", padding, set_padding),
    style_edged!("border", border, set_border),
    style_edged!("position", position, set_position),
];

/// Every computed layout property, in declaration order.
pub static LAYOUT_PROPERTIES: &[Property] = &[
    layout!("left", Number, layout_left),
    layout!("top", Number, layout_top),
    layout!("right", Number, layout_right),
    layout!("bottom", Number, layout_bottom),
    layout!("width", Number, layout_width),
    layout!("height", Number, layout_height),
    layout!("direction", Direction, layout_direction),
    layout!("had_overflow", Bool, layout_had_overflow),
    layout_edged!("margin", layout_margin),
    layout_edged!("border", layout_border),
    layout_edged!("padding", layout_padding),
];

// =============================================================================
// Resolution
// =============================================================================

fn find(table: &'static [Property], name: &str) -> Option<&'static Property> {
    table.iter().find(|property| property.name == name)
}

fn edge_named(name: &str) -> Option<Edge> {
    Edge::ALL.iter().copied().find(|edge| edge.name() == name)
}

/// Resolve a name to a property and, for edged properties, the edge.
pub fn resolve(
    table: &'static [Property],
    name: &str,
) -> Result<(&'static Property, Option<Edge>)> {
    if let Some(property) = find(table, name) {
        let edge = property.is_edged().then_some(Edge::All);
        return Ok((property, edge));
    }
    name.rsplit_once('_')
        .and_then(|(base, suffix)| {
            let property = find(table, base).filter(|property| property.is_edged())?;
            Some((property, Some(edge_named(suffix)?)))
        })
        .ok_or_else(|| Error::UnknownProperty(name.to_string()))
}

fn read(property: &Property, node: &Node, edge: Option<Edge>) -> Result<PropValue> {
    match (property.access, edge) {
        (Access::Plain { get, .. }, _) => get(node),
        (Access::Edged { get, .. }, edge) => get(node, edge.unwrap_or(Edge::All)),
    }
}

fn write(property: &Property, node: &Node, edge: Option<Edge>, value: PropValue) -> Result<()> {
    match (property.access, edge) {
        (Access::Plain { set: Some(set), .. }, _) => set(node, value),
        (Access::Edged { set: Some(set), .. }, edge) => set(node, edge.unwrap_or(Edge::All), value),
        _ => Err(Error::UnknownProperty(property.name.to_string())),
    }
}

fn snapshot(
    node: &Node,
    table: &'static [Property],
    edges: &[Edge],
) -> Result<BTreeMap<String, PropValue>> {
    let mut values = BTreeMap::new();
    for property in table {
        if property.is_edged() {
            for &edge in edges {
                let value = read(property, node, Some(edge))?;
                values.insert(format!("{}_{}", property.name, edge.name()), value);
            }
        } else {
            values.insert(property.name.to_string(), read(property, node, None)?);
        }
    }
    Ok(values)
}

// =============================================================================
// Bulk Helpers
// =============================================================================

impl Node {
    /// Apply several style properties by name.
    ///
    /// Every name is resolved and every value coerced before the first one
    /// is applied, so an unknown name or a mismatched value changes nothing.
    ///
    /// ```ignore
    /// node.set_many([
    ///     ("width", PropValue::from(80.0_f32)),
    ///     ("margin_end", PropValue::from(20.0_f32)),
    ///     ("align_self", PropValue::from(Align::Center)),
    /// ])?;
    /// ```
    pub fn set_many<I, K, V>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<PropValue>,
    {
        let resolved = entries
            .into_iter()
            .map(|(name, value)| {
                let (property, edge) = resolve(STYLE_PROPERTIES, name.as_ref())?;
                let value = property
                    .shape
                    .coerce(value.into())
                    .ok_or_else(|| mismatch(property.name, property.shape))?;
                Ok((property, edge, value))
            })
            .collect::<Result<Vec<_>>>()?;

        for (property, edge, value) in resolved {
            write(property, self, edge, value)?;
        }
        Ok(())
    }

    /// Read one style property by name.
    pub fn get_style(&self, name: &str) -> Result<PropValue> {
        let (property, edge) = resolve(STYLE_PROPERTIES, name)?;
        read(property, self, edge)
    }

    /// Snapshot of every style property; edged ones once per edge keyword.
    pub fn read_styles(&self) -> Result<BTreeMap<String, PropValue>> {
        snapshot(self, STYLE_PROPERTIES, Edge::ALL)
    }

    /// Snapshot of every computed layout property; edged ones once per
    /// single edge.
    pub fn read_layout(&self) -> Result<BTreeMap<String, PropValue>> {
        snapshot(self, LAYOUT_PROPERTIES, Edge::LAYOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_beats_suffix_stripping() {
        let (property, edge) = resolve(STYLE_PROPERTIES, "margin").unwrap();
        assert_eq!(property.name, "margin");
        assert_eq!(edge, Some(Edge::All));

        let (property, edge) = resolve(STYLE_PROPERTIES, "margin_start").unwrap();
        assert_eq!(property.name, "margin");
        assert_eq!(edge, Some(Edge::Start));

        // ends in an edge keyword but is its own property
        let (property, edge) = resolve(LAYOUT_PROPERTIES, "top").unwrap();
        assert_eq!(property.name, "top");
        assert_eq!(edge, None);

        let (property, _) = resolve(STYLE_PROPERTIES, "position_type").unwrap();
        assert_eq!(property.shape, Shape::PositionType);
    }

    #[test]
    fn test_unknown_names() {
        assert!(matches!(
            resolve(STYLE_PROPERTIES, "colour"),
            Err(Error::UnknownProperty(name)) if name == "colour"
        ));
        // suffix stripping only applies to edged properties
        assert!(resolve(STYLE_PROPERTIES, "width_left").is_err());
        assert!(resolve(STYLE_PROPERTIES, "margin_middle").is_err());
    }

    #[test]
    fn test_set_many_applies_and_coerces() {
        let node = Node::new().unwrap();
        node.set_many([
            ("width", PropValue::from(80.0_f32)),
            ("margin_end", PropValue::from(20.0_f32)),
            ("padding", PropValue::from(Value::percent(5.0))),
            ("align_self", PropValue::from(Align::Center)),
            ("flex_grow", PropValue::from(Value::Point(1.0))),
        ])
        .unwrap();

        assert_eq!(node.width().unwrap(), Value::Point(80.0));
        assert_eq!(node.margin_end().unwrap(), Value::Point(20.0));
        assert_eq!(node.padding_all().unwrap(), Value::Percent(5.0));
        assert_eq!(node.align_self().unwrap(), Align::Center);
        assert_eq!(node.flex_grow().unwrap(), 1.0);
    }

    #[test]
    fn test_set_many_is_all_or_nothing() {
        let node = Node::new().unwrap();
        let err = node
            .set_many([
                ("width", PropValue::from(80.0_f32)),
                ("align_items", PropValue::from(3.0_f32)),
            ])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::PropertyType { name: "align_items", expected: "align" }
        ));
        assert_eq!(node.width().unwrap(), Value::Auto);

        assert!(node
            .set_many([("height", 10.0_f32), ("bogus", 1.0_f32)])
            .is_err());
        assert_eq!(node.height().unwrap(), Value::Auto);
    }

    #[test]
    fn test_read_styles_snapshot() {
        let node = Node::new().unwrap();
        node.set_border_left(2.0).unwrap();
        let styles = node.read_styles().unwrap();

        assert_eq!(styles["width"], PropValue::Length(Value::Auto));
        assert_eq!(styles["border_left"], PropValue::Length(Value::Point(2.0)));
        assert_eq!(styles["flex_direction"], PropValue::FlexDirection(FlexDirection::Column));
        assert!(styles.contains_key("margin_horizontal"));
        assert!(styles.contains_key("position_all"));
        assert_eq!(node.get_style("border_left").unwrap(), styles["border_left"]);
    }

    #[test]
    fn test_read_layout_snapshot() {
        let node = Node::new().unwrap();
        node.set_width(50.0).unwrap();
        node.set_height(20.0).unwrap();
        node.calculate_layout(None, None, Direction::Ltr).unwrap();

        let layout = node.read_layout().unwrap();
        assert_eq!(layout["width"], PropValue::Number(50.0));
        assert_eq!(layout["height"], PropValue::Number(20.0));
        assert_eq!(layout["direction"], PropValue::Direction(Direction::Ltr));
        assert_eq!(layout["had_overflow"], PropValue::Bool(false));
        assert!(layout.contains_key("padding_end"));
        assert!(!layout.contains_key("padding_all"));
    }

    #[test]
    fn test_layout_properties_are_read_only() {
        assert!(LAYOUT_PROPERTIES.iter().all(|property| !property.is_writable()));
        assert!(STYLE_PROPERTIES.iter().all(Property::is_writable));
    }
}
