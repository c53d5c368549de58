//! Native style record and its conversion into a Taffy `Style`.
//!
//! The engine stores styles the way Yoga does (nine edge slots per spacing
//! property, the `flex` shorthand, direction-relative edges) and lowers them
//! to Taffy's physical-edge style whenever a node's style or resolved
//! direction changes.

use taffy::{
    AlignContent as TaffyAlignContent, AlignItems as TaffyAlignItems,
    Dimension as TaffyDimension, Display as TaffyDisplay, FlexDirection as TaffyFlexDirection,
    FlexWrap as TaffyFlexWrap, JustifyContent as TaffyJustifyContent, LengthPercentage,
    LengthPercentageAuto, Overflow as TaffyOverflow, Point, Position as TaffyPosition, Rect,
    Size, Style,
};

use crate::types::{
    Align, Direction, Display, Edge, FlexDirection, Justify, NodeType, Overflow, PositionType,
    Value, Wrap,
};

// =============================================================================
// EDGES
// =============================================================================

/// One value per edge keyword, indexed by `Edge` ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges([Value; 9]);

impl Edges {
    pub fn get(&self, edge: Edge) -> Value {
        self.0[edge as usize]
    }

    pub fn set(&mut self, edge: Edge, value: Value) {
        self.0[edge as usize] = value;
    }

    /// Defined slots in edge order, for debug output.
    pub fn defined(&self) -> impl Iterator<Item = (Edge, Value)> + '_ {
        Edge::ALL
            .iter()
            .map(|&edge| (edge, self.get(edge)))
            .filter(|(_, value)| value.is_defined())
    }

    /// Resolve the value for a physical edge.
    ///
    /// Precedence: the direction-relative edge (start/end), the edge itself,
    /// the axis shorthand (horizontal/vertical), then `all`.
    pub fn resolve(&self, edge: Edge, direction: Direction) -> Value {
        let relative = match (edge, direction) {
            (Edge::Left, Direction::Rtl) | (Edge::Right, Direction::Ltr | Direction::Inherit) => {
                Some(Edge::End)
            }
            (Edge::Right, Direction::Rtl) | (Edge::Left, Direction::Ltr | Direction::Inherit) => {
                Some(Edge::Start)
            }
            _ => None,
        };
        let axis = match edge {
            Edge::Left | Edge::Right | Edge::Start | Edge::End => Edge::Horizontal,
            _ => Edge::Vertical,
        };

        relative
            .into_iter()
            .chain([edge, axis, Edge::All])
            .map(|candidate| self.get(candidate))
            .find(Value::is_defined)
            .unwrap_or(Value::Undefined)
    }
}

/// Map a direction-relative edge to the physical edge it lands on.
pub fn physical_edge(edge: Edge, direction: Direction) -> Edge {
    match (edge, direction) {
        (Edge::Start, Direction::Rtl) | (Edge::End, Direction::Ltr | Direction::Inherit) => {
            Edge::Right
        }
        (Edge::End, Direction::Rtl) | (Edge::Start, Direction::Ltr | Direction::Inherit) => {
            Edge::Left
        }
        (other, _) => other,
    }
}

// =============================================================================
// NATIVE STYLE
// =============================================================================

/// Style state of one engine node, in Yoga terms.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeStyle {
    pub direction: Direction,
    pub flex_direction: FlexDirection,
    pub justify_content: Justify,
    pub align_content: Align,
    pub align_items: Align,
    pub align_self: Align,
    pub position_type: PositionType,
    pub flex_wrap: Wrap,
    pub overflow: Overflow,
    pub display: Display,
    pub node_type: NodeType,

    /// `flex` shorthand; expanded into grow/shrink/basis at lowering time.
    pub flex: Option<f32>,
    pub flex_grow: Option<f32>,
    pub flex_shrink: Option<f32>,
    pub flex_basis: Value,

    pub margin: Edges,
    pub position: Edges,
    pub padding: Edges,
    pub border: Edges,

    pub width: Value,
    pub height: Value,
    pub min_width: Value,
    pub min_height: Value,
    pub max_width: Value,
    pub max_height: Value,
    pub aspect_ratio: Option<f32>,

    /// Whether the owning config asked for CSS defaults instead of Yoga's.
    pub web_defaults: bool,
}

impl NativeStyle {
    /// Defaults for a fresh node.
    ///
    /// Yoga defaults are `column` / no shrink / `flex-start` content; web
    /// defaults are `row` / shrink 1 / `stretch` content.
    pub fn new(web_defaults: bool) -> Self {
        Self {
            direction: Direction::Inherit,
            flex_direction: if web_defaults {
                FlexDirection::Row
            } else {
                FlexDirection::Column
            },
            justify_content: Justify::FlexStart,
            align_content: if web_defaults {
                Align::Stretch
            } else {
                Align::FlexStart
            },
            align_items: Align::Stretch,
            align_self: Align::Auto,
            position_type: PositionType::Relative,
            flex_wrap: Wrap::NoWrap,
            overflow: Overflow::Visible,
            display: Display::Flex,
            node_type: NodeType::Default,
            flex: None,
            flex_grow: None,
            flex_shrink: None,
            flex_basis: Value::Auto,
            margin: Edges::default(),
            position: Edges::default(),
            padding: Edges::default(),
            border: Edges::default(),
            width: Value::Auto,
            height: Value::Auto,
            min_width: Value::Undefined,
            min_height: Value::Undefined,
            max_width: Value::Undefined,
            max_height: Value::Undefined,
            aspect_ratio: None,
            web_defaults,
        }
    }

    /// Effective flex-grow after expanding the `flex` shorthand.
    pub fn resolved_flex_grow(&self) -> f32 {
        self.flex_grow
            .or_else(|| self.flex.filter(|flex| *flex > 0.0))
            .unwrap_or(0.0)
    }

    /// Effective flex-shrink after expanding the `flex` shorthand.
    pub fn resolved_flex_shrink(&self) -> f32 {
        self.flex_shrink
            .or_else(|| self.flex.filter(|flex| *flex < 0.0).map(|flex| -flex))
            .unwrap_or(if self.web_defaults { 1.0 } else { 0.0 })
    }

    /// Effective flex-basis after expanding the `flex` shorthand.
    pub fn resolved_flex_basis(&self) -> Value {
        if self.flex_basis.is_defined() && self.flex_basis != Value::Auto {
            return self.flex_basis;
        }
        match self.flex {
            Some(flex) if flex > 0.0 && !self.web_defaults => Value::Point(0.0),
            _ => Value::Auto,
        }
    }

    /// Lower into a Taffy style for the given resolved direction.
    pub fn to_taffy(&self, direction: Direction) -> Style {
        let rtl = direction == Direction::Rtl;

        Style {
            display: to_taffy_display(self.display),
            position: to_taffy_position(self.position_type),
            overflow: Point {
                x: to_taffy_overflow(self.overflow),
                y: to_taffy_overflow(self.overflow),
            },

            flex_direction: to_taffy_flex_direction(self.flex_direction, rtl),
            flex_wrap: to_taffy_flex_wrap(self.flex_wrap),
            justify_content: Some(to_taffy_justify_content(self.justify_content)),
            align_items: Some(to_taffy_align_items(self.align_items)),
            align_content: Some(to_taffy_align_content(self.align_content)),
            align_self: to_taffy_align_self(self.align_self),

            flex_grow: self.resolved_flex_grow(),
            flex_shrink: self.resolved_flex_shrink(),
            flex_basis: to_taffy_dimension(self.resolved_flex_basis()),

            size: Size {
                width: to_taffy_dimension(self.width),
                height: to_taffy_dimension(self.height),
            },
            min_size: Size {
                width: to_taffy_dimension(self.min_width),
                height: to_taffy_dimension(self.min_height),
            },
            max_size: Size {
                width: to_taffy_dimension(self.max_width),
                height: to_taffy_dimension(self.max_height),
            },
            aspect_ratio: self.aspect_ratio,

            margin: physical_rect(&self.margin, direction, to_taffy_margin),
            padding: physical_rect(&self.padding, direction, to_taffy_lp),
            border: physical_rect(&self.border, direction, to_taffy_lp),
            inset: physical_rect(&self.position, direction, to_taffy_inset),

            ..Style::default()
        }
    }
}

// =============================================================================
// VALUE CONVERSION
// =============================================================================

/// Resolve all four physical edges and convert each.
fn physical_rect<T>(edges: &Edges, direction: Direction, convert: fn(Value) -> T) -> Rect<T> {
    Rect {
        left: convert(edges.resolve(Edge::Left, direction)),
        right: convert(edges.resolve(Edge::Right, direction)),
        top: convert(edges.resolve(Edge::Top, direction)),
        bottom: convert(edges.resolve(Edge::Bottom, direction)),
    }
}

/// Sizes: undefined and auto both mean "let the algorithm decide".
fn to_taffy_dimension(value: Value) -> TaffyDimension {
    match value {
        Value::Point(v) => TaffyDimension::Length(v),
        Value::Percent(p) => TaffyDimension::Percent(p / 100.0),
        Value::Undefined | Value::Auto => TaffyDimension::Auto,
    }
}

/// Margins: undefined is zero, auto is a real auto margin.
fn to_taffy_margin(value: Value) -> LengthPercentageAuto {
    match value {
        Value::Point(v) => LengthPercentageAuto::Length(v),
        Value::Percent(p) => LengthPercentageAuto::Percent(p / 100.0),
        Value::Auto => LengthPercentageAuto::Auto,
        Value::Undefined => LengthPercentageAuto::Length(0.0),
    }
}

/// Position offsets: undefined means "no inset on this edge".
fn to_taffy_inset(value: Value) -> LengthPercentageAuto {
    match value {
        Value::Point(v) => LengthPercentageAuto::Length(v),
        Value::Percent(p) => LengthPercentageAuto::Percent(p / 100.0),
        Value::Undefined | Value::Auto => LengthPercentageAuto::Auto,
    }
}

/// Padding and border have no auto form.
fn to_taffy_lp(value: Value) -> LengthPercentage {
    match value {
        Value::Point(v) => LengthPercentage::Length(v),
        Value::Percent(p) => LengthPercentage::Percent(p / 100.0),
        Value::Undefined | Value::Auto => LengthPercentage::Length(0.0),
    }
}

// =============================================================================
// ENUM CONVERSIONS
// =============================================================================

fn to_taffy_display(display: Display) -> TaffyDisplay {
    match display {
        Display::Flex => TaffyDisplay::Flex,
        Display::None => TaffyDisplay::None,
    }
}

fn to_taffy_position(position: PositionType) -> TaffyPosition {
    match position {
        PositionType::Relative => TaffyPosition::Relative,
        PositionType::Absolute => TaffyPosition::Absolute,
    }
}

fn to_taffy_overflow(overflow: Overflow) -> TaffyOverflow {
    match overflow {
        Overflow::Visible => TaffyOverflow::Visible,
        Overflow::Hidden => TaffyOverflow::Hidden,
        Overflow::Scroll => TaffyOverflow::Scroll,
    }
}

/// Rows run right-to-left under RTL; columns are unaffected.
fn to_taffy_flex_direction(dir: FlexDirection, rtl: bool) -> TaffyFlexDirection {
    match (dir, rtl) {
        (FlexDirection::Column, _) => TaffyFlexDirection::Column,
        (FlexDirection::ColumnReverse, _) => TaffyFlexDirection::ColumnReverse,
        (FlexDirection::Row, false) | (FlexDirection::RowReverse, true) => TaffyFlexDirection::Row,
        (FlexDirection::RowReverse, false) | (FlexDirection::Row, true) => {
            TaffyFlexDirection::RowReverse
        }
    }
}

fn to_taffy_flex_wrap(wrap: Wrap) -> TaffyFlexWrap {
    match wrap {
        Wrap::NoWrap => TaffyFlexWrap::NoWrap,
        Wrap::Wrap => TaffyFlexWrap::Wrap,
        Wrap::WrapReverse => TaffyFlexWrap::WrapReverse,
    }
}

fn to_taffy_justify_content(justify: Justify) -> TaffyJustifyContent {
    match justify {
        Justify::FlexStart => TaffyJustifyContent::FlexStart,
        Justify::Center => TaffyJustifyContent::Center,
        Justify::FlexEnd => TaffyJustifyContent::FlexEnd,
        Justify::SpaceBetween => TaffyJustifyContent::SpaceBetween,
        Justify::SpaceAround => TaffyJustifyContent::SpaceAround,
    }
}

/// `align-items` has no auto or distribution values; those fall back.
fn to_taffy_align_items(align: Align) -> TaffyAlignItems {
    match align {
        Align::FlexStart | Align::SpaceBetween | Align::SpaceAround => TaffyAlignItems::FlexStart,
        Align::Center => TaffyAlignItems::Center,
        Align::FlexEnd => TaffyAlignItems::FlexEnd,
        Align::Baseline => TaffyAlignItems::Baseline,
        Align::Auto | Align::Stretch => TaffyAlignItems::Stretch,
    }
}

fn to_taffy_align_self(align: Align) -> Option<TaffyAlignItems> {
    match align {
        Align::Auto => None, // inherit from parent
        other => Some(to_taffy_align_items(other)),
    }
}

fn to_taffy_align_content(align: Align) -> TaffyAlignContent {
    match align {
        Align::Auto | Align::FlexStart | Align::Baseline => TaffyAlignContent::FlexStart,
        Align::Center => TaffyAlignContent::Center,
        Align::FlexEnd => TaffyAlignContent::FlexEnd,
        Align::Stretch => TaffyAlignContent::Stretch,
        Align::SpaceBetween => TaffyAlignContent::SpaceBetween,
        Align::SpaceAround => TaffyAlignContent::SpaceAround,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_precedence() {
        let mut edges = Edges::default();
        edges.set(Edge::All, Value::Point(1.0));
        edges.set(Edge::Horizontal, Value::Point(2.0));
        edges.set(Edge::Right, Value::Point(3.0));
        edges.set(Edge::End, Value::Point(4.0));

        assert_eq!(edges.resolve(Edge::Top, Direction::Ltr), Value::Point(1.0));
        assert_eq!(edges.resolve(Edge::Left, Direction::Ltr), Value::Point(2.0));
        assert_eq!(edges.resolve(Edge::Right, Direction::Ltr), Value::Point(4.0));
        // under RTL, end lands on the left edge
        assert_eq!(edges.resolve(Edge::Left, Direction::Rtl), Value::Point(4.0));
        assert_eq!(edges.resolve(Edge::Right, Direction::Rtl), Value::Point(3.0));
    }

    #[test]
    fn test_physical_edge() {
        assert_eq!(physical_edge(Edge::Start, Direction::Ltr), Edge::Left);
        assert_eq!(physical_edge(Edge::Start, Direction::Rtl), Edge::Right);
        assert_eq!(physical_edge(Edge::End, Direction::Inherit), Edge::Right);
        assert_eq!(physical_edge(Edge::Top, Direction::Rtl), Edge::Top);
    }

    #[test]
    fn test_yoga_and_web_defaults() {
        let yoga = NativeStyle::new(false);
        assert_eq!(yoga.flex_direction, FlexDirection::Column);
        assert_eq!(yoga.resolved_flex_shrink(), 0.0);

        let web = NativeStyle::new(true);
        assert_eq!(web.flex_direction, FlexDirection::Row);
        assert_eq!(web.resolved_flex_shrink(), 1.0);
    }

    #[test]
    fn test_flex_shorthand() {
        let mut style = NativeStyle::new(false);
        style.flex = Some(2.0);
        assert_eq!(style.resolved_flex_grow(), 2.0);
        assert_eq!(style.resolved_flex_basis(), Value::Point(0.0));

        style.flex_grow = Some(5.0);
        assert_eq!(style.resolved_flex_grow(), 5.0);

        style.flex = Some(-1.0);
        style.flex_grow = None;
        assert_eq!(style.resolved_flex_grow(), 0.0);
        assert_eq!(style.resolved_flex_shrink(), 1.0);
    }

    #[test]
    fn test_lowering_to_taffy() {
        let mut style = NativeStyle::new(false);
        style.flex_direction = FlexDirection::Row;
        style.width = Value::Point(500.0);
        style.height = Value::Percent(50.0);
        style.padding.set(Edge::All, Value::Point(20.0));

        let taffy_style = style.to_taffy(Direction::Ltr);
        assert_eq!(taffy_style.flex_direction, TaffyFlexDirection::Row);
        assert_eq!(taffy_style.size.width, TaffyDimension::Length(500.0));
        assert_eq!(taffy_style.size.height, TaffyDimension::Percent(0.5));
        assert_eq!(taffy_style.padding.left, LengthPercentage::Length(20.0));

        let rtl = style.to_taffy(Direction::Rtl);
        assert_eq!(rtl.flex_direction, TaffyFlexDirection::RowReverse);
    }
}
