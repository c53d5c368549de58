//! Computed layout accessors.
//!
//! Results are read from the last [`Node::calculate_layout`] pass that
//! covered this node. Edged results exist only for single edges:
//! `Horizontal`, `Vertical` and `All` have no one computed value and fail
//! with [`Error::UnsupportedEdge`].

use crate::engine::{native, physical_edge, NativeLayout};
use crate::error::{Error, Result};
use crate::types::{Direction, Edge};

use super::Node;

/// Plain layout scalars.
macro_rules! layout_scalars {
    ($( $(#[$meta:meta])* $name:ident => $field:ident: $ty:ty; )+) => {
        impl Node {
            $(
                $(#[$meta])*
                pub fn $name(&self) -> Result<$ty> {
                    Ok(native::node_layout(self.raw()?)?.$field)
                }
            )+
        }
    };
}

/// Edged layout results plus one convenience getter per single edge.
macro_rules! layout_edges {
    ($( $name:ident => $field:ident { $( $edge:ident => $edge_name:ident; )+ } )+) => {
        impl Node {
            $(
                pub fn $name(&self, edge: Edge) -> Result<f32> {
                    self.layout_edge(edge, |layout| layout.$field)
                }

                $(
                    pub fn $edge_name(&self) -> Result<f32> {
                        self.$name(Edge::$edge)
                    }
                )+
            )+
        }
    };
}

layout_scalars! {
    /// Offset from the parent's left edge.
    layout_left => left: f32;
    layout_top => top: f32;
    /// Offset from the parent's right edge.
    layout_right => right: f32;
    layout_bottom => bottom: f32;
    layout_width => width: f32;
    layout_height => height: f32;
    /// The resolved direction; never `Inherit` after a layout pass.
    layout_direction => direction: Direction;
    /// Whether children overflowed this node's box.
    layout_had_overflow => had_overflow: bool;
}

layout_edges! {
    layout_margin => margin {
        Left => layout_margin_left;
        Top => layout_margin_top;
        Right => layout_margin_right;
        Bottom => layout_margin_bottom;
        Start => layout_margin_start;
        End => layout_margin_end;
    }
    layout_border => border {
        Left => layout_border_left;
        Top => layout_border_top;
        Right => layout_border_right;
        Bottom => layout_border_bottom;
        Start => layout_border_start;
        End => layout_border_end;
    }
    layout_padding => padding {
        Left => layout_padding_left;
        Top => layout_padding_top;
        Right => layout_padding_right;
        Bottom => layout_padding_bottom;
        Start => layout_padding_start;
        End => layout_padding_end;
    }
}

impl Node {
    fn layout_edge(&self, edge: Edge, pick: fn(&NativeLayout) -> [f32; 4]) -> Result<f32> {
        if edge.is_shorthand() {
            return Err(Error::UnsupportedEdge(edge));
        }
        let layout = native::node_layout(self.raw()?)?;
        let values = pick(&layout);
        match physical_edge(edge, layout.direction) {
            Edge::Left => Ok(values[0]),
            Edge::Top => Ok(values[1]),
            Edge::Right => Ok(values[2]),
            Edge::Bottom => Ok(values[3]),
            other => Err(Error::UnsupportedEdge(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FlexDirection;

    #[test]
    fn test_layout_edges_follow_direction() {
        let root = Node::new().unwrap();
        root.set_flex_direction(FlexDirection::Row).unwrap();
        root.set_width(200.0).unwrap();
        root.set_height(100.0).unwrap();
        root.set_padding_start(10.0).unwrap();
        root.set_border_left(2.0).unwrap();

        root.calculate_layout(None, None, Direction::Ltr).unwrap();
        assert_eq!(root.layout_padding_left().unwrap(), 10.0);
        assert_eq!(root.layout_padding_start().unwrap(), 10.0);
        assert_eq!(root.layout_padding_right().unwrap(), 0.0);
        assert_eq!(root.layout_border(Edge::Left).unwrap(), 2.0);

        root.calculate_layout(None, None, Direction::Rtl).unwrap();
        assert_eq!(root.layout_direction().unwrap(), Direction::Rtl);
        assert_eq!(root.layout_padding_right().unwrap(), 10.0);
        assert_eq!(root.layout_padding_start().unwrap(), 10.0);
        assert_eq!(root.layout_padding_left().unwrap(), 0.0);
    }

    #[test]
    fn test_shorthand_edges_are_not_readable() {
        let node = Node::new().unwrap();
        node.calculate_layout(None, None, Direction::Ltr).unwrap();
        for edge in [Edge::Horizontal, Edge::Vertical, Edge::All] {
            assert!(matches!(
                node.layout_margin(edge),
                Err(Error::UnsupportedEdge(e)) if e == edge
            ));
        }
    }

    #[test]
    fn test_right_and_bottom_are_offsets_from_parent() {
        let root = Node::new().unwrap();
        root.set_width(100.0).unwrap();
        root.set_height(100.0).unwrap();
        let child = Node::new().unwrap();
        child.set_width(30.0).unwrap();
        child.set_height(40.0).unwrap();
        root.insert_child(&child, 0).unwrap();
        root.set_align_items(crate::types::Align::FlexStart).unwrap();

        root.calculate_layout(None, None, Direction::Ltr).unwrap();
        assert_eq!(child.layout_left().unwrap(), 0.0);
        assert_eq!(child.layout_right().unwrap(), 70.0);
        assert_eq!(child.layout_bottom().unwrap(), 60.0);
        assert!(!root.layout_had_overflow().unwrap());
    }
}
