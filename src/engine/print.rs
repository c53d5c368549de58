//! Debug printing of a native subtree as indented pseudo-HTML.
//!
//! ```text
//! <div layout="width: 500; height: 120; top: 0; left: 0;" style="flex-direction: row; padding: 20px; ">
//!   <div layout="width: 80; height: 80; top: 20; left: 20;" style="width: 80px; "></div>
//! </div>
//! ```

use std::fmt::Write as _;

use taffy::NodeId;

use crate::error::{Error, Result};
use crate::types::{Edge, PrintOptions};

use super::native::NativeEngine;
use super::style::{Edges, NativeStyle};

pub(crate) fn print_node(
    engine: &NativeEngine,
    id: NodeId,
    options: PrintOptions,
    depth: usize,
    out: &mut String,
) -> Result<()> {
    let indent = "  ".repeat(depth);
    out.push_str(&indent);
    out.push_str("<div");

    if options.contains(PrintOptions::LAYOUT) {
        let layout = engine.computed_layout(id)?;
        let _ = write!(
            out,
            " layout=\"width: {}; height: {}; top: {}; left: {};\"",
            layout.size.width, layout.size.height, layout.location.y, layout.location.x
        );
    }

    if options.contains(PrintOptions::STYLE) {
        let data = engine
            .tree
            .get_node_context(id)
            .ok_or_else(|| Error::Desync(format!("node {id:?} has no native data")))?;
        out.push_str(" style=\"");
        write_style(&data.style, out);
        out.push('"');
    }

    if data_has_measure(engine, id) {
        out.push_str(" has-custom-measure=\"true\"");
    }
    out.push('>');

    let children = engine.tree.children(id)?;
    if options.contains(PrintOptions::CHILDREN) && !children.is_empty() {
        for child in children {
            out.push('\n');
            print_node(engine, child, options, depth + 1, out)?;
        }
        out.push('\n');
        out.push_str(&indent);
    }
    out.push_str("</div>");
    Ok(())
}

fn data_has_measure(engine: &NativeEngine, id: NodeId) -> bool {
    engine
        .tree
        .get_node_context(id)
        .is_some_and(|data| data.measure.is_some())
}

/// Write every property that differs from the node's defaults.
fn write_style(style: &NativeStyle, out: &mut String) {
    let defaults = NativeStyle::new(style.web_defaults);

    macro_rules! keyword {
        ($field:ident, $css:literal) => {
            if style.$field != defaults.$field {
                let _ = write!(out, "{}: {}; ", $css, style.$field);
            }
        };
    }
    keyword!(direction, "direction");
    keyword!(flex_direction, "flex-direction");
    keyword!(justify_content, "justify-content");
    keyword!(align_items, "align-items");
    keyword!(align_content, "align-content");
    keyword!(align_self, "align-self");
    keyword!(flex_wrap, "flex-wrap");
    keyword!(overflow, "overflow");
    keyword!(display, "display");
    keyword!(position_type, "position");

    for (css, value) in [
        ("flex", style.flex),
        ("flex-grow", style.flex_grow),
        ("flex-shrink", style.flex_shrink),
        ("aspect-ratio", style.aspect_ratio),
    ] {
        if let Some(value) = value {
            let _ = write!(out, "{css}: {value}; ");
        }
    }

    for (css, value, default) in [
        ("flex-basis", style.flex_basis, defaults.flex_basis),
        ("width", style.width, defaults.width),
        ("height", style.height, defaults.height),
        ("min-width", style.min_width, defaults.min_width),
        ("min-height", style.min_height, defaults.min_height),
        ("max-width", style.max_width, defaults.max_width),
        ("max-height", style.max_height, defaults.max_height),
    ] {
        if value != default {
            let _ = write!(out, "{css}: {value}; ");
        }
    }

    write_edges("margin", &style.margin, out);
    write_edges("padding", &style.padding, out);
    write_edges("border", &style.border, out);
    write_edges("position", &style.position, out);
}

fn write_edges(css: &str, edges: &Edges, out: &mut String) {
    for (edge, value) in edges.defined() {
        let _ = match edge {
            Edge::All => write!(out, "{css}: {value}; "),
            _ => write!(out, "{css}-{edge}: {value}; "),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    #[test]
    fn test_write_style_only_non_defaults() {
        let mut style = NativeStyle::new(false);
        style.width = Value::Point(80.0);
        style.margin.set(Edge::End, Value::Point(20.0));
        style.padding.set(Edge::All, Value::Percent(5.0));

        let mut out = String::new();
        write_style(&style, &mut out);
        assert_eq!(out, "width: 80px; margin-end: 20px; padding: 5%; ");
    }

    #[test]
    fn test_write_style_defaults_are_empty() {
        let mut out = String::new();
        write_style(&NativeStyle::new(true), &mut out);
        assert!(out.is_empty());
    }
}
