use anyhow::Result;
use std::path::Path;

#[cfg(feature = "png")]
use crate::config::RenderConfig;
use crate::layout::{child_connection_point, parent_connection_point, ConnectionPoint, Rect};
use crate::node::{NodeId, Tree};
use crate::style::{NodeKind, StyleResolver};
use crate::theme::Theme;

const CANVAS_MARGIN: f32 = 24.0;

/// Serializes a laid-out tree to an SVG document. Connectors are drawn
/// first so node boxes cover the curve ends.
pub fn render_svg(tree: &Tree, theme: &Theme, styles: &StyleResolver) -> String {
    let mut svg = String::new();
    let Some(root) = tree.root else {
        return empty_svg(theme);
    };

    let bounds = tree.node(root).bounding_box;
    let view = Rect::new(
        bounds.x - CANVAS_MARGIN,
        bounds.y - CANVAS_MARGIN,
        bounds.width + CANVAS_MARGIN * 2.0,
        bounds.height + CANVAS_MARGIN * 2.0,
    );

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{:.0}\" height=\"{:.0}\" viewBox=\"{:.2} {:.2} {:.2} {:.2}\">",
        view.width, view.height, view.x, view.y, view.width, view.height
    ));
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        view.x, view.y, theme.background
    ));

    for id in tree.visible_subtree_ids(root) {
        if tree.node(id).collapsed {
            continue;
        }
        for child in tree.visible_children(id) {
            let from = parent_connection_point(tree, id, Some(child), styles);
            let to = child_connection_point(tree, child, styles);
            svg.push_str(&format!(
                "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
                connector_path(from, to),
                theme.line_color,
                theme.connector_width
            ));
        }
    }

    for id in tree.visible_subtree_ids(root) {
        svg.push_str(&node_svg(tree, id, root, theme, styles));
    }

    svg.push_str("</svg>");
    svg
}

fn empty_svg(theme: &Theme) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"200\" height=\"200\" viewBox=\"0 0 200 200\"><rect width=\"100%\" height=\"100%\" fill=\"{}\"/></svg>",
        theme.background
    )
}

/// Cubic bezier from a parent edge to a child edge. Control points sit
/// 40% into the gap along each endpoint's own axis, so horizontal
/// connectors leave flat and vertical ones leave upright.
fn connector_path(from: ConnectionPoint, to: ConnectionPoint) -> String {
    let (c1x, c1y) = if from.side.is_horizontal() {
        (from.x + (to.x - from.x) * 0.4, from.y)
    } else {
        (from.x, from.y + (to.y - from.y) * 0.4)
    };
    let (c2x, c2y) = if to.side.is_horizontal() {
        (to.x - (to.x - from.x) * 0.4, to.y)
    } else {
        (to.x, to.y - (to.y - from.y) * 0.4)
    };
    format!(
        "M {:.2} {:.2} C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2}",
        from.x, from.y, c1x, c1y, c2x, c2y, to.x, to.y
    )
}

fn node_svg(tree: &Tree, id: NodeId, root: NodeId, theme: &Theme, styles: &StyleResolver) -> String {
    let node = tree.node(id);
    let style = styles.level_style(node.level);
    let mut out = String::new();

    let (fill, text_color) = if id == root {
        (theme.root_fill.as_str(), theme.root_text_color.as_str())
    } else {
        match branch_index(tree, id, root) {
            Some(branch) => (theme.branch_fill(branch), theme.branch_text_color.as_str()),
            None => (theme.root_fill.as_str(), theme.root_text_color.as_str()),
        }
    };

    match style.node_kind {
        NodeKind::Box => {
            out.push_str(&format!(
                "<rect id=\"{}\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{}\" ry=\"{}\" fill=\"{}\"/>",
                escape_xml(&node.id),
                node.x,
                node.y,
                node.width,
                node.height,
                theme.corner_radius,
                theme.corner_radius,
                fill
            ));
            out.push_str(&label_svg(tree, id, text_color, styles));
        }
        NodeKind::Text => {
            out.push_str(&label_svg(tree, id, theme.text_color.as_str(), styles));
        }
    }
    out
}

fn label_svg(tree: &Tree, id: NodeId, color: &str, styles: &StyleResolver) -> String {
    let node = tree.node(id);
    let style = styles.level_style(node.level);
    let center_x = node.x + node.width / 2.0;
    let center_y = node.y + node.height / 2.0;
    let line_height = node.label.line_height;
    let total = node.label.lines.len() as f32 * line_height;
    // baseline of the first line, text block centered in the box
    let start_y = center_y - total / 2.0 + style.font_size;

    let mut text = format!(
        "<text x=\"{center_x:.2}\" y=\"{start_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\" fill=\"{}\">",
        escape_xml(&style.font_family),
        style.font_size,
        style.font_weight,
        color
    );
    for (idx, line) in node.label.lines.iter().enumerate() {
        let dy = if idx == 0 { 0.0 } else { line_height };
        text.push_str(&format!(
            "<tspan x=\"{center_x:.2}\" dy=\"{dy:.2}\">{}</tspan>",
            escape_xml(line)
        ));
    }
    text.push_str("</text>");
    text
}

/// Index of the top-level branch `id` belongs to, i.e. the position of
/// its ancestor among the root's children. The root itself has none.
fn branch_index(tree: &Tree, id: NodeId, root: NodeId) -> Option<usize> {
    let mut current = id;
    loop {
        let parent = tree.node(current).parent?;
        if parent == root {
            return tree
                .node(root)
                .children
                .iter()
                .position(|child| *child == current);
        }
        current = parent;
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .unwrap_or(usvg::Size::from_wh(800.0, 600.0).unwrap());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
