use crate::node::{NodeId, Tree};
use crate::style::StyleResolver;

use super::column::{
    column_child_connection_point, column_parent_edge_point, distribute_columns, layout_column,
};
use super::text::wrap_label;
use super::types::{ConnectionPoint, Direction, Point, Rect, Side};
use super::LayoutStrategy;

/// Balanced two-column layout with both columns hanging below the parent,
/// like a taproot. The subtree's bounding box is re-anchored at the
/// requested origin after column balancing.
pub struct TaprootLayout {
    parent_padding: f32,
    child_padding: f32,
}

impl TaprootLayout {
    pub fn new(parent_padding: f32, child_padding: f32) -> Self {
        Self {
            parent_padding,
            child_padding,
        }
    }
}

impl LayoutStrategy for TaprootLayout {
    fn apply(&self, tree: &mut Tree, id: NodeId, origin: Point, styles: &StyleResolver) -> Rect {
        let level = tree.node(id).level;
        let style = styles.level_style(level);
        let sibling_padding = style.sibling_padding;
        let label = wrap_label(&tree.node(id).text, style, styles.fast_metrics());
        let width = label.width + style.horizontal_padding * 2.0;
        let height = label.height + style.vertical_padding * 2.0;
        {
            let node = tree.node_mut(id);
            node.x = origin.x;
            node.y = origin.y;
            node.width = width;
            node.height = height;
            node.label = label;
            node.bounding_box = Rect::new(origin.x, origin.y, width, height);
        }

        let children = tree.visible_children(id);
        if children.is_empty() {
            return tree.node(id).bounding_box;
        }

        let (left, right) = distribute_columns(tree, &children);
        let own_box = tree.node(id).own_box();
        let column_top = own_box.bottom() + self.parent_padding;
        let center = own_box.center_x();
        let half_gap = self.child_padding / 2.0;
        layout_column(
            tree,
            &left,
            center - half_gap,
            column_top,
            Direction::Left,
            sibling_padding,
            styles,
        );
        layout_column(
            tree,
            &right,
            center + half_gap,
            column_top,
            Direction::Right,
            sibling_padding,
            styles,
        );

        let mut bounds = tree.node(id).own_box();
        for child in &children {
            bounds = bounds.union(&tree.node(*child).bounding_box);
        }
        // Column balancing can drift the box; force it back to the anchor.
        let dx = origin.x - bounds.x;
        let dy = origin.y - bounds.y;
        tree.translate_subtree(id, dx, dy);
        let bounds = Rect::new(origin.x, origin.y, bounds.width, bounds.height);
        tree.node_mut(id).bounding_box = bounds;
        bounds
    }

    fn parent_connection_point(
        &self,
        tree: &Tree,
        id: NodeId,
        styles: &StyleResolver,
        child: Option<NodeId>,
    ) -> ConnectionPoint {
        match child {
            Some(child) => column_parent_edge_point(tree, id, styles, child),
            None => {
                let node = tree.node(id);
                ConnectionPoint {
                    x: node.x + node.width / 2.0,
                    y: node.y + node.height,
                    side: Side::Bottom,
                }
            }
        }
    }

    fn child_connection_point(
        &self,
        tree: &Tree,
        id: NodeId,
        styles: &StyleResolver,
    ) -> ConnectionPoint {
        column_child_connection_point(tree, id, styles)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{layout_outline, taproot_styles};
    use super::super::{child_connection_point, parent_connection_point};
    use super::*;

    const OUTLINE: &str = "# Root\n- one\n- two\n- three\n- four\n";

    #[test]
    fn bounding_box_is_anchored_at_origin() {
        let (tree, root) = layout_outline(OUTLINE, &taproot_styles());
        let bounds = tree.node(root).bounding_box;
        assert_eq!(bounds.x, 0.0);
        assert_eq!(bounds.y, 0.0);
    }

    #[test]
    fn columns_sit_below_and_beside_the_parent_center() {
        let (tree, root) = layout_outline(OUTLINE, &taproot_styles());
        let parent = tree.node(root);
        let center = parent.x + parent.width / 2.0;
        for child_id in tree.visible_children(root) {
            let child = tree.node(child_id);
            assert!(child.y >= parent.y + parent.height, "children hang below");
            match child.overrides.direction {
                Some(Direction::Left) => {
                    assert!(child.x + child.width <= center);
                }
                Some(Direction::Right) => {
                    assert!(child.x >= center);
                }
                other => panic!("column child missing direction override: {:?}", other),
            }
        }
    }

    #[test]
    fn connectors_use_column_sides() {
        let styles = taproot_styles();
        let (tree, root) = layout_outline(OUTLINE, &styles);
        for child_id in tree.visible_children(root) {
            let parent_point = parent_connection_point(&tree, root, Some(child_id), &styles);
            let child_point = child_connection_point(&tree, child_id, &styles);
            match tree.node(child_id).overrides.direction {
                Some(Direction::Left) => {
                    assert_eq!(parent_point.side, Side::Left);
                    assert_eq!(child_point.side, Side::Right);
                }
                _ => {
                    assert_eq!(parent_point.side, Side::Right);
                    assert_eq!(child_point.side, Side::Left);
                }
            }
        }
    }

    #[test]
    fn leaf_taproot_returns_own_box() {
        let (tree, root) = layout_outline("# Solo\n", &taproot_styles());
        let node = tree.node(root);
        assert_eq!(node.bounding_box, node.own_box());
    }
}
