use crate::node::{NodeId, Tree};
use crate::style::StyleResolver;

use super::column::{
    column_child_connection_point, column_parent_edge_point, distribute_columns, layout_column,
};
use super::text::wrap_label;
use super::types::{ConnectionPoint, Direction, Point, Rect, Side};
use super::LayoutStrategy;

/// Classic dual-column mindmap: balanced columns flank the parent and each
/// column's vertical extent is centered on the parent's vertical center.
pub struct ClassicLayout {
    child_padding: f32,
}

impl ClassicLayout {
    // Children stay horizontally adjacent, so only the child gap applies.
    pub fn new(_parent_padding: f32, child_padding: f32) -> Self {
        Self { child_padding }
    }

    fn center_column(tree: &mut Tree, column: &[NodeId], span: Option<Rect>, center_y: f32) {
        let Some(span) = span else {
            return;
        };
        let desired_top = center_y - span.height / 2.0;
        let dy = desired_top - span.y;
        for child in column {
            tree.translate_subtree(*child, 0.0, dy);
        }
    }
}

impl LayoutStrategy for ClassicLayout {
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
        let center_y = own_box.center_y();

        let left_span = layout_column(
            tree,
            &left,
            own_box.x - self.child_padding,
            center_y,
            Direction::Left,
            sibling_padding,
            styles,
        );
        Self::center_column(tree, &left, left_span, center_y);

        let right_span = layout_column(
            tree,
            &right,
            own_box.right() + self.child_padding,
            center_y,
            Direction::Right,
            sibling_padding,
            styles,
        );
        Self::center_column(tree, &right, right_span, center_y);

        let mut bounds = tree.node(id).own_box();
        for child in &children {
            bounds = bounds.union(&tree.node(*child).bounding_box);
        }
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
                    x: node.x + node.width,
                    y: node.y + node.height / 2.0,
                    side: Side::Right,
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
    use super::super::test_support::{classic_styles, layout_outline};
    use super::*;

    const OUTLINE: &str = "# Hub\n- one\n- two\n- three\n- four\n";

    #[test]
    fn columns_flank_the_parent() {
        let (tree, root) = layout_outline(OUTLINE, &classic_styles());
        let parent = tree.node(root);
        for child_id in tree.visible_children(root) {
            let child = tree.node(child_id);
            match child.overrides.direction {
                Some(Direction::Left) => {
                    assert!(child.x + child.width <= parent.x);
                }
                Some(Direction::Right) => {
                    assert!(child.x >= parent.x + parent.width);
                }
                other => panic!("column child missing direction override: {:?}", other),
            }
        }
    }

    #[test]
    fn columns_are_centered_on_the_parent_middle() {
        let (tree, root) = layout_outline(OUTLINE, &classic_styles());
        let parent_center = tree.node(root).own_box().center_y();
        for side in [Direction::Left, Direction::Right] {
            let mut span: Option<Rect> = None;
            for child_id in tree.visible_children(root) {
                if tree.node(child_id).overrides.direction != Some(side) {
                    continue;
                }
                let bounds = tree.node(child_id).bounding_box;
                span = Some(match span {
                    Some(current) => current.union(&bounds),
                    None => bounds,
                });
            }
            let span = span.expect("both columns populated");
            let column_center = span.y + span.height / 2.0;
            assert!(
                (column_center - parent_center).abs() < 0.01,
                "column center {column_center} should match parent center {parent_center}"
            );
        }
    }

    #[test]
    fn bounding_box_spans_both_columns() {
        let (tree, root) = layout_outline(OUTLINE, &classic_styles());
        let bounds = tree.node(root).bounding_box;
        let parent = tree.node(root).own_box();
        assert!(bounds.x < parent.x);
        assert!(bounds.right() > parent.right());
        assert!(bounds.contains_rect(&parent));
    }
}
