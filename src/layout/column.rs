use std::collections::VecDeque;

use crate::node::{NodeId, Tree};
use crate::style::StyleResolver;

use super::types::{ConnectionPoint, Direction, Point, Rect, Side};
use super::layout_for_node;

/// Height guess for a child that has never been laid out.
pub(super) const FALLBACK_HEIGHT_ESTIMATE: f32 = 40.0;

/// Pre-layout height estimate used for column balancing. A node that
/// already carries geometry is weighted up by its child count to account
/// for the subtree it will drag along.
pub(super) fn estimate_height(tree: &Tree, id: NodeId) -> f32 {
    let node = tree.node(id);
    if node.height > 0.0 {
        node.height * (1.0 + node.children.len() as f32)
    } else {
        FALLBACK_HEIGHT_ESTIMATE
    }
}

/// Splits children into two balanced columns. While the left column's
/// running total does not exceed the right's, the next child is taken from
/// the front of the remaining list into the left column; otherwise from
/// the back into the right column. Document order is preserved within each
/// column, and every child receives a direction override naming its side.
pub(super) fn distribute_columns(
    tree: &mut Tree,
    children: &[NodeId],
) -> (Vec<NodeId>, Vec<NodeId>) {
    // A previous pass already picked sides; re-balancing against the now
    // known heights would move children between columns on every relayout.
    if children
        .iter()
        .all(|id| tree.node(*id).overrides.direction.is_some())
    {
        let mut left = Vec::new();
        let mut right = Vec::new();
        for id in children {
            match tree.node(*id).overrides.direction {
                Some(Direction::Left) => left.push(*id),
                _ => right.push(*id),
            }
        }
        return (left, right);
    }
    let mut remaining: VecDeque<NodeId> = children.iter().copied().collect();
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut left_total = 0.0f32;
    let mut right_total = 0.0f32;
    while !remaining.is_empty() {
        if left_total <= right_total {
            if let Some(id) = remaining.pop_front() {
                left_total += estimate_height(tree, id);
                tree.node_mut(id).overrides.direction = Some(Direction::Left);
                left.push(id);
            }
        } else if let Some(id) = remaining.pop_back() {
            right_total += estimate_height(tree, id);
            tree.node_mut(id).overrides.direction = Some(Direction::Right);
            right.push(id);
        }
    }
    right.reverse();
    (left, right)
}

/// Stacks one column top-down. For the left column, `pin` is the x
/// coordinate of every child box's right edge; for the right column, of
/// its left edge. Returns the column's bounding span, if any.
pub(super) fn layout_column(
    tree: &mut Tree,
    column: &[NodeId],
    pin: f32,
    start_y: f32,
    side: Direction,
    sibling_padding: f32,
    styles: &StyleResolver,
) -> Option<Rect> {
    let mut cursor = start_y;
    let mut span: Option<Rect> = None;
    for child in column {
        let strategy = layout_for_node(tree, *child, styles);
        let placed = strategy.apply(tree, *child, Point::new(pin, cursor), styles);
        if side == Direction::Left {
            let own_width = tree.node(*child).width;
            tree.translate_subtree(*child, -own_width, 0.0);
        }
        let bounds = tree.node(*child).bounding_box;
        span = Some(match span {
            Some(current) => current.union(&bounds),
            None => bounds,
        });
        cursor += placed.height + sibling_padding;
    }
    span
}

/// Connector position on a column-laid child: the edge facing the parent.
pub(super) fn column_child_connection_point(
    tree: &Tree,
    id: NodeId,
    styles: &StyleResolver,
) -> ConnectionPoint {
    let node = tree.node(id);
    match styles.effective_direction(tree, id) {
        Direction::Left => ConnectionPoint {
            x: node.x + node.width,
            y: node.y + node.height / 2.0,
            side: Side::Right,
        },
        _ => ConnectionPoint {
            x: node.x,
            y: node.y + node.height / 2.0,
            side: Side::Left,
        },
    }
}

/// Connector position on the parent for a given column child: the parent's
/// left edge for left-column children, right edge otherwise.
pub(super) fn column_parent_edge_point(
    tree: &Tree,
    id: NodeId,
    styles: &StyleResolver,
    child: NodeId,
) -> ConnectionPoint {
    let node = tree.node(id);
    match styles.effective_direction(tree, child) {
        Direction::Left => ConnectionPoint {
            x: node.x,
            y: node.y + node.height / 2.0,
            side: Side::Left,
        },
        _ => ConnectionPoint {
            x: node.x + node.width,
            y: node.y + node.height / 2.0,
            side: Side::Right,
        },
    }
}
