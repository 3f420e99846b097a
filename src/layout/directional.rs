use crate::node::{NodeId, Tree};
use crate::style::StyleResolver;

use super::text::wrap_label;
use super::types::{ConnectionPoint, ConnectionPointMode, Direction, Point, Rect, Side};
use super::{layout_for_node, LayoutStrategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Axis-aligned recursive layout: children are stacked along the cross
/// axis on one side of the parent, and the parent is re-centered against
/// the full children span.
pub struct DirectionalLayout {
    axis: Axis,
    direction: Direction,
    parent_padding: f32,
    child_padding: f32,
}

impl DirectionalLayout {
    pub fn horizontal(parent_padding: f32, child_padding: f32, direction: Direction) -> Self {
        let direction = match direction {
            Direction::Left => Direction::Left,
            _ => Direction::Right,
        };
        Self {
            axis: Axis::Horizontal,
            direction,
            parent_padding,
            child_padding,
        }
    }

    pub fn vertical(parent_padding: f32, child_padding: f32, direction: Direction) -> Self {
        let direction = match direction {
            Direction::Up => Direction::Up,
            _ => Direction::Down,
        };
        Self {
            axis: Axis::Vertical,
            direction,
            parent_padding,
            child_padding,
        }
    }

    /// Position of the parent connector along its emitting edge, honoring
    /// the distribution mode. `vertical_axis` selects which coordinate of
    /// the edge varies.
    fn edge_position(
        &self,
        tree: &Tree,
        styles: &StyleResolver,
        id: NodeId,
        child: Option<NodeId>,
        vertical_axis: bool,
    ) -> f32 {
        let node = tree.node(id);
        let (edge_start, edge_len) = if vertical_axis {
            (node.y, node.height)
        } else {
            (node.x, node.width)
        };
        let center = edge_start + edge_len / 2.0;
        let mode = styles.effective_connection_point_mode(tree, id);
        let Some(child) = child else {
            return center;
        };
        if mode == ConnectionPointMode::Single {
            return center;
        }
        let children = tree.visible_children(id);
        if children.is_empty() {
            return center;
        }
        let portion = styles.effective_width_portion(tree, id).clamp(0.0, 1.0);
        let margin = edge_len * (1.0 - portion) / 2.0;
        let usable = edge_len * portion;
        match mode {
            ConnectionPointMode::DistributeEvenly => {
                let count = children.len() as f32;
                let index = children
                    .iter()
                    .position(|candidate| *candidate == child)
                    .unwrap_or(0) as f32;
                edge_start + margin + usable * ((index + 0.5) / count)
            }
            ConnectionPointMode::DistributedRelativeToParentSize => {
                let mut span: Option<Rect> = None;
                for candidate in &children {
                    let bounds = tree.node(*candidate).bounding_box;
                    span = Some(match span {
                        Some(current) => current.union(&bounds),
                        None => bounds,
                    });
                }
                let t = span
                    .map(|span| {
                        let (span_start, span_len, child_center) = if vertical_axis {
                            (
                                span.y,
                                span.height,
                                tree.node(child).bounding_box.center_y(),
                            )
                        } else {
                            (span.x, span.width, tree.node(child).bounding_box.center_x())
                        };
                        if span_len <= f32::EPSILON {
                            0.5
                        } else {
                            ((child_center - span_start) / span_len).clamp(0.0, 1.0)
                        }
                    })
                    .unwrap_or(0.5);
                edge_start + margin + usable * t
            }
            ConnectionPointMode::Single => center,
        }
    }
}

impl LayoutStrategy for DirectionalLayout {
    fn apply(&self, tree: &mut Tree, id: NodeId, origin: Point, styles: &StyleResolver) -> Rect {
        let level = tree.node(id).level;
        let style = styles.level_style(level);
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

        match self.axis {
            Axis::Horizontal => {
                let child_x = match self.direction {
                    Direction::Left => origin.x - self.parent_padding,
                    _ => origin.x + width + self.parent_padding,
                };
                let mut cursor = origin.y;
                for child in &children {
                    let strategy = layout_for_node(tree, *child, styles);
                    let placed = strategy.apply(tree, *child, Point::new(child_x, cursor), styles);
                    if self.direction == Direction::Left {
                        // Child layout assumes a rightward frame; mirror by
                        // shifting the subtree left by the child's own width.
                        let own_width = tree.node(*child).width;
                        tree.translate_subtree(*child, -own_width, 0.0);
                    }
                    cursor += placed.height + self.child_padding;
                }
                let span = cursor - self.child_padding - origin.y;
                if span > height {
                    tree.node_mut(id).y = origin.y + (span - height) / 2.0;
                }
            }
            Axis::Vertical => {
                let child_y = match self.direction {
                    Direction::Up => origin.y - self.parent_padding,
                    _ => origin.y + height + self.parent_padding,
                };
                let mut cursor = origin.x;
                for child in &children {
                    let strategy = layout_for_node(tree, *child, styles);
                    let placed = strategy.apply(tree, *child, Point::new(cursor, child_y), styles);
                    if self.direction == Direction::Up {
                        let own_height = tree.node(*child).height;
                        tree.translate_subtree(*child, 0.0, -own_height);
                    }
                    cursor += placed.width + self.child_padding;
                }
                let span = cursor - self.child_padding - origin.x;
                if span > width {
                    tree.node_mut(id).x = origin.x + (span - width) / 2.0;
                }
            }
        }

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
        let node = tree.node(id);
        match self.axis {
            Axis::Horizontal => {
                let (x, side) = match self.direction {
                    Direction::Left => (node.x, Side::Left),
                    _ => (node.x + node.width, Side::Right),
                };
                let y = self.edge_position(tree, styles, id, child, true);
                ConnectionPoint { x, y, side }
            }
            Axis::Vertical => {
                let (y, side) = match self.direction {
                    Direction::Up => (node.y, Side::Top),
                    _ => (node.y + node.height, Side::Bottom),
                };
                let x = self.edge_position(tree, styles, id, child, false);
                ConnectionPoint { x, y, side }
            }
        }
    }

    fn child_connection_point(
        &self,
        tree: &Tree,
        id: NodeId,
        _styles: &StyleResolver,
    ) -> ConnectionPoint {
        let node = tree.node(id);
        match self.axis {
            Axis::Horizontal => match self.direction {
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
            },
            Axis::Vertical => match self.direction {
                Direction::Up => ConnectionPoint {
                    x: node.x + node.width / 2.0,
                    y: node.y + node.height,
                    side: Side::Bottom,
                },
                _ => ConnectionPoint {
                    x: node.x + node.width / 2.0,
                    y: node.y,
                    side: Side::Top,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{horizontal_styles, layout_outline, vertical_styles};
    use super::super::{apply_layout, child_connection_point, parent_connection_point};
    use super::*;
    use crate::parser::parse_outline;

    const OUTLINE: &str = "# Root\n- alpha\n- beta\n- gamma\n";

    #[test]
    fn children_sit_right_of_parent() {
        let (tree, root) = layout_outline(OUTLINE, &horizontal_styles(Direction::Right));
        let parent = tree.node(root);
        for child in tree.visible_children(root) {
            assert!(tree.node(child).x > parent.x + parent.width);
        }
    }

    #[test]
    fn left_direction_mirrors_children() {
        let styles = horizontal_styles(Direction::Left);
        let (tree, root) = layout_outline(OUTLINE, &styles);
        let parent = tree.node(root);
        for child in tree.visible_children(root) {
            let child = tree.node(child);
            assert!(child.x < parent.x, "child box must sit left of the parent");
            assert!(child.x + child.width <= parent.x);
        }
    }

    #[test]
    fn vertical_down_stacks_children_below() {
        let (tree, root) = layout_outline(OUTLINE, &vertical_styles(Direction::Down));
        let parent = tree.node(root);
        let children = tree.visible_children(root);
        for child in &children {
            assert!(tree.node(*child).y > parent.y + parent.height);
        }
        // siblings advance along x in document order
        let xs: Vec<f32> = children.iter().map(|c| tree.node(*c).x).collect();
        for pair in xs.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn vertical_up_mirrors_children_above() {
        let (tree, root) = layout_outline(OUTLINE, &vertical_styles(Direction::Up));
        let parent = tree.node(root);
        for child in tree.visible_children(root) {
            let child = tree.node(child);
            assert!(child.y + child.height <= parent.y);
        }
    }

    #[test]
    fn parent_recenters_against_tall_children_span() {
        let styles = horizontal_styles(Direction::Right);
        let mut tree = parse_outline(OUTLINE).expect("parse");
        let origin = Point::new(0.0, 0.0);
        let bounds = apply_layout(&mut tree, origin, &styles).expect("layout");
        let root = tree.root.expect("root");
        let parent = tree.node(root);
        // three children are taller than the parent box, so it moved down
        assert!(parent.y > 0.0);
        assert!(bounds.contains_rect(&parent.own_box()));
    }

    #[test]
    fn connector_leaves_far_edge_at_center_by_default() {
        let styles = horizontal_styles(Direction::Right);
        let (tree, root) = layout_outline(OUTLINE, &styles);
        let child = tree.visible_children(root)[0];
        let point = parent_connection_point(&tree, root, Some(child), &styles);
        let parent = tree.node(root);
        assert_eq!(point.side, Side::Right);
        assert_eq!(point.x, parent.x + parent.width);
        assert!((point.y - (parent.y + parent.height / 2.0)).abs() < 0.001);
    }

    #[test]
    fn child_connects_on_near_edge() {
        let styles = horizontal_styles(Direction::Right);
        let (tree, root) = layout_outline(OUTLINE, &styles);
        let child_id = tree.visible_children(root)[1];
        let point = child_connection_point(&tree, child_id, &styles);
        let child = tree.node(child_id);
        assert_eq!(point.side, Side::Left);
        assert_eq!(point.x, child.x);
        assert!((point.y - (child.y + child.height / 2.0)).abs() < 0.001);
    }

    #[test]
    fn distribute_evenly_spreads_connectors_within_portion() {
        let mut styles = horizontal_styles(Direction::Right);
        let mut options = std::collections::BTreeMap::new();
        options.insert(
            1,
            crate::style::LevelStyleOptions {
                connection_points: Some("distribute-evenly".to_string()),
                width_portion: Some(0.8),
                ..Default::default()
            },
        );
        styles.configure(&options).unwrap();
        let (tree, root) = layout_outline(OUTLINE, &styles);
        let children = tree.visible_children(root);
        let parent = tree.node(root);
        let mut previous = f32::MIN;
        for child in &children {
            let point = parent_connection_point(&tree, root, Some(*child), &styles);
            assert!(point.y > previous, "connector offsets must be monotonic");
            assert!(point.y >= parent.y + parent.height * 0.1 - 0.001);
            assert!(point.y <= parent.y + parent.height * 0.9 + 0.001);
            previous = point.y;
        }
    }

    #[test]
    fn distributed_relative_follows_child_position() {
        let mut styles = horizontal_styles(Direction::Right);
        let mut options = std::collections::BTreeMap::new();
        options.insert(
            1,
            crate::style::LevelStyleOptions {
                connection_points: Some("distributedRelativeToParentSize".to_string()),
                ..Default::default()
            },
        );
        styles.configure(&options).unwrap();
        let (tree, root) = layout_outline(OUTLINE, &styles);
        let children = tree.visible_children(root);
        let first = parent_connection_point(&tree, root, Some(children[0]), &styles);
        let last = parent_connection_point(&tree, root, children.last().copied(), &styles);
        assert!(first.y < last.y);
    }
}
