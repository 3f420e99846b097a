mod classic;
mod column;
mod directional;
mod taproot;
pub(crate) mod text;
pub(crate) mod types;

pub use classic::ClassicLayout;
pub use directional::DirectionalLayout;
pub use taproot::TaprootLayout;
pub use types::*;

use crate::node::{NodeId, Tree};
use crate::style::StyleResolver;

pub const DEFAULT_PARENT_PADDING: f32 = 80.0;
pub const DEFAULT_CHILD_PADDING: f32 = 20.0;

/// One capability interface over the closed set of layout variants. Every
/// strategy mutates node geometry in place and returns the subtree's
/// bounding box; repeated application over an unchanged tree is
/// geometrically identical.
pub trait LayoutStrategy {
    fn apply(&self, tree: &mut Tree, node: NodeId, origin: Point, styles: &StyleResolver) -> Rect;

    fn parent_connection_point(
        &self,
        tree: &Tree,
        node: NodeId,
        styles: &StyleResolver,
        child: Option<NodeId>,
    ) -> ConnectionPoint;

    fn child_connection_point(
        &self,
        tree: &Tree,
        node: NodeId,
        styles: &StyleResolver,
    ) -> ConnectionPoint;
}

/// Pure selection: maps a type tag to a strategy instance. Missing
/// paddings fall back to fixed constants.
pub fn create_layout(
    tag: LayoutType,
    parent_padding: Option<f32>,
    child_padding: Option<f32>,
    direction: Direction,
) -> Box<dyn LayoutStrategy> {
    let parent_padding = parent_padding.unwrap_or(DEFAULT_PARENT_PADDING);
    let child_padding = child_padding.unwrap_or(DEFAULT_CHILD_PADDING);
    match tag {
        LayoutType::Horizontal => Box::new(DirectionalLayout::horizontal(
            parent_padding,
            child_padding,
            direction,
        )),
        LayoutType::Vertical => Box::new(DirectionalLayout::vertical(
            parent_padding,
            child_padding,
            direction,
        )),
        LayoutType::Taproot => Box::new(TaprootLayout::new(parent_padding, child_padding)),
        LayoutType::Classic => Box::new(ClassicLayout::new(parent_padding, child_padding)),
    }
}

/// Builds the strategy a specific node resolves to: effective layout type
/// and direction through the override/level/parent chain, paddings from
/// the node's level style.
pub fn layout_for_node(tree: &Tree, id: NodeId, styles: &StyleResolver) -> Box<dyn LayoutStrategy> {
    let tag = styles.effective_layout_type(tree, id);
    let direction = styles.effective_direction(tree, id);
    let style = styles.level_style(tree.node(id).level);
    create_layout(
        tag,
        Some(style.parent_padding),
        Some(style.sibling_padding),
        direction,
    )
}

/// Lays out the whole visible tree from `origin` and returns the root
/// bounding box. An empty tree is nothing to lay out, not an error.
pub fn apply_layout(tree: &mut Tree, origin: Point, styles: &StyleResolver) -> Option<Rect> {
    let root = tree.root?;
    let strategy = layout_for_node(tree, root, styles);
    Some(strategy.apply(tree, root, origin, styles))
}

/// Where a connector leaves `node` toward `child`, using the node's own
/// resolved strategy.
pub fn parent_connection_point(
    tree: &Tree,
    node: NodeId,
    child: Option<NodeId>,
    styles: &StyleResolver,
) -> ConnectionPoint {
    layout_for_node(tree, node, styles).parent_connection_point(tree, node, styles, child)
}

/// Where a connector arrives on `node` from its parent.
pub fn child_connection_point(tree: &Tree, node: NodeId, styles: &StyleResolver) -> ConnectionPoint {
    layout_for_node(tree, node, styles).child_connection_point(tree, node, styles)
}
