use crate::layout::types::{Direction, LayoutType, Rect, TextBlock};
use crate::layout::ConnectionPointMode;

/// Index of a node inside its [`Tree`] arena. The arena owns every node;
/// ids are stable for the lifetime of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Per-node overrides of layout-affecting properties. An override wins over
/// the level style and, once set on an ancestor, is visible to descendants
/// through the resolver's inheritance fallthrough.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeOverrides {
    pub layout_type: Option<LayoutType>,
    pub direction: Option<Direction>,
    pub connection_point_mode: Option<ConnectionPointMode>,
    pub width_portion: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub text: String,
    pub level: usize,
    /// Non-owning back-reference, used only for style inheritance and id
    /// derivation. Never traversed downward.
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// When true the subtree is kept in the tree but excluded from layout
    /// and rendering.
    pub collapsed: bool,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Own box plus the full visible subtree extent. Overwritten on every
    /// layout pass.
    pub bounding_box: Rect,
    pub label: TextBlock,
    pub overrides: NodeOverrides,
    pub id: String,
}

impl Node {
    fn new(text: impl Into<String>, level: usize) -> Self {
        Self {
            text: text.into(),
            level,
            parent: None,
            children: Vec::new(),
            collapsed: false,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            bounding_box: Rect::default(),
            label: TextBlock::default(),
            overrides: NodeOverrides::default(),
            id: String::new(),
        }
    }

    pub fn own_box(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Arena-owned outline tree. Parents exclusively own their `children`
/// vectors; the `parent` links are plain indices.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    pub root: Option<NodeId>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_node(&mut self, text: impl Into<String>, level: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(text, level));
        id
    }

    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Children that participate in layout: none when the node is collapsed.
    pub fn visible_children(&self, id: NodeId) -> Vec<NodeId> {
        let node = self.node(id);
        if node.collapsed {
            Vec::new()
        } else {
            node.children.clone()
        }
    }

    /// All ids of the subtree rooted at `id`, in document order.
    pub fn subtree_ids(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            for child in self.node(current).children.iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// Ids of the visible subtree (collapsed subtrees excluded), document
    /// order.
    pub fn visible_subtree_ids(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            if !self.node(current).collapsed {
                for child in self.node(current).children.iter().rev() {
                    stack.push(*child);
                }
            }
        }
        out
    }

    /// Shifts a whole subtree, bounding boxes included. Used for direction
    /// mirroring and for re-anchoring column layouts.
    pub fn translate_subtree(&mut self, id: NodeId, dx: f32, dy: f32) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        for member in self.subtree_ids(id) {
            let node = &mut self.nodes[member.0];
            node.x += dx;
            node.y += dy;
            node.bounding_box.x += dx;
            node.bounding_box.y += dy;
        }
    }

    /// Recomputes deterministic ids for every node: a pure function of
    /// sanitized text, level, sibling index and parent text, so repeated
    /// passes over an unchanged tree produce identical ids.
    pub fn assign_ids(&mut self) {
        for index in 0..self.nodes.len() {
            let id = NodeId(index);
            let sibling_index = match self.nodes[index].parent {
                Some(parent) => self
                    .node(parent)
                    .children
                    .iter()
                    .position(|child| *child == id)
                    .unwrap_or(0),
                None => 0,
            };
            let parent_text = self.nodes[index]
                .parent
                .map(|parent| sanitize_id_part(&self.node(parent).text))
                .unwrap_or_default();
            let node = &mut self.nodes[index];
            let text = sanitize_id_part(&node.text);
            node.id = if parent_text.is_empty() {
                format!("mm-{}-{}-{}", text, node.level, sibling_index)
            } else {
                format!("mm-{}-{}-{}-{}", text, node.level, sibling_index, parent_text)
            };
        }
    }
}

/// Lowercases, replaces runs of non-alphanumerics with single dashes and
/// truncates, so ids stay short and URL/DOM safe.
pub fn sanitize_id_part(text: &str) -> String {
    let mut out = String::new();
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
        if out.len() >= 24 {
            break;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree() -> (Tree, NodeId, NodeId, NodeId) {
        let mut tree = Tree::new();
        let root = tree.new_node("Root", 1);
        let a = tree.new_node("Alpha", 2);
        let b = tree.new_node("Beta", 2);
        tree.attach(root, a);
        tree.attach(root, b);
        tree.root = Some(root);
        (tree, root, a, b)
    }

    #[test]
    fn visible_children_respects_collapse() {
        let (mut tree, root, ..) = small_tree();
        assert_eq!(tree.visible_children(root).len(), 2);
        tree.node_mut(root).collapsed = true;
        assert!(tree.visible_children(root).is_empty());
        // children stay in the tree
        assert_eq!(tree.node(root).children.len(), 2);
    }

    #[test]
    fn translate_subtree_moves_descendants_and_bounds() {
        let (mut tree, root, a, _) = small_tree();
        tree.node_mut(a).x = 10.0;
        tree.node_mut(a).bounding_box = Rect::new(10.0, 0.0, 5.0, 5.0);
        tree.translate_subtree(root, 3.0, -2.0);
        assert_eq!(tree.node(a).x, 13.0);
        assert_eq!(tree.node(a).bounding_box.x, 13.0);
        assert_eq!(tree.node(a).bounding_box.y, -2.0);
        assert_eq!(tree.node(root).y, -2.0);
    }

    #[test]
    fn ids_are_deterministic_and_collision_free_for_siblings() {
        let (mut tree, _, a, b) = small_tree();
        tree.assign_ids();
        let first_a = tree.node(a).id.clone();
        let first_b = tree.node(b).id.clone();
        assert_ne!(first_a, first_b);
        // mutation that does not change the shape keeps ids stable
        tree.node_mut(a).collapsed = true;
        tree.assign_ids();
        assert_eq!(tree.node(a).id, first_a);
        assert_eq!(tree.node(b).id, first_b);
    }

    #[test]
    fn sanitize_strips_punctuation_and_truncates() {
        assert_eq!(sanitize_id_part("Hello, World!"), "hello-world");
        assert_eq!(sanitize_id_part("  --  "), "");
        let long = sanitize_id_part("a".repeat(50).as_str());
        assert!(long.len() <= 24);
    }
}
