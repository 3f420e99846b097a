use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use crate::node::Tree;
use crate::style::StyleResolver;

/// JSON snapshot of a laid-out tree, for golden tests and debugging.
#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub layout: String,
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub text: String,
    pub level: usize,
    pub collapsed: bool,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub bounding_box: [f32; 4],
    pub label_lines: Vec<String>,
}

impl LayoutDump {
    pub fn from_tree(tree: &Tree, styles: &StyleResolver) -> Self {
        let (layout, width, height, ids) = match tree.root {
            Some(root) => {
                let bounds = tree.node(root).bounding_box;
                let tag = format!("{:?}", styles.effective_layout_type(tree, root));
                (tag, bounds.width, bounds.height, tree.visible_subtree_ids(root))
            }
            None => ("Horizontal".to_string(), 0.0, 0.0, Vec::new()),
        };
        let nodes = ids
            .into_iter()
            .map(|id| {
                let node = tree.node(id);
                NodeDump {
                    id: node.id.clone(),
                    text: node.text.clone(),
                    level: node.level,
                    collapsed: node.collapsed,
                    x: node.x,
                    y: node.y,
                    width: node.width,
                    height: node.height,
                    bounding_box: [
                        node.bounding_box.x,
                        node.bounding_box.y,
                        node.bounding_box.width,
                        node.bounding_box.height,
                    ],
                    label_lines: node.label.lines.clone(),
                }
            })
            .collect();
        LayoutDump {
            layout,
            width,
            height,
            nodes,
        }
    }
}

pub fn write_layout_dump(path: &Path, tree: &Tree, styles: &StyleResolver) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_tree(tree, styles);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{apply_layout, Point};
    use crate::parser::parse_outline;

    #[test]
    fn dump_lists_visible_nodes_only() {
        let mut tree = parse_outline("# Root\n- a\n  - b\n").unwrap();
        let mut styles = StyleResolver::new();
        styles.set_fast_metrics(true);
        let root = tree.root.unwrap();
        let a = tree.node(root).children[0];
        tree.node_mut(a).collapsed = true;
        apply_layout(&mut tree, Point::new(0.0, 0.0), &styles).expect("layout");

        let dump = LayoutDump::from_tree(&tree, &styles);
        let texts: Vec<&str> = dump.nodes.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["Root", "a"]);
        assert!(dump.width > 0.0);
        let json = serde_json::to_string(&dump).unwrap();
        assert!(json.contains("\"bounding_box\""));
    }
}
