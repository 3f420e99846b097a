use std::path::Path;

use markmind::layout::{apply_layout, Point, Rect};
use markmind::node::Tree;
use markmind::parser::parse_outline;
use markmind::render::render_svg;
use markmind::style::{GlobalLayoutOptions, StyleResolver};
use markmind::theme::Theme;

const FIXTURES: [&str; 4] = [
    "trip_plan.md",
    "irregular_indents.md",
    "sections.md",
    "deep_outline.md",
];

const LAYOUTS: [&str; 4] = ["horizontal", "vertical", "taproot", "classic"];

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|err| panic!("{name}: {err}"))
}

fn styles_for(layout: &str) -> StyleResolver {
    let mut styles = StyleResolver::new();
    styles.set_fast_metrics(true);
    styles
        .set_global_layout_type(layout, &GlobalLayoutOptions::default())
        .expect("known layout type");
    styles
}

fn laid_out(name: &str, layout: &str) -> (Tree, StyleResolver) {
    let mut tree = parse_outline(&fixture(name)).unwrap_or_else(|| panic!("{name}: parse failed"));
    let styles = styles_for(layout);
    apply_layout(&mut tree, Point::new(0.0, 0.0), &styles)
        .unwrap_or_else(|| panic!("{name}: layout failed"));
    (tree, styles)
}

fn assert_containment(tree: &Tree, context: &str) {
    let root = tree.root.expect("root");
    for id in tree.visible_subtree_ids(root) {
        let node = tree.node(id);
        assert!(
            node.bounding_box.contains_rect(&node.own_box()),
            "{context}: bounding box of {:?} misses its own box",
            node.text
        );
        if node.collapsed {
            continue;
        }
        for child in &node.children {
            assert!(
                node.bounding_box.contains_rect(&tree.node(*child).bounding_box),
                "{context}: {:?} does not contain child {:?}",
                node.text,
                tree.node(*child).text
            );
        }
    }
}

fn geometry(tree: &Tree) -> Vec<(f32, f32, f32, f32, Rect)> {
    let root = tree.root.expect("root");
    tree.visible_subtree_ids(root)
        .into_iter()
        .map(|id| {
            let node = tree.node(id);
            (node.x, node.y, node.width, node.height, node.bounding_box)
        })
        .collect()
}

#[test]
fn every_fixture_lays_out_under_every_layout() {
    for name in FIXTURES {
        for layout in LAYOUTS {
            let (tree, _) = laid_out(name, layout);
            assert_containment(&tree, &format!("{name}/{layout}"));
        }
    }
}

#[test]
fn relayout_is_byte_identical() {
    for name in FIXTURES {
        for layout in LAYOUTS {
            let (mut tree, styles) = laid_out(name, layout);
            let first = geometry(&tree);
            apply_layout(&mut tree, Point::new(0.0, 0.0), &styles).expect("second pass");
            assert_eq!(first, geometry(&tree), "{name}/{layout}");
        }
    }
}

#[test]
fn every_fixture_renders_valid_svg() {
    let theme = Theme::light();
    for name in FIXTURES {
        for layout in LAYOUTS {
            let (tree, styles) = laid_out(name, layout);
            let svg = render_svg(&tree, &theme, &styles);
            assert!(svg.starts_with("<svg"), "{name}/{layout}: missing <svg tag");
            assert!(svg.ends_with("</svg>"), "{name}/{layout}: missing </svg tag");
            let root = tree.root.expect("root");
            assert!(
                svg.contains(&tree.node(root).label.lines[0]),
                "{name}/{layout}: root label missing from output"
            );
        }
    }
}

#[test]
fn deep_levels_start_collapsed_and_stay_out_of_bounds() {
    let (tree, _) = laid_out("deep_outline.md", "horizontal");
    let root = tree.root.expect("root");
    let visible = tree.visible_subtree_ids(root);
    for id in &visible {
        assert!(
            tree.node(*id).level <= 4,
            "level 5+ should be hidden behind the auto-collapse"
        );
    }
}

#[test]
fn classic_and_taproot_split_the_top_branches() {
    for layout in ["taproot", "classic"] {
        let (tree, styles) = laid_out("trip_plan.md", layout);
        let root = tree.root.expect("root");
        let children = tree.visible_children(root);
        assert!(children.len() >= 3);
        let mut sides = std::collections::BTreeSet::new();
        for child in children {
            sides.insert(format!(
                "{:?}",
                styles.effective_direction(&tree, child)
            ));
        }
        assert_eq!(sides.len(), 2, "{layout}: both columns should be used");
    }
}
