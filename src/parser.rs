use once_cell::sync::Lazy;
use regex::Regex;

use crate::node::{NodeId, Tree};

/// Nodes at this level or deeper start collapsed.
pub const AUTO_COLLAPSE_LEVEL: usize = 4;

const TAB_WIDTH: usize = 4;

static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s*(.*)$").unwrap());
static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*]\s+(.*)$").unwrap());

/// Parses a markdown outline into a tree. Headings carry their `#` run
/// length as level; bullet levels are inferred from indentation relative
/// to previously seen indents, so irregular widths (2, 3, 5, 7 spaces)
/// still nest predictably. Returns `None` when the input has no headings
/// or bullets at all.
pub fn parse_outline(input: &str) -> Option<Tree> {
    let mut tree = Tree::new();
    let synthetic_root = tree.new_node("", 0);

    // Stack of (level, id); the synthetic root keeps it non-empty.
    let mut stack: Vec<(usize, NodeId)> = vec![(0, synthetic_root)];
    let mut indents = IndentTracker::new();
    let mut heading_level = 0usize;

    for raw_line in input.lines() {
        if raw_line.trim().is_empty() {
            continue;
        }
        let trimmed = raw_line.trim_start();
        if let Some(caps) = HEADING_RE.captures(trimmed) {
            let level = caps[1].len();
            let text = caps[2].trim();
            if text.is_empty() {
                continue;
            }
            heading_level = level;
            indents.reset();
            push_node(&mut tree, &mut stack, text, level);
            continue;
        }
        if let Some(caps) = BULLET_RE.captures(trimmed) {
            let text = caps[1].trim();
            if text.is_empty() {
                continue;
            }
            let indent = indent_columns(raw_line);
            let level = indents.level_for(indent, heading_level);
            push_node(&mut tree, &mut stack, text, level);
            continue;
        }
        // anything else is not a structural line
    }

    let top_level = tree.node(synthetic_root).children.first().copied()?;
    tree.node_mut(top_level).parent = None;
    tree.root = Some(top_level);
    tree.assign_ids();
    Some(tree)
}

fn push_node(tree: &mut Tree, stack: &mut Vec<(usize, NodeId)>, text: &str, level: usize) {
    while stack.last().is_some_and(|(top, _)| *top >= level) {
        stack.pop();
    }
    let parent = stack.last().map(|(_, id)| *id).expect("synthetic root");
    let id = tree.new_node(text, level);
    if level >= AUTO_COLLAPSE_LEVEL {
        tree.node_mut(id).collapsed = true;
    }
    tree.attach(parent, id);
    stack.push((level, id));
}

/// Leading-whitespace column count with tabs expanded.
fn indent_columns(line: &str) -> usize {
    let mut columns = 0;
    for ch in line.chars() {
        match ch {
            ' ' => columns += 1,
            '\t' => columns += TAB_WIDTH,
            _ => break,
        }
    }
    columns
}

/// Maps raw indent widths to bullet levels. Indent widths are compared
/// against previously recorded widths instead of being divided by a fixed
/// tab size.
struct IndentTracker {
    /// (indent columns, level) pairs in first-seen order.
    recorded: Vec<(usize, usize)>,
    previous: Option<(usize, usize)>,
}

impl IndentTracker {
    fn new() -> Self {
        Self {
            recorded: Vec::new(),
            previous: None,
        }
    }

    /// Headings start a fresh indentation context.
    fn reset(&mut self) {
        self.recorded.clear();
        self.previous = None;
    }

    fn level_for(&mut self, indent: usize, heading_level: usize) -> usize {
        let level = match self.previous {
            None => heading_level + 1,
            Some((previous_indent, previous_level)) => {
                if let Some(level) = self.recorded_level(indent) {
                    level
                } else if indent > previous_indent {
                    previous_level + 1
                } else {
                    // shallower than before but never seen: nest one past
                    // the closest smaller recorded indent
                    self.closest_smaller_level(indent)
                        .map(|level| level + 1)
                        .unwrap_or(heading_level + 1)
                }
            }
        };
        if self.recorded_level(indent).is_none() {
            self.recorded.push((indent, level));
        }
        self.previous = Some((indent, level));
        level
    }

    fn recorded_level(&self, indent: usize) -> Option<usize> {
        self.recorded
            .iter()
            .find(|(recorded, _)| *recorded == indent)
            .map(|(_, level)| *level)
    }

    fn closest_smaller_level(&self, indent: usize) -> Option<usize> {
        self.recorded
            .iter()
            .filter(|(recorded, _)| *recorded < indent)
            .max_by_key(|(recorded, _)| *recorded)
            .map(|(_, level)| *level)
    }
}
