use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::types::{ConnectionPointMode, Direction, LayoutType};
use crate::node::{NodeId, NodeOverrides, Tree};

/// Configuration errors are caller bugs and fail fast instead of being
/// silently defaulted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StyleError {
    #[error("unknown layout type: {0}")]
    UnknownLayoutType(String),
    #[error("unknown direction: {0}")]
    UnknownDirection(String),
    #[error("unknown connection point mode: {0}")]
    UnknownConnectionPointMode(String),
    #[error("unknown node kind: {0}")]
    UnknownNodeKind(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Rounded rectangle around the label.
    Box,
    /// Bare text without a surrounding box.
    Text,
}

impl NodeKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "box" => Some(Self::Box),
            "text" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Text wrap policy for node labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WrapPolicy {
    None,
    Word {
        max_width: f32,
        max_word_length: usize,
    },
}

/// Visual and layout configuration for one nesting level. Immutable during
/// a layout pass; replaced wholesale on preset or layout switches.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelStyle {
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: u16,
    pub horizontal_padding: f32,
    pub vertical_padding: f32,
    /// Gap between a parent box and its children.
    pub parent_padding: f32,
    /// Gap between adjacent sibling subtrees.
    pub sibling_padding: f32,
    pub layout_type: Option<LayoutType>,
    pub direction: Option<Direction>,
    pub connection_point_mode: Option<ConnectionPointMode>,
    /// Central fraction of the parent edge used by distributed connectors.
    pub width_portion: Option<f32>,
    pub wrap: WrapPolicy,
    pub node_kind: NodeKind,
}

const DEFAULT_FONT_FAMILY: &str = "Inter, Segoe UI, system-ui, -apple-system, sans-serif";

fn default_level_style(level: usize) -> LevelStyle {
    // Progressively smaller fonts and tighter padding per level; levels
    // beyond 6 share the smallest configuration.
    let (font_size, font_weight, node_kind) = match level {
        0 | 1 => (20.0, 700, NodeKind::Box),
        2 => (16.0, 600, NodeKind::Box),
        3 => (14.0, 400, NodeKind::Box),
        4 => (12.0, 400, NodeKind::Box),
        5 => (11.0, 400, NodeKind::Text),
        _ => (10.0, 400, NodeKind::Text),
    };
    let (horizontal_padding, vertical_padding) = match level {
        0 | 1 => (14.0, 10.0),
        2 => (12.0, 8.0),
        3 => (10.0, 6.0),
        4 => (8.0, 5.0),
        _ => (6.0, 4.0),
    };
    let (parent_padding, sibling_padding) = match level {
        0 | 1 => (80.0, 20.0),
        2 => (60.0, 16.0),
        3 => (50.0, 12.0),
        4 => (40.0, 10.0),
        _ => (30.0, 8.0),
    };
    let layout_type = match level {
        0 => None,
        1 => Some(LayoutType::Taproot),
        _ => Some(LayoutType::Horizontal),
    };
    let max_width = match level {
        0 | 1 => 260.0,
        2 => 240.0,
        3 => 220.0,
        _ => 200.0,
    };
    LevelStyle {
        font_family: DEFAULT_FONT_FAMILY.to_string(),
        font_size,
        font_weight,
        horizontal_padding,
        vertical_padding,
        parent_padding,
        sibling_padding,
        layout_type,
        direction: None,
        connection_point_mode: None,
        width_portion: None,
        wrap: WrapPolicy::Word {
            max_width,
            max_word_length: 20,
        },
        node_kind,
    }
}

/// Partial per-level style used by `configure` and config files; string
/// tags are validated on application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LevelStyleOptions {
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub font_weight: Option<u16>,
    pub horizontal_padding: Option<f32>,
    pub vertical_padding: Option<f32>,
    pub parent_padding: Option<f32>,
    pub sibling_padding: Option<f32>,
    pub layout_type: Option<String>,
    pub direction: Option<String>,
    pub connection_points: Option<String>,
    pub width_portion: Option<f32>,
    pub max_width: Option<f32>,
    pub max_word_length: Option<usize>,
    pub node_kind: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct GlobalLayoutOptions {
    pub direction: Option<Direction>,
    pub exclude_levels: Vec<usize>,
    pub parent_padding: Option<f32>,
    pub sibling_padding: Option<f32>,
}

/// Resolves the style for a level and effective per-node values with the
/// override -> level -> parent precedence.
#[derive(Debug, Clone)]
pub struct StyleResolver {
    levels: BTreeMap<usize, LevelStyle>,
    default_style: LevelStyle,
    fast_metrics: bool,
}

impl Default for StyleResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleResolver {
    pub fn new() -> Self {
        let mut resolver = Self {
            levels: BTreeMap::new(),
            default_style: default_level_style(7),
            fast_metrics: false,
        };
        resolver.reset();
        resolver
    }

    /// Restores the built-in defaults for levels 1-6.
    pub fn reset(&mut self) {
        self.levels.clear();
        for level in 1..=6 {
            self.levels.insert(level, default_level_style(level));
        }
        self.default_style = default_level_style(7);
    }

    /// Deterministic character-table measurement instead of system fonts.
    pub fn set_fast_metrics(&mut self, fast: bool) {
        self.fast_metrics = fast;
    }

    pub fn fast_metrics(&self) -> bool {
        self.fast_metrics
    }

    /// Exact level match, else the shared default style.
    pub fn level_style(&self, level: usize) -> &LevelStyle {
        self.levels.get(&level).unwrap_or(&self.default_style)
    }

    /// Shallow-merges partial per-level options; new values win.
    pub fn configure(
        &mut self,
        options: &BTreeMap<usize, LevelStyleOptions>,
    ) -> Result<(), StyleError> {
        for (level, partial) in options {
            let mut style = self
                .levels
                .get(level)
                .cloned()
                .unwrap_or_else(|| default_level_style(*level));
            apply_level_options(&mut style, partial)?;
            self.levels.insert(*level, style);
        }
        Ok(())
    }

    /// Rewrites the layout type/direction of every level at once. Unknown
    /// type tags are rejected rather than defaulted: they indicate a caller
    /// bug. Column strategies apply to the root level; deeper levels fall
    /// back to horizontal with the direction left to column overrides.
    pub fn set_global_layout_type(
        &mut self,
        tag: &str,
        options: &GlobalLayoutOptions,
    ) -> Result<(), StyleError> {
        let layout = LayoutType::from_token(tag)
            .ok_or_else(|| StyleError::UnknownLayoutType(tag.to_string()))?;
        for (level, style) in self.levels.iter_mut() {
            if options.exclude_levels.contains(level) {
                continue;
            }
            apply_global_layout(style, *level, layout, options);
        }
        apply_global_layout(&mut self.default_style, usize::MAX, layout, options);
        Ok(())
    }

    pub fn effective_layout_type(&self, tree: &Tree, id: NodeId) -> LayoutType {
        self.resolve_inherited(tree, id, true, &|o| o.layout_type, &|s| s.layout_type)
            .unwrap_or(LayoutType::Horizontal)
    }

    pub fn effective_direction(&self, tree: &Tree, id: NodeId) -> Direction {
        self.resolve_inherited(tree, id, true, &|o| o.direction, &|s| s.direction)
            .unwrap_or(Direction::Right)
    }

    pub fn effective_connection_point_mode(&self, tree: &Tree, id: NodeId) -> ConnectionPointMode {
        self.resolve_inherited(
            tree,
            id,
            true,
            &|o| o.connection_point_mode,
            &|s| s.connection_point_mode,
        )
        .unwrap_or(ConnectionPointMode::Single)
    }

    pub fn effective_width_portion(&self, tree: &Tree, id: NodeId) -> f32 {
        self.resolve_inherited(tree, id, true, &|o| o.width_portion, &|s| s.width_portion)
            .unwrap_or(0.8)
    }

    /// Three-step lookup: the node's own override wins outright, then the
    /// level style's direct value, then the parent's resolved value.
    fn resolve_inherited<T, FO, FL>(
        &self,
        tree: &Tree,
        id: NodeId,
        inherit: bool,
        own: &FO,
        level: &FL,
    ) -> Option<T>
    where
        T: Copy,
        FO: Fn(&NodeOverrides) -> Option<T>,
        FL: Fn(&LevelStyle) -> Option<T>,
    {
        let node = tree.node(id);
        if let Some(value) = own(&node.overrides) {
            return Some(value);
        }
        if let Some(value) = level(self.level_style(node.level)) {
            return Some(value);
        }
        if !inherit {
            return None;
        }
        node.parent
            .and_then(|parent| self.resolve_inherited(tree, parent, inherit, own, level))
    }
}

fn apply_global_layout(
    style: &mut LevelStyle,
    level: usize,
    layout: LayoutType,
    options: &GlobalLayoutOptions,
) {
    match layout {
        LayoutType::Taproot | LayoutType::Classic => {
            style.layout_type = if level <= 1 {
                Some(layout)
            } else {
                Some(LayoutType::Horizontal)
            };
            style.direction = None;
        }
        LayoutType::Horizontal => {
            style.layout_type = Some(LayoutType::Horizontal);
            style.direction = Some(options.direction.unwrap_or(Direction::Right));
        }
        LayoutType::Vertical => {
            style.layout_type = Some(LayoutType::Vertical);
            style.direction = Some(options.direction.unwrap_or(Direction::Down));
        }
    }
    if let Some(padding) = options.parent_padding {
        style.parent_padding = padding;
    }
    if let Some(padding) = options.sibling_padding {
        style.sibling_padding = padding;
    }
}

fn apply_level_options(style: &mut LevelStyle, partial: &LevelStyleOptions) -> Result<(), StyleError> {
    if let Some(value) = &partial.font_family {
        style.font_family = value.clone();
    }
    if let Some(value) = partial.font_size {
        style.font_size = value;
    }
    if let Some(value) = partial.font_weight {
        style.font_weight = value;
    }
    if let Some(value) = partial.horizontal_padding {
        style.horizontal_padding = value;
    }
    if let Some(value) = partial.vertical_padding {
        style.vertical_padding = value;
    }
    if let Some(value) = partial.parent_padding {
        style.parent_padding = value;
    }
    if let Some(value) = partial.sibling_padding {
        style.sibling_padding = value;
    }
    if let Some(tag) = &partial.layout_type {
        style.layout_type = Some(
            LayoutType::from_token(tag).ok_or_else(|| StyleError::UnknownLayoutType(tag.clone()))?,
        );
    }
    if let Some(tag) = &partial.direction {
        style.direction = Some(
            Direction::from_token(tag).ok_or_else(|| StyleError::UnknownDirection(tag.clone()))?,
        );
    }
    if let Some(tag) = &partial.connection_points {
        style.connection_point_mode = Some(
            ConnectionPointMode::from_token(tag)
                .ok_or_else(|| StyleError::UnknownConnectionPointMode(tag.clone()))?,
        );
    }
    if let Some(value) = partial.width_portion {
        style.width_portion = Some(value);
    }
    if partial.max_width.is_some() || partial.max_word_length.is_some() {
        let (current_width, current_word) = match style.wrap {
            WrapPolicy::Word {
                max_width,
                max_word_length,
            } => (max_width, max_word_length),
            WrapPolicy::None => (240.0, 20),
        };
        style.wrap = WrapPolicy::Word {
            max_width: partial.max_width.unwrap_or(current_width),
            max_word_length: partial.max_word_length.unwrap_or(current_word),
        };
    }
    if let Some(tag) = &partial.node_kind {
        style.node_kind =
            NodeKind::from_token(tag).ok_or_else(|| StyleError::UnknownNodeKind(tag.clone()))?;
    }
    Ok(())
}
