use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle used for node boxes and subtree bounding boxes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Containment with a small tolerance for accumulated float error.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        const EPS: f32 = 0.01;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.bottom() <= self.bottom() + EPS
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Which edge of a node box a connector attaches to. The renderer bends
/// beziers along the axis implied by the side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionPoint {
    pub x: f32,
    pub y: f32,
    pub side: Side,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Down,
    Up,
}

impl Direction {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "down" => Some(Self::Down),
            "up" => Some(Self::Up),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutType {
    Horizontal,
    Vertical,
    Taproot,
    Classic,
}

impl LayoutType {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "horizontal" => Some(Self::Horizontal),
            "vertical" => Some(Self::Vertical),
            "taproot" => Some(Self::Taproot),
            "classic" => Some(Self::Classic),
            _ => None,
        }
    }
}

/// How connectors leaving a parent are spread along its edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPointMode {
    Single,
    DistributedRelativeToParentSize,
    DistributeEvenly,
}

impl ConnectionPointMode {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "single" => Some(Self::Single),
            "distributed-relative-to-parent-size" | "distributedRelativeToParentSize" => {
                Some(Self::DistributedRelativeToParentSize)
            }
            "distribute-evenly" | "distributeEvenly" => Some(Self::DistributeEvenly),
            _ => None,
        }
    }
}

/// Measured, possibly wrapped label text.
#[derive(Debug, Clone, Default)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
    pub line_height: f32,
}
