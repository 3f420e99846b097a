use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub background: String,
    pub root_fill: String,
    pub root_text_color: String,
    pub branch_fill_colors: Vec<String>,
    pub branch_text_color: String,
    pub text_color: String,
    pub line_color: String,
    pub connector_width: f32,
    pub corner_radius: f32,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            background: "#FFFFFF".to_string(),
            root_fill: "#1C2430".to_string(),
            root_text_color: "#FFFFFF".to_string(),
            branch_fill_colors: vec![
                "#E8F0FE".to_string(),
                "#FCE8E6".to_string(),
                "#E6F4EA".to_string(),
                "#FEF7E0".to_string(),
                "#F3E8FD".to_string(),
                "#E4F7FB".to_string(),
            ],
            branch_text_color: "#1C2430".to_string(),
            text_color: "#3C4043".to_string(),
            line_color: "#A8B2C1".to_string(),
            connector_width: 1.6,
            corner_radius: 8.0,
        }
    }

    pub fn dark() -> Self {
        Self {
            background: "#1A1D23".to_string(),
            root_fill: "#E8EAED".to_string(),
            root_text_color: "#1A1D23".to_string(),
            branch_fill_colors: vec![
                "#2D3A52".to_string(),
                "#4A2F33".to_string(),
                "#2C4435".to_string(),
                "#4A4228".to_string(),
                "#3D2F4F".to_string(),
                "#28434B".to_string(),
            ],
            branch_text_color: "#E8EAED".to_string(),
            text_color: "#BDC1C6".to_string(),
            line_color: "#5F6B7C".to_string(),
            connector_width: 1.6,
            corner_radius: 8.0,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "light" | "default" => Some(Self::light()),
            "dark" => Some(Self::dark()),
            _ => None,
        }
    }

    /// Fill for a top-level branch and everything under it; the palette
    /// cycles when a map has more branches than colors.
    pub fn branch_fill(&self, branch_index: usize) -> &str {
        if self.branch_fill_colors.is_empty() {
            return &self.root_fill;
        }
        &self.branch_fill_colors[branch_index % self.branch_fill_colors.len()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
