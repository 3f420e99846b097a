use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::style::{GlobalLayoutOptions, LevelStyleOptions, StyleResolver};
use crate::theme::Theme;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub styles: StyleResolver,
    pub render: RenderConfig,
}

/// On-disk configuration. All fields optional; `levels` is keyed by
/// nesting level.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    layout: Option<String>,
    direction: Option<String>,
    fast_metrics: Option<bool>,
    parent_padding: Option<f32>,
    sibling_padding: Option<f32>,
    exclude_levels: Vec<usize>,
    levels: BTreeMap<usize, LevelStyleOptions>,
    render: Option<RenderConfigFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
}

/// Loads a JSON (or JSON5) config file and applies it over the defaults.
/// Unknown theme names and layout/direction tags are hard errors.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = match serde_json::from_str(&contents) {
        Ok(parsed) => parsed,
        Err(_) => json5::from_str(&contents)?,
    };
    apply_config_file(parsed)
}

fn apply_config_file(file: ConfigFile) -> anyhow::Result<Config> {
    let mut config = Config::default();

    if let Some(name) = file.theme.as_deref() {
        config.theme =
            Theme::from_name(name).ok_or_else(|| anyhow::anyhow!("unknown theme: {name}"))?;
    }

    if let Some(layout) = file.layout.as_deref() {
        let direction = file
            .direction
            .as_deref()
            .map(|tag| {
                crate::layout::Direction::from_token(tag)
                    .ok_or_else(|| anyhow::anyhow!("unknown direction: {tag}"))
            })
            .transpose()?;
        let options = GlobalLayoutOptions {
            direction,
            exclude_levels: file.exclude_levels.clone(),
            parent_padding: file.parent_padding,
            sibling_padding: file.sibling_padding,
        };
        config.styles.set_global_layout_type(layout, &options)?;
    }

    if !file.levels.is_empty() {
        config.styles.configure(&file.levels)?;
    }

    if let Some(fast) = file.fast_metrics {
        config.styles.set_fast_metrics(fast);
    }

    if let Some(render) = file.render {
        if let Some(width) = render.width {
            config.render.width = width;
        }
        if let Some(height) = render.height {
            config.render.height = height;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Direction, LayoutType};

    fn parse(contents: &str) -> anyhow::Result<Config> {
        let parsed: ConfigFile = serde_json::from_str(contents).unwrap();
        apply_config_file(parsed)
    }

    #[test]
    fn empty_config_keeps_defaults() {
        let config = parse("{}").unwrap();
        assert_eq!(config.render.width, 1200.0);
        assert_eq!(config.render.height, 800.0);
        assert_eq!(
            config.styles.level_style(1).layout_type,
            Some(LayoutType::Taproot)
        );
    }

    #[test]
    fn layout_and_direction_are_applied_globally() {
        let config = parse(r#"{"layout": "horizontal", "direction": "left"}"#).unwrap();
        assert_eq!(
            config.styles.level_style(2).layout_type,
            Some(LayoutType::Horizontal)
        );
        assert_eq!(config.styles.level_style(2).direction, Some(Direction::Left));
    }

    #[test]
    fn level_options_merge_over_defaults() {
        let config = parse(r#"{"levels": {"2": {"fontSize": 24.0, "maxWidth": 300.0}}}"#).unwrap();
        assert_eq!(config.styles.level_style(2).font_size, 24.0);
        // untouched fields survive
        assert_eq!(config.styles.level_style(2).font_weight, 600);
    }

    #[test]
    fn unknown_tags_are_rejected() {
        assert!(parse(r#"{"layout": "spiral"}"#).is_err());
        assert!(parse(r#"{"theme": "sepia"}"#).is_err());
        assert!(parse(r#"{"layout": "horizontal", "direction": "sideways"}"#).is_err());
    }

    #[test]
    fn render_size_overrides() {
        let config = parse(r#"{"render": {"width": 640.0, "height": 480.0}}"#).unwrap();
        assert_eq!(config.render.width, 640.0);
        assert_eq!(config.render.height, 480.0);
    }
}
