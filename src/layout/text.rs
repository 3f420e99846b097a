use crate::style::{LevelStyle, WrapPolicy};
use crate::text_metrics;

use super::types::TextBlock;

const LABEL_LINE_HEIGHT: f32 = 1.2;

/// Measures and wraps a node label under the level's wrap policy.
pub(crate) fn wrap_label(text: &str, style: &LevelStyle, fast_metrics: bool) -> TextBlock {
    let line_height = style.font_size * LABEL_LINE_HEIGHT;
    match style.wrap {
        WrapPolicy::None => {
            let line = text.trim().to_string();
            let width = line_width(&line, style, fast_metrics);
            TextBlock {
                lines: vec![line],
                width,
                height: line_height,
                line_height,
            }
        }
        WrapPolicy::Word {
            max_width,
            max_word_length,
        } => wrap_words(text, max_width, max_word_length, style, fast_metrics),
    }
}

fn wrap_words(
    text: &str,
    max_width: f32,
    max_word_length: usize,
    style: &LevelStyle,
    fast_metrics: bool,
) -> TextBlock {
    let line_height = style.font_size * LABEL_LINE_HEIGHT;
    let space_width = line_width(" ", style, fast_metrics);

    let mut words: Vec<String> = Vec::new();
    for word in text.split_whitespace() {
        if word.chars().count() > max_word_length {
            words.extend(split_long_word(word, max_word_length));
        } else {
            words.push(word.to_string());
        }
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0f32;
    for word in words {
        // Chunk widths are re-measured, not estimated from character counts.
        let word_width = line_width(&word, style, fast_metrics);
        if current.is_empty() {
            current = word;
            current_width = word_width;
        } else if current_width + space_width + word_width <= max_width {
            current.push(' ');
            current.push_str(&word);
            current_width += space_width + word_width;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word;
            current_width = word_width;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }

    let max_line_width = lines
        .iter()
        .map(|line| line_width(line, style, fast_metrics))
        .fold(0.0, f32::max);
    // A short trailing line must not shrink the box below a usable wrap
    // target, and the configured cap is never exceeded.
    let width = if lines.len() > 1 {
        max_line_width.max(max_width * 0.8).min(max_width)
    } else {
        max_line_width
    };
    let height = lines.len() as f32 * line_height;

    TextBlock {
        lines,
        width,
        height,
        line_height,
    }
}

/// Splits an over-long word into chunks of at most `max_word_length`
/// characters, respecting char boundaries.
fn split_long_word(word: &str, max_word_length: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    chars
        .chunks(max_word_length.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

pub(crate) fn line_width(text: &str, style: &LevelStyle, fast_metrics: bool) -> f32 {
    if fast_metrics {
        return fallback_line_width(text, style.font_size);
    }
    text_metrics::measure_text_width(text, &style.font_family, style.font_size, style.font_weight)
        .unwrap_or_else(|| fallback_line_width(text, style.font_size))
}

fn fallback_line_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}

/// Per-character width factors calibrated against a common sans stack at a
/// 16px baseline; used when fast metrics are requested or no face resolves.
fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.306,
        '.' | ',' | ':' | ';' | '|' | '!' | '(' | ')' | '[' | ']' | '{' | '}' => 0.321,
        'i' | 'j' | 'l' => 0.24,
        'f' | 't' | 'r' => 0.34,
        'm' | 'w' => 0.84,
        'M' | 'W' => 0.93,
        'I' => 0.272,
        '0'..='9' => 0.6,
        'A'..='Z' => 0.68,
        _ => 0.56,
    }
}
