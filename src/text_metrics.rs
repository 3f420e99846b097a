use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use ttf_parser::Face;

static FONT_CATALOG: Lazy<std::sync::Mutex<FontCatalog>> =
    Lazy::new(|| std::sync::Mutex::new(FontCatalog::new()));

/// Measures a single line of text in pixels. Returns `None` when no face
/// can be resolved for the family/weight pair; callers fall back to the
/// calibrated character table in `layout::text`.
pub fn measure_text_width(text: &str, font_family: &str, font_size: f32, weight: u16) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut catalog = FONT_CATALOG.lock().ok()?;
    catalog.measure(text, font_family, font_size, weight)
}

struct FontCatalog {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<(String, u16), Option<FaceMetrics>>,
}

impl FontCatalog {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_family: &str, font_size: f32, weight: u16) -> Option<f32> {
        let key = (normalize_family_key(font_family), weight);
        if !self.faces.contains_key(&key) {
            let metrics = self.load_metrics(font_family, weight);
            self.faces.insert(key.clone(), metrics);
        }
        let metrics = self.faces.get(&key)?.as_ref()?;
        let normalized = text.replace('\t', "    ");
        Some(metrics.measure(&normalized, font_size))
    }

    fn load_metrics(&mut self, font_family: &str, weight: u16) -> Option<FaceMetrics> {
        let mut names: Vec<String> = Vec::new();
        let mut generics: Vec<Option<Family<'static>>> = Vec::new();
        for part in font_family.split(',') {
            let raw = part.trim().trim_matches('"').trim_matches('\'');
            if raw.is_empty() {
                continue;
            }
            match raw.to_ascii_lowercase().as_str() {
                "serif" => generics.push(Some(Family::Serif)),
                "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                    generics.push(Some(Family::SansSerif))
                }
                "monospace" | "ui-monospace" => generics.push(Some(Family::Monospace)),
                "cursive" => generics.push(Some(Family::Cursive)),
                "fantasy" => generics.push(Some(Family::Fantasy)),
                _ => {
                    names.push(raw.to_string());
                    generics.push(None);
                }
            }
        }
        if generics.is_empty() {
            generics.push(Some(Family::SansSerif));
        }

        let mut name_iter = names.iter();
        let families: Vec<Family<'_>> = generics
            .iter()
            .map(|generic| match generic {
                Some(family) => *family,
                None => Family::Name(name_iter.next().map(|s| s.as_str()).unwrap_or("sans-serif")),
            })
            .collect();

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let query = Query {
            families: &families,
            weight: Weight(weight),
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        let mut metrics = None;
        self.db.with_face_data(id, |data, index| {
            if let Ok(face) = Face::parse(data, index) {
                metrics = Some(FaceMetrics::from_face(&face));
            }
        });
        metrics
    }
}

/// Advance widths extracted once per face. ASCII gets an exact table;
/// everything else uses the face's average advance.
struct FaceMetrics {
    units_per_em: f32,
    ascii_advances: [u16; 128],
    average_advance: f32,
}

impl FaceMetrics {
    fn from_face(face: &Face<'_>) -> Self {
        let units_per_em = face.units_per_em().max(1) as f32;
        let mut ascii_advances = [0u16; 128];
        let mut sum = 0u32;
        let mut counted = 0u32;
        for byte in 0u8..=127 {
            if let Some(glyph) = face.glyph_index(byte as char) {
                let advance = face.glyph_hor_advance(glyph).unwrap_or(0);
                ascii_advances[byte as usize] = advance;
                if byte.is_ascii_graphic() && advance > 0 {
                    sum += u32::from(advance);
                    counted += 1;
                }
            }
        }
        let average_advance = if counted > 0 {
            sum as f32 / counted as f32
        } else {
            units_per_em * 0.56
        };
        Self {
            units_per_em,
            ascii_advances,
            average_advance,
        }
    }

    fn measure(&self, text: &str, font_size: f32) -> f32 {
        let scale = font_size / self.units_per_em;
        let mut width = 0.0f32;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            let advance = if (ch as u32) < 128 {
                let table = self.ascii_advances[ch as usize];
                if table > 0 {
                    f32::from(table)
                } else {
                    self.average_advance
                }
            } else {
                self.average_advance
            };
            width += advance * scale;
        }
        width.max(0.0)
    }
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_measures_zero() {
        assert_eq!(measure_text_width("", "sans-serif", 16.0, 400), Some(0.0));
    }

    #[test]
    fn zero_font_size_measures_zero() {
        assert_eq!(measure_text_width("abc", "sans-serif", 0.0, 400), Some(0.0));
    }

    #[test]
    fn face_metrics_scale_linearly() {
        let metrics = FaceMetrics {
            units_per_em: 1000.0,
            ascii_advances: [500u16; 128],
            average_advance: 500.0,
        };
        let w16 = metrics.measure("abcd", 16.0);
        let w32 = metrics.measure("abcd", 32.0);
        assert!((w32 - w16 * 2.0).abs() < 0.001);
        assert_eq!(w16, 4.0 * 500.0 / 1000.0 * 16.0);
    }

    #[test]
    fn non_ascii_uses_average_advance() {
        let mut ascii = [400u16; 128];
        ascii['i' as usize] = 200;
        let metrics = FaceMetrics {
            units_per_em: 1000.0,
            ascii_advances: ascii,
            average_advance: 600.0,
        };
        let wide = metrics.measure("\u{4e2d}", 10.0);
        assert_eq!(wide, 6.0);
        let narrow = metrics.measure("i", 10.0);
        assert_eq!(narrow, 2.0);
    }
}
