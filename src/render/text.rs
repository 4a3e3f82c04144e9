use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use fontdue::Font;
use vello::peniko::{Blob, FontData};
use vello::Glyph;

/// A font loaded twice over: fontdue for metrics, peniko for drawing.
struct LoadedFont {
    metrics: Font,
    data: FontData,
}

pub struct TextRenderer {
    fonts: HashMap<String, LoadedFont>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            fonts: HashMap::new(),
        }
    }

    pub fn has_font(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    pub fn add_font_bytes(&mut self, name: &str, bytes: Vec<u8>) -> Result<()> {
        let metrics = Font::from_bytes(bytes.as_slice(), fontdue::FontSettings::default())
            .map_err(|e| anyhow!("unparseable font: {e}"))?;
        let data = FontData::new(Blob::from(bytes), 0);
        self.fonts.insert(name.to_string(), LoadedFont { metrics, data });
        Ok(())
    }

    pub fn load_font_from_path(&mut self, name: &str, path: &Path) -> Result<()> {
        let bytes =
            std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
        self.add_font_bytes(name, bytes)?;
        tracing::info!("Loaded text font from {}", path.display());
        Ok(())
    }

    pub fn load_system_font(&mut self, name: &str) -> Result<()> {
        let mut candidates: Vec<PathBuf> = Vec::new();

        if let Ok(windir) = std::env::var("WINDIR") {
            candidates.push(PathBuf::from(format!("{windir}\\Fonts\\segoeui.ttf")));
            candidates.push(PathBuf::from(format!("{windir}\\Fonts\\arial.ttf")));
        }
        candidates.push(PathBuf::from("C:\\Windows\\Fonts\\segoeui.ttf"));
        candidates.push(PathBuf::from("C:\\Windows\\Fonts\\arial.ttf"));
        candidates.push(PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"));
        candidates.push(PathBuf::from("/usr/share/fonts/TTF/DejaVuSans.ttf"));
        candidates.push(PathBuf::from("/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf"));
        candidates.push(PathBuf::from("/System/Library/Fonts/Supplemental/Arial.ttf"));
        candidates.push(PathBuf::from("/Library/Fonts/Arial.ttf"));

        for path in candidates {
            if self.load_font_from_path(name, &path).is_ok() {
                return Ok(());
            }
        }

        Err(anyhow!("unable to load a system font from known locations"))
    }

    /// Lay `text` out on a single line. Glyph positions are relative to the
    /// top-left of the line box; `y` is the baseline.
    pub fn render_text(&self, text: &str, font_name: &str, font_size: f32) -> Option<TextRenderResult> {
        let font = self.fonts.get(font_name)?;
        let line = font.metrics.horizontal_line_metrics(font_size)?;

        let mut glyphs = Vec::with_capacity(text.len());
        let mut pen_x = 0.0f32;
        for ch in text.chars() {
            let index = font.metrics.lookup_glyph_index(ch);
            glyphs.push(Glyph {
                id: index as u32,
                x: pen_x,
                y: line.ascent,
            });
            pen_x += font.metrics.metrics_indexed(index, font_size).advance_width;
        }

        if glyphs.is_empty() {
            return None;
        }

        Some(TextRenderResult {
            font: font.data.clone(),
            font_size,
            glyphs,
            width: pen_x,
            height: line.ascent - line.descent,
        })
    }

    /// Advance width of `text`, if the font is loaded.
    pub fn measure(&self, text: &str, font_name: &str, font_size: f32) -> Option<f32> {
        self.render_text(text, font_name, font_size).map(|r| r.width)
    }
}

pub struct TextRenderResult {
    pub font: FontData,
    pub font_size: f32,
    pub glyphs: Vec<Glyph>,
    pub width: f32,
    pub height: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_font_renders_nothing() {
        let renderer = TextRenderer::new();
        assert!(!renderer.has_font("default"));
        assert!(renderer.render_text("RAVON", "default", 14.0).is_none());
        assert!(renderer.measure("RAVON", "default", 14.0).is_none());
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let mut renderer = TextRenderer::new();
        assert!(renderer.add_font_bytes("default", vec![0u8; 16]).is_err());
        assert!(renderer
            .load_font_from_path("default", Path::new("/nonexistent/font.ttf"))
            .is_err());
    }
}
