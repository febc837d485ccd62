//! Mock glyph metrics provider.

use bitfont::{FontProperties, FontStyle, GlyphMetrics, GlyphMetricsProvider};
use bitfont_core::alloc::HashMap;
use parking_lot::Mutex;

/// Size the configured metrics are expressed at.
const REFERENCE_SIZE: f32 = 100.0;

/// Records a metrics query.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricsCall {
    AdvanceWidth { text: String, font_size: f32 },
    Glyph { ch: char, font_size: f32 },
    Font { font_size: f32 },
}

/// Table-driven metrics provider.
///
/// Advances, ink heights and pair adjustments are given at font size 100 and
/// scale linearly with the requested size. Like a canvas text measurer,
/// widths and heights include the style's stroke width and drop-shadow
/// distance once per measured run.
pub struct MockMetrics {
    default_advance: f32,
    default_height: f32,
    advances: HashMap<char, f32>,
    heights: HashMap<char, f32>,
    pairs: HashMap<(char, char), f32>,
    ascent: f32,
    descent: f32,
    calls: Mutex<Vec<MetricsCall>>,
}

impl MockMetrics {
    /// Every glyph advances `advance` and has `height` of ink.
    pub fn new(advance: f32, height: f32) -> Self {
        Self {
            default_advance: advance,
            default_height: height,
            advances: HashMap::default(),
            heights: HashMap::default(),
            pairs: HashMap::default(),
            ascent: height * 0.8,
            descent: height * 0.2,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_advance(mut self, ch: char, advance: f32) -> Self {
        self.advances.insert(ch, advance);
        self
    }

    pub fn with_height(mut self, ch: char, height: f32) -> Self {
        self.heights.insert(ch, height);
        self
    }

    /// Adjust the width of any run where `first` is directly followed by `second`.
    pub fn with_pair(mut self, first: char, second: char, delta: f32) -> Self {
        self.pairs.insert((first, second), delta);
        self
    }

    pub fn with_font(mut self, ascent: f32, descent: f32) -> Self {
        self.ascent = ascent;
        self.descent = descent;
        self
    }

    fn scale(style: &FontStyle) -> f32 {
        style.font_size / REFERENCE_SIZE
    }

    fn decoration(style: &FontStyle) -> f32 {
        style.stroke_width() + style.drop_shadow_distance()
    }

    pub fn calls(&self) -> Vec<MetricsCall> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn count_glyph_measurements(&self, ch: char) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, MetricsCall::Glyph { ch: c, .. } if *c == ch))
            .count()
    }

    pub fn count_advance_measurements(&self, text: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, MetricsCall::AdvanceWidth { text: t, .. } if t == text))
            .count()
    }

    /// Every font size measurements were requested at.
    pub fn measured_sizes(&self) -> Vec<f32> {
        self.calls
            .lock()
            .iter()
            .map(|call| match call {
                MetricsCall::AdvanceWidth { font_size, .. }
                | MetricsCall::Glyph { font_size, .. }
                | MetricsCall::Font { font_size } => *font_size,
            })
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl GlyphMetricsProvider for MockMetrics {
    fn measure_advance_width(&self, text: &str, style: &FontStyle) -> f32 {
        self.calls.lock().push(MetricsCall::AdvanceWidth {
            text: text.to_string(),
            font_size: style.font_size,
        });

        let chars: Vec<char> = text.chars().collect();
        let mut width: f32 = chars
            .iter()
            .map(|ch| self.advances.get(ch).copied().unwrap_or(self.default_advance))
            .sum();
        for pair in chars.windows(2) {
            width += self.pairs.get(&(pair[0], pair[1])).copied().unwrap_or(0.0);
        }
        width * Self::scale(style) + Self::decoration(style)
    }

    fn measure_glyph(&self, ch: char, style: &FontStyle) -> GlyphMetrics {
        self.calls.lock().push(MetricsCall::Glyph {
            ch,
            font_size: style.font_size,
        });

        let scale = Self::scale(style);
        let advance = self.advances.get(&ch).copied().unwrap_or(self.default_advance);
        let height = self.heights.get(&ch).copied().unwrap_or(self.default_height) * scale
            + Self::decoration(style);

        GlyphMetrics {
            text: ch,
            width: advance * scale + Self::decoration(style),
            height,
            line_height: (self.ascent + self.descent) * scale,
            font_properties: FontProperties::new(self.ascent * scale, self.descent * scale),
        }
    }

    fn measure_font(&self, style: &FontStyle) -> FontProperties {
        self.calls.lock().push(MetricsCall::Font {
            font_size: style.font_size,
        });
        let scale = Self::scale(style);
        FontProperties::new(self.ascent * scale, self.descent * scale)
    }
}
