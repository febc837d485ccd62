//! Text style of a dynamic font.

use crate::paint::{Color, DropShadow, PaintConfig, ShadowPaint, StrokeStyle};

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontWeight {
    Thin,
    ExtraLight,
    Light,
    #[default]
    Normal,
    Medium,
    SemiBold,
    Bold,
    ExtraBold,
    Black,
}

impl FontWeight {
    /// Numeric CSS weight (100-900).
    pub fn to_numeric(self) -> u16 {
        match self {
            FontWeight::Thin => 100,
            FontWeight::ExtraLight => 200,
            FontWeight::Light => 300,
            FontWeight::Normal => 400,
            FontWeight::Medium => 500,
            FontWeight::SemiBold => 600,
            FontWeight::Bold => 700,
            FontWeight::ExtraBold => 800,
            FontWeight::Black => 900,
        }
    }

    #[cfg(feature = "cosmic")]
    pub(crate) fn to_cosmic(self) -> cosmic_text::Weight {
        cosmic_text::Weight(self.to_numeric())
    }
}

/// Font slant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontSlant {
    #[default]
    Normal,
    Italic,
    Oblique,
}

impl FontSlant {
    #[cfg(feature = "cosmic")]
    pub(crate) fn to_cosmic(self) -> cosmic_text::Style {
        match self {
            FontSlant::Normal => cosmic_text::Style::Normal,
            FontSlant::Italic => cosmic_text::Style::Italic,
            FontSlant::Oblique => cosmic_text::Style::Oblique,
        }
    }
}

pub(crate) fn font_string(family: &str, weight: FontWeight, slant: FontSlant, size: f32) -> String {
    let slant = match slant {
        FontSlant::Normal => "",
        FontSlant::Italic => "italic ",
        FontSlant::Oblique => "oblique ",
    };
    let weight = match weight {
        FontWeight::Normal => String::new(),
        FontWeight::Bold => "bold ".to_string(),
        other => format!("{} ", other.to_numeric()),
    };
    format!("{slant}{weight}{size}px \"{family}\"")
}

/// Style a dynamic font rasterizes its glyphs with.
///
/// `font_size` is the rendered size. Stroke width and drop-shadow distance are
/// measurement-space lengths: they are subtracted from measured advances and
/// scaled by the font scale when painted.
///
/// # Example
///
/// ```
/// use bitfont::{Color, FontStyle, FontWeight, StrokeStyle};
///
/// let style = FontStyle::new("Inter")
///     .size(32.0)
///     .weight(FontWeight::Bold)
///     .stroke(StrokeStyle::new(Color::BLACK, 2.0));
/// assert_eq!(style.font_string(), "bold 32px \"Inter\"");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FontStyle {
    pub family: String,
    pub font_size: f32,
    pub weight: FontWeight,
    pub slant: FontSlant,
    pub fill: Option<Color>,
    pub stroke: Option<StrokeStyle>,
    pub drop_shadow: Option<DropShadow>,
    /// Explicit line height; otherwise derived from font metrics.
    pub line_height: Option<f32>,
}

impl FontStyle {
    /// Create a style for a font family with a black fill at 26px.
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            ..Default::default()
        }
    }

    pub fn sans_serif() -> Self {
        Self::new("sans-serif")
    }

    pub fn serif() -> Self {
        Self::new("serif")
    }

    pub fn monospace() -> Self {
        Self::new("monospace")
    }

    pub fn size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn slant(mut self, slant: FontSlant) -> Self {
        self.slant = slant;
        self
    }

    pub fn italic(self) -> Self {
        self.slant(FontSlant::Italic)
    }

    pub fn bold(self) -> Self {
        self.weight(FontWeight::Bold)
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn no_fill(mut self) -> Self {
        self.fill = None;
        self
    }

    pub fn stroke(mut self, stroke: StrokeStyle) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn drop_shadow(mut self, shadow: DropShadow) -> Self {
        self.drop_shadow = Some(shadow);
        self
    }

    pub fn line_height(mut self, line_height: f32) -> Self {
        self.line_height = Some(line_height);
        self
    }

    /// Italic and oblique both reserve extra horizontal room when packed.
    pub fn is_italic(&self) -> bool {
        self.slant != FontSlant::Normal
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke.map(|s| s.width).unwrap_or(0.0)
    }

    pub fn drop_shadow_distance(&self) -> f32 {
        self.drop_shadow.map(|s| s.distance).unwrap_or(0.0)
    }

    /// Copy of this style at another font size.
    pub fn with_font_size(&self, size: f32) -> Self {
        Self {
            font_size: size,
            ..self.clone()
        }
    }

    /// Copy of this style without stroke and drop shadow.
    pub fn undecorated(&self) -> Self {
        Self {
            stroke: None,
            drop_shadow: None,
            ..self.clone()
        }
    }

    pub fn font_string(&self) -> String {
        font_string(&self.family, self.weight, self.slant, self.font_size)
    }

    /// Resolve the paint configuration a page draws with.
    ///
    /// `font_scale` converts measurement-space stroke and shadow lengths into
    /// rendered pixels. With `fill_as_tint` the fill becomes white so glyphs
    /// can be tinted by the consumer.
    pub fn paint_config(&self, resolution: f32, font_scale: f32, fill_as_tint: bool) -> PaintConfig {
        let fill = if fill_as_tint {
            Some(Color::WHITE)
        } else {
            self.fill
        };

        let stroke = self.stroke.map(|s| {
            let mut s = s;
            s.width *= font_scale;
            if fill_as_tint {
                s.color = Color::WHITE.with_alpha(s.color.a);
            }
            s
        });

        let shadow = self.drop_shadow.map(|s| ShadowPaint {
            color: s.color,
            offset: s.offset() * font_scale,
        });

        PaintConfig {
            family: self.family.clone(),
            weight: self.weight,
            slant: self.slant,
            font_size: self.font_size,
            resolution,
            fill,
            stroke,
            shadow,
        }
    }
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            family: String::from("sans-serif"),
            font_size: 26.0,
            weight: FontWeight::Normal,
            slant: FontSlant::Normal,
            fill: Some(Color::BLACK),
            stroke: None,
            drop_shadow: None,
            line_height: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_string() {
        let style = FontStyle::new("Inter").size(40.0).italic().bold();
        assert_eq!(style.font_string(), "italic bold 40px \"Inter\"");

        let style = FontStyle::new("Inter").size(12.0).weight(FontWeight::Light);
        assert_eq!(style.font_string(), "300 12px \"Inter\"");
    }

    #[test]
    fn test_italic_detection() {
        assert!(!FontStyle::default().is_italic());
        assert!(FontStyle::default().italic().is_italic());
        assert!(FontStyle::default().slant(FontSlant::Oblique).is_italic());
    }

    #[test]
    fn test_with_font_size_keeps_paint() {
        let style = FontStyle::new("Inter")
            .size(40.0)
            .stroke(StrokeStyle::new(Color::WHITE, 3.0));
        let measured = style.with_font_size(100.0);
        assert_eq!(measured.font_size, 100.0);
        assert_eq!(measured.stroke_width(), 3.0);
        assert_eq!(measured.family, "Inter");

        let bare = measured
            .drop_shadow(DropShadow::new(Color::BLACK, 0.0, 2.0))
            .undecorated();
        assert_eq!(bare.stroke_width(), 0.0);
        assert_eq!(bare.drop_shadow_distance(), 0.0);
        assert_eq!(bare.font_size, 100.0);
    }

    #[test]
    fn test_paint_config_scales_stroke_and_shadow() {
        let style = FontStyle::new("Inter")
            .size(40.0)
            .stroke(StrokeStyle::new(Color::BLACK, 5.0))
            .drop_shadow(DropShadow::new(Color::BLACK, 0.0, 10.0));
        let paint = style.paint_config(2.0, 0.4, false);

        assert_eq!(paint.resolution, 2.0);
        assert!((paint.stroke_width() - 2.0).abs() < 1e-5);
        let shadow = paint.shadow.unwrap();
        assert!((shadow.offset.x - 4.0).abs() < 1e-5);
        assert_eq!(paint.fill, Some(Color::BLACK));
    }

    #[test]
    fn test_paint_config_fill_as_tint() {
        let style = FontStyle::new("Inter").fill(Color::from_hex(0xFF0000));
        let paint = style.paint_config(1.0, 1.0, true);
        assert_eq!(paint.fill, Some(Color::WHITE));
    }
}
