//! Pairwise kerning from measured run widths.

use bitfont_core::alloc::{HashMap, HashSet};
use bitfont_core::profiling::profile_function;

use crate::glyph::GlyphRecord;
use crate::metrics::GlyphMetricsProvider;
use crate::style::FontStyle;

/// Deltas smaller than this are rounding noise from summing run advances in
/// f32, not kerning. Real pair adjustments are at least a hundredth of a pixel.
const KERNING_EPSILON: f32 = 1e-3;

/// Computes kerning as `width(ab) - width(a) - width(b)`.
///
/// Single-character widths are memoized for the lifetime of the font; pair
/// widths are measured on demand.
#[derive(Debug, Default, Clone)]
pub struct KerningCalculator {
    widths: HashMap<char, f32>,
}

impl KerningCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a width already measured elsewhere.
    pub fn seed(&mut self, ch: char, width: f32) {
        self.widths.entry(ch).or_insert(width);
    }

    pub fn char_width(
        &mut self,
        ch: char,
        metrics: &dyn GlyphMetricsProvider,
        style: &FontStyle,
    ) -> f32 {
        *self.widths.entry(ch).or_insert_with(|| {
            let mut buf = [0u8; 4];
            metrics.measure_advance_width(ch.encode_utf8(&mut buf), style)
        })
    }

    /// Adjustment applied to `first` when it is followed by `second`.
    pub fn pair_kerning(
        &mut self,
        first: char,
        second: char,
        metrics: &dyn GlyphMetricsProvider,
        style: &FontStyle,
    ) -> f32 {
        let pair: String = [first, second].iter().collect();
        let combined = metrics.measure_advance_width(&pair, style);
        combined - self.char_width(first, metrics, style) - self.char_width(second, metrics, style)
    }

    /// Compute kerning between every new character and every known character,
    /// in both orders, and store the non-zero results in `records`.
    ///
    /// `known` is expected to contain the new characters as well.
    pub fn compute(
        &mut self,
        new_chars: &[char],
        known: &[char],
        records: &mut HashMap<char, GlyphRecord>,
        metrics: &dyn GlyphMetricsProvider,
        style: &FontStyle,
    ) {
        profile_function!();

        let mut done: HashSet<char> = HashSet::default();
        let mut stored = 0usize;
        for &a in new_chars {
            for &b in known {
                if done.contains(&b) {
                    continue;
                }

                let ab = self.pair_kerning(a, b, metrics, style);
                stored += store(records, a, b, ab);

                if a != b {
                    let ba = self.pair_kerning(b, a, metrics, style);
                    stored += store(records, b, a, ba);
                }
            }
            done.insert(a);
        }

        tracing::trace!(
            "Kerning: {} new x {} known characters, {} non-zero pairs",
            new_chars.len(),
            known.len(),
            stored
        );
    }
}

fn store(records: &mut HashMap<char, GlyphRecord>, first: char, second: char, delta: f32) -> usize {
    if delta.abs() < KERNING_EPSILON {
        return 0;
    }
    match records.get_mut(&first) {
        Some(record) => {
            record.kerning.insert(second, delta);
            1
        }
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::metrics::{FontProperties, GlyphMetrics};

    /// Every glyph is 10 wide; "AV" tightens by 2, "VA" by 3.
    #[derive(Default)]
    struct Fixed {
        calls: AtomicUsize,
    }

    impl GlyphMetricsProvider for Fixed {
        fn measure_advance_width(&self, text: &str, _style: &FontStyle) -> f32 {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let base = text.chars().count() as f32 * 10.0;
            match text {
                "AV" => base - 2.0,
                "VA" => base - 3.0,
                _ => base,
            }
        }

        fn measure_glyph(&self, ch: char, _style: &FontStyle) -> GlyphMetrics {
            GlyphMetrics {
                text: ch,
                width: 10.0,
                height: 10.0,
                line_height: 10.0,
                font_properties: FontProperties::new(8.0, 2.0),
            }
        }

        fn measure_font(&self, _style: &FontStyle) -> FontProperties {
            FontProperties::new(8.0, 2.0)
        }
    }

    /// Fractional advances with shaper rounding noise on every run; "AV"
    /// tightens by a hundredth of a pixel.
    struct Noisy;

    impl GlyphMetricsProvider for Noisy {
        fn measure_advance_width(&self, text: &str, _style: &FontStyle) -> f32 {
            let count = text.chars().count();
            let base = count as f32 * 10.3;
            match text {
                "AV" => base - 0.01,
                _ if count > 1 => base + 2e-5,
                _ => base,
            }
        }

        fn measure_glyph(&self, ch: char, style: &FontStyle) -> GlyphMetrics {
            Fixed::default().measure_glyph(ch, style)
        }

        fn measure_font(&self, _style: &FontStyle) -> FontProperties {
            FontProperties::new(8.0, 2.0)
        }
    }

    fn records(chars: &[char]) -> HashMap<char, GlyphRecord> {
        chars
            .iter()
            .map(|&c| (c, GlyphRecord::new(c, 4.0, 10.0)))
            .collect()
    }

    #[test]
    fn test_direction_correct_kerning() {
        let metrics = Fixed::default();
        let style = FontStyle::default();
        let mut kerning = KerningCalculator::new();
        let mut chars = records(&['A', 'V', 'o']);

        kerning.compute(&['A', 'V', 'o'], &['A', 'V', 'o'], &mut chars, &metrics, &style);

        assert_eq!(chars[&'A'].kerning_with('V'), -2.0);
        assert_eq!(chars[&'V'].kerning_with('A'), -3.0);
        assert!(chars[&'A'].kerning.get(&'o').is_none());
        assert!(chars[&'o'].kerning.is_empty());
    }

    #[test]
    fn test_rounding_noise_is_not_stored() {
        let style = FontStyle::default();
        let mut kerning = KerningCalculator::new();
        let mut chars = records(&['A', 'V', 'o']);

        kerning.compute(&['A', 'V', 'o'], &['A', 'V', 'o'], &mut chars, &Noisy, &style);

        assert!((chars[&'A'].kerning_with('V') + 0.01).abs() < 1e-4);
        assert_eq!(chars[&'A'].kerning.len(), 1);
        assert!(chars[&'V'].kerning.is_empty());
        assert!(chars[&'o'].kerning.is_empty());
    }

    #[test]
    fn test_single_widths_memoized() {
        let metrics = Fixed::default();
        let style = FontStyle::default();
        let mut kerning = KerningCalculator::new();
        kerning.seed('A', 10.0);

        assert_eq!(kerning.char_width('A', &metrics, &style), 10.0);
        assert_eq!(metrics.calls.load(Ordering::SeqCst), 0);

        kerning.char_width('V', &metrics, &style);
        kerning.char_width('V', &metrics, &style);
        assert_eq!(metrics.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_recompute_is_deterministic() {
        let metrics = Fixed::default();
        let style = FontStyle::default();
        let mut kerning = KerningCalculator::new();
        let mut chars = records(&['A', 'V']);

        kerning.compute(&['A'], &['A'], &mut chars, &metrics, &style);
        kerning.compute(&['V'], &['A', 'V'], &mut chars, &metrics, &style);
        let first = chars.clone();
        kerning.compute(&['V'], &['A', 'V'], &mut chars, &metrics, &style);

        assert_eq!(chars, first);
        assert_eq!(chars[&'A'].kerning_with('V'), -2.0);
    }
}
