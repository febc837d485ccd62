//! Mock outline source and raster observer.

use bitfont::{
    FontError, FontResult, OutlineFont, PathCommand, PathOptions, RasterObserver, RasterOutcome,
};
use bitfont_core::alloc::HashSet;
use parking_lot::Mutex;

/// Outline font producing a square per glyph.
///
/// Characters marked as failing return [`FontError::PathGeneration`];
/// characters marked as empty return no commands.
pub struct MockOutlineFont {
    family: String,
    failing: HashSet<char>,
    empty: HashSet<char>,
    requests: Mutex<Vec<(char, f32, f32, f32)>>,
}

impl MockOutlineFont {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            failing: HashSet::default(),
            empty: HashSet::default(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_for(mut self, chars: &str) -> Self {
        self.failing.extend(chars.chars());
        self
    }

    pub fn empty_for(mut self, chars: &str) -> Self {
        self.empty.extend(chars.chars());
        self
    }

    /// `(ch, x, y, size)` of every path request.
    pub fn requests(&self) -> Vec<(char, f32, f32, f32)> {
        self.requests.lock().clone()
    }
}

impl OutlineFont for MockOutlineFont {
    fn family(&self) -> &str {
        &self.family
    }

    fn get_path(
        &self,
        ch: char,
        x: f32,
        y: f32,
        size: f32,
        _options: PathOptions,
    ) -> FontResult<Vec<PathCommand>> {
        self.requests.lock().push((ch, x, y, size));

        if self.failing.contains(&ch) {
            return Err(FontError::PathGeneration(format!("no outline for {ch:?}")));
        }
        if self.empty.contains(&ch) {
            return Ok(Vec::new());
        }

        let side = size * 0.5;
        Ok(vec![
            PathCommand::MoveTo { x, y },
            PathCommand::LineTo { x: x + side, y },
            PathCommand::LineTo {
                x: x + side,
                y: y - side,
            },
            PathCommand::LineTo { x, y: y - side },
            PathCommand::Close,
        ])
    }
}

/// Observer collecting every raster outcome.
#[derive(Default)]
pub struct RecordingObserver {
    outcomes: Mutex<Vec<(char, RasterOutcome)>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcomes(&self) -> Vec<(char, RasterOutcome)> {
        self.outcomes.lock().clone()
    }

    pub fn outcome_for(&self, ch: char) -> Option<RasterOutcome> {
        self.outcomes
            .lock()
            .iter()
            .find(|(c, _)| *c == ch)
            .map(|(_, outcome)| outcome.clone())
    }

    pub fn count_fallbacks(&self) -> usize {
        self.outcomes
            .lock()
            .iter()
            .filter(|(_, outcome)| outcome.is_fallback())
            .count()
    }
}

impl RasterObserver for RecordingObserver {
    fn on_glyph(&self, ch: char, outcome: &RasterOutcome) {
        self.outcomes.lock().push((ch, outcome.clone()));
    }
}
