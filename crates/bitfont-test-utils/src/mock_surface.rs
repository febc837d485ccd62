//! Mock page surfaces and surface pool.

use std::sync::Arc;

use bitfont::{FontError, FontResult, PageSurface, PaintConfig, PathCommand, SurfacePool};
use parking_lot::Mutex;

/// Records a draw call on a mock surface.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear { surface: usize },
    StrokePath { surface: usize, origin: (f32, f32) },
    FillPath { surface: usize, origin: (f32, f32) },
    StrokeText { surface: usize, ch: char, x: f32, y: f32 },
    FillText { surface: usize, ch: char, x: f32, y: f32 },
}

impl DrawCall {
    pub fn surface(&self) -> usize {
        match self {
            DrawCall::Clear { surface }
            | DrawCall::StrokePath { surface, .. }
            | DrawCall::FillPath { surface, .. }
            | DrawCall::StrokeText { surface, .. }
            | DrawCall::FillText { surface, .. } => *surface,
        }
    }
}

type DrawLog = Arc<Mutex<Vec<DrawCall>>>;

/// A surface that records draw calls into its pool's shared log.
pub struct MockSurface {
    id: usize,
    pixel_width: u32,
    pixel_height: u32,
    resolution: f32,
    fail_paths: bool,
    log: DrawLog,
}

impl MockSurface {
    pub fn id(&self) -> usize {
        self.id
    }
}

fn origin(commands: &[PathCommand]) -> (f32, f32) {
    match commands.first() {
        Some(PathCommand::MoveTo { x, y }) => (*x, *y),
        _ => (f32::NAN, f32::NAN),
    }
}

impl PageSurface for MockSurface {
    fn pixel_width(&self) -> u32 {
        self.pixel_width
    }

    fn pixel_height(&self) -> u32 {
        self.pixel_height
    }

    fn resolution(&self) -> f32 {
        self.resolution
    }

    fn clear(&mut self) {
        self.log.lock().push(DrawCall::Clear { surface: self.id });
    }

    fn stroke_path(&mut self, commands: &[PathCommand], _paint: &PaintConfig) -> FontResult<()> {
        if self.fail_paths {
            return Err(FontError::InvalidPath("mock surface rejects paths".to_string()));
        }
        self.log.lock().push(DrawCall::StrokePath {
            surface: self.id,
            origin: origin(commands),
        });
        Ok(())
    }

    fn fill_path(&mut self, commands: &[PathCommand], _paint: &PaintConfig) -> FontResult<()> {
        if self.fail_paths {
            return Err(FontError::InvalidPath("mock surface rejects paths".to_string()));
        }
        self.log.lock().push(DrawCall::FillPath {
            surface: self.id,
            origin: origin(commands),
        });
        Ok(())
    }

    fn stroke_text(&mut self, ch: char, x: f32, y: f32, _paint: &PaintConfig) {
        self.log.lock().push(DrawCall::StrokeText {
            surface: self.id,
            ch,
            x,
            y,
        });
    }

    fn fill_text(&mut self, ch: char, x: f32, y: f32, _paint: &PaintConfig) {
        self.log.lock().push(DrawCall::FillText {
            surface: self.id,
            ch,
            x,
            y,
        });
    }

    fn pixels(&self) -> &[u8] {
        &[]
    }
}

#[derive(Debug, Default)]
struct PoolCounters {
    next_id: usize,
    acquired: usize,
    released: usize,
}

/// Surface pool handing out [`MockSurface`]s.
///
/// All surfaces share one draw log, so calls can be asserted in order across
/// pages.
#[derive(Default)]
pub struct MockSurfacePool {
    log: DrawLog,
    counters: Mutex<PoolCounters>,
    limit: Option<usize>,
    fail_paths: bool,
}

impl MockSurfacePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail acquisition once `limit` surfaces are live.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Make every surface reject outline paths.
    pub fn with_failing_paths(mut self) -> Self {
        self.fail_paths = true;
        self
    }

    pub fn draw_calls(&self) -> Vec<DrawCall> {
        self.log.lock().clone()
    }

    pub fn clear_draw_calls(&self) {
        self.log.lock().clear();
    }

    pub fn count_acquired(&self) -> usize {
        self.counters.lock().acquired
    }

    pub fn count_released(&self) -> usize {
        self.counters.lock().released
    }

    pub fn live_count(&self) -> usize {
        let counters = self.counters.lock();
        counters.acquired - counters.released
    }

    /// Text and path draws (clears excluded).
    pub fn count_draws(&self) -> usize {
        self.log
            .lock()
            .iter()
            .filter(|call| !matches!(call, DrawCall::Clear { .. }))
            .count()
    }

    pub fn count_text_draws(&self) -> usize {
        self.log
            .lock()
            .iter()
            .filter(|call| matches!(call, DrawCall::StrokeText { .. } | DrawCall::FillText { .. }))
            .count()
    }

    pub fn count_path_draws(&self) -> usize {
        self.log
            .lock()
            .iter()
            .filter(|call| matches!(call, DrawCall::StrokePath { .. } | DrawCall::FillPath { .. }))
            .count()
    }

    /// Characters drawn with `fill_text`, in order.
    pub fn filled_chars(&self) -> Vec<char> {
        self.log
            .lock()
            .iter()
            .filter_map(|call| match call {
                DrawCall::FillText { ch, .. } => Some(*ch),
                _ => None,
            })
            .collect()
    }
}

impl SurfacePool for MockSurfacePool {
    fn acquire(
        &self,
        width: u32,
        height: u32,
        resolution: f32,
    ) -> FontResult<Box<dyn PageSurface>> {
        let mut counters = self.counters.lock();
        let live = counters.acquired - counters.released;
        if let Some(limit) = self.limit
            && live >= limit
        {
            return Err(FontError::SurfacePoolExhausted {
                requested_width: width,
                requested_height: height,
                live_surfaces: live,
            });
        }

        let id = counters.next_id;
        counters.next_id += 1;
        counters.acquired += 1;

        Ok(Box::new(MockSurface {
            id,
            pixel_width: (width as f32 * resolution).round() as u32,
            pixel_height: (height as f32 * resolution).round() as u32,
            resolution,
            fail_paths: self.fail_paths,
            log: self.log.clone(),
        }))
    }

    fn release(&self, _surface: Box<dyn PageSurface>) {
        self.counters.lock().released += 1;
    }
}
