//! Rectangles for atlas frames and texture coordinates.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect<T> {
    pub x: T,
    pub y: T,
    pub width: T,
    pub height: T,
}

impl<T> Rect<T> {
    pub const fn new(x: T, y: T, width: T, height: T) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

impl Rect<f32> {
    /// Right edge (`x + width`).
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Map this rectangle into `0..1` space relative to a `width` x `height` area.
    pub fn normalized(&self, width: f32, height: f32) -> Rect<f32> {
        Rect {
            x: self.x / width,
            y: self.y / height,
            width: self.width / width,
            height: self.height / height,
        }
    }

    /// Whether this rectangle lies entirely within `0..width` x `0..height`.
    pub fn fits_within(&self, width: f32, height: f32) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.right() <= width && self.bottom() <= height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_normalized() {
        let rect = Rect::new(128.0, 64.0, 32.0, 16.0);
        let uv = rect.normalized(512.0, 256.0);
        assert_eq!(uv, Rect::new(0.25, 0.25, 0.0625, 0.0625));
    }

    #[test]
    fn test_rect_fits_within() {
        assert!(Rect::new(0.0, 0.0, 64.0, 64.0).fits_within(64.0, 64.0));
        assert!(!Rect::new(40.0, 0.0, 32.0, 32.0).fits_within(64.0, 64.0));
        assert!(!Rect::new(0.0, 48.0, 32.0, 32.0).fits_within(64.0, 64.0));
    }
}
