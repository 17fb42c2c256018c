#![forbid(unsafe_code)]

//! Percentage geometry for boxes laid over an image.
//!
//! All coordinates are percentages of the image's displayed size, so a box
//! keeps its place when the image is scaled. The canvas spans `0..=100` on
//! both axes.

/// Extent of the canvas on each axis, in percent.
pub const CANVAS_EXTENT: f64 = 100.0;

/// A point on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Position and size of a box.
///
/// Invariant (maintained by the editor, not enforced here):
/// `x + width <= 100` and `y + height <= 100`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoxRect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub const fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Rect of `size` centred on `center`, shifted to stay on the canvas.
    ///
    /// ```
    /// # use flashcard_core::geometry::{BoxRect, Point, Size};
    /// let rect = BoxRect::centered_at(Point::new(99.0, 1.0), Size::new(12.0, 8.0));
    /// assert_eq!(rect, BoxRect::new(88.0, 0.0, 12.0, 8.0));
    /// ```
    #[must_use]
    pub fn centered_at(center: Point, size: Size) -> Self {
        let x = clamp_origin(center.x - size.width / 2.0, size.width);
        let y = clamp_origin(center.y - size.height / 2.0, size.height);
        Self::new(x, y, size.width, size.height)
    }

    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True when the rect lies entirely on the canvas.
    #[must_use]
    pub fn fits_canvas(&self) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.width >= 0.0
            && self.height >= 0.0
            && self.right() <= CANVAS_EXTENT
            && self.bottom() <= CANVAS_EXTENT
    }

    /// Half-open containment: the left/top edges are inside, right/bottom are not.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

fn clamp_origin(origin: f64, extent: f64) -> f64 {
    origin.min(CANVAS_EXTENT - extent).max(0.0)
}
