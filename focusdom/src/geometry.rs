/// Box of a node relative to its offset parent, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn from_size(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Position of a node inside some ancestor area.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub left: f64,
    pub top: f64,
}

/// Scroll state of a scrollable node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollBox {
    pub top: f64,
    pub left: f64,
    /// Size of the scrolled content.
    pub content_width: f64,
    pub content_height: f64,
    /// Size of the visible viewport.
    pub client_width: f64,
    pub client_height: f64,
}

impl ScrollBox {
    pub fn max_top(&self) -> f64 {
        (self.content_height - self.client_height).max(0.0)
    }

    pub fn max_left(&self) -> f64 {
        (self.content_width - self.client_width).max(0.0)
    }

    /// Whether the viewport shows the end of the content.
    pub fn at_bottom(&self) -> bool {
        self.top >= self.max_top()
    }
}
