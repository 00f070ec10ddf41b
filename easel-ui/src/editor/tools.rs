// Drawing tools for the canvas editor.
//
// Brush and eraser stamp round dots and draw round-capped segments, so a run
// of short segments reads as one smooth stroke. Fill covers the whole canvas.

use crate::Canvas;
use easel_core::Point;
use egui::Color32;
use tracing::{debug, trace};

pub trait Tool {
    /// Single dot centred on `at`.
    fn dab(&self, canvas: &mut Canvas, at: Point);

    /// Segment from `from` to `to` with round caps.
    fn segment(&self, canvas: &mut Canvas, from: Point, to: Point);
}

#[derive(Debug, Clone)]
pub struct Brush {
    pub size: u32,
    pub color: Color32,
}

impl Brush {
    pub fn new(size: u32, color: Color32) -> Self {
        Self { size, color }
    }
}

impl Tool for Brush {
    fn dab(&self, canvas: &mut Canvas, at: Point) {
        trace!(x = at.x, y = at.y, size = self.size, "brush dab");
        let painted = stroke_capsule(canvas, at, at, self.size, self.color);
        debug!(painted, "brush dab applied");
    }

    fn segment(&self, canvas: &mut Canvas, from: Point, to: Point) {
        trace!(from_x = from.x, from_y = from.y, to_x = to.x, to_y = to.y, "brush segment");
        stroke_capsule(canvas, from, to, self.size, self.color);
    }
}

/// Paints the background back instead of compositing transparency.
#[derive(Debug, Clone)]
pub struct Eraser {
    pub size: u32,
    pub erase_color: Color32,
}

impl Eraser {
    pub fn new(size: u32, background: Color32) -> Self {
        Self {
            size,
            erase_color: background,
        }
    }
}

impl Tool for Eraser {
    fn dab(&self, canvas: &mut Canvas, at: Point) {
        trace!(x = at.x, y = at.y, size = self.size, "eraser dab");
        stroke_capsule(canvas, at, at, self.size, self.erase_color);
    }

    fn segment(&self, canvas: &mut Canvas, from: Point, to: Point) {
        trace!(from_x = from.x, from_y = from.y, to_x = to.x, to_y = to.y, "eraser segment");
        stroke_capsule(canvas, from, to, self.size, self.erase_color);
    }
}

#[derive(Debug, Clone)]
pub struct Fill {
    pub color: Color32,
}

impl Fill {
    pub fn new(color: Color32) -> Self {
        Self { color }
    }

    pub fn apply(&self, canvas: &mut Canvas) {
        trace!(color = ?self.color, "fill whole canvas");
        canvas.fill(self.color);
    }
}

/// Set every pixel whose centre lies within `diameter / 2` of the segment
/// `a`-`b`. The pixels under both end points are always set, so even a
/// one-pixel brush leaves a mark. Returns how many pixels were written.
fn stroke_capsule(canvas: &mut Canvas, a: Point, b: Point, diameter: u32, color: Color32) -> usize {
    let radius = diameter.max(1) as f32 / 2.0;
    let r2 = radius * radius;

    let min_x = (a.x.min(b.x) - radius).floor().max(0.0);
    let min_y = (a.y.min(b.y) - radius).floor().max(0.0);
    let max_x = (a.x.max(b.x) + radius).ceil().min(canvas.width as f32 - 1.0);
    let max_y = (a.y.max(b.y) + radius).ceil().min(canvas.height as f32 - 1.0);

    let mut painted = 0;
    if min_x <= max_x && min_y <= max_y {
        for py in min_y as u32..=max_y as u32 {
            for px in min_x as u32..=max_x as u32 {
                let centre = Point::new(px as f32 + 0.5, py as f32 + 0.5);
                if distance_sq_to_segment(centre, a, b) <= r2 && canvas.set_pixel(px, py, color) {
                    painted += 1;
                }
            }
        }
    }

    for end in [a, b] {
        if end.x >= 0.0 && end.y >= 0.0 && canvas.set_pixel(end.x as u32, end.y as u32, color) {
            painted += 1;
        }
    }

    painted
}

fn distance_sq_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    (p.x - cx) * (p.x - cx) + (p.y - cy) * (p.y - cy)
}
