//! Mapping between on-screen element coordinates and bitmap pixels, and the
//! sizing rule that decides how big the bitmap is.

use serde::{Deserialize, Serialize};

/// A position in bitmap space. Sub-pixel precision is kept until rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// How the bitmap is currently being displayed: element size on screen versus
/// the backing bitmap dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub display_width: f32,
    pub display_height: f32,
    pub bitmap_width: u32,
    pub bitmap_height: u32,
}

impl Viewport {
    pub fn new(display_width: f32, display_height: f32, bitmap_width: u32, bitmap_height: u32) -> Self {
        Self {
            display_width,
            display_height,
            bitmap_width,
            bitmap_height,
        }
    }

    /// Viewport where the element is shown at exactly the bitmap's size.
    pub fn unscaled(bitmap_width: u32, bitmap_height: u32) -> Self {
        Self::new(
            bitmap_width as f32,
            bitmap_height as f32,
            bitmap_width,
            bitmap_height,
        )
    }

    /// Per-axis `bitmap / displayed` factors. A collapsed element maps 1:1.
    pub fn scale(&self) -> (f32, f32) {
        let axis = |bitmap: u32, displayed: f32| {
            if displayed > 0.0 && displayed.is_finite() {
                bitmap as f32 / displayed
            } else {
                1.0
            }
        };
        (
            axis(self.bitmap_width, self.display_width),
            axis(self.bitmap_height, self.display_height),
        )
    }

    /// Convert a position relative to the element's top-left corner into bitmap space.
    pub fn to_bitmap(&self, element_x: f32, element_y: f32) -> Point {
        let (sx, sy) = self.scale();
        Point::new(element_x * sx, element_y * sy)
    }
}

/// Measurements of the host layout that determine the bitmap size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    pub container_width: f32,
    pub viewport_height: f32,
    pub toolbar_height: f32,
    pub action_bar_height: f32,
}

/// Bitmap size for a layout: width fills the container minus padding, height
/// takes what the toolbars leave but never drops below `min_height`.
pub fn canvas_size_for(metrics: &LayoutMetrics, padding: u32, min_height: u32) -> (u32, u32) {
    let padding = padding as f32;
    let width = (metrics.container_width - padding).max(1.0).floor() as u32;
    let free = metrics.viewport_height - metrics.toolbar_height - metrics.action_bar_height - padding;
    let height = (free.max(0.0).floor() as u32).max(min_height);
    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_of_scaled_element_maps_to_bitmap_center() {
        // Bitmap is 400x300 but the element is shown at twice that size.
        let vp = Viewport::new(800.0, 600.0, 400, 300);
        assert_eq!(vp.to_bitmap(400.0, 300.0), Point::new(200.0, 150.0));
    }

    #[test]
    fn axes_scale_independently() {
        let vp = Viewport::new(200.0, 50.0, 100, 100);
        assert_eq!(vp.scale(), (0.5, 2.0));
        assert_eq!(vp.to_bitmap(100.0, 25.0), Point::new(50.0, 50.0));
    }

    #[test]
    fn unscaled_is_identity() {
        let vp = Viewport::unscaled(320, 240);
        assert_eq!(vp.to_bitmap(17.5, 3.0), Point::new(17.5, 3.0));
    }

    #[test]
    fn zero_sized_element_does_not_divide_by_zero() {
        let vp = Viewport::new(0.0, 0.0, 100, 100);
        assert_eq!(vp.scale(), (1.0, 1.0));
    }

    #[test]
    fn canvas_height_has_a_floor() {
        let metrics = LayoutMetrics {
            container_width: 840.0,
            viewport_height: 400.0,
            toolbar_height: 120.0,
            action_bar_height: 60.0,
        };
        assert_eq!(canvas_size_for(&metrics, 40, 300), (800, 300));

        let tall = LayoutMetrics {
            viewport_height: 1000.0,
            ..metrics
        };
        assert_eq!(canvas_size_for(&tall, 40, 300), (800, 780));
    }
}
