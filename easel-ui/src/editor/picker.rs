// Color picker surface: a hue sweep over a brightness sweep, sampled on click.

use crate::editor::canvas::{color32, rgb_of};
use crate::Canvas;
use easel_core::{Hsl, Rgb, Viewport};
use egui::Color32;
use tracing::{debug, trace};

/// Hue stops across the top band, evenly spaced from 0 to 360 degrees.
const HUE_STEPS: u32 = 12;

#[derive(Debug, Clone)]
pub struct PickerSurface {
    canvas: Canvas,
}

impl PickerSurface {
    pub fn new(width: u32, height: u32) -> Self {
        let mut canvas = Canvas::new(width, height, Color32::TRANSPARENT);
        render_hue_band(&mut canvas);
        render_brightness_band(&mut canvas);
        debug!(width = canvas.width, height = canvas.height, "picker rendered");
        Self { canvas }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Color of the pixel under a bitmap-space position.
    pub fn sample(&self, x: f32, y: f32) -> Option<Rgb> {
        if !(x >= 0.0 && y >= 0.0) {
            return None;
        }
        let color = self.canvas.get_pixel(x as u32, y as u32).map(rgb_of);
        trace!(x, y, color = ?color, "picker sample");
        color
    }

    /// Color under a click given in element coordinates.
    pub fn sample_element(&self, viewport: &Viewport, x: f32, y: f32) -> Option<Rgb> {
        let p = viewport.to_bitmap(x, y);
        self.sample(p.x, p.y)
    }

    pub fn viewport(&self, display_width: f32, display_height: f32) -> Viewport {
        Viewport::new(display_width, display_height, self.canvas.width, self.canvas.height)
    }
}

fn hue_stop(i: u32) -> Rgb {
    Hsl::new(i as f32 / HUE_STEPS as f32 * 360.0, 1.0, 0.5).to_rgb()
}

// Horizontal gradient through the hue stops, top half of the surface.
fn render_hue_band(canvas: &mut Canvas) {
    let band = canvas.height / 2;
    let width = canvas.width as f32;

    for x in 0..canvas.width {
        let t = (x as f32 + 0.5) / width * HUE_STEPS as f32;
        let stop = (t.floor() as u32).min(HUE_STEPS - 1);
        let color = color32(hue_stop(stop).lerp(hue_stop(stop + 1), t - stop as f32));
        for y in 0..band {
            canvas.set_pixel(x, y, color);
        }
    }
}

// Vertical white-to-black gradient, bottom half of the surface.
fn render_brightness_band(canvas: &mut Canvas) {
    let top = canvas.height / 2;
    let span = (canvas.height - top) as f32;

    for y in top..canvas.height {
        let t = (y - top) as f32 + 0.5;
        let color = color32(Rgb::WHITE.lerp(Rgb::BLACK, t / span));
        for x in 0..canvas.width {
            canvas.set_pixel(x, y, color);
        }
    }
}
