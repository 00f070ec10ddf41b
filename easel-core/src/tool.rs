//! Tool state read by the drawing surface on every stroke event.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Rgb;
use crate::config::EaselConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Brush,
    Eraser,
}

impl ToolKind {
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Brush => "Brush",
            ToolKind::Eraser => "Eraser",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolState {
    pub tool: ToolKind,
    brush_size: u32,
    pub fill_color: Rgb,
    pub stroke_color: Rgb,
    min_brush_size: u32,
    max_brush_size: u32,
}

impl ToolState {
    pub fn new(config: &EaselConfig) -> Self {
        let mut state = Self {
            tool: ToolKind::Brush,
            brush_size: config.default_brush_size,
            fill_color: config.fill_color(),
            stroke_color: config.stroke_color(),
            min_brush_size: config.min_brush_size,
            max_brush_size: config.max_brush_size,
        };
        state.set_brush_size(config.default_brush_size);
        state
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    /// Set the brush diameter in pixels, clamped to the configured range.
    /// Returns the value actually stored.
    pub fn set_brush_size(&mut self, size: u32) -> u32 {
        self.brush_size = size.clamp(self.min_brush_size, self.max_brush_size);
        debug!(requested = size, brush_size = self.brush_size, "brush size set");
        self.brush_size
    }

    pub fn brush_range(&self) -> (u32, u32) {
        (self.min_brush_size, self.max_brush_size)
    }

    /// Text for the live label next to the size slider.
    pub fn brush_size_label(&self) -> String {
        format!("{} px", self.brush_size)
    }

    /// Color painted by the current tool. The eraser paints the background.
    pub fn paint_color(&self, background: Rgb) -> Rgb {
        match self.tool {
            ToolKind::Brush => self.stroke_color,
            ToolKind::Eraser => background,
        }
    }
}

impl Default for ToolState {
    fn default() -> Self {
        Self::new(&EaselConfig::default())
    }
}
