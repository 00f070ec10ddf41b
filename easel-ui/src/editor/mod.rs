// Editor module for Easel UI.

pub mod canvas;
pub mod controls;
pub mod history;
pub mod picker;
pub mod repaint;
pub mod surface;
pub mod tools;

pub use canvas::Canvas;
pub use controls::Controls;
pub use history::History;
pub use picker::PickerSurface;
pub use repaint::{RepaintPipeline, RepaintReason, RepaintToken};
pub use surface::{DrawingSurface, SurfaceEvent};
pub use tools::{Brush, Eraser, Fill, Tool};
