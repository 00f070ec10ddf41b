//! easel-ui: the raster drawing widget.
//!
//! The [`editor`] module is the core: live bitmap, tools, undo/redo history,
//! asynchronous repaint and the drawing surface tying them to persistence.
//! [`app`] is a thin egui front end over it.

pub mod app;
pub mod editor;
pub mod logging;

pub use app::EaselApp;
pub use editor::{
    Canvas, Controls, DrawingSurface, History, PickerSurface, RepaintReason, SurfaceEvent,
};
