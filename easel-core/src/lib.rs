//! easel-core: the rendering-free half of the Easel drawing widget.
//!
//! Design rules:
//! - Colors are plain RGB; hex text is lowercase on the way out and case-insensitive on the way in.
//! - Numeric color entry never fails: it clamps and defaults to 0.
//! - Tool state is an explicit value owned by the drawing surface, never ambient.
//! - Everything here is serializable so hosts can snapshot UI state if they want.

pub mod color;
pub mod config;
pub mod geometry;
pub mod input;
pub mod panel;
pub mod recent;
pub mod tool;

pub use color::{hex_eq, parse_channel, ColorError, Hsl, Rgb};
pub use config::{load_config, save_config, ConfigError, EaselConfig};
pub use geometry::{canvas_size_for, LayoutMetrics, Point, Viewport};
pub use input::{InputEvent, Shortcut};
pub use panel::{ColorPanel, PickerPopups};
pub use recent::{ColorRole, RecentColors, RecentSwatch, DEFAULT_RECENT_CAPACITY};
pub use tool::{ToolKind, ToolState};
