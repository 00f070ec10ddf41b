//! Per-role color controls: hex entry, RGB entry, picker swatch and recents,
//! kept mutually consistent.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::color::{parse_channel, Rgb};
use crate::recent::{ColorRole, RecentColors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorPanel {
    pub role: ColorRole,
    color: Rgb,
    pub hex_text: String,
    pub rgb_text: [String; 3],
    /// Color shown on the picker's toggle swatch.
    pub picker_swatch: Rgb,
    pub recents: RecentColors,
}

impl ColorPanel {
    pub fn new(role: ColorRole, initial: Rgb, recent_capacity: usize) -> Self {
        let mut panel = Self {
            role,
            color: initial,
            hex_text: String::new(),
            rgb_text: Default::default(),
            picker_swatch: initial,
            recents: RecentColors::with_capacity(recent_capacity),
        };
        panel.sync_fields();
        panel
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    /// A color sampled from the picker surface.
    pub fn pick(&mut self, color: Rgb) -> Rgb {
        debug!(role = ?self.role, color = %color, "picked color");
        self.color = color;
        self.picker_swatch = color;
        self.sync_fields();
        color
    }

    /// Hex text edited directly. Unparsable text leaves the active color alone.
    pub fn enter_hex(&mut self, text: &str) -> Option<Rgb> {
        self.hex_text = text.to_string();
        let color = Rgb::from_hex(text).ok()?;
        self.color = color;
        self.picker_swatch = color;
        self.rgb_text = color.to_array().map(|c| c.to_string());
        Some(color)
    }

    /// RGB fields edited. Each channel is parsed leniently and clamped; the
    /// hex field and swatch follow.
    pub fn enter_rgb(&mut self, r: &str, g: &str, b: &str) -> Rgb {
        self.rgb_text = [r.to_string(), g.to_string(), b.to_string()];
        let color = Rgb::new(parse_channel(r), parse_channel(g), parse_channel(b));
        self.color = color;
        self.picker_swatch = color;
        self.hex_text = color.to_hex();
        color
    }

    /// Apply pressed: push the active color into the recents list.
    pub fn commit(&mut self) -> Rgb {
        let hex = self.color.to_hex();
        let added = self.recents.commit(&hex);
        info!(role = ?self.role, color = %hex, added, "committed color");
        self.color
    }

    /// A recents swatch was clicked. Selects it by position without going
    /// through `commit`.
    pub fn click_swatch(&mut self, index: usize) -> Option<Rgb> {
        let hex = self.recents.select_at(index)?.to_string();
        let color = Rgb::from_hex(&hex).ok()?;
        self.color = color;
        self.sync_fields();
        Some(color)
    }

    /// A permanent palette swatch was clicked: it becomes active and is
    /// committed to the recents list.
    pub fn click_palette(&mut self, color: Rgb) -> Rgb {
        self.color = color;
        self.sync_fields();
        self.commit()
    }

    fn sync_fields(&mut self) {
        self.hex_text = self.color.to_hex();
        self.rgb_text = self.color.to_array().map(|c| c.to_string());
    }
}

/// At most one picker popup is open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PickerPopups {
    open: Option<ColorRole>,
}

impl PickerPopups {
    /// A picker toggle was clicked: close any other popup and open this one.
    pub fn open(&mut self, role: ColorRole) {
        self.open = Some(role);
    }

    /// A click landed outside every popup and toggle.
    pub fn click_outside(&mut self) {
        self.open = None;
    }

    pub fn is_open(&self, role: ColorRole) -> bool {
        self.open == Some(role)
    }

    pub fn open_role(&self) -> Option<ColorRole> {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> ColorPanel {
        ColorPanel::new(ColorRole::Fill, Rgb::BLACK, 5)
    }

    #[test]
    fn pick_updates_every_field() {
        let mut p = panel();
        p.pick(Rgb::new(0x11, 0x22, 0x33));
        assert_eq!(p.hex_text, "#112233");
        assert_eq!(p.rgb_text, ["17", "34", "51"].map(String::from));
        assert_eq!(p.picker_swatch, Rgb::new(0x11, 0x22, 0x33));
    }

    #[test]
    fn rgb_entry_clamps_and_defaults() {
        let mut p = panel();
        let c = p.enter_rgb("300", "abc", "-4");
        assert_eq!(c, Rgb::new(255, 0, 0));
        assert_eq!(p.hex_text, "#ff0000");
        assert_eq!(p.color(), c);
    }

    #[test]
    fn bad_hex_keeps_previous_color() {
        let mut p = panel();
        p.enter_hex("#00ff00");
        assert_eq!(p.color(), Rgb::new(0, 255, 0));
        assert_eq!(p.rgb_text, ["0", "255", "0"].map(String::from));

        assert_eq!(p.enter_hex("#00ff"), None);
        assert_eq!(p.color(), Rgb::new(0, 255, 0));
        assert_eq!(p.hex_text, "#00ff");
    }

    #[test]
    fn commit_and_swatch_click_are_separate_paths() {
        let mut p = panel();
        p.pick(Rgb::new(1, 1, 1));
        p.commit();
        p.pick(Rgb::new(2, 2, 2));
        p.commit();

        assert_eq!(p.click_swatch(0), Some(Rgb::new(1, 1, 1)));
        assert!(p.recents.entries()[0].selected);
        assert!(!p.recents.entries()[1].selected);
        assert_eq!(p.recents.len(), 2);
    }

    #[test]
    fn palette_click_commits() {
        let mut p = panel();
        p.click_palette(Rgb::new(0, 0, 255));
        assert_eq!(p.recents.len(), 1);
        assert_eq!(p.recents.selected().unwrap().color, "#0000ff");
    }

    #[test]
    fn only_one_popup_open() {
        let mut popups = PickerPopups::default();
        popups.open(ColorRole::Fill);
        popups.open(ColorRole::Stroke);
        assert!(!popups.is_open(ColorRole::Fill));
        assert!(popups.is_open(ColorRole::Stroke));

        popups.click_outside();
        assert_eq!(popups.open_role(), None);
    }
}
