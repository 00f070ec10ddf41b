// The toolbar's behaviour without the toolbar: color panels, pickers and the
// buttons that feed them into the drawing surface.

use easel_core::{ColorPanel, ColorRole, EaselConfig, PickerPopups, Rgb, ToolKind, Viewport};
use tracing::{debug, warn};

use crate::editor::picker::PickerSurface;
use crate::editor::surface::DrawingSurface;

#[derive(Debug, Clone)]
pub struct Controls {
    pub fill: ColorPanel,
    pub stroke: ColorPanel,
    pub popups: PickerPopups,
    pub palette: Vec<Rgb>,
    /// Highlighted permanent swatch per role, by palette index.
    fill_palette_selected: Option<usize>,
    stroke_palette_selected: Option<usize>,
    fill_picker: PickerSurface,
    stroke_picker: PickerSurface,
}

impl Controls {
    pub fn new(config: &EaselConfig) -> Self {
        let palette = config
            .palette
            .iter()
            .filter_map(|hex| match Rgb::from_hex(hex) {
                Ok(c) => Some(c),
                Err(e) => {
                    warn!(error = %e, "skipping palette entry");
                    None
                }
            })
            .collect();

        Self {
            fill: ColorPanel::new(ColorRole::Fill, config.fill_color(), config.recent_colors_cap),
            stroke: ColorPanel::new(
                ColorRole::Stroke,
                config.stroke_color(),
                config.recent_colors_cap,
            ),
            popups: PickerPopups::default(),
            palette,
            fill_palette_selected: None,
            stroke_palette_selected: None,
            fill_picker: PickerSurface::new(config.picker_width, config.picker_height),
            stroke_picker: PickerSurface::new(config.picker_width, config.picker_height),
        }
    }

    pub fn panel(&self, role: ColorRole) -> &ColorPanel {
        match role {
            ColorRole::Fill => &self.fill,
            ColorRole::Stroke => &self.stroke,
        }
    }

    pub fn panel_mut(&mut self, role: ColorRole) -> &mut ColorPanel {
        match role {
            ColorRole::Fill => &mut self.fill,
            ColorRole::Stroke => &mut self.stroke,
        }
    }

    pub fn palette_selected(&self, role: ColorRole) -> Option<usize> {
        match role {
            ColorRole::Fill => self.fill_palette_selected,
            ColorRole::Stroke => self.stroke_palette_selected,
        }
    }

    fn palette_selected_mut(&mut self, role: ColorRole) -> &mut Option<usize> {
        match role {
            ColorRole::Fill => &mut self.fill_palette_selected,
            ColorRole::Stroke => &mut self.stroke_palette_selected,
        }
    }

    pub fn picker(&self, role: ColorRole) -> &PickerSurface {
        match role {
            ColorRole::Fill => &self.fill_picker,
            ColorRole::Stroke => &self.stroke_picker,
        }
    }

    // Push a role's active color into the surface's tool state.
    fn sync(&self, role: ColorRole, surface: &mut DrawingSurface) {
        let color = self.panel(role).color();
        let tools = surface.tools_mut();
        match role {
            ColorRole::Fill => tools.fill_color = color,
            ColorRole::Stroke => tools.stroke_color = color,
        }
    }

    /// Click on a picker surface, in element coordinates.
    pub fn pick(
        &mut self,
        role: ColorRole,
        viewport: &Viewport,
        x: f32,
        y: f32,
        surface: &mut DrawingSurface,
    ) -> Option<Rgb> {
        let color = self.picker(role).sample_element(viewport, x, y)?;
        self.panel_mut(role).pick(color);
        self.sync(role, surface);
        Some(color)
    }

    pub fn enter_hex(&mut self, role: ColorRole, text: &str, surface: &mut DrawingSurface) -> Option<Rgb> {
        let color = self.panel_mut(role).enter_hex(text)?;
        self.sync(role, surface);
        Some(color)
    }

    pub fn enter_rgb(
        &mut self,
        role: ColorRole,
        r: &str,
        g: &str,
        b: &str,
        surface: &mut DrawingSurface,
    ) -> Rgb {
        let color = self.panel_mut(role).enter_rgb(r, g, b);
        self.sync(role, surface);
        color
    }

    /// Permanent palette swatch, by index into [`Controls::palette`]. The
    /// swatch stays highlighted; choosing a stroke color also picks the brush.
    pub fn click_palette(
        &mut self,
        role: ColorRole,
        index: usize,
        surface: &mut DrawingSurface,
    ) -> Option<Rgb> {
        let color = *self.palette.get(index)?;
        self.panel_mut(role).click_palette(color);
        *self.palette_selected_mut(role) = Some(index);
        self.sync(role, surface);
        if role == ColorRole::Stroke {
            surface.set_tool(ToolKind::Brush);
        }
        Some(color)
    }

    /// Recent-colors swatch, selected by position. A stroke color also picks
    /// the brush.
    pub fn click_recent(
        &mut self,
        role: ColorRole,
        index: usize,
        surface: &mut DrawingSurface,
    ) -> Option<Rgb> {
        let color = self.panel_mut(role).click_swatch(index)?;
        self.sync(role, surface);
        if role == ColorRole::Stroke {
            surface.set_tool(ToolKind::Brush);
        }
        Some(color)
    }

    /// Fill's Apply button: fill the canvas, then remember the color.
    pub fn apply_fill(&mut self, surface: &mut DrawingSurface) {
        self.sync(ColorRole::Fill, surface);
        surface.fill();
        self.fill.commit();
    }

    /// Stroke's Apply button: back to the brush with the chosen color.
    pub fn apply_stroke(&mut self, surface: &mut DrawingSurface) {
        self.sync(ColorRole::Stroke, surface);
        surface.set_tool(ToolKind::Brush);
        self.stroke.commit();
    }

    pub fn choose_brush(&mut self, surface: &mut DrawingSurface) {
        surface.set_tool(ToolKind::Brush);
    }

    /// Eraser button; stroke recents and every palette swatch lose their
    /// highlight.
    pub fn choose_eraser(&mut self, surface: &mut DrawingSurface) {
        surface.set_tool(ToolKind::Eraser);
        self.stroke.recents.clear_selection();
        self.fill_palette_selected = None;
        self.stroke_palette_selected = None;
        debug!("stroke selection cleared for eraser");
    }

    pub fn toggle_picker(&mut self, role: ColorRole) {
        self.popups.open(role);
    }

    pub fn click_outside_pickers(&mut self) {
        self.popups.click_outside();
    }
}
