//! egui front end: toolbar, canvas, action bar and picker popups wired to the
//! drawing surface.
//!
//! Nothing here owns drawing behaviour. Widgets translate clicks and pointer
//! movement into calls on [`Controls`] and [`DrawingSurface`], and the canvas
//! bitmap is re-uploaded as a texture whenever it changes.

use easel_core::{canvas_size_for, ColorRole, EaselConfig, InputEvent, LayoutMetrics, Rgb, Shortcut, ToolKind};
use easel_store::Storage;
use egui::{Color32, ColorImage, Key, Modifiers, Rect, Sense, TextureHandle, TextureOptions, Vec2};
use tracing::debug;

use crate::editor::canvas::color32;
use crate::editor::{Controls, DrawingSurface};

const ACTION_BAR_HEIGHT: f32 = 36.0;
const SWATCH_SIZE: f32 = 22.0;

fn full_uv() -> Rect {
    Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0))
}

pub struct EaselApp {
    config: EaselConfig,
    surface: DrawingSurface,
    controls: Controls,
    /// Uploaded canvas texture, keyed by (width, height, generation).
    canvas_texture: Option<(TextureHandle, (u32, u32, u64))>,
    fill_picker_texture: Option<TextureHandle>,
    stroke_picker_texture: Option<TextureHandle>,
    toggle_rects: Vec<Rect>,
}

impl EaselApp {
    /// `initial_size` is the bitmap size until the first frame measures the layout.
    pub fn new(config: EaselConfig, storage: Box<dyn Storage>, initial_size: (u32, u32)) -> Self {
        let surface = DrawingSurface::open(&config, storage, initial_size.0, initial_size.1);
        let controls = Controls::new(&config);
        Self {
            config,
            surface,
            controls,
            canvas_texture: None,
            fill_picker_texture: None,
            stroke_picker_texture: None,
            toggle_rects: Vec::new(),
        }
    }

    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        self.shortcuts(ui);
        self.surface.pump();

        let full = ui.max_rect();
        self.toggle_rects.clear();
        let toolbar_height = ui.vertical(|ui| self.toolbar(ui)).response.rect.height();

        self.canvas_area(ui, full, toolbar_height);
        self.action_bar(ui);

        let ctx = ui.ctx().clone();
        let mut popup_rect = None;
        for role in [ColorRole::Fill, ColorRole::Stroke] {
            if let Some(rect) = self.picker_popup(&ctx, role) {
                popup_rect = Some(rect);
            }
        }
        self.close_popups_on_outside_click(&ctx, popup_rect);

        for event in self.surface.take_events() {
            debug!(?event, "surface event");
        }
        if self.surface.repaint_pending() {
            ctx.request_repaint();
        }
    }

    // Undo/redo keys are consumed so nothing else reacts to them.
    fn shortcuts(&mut self, ui: &mut egui::Ui) {
        if ui.input_mut(|i| i.consume_key(Modifiers::CTRL, Key::Z)) {
            self.surface.handle_shortcut(Shortcut::Undo);
        }
        if ui.input_mut(|i| i.consume_key(Modifiers::CTRL, Key::Y)) {
            self.surface.handle_shortcut(Shortcut::Redo);
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let tool = self.surface.tools().tool;
            if ui.selectable_label(tool == ToolKind::Brush, "Brush").clicked() {
                self.controls.choose_brush(&mut self.surface);
            }
            if ui.selectable_label(tool == ToolKind::Eraser, "Eraser").clicked() {
                self.controls.choose_eraser(&mut self.surface);
            }

            ui.separator();
            let mut size = self.surface.tools().brush_size();
            let (min, max) = self.surface.tools().brush_range();
            if ui
                .add(egui::Slider::new(&mut size, min..=max).show_value(false))
                .changed()
            {
                self.surface.set_brush_size(size);
            }
            ui.label(self.surface.tools().brush_size_label());
        });

        self.color_section(ui, ColorRole::Fill, "Fill");
        self.color_section(ui, ColorRole::Stroke, "Stroke");
    }

    fn color_section(&mut self, ui: &mut egui::Ui, role: ColorRole, title: &str) {
        ui.horizontal(|ui| {
            ui.label(title);

            let highlighted = self.controls.palette_selected(role);
            for (index, color) in self.controls.palette.clone().into_iter().enumerate() {
                if swatch(ui, color, highlighted == Some(index)).clicked() {
                    self.controls.click_palette(role, index, &mut self.surface);
                }
            }

            ui.separator();
            let recents: Vec<(usize, Rgb, bool)> = self
                .controls
                .panel(role)
                .recents
                .entries()
                .iter()
                .enumerate()
                .filter_map(|(i, e)| Rgb::from_hex(&e.color).ok().map(|c| (i, c, e.selected)))
                .collect();
            for (index, color, selected) in recents {
                if swatch(ui, color, selected).clicked() {
                    self.controls.click_recent(role, index, &mut self.surface);
                }
            }

            ui.separator();
            let panel = self.controls.panel(role);
            let toggle = swatch(ui, panel.picker_swatch, self.controls.popups.is_open(role));
            self.toggle_rects.push(toggle.rect);
            if toggle.clicked() {
                self.controls.toggle_picker(role);
            }

            if ui.button("Apply").clicked() {
                match role {
                    ColorRole::Fill => self.controls.apply_fill(&mut self.surface),
                    ColorRole::Stroke => self.controls.apply_stroke(&mut self.surface),
                }
            }
        });
    }

    fn canvas_area(&mut self, ui: &mut egui::Ui, full: Rect, toolbar_height: f32) {
        let metrics = LayoutMetrics {
            container_width: full.width(),
            viewport_height: full.height(),
            toolbar_height,
            action_bar_height: ACTION_BAR_HEIGHT,
        };
        let (width, height) = canvas_size_for(
            &metrics,
            self.config.layout_padding,
            self.config.min_canvas_height,
        );
        let display = Vec2::new(width as f32, height as f32);

        // Bitmap in physical pixels, element in points.
        let ppp = ui.ctx().pixels_per_point();
        let bitmap_w = (display.x * ppp).round().max(1.0) as u32;
        let bitmap_h = (display.y * ppp).round().max(1.0) as u32;
        self.surface.resize(bitmap_w, bitmap_h);
        self.surface.set_display_size(display.x, display.y);

        let (rect, response) = ui.allocate_exact_size(display, Sense::click_and_drag());
        self.route_pointer(ui, rect, &response);

        self.upload_canvas(ui.ctx());
        if let Some((texture, _)) = &self.canvas_texture {
            ui.painter()
                .image(texture.id(), rect, full_uv(), Color32::WHITE);
        }
    }

    fn route_pointer(&mut self, ui: &egui::Ui, rect: Rect, response: &egui::Response) {
        let pressed = ui.input(|i| i.pointer.primary_pressed());
        let down = response.is_pointer_button_down_on();
        let drawing = self.surface.is_drawing();

        let event = match response.interact_pointer_pos() {
            Some(pos) if down && pressed && !drawing => {
                let local = pos - rect.min;
                Some(InputEvent::PointerDown {
                    x: local.x,
                    y: local.y,
                })
            }
            Some(pos) if down && drawing => {
                if rect.contains(pos) {
                    let local = pos - rect.min;
                    Some(InputEvent::PointerMove {
                        x: local.x,
                        y: local.y,
                    })
                } else {
                    Some(InputEvent::PointerLeave)
                }
            }
            _ if drawing && !down => Some(InputEvent::PointerUp),
            _ => None,
        };

        if let Some(event) = event {
            self.surface.handle_input(&event);
        }
    }

    fn upload_canvas(&mut self, ctx: &egui::Context) {
        let canvas = self.surface.canvas();
        let key = (canvas.width, canvas.height, canvas.generation());
        if matches!(&self.canvas_texture, Some((_, uploaded)) if *uploaded == key) {
            return;
        }

        let image = ColorImage::from_rgba_unmultiplied(
            [canvas.width as usize, canvas.height as usize],
            &canvas.to_rgba(),
        );
        match &mut self.canvas_texture {
            Some((texture, uploaded)) => {
                texture.set(image, TextureOptions::NEAREST);
                *uploaded = key;
            }
            None => {
                let texture = ctx.load_texture("easel-canvas", image, TextureOptions::NEAREST);
                self.canvas_texture = Some((texture, key));
            }
        }
    }

    fn action_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.surface.can_undo(), egui::Button::new("Undo"))
                .clicked()
            {
                self.surface.undo();
            }
            if ui
                .add_enabled(self.surface.can_redo(), egui::Button::new("Redo"))
                .clicked()
            {
                self.surface.redo();
            }
            if ui.button("Clear").clicked() {
                self.surface.clear();
            }
        });
    }

    fn picker_texture(&mut self, ctx: &egui::Context, role: ColorRole) -> egui::TextureId {
        let slot = match role {
            ColorRole::Fill => &mut self.fill_picker_texture,
            ColorRole::Stroke => &mut self.stroke_picker_texture,
        };
        if let Some(texture) = slot.as_ref() {
            return texture.id();
        }

        let canvas = self.controls.picker(role).canvas();
        let image = ColorImage::from_rgba_unmultiplied(
            [canvas.width as usize, canvas.height as usize],
            &canvas.to_rgba(),
        );
        let texture = ctx.load_texture(format!("easel-picker-{role:?}"), image, TextureOptions::LINEAR);
        let id = texture.id();
        *slot = Some(texture);
        id
    }

    // Returns the popup's screen rect while it is open.
    fn picker_popup(&mut self, ctx: &egui::Context, role: ColorRole) -> Option<Rect> {
        if !self.controls.popups.is_open(role) {
            return None;
        }

        let texture = self.picker_texture(ctx, role);
        let picker = self.controls.picker(role);
        let size = Vec2::new(picker.canvas().width as f32, picker.canvas().height as f32);
        let viewport = picker.viewport(size.x, size.y);
        let title = match role {
            ColorRole::Fill => "Fill color",
            ColorRole::Stroke => "Stroke color",
        };

        let shown = egui::Window::new(title)
            .id(egui::Id::new(("easel-picker", role)))
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                let (rect, response) = ui.allocate_exact_size(size, Sense::click());
                ui.painter().image(texture, rect, full_uv(), Color32::WHITE);
                if response.clicked() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        let local = pos - rect.min;
                        self.controls
                            .pick(role, &viewport, local.x, local.y, &mut self.surface);
                    }
                }

                ui.horizontal(|ui| {
                    let mut hex = self.controls.panel(role).hex_text.clone();
                    if ui
                        .add(egui::TextEdit::singleline(&mut hex).desired_width(70.0))
                        .changed()
                    {
                        self.controls.enter_hex(role, &hex, &mut self.surface);
                    }

                    let mut fields = self.controls.panel(role).rgb_text.clone();
                    let mut changed = false;
                    for (label, field) in ["R", "G", "B"].iter().zip(fields.iter_mut()) {
                        ui.label(*label);
                        changed |= ui
                            .add(egui::TextEdit::singleline(field).desired_width(32.0))
                            .changed();
                    }
                    if changed {
                        let [r, g, b] = &fields;
                        self.controls.enter_rgb(role, r, g, b, &mut self.surface);
                    }
                });
            });

        shown.map(|inner| inner.response.rect)
    }

    fn close_popups_on_outside_click(&mut self, ctx: &egui::Context, popup_rect: Option<Rect>) {
        if self.controls.popups.open_role().is_none() {
            return;
        }

        let clicked_at = ctx.input(|i| {
            if i.pointer.primary_clicked() {
                i.pointer.interact_pos()
            } else {
                None
            }
        });

        if let Some(pos) = clicked_at {
            let inside_popup = popup_rect.is_some_and(|r| r.contains(pos));
            let on_toggle = self.toggle_rects.iter().any(|r| r.contains(pos));
            if !inside_popup && !on_toggle {
                self.controls.click_outside_pickers();
            }
        }
    }
}

fn swatch(ui: &mut egui::Ui, color: Rgb, selected: bool) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(Vec2::splat(SWATCH_SIZE), Sense::click());
    let outline = if selected {
        egui::Stroke::new(2.0, Color32::from_rgb(0x33, 0x99, 0xff))
    } else {
        egui::Stroke::new(1.0, Color32::GRAY)
    };

    let painter = ui.painter();
    painter.rect_filled(rect, 3.0, color32(color));
    painter.rect_stroke(rect, 3.0, outline, egui::StrokeKind::Outside);
    response.on_hover_text(color.to_hex())
}
