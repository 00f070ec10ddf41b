// Drawing surface: owns the live bitmap and turns input into strokes, fills,
// history steps and persisted snapshots.
//
// Control flow: input mutates the canvas; finishing a stroke (or a fill or
// clear) records a snapshot in history and mirrors it to storage. Undo/redo
// move the history cursor and ask the repaint pipeline to decode the snapshot
// at the new cursor; the canvas changes once that decode lands.

use easel_core::{EaselConfig, InputEvent, Point, Rgb, Shortcut, ToolKind, ToolState, Viewport};
use easel_store::{PersistenceBridge, Snapshot, Storage};
use tracing::{debug, error, info, warn};

use crate::editor::canvas::color32;
use crate::editor::history::History;
use crate::editor::repaint::{RepaintCompletion, RepaintPipeline, RepaintReason};
use crate::editor::tools::{Brush, Eraser, Fill, Tool};
use crate::Canvas;

/// Notifications for collaborators outside the core (buttons, swatches, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    StrokeCommitted,
    Filled { color: Rgb },
    Cleared,
    HistoryMoved { cursor: usize, len: usize },
    Repainted { reason: RepaintReason },
    Resized { width: u32, height: u32 },
    ToolChanged { tool: ToolKind },
}

pub struct DrawingSurface {
    canvas: Canvas,
    background: Rgb,
    tools: ToolState,
    history: History<Snapshot>,
    bridge: PersistenceBridge,
    repaint: RepaintPipeline,
    viewport: Viewport,
    /// Last mapped position of the stroke in progress.
    stroke: Option<Point>,
    events: Vec<SurfaceEvent>,
}

impl DrawingSurface {
    /// Create the surface, restoring the saved canvas if there is one and
    /// otherwise starting from a blank, persisted background.
    pub fn open(config: &EaselConfig, storage: Box<dyn Storage>, width: u32, height: u32) -> Self {
        let background = config.background_color();
        let canvas = Canvas::new(width, height, color32(background));
        let viewport = Viewport::unscaled(canvas.width, canvas.height);
        let bridge = PersistenceBridge::new(storage, config.storage_key.clone());

        let mut surface = Self {
            canvas,
            background,
            tools: ToolState::new(config),
            history: History::empty(config.history_cap),
            bridge,
            repaint: RepaintPipeline::new(),
            viewport,
            stroke: None,
            events: Vec::new(),
        };

        match surface.bridge.restore() {
            Some(saved) => {
                info!(
                    width = saved.width(),
                    height = saved.height(),
                    "restoring saved canvas"
                );
                surface.history.record(saved.clone());
                surface.repaint.request(saved, RepaintReason::Restore);
            }
            None => surface.start_blank(),
        }

        surface
    }

    // Blank floor for the undo history, mirrored to storage.
    fn start_blank(&mut self) {
        self.canvas.fill(color32(self.background));
        if let Some(blank) = self.capture() {
            self.history.reset(blank.clone());
            self.persist(&blank);
        }
        info!("initialized blank canvas");
    }

    // ---- tool state -----------------------------------------------------

    pub fn tools(&self) -> &ToolState {
        &self.tools
    }

    pub fn tools_mut(&mut self) -> &mut ToolState {
        &mut self.tools
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.tools.tool != tool {
            info!(tool = tool.name(), "tool selected");
            self.tools.tool = tool;
            self.events.push(SurfaceEvent::ToolChanged { tool });
        }
    }

    pub fn set_brush_size(&mut self, size: u32) -> u32 {
        self.tools.set_brush_size(size)
    }

    fn active_tool(&self) -> Box<dyn Tool> {
        let size = self.tools.brush_size();
        let color = color32(self.tools.paint_color(self.background));
        match self.tools.tool {
            ToolKind::Brush => Box::new(Brush::new(size, color)),
            ToolKind::Eraser => Box::new(Eraser::new(size, color)),
        }
    }

    // ---- input ----------------------------------------------------------

    /// Tell the surface how large it is displayed, in element units.
    pub fn set_display_size(&mut self, display_width: f32, display_height: f32) {
        self.viewport = Viewport::new(
            display_width,
            display_height,
            self.canvas.width,
            self.canvas.height,
        );
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Map an element-space position into bitmap space.
    pub fn map_input(&self, element_x: f32, element_y: f32) -> Point {
        self.viewport.to_bitmap(element_x, element_y)
    }

    pub fn handle_input(&mut self, event: &InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => {
                let p = self.map_input(*x, *y);
                self.begin_stroke(p);
            }
            InputEvent::PointerMove { x, y } => {
                let p = self.map_input(*x, *y);
                self.continue_stroke(p);
            }
            InputEvent::TouchStart { touches } => {
                if let Some(&(x, y)) = touches.first() {
                    let p = self.map_input(x, y);
                    self.begin_stroke(p);
                }
            }
            InputEvent::TouchMove { touches } => {
                if let Some(&(x, y)) = touches.first() {
                    let p = self.map_input(x, y);
                    self.continue_stroke(p);
                }
            }
            InputEvent::PointerUp | InputEvent::PointerLeave | InputEvent::TouchEnd => {
                self.end_stroke();
            }
        }
    }

    /// Ctrl+Z / Ctrl+Y. Returns true when the key was ours, meaning the host
    /// should not handle it as well.
    pub fn handle_key(&mut self, ctrl: bool, key: char) -> bool {
        match Shortcut::from_key(ctrl, key) {
            Some(shortcut) => {
                self.handle_shortcut(shortcut);
                true
            }
            None => false,
        }
    }

    pub fn handle_shortcut(&mut self, shortcut: Shortcut) {
        match shortcut {
            Shortcut::Undo => {
                self.undo();
            }
            Shortcut::Redo => {
                self.redo();
            }
        }
    }

    /// Start a stroke at a bitmap position and leave a dot there, so a tap
    /// without movement still shows up.
    pub fn begin_stroke(&mut self, at: Point) {
        self.settle_repaints();
        debug!(x = at.x, y = at.y, tool = self.tools.tool.name(), "stroke begin");
        self.active_tool().dab(&mut self.canvas, at);
        self.stroke = Some(at);
    }

    /// Extend the active stroke. Ignored when no stroke is active.
    pub fn continue_stroke(&mut self, to: Point) {
        let Some(from) = self.stroke else {
            return;
        };
        // A resize mid-stroke leaves a reload in flight.
        self.settle_repaints();
        self.active_tool().segment(&mut self.canvas, from, to);
        self.stroke = Some(to);
    }

    /// Finish the active stroke and commit it. Ignored when no stroke is active.
    pub fn end_stroke(&mut self) {
        if self.stroke.take().is_some() {
            self.settle_repaints();
            debug!("stroke end");
            self.commit(SurfaceEvent::StrokeCommitted);
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_some()
    }

    // ---- whole-canvas operations ----------------------------------------

    /// Cover the canvas with the current fill color.
    pub fn fill(&mut self) {
        self.settle_repaints();
        let color = self.tools.fill_color;
        info!(color = %color, "fill canvas");
        Fill::new(color32(color)).apply(&mut self.canvas);
        self.commit(SurfaceEvent::Filled { color });
    }

    /// Cover the canvas with the background color.
    pub fn clear(&mut self) {
        self.settle_repaints();
        info!("clear canvas");
        Fill::new(color32(self.background)).apply(&mut self.canvas);
        self.commit(SurfaceEvent::Cleared);
    }

    /// Resize the bitmap and reload it from storage. Not a history step.
    /// A stroke in progress carries on in the new bitmap's coordinates.
    /// Returns false when the size did not change or is too large.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let (width, height) = (width.max(1), height.max(1));
        if width == self.canvas.width && height == self.canvas.height {
            return false;
        }
        if !Canvas::fits(width, height) {
            warn!(width, height, max_pixels = Canvas::MAX_PIXELS, "refusing oversized canvas");
            return false;
        }

        self.settle_repaints();
        info!(width, height, drawing = self.stroke.is_some(), "resizing canvas");

        let sx = width as f32 / self.canvas.width as f32;
        let sy = height as f32 / self.canvas.height as f32;
        self.stroke = self.stroke.map(|p| Point::new(p.x * sx, p.y * sy));

        let (display_w, display_h) = (self.viewport.display_width, self.viewport.display_height);
        self.canvas = Canvas::new(width, height, color32(self.background));
        self.viewport = Viewport::new(display_w, display_h, width, height);

        if let Some(saved) = self.bridge.restore() {
            self.repaint.request(saved, RepaintReason::Resize);
        }

        self.events.push(SurfaceEvent::Resized { width, height });
        true
    }

    // ---- history --------------------------------------------------------

    /// Step back one snapshot. The canvas updates once the snapshot is decoded.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            debug!("nothing to undo");
            return false;
        };
        info!(cursor = self.history.cursor(), "undo");
        self.repaint.request(snapshot, RepaintReason::Undo);
        self.push_history_moved();
        true
    }

    /// Step forward one snapshot. The canvas updates once the snapshot is decoded.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            debug!("nothing to redo");
            return false;
        };
        info!(cursor = self.history.cursor(), "redo");
        self.repaint.request(snapshot, RepaintReason::Redo);
        self.push_history_moved();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History<Snapshot> {
        &self.history
    }

    fn push_history_moved(&mut self) {
        self.events.push(SurfaceEvent::HistoryMoved {
            cursor: self.history.cursor(),
            len: self.history.len(),
        });
    }

    // ---- repaint --------------------------------------------------------

    /// Apply a finished decode if one has arrived. Call once per frame.
    pub fn pump(&mut self) -> bool {
        match self.repaint.poll() {
            Some(done) => {
                self.apply_repaint(done);
                true
            }
            None => false,
        }
    }

    /// Block until any pending repaint has been applied.
    pub fn settle_repaints(&mut self) -> bool {
        match self.repaint.wait() {
            Some(done) => {
                self.apply_repaint(done);
                true
            }
            None => false,
        }
    }

    pub fn repaint_pending(&self) -> bool {
        self.repaint.is_pending()
    }

    fn apply_repaint(&mut self, done: RepaintCompletion) {
        let reason = done.reason;
        match done.result {
            Ok(image) => {
                self.canvas.fill(color32(self.background));
                self.canvas.draw_scaled(&image);
                debug!(token = done.token.value(), ?reason, "repaint applied");

                if matches!(reason, RepaintReason::Undo | RepaintReason::Redo) {
                    if let Some(snapshot) = self.capture() {
                        self.persist(&snapshot);
                    }
                }
                self.events.push(SurfaceEvent::Repainted { reason });
            }
            Err(e) => {
                warn!(error = %e, ?reason, "snapshot could not be decoded");
                if reason == RepaintReason::Restore {
                    // Treat an unreadable saved canvas as no saved canvas.
                    self.start_blank();
                    self.events.push(SurfaceEvent::Repainted { reason });
                }
            }
        }
    }

    // ---- snapshots ------------------------------------------------------

    fn capture(&self) -> Option<Snapshot> {
        match self.canvas.snapshot() {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                error!(error = %e, "could not encode canvas snapshot");
                None
            }
        }
    }

    fn persist(&mut self, snapshot: &Snapshot) {
        if let Err(e) = self.bridge.persist(snapshot) {
            warn!(error = %format!("{e:#}"), "canvas not persisted");
        }
    }

    fn commit(&mut self, event: SurfaceEvent) {
        if let Some(snapshot) = self.capture() {
            self.history.record(snapshot.clone());
            self.persist(&snapshot);
            debug!(
                cursor = self.history.cursor(),
                len = self.history.len(),
                "snapshot committed"
            );
        }
        self.events.push(event);
    }

    // ---- accessors ------------------------------------------------------

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn bridge(&self) -> &PersistenceBridge {
        &self.bridge
    }

    /// Drain queued notifications.
    pub fn take_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }
}

impl std::fmt::Debug for DrawingSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawingSurface")
            .field("width", &self.canvas.width)
            .field("height", &self.canvas.height)
            .field("tools", &self.tools)
            .field("history_len", &self.history.len())
            .field("cursor", &self.history.cursor())
            .field("drawing", &self.stroke.is_some())
            .finish_non_exhaustive()
    }
}
