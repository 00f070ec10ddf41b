use easel_core::{EaselConfig, InputEvent, Point, Rgb};
use easel_store::{MemoryStorage, Snapshot};
use easel_ui::{DrawingSurface, RepaintReason, SurfaceEvent};
use egui::Color32;

fn surface_with_cap(cap: usize) -> DrawingSurface {
    let config = EaselConfig {
        history_cap: cap,
        ..EaselConfig::default()
    };
    DrawingSurface::open(&config, Box::new(MemoryStorage::new()), 64, 48)
}

fn pixels_of(snapshot: &Snapshot) -> Vec<u8> {
    snapshot.decode().unwrap().rgba
}

fn stroke(surface: &mut DrawingSurface, from: (f32, f32), to: (f32, f32)) {
    surface.handle_input(&InputEvent::PointerDown { x: from.0, y: from.1 });
    surface.handle_input(&InputEvent::PointerMove { x: to.0, y: to.1 });
    surface.handle_input(&InputEvent::PointerUp);
}

#[test]
fn fresh_load_is_blank_with_one_history_entry() {
    let surface = surface_with_cap(50);

    assert!(surface.canvas().is_solid(Color32::WHITE));
    assert_eq!(surface.history().len(), 1);
    assert_eq!(surface.history().cursor(), 0);
    assert!(surface.bridge().has_saved());
}

#[test]
fn undo_then_redo_single_stroke() {
    let mut surface = surface_with_cap(50);
    let blank = surface.canvas().to_rgba();

    stroke(&mut surface, (10.0, 10.0), (40.0, 30.0));
    let drawn = surface.canvas().to_rgba();
    assert_ne!(drawn, blank);

    assert!(surface.undo());
    surface.settle_repaints();
    assert_eq!(surface.canvas().to_rgba(), blank);

    assert!(surface.redo());
    surface.settle_repaints();
    assert_eq!(surface.canvas().to_rgba(), drawn);
}

#[test]
fn undo_n_times_reaches_blank_and_redo_n_times_returns() {
    let mut surface = surface_with_cap(50);
    let blank = surface.canvas().to_rgba();

    let n = 6;
    for i in 0..n {
        let y = 5.0 + i as f32 * 7.0;
        stroke(&mut surface, (2.0, y), (60.0, y));
    }
    let last = surface.canvas().to_rgba();

    for _ in 0..n {
        assert!(surface.undo());
    }
    assert!(!surface.undo());
    surface.settle_repaints();
    assert_eq!(surface.canvas().to_rgba(), blank);

    for _ in 0..n {
        assert!(surface.redo());
    }
    assert!(!surface.redo());
    surface.settle_repaints();
    assert_eq!(surface.canvas().to_rgba(), last);
}

#[test]
fn fill_then_clear_records_two_solid_entries() {
    let mut surface = surface_with_cap(50);
    surface.tools_mut().fill_color = Rgb::from_hex("#112233").unwrap();

    surface.fill();
    surface.clear();

    let states = surface.history().states();
    let filled = &states[states.len() - 2];
    let cleared = &states[states.len() - 1];

    assert!(pixels_of(filled)
        .chunks_exact(4)
        .all(|p| p == [0x11, 0x22, 0x33, 0xff]));
    assert!(pixels_of(cleared)
        .chunks_exact(4)
        .all(|p| p == [0xff, 0xff, 0xff, 0xff]));
}

#[test]
fn fifty_one_dots_with_cap_fifty_drop_blank_and_first() {
    let mut surface = surface_with_cap(50);
    let mut after_stroke = Vec::new();

    for i in 0..51u32 {
        let p = Point::new((i % 16) as f32 * 4.0 + 1.5, (i / 16) as f32 * 4.0 + 1.5);
        surface.set_brush_size(1);
        surface.begin_stroke(p);
        surface.end_stroke();
        after_stroke.push(surface.canvas().to_rgba());
    }

    let history = surface.history();
    assert_eq!(history.len(), 50);
    assert_eq!(history.cursor(), 49);
    assert_eq!(pixels_of(&history.states()[0]), after_stroke[1]);
    assert_ne!(pixels_of(&history.states()[0]), after_stroke[0]);
}

#[test]
fn history_never_exceeds_cap() {
    let cap = 4;
    let mut surface = surface_with_cap(cap);
    for i in 0..20 {
        surface.begin_stroke(Point::new(i as f32 * 3.0, 10.0));
        surface.end_stroke();
        assert!(surface.history().len() <= cap);
    }
}

#[test]
fn new_stroke_after_undo_prunes_redo() {
    let mut surface = surface_with_cap(50);
    stroke(&mut surface, (5.0, 5.0), (20.0, 5.0));
    stroke(&mut surface, (5.0, 20.0), (20.0, 20.0));

    surface.undo();
    surface.undo();
    stroke(&mut surface, (30.0, 30.0), (50.0, 40.0));

    assert_eq!(surface.history().len(), 2);
    assert!(!surface.can_redo());
    assert!(!surface.redo());
}

#[test]
fn drawing_after_undo_waits_for_the_repaint() {
    let mut surface = surface_with_cap(50);
    stroke(&mut surface, (5.0, 5.0), (60.0, 5.0));

    surface.undo();
    // New input before anyone pumped the repaint.
    surface.begin_stroke(Point::new(30.0, 40.0));
    surface.end_stroke();

    // The undone stroke is gone and the new dot is there.
    assert_eq!(surface.canvas().get_pixel(50, 5), Some(Color32::WHITE));
    assert_eq!(surface.canvas().get_pixel(30, 40), Some(Color32::BLACK));
    assert!(!surface.repaint_pending());
}

#[test]
fn rapid_undo_redo_applies_only_the_latest() {
    let mut surface = surface_with_cap(50);
    stroke(&mut surface, (5.0, 5.0), (60.0, 5.0));
    let drawn = surface.canvas().to_rgba();
    surface.take_events();

    surface.undo();
    surface.redo();
    surface.settle_repaints();

    assert_eq!(surface.canvas().to_rgba(), drawn);
    let repaints: Vec<_> = surface
        .take_events()
        .into_iter()
        .filter(|e| matches!(e, SurfaceEvent::Repainted { .. }))
        .collect();
    assert_eq!(
        repaints,
        vec![SurfaceEvent::Repainted {
            reason: RepaintReason::Redo
        }]
    );
}

#[test]
fn undo_re_persists_the_visible_state() {
    let mut surface = surface_with_cap(50);
    let blank = surface.canvas().to_rgba();
    stroke(&mut surface, (5.0, 5.0), (60.0, 40.0));

    let saved = surface.bridge().restore().unwrap();
    assert_ne!(pixels_of(&saved), blank);

    surface.undo();
    surface.settle_repaints();
    let saved = surface.bridge().restore().unwrap();
    assert_eq!(pixels_of(&saved), blank);
}

#[test]
fn events_follow_operations() {
    let mut surface = surface_with_cap(50);
    surface.take_events();

    stroke(&mut surface, (1.0, 1.0), (2.0, 2.0));
    surface.fill();
    surface.clear();
    surface.undo();

    let events = surface.take_events();
    assert_eq!(events[0], SurfaceEvent::StrokeCommitted);
    assert_eq!(events[1], SurfaceEvent::Filled { color: Rgb::BLACK });
    assert_eq!(events[2], SurfaceEvent::Cleared);
    assert_eq!(events[3], SurfaceEvent::HistoryMoved { cursor: 2, len: 4 });
}
