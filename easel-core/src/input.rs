//! Input events as the drawing surface consumes them, independent of any windowing toolkit.

use serde::{Deserialize, Serialize};

/// Pointer and touch input in element coordinates (relative to the element's top-left corner).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    PointerLeave,
    /// Only the first touch point is used.
    TouchStart { touches: Vec<(f32, f32)> },
    TouchMove { touches: Vec<(f32, f32)> },
    TouchEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shortcut {
    Undo,
    Redo,
}

impl Shortcut {
    /// Ctrl+Z undoes and Ctrl+Y redoes. Everything else is left to the host.
    pub fn from_key(ctrl: bool, key: char) -> Option<Shortcut> {
        if !ctrl {
            return None;
        }
        match key {
            'z' => Some(Shortcut::Undo),
            'y' => Some(Shortcut::Redo),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcuts_need_ctrl() {
        assert_eq!(Shortcut::from_key(true, 'z'), Some(Shortcut::Undo));
        assert_eq!(Shortcut::from_key(true, 'y'), Some(Shortcut::Redo));
        assert_eq!(Shortcut::from_key(false, 'z'), None);
        assert_eq!(Shortcut::from_key(true, 'x'), None);
    }

    #[test]
    fn events_deserialize_from_tagged_json() {
        let ev: InputEvent = serde_json::from_str(r#"{"kind":"pointer_down","x":1.5,"y":2.0}"#).unwrap();
        assert_eq!(ev, InputEvent::PointerDown { x: 1.5, y: 2.0 });
    }
}
