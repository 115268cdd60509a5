//! Converts raw platform events into engine commands.
//!
//! The `InputProcessor` owns all transient input state (cursor tracking and
//! held buttons) and the key-binding map. It is the only thing that sits
//! between raw window events and [`DemoEngine::execute`](crate::DemoEngine::execute).

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::event::{InputEvent, MouseButton};
use crate::engine::DemoCommand;

/// Maps physical key strings to [`DemoCommand`] variants.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format:
/// `"KeyW"`, `"Equal"`, `"Escape"`, etc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    /// Forward map: key string → command tag.
    bindings: HashMap<String, KeyCommandTag>,
}

/// Serializable tag for the key-bindable subset of [`DemoCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommandTag {
    /// Close the window.
    Quit,
    /// Draw polygons as lines.
    WireframeOn,
    /// Draw filled polygons.
    WireframeOff,
    /// Borderless fullscreen.
    Fullscreen,
    /// Back to a normal window.
    Windowed,
    /// One step more instances.
    MoreInstances,
    /// One step fewer instances.
    FewerInstances,
    /// Clear mouse rotation and translation.
    ResetView,
}

impl KeyCommandTag {
    /// Convert to the corresponding parameterless [`DemoCommand`].
    fn to_command(self) -> DemoCommand {
        match self {
            Self::Quit => DemoCommand::Quit,
            Self::WireframeOn => DemoCommand::SetWireframe(true),
            Self::WireframeOff => DemoCommand::SetWireframe(false),
            Self::Fullscreen => DemoCommand::Fullscreen,
            Self::Windowed => DemoCommand::Windowed,
            Self::MoreInstances => DemoCommand::IncreaseInstances,
            Self::FewerInstances => DemoCommand::DecreaseInstances,
            Self::ResetView => DemoCommand::ResetView,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([
            ("Escape".into(), KeyCommandTag::Quit),
            ("KeyW".into(), KeyCommandTag::WireframeOn),
            ("KeyS".into(), KeyCommandTag::WireframeOff),
            ("KeyF".into(), KeyCommandTag::Fullscreen),
            ("KeyN".into(), KeyCommandTag::Windowed),
            ("Equal".into(), KeyCommandTag::MoreInstances),
            ("Minus".into(), KeyCommandTag::FewerInstances),
            ("Space".into(), KeyCommandTag::ResetView),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the command for a physical key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<DemoCommand> {
        self.bindings.get(key).map(|tag| tag.to_command())
    }

    /// Bind `key` to `tag`, replacing any previous binding for that key.
    pub fn bind(&mut self, key: impl Into<String>, tag: KeyCommandTag) {
        let _ = self.bindings.insert(key.into(), tag);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// InputProcessor
// ─────────────────────────────────────────────────────────────────────────────

/// Converts raw window events into [`DemoCommand`]s.
///
/// A left drag rotates, a right drag translates; a drag only counts while
/// exactly one of the two buttons is held.
pub struct InputProcessor {
    /// Last cursor position, `None` until the first move.
    last_pos: Option<Vec2>,
    left_pressed: bool,
    right_pressed: bool,
    key_bindings: KeyBindings,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_key_bindings(KeyBindings::default())
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeyBindings) -> Self {
        Self {
            last_pos: None,
            left_pressed: false,
            right_pressed: false,
            key_bindings,
        }
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeyBindings {
        &self.key_bindings
    }

    /// Look up a key press and return the corresponding command, if bound.
    #[must_use]
    pub fn handle_key_press(&self, key: &str) -> Option<DemoCommand> {
        self.key_bindings.lookup(key)
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<DemoCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => {
                self.handle_cursor_moved(Vec2::new(x, y))
            }
            InputEvent::MouseButton { button, pressed } => {
                match button {
                    MouseButton::Left => self.left_pressed = pressed,
                    MouseButton::Right => self.right_pressed = pressed,
                    MouseButton::Middle => {}
                }
                None
            }
            InputEvent::Scroll { delta } => {
                (delta != 0.0).then_some(DemoCommand::Zoom { delta })
            }
        }
    }

    fn handle_cursor_moved(&mut self, pos: Vec2) -> Option<DemoCommand> {
        let delta = self.last_pos.map_or(Vec2::ZERO, |last| pos - last);
        self.last_pos = Some(pos);

        if delta == Vec2::ZERO {
            return None;
        }
        match (self.left_pressed, self.right_pressed) {
            (true, false) => Some(DemoCommand::RotateScene { delta }),
            (false, true) => Some(DemoCommand::PanScene { delta }),
            _ => None,
        }
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::CursorMoved { x, y }
    }

    fn button(button: MouseButton, pressed: bool) -> InputEvent {
        InputEvent::MouseButton { button, pressed }
    }

    #[test]
    fn left_drag_rotates() {
        let mut p = InputProcessor::new();
        assert_eq!(p.handle_event(moved(10.0, 10.0)), None);
        assert_eq!(p.handle_event(button(MouseButton::Left, true)), None);
        assert_eq!(
            p.handle_event(moved(14.0, 7.0)),
            Some(DemoCommand::RotateScene {
                delta: Vec2::new(4.0, -3.0)
            })
        );
        let _ = p.handle_event(button(MouseButton::Left, false));
        assert_eq!(p.handle_event(moved(20.0, 20.0)), None);
    }

    #[test]
    fn right_drag_pans() {
        let mut p = InputProcessor::new();
        let _ = p.handle_event(moved(0.0, 0.0));
        let _ = p.handle_event(button(MouseButton::Right, true));
        assert_eq!(
            p.handle_event(moved(5.0, 0.0)),
            Some(DemoCommand::PanScene {
                delta: Vec2::new(5.0, 0.0)
            })
        );
    }

    #[test]
    fn both_buttons_held_does_nothing() {
        let mut p = InputProcessor::new();
        let _ = p.handle_event(moved(0.0, 0.0));
        let _ = p.handle_event(button(MouseButton::Left, true));
        let _ = p.handle_event(button(MouseButton::Right, true));
        assert_eq!(p.handle_event(moved(5.0, 5.0)), None);
    }

    #[test]
    fn first_move_has_no_delta() {
        let mut p = InputProcessor::new();
        let _ = p.handle_event(button(MouseButton::Left, true));
        assert_eq!(p.handle_event(moved(300.0, 300.0)), None);
    }

    #[test]
    fn scroll_zooms_unless_zero() {
        let mut p = InputProcessor::new();
        assert_eq!(
            p.handle_event(InputEvent::Scroll { delta: -1.0 }),
            Some(DemoCommand::Zoom { delta: -1.0 })
        );
        assert_eq!(p.handle_event(InputEvent::Scroll { delta: 0.0 }), None);
    }

    #[test]
    fn default_key_bindings() {
        let p = InputProcessor::new();
        assert_eq!(p.handle_key_press("Escape"), Some(DemoCommand::Quit));
        assert_eq!(
            p.handle_key_press("KeyW"),
            Some(DemoCommand::SetWireframe(true))
        );
        assert_eq!(
            p.handle_key_press("Equal"),
            Some(DemoCommand::IncreaseInstances)
        );
        assert_eq!(
            p.handle_key_press("Minus"),
            Some(DemoCommand::DecreaseInstances)
        );
        assert_eq!(p.handle_key_press("KeyZ"), None);
    }

    #[test]
    fn rebinding_replaces_key() {
        let mut bindings = KeyBindings::default();
        bindings.bind("KeyQ", KeyCommandTag::Quit);
        let p = InputProcessor::with_key_bindings(bindings);
        assert_eq!(p.handle_key_press("KeyQ"), Some(DemoCommand::Quit));
        assert_eq!(p.key_bindings().lookup("Escape"), Some(DemoCommand::Quit));
    }
}
