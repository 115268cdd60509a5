//! The engine's complete interactive vocabulary.
//!
//! Every user-facing operation, whether triggered by a key press, a mouse
//! gesture or a programmatic call, is represented as a `DemoCommand`.
//! Consumers construct commands and pass them to
//! [`DemoEngine::execute`](super::DemoEngine::execute).

use glam::Vec2;

/// Every action the engine can perform in response to user input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DemoCommand {
    // ── Scene transform ─────────────────────────────────────────────
    /// Spin the scene by `delta` pixels of mouse movement.
    RotateScene {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Translate the scene by `delta` pixels of mouse movement.
    PanScene {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Move the scene along Z (positive = toward the viewer).
    Zoom {
        /// Scroll amount; only the sign is used.
        delta: f32,
    },

    /// Drop all mouse rotation and translation.
    ResetView,

    // ── Rendering ───────────────────────────────────────────────────
    /// Switch between line and filled polygons.
    SetWireframe(bool),

    // ── Instance count ──────────────────────────────────────────────
    /// One step more instances, up to the ceiling.
    IncreaseInstances,

    /// One step fewer instances, down to the floor.
    DecreaseInstances,

    /// Jump to an explicit instance count (clamped to the ceiling).
    SetInstances {
        /// Requested count.
        count: u32,
    },

    // ── Window ──────────────────────────────────────────────────────
    /// Borderless fullscreen on the current monitor.
    Fullscreen,

    /// Leave fullscreen.
    Windowed,

    /// Close the window and end the event loop.
    Quit,
}

impl DemoCommand {
    /// Whether the window, not the engine, carries this command out.
    #[must_use]
    pub fn is_window_command(&self) -> bool {
        matches!(self, Self::Fullscreen | Self::Windowed | Self::Quit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_commands_are_flagged() {
        assert!(DemoCommand::Quit.is_window_command());
        assert!(DemoCommand::Fullscreen.is_window_command());
        assert!(DemoCommand::Windowed.is_window_command());
        assert!(!DemoCommand::SetWireframe(true).is_window_command());
        assert!(!DemoCommand::IncreaseInstances.is_window_command());
    }
}
