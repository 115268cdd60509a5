use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Initial window settings.
pub struct WindowOptions {
    /// Title bar text. The demo name is appended.
    pub title: String,
    /// Initial inner width in logical pixels.
    pub width: u32,
    /// Initial inner height in logical pixels.
    pub height: u32,
    /// Start in borderless fullscreen.
    pub fullscreen: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "Instancing".into(),
            width: 720,
            height: 576,
            fullscreen: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// HUD text drawn over the scene.
pub struct OverlayOptions {
    /// Draw the overlay at all.
    pub enabled: bool,
    /// Font size in physical pixels.
    pub font_size: f32,
    /// Text color, RGBA 0-255.
    pub color: [u8; 4],
    /// Distance from the top-left corner in physical pixels.
    pub margin: f32,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            font_size: 16.0,
            color: [255, 255, 0, 255],
            margin: 10.0,
        }
    }
}
