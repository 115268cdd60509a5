//! Demo configuration with TOML file support.
//!
//! Window, camera, input, lighting, overlay, keybinding and per-demo
//! settings are consolidated here. Every section uses `#[serde(default)]` so
//! a file only needs the values it overrides.

mod camera;
mod demo;
mod lighting;
mod window;

use std::path::Path;

pub use camera::{CameraOptions, InputOptions, ViewOptions};
pub use demo::{CubeOptions, ForestOptions};
pub use lighting::{LightingOptions, LightingUniform};
use serde::{Deserialize, Serialize};
pub use window::{OverlayOptions, WindowOptions};

use crate::error::DemoError;
use crate::input::KeyBindings;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[cubes]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Window title and size.
    pub window: WindowOptions,
    /// Projection parameters.
    pub camera: CameraOptions,
    /// Mouse sensitivity.
    pub input: InputOptions,
    /// Phong light and material.
    pub lighting: LightingOptions,
    /// HUD text.
    pub overlay: OverlayOptions,
    /// Key string to command map.
    pub keybindings: KeyBindings,
    /// Tree forest settings.
    pub forest: ForestOptions,
    /// Cube cloud settings.
    pub cubes: CubeOptions,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DemoError::Io`] if the file cannot be read and
    /// [`DemoError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, DemoError> {
        let content = std::fs::read_to_string(path).map_err(DemoError::Io)?;
        toml::from_str(&content)
            .map_err(|e| DemoError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`DemoError::OptionsParse`] if serialization fails and
    /// [`DemoError::Io`] if the file or its parent directory cannot be
    /// written.
    pub fn save(&self, path: &Path) -> Result<(), DemoError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DemoError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(DemoError::Io)?;
        }
        std::fs::write(path, content).map_err(DemoError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DemoCommand;
    use crate::instancing::ScaleMode;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[cubes]
instances = 5000
data = [0.1, 0.2, 0.3, 0.4]

[forest.limits]
step = 250
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.cubes.instances, 5000);
        assert_eq!(opts.cubes.data, [0.1, 0.2, 0.3, 0.4]);
        assert_eq!(opts.cubes.max_instances, 1_000_000);
        assert_eq!(opts.forest.limits.step, 250);
        assert_eq!(opts.forest.limits.floor, 1_000);
        assert_eq!(opts.forest.scale_mode, ScaleMode::Vertical);
        assert_eq!(opts.camera.zfar, 350.0);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = std::env::temp_dir().join("instancing-options-test");
        let path = dir.join("bad.toml");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, "[cubes\ninstances = ").unwrap();
        assert!(matches!(
            Options::load(&path),
            Err(DemoError::OptionsParse(_))
        ));
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir()
            .join("instancing-options-test")
            .join("saved.toml");
        let mut opts = Options::default();
        opts.forest.seed = Some(7);
        opts.window.title = "Trees".into();
        opts.save(&path).unwrap();
        assert_eq!(Options::load(&path).unwrap(), opts);
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = Path::new("/nonexistent/instancing/options.toml");
        assert!(matches!(Options::load(path), Err(DemoError::Io(_))));
    }

    #[test]
    fn keybindings_section_overrides() {
        let toml_str = r#"
[keybindings.bindings]
KeyQ = "quit"
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.keybindings.lookup("KeyQ"), Some(DemoCommand::Quit));
    }

    #[test]
    fn forest_generator_validates() {
        let mut forest = ForestOptions::default();
        assert!(forest.generator().is_ok());
        forest.scale_min = 3.0;
        assert!(forest.generator().is_err());
    }
}
