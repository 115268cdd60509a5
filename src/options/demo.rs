use serde::{Deserialize, Serialize};

use super::camera::ViewOptions;
use crate::instancing::{
    ComposeOrder, CountLimits, Extent, GeneratorError, ScaleMode, ScaleRange,
    TransformGenerator,
};

/// Settings for the tree forest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ForestOptions {
    /// Number of trees generated at startup.
    pub instances: u32,
    /// Trees are placed with x and z in `[-extent, extent]`.
    pub extent: f32,
    /// Smallest scale factor, inclusive.
    pub scale_min: f32,
    /// Largest scale factor, exclusive.
    pub scale_max: f32,
    /// Which axes the random scale applies to.
    pub scale_mode: ScaleMode,
    /// Whether scale happens before or after translation.
    pub compose_order: ComposeOrder,
    /// Step, floor and ceiling for the `=`/`-` keys.
    pub limits: CountLimits,
    /// Radial segments of the trunk and crowns.
    pub tree_segments: u32,
    /// RNG seed; `None` draws from entropy.
    pub seed: Option<u64>,
    /// Camera placement.
    pub view: ViewOptions,
}

impl Default for ForestOptions {
    fn default() -> Self {
        Self {
            instances: 15_000,
            extent: 140.0,
            scale_min: 0.5,
            scale_max: 2.5,
            scale_mode: ScaleMode::Vertical,
            compose_order: ComposeOrder::ScaleThenTranslate,
            limits: CountLimits {
                step: 1_000,
                floor: 1_000,
                ceiling: 100_000,
            },
            tree_segments: 8,
            seed: None,
            view: ViewOptions::forest(),
        }
    }
}

/// Settings for the GPU-animated cube cloud.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CubeOptions {
    /// Number of cubes drawn at startup.
    pub instances: u32,
    /// Size of the seed point pool; also caps the instance count.
    pub max_instances: u32,
    /// Step, floor and ceiling for the `=`/`-` keys.
    pub limits: CountLimits,
    /// Half edge length of one cube.
    pub cube_scale: f32,
    /// Diffuse texture; a checkerboard is used if it cannot be read.
    pub texture_path: String,
    /// Animation parameters: spin speed, bob height, bob frequency, scale.
    pub data: [f32; 4],
    /// RNG seed; `None` draws from entropy.
    pub seed: Option<u64>,
    /// Camera placement.
    pub view: ViewOptions,
}

impl Default for CubeOptions {
    fn default() -> Self {
        Self {
            instances: 1_000,
            max_instances: 1_000_000,
            limits: CountLimits::default(),
            cube_scale: 0.2,
            texture_path: "textures/crate.bmp".into(),
            data: [0.3, 0.6, 0.5, 1.2],
            seed: None,
            view: ViewOptions::cubes(),
        }
    }
}

impl ForestOptions {
    /// Build the transform generator these settings describe.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError`] if `extent` or the scale bounds are out
    /// of range.
    pub fn generator(&self) -> Result<TransformGenerator, GeneratorError> {
        let extent = Extent::new(self.extent)?;
        let scale = ScaleRange::new(self.scale_min, self.scale_max)?;
        Ok(TransformGenerator::new(extent, scale)
            .with_mode(self.scale_mode)
            .with_order(self.compose_order))
    }
}
