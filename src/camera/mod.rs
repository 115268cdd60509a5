//! Camera system for 3D scene viewing.
//!
//! A fixed look-at camera plus a mouse-driven model transform applied to the
//! whole instanced scene.

/// Camera controller managing the model transform and GPU resources.
pub mod controller;
/// Core camera struct and GPU uniform types.
pub mod core;
/// Mouse-driven rotation/translation of the scene.
pub mod model_transform;
