// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! GPU instancing demos built on wgpu.
//!
//! Two scenes share one engine: a forest of trees whose model matrices are
//! generated on the CPU and read from a storage buffer by instance index,
//! and a swarm of textured cubes whose matrices are produced every frame by
//! a compute pass from a fixed pool of seed points.
//!
//! # Key entry points
//!
//! - [`instancing::TransformGenerator`] - random per-instance transforms
//! - [`engine::DemoEngine`] - owns the GPU context, camera and active scene
//! - [`viewer::Viewer`] - standalone winit window running a demo
//! - [`options::Options`] - TOML-backed runtime configuration
//!
//! # Frame pipeline
//!
//! Each frame the engine (1) regenerates or reuses the instance transforms,
//! (2) uploads them, (3) binds them as a storage buffer, (4) issues one
//! instanced draw and (5) draws the FPS overlay.

pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod instancing;
pub mod mesh;
pub mod options;
pub mod renderer;
pub mod util;
pub mod viewer;

pub use engine::{DemoCommand, DemoEngine, DemoKind};
pub use error::DemoError;
pub use input::{InputEvent, MouseButton};
pub use viewer::Viewer;
