//! Shared utilities for the demos.

pub mod frame_timing;

pub use frame_timing::FrameTiming;
