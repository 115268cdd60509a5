//! Per-instance transform data: generation, storage and count control.
//!
//! The forest scene samples a [`TransformGenerator`] into an
//! [`InstanceTable`] on the CPU; the cube scene keeps a pool of
//! [`seeds`] on the GPU and turns them into matrices there. Both gate their
//! buffer rebuilds on the dirty flag of an [`InstanceCount`].

/// Runtime-adjustable instance count with a rebuild flag.
pub mod count;
/// Random translation/scale transform sampling.
pub mod generator;
/// Seed-point distributions for GPU-side transform generation.
pub mod seeds;
/// The owned instance transform table.
pub mod table;

pub use count::{CountLimits, InstanceCount};
pub use generator::{
    ComposeOrder, Extent, GeneratorError, InstanceSample, ScaleMode,
    ScaleRange, TransformGenerator,
};
pub use table::{InstanceRaw, InstanceTable};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Build the random source used by the demos: deterministic when a seed is
/// configured, entropy-seeded otherwise.
#[must_use]
pub fn demo_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}
