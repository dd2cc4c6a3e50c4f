//! The building blocks of the affinity training data pipeline.

mod common;
pub mod affinity_patch;
pub mod dataset;
pub mod patch;
pub mod processor;
pub mod target;
pub mod utils;

pub use affinity_patch::AffinityPatch;
pub use patch::Patch;
