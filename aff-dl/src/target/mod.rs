//! Training target derivation from segmentation labels.

pub mod affinity;
pub mod shape_descriptor;

pub use affinity::*;
pub use shape_descriptor::*;
