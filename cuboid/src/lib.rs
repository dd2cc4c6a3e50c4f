//! Safe voxel coordinate and bounding cuboid types and functions.

mod common;

pub use cartesian::*;
pub mod cartesian;

pub use cuboid::*;
pub mod cuboid;

pub mod prelude {
    pub use crate::{Cartesian, Cuboid};
}
