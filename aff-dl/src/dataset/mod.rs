//! Dataset sampling toolkit.

mod record;
mod sample;
mod training;
mod volume;

pub use record::*;
pub use sample::*;
pub use training::*;
pub use volume::*;
