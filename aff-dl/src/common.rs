pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use approx::abs_diff_eq;
pub use cuboid::{Cartesian, Cuboid};
pub use getset::{CopyGetters, Getters};
pub use indexmap::IndexMap;
pub use itertools::Itertools as _;
pub use log::{info, warn};
pub use noisy_float::prelude::*;
pub use rand::{prelude::*, rngs::StdRng};
pub use serde::{Deserialize, Serialize};
pub use std::{
    fmt,
    fmt::Debug,
    path::{Path, PathBuf},
    sync::Arc,
};
pub use tch::{Device, IndexOp, Kind, Tensor};
pub use tch_tensor_like::TensorLike;
