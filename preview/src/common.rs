//! Common imports from external crates.

pub use aff_dl::{
    dataset::{Dataset, DatasetConfig, PatchRecord},
    processor::{
        Compose, DropSectionInit, FlipInit, GaussianBlur2DInit, IntensityPerturbationInit,
        MaskBoxInit, MisalignInit, NoiseInit, NormalizeInit, OneOf, PatchTransform,
        Perspective2DInit, TransposeInit,
    },
};
pub use anyhow::{bail, ensure, format_err, Context, Error, Result};
pub use futures::stream::{self, Stream, StreamExt, TryStreamExt};
pub use log::{info, warn};
pub use noisy_float::prelude::*;
pub use par_stream::{ParStreamExt, TryParStreamExt};
pub use rand::{prelude::*, rngs::StdRng};
pub use serde::{Deserialize, Serialize};
pub use std::{
    fmt::Debug,
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};
pub use structopt::StructOpt;
pub use tch::{Device, IndexOp, Kind, Tensor};
pub use tfrecord::{EventWriter, EventWriterInit};
