//! The network-ready patch bundle.

use crate::{common::*, dataset::PatchRecord, target};

/// A finalized patch together with its derived training targets.
///
/// Construction expands image and label with a leading channel axis,
/// derives the per-axis affinity map and the local shape descriptors
/// from the label, and bundles the four tensors. The bundle is read
/// only; channel sub-views are derived on access, never mutated.
#[derive(Debug, Getters)]
pub struct AffinityPatch {
    /// The raw image, `(1, Z, Y, X)`.
    #[getset(get = "pub")]
    image: Tensor,
    /// The segmentation, `(1, Z, Y, X)`.
    #[getset(get = "pub")]
    label: Tensor,
    /// Per-axis voxel adjacency, `(3, Z, Y, X)`.
    #[getset(get = "pub")]
    affinity: Tensor,
    /// Local shape descriptors, `(10, Z, Y, X)`.
    #[getset(get = "pub")]
    lsd: Tensor,
}

impl AffinityPatch {
    pub fn new(image: Tensor, label: Tensor) -> Result<Self> {
        ensure!(
            image.size() == label.size(),
            "image and label shapes differ: {:?} vs {:?}",
            image.size(),
            label.size()
        );
        let (depth, _height, _width) = label
            .size3()
            .context("affinity patches are built from 3-D image/label pairs")?;

        let affinity = target::affinities(&label)?;
        let lsd = target::local_shape_descriptors(&label, target::default_sigma(depth))?;

        Ok(Self {
            image: image.unsqueeze(0),
            label: label.unsqueeze(0),
            affinity,
            lsd,
        })
    }

    pub fn shape(&self) -> Vec<i64> {
        self.image.size()
    }

    /// The voxel at the middle of every axis of the image tensor.
    pub fn center(&self) -> Vec<i64> {
        self.shape().into_iter().map(|extent| extent / 2).collect()
    }

    /// A view of one semantic LSD group. Groups 0-2 are the offset and
    /// moment 3-vector fields reordered channel-last to `(Z, Y, X, 3)`;
    /// group 3 is the scalar size channel, `(Z, Y, X)`.
    pub fn get_lsd_channel(&self, channel: i64) -> Result<Tensor> {
        let view = match channel {
            0 | 1 | 2 => self.lsd.narrow(0, channel * 3, 3).permute(&[1, 2, 3, 0]),
            3 => self.lsd.i((9, .., .., ..)),
            _ => bail!("invalid lsd channel {}, expected one of 0-3", channel),
        };
        Ok(view)
    }

    /// The image/target pair handed to the training loop. The target
    /// stacks the affinity and LSD channels, 13 in total.
    pub fn training_record(&self) -> PatchRecord {
        PatchRecord {
            image: self.image.to_kind(Kind::Float),
            target: Tensor::cat(&[&self.affinity.to_kind(Kind::Float), &self.lsd], 0),
        }
    }
}
