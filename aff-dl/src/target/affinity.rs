use crate::common::*;

/// Derive the per-axis voxel adjacency map of a segmentation.
///
/// The output has shape `(3,) + label.shape` and the dtype of `label`.
/// Channel `a` is 1 at position `p` exactly when the labels at `p` and
/// `p + 1` along axis `a` agree (channel 0 = z, 1 = y, 2 = x). The last
/// slice along each axis has no forward neighbor and stays 0.
pub fn affinities(label: &Tensor) -> Result<Tensor> {
    let (depth, height, width) = label
        .size3()
        .context("affinities expect a 3-D label tensor")?;
    let kind = label.kind();
    let affinity = Tensor::zeros(&[3, depth, height, width], (kind, label.device()));

    if depth > 1 {
        let same = label
            .narrow(0, 1, depth - 1)
            .eq_tensor(&label.narrow(0, 0, depth - 1));
        affinity
            .i((0, ..depth - 1, .., ..))
            .copy_(&same.to_kind(kind));
    }
    if height > 1 {
        let same = label
            .narrow(1, 1, height - 1)
            .eq_tensor(&label.narrow(1, 0, height - 1));
        affinity
            .i((1, .., ..height - 1, ..))
            .copy_(&same.to_kind(kind));
    }
    if width > 1 {
        let same = label
            .narrow(2, 1, width - 1)
            .eq_tensor(&label.narrow(2, 0, width - 1));
        affinity
            .i((2, .., .., ..width - 1))
            .copy_(&same.to_kind(kind));
    }

    Ok(affinity)
}
