//! The unit of training data before target derivation.

use crate::common::*;

/// A paired image/label sub-volume cut from a larger volume.
///
/// Augmentation stages mutate the patch in place. A stage whose border
/// artifacts are cheaper to account for than to crop right away declares
/// the margin with [`accumulate_delayed_shrink_size`](Self::accumulate_delayed_shrink_size);
/// the accumulated margin is realized by a single trim in
/// [`apply_delayed_shrink_size`](Self::apply_delayed_shrink_size) at the
/// end of the pipeline.
///
/// The trailing three axes are always (z, y, x). Leading channel or
/// batch axes are carried through untouched.
#[derive(Debug)]
pub struct Patch {
    pub image: Tensor,
    pub label: Tensor,
    delayed_shrink_size: [i64; 6],
}

impl Patch {
    pub fn new(image: Tensor, label: Tensor) -> Result<Self> {
        ensure!(
            image.size() == label.size(),
            "image and label shapes differ: {:?} vs {:?}",
            image.size(),
            label.size()
        );
        ensure!(
            image.dim() >= 3,
            "patch tensors must carry at least 3 axes, got {}",
            image.dim()
        );

        Ok(Self {
            image,
            label,
            delayed_shrink_size: [0; 6],
        })
    }

    pub fn shape(&self) -> Vec<i64> {
        self.image.size()
    }

    /// The (z, y, x) extent, i.e. the trailing three axes.
    pub fn spatial_shape(&self) -> [i64; 3] {
        let size = self.image.size();
        let rank = size.len();
        [size[rank - 3], size[rank - 2], size[rank - 1]]
    }

    /// The voxel at the middle of every axis. Recomputed on each call
    /// because the shape changes whenever the patch shrinks.
    pub fn center(&self) -> Vec<i64> {
        self.shape().into_iter().map(|extent| extent / 2).collect()
    }

    pub fn delayed_shrink_size(&self) -> [i64; 6] {
        self.delayed_shrink_size
    }

    /// Add `(low_z, low_y, low_x, high_z, high_y, high_x)` to the margin
    /// scheduled for the final trim. No array data moves here.
    pub fn accumulate_delayed_shrink_size(&mut self, size: [i64; 6]) {
        for (accumulated, addend) in self.delayed_shrink_size.iter_mut().zip(size) {
            *accumulated += addend;
        }
    }

    /// Trim `size[0..3]` voxels from the low ends and `size[3..6]` from
    /// the high ends of the (z, y, x) axes.
    pub fn shrink(&mut self, size: [i64; 6]) -> Result<()> {
        ensure!(
            size.iter().all(|&margin| margin >= 0),
            "shrink margins must be non-negative, got {:?}",
            size
        );

        let [depth, height, width] = self.spatial_shape();
        let [low_z, low_y, low_x, high_z, high_y, high_x] = size;
        ensure!(
            low_z + high_z < depth && low_y + high_y < height && low_x + high_x < width,
            "shrink margins {:?} exceed the patch extent {:?}",
            size,
            [depth, height, width]
        );

        let crop = |tensor: &Tensor| {
            tensor
                .narrow(-3, low_z, depth - low_z - high_z)
                .narrow(-2, low_y, height - low_y - high_y)
                .narrow(-1, low_x, width - low_x - high_x)
        };
        self.image = crop(&self.image);
        self.label = crop(&self.label);
        Ok(())
    }

    /// Realize the accumulated margin with one trim and reset it to
    /// zero. A second call in a row is a no-op.
    pub fn apply_delayed_shrink_size(&mut self) -> Result<()> {
        if self.delayed_shrink_size.iter().all(|&margin| margin == 0) {
            return Ok(());
        }
        let size = self.delayed_shrink_size;
        self.shrink(size)?;
        self.delayed_shrink_size = [0; 6];
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_patch(extent: i64) -> Patch {
        let image = Tensor::arange(extent * extent * extent, (Kind::Float, Device::Cpu))
            .view([extent, extent, extent]);
        let label = Tensor::ones(&[extent, extent, extent], (Kind::Float, Device::Cpu));
        Patch::new(image, label).unwrap()
    }

    #[test]
    fn rejects_shape_mismatch() {
        let image = Tensor::zeros(&[4, 4, 4], (Kind::Float, Device::Cpu));
        let label = Tensor::zeros(&[4, 4, 5], (Kind::Float, Device::Cpu));
        assert!(Patch::new(image, label).is_err());
    }

    #[test]
    fn shrink_trims_each_axis() {
        let mut patch = dummy_patch(8);
        patch.shrink([1, 2, 3, 1, 2, 3]).unwrap();
        assert_eq!(patch.shape(), vec![6, 4, 2]);
        assert_eq!(patch.image.size(), patch.label.size());

        // low-end margin of 1 on z drops the first section
        assert_eq!(f64::from(&patch.image.i((0, 0, 0))), {
            let (z, y, x) = (1, 2, 3);
            (z * 64 + y * 8 + x) as f64
        });
    }

    #[test]
    fn shrink_rejects_oversized_margins() {
        let mut patch = dummy_patch(4);
        assert!(patch.shrink([2, 0, 0, 2, 0, 0]).is_err());
        assert!(patch.shrink([-1, 0, 0, 0, 0, 0]).is_err());
    }

    #[test]
    fn delayed_shrink_accumulates() {
        let mut accumulated = dummy_patch(8);
        accumulated.accumulate_delayed_shrink_size([1, 0, 0, 1, 0, 0]);
        accumulated.accumulate_delayed_shrink_size([1, 0, 0, 1, 0, 0]);
        accumulated.apply_delayed_shrink_size().unwrap();

        let mut direct = dummy_patch(8);
        direct.shrink([2, 0, 0, 2, 0, 0]).unwrap();

        assert_eq!(accumulated.shape(), direct.shape());
        assert_eq!(accumulated.image, direct.image);
    }

    #[test]
    fn apply_delayed_shrink_is_idempotent() {
        let mut patch = dummy_patch(8);
        patch.accumulate_delayed_shrink_size([1, 1, 1, 1, 1, 1]);
        patch.apply_delayed_shrink_size().unwrap();
        assert_eq!(patch.shape(), vec![6, 6, 6]);
        assert_eq!(patch.delayed_shrink_size(), [0; 6]);

        patch.apply_delayed_shrink_size().unwrap();
        assert_eq!(patch.shape(), vec![6, 6, 6]);
    }

    #[test]
    fn center_tracks_shrinking() {
        let mut patch = dummy_patch(8);
        assert_eq!(patch.center(), vec![4, 4, 4]);
        patch.shrink([1, 1, 1, 1, 1, 1]).unwrap();
        assert_eq!(patch.center(), vec![3, 3, 3]);
    }

    #[test]
    fn leading_axes_pass_through() {
        let image = Tensor::zeros(&[1, 8, 8, 8], (Kind::Float, Device::Cpu));
        let label = Tensor::zeros(&[1, 8, 8, 8], (Kind::Float, Device::Cpu));
        let mut patch = Patch::new(image, label).unwrap();
        patch.shrink([2, 2, 2, 2, 2, 2]).unwrap();
        assert_eq!(patch.shape(), vec![1, 4, 4, 4]);
    }
}
