use super::{validate_prob, PatchTransform};
use crate::{common::*, patch::Patch};

#[derive(Debug, Clone, PartialEq)]
pub struct Perspective2DInit {
    pub prob: R64,
    /// The farthest any pixel may move in-plane, in voxels.
    pub max_shift: i64,
}

impl Perspective2DInit {
    pub fn build(self) -> Result<Perspective2D> {
        let Self { prob, max_shift } = self;
        let prob = validate_prob(prob)?;
        ensure!(max_shift >= 1, "max_shift must be at least 1, got {}", max_shift);
        Ok(Perspective2D { prob, max_shift })
    }
}

impl Default for Perspective2DInit {
    fn default() -> Self {
        Self {
            prob: r64(0.5),
            max_shift: 2,
        }
    }
}

/// Random projective warp of every section, one homography per patch.
/// The image is sampled bilinearly and the label nearest-neighbor, so
/// label ids never blend. The zero-padded border band is declared as a
/// shrink margin instead of being cropped here.
#[derive(Debug, Clone)]
pub struct Perspective2D {
    prob: f64,
    max_shift: i64,
}

impl PatchTransform for Perspective2D {
    fn prob(&self) -> f64 {
        self.prob
    }

    fn apply(&self, patch: &mut Patch, rng: &mut StdRng) -> Result<()> {
        let size = patch.image.size();
        let rank = size.len();
        let (height, width) = (size[rank - 2], size[rank - 1]);
        ensure!(
            height >= 2 && width >= 2,
            "sections of extent {:?} are too small to warp",
            (height, width)
        );

        // coefficients sized so no pixel moves farther than max_shift
        // voxels; four matrix terms contribute to each coordinate
        let bound = self.max_shift as f64 * 2.0 / height.min(width) as f64;
        let coefficient = bound / 4.0;
        let mut draw = || rng.gen_range(-coefficient..coefficient);
        #[rustfmt::skip]
        let elements: [f32; 9] = [
            (1.0 + draw()) as f32, draw() as f32,         draw() as f32,
            draw() as f32,         (1.0 + draw()) as f32, draw() as f32,
            draw() as f32,         draw() as f32,         1.0,
        ];

        let device = patch.image.device();
        let homography = Tensor::of_slice(&elements).view([3, 3]).to_device(device);

        // map output pixel coordinates through the homography in the
        // sampler's normalized [-1, 1] space
        let ys = Tensor::linspace(-1.0, 1.0, height, (Kind::Float, device));
        let xs = Tensor::linspace(-1.0, 1.0, width, (Kind::Float, device));
        let grid_y = ys.view([height, 1]).expand(&[height, width], true);
        let grid_x = xs.view([1, width]).expand(&[height, width], true);
        let ones = Tensor::ones(&[height, width], (Kind::Float, device));

        let coords = Tensor::stack(&[grid_x, grid_y, ones], 2).view([-1, 3]);
        let mapped = coords.matmul(&homography.transpose(0, 1));
        // the denominator stays near 1 for the shift bounds build() accepts
        let denominator = mapped.narrow(1, 2, 1).clamp_min(1e-3);
        let grid = (mapped.narrow(1, 0, 2) / denominator).view([1, height, width, 2]);

        let batch: i64 = size[..rank - 2].iter().product();
        let grid = grid.expand(&[batch, height, width, 2], true);

        patch.image = patch
            .image
            .to_kind(Kind::Float)
            .reshape(&[batch, 1, height, width])
            .grid_sampler(&grid, 0, 0, false)
            .reshape(&size);

        let label_kind = patch.label.kind();
        patch.label = patch
            .label
            .to_kind(Kind::Float)
            .reshape(&[batch, 1, height, width])
            .grid_sampler(&grid, 1, 0, false)
            .reshape(&size)
            .to_kind(label_kind);

        Ok(())
    }

    fn shrink_margin(&self) -> [i64; 6] {
        [0, self.max_shift, self.max_shift, 0, self.max_shift, self.max_shift]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils;

    #[test]
    fn warp_preserves_shape_and_label_ids() {
        let image = Tensor::rand(&[4, 16, 16], (Kind::Float, Device::Cpu));
        let label = Tensor::zeros(&[4, 16, 16], (Kind::Int64, Device::Cpu));
        let _ = label.i((.., ..8, ..)).fill_(1);
        let _ = label.i((.., 8.., ..)).fill_(2);
        let mut patch = Patch::new(image, label).unwrap();

        let warp = Perspective2DInit::default().build().unwrap();
        let mut rng = StdRng::seed_from_u64(13);
        warp.apply(&mut patch, &mut rng).unwrap();

        assert_eq!(patch.image.size(), vec![4, 16, 16]);
        assert_eq!(patch.label.size(), vec![4, 16, 16]);
        assert_eq!(patch.label.kind(), Kind::Int64);

        // nearest sampling never invents label ids
        let ids = utils::unique_labels(&patch.label);
        assert!(ids.iter().all(|id| [0, 1, 2].contains(id)));
    }

    #[test]
    fn declares_in_plane_margin() {
        let warp = Perspective2DInit {
            prob: r64(0.5),
            max_shift: 1,
        }
        .build()
        .unwrap();
        assert_eq!(warp.shrink_margin(), [0, 1, 1, 0, 1, 1]);
    }
}
