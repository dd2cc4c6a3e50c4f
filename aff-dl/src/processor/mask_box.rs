use super::{validate_prob, PatchTransform};
use crate::{common::*, patch::Patch};

#[derive(Debug, Clone, PartialEq)]
pub struct MaskBoxInit {
    pub prob: R64,
    pub max_boxes: usize,
    pub max_ratio: R64,
}

impl MaskBoxInit {
    pub fn build(self) -> Result<MaskBox> {
        let Self {
            prob,
            max_boxes,
            max_ratio,
        } = self;
        let prob = validate_prob(prob)?;
        ensure!(max_boxes >= 1, "max_boxes must be at least 1");
        ensure!(
            (0.0..=1.0).contains(&max_ratio.raw()) && max_ratio > 0.0,
            "max_ratio must lie in (0, 1], got {}",
            max_ratio
        );
        Ok(MaskBox {
            prob,
            max_boxes,
            max_ratio: max_ratio.raw(),
        })
    }
}

impl Default for MaskBoxInit {
    fn default() -> Self {
        Self {
            prob: r64(0.5),
            max_boxes: 3,
            max_ratio: r64(0.3),
        }
    }
}

/// Zero out a random number of random axis-aligned boxes in the image,
/// each side at most `max_ratio` of that axis. The label is untouched.
#[derive(Debug, Clone)]
pub struct MaskBox {
    prob: f64,
    max_boxes: usize,
    max_ratio: f64,
}

impl PatchTransform for MaskBox {
    fn prob(&self) -> f64 {
        self.prob
    }

    fn apply(&self, patch: &mut Patch, rng: &mut StdRng) -> Result<()> {
        let spatial = patch.spatial_shape();
        let count = rng.gen_range(1..=self.max_boxes);

        for _ in 0..count {
            let mut origin = [0i64; 3];
            let mut extent = [0i64; 3];
            for (axis, &axis_len) in spatial.iter().enumerate() {
                let longest = ((axis_len as f64 * self.max_ratio) as i64).max(1);
                extent[axis] = rng.gen_range(1..=longest.min(axis_len));
                origin[axis] = rng.gen_range(0..=axis_len - extent[axis]);
            }

            let _ = patch
                .image
                .narrow(-3, origin[0], extent[0])
                .narrow(-2, origin[1], extent[1])
                .narrow(-1, origin[2], extent[2])
                .fill_(0.0);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_only_the_image() {
        let image = Tensor::ones(&[8, 8, 8], (Kind::Float, Device::Cpu));
        let label = Tensor::ones(&[8, 8, 8], (Kind::Float, Device::Cpu));
        let mut patch = Patch::new(image, label.copy()).unwrap();

        let mask = MaskBoxInit {
            prob: r64(1.0),
            max_boxes: 2,
            max_ratio: r64(0.5),
        }
        .build()
        .unwrap();

        let mut rng = StdRng::seed_from_u64(5);
        mask.apply(&mut patch, &mut rng).unwrap();

        let zeroed = i64::from(&patch.image.eq(0.0).to_kind(Kind::Int64).sum(Kind::Int64));
        assert!(zeroed > 0);
        assert_eq!(patch.label, label);
    }
}
