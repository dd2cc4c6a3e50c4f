use super::{validate_prob, PatchTransform};
use crate::{common::*, patch::Patch, utils};

#[derive(Debug, Clone, PartialEq)]
pub struct GaussianBlur2DInit {
    pub prob: R64,
    pub min_sigma: R64,
    pub max_sigma: R64,
}

impl GaussianBlur2DInit {
    pub fn build(self) -> Result<GaussianBlur2D> {
        let Self {
            prob,
            min_sigma,
            max_sigma,
        } = self;
        let prob = validate_prob(prob)?;
        ensure!(min_sigma > 0.0, "min_sigma must be positive, got {}", min_sigma);
        ensure!(
            min_sigma < max_sigma,
            "min_sigma must be below max_sigma, got {} vs {}",
            min_sigma,
            max_sigma
        );
        Ok(GaussianBlur2D {
            prob,
            min_sigma: min_sigma.raw(),
            max_sigma: max_sigma.raw(),
        })
    }
}

impl Default for GaussianBlur2DInit {
    fn default() -> Self {
        Self {
            prob: r64(0.5),
            min_sigma: r64(0.5),
            max_sigma: r64(2.0),
        }
    }
}

/// Per-section 2-D Gaussian blur with a randomly drawn sigma. Sections
/// are smoothed independently; the anisotropic z axis is never mixed.
#[derive(Debug, Clone)]
pub struct GaussianBlur2D {
    prob: f64,
    min_sigma: f64,
    max_sigma: f64,
}

impl PatchTransform for GaussianBlur2D {
    fn prob(&self) -> f64 {
        self.prob
    }

    fn apply(&self, patch: &mut Patch, rng: &mut StdRng) -> Result<()> {
        let sigma = rng.gen_range(self.min_sigma..self.max_sigma);

        let size = patch.image.size();
        let rank = size.len();
        let (height, width) = (size[rank - 2], size[rank - 1]);

        let sections = patch
            .image
            .to_kind(Kind::Float)
            .reshape(&[-1, height, width]);
        patch.image = utils::gaussian_blur_2d(&sections, sigma)?.reshape(&size);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blur_preserves_shape_and_label() {
        let image = Tensor::rand(&[4, 16, 16], (Kind::Float, Device::Cpu));
        let label = Tensor::ones(&[4, 16, 16], (Kind::Float, Device::Cpu));
        let mut patch = Patch::new(image.copy(), label.copy()).unwrap();

        let blur = GaussianBlur2DInit::default().build().unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        blur.apply(&mut patch, &mut rng).unwrap();

        assert_eq!(patch.image.size(), vec![4, 16, 16]);
        assert_eq!(patch.label, label);
        // smoothing actually happened
        assert!(f64::from(&(&patch.image - &image).abs().sum(Kind::Float)) > 0.0);
    }

    #[test]
    fn rejects_inverted_sigma_range() {
        let init = GaussianBlur2DInit {
            prob: r64(0.5),
            min_sigma: r64(2.0),
            max_sigma: r64(1.0),
        };
        assert!(init.build().is_err());
    }
}
