use super::{validate_prob, PatchTransform};
use crate::{common::*, patch::Patch};

#[derive(Debug, Clone, PartialEq)]
pub struct IntensityPerturbationInit {
    pub prob: R64,
    pub max_contrast: R64,
    pub max_brightness: R64,
}

impl IntensityPerturbationInit {
    pub fn build(self) -> Result<IntensityPerturbation> {
        let Self {
            prob,
            max_contrast,
            max_brightness,
        } = self;
        let prob = validate_prob(prob)?;
        ensure!(
            max_contrast >= 0.0,
            "max_contrast must be non-negative, got {}",
            max_contrast
        );
        ensure!(
            max_brightness >= 0.0,
            "max_brightness must be non-negative, got {}",
            max_brightness
        );
        Ok(IntensityPerturbation {
            prob,
            max_contrast: max_contrast.raw(),
            max_brightness: max_brightness.raw(),
        })
    }
}

impl Default for IntensityPerturbationInit {
    fn default() -> Self {
        Self {
            prob: r64(0.5),
            max_contrast: r64(0.3),
            max_brightness: r64(0.3),
        }
    }
}

/// Random global contrast/brightness jitter,
/// `image * (1 + c) + b` clamped back into [0, 1].
#[derive(Debug, Clone)]
pub struct IntensityPerturbation {
    prob: f64,
    max_contrast: f64,
    max_brightness: f64,
}

impl PatchTransform for IntensityPerturbation {
    fn prob(&self) -> f64 {
        self.prob
    }

    fn apply(&self, patch: &mut Patch, rng: &mut StdRng) -> Result<()> {
        let draw = |rng: &mut StdRng, max: f64| {
            if max > 0.0 {
                rng.gen_range(-max..max)
            } else {
                0.0
            }
        };
        let contrast = draw(rng, self.max_contrast);
        let brightness = draw(rng, self.max_brightness);

        patch.image = (patch.image.to_kind(Kind::Float) * (1.0 + contrast) + brightness)
            .clamp(0.0, 1.0);
        Ok(())
    }
}
