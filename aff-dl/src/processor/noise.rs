use super::{validate_prob, PatchTransform};
use crate::{common::*, patch::Patch};

#[derive(Debug, Clone, PartialEq)]
pub struct NoiseInit {
    pub prob: R64,
    pub max_amplitude: R64,
}

impl NoiseInit {
    pub fn build(self) -> Result<Noise> {
        let Self {
            prob,
            max_amplitude,
        } = self;
        let prob = validate_prob(prob)?;
        ensure!(
            max_amplitude > 0.0,
            "max_amplitude must be positive, got {}",
            max_amplitude
        );
        Ok(Noise {
            prob,
            max_amplitude: max_amplitude.raw(),
        })
    }
}

impl Default for NoiseInit {
    fn default() -> Self {
        Self {
            prob: r64(0.5),
            max_amplitude: r64(0.1),
        }
    }
}

/// Additive uniform voxel noise with a randomly drawn amplitude. The
/// noise comes from the threaded rng handle, not the tensor library's
/// global generator, so a seeded pipeline replays exactly.
#[derive(Debug, Clone)]
pub struct Noise {
    prob: f64,
    max_amplitude: f64,
}

impl PatchTransform for Noise {
    fn prob(&self) -> f64 {
        self.prob
    }

    fn apply(&self, patch: &mut Patch, rng: &mut StdRng) -> Result<()> {
        let amplitude = rng.gen_range(0.0..self.max_amplitude);
        if amplitude <= f64::EPSILON {
            return Ok(());
        }

        let numel = patch.image.numel();
        let values: Vec<f32> = (0..numel)
            .map(|_| rng.gen_range(-amplitude..amplitude) as f32)
            .collect();
        let noise = Tensor::of_slice(&values)
            .view(patch.image.size().as_slice())
            .to_device(patch.image.device());

        patch.image = (patch.image.to_kind(Kind::Float) + noise).clamp(0.0, 1.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_is_bounded_and_reproducible() {
        let image = Tensor::full(&[6, 6, 6], 0.5, (Kind::Float, Device::Cpu));
        let label = Tensor::zeros(&[6, 6, 6], (Kind::Float, Device::Cpu));

        let noise = NoiseInit::default().build().unwrap();

        let mut first = Patch::new(image.copy(), label.copy()).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        noise.apply(&mut first, &mut rng).unwrap();

        let deviation = f64::from(&(&first.image - &image).abs().max());
        assert!(deviation > 0.0);
        assert!(deviation <= 0.1 + 1e-6);

        // the same seed replays the same noise field
        let mut second = Patch::new(image.copy(), label).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        noise.apply(&mut second, &mut rng).unwrap();
        assert_eq!(first.image, second.image);
    }

    #[test]
    fn rejects_zero_amplitude() {
        let init = NoiseInit {
            prob: r64(0.5),
            max_amplitude: r64(0.0),
        };
        assert!(init.build().is_err());
    }
}
