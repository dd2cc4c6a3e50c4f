use super::{validate_prob, PatchTransform};
use crate::{common::*, patch::Patch};

#[derive(Debug, Clone, PartialEq)]
pub struct DropSectionInit {
    pub prob: R64,
}

impl DropSectionInit {
    pub fn build(self) -> Result<DropSection> {
        let Self { prob } = self;
        Ok(DropSection {
            prob: validate_prob(prob)?,
        })
    }
}

impl Default for DropSectionInit {
    fn default() -> Self {
        Self { prob: r64(0.5) }
    }
}

/// Simulate a lost section: one random interior z-section disappears,
/// deeper sections shift up, and the deepest section is duplicated to
/// keep the shape. The duplicate is declared as a high-z shrink margin
/// and trimmed at pipeline end.
#[derive(Debug, Clone)]
pub struct DropSection {
    prob: f64,
}

impl PatchTransform for DropSection {
    fn prob(&self) -> f64 {
        self.prob
    }

    fn apply(&self, patch: &mut Patch, rng: &mut StdRng) -> Result<()> {
        let [depth, _height, _width] = patch.spatial_shape();
        ensure!(
            depth >= 3,
            "dropping a section needs at least 3 sections, got {}",
            depth
        );
        let section = rng.gen_range(1..depth - 1);

        let drop = |tensor: &Tensor| {
            let kept = Tensor::cat(
                &[
                    tensor.narrow(-3, 0, section),
                    tensor.narrow(-3, section + 1, depth - section - 1),
                ],
                -3,
            );
            let last = kept.narrow(-3, depth - 2, 1);
            Tensor::cat(&[kept.shallow_clone(), last], -3)
        };
        patch.image = drop(&patch.image);
        patch.label = drop(&patch.label);
        Ok(())
    }

    fn shrink_margin(&self) -> [i64; 6] {
        [0, 0, 0, 1, 0, 0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deeper_sections_shift_up() {
        // sections hold their own index
        let image = Tensor::arange(6, (Kind::Float, Device::Cpu))
            .view([6, 1, 1])
            .expand(&[6, 4, 4], true)
            .contiguous();
        let label = image.copy();
        let mut patch = Patch::new(image, label).unwrap();

        let drop = DropSectionInit { prob: r64(1.0) }.build().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        drop.apply(&mut patch, &mut rng).unwrap();

        assert_eq!(patch.shape(), vec![6, 4, 4]);

        let sections: Vec<f64> = (0..6)
            .map(|section| f64::from(&patch.image.i((section, 0, 0))))
            .collect();
        // one index is missing, the rest keep their order, and the
        // deepest section is duplicated
        let dropped: Vec<f64> = (0..6i64)
            .map(|index| index as f64)
            .filter(|index| !sections.contains(index))
            .collect();
        assert_eq!(dropped.len(), 1);
        assert_eq!(sections[4], 5.0);
        assert_eq!(sections[5], 5.0);

        assert_eq!(drop.shrink_margin(), [0, 0, 0, 1, 0, 0]);
    }

    #[test]
    fn needs_interior_sections() {
        let image = Tensor::zeros(&[2, 4, 4], (Kind::Float, Device::Cpu));
        let label = Tensor::zeros(&[2, 4, 4], (Kind::Float, Device::Cpu));
        let mut patch = Patch::new(image, label).unwrap();

        let drop = DropSectionInit::default().build().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(drop.apply(&mut patch, &mut rng).is_err());
    }
}
