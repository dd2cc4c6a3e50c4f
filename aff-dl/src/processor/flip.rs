use super::{validate_prob, PatchTransform};
use crate::{common::*, patch::Patch};

#[derive(Debug, Clone, PartialEq)]
pub struct FlipInit {
    pub prob: R64,
}

impl FlipInit {
    pub fn build(self) -> Result<Flip> {
        let Self { prob } = self;
        Ok(Flip {
            prob: validate_prob(prob)?,
        })
    }
}

impl Default for FlipInit {
    fn default() -> Self {
        Self { prob: r64(0.5) }
    }
}

/// Reverse each spatial axis independently with probability 1/2.
#[derive(Debug, Clone)]
pub struct Flip {
    prob: f64,
}

impl PatchTransform for Flip {
    fn prob(&self) -> f64 {
        self.prob
    }

    fn apply(&self, patch: &mut Patch, rng: &mut StdRng) -> Result<()> {
        let axes: Vec<i64> = [-3i64, -2, -1]
            .into_iter()
            .filter(|_| rng.gen::<bool>())
            .collect();
        if axes.is_empty() {
            return Ok(());
        }

        patch.image = patch.image.flip(&axes);
        patch.label = patch.label.flip(&axes);
        Ok(())
    }
}
