use super::{validate_prob, PatchTransform};
use crate::{common::*, patch::Patch};

#[derive(Debug, Clone, PartialEq)]
pub struct TransposeInit {
    pub prob: R64,
}

impl TransposeInit {
    pub fn build(self) -> Result<Transpose> {
        let Self { prob } = self;
        Ok(Transpose {
            prob: validate_prob(prob)?,
        })
    }
}

impl Default for TransposeInit {
    fn default() -> Self {
        Self { prob: r64(0.5) }
    }
}

/// Swap the Y and X axes. Sections must be square; the anisotropic z
/// axis is never rotated into the section plane.
#[derive(Debug, Clone)]
pub struct Transpose {
    prob: f64,
}

impl PatchTransform for Transpose {
    fn prob(&self) -> f64 {
        self.prob
    }

    fn apply(&self, patch: &mut Patch, _rng: &mut StdRng) -> Result<()> {
        let [_depth, height, width] = patch.spatial_shape();
        ensure!(
            height == width,
            "transposing needs square sections, got {} x {}",
            height,
            width
        );

        patch.image = patch.image.transpose(-1, -2).contiguous();
        patch.label = patch.label.transpose(-1, -2).contiguous();
        Ok(())
    }
}
