use super::{validate_prob, PatchTransform};
use crate::{common::*, patch::Patch};

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeInit {
    pub prob: R64,
}

impl NormalizeInit {
    pub fn build(self) -> Result<Normalize> {
        let Self { prob } = self;
        Ok(Normalize {
            prob: validate_prob(prob)?,
        })
    }
}

impl Default for NormalizeInit {
    fn default() -> Self {
        Self { prob: r64(1.0) }
    }
}

/// Rescale the raw image into [0, 1]. Byte images divide by 255; float
/// input is assumed to be scaled already and passes through.
#[derive(Debug, Clone)]
pub struct Normalize {
    prob: f64,
}

impl PatchTransform for Normalize {
    fn prob(&self) -> f64 {
        self.prob
    }

    fn apply(&self, patch: &mut Patch, _rng: &mut StdRng) -> Result<()> {
        patch.image = match patch.image.kind() {
            Kind::Uint8 => patch.image.to_kind(Kind::Float) / 255.0,
            _ => patch.image.to_kind(Kind::Float),
        };
        Ok(())
    }
}
