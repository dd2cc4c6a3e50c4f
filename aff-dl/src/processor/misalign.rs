use super::{validate_prob, PatchTransform};
use crate::{common::*, patch::Patch};

#[derive(Debug, Clone, PartialEq)]
pub struct MisalignInit {
    pub prob: R64,
    /// The largest in-plane offset per axis, in voxels.
    pub max_offset: i64,
}

impl MisalignInit {
    pub fn build(self) -> Result<Misalign> {
        let Self { prob, max_offset } = self;
        let prob = validate_prob(prob)?;
        ensure!(
            max_offset >= 1,
            "max_offset must be at least 1, got {}",
            max_offset
        );
        Ok(Misalign { prob, max_offset })
    }
}

impl Default for MisalignInit {
    fn default() -> Self {
        Self {
            prob: r64(0.5),
            max_offset: 2,
        }
    }
}

/// Simulate mis-registered serial sections: every section at or deeper
/// than a random z is translated by one random in-plane offset, with
/// zero fill on the exposed border. The border band is declared as a
/// shrink margin on all four in-plane sides.
#[derive(Debug, Clone)]
pub struct Misalign {
    prob: f64,
    max_offset: i64,
}

impl Misalign {
    /// Zero-fill translate over the trailing (y, x) axes.
    fn translate(tensor: &Tensor, offset_y: i64, offset_x: i64) -> Tensor {
        let size = tensor.size();
        let rank = size.len();
        let (height, width) = (size[rank - 2], size[rank - 1]);

        let shifted = tensor.zeros_like();
        let span_y = height - offset_y.abs();
        let span_x = width - offset_x.abs();
        if span_y <= 0 || span_x <= 0 {
            return shifted;
        }

        let source = tensor
            .narrow(-2, (-offset_y).max(0), span_y)
            .narrow(-1, (-offset_x).max(0), span_x);
        shifted
            .narrow(-2, offset_y.max(0), span_y)
            .narrow(-1, offset_x.max(0), span_x)
            .copy_(&source);
        shifted
    }
}

impl PatchTransform for Misalign {
    fn prob(&self) -> f64 {
        self.prob
    }

    fn apply(&self, patch: &mut Patch, rng: &mut StdRng) -> Result<()> {
        let [depth, _height, _width] = patch.spatial_shape();
        ensure!(
            depth >= 2,
            "misalignment needs at least 2 sections, got {}",
            depth
        );

        let offset_y = rng.gen_range(-self.max_offset..=self.max_offset);
        let offset_x = rng.gen_range(-self.max_offset..=self.max_offset);
        if offset_y == 0 && offset_x == 0 {
            return Ok(());
        }
        let from_section = rng.gen_range(1..depth);

        let misalign = |tensor: &Tensor| {
            let head = tensor.narrow(-3, 0, from_section);
            let tail = Self::translate(
                &tensor.narrow(-3, from_section, depth - from_section),
                offset_y,
                offset_x,
            );
            Tensor::cat(&[head, tail], -3)
        };
        patch.image = misalign(&patch.image);
        patch.label = misalign(&patch.label);
        Ok(())
    }

    fn shrink_margin(&self) -> [i64; 6] {
        [0, self.max_offset, self.max_offset, 0, self.max_offset, self.max_offset]
    }
}
