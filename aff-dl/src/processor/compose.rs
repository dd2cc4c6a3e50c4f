use crate::{common::*, patch::Patch};

/// A randomized in-place patch transform.
pub trait PatchTransform
where
    Self: Debug + Send + Sync,
{
    /// The per-invocation activation probability.
    fn prob(&self) -> f64 {
        1.0
    }

    /// Apply the transform, drawing randomness from the threaded rng
    /// handle only.
    fn apply(&self, patch: &mut Patch, rng: &mut StdRng) -> Result<()>;

    /// The border margin this transform may contaminate. The pipeline
    /// accumulates it whether or not the transform fires, so the
    /// post-trim patch size is a pure function of the configuration.
    fn shrink_margin(&self) -> [i64; 6] {
        [0; 6]
    }
}

/// An ordered sequence of transform stages. Ordering is fixed at
/// construction time; every stage is gated by its own probability, and
/// the accumulated shrink margin is realized exactly once at the end.
#[derive(Debug)]
pub struct Compose {
    stages: Vec<Box<dyn PatchTransform>>,
}

impl Compose {
    pub fn new(stages: Vec<Box<dyn PatchTransform>>) -> Result<Self> {
        ensure!(
            !stages.is_empty(),
            "a transform pipeline needs at least one stage"
        );
        Ok(Self { stages })
    }

    /// The componentwise sum of the declared stage margins. The dataset
    /// layer grows the sampled patch by this amount ahead of the
    /// pipeline.
    pub fn shrink_margin(&self) -> [i64; 6] {
        self.stages
            .iter()
            .fold([0; 6], |mut accumulated, stage| {
                for (total, margin) in accumulated.iter_mut().zip(stage.shrink_margin()) {
                    *total += margin;
                }
                accumulated
            })
    }

    pub fn forward(&self, patch: &mut Patch, rng: &mut StdRng) -> Result<()> {
        for stage in &self.stages {
            if rng.gen::<f64>() < stage.prob() {
                stage.apply(patch, rng)?;
            }
            patch.accumulate_delayed_shrink_size(stage.shrink_margin());
        }
        patch.apply_delayed_shrink_size()
    }
}

/// Applies exactly one of its children, chosen uniformly at random per
/// invocation. The chosen child's own gate is bypassed.
#[derive(Debug)]
pub struct OneOf {
    prob: f64,
    children: Vec<Box<dyn PatchTransform>>,
}

impl OneOf {
    pub fn new(prob: R64, children: Vec<Box<dyn PatchTransform>>) -> Result<Self> {
        let prob = super::validate_prob(prob)?;
        ensure!(
            !children.is_empty(),
            "OneOf needs at least one child transform"
        );
        Ok(Self { prob, children })
    }
}

impl PatchTransform for OneOf {
    fn prob(&self) -> f64 {
        self.prob
    }

    fn apply(&self, patch: &mut Patch, rng: &mut StdRng) -> Result<()> {
        let index = rng.gen_range(0..self.children.len());
        self.children[index].apply(patch, rng)
    }

    /// The chosen child is unknown ahead of time; the componentwise
    /// maximum keeps the output size deterministic.
    fn shrink_margin(&self) -> [i64; 6] {
        self.children
            .iter()
            .fold([0; 6], |mut accumulated, child| {
                for (worst, margin) in accumulated.iter_mut().zip(child.shrink_margin()) {
                    *worst = (*worst).max(margin);
                }
                accumulated
            })
    }
}
