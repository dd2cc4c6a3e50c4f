//! Asynchronous patch stream.

use crate::{common::*, config::Config};

/// Fans patch construction out to a blocking worker pool. The core
/// pipeline itself is synchronous; all parallelism lives here.
#[derive(Debug)]
pub struct PatchStream {
    dataset: Arc<Dataset>,
    seed: u64,
}

impl PatchStream {
    pub fn new(config: &Config) -> Result<Self> {
        let pipeline = config.preprocessor.build_pipeline()?;
        let dataset = Dataset::load(&config.dataset, pipeline)?;
        Ok(Self {
            dataset: Arc::new(dataset),
            seed: config.stream.seed,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Produce `count` augmented patch records, unordered. Every worker
    /// derives its rng from the configured seed and the patch index, so
    /// a run replays exactly regardless of scheduling.
    pub fn stream(
        &self,
        count: usize,
    ) -> impl Stream<Item = Result<(usize, PatchRecord)>> + Send {
        let seed = self.seed;
        let dataset = self.dataset.clone();

        stream::iter(0..count).par_then_unordered(None, move |index| {
            let dataset = dataset.clone();
            async move {
                let record = tokio::task::spawn_blocking(move || -> Result<PatchRecord> {
                    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(index as u64));
                    let patch = dataset.random_training_patch(&mut rng)?;
                    Ok(patch.training_record())
                })
                .await??;
                anyhow::Ok((index, record))
            }
        })
    }
}
