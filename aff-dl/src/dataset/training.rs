use super::{Sample, Volume};
use crate::{affinity_patch::AffinityPatch, common::*, processor::Compose};

/// The patch extent used when the config leaves it unspecified.
pub const DEFAULT_PATCH_SIZE: [i64; 3] = [128, 128, 128];

/// Dataset construction options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// The patch extent handed to the network, i.e. after the transform
    /// pipeline's trim.
    #[serde(default = "default_patch_size")]
    pub patch_size: [i64; 3],
    pub volumes: Vec<VolumeSpec>,
}

fn default_patch_size() -> [i64; 3] {
    DEFAULT_PATCH_SIZE
}

/// One annotated region on disk. Several image paths list alternative
/// alignments of the same region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeSpec {
    pub name: String,
    pub image_paths: Vec<PathBuf>,
    pub label_path: PathBuf,
    /// Origin of the region in global voxel coordinates.
    #[serde(default)]
    pub offset: [i64; 3],
}

/// A collection of named samples sharing one transform pipeline.
/// Patches are drawn from the volumes at `patch_size_before_transform`
/// so that the pipeline's accumulated trim lands exactly on
/// `patch_size`.
#[derive(Debug)]
pub struct Dataset {
    samples: IndexMap<String, Sample>,
    transform: Compose,
    patch_size: Cartesian<i64>,
    patch_size_before_transform: Cartesian<i64>,
}

impl Dataset {
    /// Open every volume named by `config` and assemble the dataset.
    pub fn load(config: &DatasetConfig, transform: Compose) -> Result<Self> {
        let patch_size = Cartesian::from(config.patch_size);
        let before = patch_size_before_transform(patch_size, &transform)?;

        let samples: IndexMap<String, Sample> = config
            .volumes
            .iter()
            .map(|spec| {
                let offset = Cartesian::from(spec.offset);
                let images: Vec<Arc<Volume>> = spec
                    .image_paths
                    .iter()
                    .map(|path| Ok(Arc::new(Volume::open_npy(&spec.name, path, offset)?)))
                    .collect::<Result<_>>()?;
                let label = Arc::new(Volume::open_npy(
                    format!("{}/label", spec.name),
                    &spec.label_path,
                    offset,
                )?);
                let sample = Sample::new(images, label, before)?;
                Ok((spec.name.clone(), sample))
            })
            .collect::<Result<_>>()?;

        info!(
            "loaded {} samples, drawing {:?} patches for {:?} outputs",
            samples.len(),
            before.to_array(),
            patch_size.to_array()
        );
        Self::new(samples, transform, patch_size)
    }

    /// Assemble a dataset from already-opened samples. Every sample
    /// must draw patches at the pre-transform extent.
    pub fn new(
        samples: IndexMap<String, Sample>,
        transform: Compose,
        patch_size: Cartesian<i64>,
    ) -> Result<Self> {
        ensure!(!samples.is_empty(), "a dataset needs at least one sample");
        let before = patch_size_before_transform(patch_size, &transform)?;
        for (name, sample) in &samples {
            ensure!(
                sample.patch_size() == before,
                "sample '{}' draws {:?} patches, the pipeline needs {:?}",
                name,
                sample.patch_size().to_array(),
                before.to_array()
            );
        }

        Ok(Self {
            samples,
            transform,
            patch_size,
            patch_size_before_transform: before,
        })
    }

    pub fn patch_size(&self) -> Cartesian<i64> {
        self.patch_size
    }

    pub fn patch_size_before_transform(&self) -> Cartesian<i64> {
        self.patch_size_before_transform
    }

    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    /// Draw one augmented training patch: pick a sample, cut a random
    /// oversized patch, run the pipeline, and derive the targets.
    pub fn random_training_patch(&self, rng: &mut StdRng) -> Result<AffinityPatch> {
        let index = rng.gen_range(0..self.samples.len());
        let (name, sample) = self.samples.get_index(index).unwrap();

        let mut patch = sample.random_patch(rng)?;
        self.transform
            .forward(&mut patch, rng)
            .with_context(|| format!("augmenting a patch of sample '{}'", name))?;

        let produced = patch.spatial_shape();
        ensure!(
            produced == self.patch_size.to_array(),
            "pipeline produced a {:?} patch of sample '{}', expected {:?}",
            produced,
            name,
            self.patch_size.to_array()
        );

        AffinityPatch::new(patch.image, patch.label)
    }
}

/// The patch extent to draw from the volumes: the output size grown by
/// the pipeline's accumulated margin.
fn patch_size_before_transform(
    patch_size: Cartesian<i64>,
    transform: &Compose,
) -> Result<Cartesian<i64>> {
    ensure!(
        patch_size.z >= 1 && patch_size.y >= 1 && patch_size.x >= 1,
        "patch size {:?} must be positive on every axis",
        patch_size.to_array()
    );
    let margin = transform.shrink_margin();
    Ok(Cartesian::new(
        patch_size.z + margin[0] + margin[3],
        patch_size.y + margin[1] + margin[4],
        patch_size.x + margin[2] + margin[5],
    ))
}
