use super::Volume;
use crate::{common::*, patch::Patch, utils};

/// One annotated region: a segmentation volume plus one or more aligned
/// image versions covering it. Each drawn patch picks an image version
/// at random.
#[derive(Debug)]
pub struct Sample {
    images: Vec<Arc<Volume>>,
    label: Arc<Volume>,
    patch_size: Cartesian<i64>,
}

impl Sample {
    /// `patch_size` is the extent drawn from the volumes, i.e. the
    /// output patch size grown by the transform pipeline's margin.
    pub fn new(
        images: Vec<Arc<Volume>>,
        label: Arc<Volume>,
        patch_size: Cartesian<i64>,
    ) -> Result<Self> {
        ensure!(
            !images.is_empty(),
            "sample '{}' needs at least one image version",
            label.name()
        );
        for image in &images {
            ensure!(
                image.bounding_box().contains_cuboid(&label.bounding_box()),
                "image '{}' does not cover label '{}'",
                image.name(),
                label.name()
            );
        }

        let extent = label.extent();
        ensure!(
            patch_size.z >= 1 && patch_size.y >= 1 && patch_size.x >= 1,
            "patch size {:?} must be positive on every axis",
            patch_size.to_array()
        );
        ensure!(
            patch_size.z <= extent.z && patch_size.y <= extent.y && patch_size.x <= extent.x,
            "patch size {:?} exceeds the extent {:?} of label '{}'",
            patch_size.to_array(),
            extent.to_array(),
            label.name()
        );

        Ok(Self {
            images,
            label,
            patch_size,
        })
    }

    pub fn patch_size(&self) -> Cartesian<i64> {
        self.patch_size
    }

    /// A uniformly random in-bounds bounding box of the patch extent.
    fn random_bbox(&self, rng: &mut StdRng) -> Cuboid<i64> {
        let region = self.label.bounding_box();
        let start = Cartesian::new(
            rng.gen_range(region.start().z..=region.stop().z - self.patch_size.z),
            rng.gen_range(region.start().y..=region.stop().y - self.patch_size.y),
            rng.gen_range(region.start().x..=region.stop().x - self.patch_size.x),
        );
        Cuboid::from_corners(start, start + self.patch_size)
    }

    pub fn random_patch(&self, rng: &mut StdRng) -> Result<Patch> {
        let bbox = self.random_bbox(rng);
        let version = rng.gen_range(0..self.images.len());
        let image = self.images[version].cutout(&bbox)?;
        let label = self.label.cutout(&bbox)?;
        Patch::new(image, label)
    }
}

/// A point-annotated sample: every patch centers on a randomly chosen
/// annotation, and the label is a Gaussian point-target mask rendered
/// from the annotations falling inside the box, re-anchored into
/// patch-local coordinates.
#[derive(Debug)]
pub struct SampleWithPointAnnotation {
    images: Vec<Arc<Volume>>,
    points: Vec<Cartesian<i64>>,
    patch_size: Cartesian<i64>,
    sigma: f64,
}

impl SampleWithPointAnnotation {
    pub fn new(
        images: Vec<Arc<Volume>>,
        points: Vec<Cartesian<i64>>,
        patch_size: Cartesian<i64>,
        sigma: f64,
    ) -> Result<Self> {
        ensure!(
            !images.is_empty(),
            "a point-annotated sample needs at least one image version"
        );
        ensure!(sigma > 0.0, "sigma must be positive, got {}", sigma);

        // keep only annotations whose centered patch stays inside every
        // image version
        let total = points.len();
        let points: Vec<_> = points
            .into_iter()
            .filter(|point| {
                Cuboid::try_from_center_extent(*point, patch_size)
                    .map(|bbox| {
                        images
                            .iter()
                            .all(|image| image.bounding_box().contains_cuboid(&bbox))
                    })
                    .unwrap_or(false)
            })
            .collect();
        if points.len() < total {
            warn!(
                "dropped {} of {} annotations too close to the volume boundary",
                total - points.len(),
                total
            );
        }
        ensure!(
            !points.is_empty(),
            "no annotation leaves room for a {:?} patch",
            patch_size.to_array()
        );

        Ok(Self {
            images,
            points,
            patch_size,
            sigma,
        })
    }

    pub fn num_annotations(&self) -> usize {
        self.points.len()
    }

    pub fn random_patch(&self, rng: &mut StdRng) -> Result<Patch> {
        let center = self.points[rng.gen_range(0..self.points.len())];
        let bbox = Cuboid::try_from_center_extent(center, self.patch_size)?;

        let version = rng.gen_range(0..self.images.len());
        let image = self.images[version].cutout(&bbox)?;
        let label = self.render_point_mask(&bbox)?;
        Patch::new(image, label)
    }

    /// A smoothed point mask with unit peaks at the annotations.
    fn render_point_mask(&self, bbox: &Cuboid<i64>) -> Result<Tensor> {
        let extent = bbox.extent();
        let mask = Tensor::zeros(
            &[extent.z, extent.y, extent.x],
            (Kind::Float, Device::Cpu),
        );
        for point in &self.points {
            if !bbox.contains_point(point) {
                continue;
            }
            let local = *point - bbox.start();
            let _ = mask.i((local.z, local.y, local.x)).fill_(1.0);
        }

        let smoothed = utils::gaussian_blur_3d(&mask, [self.sigma; 3])?;
        let peak = f64::from(&smoothed.max()).max(1e-6);
        Ok(smoothed / peak)
    }
}
