use crate::common::*;

/// A named dense volume anchored at an origin offset in the global
/// coordinate space. Immutable once opened.
#[derive(Debug)]
pub struct Volume {
    name: String,
    tensor: Tensor,
    offset: Cartesian<i64>,
}

// cutouts only read the tensor, which never changes after opening
unsafe impl Sync for Volume {}

impl Volume {
    pub fn from_tensor(
        name: impl Into<String>,
        tensor: Tensor,
        offset: Cartesian<i64>,
    ) -> Result<Self> {
        let name = name.into();
        ensure!(
            tensor.dim() == 3,
            "volume '{}' must be 3-D, got {} axes",
            name,
            tensor.dim()
        );
        Ok(Self {
            name,
            tensor,
            offset,
        })
    }

    /// Open a `.npy` volume anchored at `offset`.
    pub fn open_npy(
        name: impl Into<String>,
        path: impl AsRef<Path>,
        offset: Cartesian<i64>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let tensor = Tensor::read_npy(path)
            .with_context(|| format!("failed to read volume from '{}'", path.display()))?;
        Self::from_tensor(name, tensor, offset)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extent(&self) -> Cartesian<i64> {
        let size = self.tensor.size();
        Cartesian::new(size[0], size[1], size[2])
    }

    /// The box this volume covers in global coordinates.
    pub fn bounding_box(&self) -> Cuboid<i64> {
        Cuboid::from_corners(self.offset, self.offset + self.extent())
    }

    /// Cut out the boxed sub-volume as a fresh tensor. Requests leaving
    /// the covered region are errors, never silently clamped.
    pub fn cutout(&self, bbox: &Cuboid<i64>) -> Result<Tensor> {
        ensure!(
            self.bounding_box().contains_cuboid(bbox),
            "cutout {:?}..{:?} leaves volume '{}' covering {:?}..{:?}",
            bbox.start().to_array(),
            bbox.stop().to_array(),
            self.name,
            self.bounding_box().start().to_array(),
            self.bounding_box().stop().to_array(),
        );

        let local = bbox.translate(self.offset * -1);
        let start = local.start();
        let extent = local.extent();
        Ok(self
            .tensor
            .narrow(0, start.z, extent.z)
            .narrow(1, start.y, extent.y)
            .narrow(2, start.x, extent.x)
            .copy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_3d_volumes() {
        let tensor = Tensor::zeros(&[4, 4], (Kind::Float, Device::Cpu));
        assert!(Volume::from_tensor("flat", tensor, Cartesian::zeros()).is_err());
    }

    #[test]
    fn cutout_respects_the_offset() {
        let tensor = Tensor::arange(4 * 4 * 4, (Kind::Float, Device::Cpu)).view([4, 4, 4]);
        let volume = Volume::from_tensor("block", tensor, Cartesian::splat(10)).unwrap();

        let bbox = Cuboid::try_from_start_extent(Cartesian::splat(11), Cartesian::splat(2))
            .unwrap();
        let cutout = volume.cutout(&bbox).unwrap();
        assert_eq!(cutout.size(), vec![2, 2, 2]);
        // local origin (1, 1, 1) of the arange block
        assert_eq!(f64::from(&cutout.i((0, 0, 0))), (16 + 4 + 1) as f64);
    }

    #[test]
    fn cutout_rejects_out_of_bounds_boxes() {
        let tensor = Tensor::zeros(&[4, 4, 4], (Kind::Float, Device::Cpu));
        let volume = Volume::from_tensor("block", tensor, Cartesian::zeros()).unwrap();

        let bbox = Cuboid::try_from_start_extent(Cartesian::splat(2), Cartesian::splat(4))
            .unwrap();
        assert!(volume.cutout(&bbox).is_err());
    }

    #[test]
    fn cutout_owns_its_storage() {
        let tensor = Tensor::zeros(&[4, 4, 4], (Kind::Float, Device::Cpu));
        let volume = Volume::from_tensor("block", tensor, Cartesian::zeros()).unwrap();

        let bbox = Cuboid::try_from_start_extent(Cartesian::zeros(), Cartesian::splat(2))
            .unwrap();
        let mut cutout = volume.cutout(&bbox).unwrap();
        let _ = cutout.fill_(5.0);

        let untouched = volume.cutout(&bbox).unwrap();
        assert_eq!(f64::from(&untouched.sum(Kind::Float)), 0.0);
    }
}
