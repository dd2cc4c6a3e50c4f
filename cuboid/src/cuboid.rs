use crate::{common::*, Cartesian};

/// An axis-aligned box in voxel coordinate space, defined by its start
/// (inclusive) and stop (exclusive) corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cuboid<T> {
    pub(crate) start: Cartesian<T>,
    pub(crate) stop: Cartesian<T>,
}

impl<T> Cuboid<T> {
    pub fn try_cast<V>(self) -> Option<Cuboid<V>>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        Some(Cuboid {
            start: self.start.try_cast()?,
            stop: self.stop.try_cast()?,
        })
    }

    pub fn cast<V>(self) -> Cuboid<V>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        self.try_cast().unwrap()
    }
}

impl<T> Cuboid<T>
where
    T: Copy + Num + PartialOrd,
{
    pub fn try_from_corners(start: Cartesian<T>, stop: Cartesian<T>) -> Result<Self> {
        ensure!(
            start.z <= stop.z && start.y <= stop.y && start.x <= stop.x,
            "stop corner must not precede start corner on any axis"
        );
        Ok(Self { start, stop })
    }

    pub fn from_corners(start: Cartesian<T>, stop: Cartesian<T>) -> Self {
        Self::try_from_corners(start, stop).unwrap()
    }

    pub fn try_from_start_extent(start: Cartesian<T>, extent: Cartesian<T>) -> Result<Self> {
        Self::try_from_corners(start, start + extent)
    }

    /// The box of the given extent whose center falls on `center`,
    /// rounding the start corner down on odd extents.
    pub fn try_from_center_extent(center: Cartesian<T>, extent: Cartesian<T>) -> Result<Self> {
        let two = T::one() + T::one();
        let start = center - extent / two;
        Self::try_from_corners(start, start + extent)
    }

    pub fn start(&self) -> Cartesian<T> {
        self.start
    }

    pub fn stop(&self) -> Cartesian<T> {
        self.stop
    }

    pub fn extent(&self) -> Cartesian<T> {
        self.stop - self.start
    }

    pub fn center(&self) -> Cartesian<T> {
        let two = T::one() + T::one();
        self.start + self.extent() / two
    }

    /// Grow the box by `margin` on both sides of every axis.
    pub fn adjust(&self, margin: Cartesian<T>) -> Self {
        Self {
            start: self.start - margin,
            stop: self.stop + margin,
        }
    }

    pub fn translate(&self, offset: Cartesian<T>) -> Self {
        Self {
            start: self.start + offset,
            stop: self.stop + offset,
        }
    }

    pub fn contains_point(&self, point: &Cartesian<T>) -> bool {
        self.start.z <= point.z
            && point.z < self.stop.z
            && self.start.y <= point.y
            && point.y < self.stop.y
            && self.start.x <= point.x
            && point.x < self.stop.x
    }

    pub fn contains_cuboid(&self, other: &Self) -> bool {
        self.start.z <= other.start.z
            && self.start.y <= other.start.y
            && self.start.x <= other.start.x
            && other.stop.z <= self.stop.z
            && other.stop.y <= self.stop.y
            && other.stop.x <= self.stop.x
    }

    /// The overlapping box, or `None` when the boxes are disjoint.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let start = self.start.sup(&other.start);
        let stop = self.stop.inf(&other.stop);
        Self::try_from_corners(start, stop).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_ordering() {
        assert!(
            Cuboid::try_from_corners(Cartesian::new(0i64, 0, 0), Cartesian::new(-1i64, 4, 4))
                .is_err()
        );
    }

    #[test]
    fn center_extent_round_trip() {
        let bbox =
            Cuboid::try_from_center_extent(Cartesian::new(10i64, 10, 10), Cartesian::splat(4))
                .unwrap();
        assert_eq!(bbox.start(), Cartesian::new(8, 8, 8));
        assert_eq!(bbox.stop(), Cartesian::new(12, 12, 12));
        assert_eq!(bbox.center(), Cartesian::new(10, 10, 10));
        assert_eq!(bbox.extent(), Cartesian::splat(4));
    }

    #[test]
    fn adjust_grows_both_sides() {
        let bbox = Cuboid::try_from_start_extent(Cartesian::new(4i64, 4, 4), Cartesian::splat(2))
            .unwrap();
        let grown = bbox.adjust(Cartesian::splat(1));
        assert_eq!(grown.start(), Cartesian::new(3, 3, 3));
        assert_eq!(grown.extent(), Cartesian::splat(4));
    }

    #[test]
    fn containment() {
        let outer =
            Cuboid::try_from_start_extent(Cartesian::zeros(), Cartesian::splat(8i64)).unwrap();
        let inner = Cuboid::try_from_start_extent(Cartesian::new(1i64, 1, 1), Cartesian::splat(2))
            .unwrap();
        assert!(outer.contains_cuboid(&inner));
        assert!(!inner.contains_cuboid(&outer));
        assert!(outer.contains_point(&Cartesian::new(7, 7, 7)));
        assert!(!outer.contains_point(&Cartesian::new(8, 0, 0)));
    }

    #[test]
    fn intersection() {
        let a = Cuboid::try_from_start_extent(Cartesian::zeros(), Cartesian::splat(4i64)).unwrap();
        let b = Cuboid::try_from_start_extent(Cartesian::new(2i64, 2, 2), Cartesian::splat(4))
            .unwrap();
        let overlap = a.intersect(&b).unwrap();
        assert_eq!(overlap.start(), Cartesian::new(2, 2, 2));
        assert_eq!(overlap.stop(), Cartesian::new(4, 4, 4));

        let c = Cuboid::try_from_start_extent(Cartesian::new(9i64, 9, 9), Cartesian::splat(1))
            .unwrap();
        assert_eq!(a.intersect(&c), None);
    }

    #[test]
    fn float_boxes_keep_exact_centers() {
        use approx::assert_abs_diff_eq;

        let bbox = Cuboid::try_from_corners(
            Cartesian::new(0.0, 0.0, 0.0),
            Cartesian::new(1.0, 2.0, 4.0),
        )
        .unwrap();
        let center = bbox.center();
        assert_abs_diff_eq!(center.z, 0.5);
        assert_abs_diff_eq!(center.y, 1.0);
        assert_abs_diff_eq!(center.x, 2.0);
    }

    #[test]
    fn translate_preserves_extent() {
        let bbox =
            Cuboid::try_from_start_extent(Cartesian::zeros(), Cartesian::splat(3i64)).unwrap();
        let moved = bbox.translate(Cartesian::new(1, 2, 3));
        assert_eq!(moved.start(), Cartesian::new(1, 2, 3));
        assert_eq!(moved.extent(), Cartesian::splat(3));
    }
}
