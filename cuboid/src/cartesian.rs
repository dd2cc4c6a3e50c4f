use crate::common::*;

/// A 3-D coordinate in (z, y, x) voxel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cartesian<T> {
    pub z: T,
    pub y: T,
    pub x: T,
}

impl<T> Cartesian<T> {
    pub fn new(z: T, y: T, x: T) -> Self {
        Self { z, y, x }
    }

    pub fn try_cast<V>(self) -> Option<Cartesian<V>>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        Some(Cartesian {
            z: V::from(self.z)?,
            y: V::from(self.y)?,
            x: V::from(self.x)?,
        })
    }

    pub fn cast<V>(self) -> Cartesian<V>
    where
        T: ToPrimitive,
        V: NumCast,
    {
        self.try_cast().unwrap()
    }
}

impl<T> Cartesian<T>
where
    T: Copy,
{
    /// The same value on all three axes.
    pub fn splat(value: T) -> Self {
        Self {
            z: value,
            y: value,
            x: value,
        }
    }

    pub fn to_array(&self) -> [T; 3] {
        [self.z, self.y, self.x]
    }
}

impl<T> Cartesian<T>
where
    T: Copy + Num,
{
    pub fn zeros() -> Self {
        Self::splat(T::zero())
    }

    /// Componentwise product, i.e. the voxel count of an extent.
    pub fn volume(&self) -> T {
        self.z * self.y * self.x
    }
}

impl<T> Cartesian<T>
where
    T: Copy + PartialOrd,
{
    /// Componentwise minimum.
    pub fn inf(&self, other: &Self) -> Self {
        let pick = |a: T, b: T| if a < b { a } else { b };
        Self {
            z: pick(self.z, other.z),
            y: pick(self.y, other.y),
            x: pick(self.x, other.x),
        }
    }

    /// Componentwise maximum.
    pub fn sup(&self, other: &Self) -> Self {
        let pick = |a: T, b: T| if a > b { a } else { b };
        Self {
            z: pick(self.z, other.z),
            y: pick(self.y, other.y),
            x: pick(self.x, other.x),
        }
    }
}

impl<T> From<[T; 3]> for Cartesian<T> {
    fn from([z, y, x]: [T; 3]) -> Self {
        Self { z, y, x }
    }
}

impl<T> From<(T, T, T)> for Cartesian<T> {
    fn from((z, y, x): (T, T, T)) -> Self {
        Self { z, y, x }
    }
}

impl<T> Add for Cartesian<T>
where
    T: Copy + Num,
{
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            z: self.z + rhs.z,
            y: self.y + rhs.y,
            x: self.x + rhs.x,
        }
    }
}

impl<T> Sub for Cartesian<T>
where
    T: Copy + Num,
{
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            z: self.z - rhs.z,
            y: self.y - rhs.y,
            x: self.x - rhs.x,
        }
    }
}

impl<T> Mul<T> for Cartesian<T>
where
    T: Copy + Num,
{
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        Self {
            z: self.z * rhs,
            y: self.y * rhs,
            x: self.x * rhs,
        }
    }
}

impl<T> Div<T> for Cartesian<T>
where
    T: Copy + Num,
{
    type Output = Self;

    fn div(self, rhs: T) -> Self {
        Self {
            z: self.z / rhs,
            y: self.y / rhs,
            x: self.x / rhs,
        }
    }
}

impl<T> AddAssign for Cartesian<T>
where
    T: Copy + Num,
{
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T> SubAssign for Cartesian<T>
where
    T: Copy + Num,
{
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cartesian_arithmetic() {
        let a = Cartesian::new(1i64, 2, 3);
        let b = Cartesian::splat(2i64);
        assert_eq!(a + b, Cartesian::new(3, 4, 5));
        assert_eq!(a - b, Cartesian::new(-1, 0, 1));
        assert_eq!(a * 2, Cartesian::new(2, 4, 6));
        assert_eq!(Cartesian::new(4i64, 5, 6) / 2, Cartesian::new(2, 2, 3));
    }

    #[test]
    fn cartesian_ordering() {
        let a = Cartesian::new(1i64, 5, 3);
        let b = Cartesian::new(2i64, 4, 3);
        assert_eq!(a.inf(&b), Cartesian::new(1, 4, 3));
        assert_eq!(a.sup(&b), Cartesian::new(2, 5, 3));
    }

    #[test]
    fn cartesian_cast() {
        let a = Cartesian::new(1i64, 2, 3);
        let b: Cartesian<f64> = a.cast();
        assert_eq!(b, Cartesian::new(1.0, 2.0, 3.0));
        assert_eq!(Cartesian::new(-1i64, 0, 0).try_cast::<u32>(), None);
    }

    #[test]
    fn cartesian_volume() {
        assert_eq!(Cartesian::new(2i64, 3, 4).volume(), 24);
    }
}
