//! Shared tensor helpers.

use crate::common::*;

/// Build a normalized 1-D Gaussian kernel with radius `ceil(3 sigma)`.
pub fn gaussian_kernel_1d(sigma: f64) -> Result<Tensor> {
    ensure!(sigma > 0.0, "sigma must be positive, got {}", sigma);

    let radius = (sigma * 3.0).ceil() as i64;
    let values: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f64) / (2.0 * sigma * sigma)).exp() as f32)
        .collect();
    let sum: f32 = values.iter().sum();
    let values: Vec<f32> = values.iter().map(|value| value / sum).collect();

    Ok(Tensor::of_slice(&values))
}

/// Separable Gaussian smoothing of a 3-D tensor, one sigma per axis.
/// An axis with sigma 0 is left untouched.
pub fn gaussian_blur_3d(input: &Tensor, sigma: [f64; 3]) -> Result<Tensor> {
    let (depth, height, width) = input.size3().context("expected a 3-D tensor")?;
    ensure!(
        sigma.iter().all(|&s| s >= 0.0),
        "sigma must be non-negative, got {:?}",
        sigma
    );

    let mut smoothed = input
        .to_kind(Kind::Float)
        .view([1, 1, depth, height, width]);

    for (axis, &axis_sigma) in sigma.iter().enumerate() {
        if axis_sigma == 0.0 {
            continue;
        }
        let kernel = gaussian_kernel_1d(axis_sigma)?.to_device(input.device());
        let len = kernel.size1()?;
        let radius = len / 2;

        let (weight_shape, padding) = match axis {
            0 => ([1, 1, len, 1, 1], [radius, 0, 0]),
            1 => ([1, 1, 1, len, 1], [0, radius, 0]),
            _ => ([1, 1, 1, 1, len], [0, 0, radius]),
        };
        smoothed = smoothed.conv3d::<Tensor>(
            &kernel.view(weight_shape),
            None,
            &[1, 1, 1],
            &padding,
            &[1, 1, 1],
            1,
        );
    }

    Ok(smoothed.view([depth, height, width]))
}

/// Per-section 2-D Gaussian smoothing of a (Z, Y, X) tensor. The z axis
/// is treated as the batch axis and never mixed.
pub fn gaussian_blur_2d(input: &Tensor, sigma: f64) -> Result<Tensor> {
    let (depth, height, width) = input.size3().context("expected a 3-D tensor")?;

    let kernel = gaussian_kernel_1d(sigma)?.to_device(input.device());
    let len = kernel.size1()?;
    let radius = len / 2;

    let smoothed = input
        .to_kind(Kind::Float)
        .view([depth, 1, height, width])
        .conv2d::<Tensor>(
            &kernel.view([1, 1, len, 1]),
            None,
            &[1, 1],
            &[radius, 0],
            &[1, 1],
            1,
        )
        .conv2d::<Tensor>(
            &kernel.view([1, 1, 1, len]),
            None,
            &[1, 1],
            &[0, radius],
            &[1, 1],
            1,
        );

    Ok(smoothed.view([depth, height, width]))
}

/// The sorted distinct ids of a segmentation tensor.
pub fn unique_labels(label: &Tensor) -> Vec<i64> {
    Vec::<i64>::from(&label.to_kind(Kind::Int64).flatten(0, -1))
        .into_iter()
        .sorted()
        .dedup()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn kernel_is_normalized() {
        let kernel = gaussian_kernel_1d(1.5).unwrap();
        let sum = f64::from(&kernel.sum(Kind::Float));
        assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-5);

        let len = kernel.size1().unwrap();
        assert_eq!(len % 2, 1);
        let reversed = kernel.flip(&[0]);
        assert!(bool::from(
            &kernel.isclose(&reversed, 1e-6, 1e-6, false).all()
        ));
    }

    #[test]
    fn kernel_rejects_bad_sigma() {
        assert!(gaussian_kernel_1d(0.0).is_err());
        assert!(gaussian_kernel_1d(-1.0).is_err());
    }

    #[test]
    fn blur_3d_preserves_constants() {
        let input = Tensor::full(&[10, 10, 10], 3.0, (Kind::Float, Device::Cpu));
        let smoothed = gaussian_blur_3d(&input, [1.0, 1.0, 1.0]).unwrap();
        assert_eq!(smoothed.size(), vec![10, 10, 10]);

        // away from the zero-padded border the response stays flat
        let center = f64::from(&smoothed.i((5, 5, 5)));
        assert_abs_diff_eq!(center, 3.0, epsilon = 1e-3);
    }

    #[test]
    fn blur_2d_keeps_sections_apart() {
        let input = Tensor::zeros(&[2, 8, 8], (Kind::Float, Device::Cpu));
        let _ = input.i((0, .., ..)).fill_(1.0);
        let smoothed = gaussian_blur_2d(&input, 1.0).unwrap();
        assert_eq!(smoothed.size(), vec![2, 8, 8]);

        // section 1 saw no energy from section 0
        let leaked = f64::from(&smoothed.i((1, .., ..)).abs().sum(Kind::Float));
        assert_abs_diff_eq!(leaked, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn unique_labels_sorted_distinct() {
        let label = Tensor::of_slice(&[3i64, 1, 1, 0, 3, 2]).view([2, 3, 1]);
        assert_eq!(unique_labels(&label), vec![0, 1, 2, 3]);
    }
}
