use crate::{common::*, utils};

const EPS: f64 = 1e-6;

/// The default smoothing scale: 15% of the section count, one value
/// broadcast to all three axes, never below one voxel.
pub fn default_sigma(depth: i64) -> [f64; 3] {
    let sigma = (depth as f64 * 0.15).round().max(1.0);
    [sigma; 3]
}

/// Derive local shape descriptors of a segmentation, smoothed at
/// `sigma` voxels per axis.
///
/// The output is a `(10,) + label.shape` float tensor. Channels [0, 3)
/// hold the Gaussian-weighted mean-offset vector, [3, 6) the per-axis
/// second moments, [6, 9) the cross-axis correlations for the (z, y),
/// (z, x), (y, x) pairs, and channel 9 the smoothed local size. Every
/// statistic is computed per label id and written only at voxels of
/// that id; background (id 0) voxels stay 0. All channels land in
/// [0, 1].
pub fn local_shape_descriptors(label: &Tensor, sigma: [f64; 3]) -> Result<Tensor> {
    let (depth, height, width) = label
        .size3()
        .context("local shape descriptors expect a 3-D label tensor")?;
    ensure!(
        sigma.iter().all(|&s| s > 0.0),
        "sigma must be positive on every axis, got {:?}",
        sigma
    );

    let device = label.device();
    let mut channels: Vec<Tensor> = (0..10)
        .map(|_| Tensor::zeros(&[depth, height, width], (Kind::Float, device)))
        .collect();

    // broadcastable voxel coordinate grids, one per axis
    let coords = [
        Tensor::arange(depth, (Kind::Float, device)).view([depth, 1, 1]),
        Tensor::arange(height, (Kind::Float, device)).view([1, height, 1]),
        Tensor::arange(width, (Kind::Float, device)).view([1, 1, width]),
    ];

    let label = label.to_kind(Kind::Int64);
    for id in utils::unique_labels(&label) {
        if id == 0 {
            continue;
        }

        // objects are disjoint, so every channel accumulates each id's
        // statistics masked to its own voxels
        let mask = label.eq(id).to_kind(Kind::Float);
        let smoothed = utils::gaussian_blur_3d(&mask, sigma)?;
        let size = smoothed.clamp_min(EPS);

        let means: Vec<Tensor> = coords
            .iter()
            .map(|coord| {
                let first = utils::gaussian_blur_3d(&(&mask * coord), sigma)?;
                Ok(first / &size)
            })
            .collect::<Result<_>>()?;
        let variances: Vec<Tensor> = coords
            .iter()
            .zip(&means)
            .map(|(coord, mean)| {
                let second = utils::gaussian_blur_3d(&(&mask * coord * coord), sigma)?;
                Ok((second / &size - mean * mean).clamp_min(0.0))
            })
            .collect::<Result<_>>()?;

        // channels 0-2: mean offsets, scaled by sigma, recentered
        for (axis, (mean, coord)) in means.iter().zip(&coords).enumerate() {
            let offset = (mean - coord) / (2.0 * sigma[axis]) + 0.5;
            channels[axis] = &channels[axis] + offset.clamp(0.0, 1.0) * &mask;
        }

        // channels 3-5: per-axis spread, in sigma^2 units
        for (axis, variance) in variances.iter().enumerate() {
            let spread = (variance / (sigma[axis] * sigma[axis])).clamp(0.0, 1.0);
            channels[axis + 3] = &channels[axis + 3] + spread * &mask;
        }

        // channels 6-8: cross-axis correlations of the (z, y), (z, x),
        // (y, x) pairs
        for (index, (a, b)) in [(0, 1), (0, 2), (1, 2)].into_iter().enumerate() {
            let second = utils::gaussian_blur_3d(&(&mask * &coords[a] * &coords[b]), sigma)?;
            let covariance = second / &size - &means[a] * &means[b];
            let correlation = covariance / (&variances[a] * &variances[b] + EPS).sqrt();
            let recentered = (correlation * 0.5 + 0.5).clamp(0.0, 1.0);
            channels[index + 6] = &channels[index + 6] + recentered * &mask;
        }

        // channel 9: smoothed local size
        channels[9] = &channels[9] + smoothed.clamp(0.0, 1.0) * &mask;
    }

    Ok(Tensor::stack(&channels, 0))
}
