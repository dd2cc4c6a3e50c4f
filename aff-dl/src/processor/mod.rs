//! Patch preprocessing building blocks.

use crate::common::*;

pub mod blur;
pub mod compose;
pub mod drop_section;
pub mod flip;
pub mod intensity;
pub mod mask_box;
pub mod misalign;
pub mod noise;
pub mod normalize;
pub mod perspective;
pub mod transpose;

pub use blur::*;
pub use compose::*;
pub use drop_section::*;
pub use flip::*;
pub use intensity::*;
pub use mask_box::*;
pub use misalign::*;
pub use noise::*;
pub use normalize::*;
pub use perspective::*;
pub use transpose::*;

pub(crate) fn validate_prob(prob: R64) -> Result<f64> {
    ensure!(
        (0.0..=1.0).contains(&prob.raw()),
        "probability must lie in [0, 1], got {}",
        prob
    );
    Ok(prob.raw())
}

/// The production augmentation ordering with default parameters:
/// normalize, intensity jitter, noise or blur, box masking, perspective
/// warp, section dropout, flip, section transpose, misalignment.
pub fn default_pipeline() -> Result<Compose> {
    Compose::new(vec![
        Box::new(NormalizeInit::default().build()?),
        Box::new(IntensityPerturbationInit::default().build()?),
        Box::new(OneOf::new(
            r64(0.5),
            vec![
                Box::new(NoiseInit::default().build()?),
                Box::new(GaussianBlur2DInit::default().build()?),
            ],
        )?),
        Box::new(MaskBoxInit::default().build()?),
        Box::new(Perspective2DInit::default().build()?),
        Box::new(DropSectionInit::default().build()?),
        Box::new(FlipInit::default().build()?),
        Box::new(TransposeInit::default().build()?),
        Box::new(MisalignInit::default().build()?),
    ])
}
