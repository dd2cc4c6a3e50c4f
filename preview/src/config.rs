//! Preview program configuration format.

use crate::common::*;

/// The main preview configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub preprocessor: PreprocessorConfig,
    pub logging: LoggingConfig,
    pub stream: StreamConfig,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = std::fs::read_to_string(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }
}

/// Data logging options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub dir: PathBuf,
    pub enable_images: bool,
}

/// Patch stream options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Seed of the patch workers; a fixed seed replays the run exactly.
    pub seed: u64,
    /// Number of patches to generate.
    pub num_patches: usize,
}

/// Augmentation options, one block per pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessorConfig {
    pub intensity_prob: R64,
    pub max_contrast: R64,
    pub max_brightness: R64,
    /// The probability of the noise-or-blur stage; one of the two is
    /// chosen uniformly when it fires.
    pub noise_or_blur_prob: R64,
    pub max_noise_amplitude: R64,
    pub blur_min_sigma: R64,
    pub blur_max_sigma: R64,
    pub mask_box_prob: R64,
    pub max_mask_boxes: usize,
    pub max_mask_ratio: R64,
    pub perspective_prob: R64,
    pub perspective_max_shift: i64,
    pub drop_section_prob: R64,
    pub flip_prob: R64,
    pub transpose_prob: R64,
    pub misalign_prob: R64,
    pub misalign_max_offset: i64,
}

impl PreprocessorConfig {
    /// Assemble the production pipeline from the configured stage
    /// parameters, in the fixed production order.
    pub fn build_pipeline(&self) -> Result<Compose> {
        Compose::new(vec![
            Box::new(NormalizeInit::default().build()?),
            Box::new(
                IntensityPerturbationInit {
                    prob: self.intensity_prob,
                    max_contrast: self.max_contrast,
                    max_brightness: self.max_brightness,
                }
                .build()?,
            ),
            Box::new(OneOf::new(
                self.noise_or_blur_prob,
                vec![
                    Box::new(
                        NoiseInit {
                            prob: r64(1.0),
                            max_amplitude: self.max_noise_amplitude,
                        }
                        .build()?,
                    ),
                    Box::new(
                        GaussianBlur2DInit {
                            prob: r64(1.0),
                            min_sigma: self.blur_min_sigma,
                            max_sigma: self.blur_max_sigma,
                        }
                        .build()?,
                    ),
                ],
            )?),
            Box::new(
                MaskBoxInit {
                    prob: self.mask_box_prob,
                    max_boxes: self.max_mask_boxes,
                    max_ratio: self.max_mask_ratio,
                }
                .build()?,
            ),
            Box::new(
                Perspective2DInit {
                    prob: self.perspective_prob,
                    max_shift: self.perspective_max_shift,
                }
                .build()?,
            ),
            Box::new(DropSectionInit {
                prob: self.drop_section_prob,
            }
            .build()?),
            Box::new(FlipInit {
                prob: self.flip_prob,
            }
            .build()?),
            Box::new(TransposeInit {
                prob: self.transpose_prob,
            }
            .build()?),
            Box::new(
                MisalignInit {
                    prob: self.misalign_prob,
                    max_offset: self.misalign_max_offset,
                }
                .build()?,
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_preprocessor() -> PreprocessorConfig {
        PreprocessorConfig {
            intensity_prob: r64(0.5),
            max_contrast: r64(0.3),
            max_brightness: r64(0.3),
            noise_or_blur_prob: r64(0.5),
            max_noise_amplitude: r64(0.1),
            blur_min_sigma: r64(0.5),
            blur_max_sigma: r64(2.0),
            mask_box_prob: r64(0.5),
            max_mask_boxes: 3,
            max_mask_ratio: r64(0.3),
            perspective_prob: r64(0.5),
            perspective_max_shift: 2,
            drop_section_prob: r64(0.5),
            flip_prob: r64(0.5),
            transpose_prob: r64(0.5),
            misalign_prob: r64(0.5),
            misalign_max_offset: 2,
        }
    }

    #[test]
    fn pipeline_margin_follows_the_stage_parameters() {
        let compose = dummy_preprocessor().build_pipeline().unwrap();
        assert_eq!(compose.shrink_margin(), [0, 4, 4, 1, 4, 4]);
    }

    #[test]
    fn invalid_probabilities_fail_at_construction() {
        let mut config = dummy_preprocessor();
        config.flip_prob = r64(1.5);
        assert!(config.build_pipeline().is_err());
    }

    #[test]
    fn config_round_trips_through_json5() {
        let config = Config {
            dataset: DatasetConfig {
                patch_size: [6, 64, 64],
                volumes: vec![],
            },
            preprocessor: dummy_preprocessor(),
            logging: LoggingConfig {
                dir: PathBuf::from("/tmp/preview"),
                enable_images: true,
            },
            stream: StreamConfig {
                seed: 1,
                num_patches: 100,
            },
        };

        let text = serde_json::to_string_pretty(&config).unwrap();
        let parsed: Config = json5::from_str(&text).unwrap();
        assert_eq!(parsed.dataset.patch_size, [6, 64, 64]);
        assert_eq!(parsed.stream.num_patches, 100);
    }
}
