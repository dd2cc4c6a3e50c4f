//! TensorBoard logging toolkit.

use crate::{common::*, config::Config, utils::RateCounter};

pub use logging_message::*;

mod logging_message {
    use super::*;

    /// One generated patch record, addressed by its draw index.
    #[derive(Debug)]
    pub enum LoggingMessage {
        PatchRecord {
            step: i64,
            image: Tensor,
            target: Tensor,
        },
    }

    impl LoggingMessage {
        pub fn new_patch_record(step: usize, record: &PatchRecord) -> Self {
            Self::PatchRecord {
                step: step as i64,
                image: record.image.shallow_clone(),
                target: record.target.shallow_clone(),
            }
        }
    }
}

/// Drain patch messages into TensorBoard event files: summary scalars
/// per patch and, when enabled, the middle section of the image and of
/// the affinity channels.
pub async fn logging_worker(
    config: Arc<Config>,
    logging_dir: Arc<PathBuf>,
    rx: flume::Receiver<LoggingMessage>,
) -> Result<()> {
    let event_dir = logging_dir.join("events");
    tokio::fs::create_dir_all(&event_dir).await?;
    let event_path_prefix = event_dir
        .join("preview")
        .into_os_string()
        .into_string()
        .unwrap();

    let mut event_writer = EventWriterInit::default()
        .from_prefix_async(event_path_prefix, None)
        .await?;
    let mut rate_counter = RateCounter::with_second_interval();

    while let Ok(message) = rx.recv_async().await {
        match message {
            LoggingMessage::PatchRecord {
                step,
                image,
                target,
            } => {
                let foreground = f32::from(&target.narrow(0, 0, 3).mean(Kind::Float));
                event_writer
                    .write_scalar_async("patch/affinity_mean".to_string(), step, foreground)
                    .await?;

                if config.logging.enable_images {
                    let depth = image.size()[1];
                    let image_section = image.select(1, depth / 2);
                    event_writer
                        .write_image_async("patch/image".to_string(), step, image_section)
                        .await?;

                    // the three affinity channels render as one rgb section
                    let affinity_section = target.narrow(0, 0, 3).select(1, depth / 2);
                    event_writer
                        .write_image_async("patch/affinity".to_string(), step, affinity_section)
                        .await?;
                }
            }
        }

        rate_counter.add(1.0);
        if let Some(rate) = rate_counter.rate() {
            info!("logged {:.2} patches/s", rate);
        }
    }

    Ok(())
}
