//! The patch preview program for the aff-dl project. It drives the full
//! sampling and augmentation pipeline and logs the generated patches
//! for inspection, without touching a model.

pub mod common;
pub mod config;
pub mod logging;
pub mod stream;
pub mod utils;

use crate::{common::*, logging::LoggingMessage, stream::PatchStream};

/// The entry of the preview program.
pub async fn start(config: Arc<config::Config>) -> Result<()> {
    let logging_dir = Arc::new(config.logging.dir.clone());

    // create dirs and save the resolved config
    {
        tokio::fs::create_dir_all(&*logging_dir).await?;
        let path = logging_dir.join("preview.json5");
        let text = serde_json::to_string_pretty(&*config)?;
        tokio::fs::write(&path, text).await?;
    }

    // start the logging worker
    let (logging_tx, logging_rx) = flume::bounded(16);
    let logging_future = tokio::task::spawn(logging::logging_worker(
        config.clone(),
        logging_dir.clone(),
        logging_rx,
    ));

    // opening the volumes blocks on disk
    info!("loading dataset");
    let patch_stream = {
        let config = config.clone();
        tokio::task::spawn_blocking(move || PatchStream::new(&config)).await??
    };
    info!(
        "{} samples loaded, drawing {:?} patches",
        patch_stream.dataset().num_samples(),
        patch_stream.dataset().patch_size_before_transform().to_array(),
    );

    // drain the patch stream into the logger
    let count = config.stream.num_patches;
    let mut patches = patch_stream.stream(count).boxed();
    while let Some(result) = patches.next().await {
        let (index, record) = result?;
        logging_tx
            .send_async(LoggingMessage::new_patch_record(index, &record))
            .await
            .map_err(|_| format_err!("the logging worker hung up"))?;
    }

    drop(logging_tx);
    logging_future.await??;
    info!("generated {} patches", count);
    Ok(())
}
