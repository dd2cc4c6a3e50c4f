use anyhow::{Context, Result};
use preview::config::Config;
use std::{path::PathBuf, sync::Arc};
use structopt::StructOpt;

#[derive(Debug, Clone, StructOpt)]
/// Stream augmented training patches and log them for inspection
struct Args {
    #[structopt(long, default_value = "preview.json5")]
    /// configuration file
    pub config_file: PathBuf,
}

#[tokio::main]
pub async fn main() -> Result<()> {
    pretty_env_logger::init();

    let Args { config_file } = Args::from_args();
    let config = Arc::new(
        Config::open(&config_file)
            .with_context(|| format!("failed to load config file '{}'", config_file.display()))?,
    );

    preview::start(config).await?;

    Ok(())
}
