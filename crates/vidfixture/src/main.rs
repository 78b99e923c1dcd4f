mod cli;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use vidfixture_core::asset::{self, VideoAsset};
use vidfixture_core::config::{AssetConfig, ToolConfig};
use vidfixture_core::pipeline::{self, ExtractConfig};
use vidfixture_core::video::sample::requested_frames;
use vidfixture_core::FfmpegDecoder;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    let decoder = FfmpegDecoder::new(ToolConfig::from_env());

    match cli.command {
        cli::Command::Fetch { name } => {
            let path = fetch(&name)?;
            println!("{}", path.display());
            Ok(())
        }
        cli::Command::Probe { input } => {
            let info = decoder
                .probe(&input)
                .with_context(|| format!("failed to probe {}", input.display()))?;
            println!(
                "{}x{} @ {:.3} fps ({})",
                info.width,
                info.height,
                info.fps,
                info.codec.as_deref().unwrap_or("unknown codec")
            );
            Ok(())
        }
        cli::Command::Extract {
            source,
            output,
            num_frames,
            annotate,
            font,
        } => {
            let input = match (source.input, source.asset) {
                (Some(input), _) => input,
                (None, Some(name)) => fetch(&name)?,
                (None, None) => bail!("either --input or --asset is required"),
            };
            let config = ExtractConfig {
                num_frames: requested_frames(num_frames),
                annotate,
                font_path: font,
            };
            info!(?input, ?output, ?config, "starting extraction");

            let written = pipeline::run_extract(&decoder, &input, &output, &config)
                .context("extraction failed")?;

            if written.is_empty() {
                warn!("no frames written");
            }
            info!(frame_count = written.len(), ?output, "frames written");
            Ok(())
        }
    }
}

fn fetch(name: &str) -> Result<PathBuf> {
    let config = AssetConfig::from_env();
    info!(name, cache_dir = ?config.cache_dir, "resolving asset");

    let cache = asset::hub_cache(config);
    VideoAsset::new(name)
        .resolve(&cache)
        .with_context(|| format!("failed to fetch asset {name}"))
}
