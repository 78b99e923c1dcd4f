use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vidfixture", about = "Fetch, decode and sample video test fixtures")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Download an asset into the local cache and print its path.
    Fetch {
        /// Asset file name in the dataset (e.g. sample_demo_1.mp4).
        #[arg(short, long)]
        name: String,
    },

    /// Print resolution, frame rate and codec of a video file.
    Probe {
        /// Path to the video file.
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Decode a video, sample frames and write them as PNG files.
    Extract {
        #[command(flatten)]
        source: Source,

        /// Directory to write frame_XXXXXXXX.png files into.
        #[arg(short, long)]
        output: PathBuf,

        /// Number of frames to sample; negative keeps every frame.
        #[arg(short = 'n', long, default_value_t = -1, allow_negative_numbers = true)]
        num_frames: i64,

        /// Draw source frame number and timestamp onto each frame.
        #[arg(long, requires = "font")]
        annotate: bool,

        /// TTF/OTF font used for annotations.
        #[arg(long)]
        font: Option<PathBuf>,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct Source {
    /// Local video file.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Asset name, fetched into the cache when missing.
    #[arg(short, long)]
    pub asset: Option<String>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn extract_defaults_to_all_frames() {
        let cli = Cli::try_parse_from(["vidfixture", "extract", "-i", "a.mp4", "-o", "out"]).unwrap();
        let Command::Extract { num_frames, source, .. } = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(num_frames, -1);
        assert_eq!(source.input, Some(PathBuf::from("a.mp4")));
    }

    #[test]
    fn extract_accepts_negative_count() {
        let cli = Cli::try_parse_from([
            "vidfixture", "extract", "--asset", "sample_demo_1.mp4", "-o", "out", "-n", "-1",
        ])
        .unwrap();
        let Command::Extract { num_frames, .. } = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(num_frames, -1);
    }

    #[test]
    fn extract_requires_exactly_one_source() {
        assert!(Cli::try_parse_from(["vidfixture", "extract", "-o", "out"]).is_err());
        assert!(Cli::try_parse_from([
            "vidfixture", "extract", "-i", "a.mp4", "-a", "b.mp4", "-o", "out",
        ])
        .is_err());
    }

    #[test]
    fn annotate_requires_font() {
        assert!(Cli::try_parse_from([
            "vidfixture", "extract", "-i", "a.mp4", "-o", "out", "--annotate",
        ])
        .is_err());
    }
}
