//! scroll-stitch CLI — stitch recorded scroll-capture fragments into one image.

use clap::{Args, Parser, Subcommand};
use cv_photo::{align, AlignConfig, StitchConfig, Stitcher, DEFAULT_TEMPLATE_HEIGHT};
use std::path::{Path, PathBuf};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

/// Artifact name used when `--out` is not given.
const DEFAULT_OUTPUT: &str = "scroll_capture.png";

#[derive(Parser)]
#[command(name = "scroll-stitch")]
#[command(about = "Rebuild a tall image from overlapping screenshots of scrolled content")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stitch a directory of PNG fragments, taken in file-name order.
    Stitch(CliStitchArgs),

    /// Report where the bottom strip of one image reappears in another.
    Align {
        /// Earlier fragment.
        #[arg(long)]
        previous: PathBuf,

        /// Later fragment.
        #[arg(long)]
        current: PathBuf,

        #[command(flatten)]
        matching: CliMatchArgs,
    },
}

#[derive(Debug, Clone, Args)]
struct CliStitchArgs {
    /// Directory holding the fragments.
    #[arg(long)]
    input: PathBuf,

    /// Path of the composite image.
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    out: PathBuf,

    /// Path to write per-seam alignment results (JSON).
    #[arg(long)]
    report: Option<PathBuf>,

    /// Worker threads for template matching (default: SCROLLSTITCH_CPU_THREADS or all cores).
    #[arg(long)]
    threads: Option<usize>,

    #[command(flatten)]
    matching: CliMatchArgs,
}

#[derive(Debug, Clone, Args)]
struct CliMatchArgs {
    /// Rows taken from the bottom of each fragment as the search strip.
    #[arg(long, default_value_t = DEFAULT_TEMPLATE_HEIGHT)]
    template_height: u32,

    /// Abort when a seam's best match scores below this value in [-1, 1].
    #[arg(long)]
    min_confidence: Option<f32>,
}

impl CliMatchArgs {
    fn to_config(&self) -> AlignConfig {
        let config = AlignConfig::new().with_template_height(self.template_height);
        match self.min_confidence {
            Some(score) => config.with_min_confidence(score),
            None => config,
        }
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Stitch(args) => run_stitch(&args),
        Commands::Align {
            previous,
            current,
            matching,
        } => run_align(&previous, &current, &matching.to_config()),
    }
}

fn run_stitch(args: &CliStitchArgs) -> CliResult<()> {
    cv_core::init_global_thread_pool(args.threads)?;
    tracing::debug!("Using {} worker threads", cv_core::current_cpu_threads());

    tracing::info!("Loading fragments from {}", args.input.display());
    let fragments = cv_videoio::backends::read_fragments(&args.input)?;
    if fragments.is_empty() {
        tracing::error!("No images were captured; nothing written");
        return Err(cv_core::Error::EmptyInput.into());
    }
    if fragments.len() == 1 {
        tracing::info!("Only one fragment found, writing it unchanged");
    }

    let stitcher = Stitcher::with_config(StitchConfig {
        align: args.matching.to_config(),
    });
    let (composite, seams) = stitcher.stitch_with_report(fragments.as_slice())?;

    cv_videoio::write_composite(&args.out, &composite)?;

    if let Some(report_path) = &args.report {
        let json = serde_json::to_string_pretty(&seams)?;
        std::fs::write(report_path, &json)?;
        tracing::info!("Seam report written to {}", report_path.display());
    }

    Ok(())
}

fn run_align(previous: &Path, current: &Path, config: &AlignConfig) -> CliResult<()> {
    let previous = cv_videoio::read_fragment(previous)?;
    let current = cv_videoio::read_fragment(current)?;
    let res = align(&previous, &current, config)?;

    println!("match row:       {}", res.match_row);
    println!("score:           {:.4}", res.score);
    println!("template height: {}", res.template_height);
    println!("new rows:        {}", res.new_rows(current.height()));
    Ok(())
}
