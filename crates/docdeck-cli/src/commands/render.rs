//! Render command - rebuild document pages as a slide deck.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::debug;

use docdeck_core::layout::{DeckWriter, JsonDeckWriter};
use docdeck_core::models::config::OverlapStrategy;
use docdeck_core::pipeline::DocumentPipeline;

use super::{load_config, read_document};

/// Arguments for the render command.
#[derive(Args)]
pub struct RenderArgs {
    /// Partitioner output (JSON array of elements)
    #[arg(required = true)]
    input: PathBuf,

    /// Slide width in inches (overrides config)
    #[arg(long)]
    width: Option<f64>,

    /// Slide height in inches (overrides config)
    #[arg(long)]
    height: Option<f64>,

    /// Repeat overlap resolution until stable, up to this many passes
    #[arg(long)]
    max_passes: Option<usize>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write compact JSON
    #[arg(long)]
    compact: bool,
}

pub async fn run(args: RenderArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = load_config(config_path)?;

    if let Some(width) = args.width {
        config.layout.slide_width = width;
    }
    if let Some(height) = args.height {
        config.layout.slide_height = height;
    }
    if let Some(max_passes) = args.max_passes {
        config.layout.overlap = OverlapStrategy::FixedPoint { max_passes };
    }
    config.validate()?;

    let document = read_document(&args.input)?;
    let deck = DocumentPipeline::new(config).render_deck(document.elements)?;
    let writer = JsonDeckWriter { pretty: !args.compact };

    if let Some(output_path) = &args.output {
        let mut out = BufWriter::new(File::create(output_path)?);
        writer.write_deck(&deck, &mut out)?;
        println!(
            "{} Rendered {} slides ({} shapes) to {}",
            style("✓").green(),
            deck.slides.len(),
            deck.shape_count(),
            output_path.display()
        );
    } else {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        writer.write_deck(&deck, &mut out)?;
        println!();
    }

    debug!("Total render time: {:?}", start.elapsed());

    Ok(())
}
