//! Chunk command - group document elements into retrieval chunks.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::debug;

use docdeck_core::chunking::ChunkBuilder;
use docdeck_core::models::chunk::Chunk;

use super::{load_config, read_document, source_name};

/// Arguments for the chunk command.
#[derive(Args)]
pub struct ChunkArgs {
    /// Partitioner output (JSON array of elements)
    #[arg(required = true)]
    input: PathBuf,

    /// Source document name recorded in chunk metadata (default: the name in
    /// the element records, else the input file name)
    #[arg(long)]
    filename: Option<String>,

    /// Word budget for combined chunks (overrides config)
    #[arg(long)]
    max_words: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text listing
    Text,
}

pub async fn run(args: ChunkArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let max_words = args.max_words.unwrap_or(config.chunking.max_words);
    if max_words == 0 {
        anyhow::bail!("--max-words must be greater than 0");
    }

    let document = read_document(&args.input)?;
    let filename = source_name(&args.input, args.filename, document.filename);
    let builder = ChunkBuilder::new(max_words);
    let chunks = builder.build(&document.elements, &filename);
    debug!(
        "{} chunks from {} with a budget of {} words",
        chunks.len(),
        filename,
        builder.max_words()
    );

    let output = format_chunks(&chunks, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Wrote {} chunks to {}",
            style("✓").green(),
            chunks.len(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn format_chunks(chunks: &[Chunk], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(chunks)?),
        OutputFormat::Csv => format_csv(chunks),
        OutputFormat::Text => Ok(format_text(chunks)),
    }
}

fn format_csv(chunks: &[Chunk]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["index", "type", "filename", "page_number", "word_count", "text"])?;

    for (i, chunk) in chunks.iter().enumerate() {
        wtr.write_record([
            (i + 1).to_string(),
            chunk.kind.as_str().to_string(),
            chunk.metadata.filename.clone(),
            chunk.metadata.page_number.to_string(),
            chunk.word_count.to_string(),
            chunk.text.clone(),
        ])?;
    }

    let data = wtr.into_inner()?;
    Ok(String::from_utf8(data)?)
}

fn format_text(chunks: &[Chunk]) -> String {
    let mut output = String::new();

    for (i, chunk) in chunks.iter().enumerate() {
        output.push_str(&format!(
            "#{} {} (page {}, {} words)\n",
            i + 1,
            chunk.kind.as_str(),
            chunk.metadata.page_number,
            chunk.word_count
        ));
        if let Some(path) = &chunk.metadata.image_reference {
            output.push_str(&format!("  image: {}\n", path.display()));
        }
        if !chunk.text.is_empty() {
            output.push_str(&format!("  {}\n", chunk.text));
        }
    }

    output.push_str(&format!("{} chunks", chunks.len()));
    output
}
