//! Turning chunks into documents for the indexing collaborator.

use std::fs;
use std::io;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use futures_util::{StreamExt, TryStreamExt, stream};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, ServiceError};
use crate::models::chunk::{Chunk, ChunkKind};
use crate::models::config::IngestConfig;
use crate::services::batch::{DelimiterSplitter, dispatch_batches};
use crate::services::prompts::{caption_instructions, table_summary_prompt};
use crate::services::{CompletionService, ImageCaptioner, ImageInput};

/// Metadata stored alongside an index document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub filename: String,
    pub page_number: u32,
    #[serde(rename = "type")]
    pub kind: ChunkKind,
}

/// A document handed to the embedding and indexing collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDocument {
    pub doc_id: String,
    pub text: String,
    pub metadata: IndexMetadata,
}

/// An image chunk waiting for its caption.
#[derive(Debug, Clone)]
struct CaptionJob {
    filename: String,
    page_number: u32,
    input: ImageInput,
}

/// Read a bitmap and encode it as a base64 `data:` URL.
pub fn encode_image_data_url(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(bytes)))
}

/// Delete the regular files in `dir`. A missing directory counts as clean.
/// Returns the number of files removed.
pub fn clear_image_dir(dir: &Path) -> io::Result<usize> {
    if !dir.exists() {
        warn!("Image folder {} does not exist", dir.display());
        return Ok(0);
    }
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    debug!("Removed {} files from {}", removed, dir.display());
    Ok(removed)
}

/// Build index documents from chunks.
///
/// Combined chunks pass through with their position (1-based) as id. Image
/// chunks are captioned in batches and get ids `Image-<n>`. Table chunks are
/// summarised by the completion service. At most
/// `config.max_concurrent_calls` requests of each kind run at once. The
/// result lists text documents first, then images, then tables.
pub async fn build_index_documents<C, I>(
    chunks: &[Chunk],
    completion: &C,
    captioner: &I,
    config: &IngestConfig,
) -> Result<Vec<IndexDocument>>
where
    C: CompletionService,
    I: ImageCaptioner,
{
    let mut documents = Vec::new();
    let mut caption_jobs = Vec::new();
    let mut tables: Vec<(usize, &Chunk)> = Vec::new();

    for (position, chunk) in chunks.iter().enumerate().map(|(i, c)| (i + 1, c)) {
        match chunk.kind {
            ChunkKind::Combined => documents.push(IndexDocument {
                doc_id: position.to_string(),
                text: chunk.text.clone(),
                metadata: metadata_for(chunk),
            }),
            ChunkKind::Table => tables.push((position, chunk)),
            ChunkKind::Image => match &chunk.metadata.image_reference {
                Some(path) => caption_jobs.push(CaptionJob {
                    filename: chunk.metadata.filename.clone(),
                    page_number: chunk.metadata.page_number,
                    input: ImageInput {
                        path: path.clone(),
                        data_url: encode_image_data_url(path)?,
                    },
                }),
                None => warn!("Image chunk {} has no image reference, skipping", position),
            },
        }
    }

    info!(
        "{} text chunks, {} images, {} tables",
        documents.len(),
        caption_jobs.len(),
        tables.len()
    );

    let instructions = caption_instructions(&config.caption_delimiter);
    let instructions = instructions.as_str();
    let splitter = DelimiterSplitter::new(config.caption_delimiter.as_str());
    let captions = dispatch_batches(
        caption_jobs,
        config.caption_batch_size,
        config.max_concurrent_calls,
        &splitter,
        move |batch: Vec<CaptionJob>| async move {
            let inputs: Vec<ImageInput> = batch.into_iter().map(|job| job.input).collect();
            captioner.describe(instructions, &inputs).await
        },
    )
    .await?;

    documents.extend(
        captions
            .into_iter()
            .enumerate()
            .map(|(i, (job, description))| IndexDocument {
                doc_id: format!("Image-{}", i + 1),
                text: description,
                metadata: IndexMetadata {
                    filename: job.filename,
                    page_number: job.page_number,
                    kind: ChunkKind::Image,
                },
            }),
    );

    let system_prompt = config.system_prompt.as_str();
    let table_documents: Vec<IndexDocument> = stream::iter(tables)
        .map(|(position, chunk)| async move {
            let markup = chunk
                .metadata
                .table_markup
                .as_deref()
                .unwrap_or(chunk.text.as_str());
            let summary = completion
                .complete(system_prompt, &table_summary_prompt(markup))
                .await?;
            Ok::<_, ServiceError>(IndexDocument {
                doc_id: position.to_string(),
                text: summary,
                metadata: metadata_for(chunk),
            })
        })
        .buffered(config.max_concurrent_calls.max(1))
        .try_collect()
        .await?;
    documents.extend(table_documents);

    info!("Built {} index documents", documents.len());
    Ok(documents)
}

fn metadata_for(chunk: &Chunk) -> IndexMetadata {
    IndexMetadata {
        filename: chunk.metadata.filename.clone(),
        page_number: chunk.metadata.page_number,
        kind: chunk.kind,
    }
}
