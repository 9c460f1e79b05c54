//! Interfaces to the external language-model, captioning and retrieval
//! services.
//!
//! The core never talks to a network itself. Callers plug in implementations
//! of these traits; the pipeline only decides what to send and how many
//! requests may be in flight.

pub mod batch;
pub mod prompts;

use std::future::Future;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Chat-style completion backend.
pub trait CompletionService: Send + Sync {
    /// Complete `prompt` under `system_prompt`.
    fn complete(
        &self,
        system_prompt: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<String, ServiceError>> + Send;
}

/// An image prepared for a captioning request.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInput {
    /// Source bitmap.
    pub path: PathBuf,
    /// `data:` URL with the base64-encoded bitmap.
    pub data_url: String,
}

/// Vision backend that describes several images in one call.
pub trait ImageCaptioner: Send + Sync {
    /// Describe every image in `images`, in order, as one combined response.
    fn describe(
        &self,
        instructions: &str,
        images: &[ImageInput],
    ) -> impl Future<Output = Result<String, ServiceError>> + Send;
}

/// A passage returned by the retrieval service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    pub content: String,
    pub filename: String,
    pub page_number: u32,
}

/// Vector-index retrieval backend. Ranking is entirely its concern.
pub trait Retriever: Send + Sync {
    /// Return up to `top_k` passages relevant to `query`.
    fn retrieve(
        &self,
        query: &str,
        top_k: usize,
    ) -> impl Future<Output = Result<Vec<RetrievedPassage>, ServiceError>> + Send;
}
