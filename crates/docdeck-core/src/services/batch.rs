//! Fixed-size batch dispatch with a response-splitting contract.

use std::future::Future;

use futures_util::{StreamExt, TryStreamExt, stream};
use tracing::{debug, warn};

use crate::error::ServiceError;

/// Splits one combined service response into per-item parts.
pub trait ResponseSplitter {
    /// Parts in item order.
    fn split(&self, response: &str) -> Vec<String>;
}

/// Splits on a literal delimiter, trimming parts and dropping empty ones.
#[derive(Debug, Clone)]
pub struct DelimiterSplitter {
    delimiter: String,
}

impl DelimiterSplitter {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }
}

impl ResponseSplitter for DelimiterSplitter {
    fn split(&self, response: &str) -> Vec<String> {
        response
            .split(self.delimiter.as_str())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Send `items` to a service in batches of `batch_size`, with at most
/// `max_in_flight` calls running at once.
///
/// Each response is split with `splitter` and paired with the items of its
/// batch in order. Extra parts are discarded; items left without a part are
/// dropped with a warning. The first failed call aborts the dispatch.
pub async fn dispatch_batches<T, F, Fut, S>(
    items: Vec<T>,
    batch_size: usize,
    max_in_flight: usize,
    splitter: &S,
    call: F,
) -> Result<Vec<(T, String)>, ServiceError>
where
    T: Clone,
    F: Fn(Vec<T>) -> Fut,
    Fut: Future<Output = Result<String, ServiceError>>,
    S: ResponseSplitter + ?Sized,
{
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let total = items.len();
    let batches: Vec<Vec<T>> = items.chunks(batch_size.max(1)).map(<[T]>::to_vec).collect();
    debug!(
        "Dispatching {} items in {} batches ({} in flight)",
        total,
        batches.len(),
        max_in_flight
    );

    let responses: Vec<String> = stream::iter(batches.iter().cloned().map(&call))
        .buffered(max_in_flight.max(1))
        .try_collect()
        .await?;

    let mut paired = Vec::with_capacity(total);
    for (index, (batch, response)) in batches.into_iter().zip(responses).enumerate() {
        let parts = splitter.split(&response);
        if parts.len() < batch.len() {
            warn!(
                "Batch {} returned {} parts for {} items",
                index,
                parts.len(),
                batch.len()
            );
        }
        paired.extend(batch.into_iter().zip(parts));
    }
    Ok(paired)
}
