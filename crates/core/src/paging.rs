//! Paged result reader
//!
//! Collection responses carry a `value` array and, while more results exist,
//! a continuation link. The reader hands out the first page as-is and then
//! pulls one page per call, each request depending on the previous response.
//! The sequence ends when a page arrives without a continuation link.
//!
//! Readers are single-consumer and can only start from a first page.

use std::sync::Arc;

use dirgraph_domain::constants::{LEGACY_NEXT_LINK_FIELD, NEXT_LINK_FIELD, VALUE_FIELD};
use dirgraph_domain::{DirectoryError, Result};
use futures::stream::{self, Stream, TryStreamExt};
use serde_json::Value;
use tracing::debug;

use crate::context::DirectoryContext;
use crate::operation::OperationOptions;

/// Pull-based reader over a paged collection
#[derive(Debug)]
pub struct PagedResultReader {
    context: Arc<DirectoryContext>,
    first: Option<Vec<Value>>,
    next_link: Option<String>,
    pages_read: usize,
}

impl PagedResultReader {
    /// Start from an already-fetched first page. A missing page (204) is an
    /// empty collection.
    ///
    /// # Errors
    /// Returns `DirectoryError::Serialization` if the page is not a paged
    /// collection.
    pub fn from_first_page(context: Arc<DirectoryContext>, page: Option<Value>) -> Result<Self> {
        let (entries, next_link) = match page {
            Some(page) => split_page(page, context.next_link_field())?,
            None => (Vec::new(), None),
        };

        Ok(Self { context, first: Some(entries), next_link, pages_read: 0 })
    }

    /// Number of pages handed out so far.
    pub fn pages_read(&self) -> usize {
        self.pages_read
    }

    pub fn has_more(&self) -> bool {
        self.first.is_some() || self.next_link.is_some()
    }

    /// Next batch of entries, or `None` once the sequence is exhausted.
    ///
    /// # Errors
    /// Propagates the failing page request; the reader is exhausted afterwards.
    pub async fn next_batch(&mut self) -> Result<Option<Vec<Value>>> {
        if let Some(first) = self.first.take() {
            self.pages_read += 1;
            return Ok(Some(first));
        }

        let Some(link) = self.next_link.take() else {
            return Ok(None);
        };

        let url = self.context.resolve_link(&link)?;
        debug!(page = self.pages_read + 1, %url, "following continuation link");
        let page = self.context.send(&url, OperationOptions::new()).await?;
        let (entries, next_link) = match page {
            Some(page) => split_page(page, self.context.next_link_field())?,
            None => (Vec::new(), None),
        };

        self.next_link = next_link;
        self.pages_read += 1;
        Ok(Some(entries))
    }

    /// Drain every page into one ordered sequence.
    ///
    /// # Errors
    /// Propagates the first failing page request.
    pub async fn collect_all(mut self) -> Result<Vec<Value>> {
        let mut entries = Vec::new();
        while let Some(batch) = self.next_batch().await? {
            entries.extend(batch);
        }
        debug!(pages = self.pages_read, entries = entries.len(), "paged collection drained");
        Ok(entries)
    }

    /// Flatten the pages into a lazy stream of entries.
    pub fn into_stream(self) -> impl Stream<Item = Result<Value>> + Send {
        stream::try_unfold(self, |mut reader| async move {
            let batch = reader.next_batch().await?;
            Ok::<_, DirectoryError>(batch.map(|entries| {
                (stream::iter(entries.into_iter().map(Ok::<_, DirectoryError>)), reader)
            }))
        })
        .try_flatten()
    }
}

/// Split a page into its entries and continuation link.
fn split_page(page: Value, next_link_field: &str) -> Result<(Vec<Value>, Option<String>)> {
    let Value::Object(mut page) = page else {
        return Err(DirectoryError::serialization("paged response is not a JSON object"));
    };

    let entries = match page.remove(VALUE_FIELD) {
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            return Err(DirectoryError::serialization(format!(
                "paged response `{VALUE_FIELD}` is not an array: {other}"
            )))
        }
        None => {
            return Err(DirectoryError::serialization(format!(
                "paged response is missing `{VALUE_FIELD}`"
            )))
        }
    };

    let next_link = [next_link_field, NEXT_LINK_FIELD, LEGACY_NEXT_LINK_FIELD]
        .into_iter()
        .find_map(|field| page.get(field).and_then(Value::as_str))
        .filter(|link| !link.is_empty())
        .map(str::to_string);

    Ok((entries, next_link))
}
