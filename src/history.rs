//! Commit range retrieval on top of a paged history source

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::Result;
use crate::event::{Commit, Repository};

/// Largest page requested from a history source in one call
pub const MAX_PAGE_SIZE: usize = 1000;

/// Window into a paged query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

/// One page of results, in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub values: Vec<T>,
    pub has_more: bool,
}

/// Answers "which commits are reachable from `to` but not from `from`".
///
/// When `from` is `None` the source applies its own rules for a newly created ref.
#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn changes_between(
        &self,
        repository: &Repository,
        from: Option<&str>,
        to: &str,
        page: PageRequest,
    ) -> Result<Page<Commit>>;
}

/// Materializes a full commit range by walking every page of a [`HistorySource`].
pub struct CommitRangeFetcher<'a> {
    source: &'a dyn HistorySource,
    page_size: usize,
}

impl<'a> CommitRangeFetcher<'a> {
    pub fn new(source: &'a dyn HistorySource) -> Self {
        Self {
            source,
            page_size: MAX_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Returns every commit in the range, concatenating pages in source order.
    pub async fn fetch(
        &self,
        repository: &Repository,
        from: Option<&str>,
        to: &str,
    ) -> Result<Vec<Commit>> {
        let mut commits = Vec::new();
        let mut offset = 0;

        loop {
            let page = self
                .source
                .changes_between(
                    repository,
                    from,
                    to,
                    PageRequest {
                        offset,
                        limit: self.page_size,
                    },
                )
                .await?;

            let received = page.values.len();
            debug!(
                "Fetched {} commits at offset {} for {}",
                received, offset, repository.name
            );
            commits.extend(page.values);

            if !page.has_more {
                break;
            }
            if received == 0 {
                warn!(
                    "History source for {} reported more commits but returned an empty page at offset {}",
                    repository.name, offset
                );
                break;
            }
            offset += received;
        }

        Ok(commits)
    }
}
