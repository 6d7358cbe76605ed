//! History source backed by the `git` command line

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, error};

use crate::error::{NotifyError, Result};
use crate::event::{Commit, Repository};
use crate::history::{HistorySource, Page, PageRequest};

const FIELD_SEPARATOR: char = '\x1f';
const RECORD_SEPARATOR: char = '\x1e';
const LOG_FORMAT: &str = "--format=%H%x1f%B%x1e";

/// Runs `git log` inside a local repository (bare or not)
#[derive(Debug, Clone)]
pub struct GitCliHistory {
    repo_path: PathBuf,
}

impl GitCliHistory {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }
}

/// `git` revision argument for the exclusive-from / inclusive-to range
fn range_spec(from: Option<&str>, to: &str) -> String {
    match from {
        Some(from) => format!("{}..{}", from, to),
        None => to.to_string(),
    }
}

/// Splits `git log` output produced with [`LOG_FORMAT`] into commits.
fn parse_log_output(output: &str) -> Vec<Commit> {
    output
        .split(RECORD_SEPARATOR)
        .map(|record| record.trim_start_matches('\n'))
        .filter(|record| !record.is_empty())
        .filter_map(|record| {
            let (id, message) = record.split_once(FIELD_SEPARATOR)?;
            Some(Commit::new(id.trim(), message.trim_end()))
        })
        .collect()
}

#[async_trait]
impl HistorySource for GitCliHistory {
    async fn changes_between(
        &self,
        repository: &Repository,
        from: Option<&str>,
        to: &str,
        page: PageRequest,
    ) -> Result<Page<Commit>> {
        let range = range_spec(from, to);
        let query_error = |message: String| NotifyError::HistoryQuery {
            repository: repository.name.clone(),
            range: range.clone(),
            message,
        };

        // One extra record tells whether another page follows
        debug!(
            "Running (cwd = '{}'): git log {} --skip={} --max-count={}",
            self.repo_path.display(),
            range,
            page.offset,
            page.limit + 1
        );
        let output = Command::new("git")
            .current_dir(&self.repo_path)
            .arg("log")
            .arg(LOG_FORMAT)
            .arg("--no-show-signature")
            .arg(format!("--skip={}", page.offset))
            .arg(format!("--max-count={}", page.limit + 1))
            .arg(&range)
            .arg("--")
            .output()
            .await
            .map_err(|e| {
                error!("git log failed to start: {}", e);
                query_error(format!("git log failed to start: {}", e))
            })?;

        if !output.status.success() {
            let msg = format!(
                "git log failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
            error!("{}", msg);
            return Err(query_error(msg));
        }

        let mut values = parse_log_output(&String::from_utf8_lossy(&output.stdout));
        let has_more = values.len() > page.limit;
        values.truncate(page.limit);

        Ok(Page { values, has_more })
    }
}
