//! Push event to chat notification orchestration

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::config::ConfigProvider;
use crate::dispatch::{NotificationDispatcher, Notifier};
use crate::error::NotifyError;
use crate::event::{PushEvent, RefChange};
use crate::history::{CommitRangeFetcher, HistorySource, MAX_PAGE_SIZE};
use crate::links::LinkBuilder;
use crate::message::MessageBuilder;
use crate::resolver::{ResolvedEndpoint, WebhookResolver};

/// Why a push produced no notifications at all
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuppressReason {
    Disabled,
    NoEndpoint(String),
}

/// What happened to a single ref change
#[derive(Debug)]
pub enum RefOutcome {
    Delivered { commits: usize },
    Skipped(String),
    Failed(NotifyError),
}

#[derive(Debug)]
pub struct RefReport {
    pub ref_id: String,
    pub outcome: RefOutcome,
}

/// Terminal state of one pipeline run
#[derive(Debug)]
pub enum PipelineOutcome {
    Suppressed(SuppressReason),
    /// Every ref change was attempted, in event order
    Processed(Vec<RefReport>),
}

/// Turns push events into webhook notifications, one message per ref change.
///
/// Holds no per-push state, so a single instance can serve concurrent pushes.
pub struct PushNotificationPipeline {
    config: Arc<dyn ConfigProvider>,
    history: Arc<dyn HistorySource>,
    links: Arc<dyn LinkBuilder>,
    notifier: Arc<dyn Notifier>,
    page_size: usize,
}

impl PushNotificationPipeline {
    pub fn new(
        config: Arc<dyn ConfigProvider>,
        history: Arc<dyn HistorySource>,
        links: Arc<dyn LinkBuilder>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            history,
            links,
            notifier,
            page_size: MAX_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub async fn handle(&self, event: &PushEvent) -> PipelineOutcome {
        let repository = &event.repository;
        let settings = self.config.repository_settings(repository);

        if !settings.enabled {
            debug!(
                "Push notifications disabled for {}/{}, skipping.",
                repository.project_key, repository.slug
            );
            return PipelineOutcome::Suppressed(SuppressReason::Disabled);
        }

        let global_url = self.config.global_webhook_url();
        let endpoint = WebhookResolver::resolve(
            global_url.as_deref(),
            settings.local_webhook_url.as_deref(),
        );
        if let ResolvedEndpoint::Invalid { reason } = &endpoint {
            error!(
                "There is no valid configured webhook URL for {}/{}! Reason: {}",
                repository.project_key, repository.slug, reason
            );
            return PipelineOutcome::Suppressed(SuppressReason::NoEndpoint(reason.clone()));
        }

        let commit_list_url = self
            .links
            .commit_list_url(&repository.project_key, &repository.slug);

        let mut reports = Vec::with_capacity(event.ref_changes.len());
        for ref_change in &event.ref_changes {
            let outcome = self
                .process_ref(
                    event,
                    ref_change,
                    &endpoint,
                    &commit_list_url,
                    settings.channel_override.as_deref(),
                )
                .await;
            reports.push(RefReport {
                ref_id: ref_change.ref_id.clone(),
                outcome,
            });
        }

        PipelineOutcome::Processed(reports)
    }

    async fn process_ref(
        &self,
        event: &PushEvent,
        ref_change: &RefChange,
        endpoint: &ResolvedEndpoint,
        commit_list_url: &str,
        channel: Option<&str>,
    ) -> RefOutcome {
        let repository = &event.repository;

        let Some(to_hash) = ref_change.to_hash.as_deref() else {
            info!(
                "Ref {} was deleted in {}, no notification sent.",
                ref_change.ref_id, repository.name
            );
            return RefOutcome::Skipped("ref deleted".to_string());
        };

        let commits = match CommitRangeFetcher::new(self.history.as_ref())
            .with_page_size(self.page_size)
            .fetch(repository, ref_change.from_hash.as_deref(), to_hash)
            .await
        {
            Ok(commits) => commits,
            Err(e) => {
                error!(
                    "Failed to list commits for {} ref {}: {}",
                    repository.name, ref_change.ref_id, e
                );
                return RefOutcome::Failed(e);
            }
        };

        let message = MessageBuilder::build(event, ref_change, commit_list_url, &commits, channel);

        match NotificationDispatcher::new(self.notifier.as_ref())
            .dispatch(endpoint, &message)
            .await
        {
            Ok(()) => RefOutcome::Delivered {
                commits: commits.len(),
            },
            Err(e) => RefOutcome::Failed(e),
        }
    }
}
