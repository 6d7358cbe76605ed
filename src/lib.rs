//! Chat notifications for source-control pushes.
//!
//! A [`PushEvent`] goes through [`PushNotificationPipeline`], which resolves the
//! webhook endpoint, lists the commits of every ref change and posts one chat
//! message per ref change.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod git;
pub mod history;
pub mod links;
pub mod logging;
pub mod message;
pub mod pipeline;
pub mod resolver;

pub use config::{ConfigProvider, NotifyConfig, RepositorySettings, load_config};
pub use dispatch::{NotificationDispatcher, Notifier, ReqwestNotifier};
pub use error::{NotifyError, Result};
pub use event::{Commit, PushEvent, PushUser, RefChange, Repository};
pub use git::GitCliHistory;
pub use history::{CommitRangeFetcher, HistorySource, MAX_PAGE_SIZE, Page, PageRequest};
pub use links::{BaseUrlLinks, LinkBuilder};
pub use message::{Attachment, AttachmentField, ChatMessage, MessageBuilder};
pub use pipeline::{
    PipelineOutcome, PushNotificationPipeline, RefOutcome, RefReport, SuppressReason,
};
pub use resolver::{EndpointSource, ResolvedEndpoint, WebhookResolver};
