//! Chat message wire format and construction

use serde::Serialize;

use crate::event::{Commit, PushEvent, RefChange};

/// Color of every commit attachment
pub const ATTACHMENT_COLOR: &str = "#aabbcc";

pub const UNKNOWN_USER: &str = "unknown user";
pub const UNKNOWN_EMAIL: &str = "unknown email";

/// A single field inside an attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

/// One commit rendered as a titled block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub fallback: String,
    pub color: String,
    pub title: String,
    pub title_link: String,
    pub fields: Vec<AttachmentField>,
}

/// Payload posted to the webhook endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    pub text: String,
    pub mrkdwn: bool,
    pub attachments: Vec<Attachment>,
}

impl ChatMessage {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Builds one message per ref change. Output depends only on the inputs.
pub struct MessageBuilder;

impl MessageBuilder {
    /// `commit_list_url` is the repository's commit list page; each commit link
    /// is that URL followed by `/<commit id>`.
    pub fn build(
        event: &PushEvent,
        ref_change: &RefChange,
        commit_list_url: &str,
        commits: &[Commit],
        channel: Option<&str>,
    ) -> ChatMessage {
        let (display_name, email) = match &event.user {
            Some(user) => (user.display_name.as_str(), user.email.as_str()),
            None => (UNKNOWN_USER, UNKNOWN_EMAIL),
        };
        let repo_name = &event.repository.name;

        let text = format!(
            "Push on `{}` by `{} <{}>`. See <{}|commit list>.",
            repo_name, display_name, email, commit_list_url
        );

        let attachments = commits
            .iter()
            .map(|commit| Attachment {
                fallback: text.clone(),
                color: ATTACHMENT_COLOR.to_string(),
                title: format!("[{}:{}] - {}", repo_name, ref_change.ref_id, commit.id),
                title_link: format!("{}/{}", commit_list_url, commit.id),
                fields: vec![AttachmentField {
                    title: format!("comment: {}", commit.message),
                    value: String::new(),
                    short: false,
                }],
            })
            .collect();

        ChatMessage {
            channel: channel.filter(|c| !c.is_empty()).map(String::from),
            text,
            mrkdwn: true,
            attachments,
        }
    }
}
