//! Delivery of chat messages to the webhook endpoint

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::error::{NotifyError, Result};
use crate::message::ChatMessage;
use crate::resolver::ResolvedEndpoint;

/// Capability to POST a JSON body to a URL. One attempt, no retries.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn post(&self, url: &str, body: String) -> Result<()>;
}

/// [`Notifier`] backed by a shared `reqwest::Client`
#[derive(Debug, Clone, Default)]
pub struct ReqwestNotifier {
    client: reqwest::Client,
}

impl ReqwestNotifier {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Notifier for ReqwestNotifier {
    async fn post(&self, url: &str, body: String) -> Result<()> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| NotifyError::Delivery {
                endpoint: url.to_string(),
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Delivery {
                endpoint: url.to_string(),
                status: Some(status),
                message: body,
            });
        }

        Ok(())
    }
}

/// Serializes messages and hands them to a [`Notifier`], logging failures.
pub struct NotificationDispatcher<'a> {
    notifier: &'a dyn Notifier,
}

impl<'a> NotificationDispatcher<'a> {
    pub fn new(notifier: &'a dyn Notifier) -> Self {
        Self { notifier }
    }

    pub async fn dispatch(&self, endpoint: &ResolvedEndpoint, message: &ChatMessage) -> Result<()> {
        let url = match endpoint {
            ResolvedEndpoint::Selected { url, .. } => url,
            ResolvedEndpoint::Invalid { reason } => {
                error!("Refusing to send notification, invalid webhook: {}", reason);
                return Err(NotifyError::ConfigError(reason.clone()));
            }
        };

        let body = message.to_json().map_err(|e| {
            error!("Failed to serialize notification: {}", e);
            NotifyError::from(e)
        })?;
        debug!("Notification payload: {}", body);

        match self.notifier.post(url, body).await {
            Ok(()) => {
                info!(
                    "Sent notification with {} attachment(s) to {}",
                    message.attachments.len(),
                    url
                );
                Ok(())
            }
            Err(e) => {
                error!("Failed to deliver notification: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{EndpointSource, WebhookResolver};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        posts: Mutex<Vec<(String, String)>>,
        fail_with: Option<u16>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn post(&self, url: &str, body: String) -> Result<()> {
            self.posts.lock().unwrap().push((url.to_string(), body));
            match self.fail_with {
                Some(status) => Err(NotifyError::Delivery {
                    endpoint: url.to_string(),
                    status: Some(status),
                    message: "rejected".to_string(),
                }),
                None => Ok(()),
            }
        }
    }

    fn message() -> ChatMessage {
        ChatMessage {
            channel: None,
            text: "Push on `Tools`".to_string(),
            mrkdwn: true,
            attachments: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_dispatch_posts_serialized_message() {
        let notifier = RecordingNotifier::default();
        let endpoint = ResolvedEndpoint::Selected {
            url: "https://hooks.example.com/a".to_string(),
            source: EndpointSource::Global,
        };

        NotificationDispatcher::new(&notifier)
            .dispatch(&endpoint, &message())
            .await
            .unwrap();

        let posts = notifier.posts.lock().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].0, "https://hooks.example.com/a");
        assert_eq!(posts[0].1, message().to_json().unwrap());
    }

    #[tokio::test]
    async fn test_invalid_endpoint_is_never_posted_to() {
        let notifier = RecordingNotifier::default();
        let endpoint = WebhookResolver::resolve(None, None);

        let result = NotificationDispatcher::new(&notifier)
            .dispatch(&endpoint, &message())
            .await;

        assert!(matches!(result, Err(NotifyError::ConfigError(_))));
        assert!(notifier.posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delivery_failure_is_returned() {
        let notifier = RecordingNotifier {
            fail_with: Some(500),
            ..Default::default()
        };
        let endpoint = WebhookResolver::resolve(Some("https://hooks.example.com/a"), None);

        let result = NotificationDispatcher::new(&notifier)
            .dispatch(&endpoint, &message())
            .await;

        assert!(matches!(
            result,
            Err(NotifyError::Delivery {
                status: Some(500),
                ..
            })
        ));
        assert_eq!(notifier.posts.lock().unwrap().len(), 1);
    }
}
