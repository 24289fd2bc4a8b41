use async_trait::async_trait;

use crate::{domain::ChatId, Result};

/// Outbound messaging port.
///
/// Telegram is the only implementation; callers treat sends as
/// fire-and-forget and only log failures.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()>;
}

/// Page fetching port used by the link scanner.
///
/// Implementations must return [`crate::Error::Fetch`] on network failure,
/// timeout, or a non-success HTTP status.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}
