//! Notification collaborator seam
//!
//! The surrounding application mails moderators after certain state
//! transitions. The sender is an external collaborator: it is invoked
//! fire-and-forget after a successful publish, and a send failure is logged,
//! never propagated.

use async_trait::async_trait;

/// External notification sender.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn publication_succeeded(&self, kind: &str, record_ids: &[i64]) -> anyhow::Result<()>;
}

/// Default sender that does nothing.
pub struct NoopNotifier;

#[async_trait]
impl NotificationSender for NoopNotifier {
    async fn publication_succeeded(&self, _kind: &str, _record_ids: &[i64]) -> anyhow::Result<()> {
        Ok(())
    }
}
