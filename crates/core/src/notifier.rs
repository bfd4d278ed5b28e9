//! Notifier trait — how the agent pings the person it represents.

use async_trait::async_trait;

use crate::error::NotifyError;

/// A one-way push channel to the operator.
///
/// Delivery is fire-and-forget: implementations return `Err` only when the
/// message could not be handed to the transport at all. A rejected delivery
/// (e.g., bad credentials) is logged, not reported.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Name used in logs (e.g., "pushover").
    fn name(&self) -> &str;

    /// Send a single line of text.
    async fn push(&self, message: &str) -> Result<(), NotifyError>;
}
