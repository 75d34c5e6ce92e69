use crate::StatusSnapshot;

use async_trait::async_trait;
use thiserror::Error;

/// Why a status push did not arrive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// Nobody is listening (the popup is closed). Expected and ignored.
    #[error("No receiver for status update")]
    NoReceiver,

    /// Delivery failed for another reason.
    #[error("Status delivery failed: {0}")]
    Failed(String),
}

/// Observer surface that receives pushed status updates.
#[async_trait]
pub trait StatusSink: Send + Sync {
    /// Push one status snapshot.
    async fn deliver(&self, status: &StatusSnapshot) -> Result<(), DeliveryError>;
}
