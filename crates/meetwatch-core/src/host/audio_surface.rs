use crate::{CoreResult, RelayMessage};

use async_trait::async_trait;

/// Isolated context that owns the media stream and encodes audio chunks.
///
/// The coordinator only ever talks to it through one-way relay messages; what
/// happens inside is not its concern. At most one instance may exist.
#[async_trait]
pub trait AudioSurface: Send + Sync {
    /// Whether a surface instance currently exists.
    async fn exists(&self) -> CoreResult<bool>;

    /// Create the surface. Callers must close any existing instance first.
    async fn create(&self) -> CoreResult<()>;

    /// Close the surface if it exists.
    async fn close(&self) -> CoreResult<()>;

    /// Deliver a one-way relay message to the surface.
    async fn relay(&self, message: RelayMessage) -> CoreResult<()>;
}
