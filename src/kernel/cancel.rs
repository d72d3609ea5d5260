use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Caller's grip on a running computation. Dropping it does not stop the
/// computation; `cancel` does.
#[derive(Debug)]
pub struct TtiHandle {
    pub id: Uuid,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl TtiHandle {
    pub(crate) fn new(id: Uuid, token: CancellationToken, task: JoinHandle<()>) -> Self {
        Self { id, token, task }
    }

    /// Explicit teardown. Idempotent; a settled computation ignores it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the driver task to stop, whatever the outcome.
    pub async fn finished(self) {
        if let Err(e) = self.task.await {
            tracing::warn!(id = %self.id, "TTI driver task ended abnormally: {}", e);
        }
    }
}
