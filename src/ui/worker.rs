use crate::event::AppEvent;
use crate::gateway::{GenerationGateway, GenerationRequest};
use std::sync::mpsc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Runs studio requests on the runtime and reports their outcome back to
/// the UI thread. Owned by one session; dropping it aborts the request in
/// flight.
pub struct GenerationWorker {
    gateway: GenerationGateway,
    runtime_handle: Handle,
    tx: mpsc::Sender<AppEvent>,
    task: Option<JoinHandle<()>>,
}

impl GenerationWorker {
    pub fn new(gateway: GenerationGateway, runtime_handle: Handle, tx: mpsc::Sender<AppEvent>) -> Self {
        Self {
            gateway,
            runtime_handle,
            tx,
            task: None,
        }
    }

    pub fn dispatch(&mut self, ticket: u64, request: GenerationRequest) {
        let gateway = self.gateway.clone();
        let tx = self.tx.clone();
        info!(ticket, tool = %request.tool, "dispatching generation");

        self.task = Some(self.runtime_handle.spawn(async move {
            let outcome = match gateway.generate(&request).await {
                Ok(result) => Ok(result),
                Err(err) => {
                    warn!(ticket, error = %err, "generation surfaced an error");
                    Err(err.to_string())
                }
            };
            let _ = tx.send(AppEvent::GenerationSettled { ticket, outcome });
        }));
    }

    pub fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                info!("aborting in-flight generation");
            }
            task.abort();
        }
    }
}

impl Drop for GenerationWorker {
    fn drop(&mut self) {
        self.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{
        AspectRatio, Attachment, CredentialError, CredentialSelector, GenerationResult,
        GenerationTool, GenerativeService, ImageSize, ServiceError,
    };
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    struct SlowEcho {
        delay: Duration,
    }

    #[async_trait]
    impl GenerativeService for SlowEcho {
        async fn generate_image(&self, prompt: &str, _size: ImageSize) -> Result<String, ServiceError> {
            tokio::time::sleep(self.delay).await;
            Ok(format!("data:image/png;base64,{prompt}"))
        }

        async fn generate_video(
            &self,
            _prompt: &str,
            _aspect_ratio: AspectRatio,
        ) -> Result<String, ServiceError> {
            Err(ServiceError::EntityNotFound("models/veo".to_string()))
        }

        async fn analyze(
            &self,
            query: &str,
            _attachment: Option<&Attachment>,
        ) -> Result<String, ServiceError> {
            Ok(query.to_uppercase())
        }
    }

    struct AlwaysSelected;

    #[async_trait]
    impl CredentialSelector for AlwaysSelected {
        async fn has_credential(&self) -> bool {
            true
        }

        async fn select_credential(&self) -> Result<(), CredentialError> {
            Ok(())
        }
    }

    fn worker(delay: Duration) -> (GenerationWorker, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel();
        let gateway = GenerationGateway::new(Arc::new(SlowEcho { delay }), Arc::new(AlwaysSelected));
        (GenerationWorker::new(gateway, Handle::current(), tx), rx)
    }

    async fn next_event(rx: &mpsc::Receiver<AppEvent>) -> Option<AppEvent> {
        for _ in 0..50 {
            if let Ok(event) = rx.try_recv() {
                return Some(event);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        None
    }

    #[tokio::test]
    async fn settled_outcome_carries_the_ticket() {
        let (mut worker, rx) = worker(Duration::ZERO);
        worker.dispatch(3, GenerationRequest::new(GenerationTool::Analysis, "drape"));

        match next_event(&rx).await {
            Some(AppEvent::GenerationSettled { ticket, outcome }) => {
                assert_eq!(ticket, 3);
                assert_eq!(
                    outcome,
                    Ok(Some(GenerationResult::Text {
                        text: "DRAPE".to_string()
                    }))
                );
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn surfaced_errors_become_messages() {
        let (mut worker, rx) = worker(Duration::ZERO);
        worker.dispatch(1, GenerationRequest::new(GenerationTool::Video, "catwalk"));

        match next_event(&rx).await {
            Some(AppEvent::GenerationSettled { outcome: Err(message), .. }) => {
                assert!(message.contains("not found"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn aborted_generation_never_reports() {
        let (mut worker, rx) = worker(Duration::from_millis(200));
        worker.dispatch(1, GenerationRequest::new(GenerationTool::Image, "gown"));
        worker.abort();

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(rx.try_recv().is_err());
    }
}
