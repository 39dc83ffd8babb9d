use crate::gateway::GenerationResult;

/// Messages from background tasks to the UI thread.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The skeleton timer for a view entry ran out.
    LoadingElapsed { ticket: u64 },
    /// A generation task finished. `Err` carries a message for the UI.
    GenerationSettled {
        ticket: u64,
        outcome: Result<Option<GenerationResult>, String>,
    },
    /// The gateway needs an API key and is waiting for the user.
    CredentialRequested,
}
