use crate::config::api_key_from_env;
use crate::event::AppEvent;
use crate::gateway::{CredentialError, CredentialSelector};
use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, RwLock};
use tokio::sync::Notify;
use tokio::time::{self, Duration};

const CREDENTIAL_PROMPT_TIMEOUT: Duration = Duration::from_secs(300);

type EnvLookup = Box<dyn Fn() -> Option<SecretString> + Send + Sync>;

/// Holds the API key used by the generative service.
///
/// Selection first re-reads the environment; if no key turns up it asks the
/// UI for one and waits until the user provides or dismisses it.
/// Re-selection after a rejected key always asks the UI.
pub struct CredentialStore {
    key: RwLock<Option<SecretString>>,
    dismissed: AtomicBool,
    answered: Notify,
    tx: mpsc::Sender<AppEvent>,
    env: EnvLookup,
}

impl CredentialStore {
    pub fn new(initial: Option<SecretString>, tx: mpsc::Sender<AppEvent>) -> Self {
        Self::with_env_lookup(initial, tx, || {
            let _ = dotenvy::dotenv();
            api_key_from_env()
        })
    }

    pub fn with_env_lookup(
        initial: Option<SecretString>,
        tx: mpsc::Sender<AppEvent>,
        env: impl Fn() -> Option<SecretString> + Send + Sync + 'static,
    ) -> Self {
        Self {
            key: RwLock::new(initial),
            dismissed: AtomicBool::new(false),
            answered: Notify::new(),
            tx,
            env: Box::new(env),
        }
    }

    pub fn current(&self) -> Option<SecretString> {
        match self.key.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Called by the UI when the user pastes a key.
    pub fn provide(&self, key: SecretString) {
        self.store(Some(key));
        self.dismissed.store(false, Ordering::SeqCst);
        self.answered.notify_waiters();
    }

    /// Called by the UI when the user closes the prompt without a key.
    pub fn dismiss(&self) {
        self.dismissed.store(true, Ordering::SeqCst);
        self.answered.notify_waiters();
    }

    fn store(&self, key: Option<SecretString>) {
        match self.key.write() {
            Ok(mut guard) => *guard = key,
            Err(poisoned) => *poisoned.into_inner() = key,
        }
    }

    async fn prompt(&self) -> Result<(), CredentialError> {
        let answered = self.answered.notified();
        tokio::pin!(answered);
        answered.as_mut().enable();

        self.dismissed.store(false, Ordering::SeqCst);
        self.tx
            .send(AppEvent::CredentialRequested)
            .map_err(|err| CredentialError::Unavailable(err.to_string()))?;

        time::timeout(CREDENTIAL_PROMPT_TIMEOUT, answered)
            .await
            .map_err(|_| CredentialError::Unavailable("credential prompt timed out".to_string()))?;

        if self.dismissed.load(Ordering::SeqCst) || self.current().is_none() {
            return Err(CredentialError::Dismissed);
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialSelector for CredentialStore {
    async fn has_credential(&self) -> bool {
        self.current().is_some()
    }

    async fn select_credential(&self) -> Result<(), CredentialError> {
        if let Some(key) = (self.env)() {
            tracing::info!("credential loaded from environment");
            self.store(Some(key));
            return Ok(());
        }
        self.prompt().await
    }

    /// The environment key is the one the service just rejected, so only the
    /// user can supply a replacement.
    async fn reselect_credential(&self) -> Result<(), CredentialError> {
        self.prompt().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::sync::Arc;

    fn store_with_env(env: Option<&'static str>) -> (Arc<CredentialStore>, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel();
        let store = CredentialStore::with_env_lookup(None, tx, move || env.map(SecretString::from));
        (Arc::new(store), rx)
    }

    async fn wait_for_prompt(rx: mpsc::Receiver<AppEvent>) -> AppEvent {
        tokio::task::spawn_blocking(move || rx.recv())
            .await
            .expect("join")
            .expect("prompt event")
    }

    #[tokio::test]
    async fn provided_key_satisfies_pending_selection() {
        let (store, rx) = store_with_env(None);
        assert!(!store.has_credential().await);

        let selecting = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.select_credential().await })
        };

        // Wait for the prompt to reach the UI side before answering it.
        let event = wait_for_prompt(rx).await;
        assert!(matches!(event, AppEvent::CredentialRequested));

        store.provide(SecretString::from("pasted-key"));
        let outcome = selecting.await.expect("join");
        assert!(outcome.is_ok());
        assert!(store.has_credential().await);
    }

    #[tokio::test]
    async fn dismissing_the_prompt_fails_selection() {
        let (store, rx) = store_with_env(None);

        let selecting = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.select_credential().await })
        };

        let _ = wait_for_prompt(rx).await;
        store.dismiss();

        let outcome = selecting.await.expect("join");
        assert!(matches!(outcome, Err(CredentialError::Dismissed)));
        assert!(!store.has_credential().await);
    }

    #[tokio::test]
    async fn environment_key_is_selected_without_prompting() {
        let (store, rx) = store_with_env(Some("env-key"));

        store.select_credential().await.expect("env key");

        assert!(rx.try_recv().is_err());
        let key = store.current().expect("stored");
        assert_eq!(key.expose_secret(), "env-key");
    }

    #[tokio::test]
    async fn reselection_prompts_even_with_an_environment_key() {
        let (store, rx) = store_with_env(Some("rejected-key"));
        store.select_credential().await.expect("env key");

        let reselecting = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.reselect_credential().await })
        };

        let event = wait_for_prompt(rx).await;
        assert!(matches!(event, AppEvent::CredentialRequested));

        store.provide(SecretString::from("fresh-key"));
        reselecting.await.expect("join").expect("reselected");
        let key = store.current().expect("stored");
        assert_eq!(key.expose_secret(), "fresh-key");
    }
}
