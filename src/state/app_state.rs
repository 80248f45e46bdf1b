// Application shell state
// Owns the controller, the effect runner and the session archive sync

use nox_coder_core::chat::SessionArchive;
use nox_coder_core::error::PersistenceError;
use nox_coder_core::gemini::AiProvider;
use nox_coder_core::{Action, AppState, Config, EffectRunner};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

/// Where sessions are saved and which store revision was last written
#[derive(Debug, Clone)]
struct ArchiveSync {
    path: PathBuf,
    saved_revision: u64,
    /// Revision whose save failed; not retried until the store changes again
    failed_revision: Option<u64>,
}

/// Everything the window needs between frames
///
/// The GUI thread is the only writer of [`AppState`]; background work reports
/// back through the runner's action channel.
pub struct AppShell<P: AiProvider + ?Sized + 'static> {
    /// Controller state rendered every frame
    pub state: AppState,
    runner: EffectRunner<P>,
    results: UnboundedReceiver<Action>,
    archive: Option<ArchiveSync>,
}

impl<P: AiProvider + ?Sized + 'static> AppShell<P> {
    /// Build the shell, restoring saved sessions when persistence is enabled
    ///
    /// `notify` runs whenever a background result arrives.
    pub fn new(
        config: &Config,
        provider: Arc<P>,
        runtime: Handle,
        notify: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        let (runner, results) = EffectRunner::new(provider, runtime);
        let runner = runner.with_notifier(notify);

        let (state, archive) = if config.persistence.enabled {
            let path = config.sessions_path();
            let sessions = match SessionArchive::load_from_file(&path) {
                Ok(sessions) => sessions,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Could not load saved sessions; starting empty");
                    Default::default()
                }
            };
            info!(path = %path.display(), sessions = sessions.len(), "Session persistence enabled");
            let saved_revision = sessions.revision();
            (
                AppState::with_sessions(config, sessions),
                Some(ArchiveSync {
                    path,
                    saved_revision,
                    failed_revision: None,
                }),
            )
        } else {
            (AppState::new(config), None)
        };

        Self {
            state,
            runner,
            results,
            archive,
        }
    }

    /// Apply one action and start whatever work it triggers
    pub fn dispatch(&mut self, action: Action) {
        let effects = self.state.update(action);
        self.runner.run_all(effects);
    }

    /// Apply every action in order
    pub fn dispatch_all(&mut self, actions: impl IntoIterator<Item = Action>) {
        for action in actions {
            self.dispatch(action);
        }
    }

    /// Apply every background result that has arrived; returns how many
    pub fn drain_results(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.results.try_recv() {
                Ok(action) => {
                    self.dispatch(action);
                    applied += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        applied
    }

    /// Write the session archive if the store changed since the last save
    ///
    /// Returns true if a save happened. A failed save is reported once and
    /// retried only after the next change.
    pub fn persist_if_changed(&mut self) -> Result<bool, PersistenceError> {
        let Some(archive) = self.archive.as_mut() else {
            return Ok(false);
        };
        let revision = self.state.sessions().revision();
        if revision == archive.saved_revision || archive.failed_revision == Some(revision) {
            return Ok(false);
        }
        if let Err(e) = SessionArchive::save_to_file(self.state.sessions(), &archive.path) {
            archive.failed_revision = Some(revision);
            return Err(e);
        }
        archive.saved_revision = revision;
        archive.failed_revision = None;
        Ok(true)
    }
}
