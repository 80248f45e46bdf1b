//! Effect runner
//!
//! Executes [`Effect`]s on a tokio runtime and reports results back as
//! [`Action`]s over an unbounded channel. The GUI drains the channel once per
//! frame; the optional notifier lets it wake up when something arrives.

use crate::controller::{Action, Effect};
use crate::gemini::AiProvider;
use crate::streaming::spawn_reply_stream;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Callback run after every delivered action
pub type Notifier = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
struct Outbox {
    actions: mpsc::UnboundedSender<Action>,
    notifier: Option<Notifier>,
}

impl Outbox {
    /// Returns false once the receiving side is gone
    fn deliver(&self, action: Action) -> bool {
        if self.actions.send(action).is_err() {
            debug!("Action receiver dropped");
            return false;
        }
        if let Some(notify) = &self.notifier {
            notify();
        }
        true
    }
}

/// Runs controller effects against an [`AiProvider`]
pub struct EffectRunner<P: AiProvider + ?Sized> {
    provider: Arc<P>,
    runtime: Handle,
    outbox: Outbox,
}

impl<P: AiProvider + ?Sized + 'static> EffectRunner<P> {
    /// Create a runner and the receiver its results arrive on
    pub fn new(provider: Arc<P>, runtime: Handle) -> (Self, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let runner = Self {
            provider,
            runtime,
            outbox: Outbox {
                actions: tx,
                notifier: None,
            },
        };
        (runner, rx)
    }

    /// Install a callback run after every delivered action
    pub fn with_notifier(mut self, notify: impl Fn() + Send + Sync + 'static) -> Self {
        self.outbox.notifier = Some(Arc::new(notify));
        self
    }

    /// Run every effect in order
    pub fn run_all(&self, effects: impl IntoIterator<Item = Effect>) {
        for effect in effects {
            self.run(effect);
        }
    }

    /// Spawn the work for one effect
    pub fn run(&self, effect: Effect) {
        let provider = Arc::clone(&self.provider);
        let outbox = self.outbox.clone();

        match effect {
            Effect::Generate { model, prompt } => {
                debug!(model = %model, prompt_len = prompt.len(), "Running generate effect");
                self.runtime.spawn(async move {
                    let result = provider.generate_once(&model, &prompt).await;
                    outbox.deliver(Action::GenerationFinished(result));
                });
            }
            Effect::StreamChat {
                session_id,
                handle,
                message,
            } => {
                info!(session_id = %session_id, model = %handle.model, "Running chat stream effect");
                self.runtime.spawn(async move {
                    let mut updates = spawn_reply_stream(provider, handle, message);
                    while let Some(update) = updates.recv().await {
                        let action = Action::Stream {
                            session_id: session_id.clone(),
                            update,
                        };
                        if !outbox.deliver(action) {
                            break;
                        }
                    }
                });
            }
        }
    }
}
