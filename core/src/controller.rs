//! View controller
//!
//! [`AppState`] is the single store behind the GUI. Every user intent and
//! every async result arrives as an [`Action`]; [`AppState::update`] applies it
//! and returns the [`Effect`]s that need to run off the GUI thread.

use crate::chat::{ChatMessage, SessionId, SessionStore};
use crate::config::{Config, ModelConfig};
use crate::error::ProviderError;
use crate::gemini::ChatHandle;
use crate::profile::{self, AiProfile, LanguageOption};
use crate::puzzle::{Puzzle, PuzzleDialog};
use crate::quota::{QuotaTracker, Remaining, Tier, TierLimits};
use crate::streaming::StreamUpdate;
use tracing::{debug, error, info, warn};

/// Output shown when code generation fails
pub const GENERATION_ERROR_MESSAGE: &str =
    "Error: Could not generate code. Please check the console for details.";

/// Top-level panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Code generator form
    #[default]
    Generator,
    /// Active chat conversation
    Chat,
    /// List of past chats
    History,
}

/// Inputs to [`AppState::update`]
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Switch panels
    ShowView(View),
    /// Show the active chat, starting one if none is active
    OpenChat,
    /// Start a new chat and show it
    NewChat,
    /// Activate a stored chat and show it
    SelectChat(SessionId),
    /// Remove a stored chat
    DeleteChat(SessionId),
    /// Switch app version
    SelectVersion(String),
    /// Pick the generator language by id
    SelectLanguage(String),
    /// Edit the generator prompt
    SetPrompt(String),
    /// Request code generation
    Generate,
    /// Result of a [`Effect::Generate`]
    GenerationFinished(Result<String, ProviderError>),
    /// Edit the chat input
    SetChatInput(String),
    /// Send the chat input
    SendChat,
    /// Progress of a [`Effect::StreamChat`]
    Stream {
        /// Session the stream belongs to
        session_id: SessionId,
        /// Latest update
        update: StreamUpdate,
    },
    /// Open the puzzle dialog
    OpenPuzzle,
    /// Dismiss the puzzle dialog
    ClosePuzzle,
    /// Edit the puzzle answer
    SetPuzzleAnswer(String),
    /// Check the puzzle answer
    SubmitPuzzle,
}

/// Async work requested by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// One-shot generation; answer with [`Action::GenerationFinished`]
    Generate {
        /// Model identifier
        model: String,
        /// Full prompt text
        prompt: String,
    },
    /// Streamed chat reply; answer with [`Action::Stream`] updates
    StreamChat {
        /// Session the reply belongs to
        session_id: SessionId,
        /// Conversation state before `message`
        handle: ChatHandle,
        /// User message to send
        message: String,
    },
}

/// State of the code generator panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorForm {
    /// Selected language
    pub language: &'static LanguageOption,
    /// What the user wants built
    pub prompt: String,
    /// Last generated output (or the failure message)
    pub output: String,
    /// Details of the last failure
    pub error: Option<String>,
    /// A generation request is running
    pub loading: bool,
}

impl Default for GeneratorForm {
    fn default() -> Self {
        Self {
            language: &profile::LANGUAGES[0],
            prompt: String::new(),
            output: String::new(),
            error: None,
            loading: false,
        }
    }
}

/// A chat exchange whose reply is still streaming
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InFlightExchange {
    /// Session being answered
    pub session_id: SessionId,
    /// Message that was sent
    pub user: ChatMessage,
    /// Reply so far
    pub reply: ChatMessage,
}

/// Application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Visible panel
    pub view: View,
    /// Generator panel
    pub generator: GeneratorForm,
    /// Chat input buffer
    pub chat_input: String,
    /// Open puzzle dialog
    pub puzzle: Option<PuzzleDialog>,
    version: String,
    profile: AiProfile,
    models: ModelConfig,
    puzzle_reward: u32,
    quota: QuotaTracker,
    sessions: SessionStore,
    in_flight: Option<InFlightExchange>,
}

impl AppState {
    /// Fresh state with no sessions
    pub fn new(config: &Config) -> Self {
        Self::with_sessions(config, SessionStore::new())
    }

    /// State seeded with previously saved sessions
    pub fn with_sessions(config: &Config, sessions: SessionStore) -> Self {
        let profile = profile::profile_for_version(&config.default_version, &config.models);
        let quota = QuotaTracker::new(profile.tier, TierLimits::from(&config.quota));

        Self {
            view: View::default(),
            generator: GeneratorForm::default(),
            chat_input: String::new(),
            puzzle: None,
            version: config.default_version.clone(),
            profile,
            models: config.models.clone(),
            puzzle_reward: config.quota.puzzle_reward,
            quota,
            sessions,
            in_flight: None,
        }
    }

    /// Selected app version
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Profile derived from the version
    pub fn profile(&self) -> &AiProfile {
        &self.profile
    }

    /// Current tier
    pub fn tier(&self) -> Tier {
        self.quota.tier()
    }

    /// Generation quota
    pub fn quota(&self) -> &QuotaTracker {
        &self.quota
    }

    /// Generations granted per solved puzzle
    pub fn puzzle_reward(&self) -> u32 {
        self.puzzle_reward
    }

    /// Stored chat sessions
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Exchange currently streaming, if any
    pub fn in_flight(&self) -> Option<&InFlightExchange> {
        self.in_flight.as_ref()
    }

    /// Apply an action and return the work it triggers
    pub fn update(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::ShowView(view) => {
                self.view = view;
            }
            Action::OpenChat => {
                if self.sessions.active().is_some() {
                    self.view = View::Chat;
                } else {
                    self.new_chat();
                }
            }
            Action::NewChat => self.new_chat(),
            Action::SelectChat(id) => {
                if self.sessions.select(&id) {
                    self.view = View::Chat;
                } else {
                    warn!(session_id = %id, "Selected chat does not exist");
                }
            }
            Action::DeleteChat(id) => self.delete_chat(&id),
            Action::SelectVersion(version) => self.select_version(version),
            Action::SelectLanguage(id) => {
                self.generator.language = profile::language_by_id(&id);
            }
            Action::SetPrompt(prompt) => {
                self.generator.prompt = prompt;
            }
            Action::Generate => return self.generate(),
            Action::GenerationFinished(result) => self.finish_generation(result),
            Action::SetChatInput(input) => {
                self.chat_input = input;
            }
            Action::SendChat => return self.send_chat(),
            Action::Stream { session_id, update } => self.apply_stream(session_id, update),
            Action::OpenPuzzle => {
                if self.quota.tier() == Tier::Standard {
                    self.puzzle = Some(PuzzleDialog::new(Puzzle::random()));
                } else {
                    debug!("Puzzle requested on Pro tier; ignoring");
                }
            }
            Action::ClosePuzzle => {
                self.puzzle = None;
            }
            Action::SetPuzzleAnswer(answer) => {
                if let Some(dialog) = self.puzzle.as_mut() {
                    dialog.set_answer(answer);
                }
            }
            Action::SubmitPuzzle => self.submit_puzzle(),
        }
        Vec::new()
    }

    fn new_chat(&mut self) {
        let session = self.sessions.create();
        info!(session_id = %session.id, "Started new chat");
        self.view = View::Chat;
    }

    fn delete_chat(&mut self, id: &str) {
        let was_active = self.sessions.active_id() == Some(id);
        if self.sessions.delete(id).is_none() {
            warn!(session_id = %id, "Deleted chat does not exist");
            return;
        }
        if self.in_flight.as_ref().is_some_and(|f| f.session_id == id) {
            self.in_flight = None;
        }
        if was_active {
            self.view = View::Generator;
        }
        info!(session_id = %id, "Deleted chat");
    }

    fn select_version(&mut self, version: String) {
        self.profile = profile::profile_for_version(&version, &self.models);
        self.quota.switch_tier(self.profile.tier);
        if self.profile.tier == Tier::Pro {
            self.puzzle = None;
        }
        info!(
            version = %version,
            model = %self.profile.model,
            tier = %self.profile.tier,
            "Switched app version"
        );
        self.version = version;
    }

    fn generate(&mut self) -> Vec<Effect> {
        if !self.can_generate_code() {
            debug!(
                loading = self.generator.loading,
                remaining = %self.quota.remaining(),
                "Ignoring generate request"
            );
            return Vec::new();
        }

        self.generator.output.clear();
        self.generator.error = None;
        self.generator.loading = true;

        let prompt = profile::build_code_prompt(self.generator.language.name, &self.generator.prompt);
        info!(
            model = %self.profile.model,
            language = self.generator.language.id,
            "Requesting code generation"
        );
        vec![Effect::Generate {
            model: self.profile.model.clone(),
            prompt,
        }]
    }

    fn finish_generation(&mut self, result: Result<String, ProviderError>) {
        if !self.generator.loading {
            debug!("Ignoring generation result with no request pending");
            return;
        }
        self.generator.loading = false;

        match result {
            Ok(text) => {
                self.generator.output = text;
                self.quota.consume();
                debug!(remaining = %self.quota.remaining(), "Generation finished");
            }
            Err(e) => {
                error!(error = %e, "Code generation failed");
                self.generator.output = GENERATION_ERROR_MESSAGE.to_string();
                self.generator.error = Some(e.to_string());
            }
        }
    }

    fn send_chat(&mut self) -> Vec<Effect> {
        if !self.can_send() {
            debug!(
                in_flight = self.in_flight.is_some(),
                "Ignoring chat send"
            );
            return Vec::new();
        }
        let Some(session) = self.sessions.active() else {
            return Vec::new();
        };

        let message = std::mem::take(&mut self.chat_input);
        let handle = ChatHandle {
            model: self.profile.model.clone(),
            system_instruction: self.profile.system_instruction.clone(),
            history: session.messages.clone(),
        };
        let session_id = session.id.clone();

        self.in_flight = Some(InFlightExchange {
            session_id: session_id.clone(),
            user: ChatMessage::user(message.clone()),
            reply: ChatMessage::model(String::new()),
        });

        info!(
            session_id = %session_id,
            history_len = handle.history.len(),
            "Sending chat message"
        );
        vec![Effect::StreamChat {
            session_id,
            handle,
            message,
        }]
    }

    fn apply_stream(&mut self, session_id: SessionId, update: StreamUpdate) {
        let Some(in_flight) = self.in_flight.as_mut().filter(|f| f.session_id == session_id) else {
            debug!(session_id = %session_id, "Ignoring update for a stream that is not in flight");
            return;
        };

        if !update.is_terminal() {
            in_flight.reply.content = update.text().to_string();
            return;
        }

        let Some(mut exchange) = self.in_flight.take() else {
            return;
        };
        exchange.reply.content = update.text().to_string();

        match self.sessions.get(&session_id).cloned() {
            Some(mut session) => {
                session.record_exchange(exchange.user, exchange.reply);
                debug!(
                    session_id = %session_id,
                    message_count = session.messages.len(),
                    "Stored chat exchange"
                );
                self.sessions.update(session);
            }
            None => {
                warn!(session_id = %session_id, "Chat was deleted before its reply finished");
            }
        }
    }

    fn submit_puzzle(&mut self) {
        let Some(dialog) = self.puzzle.as_mut() else {
            return;
        };
        match dialog.submit() {
            Ok(()) => {
                self.quota.reward(self.puzzle_reward);
                self.puzzle = None;
                info!(remaining = %self.quota.remaining(), "Puzzle solved");
            }
            Err(e) => {
                debug!(error = %e, "Puzzle answer rejected");
            }
        }
    }

    /// Whether the generate button should be enabled
    pub fn can_generate_code(&self) -> bool {
        !self.generator.prompt.trim().is_empty()
            && self.quota.can_generate()
            && !self.generator.loading
    }

    /// Whether the chat send button should be enabled
    pub fn can_send(&self) -> bool {
        !self.chat_input.trim().is_empty()
            && self.sessions.active().is_some()
            && self.in_flight.is_none()
    }

    /// Label for the generate button
    pub fn generate_button_label(&self) -> String {
        if self.generator.loading {
            return "Generating...".to_string();
        }
        match self.quota.remaining() {
            Remaining::Unlimited => "Generate Code (Unlimited)".to_string(),
            Remaining::Count(n) => format!("Generate Code ({} left)", n),
        }
    }

    /// Messages to render for the active chat, including any streaming reply
    pub fn visible_messages(&self) -> Vec<&ChatMessage> {
        let Some(session) = self.sessions.active() else {
            return Vec::new();
        };
        let mut messages: Vec<&ChatMessage> = session.messages.iter().collect();
        if let Some(in_flight) = self.in_flight.as_ref().filter(|f| f.session_id == session.id) {
            messages.push(&in_flight.user);
            messages.push(&in_flight.reply);
        }
        messages
    }

    /// Whether the active chat is waiting for the first reply chunk
    pub fn is_waiting_for_first_chunk(&self) -> bool {
        match (self.in_flight.as_ref(), self.sessions.active_id()) {
            (Some(f), Some(active)) => f.session_id == active && f.reply.content.is_empty(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::DEFAULT_TITLE;
    use crate::puzzle::MISMATCH_MESSAGE;

    fn standard_state() -> AppState {
        let mut state = AppState::new(&Config::default());
        state.update(Action::SelectVersion("Nox 5.00.0".to_string()));
        state
    }

    fn known_puzzle() -> PuzzleDialog {
        PuzzleDialog::new(Puzzle {
            question: "What is 2 + 3?".to_string(),
            answer: "5".to_string(),
        })
    }

    #[test]
    fn test_initial_state() {
        let state = AppState::new(&Config::default());
        assert_eq!(state.view, View::Generator);
        assert_eq!(state.version(), "Nox Pro");
        assert_eq!(state.tier(), Tier::Pro);
        assert_eq!(state.quota().remaining(), Remaining::Unlimited);
        assert_eq!(state.generator.language.id, "lua");
        assert_eq!(state.generate_button_label(), "Generate Code (Unlimited)");
    }

    #[test]
    fn test_select_version_resets_quota() {
        let mut state = standard_state();
        assert_eq!(state.tier(), Tier::Standard);
        assert_eq!(state.quota().remaining(), Remaining::Count(20));
        assert_eq!(state.profile().model, "gemini-2.5-flash");

        state.update(Action::SetPrompt("sort".to_string()));
        state.update(Action::Generate);
        state.update(Action::GenerationFinished(Ok("code".to_string())));
        assert_eq!(state.quota().remaining(), Remaining::Count(19));

        state.update(Action::SelectVersion("Nox 2.03.0".to_string()));
        assert_eq!(state.quota().remaining(), Remaining::Count(20));
        assert!(state.profile().system_instruction.contains("very simple"));
    }

    #[test]
    fn test_generate_emits_effect() {
        let mut state = standard_state();
        state.update(Action::SelectLanguage("rust".to_string()));
        state.update(Action::SetPrompt("parse a CSV file".to_string()));

        let effects = state.update(Action::Generate);
        assert_eq!(effects.len(), 1);
        match &effects[0] {
            Effect::Generate { model, prompt } => {
                assert_eq!(model, "gemini-2.5-flash");
                assert!(prompt.contains("in Rust"));
                assert!(prompt.contains("parse a CSV file"));
            }
            other => panic!("unexpected effect {:?}", other),
        }
        assert!(state.generator.loading);
        assert_eq!(state.generate_button_label(), "Generating...");

        assert!(state.update(Action::Generate).is_empty());
    }

    #[test]
    fn test_generate_ignored_when_blank_or_exhausted() {
        let mut state = standard_state();
        state.update(Action::SetPrompt("   ".to_string()));
        assert!(state.update(Action::Generate).is_empty());
        assert!(!state.can_generate_code());

        let mut config = Config::default();
        config.quota.standard_limit = 1;
        let mut state = AppState::new(&config);
        state.update(Action::SelectVersion("Nox 6.00.0".to_string()));
        state.update(Action::SetPrompt("x".to_string()));
        state.update(Action::Generate);
        state.update(Action::GenerationFinished(Ok("done".to_string())));
        assert_eq!(state.quota().remaining(), Remaining::Count(0));
        assert_eq!(state.generate_button_label(), "Generate Code (0 left)");
        assert!(state.update(Action::Generate).is_empty());
    }

    #[test]
    fn test_generation_failure_keeps_quota() {
        let mut state = standard_state();
        state.update(Action::SetPrompt("x".to_string()));
        state.update(Action::Generate);
        state.update(Action::GenerationFinished(Err(ProviderError::EmptyResponse)));

        assert_eq!(state.generator.output, GENERATION_ERROR_MESSAGE);
        assert!(state.generator.error.is_some());
        assert!(!state.generator.loading);
        assert_eq!(state.quota().remaining(), Remaining::Count(20));
    }

    #[test]
    fn test_stale_generation_result_ignored() {
        let mut state = standard_state();
        state.update(Action::GenerationFinished(Ok("late".to_string())));
        assert!(state.generator.output.is_empty());
        assert_eq!(state.quota().remaining(), Remaining::Count(20));
    }

    #[test]
    fn test_open_chat_creates_when_none_active() {
        let mut state = AppState::new(&Config::default());
        state.update(Action::OpenChat);
        assert_eq!(state.view, View::Chat);
        assert_eq!(state.sessions().len(), 1);

        state.update(Action::ShowView(View::History));
        state.update(Action::OpenChat);
        assert_eq!(state.view, View::Chat);
        assert_eq!(state.sessions().len(), 1);
    }

    #[test]
    fn test_send_chat_and_stream() {
        let mut state = AppState::new(&Config::default());
        state.update(Action::NewChat);
        let session_id = state.sessions().active_id().unwrap().to_string();

        state.update(Action::SetChatInput("Explain recursion in depth".to_string()));
        assert!(state.can_send());
        let effects = state.update(Action::SendChat);
        assert_eq!(effects.len(), 1);
        let Effect::StreamChat { handle, message, .. } = &effects[0] else {
            panic!("expected stream effect");
        };
        assert_eq!(message, "Explain recursion in depth");
        assert!(handle.history.is_empty());
        assert_eq!(handle.model, "gemini-2.5-pro");
        assert!(state.chat_input.is_empty());
        assert!(state.is_waiting_for_first_chunk());
        assert_eq!(state.visible_messages().len(), 2);

        state.update(Action::Stream {
            session_id: session_id.clone(),
            update: StreamUpdate::Partial("Hel".to_string()),
        });
        assert!(!state.is_waiting_for_first_chunk());
        assert_eq!(state.visible_messages()[1].content, "Hel");
        assert_eq!(state.sessions().active().unwrap().messages.len(), 0);

        state.update(Action::Stream {
            session_id: session_id.clone(),
            update: StreamUpdate::Finished("Hello".to_string()),
        });
        let session = state.sessions().active().unwrap();
        assert_eq!(session.title, "Explain recursion in depth");
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[1].content, "Hello");
        assert!(state.in_flight().is_none());
        assert_eq!(state.visible_messages().len(), 2);
    }

    #[test]
    fn test_send_ignored_while_streaming() {
        let mut state = AppState::new(&Config::default());
        state.update(Action::NewChat);
        state.update(Action::SetChatInput("one".to_string()));
        state.update(Action::SendChat);
        state.update(Action::SetChatInput("two".to_string()));
        assert!(!state.can_send());
        assert!(state.update(Action::SendChat).is_empty());
        assert_eq!(state.chat_input, "two");
    }

    #[test]
    fn test_send_requires_active_session() {
        let mut state = AppState::new(&Config::default());
        state.update(Action::SetChatInput("hello".to_string()));
        assert!(state.update(Action::SendChat).is_empty());
    }

    #[test]
    fn test_stream_failure_persists_error_text() {
        let mut state = AppState::new(&Config::default());
        state.update(Action::NewChat);
        let session_id = state.sessions().active_id().unwrap().to_string();
        state.update(Action::SetChatInput("hi".to_string()));
        state.update(Action::SendChat);

        state.update(Action::Stream {
            session_id,
            update: StreamUpdate::Failed(crate::streaming::CHAT_ERROR_MESSAGE.to_string()),
        });
        let session = state.sessions().active().unwrap();
        assert_eq!(
            session.messages[1].content,
            crate::streaming::CHAT_ERROR_MESSAGE
        );
    }

    #[test]
    fn test_delete_active_chat_returns_to_generator() {
        let mut state = AppState::new(&Config::default());
        state.update(Action::NewChat);
        let id = state.sessions().active_id().unwrap().to_string();
        state.update(Action::SetChatInput("hi".to_string()));
        state.update(Action::SendChat);

        state.update(Action::DeleteChat(id.clone()));
        assert_eq!(state.view, View::Generator);
        assert!(state.sessions().is_empty());
        assert!(state.in_flight().is_none());

        state.update(Action::Stream {
            session_id: id,
            update: StreamUpdate::Finished("late".to_string()),
        });
        assert!(state.sessions().is_empty());
    }

    #[test]
    fn test_delete_inactive_chat_keeps_view() {
        let mut state = AppState::new(&Config::default());
        state.update(Action::NewChat);
        let first = state.sessions().active_id().unwrap().to_string();
        state.update(Action::NewChat);

        state.update(Action::DeleteChat(first));
        assert_eq!(state.view, View::Chat);
        assert_eq!(state.sessions().len(), 1);
    }

    #[test]
    fn test_select_chat() {
        let mut state = AppState::new(&Config::default());
        state.update(Action::NewChat);
        let first = state.sessions().active_id().unwrap().to_string();
        state.update(Action::NewChat);
        state.update(Action::ShowView(View::History));

        state.update(Action::SelectChat(first.clone()));
        assert_eq!(state.view, View::Chat);
        assert_eq!(state.sessions().active_id(), Some(first.as_str()));
        assert_eq!(state.sessions().active().unwrap().title, DEFAULT_TITLE);

        state.update(Action::ShowView(View::History));
        state.update(Action::SelectChat("missing".to_string()));
        assert_eq!(state.view, View::History);
    }

    #[test]
    fn test_puzzle_only_on_standard() {
        let mut state = AppState::new(&Config::default());
        state.update(Action::OpenPuzzle);
        assert!(state.puzzle.is_none());

        let mut state = standard_state();
        state.update(Action::OpenPuzzle);
        assert!(state.puzzle.is_some());
        state.update(Action::ClosePuzzle);
        assert!(state.puzzle.is_none());
    }

    #[test]
    fn test_puzzle_reward_flow() {
        let mut state = standard_state();
        state.puzzle = Some(known_puzzle());

        state.update(Action::SetPuzzleAnswer("4".to_string()));
        state.update(Action::SubmitPuzzle);
        let dialog = state.puzzle.as_ref().unwrap();
        assert_eq!(dialog.error.as_deref(), Some(MISMATCH_MESSAGE));
        assert_eq!(state.quota().remaining(), Remaining::Count(20));

        state.update(Action::SetPuzzleAnswer(" 5 ".to_string()));
        assert!(state.puzzle.as_ref().unwrap().error.is_none());
        state.update(Action::SubmitPuzzle);
        assert!(state.puzzle.is_none());
        assert_eq!(state.quota().remaining(), Remaining::Count(120));
    }

    #[test]
    fn test_switching_to_pro_closes_puzzle() {
        let mut state = standard_state();
        state.puzzle = Some(known_puzzle());
        state.update(Action::SelectVersion("Nox Pro".to_string()));
        assert!(state.puzzle.is_none());
        assert_eq!(state.quota().remaining(), Remaining::Unlimited);
    }
}
