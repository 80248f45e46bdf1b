//! Nox Coder core library
//!
//! Everything behind the desktop client that does not draw pixels: quota and
//! puzzle rules, chat sessions, the Gemini collaborator, reply streaming and
//! the controller that ties them together. The GUI crate renders from
//! [`controller::AppState`] and feeds it [`controller::Action`]s.

pub mod chat;
pub mod config;
pub mod controller;
pub mod error;
pub mod formatter;
pub mod gemini;
pub mod profile;
pub mod puzzle;
pub mod quota;
pub mod runner;
pub mod streaming;

pub use config::Config;
pub use controller::{Action, AppState, Effect, View};
pub use error::{AppError, PersistenceError, ProviderError};
pub use runner::EffectRunner;
