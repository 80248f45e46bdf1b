// State management module
// Glues the core controller to the window: action dispatch, background results
// and session saving

pub mod app_state;

pub use app_state::AppShell;
