// UI module
// Layout, panel views and shared widgets

pub mod components;
pub mod layout;
pub mod views;

pub use layout::render_app_layout;
