// Main application layout
// Header with version and quota, navigation sidebar and the active panel

use crate::ui::components::{nav_button, ACCENT};
use crate::ui::views::{chat_view, generator_view, history_view, puzzle_window};
use eframe::egui;
use nox_coder_core::profile::APP_VERSIONS;
use nox_coder_core::quota::Tier;
use nox_coder_core::{Action, AppState, View};

/// Render one frame and collect the actions the user triggered
///
/// Nothing here mutates state; the caller dispatches the returned actions.
pub fn render_app_layout(ctx: &egui::Context, state: &AppState) -> Vec<Action> {
    let mut actions = Vec::new();

    render_header(ctx, state, &mut actions);
    render_sidebar(ctx, state, &mut actions);

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.add_space(8.0);
        match state.view {
            View::Generator => generator_view(ui, state, &mut actions),
            View::Chat => chat_view(ui, state, &mut actions),
            View::History => history_view(ui, state, &mut actions),
        }
    });

    puzzle_window(ctx, state, &mut actions);

    actions
}

/// Title, version picker and quota status
fn render_header(ctx: &egui::Context, state: &AppState, actions: &mut Vec<Action>) {
    egui::TopBottomPanel::top("header").show(ctx, |ui| {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.heading(egui::RichText::new("Nox Coder AI").color(ACCENT).strong());
            ui.add_space(16.0);

            egui::ComboBox::from_id_source("version_select")
                .selected_text(state.version())
                .width(140.0)
                .show_ui(ui, |ui| {
                    for version in APP_VERSIONS.iter() {
                        if ui
                            .selectable_label(version == state.version(), version.as_str())
                            .clicked()
                        {
                            actions.push(Action::SelectVersion(version.clone()));
                        }
                    }
                });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if state.tier() == Tier::Standard
                    && ui
                        .button(format!("Get {} Generates", state.puzzle_reward()))
                        .clicked()
                {
                    actions.push(Action::OpenPuzzle);
                }
                ui.label(format!("Generations left: {}", state.quota().remaining()));
                ui.separator();
                ui.label(egui::RichText::new(state.tier().display_name()).strong());
            });
        });
        ui.add_space(6.0);
    });
}

/// Navigation between the three panels
fn render_sidebar(ctx: &egui::Context, state: &AppState, actions: &mut Vec<Action>) {
    egui::SidePanel::left("nav_sidebar")
        .resizable(false)
        .exact_width(180.0)
        .show(ctx, |ui| {
            ui.add_space(12.0);
            if nav_button(ui, "Code Generator", state.view == View::Generator).clicked() {
                actions.push(Action::ShowView(View::Generator));
            }
            ui.add_space(4.0);
            if nav_button(ui, "AI Chat", state.view == View::Chat).clicked() {
                actions.push(Action::OpenChat);
            }
            ui.add_space(4.0);
            if nav_button(ui, "Chat History", state.view == View::History).clicked() {
                actions.push(Action::ShowView(View::History));
            }

            ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
                ui.add_space(8.0);
                ui.label(
                    egui::RichText::new(format!("{} saved chats", state.sessions().len()))
                        .small()
                        .weak(),
                );
            });
        });
}
