// Panel views
// Each view reads controller state and returns the actions the user triggered

use crate::ui::components::{empty_hint, formatted_message, primary_button, typing_indicator, ACCENT};
use eframe::egui;
use nox_coder_core::chat::MessageRole;
use nox_coder_core::profile::LANGUAGES;
use nox_coder_core::{Action, AppState};

/// Code generator panel
pub fn generator_view(ui: &mut egui::Ui, state: &AppState, actions: &mut Vec<Action>) {
    let form = &state.generator;

    ui.horizontal_top(|ui| {
        ui.vertical(|ui| {
            ui.label(egui::RichText::new("Language").weak());
            egui::ComboBox::from_id_source("language_select")
                .selected_text(form.language.name)
                .width(180.0)
                .show_ui(ui, |ui| {
                    for lang in LANGUAGES {
                        if ui
                            .selectable_label(lang.id == form.language.id, lang.name)
                            .clicked()
                        {
                            actions.push(Action::SelectLanguage(lang.id.to_string()));
                        }
                    }
                });
            ui.label(egui::RichText::new(form.language.note).small().weak());
        });

        ui.add_space(12.0);

        ui.vertical(|ui| {
            ui.label(egui::RichText::new("What do you want to build?").weak());
            let mut prompt = form.prompt.clone();
            let response = ui.add(
                egui::TextEdit::multiline(&mut prompt)
                    .hint_text("e.g., a function that sorts a list of numbers")
                    .desired_rows(3)
                    .desired_width(f32::INFINITY),
            );
            if response.changed() {
                actions.push(Action::SetPrompt(prompt));
            }
        });
    });

    ui.add_space(8.0);
    ui.vertical_centered_justified(|ui| {
        if primary_button(ui, state.can_generate_code(), &state.generate_button_label()).clicked() {
            actions.push(Action::Generate);
        }
    });
    ui.add_space(8.0);

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_min_height(300.0);
        egui::ScrollArea::vertical()
            .id_source("generator_output")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                if form.loading {
                    ui.vertical_centered(|ui| {
                        ui.add_space(40.0);
                        ui.add(egui::Spinner::new());
                        ui.label("Generating code... please wait.");
                    });
                } else if form.output.is_empty() {
                    ui.vertical_centered(|ui| {
                        ui.add_space(40.0);
                        ui.label(egui::RichText::new("Your generated code will appear here.").weak());
                    });
                } else {
                    if let Some(details) = &form.error {
                        ui.colored_label(egui::Color32::from_rgb(248, 113, 113), details.as_str());
                    }
                    formatted_message(ui, &form.output);
                }
            });
    });
}

/// Active chat panel
pub fn chat_view(ui: &mut egui::Ui, state: &AppState, actions: &mut Vec<Action>) {
    if state.sessions().active().is_none() {
        empty_hint(ui, "Start a conversation", "Select a past chat or start a new one.");
        ui.vertical_centered(|ui| {
            if ui.button("Start New Chat").clicked() {
                actions.push(Action::NewChat);
            }
        });
        return;
    }

    let input_height = 48.0;
    egui::ScrollArea::vertical()
        .id_source("chat_messages")
        .auto_shrink([false; 2])
        .stick_to_bottom(true)
        .max_height(ui.available_height() - input_height)
        .show(ui, |ui| {
            for message in state.visible_messages() {
                // The empty reply is drawn as the typing indicator below
                if message.role == MessageRole::Model && message.content.is_empty() {
                    continue;
                }
                message_bubble(ui, message.role, &message.content);
                ui.add_space(8.0);
            }
            if state.is_waiting_for_first_chunk() {
                typing_indicator(ui);
            }
        });

    ui.separator();
    ui.horizontal(|ui| {
        let mut input = state.chat_input.clone();
        let response = ui.add(
            egui::TextEdit::singleline(&mut input)
                .hint_text("Ask the AI anything...")
                .desired_width(ui.available_width() - 80.0),
        );
        if response.changed() {
            actions.push(Action::SetChatInput(input));
        }
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if primary_button(ui, state.can_send(), "Send").clicked() || submitted {
            actions.push(Action::SendChat);
            response.request_focus();
        }
    });
}

fn message_bubble(ui: &mut egui::Ui, role: MessageRole, content: &str) {
    let (layout, fill) = match role {
        MessageRole::User => (
            egui::Layout::top_down(egui::Align::Max),
            egui::Color32::from_rgb(51, 65, 85),
        ),
        MessageRole::Model => (
            egui::Layout::top_down(egui::Align::Min),
            egui::Color32::from_rgb(30, 41, 59),
        ),
    };

    ui.with_layout(layout, |ui| {
        egui::Frame::none()
            .fill(fill)
            .rounding(egui::Rounding::same(10.0))
            .inner_margin(egui::Margin::same(10.0))
            .show(ui, |ui| {
                ui.set_max_width(ui.available_width() * 0.8);
                if role == MessageRole::Model {
                    ui.label(egui::RichText::new("Nox").small().color(ACCENT));
                }
                formatted_message(ui, content);
            });
    });
}

/// Past chats, newest first
pub fn history_view(ui: &mut egui::Ui, state: &AppState, actions: &mut Vec<Action>) {
    ui.horizontal(|ui| {
        ui.heading("Chat History");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("New Chat").clicked() {
                actions.push(Action::NewChat);
            }
        });
    });
    ui.separator();

    let sessions = state.sessions().list();
    if sessions.is_empty() {
        empty_hint(ui, "No chat history", "Start a new chat to see it here.");
        return;
    }

    egui::ScrollArea::vertical()
        .id_source("history_list")
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            for session in sessions {
                let is_active = state.sessions().active_id() == Some(session.id.as_str());
                let count = session.messages.len();

                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        let title = egui::RichText::new(&session.title).strong();
                        let title = if is_active { title.color(ACCENT) } else { title };
                        ui.vertical(|ui| {
                            if ui.link(title).clicked() {
                                actions.push(Action::SelectChat(session.id.clone()));
                            }
                            ui.label(
                                egui::RichText::new(format!(
                                    "{} message{} · {}",
                                    count,
                                    if count == 1 { "" } else { "s" },
                                    session.updated_at_datetime().format("%Y-%m-%d %H:%M")
                                ))
                                .small()
                                .weak(),
                            );
                        });
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui
                                .button(egui::RichText::new("Delete").color(egui::Color32::from_rgb(220, 0, 0)))
                                .on_hover_text("Delete chat")
                                .clicked()
                            {
                                actions.push(Action::DeleteChat(session.id.clone()));
                            }
                        });
                    });
                });
                ui.add_space(4.0);
            }
        });
}

/// Modal arithmetic puzzle; shown only while a dialog is open
pub fn puzzle_window(ctx: &egui::Context, state: &AppState, actions: &mut Vec<Action>) {
    let Some(dialog) = &state.puzzle else {
        return;
    };

    egui::Window::new("Solve a Puzzle")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!("Solve this to earn {} more generations.", state.puzzle_reward()));
            ui.add_space(8.0);
            ui.label(egui::RichText::new(&dialog.puzzle.question).size(18.0).strong());
            ui.add_space(8.0);

            let mut answer = dialog.answer.clone();
            let response = ui.add(egui::TextEdit::singleline(&mut answer).hint_text("Your answer"));
            if response.changed() {
                actions.push(Action::SetPuzzleAnswer(answer));
            }
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            if let Some(error) = &dialog.error {
                ui.colored_label(egui::Color32::from_rgb(248, 113, 113), error.as_str());
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    actions.push(Action::ClosePuzzle);
                }
                if primary_button(ui, dialog.can_submit(), "Submit").clicked() || submitted {
                    actions.push(Action::SubmitPuzzle);
                }
            });
        });
}
