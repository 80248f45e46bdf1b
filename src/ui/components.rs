// Reusable UI components
// Message rendering, navigation buttons and small widgets shared by the views

use eframe::egui;
use nox_coder_core::formatter::{self, ProseLine, Segment, Span};

/// Accent used for headings, the selected nav entry and the model avatar
pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(34, 211, 238);

/// Background of code blocks
const CODE_BG: egui::Color32 = egui::Color32::from_rgb(15, 23, 42);

/// Render model or user text with headings, bold spans and code blocks
pub fn formatted_message(ui: &mut egui::Ui, content: &str) {
    for segment in formatter::parse(content) {
        match segment {
            Segment::Prose(lines) => prose(ui, &lines),
            Segment::Code { language, body } => code_block(ui, language.as_deref(), &body),
        }
    }
}

fn prose(ui: &mut egui::Ui, lines: &[ProseLine]) {
    for line in lines {
        match line {
            ProseLine::Heading(text) => {
                ui.label(egui::RichText::new(text).heading().color(ACCENT));
            }
            ProseLine::Paragraph(spans) if spans.is_empty() => {
                ui.add_space(6.0);
            }
            ProseLine::Paragraph(spans) => {
                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing.x = 0.0;
                    for span in spans {
                        match span {
                            Span::Text(text) => ui.label(text.as_str()),
                            Span::Bold(text) => ui.label(egui::RichText::new(text).strong()),
                        };
                    }
                });
            }
        }
    }
}

fn code_block(ui: &mut egui::Ui, language: Option<&str>, body: &str) {
    egui::Frame::group(ui.style())
        .fill(CODE_BG)
        .rounding(egui::Rounding::same(6.0))
        .inner_margin(egui::Margin::same(8.0))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(language.unwrap_or("code"))
                        .small()
                        .weak(),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("Copy").clicked() {
                        ui.output_mut(|o| o.copied_text = body.to_string());
                    }
                });
            });
            // Read-only buffer keeps the text selectable
            let mut text: &str = body;
            ui.add(
                egui::TextEdit::multiline(&mut text)
                    .code_editor()
                    .desired_width(f32::INFINITY)
                    .desired_rows(1),
            );
        });
}

/// Full-width navigation entry; highlighted when `selected`
pub fn nav_button(ui: &mut egui::Ui, label: &str, selected: bool) -> egui::Response {
    let text = if selected {
        egui::RichText::new(label).strong().color(egui::Color32::BLACK)
    } else {
        egui::RichText::new(label)
    };
    let mut button = egui::Button::new(text).min_size(egui::vec2(ui.available_width(), 32.0));
    if selected {
        button = button.fill(ACCENT);
    }
    ui.add(button)
}

/// Render a primary action button that can be disabled
pub fn primary_button(ui: &mut egui::Ui, enabled: bool, text: &str) -> egui::Response {
    ui.add_enabled(enabled, egui::Button::new(egui::RichText::new(text).strong()))
}

/// Three-dot placeholder shown while the first reply chunk is pending
pub fn typing_indicator(ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.add(egui::Spinner::new().size(12.0).color(ACCENT));
        ui.label(egui::RichText::new("...").color(ACCENT));
    });
}

/// Centered hint for empty panels
pub fn empty_hint(ui: &mut egui::Ui, title: &str, detail: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(60.0);
        ui.heading(egui::RichText::new(title).size(20.0));
        ui.add_space(8.0);
        ui.label(egui::RichText::new(detail).weak());
        ui.add_space(16.0);
    });
}
