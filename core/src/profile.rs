//! Version catalogue and model profiles
//!
//! Every selectable app version maps to a model, a persona and a tier through
//! [`profile_for_version`].

use crate::config::ModelConfig;
use crate::quota::Tier;
use once_cell::sync::Lazy;

/// The top version; the only one on the Pro tier
pub const PRO_VERSION: &str = "Nox Pro";

/// Numbered versions at or above this get the full assistant persona
pub const ADVANCED_PROFILE_MIN_VERSION: f64 = 5.0;

const CREATOR_LINE: &str = "When someone asks who made you, you must respond with \"I am an AI created by Noxy — a digital mind designed to learn, assist, and evolve through intelligence and code.\".";

/// Every selectable version, oldest first, ending with [`PRO_VERSION`]
pub static APP_VERSIONS: Lazy<Vec<String>> = Lazy::new(|| {
    let mut versions: Vec<String> = (1..=8)
        .flat_map(|major| (0..=9).map(move |minor| format!("Nox {}.{:02}.0", major, minor)))
        .collect();
    versions.push("Nox 9.00.0".to_string());
    versions.push(PRO_VERSION.to_string());
    versions
});

/// A language offered by the code generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageOption {
    /// Stable identifier
    pub id: &'static str,
    /// Display name, also used in the prompt
    pub name: &'static str,
    /// Short note shown under the picker
    pub note: &'static str,
}

/// Languages offered by the code generator; the first is the default
pub const LANGUAGES: &[LanguageOption] = &[
    LanguageOption { id: "lua", name: "Lua", note: "Game that uses this code language: Roblox" },
    LanguageOption { id: "javascript", name: "JavaScript", note: "Used in: Web Development" },
    LanguageOption { id: "python", name: "Python", note: "Used in: AI, Data Science" },
    LanguageOption { id: "typescript", name: "TypeScript", note: "Used in: Modern Web Apps" },
    LanguageOption { id: "go", name: "Go", note: "Used in: Backend Systems" },
    LanguageOption { id: "rust", name: "Rust", note: "Used in: Systems Programming" },
    LanguageOption { id: "java", name: "Java", note: "Used in: Enterprise Applications" },
    LanguageOption { id: "csharp", name: "C#", note: "Used in: Game Dev (Unity), .NET" },
];

/// Look up a language by id, falling back to the first entry
pub fn language_by_id(id: &str) -> &'static LanguageOption {
    LANGUAGES
        .iter()
        .find(|lang| lang.id == id)
        .unwrap_or(&LANGUAGES[0])
}

/// Model settings derived from the selected version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiProfile {
    /// Model identifier sent to the API
    pub model: String,
    /// System instruction for chat sessions
    pub system_instruction: String,
    /// Tier implied by the version
    pub tier: Tier,
}

/// Map a version name to its profile
pub fn profile_for_version(version: &str, models: &ModelConfig) -> AiProfile {
    if version == PRO_VERSION {
        return AiProfile {
            model: models.pro_model.clone(),
            system_instruction: format!(
                "You are Nox, a highly advanced AI coding assistant. You are an expert in all programming languages and software architecture. Provide detailed, expert-level answers. Format your responses with markdown. {}",
                CREATOR_LINE
            ),
            tier: Tier::Pro,
        };
    }

    let number = version.split(' ').nth(1).and_then(leading_float);
    if number.is_some_and(|n| n >= ADVANCED_PROFILE_MIN_VERSION) {
        return AiProfile {
            model: models.standard_model.clone(),
            system_instruction: format!(
                "You are Nox, a helpful AI coding assistant. Format your responses with markdown. {}",
                CREATOR_LINE
            ),
            tier: Tier::Standard,
        };
    }

    AiProfile {
        model: models.standard_model.clone(),
        system_instruction: format!(
            "You are a very simple, basic AI assistant. You are not very smart. Keep your answers extremely short and basic. Do not provide code. {}",
            CREATOR_LINE
        ),
        tier: Tier::Standard,
    }
}

/// Parse the longest numeric prefix, so "5.00.0" reads as 5.0
///
/// Leading whitespace, a sign and an exponent are accepted; trailing text is
/// ignored. Returns `None` when no digits lead the text.
fn leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();

    let mut pos = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos = 1;
    }
    let mut digits = 0;
    let mut seen_dot = false;
    while let Some(&b) = bytes.get(pos) {
        match b {
            b'0'..=b'9' => digits += 1,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        pos += 1;
    }
    if digits == 0 {
        return None;
    }

    let mut end = pos;
    // An exponent only counts when digits follow it
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp = pos + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = bytes[exp..].iter().take_while(|b| b.is_ascii_digit()).count();
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }
    text[..end].parse().ok()
}

/// Build the one-shot prompt for the code generator
pub fn build_code_prompt(language: &str, request: &str) -> String {
    format!(
        "Generate a code snippet in {}.\nThe user wants to accomplish the following: \"{}\".\nProvide only the code, with minimal explanation unless necessary for understanding.\nFormat the code correctly within a markdown code block.",
        language, request
    )
}
