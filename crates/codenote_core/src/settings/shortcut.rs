//! Tool-window shortcut parsing and keymap binding.
//!
//! # Responsibility
//! - Parse user-entered shortcut text (`ctrl alt s`) into a key stroke.
//! - Validate shortcut text before the settings page accepts it.
//! - Rebind the tool-window actions on a host keymap.
//!
//! # Invariants
//! - Applying always leaves exactly one stroke bound to each managed action.
//! - An unparsable custom shortcut falls back to the default binding.

use crate::settings::CodeNoteSettings;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

/// Action toggling the notes tool window.
pub const SHOW_CODE_NOTES_ACTION_ID: &str = "ShowCodeNotes";
/// Same toggle, registered from the main menu.
pub const SHOW_CODE_NOTES_FROM_MENU_ACTION_ID: &str = "ShowCodeNotesFromMenu";

const MANAGED_ACTIONS: [&str; 2] = [
    SHOW_CODE_NOTES_ACTION_ID,
    SHOW_CODE_NOTES_FROM_MENU_ACTION_ID,
];

static FUNCTION_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^f\d{1,2}$").expect("valid function key regex"));

/// Keyboard modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modifier {
    Control,
    Alt,
    Shift,
    Meta,
}

impl Modifier {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "ctrl" | "control" => Some(Self::Control),
            "alt" => Some(Self::Alt),
            "shift" => Some(Self::Shift),
            "cmd" | "win" | "meta" => Some(Self::Meta),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Control => "control",
            Self::Alt => "alt",
            Self::Shift => "shift",
            Self::Meta => "meta",
        }
    }
}

/// Parsed key stroke: modifiers in input order plus one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyStroke {
    pub modifiers: Vec<Modifier>,
    /// Upper-cased key name, e.g. `S` or `F5`.
    pub key: String,
}

impl Display for KeyStroke {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{} ", modifier.as_str())?;
        }
        write!(f, "{}", self.key)
    }
}

/// Host keymap the shortcut manager rebinds.
pub trait Keymap {
    /// Strokes currently bound to `action_id`.
    fn shortcuts(&self, action_id: &str) -> Vec<KeyStroke>;
    fn remove_shortcut(&mut self, action_id: &str, stroke: &KeyStroke);
    fn add_shortcut(&mut self, action_id: &str, stroke: KeyStroke);
}

/// Parses shortcut text such as `ctrl alt s`.
///
/// Tokens are whitespace separated and case-insensitive. The last
/// non-modifier token becomes the key. Returns `None` without a key.
pub fn parse_key_stroke(text: &str) -> Option<KeyStroke> {
    let mut modifiers = Vec::new();
    let mut key = None;
    for token in text.trim().to_lowercase().split_whitespace() {
        match Modifier::from_token(token) {
            Some(modifier) => {
                if !modifiers.contains(&modifier) {
                    modifiers.push(modifier);
                }
            }
            None => key = Some(token.to_uppercase()),
        }
    }
    key.map(|key| KeyStroke { modifiers, key })
}

/// Validates shortcut text for the settings page.
///
/// Accepts known modifiers plus at least one key that is a single
/// alphanumeric character or a function key `F1`..`F99`.
pub fn validate_shortcut_text(text: &str) -> bool {
    let lowered = text.trim().to_lowercase();
    if lowered.is_empty() {
        return false;
    }

    let mut has_key = false;
    for token in lowered.split_whitespace() {
        if Modifier::from_token(token).is_some() {
            continue;
        }
        let mut chars = token.chars();
        let single_alnum = matches!(
            (chars.next(), chars.next()),
            (Some(c), None) if c.is_alphanumeric()
        );
        if single_alnum || FUNCTION_KEY_RE.is_match(token) {
            has_key = true;
        } else {
            return false;
        }
    }

    has_key && parse_key_stroke(&lowered).is_some()
}

/// Default tool-window toggle stroke (`control alt S`).
pub fn default_key_stroke() -> KeyStroke {
    KeyStroke {
        modifiers: vec![Modifier::Control, Modifier::Alt],
        key: "S".to_string(),
    }
}

/// Human-readable description of the active binding.
pub fn shortcut_description(settings: &CodeNoteSettings) -> String {
    let custom = settings.custom_shortcut_key_stroke.trim();
    if settings.custom_shortcut_enabled && !custom.is_empty() {
        format!("{custom} (toggle show/hide)")
    } else {
        "Ctrl+Alt+S (default, toggle show/hide)".to_string()
    }
}

/// Applies the configured tool-window shortcut to a host keymap.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShortcutManager;

impl ShortcutManager {
    pub fn new() -> Self {
        Self
    }

    /// Rebinds the managed actions and returns the stroke now in effect.
    pub fn apply(&self, settings: &CodeNoteSettings, keymap: &mut dyn Keymap) -> KeyStroke {
        let custom = settings.custom_shortcut_key_stroke.trim();
        let stroke = if settings.custom_shortcut_enabled && !custom.is_empty() {
            match parse_key_stroke(custom) {
                Some(stroke) => stroke,
                None => {
                    warn!(
                        "event=shortcut_apply module=settings status=fallback reason=unparsable"
                    );
                    default_key_stroke()
                }
            }
        } else {
            default_key_stroke()
        };

        for action_id in MANAGED_ACTIONS {
            for existing in keymap.shortcuts(action_id) {
                keymap.remove_shortcut(action_id, &existing);
            }
            keymap.add_shortcut(action_id, stroke.clone());
        }
        info!("event=shortcut_apply module=settings status=ok stroke={stroke}");
        stroke
    }
}
