//! Plugin settings persisted by the host as a key/value bag.
//!
//! # Responsibility
//! - Define every user-tunable option with its default.
//! - Load and save the bag as a JSON document.
//! - Resolve the effective storage root.
//!
//! # Invariants
//! - A missing settings file yields defaults, not an error.
//! - Unknown keys are ignored; missing keys take their defaults.

pub mod shortcut;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name of the default storage root under the home directory.
pub const DEFAULT_STORAGE_DIR_NAME: &str = ".codenote";

const DEFAULT_MAX_NOTES_PER_PROJECT: u32 = 1000;

/// Settings load/save error.
#[derive(Debug)]
pub enum SettingsError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "settings I/O failed for `{}`: {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "malformed settings `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

/// User-tunable plugin options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeNoteSettings {
    /// Storage root override; blank selects [`default_storage_path`].
    pub storage_path: String,
    /// Carried for the host settings page. Not enforced by the store.
    pub max_notes_per_project: u32,
    pub auto_save: bool,
    pub show_line_numbers: bool,
    pub enable_syntax_highlight: bool,
    pub custom_shortcut_enabled: bool,
    /// Space separated, e.g. `ctrl alt s`.
    pub custom_shortcut_key_stroke: String,
}

impl Default for CodeNoteSettings {
    fn default() -> Self {
        Self {
            storage_path: String::new(),
            max_notes_per_project: DEFAULT_MAX_NOTES_PER_PROJECT,
            auto_save: true,
            show_line_numbers: true,
            enable_syntax_highlight: true,
            custom_shortcut_enabled: false,
            custom_shortcut_key_stroke: String::new(),
        }
    }
}

impl CodeNoteSettings {
    /// Storage root actually used by the store.
    pub fn effective_storage_path(&self) -> PathBuf {
        let trimmed = self.storage_path.trim();
        if trimmed.is_empty() {
            default_storage_path()
        } else {
            PathBuf::from(trimmed)
        }
    }

    /// Copy with out-of-range values clamped.
    pub fn sanitized(&self) -> Self {
        let mut copy = self.clone();
        copy.max_notes_per_project = copy.max_notes_per_project.max(1);
        copy.custom_shortcut_key_stroke = copy.custom_shortcut_key_stroke.trim().to_string();
        copy
    }

    /// Loads settings from `path`; a missing file yields defaults.
    ///
    /// # Errors
    /// - Returns `SettingsError::Io` when the file exists but cannot be read.
    /// - Returns `SettingsError::Json` when the document is malformed.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            info!(
                "event=settings_load module=settings status=skip reason=missing path={}",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Self =
            serde_json::from_str(&content).map_err(|source| SettingsError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(settings.sanitized())
    }

    /// Loads settings, falling back to defaults on any failure.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|err| {
            warn!("event=settings_load module=settings status=error error={err}");
            Self::default()
        })
    }

    /// Writes settings to `path` as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content =
            serde_json::to_string_pretty(&self.sanitized()).map_err(|source| SettingsError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        fs::write(path, content).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            "event=settings_save module=settings status=ok path={}",
            path.display()
        );
        Ok(())
    }
}

/// `<home>/.codenote`, or a relative `.codenote` when no home is known.
pub fn default_storage_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_STORAGE_DIR_NAME)
}
