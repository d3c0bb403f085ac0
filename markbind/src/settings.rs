//! Project and per-asset settings.
//!
//! Settings are looked up by asset source path through a [`SettingsStore`].
//! [`JsonSettingsStore`] persists them to a JSON file; [`MemorySettingsStore`]
//! keeps them in memory.

use crate::error::SettingsError;
use markbind_codegen::{DuplicatePolicy, GenerationShape};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default project-relative directory holding UI assets.
pub const DEFAULT_ASSETS_ROOT: &str = "Assets";
/// Default output directory, relative to the assets root.
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "Markbind";
/// Default settings file, relative to the project root.
pub const DEFAULT_SETTINGS_FILE: &str = "ProjectSettings/MarkbindSettings.json";

/// Project-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    /// Whether generation commands are allowed.
    pub enabled: bool,
    /// Directory under the project root that output directories are relative to.
    pub assets_root: String,
    /// Output directory given to newly enabled assets.
    pub default_output_directory: String,
    /// Namespace given to newly enabled assets.
    pub default_namespace: String,
    /// Handling of elements sharing a field name or reusing a generated member.
    pub duplicate_names: DuplicatePolicy,
    /// Extra element types, tag to target type name.
    pub custom_types: BTreeMap<String, String>,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            assets_root: DEFAULT_ASSETS_ROOT.to_string(),
            default_output_directory: DEFAULT_OUTPUT_DIRECTORY.to_string(),
            default_namespace: String::new(),
            duplicate_names: DuplicatePolicy::default(),
            custom_types: BTreeMap::new(),
        }
    }
}

/// Generation settings of one asset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSetting {
    /// Output convention.
    pub generation_shape: GenerationShape,
    /// Output directory, relative to the assets root.
    pub output_directory: String,
    /// Namespace of generated classes.
    pub namespace: String,
    /// Prefix of generated class and file names.
    pub file_prefix: String,
    /// Suffix of generated class and file names.
    pub file_suffix: String,
    /// Source path of the asset; the lookup key.
    pub path: String,
    /// Where bindings were last written, relative to the project root.
    pub last_bindings_output_path: Option<PathBuf>,
    /// Where the script was last written, relative to the project root.
    pub last_script_output_path: Option<PathBuf>,
}

impl FileSetting {
    /// Creates a setting for `path` using the project defaults.
    #[must_use]
    pub fn with_defaults(path: impl Into<String>, project: &ProjectSettings) -> Self {
        Self {
            generation_shape: GenerationShape::Document,
            output_directory: project.default_output_directory.clone(),
            namespace: project.default_namespace.clone(),
            path: path.into(),
            ..Self::default()
        }
    }
}

/// Full settings document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Project-wide settings.
    pub project: ProjectSettings,
    /// Per-asset settings.
    pub files: Vec<FileSetting>,
}

/// Keyed access to [`Settings`].
pub trait SettingsStore {
    /// Returns the settings.
    fn settings(&self) -> &Settings;

    /// Returns the settings for modification.
    fn settings_mut(&mut self) -> &mut Settings;

    /// Persists the settings.
    ///
    /// # Errors
    /// Returns `SettingsError` if the settings cannot be written.
    fn save(&mut self) -> Result<(), SettingsError>;

    /// Returns the project-wide settings.
    fn project(&self) -> &ProjectSettings {
        &self.settings().project
    }

    /// Finds the setting of an asset.
    fn get(&self, path: &str) -> Option<&FileSetting> {
        self.settings().files.iter().find(|f| f.path == path)
    }

    /// Finds the setting of an asset for modification.
    fn get_mut(&mut self, path: &str) -> Option<&mut FileSetting> {
        self.settings_mut().files.iter_mut().find(|f| f.path == path)
    }

    /// Adds a setting, replacing one with the same path.
    fn add(&mut self, setting: FileSetting) {
        let files = &mut self.settings_mut().files;
        match files.iter_mut().find(|f| f.path == setting.path) {
            Some(existing) => *existing = setting,
            None => files.push(setting),
        }
    }

    /// Removes the setting of an asset.
    fn remove(&mut self, path: &str) -> Option<FileSetting> {
        let files = &mut self.settings_mut().files;
        let index = files.iter().position(|f| f.path == path)?;
        Some(files.remove(index))
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    settings: Settings,
    save_count: usize,
}

impl MemorySettingsStore {
    /// Creates a store holding `settings`.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            save_count: 0,
        }
    }

    /// Number of times [`SettingsStore::save`] was called.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl SettingsStore for MemorySettingsStore {
    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    fn save(&mut self) -> Result<(), SettingsError> {
        self.save_count += 1;
        Ok(())
    }
}

/// Store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl JsonSettingsStore {
    /// Opens the store at `path`. A missing file yields default settings.
    ///
    /// # Errors
    /// Returns `SettingsError` if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let settings = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Settings::default(),
            Err(source) => return Err(SettingsError::Io { path, source }),
        };
        Ok(Self { path, settings })
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    fn save(&mut self) -> Result<(), SettingsError> {
        let io_error = |source| SettingsError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let mut json = serde_json::to_string_pretty(&self.settings)?;
        json.push('\n');
        std::fs::write(&self.path, json).map_err(io_error)
    }
}

/// Normalizes an asset path into its lookup key.
///
/// Separators become `/` and a leading `./` is dropped.
#[must_use]
pub fn normalize_asset_path(path: &str) -> String {
    let unified = path.replace('\\', "/");
    unified
        .strip_prefix("./")
        .map(str::to_string)
        .unwrap_or(unified)
}
