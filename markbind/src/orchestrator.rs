//! Asset orchestration.
//!
//! The [`Orchestrator`] resolves per-asset settings through a
//! [`SettingsStore`], computes output paths, runs the generator and applies
//! the overwrite policy: bindings are rewritten on every run, scripts are
//! written only when absent.

use crate::asset::{GenerationAsset, is_bindings_file, output_directory};
use crate::error::MarkbindError;
use crate::settings::{FileSetting, SettingsStore, normalize_asset_path};
use markbind_codegen::{GenerationWarning, Generator, TypeTable};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What happened to an output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The file was written.
    Written,
    /// The file already existed and was left untouched.
    Skipped,
}

/// Result of generating one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Asset source path.
    pub source_path: String,
    /// Name of the generated class.
    pub class_name: String,
    /// Absolute path of the artifact.
    pub output_path: PathBuf,
    /// Whether the artifact was written.
    pub outcome: Outcome,
    /// Non-fatal problems found while generating.
    pub warnings: Vec<GenerationWarning>,
}

/// Result of regenerating every configured asset.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Assets whose bindings were written.
    pub succeeded: Vec<GenerationReport>,
    /// Assets that failed, with their source path.
    pub failed: Vec<(String, MarkbindError)>,
}

impl BatchReport {
    /// Returns true if no asset failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result of clearing every generated bindings file.
#[derive(Debug, Default)]
pub struct ClearReport {
    /// Deleted files.
    pub removed: Vec<PathBuf>,
    /// Files or directories that could not be processed.
    pub failures: Vec<MarkbindError>,
}

impl ClearReport {
    /// Deletes one file, recording the outcome instead of failing.
    fn delete(&mut self, path: PathBuf) {
        match std::fs::remove_file(&path) {
            Ok(()) => self.removed.push(path),
            Err(e) => {
                tracing::error!("Failed to delete {}: {}", path.display(), e);
                self.failures.push(MarkbindError::io(path, e));
            }
        }
    }
}

/// Builder for configuring and creating an orchestrator.
pub struct OrchestratorBuilder<S> {
    store: S,
    project_root: PathBuf,
    extra_types: BTreeMap<String, String>,
}

impl<S: SettingsStore> OrchestratorBuilder<S> {
    /// Creates a builder over `store` rooted at the current directory.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            project_root: PathBuf::from("."),
            extra_types: BTreeMap::new(),
        }
    }

    /// Sets the project root that asset and output paths are relative to.
    #[must_use]
    pub fn project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    /// Adds a type binding on top of the built-in table and project settings.
    #[must_use]
    pub fn custom_type(
        mut self,
        tag: impl Into<String>,
        target_type_name: impl Into<String>,
    ) -> Self {
        self.extra_types.insert(tag.into(), target_type_name.into());
        self
    }

    /// Builds the orchestrator.
    #[must_use]
    pub fn build(self) -> Orchestrator<S> {
        Orchestrator {
            store: self.store,
            project_root: self.project_root,
            extra_types: self.extra_types,
        }
    }
}

/// Drives generation for configured assets.
pub struct Orchestrator<S> {
    store: S,
    project_root: PathBuf,
    extra_types: BTreeMap<String, String>,
}

impl<S: SettingsStore> Orchestrator<S> {
    /// Creates a builder over `store`.
    #[must_use]
    pub fn builder(store: S) -> OrchestratorBuilder<S> {
        OrchestratorBuilder::new(store)
    }

    /// Returns the settings store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the orchestrator, returning its store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// Returns the project root.
    #[must_use]
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Returns the built-in table extended with project and builder types.
    #[must_use]
    pub fn type_table(&self) -> TypeTable {
        TypeTable::builtin().extended(
            self.store
                .project()
                .custom_types
                .iter()
                .chain(self.extra_types.iter()),
        )
    }

    /// Registers an asset with the project defaults.
    ///
    /// Returns the existing setting if the asset is already registered.
    ///
    /// # Errors
    /// Returns `MarkbindError::Settings` if the settings cannot be saved.
    pub fn enable(&mut self, path: &str) -> Result<FileSetting, MarkbindError> {
        let key = normalize_asset_path(path);
        if let Some(existing) = self.store.get(&key) {
            return Ok(existing.clone());
        }

        let setting = FileSetting::with_defaults(key.as_str(), self.store.project());
        self.store.add(setting.clone());
        self.store.save()?;
        tracing::info!("Enabled binding generation for {}", key);
        Ok(setting)
    }

    /// Unregisters an asset. Generated files are left in place.
    ///
    /// # Errors
    /// Returns `MarkbindError::Settings` if the settings cannot be saved.
    pub fn disable(&mut self, path: &str) -> Result<Option<FileSetting>, MarkbindError> {
        let key = normalize_asset_path(path);
        let removed = self.store.remove(&key);
        if removed.is_some() {
            self.store.save()?;
            tracing::info!("Disabled binding generation for {}", key);
        }
        Ok(removed)
    }

    /// Applies `change` to an asset's setting and saves.
    ///
    /// # Errors
    /// Returns `MarkbindError::NotConfigured` if the asset is not registered,
    /// or `MarkbindError::Settings` if the settings cannot be saved.
    pub fn update(
        &mut self,
        path: &str,
        change: impl FnOnce(&mut FileSetting),
    ) -> Result<(), MarkbindError> {
        let key = normalize_asset_path(path);
        let setting = self
            .store
            .get_mut(&key)
            .ok_or_else(|| MarkbindError::not_configured(key.as_str()))?;
        change(setting);
        self.store.save()?;
        Ok(())
    }

    /// Loads a registered asset.
    ///
    /// # Errors
    /// Returns `MarkbindError::NotConfigured` if the asset is not registered,
    /// or a read or parse error for its markup.
    pub fn load_asset(&self, path: &str) -> Result<GenerationAsset, MarkbindError> {
        let key = normalize_asset_path(path);
        let Some(setting) = self.store.get(&key) else {
            tracing::warn!("{} has no binding settings; enable it first", key);
            return Err(MarkbindError::not_configured(key));
        };
        GenerationAsset::load(&self.project_root, self.store.project(), setting.clone())
    }

    /// Regenerates the bindings file of an asset.
    ///
    /// The file is overwritten unconditionally. A bindings file left at a
    /// previously recorded path is removed once the new one is written;
    /// failing to remove it only logs a warning.
    ///
    /// # Errors
    /// Returns `MarkbindError` if generation is disabled, the asset is not
    /// registered, its markup is invalid, or a file cannot be written.
    pub fn generate_bindings(&mut self, path: &str) -> Result<GenerationReport, MarkbindError> {
        self.ensure_enabled()?;
        let asset = self.load_asset(path)?;
        tracing::info!("Generating bindings for {}", asset.source_path);

        let table = self.type_table();
        let source = Generator::new(&table)
            .with_duplicate_policy(self.store.project().duplicate_names)
            .generate_bindings(&asset.root, asset.settings.generation_shape, &asset.context())?;
        for warning in &source.warnings {
            tracing::warn!("{}: {}", asset.source_path, warning);
        }

        let output_path = self.project_root.join(&asset.bindings_output_path);
        write_source(&output_path, &source.code)?;

        if let Some(previous) = &asset.settings.last_bindings_output_path {
            if *previous != asset.bindings_output_path {
                let stale = self.project_root.join(previous);
                match remove_with_meta(&stale) {
                    Ok(true) => tracing::info!("Removed stale bindings {}", stale.display()),
                    Ok(false) => {}
                    Err(e) => tracing::warn!("Failed to remove stale bindings: {}", e),
                }
            }
        }

        let recorded = asset.bindings_output_path.clone();
        self.update(&asset.source_path, |setting| {
            setting.last_bindings_output_path = Some(recorded);
        })?;
        tracing::info!(
            "Wrote bindings {} for {}",
            output_path.display(),
            asset.source_path
        );

        Ok(GenerationReport {
            source_path: asset.source_path,
            class_name: source.class_name,
            output_path,
            outcome: Outcome::Written,
            warnings: source.warnings,
        })
    }

    /// Writes the script companion of an asset if it does not exist yet.
    ///
    /// # Errors
    /// Returns `MarkbindError` if generation is disabled, the asset is not
    /// registered, its markup is invalid, or the file cannot be written.
    pub fn generate_script(&mut self, path: &str) -> Result<GenerationReport, MarkbindError> {
        self.ensure_enabled()?;
        let asset = self.load_asset(path)?;
        let source = Generator::new(TypeTable::builtin())
            .generate_script(asset.settings.generation_shape, &asset.context())?;

        let output_path = self.project_root.join(&asset.script_output_path);
        let outcome = if output_path.exists() {
            tracing::info!(
                "Script {} already exists; leaving it untouched",
                output_path.display()
            );
            Outcome::Skipped
        } else {
            write_source(&output_path, &source.code)?;
            tracing::info!(
                "Wrote script {} for {}",
                output_path.display(),
                asset.source_path
            );
            Outcome::Written
        };

        let recorded = asset.script_output_path.clone();
        self.update(&asset.source_path, |setting| {
            setting.last_script_output_path = Some(recorded);
        })?;

        Ok(GenerationReport {
            source_path: asset.source_path,
            class_name: source.class_name,
            output_path,
            outcome,
            warnings: source.warnings,
        })
    }

    /// Regenerates bindings for every registered asset.
    ///
    /// A failing asset is logged and recorded; the others still run.
    ///
    /// # Errors
    /// Returns `MarkbindError::Disabled` if generation is disabled.
    pub fn generate_all(&mut self) -> Result<BatchReport, MarkbindError> {
        self.ensure_enabled()?;
        let paths: Vec<String> = self
            .store
            .settings()
            .files
            .iter()
            .map(|f| f.path.clone())
            .collect();

        let mut report = BatchReport::default();
        for path in paths {
            match self.generate_bindings(&path) {
                Ok(generated) => report.succeeded.push(generated),
                Err(e) => {
                    tracing::error!("Failed to generate bindings for {}: {}", path, e);
                    report.failed.push((path, e));
                }
            }
        }

        tracing::info!(
            "Generated bindings for {} assets, {} failed",
            report.succeeded.len(),
            report.failed.len()
        );
        Ok(report)
    }

    /// Deletes the last generated bindings file of an asset.
    ///
    /// Returns the deleted path, or `None` if there was nothing to delete.
    ///
    /// # Errors
    /// Returns `MarkbindError::NotConfigured` if the asset is not registered,
    /// or an IO or settings error.
    pub fn clear_bindings(&mut self, path: &str) -> Result<Option<PathBuf>, MarkbindError> {
        let key = normalize_asset_path(path);
        let Some(setting) = self.store.get(&key) else {
            tracing::warn!("{} has no binding settings; nothing to clear", key);
            return Err(MarkbindError::not_configured(key));
        };
        let Some(last) = setting.last_bindings_output_path.clone() else {
            return Ok(None);
        };

        let target = self.project_root.join(&last);
        let removed = remove_with_meta(&target)?;
        self.update(&key, |setting| setting.last_bindings_output_path = None)?;

        if removed {
            tracing::info!("Removed bindings {}", target.display());
            Ok(Some(target))
        } else {
            Ok(None)
        }
    }

    /// Deletes every generated bindings file under the configured output
    /// directories.
    ///
    /// Deletion is best effort: failures are collected and the walk goes on.
    ///
    /// # Errors
    /// Returns `MarkbindError::Settings` if the cleared paths cannot be saved.
    pub fn clear_all_bindings(&mut self) -> Result<ClearReport, MarkbindError> {
        let project = self.store.project();
        let roots: BTreeSet<PathBuf> = self
            .store
            .settings()
            .files
            .iter()
            .map(|f| self.project_root.join(output_directory(project, f, false)))
            .collect();

        let mut report = ClearReport::default();
        for root in roots.iter().filter(|r| r.is_dir()) {
            for entry in WalkDir::new(root) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        let path = e.path().unwrap_or(root.as_path()).to_path_buf();
                        tracing::error!("Failed to walk {}: {}", path.display(), e);
                        report.failures.push(MarkbindError::io(path, e.into()));
                        continue;
                    }
                };
                if entry.file_type().is_file() && is_bindings_file(entry.path()) {
                    report.delete(entry.into_path());
                }
            }
        }

        let project_root = self.project_root.clone();
        let mut changed = false;
        for setting in &mut self.store.settings_mut().files {
            let gone = setting
                .last_bindings_output_path
                .as_ref()
                .is_some_and(|last| !project_root.join(last).exists());
            if gone {
                setting.last_bindings_output_path = None;
                changed = true;
            }
        }
        if changed {
            self.store.save()?;
        }

        tracing::info!(
            "Cleared {} generated files, {} failures",
            report.removed.len(),
            report.failures.len()
        );
        Ok(report)
    }

    fn ensure_enabled(&self) -> Result<(), MarkbindError> {
        if self.store.project().enabled {
            Ok(())
        } else {
            tracing::warn!("Binding generation is disabled for this project");
            Err(MarkbindError::Disabled)
        }
    }
}

fn write_source(path: &Path, code: &str) -> Result<(), MarkbindError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| MarkbindError::io(parent, e))?;
    }
    std::fs::write(path, code).map_err(|e| MarkbindError::io(path, e))
}

/// Removes `path` and its `.meta` companion. Missing files are not an error.
fn remove_with_meta(path: &Path) -> Result<bool, MarkbindError> {
    let mut meta = path.as_os_str().to_owned();
    meta.push(".meta");
    remove_if_present(Path::new(&meta))?;
    remove_if_present(path)
}

fn remove_if_present(path: &Path) -> Result<bool, MarkbindError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(MarkbindError::io(path, e)),
    }
}
