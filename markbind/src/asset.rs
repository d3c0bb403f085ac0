//! UI document assets under management.

use crate::error::MarkbindError;
use crate::settings::{FileSetting, ProjectSettings};
use markbind_codegen::AssetContext;
use markbind_markup::{MarkupNode, parse_document};
use std::path::{Path, PathBuf};

/// Root attribute marking a document as an editor extension.
pub const EDITOR_ONLY_ATTRIBUTE: &str = "editor-extension-mode";
/// Extra output directory segment for editor-only documents.
pub const EDITOR_DIRECTORY: &str = "Editor";
/// File name marker of fully regenerated bindings.
pub const BINDINGS_MARKER: &str = ".g";
/// Extension of generated sources.
pub const SOURCE_EXTENSION: &str = ".cs";

/// One markup file being generated.
///
/// Output paths are relative to the project root.
#[derive(Debug, Clone)]
pub struct GenerationAsset {
    /// File stem of the source path.
    pub name: String,
    /// Source path; the settings key.
    pub source_path: String,
    /// Parsed document element.
    pub root: MarkupNode,
    /// Whether the root is flagged as an editor extension.
    pub is_editor_only: bool,
    /// Settings the asset was resolved with.
    pub settings: FileSetting,
    /// Where bindings are written.
    pub bindings_output_path: PathBuf,
    /// Where the script is written.
    pub script_output_path: PathBuf,
}

impl GenerationAsset {
    /// Builds an asset from markup text.
    ///
    /// # Errors
    /// Returns `MarkbindError::Parse` if the markup is malformed or the
    /// editor-only flag is not a truth string.
    pub fn from_markup(
        markup: &str,
        project: &ProjectSettings,
        settings: FileSetting,
    ) -> Result<Self, MarkbindError> {
        let parse_error = |source| MarkbindError::Parse {
            path: settings.path.clone(),
            source,
        };

        let root = parse_document(markup).map_err(parse_error)?;
        let is_editor_only = root
            .bool_attribute(EDITOR_ONLY_ATTRIBUTE)
            .map_err(parse_error)?;

        let name = Path::new(&settings.path)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let directory = output_directory(project, &settings, is_editor_only);
        let file_stem = format!("{}{}{}", settings.file_prefix, name, settings.file_suffix);
        let bindings_output_path =
            directory.join(format!("{}{}{}", file_stem, BINDINGS_MARKER, SOURCE_EXTENSION));
        let script_output_path = directory.join(format!("{}{}", file_stem, SOURCE_EXTENSION));

        Ok(Self {
            name,
            source_path: settings.path.clone(),
            root,
            is_editor_only,
            settings,
            bindings_output_path,
            script_output_path,
        })
    }

    /// Reads and parses the asset's markup below `project_root`.
    ///
    /// # Errors
    /// Returns `MarkbindError::Io` if the file cannot be read, or
    /// `MarkbindError::Parse` if it is malformed.
    pub fn load(
        project_root: &Path,
        project: &ProjectSettings,
        settings: FileSetting,
    ) -> Result<Self, MarkbindError> {
        let source = project_root.join(&settings.path);
        let markup =
            std::fs::read_to_string(&source).map_err(|e| MarkbindError::io(&source, e))?;
        Self::from_markup(&markup, project, settings)
    }

    /// Returns the naming context for the generator.
    #[must_use]
    pub fn context(&self) -> AssetContext {
        AssetContext::new(self.name.clone())
            .with_namespace(self.settings.namespace.clone())
            .with_affixes(
                self.settings.file_prefix.clone(),
                self.settings.file_suffix.clone(),
            )
    }
}

/// Directory receiving an asset's outputs, relative to the project root.
#[must_use]
pub fn output_directory(
    project: &ProjectSettings,
    settings: &FileSetting,
    is_editor_only: bool,
) -> PathBuf {
    let mut directory = PathBuf::from(&project.assets_root).join(&settings.output_directory);
    if is_editor_only {
        directory.push(EDITOR_DIRECTORY);
    }
    directory
}

/// Returns true if `path` names a generated bindings file or its metadata.
#[must_use]
pub fn is_bindings_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let marker = format!("{}{}", BINDINGS_MARKER, SOURCE_EXTENSION);
    name.ends_with(&marker) || name.ends_with(&format!("{}.meta", marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MENU: &str = r#"<ui:UXML xmlns:ui="UnityEngine.UIElements">
    <ui:Button name="Play"/>
</ui:UXML>"#;

    const TOOL: &str = r#"<ui:UXML xmlns:ui="UnityEngine.UIElements" editor-extension-mode="True">
    <ui:Button name="Run"/>
</ui:UXML>"#;

    fn file_setting(path: &str) -> FileSetting {
        let mut setting = FileSetting::with_defaults(path, &ProjectSettings::default());
        setting.namespace = "Game.UI".to_string();
        setting
    }

    #[test]
    fn test_asset_paths() {
        let project = ProjectSettings::default();
        let setting = file_setting("Assets/UI/Menu.uxml");
        let asset =
            GenerationAsset::from_markup(MENU, &project, setting).expect("Failed to load asset");

        assert_eq!(asset.name, "Menu");
        assert!(!asset.is_editor_only);
        assert_eq!(
            asset.bindings_output_path,
            PathBuf::from("Assets").join("Markbind").join("Menu.g.cs")
        );
        assert_eq!(
            asset.script_output_path,
            PathBuf::from("Assets").join("Markbind").join("Menu.cs")
        );
    }

    #[test]
    fn test_asset_paths_with_affixes() {
        let mut setting = file_setting("Assets/UI/Menu.uxml");
        setting.file_prefix = "UI".to_string();
        setting.file_suffix = "View".to_string();
        let asset = GenerationAsset::from_markup(MENU, &ProjectSettings::default(), setting)
            .expect("Failed to load asset");

        assert_eq!(
            asset.bindings_output_path.file_name().and_then(|n| n.to_str()),
            Some("UIMenuView.g.cs")
        );
        assert_eq!(asset.context().decorated_name(), "UIMenuView");
    }

    #[test]
    fn test_editor_only_routes_to_editor_directory() {
        let project = ProjectSettings::default();
        let setting = file_setting("Assets/Tools/Tool.uxml");
        let asset =
            GenerationAsset::from_markup(TOOL, &project, setting).expect("Failed to load asset");

        assert!(asset.is_editor_only);
        assert_eq!(
            asset.bindings_output_path,
            PathBuf::from("Assets")
                .join("Markbind")
                .join("Editor")
                .join("Tool.g.cs")
        );
    }

    #[test]
    fn test_invalid_editor_flag_is_parse_error() {
        let markup = r#"<UXML editor-extension-mode="maybe"/>"#;
        let setting = file_setting("Assets/A.uxml");
        let result = GenerationAsset::from_markup(markup, &ProjectSettings::default(), setting);
        assert!(matches!(result, Err(MarkbindError::Parse { .. })));
    }

    #[test]
    fn test_context_from_settings() {
        let setting = file_setting("Assets/Menu.uxml");
        let asset = GenerationAsset::from_markup(MENU, &ProjectSettings::default(), setting)
            .expect("Failed to load asset");
        let context = asset.context();
        assert_eq!(context.name, "Menu");
        assert_eq!(context.namespace, "Game.UI");
    }

    #[test]
    fn test_is_bindings_file() {
        assert!(is_bindings_file(Path::new("Assets/Markbind/Menu.g.cs")));
        assert!(is_bindings_file(Path::new("Assets/Markbind/Menu.g.cs.meta")));
        assert!(!is_bindings_file(Path::new("Assets/Markbind/Menu.cs")));
        assert!(!is_bindings_file(Path::new("Assets/Markbind/Menu.cs.meta")));
    }
}
