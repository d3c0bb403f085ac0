//! # Markbind Codegen
//!
//! C# binding generation from UXML documents.
//!
//! This crate provides:
//! - The tag to UI Toolkit type resolution table
//! - Extraction of named elements into property descriptors
//! - A C# syntax model with deterministic rendering
//! - The Document, Component and EditorWindow generation shapes

pub mod context;
pub mod csharp;
pub mod descriptor;
pub mod error;
pub mod generator;
pub mod shapes;
pub mod types;

pub use context::AssetContext;
pub use descriptor::{BoundProperty, Extraction, GenerationWarning, PropertyDescriptor, extract};
pub use error::CodegenError;
pub use generator::{DuplicatePolicy, GeneratedSource, Generator};
pub use shapes::{GenerationShape, ShapeStrategy};
pub use types::{TypeBinding, TypeTable};

/// Generates bindings source from a markup string using the built-in types.
///
/// # Arguments
/// * `markup` - UXML document content
/// * `shape` - Output convention
/// * `asset` - Naming context of the asset
///
/// # Returns
/// Generated C# source with any non-fatal warnings.
///
/// # Errors
/// Returns `CodegenError` if parsing or generation fails.
pub fn generate_from_markup(
    markup: &str,
    shape: GenerationShape,
    asset: &AssetContext,
) -> Result<GeneratedSource, CodegenError> {
    let root = markbind_markup::parse_document(markup)?;
    Generator::new(TypeTable::builtin()).generate_bindings(&root, shape, asset)
}

/// Generates bindings source from a markup file using the built-in types.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or generation fails.
pub fn generate_from_file(
    path: &std::path::Path,
    shape: GenerationShape,
    asset: &AssetContext,
) -> Result<GeneratedSource, CodegenError> {
    let markup = std::fs::read_to_string(path)?;
    generate_from_markup(&markup, shape, asset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_from_markup() {
        let source = generate_from_markup(
            r#"<UXML><Button name="Play"/></UXML>"#,
            GenerationShape::Document,
            &AssetContext::new("Menu"),
        )
        .expect("Failed to generate");

        assert!(source.code.contains("private Button _play;"));
    }

    #[test]
    fn test_generate_from_markup_parse_error() {
        let result = generate_from_markup(
            "<UXML><Button></UXML>",
            GenerationShape::Document,
            &AssetContext::new("Menu"),
        );
        assert!(matches!(result, Err(CodegenError::Parse(_))));
    }

    #[test]
    fn test_generate_from_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("Menu.uxml");
        std::fs::write(&path, r#"<UXML><Toggle name="Sound"/></UXML>"#).expect("write");

        let source =
            generate_from_file(&path, GenerationShape::Document, &AssetContext::new("Menu"))
                .expect("Failed to generate");
        assert!(source.code.contains("private Toggle _sound;"));
    }
}
