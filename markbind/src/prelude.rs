//! Prelude module for convenient imports.
//!
//! ```ignore
//! use markbind::prelude::*;
//! ```

// Markup
pub use markbind_markup::{MarkupNode, ParseError, parse_document};

// Generation
pub use markbind_codegen::{
    AssetContext, CodegenError, DuplicatePolicy, GeneratedSource, GenerationShape,
    GenerationWarning, Generator, TypeTable,
};

// Orchestration
pub use crate::asset::GenerationAsset;
pub use crate::error::{MarkbindError, SettingsError};
pub use crate::orchestrator::{
    BatchReport, ClearReport, GenerationReport, Orchestrator, OrchestratorBuilder, Outcome,
};
pub use crate::settings::{
    FileSetting, JsonSettingsStore, MemorySettingsStore, ProjectSettings, SettingsStore,
};
