//! # Markbind
//!
//! Typed C# bindings for Unity UI Toolkit documents.
//!
//! Markbind reads UXML documents, finds every element carrying a `name`
//! attribute and generates a class holding one typed field per element plus
//! an initializer that looks each element up and assigns it.
//!
//! ## Features
//!
//! - **Regenerable bindings** - `*.g.cs` files are rewritten on every run
//! - **Once-only scripts** - hand-written companions are never overwritten
//! - **Three shapes** - Document, Component and EditorWindow conventions
//! - **Extensible type table** - project settings can bind custom elements
//!
//! ## Quick Start
//!
//! ```ignore
//! use markbind::prelude::*;
//!
//! let store = JsonSettingsStore::open("ProjectSettings/MarkbindSettings.json")?;
//! let mut orchestrator = Orchestrator::builder(store).project_root(".").build();
//!
//! orchestrator.enable("Assets/UI/MainMenu.uxml")?;
//! orchestrator.generate_bindings("Assets/UI/MainMenu.uxml")?;
//! orchestrator.generate_script("Assets/UI/MainMenu.uxml")?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`markup`] - UXML parsing into a node tree
//! - [`codegen`] - Descriptor extraction and C# generation
//! - [`settings`] - Project and per-asset settings stores
//! - [`asset`] - Assets and their output paths
//! - [`orchestrator`] - Generation, batch and clearing operations

pub mod asset;
pub mod error;
pub mod orchestrator;
pub mod prelude;
pub mod settings;

/// UXML parsing.
pub mod markup {
    pub use markbind_markup::*;
}

/// Binding generation.
pub mod codegen {
    pub use markbind_codegen::*;
}

pub use asset::GenerationAsset;
pub use error::{MarkbindError, SettingsError};
pub use orchestrator::{
    BatchReport, ClearReport, GenerationReport, Orchestrator, OrchestratorBuilder, Outcome,
};
pub use settings::{
    FileSetting, JsonSettingsStore, MemorySettingsStore, ProjectSettings, Settings, SettingsStore,
};
