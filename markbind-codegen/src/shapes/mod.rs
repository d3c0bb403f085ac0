//! Generation shapes.
//!
//! A shape decides the naming, namespace, base type and root accessor of the
//! generated class, plus the layout of its once-only script companion. The
//! set of shapes is closed; [`GenerationShape::strategy`] maps each variant
//! to its [`ShapeStrategy`].

pub mod component;
pub mod document;
pub mod editor_window;

pub use component::ComponentShape;
pub use document::DocumentShape;
pub use editor_window::EditorWindowShape;

use crate::context::AssetContext;
use crate::csharp::{CompilationUnit, ConstructorDecl, Expr, FieldDecl, Stmt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the generated initialization routine.
pub const INITIALIZE_METHOD: &str = "InitializeDocument";
/// Name of the generated root accessor.
pub const ROOT_PROPERTY: &str = "Root";
/// Type of the root accessor.
pub const ROOT_ELEMENT_TYPE: &str = "VisualElement";
/// Descendant lookup method on the root element.
pub const QUERY_METHOD: &str = "Q";
/// Field holding the backing document.
pub const DOCUMENT_FIELD: &str = "_document";
/// Type of the backing document.
pub const DOCUMENT_TYPE: &str = "UIDocument";
/// Root element member of a document.
pub const DOCUMENT_ROOT_MEMBER: &str = "rootVisualElement";
/// Namespace owned by the tool for component bindings.
pub const COMPONENT_NAMESPACE: &str = "Markbind.Runtime.Components";

/// Engine namespace.
pub const ENGINE_NAMESPACE: &str = "UnityEngine";
/// UI Toolkit namespace.
pub const UI_NAMESPACE: &str = "UnityEngine.UIElements";
/// Editor namespace.
pub const EDITOR_NAMESPACE: &str = "UnityEditor";

/// Output convention for an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GenerationShape {
    /// Self-contained behaviour class bound to a `UIDocument`.
    #[default]
    Document,
    /// Bindings class in the tool namespace plus a thin behaviour script.
    Component,
    /// Editor tool window reading its own root element.
    EditorWindow,
}

impl GenerationShape {
    /// Every shape.
    pub const ALL: [GenerationShape; 3] = [Self::Document, Self::Component, Self::EditorWindow];

    /// Returns the strategy implementing this shape.
    #[must_use]
    pub fn strategy(self) -> &'static dyn ShapeStrategy {
        match self {
            Self::Document => &DocumentShape,
            Self::Component => &ComponentShape,
            Self::EditorWindow => &EditorWindowShape,
        }
    }

    /// Returns the canonical name of the shape.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Document => "Document",
            Self::Component => "Component",
            Self::EditorWindow => "EditorWindow",
        }
    }
}

impl fmt::Display for GenerationShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "document" => Ok(Self::Document),
            "component" => Ok(Self::Component),
            "editorwindow" => Ok(Self::EditorWindow),
            _ => Err(format!("unknown generation shape '{}'", s)),
        }
    }
}

/// Parameters a shape contributes to code assembly.
pub trait ShapeStrategy: Send + Sync {
    /// The shape this strategy implements.
    fn shape(&self) -> GenerationShape;

    /// Namespace the bindings class is declared in.
    fn namespace(&self, asset: &AssetContext) -> String;

    /// Name of the bindings class.
    fn bindings_class_name(&self, asset: &AssetContext) -> String;

    /// Base class of the bindings class, if any.
    fn base_type(&self) -> Option<&'static str>;

    /// `using` directives of the bindings file.
    fn usings(&self) -> &'static [&'static str];

    /// Field holding the backing document, declared before element fields.
    fn document_field(&self) -> Option<FieldDecl>;

    /// Constructor of the bindings class, if the shape needs one.
    fn constructor(&self) -> Option<ConstructorDecl> {
        None
    }

    /// Expression returned by the root accessor.
    fn root_source(&self) -> Expr;

    /// Whether each bound element is also exposed as a public property.
    fn exposes_bound_properties(&self) -> bool {
        false
    }

    /// Members the paired script declares on the bindings class itself.
    ///
    /// Only shapes whose script is the other half of the partial bindings
    /// class contribute names here.
    fn script_members(&self) -> &'static [&'static str] {
        &[]
    }

    /// Every member name the generated class declares on its own.
    ///
    /// Bound elements must not reuse any of these.
    fn reserved_members(&self, asset: &AssetContext) -> Vec<String> {
        let mut names = vec![
            self.bindings_class_name(asset),
            ROOT_PROPERTY.to_string(),
            INITIALIZE_METHOD.to_string(),
        ];
        if let Some(field) = self.document_field() {
            names.push(field.name);
        }
        names.extend(self.script_members().iter().map(|name| (*name).to_string()));
        names
    }

    /// Name of the paired script class.
    fn script_class_name(&self, asset: &AssetContext) -> String {
        asset.decorated_name()
    }

    /// Builds the paired script unit.
    fn script_unit(&self, asset: &AssetContext) -> CompilationUnit;
}

/// Expression looking up a named descendant of the root, null-safely.
#[must_use]
pub fn root_query(declared_name: &str) -> Expr {
    Expr::ident(ROOT_PROPERTY)
        .null_dot(QUERY_METHOD)
        .call(vec![Expr::string(declared_name)])
}

/// Statement invoking the initializer on `target`, or on `this` when `None`.
#[must_use]
pub fn initialize_call(target: Option<Expr>) -> Stmt {
    let callee = match target {
        Some(target) => target.dot(INITIALIZE_METHOD),
        None => Expr::ident(INITIALIZE_METHOD),
    };
    Stmt::Expr(callee.call(vec![]))
}
