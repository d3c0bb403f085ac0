//! Component shape: bindings in the tool namespace, driven by a thin script.
//!
//! The bindings class is a plain data class constructed with the document it
//! binds. The script is a behaviour that owns the document reference, builds
//! the bindings and runs their initializer.

use super::{
    COMPONENT_NAMESPACE, DOCUMENT_FIELD, DOCUMENT_ROOT_MEMBER, DOCUMENT_TYPE, ENGINE_NAMESPACE,
    GenerationShape, ShapeStrategy, UI_NAMESPACE, initialize_call,
};
use crate::context::AssetContext;
use crate::csharp::{
    ClassDecl, CompilationUnit, ConstructorDecl, Expr, FieldDecl, MethodDecl, Parameter, Stmt,
    Visibility,
};

const CLASS_SUFFIX: &str = "Component";
const BINDINGS_FIELD: &str = "_bindings";

/// Strategy for [`GenerationShape::Component`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentShape;

impl ShapeStrategy for ComponentShape {
    fn shape(&self) -> GenerationShape {
        GenerationShape::Component
    }

    fn namespace(&self, _asset: &AssetContext) -> String {
        COMPONENT_NAMESPACE.to_string()
    }

    fn bindings_class_name(&self, asset: &AssetContext) -> String {
        format!("{}{}", asset.name, CLASS_SUFFIX)
    }

    fn base_type(&self) -> Option<&'static str> {
        None
    }

    fn usings(&self) -> &'static [&'static str] {
        &[ENGINE_NAMESPACE, UI_NAMESPACE]
    }

    fn document_field(&self) -> Option<FieldDecl> {
        Some(FieldDecl::private(DOCUMENT_TYPE, DOCUMENT_FIELD).readonly())
    }

    fn constructor(&self) -> Option<ConstructorDecl> {
        Some(ConstructorDecl {
            visibility: Visibility::Public,
            parameters: vec![Parameter::new(DOCUMENT_TYPE, "document")],
            body: vec![Stmt::assign(
                Expr::ident(DOCUMENT_FIELD),
                Expr::ident("document"),
            )],
        })
    }

    fn root_source(&self) -> Expr {
        Expr::ident(DOCUMENT_FIELD).null_dot(DOCUMENT_ROOT_MEMBER)
    }

    fn exposes_bound_properties(&self) -> bool {
        true
    }

    fn script_unit(&self, asset: &AssetContext) -> CompilationUnit {
        let bindings_class = self.bindings_class_name(asset);

        let awake = MethodDecl::void(
            Visibility::Private,
            "Awake",
            vec![
                Stmt::assign(
                    Expr::ident(BINDINGS_FIELD),
                    Expr::new_object(bindings_class.clone(), vec![Expr::ident(DOCUMENT_FIELD)]),
                ),
                initialize_call(Some(Expr::ident(BINDINGS_FIELD))),
            ],
        );

        let class = ClassDecl::new(self.script_class_name(asset))
            .partial()
            .with_base("MonoBehaviour")
            .with_member(
                FieldDecl::private(DOCUMENT_TYPE, DOCUMENT_FIELD).with_attribute("SerializeField"),
            )
            .with_member(FieldDecl::private(bindings_class, BINDINGS_FIELD))
            .with_member(awake);

        CompilationUnit::new()
            .with_using(COMPONENT_NAMESPACE)
            .with_using(ENGINE_NAMESPACE)
            .with_using(UI_NAMESPACE)
            .with_namespace(asset.namespace.clone())
            .with_class(class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csharp::render;

    #[test]
    fn test_component_naming_ignores_configuration() {
        let asset = AssetContext::new("Hud")
            .with_namespace("Game.UI")
            .with_affixes("My", "Script");
        assert_eq!(ComponentShape.bindings_class_name(&asset), "HudComponent");
        assert_eq!(ComponentShape.namespace(&asset), COMPONENT_NAMESPACE);
        assert_eq!(ComponentShape.script_class_name(&asset), "MyHudScript");
    }

    #[test]
    fn test_component_script_drives_bindings() {
        let asset = AssetContext::new("Hud").with_namespace("Game.UI");
        let text = render(&ComponentShape.script_unit(&asset));

        assert!(text.contains("using Markbind.Runtime.Components;\n"));
        assert!(text.contains("public partial class Hud : MonoBehaviour\n"));
        assert!(text.contains("[SerializeField]\n        private UIDocument _document;\n"));
        assert!(text.contains("private HudComponent _bindings;\n"));
        assert!(text.contains("_bindings = new HudComponent(_document);\n"));
        assert!(text.contains("_bindings.InitializeDocument();\n"));
    }
}
