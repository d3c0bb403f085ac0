//! Editor window shape: the window's own root element backs the bindings.

use super::{
    EDITOR_NAMESPACE, ENGINE_NAMESPACE, GenerationShape, ShapeStrategy, UI_NAMESPACE,
    initialize_call,
};
use crate::context::AssetContext;
use crate::csharp::{ClassDecl, CompilationUnit, Expr, FieldDecl, MethodDecl, Stmt, Visibility};

const BASE_TYPE: &str = "EditorWindow";
const WINDOW_ROOT: &str = "rootVisualElement";
const TREE_FIELD: &str = "_visualTreeAsset";
const CREATE_GUI_METHOD: &str = "CreateGUI";

/// Strategy for [`GenerationShape::EditorWindow`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EditorWindowShape;

impl ShapeStrategy for EditorWindowShape {
    fn shape(&self) -> GenerationShape {
        GenerationShape::EditorWindow
    }

    fn namespace(&self, asset: &AssetContext) -> String {
        asset.namespace.clone()
    }

    fn bindings_class_name(&self, asset: &AssetContext) -> String {
        asset.decorated_name()
    }

    fn base_type(&self) -> Option<&'static str> {
        Some(BASE_TYPE)
    }

    fn usings(&self) -> &'static [&'static str] {
        &[EDITOR_NAMESPACE, ENGINE_NAMESPACE, UI_NAMESPACE]
    }

    fn document_field(&self) -> Option<FieldDecl> {
        None
    }

    fn root_source(&self) -> Expr {
        Expr::ident(WINDOW_ROOT)
    }

    fn script_members(&self) -> &'static [&'static str] {
        &[TREE_FIELD, CREATE_GUI_METHOD]
    }

    fn script_unit(&self, asset: &AssetContext) -> CompilationUnit {
        let create_gui = MethodDecl::void(
            Visibility::Private,
            CREATE_GUI_METHOD,
            vec![
                Stmt::Expr(
                    Expr::ident(TREE_FIELD)
                        .null_dot("CloneTree")
                        .call(vec![Expr::ident(WINDOW_ROOT)]),
                ),
                initialize_call(None),
            ],
        );

        let class = ClassDecl::new(self.script_class_name(asset))
            .partial()
            .with_base(BASE_TYPE)
            .with_member(
                FieldDecl::private("VisualTreeAsset", TREE_FIELD).with_attribute("SerializeField"),
            )
            .with_member(create_gui);

        CompilationUnit::new()
            .with_using(EDITOR_NAMESPACE)
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
    fn test_editor_window_root_source() {
        assert_eq!(EditorWindowShape.root_source().to_string(), "rootVisualElement");
        assert!(EditorWindowShape.document_field().is_none());
    }

    #[test]
    fn test_editor_window_script() {
        let asset = AssetContext::new("Inspector").with_namespace("Tools");
        let text = render(&EditorWindowShape.script_unit(&asset));

        assert!(text.starts_with("using UnityEditor;\nusing UnityEngine;\n"));
        assert!(text.contains("public partial class Inspector : EditorWindow\n"));
        assert!(text.contains("private void CreateGUI()\n"));
        assert!(text.contains("_visualTreeAsset?.CloneTree(rootVisualElement);\n"));
        assert!(text.contains("InitializeDocument();\n"));
    }
}
