//! Document shape: a behaviour holding a serialized `UIDocument`.

use super::{
    DOCUMENT_FIELD, DOCUMENT_ROOT_MEMBER, DOCUMENT_TYPE, ENGINE_NAMESPACE, GenerationShape,
    ShapeStrategy, UI_NAMESPACE, initialize_call,
};
use crate::context::AssetContext;
use crate::csharp::{ClassDecl, CompilationUnit, Expr, FieldDecl, MethodDecl, Visibility};

const BASE_TYPE: &str = "MonoBehaviour";
const AWAKE_METHOD: &str = "Awake";

/// Strategy for [`GenerationShape::Document`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentShape;

impl ShapeStrategy for DocumentShape {
    fn shape(&self) -> GenerationShape {
        GenerationShape::Document
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
        &[ENGINE_NAMESPACE, UI_NAMESPACE]
    }

    fn document_field(&self) -> Option<FieldDecl> {
        Some(FieldDecl::private(DOCUMENT_TYPE, DOCUMENT_FIELD).with_attribute("SerializeField"))
    }

    fn root_source(&self) -> Expr {
        Expr::ident(DOCUMENT_FIELD).null_dot(DOCUMENT_ROOT_MEMBER)
    }

    fn script_members(&self) -> &'static [&'static str] {
        &[AWAKE_METHOD]
    }

    fn script_unit(&self, asset: &AssetContext) -> CompilationUnit {
        let class = ClassDecl::new(self.script_class_name(asset))
            .partial()
            .with_base(BASE_TYPE)
            .with_member(MethodDecl::void(
                Visibility::Private,
                AWAKE_METHOD,
                vec![initialize_call(None)],
            ));

        CompilationUnit::new()
            .with_using(ENGINE_NAMESPACE)
            .with_namespace(asset.namespace.clone())
            .with_class(class)
    }
}
