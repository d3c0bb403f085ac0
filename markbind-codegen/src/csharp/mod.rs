//! C# source model and rendering.

pub mod syntax;
pub mod writer;

pub use syntax::{
    ClassDecl, CompilationUnit, ConstructorDecl, Expr, FieldDecl, Member, MethodDecl, Parameter,
    PropertyBody, PropertyDecl, Stmt, Visibility,
};
pub use writer::{CodeWriter, render};
