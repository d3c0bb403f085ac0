//! Code assembly.
//!
//! The [`Generator`] turns property descriptors into a C# compilation unit
//! for a given [`GenerationShape`] and renders it. Bindings units carry the
//! machine-generated header and are meant to be overwritten; script units
//! are plain scaffolding for hand-written logic.

use crate::context::AssetContext;
use crate::csharp::{
    ClassDecl, CompilationUnit, Expr, FieldDecl, MethodDecl, PropertyBody, PropertyDecl, Stmt,
    Visibility, render,
};
use crate::descriptor::{BoundProperty, Extraction, GenerationWarning, PropertyDescriptor, extract};
use crate::error::CodegenError;
use crate::shapes::{
    GenerationShape, INITIALIZE_METHOD, ROOT_ELEMENT_TYPE, ROOT_PROPERTY, ShapeStrategy,
    root_query,
};
use crate::types::TypeTable;
use markbind_markup::MarkupNode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Tool name written into generated headers.
pub const TOOL_NAME: &str = "markbind";
/// Tool version written into generated headers.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// What to do when an element's generated name is unusable: several
/// elements binding the same field, or an element reusing a member the
/// generated class already declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Report a warning and keep going. Duplicate fields are all emitted and
    /// the last lookup wins; elements reusing a generated member are skipped.
    #[default]
    Allow,
    /// Fail generation for the asset.
    Reject,
}

/// Rendered source text plus the diagnostics gathered while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSource {
    /// Name of the generated class.
    pub class_name: String,
    /// Rendered source text.
    pub code: String,
    /// Non-fatal problems.
    pub warnings: Vec<GenerationWarning>,
}

/// Assembles binding and script sources.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    table: &'a TypeTable,
    duplicate_policy: DuplicatePolicy,
}

impl<'a> Generator<'a> {
    /// Creates a generator resolving tags through `table`.
    #[must_use]
    pub fn new(table: &'a TypeTable) -> Self {
        Self {
            table,
            duplicate_policy: DuplicatePolicy::Allow,
        }
    }

    /// Sets the duplicate field name policy.
    #[must_use]
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Returns the type table in use.
    #[must_use]
    pub fn table(&self) -> &'a TypeTable {
        self.table
    }

    /// Builds the bindings unit for an extraction.
    ///
    /// Extraction warnings are carried over. Elements whose field or
    /// property name is already declared by the shape are left out with a
    /// [`GenerationWarning::ReservedMemberName`].
    ///
    /// # Errors
    /// Returns `CodegenError::InvalidAsset` if `asset` cannot name a class.
    /// Under [`DuplicatePolicy::Reject`], returns
    /// `CodegenError::DuplicateFieldName` or `CodegenError::ReservedMemberName`
    /// for the first unusable name found.
    pub fn bindings_unit(
        &self,
        extraction: &Extraction,
        shape: GenerationShape,
        asset: &AssetContext,
    ) -> Result<(CompilationUnit, Vec<GenerationWarning>), CodegenError> {
        asset.validate()?;
        let strategy = shape.strategy();

        let mut warnings = Vec::with_capacity(extraction.warnings.len());
        for warning in &extraction.warnings {
            if let (
                DuplicatePolicy::Reject,
                GenerationWarning::DuplicateFieldName {
                    field_name,
                    declared_names,
                },
            ) = (self.duplicate_policy, warning)
            {
                return Err(CodegenError::DuplicateFieldName {
                    field_name: field_name.clone(),
                    declared_names: declared_names.clone(),
                });
            }
            warnings.push(warning.clone());
        }

        let kept = self.unreserved(extraction, strategy, asset, &mut warnings)?;

        let mut class = ClassDecl::new(strategy.bindings_class_name(asset)).partial();
        if let Some(base) = strategy.base_type() {
            class = class.with_base(base);
        }

        if let Some(document) = strategy.document_field() {
            class.add_member(document);
        }
        for property in &kept {
            class.add_member(FieldDecl::private(
                property.binding.target_type_name.clone(),
                property.descriptor.field_name.clone(),
            ));
        }
        if let Some(constructor) = strategy.constructor() {
            class.add_member(constructor);
        }

        class.add_member(PropertyDecl::public(
            ROOT_ELEMENT_TYPE,
            ROOT_PROPERTY,
            PropertyBody::Getter(strategy.root_source()),
        ));

        if strategy.exposes_bound_properties() {
            for property in &kept {
                class.add_member(PropertyDecl::public(
                    property.binding.target_type_name.clone(),
                    property.descriptor.property_name(),
                    PropertyBody::Arrow(Expr::ident(property.descriptor.field_name.clone())),
                ));
            }
        }

        let statements = kept
            .iter()
            .map(|property| {
                Stmt::assign(
                    Expr::ident(property.descriptor.field_name.clone()),
                    root_query(&property.descriptor.declared_name)
                        .cast(property.binding.target_type_name.clone()),
                )
            })
            .collect();
        class.add_member(MethodDecl::void(
            Visibility::Public,
            INITIALIZE_METHOD,
            statements,
        ));

        let mut unit = CompilationUnit::new().with_header(generated_header());
        for using in strategy.usings() {
            unit = unit.with_using(*using);
        }
        let unit = unit
            .with_namespace(strategy.namespace(asset))
            .with_class(class);

        Ok((unit, warnings))
    }

    /// Drops the properties whose names clash with members of the class.
    ///
    /// A field clashes with a reserved member. An exposed property clashes
    /// with a reserved member, any element field, or the property of an
    /// earlier element bound to a different field.
    fn unreserved<'e>(
        &self,
        extraction: &'e Extraction,
        strategy: &dyn ShapeStrategy,
        asset: &AssetContext,
        warnings: &mut Vec<GenerationWarning>,
    ) -> Result<Vec<&'e BoundProperty>, CodegenError> {
        let reserved: BTreeSet<String> = strategy.reserved_members(asset).into_iter().collect();
        let fields: BTreeSet<&str> = extraction
            .descriptors()
            .map(|d| d.field_name.as_str())
            .collect();
        let exposes = strategy.exposes_bound_properties();

        let mut properties: Vec<(String, &str)> = Vec::new();
        let mut kept = Vec::with_capacity(extraction.properties.len());
        for property in &extraction.properties {
            let descriptor = &property.descriptor;
            let clash = if reserved.contains(&descriptor.field_name) {
                Some(descriptor.field_name.clone())
            } else if exposes {
                let name = descriptor.property_name();
                let taken = reserved.contains(&name)
                    || fields.contains(name.as_str())
                    || properties
                        .iter()
                        .any(|(other, field)| *other == name && *field != descriptor.field_name);
                if taken {
                    Some(name)
                } else {
                    properties.push((name, descriptor.field_name.as_str()));
                    None
                }
            } else {
                None
            };

            match clash {
                None => kept.push(property),
                Some(member_name) => {
                    if self.duplicate_policy == DuplicatePolicy::Reject {
                        return Err(CodegenError::ReservedMemberName {
                            member_name,
                            declared_name: descriptor.declared_name.clone(),
                        });
                    }
                    warnings.push(GenerationWarning::ReservedMemberName {
                        member_name,
                        declared_name: descriptor.declared_name.clone(),
                    });
                }
            }
        }
        Ok(kept)
    }

    /// Assembles and renders the bindings source for `descriptors`.
    ///
    /// Descriptors are resolved against the generator's table first; see
    /// [`Extraction::resolve`].
    ///
    /// # Errors
    /// See [`Generator::bindings_unit`].
    pub fn assemble(
        &self,
        descriptors: &[PropertyDescriptor],
        shape: GenerationShape,
        asset: &AssetContext,
    ) -> Result<GeneratedSource, CodegenError> {
        let extraction = Extraction::resolve(descriptors.iter().cloned(), self.table);
        self.render_bindings(&extraction, shape, asset)
    }

    /// Generates the bindings source for a parsed document.
    ///
    /// # Errors
    /// See [`Generator::bindings_unit`].
    pub fn generate_bindings(
        &self,
        root: &MarkupNode,
        shape: GenerationShape,
        asset: &AssetContext,
    ) -> Result<GeneratedSource, CodegenError> {
        self.render_bindings(&extract(root, self.table), shape, asset)
    }

    fn render_bindings(
        &self,
        extraction: &Extraction,
        shape: GenerationShape,
        asset: &AssetContext,
    ) -> Result<GeneratedSource, CodegenError> {
        let (unit, warnings) = self.bindings_unit(extraction, shape, asset)?;
        Ok(GeneratedSource {
            class_name: shape.strategy().bindings_class_name(asset),
            code: render(&unit),
            warnings,
        })
    }

    /// Generates the paired script source.
    ///
    /// # Errors
    /// Returns `CodegenError::InvalidAsset` if `asset` cannot name a class.
    pub fn generate_script(
        &self,
        shape: GenerationShape,
        asset: &AssetContext,
    ) -> Result<GeneratedSource, CodegenError> {
        asset.validate()?;
        let strategy = shape.strategy();
        Ok(GeneratedSource {
            class_name: strategy.script_class_name(asset),
            code: render(&strategy.script_unit(asset)),
            warnings: Vec::new(),
        })
    }
}

/// Returns the comment block heading every bindings file.
#[must_use]
pub fn generated_header() -> String {
    format!(
        "//------------------------------------------------------------------------------\n\
         // <auto-generated>\n\
         //     This code was generated by the {} code generator.\n\
         //     Version: {}\n\
         //\n\
         //     Changes to this file may cause incorrect behavior and will be lost if\n\
         //     the code is regenerated.\n\
         // </auto-generated>\n\
         //------------------------------------------------------------------------------",
        TOOL_NAME, TOOL_VERSION
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use markbind_markup::parse_document;

    const SUBMIT_FORM: &str = r#"<ui:UXML xmlns:ui="UnityEngine.UIElements">
    <ui:VisualElement>
        <ui:Button name="Submit" text="Send"/>
        <ui:Label name="Status"/>
    </ui:VisualElement>
</ui:UXML>"#;

    fn example_descriptors() -> Vec<PropertyDescriptor> {
        vec![
            PropertyDescriptor::new("Button", "Submit"),
            PropertyDescriptor::new("Label", "Status"),
        ]
    }

    #[test]
    fn test_document_bindings_full_output() {
        let generator = Generator::new(TypeTable::builtin());
        let asset = AssetContext::new("Form").with_namespace("Game.UI");

        let source = generator
            .assemble(&example_descriptors(), GenerationShape::Document, &asset)
            .expect("Failed to generate");

        let expected_body = "\
using UnityEngine;
using UnityEngine.UIElements;

namespace Game.UI
{
    public partial class Form : MonoBehaviour
    {
        [SerializeField]
        private UIDocument _document;
        private Button _submit;
        private Label _status;

        public VisualElement Root
        {
            get
            {
                return _document?.rootVisualElement;
            }
        }

        public void InitializeDocument()
        {
            _submit = (Button)Root?.Q(\"Submit\");
            _status = (Label)Root?.Q(\"Status\");
        }
    }
}
";
        assert!(source.code.starts_with(&generated_header()));
        assert!(source.code.ends_with(expected_body));
        assert_eq!(source.class_name, "Form");
        assert!(source.warnings.is_empty());
    }

    #[test]
    fn test_header_names_tool_and_version() {
        let header = generated_header();
        assert!(header.contains("<auto-generated>"));
        assert!(header.contains(TOOL_NAME));
        assert!(header.contains(&format!("Version: {}", TOOL_VERSION)));
    }

    #[test]
    fn test_generate_bindings_from_markup() {
        let root = parse_document(SUBMIT_FORM).expect("Failed to parse");
        let generator = Generator::new(TypeTable::builtin());
        let asset = AssetContext::new("Form");

        let from_markup = generator
            .generate_bindings(&root, GenerationShape::Document, &asset)
            .expect("Failed to generate");
        let from_descriptors = generator
            .assemble(&example_descriptors(), GenerationShape::Document, &asset)
            .expect("Failed to generate");

        assert_eq!(from_markup, from_descriptors);
    }

    #[test]
    fn test_bindings_unit_uses_extraction() {
        let root = parse_document(SUBMIT_FORM).expect("Failed to parse");
        let generator = Generator::new(TypeTable::builtin());
        let asset = AssetContext::new("Form");

        let extraction = extract(&root, generator.table());
        let (unit, warnings) = generator
            .bindings_unit(&extraction, GenerationShape::Document, &asset)
            .expect("Failed to build unit");
        let source = generator
            .generate_bindings(&root, GenerationShape::Document, &asset)
            .expect("Failed to generate");

        assert_eq!(render(&unit), source.code);
        assert_eq!(warnings, extraction.warnings);
    }

    #[test]
    fn test_bindings_are_byte_identical_across_runs() {
        let root = parse_document(SUBMIT_FORM).expect("Failed to parse");
        let generator = Generator::new(TypeTable::builtin());
        let asset = AssetContext::new("Form").with_namespace("Game");

        for shape in GenerationShape::ALL {
            let first = generator
                .generate_bindings(&root, shape, &asset)
                .expect("Failed to generate");
            let reparsed = parse_document(SUBMIT_FORM).expect("Failed to parse");
            let second = generator
                .generate_bindings(&reparsed, shape, &asset)
                .expect("Failed to generate");
            assert_eq!(first.code, second.code);
        }
    }

    #[test]
    fn test_unknown_tag_skipped_with_warning() {
        let generator = Generator::new(TypeTable::builtin());
        let descriptors = vec![
            PropertyDescriptor::new("widget-xyz", "Mystery"),
            PropertyDescriptor::new("Label", "Title"),
        ];

        let source = generator
            .assemble(&descriptors, GenerationShape::Document, &AssetContext::new("Menu"))
            .expect("Unknown tags must not fail generation");

        assert!(!source.code.contains("Mystery"));
        assert!(!source.code.contains("_mystery"));
        assert!(source.code.contains("private Label _title;"));
        assert_eq!(
            source.warnings,
            vec![GenerationWarning::UnresolvedTag {
                tag: "widget-xyz".to_string(),
                declared_name: "Mystery".to_string(),
            }]
        );
    }

    #[test]
    fn test_component_shape_output() {
        let generator = Generator::new(TypeTable::builtin());
        let asset = AssetContext::new("Form")
            .with_namespace("Ignored.Namespace")
            .with_affixes("UI", "");

        let source = generator
            .assemble(&example_descriptors(), GenerationShape::Component, &asset)
            .expect("Failed to generate");

        assert_eq!(source.class_name, "FormComponent");
        assert!(source.code.contains("namespace Markbind.Runtime.Components\n"));
        assert!(!source.code.contains("Ignored.Namespace"));
        assert!(source.code.contains("    public partial class FormComponent\n"));
        assert!(source.code.contains("private readonly UIDocument _document;\n"));
        assert!(source.code.contains("public FormComponent(UIDocument document)\n"));
        assert!(source.code.contains("public Button Submit => _submit;\n"));
        assert!(source.code.contains("public Label Status => _status;\n"));
        assert!(source.code.contains("_submit = (Button)Root?.Q(\"Submit\");\n"));
    }

    #[test]
    fn test_editor_window_shape_output() {
        let generator = Generator::new(TypeTable::builtin());
        let asset = AssetContext::new("Inspector").with_namespace("Tools");

        let source = generator
            .assemble(&example_descriptors(), GenerationShape::EditorWindow, &asset)
            .expect("Failed to generate");

        assert!(source.code.contains("using UnityEditor;\n"));
        assert!(source.code.contains("public partial class Inspector : EditorWindow\n"));
        assert!(source.code.contains("return rootVisualElement;\n"));
        assert!(!source.code.contains("_document"));
        assert!(source.code.contains("_status = (Label)Root?.Q(\"Status\");\n"));
    }

    #[test]
    fn test_duplicates_allowed_last_assignment_wins() {
        let generator = Generator::new(TypeTable::builtin());
        let descriptors = vec![
            PropertyDescriptor::new("Label", "Title"),
            PropertyDescriptor::new("Button", "title"),
        ];

        let source = generator
            .assemble(&descriptors, GenerationShape::Document, &AssetContext::new("Menu"))
            .expect("Allowed duplicates must not fail");

        let first = source.code.find("_title = (Label)").expect("first assignment");
        let last = source.code.find("_title = (Button)").expect("last assignment");
        assert!(first < last);
        assert_eq!(source.code.matches("private Label _title;").count(), 1);
        assert_eq!(source.code.matches("private Button _title;").count(), 1);
        assert_eq!(
            source.warnings,
            vec![GenerationWarning::DuplicateFieldName {
                field_name: "_title".to_string(),
                declared_names: vec!["Title".to_string(), "title".to_string()],
            }]
        );
    }

    #[test]
    fn test_duplicates_rejected_by_policy() {
        let generator =
            Generator::new(TypeTable::builtin()).with_duplicate_policy(DuplicatePolicy::Reject);
        let descriptors = vec![
            PropertyDescriptor::new("Label", "Title"),
            PropertyDescriptor::new("Label", "title"),
        ];

        let result =
            generator.assemble(&descriptors, GenerationShape::Document, &AssetContext::new("Menu"));
        assert!(matches!(result, Err(CodegenError::DuplicateFieldName { .. })));
    }

    #[test]
    fn test_invalid_asset_rejected() {
        let generator = Generator::new(TypeTable::builtin());
        let result = generator.assemble(
            &example_descriptors(),
            GenerationShape::Document,
            &AssetContext::new(""),
        );
        assert!(matches!(result, Err(CodegenError::InvalidAsset { .. })));

        let result = generator.generate_script(GenerationShape::Document, &AssetContext::new(""));
        assert!(matches!(result, Err(CodegenError::InvalidAsset { .. })));
    }

    #[test]
    fn test_custom_types_resolve() {
        let table = TypeTable::builtin().extended([("HealthBar", "Game.Widgets.HealthBar")]);
        let generator = Generator::new(&table);
        let descriptors = vec![PropertyDescriptor::new("HealthBar", "Health")];

        let source = generator
            .assemble(&descriptors, GenerationShape::Document, &AssetContext::new("Hud"))
            .expect("Failed to generate");

        assert!(source.code.contains("private Game.Widgets.HealthBar _health;"));
        assert!(source.warnings.is_empty());
    }

    #[test]
    fn test_script_has_no_generated_header() {
        let generator = Generator::new(TypeTable::builtin());
        let asset = AssetContext::new("Menu").with_affixes("", "Logic");
        let source = generator
            .generate_script(GenerationShape::Document, &asset)
            .expect("Failed to generate");

        assert_eq!(source.class_name, "MenuLogic");
        assert!(!source.code.contains("<auto-generated>"));
        assert!(source.code.contains("InitializeDocument();"));
    }

    fn reserved(member_name: &str, declared_name: &str) -> GenerationWarning {
        GenerationWarning::ReservedMemberName {
            member_name: member_name.to_string(),
            declared_name: declared_name.to_string(),
        }
    }

    #[test]
    fn test_component_skips_elements_named_like_generated_members() {
        let generator = Generator::new(TypeTable::builtin());
        let descriptors = vec![
            PropertyDescriptor::new("VisualElement", "Root"),
            PropertyDescriptor::new("VisualElement", "Document"),
            PropertyDescriptor::new("Button", "InitializeDocument"),
            PropertyDescriptor::new("Label", "Status"),
        ];

        let source = generator
            .assemble(&descriptors, GenerationShape::Component, &AssetContext::new("Form"))
            .expect("Allowed collisions must not fail");

        assert_eq!(source.code.matches("public VisualElement Root\n").count(), 1);
        assert_eq!(source.code.matches(" _document;").count(), 1);
        assert_eq!(source.code.matches("InitializeDocument").count(), 1);
        assert!(!source.code.contains("_root"));
        assert!(!source.code.contains("_initializeDocument"));
        assert!(source.code.contains("public Label Status => _status;\n"));
        assert_eq!(
            source.warnings,
            vec![
                reserved("Root", "Root"),
                reserved("_document", "Document"),
                reserved("InitializeDocument", "InitializeDocument"),
            ]
        );
    }

    #[test]
    fn test_component_property_clashing_with_class_or_field() {
        let generator = Generator::new(TypeTable::builtin());
        let descriptors = vec![
            PropertyDescriptor::new("Label", "FormComponent"),
            PropertyDescriptor::new("Label", "1st"),
            PropertyDescriptor::new("Button", "PlayButton"),
            PropertyDescriptor::new("Button", "play-button"),
        ];

        let source = generator
            .assemble(&descriptors, GenerationShape::Component, &AssetContext::new("Form"))
            .expect("Allowed collisions must not fail");

        assert!(source.code.contains("public Button PlayButton => _playButton;\n"));
        assert!(!source.code.contains("_play_button"));
        assert!(!source.code.contains("_formComponent"));
        assert!(!source.code.contains("_1st"));
        assert_eq!(
            source.warnings,
            vec![
                reserved("FormComponent", "FormComponent"),
                reserved("_1st", "1st"),
                reserved("PlayButton", "play-button"),
            ]
        );
    }

    #[test]
    fn test_document_skips_element_named_document() {
        let generator = Generator::new(TypeTable::builtin());
        let descriptors = vec![
            PropertyDescriptor::new("VisualElement", "Document"),
            PropertyDescriptor::new("Button", "Root"),
            PropertyDescriptor::new("Button", "Awake"),
        ];

        let source = generator
            .assemble(&descriptors, GenerationShape::Document, &AssetContext::new("Menu"))
            .expect("Allowed collisions must not fail");

        assert_eq!(source.code.matches(" _document;").count(), 1);
        assert!(!source.code.contains("(VisualElement)Root?.Q(\"Document\")"));
        assert!(source.code.contains("private Button _root;\n"));
        assert!(source.code.contains("private Button _awake;\n"));
        assert_eq!(source.warnings, vec![reserved("_document", "Document")]);
    }

    #[test]
    fn test_editor_window_skips_script_members() {
        let generator = Generator::new(TypeTable::builtin());
        let descriptors = vec![
            PropertyDescriptor::new("VisualElement", "VisualTreeAsset"),
            PropertyDescriptor::new("Label", "Status"),
        ];

        let source = generator
            .assemble(&descriptors, GenerationShape::EditorWindow, &AssetContext::new("Tool"))
            .expect("Allowed collisions must not fail");

        assert!(!source.code.contains("_visualTreeAsset"));
        assert!(source.code.contains("private Label _status;\n"));
        assert_eq!(
            source.warnings,
            vec![reserved("_visualTreeAsset", "VisualTreeAsset")]
        );
    }

    #[test]
    fn test_reserved_member_rejected_by_policy() {
        let generator =
            Generator::new(TypeTable::builtin()).with_duplicate_policy(DuplicatePolicy::Reject);
        let descriptors = vec![PropertyDescriptor::new("VisualElement", "Root")];

        let asset = AssetContext::new("Form");

        let result = generator.assemble(&descriptors, GenerationShape::Component, &asset);
        match result {
            Err(CodegenError::ReservedMemberName {
                member_name,
                declared_name,
            }) => {
                assert_eq!(member_name, "Root");
                assert_eq!(declared_name, "Root");
            }
            other => panic!("Expected a reserved member error, got {:?}", other),
        }

        let result = generator.assemble(&descriptors, GenerationShape::Document, &asset);
        assert!(result.is_ok());
    }
}
