//! Property descriptor extraction.
//!
//! Flattens a parsed document, keeps the elements that declare a name and
//! turns each into a [`PropertyDescriptor`]. Problems that should not stop
//! generation are reported as [`GenerationWarning`] values.

use crate::types::{TypeBinding, TypeTable};
use markbind_markup::MarkupNode;
use std::collections::BTreeMap;
use std::fmt;

/// Prefix marking generated fields as private.
pub const FIELD_PRIVACY_MARKER: char = '_';

/// One binding candidate discovered in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Element tag.
    pub tag: String,
    /// Value of the element's `name` attribute.
    pub declared_name: String,
    /// Sanitized private field name.
    pub field_name: String,
}

impl PropertyDescriptor {
    /// Creates a descriptor, deriving the field name from the declared name.
    #[must_use]
    pub fn new(tag: impl Into<String>, declared_name: impl Into<String>) -> Self {
        let declared_name = declared_name.into();
        Self {
            tag: tag.into(),
            field_name: field_name(&declared_name),
            declared_name,
        }
    }

    /// Public property name used by shapes exposing bound properties.
    #[must_use]
    pub fn property_name(&self) -> String {
        property_name(&self.declared_name)
    }
}

/// Non-fatal problem found while extracting or assembling bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationWarning {
    /// The element's tag has no entry in the type table; it gets no field.
    UnresolvedTag {
        /// Element tag.
        tag: String,
        /// Declared name of the element.
        declared_name: String,
    },
    /// Several elements map to one field. The last lookup wins in the
    /// initializer and the earlier declarations are dead.
    DuplicateFieldName {
        /// Sanitized field name.
        field_name: String,
        /// Colliding declared names in document order.
        declared_names: Vec<String>,
    },
    /// The element's field or property name is already taken by a member
    /// the generated class declares itself; the element gets no binding.
    ReservedMemberName {
        /// Name the element would have been emitted under.
        member_name: String,
        /// Declared name of the element.
        declared_name: String,
    },
}

impl fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedTag { tag, declared_name } => write!(
                f,
                "failed to get property type '{}' for field '{}'; property will be ignored",
                tag, declared_name
            ),
            Self::DuplicateFieldName {
                field_name,
                declared_names,
            } => write!(
                f,
                "field '{}' is bound by {} elements ({}); only the last one is assigned",
                field_name,
                declared_names.len(),
                declared_names.join(", ")
            ),
            Self::ReservedMemberName {
                member_name,
                declared_name,
            } => write!(
                f,
                "element '{}' maps to member '{}' which the generated class already declares; \
                 element will be ignored",
                declared_name, member_name
            ),
        }
    }
}

/// A descriptor together with the type its tag resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundProperty {
    /// The element's descriptor.
    pub descriptor: PropertyDescriptor,
    /// Resolved target type.
    pub binding: TypeBinding,
}

/// Result of descriptor extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Resolvable descriptors in pre-order.
    pub properties: Vec<BoundProperty>,
    /// Warnings raised while extracting.
    pub warnings: Vec<GenerationWarning>,
}

impl Extraction {
    /// Resolves `descriptors` against `table`, keeping their order.
    ///
    /// Descriptors whose tag does not resolve are dropped with an
    /// [`GenerationWarning::UnresolvedTag`]. Field name collisions among the
    /// kept descriptors are reported, not removed.
    #[must_use]
    pub fn resolve<I>(descriptors: I, table: &TypeTable) -> Self
    where
        I: IntoIterator<Item = PropertyDescriptor>,
    {
        let mut extraction = Self::default();

        for descriptor in descriptors {
            match table.resolve(&descriptor.tag) {
                Some(binding) => extraction.properties.push(BoundProperty {
                    binding: binding.clone(),
                    descriptor,
                }),
                None => extraction.warnings.push(GenerationWarning::UnresolvedTag {
                    tag: descriptor.tag,
                    declared_name: descriptor.declared_name,
                }),
            }
        }

        let duplicates = find_duplicates(extraction.properties.iter().map(|p| &p.descriptor));
        extraction.warnings.extend(duplicates);
        extraction
    }

    /// Iterates over the kept descriptors.
    pub fn descriptors(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter().map(|p| &p.descriptor)
    }
}

/// Collects a descriptor for every named descendant of `root`, in pre-order.
///
/// The root itself is never included.
#[must_use]
pub fn collect_named(root: &MarkupNode) -> Vec<PropertyDescriptor> {
    root.descendants()
        .filter(|node| node.has_name())
        .filter_map(|node| {
            node.declared_name()
                .map(|name| PropertyDescriptor::new(node.tag.clone(), name))
        })
        .collect()
}

/// Extracts the descriptors of `root` that can be bound with `table`.
///
/// See [`Extraction::resolve`].
#[must_use]
pub fn extract(root: &MarkupNode, table: &TypeTable) -> Extraction {
    Extraction::resolve(collect_named(root), table)
}

/// Reports every field name bound by more than one descriptor.
#[must_use]
pub fn find_duplicates<'a, I>(descriptors: I) -> Vec<GenerationWarning>
where
    I: IntoIterator<Item = &'a PropertyDescriptor>,
{
    let mut order: Vec<&str> = Vec::new();
    let mut groups: BTreeMap<&str, Vec<String>> = BTreeMap::new();

    for descriptor in descriptors {
        let group = groups.entry(descriptor.field_name.as_str()).or_default();
        if group.is_empty() {
            order.push(descriptor.field_name.as_str());
        }
        group.push(descriptor.declared_name.clone());
    }

    order
        .into_iter()
        .filter_map(|field| {
            let names = groups.remove(field)?;
            (names.len() > 1).then(|| GenerationWarning::DuplicateFieldName {
                field_name: field.to_string(),
                declared_names: names,
            })
        })
        .collect()
}

/// Derives the private field name for a declared name.
///
/// The first character is lower-cased and the privacy marker prepended.
/// Remaining characters are kept, except ones that cannot appear in an
/// identifier, which become `_`.
#[must_use]
pub fn field_name(declared_name: &str) -> String {
    let mut result = String::with_capacity(declared_name.len() + 1);
    result.push(FIELD_PRIVACY_MARKER);

    let mut chars = declared_name.chars();
    if let Some(first) = chars.next() {
        if is_identifier_char(first) {
            result.extend(first.to_lowercase());
        } else {
            result.push('_');
        }
    }
    for c in chars {
        result.push(if is_identifier_char(c) { c } else { '_' });
    }

    result
}

/// Derives a PascalCase property name for a declared name.
#[must_use]
pub fn property_name(declared_name: &str) -> String {
    let mut result = String::with_capacity(declared_name.len());
    let mut capitalize_next = true;

    for c in declared_name.chars() {
        if !is_identifier_char(c) || c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    if result.is_empty() || result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }

    result
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
