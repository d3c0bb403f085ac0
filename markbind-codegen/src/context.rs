//! Per-asset naming context handed to the generator.

use crate::error::CodegenError;

/// Reserved C# keywords; contextual keywords remain valid identifiers.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// Naming information about the asset being generated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssetContext {
    /// Asset name (file stem of the markup file).
    pub name: String,
    /// Configured namespace; empty means the global namespace.
    pub namespace: String,
    /// Prefix added to generated class and file names.
    pub file_prefix: String,
    /// Suffix added to generated class and file names.
    pub file_suffix: String,
}

impl AssetContext {
    /// Creates a context with no namespace, prefix or suffix.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the file prefix and suffix.
    #[must_use]
    pub fn with_affixes(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self.file_suffix = suffix.into();
        self
    }

    /// Returns `{prefix}{name}{suffix}`.
    #[must_use]
    pub fn decorated_name(&self) -> String {
        format!("{}{}{}", self.file_prefix, self.name, self.file_suffix)
    }

    /// Checks that the context can name a class and a namespace.
    ///
    /// # Errors
    /// Returns `CodegenError::InvalidAsset` if the name is empty, the
    /// decorated name is not an identifier, or the namespace is not a
    /// dotted identifier path. Reserved keywords are not identifiers.
    pub fn validate(&self) -> Result<(), CodegenError> {
        if self.name.is_empty() {
            return Err(CodegenError::invalid_asset("asset has no name"));
        }

        let class_name = self.decorated_name();
        if !is_identifier(&class_name) {
            return Err(CodegenError::invalid_asset(format!(
                "'{}' is not a valid class name",
                class_name
            )));
        }

        if !self.namespace.is_empty() && !self.namespace.split('.').all(is_identifier) {
            return Err(CodegenError::invalid_asset(format!(
                "'{}' is not a valid namespace",
                self.namespace
            )));
        }

        Ok(())
    }
}

/// Returns true if `s` can be used as a C# identifier without an `@` escape.
#[must_use]
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let well_formed = match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    };
    well_formed && !is_keyword(s)
}

/// Returns true if `s` is a reserved C# keyword.
#[must_use]
pub fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}
