//! Error types for code generation.

use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Markup parsing error.
    #[error("markup parse error: {0}")]
    Parse(#[from] markbind_markup::ParseError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The asset cannot be used to generate a class.
    #[error("invalid asset: {reason}")]
    InvalidAsset {
        /// Why the asset was rejected.
        reason: String,
    },

    /// Two elements sanitize to the same field name and duplicates are rejected.
    #[error("duplicate field '{field_name}' declared by elements {declared_names:?}")]
    DuplicateFieldName {
        /// Sanitized field name.
        field_name: String,
        /// Declared names colliding on the field, in document order.
        declared_names: Vec<String>,
    },

    /// An element maps onto a member the generated class declares itself.
    #[error("element '{declared_name}' collides with generated member '{member_name}'")]
    ReservedMemberName {
        /// Colliding member name.
        member_name: String,
        /// Declared name of the element.
        declared_name: String,
    },
}

impl CodegenError {
    /// Creates an invalid asset error with the given reason.
    pub fn invalid_asset(reason: impl Into<String>) -> Self {
        Self::InvalidAsset {
            reason: reason.into(),
        }
    }
}
