//! C# syntax model.
//!
//! Generated sources are built as a tree of declarations and statements and
//! only turned into text by the [`writer`](super::writer) module, so that
//! formatting is decided in one place.

/// Member or type accessibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// `public`
    Public,
    /// `private`
    Private,
}

impl Visibility {
    /// Returns the C# keyword.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

/// One source file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompilationUnit {
    /// Comment block written verbatim before everything else.
    pub header: Option<String>,
    /// Namespaces imported with `using`.
    pub usings: Vec<String>,
    /// Enclosing namespace; `None` or empty places types in the global namespace.
    pub namespace: Option<String>,
    /// Declared classes.
    pub classes: Vec<ClassDecl>,
}

impl CompilationUnit {
    /// Creates an empty compilation unit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the header comment.
    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Adds a `using` directive. Duplicates are ignored.
    #[must_use]
    pub fn with_using(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        if !self.usings.contains(&namespace) {
            self.usings.push(namespace);
        }
        self
    }

    /// Sets the enclosing namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Adds a class declaration.
    #[must_use]
    pub fn with_class(mut self, class: ClassDecl) -> Self {
        self.classes.push(class);
        self
    }
}

/// Class declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    /// Class name.
    pub name: String,
    /// Accessibility.
    pub visibility: Visibility,
    /// Declared `partial`.
    pub is_partial: bool,
    /// Base class and interfaces.
    pub base_types: Vec<String>,
    /// Members in declaration order.
    pub members: Vec<Member>,
}

impl ClassDecl {
    /// Creates a public, non-partial class without members.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            is_partial: false,
            base_types: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Marks the class `partial`.
    #[must_use]
    pub fn partial(mut self) -> Self {
        self.is_partial = true;
        self
    }

    /// Adds a base type.
    #[must_use]
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base_types.push(base.into());
        self
    }

    /// Appends a member.
    pub fn add_member(&mut self, member: impl Into<Member>) {
        self.members.push(member.into());
    }

    /// Appends a member.
    #[must_use]
    pub fn with_member(mut self, member: impl Into<Member>) -> Self {
        self.add_member(member);
        self
    }
}

/// Class member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    /// Field.
    Field(FieldDecl),
    /// Property.
    Property(PropertyDecl),
    /// Constructor.
    Constructor(ConstructorDecl),
    /// Method.
    Method(MethodDecl),
}

impl From<FieldDecl> for Member {
    fn from(value: FieldDecl) -> Self {
        Self::Field(value)
    }
}

impl From<PropertyDecl> for Member {
    fn from(value: PropertyDecl) -> Self {
        Self::Property(value)
    }
}

impl From<ConstructorDecl> for Member {
    fn from(value: ConstructorDecl) -> Self {
        Self::Constructor(value)
    }
}

impl From<MethodDecl> for Member {
    fn from(value: MethodDecl) -> Self {
        Self::Method(value)
    }
}

/// Field declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Attributes, without brackets (`SerializeField`).
    pub attributes: Vec<String>,
    /// Accessibility.
    pub visibility: Visibility,
    /// Declared `readonly`.
    pub is_readonly: bool,
    /// Field type.
    pub type_name: String,
    /// Field name.
    pub name: String,
}

impl FieldDecl {
    /// Creates a private field.
    #[must_use]
    pub fn private(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            attributes: Vec::new(),
            visibility: Visibility::Private,
            is_readonly: false,
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    /// Marks the field `readonly`.
    #[must_use]
    pub fn readonly(mut self) -> Self {
        self.is_readonly = true;
        self
    }
}

/// Read-only property body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyBody {
    /// `get { return expr; }`
    Getter(Expr),
    /// `=> expr;`
    Arrow(Expr),
}

/// Read-only property declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDecl {
    /// Accessibility.
    pub visibility: Visibility,
    /// Property type.
    pub type_name: String,
    /// Property name.
    pub name: String,
    /// Body.
    pub body: PropertyBody,
}

impl PropertyDecl {
    /// Creates a public property.
    #[must_use]
    pub fn public(
        type_name: impl Into<String>,
        name: impl Into<String>,
        body: PropertyBody,
    ) -> Self {
        Self {
            visibility: Visibility::Public,
            type_name: type_name.into(),
            name: name.into(),
            body,
        }
    }
}

/// Method or constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter type.
    pub type_name: String,
    /// Parameter name.
    pub name: String,
}

impl Parameter {
    /// Creates a parameter.
    #[must_use]
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
        }
    }
}

/// Constructor declaration; named after its class when rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDecl {
    /// Accessibility.
    pub visibility: Visibility,
    /// Parameters.
    pub parameters: Vec<Parameter>,
    /// Body statements.
    pub body: Vec<Stmt>,
}

/// Parameterless instance method returning `void`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    /// Accessibility.
    pub visibility: Visibility,
    /// Method name.
    pub name: String,
    /// Body statements.
    pub body: Vec<Stmt>,
}

impl MethodDecl {
    /// Creates a method.
    #[must_use]
    pub fn void(visibility: Visibility, name: impl Into<String>, body: Vec<Stmt>) -> Self {
        Self {
            visibility,
            name: name.into(),
            body,
        }
    }
}

/// Statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// Expression statement.
    Expr(Expr),
    /// `target = value;`
    Assign {
        /// Assigned location.
        target: Expr,
        /// Assigned value.
        value: Expr,
    },
}

impl Stmt {
    /// Creates an assignment statement.
    #[must_use]
    pub fn assign(target: Expr, value: Expr) -> Self {
        Self::Assign { target, value }
    }
}

/// Expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Identifier or keyword.
    Ident(String),
    /// String literal.
    Str(String),
    /// Member access, `target.name` or `target?.name`.
    Member {
        /// Accessed expression.
        target: Box<Expr>,
        /// Member name.
        name: String,
        /// Null-conditional access.
        conditional: bool,
    },
    /// Invocation.
    Invoke {
        /// Invoked expression.
        callee: Box<Expr>,
        /// Arguments.
        args: Vec<Expr>,
    },
    /// Explicit cast.
    Cast {
        /// Target type.
        type_name: String,
        /// Cast operand.
        expr: Box<Expr>,
    },
    /// Object creation.
    New {
        /// Created type.
        type_name: String,
        /// Constructor arguments.
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Creates an identifier expression.
    #[must_use]
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Ident(name.into())
    }

    /// Creates a string literal expression.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    /// `self.name`
    #[must_use]
    pub fn dot(self, name: impl Into<String>) -> Self {
        Self::Member {
            target: Box::new(self),
            name: name.into(),
            conditional: false,
        }
    }

    /// `self?.name`
    #[must_use]
    pub fn null_dot(self, name: impl Into<String>) -> Self {
        Self::Member {
            target: Box::new(self),
            name: name.into(),
            conditional: true,
        }
    }

    /// `self(args)`
    #[must_use]
    pub fn call(self, args: Vec<Expr>) -> Self {
        Self::Invoke {
            callee: Box::new(self),
            args,
        }
    }

    /// `(type_name)self`
    #[must_use]
    pub fn cast(self, type_name: impl Into<String>) -> Self {
        Self::Cast {
            type_name: type_name.into(),
            expr: Box::new(self),
        }
    }

    /// `new type_name(args)`
    #[must_use]
    pub fn new_object(type_name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::New {
            type_name: type_name.into(),
            args,
        }
    }
}
