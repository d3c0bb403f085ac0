//! Deterministic rendering of the C# syntax model.
//!
//! Output uses four-space indentation, Allman braces and `\n` line endings.
//! The same tree always renders to the same bytes.

use super::syntax::{
    ClassDecl, CompilationUnit, ConstructorDecl, Expr, FieldDecl, Member, MethodDecl, Parameter,
    PropertyBody, PropertyDecl, Stmt,
};
use std::fmt;

const INDENT: &str = "    ";

/// Line-oriented text builder tracking indentation.
#[derive(Debug, Default)]
pub struct CodeWriter {
    output: String,
    depth: usize,
}

impl CodeWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one indented line.
    pub fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.output.push_str(INDENT);
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    /// Writes an empty line.
    pub fn blank(&mut self) {
        self.output.push('\n');
    }

    /// Writes `{` and indents.
    pub fn open(&mut self) {
        self.line("{");
        self.depth += 1;
    }

    /// Dedents and writes `}`.
    pub fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    /// Returns the rendered text.
    #[must_use]
    pub fn finish(self) -> String {
        self.output
    }
}

/// Renders a compilation unit to source text.
#[must_use]
pub fn render(unit: &CompilationUnit) -> String {
    let mut w = CodeWriter::new();

    if let Some(header) = &unit.header {
        for line in header.lines() {
            w.line(line);
        }
        w.blank();
    }

    for using in &unit.usings {
        w.line(&format!("using {};", using));
    }
    if !unit.usings.is_empty() {
        w.blank();
    }

    match unit.namespace.as_deref().filter(|ns| !ns.is_empty()) {
        Some(namespace) => {
            w.line(&format!("namespace {}", namespace));
            w.open();
            write_classes(&mut w, &unit.classes);
            w.close();
        }
        None => write_classes(&mut w, &unit.classes),
    }

    w.finish()
}

fn write_classes(w: &mut CodeWriter, classes: &[ClassDecl]) {
    for (i, class) in classes.iter().enumerate() {
        if i > 0 {
            w.blank();
        }
        write_class(w, class);
    }
}

fn write_class(w: &mut CodeWriter, class: &ClassDecl) {
    let mut signature = String::from(class.visibility.keyword());
    if class.is_partial {
        signature.push_str(" partial");
    }
    signature.push_str(" class ");
    signature.push_str(&class.name);
    if !class.base_types.is_empty() {
        signature.push_str(" : ");
        signature.push_str(&class.base_types.join(", "));
    }

    w.line(&signature);
    w.open();

    let mut previous: Option<&Member> = None;
    for member in &class.members {
        // Consecutive fields stay grouped; everything else is separated.
        let grouped = matches!((previous, member), (Some(Member::Field(_)), Member::Field(_)));
        if previous.is_some() && !grouped {
            w.blank();
        }

        match member {
            Member::Field(field) => write_field(w, field),
            Member::Property(property) => write_property(w, property),
            Member::Constructor(ctor) => write_constructor(w, &class.name, ctor),
            Member::Method(method) => write_method(w, method),
        }
        previous = Some(member);
    }

    w.close();
}

fn write_field(w: &mut CodeWriter, field: &FieldDecl) {
    for attribute in &field.attributes {
        w.line(&format!("[{}]", attribute));
    }
    let readonly = if field.is_readonly { " readonly" } else { "" };
    w.line(&format!(
        "{}{} {} {};",
        field.visibility.keyword(),
        readonly,
        field.type_name,
        field.name
    ));
}

fn write_property(w: &mut CodeWriter, property: &PropertyDecl) {
    let signature = format!(
        "{} {} {}",
        property.visibility.keyword(),
        property.type_name,
        property.name
    );

    match &property.body {
        PropertyBody::Arrow(expr) => w.line(&format!("{} => {};", signature, expr)),
        PropertyBody::Getter(expr) => {
            w.line(&signature);
            w.open();
            w.line("get");
            w.open();
            w.line(&format!("return {};", expr));
            w.close();
            w.close();
        }
    }
}

fn write_constructor(w: &mut CodeWriter, class_name: &str, ctor: &ConstructorDecl) {
    w.line(&format!(
        "{} {}({})",
        ctor.visibility.keyword(),
        class_name,
        parameter_list(&ctor.parameters)
    ));
    write_block(w, &ctor.body);
}

fn write_method(w: &mut CodeWriter, method: &MethodDecl) {
    w.line(&format!("{} void {}()", method.visibility.keyword(), method.name));
    write_block(w, &method.body);
}

fn write_block(w: &mut CodeWriter, body: &[Stmt]) {
    w.open();
    for stmt in body {
        w.line(&stmt.to_string());
    }
    w.close();
}

fn parameter_list(parameters: &[Parameter]) -> String {
    parameters
        .iter()
        .map(|p| format!("{} {}", p.type_name, p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expr(expr) => write!(f, "{};", expr),
            Self::Assign { target, value } => write!(f, "{} = {};", target, value),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(name) => f.write_str(name),
            Self::Str(value) => write!(f, "\"{}\"", escape_string(value)),
            Self::Member {
                target,
                name,
                conditional,
            } => {
                let op = if *conditional { "?." } else { "." };
                write!(f, "{}{}{}", target, op, name)
            }
            Self::Invoke { callee, args } => write!(f, "{}({})", callee, argument_list(args)),
            Self::Cast { type_name, expr } => write!(f, "({}){}", type_name, expr),
            Self::New { type_name, args } => {
                write!(f, "new {}({})", type_name, argument_list(args))
            }
        }
    }
}

fn argument_list(args: &[Expr]) -> String {
    args.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Escapes a value for use inside a regular C# string literal.
///
/// Every character C# treats as a line terminator is escaped.
#[must_use]
pub fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\0' => escaped.push_str("\\0"),
            '\u{85}' => escaped.push_str("\\u0085"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            _ => escaped.push(c),
        }
    }
    escaped
}
