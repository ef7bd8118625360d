use crate::expression::Expression;
use vesper_interner::Sym;
use vesper_string::JsString;

/// The key of an object-literal property or class element. Computed
/// keys defer to an expression evaluated once, at definition time.
#[derive(Debug, Clone)]
pub enum PropertyKeyNode {
    Identifier(Sym),
    StringLiteral(JsString),
    NumericLiteral(f64),
    Computed(Box<Expression>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Normal,
    Get,
    Set,
}
