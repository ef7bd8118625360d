use crate::expression::Expression;
use crate::property::PropertyKeyNode;
use vesper_interner::Sym;

/// The left-hand side of a variable declarator, a formal parameter, or a
/// destructuring assignment target.
#[derive(Debug, Clone)]
pub enum Binding {
    Identifier(Sym),
    Pattern(Pattern),
}

impl Binding {
    /// `BoundNames` restricted to a single binding.
    pub fn bound_names(&self, out: &mut Vec<Sym>) {
        match self {
            Binding::Identifier(sym) => out.push(*sym),
            Binding::Pattern(pattern) => pattern.bound_names(out),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Pattern {
    Array(ArrayPattern),
    Object(ObjectPattern),
}

impl Pattern {
    pub fn bound_names(&self, out: &mut Vec<Sym>) {
        match self {
            Pattern::Array(array) => {
                for element in array.elements.iter().flatten() {
                    element.binding.bound_names(out);
                }
                if let Some(rest) = &array.rest {
                    rest.bound_names(out);
                }
            }
            Pattern::Object(object) => {
                for property in &object.properties {
                    property.value.bound_names(out);
                }
                if let Some(rest) = &object.rest {
                    rest.bound_names(out);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ArrayPattern {
    /// `None` entries are elisions (`[a, , b] = ...`).
    pub elements: Vec<Option<ArrayPatternElement>>,
    pub rest: Option<Box<Binding>>,
}

#[derive(Debug, Clone)]
pub struct ArrayPatternElement {
    pub binding: Binding,
    pub default: Option<Expression>,
}

#[derive(Debug, Clone, Default)]
pub struct ObjectPattern {
    pub properties: Vec<ObjectPatternProperty>,
    pub rest: Option<Box<Binding>>,
}

#[derive(Debug, Clone)]
pub struct ObjectPatternProperty {
    pub key: PropertyKeyNode,
    pub value: Binding,
    pub default: Option<Expression>,
}
