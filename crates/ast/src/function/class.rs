use crate::expression::Expression;
use crate::function::Function;
use crate::property::{MethodKind, PropertyKeyNode};
use vesper_interner::Sym;

#[derive(Debug, Clone)]
pub struct Class {
    pub name: Option<Sym>,
    pub super_class: Option<Box<Expression>>,
    pub constructor: Option<Function>,
    pub elements: Vec<ClassElement>,
}

#[derive(Debug, Clone)]
pub enum ClassElement {
    Method {
        key: PropertyKeyNode,
        function: Function,
        kind: MethodKind,
        is_static: bool,
    },
    Field {
        key: PropertyKeyNode,
        initializer: Option<Expression>,
        is_static: bool,
    },
}
