//! Ordinary function objects: hold the parsed parameters
//! and body, a captured lexical environment, a this-mode, a kind, and
//! (for methods) a `HomeObject` used to resolve `super`.

use crate::environment::Environment;
use std::rc::Rc;
use vesper_ast::function::{Function as AstFunction, FunctionKind as AstFunctionKind};
use vesper_gc::{Finalize, Trace};

use super::JsObject;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThisMode {
    /// Arrow functions: `this` is not bound at all; lookups walk to the
    /// captured environment's `this`-binding.
    Lexical,
    Strict,
    Global,
}

/// The payload of `ObjectKind::Function`.
pub struct FunctionData {
    pub ast: Rc<AstFunction>,
    pub environment: Environment,
    pub this_mode: ThisMode,
    pub home_object: Option<JsObject>,
    /// Set when this is a derived class constructor — changes `this`
    /// pre-allocation and `return`-value rules.
    pub is_derived_constructor: bool,
    pub fields: Rc<Vec<ClassFieldInit>>,
}

/// A class instance field initializer, run during `[[Construct]]`
/// right after `this` is bound (own fields) or right after `super()`
/// returns (derived class instance fields).
#[derive(Clone)]
pub struct ClassFieldInit {
    pub key: vesper_ast::property::PropertyKeyNode,
    pub initializer: Option<vesper_ast::expression::Expression>,
    pub is_static: bool,
}

impl FunctionData {
    pub fn is_constructable(&self) -> bool {
        matches!(
            self.ast.kind,
            AstFunctionKind::Normal | AstFunctionKind::ClassConstructor { .. }
        )
    }

    pub fn is_class_constructor(&self) -> bool {
        matches!(self.ast.kind, AstFunctionKind::ClassConstructor { .. })
    }

    pub fn strict(&self) -> bool {
        self.ast.body.strict || self.is_class_constructor()
    }
}

impl Finalize for FunctionData {
    fn finalize(&self) {
        self.environment.finalize();
        self.home_object.finalize();
    }
}
unsafe impl Trace for FunctionData {
    fn trace(&self) {
        self.environment.trace();
        self.home_object.trace();
    }
}
