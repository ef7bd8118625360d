//! Function and class grammar: formal parameters, function bodies,
//! and class bodies. Shared by function/class declarations,
//! expressions, and object-literal/class methods.

use super::Parser;
use crate::error::Result;
use crate::lexer::{Keyword, Punctuator, TokenKind};
use vesper_ast::function::{Class, ClassElement, FormalParameter, Function, FunctionKind};
use vesper_ast::property::MethodKind;
use vesper_ast::statement_list::StatementList;

impl<'a> Parser<'a> {
    pub(super) fn parse_formal_parameters(&mut self) -> Result<Vec<FormalParameter>> {
        self.expect_punctuator(Punctuator::OpenParen)?;
        let mut params = Vec::new();
        while !self.is_punctuator(Punctuator::CloseParen) {
            if self.eat_punctuator(Punctuator::DotDotDot) {
                let binding = self.parse_binding()?;
                params.push(FormalParameter { binding, default: None, is_rest: true });
                break;
            }
            let binding = self.parse_binding()?;
            let default = if self.eat_punctuator(Punctuator::Assign) {
                Some(self.parse_assignment_expression()?)
            } else {
                None
            };
            params.push(FormalParameter { binding, default, is_rest: false });
            if !self.eat_punctuator(Punctuator::Comma) {
                break;
            }
        }
        self.expect_punctuator(Punctuator::CloseParen)?;
        Ok(params)
    }

    pub(super) fn parse_function_body(&mut self) -> Result<StatementList> {
        self.expect_punctuator(Punctuator::OpenBlock)?;
        let list = super::statement::parse_statement_list(self, |p| p.is_punctuator(Punctuator::CloseBlock))?;
        self.expect_punctuator(Punctuator::CloseBlock)?;
        Ok(list)
    }

    /// Parses from right after the `function` keyword (and, for a
    /// declaration, its mandatory name already consumed by the caller
    /// isn't the case here — both expressions and declarations read the
    /// optional/mandatory name the same way and the caller decides
    /// whether `None` is acceptable).
    pub(super) fn parse_function_tail(&mut self, is_async: bool) -> Result<Function> {
        let is_generator = self.eat_punctuator(Punctuator::Mul);
        let name = if let TokenKind::Identifier(_) = self.current_kind() {
            Some(self.expect_identifier_name()?)
        } else {
            None
        };
        let parameters = self.parse_formal_parameters()?;
        let body = self.parse_function_body()?;
        let kind = match (is_async, is_generator) {
            (false, false) => FunctionKind::Normal,
            (false, true) => FunctionKind::Generator,
            (true, false) => FunctionKind::Async,
            (true, true) => FunctionKind::AsyncGenerator,
        };
        Ok(Function { name, parameters, body, kind })
    }

    pub(super) fn parse_class_tail(&mut self) -> Result<Class> {
        let name = if let TokenKind::Identifier(_) = self.current_kind() {
            Some(self.expect_identifier_name()?)
        } else {
            None
        };
        let super_class = if self.eat_keyword(Keyword::Extends) {
            Some(Box::new(self.parse_lhs_expression()?))
        } else {
            None
        };
        self.expect_punctuator(Punctuator::OpenBlock)?;
        let mut constructor = None;
        let mut elements = Vec::new();
        while !self.is_punctuator(Punctuator::CloseBlock) {
            if self.eat_punctuator(Punctuator::Semicolon) {
                continue;
            }
            let is_static = self.is_keyword(Keyword::Static) && !matches!(self.nth_kind(1), TokenKind::Punctuator(Punctuator::OpenParen) | TokenKind::Punctuator(Punctuator::Assign));
            if is_static {
                self.advance();
            }
            let is_async = self.current_text_is("async") && !matches!(self.nth_kind(1), TokenKind::Punctuator(Punctuator::OpenParen) | TokenKind::Punctuator(Punctuator::Assign));
            if is_async {
                self.advance();
            }
            let is_generator = self.eat_punctuator(Punctuator::Mul);
            let method_kind = if self.current_text_is("get") && !matches!(self.nth_kind(1), TokenKind::Punctuator(Punctuator::OpenParen) | TokenKind::Punctuator(Punctuator::Assign)) {
                self.advance();
                MethodKind::Get
            } else if self.current_text_is("set") && !matches!(self.nth_kind(1), TokenKind::Punctuator(Punctuator::OpenParen) | TokenKind::Punctuator(Punctuator::Assign)) {
                self.advance();
                MethodKind::Set
            } else {
                MethodKind::Normal
            };
            let key = self.parse_property_key()?;

            if self.is_punctuator(Punctuator::OpenParen) {
                let parameters = self.parse_formal_parameters()?;
                let body = self.parse_function_body()?;
                let is_ctor = !is_static && method_kind == MethodKind::Normal && matches!(&key, vesper_ast::property::PropertyKeyNode::Identifier(s) if self.resolve(*s) == "constructor");
                if is_ctor {
                    constructor = Some(Function {
                        name: None,
                        parameters,
                        body,
                        kind: FunctionKind::ClassConstructor { derived: super_class.is_some() },
                    });
                } else {
                    let kind = match (is_async, is_generator) {
                        (false, false) => FunctionKind::Normal,
                        (false, true) => FunctionKind::Generator,
                        (true, false) => FunctionKind::Async,
                        (true, true) => FunctionKind::AsyncGenerator,
                    };
                    elements.push(ClassElement::Method {
                        key,
                        function: Function { name: None, parameters, body, kind },
                        kind: method_kind,
                        is_static,
                    });
                }
            } else {
                let initializer = if self.eat_punctuator(Punctuator::Assign) {
                    Some(self.parse_assignment_expression()?)
                } else {
                    None
                };
                self.consume_semicolon()?;
                elements.push(ClassElement::Field { key, initializer, is_static });
            }
        }
        self.expect_punctuator(Punctuator::CloseBlock)?;
        Ok(Class { name, super_class, constructor, elements })
    }
}
