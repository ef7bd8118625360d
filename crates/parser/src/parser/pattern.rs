//! Binding patterns: identifiers and array/object destructuring, shared
//! by variable declarators, formal parameters and catch parameters.

use super::Parser;
use crate::error::Result;
use crate::lexer::{Punctuator, TokenKind};
use vesper_ast::pattern::{ArrayPattern, ArrayPatternElement, Binding, ObjectPattern, ObjectPatternProperty, Pattern};
use vesper_ast::property::PropertyKeyNode;

impl<'a> Parser<'a> {
    pub(super) fn parse_binding(&mut self) -> Result<Binding> {
        if self.is_punctuator(Punctuator::OpenBracket) {
            return Ok(Binding::Pattern(Pattern::Array(self.parse_array_pattern()?)));
        }
        if self.is_punctuator(Punctuator::OpenBlock) {
            return Ok(Binding::Pattern(Pattern::Object(self.parse_object_pattern()?)));
        }
        Ok(Binding::Identifier(self.expect_identifier_name()?))
    }

    fn parse_array_pattern(&mut self) -> Result<ArrayPattern> {
        self.expect_punctuator(Punctuator::OpenBracket)?;
        let mut pattern = ArrayPattern::default();
        loop {
            if self.is_punctuator(Punctuator::CloseBracket) {
                break;
            }
            if self.eat_punctuator(Punctuator::Comma) {
                pattern.elements.push(None);
                continue;
            }
            if self.eat_punctuator(Punctuator::DotDotDot) {
                pattern.rest = Some(Box::new(self.parse_binding()?));
                break;
            }
            let binding = self.parse_binding()?;
            let default = if self.eat_punctuator(Punctuator::Assign) {
                Some(self.parse_assignment_expression()?)
            } else {
                None
            };
            pattern.elements.push(Some(ArrayPatternElement { binding, default }));
            if !self.eat_punctuator(Punctuator::Comma) {
                break;
            }
        }
        self.expect_punctuator(Punctuator::CloseBracket)?;
        Ok(pattern)
    }

    fn parse_object_pattern(&mut self) -> Result<ObjectPattern> {
        self.expect_punctuator(Punctuator::OpenBlock)?;
        let mut pattern = ObjectPattern::default();
        loop {
            if self.is_punctuator(Punctuator::CloseBlock) {
                break;
            }
            if self.eat_punctuator(Punctuator::DotDotDot) {
                pattern.rest = Some(Box::new(self.parse_binding()?));
                break;
            }
            let key = self.parse_property_key()?;
            let (value, default) = if self.eat_punctuator(Punctuator::Colon) {
                let binding = self.parse_binding()?;
                let default = if self.eat_punctuator(Punctuator::Assign) {
                    Some(self.parse_assignment_expression()?)
                } else {
                    None
                };
                (binding, default)
            } else {
                let PropertyKeyNode::Identifier(sym) = key else {
                    return Err(self.error("shorthand destructuring property must be an identifier"));
                };
                let default = if self.eat_punctuator(Punctuator::Assign) {
                    Some(self.parse_assignment_expression()?)
                } else {
                    None
                };
                (Binding::Identifier(sym), default)
            };
            pattern.properties.push(ObjectPatternProperty { key, value, default });
            if !self.eat_punctuator(Punctuator::Comma) {
                break;
            }
        }
        self.expect_punctuator(Punctuator::CloseBlock)?;
        Ok(pattern)
    }

    /// A property key in object-pattern or object-literal position:
    /// identifier, string, number, or `[computed]`.
    pub(super) fn parse_property_key(&mut self) -> Result<PropertyKeyNode> {
        if self.eat_punctuator(Punctuator::OpenBracket) {
            let expr = self.parse_assignment_expression()?;
            self.expect_punctuator(Punctuator::CloseBracket)?;
            return Ok(PropertyKeyNode::Computed(Box::new(expr)));
        }
        match self.current_kind().clone() {
            TokenKind::StringLiteral(s) => {
                self.advance();
                Ok(PropertyKeyNode::StringLiteral(s))
            }
            TokenKind::NumericLiteral(n) => {
                self.advance();
                Ok(PropertyKeyNode::NumericLiteral(n))
            }
            _ => Ok(PropertyKeyNode::Identifier(self.expect_identifier_name()?)),
        }
    }
}
