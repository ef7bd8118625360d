//! Expression grammar: the full precedence cascade from assignment down
//! to primary expressions, plus the `LeftHandSideExpression` chain
//! (member access, calls, `new`, optional chaining) that every level
//! above unary bottoms out through.

use super::Parser;
use crate::error::Result;
use crate::lexer::{Keyword, Punctuator, TokenKind};
use vesper_ast::expression::literal::{ArrayLiteral, Literal, ObjectLiteral, PropertyDefinition, TemplateLiteral};
use vesper_ast::expression::{ArrayElement, AssignOp, BinaryOp, Expression, LogicalOp, MemberProperty, UnaryOp, UpdateOp};
use vesper_ast::function::{FormalParameter, Function, FunctionKind, MethodKind};
use vesper_ast::statement::Statement;
use vesper_ast::statement_list::{StatementList, StatementListItem};
use vesper_string::JsString;

impl<'a> Parser<'a> {
    /// `Expression` (the comma operator): the widest grammar production,
    /// used at statement level and inside `for (...)` clauses.
    pub(super) fn parse_expression(&mut self) -> Result<Expression> {
        let first = self.parse_assignment_expression()?;
        if !self.is_punctuator(Punctuator::Comma) {
            return Ok(first);
        }
        let mut exprs = vec![first];
        while self.eat_punctuator(Punctuator::Comma) {
            exprs.push(self.parse_assignment_expression()?);
        }
        Ok(Expression::Sequence(exprs))
    }

    pub(super) fn parse_assignment_expression(&mut self) -> Result<Expression> {
        if self.is_keyword(Keyword::Yield) {
            return self.parse_yield_expression();
        }
        if let Some(arrow) = self.try_parse_arrow_function()? {
            return Ok(arrow);
        }
        let expr = self.parse_conditional_expression()?;
        if let Some(op) = self.peek_assignment_operator() {
            self.advance();
            let value = self.parse_assignment_expression()?;
            return Ok(Expression::Assign {
                op,
                target: Box::new(expr),
                value: Box::new(value),
            });
        }
        Ok(expr)
    }

    fn peek_assignment_operator(&self) -> Option<AssignOp> {
        let TokenKind::Punctuator(p) = self.current_kind() else { return None };
        Some(match p {
            Punctuator::Assign => AssignOp::Assign,
            Punctuator::AddAssign => AssignOp::Add,
            Punctuator::SubAssign => AssignOp::Sub,
            Punctuator::MulAssign => AssignOp::Mul,
            Punctuator::DivAssign => AssignOp::Div,
            Punctuator::ModAssign => AssignOp::Mod,
            Punctuator::ExpAssign => AssignOp::Exp,
            Punctuator::BitAndAssign => AssignOp::BitAnd,
            Punctuator::BitOrAssign => AssignOp::BitOr,
            Punctuator::BitXorAssign => AssignOp::BitXor,
            Punctuator::ShlAssign => AssignOp::Shl,
            Punctuator::ShrAssign => AssignOp::Shr,
            Punctuator::UShrAssign => AssignOp::UShr,
            Punctuator::BoolAndAssign => AssignOp::LogicalAnd,
            Punctuator::BoolOrAssign => AssignOp::LogicalOr,
            Punctuator::CoalesceAssign => AssignOp::Coalesce,
            _ => return None,
        })
    }

    fn parse_yield_expression(&mut self) -> Result<Expression> {
        self.advance();
        if self.line_terminator_before() || !self.yield_argument_follows() {
            return Ok(Expression::Yield { argument: None, delegate: false });
        }
        let delegate = self.eat_punctuator(Punctuator::Mul);
        if delegate {
            let argument = self.parse_assignment_expression()?;
            return Ok(Expression::Yield { argument: Some(Box::new(argument)), delegate: true });
        }
        if !self.yield_argument_follows() {
            return Ok(Expression::Yield { argument: None, delegate: false });
        }
        let argument = self.parse_assignment_expression()?;
        Ok(Expression::Yield { argument: Some(Box::new(argument)), delegate: false })
    }

    /// Whether the token after a bare `yield` can start an expression —
    /// `yield` with no argument is legal right before a terminator.
    fn yield_argument_follows(&self) -> bool {
        !matches!(
            self.current_kind(),
            TokenKind::Eof
                | TokenKind::Punctuator(
                    Punctuator::Semicolon
                        | Punctuator::CloseParen
                        | Punctuator::CloseBracket
                        | Punctuator::CloseBlock
                        | Punctuator::Comma
                        | Punctuator::Colon
                )
        )
    }

    // ---- arrow functions ----

    /// Looks ahead for an arrow-function head (`ident =>`, `(params) =>`,
    /// or the `async` variants of both) without committing to a parse —
    /// returns `None` and leaves `self.pos` untouched if the lookahead
    /// fails to find `=>` in the expected place.
    fn try_parse_arrow_function(&mut self) -> Result<Option<Expression>> {
        let start = self.pos;
        let is_async = self.current_text_is("async")
            && !self.tokens[self.pos + 1].line_terminator_before
            && !matches!(self.nth_kind(1), TokenKind::Keyword(Keyword::Function));
        let param_start = if is_async { self.pos + 1 } else { self.pos };
        if param_start >= self.tokens.len() {
            return Ok(None);
        }

        if let TokenKind::Identifier(sym) = self.tokens[param_start].kind.clone() {
            if matches!(self.kind_at(param_start + 1), TokenKind::Punctuator(Punctuator::Arrow)) {
                self.pos = param_start + 1;
                self.advance();
                let params = vec![FormalParameter { binding: vesper_ast::pattern::Binding::Identifier(sym), default: None, is_rest: false }];
                return Ok(Some(self.finish_arrow_function(params, is_async)?));
            }
        }

        if matches!(self.kind_at(param_start), TokenKind::Punctuator(Punctuator::OpenParen)) {
            if let Some(close) = self.find_matching_close_paren(param_start) {
                if matches!(self.kind_at(close + 1), TokenKind::Punctuator(Punctuator::Arrow)) {
                    self.pos = param_start;
                    let params = self.parse_formal_parameters()?;
                    self.expect_punctuator(Punctuator::Arrow)?;
                    return Ok(Some(self.finish_arrow_function(params, is_async)?));
                }
            }
        }

        self.pos = start;
        Ok(None)
    }

    fn kind_at(&self, idx: usize) -> &TokenKind {
        &self.tokens[idx.min(self.tokens.len() - 1)].kind
    }

    /// Given `self.tokens[open_idx]` is `(`, finds the index of its
    /// matching `)` by depth-counting parens only — nested `{`/`[` pairs
    /// never affect paren matching.
    fn find_matching_close_paren(&self, open_idx: usize) -> Option<usize> {
        let mut depth = 0i32;
        let mut i = open_idx;
        while i < self.tokens.len() {
            match &self.tokens[i].kind {
                TokenKind::Punctuator(Punctuator::OpenParen) => depth += 1,
                TokenKind::Punctuator(Punctuator::CloseParen) => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                TokenKind::Eof => return None,
                _ => {}
            }
            i += 1;
        }
        None
    }

    fn finish_arrow_function(&mut self, parameters: Vec<FormalParameter>, is_async: bool) -> Result<Expression> {
        let body = if self.is_punctuator(Punctuator::OpenBlock) {
            self.parse_function_body()?
        } else {
            let expr = self.parse_assignment_expression()?;
            StatementList::new(vec![StatementListItem::Statement(Statement::Return(Some(expr)))], false)
        };
        let kind = if is_async { FunctionKind::AsyncArrow } else { FunctionKind::Arrow };
        Ok(Expression::Function(Box::new(Function { name: None, parameters, body, kind })))
    }

    // ---- conditional / binary precedence cascade ----

    fn parse_conditional_expression(&mut self) -> Result<Expression> {
        let test = self.parse_nullish_expression()?;
        if self.eat_punctuator(Punctuator::Question) {
            let consequent = self.parse_assignment_expression()?;
            self.expect_punctuator(Punctuator::Colon)?;
            let alternate = self.parse_assignment_expression()?;
            return Ok(Expression::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            });
        }
        Ok(test)
    }

    fn parse_nullish_expression(&mut self) -> Result<Expression> {
        let mut left = self.parse_logical_or_expression()?;
        while self.eat_punctuator(Punctuator::Coalesce) {
            let right = self.parse_logical_or_expression()?;
            left = Expression::Logical(LogicalOp::Coalesce, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_logical_or_expression(&mut self) -> Result<Expression> {
        let mut left = self.parse_logical_and_expression()?;
        while self.eat_punctuator(Punctuator::BoolOr) {
            let right = self.parse_logical_and_expression()?;
            left = Expression::Logical(LogicalOp::Or, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_logical_and_expression(&mut self) -> Result<Expression> {
        let mut left = self.parse_bitwise_or_expression()?;
        while self.eat_punctuator(Punctuator::BoolAnd) {
            let right = self.parse_bitwise_or_expression()?;
            left = Expression::Logical(LogicalOp::And, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_bitwise_or_expression(&mut self) -> Result<Expression> {
        let mut left = self.parse_bitwise_xor_expression()?;
        while self.eat_punctuator(Punctuator::BitOr) {
            let right = self.parse_bitwise_xor_expression()?;
            left = Expression::Binary(BinaryOp::BitOr, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_bitwise_xor_expression(&mut self) -> Result<Expression> {
        let mut left = self.parse_bitwise_and_expression()?;
        while self.eat_punctuator(Punctuator::BitXor) {
            let right = self.parse_bitwise_and_expression()?;
            left = Expression::Binary(BinaryOp::BitXor, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_bitwise_and_expression(&mut self) -> Result<Expression> {
        let mut left = self.parse_equality_expression()?;
        while self.eat_punctuator(Punctuator::BitAnd) {
            let right = self.parse_equality_expression()?;
            left = Expression::Binary(BinaryOp::BitAnd, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_equality_expression(&mut self) -> Result<Expression> {
        let mut left = self.parse_relational_expression()?;
        loop {
            let op = if self.is_punctuator(Punctuator::Eq) {
                BinaryOp::Equal
            } else if self.is_punctuator(Punctuator::NotEq) {
                BinaryOp::NotEqual
            } else if self.is_punctuator(Punctuator::StrictEq) {
                BinaryOp::StrictEqual
            } else if self.is_punctuator(Punctuator::StrictNotEq) {
                BinaryOp::StrictNotEqual
            } else {
                break;
            };
            self.advance();
            let right = self.parse_relational_expression()?;
            left = Expression::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_relational_expression(&mut self) -> Result<Expression> {
        let mut left = self.parse_shift_expression()?;
        loop {
            let op = if self.is_punctuator(Punctuator::LessThan) {
                BinaryOp::LessThan
            } else if self.is_punctuator(Punctuator::GreaterThan) {
                BinaryOp::GreaterThan
            } else if self.is_punctuator(Punctuator::LessThanOrEq) {
                BinaryOp::LessThanOrEqual
            } else if self.is_punctuator(Punctuator::GreaterThanOrEq) {
                BinaryOp::GreaterThanOrEqual
            } else if self.is_keyword(Keyword::InstanceOf) {
                BinaryOp::InstanceOf
            } else if self.is_keyword(Keyword::In) {
                BinaryOp::In
            } else {
                break;
            };
            self.advance();
            let right = self.parse_shift_expression()?;
            left = Expression::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_shift_expression(&mut self) -> Result<Expression> {
        let mut left = self.parse_additive_expression()?;
        loop {
            let op = if self.is_punctuator(Punctuator::Shl) {
                BinaryOp::Shl
            } else if self.is_punctuator(Punctuator::Shr) {
                BinaryOp::Shr
            } else if self.is_punctuator(Punctuator::UShr) {
                BinaryOp::UShr
            } else {
                break;
            };
            self.advance();
            let right = self.parse_additive_expression()?;
            left = Expression::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_additive_expression(&mut self) -> Result<Expression> {
        let mut left = self.parse_multiplicative_expression()?;
        loop {
            let op = if self.is_punctuator(Punctuator::Add) {
                BinaryOp::Add
            } else if self.is_punctuator(Punctuator::Sub) {
                BinaryOp::Sub
            } else {
                break;
            };
            self.advance();
            let right = self.parse_multiplicative_expression()?;
            left = Expression::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_multiplicative_expression(&mut self) -> Result<Expression> {
        let mut left = self.parse_exponent_expression()?;
        loop {
            let op = if self.is_punctuator(Punctuator::Mul) {
                BinaryOp::Mul
            } else if self.is_punctuator(Punctuator::Div) {
                BinaryOp::Div
            } else if self.is_punctuator(Punctuator::Mod) {
                BinaryOp::Mod
            } else {
                break;
            };
            self.advance();
            let right = self.parse_exponent_expression()?;
            left = Expression::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    /// `**` is right-associative: `2 ** 3 ** 2 == 2 ** (3 ** 2)`.
    fn parse_exponent_expression(&mut self) -> Result<Expression> {
        let left = self.parse_unary_expression()?;
        if self.eat_punctuator(Punctuator::Exp) {
            let right = self.parse_exponent_expression()?;
            return Ok(Expression::Binary(BinaryOp::Exp, Box::new(left), Box::new(right)));
        }
        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> Result<Expression> {
        if self.is_keyword(Keyword::Await) {
            self.advance();
            let operand = self.parse_unary_expression()?;
            return Ok(Expression::Await(Box::new(operand)));
        }
        if self.eat_punctuator(Punctuator::Inc) {
            let target = self.parse_unary_expression()?;
            return Ok(Expression::Update { op: UpdateOp::Increment, prefix: true, target: Box::new(target) });
        }
        if self.eat_punctuator(Punctuator::Dec) {
            let target = self.parse_unary_expression()?;
            return Ok(Expression::Update { op: UpdateOp::Decrement, prefix: true, target: Box::new(target) });
        }
        let op = match self.current_kind() {
            TokenKind::Punctuator(Punctuator::Add) => Some(UnaryOp::Plus),
            TokenKind::Punctuator(Punctuator::Sub) => Some(UnaryOp::Minus),
            TokenKind::Punctuator(Punctuator::Not) => Some(UnaryOp::Not),
            TokenKind::Punctuator(Punctuator::BitNot) => Some(UnaryOp::BitNot),
            TokenKind::Keyword(Keyword::TypeOf) => Some(UnaryOp::TypeOf),
            TokenKind::Keyword(Keyword::Void) => Some(UnaryOp::Void),
            TokenKind::Keyword(Keyword::Delete) => Some(UnaryOp::Delete),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary_expression()?;
            return Ok(Expression::Unary(op, Box::new(operand)));
        }
        self.parse_postfix_expression()
    }

    fn parse_postfix_expression(&mut self) -> Result<Expression> {
        let expr = self.parse_lhs_expression()?;
        if !self.line_terminator_before() {
            if self.eat_punctuator(Punctuator::Inc) {
                return Ok(Expression::Update { op: UpdateOp::Increment, prefix: false, target: Box::new(expr) });
            }
            if self.eat_punctuator(Punctuator::Dec) {
                return Ok(Expression::Update { op: UpdateOp::Decrement, prefix: false, target: Box::new(expr) });
            }
        }
        Ok(expr)
    }

    // ---- LeftHandSideExpression: new / super / member / call chains ----

    pub(super) fn parse_lhs_expression(&mut self) -> Result<Expression> {
        let expr = if self.is_keyword(Keyword::New) {
            self.parse_new_expression()?
        } else if self.is_keyword(Keyword::Super) {
            self.parse_super_expression()?
        } else {
            self.parse_primary_expression()?
        };
        self.parse_call_tail(expr)
    }

    fn parse_new_expression(&mut self) -> Result<Expression> {
        self.expect_keyword(Keyword::New)?;
        let callee = if self.is_keyword(Keyword::New) {
            self.parse_new_expression()?
        } else {
            let primary = self.parse_primary_expression()?;
            self.parse_member_tail(primary)?
        };
        let arguments = if self.is_punctuator(Punctuator::OpenParen) { self.parse_arguments()? } else { Vec::new() };
        Ok(Expression::New { callee: Box::new(callee), arguments })
    }

    fn parse_super_expression(&mut self) -> Result<Expression> {
        self.expect_keyword(Keyword::Super)?;
        if self.is_punctuator(Punctuator::OpenParen) {
            let args = self.parse_arguments()?;
            return Ok(Expression::SuperCall(args));
        }
        if self.eat_punctuator(Punctuator::Dot) {
            let name = self.expect_identifier_name()?;
            return Ok(Expression::SuperMember { property: MemberProperty::Static(name) });
        }
        if self.eat_punctuator(Punctuator::OpenBracket) {
            let prop = self.parse_expression()?;
            self.expect_punctuator(Punctuator::CloseBracket)?;
            return Ok(Expression::SuperMember { property: MemberProperty::Computed(Box::new(prop)) });
        }
        Err(self.error("expected `(`, `.` or `[` after `super`"))
    }

    /// `MemberExpression` only — no calls. Used for a `new` expression's
    /// callee, where `new Foo.Bar()` must bind `()` to the whole chain,
    /// not to `Bar` alone.
    fn parse_member_tail(&mut self, mut expr: Expression) -> Result<Expression> {
        loop {
            if self.eat_punctuator(Punctuator::Dot) {
                let name = self.expect_identifier_name()?;
                expr = Expression::Member { object: Box::new(expr), property: MemberProperty::Static(name), optional: false };
            } else if self.eat_punctuator(Punctuator::OpenBracket) {
                let prop = self.parse_expression()?;
                self.expect_punctuator(Punctuator::CloseBracket)?;
                expr = Expression::Member { object: Box::new(expr), property: MemberProperty::Computed(Box::new(prop)), optional: false };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_call_tail(&mut self, mut expr: Expression) -> Result<Expression> {
        loop {
            if self.eat_punctuator(Punctuator::Dot) {
                let name = self.expect_identifier_name()?;
                expr = Expression::Member { object: Box::new(expr), property: MemberProperty::Static(name), optional: false };
            } else if self.eat_punctuator(Punctuator::OptionalChain) {
                if self.is_punctuator(Punctuator::OpenParen) {
                    let args = self.parse_arguments()?;
                    expr = Expression::Call { callee: Box::new(expr), arguments: args, optional: true };
                } else if self.eat_punctuator(Punctuator::OpenBracket) {
                    let prop = self.parse_expression()?;
                    self.expect_punctuator(Punctuator::CloseBracket)?;
                    expr = Expression::Member { object: Box::new(expr), property: MemberProperty::Computed(Box::new(prop)), optional: true };
                } else {
                    let name = self.expect_identifier_name()?;
                    expr = Expression::Member { object: Box::new(expr), property: MemberProperty::Static(name), optional: true };
                }
            } else if self.is_punctuator(Punctuator::OpenBracket) {
                self.advance();
                let prop = self.parse_expression()?;
                self.expect_punctuator(Punctuator::CloseBracket)?;
                expr = Expression::Member { object: Box::new(expr), property: MemberProperty::Computed(Box::new(prop)), optional: false };
            } else if self.is_punctuator(Punctuator::OpenParen) {
                let args = self.parse_arguments()?;
                expr = Expression::Call { callee: Box::new(expr), arguments: args, optional: false };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    pub(super) fn parse_arguments(&mut self) -> Result<Vec<ArrayElement>> {
        self.expect_punctuator(Punctuator::OpenParen)?;
        let mut args = Vec::new();
        while !self.is_punctuator(Punctuator::CloseParen) {
            if self.eat_punctuator(Punctuator::DotDotDot) {
                args.push(ArrayElement::Spread(self.parse_assignment_expression()?));
            } else {
                args.push(ArrayElement::Expression(self.parse_assignment_expression()?));
            }
            if !self.eat_punctuator(Punctuator::Comma) {
                break;
            }
        }
        self.expect_punctuator(Punctuator::CloseParen)?;
        Ok(args)
    }

    // ---- primary expressions ----

    fn parse_primary_expression(&mut self) -> Result<Expression> {
        match self.current_kind().clone() {
            TokenKind::Keyword(Keyword::This) => {
                self.advance();
                Ok(Expression::This)
            }
            TokenKind::Keyword(Keyword::Function) => {
                self.advance();
                Ok(Expression::Function(Box::new(self.parse_function_tail(false)?)))
            }
            TokenKind::Keyword(Keyword::Class) => {
                self.advance();
                Ok(Expression::Class(Box::new(self.parse_class_tail()?)))
            }
            TokenKind::Keyword(Keyword::Import) => self.parse_import_call(),
            TokenKind::Identifier(sym)
                if self.resolve(sym) == "async" && matches!(self.nth_kind(1), TokenKind::Keyword(Keyword::Function)) =>
            {
                self.advance();
                self.advance();
                Ok(Expression::Function(Box::new(self.parse_function_tail(true)?)))
            }
            TokenKind::Identifier(sym) => {
                self.advance();
                Ok(Expression::Identifier(sym))
            }
            TokenKind::BooleanLiteral(b) => {
                self.advance();
                Ok(Expression::Literal(Literal::Boolean(b)))
            }
            TokenKind::NullLiteral => {
                self.advance();
                Ok(Expression::Literal(Literal::Null))
            }
            TokenKind::NumericLiteral(n) => {
                self.advance();
                Ok(Expression::Literal(Literal::Number(n)))
            }
            TokenKind::BigIntLiteral(s) => {
                self.advance();
                Ok(Expression::Literal(Literal::BigInt(s)))
            }
            TokenKind::StringLiteral(s) => {
                self.advance();
                Ok(Expression::Literal(Literal::String(s)))
            }
            TokenKind::TemplateLiteral { cooked, substitutions } => {
                self.advance();
                self.finish_template_literal(cooked, substitutions)
            }
            TokenKind::Punctuator(Punctuator::OpenBracket) => self.parse_array_literal(),
            TokenKind::Punctuator(Punctuator::OpenBlock) => self.parse_object_literal(),
            TokenKind::Punctuator(Punctuator::OpenParen) => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_punctuator(Punctuator::CloseParen)?;
                Ok(expr)
            }
            other => Err(self.error(format!("unexpected token {other:?} in expression"))),
        }
    }

    fn parse_import_call(&mut self) -> Result<Expression> {
        self.expect_keyword(Keyword::Import)?;
        self.expect_punctuator(Punctuator::OpenParen)?;
        let specifier = self.parse_assignment_expression()?;
        self.expect_punctuator(Punctuator::CloseParen)?;
        Ok(Expression::ImportCall(Box::new(specifier)))
    }

    fn parse_array_literal(&mut self) -> Result<Expression> {
        self.expect_punctuator(Punctuator::OpenBracket)?;
        let mut elements = Vec::new();
        while !self.is_punctuator(Punctuator::CloseBracket) {
            if self.eat_punctuator(Punctuator::Comma) {
                elements.push(None);
                continue;
            }
            if self.eat_punctuator(Punctuator::DotDotDot) {
                elements.push(Some(ArrayElement::Spread(self.parse_assignment_expression()?)));
            } else {
                elements.push(Some(ArrayElement::Expression(self.parse_assignment_expression()?)));
            }
            if !self.eat_punctuator(Punctuator::Comma) {
                break;
            }
        }
        self.expect_punctuator(Punctuator::CloseBracket)?;
        Ok(Expression::ArrayLiteral(ArrayLiteral { elements }))
    }

    /// True if the token at `self.pos + offset` (relative to the *key*
    /// about to be parsed, i.e. `offset == 1` means "the token after the
    /// key") cannot start a method's `(` — used to tell apart the
    /// `async`/`get`/`set`/`*` modifiers from a property actually named
    /// `async`/`get`/`set`.
    fn object_modifier_boundary(&self, offset: usize) -> bool {
        matches!(
            self.nth_kind(offset),
            TokenKind::Punctuator(Punctuator::OpenParen | Punctuator::Colon | Punctuator::Comma | Punctuator::CloseBlock | Punctuator::Assign)
        )
    }

    fn parse_object_literal(&mut self) -> Result<Expression> {
        self.expect_punctuator(Punctuator::OpenBlock)?;
        let mut properties = Vec::new();
        while !self.is_punctuator(Punctuator::CloseBlock) {
            if self.eat_punctuator(Punctuator::DotDotDot) {
                properties.push(PropertyDefinition::Spread(self.parse_assignment_expression()?));
            } else {
                let is_async = self.current_text_is("async") && !self.object_modifier_boundary(1);
                if is_async {
                    self.advance();
                }
                let is_generator = self.eat_punctuator(Punctuator::Mul);
                let method_kind = if self.current_text_is("get") && !self.object_modifier_boundary(1) {
                    self.advance();
                    MethodKind::Get
                } else if self.current_text_is("set") && !self.object_modifier_boundary(1) {
                    self.advance();
                    MethodKind::Set
                } else {
                    MethodKind::Normal
                };
                let key = self.parse_property_key()?;
                if self.is_punctuator(Punctuator::OpenParen) {
                    let parameters = self.parse_formal_parameters()?;
                    let body = self.parse_function_body()?;
                    let kind = match (is_async, is_generator) {
                        (false, false) => FunctionKind::Normal,
                        (false, true) => FunctionKind::Generator,
                        (true, false) => FunctionKind::Async,
                        (true, true) => FunctionKind::AsyncGenerator,
                    };
                    properties.push(PropertyDefinition::Method(key, Function { name: None, parameters, body, kind }, method_kind));
                } else if self.eat_punctuator(Punctuator::Colon) {
                    let value = self.parse_assignment_expression()?;
                    properties.push(PropertyDefinition::KeyValue(key, value));
                } else {
                    let vesper_ast::property::PropertyKeyNode::Identifier(sym) = key else {
                        return Err(self.error("object literal shorthand property must be an identifier"));
                    };
                    properties.push(PropertyDefinition::IdentifierShorthand(sym));
                }
            }
            if !self.eat_punctuator(Punctuator::Comma) {
                break;
            }
        }
        self.expect_punctuator(Punctuator::CloseBlock)?;
        Ok(Expression::ObjectLiteral(ObjectLiteral { properties }))
    }

    /// Re-lexes and re-parses the raw source slice of a `${ }`
    /// substitution the lexer deferred (see `Lexer::read_template`),
    /// sharing this parser's interner so identifiers inside it resolve
    /// to the same `Sym`s as the rest of the program.
    fn finish_template_literal(&mut self, cooked: Vec<JsString>, substitutions: Vec<String>) -> Result<Expression> {
        let mut expressions = Vec::with_capacity(substitutions.len());
        for source in &substitutions {
            let tokens = crate::lexer::Lexer::new(source, &mut *self.interner).tokenize()?;
            let mut sub_parser = Parser { tokens, pos: 0, interner: &mut *self.interner };
            expressions.push(sub_parser.parse_expression()?);
        }
        Ok(Expression::TemplateLiteral(TemplateLiteral { cooked, expressions }))
    }
}
