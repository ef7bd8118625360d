//! Statement and declaration grammar, plus the iteration/labelled-set
//! bookkeeping the evaluator's `break`/`continue` dispatch needs none of
//! — that lives entirely in `vesper_engine`; this module only builds AST.

use super::Parser;
use crate::error::Result;
use crate::lexer::{Keyword, Punctuator, TokenKind};
use vesper_ast::declaration::variable::{VariableDeclaration, VariableDeclarator, VariableKind};
use vesper_ast::declaration::Declaration;
use vesper_ast::statement::iteration::{ForBinding, ForInLoop, ForInit, ForLoop, ForOfLoop, WhileLoop, DoWhileLoop};
use vesper_ast::statement::{Catch, Statement, SwitchCase, SwitchStatement, TryStatement};
use vesper_ast::statement_list::{StatementList, StatementListItem};

/// Parses statement-list items until `stop` returns true (either EOF for
/// a whole script, or `}` for a block/function body).
pub(super) fn parse_statement_list(p: &mut Parser, stop: impl Fn(&Parser) -> bool) -> Result<StatementList> {
    let mut items = Vec::new();
    while !stop(p) {
        items.push(parse_statement_list_item(p)?);
    }
    Ok(StatementList::new(items, false))
}

pub(super) fn parse_statement_list_item(p: &mut Parser) -> Result<StatementListItem> {
    if is_declaration_start(p) {
        Ok(StatementListItem::Declaration(parse_declaration(p)?))
    } else {
        Ok(StatementListItem::Statement(parse_statement(p)?))
    }
}

fn is_declaration_start(p: &Parser) -> bool {
    if p.is_keyword(Keyword::Function) || p.is_keyword(Keyword::Class) || p.is_keyword(Keyword::Const) || p.is_keyword(Keyword::Var) {
        return true;
    }
    if p.is_keyword(Keyword::Let) {
        // `let` used as an ordinary identifier (e.g. `let.x` isn't legal
        // anyway, but `let(x)` as a call should not be swallowed as a
        // declaration) — only treat it as a declaration when followed by
        // something that can start a binding.
        return matches!(
            p.nth_kind(1),
            TokenKind::Identifier(_) | TokenKind::Punctuator(Punctuator::OpenBracket) | TokenKind::Punctuator(Punctuator::OpenBlock)
        );
    }
    if p.current_text_is("async") && matches!(p.nth_kind(1), TokenKind::Keyword(Keyword::Function)) {
        return true;
    }
    false
}

fn parse_declaration(p: &mut Parser) -> Result<Declaration> {
    if p.is_keyword(Keyword::Function) {
        p.advance();
        return Ok(Declaration::Function(p.parse_function_tail(false)?));
    }
    if p.current_text_is("async") {
        p.advance();
        p.expect_keyword(Keyword::Function)?;
        return Ok(Declaration::Function(p.parse_function_tail(true)?));
    }
    if p.is_keyword(Keyword::Class) {
        p.advance();
        return Ok(Declaration::Class(p.parse_class_tail()?));
    }
    let decl = parse_variable_declaration(p)?;
    p.consume_semicolon()?;
    Ok(Declaration::Variable(decl))
}

pub(super) fn parse_variable_declaration(p: &mut Parser) -> Result<VariableDeclaration> {
    let kind = if p.eat_keyword(Keyword::Var) {
        VariableKind::Var
    } else if p.eat_keyword(Keyword::Let) {
        VariableKind::Let
    } else {
        p.expect_keyword(Keyword::Const)?;
        VariableKind::Const
    };
    let mut declarators = Vec::new();
    loop {
        let binding = p.parse_binding()?;
        let initializer = if p.eat_punctuator(Punctuator::Assign) {
            Some(p.parse_assignment_expression()?)
        } else {
            None
        };
        declarators.push(VariableDeclarator { binding, initializer });
        if !p.eat_punctuator(Punctuator::Comma) {
            break;
        }
    }
    Ok(VariableDeclaration { kind, declarators })
}

/// Whether `label` (already consumed as the current statement's own
/// label, if any) matches one of the labels attached by enclosing
/// `Labelled` wrappers — used by the evaluator, not the parser; kept
/// here only as a note that `Statement::Labelled` nodes nest rather than
/// carry a label set, so label-matching is the evaluator's job.
#[allow(dead_code)]
fn label_matches() {}

fn parse_statement(p: &mut Parser) -> Result<Statement> {
    match p.current_kind().clone() {
        TokenKind::Punctuator(Punctuator::OpenBlock) => parse_block(p),
        TokenKind::Punctuator(Punctuator::Semicolon) => {
            p.advance();
            Ok(Statement::Empty)
        }
        TokenKind::Keyword(Keyword::If) => parse_if(p),
        TokenKind::Keyword(Keyword::For) => parse_for(p),
        TokenKind::Keyword(Keyword::While) => parse_while(p),
        TokenKind::Keyword(Keyword::Do) => parse_do_while(p),
        TokenKind::Keyword(Keyword::Break) => {
            p.advance();
            let label = parse_optional_label(p)?;
            p.consume_semicolon()?;
            Ok(Statement::Break(label))
        }
        TokenKind::Keyword(Keyword::Continue) => {
            p.advance();
            let label = parse_optional_label(p)?;
            p.consume_semicolon()?;
            Ok(Statement::Continue(label))
        }
        TokenKind::Keyword(Keyword::Return) => {
            p.advance();
            if p.is_punctuator(Punctuator::Semicolon) || p.is_punctuator(Punctuator::CloseBlock) || p.at_eof() || p.line_terminator_before() {
                p.consume_semicolon()?;
                return Ok(Statement::Return(None));
            }
            let value = p.parse_expression()?;
            p.consume_semicolon()?;
            Ok(Statement::Return(Some(value)))
        }
        TokenKind::Keyword(Keyword::With) => parse_with(p),
        TokenKind::Keyword(Keyword::Switch) => parse_switch(p),
        TokenKind::Keyword(Keyword::Throw) => {
            p.advance();
            let value = p.parse_expression()?;
            p.consume_semicolon()?;
            Ok(Statement::Throw(value))
        }
        TokenKind::Keyword(Keyword::Try) => parse_try(p),
        TokenKind::Keyword(Keyword::Debugger) => {
            p.advance();
            p.consume_semicolon()?;
            Ok(Statement::Empty)
        }
        TokenKind::Identifier(sym)
            if matches!(p.nth_kind(1), TokenKind::Punctuator(Punctuator::Colon)) && !p.current_text_is("async") =>
        {
            p.advance();
            p.advance();
            let body = parse_statement(p)?;
            Ok(Statement::Labelled(sym, Box::new(body)))
        }
        _ => {
            let expr = p.parse_expression()?;
            p.consume_semicolon()?;
            Ok(Statement::Expression(expr))
        }
    }
}

fn parse_optional_label(p: &mut Parser) -> Result<Option<vesper_interner::Sym>> {
    if p.line_terminator_before() {
        return Ok(None);
    }
    if let TokenKind::Identifier(sym) = p.current_kind().clone() {
        p.advance();
        return Ok(Some(sym));
    }
    Ok(None)
}

fn parse_block(p: &mut Parser) -> Result<Statement> {
    p.expect_punctuator(Punctuator::OpenBlock)?;
    let list = parse_statement_list(p, |p| p.is_punctuator(Punctuator::CloseBlock))?;
    p.expect_punctuator(Punctuator::CloseBlock)?;
    Ok(Statement::Block(list))
}

fn parse_if(p: &mut Parser) -> Result<Statement> {
    p.expect_keyword(Keyword::If)?;
    p.expect_punctuator(Punctuator::OpenParen)?;
    let test = p.parse_expression()?;
    p.expect_punctuator(Punctuator::CloseParen)?;
    let consequent = Box::new(parse_statement(p)?);
    let alternate = if p.eat_keyword(Keyword::Else) {
        Some(Box::new(parse_statement(p)?))
    } else {
        None
    };
    Ok(Statement::If { test, consequent, alternate })
}

fn parse_with(p: &mut Parser) -> Result<Statement> {
    p.expect_keyword(Keyword::With)?;
    p.expect_punctuator(Punctuator::OpenParen)?;
    let object = p.parse_expression()?;
    p.expect_punctuator(Punctuator::CloseParen)?;
    let body = Box::new(parse_statement(p)?);
    Ok(Statement::With { object, body })
}

fn parse_while(p: &mut Parser) -> Result<Statement> {
    p.expect_keyword(Keyword::While)?;
    p.expect_punctuator(Punctuator::OpenParen)?;
    let test = p.parse_expression()?;
    p.expect_punctuator(Punctuator::CloseParen)?;
    let body = Box::new(parse_statement(p)?);
    Ok(Statement::While(WhileLoop { test, body }))
}

fn parse_do_while(p: &mut Parser) -> Result<Statement> {
    p.expect_keyword(Keyword::Do)?;
    let body = Box::new(parse_statement(p)?);
    p.expect_keyword(Keyword::While)?;
    p.expect_punctuator(Punctuator::OpenParen)?;
    let test = p.parse_expression()?;
    p.expect_punctuator(Punctuator::CloseParen)?;
    p.consume_semicolon()?;
    Ok(Statement::DoWhile(DoWhileLoop { body, test }))
}

fn parse_switch(p: &mut Parser) -> Result<Statement> {
    p.expect_keyword(Keyword::Switch)?;
    p.expect_punctuator(Punctuator::OpenParen)?;
    let discriminant = p.parse_expression()?;
    p.expect_punctuator(Punctuator::CloseParen)?;
    p.expect_punctuator(Punctuator::OpenBlock)?;
    let mut cases = Vec::new();
    while !p.is_punctuator(Punctuator::CloseBlock) {
        let test = if p.eat_keyword(Keyword::Case) {
            let expr = p.parse_expression()?;
            Some(expr)
        } else {
            p.expect_keyword(Keyword::Default)?;
            None
        };
        p.expect_punctuator(Punctuator::Colon)?;
        let body = parse_statement_list(p, |p| {
            p.is_punctuator(Punctuator::CloseBlock) || p.is_keyword(Keyword::Case) || p.is_keyword(Keyword::Default)
        })?;
        cases.push(SwitchCase { test, body });
    }
    p.expect_punctuator(Punctuator::CloseBlock)?;
    Ok(Statement::Switch(SwitchStatement { discriminant, cases }))
}

fn parse_try(p: &mut Parser) -> Result<Statement> {
    p.expect_keyword(Keyword::Try)?;
    let Statement::Block(block) = parse_block(p)? else {
        unreachable!("parse_block always returns Statement::Block")
    };
    let catch = if p.eat_keyword(Keyword::Catch) {
        let parameter = if p.eat_punctuator(Punctuator::OpenParen) {
            let binding = p.parse_binding()?;
            p.expect_punctuator(Punctuator::CloseParen)?;
            Some(binding)
        } else {
            None
        };
        let Statement::Block(catch_block) = parse_block(p)? else {
            unreachable!("parse_block always returns Statement::Block")
        };
        Some(Catch { parameter, block: catch_block })
    } else {
        None
    };
    let finally = if p.eat_keyword(Keyword::Finally) {
        let Statement::Block(finally_block) = parse_block(p)? else {
            unreachable!("parse_block always returns Statement::Block")
        };
        Some(finally_block)
    } else {
        None
    };
    if catch.is_none() && finally.is_none() {
        return Err(p.error("missing catch or finally after try block"));
    }
    Ok(Statement::Try(TryStatement { block, catch, finally }))
}

// ---- for / for-in / for-of ----

fn parse_for(p: &mut Parser) -> Result<Statement> {
    p.expect_keyword(Keyword::For)?;
    p.expect_punctuator(Punctuator::OpenParen)?;

    if p.is_keyword(Keyword::Var) || p.is_keyword(Keyword::Let) || p.is_keyword(Keyword::Const) {
        let kind = if p.eat_keyword(Keyword::Var) {
            VariableKind::Var
        } else if p.eat_keyword(Keyword::Let) {
            VariableKind::Let
        } else {
            p.expect_keyword(Keyword::Const)?;
            VariableKind::Const
        };
        let binding = p.parse_binding()?;

        if p.eat_keyword(Keyword::In) {
            let object = p.parse_expression()?;
            p.expect_punctuator(Punctuator::CloseParen)?;
            let body = Box::new(parse_statement(p)?);
            let for_binding = match kind {
                VariableKind::Var => ForBinding::Var(binding),
                VariableKind::Let => ForBinding::Let(binding),
                VariableKind::Const => ForBinding::Const(binding),
            };
            return Ok(Statement::ForIn(ForInLoop { binding: for_binding, object, body }));
        }
        if p.eat_keyword(Keyword::Of) {
            let iterable = p.parse_assignment_expression()?;
            p.expect_punctuator(Punctuator::CloseParen)?;
            let body = Box::new(parse_statement(p)?);
            let for_binding = match kind {
                VariableKind::Var => ForBinding::Var(binding),
                VariableKind::Let => ForBinding::Let(binding),
                VariableKind::Const => ForBinding::Const(binding),
            };
            return Ok(Statement::ForOf(ForOfLoop { binding: for_binding, iterable, body, is_await: false }));
        }

        let initializer = if p.eat_punctuator(Punctuator::Assign) {
            Some(p.parse_assignment_expression()?)
        } else {
            None
        };
        let mut declarators = vec![VariableDeclarator { binding, initializer }];
        while p.eat_punctuator(Punctuator::Comma) {
            let binding = p.parse_binding()?;
            let initializer = if p.eat_punctuator(Punctuator::Assign) {
                Some(p.parse_assignment_expression()?)
            } else {
                None
            };
            declarators.push(VariableDeclarator { binding, initializer });
        }
        p.expect_punctuator(Punctuator::Semicolon)?;
        return finish_c_style_for(p, Some(Box::new(ForInit::Variable(VariableDeclaration { kind, declarators }))));
    }

    if p.is_punctuator(Punctuator::Semicolon) {
        p.advance();
        return finish_c_style_for(p, None);
    }

    let expr = p.parse_expression()?;
    if p.eat_keyword(Keyword::In) {
        let object = p.parse_expression()?;
        p.expect_punctuator(Punctuator::CloseParen)?;
        let body = Box::new(parse_statement(p)?);
        return Ok(Statement::ForIn(ForInLoop { binding: ForBinding::Pattern(expr), object, body }));
    }
    if p.eat_keyword(Keyword::Of) {
        let iterable = p.parse_assignment_expression()?;
        p.expect_punctuator(Punctuator::CloseParen)?;
        let body = Box::new(parse_statement(p)?);
        return Ok(Statement::ForOf(ForOfLoop { binding: ForBinding::Pattern(expr), iterable, body, is_await: false }));
    }
    p.expect_punctuator(Punctuator::Semicolon)?;
    finish_c_style_for(p, Some(Box::new(ForInit::Expression(expr))))
}

fn finish_c_style_for(p: &mut Parser, init: Option<Box<ForInit>>) -> Result<Statement> {
    let test = if p.is_punctuator(Punctuator::Semicolon) { None } else { Some(p.parse_expression()?) };
    p.expect_punctuator(Punctuator::Semicolon)?;
    let update = if p.is_punctuator(Punctuator::CloseParen) { None } else { Some(p.parse_expression()?) };
    p.expect_punctuator(Punctuator::CloseParen)?;
    let body = Box::new(parse_statement(p)?);
    Ok(Statement::For(ForLoop { init, test, update, body }))
}
