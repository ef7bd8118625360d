//! Module-level grammar: `import`/`export` declarations layered over the
//! same statement-list grammar `statement.rs` provides.

use super::Parser;
use crate::error::Result;
use crate::lexer::{Keyword, Punctuator, TokenKind};
use vesper_ast::declaration::{Declaration, ExportDeclaration, ImportDeclaration, ImportSpecifier};
use vesper_ast::statement_list::{ModuleItem, ModuleItemList};
use vesper_string::JsString;

pub(super) fn parse_module_items(p: &mut Parser) -> Result<ModuleItemList> {
    let mut items = Vec::new();
    while !p.at_eof() {
        if p.is_keyword(Keyword::Import) && !matches!(p.nth_kind(1), TokenKind::Punctuator(Punctuator::OpenParen)) {
            items.push(ModuleItem::Import(parse_import(p)?));
        } else if p.is_keyword(Keyword::Export) {
            items.push(ModuleItem::Export(parse_export(p)?));
        } else {
            items.push(ModuleItem::StatementListItem(super::statement::parse_statement_list_item(p)?));
        }
    }
    Ok(ModuleItemList { items })
}

/// `from` and `as` are contextual keywords this lexer has no special
/// token for — they arrive as plain identifiers and are recognised here
/// by resolved text, the same way `function.rs` recognises `async`.
fn eat_contextual(p: &mut Parser, text: &str) -> bool {
    if p.current_text_is(text) {
        p.advance();
        true
    } else {
        false
    }
}

fn expect_contextual(p: &mut Parser, text: &str) -> Result<()> {
    if eat_contextual(p, text) {
        Ok(())
    } else {
        Err(p.error(format!("expected `{text}`, found {:?}", p.current_kind())))
    }
}

fn expect_module_specifier(p: &mut Parser) -> Result<JsString> {
    match p.current_kind().clone() {
        TokenKind::StringLiteral(s) => {
            p.advance();
            Ok(s)
        }
        other => Err(p.error(format!("expected module specifier string, found {other:?}"))),
    }
}

fn parse_import(p: &mut Parser) -> Result<ImportDeclaration> {
    p.expect_keyword(Keyword::Import)?;

    if let TokenKind::StringLiteral(s) = p.current_kind().clone() {
        p.advance();
        p.consume_semicolon()?;
        return Ok(ImportDeclaration { specifiers: Vec::new(), module_specifier: s });
    }

    let mut specifiers = Vec::new();

    if let TokenKind::Identifier(_) = p.current_kind() {
        let local = p.expect_identifier_name()?;
        specifiers.push(ImportSpecifier::Default(local));
        if p.eat_punctuator(Punctuator::Comma) {
            parse_named_or_namespace_imports(p, &mut specifiers)?;
        }
    } else {
        parse_named_or_namespace_imports(p, &mut specifiers)?;
    }

    expect_contextual(p, "from")?;
    let module_specifier = expect_module_specifier(p)?;
    p.consume_semicolon()?;
    Ok(ImportDeclaration { specifiers, module_specifier })
}

fn parse_named_or_namespace_imports(p: &mut Parser, specifiers: &mut Vec<ImportSpecifier>) -> Result<()> {
    if p.eat_punctuator(Punctuator::Mul) {
        expect_contextual(p, "as")?;
        let local = p.expect_identifier_name()?;
        specifiers.push(ImportSpecifier::Namespace(local));
        return Ok(());
    }
    p.expect_punctuator(Punctuator::OpenBlock)?;
    while !p.is_punctuator(Punctuator::CloseBlock) {
        let imported = p.expect_identifier_name()?;
        let local = if eat_contextual(p, "as") {
            p.expect_identifier_name()?
        } else {
            imported
        };
        specifiers.push(ImportSpecifier::Named { imported, local });
        if !p.eat_punctuator(Punctuator::Comma) {
            break;
        }
    }
    p.expect_punctuator(Punctuator::CloseBlock)?;
    Ok(())
}

fn parse_export(p: &mut Parser) -> Result<ExportDeclaration> {
    p.expect_keyword(Keyword::Export)?;

    if p.eat_keyword(Keyword::Default) {
        let expr = if p.is_keyword(Keyword::Function) {
            p.advance();
            vesper_ast::expression::Expression::Function(Box::new(p.parse_function_tail(false)?))
        } else if p.current_text_is("async") && matches!(p.nth_kind(1), TokenKind::Keyword(Keyword::Function)) {
            p.advance();
            p.advance();
            vesper_ast::expression::Expression::Function(Box::new(p.parse_function_tail(true)?))
        } else if p.is_keyword(Keyword::Class) {
            p.advance();
            vesper_ast::expression::Expression::Class(Box::new(p.parse_class_tail()?))
        } else {
            let expr = p.parse_assignment_expression()?;
            p.consume_semicolon()?;
            expr
        };
        return Ok(ExportDeclaration::Default(expr));
    }

    if p.eat_punctuator(Punctuator::Mul) {
        let exported_as = if eat_contextual(p, "as") { Some(p.expect_identifier_name()?) } else { None };
        expect_contextual(p, "from")?;
        let module_specifier = expect_module_specifier(p)?;
        p.consume_semicolon()?;
        return Ok(ExportDeclaration::AllFrom { exported_as, module_specifier });
    }

    if p.is_punctuator(Punctuator::OpenBlock) {
        p.advance();
        let mut names = Vec::new();
        while !p.is_punctuator(Punctuator::CloseBlock) {
            let local = p.expect_identifier_name()?;
            let exported = if eat_contextual(p, "as") { Some(p.expect_identifier_name()?) } else { None };
            names.push((local, exported));
            if !p.eat_punctuator(Punctuator::Comma) {
                break;
            }
        }
        p.expect_punctuator(Punctuator::CloseBlock)?;
        if eat_contextual(p, "from") {
            let module_specifier = expect_module_specifier(p)?;
            p.consume_semicolon()?;
            let specifiers = names.into_iter().map(|(local, exported)| (local, exported.unwrap_or(local))).collect();
            return Ok(ExportDeclaration::NamedFrom { specifiers, module_specifier });
        }
        p.consume_semicolon()?;
        return Ok(ExportDeclaration::Named(names));
    }

    let decl = match p.current_kind().clone() {
        TokenKind::Keyword(Keyword::Function) => {
            p.advance();
            Declaration::Function(p.parse_function_tail(false)?)
        }
        TokenKind::Identifier(_) if p.current_text_is("async") && matches!(p.nth_kind(1), TokenKind::Keyword(Keyword::Function)) => {
            p.advance();
            p.advance();
            Declaration::Function(p.parse_function_tail(true)?)
        }
        TokenKind::Keyword(Keyword::Class) => {
            p.advance();
            Declaration::Class(p.parse_class_tail()?)
        }
        _ => {
            let decl = super::statement::parse_variable_declaration(p)?;
            p.consume_semicolon()?;
            Declaration::Variable(decl)
        }
    };
    Ok(ExportDeclaration::Local(decl))
}
