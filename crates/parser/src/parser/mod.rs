//! Recursive-descent parser over the token stream the lexer produces.
//!
//! Organised the way a Pratt/recursive-descent ECMAScript parser
//! usually is: this module holds the token-stream cursor and the
//! shared helpers (`expect`/`eat`/ASI), while `expression`, `statement`,
//! `function` and `module` each own one grammar layer and call back
//! into each other through `&mut Parser`.

mod expression;
mod function;
mod module;
mod pattern;
mod statement;

use crate::error::{Error, Result};
use crate::lexer::{Keyword, Lexer, Punctuator, Token, TokenKind};
use vesper_ast::position::Position;
use vesper_ast::statement_list::{ModuleItemList, StatementList};
use vesper_interner::Interner;

pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    interner: &'a mut Interner,
}

pub fn parse_script(source: &str, interner: &mut Interner) -> Result<StatementList> {
    let tokens = Lexer::new(source, interner).tokenize()?;
    let mut parser = Parser { tokens, pos: 0, interner };
    parser.parse_statement_list_to_eof()
}

pub fn parse_module(source: &str, interner: &mut Interner) -> Result<ModuleItemList> {
    let tokens = Lexer::new(source, interner).tokenize()?;
    let mut parser = Parser { tokens, pos: 0, interner };
    parser.parse_module_items_to_eof()
}

impl<'a> Parser<'a> {
    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn position(&self) -> Position {
        self.current().position
    }

    fn line_terminator_before(&self) -> bool {
        self.current().line_terminator_before
    }

    fn at_eof(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Consumes and returns the current token.
    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::new(message, self.position())
    }

    fn is_punctuator(&self, p: Punctuator) -> bool {
        matches!(self.current_kind(), TokenKind::Punctuator(x) if *x == p)
    }

    fn is_keyword(&self, kw: Keyword) -> bool {
        matches!(self.current_kind(), TokenKind::Keyword(x) if *x == kw)
    }

    /// The kind of the token `n` positions ahead of the current one
    /// (`n == 0` is the current token), clamped to the final `Eof`
    /// token rather than panicking past the end of the stream.
    fn nth_kind(&self, n: usize) -> &TokenKind {
        &self.tokens[(self.pos + n).min(self.tokens.len() - 1)].kind
    }

    /// Whether the current token is the plain identifier `text` —
    /// `async`/`get`/`set` are contextual keywords this lexer tokenizes
    /// as ordinary identifiers, so callers that need to recognise them
    /// resolve the interned text back to a string here.
    fn current_text_is(&self, text: &str) -> bool {
        matches!(self.current_kind(), TokenKind::Identifier(sym) if self.interner.resolve(*sym) == text)
    }

    fn resolve(&self, sym: vesper_interner::Sym) -> &str {
        self.interner.resolve(sym)
    }

    fn eat_punctuator(&mut self, p: Punctuator) -> bool {
        if self.is_punctuator(p) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, kw: Keyword) -> bool {
        if self.is_keyword(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_punctuator(&mut self, p: Punctuator) -> Result<()> {
        if self.eat_punctuator(p) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{p:?}`, found {:?}", self.current_kind())))
        }
    }

    fn expect_keyword(&mut self, kw: Keyword) -> Result<()> {
        if self.eat_keyword(kw) {
            Ok(())
        } else {
            Err(self.error(format!("expected keyword `{kw:?}`, found {:?}", self.current_kind())))
        }
    }

    /// An identifier in binding/reference position. Most keywords this
    /// lexer treats as reserved can't appear here; `of`/`static`/`await`
    /// are accepted loosely since this parser does not track strict
    /// mode/generator/async context precisely enough to reject them only
    /// in the narrower contexts a conformance parser would.
    fn expect_identifier_name(&mut self) -> Result<vesper_interner::Sym> {
        match self.current_kind().clone() {
            TokenKind::Identifier(sym) => {
                self.advance();
                Ok(sym)
            }
            TokenKind::Keyword(Keyword::Of) => {
                self.advance();
                Ok(self.interner.get_or_intern("of"))
            }
            TokenKind::Keyword(Keyword::Static) => {
                self.advance();
                Ok(self.interner.get_or_intern("static"))
            }
            TokenKind::Keyword(Keyword::Await) => {
                self.advance();
                Ok(self.interner.get_or_intern("await"))
            }
            TokenKind::Keyword(Keyword::Yield) => {
                self.advance();
                Ok(self.interner.get_or_intern("yield"))
            }
            other => Err(self.error(format!("expected identifier, found {other:?}"))),
        }
    }

    /// ASI:
    /// accepts an explicit `;`, or silently succeeds at `}`/EOF or
    /// before a line terminator, which covers the common cases without
    /// implementing the full set of restricted-production exceptions.
    fn consume_semicolon(&mut self) -> Result<()> {
        if self.eat_punctuator(Punctuator::Semicolon) {
            return Ok(());
        }
        if self.is_punctuator(Punctuator::CloseBlock) || self.at_eof() || self.line_terminator_before() {
            return Ok(());
        }
        Err(self.error(format!("expected `;`, found {:?}", self.current_kind())))
    }

    fn parse_statement_list_to_eof(&mut self) -> Result<StatementList> {
        let list = statement::parse_statement_list(self, |p| p.at_eof())?;
        Ok(list)
    }

    fn parse_module_items_to_eof(&mut self) -> Result<ModuleItemList> {
        module::parse_module_items(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesper_ast::declaration::{Declaration, ExportDeclaration, ImportSpecifier};
    use vesper_ast::declaration::variable::VariableKind;
    use vesper_ast::expression::operator::BinaryOp;
    use vesper_ast::expression::literal::Literal;
    use vesper_ast::expression::Expression;
    use vesper_ast::function::FunctionKind;
    use vesper_ast::statement::Statement;
    use vesper_ast::statement_list::{ModuleItem, StatementListItem};

    fn parse(source: &str) -> StatementList {
        let mut interner = Interner::new();
        parse_script(source, &mut interner).expect("parse should succeed")
    }

    #[test]
    fn parses_binary_expression_statement() {
        let list = parse("1 + 2;");
        let StatementListItem::Statement(Statement::Expression(Expression::Binary(op, left, right))) = &list.items[0] else {
            panic!("expected a binary expression statement, got {:?}", list.items[0]);
        };
        assert_eq!(*op, BinaryOp::Add);
        assert!(matches!(**left, Expression::Literal(Literal::Number(n)) if n == 1.0));
        assert!(matches!(**right, Expression::Literal(Literal::Number(n)) if n == 2.0));
    }

    #[test]
    fn parses_let_declaration_with_initializer() {
        let list = parse("let x = 42;");
        let StatementListItem::Declaration(Declaration::Variable(decl)) = &list.items[0] else {
            panic!("expected a variable declaration, got {:?}", list.items[0]);
        };
        assert_eq!(decl.kind, VariableKind::Let);
        assert_eq!(decl.declarators.len(), 1);
        assert!(decl.declarators[0].initializer.is_some());
    }

    #[test]
    fn parses_for_of_loop() {
        let list = parse("for (const x of items) { x; }");
        assert!(matches!(list.items[0], StatementListItem::Statement(Statement::ForOf(_))));
    }

    #[test]
    fn parses_for_in_loop() {
        let list = parse("for (let k in obj) { k; }");
        assert!(matches!(list.items[0], StatementListItem::Statement(Statement::ForIn(_))));
    }

    #[test]
    fn parses_c_style_for_loop() {
        let list = parse("for (let i = 0; i < 10; i++) {}");
        assert!(matches!(list.items[0], StatementListItem::Statement(Statement::For(_))));
    }

    #[test]
    fn parses_arrow_function_with_parenthesized_params() {
        let list = parse("const add = (a, b) => a + b;");
        let StatementListItem::Declaration(Declaration::Variable(decl)) = &list.items[0] else {
            panic!("expected a variable declaration");
        };
        let initializer = decl.declarators[0].initializer.as_ref().expect("has initializer");
        let Expression::Function(func) = initializer else {
            panic!("expected an arrow function expression, got {initializer:?}");
        };
        assert_eq!(func.kind, FunctionKind::Arrow);
        assert_eq!(func.parameters.len(), 2);
    }

    #[test]
    fn parses_bare_identifier_arrow_function() {
        let list = parse("const id = x => x;");
        let StatementListItem::Declaration(Declaration::Variable(decl)) = &list.items[0] else {
            panic!("expected a variable declaration");
        };
        let Expression::Function(func) = decl.declarators[0].initializer.as_ref().unwrap() else {
            panic!("expected an arrow function expression");
        };
        assert_eq!(func.parameters.len(), 1);
    }

    #[test]
    fn parses_try_catch_finally() {
        let list = parse("try { a(); } catch (e) { b(); } finally { c(); }");
        let StatementListItem::Statement(Statement::Try(try_stmt)) = &list.items[0] else {
            panic!("expected a try statement");
        };
        assert!(try_stmt.catch.is_some());
        assert!(try_stmt.finally.is_some());
    }

    #[test]
    fn rejects_try_without_catch_or_finally() {
        let mut interner = Interner::new();
        assert!(parse_script("try { a(); }", &mut interner).is_err());
    }

    #[test]
    fn parses_labelled_statement() {
        let list = parse("outer: while (true) { break outer; }");
        assert!(matches!(list.items[0], StatementListItem::Statement(Statement::Labelled(_, _))));
    }

    #[test]
    fn parses_super_call_and_member() {
        let list = parse("class A extends B { constructor() { super(); super.x; } }");
        assert!(matches!(list.items[0], StatementListItem::Declaration(Declaration::Class(_))));
    }

    #[test]
    fn parses_template_literal_with_substitution() {
        let list = parse("`a${1 + 1}b`;");
        let StatementListItem::Statement(Statement::Expression(Expression::TemplateLiteral(tpl))) = &list.items[0] else {
            panic!("expected a template literal expression");
        };
        assert_eq!(tpl.cooked.len(), 2);
        assert_eq!(tpl.expressions.len(), 1);
    }

    #[test]
    fn parses_optional_chaining_and_member_access() {
        let list = parse("a?.b.c;");
        assert!(matches!(list.items[0], StatementListItem::Statement(Statement::Expression(Expression::Member { .. }))));
    }

    #[test]
    fn parses_object_literal_with_shorthand_method_and_computed_key() {
        let list = parse("({ a, b() {}, [c]: 1 });");
        assert!(matches!(list.items[0], StatementListItem::Statement(Statement::Expression(Expression::ObjectLiteral(_)))));
    }

    #[test]
    fn parses_import_and_export_declarations() {
        let mut interner = Interner::new();
        let module = parse_module(
            "import foo, { bar as baz } from \"mod\";\nexport default foo;\nexport { baz };",
            &mut interner,
        )
        .expect("module should parse");
        assert_eq!(module.items.len(), 3);
        let ModuleItem::Import(import) = &module.items[0] else {
            panic!("expected an import declaration");
        };
        assert!(matches!(import.specifiers[0], ImportSpecifier::Default(_)));
        assert!(matches!(import.specifiers[1], ImportSpecifier::Named { .. }));
        assert!(matches!(module.items[1], ModuleItem::Export(ExportDeclaration::Default(_))));
        assert!(matches!(module.items[2], ModuleItem::Export(ExportDeclaration::Named(_))));
    }

    #[test]
    fn parses_dynamic_import_call_distinct_from_static_import() {
        let list = parse("import(\"mod\");");
        assert!(matches!(list.items[0], StatementListItem::Statement(Statement::Expression(Expression::ImportCall(_)))));
    }

    #[test]
    fn asi_inserts_semicolon_before_line_terminator() {
        let list = parse("let x = 1\nlet y = 2\n");
        assert_eq!(list.items.len(), 2);
    }
}
