use crate::declaration::Declaration;
use crate::statement::Statement;

#[derive(Debug, Clone, Default)]
pub struct StatementList {
    pub items: Vec<StatementListItem>,
    /// Set by the parser when a `"use strict"` directive prologue was
    /// seen; threads into the evaluator's this-binding and assignment
    /// rules.
    pub strict: bool,
}

#[derive(Debug, Clone)]
pub enum StatementListItem {
    Statement(Statement),
    Declaration(Declaration),
}

impl StatementList {
    pub fn new(items: Vec<StatementListItem>, strict: bool) -> Self {
        Self { items, strict }
    }
}

/// A parsed module: the same statement-list grammar plus import/export
/// declarations at the top level.
#[derive(Debug, Clone, Default)]
pub struct ModuleItemList {
    pub items: Vec<ModuleItem>,
}

#[derive(Debug, Clone)]
pub enum ModuleItem {
    StatementListItem(StatementListItem),
    Import(crate::declaration::ImportDeclaration),
    Export(crate::declaration::ExportDeclaration),
}
