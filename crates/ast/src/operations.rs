//! Static-semantics helpers the evaluator's declaration-instantiation
//! step needs: which names a scope hoists as `var`s, which
//! are lexically declared (and therefore start in the TDZ), and which
//! top-level function declarations get hoisted and pre-initialised.

use crate::declaration::{Declaration, VariableKind};
use crate::function::Function;
use crate::statement::{Statement, SwitchCase, TryStatement};
use crate::statement_list::{StatementList, StatementListItem};
use vesper_interner::Sym;

/// `VarDeclaredNames`: every `var`-bound name in `list`, including ones
/// nested inside blocks, loops, `if`, `try`, `switch` and `with` bodies —
/// but not inside a nested function body, which hoists into its own
/// scope instead.
pub fn var_declared_names(list: &StatementList) -> Vec<Sym> {
    let mut out = Vec::new();
    for item in &list.items {
        match item {
            StatementListItem::Declaration(Declaration::Variable(decl))
                if decl.kind == VariableKind::Var =>
            {
                for d in &decl.declarators {
                    d.binding.bound_names(&mut out);
                }
            }
            StatementListItem::Declaration(_) => {}
            StatementListItem::Statement(stmt) => collect_var_names_stmt(stmt, &mut out),
        }
    }
    out
}

fn collect_var_names_stmt(stmt: &Statement, out: &mut Vec<Sym>) {
    match stmt {
        Statement::Block(list) => out.extend(var_declared_names(list)),
        Statement::If {
            consequent,
            alternate,
            ..
        } => {
            collect_var_names_stmt(consequent, out);
            if let Some(alt) = alternate {
                collect_var_names_stmt(alt, out);
            }
        }
        Statement::For(for_loop) => {
            if let Some(init) = &for_loop.init {
                if let crate::statement::iteration::ForInit::Variable(decl) = &**init {
                    if decl.kind == VariableKind::Var {
                        for d in &decl.declarators {
                            d.binding.bound_names(out);
                        }
                    }
                }
            }
            collect_var_names_stmt(&for_loop.body, out);
        }
        Statement::ForIn(for_in) => {
            collect_for_binding_names(&for_in.binding, out);
            collect_var_names_stmt(&for_in.body, out);
        }
        Statement::ForOf(for_of) => {
            collect_for_binding_names(&for_of.binding, out);
            collect_var_names_stmt(&for_of.body, out);
        }
        Statement::While(while_loop) => collect_var_names_stmt(&while_loop.body, out),
        Statement::DoWhile(do_while) => collect_var_names_stmt(&do_while.body, out),
        Statement::Try(TryStatement {
            block,
            catch,
            finally,
        }) => {
            out.extend(var_declared_names(block));
            if let Some(catch) = catch {
                out.extend(var_declared_names(&catch.block));
            }
            if let Some(finally) = finally {
                out.extend(var_declared_names(finally));
            }
        }
        Statement::Switch(switch) => {
            for SwitchCase { body, .. } in &switch.cases {
                out.extend(var_declared_names(body));
            }
        }
        Statement::Labelled(_, body) => collect_var_names_stmt(body, out),
        Statement::With { body, .. } => collect_var_names_stmt(body, out),
        Statement::Empty
        | Statement::Expression(_)
        | Statement::Break(_)
        | Statement::Continue(_)
        | Statement::Return(_)
        | Statement::Throw(_) => {}
    }
}

fn collect_for_binding_names(binding: &crate::statement::iteration::ForBinding, out: &mut Vec<Sym>) {
    use crate::statement::iteration::ForBinding;
    if let ForBinding::Var(b) = binding {
        b.bound_names(out);
    }
}

/// `LexicallyDeclaredNames`: the immediate top-level `let`/`const`/class
/// bindings of `list` (each paired with whether it is immutable),
/// excluding function declarations, which are hoistable rather than
/// TDZ'd.
pub fn lexically_declared_names(list: &StatementList) -> Vec<(Sym, bool)> {
    let mut out = Vec::new();
    for item in &list.items {
        if let StatementListItem::Declaration(decl) = item {
            match decl {
                Declaration::Variable(var_decl)
                    if var_decl.kind != VariableKind::Var =>
                {
                    let is_const = var_decl.kind == VariableKind::Const;
                    for d in &var_decl.declarators {
                        let mut names = Vec::new();
                        d.binding.bound_names(&mut names);
                        out.extend(names.into_iter().map(|n| (n, is_const)));
                    }
                }
                Declaration::Class(class) => {
                    if let Some(name) = class.name {
                        out.push((name, false));
                    }
                }
                _ => {}
            }
        }
    }
    out
}

/// Top-level hoistable function declarations of `list`, in source
/// order — each gets a binding created and initialised before the rest
/// of the scope's declaration instantiation runs.
pub fn top_level_function_declarations(list: &StatementList) -> Vec<&Function> {
    list.items
        .iter()
        .filter_map(|item| match item {
            StatementListItem::Declaration(Declaration::Function(f)) => Some(f),
            _ => None,
        })
        .collect()
}
