use crate::declaration::Declaration;
use crate::expression::Expression;
use vesper_interner::Sym;
use vesper_string::JsString;

#[derive(Debug, Clone)]
pub enum ExportDeclaration {
    /// `export let/const/var/function/class ...`
    Local(Declaration),
    /// `export default <expr>` (including anonymous function/class
    /// expressions, which bind to the well-known name `*default*`).
    Default(Expression),
    /// `export { a, b as c }`
    Named(Vec<(Sym, Option<Sym>)>),
    /// `export { a, b as c } from "mod"`
    NamedFrom {
        specifiers: Vec<(Sym, Sym)>,
        module_specifier: JsString,
    },
    /// `export * from "mod"` / `export * as ns from "mod"`
    AllFrom {
        exported_as: Option<Sym>,
        module_specifier: JsString,
    },
}
