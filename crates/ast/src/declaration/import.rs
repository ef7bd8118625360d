use vesper_interner::Sym;
use vesper_string::JsString;

#[derive(Debug, Clone)]
pub struct ImportDeclaration {
    pub specifiers: Vec<ImportSpecifier>,
    pub module_specifier: JsString,
}

#[derive(Debug, Clone)]
pub enum ImportSpecifier {
    /// `import x from "mod"`
    Default(Sym),
    /// `import * as x from "mod"`
    Namespace(Sym),
    /// `import { a as b } from "mod"`
    Named { imported: Sym, local: Sym },
}
