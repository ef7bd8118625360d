/// A 1-indexed line/column source position, attached to AST nodes that
/// participate in diagnostics (thrown `SyntaxError`s, stack traces).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}
