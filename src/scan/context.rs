//! Symbol tables built during the single-pass scan
//!
//! Entries are created when a declaration form is recognized and mutated in
//! place as later lines reference the symbol. Nothing is ever removed; the
//! tables live for the duration of one scan. Insertion order is preserved so
//! findings surface in declaration order.

use indexmap::IndexMap;

/// A declared map, data var, constant, trait, token or read-only function.
#[derive(Debug, Clone)]
pub struct SymbolEntry {
    /// 1-based declaration line.
    pub line: u32,
    /// Set once any later line references the symbol.
    pub used: bool,
}

impl SymbolEntry {
    pub fn new(line: u32) -> Self {
        Self { line, used: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Fungible,
    NonFungible,
}

#[derive(Debug, Clone)]
pub struct TokenEntry {
    pub line: u32,
    pub kind: TokenKind,
    pub used: bool,
}

/// A declared public or private function.
#[derive(Debug, Clone)]
pub struct FunctionEntry {
    /// 1-based declaration line.
    pub line: u32,
    pub public: bool,
    /// Parameter count captured from the declaration line.
    pub params: usize,
    /// External calls made inside the body.
    pub calls: usize,
    /// Applications of the function elsewhere in the contract.
    pub invoked: usize,
    /// Last line of the body (the line where nesting returns to the
    /// declaration's baseline). Equals `line` for single-line functions.
    pub body_end: u32,
}

impl FunctionEntry {
    pub fn new(line: u32, public: bool, params: usize) -> Self {
        Self {
            line,
            public,
            params,
            calls: 0,
            invoked: 0,
            body_end: line,
        }
    }
}

/// Everything the declaration side of the scan learned about a contract.
#[derive(Debug, Clone, Default)]
pub struct ContractContext {
    pub maps: IndexMap<String, SymbolEntry>,
    pub vars: IndexMap<String, SymbolEntry>,
    pub funcs: IndexMap<String, FunctionEntry>,
    pub traits: IndexMap<String, SymbolEntry>,
    pub constants: IndexMap<String, SymbolEntry>,
    pub tokens: IndexMap<String, TokenEntry>,
    pub read_only: IndexMap<String, SymbolEntry>,
    /// Cross-contract call targets, tallied per target.
    pub call_targets: IndexMap<String, usize>,
    /// Literal `principal '...'` constants, tallied per literal.
    pub principal_literals: IndexMap<String, usize>,
    /// Emitted event names, tallied per name.
    pub events: IndexMap<String, usize>,
    /// Deployed contract names, tallied per name.
    pub deployed: IndexMap<String, usize>,
    /// Import tallies. Clarity source carries no import forms today, so
    /// this stays empty; the gas formula still carries its term.
    pub imports: IndexMap<String, usize>,
    /// Post-condition declarations seen.
    pub post_conditions: usize,
}

impl ContractContext {
    pub fn has_public_function(&self) -> bool {
        self.funcs.values().any(|f| f.public)
    }
}
