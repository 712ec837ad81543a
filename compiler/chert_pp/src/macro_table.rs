//! Macro definitions and the table they live in.

use rustc_hash::FxHashMap;

/// Object-like (`#define N body`) or function-like (`#define N(p) body`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MacroKind {
    ObjectLike,
    FunctionLike,
}

/// One `#define`.
///
/// The body is stored whitespace-normalized: leading/trailing whitespace
/// trimmed and interior whitespace/comment runs collapsed to single
/// spaces, so it never contains a newline. Parameter names are pairwise
/// distinct (the directive parser rejects duplicates); object-like
/// definitions have an empty parameter list, while a function-like macro
/// with zero parameters still requires a `()` invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MacroDefinition {
    pub name: String,
    pub kind: MacroKind,
    pub params: Vec<String>,
    pub body: String,
}

impl MacroDefinition {
    pub fn object_like(name: impl Into<String>, body: impl Into<String>) -> Self {
        MacroDefinition {
            name: name.into(),
            kind: MacroKind::ObjectLike,
            params: Vec::new(),
            body: body.into(),
        }
    }

    pub fn function_like(
        name: impl Into<String>,
        params: Vec<String>,
        body: impl Into<String>,
    ) -> Self {
        MacroDefinition {
            name: name.into(),
            kind: MacroKind::FunctionLike,
            params,
            body: body.into(),
        }
    }

    pub fn is_function_like(&self) -> bool {
        self.kind == MacroKind::FunctionLike
    }

    /// Position of `name` in the parameter list, if it is a parameter.
    pub fn param_index(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p == name)
    }

    /// Textual identity: same kind, same parameter list, same normalized
    /// body. A redefinition that satisfies this is tolerated silently.
    pub fn same_definition(&self, other: &MacroDefinition) -> bool {
        self.kind == other.kind && self.params == other.params && self.body == other.body
    }
}

/// All macros defined so far, keyed by name.
///
/// Lookup is transparent over `&str`. Redefinition replaces the old
/// entry; the reporting policy lives in the directive parser.
#[derive(Default, Debug)]
pub struct MacroTable {
    map: FxHashMap<String, MacroDefinition>,
}

impl MacroTable {
    pub fn new() -> Self {
        MacroTable::default()
    }

    pub fn get(&self, name: &str) -> Option<&MacroDefinition> {
        self.map.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Insert or replace; returns the previous definition if any.
    pub fn define(&mut self, def: MacroDefinition) -> Option<MacroDefinition> {
        self.map.insert(def.name.clone(), def)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
