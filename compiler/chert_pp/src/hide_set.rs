//! Hide sets: the names a character stream position must not expand.
//!
//! Expanding macro `M` pushes a section-stack frame whose hide set is
//! the parent frame's set extended with `M`; an identifier that appears
//! in the current hide set is passed through verbatim instead of being
//! expanded. This is what makes `#define R R` produce `R`, and what
//! keeps `FOO(FOO)(2)` from re-invoking `FOO` inside its own expansion.
//!
//! The set is an immutable `Rc`-linked chain. Extension is O(1) and
//! membership walks the chain, whose length equals the expansion
//! nesting depth — in practice a handful of entries.

use std::rc::Rc;

#[derive(Debug)]
struct Node {
    name: String,
    parent: Option<Rc<Node>>,
}

/// An immutable set of macro names, cheap to clone and extend.
#[derive(Clone, Debug, Default)]
pub struct HideSet {
    head: Option<Rc<Node>>,
}

impl HideSet {
    /// The empty set (section 0 is read under this).
    pub fn empty() -> Self {
        HideSet::default()
    }

    /// A new set containing everything in `self` plus `name`.
    #[must_use]
    pub fn extend(&self, name: &str) -> HideSet {
        HideSet {
            head: Some(Rc::new(Node {
                name: name.to_owned(),
                parent: self.head.clone(),
            })),
        }
    }

    /// `true` if `name` must not be expanded here.
    pub fn contains(&self, name: &str) -> bool {
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            if n.name == name {
                return true;
            }
            node = n.parent.as_deref();
        }
        false
    }

    /// `true` if no names are hidden.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_contains_nothing() {
        let set = HideSet::empty();
        assert!(set.is_empty());
        assert!(!set.contains("R"));
    }

    #[test]
    fn extend_adds_without_mutating_parent() {
        let base = HideSet::empty();
        let with_r = base.extend("R");
        let with_rv = with_r.extend("V");

        assert!(!base.contains("R"));
        assert!(with_r.contains("R"));
        assert!(!with_r.contains("V"));
        assert!(with_rv.contains("R"));
        assert!(with_rv.contains("V"));
    }

    #[test]
    fn sibling_extensions_are_independent() {
        let base = HideSet::empty().extend("A");
        let left = base.extend("L");
        let right = base.extend("R");
        assert!(left.contains("L") && !left.contains("R"));
        assert!(right.contains("R") && !right.contains("L"));
        assert!(left.contains("A") && right.contains("A"));
    }
}
