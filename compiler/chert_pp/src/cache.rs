//! Memoization of completed macro expansions.
//!
//! The cache maps an *invocation key* to the buffer section holding its
//! expansion text. Object-like macros are keyed by name; function-like
//! macros by `name(arg0,arg1,…)` built from the stored (pre-expanded)
//! argument texts. The cache is consulted before expanding and written
//! after, so repeated identical invocations reuse one section — which
//! both accelerates and normalizes them.

use chert_lexer_core::SectionId;
use rustc_hash::FxHashMap;

/// Build the cache key for one invocation.
pub fn invocation_key(name: &str, args: &[String]) -> String {
    let mut key = String::with_capacity(name.len() + 2 + args.iter().map(String::len).sum::<usize>());
    key.push_str(name);
    key.push('(');
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            key.push(',');
        }
        key.push_str(arg);
    }
    key.push(')');
    key
}

/// Invocation key → expansion section.
#[derive(Default, Debug)]
pub struct ExpansionCache {
    map: FxHashMap<String, SectionId>,
}

impl ExpansionCache {
    pub fn new() -> Self {
        ExpansionCache::default()
    }

    pub fn get(&self, key: &str) -> Option<SectionId> {
        self.map.get(key).copied()
    }

    pub fn insert(&mut self, key: String, section: SectionId) {
        self.map.insert(key, section);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
