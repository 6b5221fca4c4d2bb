//! Lexical scope frames
//!
//! Frames keep declaration order and form a stack searched innermost to
//! outermost. The stack knows nothing about unique names or registration;
//! [`crate::symbols::binder`] layers the declaration policy on top.

use super::element::Element;
use indexmap::map::Entry;
use indexmap::IndexMap;
use log::trace;

/// Flavor of a scope frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Plain statement block
    Block,
    /// Method body
    Function,
    /// Class body
    Class,
}

/// One lexical scope: an insertion-ordered declaration table
#[derive(Debug)]
pub struct Scope {
    kind: ScopeKind,
    entries: IndexMap<String, Element>,
}

impl Scope {
    fn new(kind: ScopeKind) -> Self {
        Scope {
            kind,
            entries: IndexMap::new(),
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn get(&self, key: &str) -> Option<&Element> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Element)> {
        self.entries.iter()
    }
}

/// Stack of lexical scopes
///
/// The stack starts with no frame; every operation that touches the
/// innermost frame requires one to be open.
#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack { scopes: Vec::new() }
    }

    /// Number of open frames
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Open a new innermost frame
    pub fn push(&mut self, kind: ScopeKind) {
        trace!("push {:?} scope (depth {})", kind, self.scopes.len() + 1);
        self.scopes.push(Scope::new(kind));
    }

    /// Close and return the innermost frame.
    ///
    /// Precondition: at least one frame is open.
    pub fn pop(&mut self) -> Scope {
        let scope = self
            .scopes
            .pop()
            .unwrap_or_else(|| panic!("pop on an empty scope stack"));
        trace!("pop {:?} scope (depth {})", scope.kind(), self.scopes.len());
        scope
    }

    pub fn top(&self) -> Option<&Scope> {
        self.scopes.last()
    }

    pub fn top_kind(&self) -> Option<ScopeKind> {
        self.scopes.last().map(Scope::kind)
    }

    /// Insert into the innermost frame. Returns false, leaving the frame
    /// untouched, if `key` already occupies it.
    ///
    /// Precondition: at least one frame is open.
    pub fn insert_local(&mut self, key: impl Into<String>, element: Element) -> bool {
        let scope = self
            .scopes
            .last_mut()
            .unwrap_or_else(|| panic!("declaration with no open scope"));
        match scope.entries.entry(key.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(element);
                true
            }
        }
    }

    /// Innermost declaration for `key`, searching outward (shadowing)
    pub fn lookup(&self, key: &str) -> Option<&Element> {
        self.scopes.iter().rev().find_map(|scope| scope.get(key))
    }

    /// Declaration for `key` in the innermost frame only
    pub fn lookup_local(&self, key: &str) -> Option<&Element> {
        self.scopes.last().and_then(|scope| scope.get(key))
    }

    /// Mutable access to an entry of the frame at `depth` (0 = outermost)
    pub fn get_mut_at(&mut self, depth: usize, key: &str) -> Option<&mut Element> {
        self.scopes
            .get_mut(depth)
            .and_then(|scope| scope.entries.get_mut(key))
    }
}
