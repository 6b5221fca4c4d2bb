//! Identifier registry
//!
//! The flat namespace behind the scope stack: every registered source
//! identifier maps to a freshly minted unique internal name and a
//! kind-tagged metadata record. Registering the same identifier again
//! stacks a new live binding on top of the previous one; `unregister`
//! re-exposes it. The registry does not track scope itself; callers
//! balance `register_*` with `unregister`.
//!
//! Minted names are what instruction operands carry in place of source
//! names, so two simultaneously-live bindings must never share one.

use log::trace;
use rustc_hash::FxHashMap;

/// Separator between a source identifier and its disambiguator.
///
/// Not a legal identifier character, so a minted name can never collide
/// with a source identifier or with a name minted for a different
/// identifier.
const SEPARATOR: char = '.';

/// Declaration kind of a registered identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Object,
    Method,
    Class,
}

/// Kind-tagged metadata for one registration
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolInfo {
    /// Offset within the enclosing method's activation frame
    Variable { offset: u32 },

    /// As a variable, plus the object's class
    Object { offset: u32, class_name: String },

    /// Number of local slots in the body, and the owning class
    Method { local_count: u32, class_name: String },

    /// Attribute names in declaration order
    Class { attributes: Vec<String> },
}

impl SymbolInfo {
    pub fn kind(&self) -> SymbolKind {
        match self {
            SymbolInfo::Variable { .. } => SymbolKind::Variable,
            SymbolInfo::Object { .. } => SymbolKind::Object,
            SymbolInfo::Method { .. } => SymbolKind::Method,
            SymbolInfo::Class { .. } => SymbolKind::Class,
        }
    }
}

#[derive(Debug, Clone)]
struct Binding {
    unique: String,
    info: SymbolInfo,
}

/// Flat namespace mapping live identifiers to unique names and metadata
///
/// One registry lives per compilation unit, created before analysis and
/// discarded after instruction emission.
#[derive(Debug, Default)]
pub struct SymbolRegistry {
    /// Live bindings per identifier, most recent last
    bindings: FxHashMap<String, Vec<Binding>>,
    /// Names minted per identifier so far; never decremented, so a
    /// re-registered identifier cannot collide with any earlier name
    counters: FxHashMap<String, u32>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn mint(&mut self, id: &str) -> String {
        let counter = self.counters.entry(id.to_string()).or_insert(0);
        *counter += 1;
        format!("{}{}{}", id, SEPARATOR, counter)
    }

    fn register(&mut self, id: &str, info: SymbolInfo) -> String {
        let unique = self.mint(id);
        trace!("register `{}` as `{}`", id, unique);
        self.bindings.entry(id.to_string()).or_default().push(Binding {
            unique: unique.clone(),
            info,
        });
        unique
    }

    /// Register a variable with its activation frame offset.
    /// Returns the minted unique name.
    pub fn register_var(&mut self, id: &str, offset: u32) -> String {
        self.register(id, SymbolInfo::Variable { offset })
    }

    /// Register an object with its offset and class
    pub fn register_object(
        &mut self,
        id: &str,
        offset: u32,
        class_name: impl Into<String>,
    ) -> String {
        self.register(
            id,
            SymbolInfo::Object {
                offset,
                class_name: class_name.into(),
            },
        )
    }

    /// Register a method with its local slot count and owning class
    pub fn register_method(
        &mut self,
        id: &str,
        local_count: u32,
        class_name: impl Into<String>,
    ) -> String {
        self.register(
            id,
            SymbolInfo::Method {
                local_count,
                class_name: class_name.into(),
            },
        )
    }

    /// Register a class with its attribute names in declaration order
    pub fn register_class(&mut self, id: &str, attributes: Vec<String>) -> String {
        self.register(id, SymbolInfo::Class { attributes })
    }

    /// Remove the most recent live binding for `id`; the previous
    /// registration, if any, becomes visible again.
    ///
    /// Precondition: `id` has a live binding.
    pub fn unregister(&mut self, id: &str) {
        let binding = self
            .bindings
            .get_mut(id)
            .and_then(Vec::pop)
            .unwrap_or_else(|| panic!("unregister of `{}` with no live binding", id));
        trace!("unregister `{}` (`{}`)", id, binding.unique);
    }

    /// Whether at least one live binding exists for `id`
    pub fn contains(&self, id: &str) -> bool {
        self.bindings.get(id).is_some_and(|stack| !stack.is_empty())
    }

    fn live(&self, id: &str) -> &Binding {
        self.bindings
            .get(id)
            .and_then(|stack| stack.last())
            .unwrap_or_else(|| panic!("`{}` is not registered", id))
    }

    /// Unique internal name of the live binding for `id`.
    ///
    /// Precondition: `id` is registered.
    pub fn unique_name(&self, id: &str) -> &str {
        &self.live(id).unique
    }

    /// Declaration kind of the live binding for `id`.
    ///
    /// Precondition: `id` is registered.
    pub fn kind(&self, id: &str) -> SymbolKind {
        self.live(id).info.kind()
    }

    /// Activation frame offset.
    ///
    /// Precondition: `id` is registered as a variable or object.
    pub fn offset(&self, id: &str) -> u32 {
        match &self.live(id).info {
            SymbolInfo::Variable { offset } | SymbolInfo::Object { offset, .. } => *offset,
            info => panic!("`{}` is a {:?}, which has no offset", id, info.kind()),
        }
    }

    /// Number of local slots in the method body.
    ///
    /// Precondition: `id` is registered as a method.
    pub fn local_count(&self, id: &str) -> u32 {
        match &self.live(id).info {
            SymbolInfo::Method { local_count, .. } => *local_count,
            info => panic!("`{}` is a {:?}, not a method", id, info.kind()),
        }
    }

    /// Owning class name.
    ///
    /// Precondition: `id` is registered as a method or object.
    pub fn class_of(&self, id: &str) -> &str {
        match &self.live(id).info {
            SymbolInfo::Object { class_name, .. } | SymbolInfo::Method { class_name, .. } => {
                class_name
            }
            info => panic!("`{}` is a {:?}, which has no class", id, info.kind()),
        }
    }

    /// Class attributes in declaration order.
    ///
    /// Precondition: `id` is registered as a class.
    pub fn attributes(&self, id: &str) -> &[String] {
        match &self.live(id).info {
            SymbolInfo::Class { attributes } => attributes,
            info => panic!("`{}` is a {:?}, not a class", id, info.kind()),
        }
    }
}
