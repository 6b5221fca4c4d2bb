//! Declaration binder
//!
//! Mediates declaration-time and lookup-time access to the lexical
//! scopes: validates each declaration against the current frame, forwards
//! accepted declarations to the identifier registry, and retires a
//! frame's registrations when the frame closes, so the registry's
//! live-binding set always mirrors what is lexically visible.
//!
//! The method and class currently under analysis are fields on the
//! binder, set by `declare_function`/`declare_class` and cleared by the
//! matching `finish_*` call. At most one of each is open at a time;
//! violating that is caller misuse and fatal, not a diagnostic.

use log::debug;

use crate::error::{ClassError, DeclareError, FieldError, FunctionError, ParamError};
use crate::symbols::element::{Element, ElementKind, Param, ParamKind};
use crate::symbols::registry::SymbolRegistry;
use crate::symbols::table::{ScopeKind, ScopeStack};

/// Method or class currently under analysis
#[derive(Debug)]
struct OpenDecl {
    /// Key the element was declared under
    key: String,
    /// Index of the frame holding the element (the frame below the body)
    home: usize,
}

/// Declaration and lookup façade over the scope stack and the registry
///
/// One binder lives per compilation unit and is driven in AST traversal
/// order. Rejected declarations leave frames and registry untouched;
/// unbalanced scope or analysis bookkeeping panics (spelled out as a
/// precondition on each operation).
#[derive(Debug, Default)]
pub struct Binder {
    scopes: ScopeStack,
    registry: SymbolRegistry,
    current_function: Option<OpenDecl>,
    current_class: Option<OpenDecl>,
}

impl Binder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a plain block scope
    pub fn push_scope(&mut self) {
        self.scopes.push(ScopeKind::Block);
    }

    /// Close the innermost scope and retire its registrations.
    ///
    /// Precondition: at least one scope is open.
    pub fn pop_scope(&mut self) {
        let frame = self.scopes.pop();
        for (key, _) in frame.iter() {
            self.registry.unregister(key);
        }
    }

    /// Number of open scopes
    pub fn depth(&self) -> usize {
        self.scopes.depth()
    }

    /// Declare a variable in the innermost scope.
    ///
    /// On success the variable occupies the current frame and the minted
    /// unique name is returned.
    ///
    /// Precondition: a scope is open and `elem` is a variable element.
    pub fn declare_var(
        &mut self,
        elem: Element,
        key: &str,
        offset: u32,
    ) -> Result<String, DeclareError> {
        assert_eq!(
            elem.kind(),
            ElementKind::Variable,
            "declare_var of `{}` with a {:?} element",
            key,
            elem.kind()
        );
        self.check_recursive(key, None)?;
        if !self.scopes.insert_local(key, elem) {
            return Err(DeclareError::Exists(key.to_string()));
        }
        Ok(self.registry.register_var(key, offset))
    }

    /// Declare an object in the innermost scope.
    ///
    /// Precondition: a scope is open and `elem` is an object element.
    pub fn declare_object(
        &mut self,
        elem: Element,
        key: &str,
        offset: u32,
        class_name: &str,
    ) -> Result<String, DeclareError> {
        assert_eq!(
            elem.kind(),
            ElementKind::Object,
            "declare_object of `{}` with a {:?} element",
            key,
            elem.kind()
        );
        self.check_recursive(key, Some(class_name))?;
        if !self.scopes.insert_local(key, elem) {
            return Err(DeclareError::Exists(key.to_string()));
        }
        Ok(self.registry.register_object(key, offset, class_name))
    }

    /// Declare a method and open its body scope. Subsequent parameter
    /// declarations attach to this method until [`Binder::finish_function`].
    ///
    /// Precondition: a scope is open and no function is under analysis.
    pub fn declare_function(
        &mut self,
        elem: Element,
        key: &str,
        local_count: u32,
        class_name: &str,
    ) -> Result<String, FunctionError> {
        assert!(
            self.current_function.is_none(),
            "function `{}` declared while another function is under analysis",
            key
        );
        if elem.kind() != ElementKind::Function {
            return Err(FunctionError::NotAFunction(key.to_string()));
        }
        if !self.scopes.insert_local(key, elem) {
            return Err(FunctionError::Exists(key.to_string()));
        }
        let home = self.scopes.depth() - 1;
        self.scopes.push(ScopeKind::Function);
        self.current_function = Some(OpenDecl {
            key: key.to_string(),
            home,
        });
        debug!("analyzing function `{}`", key);
        Ok(self.registry.register_method(key, local_count, class_name))
    }

    /// Declare a variable parameter of the function under analysis.
    ///
    /// The parameter lands in the function's frame and is appended to the
    /// function element's parameter list.
    pub fn declare_var_param(
        &mut self,
        elem: Element,
        key: &str,
        offset: u32,
    ) -> Result<String, ParamError> {
        let current = self
            .current_function
            .as_ref()
            .ok_or(ParamError::NoActiveFunction)?;
        let (func_key, home) = (current.key.clone(), current.home);
        let ty = match &elem {
            Element::Variable { ty } => *ty,
            _ => return Err(ParamError::KindMismatch(key.to_string())),
        };
        if !self.scopes.insert_local(key, elem) {
            return Err(ParamError::Exists(key.to_string()));
        }
        self.append_param(
            home,
            &func_key,
            Param {
                name: key.to_string(),
                kind: ParamKind::Value(ty),
            },
        );
        Ok(self.registry.register_var(key, offset))
    }

    /// Declare an object parameter of the function under analysis.
    pub fn declare_object_param(
        &mut self,
        elem: Element,
        key: &str,
        offset: u32,
        class_name: &str,
    ) -> Result<String, ParamError> {
        let current = self
            .current_function
            .as_ref()
            .ok_or(ParamError::NoActiveFunction)?;
        let (func_key, home) = (current.key.clone(), current.home);
        if elem.kind() != ElementKind::Object {
            return Err(ParamError::KindMismatch(key.to_string()));
        }
        if !self.scopes.insert_local(key, elem) {
            return Err(ParamError::Exists(key.to_string()));
        }
        self.append_param(
            home,
            &func_key,
            Param {
                name: key.to_string(),
                kind: ParamKind::Object(class_name.to_string()),
            },
        );
        Ok(self.registry.register_object(key, offset, class_name))
    }

    /// Close the body of the function under analysis and retire its
    /// registrations.
    ///
    /// Precondition: a function is under analysis.
    pub fn finish_function(&mut self) {
        let current = self
            .current_function
            .take()
            .unwrap_or_else(|| panic!("finish_function with no function under analysis"));
        debug!("finished function `{}`", current.key);
        self.pop_scope();
    }

    /// Declare a class and open its body scope. Subsequent field
    /// declarations attach to this class until [`Binder::finish_class`].
    ///
    /// `attributes` is the declaration-order attribute list from the
    /// class definition; it goes to the registry as-is.
    ///
    /// Precondition: a scope is open and no class is under analysis.
    pub fn declare_class(
        &mut self,
        elem: Element,
        key: &str,
        attributes: Vec<String>,
    ) -> Result<String, ClassError> {
        assert!(
            self.current_class.is_none(),
            "class `{}` declared while another class is under analysis",
            key
        );
        if elem.kind() != ElementKind::Class {
            return Err(ClassError::NotAClass(key.to_string()));
        }
        if !self.scopes.insert_local(key, elem) {
            return Err(ClassError::Exists(key.to_string()));
        }
        let home = self.scopes.depth() - 1;
        self.scopes.push(ScopeKind::Class);
        self.current_class = Some(OpenDecl {
            key: key.to_string(),
            home,
        });
        debug!("analyzing class `{}`", key);
        Ok(self.registry.register_class(key, attributes))
    }

    /// Declare a variable field of the class under analysis.
    ///
    /// Precondition: `elem` is a variable element (a class element is the
    /// in-band [`FieldError::ClassAsField`] rejection instead).
    pub fn declare_var_field(
        &mut self,
        elem: Element,
        key: &str,
        offset: u32,
    ) -> Result<String, FieldError> {
        let current = self
            .current_class
            .as_ref()
            .ok_or(FieldError::NoActiveClass)?;
        let (class_key, home) = (current.key.clone(), current.home);
        if elem.kind() == ElementKind::Class {
            return Err(FieldError::ClassAsField(key.to_string()));
        }
        assert_eq!(
            elem.kind(),
            ElementKind::Variable,
            "declare_var_field of `{}` with a {:?} element",
            key,
            elem.kind()
        );
        if !self.scopes.insert_local(key, elem) {
            return Err(FieldError::Exists(key.to_string()));
        }
        self.append_member(home, &class_key, key);
        Ok(self.registry.register_var(key, offset))
    }

    /// Declare an object field of the class under analysis.
    ///
    /// A field whose class is the class under analysis would embed the
    /// class in itself by value and is rejected as recursive.
    pub fn declare_object_field(
        &mut self,
        elem: Element,
        key: &str,
        offset: u32,
        class_name: &str,
    ) -> Result<String, FieldError> {
        let current = self
            .current_class
            .as_ref()
            .ok_or(FieldError::NoActiveClass)?;
        let (class_key, home) = (current.key.clone(), current.home);
        if elem.kind() == ElementKind::Class {
            return Err(FieldError::ClassAsField(key.to_string()));
        }
        assert_eq!(
            elem.kind(),
            ElementKind::Object,
            "declare_object_field of `{}` with a {:?} element",
            key,
            elem.kind()
        );
        if class_name == class_key {
            return Err(FieldError::Recursive(key.to_string()));
        }
        if !self.scopes.insert_local(key, elem) {
            return Err(FieldError::Exists(key.to_string()));
        }
        self.append_member(home, &class_key, key);
        Ok(self.registry.register_object(key, offset, class_name))
    }

    /// Declare a method of the class under analysis and open its body.
    ///
    /// One call both records the class membership and starts the method:
    /// the method lands in the class frame, joins the member list, and
    /// becomes the function under analysis until
    /// [`Binder::finish_function`]. The owning class is the class under
    /// analysis.
    ///
    /// Precondition: no function is under analysis.
    pub fn declare_function_field(
        &mut self,
        elem: Element,
        key: &str,
        local_count: u32,
    ) -> Result<String, FieldError> {
        assert!(
            self.current_function.is_none(),
            "method `{}` declared while another function is under analysis",
            key
        );
        let current = self
            .current_class
            .as_ref()
            .ok_or(FieldError::NoActiveClass)?;
        let (class_key, home) = (current.key.clone(), current.home);
        if elem.kind() == ElementKind::Class {
            return Err(FieldError::ClassAsField(key.to_string()));
        }
        assert_eq!(
            elem.kind(),
            ElementKind::Function,
            "declare_function_field of `{}` with a {:?} element",
            key,
            elem.kind()
        );
        if !self.scopes.insert_local(key, elem) {
            return Err(FieldError::Exists(key.to_string()));
        }
        let func_home = self.scopes.depth() - 1;
        self.append_member(home, &class_key, key);
        self.scopes.push(ScopeKind::Function);
        self.current_function = Some(OpenDecl {
            key: key.to_string(),
            home: func_home,
        });
        debug!("analyzing method `{}` of `{}`", key, class_key);
        Ok(self.registry.register_method(key, local_count, &class_key))
    }

    /// Close the body of the class under analysis and retire its
    /// registrations.
    ///
    /// Precondition: a class is under analysis.
    pub fn finish_class(&mut self) {
        let current = self
            .current_class
            .take()
            .unwrap_or_else(|| panic!("finish_class with no class under analysis"));
        debug!("finished class `{}`", current.key);
        self.pop_scope();
    }

    /// Innermost visible declaration for `key` (standard shadowing)
    pub fn lookup(&self, key: &str) -> Option<&Element> {
        self.scopes.lookup(key)
    }

    /// Unique internal name for `key`, the handle instruction operands
    /// use in place of the source name.
    ///
    /// Precondition: `key` is visible in the current scope.
    pub fn unique_name(&self, key: &str) -> &str {
        self.registry.unique_name(key)
    }

    /// Read access to the registry, shared with instruction lowering
    pub fn registry(&self) -> &SymbolRegistry {
        &self.registry
    }

    /// Hand the registry off to code generation
    pub fn into_registry(self) -> SymbolRegistry {
        self.registry
    }

    /// Reject a declaration that names, or embeds by value, the
    /// definition currently being analyzed.
    fn check_recursive(&self, key: &str, class_name: Option<&str>) -> Result<(), DeclareError> {
        let open = [&self.current_function, &self.current_class];
        if open
            .iter()
            .any(|open_decl| open_decl.as_ref().is_some_and(|d| d.key == key))
        {
            return Err(DeclareError::Recursive(key.to_string()));
        }
        if let (Some(class_name), Some(current)) = (class_name, self.current_class.as_ref()) {
            if current.key == class_name {
                return Err(DeclareError::Recursive(key.to_string()));
            }
        }
        Ok(())
    }

    fn append_param(&mut self, home: usize, func_key: &str, param: Param) {
        match self.scopes.get_mut_at(home, func_key) {
            Some(Element::Function { params, .. }) => params.push(param),
            _ => panic!("function `{}` missing from its declaring frame", func_key),
        }
    }

    fn append_member(&mut self, home: usize, class_key: &str, member: &str) {
        match self.scopes.get_mut_at(home, class_key) {
            Some(Element::Class { members }) => members.push(member.to_string()),
            _ => panic!("class `{}` missing from its declaring frame", class_key),
        }
    }
}
