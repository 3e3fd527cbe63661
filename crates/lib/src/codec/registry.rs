//! Registry of named types, functions and modules.
//!
//! Tagged strings such as `__type__(models.Linear)` are resolved against a
//! closed [`Registry`] populated by the embedding application, never by
//! reflection. A registered type may carry a constructor, which is what
//! [`Config::init_objects`](crate::config::Config::init_objects) uses to turn
//! type-keyed mappings into live [`Instance`]s.
//!
//! # Example
//!
//! ```
//! use paramtree::codec::{CtorArgs, Registry};
//!
//! #[derive(Debug, PartialEq)]
//! struct Linear {
//!     width: i64,
//! }
//!
//! let mut registry = Registry::new();
//! let linear = registry.register_type_with("models", "Linear", |args: CtorArgs| {
//!     let width = args.named_int("width").unwrap_or(1);
//!     Ok::<_, std::convert::Infallible>(Linear { width })
//! });
//!
//! assert_eq!(linear.qualified_name(), "models.Linear");
//! assert!(registry.resolve_type("models.Linear").is_ok());
//! assert!(registry.resolve_module("models").is_ok());
//! assert!(registry.resolve_type("models.Missing").is_err());
//! ```

use std::{
    any::Any,
    fmt,
    hash::{Hash, Hasher},
    sync::{Arc, PoisonError, RwLock},
};

use indexmap::{IndexMap, IndexSet};

use super::CodecError;
use crate::{
    config::{Config, ConfigError, Value},
    util::singleton::Singleton,
};

/// Boxed error returned by user-supplied constructors and callables.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A constructed object, shared by reference.
pub type Object = Arc<dyn Any + Send + Sync>;

type Constructor = Arc<dyn Fn(CtorArgs) -> Result<Object, BoxError> + Send + Sync>;
type Callable = Arc<dyn Fn(&[Value]) -> Result<Value, BoxError> + Send + Sync>;

static GLOBAL: Singleton<RwLock<Registry>> = Singleton::new();

/// Arguments handed to a registered constructor.
///
/// A mapping becomes named arguments, a sequence becomes positional
/// arguments, and anything else means no arguments at all.
#[derive(Debug, Clone, PartialEq)]
pub enum CtorArgs {
    Named(Config),
    Positional(Vec<Value>),
    Empty,
}

impl CtorArgs {
    /// Looks up a named argument
    pub fn named(&self, name: &str) -> Option<&Value> {
        match self {
            CtorArgs::Named(config) => config.get(name),
            _ => None,
        }
    }

    /// Looks up a named integer argument
    pub fn named_int(&self, name: &str) -> Option<i64> {
        self.named(name).and_then(Value::as_int)
    }

    /// Looks up a positional argument
    pub fn positional(&self, index: usize) -> Option<&Value> {
        match self {
            CtorArgs::Positional(values) => values.get(index),
            _ => None,
        }
    }
}

/// A reference to a registered type.
#[derive(Clone)]
pub struct TypeRef {
    module: Arc<str>,
    name: Arc<str>,
    ctor: Option<Constructor>,
}

impl TypeRef {
    /// Creates a reference without a constructor.
    pub fn new(module: impl Into<Arc<str>>, name: impl Into<Arc<str>>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
            ctor: None,
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `module.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.module, self.name)
    }

    /// Returns true if a constructor was registered for this type
    pub fn is_constructible(&self) -> bool {
        self.ctor.is_some()
    }

    /// Invokes the registered constructor.
    pub fn construct(&self, args: CtorArgs) -> Result<Instance, ConfigError> {
        let ctor = self
            .ctor
            .as_ref()
            .ok_or_else(|| ConfigError::NotConstructible {
                type_name: self.qualified_name(),
            })?;
        let object = ctor(args).map_err(|e| ConfigError::ConstructionFailed {
            type_name: self.qualified_name(),
            reason: e.to_string(),
        })?;
        Ok(Instance {
            type_ref: self.clone(),
            object,
        })
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.module == other.module && self.name == other.name
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.module.hash(state);
        self.name.hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({}.{})", self.module, self.name)
    }
}

/// A reference to a registered callable.
#[derive(Clone)]
pub struct FunctionRef {
    module: Arc<str>,
    name: Arc<str>,
    callable: Callable,
}

impl FunctionRef {
    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `module.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.module, self.name)
    }

    /// Calls the function with positional arguments.
    pub fn call(&self, args: &[Value]) -> Result<Value, BoxError> {
        (self.callable)(args)
    }
}

impl PartialEq for FunctionRef {
    fn eq(&self, other: &Self) -> bool {
        self.module == other.module && self.name == other.name
    }
}

impl Eq for FunctionRef {}

impl Hash for FunctionRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.module.hash(state);
        self.name.hash(state);
    }
}

impl fmt::Debug for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionRef({}.{})", self.module, self.name)
    }
}

/// A reference to a registered module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleRef {
    name: Arc<str>,
}

impl ModuleRef {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// An object built from a type-keyed mapping.
///
/// Instances compare equal only when they share the same allocation.
#[derive(Clone)]
pub struct Instance {
    type_ref: TypeRef,
    object: Object,
}

impl Instance {
    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    /// Returns the underlying object if it is a `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.object.downcast_ref::<T>()
    }

    /// Address of the shared object, used to tell instances apart
    pub fn address(&self) -> usize {
        Arc::as_ptr(&self.object) as *const () as usize
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.object, &other.object)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Instance({} @ {:#x})",
            self.type_ref.qualified_name(),
            self.address()
        )
    }
}

/// A closed set of resolvable types, functions and modules.
#[derive(Debug, Default)]
pub struct Registry {
    types: IndexMap<String, TypeRef>,
    functions: IndexMap<String, FunctionRef>,
    modules: IndexSet<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by `Config` load operations.
    pub fn global() -> &'static RwLock<Registry> {
        GLOBAL.get_or_init(|| RwLock::new(Registry::new()))
    }

    /// Runs `f` with shared access to the global registry.
    pub fn with_global<R>(f: impl FnOnce(&Registry) -> R) -> R {
        let guard = Self::global()
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Runs `f` with exclusive access to the global registry.
    pub fn with_global_mut<R>(f: impl FnOnce(&mut Registry) -> R) -> R {
        let mut guard = Self::global()
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Registers a type without a constructor.
    pub fn register_type(&mut self, module: &str, name: &str) -> TypeRef {
        self.insert_type(TypeRef::new(module, name))
    }

    /// Registers a type whose constructor produces `T`.
    pub fn register_type_with<T, E, F>(&mut self, module: &str, name: &str, ctor: F) -> TypeRef
    where
        T: Any + Send + Sync,
        E: Into<BoxError>,
        F: Fn(CtorArgs) -> Result<T, E> + Send + Sync + 'static,
    {
        let ctor: Constructor = Arc::new(move |args| {
            ctor(args)
                .map(|object| Arc::new(object) as Object)
                .map_err(Into::into)
        });
        let mut type_ref = TypeRef::new(module, name);
        type_ref.ctor = Some(ctor);
        self.insert_type(type_ref)
    }

    fn insert_type(&mut self, type_ref: TypeRef) -> TypeRef {
        self.modules.insert(type_ref.module().to_string());
        self.types
            .insert(type_ref.qualified_name(), type_ref.clone());
        type_ref
    }

    /// Registers a callable.
    pub fn register_function<F>(&mut self, module: &str, name: &str, f: F) -> FunctionRef
    where
        F: Fn(&[Value]) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        let function = FunctionRef {
            module: module.into(),
            name: name.into(),
            callable: Arc::new(f),
        };
        self.modules.insert(module.to_string());
        self.functions
            .insert(function.qualified_name(), function.clone());
        function
    }

    /// Registers a module name.
    pub fn register_module(&mut self, name: &str) -> ModuleRef {
        self.modules.insert(name.to_string());
        ModuleRef { name: name.into() }
    }

    pub fn resolve_type(&self, qualified: &str) -> Result<TypeRef, CodecError> {
        self.types
            .get(qualified)
            .cloned()
            .ok_or_else(|| CodecError::UnresolvedReference {
                kind: "type",
                name: qualified.to_string(),
            })
    }

    pub fn resolve_function(&self, qualified: &str) -> Result<FunctionRef, CodecError> {
        self.functions
            .get(qualified)
            .cloned()
            .ok_or_else(|| CodecError::UnresolvedReference {
                kind: "function",
                name: qualified.to_string(),
            })
    }

    pub fn resolve_module(&self, name: &str) -> Result<ModuleRef, CodecError> {
        if self.modules.contains(name) {
            Ok(ModuleRef { name: name.into() })
        } else {
            Err(CodecError::UnresolvedReference {
                kind: "module",
                name: name.to_string(),
            })
        }
    }

    /// Total number of registered entries
    pub fn len(&self) -> usize {
        self.types.len() + self.functions.len() + self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Pair(i64, i64);

    #[test]
    fn test_construct_positional() {
        let mut registry = Registry::new();
        let pair = registry.register_type_with("shapes", "Pair", |args: CtorArgs| {
            let a = args.positional(0).and_then(Value::as_int);
            let b = args.positional(1).and_then(Value::as_int);
            match (a, b) {
                (Some(a), Some(b)) => Ok(Pair(a, b)),
                _ => Err("expected two integers"),
            }
        });

        let instance = pair
            .construct(CtorArgs::Positional(vec![Value::Int(2), Value::Int(5)]))
            .unwrap();
        let object = instance.downcast_ref::<Pair>().unwrap();
        assert_eq!((object.0, object.1), (2, 5));

        let err = pair.construct(CtorArgs::Empty).unwrap_err();
        assert!(err.to_string().contains("expected two integers"));
    }

    #[test]
    fn test_type_without_constructor() {
        let mut registry = Registry::new();
        let plain = registry.register_type("shapes", "Plain");
        assert!(!plain.is_constructible());
        assert!(matches!(
            plain.construct(CtorArgs::Empty),
            Err(ConfigError::NotConstructible { .. })
        ));
    }

    #[test]
    fn test_instances_compare_by_identity() {
        let mut registry = Registry::new();
        let unit = registry.register_type_with("shapes", "Unit", |_| {
            Ok::<_, std::convert::Infallible>(())
        });
        let a = unit.construct(CtorArgs::Empty).unwrap();
        let b = unit.construct(CtorArgs::Empty).unwrap();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_function_call_and_resolution() {
        let mut registry = Registry::new();
        registry.register_function("ops", "double", |args| match args.first() {
            Some(Value::Int(n)) => Ok(Value::Int(n * 2)),
            _ => Err("expected an integer".into()),
        });

        let double = registry.resolve_function("ops.double").unwrap();
        assert_eq!(double.call(&[Value::Int(21)]).unwrap(), Value::Int(42));
        assert!(registry.resolve_module("ops").is_ok());

        let err = registry.resolve_function("ops.triple").unwrap_err();
        assert!(err.is_resolution_error());
        assert_eq!(err.reference(), Some("ops.triple"));
    }
}
