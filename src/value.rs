use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A nullary producer of template source, resolved lazily when a `{{>name}}`
/// tag is rendered.
#[derive(Clone)]
pub struct Partial(Arc<dyn Fn() -> String + Send + Sync>);

impl Partial {
    pub fn new(f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self) -> String {
        (self.0)()
    }
}

impl fmt::Debug for Partial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Partial(..)")
    }
}

/// A user function applied to template text. For a `{{name}}` tag it is
/// called with an empty string; for a `{{#name}}..{{/name}}` section it
/// receives the verbatim section source. Its return value is parsed and
/// rendered as a template.
#[derive(Clone)]
pub struct Lambda(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl Lambda {
    pub fn new(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, text: &str) -> String {
        (self.0)(text)
    }
}

impl fmt::Debug for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Lambda(..)")
    }
}

/// The data context a template is rendered against. Each value has exactly
/// one kind; lookup by name on anything but an `Object` yields `None`.
///
/// Cloning deep-copies objects, strings and lists; partials and lambdas are
/// shared. Equality is structural for containers and identity for the two
/// function kinds.
#[derive(Debug, Clone)]
pub enum Value {
    Object(HashMap<String, Value>),
    Str(String),
    List(Vec<Value>),
    Bool(bool),
    Partial(Partial),
    Lambda(Lambda),
}

impl Value {
    /// An empty `Object`, same as `Value::default()`.
    pub fn object() -> Value {
        Value::Object(HashMap::new())
    }

    /// An empty `List`.
    pub fn list() -> Value {
        Value::List(Vec::new())
    }

    pub fn partial(f: impl Fn() -> String + Send + Sync + 'static) -> Value {
        Value::Partial(Partial::new(f))
    }

    pub fn lambda(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Value {
        Value::Lambda(Lambda::new(f))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Value::Bool(true))
    }

    pub fn is_false(&self) -> bool {
        matches!(self, Value::Bool(false))
    }

    pub fn is_empty_list(&self) -> bool {
        matches!(self, Value::List(items) if items.is_empty())
    }

    pub fn is_non_empty_list(&self) -> bool {
        matches!(self, Value::List(items) if !items.is_empty())
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, Value::Partial(_))
    }

    pub fn is_lambda(&self) -> bool {
        matches!(self, Value::Lambda(_))
    }

    /// Look up a member by name. Only objects have members.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Object(members) => members.get(name),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Insert a member. Does nothing when the value is not an `Object`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        if let Value::Object(members) = self {
            members.insert(name.into(), value.into());
        }
    }

    /// Push an element. Does nothing when the value is not a `List`.
    pub fn append(&mut self, value: impl Into<Value>) {
        if let Value::List(items) = self {
            items.push(value.into());
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::object()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Partial(a), Value::Partial(b)) => Arc::ptr_eq(&a.0, &b.0),
            (Value::Lambda(a), Value::Lambda(b)) => Arc::ptr_eq(&a.0, &b.0),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}
