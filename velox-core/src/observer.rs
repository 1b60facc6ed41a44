// velox-core/src/observer.rs

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::signal::Dep;

/// Bound data as seen by the renderer: plain values plus shared observed containers.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
    Observed(Observed),
}

impl Value {
    /// Strings, numbers and booleans. `Null` is treated as "not set" rather than primitive.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Value::Bool(_) | Value::Number(_) | Value::String(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Arrays, objects and observed containers.
    pub fn is_composite(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_) | Value::Observed(_))
    }

    /// Whether an object (plain or observed) has `key`. Observed reads are untracked.
    pub fn has_key(&self, key: &str) -> bool {
        match self {
            Value::Object(map) => map.contains_key(key),
            Value::Observed(o) => o.with_untracked(|v| v.has_key(key)),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Text form used when a value ends up in a text node or attribute.
/// Numbers print without a trailing `.0` when integral.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() }
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Object(_) => f.write_str("[object]"),
            Value::Observed(o) => write!(f, "{o:?}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}
impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}
impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}
impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
impl From<Observed> for Value {
    fn from(o: Observed) -> Self {
        Value::Observed(o)
    }
}
impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}
impl From<Vec<(&str, Value)>> for Value {
    fn from(v: Vec<(&str, Value)>) -> Self {
        Value::Object(v.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }
}

struct ObservedInner {
    value: RefCell<Value>,
    dep: Dep,
}

/// A reactive container. Every clone refers to the same value and dependency list,
/// so observed values may reference each other (and themselves).
#[derive(Clone)]
pub struct Observed(Rc<ObservedInner>);

impl Observed {
    /// Wrap a value (usually an `Object` or `Array`) so reads are tracked.
    pub fn new(value: impl Into<Value>) -> Self {
        Observed(Rc::new(ObservedInner {
            value: RefCell::new(value.into()),
            dep: Dep::new(),
        }))
    }

    /// Stable identity of this container.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    pub fn ptr_eq(&self, other: &Observed) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Register the running effect as a dependency of this container.
    pub fn depend(&self) {
        self.0.dep.depend();
    }

    pub fn dep(&self) -> &Dep {
        &self.0.dep
    }

    /// Tracked property read.
    pub fn get(&self, key: &str) -> Value {
        self.depend();
        match &*self.0.value.borrow() {
            Value::Object(map) => map.get(key).cloned().unwrap_or_default(),
            _ => Value::Null,
        }
    }

    /// Set an object property and notify dependents.
    pub fn set(&self, key: &str, value: impl Into<Value>) {
        {
            let mut inner = self.0.value.borrow_mut();
            if !matches!(&*inner, Value::Object(_)) {
                *inner = Value::Object(BTreeMap::new());
            }
            if let Value::Object(map) = &mut *inner {
                map.insert(key.to_string(), value.into());
            }
        }
        self.0.dep.notify();
    }

    /// Append to an observed array and notify dependents.
    pub fn push(&self, value: impl Into<Value>) {
        {
            let mut inner = self.0.value.borrow_mut();
            if !matches!(&*inner, Value::Array(_)) {
                *inner = Value::Array(Vec::new());
            }
            if let Value::Array(items) = &mut *inner {
                items.push(value.into());
            }
        }
        self.0.dep.notify();
    }

    /// Tracked whole-value read.
    pub fn with<R>(&self, f: impl FnOnce(&Value) -> R) -> R {
        self.depend();
        self.with_untracked(f)
    }

    pub fn with_untracked<R>(&self, f: impl FnOnce(&Value) -> R) -> R {
        f(&self.0.value.borrow())
    }
}

impl PartialEq for Observed {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Observed {
    // Observed graphs may be cyclic, so only the identity is printed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Observed(#{:x})", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observed_clones_share_state() {
        let a = Observed::new(Value::Object(BTreeMap::new()));
        let b = a.clone();
        b.set("color", "red");
        assert_eq!(a.get("color"), Value::from("red"));
        assert_eq!(a, b);
    }

    #[test]
    fn primitive_classification() {
        assert!(Value::from("x").is_primitive());
        assert!(Value::from(1).is_primitive());
        assert!(!Value::Null.is_primitive());
        assert!(Value::Array(vec![]).is_composite());
    }

    #[test]
    fn numbers_print_like_text() {
        assert_eq!(Value::from(3).to_string(), "3");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(format_number(f64::NAN), "NaN");
    }
}
