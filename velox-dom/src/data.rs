use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use velox_core::{Observed, Value};

use crate::{TagSpec, VNode};

/// Slot content the receiving component renders itself, given slot props.
#[derive(Clone)]
pub struct ScopedSlot(Rc<dyn Fn(&Value) -> Vec<VNode>>);

impl ScopedSlot {
    pub fn new(f: impl Fn(&Value) -> Vec<VNode> + 'static) -> Self {
        ScopedSlot(Rc::new(f))
    }

    pub fn call(&self, props: &Value) -> Vec<VNode> {
        (self.0)(props)
    }

    pub fn ptr_eq(&self, other: &ScopedSlot) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ScopedSlot {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ScopedSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopedSlot({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

/// Event listener.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&Value)>);

impl Handler {
    pub fn new(f: impl Fn(&Value) + 'static) -> Self {
        Handler(Rc::new(f))
    }

    /// A listener that does nothing; used when only the event name matters.
    pub fn noop() -> Self {
        Handler::new(|_| {})
    }

    pub fn call(&self, payload: &Value) {
        (self.0)(payload)
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

/// The data bag of a render call. Only `key`, `is`, `pre`, `native_on`,
/// `style`, `class` and `scoped_slots` are inspected during construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VNodeData {
    pub key: Option<Value>,
    pub is: Option<TagSpec>,
    pub pre: bool,
    pub slot: Option<String>,
    pub ref_name: Option<String>,
    pub attrs: BTreeMap<String, Value>,
    pub props: BTreeMap<String, Value>,
    pub on: BTreeMap<String, Handler>,
    pub native_on: Option<BTreeMap<String, Handler>>,
    pub style: Option<Value>,
    pub class: Option<Value>,
    pub scoped_slots: Option<BTreeMap<String, ScopedSlot>>,
    observer: Option<Observed>,
}

impl VNodeData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an observed object as a data bag. The result keeps the observation
    /// marker, so the factory refuses it.
    pub fn from_observed(source: &Observed) -> Self {
        let mut data = source.with_untracked(|value| match value {
            Value::Object(map) => {
                let mut data = VNodeData::new();
                data.key = map.get("key").cloned().filter(|k| !k.is_null());
                data.style = map.get("style").cloned();
                data.class = map.get("class").cloned();
                data.slot = map.get("slot").and_then(Value::as_str).map(str::to_string);
                if let Some(Value::Object(attrs)) = map.get("attrs") {
                    data.attrs = attrs.clone();
                }
                if let Some(Value::Object(props)) = map.get("props") {
                    data.props = props.clone();
                }
                data
            }
            _ => VNodeData::new(),
        });
        data.observer = Some(source.clone());
        data
    }

    /// Carries the observation marker.
    pub fn is_observed(&self) -> bool {
        self.observer.is_some()
    }

    pub fn observer(&self) -> Option<&Observed> {
        self.observer.as_ref()
    }

    pub fn key(mut self, key: impl Into<Value>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Dynamic component shorthand: the tag to render instead of the call's tag.
    pub fn is(mut self, tag: impl Into<TagSpec>) -> Self {
        self.is = Some(tag.into());
        self
    }

    /// Marks a raw block: string tags are never resolved as components.
    pub fn pre(mut self) -> Self {
        self.pre = true;
        self
    }

    pub fn slot(mut self, name: impl Into<String>) -> Self {
        self.slot = Some(name.into());
        self
    }

    pub fn ref_name(mut self, name: impl Into<String>) -> Self {
        self.ref_name = Some(name.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    pub fn on(mut self, event: impl Into<String>, handler: Handler) -> Self {
        self.on.insert(event.into(), handler);
        self
    }

    pub fn native_on(mut self, event: impl Into<String>, handler: Handler) -> Self {
        self.native_on
            .get_or_insert_with(BTreeMap::new)
            .insert(event.into(), handler);
        self
    }

    pub fn style(mut self, style: impl Into<Value>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn class(mut self, class: impl Into<Value>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn scoped_slot(mut self, name: impl Into<String>, slot: ScopedSlot) -> Self {
        self.scoped_slots
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), slot);
        self
    }

    pub fn default_scoped_slot(&self) -> Option<&ScopedSlot> {
        self.scoped_slots.as_ref()?.get("default")
    }
}
