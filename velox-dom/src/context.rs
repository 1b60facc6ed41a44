use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::Namespace;
use crate::registry::ComponentRegistry;

static NEXT_UID: AtomicUsize = AtomicUsize::new(0);

/// The component instance a render call runs in. Read-only during construction.
#[derive(Debug)]
pub struct RenderContext {
    pub uid: usize,
    pub name: Option<String>,
    pub components: ComponentRegistry,
    /// Namespace of this instance's own placeholder in its parent's tree.
    pub vnode_ns: Option<Namespace>,
    parent: Option<Weak<RenderContext>>,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext {
    pub fn new() -> Self {
        RenderContext {
            uid: NEXT_UID.fetch_add(1, Ordering::Relaxed),
            name: None,
            components: ComponentRegistry::new(),
            vnode_ns: None,
            parent: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_components(mut self, components: ComponentRegistry) -> Self {
        self.components = components;
        self
    }

    pub fn with_namespace(mut self, ns: Namespace) -> Self {
        self.vnode_ns = Some(ns);
        self
    }

    pub fn child_of(mut self, parent: &Rc<RenderContext>) -> Self {
        self.parent = Some(Rc::downgrade(parent));
        self
    }

    pub fn into_rc(self) -> Rc<Self> {
        Rc::new(self)
    }

    pub fn parent(&self) -> Option<Rc<RenderContext>> {
        self.parent.as_ref()?.upgrade()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
