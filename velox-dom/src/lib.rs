//! Render-tree construction: turns one render call into node descriptors.
//!
//! The entry point is [`ElementFactory`]. It resolves tags against the
//! [`PlatformConfig`] and the context's component registry, normalizes
//! children, propagates namespaces and registers deep style/class bindings.

use std::fmt;
use std::rc::{Rc, Weak};

use velox_core::Value;

pub mod component;
pub mod config;
pub mod context;
pub mod create_element;
pub mod data;
pub mod deep_bindings;
pub mod diagnostics;
pub mod error;
pub mod namespace;
pub mod normalize;
pub mod registry;

pub use component::{
    ComponentCtor, ComponentOptions, ComponentRef, ComponentResolver, DefaultResolver,
    FunctionalContext,
};
pub use config::{DiagnosticLevel, Namespace, PlatformConfig};
pub use context::RenderContext;
pub use create_element::{Arg, ElementFactory, IntoTag, Rendered};
pub use data::{Handler, ScopedSlot, VNodeData};
pub use diagnostics::{DiagnosticSink, LogSink, MemorySink};
pub use error::ConfigError;
pub use normalize::{Child, NormalizationType, Primitive};
pub use registry::{ComponentRegistry, resolve_asset};

/// What a render call asks for: a native tag name or a component.
#[derive(Debug, Clone, PartialEq)]
pub enum TagSpec {
    Native(String),
    Definition(Rc<ComponentOptions>),
    Constructor(Rc<ComponentCtor>),
}

impl TagSpec {
    /// Only an empty tag name is falsy; an absent tag is `None` at the call site.
    pub fn is_falsy(&self) -> bool {
        matches!(self, TagSpec::Native(name) if name.is_empty())
    }
}

impl From<&str> for TagSpec {
    fn from(name: &str) -> Self {
        TagSpec::Native(name.to_string())
    }
}

impl From<String> for TagSpec {
    fn from(name: String) -> Self {
        TagSpec::Native(name)
    }
}

impl From<ComponentRef> for TagSpec {
    fn from(c: ComponentRef) -> Self {
        match c {
            ComponentRef::Definition(options) => TagSpec::Definition(options),
            ComponentRef::Constructor(ctor) => TagSpec::Constructor(ctor),
        }
    }
}

/// Non-owning link from a descriptor back to the context that rendered it.
#[derive(Clone, Default)]
pub struct ContextRef(Weak<RenderContext>);

impl ContextRef {
    pub fn new(ctx: &Rc<RenderContext>) -> Self {
        ContextRef(Rc::downgrade(ctx))
    }

    pub fn get(&self) -> Option<Rc<RenderContext>> {
        self.0.upgrade()
    }

    pub fn is(&self, ctx: &Rc<RenderContext>) -> bool {
        std::ptr::eq(self.0.as_ptr(), Rc::as_ptr(ctx))
    }
}

impl PartialEq for ContextRef {
    fn eq(&self, other: &Self) -> bool {
        self.0.ptr_eq(&other.0)
    }
}

impl fmt::Debug for ContextRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(ctx) => write!(f, "ContextRef({})", diagnostics::format_component_name(Some(&*ctx))),
            None => f.write_str("ContextRef(<dropped>)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub tag: String,
    pub data: Option<VNodeData>,
    pub children: Vec<VNode>,
    pub key: Option<Value>,
    pub ns: Option<Namespace>,
    pub context: ContextRef,
}

impl ElementNode {
    pub fn new(
        tag: impl Into<String>,
        data: Option<VNodeData>,
        children: Vec<VNode>,
        context: &Rc<RenderContext>,
    ) -> Self {
        let key = data.as_ref().and_then(|d| d.key.clone());
        ElementNode {
            tag: tag.into(),
            data,
            children,
            key,
            ns: None,
            context: ContextRef::new(context),
        }
    }
}

/// Inputs a component placeholder hands to the instance created at patch time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComponentVNodeOptions {
    pub props_data: std::collections::BTreeMap<String, Value>,
    pub listeners: std::collections::BTreeMap<String, Handler>,
    /// Slot content. Rendered by the child, so namespaces never descend here.
    pub children: Vec<VNode>,
    /// Name the component was referenced by, if it came from a string tag.
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentNode {
    /// `velox-component-{cid}-{name}`
    pub tag: String,
    pub ctor: Rc<ComponentCtor>,
    pub data: VNodeData,
    pub key: Option<Value>,
    pub options: ComponentVNodeOptions,
    pub ns: Option<Namespace>,
    pub context: ContextRef,
}

impl ComponentNode {
    /// Whether this placeholder was built from `component` (definition or constructor).
    pub fn is_instance_of(&self, component: &ComponentRef) -> bool {
        match component {
            ComponentRef::Definition(options) => Rc::ptr_eq(&self.ctor.options, options),
            ComponentRef::Constructor(ctor) => {
                self.ctor.cid == ctor.cid && Rc::ptr_eq(&self.ctor.options, &ctor.options)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VNode {
    Element(ElementNode),
    Component(ComponentNode),
    Text(String),
    /// Empty placeholder. Rendered as a comment node.
    Comment(String),
}

impl VNode {
    /// Descriptors with a tag take part in namespace propagation.
    pub fn has_tag(&self) -> bool {
        matches!(self, VNode::Element(_) | VNode::Component(_))
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            VNode::Element(el) => Some(el.tag.as_str()),
            VNode::Component(c) => Some(c.tag.as_str()),
            VNode::Text(_) | VNode::Comment(_) => None,
        }
    }

    pub fn ns(&self) -> Option<Namespace> {
        match self {
            VNode::Element(el) => el.ns,
            VNode::Component(c) => c.ns,
            VNode::Text(_) | VNode::Comment(_) => None,
        }
    }

    pub fn data(&self) -> Option<&VNodeData> {
        match self {
            VNode::Element(el) => el.data.as_ref(),
            VNode::Component(c) => Some(&c.data),
            VNode::Text(_) | VNode::Comment(_) => None,
        }
    }

    pub fn key(&self) -> Option<&Value> {
        match self {
            VNode::Element(el) => el.key.as_ref(),
            VNode::Component(c) => c.key.as_ref(),
            VNode::Text(_) | VNode::Comment(_) => None,
        }
    }

    pub(crate) fn set_key(&mut self, key: Value) {
        match self {
            VNode::Element(el) => el.key = Some(key),
            VNode::Component(c) => c.key = Some(key),
            VNode::Text(_) | VNode::Comment(_) => {}
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element(el) => &el.children,
            _ => &[],
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            VNode::Text(t) => Some(t.as_str()),
            _ => None,
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, VNode::Comment(_))
    }

    /// An empty placeholder produced by a structural fallback.
    pub fn is_empty_placeholder(&self) -> bool {
        matches!(self, VNode::Comment(t) if t.is_empty())
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            VNode::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<&ComponentNode> {
        match self {
            VNode::Component(c) => Some(c),
            _ => None,
        }
    }
}

pub fn text(t: impl Into<String>) -> VNode {
    VNode::Text(t.into())
}

pub fn empty() -> VNode {
    VNode::Comment(String::new())
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &VNode, depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);
    match node {
        VNode::Text(t) => writeln!(f, "{indent}{t:?}"),
        VNode::Comment(t) => writeln!(f, "{indent}<!--{t}-->"),
        VNode::Element(el) => {
            write!(f, "{indent}<{}", el.tag)?;
            write_common(f, el.ns, el.key.as_ref())?;
            if let Some(data) = &el.data {
                for (name, value) in &data.attrs {
                    write!(f, " {name}=\"{value}\"")?;
                }
            }
            if el.children.is_empty() {
                return writeln!(f, " />");
            }
            writeln!(f, ">")?;
            for child in &el.children {
                write_node(f, child, depth + 1)?;
            }
            writeln!(f, "{indent}</{}>", el.tag)
        }
        VNode::Component(c) => {
            write!(f, "{indent}<{}", c.tag)?;
            write_common(f, c.ns, c.key.as_ref())?;
            for (name, value) in &c.options.props_data {
                write!(f, " :{name}=\"{value}\"")?;
            }
            for name in c.options.listeners.keys() {
                write!(f, " @{name}")?;
            }
            if c.options.children.is_empty() {
                return writeln!(f, " />");
            }
            writeln!(f, ">")?;
            for child in &c.options.children {
                write_node(f, child, depth + 1)?;
            }
            writeln!(f, "{indent}</{}>", c.tag)
        }
    }
}

fn write_common(f: &mut fmt::Formatter<'_>, ns: Option<Namespace>, key: Option<&Value>) -> fmt::Result {
    if let Some(ns) = ns {
        write!(f, " xmlns=\"{ns}\"")?;
    }
    if let Some(key) = key {
        write!(f, " key=\"{key}\"")?;
    }
    Ok(())
}

/// Indented pseudo-markup, one node per line.
impl fmt::Display for VNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_tree() {
        let ctx = RenderContext::new().named("App").into_rc();
        let span = ElementNode::new("span", None, vec![text("world")], &ctx);
        let node = VNode::Element(ElementNode::new(
            "div",
            Some(VNodeData::new().attr("class", "app")),
            vec![text("hello"), VNode::Element(span)],
            &ctx,
        ));
        if let VNode::Element(ElementNode { tag, data, children, context, .. }) = &node {
            assert_eq!(tag, "div");
            assert_eq!(data.as_ref().unwrap().attrs.get("class"), Some(&Value::from("app")));
            assert_eq!(children.len(), 2);
            assert!(context.is(&ctx));
        } else {
            panic!("expected element");
        }
    }

    #[test]
    fn display_renders_markup() {
        let ctx = RenderContext::new().into_rc();
        let mut circle = ElementNode::new("circle", None, vec![], &ctx);
        circle.ns = Some(Namespace::Svg);
        let mut svg = ElementNode::new("svg", None, vec![VNode::Element(circle)], &ctx);
        svg.ns = Some(Namespace::Svg);
        let out = VNode::Element(svg).to_string();
        assert_eq!(
            out,
            "<svg xmlns=\"svg\">\n  <circle xmlns=\"svg\" />\n</svg>\n"
        );
        assert_eq!(empty().to_string(), "<!---->\n");
    }
}
