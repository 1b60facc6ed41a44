//! The element factory: one render call in, one descriptor (or fragment) out.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::component::{ComponentCtor, ComponentOptions, ComponentRef, ComponentResolver, DefaultResolver};
use crate::config::PlatformConfig;
use crate::context::RenderContext;
use crate::data::VNodeData;
use crate::deep_bindings::DeepBindings;
use crate::diagnostics::{DiagnosticSink, LogSink};
use crate::namespace::apply_ns;
use crate::normalize::{Child, NormalizationType, Primitive, normalize};
use crate::registry::resolve_asset;
use crate::{ElementNode, TagSpec, VNode, empty};

/// Key marker that lets a non-primitive key through without a warning.
const BINDING_KEY_MARKER: &str = "@binding";

/// Result of a render call. Never undefined: failures produce an empty placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Node(VNode),
    /// Several roots, e.g. from a functional component.
    Fragment(Vec<VNode>),
}

impl Rendered {
    pub fn into_node(self) -> Option<VNode> {
        match self {
            Rendered::Node(node) => Some(node),
            Rendered::Fragment(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&VNode> {
        match self {
            Rendered::Node(node) => Some(node),
            Rendered::Fragment(_) => None,
        }
    }

    pub fn into_nodes(self) -> Vec<VNode> {
        match self {
            Rendered::Node(node) => vec![node],
            Rendered::Fragment(nodes) => nodes,
        }
    }
}

/// A positional argument of [`ElementFactory::create_element`]. What it means
/// depends on where it appears; see the method docs.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Arg {
    #[default]
    Absent,
    Data(VNodeData),
    Children(Vec<Child>),
    Primitive(Primitive),
    Normalization(NormalizationType),
}

impl From<()> for Arg {
    fn from(_: ()) -> Self {
        Arg::Absent
    }
}
impl From<VNodeData> for Arg {
    fn from(data: VNodeData) -> Self {
        Arg::Data(data)
    }
}
impl From<Option<VNodeData>> for Arg {
    fn from(data: Option<VNodeData>) -> Self {
        data.map_or(Arg::Absent, Arg::Data)
    }
}
impl From<Vec<Child>> for Arg {
    fn from(children: Vec<Child>) -> Self {
        Arg::Children(children)
    }
}
impl From<Vec<VNode>> for Arg {
    fn from(children: Vec<VNode>) -> Self {
        Arg::Children(children.into_iter().map(Child::Node).collect())
    }
}
impl From<Primitive> for Arg {
    fn from(p: Primitive) -> Self {
        Arg::Primitive(p)
    }
}
impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Primitive(Primitive::Str(s.to_string()))
    }
}
impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Primitive(Primitive::Str(s))
    }
}
impl From<f64> for Arg {
    fn from(n: f64) -> Self {
        Arg::Primitive(Primitive::Number(n))
    }
}
impl From<NormalizationType> for Arg {
    fn from(mode: NormalizationType) -> Self {
        Arg::Normalization(mode)
    }
}

impl Arg {
    fn is_children(&self) -> bool {
        matches!(self, Arg::Children(_) | Arg::Primitive(_))
    }

    fn into_data(self) -> Option<VNodeData> {
        match self {
            Arg::Data(data) => Some(data),
            Arg::Absent => None,
            other => {
                log::debug!("ignoring {other:?} in data position");
                None
            }
        }
    }

    fn into_children(self) -> Option<Vec<Child>> {
        match self {
            Arg::Children(children) => Some(children),
            Arg::Primitive(p) => Some(vec![Child::Primitive(p)]),
            Arg::Absent => None,
            other => {
                log::debug!("ignoring {other:?} in children position");
                None
            }
        }
    }

    fn into_normalization(self) -> NormalizationType {
        match self {
            Arg::Normalization(mode) => mode,
            _ => NormalizationType::None,
        }
    }
}

/// Anything usable as the tag of a render call. `None` and `""` are falsy.
pub trait IntoTag {
    fn into_tag(self) -> Option<TagSpec>;
}

impl IntoTag for TagSpec {
    fn into_tag(self) -> Option<TagSpec> {
        Some(self)
    }
}
impl IntoTag for Option<TagSpec> {
    fn into_tag(self) -> Option<TagSpec> {
        self
    }
}
impl IntoTag for &str {
    fn into_tag(self) -> Option<TagSpec> {
        Some(TagSpec::Native(self.to_string()))
    }
}
impl IntoTag for String {
    fn into_tag(self) -> Option<TagSpec> {
        Some(TagSpec::Native(self))
    }
}
impl IntoTag for ComponentRef {
    fn into_tag(self) -> Option<TagSpec> {
        Some(self.into())
    }
}
impl IntoTag for Rc<ComponentOptions> {
    fn into_tag(self) -> Option<TagSpec> {
        Some(TagSpec::Definition(self))
    }
}
impl IntoTag for Rc<ComponentCtor> {
    fn into_tag(self) -> Option<TagSpec> {
        Some(TagSpec::Constructor(self))
    }
}
impl IntoTag for () {
    fn into_tag(self) -> Option<TagSpec> {
        None
    }
}

/// Builds descriptors against one platform configuration.
///
/// The configuration, resolver and sink are borrowed read-only; a factory is
/// cheap to copy and safe to call re-entrantly (functional components do).
#[derive(Clone, Copy)]
pub struct ElementFactory<'a> {
    config: &'a PlatformConfig,
    resolver: &'a dyn ComponentResolver,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> ElementFactory<'a> {
    pub fn new(config: &'a PlatformConfig) -> Self {
        ElementFactory {
            config,
            resolver: &DefaultResolver,
            sink: &LogSink,
        }
    }

    pub fn with_resolver(mut self, resolver: &'a dyn ComponentResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_sink(mut self, sink: &'a dyn DiagnosticSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &'a PlatformConfig {
        self.config
    }

    /// The flexible entry point.
    ///
    /// If `data` holds children (a list or a primitive), the arguments shift:
    /// `data` becomes the children and `children` the normalization hint.
    /// `always_normalize` forces [`NormalizationType::Always`] whatever the hint.
    pub fn create_element(
        &self,
        context: &Rc<RenderContext>,
        tag: impl IntoTag,
        data: impl Into<Arg>,
        children: impl Into<Arg>,
        normalization: impl Into<Arg>,
        always_normalize: bool,
    ) -> Rendered {
        let mut data = data.into();
        let mut children = children.into();
        let mut normalization = normalization.into();
        if data.is_children() {
            normalization = children;
            children = data;
            data = Arg::Absent;
        }
        let mode = if always_normalize {
            NormalizationType::Always
        } else {
            normalization.into_normalization()
        };
        self.create(
            context,
            tag.into_tag(),
            data.into_data(),
            children.into_children(),
            mode,
        )
    }

    /// For hand-written render functions: children are always fully normalized.
    pub fn h(
        &self,
        context: &Rc<RenderContext>,
        tag: impl IntoTag,
        data: impl Into<Arg>,
        children: impl Into<Arg>,
    ) -> Rendered {
        self.create_element(context, tag, data, children, (), true)
    }

    /// For generated render code, which states how much normalization it needs.
    pub fn c(
        &self,
        context: &Rc<RenderContext>,
        tag: impl IntoTag,
        data: impl Into<Arg>,
        children: impl Into<Arg>,
        normalization: impl Into<Arg>,
    ) -> Rendered {
        self.create_element(context, tag, data, children, normalization, false)
    }

    /// The construction routine proper, on already-resolved arguments.
    pub fn create(
        &self,
        context: &Rc<RenderContext>,
        tag: Option<TagSpec>,
        mut data: Option<VNodeData>,
        children: Option<Vec<Child>>,
        mode: NormalizationType,
    ) -> Rendered {
        if let Some(d) = data.as_ref().filter(|d| d.is_observed()) {
            self.warn(
                &format!(
                    "Avoid using observed data object as vnode data: {d:?}\n\
                     Always create fresh vnode data objects in each render!"
                ),
                context,
            );
            return Rendered::Node(empty());
        }

        // object syntax in v-bind
        let tag = data.as_ref().and_then(|d| d.is.clone()).or(tag);
        let Some(tag) = tag.filter(|t| !t.is_falsy()) else {
            // a dynamic component bound to nothing
            return Rendered::Node(empty());
        };

        if let Some(key) = data.as_ref().and_then(|d| d.key.as_ref()) {
            if !key.is_null() && !key.is_primitive() && !key.has_key(BINDING_KEY_MARKER) {
                self.warn(
                    "Avoid using non-primitive value as key, use string/number value instead.",
                    context,
                );
            }
        }

        let mut children = children.unwrap_or_default();
        if let Some(Child::Slot(slot)) = children.first() {
            let slot = slot.clone();
            data.get_or_insert_with(VNodeData::new).scoped_slots =
                Some(BTreeMap::from([("default".to_string(), slot)]));
            children.clear();
        }

        let children = normalize(children, mode);
        let deep = data.as_ref().map(DeepBindings::capture);

        let mut ns = None;
        let resolved = match tag {
            TagSpec::Native(name) => {
                ns = context.vnode_ns.or_else(|| self.config.tag_namespace(&name));
                self.create_native(context, name, data, children)
            }
            TagSpec::Definition(options) => self.resolver.resolve(
                self,
                ComponentRef::Definition(options),
                data,
                context,
                children,
                None,
            ),
            TagSpec::Constructor(ctor) => self.resolver.resolve(
                self,
                ComponentRef::Constructor(ctor),
                data,
                context,
                children,
                None,
            ),
        };

        match resolved {
            Some(Rendered::Fragment(nodes)) => Rendered::Fragment(nodes),
            Some(Rendered::Node(mut vnode)) => {
                if ns.is_some() {
                    apply_ns(&mut vnode, ns, false);
                }
                if let Some(deep) = deep {
                    deep.register();
                }
                Rendered::Node(vnode)
            }
            None => {
                log::debug!("component resolution produced nothing; using an empty placeholder");
                Rendered::Node(empty())
            }
        }
    }

    fn create_native(
        &self,
        context: &Rc<RenderContext>,
        tag: String,
        data: Option<VNodeData>,
        children: Vec<VNode>,
    ) -> Option<Rendered> {
        if self.config.is_reserved_tag(&tag) {
            if data.as_ref().is_some_and(|d| d.native_on.is_some()) {
                self.warn(
                    &format!(
                        "The .native modifier for v-on is only valid on components \
                         but it was used on <{tag}>."
                    ),
                    context,
                );
            }
            let tag = self.config.parse_platform_tag_name(&tag);
            return Some(Rendered::Node(VNode::Element(ElementNode::new(
                tag, data, children, context,
            ))));
        }

        let pre = data.as_ref().is_some_and(|d| d.pre);
        if !pre {
            if let Some(component) = resolve_asset(&context.components, &tag) {
                log::trace!("<{tag}> resolved to a registered component");
                return self
                    .resolver
                    .resolve(self, component, data, context, children, Some(tag.as_str()));
            }
        }

        // Unknown or unlisted namespaced element. An ancestor may still assign
        // it a namespace when it propagates its own.
        Some(Rendered::Node(VNode::Element(ElementNode::new(
            tag, data, children, context,
        ))))
    }

    fn warn(&self, message: &str, context: &RenderContext) {
        if self.config.is_development() {
            self.sink.report(message, Some(context));
        }
    }
}
