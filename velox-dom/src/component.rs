//! Component definitions and the resolution step that turns a component tag
//! into a placeholder descriptor (or, for functional components, into the
//! descriptors they render).

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use velox_core::Value;

use crate::context::RenderContext;
use crate::create_element::{ElementFactory, Rendered};
use crate::data::VNodeData;
use crate::registry::hyphenate;
use crate::{ComponentNode, ComponentVNodeOptions, ContextRef, VNode};

static NEXT_CID: AtomicUsize = AtomicUsize::new(1);

pub type FunctionalRender = Rc<dyn Fn(&FunctionalContext<'_, '_>) -> Option<Rendered>>;

/// What a functional component's render function receives.
pub struct FunctionalContext<'a, 'f> {
    pub factory: &'a ElementFactory<'f>,
    pub parent: &'a Rc<RenderContext>,
    pub props: BTreeMap<String, Value>,
    pub data: VNodeData,
    pub children: Vec<VNode>,
}

/// A component definition as registered by the user.
pub struct ComponentOptions {
    pub name: Option<String>,
    /// Declared prop names, in camelCase.
    pub props: Vec<String>,
    pub functional: Option<FunctionalRender>,
    cid: OnceCell<usize>,
}

impl ComponentOptions {
    pub fn new() -> Self {
        ComponentOptions {
            name: None,
            props: Vec::new(),
            functional: None,
            cid: OnceCell::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_props<I, S>(mut self, props: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.props.extend(props.into_iter().map(Into::into));
        self
    }

    /// Render eagerly, without an instance. The result may be a fragment.
    pub fn functional(
        mut self,
        render: impl Fn(&FunctionalContext<'_, '_>) -> Option<Rendered> + 'static,
    ) -> Self {
        self.functional = Some(Rc::new(render));
        self
    }

    pub fn into_rc(self) -> Rc<Self> {
        Rc::new(self)
    }
}

impl Default for ComponentOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for ComponentOptions {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl fmt::Debug for ComponentOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentOptions")
            .field("name", &self.name)
            .field("props", &self.props)
            .field("functional", &self.functional.is_some())
            .finish()
    }
}

/// A definition extended into something instantiable, identified by `cid`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentCtor {
    pub cid: usize,
    pub options: Rc<ComponentOptions>,
}

impl ComponentCtor {
    /// Extending the same definition twice yields the same `cid`.
    pub fn extend(options: &Rc<ComponentOptions>) -> Rc<ComponentCtor> {
        let cid = *options
            .cid
            .get_or_init(|| NEXT_CID.fetch_add(1, Ordering::Relaxed));
        Rc::new(ComponentCtor {
            cid,
            options: options.clone(),
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.options.name.as_deref()
    }
}

/// A registry entry: a plain definition or an already extended constructor.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentRef {
    Definition(Rc<ComponentOptions>),
    Constructor(Rc<ComponentCtor>),
}

impl ComponentRef {
    pub fn options(&self) -> &Rc<ComponentOptions> {
        match self {
            ComponentRef::Definition(options) => options,
            ComponentRef::Constructor(ctor) => &ctor.options,
        }
    }

    pub fn constructor(&self) -> Rc<ComponentCtor> {
        match self {
            ComponentRef::Definition(options) => ComponentCtor::extend(options),
            ComponentRef::Constructor(ctor) => ctor.clone(),
        }
    }
}

impl From<Rc<ComponentOptions>> for ComponentRef {
    fn from(options: Rc<ComponentOptions>) -> Self {
        ComponentRef::Definition(options)
    }
}

impl From<ComponentOptions> for ComponentRef {
    fn from(options: ComponentOptions) -> Self {
        ComponentRef::Definition(Rc::new(options))
    }
}

impl From<Rc<ComponentCtor>> for ComponentRef {
    fn from(ctor: Rc<ComponentCtor>) -> Self {
        ComponentRef::Constructor(ctor)
    }
}

/// Builds the descriptor for a component tag. `None` means resolution failed;
/// the factory substitutes an empty placeholder.
pub trait ComponentResolver {
    fn resolve(
        &self,
        factory: &ElementFactory<'_>,
        component: ComponentRef,
        data: Option<VNodeData>,
        context: &Rc<RenderContext>,
        children: Vec<VNode>,
        tag: Option<&str>,
    ) -> Option<Rendered>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResolver;

impl ComponentResolver for DefaultResolver {
    fn resolve(
        &self,
        factory: &ElementFactory<'_>,
        component: ComponentRef,
        data: Option<VNodeData>,
        context: &Rc<RenderContext>,
        children: Vec<VNode>,
        tag: Option<&str>,
    ) -> Option<Rendered> {
        let ctor = component.constructor();
        let mut data = data.unwrap_or_default();
        let props_data = extract_props(&ctor.options, &mut data);

        if let Some(render) = &ctor.options.functional {
            log::trace!("rendering functional component cid={}", ctor.cid);
            let fctx = FunctionalContext {
                factory,
                parent: context,
                props: props_data,
                data,
                children,
            };
            return render(&fctx);
        }

        // Component listeners are emitted by the child; `native_on` are DOM listeners
        // on its root element.
        let listeners = std::mem::take(&mut data.on);
        if let Some(native) = data.native_on.take() {
            data.on = native;
        }

        let name = ctor.name().or(tag).unwrap_or_default();
        let tag_name = if name.is_empty() {
            format!("velox-component-{}", ctor.cid)
        } else {
            format!("velox-component-{}-{}", ctor.cid, name)
        };
        let key = data.key.clone();

        Some(Rendered::Node(VNode::Component(ComponentNode {
            tag: tag_name,
            ctor,
            data,
            key,
            options: ComponentVNodeOptions {
                props_data,
                listeners,
                children,
                tag: tag.map(str::to_string),
            },
            ns: None,
            context: ContextRef::new(context),
        })))
    }
}

/// Pull declared props out of the data bag. `props` entries are copied,
/// matching `attrs` entries are moved (they are not DOM attributes).
fn extract_props(options: &ComponentOptions, data: &mut VNodeData) -> BTreeMap<String, Value> {
    let mut res = BTreeMap::new();
    for key in &options.props {
        let alt = hyphenate(key);
        if let Some(v) = data.props.get(key).or_else(|| data.props.get(&alt)) {
            res.insert(key.clone(), v.clone());
        } else if let Some(v) = data.attrs.remove(key).or_else(|| data.attrs.remove(&alt)) {
            res.insert(key.clone(), v);
        }
    }
    res
}
