use std::rc::Rc;

use velox_core::Value;
use velox_dom::{
    ComponentCtor, ComponentOptions, ComponentRef, ComponentRegistry, ComponentResolver,
    ElementFactory, Handler, PlatformConfig, Rendered, RenderContext, VNode, VNodeData,
    resolve_asset, text,
};

fn node(r: Rendered) -> VNode {
    r.into_node().expect("single node")
}

fn context_with(registry: ComponentRegistry) -> Rc<RenderContext> {
    RenderContext::new().with_components(registry).into_rc()
}

#[test]
fn registered_name_builds_a_component_placeholder() {
    let config = PlatformConfig::web();
    let f = ElementFactory::new(&config);
    let def = ComponentOptions::new().into_rc();
    let ctx = context_with(ComponentRegistry::new().register("my-widget", def.clone()));

    let out = node(f.h(&ctx, "my-widget", VNodeData::new().key("w"), vec![text("slot")]));
    assert!(out.as_element().is_none());
    let component = out.as_component().expect("component");
    assert!(component.is_instance_of(&ComponentRef::Definition(def)));
    assert_eq!(
        component.tag,
        format!("velox-component-{}-my-widget", component.ctor.cid)
    );
    assert_eq!(component.key, Some(Value::from("w")));
    assert_eq!(component.options.tag.as_deref(), Some("my-widget"));
    assert_eq!(component.options.children, vec![text("slot")]);
    assert!(component.context.is(&ctx));
}

#[test]
fn camel_and_pascal_registrations_are_found() {
    let config = PlatformConfig::web();
    let f = ElementFactory::new(&config);
    let camel = ComponentOptions::new().into_rc();
    let pascal = ComponentOptions::new().into_rc();
    let ctx = context_with(
        ComponentRegistry::new()
            .register("todoItem", camel.clone())
            .register("UserCard", pascal.clone()),
    );

    let out = node(f.h(&ctx, "todo-item", (), ()));
    assert!(out.as_component().expect("component").is_instance_of(&camel.into()));
    let out = node(f.h(&ctx, "user-card", (), ()));
    assert!(out.as_component().expect("component").is_instance_of(&pascal.into()));
}

#[test]
fn parent_registries_are_searched_after_own() {
    let own = ComponentOptions::new().into_rc();
    let inherited = ComponentOptions::new().into_rc();
    let global = Rc::new(
        ComponentRegistry::new()
            .register("my-widget", inherited.clone())
            .register("app-footer", inherited.clone()),
    );
    let local = ComponentRegistry::new()
        .with_parent(global)
        .register("MyWidget", own.clone());

    // every spelling at the own level beats the exact name in a parent
    assert_eq!(resolve_asset(&local, "my-widget"), Some(ComponentRef::Definition(own)));
    assert_eq!(
        resolve_asset(&local, "app-footer"),
        Some(ComponentRef::Definition(inherited))
    );
    assert_eq!(resolve_asset(&local, "missing"), None);
}

#[test]
fn unknown_and_pre_tags_stay_elements() {
    let config = PlatformConfig::web();
    let f = ElementFactory::new(&config);
    let def = ComponentOptions::new().into_rc();
    let ctx = context_with(ComponentRegistry::new().register("my-widget", def));

    let out = node(f.h(&ctx, "my-widget", VNodeData::new().pre(), ()));
    assert_eq!(out.as_element().expect("element").tag, "my-widget");

    let out = node(f.h(&ctx, "not-registered", (), ()));
    assert_eq!(out.as_element().expect("element").tag, "not-registered");
    assert_eq!(out.ns(), None);
}

#[test]
fn reserved_tags_win_over_registrations() {
    let config = PlatformConfig::web();
    let f = ElementFactory::new(&config);
    let ctx = context_with(ComponentRegistry::new().register("div", ComponentOptions::new()));

    let out = node(f.h(&ctx, "div", (), ()));
    assert!(out.as_element().is_some());
}

#[test]
fn pascal_case_names_are_not_shadowed_by_html_tags() {
    let config = PlatformConfig::web();
    let f = ElementFactory::new(&config);
    let def = ComponentOptions::new().into_rc();
    let ctx = context_with(ComponentRegistry::new().register("Button", def.clone()));

    let out = node(f.h(&ctx, "Button", (), ()));
    assert!(matches!(out, VNode::Component(_)), "{out}");
    assert!(out.as_component().expect("component").is_instance_of(&def.into()));

    // the lowercase html tag still wins
    let out = node(f.h(&ctx, "button", (), ()));
    assert_eq!(out.as_element().expect("element").tag, "button");

    // svg names keep matching in any case
    let out = node(f.h(&ctx, "clipPath", (), ()));
    assert_eq!(out.as_element().expect("element").tag, "clipPath");
}

#[test]
fn platform_prefix_is_stripped_from_reserved_tags() {
    let config = PlatformConfig::empty()
        .with_reserved_tag("weex:div")
        .with_tag_prefix("weex:");
    let f = ElementFactory::new(&config);
    let ctx = RenderContext::new().into_rc();

    let out = node(f.h(&ctx, "weex:div", (), ()));
    assert_eq!(out.tag(), Some("div"));
}

#[test]
fn definitions_and_constructors_as_tags() {
    let config = PlatformConfig::web();
    let f = ElementFactory::new(&config);
    let ctx = RenderContext::new().into_rc();
    let def = ComponentOptions::new().named("counter").into_rc();

    let a = node(f.h(&ctx, def.clone(), (), ()));
    let b = node(f.h(&ctx, def.clone(), (), ()));
    let a = a.as_component().expect("component");
    let b = b.as_component().expect("component");
    assert_eq!(a.ctor.cid, b.ctor.cid);
    assert_eq!(a.tag, format!("velox-component-{}-counter", a.ctor.cid));

    let ctor = ComponentCtor::extend(&def);
    assert_eq!(ctor.cid, a.ctor.cid);
    let c = node(f.h(&ctx, ctor.clone(), (), ()));
    assert!(c.as_component().expect("component").is_instance_of(&ctor.into()));

    let anonymous = ComponentOptions::new().into_rc();
    let d = node(f.h(&ctx, anonymous, (), ()));
    let d = d.as_component().expect("component");
    assert_eq!(d.tag, format!("velox-component-{}", d.ctor.cid));
}

#[test]
fn props_and_listeners_are_extracted() {
    let config = PlatformConfig::web();
    let f = ElementFactory::new(&config);
    let def = ComponentOptions::new()
        .with_props(["userName", "size"])
        .into_rc();
    let ctx = RenderContext::new().into_rc();

    let data = VNodeData::new()
        .attr("user-name", "ada")
        .attr("title", "card")
        .prop("size", 3)
        .on("select", Handler::noop())
        .native_on("click", Handler::noop());
    let out = node(f.h(&ctx, def, data, ()));
    let component = out.as_component().expect("component");

    assert_eq!(component.options.props_data.get("userName"), Some(&Value::from("ada")));
    assert_eq!(component.options.props_data.get("size"), Some(&Value::from(3)));
    assert!(!component.data.attrs.contains_key("user-name"));
    assert!(component.data.attrs.contains_key("title"));

    assert!(component.options.listeners.contains_key("select"));
    assert!(component.data.on.contains_key("click"));
    assert!(component.data.native_on.is_none());
}

#[test]
fn functional_components_may_render_fragments() {
    let config = PlatformConfig::web();
    let f = ElementFactory::new(&config);
    let list = ComponentOptions::new()
        .with_props(["count"])
        .functional(|fctx| {
            let count = match fctx.props.get("count") {
                Some(Value::Number(n)) => *n as usize,
                _ => 0,
            };
            let items = (0..count)
                .map(|i| fctx.factory.h(fctx.parent, "li", (), i.to_string()).into_node())
                .collect::<Option<Vec<_>>>()?;
            Some(Rendered::Fragment(items))
        })
        .into_rc();
    let ctx = RenderContext::new()
        .with_components(ComponentRegistry::new().register("item-list", list))
        .into_rc();

    let out = f.h(&ctx, "item-list", VNodeData::new().attr("count", 2), ());
    let items = match out {
        Rendered::Fragment(items) => items,
        other => panic!("expected fragment, got {other:?}"),
    };
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].children(), &[text("1")]);
}

#[test]
fn functional_single_root_is_returned_as_node() {
    let config = PlatformConfig::web();
    let f = ElementFactory::new(&config);
    let badge = ComponentOptions::new()
        .functional(|fctx| {
            let children = fctx.children.clone();
            Some(fctx.factory.h(fctx.parent, "span", (), children))
        })
        .into_rc();
    let ctx = RenderContext::new().into_rc();

    let out = node(f.h(&ctx, badge, (), vec![text("new")]));
    assert_eq!(out.tag(), Some("span"));
    assert_eq!(out.children(), &[text("new")]);
}

struct NothingResolver;

impl ComponentResolver for NothingResolver {
    fn resolve(
        &self,
        _factory: &ElementFactory<'_>,
        _component: ComponentRef,
        _data: Option<VNodeData>,
        _context: &Rc<RenderContext>,
        _children: Vec<VNode>,
        _tag: Option<&str>,
    ) -> Option<Rendered> {
        None
    }
}

#[test]
fn failed_resolution_yields_empty_placeholder() {
    let config = PlatformConfig::web();
    let f = ElementFactory::new(&config).with_resolver(&NothingResolver);
    let ctx = RenderContext::new().into_rc();

    let out = node(f.h(&ctx, ComponentOptions::new().into_rc(), (), ()));
    assert!(out.is_empty_placeholder());
}
