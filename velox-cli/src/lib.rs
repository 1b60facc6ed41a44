use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value as Json;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use velox_core::Value;
use velox_dom::{
    Child, ComponentOptions, ComponentRegistry, DiagnosticLevel, DiagnosticSink, ElementFactory,
    Handler, LogSink, PlatformConfig, RenderContext, TagSpec, VNode, VNodeData,
};

/// A render description as written by hand:
///
/// ```json
/// {
///   "components": { "todo-item": { "props": ["label"] } },
///   "root": { "tag": "ul", "children": [{ "for": [{ "tag": "todo-item", "data": { "attrs": { "label": "a" } } }] }] }
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Document {
    #[serde(default)]
    components: BTreeMap<String, ComponentDef>,
    root: Json,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ComponentDef {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    props: Vec<String>,
}

/// Load the platform table: web defaults, then the optional JSON overlay, then `--production`.
pub fn load_config(path: Option<&Path>, production: bool) -> Result<PlatformConfig> {
    let mut config = match path {
        Some(path) => {
            let src = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            PlatformConfig::from_json(&src)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => PlatformConfig::web(),
    };
    if production {
        config = config.with_diagnostics(DiagnosticLevel::Production);
    }
    Ok(config)
}

/// Build the descriptors described by `src`. Advisories go to `sink`.
pub fn render_json(
    src: &str,
    config: &PlatformConfig,
    sink: &dyn DiagnosticSink,
) -> Result<Vec<VNode>> {
    let doc: Document = serde_json::from_str(src).context("invalid render description")?;

    let mut registry = ComponentRegistry::new();
    for (name, def) in doc.components {
        let mut options = ComponentOptions::new().with_props(def.props);
        options.name = def.name;
        registry.insert(name, options);
    }
    let ctx = RenderContext::new()
        .named("app")
        .with_components(registry)
        .into_rc();

    let factory = ElementFactory::new(config).with_sink(sink);
    let builder = Builder { factory, ctx: &ctx };
    let nodes = builder.render(&doc.root).context("root")?;
    log::debug!("rendered {} root node(s)", nodes.len());
    Ok(nodes)
}

/// Read a description file and print its tree as pseudo-markup.
pub fn render_file(input: &Path, config: Option<&Path>, production: bool) -> Result<String> {
    let config = load_config(config, production)?;
    let src =
        fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?;
    let nodes = render_json(&src, &config, &LogSink)
        .with_context(|| format!("failed to render {}", input.display()))?;
    Ok(nodes.iter().map(VNode::to_string).collect())
}

struct Builder<'a> {
    factory: ElementFactory<'a>,
    ctx: &'a Rc<RenderContext>,
}

impl Builder<'_> {
    fn render(&self, node: &Json) -> Result<Vec<VNode>> {
        let Json::Object(fields) = node else {
            bail!("expected an element object, found {node}");
        };
        let tag = match fields.get("tag") {
            None => None,
            Some(tag) => tag_spec(tag)?,
        };
        let data = match fields.get("data") {
            Some(data) => Some(vnode_data(data).context("data")?),
            None => None,
        };
        let children = match fields.get("children") {
            Some(Json::Array(items)) => self.children(items)?,
            Some(other) => vec![self.child(other).context("children")?],
            None => Vec::new(),
        };
        let rendered = self.factory.h(self.ctx, tag, data, children);
        Ok(rendered.into_nodes())
    }

    fn children(&self, items: &[Json]) -> Result<Vec<Child>> {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.child(item).with_context(|| format!("child {i}")))
            .collect()
    }

    fn child(&self, item: &Json) -> Result<Child> {
        Ok(match item {
            Json::Null => Child::Empty,
            Json::Bool(b) => Child::from(*b),
            Json::Number(n) => Child::from(n.as_f64().unwrap_or_default()),
            Json::String(s) => Child::from(s.as_str()),
            Json::Array(items) => Child::List(self.children(items)?),
            Json::Object(fields) => match fields.get("for") {
                Some(Json::Array(items)) => Child::VList(self.children(items)?),
                Some(other) => bail!("`for` must be a list, found {other}"),
                None => {
                    let mut nodes = self.render(item)?;
                    match nodes.len() {
                        1 => Child::Node(nodes.remove(0)),
                        _ => Child::List(nodes.into_iter().map(Child::Node).collect()),
                    }
                }
            },
        })
    }
}

/// `null`, `false`, `0` and `""` mean no tag.
fn tag_spec(tag: &Json) -> Result<Option<TagSpec>> {
    Ok(match tag {
        Json::Null | Json::Bool(false) => None,
        Json::Number(n) if n.as_f64() == Some(0.0) => None,
        Json::String(s) if s.is_empty() => None,
        Json::String(s) => Some(TagSpec::from(s.as_str())),
        other => bail!("unsupported tag {other}"),
    })
}

fn vnode_data(data: &Json) -> Result<VNodeData> {
    let Json::Object(fields) = data else {
        bail!("expected an object, found {data}");
    };
    let mut out = VNodeData::new();
    for (name, field) in fields {
        match name.as_str() {
            "key" if !field.is_null() => out.key = Some(to_value(field)),
            "key" => {}
            "is" if field.is_null() => {}
            // a falsy `is` still replaces the tag, leaving nothing to render
            "is" => out.is = tag_spec(field)?.or(Some(TagSpec::from(""))),
            "pre" => out.pre = field.as_bool().unwrap_or_default(),
            "slot" => out.slot = field.as_str().map(str::to_string),
            "ref" => out.ref_name = field.as_str().map(str::to_string),
            "style" => out.style = Some(to_value(field)),
            "class" => out.class = Some(to_value(field)),
            "attrs" => out.attrs = object(field, name)?,
            "props" => out.props = object(field, name)?,
            "on" => {
                for event in events(field, name)? {
                    out = out.on(event, Handler::noop());
                }
            }
            "nativeOn" => {
                for event in events(field, name)? {
                    out = out.native_on(event, Handler::noop());
                }
            }
            other => bail!("unknown data field `{other}`"),
        }
    }
    Ok(out)
}

fn object(field: &Json, name: &str) -> Result<BTreeMap<String, Value>> {
    match field {
        Json::Object(map) => Ok(map.iter().map(|(k, v)| (k.clone(), to_value(v))).collect()),
        other => bail!("`{name}` must be an object, found {other}"),
    }
}

fn events(field: &Json, name: &str) -> Result<Vec<String>> {
    match field {
        Json::Array(items) => items
            .iter()
            .map(|e| match e.as_str() {
                Some(s) => Ok(s.to_string()),
                None => bail!("`{name}` entries must be event names, found {e}"),
            })
            .collect(),
        other => bail!("`{name}` must be a list of event names, found {other}"),
    }
}

pub fn to_value(json: &Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => Value::Number(n.as_f64().unwrap_or_default()),
        Json::String(s) => Value::String(s.clone()),
        Json::Array(items) => Value::Array(items.iter().map(to_value).collect()),
        Json::Object(map) => Value::Object(map.iter().map(|(k, v)| (k.clone(), to_value(v))).collect()),
    }
}
