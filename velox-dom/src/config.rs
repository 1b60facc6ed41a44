//! Platform lookup tables consulted while building descriptors.
//!
//! A [`PlatformConfig`] is built once at startup and handed to the factory by
//! reference; nothing mutates it afterwards.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const HTML_TAGS: &str = "html,body,base,head,link,meta,style,title,\
address,article,aside,footer,header,h1,h2,h3,h4,h5,h6,hgroup,nav,section,\
div,dd,dl,dt,figcaption,figure,picture,hr,img,li,main,ol,p,pre,ul,\
a,b,abbr,bdi,bdo,br,cite,code,data,dfn,em,i,kbd,mark,q,rp,rt,rtc,ruby,\
s,samp,small,span,strong,sub,sup,time,u,var,wbr,area,audio,map,track,video,\
embed,object,param,source,canvas,script,noscript,del,ins,\
caption,col,colgroup,table,thead,tbody,td,th,tr,\
button,datalist,fieldset,form,input,label,legend,meter,optgroup,option,\
output,progress,select,textarea,\
details,dialog,menu,menuitem,summary,\
content,element,shadow,template,blockquote,iframe,tfoot";

const SVG_TAGS: &str = "svg,animate,circle,clippath,cursor,defs,desc,ellipse,filter,font-face,\
foreignobject,g,glyph,image,line,marker,mask,missing-glyph,path,pattern,\
polygon,polyline,rect,switch,symbol,text,textpath,tspan,use,view";

/// XML namespace a descriptor is created in. `None` on a node means the document default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Svg,
    Math,
}

impl Namespace {
    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Svg => "svg",
            Namespace::Math => "math",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether advisory diagnostics are reported. Structural fallbacks apply either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Development,
    Production,
}

impl Default for DiagnosticLevel {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            DiagnosticLevel::Development
        } else {
            DiagnosticLevel::Production
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlatformConfig {
    reserved_tags: HashSet<String>,
    // stored lowercase; svg element names are matched without case
    svg_tags: HashSet<String>,
    namespaces: HashMap<String, Namespace>,
    tag_prefix: Option<String>,
    pub diagnostics: DiagnosticLevel,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self::web()
    }
}

impl PlatformConfig {
    /// A platform with no built-in vocabulary: every string tag is either a
    /// registered component or an unknown element.
    pub fn empty() -> Self {
        Self {
            reserved_tags: HashSet::new(),
            svg_tags: HashSet::new(),
            namespaces: HashMap::new(),
            tag_prefix: None,
            diagnostics: DiagnosticLevel::default(),
        }
    }

    /// HTML and SVG elements are reserved; SVG elements live in the svg
    /// namespace and `math` in MathML.
    pub fn web() -> Self {
        let mut config = Self::empty();
        for tag in HTML_TAGS.split(',') {
            config.reserved_tags.insert(tag.to_string());
        }
        for tag in SVG_TAGS.split(',') {
            config = config.with_svg_tag(tag);
        }
        config.namespaces.insert("math".to_string(), Namespace::Math);
        config
    }

    pub fn with_reserved_tag(mut self, tag: impl Into<String>) -> Self {
        self.reserved_tags.insert(tag.into());
        self
    }

    /// Reserve an svg element. It matches in any case and always lives in the svg namespace.
    pub fn with_svg_tag(mut self, tag: impl Into<String>) -> Self {
        self.svg_tags.insert(tag.into().to_ascii_lowercase());
        self
    }

    pub fn with_namespace(mut self, tag: impl Into<String>, ns: Namespace) -> Self {
        self.namespaces.insert(tag.into(), ns);
        self
    }

    pub fn with_tag_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.tag_prefix = Some(prefix.into());
        self
    }

    pub fn with_diagnostics(mut self, level: DiagnosticLevel) -> Self {
        self.diagnostics = level;
        self
    }

    /// Built-in element vocabulary. HTML names match exactly, so a component
    /// registered as `Button` is not shadowed by `button`; svg names ignore
    /// ASCII case (`clipPath`, `foreignObject`).
    pub fn is_reserved_tag(&self, tag: &str) -> bool {
        self.reserved_tags.contains(tag) || self.is_svg_tag(tag)
    }

    pub fn is_svg_tag(&self, tag: &str) -> bool {
        self.svg_tags.contains(&tag.to_ascii_lowercase())
    }

    /// Static namespace for tags that always live in one (`svg` children, `math`).
    pub fn tag_namespace(&self, tag: &str) -> Option<Namespace> {
        if self.is_svg_tag(tag) {
            return Some(Namespace::Svg);
        }
        self.namespaces.get(tag).copied()
    }

    /// Strip the platform prefix from a reserved tag (`weex:div` → `div`).
    pub fn parse_platform_tag_name<'t>(&self, tag: &'t str) -> &'t str {
        match &self.tag_prefix {
            Some(prefix) => tag.strip_prefix(prefix.as_str()).unwrap_or(tag),
            None => tag,
        }
    }

    pub fn is_development(&self) -> bool {
        self.diagnostics == DiagnosticLevel::Development
    }

    /// Web defaults overlaid with a JSON document such as
    /// `{"reserved_tags": ["x-panel"], "namespaces": {"mi": "math"}, "diagnostics": "production"}`.
    pub fn from_json(src: &str) -> Result<Self, ConfigError> {
        let overlay: ConfigOverlay = serde_json::from_str(src)?;
        overlay.apply(Self::web())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigOverlay {
    #[serde(default)]
    reserved_tags: Vec<String>,
    #[serde(default)]
    namespaces: BTreeMap<String, Namespace>,
    #[serde(default)]
    tag_prefix: Option<String>,
    #[serde(default)]
    diagnostics: Option<DiagnosticLevel>,
}

impl ConfigOverlay {
    fn apply(self, mut config: PlatformConfig) -> Result<PlatformConfig, ConfigError> {
        for tag in self.reserved_tags {
            if tag.trim().is_empty() {
                return Err(ConfigError::EmptyTag("reserved_tags"));
            }
            config = config.with_reserved_tag(tag);
        }
        for (tag, ns) in self.namespaces {
            if tag.trim().is_empty() {
                return Err(ConfigError::EmptyTag("namespaces"));
            }
            config = config.with_namespace(tag, ns);
        }
        if let Some(prefix) = self.tag_prefix {
            if prefix.is_empty() {
                return Err(ConfigError::EmptyTag("tag_prefix"));
            }
            config = config.with_tag_prefix(prefix);
        }
        if let Some(level) = self.diagnostics {
            config = config.with_diagnostics(level);
        }
        Ok(config)
    }
}
