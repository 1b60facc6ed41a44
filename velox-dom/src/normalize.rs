//! Children normalization.
//!
//! Render calls accept children in whatever shape is convenient; the tree
//! stores them as one flat list of descriptors and text leaves.

use std::fmt;

use velox_core::{Value, format_number};

use crate::create_element::Rendered;
use crate::data::ScopedSlot;
use crate::VNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizationType {
    /// Children are already flat descriptors.
    #[default]
    None,
    /// At most one level of nesting, as produced by generated render code.
    Simple,
    /// Anything a hand-written render function can produce.
    Always,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Str(String),
    Number(f64),
    Bool(bool),
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Str(s) => f.write_str(s),
            Primitive::Number(n) => f.write_str(&format_number(*n)),
            Primitive::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<Primitive> for Value {
    fn from(p: Primitive) -> Self {
        match p {
            Primitive::Str(s) => Value::String(s),
            Primitive::Number(n) => Value::Number(n),
            Primitive::Bool(b) => Value::Bool(b),
        }
    }
}

/// One entry of raw children input.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Node(VNode),
    Primitive(Primitive),
    List(Vec<Child>),
    /// A list produced by a loop; keyless descriptors inside get positional keys.
    VList(Vec<Child>),
    /// Only meaningful as the first child, where it becomes the default scoped slot.
    Slot(ScopedSlot),
    Empty,
}

impl From<VNode> for Child {
    fn from(node: VNode) -> Self {
        Child::Node(node)
    }
}

impl From<Rendered> for Child {
    fn from(rendered: Rendered) -> Self {
        match rendered {
            Rendered::Node(node) => Child::Node(node),
            Rendered::Fragment(nodes) => Child::List(nodes.into_iter().map(Child::Node).collect()),
        }
    }
}

impl From<Primitive> for Child {
    fn from(p: Primitive) -> Self {
        Child::Primitive(p)
    }
}

impl From<&str> for Child {
    fn from(s: &str) -> Self {
        Child::Primitive(Primitive::Str(s.to_string()))
    }
}

impl From<String> for Child {
    fn from(s: String) -> Self {
        Child::Primitive(Primitive::Str(s))
    }
}

impl From<f64> for Child {
    fn from(n: f64) -> Self {
        Child::Primitive(Primitive::Number(n))
    }
}

impl From<i32> for Child {
    fn from(n: i32) -> Self {
        Child::Primitive(Primitive::Number(n.into()))
    }
}

impl From<bool> for Child {
    fn from(b: bool) -> Self {
        Child::Primitive(Primitive::Bool(b))
    }
}

impl From<ScopedSlot> for Child {
    fn from(slot: ScopedSlot) -> Self {
        Child::Slot(slot)
    }
}

impl<T: Into<Child>> From<Vec<T>> for Child {
    fn from(items: Vec<T>) -> Self {
        Child::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Child>> From<Option<T>> for Child {
    fn from(item: Option<T>) -> Self {
        item.map_or(Child::Empty, Into::into)
    }
}

/// Normalize hand-written children: flatten any depth, turn primitives into
/// text leaves, drop empty entries and merge adjacent text leaves.
pub fn normalize_children(children: Vec<Child>) -> Vec<VNode> {
    normalize_array(children, None, false)
}

fn normalize_array(children: Vec<Child>, nested_index: Option<&str>, is_vlist: bool) -> Vec<VNode> {
    let mut res: Vec<VNode> = Vec::with_capacity(children.len());
    for (i, child) in children.into_iter().enumerate() {
        match child {
            Child::Empty | Child::Slot(_) => {}
            Child::List(items) => push_nested(&mut res, items, nested_index, i, false),
            Child::VList(items) => push_nested(&mut res, items, nested_index, i, true),
            Child::Primitive(p) => {
                let text = p.to_string();
                if let Some(VNode::Text(last)) = res.last_mut() {
                    last.push_str(&text);
                } else if !text.is_empty() {
                    res.push(VNode::Text(text));
                }
            }
            Child::Node(VNode::Text(text)) => {
                if let Some(VNode::Text(last)) = res.last_mut() {
                    last.push_str(&text);
                } else {
                    res.push(VNode::Text(text));
                }
            }
            Child::Node(mut node) => {
                if is_vlist && node.has_tag() && node.key().is_none() {
                    if let Some(index) = nested_index {
                        node.set_key(Value::String(format!("__vlist{index}_{i}__")));
                    }
                }
                res.push(node);
            }
        }
    }
    res
}

fn push_nested(
    res: &mut Vec<VNode>,
    items: Vec<Child>,
    nested_index: Option<&str>,
    i: usize,
    is_vlist: bool,
) {
    if items.is_empty() {
        return;
    }
    let index = format!("{}_{}", nested_index.unwrap_or_default(), i);
    let mut nested = normalize_array(items, Some(index.as_str()), is_vlist);
    let merge = matches!(res.last(), Some(VNode::Text(_)))
        && matches!(nested.first(), Some(VNode::Text(_)));
    if merge {
        if let (Some(VNode::Text(last)), VNode::Text(first)) = (res.last_mut(), nested.remove(0)) {
            last.push_str(&first);
        }
    }
    res.append(&mut nested);
}

/// Normalize generated children: splice nested lists one level deep. Text is
/// converted one-to-one and never merged.
pub fn simple_normalize_children(children: Vec<Child>) -> Vec<VNode> {
    let mut res = Vec::with_capacity(children.len());
    for child in children {
        match child {
            Child::List(items) | Child::VList(items) => {
                for item in items {
                    push_flat(&mut res, item);
                }
            }
            other => push_flat(&mut res, other),
        }
    }
    res
}

/// Children the caller promises are already flat.
pub fn flat_children(children: Vec<Child>) -> Vec<VNode> {
    let mut res = Vec::with_capacity(children.len());
    for child in children {
        push_flat(&mut res, child);
    }
    res
}

fn push_flat(res: &mut Vec<VNode>, child: Child) {
    match child {
        Child::Node(node) => res.push(node),
        Child::Primitive(p) => res.push(VNode::Text(p.to_string())),
        Child::Empty | Child::Slot(_) => {}
        Child::List(items) | Child::VList(items) => {
            // Deeper than the caller promised; the tree cannot hold a list, so splice it.
            log::debug!("splicing {} unexpectedly nested children", items.len());
            for item in items {
                push_flat(res, item);
            }
        }
    }
}

/// Dispatch on the requested mode.
pub fn normalize(children: Vec<Child>, mode: NormalizationType) -> Vec<VNode> {
    match mode {
        NormalizationType::Always => normalize_children(children),
        NormalizationType::Simple => simple_normalize_children(children),
        NormalizationType::None => flat_children(children),
    }
}
