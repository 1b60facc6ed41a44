use crate::VNode;
use crate::config::Namespace;

/// Children of this element are created in the document's default namespace.
pub const FOREIGN_OBJECT: &str = "foreignObject";

/// The root tag of the svg namespace; keeps its own namespace even when a
/// reset is forced from above.
const SVG_ROOT: &str = "svg";

/// Assign `ns` to a freshly built descriptor and push it down to every tagged
/// descendant that has none of its own. Below `foreignObject` the namespace is
/// cleared and the reset is forced onto namespaced descendants too.
pub fn apply_ns(vnode: &mut VNode, ns: Option<Namespace>, force: bool) {
    match vnode {
        VNode::Element(el) => {
            let (ns, force) = if el.tag == FOREIGN_OBJECT {
                (None, true)
            } else {
                (ns, force)
            };
            el.ns = ns;
            for child in &mut el.children {
                if child.has_tag()
                    && (child.ns().is_none() || (force && child.tag() != Some(SVG_ROOT)))
                {
                    apply_ns(child, ns, force);
                }
            }
        }
        // Slot content of a component is rendered by the component itself.
        VNode::Component(c) => c.ns = ns,
        VNode::Text(_) | VNode::Comment(_) => {}
    }
}
