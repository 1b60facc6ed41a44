use std::collections::HashMap;
use std::rc::Rc;

use crate::component::ComponentRef;

/// Named components visible to a render context. A registry may fall back to
/// a parent (typically the global one).
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    components: HashMap<String, ComponentRef>,
    parent: Option<Rc<ComponentRegistry>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(mut self, parent: Rc<ComponentRegistry>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn register(mut self, name: impl Into<String>, component: impl Into<ComponentRef>) -> Self {
        self.insert(name, component);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, component: impl Into<ComponentRef>) {
        self.components.insert(name.into(), component.into());
    }

    pub fn get_own(&self, name: &str) -> Option<&ComponentRef> {
        self.components.get(name)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    fn ancestors(&self) -> impl Iterator<Item = &ComponentRegistry> {
        std::iter::successors(self.parent.as_deref(), |r| r.parent.as_deref())
    }
}

/// `my-widget` → `myWidget`. Only a dash followed by a word character
/// (`[A-Za-z0-9_]`) is consumed, so `a--b` → `a-B`.
pub fn camelize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(ch) = chars.next() {
        match chars.peek() {
            Some(&next) if ch == '-' && (next.is_ascii_alphanumeric() || next == '_') => {
                out.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => out.push(ch),
        }
    }
    out
}

/// `myWidget` → `MyWidget`
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `userName` → `user-name`
pub fn hyphenate(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.char_indices() {
        if ch.is_ascii_uppercase() && i > 0 {
            out.push('-');
        }
        out.push(ch.to_ascii_lowercase());
    }
    out
}

/// Look a component up by the name used in a render call.
///
/// The context's own registry is searched for the exact name, then the
/// camelCase and PascalCase forms; only then are parent registries searched,
/// again exact name first.
pub fn resolve_asset(registry: &ComponentRegistry, name: &str) -> Option<ComponentRef> {
    let camelized = camelize(name);
    let pascal = capitalize(&camelized);
    let candidates = [name, camelized.as_str(), pascal.as_str()];

    if let Some(found) = candidates.iter().find_map(|c| registry.get_own(c)) {
        return Some(found.clone());
    }
    candidates
        .iter()
        .find_map(|c| registry.ancestors().find_map(|r| r.get_own(c)))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_conversions() {
        assert_eq!(camelize("my-widget"), "myWidget");
        assert_eq!(camelize("a-b-c"), "aBC");
        assert_eq!(camelize("a--b"), "a-B");
        assert_eq!(camelize("trailing-"), "trailing-");
        assert_eq!(camelize("-lead"), "Lead");
        assert_eq!(camelize("x-_y"), "x_y");
        assert_eq!(capitalize("myWidget"), "MyWidget");
        assert_eq!(hyphenate("userName"), "user-name");
        assert_eq!(hyphenate("plain"), "plain");
    }
}
