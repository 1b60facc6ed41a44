use velox_core::{Value, traverse};

use crate::data::VNodeData;

/// Make the current render depend on everything inside composite `style` and
/// `class` bindings. These are often only read by a child (slot content), so
/// the parent's shallow read would miss deep mutations.
pub fn register_deep_bindings(data: &VNodeData) {
    DeepBindings::capture(data).register();
}

/// The `style`/`class` values of a data bag, kept after the bag itself has
/// been handed to a descriptor or a component.
#[derive(Debug, Default)]
pub(crate) struct DeepBindings {
    style: Option<Value>,
    class: Option<Value>,
}

impl DeepBindings {
    pub(crate) fn capture(data: &VNodeData) -> Self {
        DeepBindings {
            style: data.style.clone().filter(Value::is_composite),
            class: data.class.clone().filter(Value::is_composite),
        }
    }

    pub(crate) fn register(&self) {
        for value in [&self.style, &self.class].into_iter().flatten() {
            traverse(value);
        }
    }
}
