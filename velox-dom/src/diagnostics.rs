use std::cell::RefCell;

use crate::context::RenderContext;
use crate::registry::{camelize, capitalize};

/// Receives advisory diagnostics. The factory only calls it in development mode.
pub trait DiagnosticSink {
    fn report(&self, message: &str, context: Option<&RenderContext>);
}

/// Forwards diagnostics to the `log` facade as warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, message: &str, context: Option<&RenderContext>) {
        log::warn!("[velox warn]: {message}{}", component_trace(context));
    }
}

/// Keeps every report in memory, e.g. for tooling that shows them later.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: RefCell<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, message: &str, _context: Option<&RenderContext>) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

/// `<MyWidget>`, `<Root>` for a context without parent, `<Anonymous>` otherwise.
pub fn format_component_name(context: Option<&RenderContext>) -> String {
    match context {
        Some(ctx) if ctx.is_root() => "<Root>".to_string(),
        Some(RenderContext { name: Some(name), .. }) => format!("<{}>", capitalize(&camelize(name))),
        _ => "<Anonymous>".to_string(),
    }
}

/// The chain of components from `context` up to the root.
pub fn component_trace(context: Option<&RenderContext>) -> String {
    let Some(ctx) = context else {
        return String::new();
    };
    let mut lines = vec![format!("---> {}", format_component_name(Some(ctx)))];
    let mut current = ctx.parent();
    while let Some(parent) = current {
        lines.push(format!("       {}", format_component_name(Some(&*parent))));
        current = parent.parent();
    }
    format!("\n\nfound in\n\n{}\n", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_walks_to_root() {
        let root = RenderContext::new().named("app").into_rc();
        let child = RenderContext::new().named("todo-item").child_of(&root);
        let trace = component_trace(Some(&child));
        assert!(trace.contains("---> <TodoItem>"));
        assert!(trace.contains("       <Root>"));
        assert_eq!(component_trace(None), "");
    }
}
