//! Reactive primitives consumed by the renderer: dependency tracking,
//! observed values and deep traversal.

pub mod observer;
pub mod signal;
pub mod traverse;

pub use observer::{Observed, Value, format_number};
pub use signal::{Dep, effect};
pub use traverse::traverse;
