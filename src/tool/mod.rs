// ABOUTME: Tool module - the Tool trait, tool kinds and the immutable registry.
// ABOUTME: Core abstraction for agent capabilities.

mod kind;
mod registry;
mod result;
mod traits;

pub use kind::ToolKind;
pub use registry::*;
pub use result::*;
pub use traits::*;

#[cfg(test)]
mod registry_test;
#[cfg(test)]
mod result_test;
