// ABOUTME: Implements the Registry - an immutable map from ToolKind to the
// ABOUTME: tool implementing it, shared read-only by every session.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Tool, ToolKind};
use crate::error::ToolError;
use crate::llm::ToolDefinition;

/// Builder for a [`Registry`]. Registration only happens here, before the
/// registry is shared.
#[derive(Default)]
pub struct RegistryBuilder {
    tools: BTreeMap<ToolKind, Arc<dyn Tool>>,
}

impl RegistryBuilder {
    /// Register the implementation of a tool kind, replacing any previous one.
    pub fn register<T: Tool + 'static>(self, kind: ToolKind, tool: T) -> Self {
        self.register_arc(kind, Arc::new(tool))
    }

    pub fn register_arc(mut self, kind: ToolKind, tool: Arc<dyn Tool>) -> Self {
        self.tools.insert(kind, tool);
        self
    }

    pub fn build(self) -> Registry {
        Registry {
            tools: Arc::new(self.tools),
        }
    }
}

/// A read-only registry of tools, cheap to clone.
#[derive(Clone, Default)]
pub struct Registry {
    tools: Arc<BTreeMap<ToolKind, Arc<dyn Tool>>>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Get the tool registered for a kind.
    pub fn get(&self, kind: ToolKind) -> Option<Arc<dyn Tool>> {
        self.tools.get(&kind).cloned()
    }

    /// Resolve a planner-facing identifier to its kind and tool.
    ///
    /// Fails with [`ToolError::Unknown`] when the identifier names no known
    /// kind or the kind has no implementation in this registry.
    pub fn resolve(&self, identifier: &str) -> Result<(ToolKind, Arc<dyn Tool>), ToolError> {
        identifier
            .parse::<ToolKind>()
            .ok()
            .and_then(|kind| self.get(kind).map(|tool| (kind, tool)))
            .ok_or_else(|| ToolError::Unknown(identifier.to_string()))
    }

    /// Registered identifiers in a stable order.
    pub fn identifiers(&self) -> Vec<&'static str> {
        self.tools.keys().map(|k| k.identifier()).collect()
    }

    pub fn count(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Convert all tools to LLM tool definitions.
    pub fn to_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.schema(),
            })
            .collect()
    }
}
