use crate::error::{Result, SvcupError};
use crate::services::descriptor::{ServiceDescriptor, ServiceSpec};
use std::collections::HashSet;

/// Built-in service table for the local stack
pub fn builtin_specs() -> Vec<ServiceSpec> {
    vec![
        ServiceSpec::new(
            "open-webui",
            "open-webui/open-webui",
            "ghcr.io/open-webui/open-webui",
        ),
        ServiceSpec::new("n8n", "n8n-io/n8n", "n8nio/n8n").with_tag_prefix("n8n@"),
        ServiceSpec::new("flowise", "FlowiseAI/Flowise", "flowiseai/flowise").optional_tag(),
        ServiceSpec::new("qdrant", "qdrant/qdrant", "qdrant/qdrant").optional_tag(),
        ServiceSpec::new("neo4j", "neo4j/neo4j", "neo4j"),
        ServiceSpec::new("langfuse", "langfuse/langfuse", "langfuse/langfuse"),
        ServiceSpec::new(
            "langfuse-worker",
            "langfuse/langfuse",
            "langfuse/langfuse-worker",
        ),
    ]
}

/// Immutable, ordered set of validated service descriptors
#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    services: Vec<ServiceDescriptor>,
}

impl ServiceCatalog {
    pub fn builtin() -> Result<Self> {
        Self::from_specs(builtin_specs())
    }

    /// Validate and compile every entry; names must be unique.
    pub fn from_specs(specs: Vec<ServiceSpec>) -> Result<Self> {
        if specs.is_empty() {
            return Err(SvcupError::Config(
                "At least one service must be configured".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut services = Vec::with_capacity(specs.len());
        for spec in specs {
            if !seen.insert(spec.name.clone()) {
                return Err(SvcupError::Config(format!(
                    "Service '{}' is configured more than once",
                    spec.name
                )));
            }
            services.push(ServiceDescriptor::from_spec(spec)?);
        }

        Ok(Self { services })
    }

    pub fn get(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.services.iter()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }
}
